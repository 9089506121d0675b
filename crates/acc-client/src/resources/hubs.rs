//! Hubs and projects.

use reqwest::Method;
use tracing::{debug, info, instrument, warn};

use acc_core::models::{Hub, Project};
use acc_core::{HubId, ListOptions, Region, Result};

use crate::endpoints;
use crate::resource::{CollectionResource, decode, unwrap_list};
use crate::session::Session;

/// Region order tried for hubs on the known-APAC list.
const KNOWN_HUB_REGIONS: [Region; 4] = [Region::APAC, Region::AUS, Region::US, Region::EMEA];

impl Session {
    pub fn hubs(&self) -> CollectionResource<'_, Hub> {
        CollectionResource::new(self, endpoints::HUBS)
    }

    pub fn hub_projects(&self, hub_id: &HubId) -> CollectionResource<'_, Project> {
        CollectionResource::new(self, endpoints::hub_projects(hub_id.as_str()))
    }

    /// All hubs the signed-in user can see.
    #[instrument(skip(self))]
    pub async fn get_hubs(&self) -> Result<Vec<Hub>> {
        let hubs = self.hubs().list(&ListOptions::default()).await?;
        debug!(count = hubs.len(), "Hubs listed");
        Ok(hubs)
    }

    #[instrument(skip(self), fields(hub = %hub_id))]
    pub async fn get_hub_details(&self, hub_id: &HubId) -> Result<Hub> {
        self.hubs().get(hub_id.as_str(), &ListOptions::default()).await
    }

    /// Projects in a hub.
    ///
    /// Hubs on the known-APAC list are tried in APAC, AUS, US and EMEA in
    /// turn; the first region that answers becomes the session region and
    /// the last error is returned if none does. Other hubs are listed in
    /// the session's current region.
    #[instrument(skip(self), fields(hub = %hub_id))]
    pub async fn get_projects(&self, hub_id: &HubId) -> Result<Vec<Project>> {
        if !self.config().is_known_apac_hub(hub_id.as_str()) {
            return self.get_hub_projects(hub_id).await;
        }

        info!("Known APAC hub, trying regions in turn");
        let path = endpoints::hub_projects(hub_id.as_str());
        let [earlier @ .., last] = KNOWN_HUB_REGIONS;

        for region in earlier {
            match self.projects_in_region(&path, region).await {
                Ok(projects) => return Ok(projects),
                Err(err) if err.requires_login() => return Err(err),
                Err(err) => warn!(%region, error = %err, "Project listing failed"),
            }
        }

        self.projects_in_region(&path, last).await
    }

    async fn projects_in_region(&self, path: &str, region: Region) -> Result<Vec<Project>> {
        let body = self.request_in_region(Method::GET, path, None, region).await?;
        self.set_region(region);
        unwrap_list(body).into_iter().map(decode).collect()
    }

    /// Projects in a hub, listed in the current region only.
    #[instrument(skip(self), fields(hub = %hub_id))]
    pub async fn get_hub_projects(&self, hub_id: &HubId) -> Result<Vec<Project>> {
        let projects = self.hub_projects(hub_id).list(&ListOptions::default()).await?;
        debug!(count = projects.len(), "Projects listed");
        Ok(projects)
    }
}
