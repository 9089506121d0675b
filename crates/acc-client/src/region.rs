//! Region resolution for hubs.

use std::fmt;

use tracing::{debug, info, instrument, warn};

use acc_core::models::Hub;
use acc_core::{Error, Region, Result};

use crate::endpoints;
use crate::session::Session;

/// Hub names or ids containing any of these are treated as APAC.
const APAC_KEYWORDS: &[&str] = &["apac", "asia", "pacific", "australia"];

/// Which rule decided a hub's region.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RegionSource {
    KnownHub,
    HubAttribute,
    HubName,
    HubId,
    Default,
}

impl fmt::Display for RegionSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            RegionSource::KnownHub => "known hub",
            RegionSource::HubAttribute => "hub region attribute",
            RegionSource::HubName => "hub name",
            RegionSource::HubId => "hub id",
            RegionSource::Default => "default",
        };
        f.write_str(s)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RegionDecision {
    pub region: Region,
    pub source: RegionSource,
}

fn mentions_apac(text: &str) -> bool {
    let text = text.to_lowercase();
    APAC_KEYWORDS.iter().any(|k| text.contains(k))
}

impl Session {
    /// Work out which region serves `hub_id` and make it the session's
    /// region.
    ///
    /// Rules are tried in order: the configured known-APAC list, the hub's
    /// own `region` attribute, APAC keywords in the hub name, APAC keywords
    /// in the hub id, and finally US. A failed hub lookup is logged and the
    /// remaining rules still apply; authentication errors are returned.
    #[instrument(skip(self))]
    pub async fn resolve_region(&self, hub_id: &str) -> Result<RegionDecision> {
        let decision = self.decide_region(hub_id).await?;
        info!(region = %decision.region, source = %decision.source, "Region resolved");
        self.set_region(decision.region);
        Ok(decision)
    }

    async fn decide_region(&self, hub_id: &str) -> Result<RegionDecision> {
        if self.config().is_known_apac_hub(hub_id) {
            return Ok(RegionDecision {
                region: Region::APAC,
                source: RegionSource::KnownHub,
            });
        }

        let hub = match self.get(&endpoints::hub(hub_id)).await {
            Ok(body) => body
                .get("data")
                .cloned()
                .and_then(|data| serde_json::from_value::<Hub>(data).ok()),
            Err(err) if err.requires_login() => return Err(err),
            Err(err) => {
                warn!(error = %err, "Hub details unavailable, continuing");
                None
            }
        };

        if let Some(hub) = &hub {
            if let Some(region) = hub.region() {
                return Ok(RegionDecision {
                    region,
                    source: RegionSource::HubAttribute,
                });
            }
            if mentions_apac(hub.name()) {
                return Ok(RegionDecision {
                    region: Region::APAC,
                    source: RegionSource::HubName,
                });
            }
        }

        if mentions_apac(hub_id) {
            return Ok(RegionDecision {
                region: Region::APAC,
                source: RegionSource::HubId,
            });
        }

        Ok(RegionDecision {
            region: Region::US,
            source: RegionSource::Default,
        })
    }

    /// Try listing the hub's projects in every region and return the first
    /// region that answers. The session region is updated on success.
    #[instrument(skip(self))]
    pub async fn probe_regions(&self, hub_id: &str) -> Result<Option<Region>> {
        let path = endpoints::hub_projects(hub_id);
        for region in Region::ALL {
            match self
                .request_in_region(reqwest::Method::GET, &path, None, region)
                .await
            {
                Ok(_) => {
                    info!(%region, "Hub reachable");
                    self.set_region(region);
                    return Ok(Some(region));
                }
                Err(err @ Error::Auth(_)) => return Err(err),
                Err(err) => debug!(%region, error = %err, "Hub not reachable"),
            }
        }
        Ok(None)
    }
}
