//! Mapping a project to its cost container.
//!
//! Cost management addresses projects by container id, which is usually
//! but not always the project id. Each step below is tried only if every
//! earlier step failed.

use std::fmt;

use serde_json::Value;
use tracing::{debug, info, instrument, warn};

use acc_core::{CostContainerId, Error, ProjectId, Result};

use crate::endpoints;
use crate::session::Session;

/// The step that produced a container id.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResolutionStep {
    /// The project id as given.
    Direct,
    /// The project id without its `b.` prefix.
    Stripped,
    /// The project id with a `b.` prefix added.
    Prefixed,
    /// The first entry of the project's container list.
    ProjectContainers,
    /// The project's `cost` relationship, found through its hub.
    HubRelationship,
    /// Nothing matched; the project id is used unchanged.
    Fallback,
}

impl fmt::Display for ResolutionStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            ResolutionStep::Direct => "direct",
            ResolutionStep::Stripped => "b. prefix stripped",
            ResolutionStep::Prefixed => "b. prefix added",
            ResolutionStep::ProjectContainers => "project containers",
            ResolutionStep::HubRelationship => "hub relationship",
            ResolutionStep::Fallback => "fallback",
        };
        f.write_str(s)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContainerResolution {
    pub container_id: CostContainerId,
    pub step: ResolutionStep,
}

/// Treat an error as "this step did not work" unless it is an auth failure.
fn skip_step(step: ResolutionStep, err: Error) -> Result<()> {
    if err.requires_login() {
        return Err(err);
    }
    debug!(%step, error = %err, "Resolution step failed");
    Ok(())
}

fn relationship_id<'a>(data: &'a Value, name: &str) -> Option<&'a str> {
    data.get("relationships")?
        .get(name)?
        .get("data")?
        .get("id")?
        .as_str()
        .filter(|id| !id.is_empty())
}

impl Session {
    /// Resolve the cost container for a project.
    ///
    /// Successful resolutions are cached per project for the life of the
    /// session; a fallback is not, so a later call tries again.
    #[instrument(skip(self), fields(project = %project_id))]
    pub async fn resolve_cost_container(&self, project_id: &ProjectId) -> Result<ContainerResolution> {
        if let Some(cached) = self.cached_container(project_id.as_str()) {
            debug!(container = %cached.container_id, "Using cached container");
            return Ok(cached);
        }

        let resolution = self.run_resolution(project_id).await?;
        if resolution.step == ResolutionStep::Fallback {
            warn!("No cost container found, using project id");
        } else {
            info!(container = %resolution.container_id, step = %resolution.step, "Cost container resolved");
            self.cache_container(project_id.as_str(), resolution.clone());
        }
        Ok(resolution)
    }

    async fn run_resolution(&self, project_id: &ProjectId) -> Result<ContainerResolution> {
        let clean = project_id.without_b_prefix();

        let mut candidates = vec![(project_id.as_str().to_string(), ResolutionStep::Direct)];
        if project_id.has_b_prefix() {
            candidates.push((clean.to_string(), ResolutionStep::Stripped));
        } else {
            candidates.push((project_id.with_b_prefix(), ResolutionStep::Prefixed));
        }

        for (candidate, step) in candidates {
            match self.get(&endpoints::cost_container(&candidate)).await {
                Ok(_) => return found(&candidate, step),
                Err(err) => skip_step(step, err)?,
            }
        }

        match self.get(&endpoints::project_cost_containers(clean)).await {
            Ok(body) => {
                let first = body
                    .get("data")
                    .and_then(Value::as_array)
                    .and_then(|list| list.first())
                    .and_then(|c| c.get("id"))
                    .and_then(Value::as_str);
                if let Some(id) = first {
                    return found(id, ResolutionStep::ProjectContainers);
                }
            }
            Err(err) => skip_step(ResolutionStep::ProjectContainers, err)?,
        }

        if let Some(id) = self.cost_relationship(clean).await? {
            return found(&id, ResolutionStep::HubRelationship);
        }

        found(project_id.as_str(), ResolutionStep::Fallback)
    }

    async fn cost_relationship(&self, clean: &str) -> Result<Option<String>> {
        let step = ResolutionStep::HubRelationship;

        let hub_id = match self.get(&endpoints::project(clean)).await {
            Ok(body) => body
                .get("data")
                .and_then(|d| relationship_id(d, "hub"))
                .map(str::to_string),
            Err(err) => {
                skip_step(step, err)?;
                None
            }
        };
        let Some(hub_id) = hub_id else {
            return Ok(None);
        };

        match self.get(&endpoints::hub_project(&hub_id, clean)).await {
            Ok(body) => Ok(body
                .get("data")
                .and_then(|d| relationship_id(d, "cost"))
                .map(str::to_string)),
            Err(err) => {
                skip_step(step, err)?;
                Ok(None)
            }
        }
    }
}

fn found(id: &str, step: ResolutionStep) -> Result<ContainerResolution> {
    Ok(ContainerResolution {
        container_id: CostContainerId::new(id)?,
        step,
    })
}
