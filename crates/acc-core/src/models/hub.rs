//! Hub and project payloads.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::types::Region;

/// The `extension` block carried by most data-management resources.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Extension {
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct HubAttributes {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub region: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub extension: Option<Extension>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// A hub (BIM 360 / ACC account).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Hub {
    pub id: String,
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,
    #[serde(default)]
    pub attributes: HubAttributes,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Hub {
    /// Display name, falling back to a top-level `name` and then a placeholder.
    pub fn name(&self) -> &str {
        self.attributes
            .name
            .as_deref()
            .or_else(|| self.extra.get("name").and_then(Value::as_str))
            .unwrap_or("Unnamed Hub")
    }

    /// Extension type, e.g. `hubs:autodesk.bim360:Account`.
    pub fn hub_type(&self) -> &str {
        self.attributes
            .extension
            .as_ref()
            .and_then(|e| e.kind.as_deref())
            .or(self.kind.as_deref())
            .unwrap_or("hubs:autodesk.bim360:Hub")
    }

    /// The region the hub reports for itself, if it parses.
    pub fn region(&self) -> Option<Region> {
        self.attributes.region.as_deref()?.parse().ok()
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ProjectAttributes {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub extension: Option<Extension>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// A project inside a hub.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Project {
    pub id: String,
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,
    #[serde(default)]
    pub attributes: ProjectAttributes,
    #[serde(default, skip_serializing_if = "Map::is_empty")]
    pub relationships: Map<String, Value>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Project {
    pub fn name(&self) -> &str {
        self.attributes
            .name
            .as_deref()
            .or_else(|| self.extra.get("name").and_then(Value::as_str))
            .unwrap_or("Unnamed Project")
    }

    /// The id at `relationships.<name>.data.id`.
    pub fn relationship_id(&self, name: &str) -> Option<&str> {
        self.relationships
            .get(name)?
            .get("data")?
            .get("id")?
            .as_str()
    }

    /// The owning hub, from `relationships.hub`.
    pub fn hub_id(&self) -> Option<&str> {
        self.relationship_id("hub")
    }
}
