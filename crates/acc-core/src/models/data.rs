//! Data management (Docs) payloads.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value, json};

use super::hub::Extension;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EntryAttributes {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub display_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub create_time: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_modified_time: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub extension: Option<Extension>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// A folder or item listed in a folder.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FolderEntry {
    pub id: String,
    /// `folders` or `items`.
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,
    #[serde(default)]
    pub attributes: EntryAttributes,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl FolderEntry {
    pub fn is_folder(&self) -> bool {
        self.kind.as_deref() == Some("folders")
    }

    /// `displayName`, else `name`, else the id.
    pub fn display_name(&self) -> &str {
        self.attributes
            .display_name
            .as_deref()
            .or(self.attributes.name.as_deref())
            .unwrap_or(&self.id)
    }

    /// Case-insensitive substring match on name or display name.
    pub fn matches(&self, term: &str) -> bool {
        let term = term.to_lowercase();
        [&self.attributes.name, &self.attributes.display_name]
            .into_iter()
            .flatten()
            .any(|n| n.to_lowercase().contains(&term))
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VersionAttributes {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub display_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version_number: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub create_time: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub file_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub storage_size: Option<u64>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DocumentVersion {
    pub id: String,
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,
    #[serde(default)]
    pub attributes: VersionAttributes,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// A document search result and the folder path it was found under.
#[derive(Debug, Clone, Serialize)]
pub struct DocumentHit {
    pub entry: FolderEntry,
    pub folder_path: Vec<String>,
}

impl DocumentHit {
    pub fn path_string(&self) -> String {
        let mut parts = self.folder_path.clone();
        parts.push(self.entry.display_name().to_string());
        parts.join("/")
    }
}

/// A file attached to a cost record.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Attachment {
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub association_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub association_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub urn: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Options for a PDF export job.
#[derive(Debug, Clone)]
pub struct ExportRequest {
    pub file_versions: Vec<String>,
    pub output_file_name: String,
    pub include_published_markups: bool,
    pub include_unpublished_markups: bool,
    pub include_markup_links: bool,
    pub include_issue_markups: bool,
    pub include_photo_markups: bool,
}

impl ExportRequest {
    pub fn new(file_versions: Vec<String>) -> Self {
        Self {
            file_versions,
            output_file_name: "exported_files".to_string(),
            include_published_markups: true,
            include_unpublished_markups: false,
            include_markup_links: false,
            include_issue_markups: false,
            include_photo_markups: false,
        }
    }

    /// The request body for `POST .../exports`.
    pub fn to_body(&self) -> Value {
        json!({
            "fileVersions": self.file_versions,
            "options": {
                "outputFileName": self.output_file_name,
                "standardMarkups": {
                    "includePublishedMarkups": self.include_published_markups,
                    "includeUnpublishedMarkups": self.include_unpublished_markups,
                    "includeMarkupLinks": self.include_markup_links,
                },
                "issueMarkups": {
                    "includePublishedMarkups": self.include_issue_markups,
                    "includeUnpublishedMarkups": false,
                },
                "photoMarkups": {
                    "includePublishedMarkups": self.include_photo_markups,
                    "includeUnpublishedMarkups": false,
                },
            }
        })
    }
}

/// A PDF export job.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExportJob {
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub result: Option<Value>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}
