//! Issue payloads.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::{Error, InvalidInputError};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Issue {
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub issue_subtype_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub published: Option<bool>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IssueSubtype {
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub code: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// An issue type (category) with its subtypes.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IssueType {
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_active: Option<bool>,
    #[serde(default)]
    pub subtypes: Vec<IssueSubtype>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Body of a new issue.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NewIssue {
    pub title: String,
    pub description: String,
    pub issue_subtype_id: String,
    pub status: String,
    pub published: bool,
}

impl NewIssue {
    /// An open, unpublished issue of the given subtype.
    pub fn new(title: impl Into<String>, issue_subtype_id: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            description: String::new(),
            issue_subtype_id: issue_subtype_id.into(),
            status: "open".to_string(),
            published: false,
        }
    }

    pub fn validate(&self) -> Result<(), Error> {
        if self.title.trim().is_empty() {
            return Err(InvalidInputError::MissingField { field: "title" }.into());
        }
        if self.issue_subtype_id.trim().is_empty() {
            return Err(InvalidInputError::MissingField {
                field: "issueSubtypeId",
            }
            .into());
        }
        Ok(())
    }
}

/// Partial issue update.
#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct IssuePatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub published: Option<bool>,
}
