//! Data management: folders, documents, versions and PDF exports.
//!
//! Data endpoints take the project id without its `b.` prefix.

use reqwest::Method;
use serde_json::{Value, json};
use tracing::{debug, info, instrument};

use acc_core::error::InvalidInputError;
use acc_core::models::{DocumentVersion, ExportJob, ExportRequest, FolderEntry, Project};
use acc_core::{HubId, ListOptions, ProjectId, Result};

use crate::endpoints;
use crate::resource::{CollectionResource, decode, unwrap_list, unwrap_single};
use crate::session::Session;

/// Names that mark a project's root folder among its top folders.
const ROOT_FOLDER_NAMES: &[&str] = &["Project Files", "Root"];

fn is_root_folder(folder: &FolderEntry) -> bool {
    ROOT_FOLDER_NAMES.iter().any(|name| {
        folder.attributes.name.as_deref() == Some(*name)
            || folder.attributes.display_name.as_deref() == Some(*name)
    })
}

impl Session {
    /// Top-level folders of a project.
    #[instrument(skip(self), fields(hub = %hub_id, project = %project_id))]
    pub async fn get_top_folders(&self, hub_id: &HubId, project_id: &ProjectId) -> Result<Vec<FolderEntry>> {
        let path = endpoints::top_folders(hub_id.as_str(), project_id.without_b_prefix());
        let folders: Vec<FolderEntry> = unwrap_list(self.get(&path).await?)
            .into_iter()
            .map(decode)
            .collect::<Result<_>>()?;
        debug!(count = folders.len(), "Top folders listed");
        Ok(folders)
    }

    /// Folders and items directly inside a folder.
    pub async fn get_folder_contents(
        &self,
        project_id: &ProjectId,
        folder_id: &str,
    ) -> Result<Vec<FolderEntry>> {
        let path = endpoints::folder_contents(project_id.without_b_prefix(), folder_id);
        unwrap_list(self.get(&path).await?)
            .into_iter()
            .map(decode)
            .collect()
    }

    pub async fn get_document_versions(
        &self,
        project_id: &ProjectId,
        item_id: &str,
    ) -> Result<Vec<DocumentVersion>> {
        let path = endpoints::item_versions(project_id.without_b_prefix(), item_id);
        unwrap_list(self.get(&path).await?)
            .into_iter()
            .map(decode)
            .collect()
    }

    /// A signed download URL for a version, if the service offers one.
    pub async fn get_document_download_url(
        &self,
        project_id: &ProjectId,
        version_id: &str,
    ) -> Result<Option<String>> {
        let path = endpoints::version_downloads(project_id.without_b_prefix(), version_id);
        let body = self.get(&path).await?;
        Ok(body
            .get("data")
            .and_then(Value::as_array)
            .and_then(|downloads| downloads.first())
            .and_then(|d| d.get("url"))
            .and_then(Value::as_str)
            .map(str::to_string))
    }

    /// Create a folder under the project's root folder.
    ///
    /// The hub is looked up from the project; the root is the top folder
    /// named "Project Files" or "Root", else the first top folder.
    #[instrument(skip(self, description), fields(project = %project_id))]
    pub async fn create_folder(
        &self,
        project_id: &ProjectId,
        name: &str,
        description: &str,
    ) -> Result<FolderEntry> {
        if name.trim().is_empty() {
            return Err(InvalidInputError::MissingField { field: "name" }.into());
        }

        let clean = project_id.without_b_prefix();
        let project: Project = decode(unwrap_single(self.get(&endpoints::project(clean)).await?))?;
        let hub_id = project.hub_id().ok_or_else(|| InvalidInputError::Other {
            message: format!("project {} has no hub relationship", project_id),
        })?;
        let hub_id = HubId::new(hub_id)?;

        let folders = self.get_top_folders(&hub_id, project_id).await?;
        let root = folders
            .iter()
            .find(|f| is_root_folder(f))
            .or_else(|| folders.first())
            .ok_or_else(|| InvalidInputError::Other {
                message: format!("project {} has no folders", project_id),
            })?;
        debug!(root = %root.id, "Root folder found");

        let body = json!({
            "jsonapi": { "version": "1.0" },
            "data": {
                "type": "folders",
                "attributes": {
                    "name": name,
                    "displayName": name,
                    "description": description,
                },
                "relationships": {
                    "parent": { "data": { "type": "folders", "id": root.id } }
                }
            }
        });

        let created: FolderEntry = decode(unwrap_single(
            self.request(Method::POST, &endpoints::folders(clean), Some(&body))
                .await?,
        ))?;
        info!(folder = %created.id, "Folder created");
        Ok(created)
    }

    /// Start a PDF export of the given file versions.
    #[instrument(skip(self, request), fields(project = %project_id, files = request.file_versions.len()))]
    pub async fn export_pdf_files(&self, project_id: &ProjectId, request: &ExportRequest) -> Result<ExportJob> {
        if request.file_versions.is_empty() {
            return Err(InvalidInputError::MissingField {
                field: "fileVersions",
            }
            .into());
        }

        let path = endpoints::exports(project_id.without_b_prefix());
        let job: ExportJob =
            decode(unwrap_single(self.request(Method::POST, &path, Some(&request.to_body())).await?))?;
        info!(job = %job.id, "Export started");
        Ok(job)
    }

    pub async fn get_export_status(&self, project_id: &ProjectId, export_id: &str) -> Result<ExportJob> {
        CollectionResource::<ExportJob>::new(self, endpoints::exports(project_id.without_b_prefix()))
            .get(export_id, &ListOptions::default())
            .await
    }
}
