//! Document search across a project's folder tree.

use std::collections::VecDeque;

use tracing::{debug, instrument, warn};

use acc_core::error::InvalidInputError;
use acc_core::models::{DocumentHit, FolderEntry};
use acc_core::{HubId, ProjectId, Result};

use crate::session::Session;

/// A folder whose entries are still being walked.
struct Frame {
    path: Vec<String>,
    pending: VecDeque<FolderEntry>,
}

impl Session {
    /// Find documents whose name or display name contains `term`
    /// (case-insensitive), walking every top folder depth-first.
    ///
    /// Hits are returned in listing order. A folder that cannot be listed
    /// is skipped; authentication failures end the search.
    #[instrument(skip(self), fields(hub = %hub_id, project = %project_id))]
    pub async fn search_documents(
        &self,
        hub_id: &HubId,
        project_id: &ProjectId,
        term: &str,
    ) -> Result<Vec<DocumentHit>> {
        let term = term.trim();
        if term.is_empty() {
            return Err(InvalidInputError::MissingField { field: "term" }.into());
        }

        let mut hits = Vec::new();
        for top in self.get_top_folders(hub_id, project_id).await? {
            let Some(contents) = self.folder_or_skip(project_id, &top).await? else {
                continue;
            };
            let mut stack = vec![Frame {
                path: vec![top.display_name().to_string()],
                pending: contents.into(),
            }];

            while let Some(frame) = stack.last_mut() {
                let Some(entry) = frame.pending.pop_front() else {
                    stack.pop();
                    continue;
                };

                if entry.is_folder() {
                    let mut path = frame.path.clone();
                    if let Some(contents) = self.folder_or_skip(project_id, &entry).await? {
                        path.push(entry.display_name().to_string());
                        stack.push(Frame {
                            path,
                            pending: contents.into(),
                        });
                    }
                } else if entry.matches(term) {
                    hits.push(DocumentHit {
                        entry,
                        folder_path: frame.path.clone(),
                    });
                }
            }
        }

        debug!(count = hits.len(), "Search finished");
        Ok(hits)
    }

    async fn folder_or_skip(
        &self,
        project_id: &ProjectId,
        folder: &FolderEntry,
    ) -> Result<Option<Vec<FolderEntry>>> {
        match self.get_folder_contents(project_id, &folder.id).await {
            Ok(contents) => Ok(Some(contents)),
            Err(err) if err.requires_login() => Err(err),
            Err(err) => {
                warn!(folder = %folder.id, error = %err, "Skipping folder");
                Ok(None)
            }
        }
    }
}
