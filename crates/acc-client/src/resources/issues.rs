//! Issues.

use tracing::{info, instrument};

use acc_core::models::{Issue, IssuePatch, IssueType, NewIssue};
use acc_core::{ListOptions, ProjectId, Result};

use crate::endpoints;
use crate::resource::CollectionResource;
use crate::session::Session;

impl Session {
    /// Issues are addressed by the project id without its `b.` prefix.
    pub fn issues(&self, project_id: &ProjectId) -> CollectionResource<'_, Issue> {
        CollectionResource::new(self, endpoints::issues(project_id.without_b_prefix()))
    }

    pub async fn get_issues(&self, project_id: &ProjectId, options: &ListOptions) -> Result<Vec<Issue>> {
        self.issues(project_id).list(options).await
    }

    pub async fn get_issue(&self, project_id: &ProjectId, issue_id: &str) -> Result<Issue> {
        self.issues(project_id)
            .get(issue_id, &ListOptions::default())
            .await
    }

    #[instrument(skip(self, issue), fields(project = %project_id))]
    pub async fn create_issue(&self, project_id: &ProjectId, issue: &NewIssue) -> Result<Issue> {
        issue.validate()?;
        let created = self.issues(project_id).create(issue).await?;
        info!(issue = %created.id, "Issue created");
        Ok(created)
    }

    pub async fn update_issue(
        &self,
        project_id: &ProjectId,
        issue_id: &str,
        patch: &IssuePatch,
    ) -> Result<Issue> {
        self.issues(project_id).update(issue_id, patch).await
    }

    /// Issue types, with their subtypes when `include=subtypes` is passed.
    pub async fn get_issue_types(
        &self,
        project_id: &ProjectId,
        options: &ListOptions,
    ) -> Result<Vec<IssueType>> {
        CollectionResource::<IssueType>::new(self, endpoints::issue_types(project_id.without_b_prefix()))
            .list(options)
            .await
    }
}
