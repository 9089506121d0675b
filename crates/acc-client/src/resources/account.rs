//! Account administration.

use reqwest::Method;
use serde_json::Value;
use tracing::{info, instrument};

use acc_core::error::InvalidInputError;
use acc_core::types::B_PREFIX;
use acc_core::{AccessToken, ProjectId, Result};

use crate::endpoints;
use crate::http::Upload;
use crate::session::Session;

/// Form field the image endpoint expects the file under.
const IMAGE_FIELD: &str = "chunk";

impl Session {
    /// Replace a project's thumbnail image.
    ///
    /// The account defaults to the session's account. Unless `token` is
    /// given, an application-scoped token is obtained first. The upload
    /// is not retried on 401.
    #[instrument(skip(self, file_name, mime, bytes, token), fields(project = %project_id, len = bytes.len()))]
    pub async fn update_project_image(
        &self,
        project_id: &ProjectId,
        account_id: Option<&str>,
        file_name: &str,
        mime: &str,
        bytes: Vec<u8>,
        token: Option<&AccessToken>,
    ) -> Result<Value> {
        let account = match account_id {
            Some(account) => account.to_string(),
            None => self
                .account_id()
                .ok_or(InvalidInputError::MissingField { field: "account_id" })?,
        };
        let account = account.strip_prefix(B_PREFIX).unwrap_or(&account);
        if account.is_empty() {
            return Err(InvalidInputError::MissingField { field: "account_id" }.into());
        }

        let token = match token {
            Some(token) => token.clone(),
            None => self.two_legged_token().await?,
        };

        let upload = Upload::new(IMAGE_FIELD, file_name, bytes).mime(mime);
        let path = endpoints::project_image(account, project_id.without_b_prefix());
        let result = self
            .upload_with_token(Method::PATCH, &path, &upload, &token)
            .await?;
        info!("Project image updated");
        Ok(result)
    }
}
