//! Per-invocation context: client configuration and local stores.

pub mod storage;

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context as _, Result};

use acc_client::{OAuthClient, Session};
use acc_core::{ApiUrl, ClientConfig, CredentialSink, Credentials};
use acc_store::{CredentialStore, PhaseStore};

use crate::cli::ClientArgs;

/// Everything a command needs to reach ACC and the local stores.
#[derive(Debug)]
pub struct Context {
    client: ClientArgs,
    data_dir: PathBuf,
    credentials: CredentialStore,
}

impl Context {
    pub fn new(client: ClientArgs, data_dir: Option<PathBuf>) -> Result<Self> {
        let data_dir = storage::data_dir(data_dir.as_deref())?;
        Ok(Self {
            credentials: CredentialStore::new(&data_dir),
            client,
            data_dir,
        })
    }

    /// Client configuration from flags and environment. The client id may
    /// also come from the stored credentials.
    pub fn client_config(&self) -> Result<ClientConfig> {
        let stored_client_id = self
            .credentials
            .load()
            .ok()
            .flatten()
            .and_then(|c| c.client_id);
        let client_id = self
            .client
            .client_id
            .clone()
            .or(stored_client_id)
            .context("No client id. Pass --client-id or set ACC_CLIENT_ID.")?;

        let mut builder = ClientConfig::builder(client_id);
        if let Some(secret) = &self.client.client_secret {
            builder = builder.client_secret(secret);
        }
        if let Some(uri) = &self.client.redirect_uri {
            builder = builder.redirect_uri(uri);
        }
        if let Some(base) = &self.client.api_base {
            builder = builder.api_base(ApiUrl::new(base).context("Invalid API base URL")?);
        }

        builder.build().context("Invalid client configuration")
    }

    pub fn oauth(&self) -> Result<OAuthClient> {
        OAuthClient::new(self.client_config()?).context("Failed to create OAuth client")
    }

    pub fn credential_store(&self) -> &CredentialStore {
        &self.credentials
    }

    pub fn stored_credentials(&self) -> Result<Option<Credentials>> {
        self.credentials
            .load()
            .context("Failed to read stored credentials")
    }

    /// Restore the signed-in session. Token changes are written back to
    /// the credential store.
    pub fn session(&self) -> Result<Session> {
        let credentials = self
            .stored_credentials()?
            .filter(Credentials::has_user_token)
            .context("No active session. Run 'acc auth login-url' and 'acc auth exchange' first.")?;

        let session = Session::initialize_with_sink(
            self.client_config()?,
            &credentials,
            Arc::new(self.credentials.clone()),
        )
        .context("Failed to restore session")?;

        if let Some(region) = self.client.region {
            session.set_region(region);
        }
        Ok(session)
    }

    pub fn sink(&self) -> Arc<dyn CredentialSink> {
        Arc::new(self.credentials.clone())
    }

    pub async fn clear_credentials(&self) -> Result<()> {
        self.credentials
            .clear()
            .await
            .context("Failed to remove stored credentials")
    }

    pub fn phases(&self) -> Result<PhaseStore> {
        PhaseStore::open(&self.data_dir).context("Failed to open phase store")
    }
}

/// Returns true if the error means the user must sign in again.
pub fn requires_login(err: &anyhow::Error) -> bool {
    err.chain()
        .filter_map(|cause| cause.downcast_ref::<acc_core::Error>())
        .any(acc_core::Error::requires_login)
}
