//! File-backed credential storage.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tracing::{debug, instrument};

use acc_core::{CredentialSink, Credentials, Result};

use crate::fs::{corrupt, read_optional, remove_optional, write_atomic};

/// Stores the credential blob as `credentials.json`, readable by the owner
/// only.
#[derive(Debug, Clone)]
pub struct CredentialStore {
    path: PathBuf,
}

impl CredentialStore {
    pub const FILE_NAME: &'static str = "credentials.json";

    /// A store inside the given data directory.
    pub fn new(data_dir: impl AsRef<Path>) -> Self {
        Self {
            path: data_dir.as_ref().join(Self::FILE_NAME),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Load stored credentials, or `None` if nothing is stored.
    #[instrument(skip(self), fields(path = %self.path.display()))]
    pub fn load(&self) -> Result<Option<Credentials>> {
        let Some(json) = read_optional(&self.path)? else {
            debug!("No stored credentials");
            return Ok(None);
        };

        let credentials = serde_json::from_str(&json).map_err(|e| corrupt(&self.path, e))?;
        Ok(Some(credentials))
    }
}

#[async_trait]
impl CredentialSink for CredentialStore {
    #[instrument(skip(self, credentials), fields(path = %self.path.display()))]
    async fn save(&self, credentials: &Credentials) -> Result<()> {
        let json = serde_json::to_string_pretty(credentials).map_err(|e| corrupt(&self.path, e))?;
        write_atomic(&self.path, &json, true)?;
        debug!("Credentials saved");
        Ok(())
    }

    #[instrument(skip(self), fields(path = %self.path.display()))]
    async fn clear(&self) -> Result<()> {
        remove_optional(&self.path)?;
        debug!("Credentials cleared");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[tokio::test]
    async fn round_trips_credentials() {
        let dir = TempDir::new().unwrap();
        let store = CredentialStore::new(dir.path());
        assert!(store.load().unwrap().is_none());

        let creds = Credentials::default()
            .with_account_id("acct")
            .with_three_leg_token("access")
            .with_refresh_token("refresh");
        store.save(&creds).await.unwrap();

        assert_eq!(store.load().unwrap(), Some(creds));
    }

    #[tokio::test]
    async fn clear_removes_file_and_is_idempotent() {
        let dir = TempDir::new().unwrap();
        let store = CredentialStore::new(dir.path());
        store
            .save(&Credentials::default().with_three_leg_token("a"))
            .await
            .unwrap();

        store.clear().await.unwrap();
        assert!(!store.path().exists());
        store.clear().await.unwrap();
    }

    #[test]
    fn corrupt_file_is_reported() {
        let dir = TempDir::new().unwrap();
        let store = CredentialStore::new(dir.path());
        std::fs::write(store.path(), "not json").unwrap();
        let err = store.load().unwrap_err();
        assert!(err.to_string().contains("corrupt"));
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn file_is_private() {
        use std::os::unix::fs::PermissionsExt;

        let dir = TempDir::new().unwrap();
        let store = CredentialStore::new(dir.path());
        store.save(&Credentials::default()).await.unwrap();

        let mode = std::fs::metadata(store.path()).unwrap().permissions().mode();
        assert_eq!(mode & 0o777, 0o600);
    }
}
