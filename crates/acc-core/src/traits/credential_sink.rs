//! Credential persistence trait.

use async_trait::async_trait;

use crate::{Credentials, Result};

/// Somewhere a session writes its token material back to.
///
/// The session calls [`save`](CredentialSink::save) after every successful
/// refresh and [`clear`](CredentialSink::clear) when a refresh is rejected
/// or the user signs out.
#[async_trait]
pub trait CredentialSink: Send + Sync {
    /// Persist the given credentials, replacing whatever was stored.
    async fn save(&self, credentials: &Credentials) -> Result<()>;

    /// Remove all stored credentials.
    async fn clear(&self) -> Result<()>;
}
