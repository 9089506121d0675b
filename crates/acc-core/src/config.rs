//! Client configuration.

use std::fmt;

use crate::error::{Error, InvalidInputError};
use crate::types::ApiUrl;

/// Redirect URI registered for local sign-in.
pub const DEFAULT_REDIRECT_URI: &str = "http://localhost:3000";

/// Scopes requested for the user-delegated token.
pub const DEFAULT_SCOPES: &str = "data:read data:write";

/// Scopes requested for the application-scoped token.
pub const DEFAULT_APP_SCOPES: &str = "data:read data:write account:read account:write";

/// Hubs whose hub-details endpoint misreports their region. They are routed
/// to APAC without a lookup.
pub const DEFAULT_KNOWN_APAC_HUBS: &[&str] = &["b.ddc5f6e2-9ddc-475e-82ed-b05da4ac18c2"];

/// Everything the client needs to know about the registered application
/// and the gateway it talks to.
///
/// # Example
///
/// ```
/// use acc_core::ClientConfig;
///
/// let config = ClientConfig::builder("my-client-id")
///     .client_secret("my-secret")
///     .build()
///     .unwrap();
/// assert_eq!(config.redirect_uri, "http://localhost:3000");
/// assert!(config.is_known_apac_hub("B.DDC5F6E2-9DDC-475E-82ED-B05DA4AC18C2"));
/// ```
#[derive(Clone)]
pub struct ClientConfig {
    pub client_id: String,
    pub client_secret: Option<String>,
    pub redirect_uri: String,
    pub scopes: String,
    pub app_scopes: String,
    pub api_base: ApiUrl,
    pub known_apac_hubs: Vec<String>,
}

impl ClientConfig {
    /// Start building a configuration for the given application client id.
    pub fn builder(client_id: impl Into<String>) -> ClientConfigBuilder {
        ClientConfigBuilder {
            client_id: client_id.into(),
            client_secret: None,
            redirect_uri: None,
            scopes: None,
            app_scopes: None,
            api_base: None,
            known_apac_hubs: None,
        }
    }

    /// Returns true if the hub is on the known-APAC list (case-insensitive).
    pub fn is_known_apac_hub(&self, hub_id: &str) -> bool {
        self.known_apac_hubs
            .iter()
            .any(|known| known.eq_ignore_ascii_case(hub_id))
    }

    /// The client secret, or an error naming the missing field.
    pub fn require_secret(&self) -> Result<&str, Error> {
        self.client_secret
            .as_deref()
            .filter(|s| !s.is_empty())
            .ok_or_else(|| {
                InvalidInputError::MissingField {
                    field: "client_secret",
                }
                .into()
            })
    }
}

impl fmt::Debug for ClientConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ClientConfig")
            .field("client_id", &self.client_id)
            .field("client_secret", &self.client_secret.as_ref().map(|_| "[REDACTED]"))
            .field("redirect_uri", &self.redirect_uri)
            .field("scopes", &self.scopes)
            .field("app_scopes", &self.app_scopes)
            .field("api_base", &self.api_base)
            .field("known_apac_hubs", &self.known_apac_hubs)
            .finish()
    }
}

/// Builder for [`ClientConfig`].
#[derive(Debug)]
pub struct ClientConfigBuilder {
    client_id: String,
    client_secret: Option<String>,
    redirect_uri: Option<String>,
    scopes: Option<String>,
    app_scopes: Option<String>,
    api_base: Option<ApiUrl>,
    known_apac_hubs: Option<Vec<String>>,
}

impl ClientConfigBuilder {
    pub fn client_secret(mut self, secret: impl Into<String>) -> Self {
        self.client_secret = Some(secret.into());
        self
    }

    pub fn redirect_uri(mut self, uri: impl Into<String>) -> Self {
        self.redirect_uri = Some(uri.into());
        self
    }

    pub fn scopes(mut self, scopes: impl Into<String>) -> Self {
        self.scopes = Some(scopes.into());
        self
    }

    pub fn app_scopes(mut self, scopes: impl Into<String>) -> Self {
        self.app_scopes = Some(scopes.into());
        self
    }

    pub fn api_base(mut self, api_base: ApiUrl) -> Self {
        self.api_base = Some(api_base);
        self
    }

    /// Replace the known-APAC hub list.
    pub fn known_apac_hubs<I, S>(mut self, hubs: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.known_apac_hubs = Some(hubs.into_iter().map(Into::into).collect());
        self
    }

    pub fn build(self) -> Result<ClientConfig, Error> {
        if self.client_id.trim().is_empty() {
            return Err(InvalidInputError::MissingField { field: "client_id" }.into());
        }

        Ok(ClientConfig {
            client_id: self.client_id,
            client_secret: self.client_secret.filter(|s| !s.is_empty()),
            redirect_uri: self
                .redirect_uri
                .unwrap_or_else(|| DEFAULT_REDIRECT_URI.to_string()),
            scopes: self.scopes.unwrap_or_else(|| DEFAULT_SCOPES.to_string()),
            app_scopes: self
                .app_scopes
                .unwrap_or_else(|| DEFAULT_APP_SCOPES.to_string()),
            api_base: self.api_base.unwrap_or_default(),
            known_apac_hubs: self.known_apac_hubs.unwrap_or_else(|| {
                DEFAULT_KNOWN_APAC_HUBS
                    .iter()
                    .map(|h| h.to_string())
                    .collect()
            }),
        })
    }
}
