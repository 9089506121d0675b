//! OAuth 2.0 grants against the Autodesk identity endpoint.

use std::fmt;
use std::sync::Arc;

use serde::Deserialize;
use tracing::{debug, info, instrument, warn};
use url::Url;

use acc_core::error::{AuthError, InvalidInputError, TransportError};
use acc_core::{AccessToken, ClientConfig, RefreshToken, Result};

use crate::endpoints;
use crate::http::HttpClient;

/// Token endpoint response.
#[derive(Clone, Deserialize)]
pub struct TokenResponse {
    pub access_token: String,
    #[serde(default)]
    pub refresh_token: Option<String>,
    #[serde(default)]
    pub expires_in: Option<u64>,
    #[serde(default)]
    pub token_type: Option<String>,
}

impl TokenResponse {
    pub fn access(&self) -> AccessToken {
        AccessToken::new(self.access_token.clone())
    }

    pub fn refresh(&self) -> Option<RefreshToken> {
        self.refresh_token
            .as_deref()
            .filter(|t| !t.is_empty())
            .map(RefreshToken::new)
    }
}

impl fmt::Debug for TokenResponse {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TokenResponse")
            .field("access_token", &"[REDACTED]")
            .field("refresh_token", &self.refresh_token.as_ref().map(|_| "[REDACTED]"))
            .field("expires_in", &self.expires_in)
            .field("token_type", &self.token_type)
            .finish()
    }
}

/// Client for the three OAuth grants the toolkit uses.
#[derive(Debug, Clone)]
pub struct OAuthClient {
    http: HttpClient,
    config: Arc<ClientConfig>,
}

impl OAuthClient {
    pub fn new(config: ClientConfig) -> Result<Self> {
        Self::with_shared(Arc::new(config))
    }

    pub(crate) fn with_shared(config: Arc<ClientConfig>) -> Result<Self> {
        let http = HttpClient::new(config.api_base.clone())?;
        Ok(Self { http, config })
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// The URL the user opens to grant access.
    pub fn authorize_url(&self) -> Result<String> {
        let base = self.http.api().endpoint(endpoints::AUTHORIZE);
        let url = Url::parse_with_params(
            &base,
            &[
                ("response_type", "code"),
                ("client_id", self.config.client_id.as_str()),
                ("redirect_uri", self.config.redirect_uri.as_str()),
                ("scope", self.config.scopes.as_str()),
            ],
        )
        .map_err(|e| InvalidInputError::ApiUrl {
            value: base.clone(),
            reason: e.to_string(),
        })?;
        Ok(url.into())
    }

    /// Exchange an authorization code for user tokens.
    #[instrument(skip(self, code))]
    pub async fn exchange_code_for_token(&self, code: &str) -> Result<TokenResponse> {
        if code.trim().is_empty() {
            return Err(InvalidInputError::MissingField { field: "code" }.into());
        }
        let secret = self.config.require_secret()?;

        debug!("Exchanging authorization code");
        let (status, body) = self
            .http
            .post_form(
                endpoints::TOKEN,
                &[
                    ("grant_type", "authorization_code"),
                    ("client_id", self.config.client_id.as_str()),
                    ("client_secret", secret),
                    ("code", code.trim()),
                    ("redirect_uri", self.config.redirect_uri.as_str()),
                ],
                None,
            )
            .await?;

        if !is_success(status) {
            warn!(status, "Authorization code rejected");
            return Err(AuthError::GrantRejected { status, body }.into());
        }

        let tokens = parse_token(&body)?;
        info!("Authorization code exchanged");
        Ok(tokens)
    }

    /// Redeem a refresh token.
    ///
    /// A non-2xx answer is reported as [`AuthError::RefreshFailed`]; the
    /// caller decides what to clear.
    #[instrument(skip(self, refresh_token))]
    pub async fn refresh(&self, refresh_token: &RefreshToken) -> Result<TokenResponse> {
        let secret = self.config.require_secret()?;

        debug!("Refreshing access token");
        let (status, body) = self
            .http
            .post_form(
                endpoints::TOKEN,
                &[
                    ("grant_type", "refresh_token"),
                    ("client_id", self.config.client_id.as_str()),
                    ("client_secret", secret),
                    ("refresh_token", refresh_token.as_str()),
                ],
                None,
            )
            .await?;

        if !is_success(status) {
            warn!(status, "Refresh token rejected");
            return Err(AuthError::RefreshFailed { status, body }.into());
        }

        parse_token(&body)
    }

    /// Obtain an application-scoped token with the client-credentials grant.
    #[instrument(skip(self))]
    pub async fn client_credentials(&self) -> Result<TokenResponse> {
        let secret = self.config.require_secret()?;

        let (status, body) = self
            .http
            .post_form(
                endpoints::TOKEN,
                &[
                    ("grant_type", "client_credentials"),
                    ("scope", self.config.app_scopes.as_str()),
                ],
                Some((self.config.client_id.as_str(), secret)),
            )
            .await?;

        if !is_success(status) {
            warn!(status, "Client credentials rejected");
            return Err(AuthError::GrantRejected { status, body }.into());
        }

        parse_token(&body)
    }
}

fn is_success(status: u16) -> bool {
    (200..300).contains(&status)
}

fn parse_token(body: &str) -> Result<TokenResponse> {
    serde_json::from_str(body).map_err(|e| {
        TransportError::Decode {
            message: format!("token response: {}", e),
        }
        .into()
    })
}
