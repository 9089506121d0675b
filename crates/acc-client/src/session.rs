//! Authenticated ACC session.
//!
//! A [`Session`] owns the user's token material, the active region, and
//! the dispatcher every resource operation goes through. It is cheap to
//! clone; clones share state.
//!
//! # Token refresh
//!
//! A request answered with 401 triggers exactly one refresh followed by one
//! retry. Refreshes are serialized: a request whose token was already
//! replaced by a concurrent refresh retries with the new token instead of
//! refreshing again.

use std::collections::HashMap;
use std::fmt;
use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use chrono::{DateTime, Utc};
use reqwest::Method;
use serde_json::Value;
use tokio::sync::Mutex;
use tracing::{debug, info, instrument, warn};

use acc_core::error::{AuthError, TransportError};
use acc_core::{
    AccessToken, ClientConfig, CredentialSink, Credentials, Error, RefreshToken, Region, Result,
};

use crate::cost_container::ContainerResolution;
use crate::http::{HttpClient, Payload, Upload};
use crate::oauth::{OAuthClient, TokenResponse};

/// A signed-in ACC session.
#[derive(Clone)]
pub struct Session {
    inner: Arc<SessionInner>,
}

struct SessionInner {
    config: Arc<ClientConfig>,
    oauth: OAuthClient,
    http: HttpClient,
    state: RwLock<SessionState>,
    refresh_lock: Mutex<()>,
    sink: Option<Arc<dyn CredentialSink>>,
    containers: RwLock<HashMap<String, ContainerResolution>>,
}

#[derive(Debug, Default)]
struct SessionState {
    access_token: Option<AccessToken>,
    refresh_token: Option<RefreshToken>,
    token_acquired_at: Option<DateTime<Utc>>,
    two_legged_token: Option<AccessToken>,
    account_id: Option<String>,
    region: Region,
}

impl Session {
    /// Restore a session from stored credentials. No network call is made.
    pub fn initialize(config: ClientConfig, credentials: &Credentials) -> Result<Self> {
        Self::build(config, state_from(credentials), None)
    }

    /// Restore a session that writes token changes back through `sink`.
    pub fn initialize_with_sink(
        config: ClientConfig,
        credentials: &Credentials,
        sink: Arc<dyn CredentialSink>,
    ) -> Result<Self> {
        Self::build(config, state_from(credentials), Some(sink))
    }

    /// Start a session from a fresh token grant.
    pub fn from_token_response(
        config: ClientConfig,
        tokens: &TokenResponse,
        account_id: Option<String>,
        sink: Option<Arc<dyn CredentialSink>>,
    ) -> Result<Self> {
        let state = SessionState {
            access_token: Some(tokens.access()),
            refresh_token: tokens.refresh(),
            token_acquired_at: Some(Utc::now()),
            account_id,
            ..SessionState::default()
        };
        Self::build(config, state, sink)
    }

    fn build(
        config: ClientConfig,
        state: SessionState,
        sink: Option<Arc<dyn CredentialSink>>,
    ) -> Result<Self> {
        let config = Arc::new(config);
        let oauth = OAuthClient::with_shared(config.clone())?;
        let http = HttpClient::new(config.api_base.clone())?;

        Ok(Self {
            inner: Arc::new(SessionInner {
                config,
                oauth,
                http,
                state: RwLock::new(state),
                refresh_lock: Mutex::new(()),
                sink,
                containers: RwLock::new(HashMap::new()),
            }),
        })
    }

    fn state(&self) -> RwLockReadGuard<'_, SessionState> {
        self.inner.state.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn state_mut(&self) -> RwLockWriteGuard<'_, SessionState> {
        self.inner.state.write().unwrap_or_else(PoisonError::into_inner)
    }

    /// The client configuration this session was built with.
    pub fn config(&self) -> &ClientConfig {
        &self.inner.config
    }

    /// The OAuth client used for token grants.
    pub fn oauth(&self) -> &OAuthClient {
        &self.inner.oauth
    }

    /// The current user access token, if signed in.
    pub fn access_token(&self) -> Option<AccessToken> {
        self.state().access_token.clone()
    }

    /// The current refresh token, if one was issued.
    pub fn refresh_token(&self) -> Option<RefreshToken> {
        self.state().refresh_token.clone()
    }

    /// When the current access token was obtained or last refreshed.
    pub fn token_acquired_at(&self) -> Option<DateTime<Utc>> {
        self.state().token_acquired_at
    }

    /// Returns true if the session holds a user access token.
    pub fn is_authenticated(&self) -> bool {
        self.state().access_token.is_some()
    }

    /// The ACC account id used for account-admin calls.
    pub fn account_id(&self) -> Option<String> {
        self.state().account_id.clone()
    }

    /// Set the ACC account id.
    pub fn set_account_id(&self, account_id: impl Into<String>) {
        self.state_mut().account_id = Some(account_id.into());
    }

    /// The region sent with every request.
    pub fn region(&self) -> Region {
        self.state().region
    }

    /// Route subsequent requests to `region`.
    pub fn set_region(&self, region: Region) {
        debug!(%region, "Region set");
        self.state_mut().region = region;
    }

    /// The most recent application-scoped token, if one was obtained.
    pub fn cached_two_legged_token(&self) -> Option<AccessToken> {
        self.state().two_legged_token.clone()
    }

    /// Snapshot the session as a persistable credential blob. The client
    /// secret is never included.
    pub fn export_credentials(&self) -> Credentials {
        let state = self.state();
        Credentials {
            account_id: state.account_id.clone(),
            client_id: Some(self.inner.config.client_id.clone()),
            client_secret: None,
            three_leg_token: state.access_token.as_ref().map(|t| t.as_str().to_string()),
            refresh_token: state.refresh_token.as_ref().map(|t| t.as_str().to_string()),
            two_legged_token: state
                .two_legged_token
                .as_ref()
                .map(|t| t.as_str().to_string()),
        }
    }

    // ========================================================================
    // Token lifecycle
    // ========================================================================

    /// Redeem the refresh token for a new access token.
    ///
    /// If the identity provider rejects the refresh token or answers with an
    /// unreadable body, all token material is cleared from memory and from
    /// the credential sink. Any other failure is reported as
    /// [`AuthError::RefreshUnavailable`] and leaves the tokens in place.
    #[instrument(skip(self))]
    pub async fn refresh_access_token(&self) -> Result<AccessToken> {
        let _guard = self.inner.refresh_lock.lock().await;
        self.refresh_locked().await
    }

    async fn refresh_locked(&self) -> Result<AccessToken> {
        let refresh_token = self
            .state()
            .refresh_token
            .clone()
            .ok_or(AuthError::NoRefreshToken)?;

        match self.inner.oauth.refresh(&refresh_token).await {
            Ok(tokens) => {
                let access = tokens.access();
                {
                    let mut state = self.state_mut();
                    state.access_token = Some(access.clone());
                    if let Some(refresh) = tokens.refresh() {
                        state.refresh_token = Some(refresh);
                    }
                    state.token_acquired_at = Some(Utc::now());
                }
                info!("Access token refreshed");
                self.persist().await;
                Ok(access)
            }
            Err(err @ Error::Auth(_)) => {
                warn!("Refresh rejected, clearing credentials");
                self.clear_credentials().await;
                Err(err)
            }
            Err(Error::Transport(TransportError::Decode { message })) => {
                warn!(%message, "Unreadable token response, clearing credentials");
                self.clear_credentials().await;
                Err(AuthError::RefreshUnavailable { message }.into())
            }
            Err(err) => {
                warn!(error = %err, "Refresh could not be completed");
                Err(AuthError::RefreshUnavailable {
                    message: err.to_string(),
                }
                .into())
            }
        }
    }

    async fn clear_credentials(&self) {
        self.clear_tokens();
        if let Some(sink) = &self.inner.sink {
            if let Err(e) = sink.clear().await {
                warn!(error = %e, "Failed to clear stored credentials");
            }
        }
    }

    /// Called after a 401. Returns the token to retry with.
    async fn recover(&self, used: Option<&AccessToken>) -> Result<AccessToken> {
        let _guard = self.inner.refresh_lock.lock().await;

        let (current, has_refresh) = {
            let state = self.state();
            (state.access_token.clone(), state.refresh_token.is_some())
        };

        if let Some(current) = current {
            if used != Some(&current) {
                debug!("Token was refreshed concurrently, retrying");
                return Ok(current);
            }
        }

        if !has_refresh {
            return Err(AuthError::SessionExpired.into());
        }

        self.refresh_locked().await
    }

    /// Obtain an application-scoped token. A failure leaves the user
    /// session untouched.
    #[instrument(skip(self))]
    pub async fn two_legged_token(&self) -> Result<AccessToken> {
        let tokens = self.inner.oauth.client_credentials().await?;
        let token = tokens.access();
        self.state_mut().two_legged_token = Some(token.clone());
        self.persist().await;
        Ok(token)
    }

    /// Drop all token material, in memory and in the credential sink.
    #[instrument(skip(self))]
    pub async fn logout(&self) -> Result<()> {
        self.clear_tokens();
        self.inner.containers.write().unwrap_or_else(PoisonError::into_inner).clear();
        if let Some(sink) = &self.inner.sink {
            sink.clear().await?;
        }
        info!("Logged out");
        Ok(())
    }

    fn clear_tokens(&self) {
        let mut state = self.state_mut();
        state.access_token = None;
        state.refresh_token = None;
        state.token_acquired_at = None;
        state.two_legged_token = None;
    }

    async fn persist(&self) {
        let Some(sink) = &self.inner.sink else {
            return;
        };
        if let Err(e) = sink.save(&self.export_credentials()).await {
            warn!(error = %e, "Failed to persist credentials");
        }
    }

    // ========================================================================
    // Dispatch
    // ========================================================================

    /// Send a JSON request with the session's token and region.
    pub async fn request(&self, method: Method, path: &str, body: Option<&Value>) -> Result<Value> {
        let payload = body.map_or(Payload::Empty, Payload::Json);
        self.execute(method, path, payload, self.region()).await
    }

    /// Shorthand for a bodiless `GET` through [`Session::request`].
    pub async fn get(&self, path: &str) -> Result<Value> {
        self.request(Method::GET, path, None).await
    }

    /// Send a request routed to `region` instead of the session's region.
    pub async fn request_in_region(
        &self,
        method: Method,
        path: &str,
        body: Option<&Value>,
        region: Region,
    ) -> Result<Value> {
        let payload = body.map_or(Payload::Empty, Payload::Json);
        self.execute(method, path, payload, region).await
    }

    /// Send a multipart upload. Retried after a refresh like any request.
    pub async fn upload(&self, method: Method, path: &str, upload: &Upload) -> Result<Value> {
        self.execute(method, path, Payload::Multipart(upload), self.region())
            .await
    }

    /// Send a multipart upload with an explicit token. No region header is
    /// sent and a 401 is returned as-is.
    pub async fn upload_with_token(
        &self,
        method: Method,
        path: &str,
        upload: &Upload,
        token: &AccessToken,
    ) -> Result<Value> {
        self.inner
            .http
            .send(method, path, Payload::Multipart(upload), token, None)
            .await
    }

    #[instrument(skip(self, payload), fields(%method, %region))]
    async fn execute(
        &self,
        method: Method,
        path: &str,
        payload: Payload<'_>,
        region: Region,
    ) -> Result<Value> {
        let token = match self.access_token() {
            Some(token) => token,
            None => self.recover(None).await?,
        };

        let first = self
            .inner
            .http
            .send(method.clone(), path, payload, &token, Some(region))
            .await;

        match first {
            Err(Error::Api(err)) if err.is_unauthorized() => {
                debug!(path, "Access token rejected");
                let fresh = self.recover(Some(&token)).await?;
                match self
                    .inner
                    .http
                    .send(method, path, payload, &fresh, Some(region))
                    .await
                {
                    Err(Error::Api(err)) if err.is_unauthorized() => {
                        Err(AuthError::Unauthorized { body: err.body }.into())
                    }
                    other => other,
                }
            }
            other => other,
        }
    }

    // ========================================================================
    // Cost container cache
    // ========================================================================

    pub(crate) fn cached_container(&self, project_id: &str) -> Option<ContainerResolution> {
        self.inner
            .containers
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(project_id)
            .cloned()
    }

    pub(crate) fn cache_container(&self, project_id: &str, resolution: ContainerResolution) {
        self.inner
            .containers
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(project_id.to_string(), resolution);
    }
}

fn state_from(credentials: &Credentials) -> SessionState {
    let access_token = credentials.access_token();
    SessionState {
        token_acquired_at: access_token.as_ref().map(|_| Utc::now()),
        access_token,
        refresh_token: credentials.refresh(),
        two_legged_token: credentials
            .two_legged_token
            .as_deref()
            .filter(|t| !t.is_empty())
            .map(AccessToken::new),
        account_id: credentials.account_id.clone(),
        region: Region::default(),
    }
}

impl fmt::Debug for Session {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let state = self.state();
        f.debug_struct("Session")
            .field("api", &self.inner.config.api_base)
            .field("account_id", &state.account_id)
            .field("region", &state.region)
            .field("tokens", &"[REDACTED]")
            .finish()
    }
}
