//! Persisted credential blob.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::tokens::{AccessToken, RefreshToken};

/// Credentials for an ACC user session.
///
/// Serialized with the same camelCase keys the browser dashboard kept in
/// local storage, so existing blobs load unchanged. Every field is optional
/// because the blob is written incrementally (account first, tokens after
/// sign-in).
///
/// # Security
///
/// Secrets and tokens are never exposed in Debug output.
///
/// # Example
///
/// ```
/// use acc_core::Credentials;
///
/// let creds = Credentials::default()
///     .with_account_id("ddc5f6e2")
///     .with_three_leg_token("access");
/// assert_eq!(creds.account_id.as_deref(), Some("ddc5f6e2"));
/// assert!(creds.has_user_token());
/// ```
#[derive(Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Credentials {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub account_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub client_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub client_secret: Option<String>,
    /// User-delegated access token.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub three_leg_token: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub refresh_token: Option<String>,
    /// Application-scoped token, cached after sign-in.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub two_legged_token: Option<String>,
}

impl Credentials {
    pub fn with_account_id(mut self, account_id: impl Into<String>) -> Self {
        self.account_id = Some(account_id.into());
        self
    }

    pub fn with_three_leg_token(mut self, token: impl Into<String>) -> Self {
        self.three_leg_token = Some(token.into());
        self
    }

    pub fn with_refresh_token(mut self, token: impl Into<String>) -> Self {
        self.refresh_token = Some(token.into());
        self
    }

    /// Returns true if a non-empty user access token is present.
    pub fn has_user_token(&self) -> bool {
        self.three_leg_token.as_deref().is_some_and(|t| !t.is_empty())
    }

    /// The user access token, if present and non-empty.
    pub fn access_token(&self) -> Option<AccessToken> {
        non_empty(&self.three_leg_token).map(AccessToken::new)
    }

    /// The refresh token, if present and non-empty.
    pub fn refresh(&self) -> Option<RefreshToken> {
        non_empty(&self.refresh_token).map(RefreshToken::new)
    }

    /// Drop all token material while keeping the account and client identity.
    pub fn clear_tokens(&mut self) {
        self.three_leg_token = None;
        self.refresh_token = None;
        self.two_legged_token = None;
    }
}

fn non_empty(value: &Option<String>) -> Option<String> {
    value.as_ref().filter(|v| !v.is_empty()).cloned()
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let redact = |v: &Option<String>| v.as_ref().map(|_| "[REDACTED]");
        f.debug_struct("Credentials")
            .field("account_id", &self.account_id)
            .field("client_id", &self.client_id)
            .field("client_secret", &redact(&self.client_secret))
            .field("three_leg_token", &redact(&self.three_leg_token))
            .field("refresh_token", &redact(&self.refresh_token))
            .field("two_legged_token", &redact(&self.two_legged_token))
            .finish()
    }
}
