//! Error types for the ACC toolkit.
//!
//! This module provides a unified error type with explicit variants for
//! transport, upstream API, authentication, input validation, and local
//! storage errors. Upstream error payloads are parsed once, at the HTTP
//! boundary, into [`ApiError`] so callers match on [`ApiErrorCode`] rather
//! than on message substrings.

use std::fmt;
use thiserror::Error;

/// The unified error type for ACC operations.
#[derive(Debug, Error)]
pub enum Error {
    /// Network transport errors (DNS, TLS, connection, timeout).
    #[error("transport error: {0}")]
    Transport(#[from] TransportError),

    /// Non-2xx responses from an ACC endpoint.
    #[error("API error: {0}")]
    Api(#[from] ApiError),

    /// Authentication errors (expired session, failed refresh).
    #[error("authentication error: {0}")]
    Auth(#[from] AuthError),

    /// Client-side validation errors.
    #[error("invalid input: {0}")]
    InvalidInput(#[from] InvalidInputError),

    /// Local persistence errors (credential and phase files).
    #[error("storage error: {0}")]
    Storage(#[from] StorageError),
}

impl Error {
    /// Returns the upstream API error, if this is one.
    pub fn as_api(&self) -> Option<&ApiError> {
        match self {
            Error::Api(err) => Some(err),
            _ => None,
        }
    }

    /// Returns true if the user session can no longer be used and the
    /// caller should force the user to log in again.
    ///
    /// A rejected grant (code exchange or client credentials) does not
    /// invalidate an existing user session.
    pub fn requires_login(&self) -> bool {
        match self {
            Error::Auth(AuthError::GrantRejected { .. }) => false,
            Error::Auth(_) => true,
            _ => false,
        }
    }

    /// Returns true if the error means the addressed subsystem is not enabled
    /// for the project (e.g. cost management absent).
    pub fn is_feature_unavailable(&self) -> bool {
        self.as_api().is_some_and(ApiError::is_feature_unavailable)
    }
}

/// Transport-level errors.
#[derive(Debug, Error)]
pub enum TransportError {
    /// Network connection failed.
    #[error("connection failed: {message}")]
    Connection { message: String },

    /// Request timed out.
    #[error("request timed out")]
    Timeout,

    /// The response body could not be read or decoded.
    #[error("invalid response body: {message}")]
    Decode { message: String },

    /// Generic HTTP error.
    #[error("HTTP error: {message}")]
    Http { message: String },
}

/// Authentication-related errors.
#[derive(Debug, Error)]
pub enum AuthError {
    /// A refresh was requested but the session holds no refresh token.
    #[error("no refresh token available, sign in again")]
    NoRefreshToken,

    /// The session has no usable access token.
    #[error("session expired, sign in again")]
    SessionExpired,

    /// The identity provider rejected the refresh token. Stored credentials
    /// have been cleared.
    #[error("token refresh failed: HTTP {status}: {body}")]
    RefreshFailed { status: u16, body: String },

    /// The refresh could not be completed: the token endpoint was
    /// unreachable, answered with an unreadable body, or the client is not
    /// configured to refresh.
    #[error("token refresh unavailable: {message}")]
    RefreshUnavailable { message: String },

    /// The identity provider rejected a grant (code exchange or client credentials).
    #[error("token request failed: HTTP {status}: {body}")]
    GrantRejected { status: u16, body: String },

    /// The request was still rejected after a successful refresh.
    #[error("request unauthorized after token refresh: {body}")]
    Unauthorized { body: String },
}

/// Structured upstream error codes.
///
/// ACC reports application errors as numeric codes inside the response body
/// (`{"errors":[{"code":40004,...}]}` or `{"code":"40004",...}`).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ApiErrorCode {
    /// 40004: the project is not known to cost management.
    CostContainerNotFound,
    /// Any other code, kept verbatim.
    Other(String),
}

impl ApiErrorCode {
    /// Parse a code as it appears in an upstream payload.
    pub fn parse(raw: &str) -> Self {
        match raw.trim() {
            "40004" => ApiErrorCode::CostContainerNotFound,
            other => ApiErrorCode::Other(other.to_string()),
        }
    }
}

impl fmt::Display for ApiErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ApiErrorCode::CostContainerNotFound => write!(f, "40004"),
            ApiErrorCode::Other(code) => write!(f, "{}", code),
        }
    }
}

/// A non-2xx response from an ACC endpoint.
#[derive(Debug, Clone)]
pub struct ApiError {
    /// HTTP status code.
    pub status: u16,
    /// Application error code, if the body carried one.
    pub code: Option<ApiErrorCode>,
    /// Short error title or message from the body.
    pub title: Option<String>,
    /// Longer error detail from the body.
    pub detail: Option<String>,
    /// Raw response body.
    pub body: String,
}

impl ApiError {
    /// Build an error from a status and raw body, extracting any structured
    /// code, title and detail the body carries.
    pub fn from_body(status: u16, body: impl Into<String>) -> Self {
        let body = body.into();
        let mut error = Self {
            status,
            code: None,
            title: None,
            detail: None,
            body,
        };

        let Ok(value) = serde_json::from_str::<serde_json::Value>(&error.body) else {
            return error;
        };

        // JSON:API style: {"errors": [{"code", "title", "detail"}]}
        let source = value
            .get("errors")
            .and_then(|e| e.as_array())
            .and_then(|e| e.first())
            .unwrap_or(&value);

        error.code = ["code", "errorCode"]
            .iter()
            .find_map(|key| source.get(*key))
            .and_then(code_string)
            .map(|c| ApiErrorCode::parse(&c));
        error.title = ["title", "message", "error"]
            .iter()
            .find_map(|key| source.get(*key).and_then(|v| v.as_str()))
            .map(str::to_string);
        error.detail = ["detail", "developerMessage", "error_description"]
            .iter()
            .find_map(|key| source.get(*key).and_then(|v| v.as_str()))
            .map(str::to_string);

        error
    }

    /// Returns true for 401 responses.
    pub fn is_unauthorized(&self) -> bool {
        self.status == 401
    }

    /// Returns true if the response means the subsystem is not enabled for
    /// the addressed project.
    pub fn is_feature_unavailable(&self) -> bool {
        self.status == 404 || self.code == Some(ApiErrorCode::CostContainerNotFound)
    }
}

fn code_string(value: &serde_json::Value) -> Option<String> {
    match value {
        serde_json::Value::String(s) => Some(s.clone()),
        serde_json::Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "HTTP {}", self.status)?;
        if let Some(ref code) = self.code {
            write!(f, " [{}]", code)?;
        }
        match (&self.title, &self.detail) {
            (Some(title), Some(detail)) => write!(f, ": {} ({})", title, detail),
            (Some(message), None) | (None, Some(message)) => write!(f, ": {}", message),
            (None, None) if !self.body.is_empty() => write!(f, ": {}", self.body),
            (None, None) => Ok(()),
        }
    }
}

impl std::error::Error for ApiError {}

/// Input validation errors.
#[derive(Debug, Error)]
pub enum InvalidInputError {
    /// Invalid API base URL.
    #[error("invalid API URL '{value}': {reason}")]
    ApiUrl { value: String, reason: String },

    /// Invalid identifier (hub, project, container).
    #[error("invalid {kind} '{value}': {reason}")]
    Id {
        kind: &'static str,
        value: String,
        reason: String,
    },

    /// Unknown region name.
    #[error("unknown region '{value}'")]
    Region { value: String },

    /// A required field was missing before submit.
    #[error("missing required field '{field}'")]
    MissingField { field: &'static str },

    /// Generic invalid input.
    #[error("invalid input: {message}")]
    Other { message: String },
}

/// Local persistence errors.
#[derive(Debug, Error)]
pub enum StorageError {
    /// Filesystem error.
    #[error("I/O error on {path}: {message}")]
    Io { path: String, message: String },

    /// Stored data could not be parsed.
    #[error("corrupt data in {path}: {message}")]
    Corrupt { path: String, message: String },
}
