//! HTTP transport for ACC requests.

use std::fmt;

use reqwest::header::{AUTHORIZATION, CONTENT_TYPE};
use reqwest::multipart::{Form, Part};
use reqwest::{Method, Response};
use serde_json::{Value, json};
use tracing::{debug, instrument, trace};

use acc_core::error::{ApiError, Error, InvalidInputError, TransportError};
use acc_core::{AccessToken, ApiUrl, Region, Result};

/// Name of the header that routes a request to a regional shard.
pub const REGION_HEADER: &str = "region";

pub(crate) fn transport_error(err: reqwest::Error) -> Error {
    let transport = if err.is_timeout() {
        TransportError::Timeout
    } else if err.is_connect() {
        TransportError::Connection {
            message: err.to_string(),
        }
    } else if err.is_decode() || err.is_body() {
        TransportError::Decode {
            message: err.to_string(),
        }
    } else {
        TransportError::Http {
            message: err.to_string(),
        }
    };
    Error::Transport(transport)
}

/// A single-file multipart upload.
///
/// Kept as plain data so the form can be rebuilt when a request is retried
/// after a token refresh.
#[derive(Clone)]
pub struct Upload {
    pub field: String,
    pub file_name: String,
    pub mime: String,
    pub bytes: Vec<u8>,
    pub text_fields: Vec<(String, String)>,
}

impl Upload {
    /// Upload `bytes` as form field `field`, typed `application/octet-stream`.
    pub fn new(field: impl Into<String>, file_name: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            field: field.into(),
            file_name: file_name.into(),
            mime: "application/octet-stream".to_string(),
            bytes,
            text_fields: Vec::new(),
        }
    }

    pub fn mime(mut self, mime: impl Into<String>) -> Self {
        self.mime = mime.into();
        self
    }

    /// Add a plain text form field sent alongside the file.
    pub fn text(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.text_fields.push((name.into(), value.into()));
        self
    }

    pub(crate) fn to_form(&self) -> Result<Form> {
        let part = Part::bytes(self.bytes.clone())
            .file_name(self.file_name.clone())
            .mime_str(&self.mime)
            .map_err(|e| InvalidInputError::Other {
                message: format!("invalid MIME type '{}': {}", self.mime, e),
            })?;

        let form = self
            .text_fields
            .iter()
            .fold(Form::new(), |form, (name, value)| {
                form.text(name.clone(), value.clone())
            });
        Ok(form.part(self.field.clone(), part))
    }
}

impl fmt::Debug for Upload {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Upload")
            .field("field", &self.field)
            .field("file_name", &self.file_name)
            .field("mime", &self.mime)
            .field("len", &self.bytes.len())
            .field("text_fields", &self.text_fields)
            .finish()
    }
}

/// Body of an outgoing request.
#[derive(Debug, Clone, Copy)]
pub(crate) enum Payload<'a> {
    Empty,
    Json(&'a Value),
    Multipart(&'a Upload),
}

/// Thin wrapper over `reqwest::Client` bound to one API gateway.
#[derive(Debug, Clone)]
pub(crate) struct HttpClient {
    client: reqwest::Client,
    api: ApiUrl,
}

impl HttpClient {
    pub(crate) fn new(api: ApiUrl) -> Result<Self> {
        let client = reqwest::Client::builder()
            .user_agent(concat!("acc-client/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(transport_error)?;

        Ok(Self { client, api })
    }

    pub(crate) fn api(&self) -> &ApiUrl {
        &self.api
    }

    /// Send an authenticated request and decode the response.
    ///
    /// Returns the decoded JSON body, or `{"success": true, "status": n}`
    /// when a 2xx response carries no JSON.
    #[instrument(skip(self, payload, token), fields(api = %self.api))]
    pub(crate) async fn send(
        &self,
        method: Method,
        path: &str,
        payload: Payload<'_>,
        token: &AccessToken,
        region: Option<Region>,
    ) -> Result<Value> {
        let url = self.api.endpoint(path);
        debug!(%method, path, region = ?region, "ACC request");

        let mut request = self
            .client
            .request(method, &url)
            .header(AUTHORIZATION, token.bearer());

        if let Some(region) = region {
            request = request.header(REGION_HEADER, region.as_str());
        }

        request = match payload {
            Payload::Empty => request,
            Payload::Json(body) => request.json(body),
            Payload::Multipart(upload) => request.multipart(upload.to_form()?),
        };

        let response = request.send().await.map_err(transport_error)?;
        handle_response(response).await
    }

    /// POST a form-encoded body, optionally with HTTP Basic credentials.
    /// Returns the status and raw body without interpreting either.
    #[instrument(skip(self, params, basic), fields(api = %self.api))]
    pub(crate) async fn post_form(
        &self,
        path: &str,
        params: &[(&str, &str)],
        basic: Option<(&str, &str)>,
    ) -> Result<(u16, String)> {
        let url = self.api.endpoint(path);
        debug!(path, "Form POST");

        let mut request = self.client.post(&url).form(params);
        if let Some((user, password)) = basic {
            request = request.basic_auth(user, Some(password));
        }

        let response = request.send().await.map_err(transport_error)?;
        let status = response.status().as_u16();
        let body = response.text().await.map_err(transport_error)?;
        trace!(status, "Form POST response");
        Ok((status, body))
    }
}

async fn handle_response(response: Response) -> Result<Value> {
    let status = response.status();
    let is_json = response
        .headers()
        .get(CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .is_some_and(|ct| ct.contains("json"));

    let body = response.text().await.map_err(transport_error)?;
    trace!(status = %status, len = body.len(), "ACC response");

    if !status.is_success() {
        return Err(ApiError::from_body(status.as_u16(), body).into());
    }

    if !is_json || body.trim().is_empty() {
        return Ok(json!({ "success": true, "status": status.as_u16() }));
    }

    serde_json::from_str(&body).map_err(|e| {
        TransportError::Decode {
            message: e.to_string(),
        }
        .into()
    })
}
