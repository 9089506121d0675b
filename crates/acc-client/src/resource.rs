//! Generic typed collection over an ACC endpoint.

use std::marker::PhantomData;

use reqwest::Method;
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::instrument;

use acc_core::error::{InvalidInputError, TransportError};
use acc_core::{ListOptions, Result};

use crate::endpoints::enc;
use crate::session::Session;

/// List/get/create/update/delete over one collection path.
///
/// ACC wraps collections inconsistently (`results`, `data`, or a bare
/// array) and single records sometimes in `data`; both are unwrapped here
/// so callers only see `T`.
///
/// ```no_run
/// # async fn demo(session: &acc_client::Session) -> acc_core::Result<()> {
/// use acc_client::CollectionResource;
/// use acc_core::ListOptions;
/// use acc_core::models::Budget;
///
/// let budgets = CollectionResource::<Budget>::new(session, "/cost/v1/containers/c/budgets");
/// let first_page = budgets.list(&ListOptions::new().limit(50)).await?;
/// # Ok(()) }
/// ```
pub struct CollectionResource<'s, T> {
    session: &'s Session,
    path: String,
    _marker: PhantomData<fn() -> T>,
}

impl<'s, T: DeserializeOwned> CollectionResource<'s, T> {
    pub fn new(session: &'s Session, path: impl Into<String>) -> Self {
        Self {
            session,
            path: path.into(),
            _marker: PhantomData,
        }
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    fn member(&self, id: &str) -> Result<String> {
        if id.trim().is_empty() {
            return Err(InvalidInputError::MissingField { field: "id" }.into());
        }
        Ok(format!("{}/{}", self.path, enc(id)))
    }

    #[instrument(skip(self, options), fields(path = %self.path))]
    pub async fn list(&self, options: &ListOptions) -> Result<Vec<T>> {
        let url = format!("{}{}", self.path, options.to_query_string());
        let body = self.session.get(&url).await?;
        unwrap_list(body)
            .into_iter()
            .map(decode)
            .collect()
    }

    #[instrument(skip(self, options), fields(path = %self.path))]
    pub async fn get(&self, id: &str, options: &ListOptions) -> Result<T> {
        let url = format!("{}{}", self.member(id)?, options.to_query_string());
        let body = self.session.get(&url).await?;
        decode(unwrap_single(body))
    }

    #[instrument(skip(self, body), fields(path = %self.path))]
    pub async fn create<B: Serialize + ?Sized>(&self, body: &B) -> Result<T> {
        let body = to_value(body)?;
        let response = self
            .session
            .request(Method::POST, &self.path, Some(&body))
            .await?;
        decode(unwrap_single(response))
    }

    #[instrument(skip(self, body), fields(path = %self.path))]
    pub async fn update<B: Serialize + ?Sized>(&self, id: &str, body: &B) -> Result<T> {
        let body = to_value(body)?;
        let response = self
            .session
            .request(Method::PATCH, &self.member(id)?, Some(&body))
            .await?;
        decode(unwrap_single(response))
    }

    #[instrument(skip(self), fields(path = %self.path))]
    pub async fn delete(&self, id: &str) -> Result<()> {
        self.session
            .request(Method::DELETE, &self.member(id)?, None)
            .await?;
        Ok(())
    }
}

/// Pull the record list out of a collection response.
pub(crate) fn unwrap_list(body: Value) -> Vec<Value> {
    match body {
        Value::Array(items) => items,
        Value::Object(mut map) => ["results", "data"]
            .iter()
            .find_map(|key| match map.remove(*key) {
                Some(Value::Array(items)) => Some(items),
                _ => None,
            })
            .unwrap_or_default(),
        _ => Vec::new(),
    }
}

/// Pull a single record out of a `data` envelope, if there is one.
pub(crate) fn unwrap_single(body: Value) -> Value {
    match body {
        Value::Object(mut map) if map.get("data").is_some_and(Value::is_object) => {
            map.remove("data").unwrap_or_default()
        }
        other => other,
    }
}

pub(crate) fn decode<T: DeserializeOwned>(value: Value) -> Result<T> {
    serde_json::from_value(value).map_err(|e| {
        TransportError::Decode {
            message: e.to_string(),
        }
        .into()
    })
}

fn to_value<B: Serialize + ?Sized>(body: &B) -> Result<Value> {
    serde_json::to_value(body).map_err(|e| {
        InvalidInputError::Other {
            message: format!("request body: {}", e),
        }
        .into()
    })
}
