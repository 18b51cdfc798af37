//! Catalog REST API access.
//!
//! Everything that talks to the backend goes through [`CatalogClient`], which
//! wraps a [`CatalogBackend`] transport and decodes every payload into the
//! typed schemas of `catalog-schema` at the boundary. The HTTP transport lives
//! in [`client`]; tests swap in an in-memory backend.

pub mod client;
pub mod endpoints;
pub mod error;

use std::fmt;
use std::sync::Arc;

use async_trait::async_trait;
use http::Method;
use serde::de::DeserializeOwned;
use tracing::debug;

use catalog_schema::{ActionResponse, Page};

use crate::config::Config;
use crate::error::{CatalogError, Result};
use crate::query::QueryKey;

pub use client::HttpBackend;
pub use error::ApiError;

/// One field of a multipart form body.
#[derive(Clone, PartialEq, Eq)]
pub struct FormField {
    pub name: String,
    pub value: FormValue,
}

#[derive(Clone, PartialEq, Eq)]
pub enum FormValue {
    Text(String),
    File { file_name: String, bytes: Vec<u8> },
}

impl FormField {
    pub fn text(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: FormValue::Text(value.into()),
        }
    }

    pub fn file(name: impl Into<String>, file_name: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            name: name.into(),
            value: FormValue::File {
                file_name: file_name.into(),
                bytes,
            },
        }
    }
}

impl fmt::Debug for FormField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.value {
            FormValue::Text(text) => write!(f, "{}={:?}", self.name, text),
            FormValue::File { file_name, bytes } => {
                write!(f, "{}=<{} ({} bytes)>", self.name, file_name, bytes.len())
            }
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub enum RequestBody {
    #[default]
    Empty,
    Json(serde_json::Value),
    Form(Vec<FormField>),
}

/// A single backend call, independent of the transport that performs it.
#[derive(Debug, Clone, PartialEq)]
pub struct ApiRequest {
    pub method: Method,
    pub path: String,
    pub query: Vec<(String, String)>,
    pub body: RequestBody,
}

impl ApiRequest {
    pub fn new(method: Method, path: impl Into<String>) -> Self {
        Self {
            method,
            path: path.into(),
            query: Vec::new(),
            body: RequestBody::Empty,
        }
    }

    pub fn get(path: impl Into<String>) -> Self {
        Self::new(Method::GET, path)
    }

    pub fn post(path: impl Into<String>) -> Self {
        Self::new(Method::POST, path)
    }

    pub fn patch(path: impl Into<String>) -> Self {
        Self::new(Method::PATCH, path)
    }

    pub fn delete(path: impl Into<String>) -> Self {
        Self::new(Method::DELETE, path)
    }

    pub fn with_query<K, V>(mut self, pairs: impl IntoIterator<Item = (K, V)>) -> Self
    where
        K: Into<String>,
        V: Into<String>,
    {
        self.query
            .extend(pairs.into_iter().map(|(k, v)| (k.into(), v.into())));
        self
    }

    pub fn json(mut self, body: serde_json::Value) -> Self {
        self.body = RequestBody::Json(body);
        self
    }

    pub fn form(mut self, fields: Vec<FormField>) -> Self {
        self.body = RequestBody::Form(fields);
        self
    }

    /// Path plus encoded query string, used in logs and error messages.
    pub fn endpoint(&self) -> String {
        if self.query.is_empty() {
            return self.path.clone();
        }
        let query = url::form_urlencoded::Serializer::new(String::new())
            .extend_pairs(self.query.iter())
            .finish();
        format!("{}?{}", self.path, query)
    }
}

impl From<&QueryKey> for ApiRequest {
    fn from(key: &QueryKey) -> Self {
        ApiRequest::get(key.path()).with_query(key.params().iter().cloned())
    }
}

/// Transport for backend calls.
///
/// Returns the decoded JSON body of a successful response (`Null` for empty
/// bodies) or an [`ApiError`] wrapped in [`CatalogError::Api`].
#[async_trait]
pub trait CatalogBackend: Send + Sync {
    async fn send(&self, request: ApiRequest) -> Result<serde_json::Value>;
}

/// Typed access to the catalog backend.
#[derive(Clone)]
pub struct CatalogClient {
    backend: Arc<dyn CatalogBackend>,
}

impl CatalogClient {
    pub fn new(backend: impl CatalogBackend + 'static) -> Self {
        Self {
            backend: Arc::new(backend),
        }
    }

    pub fn from_backend(backend: Arc<dyn CatalogBackend>) -> Self {
        Self { backend }
    }

    /// Build an HTTP client from configuration
    pub fn from_config(config: &Config) -> Result<Self> {
        Ok(Self::new(HttpBackend::from_config(config)?))
    }

    pub async fn send(&self, request: ApiRequest) -> Result<serde_json::Value> {
        debug!(method = %request.method, endpoint = %request.endpoint(), "catalog request");
        self.backend.send(request).await
    }

    /// Perform a request and decode its body into `T`.
    pub async fn fetch<T: DeserializeOwned>(&self, request: ApiRequest) -> Result<T> {
        let endpoint = request.endpoint();
        let value = self.send(request).await?;
        decode(&endpoint, value)
    }

    /// Fetch one page of a list endpoint.
    pub async fn get_page<T: DeserializeOwned>(&self, key: &QueryKey) -> Result<Page<T>> {
        self.fetch(ApiRequest::from(key)).await
    }

    /// Perform a state-changing request. Empty bodies read as no message.
    pub async fn action(&self, request: ApiRequest) -> Result<ActionResponse> {
        let endpoint = request.endpoint();
        match self.send(request).await? {
            serde_json::Value::Null => Ok(ActionResponse::default()),
            value => decode(&endpoint, value),
        }
    }
}

fn decode<T: DeserializeOwned>(endpoint: &str, value: serde_json::Value) -> Result<T> {
    serde_json::from_value(value).map_err(|source| CatalogError::Decode {
        endpoint: endpoint.to_string(),
        source,
    })
}
