use std::sync::Arc;

use thiserror::Error;

use crate::api::ApiError;

#[derive(Error, Debug)]
pub enum CatalogError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("YAML parse error: {0}")]
    YamlParse(#[from] serde_yaml_ng::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("configuration error: {0}")]
    Config(String),

    #[error("authentication error: {0}")]
    Auth(String),

    #[error(transparent)]
    Api(#[from] ApiError),

    #[error("malformed response from {endpoint}: {source}")]
    Decode {
        endpoint: String,
        #[source]
        source: serde_json::Error,
    },

    /// A failure shared between every caller that joined the same fetch
    #[error(transparent)]
    Query(#[from] Arc<CatalogError>),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("invalid page size {0}, expected one of 5, 10, 100")]
    InvalidPageSize(u32),

    #[error("invalid value for {key}: {message}")]
    InvalidArgument { key: String, message: String },

    #[error("another action is already in flight")]
    MutationInFlight,

    #[error("a dialog is already open")]
    DialogBusy,

    #[error("request was superseded before it completed")]
    Detached,

    #[error("aborted by user")]
    Aborted,

    /// A failed action, described by its user-facing notification
    #[error("{message}")]
    ActionFailed {
        message: String,
        #[source]
        source: Box<CatalogError>,
    },

    #[error("{0}")]
    Other(String),
}

impl CatalogError {
    /// The backend error behind this failure, if any.
    pub fn api(&self) -> Option<&ApiError> {
        match self {
            CatalogError::Api(err) => Some(err),
            CatalogError::Query(inner) => inner.api(),
            CatalogError::ActionFailed { source, .. } => source.api(),
            _ => None,
        }
    }

    pub fn is_validation(&self) -> bool {
        self.api().is_some_and(ApiError::is_validation)
    }

    pub fn is_not_found(&self) -> bool {
        self.api().is_some_and(ApiError::is_not_found)
    }
}

pub type Result<T> = std::result::Result<T, CatalogError>;
