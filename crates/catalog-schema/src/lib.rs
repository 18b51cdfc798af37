//! Wire schemas for the data catalog REST API.
//!
//! Every payload the console reads is decoded into one of these types at the
//! HTTP boundary. Keeping them in their own crate pins the wire contract in one
//! place and keeps the client crate free of ad-hoc `serde_json::Value` probing.

mod dataset;
mod organization;
mod status;
mod user;

use serde::{Deserialize, Serialize};

pub use dataset::{Dataset, DatasetFile, DatasetOrganization, DatasetUser, Owner, Tag};
pub use organization::{Organization, OrganizationIndicators, OrganizationRequest, RequestUser};
pub use status::{DatasetStatus, OrganizationStatus, ParseStatusError, Role};
pub use user::User;

/// Envelope returned by every paginated list endpoint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Page<T> {
    /// Total number of rows matching the query on the server
    pub count: u64,
    /// Rows of the requested page
    pub results: Vec<T>,
}

impl<T> Page<T> {
    pub fn empty() -> Self {
        Self {
            count: 0,
            results: Vec::new(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.results.is_empty()
    }
}

impl<T> Default for Page<T> {
    fn default() -> Self {
        Self::empty()
    }
}

/// Body returned by action and mutation endpoints.
///
/// The backend answers most state changes with `{"message": "..."}`; some
/// endpoints return the updated record instead, in which case `message` is
/// absent and the extra fields are ignored.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActionResponse {
    #[serde(default)]
    pub message: Option<String>,
}
