//! State-changing backend calls.
//!
//! A [`MutationSpec`] describes one call: the request, the cached reads it
//! makes stale, and the texts shown for its outcomes. [`ActionMutation`] runs
//! specs one at a time and turns outcomes into [`Notification`]s.

pub mod notify;

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use tracing::{info, warn};

use catalog_schema::ActionResponse;

use crate::api::{ApiRequest, CatalogClient};
use crate::error::{CatalogError, Result};
use crate::query::{KeyScope, QueryCache, QueryKey};

pub use notify::{Notification, NotificationLevel, capitalize_first};

/// Route the caller should move to after a mutation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Navigation {
    pub route: String,
}

impl Navigation {
    pub fn to(route: impl Into<String>) -> Self {
        Self {
            route: route.into(),
        }
    }
}

/// Texts for the outcomes of one mutation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MutationMessages {
    /// Shown on success when the server sends no message
    pub success: String,
    /// Shown when the server rejects the request with 400
    pub validation: Option<String>,
    /// Shown when the target no longer exists (404)
    pub not_found: Option<String>,
}

impl MutationMessages {
    pub fn new(success: impl Into<String>) -> Self {
        Self {
            success: success.into(),
            validation: None,
            not_found: None,
        }
    }

    pub fn on_validation(mut self, message: impl Into<String>) -> Self {
        self.validation = Some(message.into());
        self
    }

    pub fn on_not_found(mut self, message: impl Into<String>) -> Self {
        self.not_found = Some(message.into());
        self
    }

    /// Server message with its first letter capitalised, else the default.
    pub fn for_success(&self, response: &ActionResponse) -> Notification {
        let message = response
            .message
            .as_deref()
            .map(str::trim)
            .filter(|m| !m.is_empty())
            .map(capitalize_first)
            .unwrap_or_else(|| self.success.clone());
        Notification::success(message)
    }

    /// Notification for a failed call, if this mutation names one for it.
    pub fn for_error(&self, err: &CatalogError) -> Option<Notification> {
        if err.is_validation() {
            return self.validation.clone().map(Notification::error);
        }
        if err.is_not_found() {
            return self.not_found.clone().map(Notification::error);
        }
        None
    }
}

/// One state-changing call.
#[derive(Debug, Clone)]
pub struct MutationSpec {
    pub request: ApiRequest,
    /// Cached reads made stale by a successful call
    pub invalidates: Vec<KeyScope>,
    pub messages: MutationMessages,
    /// Where the caller goes after success, if anywhere
    pub navigate_to: Option<Navigation>,
}

impl MutationSpec {
    pub fn new(request: ApiRequest, messages: MutationMessages) -> Self {
        Self {
            request,
            invalidates: Vec::new(),
            messages,
            navigate_to: None,
        }
    }

    pub fn invalidating(mut self, scopes: impl IntoIterator<Item = KeyScope>) -> Self {
        self.invalidates.extend(scopes);
        self
    }

    pub fn navigating_to(mut self, route: impl Into<String>) -> Self {
        self.navigate_to = Some(Navigation::to(route));
        self
    }
}

/// Result of a successful mutation.
#[derive(Debug, Clone)]
pub struct MutationOutcome {
    pub response: ActionResponse,
    pub notification: Notification,
    /// Cached reads that were marked stale
    pub invalidated: Vec<QueryKey>,
    pub navigate_to: Option<Navigation>,
}

/// Runs mutations, refusing to start while one is already in flight.
#[derive(Debug, Clone, Default)]
pub struct ActionMutation {
    in_flight: Arc<AtomicBool>,
}

struct InFlightGuard<'a>(&'a AtomicBool);

impl Drop for InFlightGuard<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

impl ActionMutation {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_in_flight(&self) -> bool {
        self.in_flight.load(Ordering::Acquire)
    }

    /// Perform exactly one backend call for `spec`.
    ///
    /// On success every scope in `spec.invalidates` is invalidated before
    /// returning. Failures are returned as errors; use
    /// [`MutationMessages::for_error`] for the matching notification.
    pub async fn run(
        &self,
        client: &CatalogClient,
        cache: &QueryCache,
        spec: &MutationSpec,
    ) -> Result<MutationOutcome> {
        if self
            .in_flight
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .is_err()
        {
            return Err(CatalogError::MutationInFlight);
        }
        let _guard = InFlightGuard(&self.in_flight);

        let endpoint = spec.request.endpoint();
        match client.action(spec.request.clone()).await {
            Ok(response) => {
                let invalidated: Vec<QueryKey> = spec
                    .invalidates
                    .iter()
                    .flat_map(|scope| cache.invalidate(scope))
                    .collect();
                let notification = spec.messages.for_success(&response);
                info!(
                    endpoint = %endpoint,
                    invalidated = invalidated.len(),
                    "{}",
                    notification.message
                );
                Ok(MutationOutcome {
                    response,
                    notification,
                    invalidated,
                    navigate_to: spec.navigate_to.clone(),
                })
            }
            Err(err) => {
                warn!(endpoint = %endpoint, error = %err, "mutation failed");
                Err(err)
            }
        }
    }
}
