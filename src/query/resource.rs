use std::sync::Arc;

use serde::de::DeserializeOwned;
use tracing::debug;

use catalog_schema::Page;

use crate::api::CatalogClient;
use crate::error::{CatalogError, Result};

use super::cache::QueryCache;
use super::key::{KeyScope, ListInputs, QueryKey};

/// Permission to apply one fetch result to a [`ResourceQuery`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchTicket {
    pub key: QueryKey,
    generation: u64,
}

impl FetchTicket {
    pub fn generation(&self) -> u64 {
        self.generation
    }
}

/// What a view renders for one query.
#[derive(Debug)]
pub struct QueryState<D> {
    pub data: Option<Arc<D>>,
    pub is_loading: bool,
    pub error: Option<Arc<CatalogError>>,
}

impl<D> Default for QueryState<D> {
    fn default() -> Self {
        Self {
            data: None,
            is_loading: false,
            error: None,
        }
    }
}

impl<D> Clone for QueryState<D> {
    fn clone(&self) -> Self {
        Self {
            data: self.data.clone(),
            is_loading: self.is_loading,
            error: self.error.clone(),
        }
    }
}

impl<T> QueryState<Page<T>> {
    /// Rows of the current page; empty while loading or after an error.
    pub fn rows(&self) -> &[T] {
        self.data
            .as_deref()
            .map(|page| page.results.as_slice())
            .unwrap_or(&[])
    }

    /// Server-side total, zero when nothing has loaded.
    pub fn count(&self) -> u64 {
        self.data.as_deref().map(|page| page.count).unwrap_or(0)
    }
}

/// The query instance owned by one view.
///
/// Every input change hands out a new [`FetchTicket`]; only the most recent
/// ticket may update the state, and nothing does once the view is unmounted.
#[derive(Debug)]
pub struct ResourceQuery<D> {
    key: Option<QueryKey>,
    generation: u64,
    mounted: bool,
    state: QueryState<D>,
}

impl<D> Default for ResourceQuery<D> {
    fn default() -> Self {
        Self {
            key: None,
            generation: 0,
            mounted: true,
            state: QueryState::default(),
        }
    }
}

impl<D> ResourceQuery<D> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn key(&self) -> Option<&QueryKey> {
        self.key.as_ref()
    }

    pub fn state(&self) -> &QueryState<D> {
        &self.state
    }

    pub fn is_mounted(&self) -> bool {
        self.mounted
    }

    /// Point the query at a list read. Returns a ticket only when the key
    /// actually changed.
    pub fn set_inputs(&mut self, inputs: &ListInputs) -> Option<FetchTicket> {
        self.set_key(inputs.key())
    }

    /// Point the query at an arbitrary read.
    pub fn set_key(&mut self, key: QueryKey) -> Option<FetchTicket> {
        if !self.mounted || self.key.as_ref() == Some(&key) {
            return None;
        }
        self.key = Some(key.clone());
        self.state.data = None;
        self.state.error = None;
        Some(self.issue(key))
    }

    /// Re-issue the current read, e.g. after its cache entry was invalidated.
    /// Data already shown stays visible until the new result lands.
    pub fn refetch(&mut self) -> Option<FetchTicket> {
        if !self.mounted {
            return None;
        }
        let key = self.key.clone()?;
        Some(self.issue(key))
    }

    fn issue(&mut self, key: QueryKey) -> FetchTicket {
        self.generation += 1;
        self.state.is_loading = true;
        FetchTicket {
            key,
            generation: self.generation,
        }
    }

    /// Apply a fetch result. Returns `false` when the ticket was superseded
    /// or the view has unmounted, in which case the state is untouched.
    pub fn resolve(
        &mut self,
        ticket: &FetchTicket,
        result: std::result::Result<Arc<D>, Arc<CatalogError>>,
    ) -> bool {
        if !self.mounted {
            debug!(key = %ticket.key, "dropping response for unmounted query");
            return false;
        }
        if ticket.generation != self.generation {
            debug!(
                key = %ticket.key,
                ticket = ticket.generation,
                latest = self.generation,
                "discarding stale response"
            );
            return false;
        }

        self.state.is_loading = false;
        match result {
            Ok(data) => {
                self.state.data = Some(data);
                self.state.error = None;
            }
            Err(err) => {
                self.state.data = None;
                self.state.error = Some(err);
            }
        }
        true
    }

    /// Stop applying results; pending tickets become no-ops.
    pub fn unmount(&mut self) {
        self.mounted = false;
        self.state.is_loading = false;
    }
}

/// Execute a list ticket through the cache.
pub async fn load_page<T>(
    client: &CatalogClient,
    cache: &QueryCache,
    ticket: &FetchTicket,
) -> std::result::Result<Arc<Page<T>>, Arc<CatalogError>>
where
    T: DeserializeOwned + Send + Sync + 'static,
{
    load(cache, ticket, {
        let client = client.clone();
        let key = ticket.key.clone();
        move || async move { client.get_page::<T>(&key).await }
    })
    .await
}

/// Like [`load_page`], but drops the cached copy first so the page is read
/// from the server again.
pub async fn reload_page<T>(
    client: &CatalogClient,
    cache: &QueryCache,
    ticket: &FetchTicket,
) -> std::result::Result<Arc<Page<T>>, Arc<CatalogError>>
where
    T: DeserializeOwned + Send + Sync + 'static,
{
    cache.invalidate(&KeyScope::Exact(ticket.key.clone()));
    load_page(client, cache, ticket).await
}

/// Execute a ticket through the cache with a custom fetcher.
pub async fn load<D, F, Fut>(
    cache: &QueryCache,
    ticket: &FetchTicket,
    fetcher: F,
) -> std::result::Result<Arc<D>, Arc<CatalogError>>
where
    D: Send + Sync + 'static,
    F: FnOnce() -> Fut,
    Fut: std::future::Future<Output = Result<D>> + Send + 'static,
{
    cache
        .fetch(ticket.key.clone(), fetcher)
        .await
        .map_err(shared_error)
}

/// Unwrap errors that came out of a shared fetch so they are not double
/// wrapped.
fn shared_error(err: CatalogError) -> Arc<CatalogError> {
    match err {
        CatalogError::Query(inner) => inner,
        other => Arc::new(other),
    }
}
