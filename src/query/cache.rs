use std::any::Any;
use std::collections::HashMap;
use std::future::Future;
use std::sync::Arc;

use futures::FutureExt;
use futures::future::{BoxFuture, Shared};
use parking_lot::Mutex;
use tracing::trace;

use crate::error::{CatalogError, Result};

use super::key::{KeyScope, QueryKey};

type CachedValue = Arc<dyn Any + Send + Sync>;
type FetchOutcome = std::result::Result<CachedValue, Arc<CatalogError>>;
type SharedFetch = Shared<BoxFuture<'static, FetchOutcome>>;

struct InFlight {
    id: u64,
    fetch: SharedFetch,
}

/// Entries kept before the least recently read ones are dropped
pub const DEFAULT_CAPACITY: usize = 64;

#[derive(Default)]
struct Entry {
    value: Option<CachedValue>,
    stale: bool,
    in_flight: Option<InFlight>,
    /// Value of [`Inner::clock`] at the last read
    last_used: u64,
}

struct Inner {
    entries: HashMap<QueryKey, Entry>,
    next_flight: u64,
    clock: u64,
    capacity: usize,
}

impl Default for Inner {
    fn default() -> Self {
        Self {
            entries: HashMap::new(),
            next_flight: 0,
            clock: 0,
            capacity: DEFAULT_CAPACITY,
        }
    }
}

impl Inner {
    /// Drop the least recently read entries until the map fits. Entries with
    /// a request in flight are kept, and so is `keep`.
    fn evict(&mut self, keep: &QueryKey) {
        while self.entries.len() > self.capacity {
            let oldest = self
                .entries
                .iter()
                .filter(|(key, entry)| *key != keep && entry.in_flight.is_none())
                .min_by_key(|(_, entry)| entry.last_used)
                .map(|(key, _)| key.clone());
            let Some(oldest) = oldest else {
                break;
            };
            trace!(key = %oldest, "evicting query");
            self.entries.remove(&oldest);
        }
    }
}

enum Plan {
    Hit(CachedValue),
    Await { id: u64, fetch: SharedFetch },
}

/// Shared read cache keyed by [`QueryKey`].
///
/// At most one request per key is in flight; concurrent readers of the same
/// key join it. Invalidation marks entries stale and detaches their pending
/// request, so a response that lands after the invalidation is handed to its
/// waiters but never stored. At most `capacity` entries are kept; the least
/// recently read one goes first.
#[derive(Clone, Default)]
pub struct QueryCache {
    inner: Arc<Mutex<Inner>>,
}

impl QueryCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(capacity: usize) -> Self {
        let inner = Inner {
            capacity: capacity.max(1),
            ..Inner::default()
        };
        Self {
            inner: Arc::new(Mutex::new(inner)),
        }
    }

    /// Return the fresh cached value for `key`, join the request already in
    /// flight for it, or start one with `fetcher`.
    pub async fn fetch<T, F, Fut>(&self, key: QueryKey, fetcher: F) -> Result<Arc<T>>
    where
        T: Send + Sync + 'static,
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<T>> + Send + 'static,
    {
        let plan = {
            let mut guard = self.inner.lock();
            let inner = &mut *guard;
            inner.clock += 1;
            let now = inner.clock;
            let next_id = inner.next_flight;
            let entry = inner.entries.entry(key.clone()).or_default();
            entry.last_used = now;

            let plan = if let (Some(value), false) = (&entry.value, entry.stale) {
                trace!(key = %key, "query cache hit");
                Plan::Hit(value.clone())
            } else if let Some(flight) = &entry.in_flight {
                trace!(key = %key, "joining in-flight query");
                Plan::Await {
                    id: flight.id,
                    fetch: flight.fetch.clone(),
                }
            } else {
                let fetch = fetcher()
                    .map(|result| {
                        result
                            .map(|value| Arc::new(value) as CachedValue)
                            .map_err(Arc::new)
                    })
                    .boxed()
                    .shared();
                entry.in_flight = Some(InFlight {
                    id: next_id,
                    fetch: fetch.clone(),
                });
                inner.next_flight += 1;
                trace!(key = %key, "starting query");
                Plan::Await { id: next_id, fetch }
            };
            inner.evict(&key);
            plan
        };

        let value = match plan {
            Plan::Hit(value) => value,
            Plan::Await { id, fetch } => {
                let outcome = fetch.await;
                self.settle(&key, id, &outcome);
                outcome?
            }
        };

        value.downcast::<T>().map_err(|_| {
            CatalogError::Other(format!("cached value for {key} has an unexpected type"))
        })
    }

    /// Store the outcome of flight `id` if it is still attached to `key`.
    fn settle(&self, key: &QueryKey, id: u64, outcome: &FetchOutcome) {
        let mut inner = self.inner.lock();
        let Some(entry) = inner.entries.get_mut(key) else {
            return;
        };
        if entry.in_flight.as_ref().map(|flight| flight.id) != Some(id) {
            return;
        }
        entry.in_flight = None;
        if let Ok(value) = outcome {
            entry.value = Some(value.clone());
            entry.stale = false;
        }
    }

    /// Mark every entry in `scope` stale and detach its pending request.
    ///
    /// Returns the affected keys in order.
    pub fn invalidate(&self, scope: &KeyScope) -> Vec<QueryKey> {
        let mut inner = self.inner.lock();
        let mut keys: Vec<QueryKey> = inner
            .entries
            .iter_mut()
            .filter(|(key, _)| scope.matches(key))
            .map(|(key, entry)| {
                entry.stale = true;
                entry.in_flight = None;
                key.clone()
            })
            .collect();
        keys.sort();
        trace!(scope = %scope, affected = keys.len(), "invalidated queries");
        keys
    }

    /// Cached value for `key`, fresh or stale.
    pub fn peek<T: Send + Sync + 'static>(&self, key: &QueryKey) -> Option<Arc<T>> {
        let inner = self.inner.lock();
        let value = inner.entries.get(key)?.value.clone()?;
        value.downcast::<T>().ok()
    }

    pub fn is_stale(&self, key: &QueryKey) -> bool {
        self.inner
            .lock()
            .entries
            .get(key)
            .is_some_and(|entry| entry.stale)
    }

    pub fn is_in_flight(&self, key: &QueryKey) -> bool {
        self.inner
            .lock()
            .entries
            .get(key)
            .is_some_and(|entry| entry.in_flight.is_some())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use tokio::sync::oneshot;

    fn key(page: &str) -> QueryKey {
        QueryKey::new("/organisations/", [("offset", page)])
    }

    #[tokio::test]
    async fn test_fresh_value_is_served_from_cache() {
        let cache = QueryCache::new();
        let calls = Arc::new(AtomicUsize::new(0));

        for _ in 0..3 {
            let calls = calls.clone();
            let value = cache
                .fetch(key("0"), move || async move {
                    calls.fetch_add(1, Ordering::SeqCst);
                    Ok(42u32)
                })
                .await
                .unwrap();
            assert_eq!(*value, 42);
        }
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_concurrent_reads_share_one_request() {
        let cache = QueryCache::new();
        let calls = Arc::new(AtomicUsize::new(0));
        let (release, gate) = oneshot::channel::<()>();

        let first = {
            let calls = calls.clone();
            cache.fetch(key("0"), move || async move {
                calls.fetch_add(1, Ordering::SeqCst);
                let _ = gate.await;
                Ok(String::from("page"))
            })
        };
        let second = {
            let calls = calls.clone();
            cache.fetch(key("0"), move || async move {
                calls.fetch_add(1, Ordering::SeqCst);
                Ok(String::from("duplicate"))
            })
        };

        let (a, b, _) = tokio::join!(first, second, async move {
            let _ = release.send(());
        });
        assert_eq!(a.unwrap().as_str(), "page");
        assert_eq!(b.unwrap().as_str(), "page");
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_invalidate_forces_refetch() {
        let cache = QueryCache::new();
        cache.fetch(key("0"), || async { Ok(1u32) }).await.unwrap();
        cache.fetch(key("10"), || async { Ok(2u32) }).await.unwrap();

        let affected = cache.invalidate(&KeyScope::prefix("/organisations/"));
        assert_eq!(affected, vec![key("0"), key("10")]);
        assert!(cache.is_stale(&key("0")));

        let value = cache.fetch(key("0"), || async { Ok(5u32) }).await.unwrap();
        assert_eq!(*value, 5);
        assert!(!cache.is_stale(&key("0")));
    }

    #[tokio::test]
    async fn test_response_landing_after_invalidation_is_not_stored() {
        let cache = QueryCache::new();
        let (release, gate) = oneshot::channel::<()>();

        let pending = cache.fetch(key("0"), move || async move {
            let _ = gate.await;
            Ok(1u32)
        });
        let invalidate = async {
            tokio::task::yield_now().await;
            cache.invalidate(&KeyScope::Exact(key("0")));
            let _ = release.send(());
        };
        let (value, _) = tokio::join!(pending, invalidate);
        assert_eq!(*value.unwrap(), 1);

        assert!(cache.peek::<u32>(&key("0")).is_none());
        assert!(!cache.is_in_flight(&key("0")));
    }

    #[tokio::test]
    async fn test_errors_are_shared_and_not_cached() {
        let cache = QueryCache::new();
        let err = cache
            .fetch::<u32, _, _>(key("0"), || async {
                Err(CatalogError::Other("boom".to_string()))
            })
            .await
            .unwrap_err();
        assert_eq!(err.to_string(), "boom");

        let value = cache.fetch(key("0"), || async { Ok(3u32) }).await.unwrap();
        assert_eq!(*value, 3);
    }

    #[tokio::test]
    async fn test_least_recently_read_entry_is_evicted() {
        let cache = QueryCache::with_capacity(2);
        cache.fetch(key("0"), || async { Ok(0u32) }).await.unwrap();
        cache.fetch(key("10"), || async { Ok(10u32) }).await.unwrap();
        // Reading "0" again leaves "10" as the oldest entry.
        cache.fetch(key("0"), || async { Ok(99u32) }).await.unwrap();
        cache.fetch(key("20"), || async { Ok(20u32) }).await.unwrap();

        assert_eq!(cache.peek::<u32>(&key("0")).as_deref(), Some(&0));
        assert!(cache.peek::<u32>(&key("10")).is_none());
        assert_eq!(cache.peek::<u32>(&key("20")).as_deref(), Some(&20));
    }

    #[tokio::test]
    async fn test_in_flight_entries_are_not_evicted() {
        let cache = QueryCache::with_capacity(1);
        let (release, gate) = oneshot::channel::<()>();

        let pending = cache.fetch(key("0"), move || async move {
            let _ = gate.await;
            Ok(1u32)
        });
        let other = async {
            tokio::task::yield_now().await;
            let value = cache.fetch(key("10"), || async { Ok(2u32) }).await.unwrap();
            let _ = release.send(());
            value
        };
        let (first, second) = tokio::join!(pending, other);
        assert_eq!(*first.unwrap(), 1);
        assert_eq!(*second, 2);
        assert_eq!(cache.peek::<u32>(&key("0")).as_deref(), Some(&1));
    }

    #[tokio::test]
    async fn test_type_mismatch_is_an_error() {
        let cache = QueryCache::new();
        cache.fetch(key("0"), || async { Ok(1u32) }).await.unwrap();
        let result = cache
            .fetch::<String, _, _>(key("0"), || async { Ok(String::new()) })
            .await;
        assert!(result.is_err());
    }
}
