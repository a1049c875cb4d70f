//! Request cache with in-flight coalescing
//!
//! Each key is either empty, pending (one shared fetch every caller awaits)
//! or ready (a stored value). Failed fetches leave the key empty so the next
//! read retries. A generation counter keeps a fetch that was invalidated while
//! in flight from repopulating its key; it still answers its own waiters.

use std::collections::HashMap;
use std::future::Future;
use std::hash::Hash;

use actasti_domain::Result;
use futures::future::{BoxFuture, FutureExt, Shared};
use parking_lot::Mutex;
use tracing::debug;

type SharedFetch<V> = Shared<BoxFuture<'static, Result<V>>>;

enum Slot<V: Clone> {
    Pending { generation: u64, fetch: SharedFetch<V> },
    Ready(V),
}

struct Inner<K, V: Clone> {
    slots: HashMap<K, Slot<V>>,
    next_generation: u64,
}

/// Observable state of one cache key
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CacheState {
    Empty,
    Pending,
    Ready,
}

/// Keyed cache coalescing concurrent reads into a single fetch
pub struct RequestCache<K, V: Clone> {
    name: &'static str,
    inner: Mutex<Inner<K, V>>,
}

impl<K, V> RequestCache<K, V>
where
    K: Eq + Hash + Clone + std::fmt::Debug,
    V: Clone + Send + Sync + 'static,
{
    pub fn new(name: &'static str) -> Self {
        Self { name, inner: Mutex::new(Inner { slots: HashMap::new(), next_generation: 0 }) }
    }

    /// Return the stored value, join the in-flight fetch, or start one.
    ///
    /// `fetch` is only invoked when the key is empty.
    ///
    /// # Errors
    ///
    /// Returns the fetch error; the key is left empty afterwards.
    pub async fn get_or_fetch<F, Fut>(&self, key: K, fetch: F) -> Result<V>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<V>> + Send + 'static,
    {
        let (generation, shared) = {
            let mut inner = self.inner.lock();
            match inner.slots.get(&key) {
                Some(Slot::Ready(value)) => {
                    debug!(cache = self.name, key = ?key, "Cache hit");
                    return Ok(value.clone());
                }
                Some(Slot::Pending { generation, fetch }) => {
                    debug!(cache = self.name, key = ?key, "Joining in-flight request");
                    (*generation, fetch.clone())
                }
                None => {
                    inner.next_generation += 1;
                    let generation = inner.next_generation;
                    let shared = fetch().boxed().shared();
                    inner
                        .slots
                        .insert(key.clone(), Slot::Pending { generation, fetch: shared.clone() });
                    debug!(cache = self.name, key = ?key, "Cache miss, fetching");
                    (generation, shared)
                }
            }
        };

        let result = shared.await;

        let mut inner = self.inner.lock();
        let current = matches!(
            inner.slots.get(&key),
            Some(Slot::Pending { generation: g, .. }) if *g == generation
        );
        if current {
            match &result {
                Ok(value) => {
                    inner.slots.insert(key, Slot::Ready(value.clone()));
                }
                Err(err) => {
                    debug!(cache = self.name, key = ?key, error = %err, "Fetch failed, clearing key");
                    inner.slots.remove(&key);
                }
            }
        }
        result
    }

    /// Stored value, without fetching.
    pub fn peek(&self, key: &K) -> Option<V> {
        match self.inner.lock().slots.get(key) {
            Some(Slot::Ready(value)) => Some(value.clone()),
            _ => None,
        }
    }

    pub fn state(&self, key: &K) -> CacheState {
        match self.inner.lock().slots.get(key) {
            None => CacheState::Empty,
            Some(Slot::Pending { .. }) => CacheState::Pending,
            Some(Slot::Ready(_)) => CacheState::Ready,
        }
    }

    /// Drop one key; an in-flight fetch for it will not repopulate the cache.
    pub fn invalidate(&self, key: &K) {
        if self.inner.lock().slots.remove(key).is_some() {
            debug!(cache = self.name, key = ?key, "Invalidated");
        }
    }

    pub fn invalidate_all(&self) {
        let mut inner = self.inner.lock();
        let dropped = inner.slots.len();
        inner.slots.clear();
        debug!(cache = self.name, dropped, "Invalidated all keys");
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    use actasti_domain::ActasError;
    use tokio::sync::oneshot;

    use super::*;

    fn counting_fetch(
        calls: &Arc<AtomicUsize>,
        result: Result<u32>,
    ) -> impl FnOnce() -> futures::future::Ready<Result<u32>> {
        let calls = Arc::clone(calls);
        move || {
            calls.fetch_add(1, Ordering::SeqCst);
            futures::future::ready(result)
        }
    }

    #[tokio::test]
    async fn ready_values_are_served_without_fetching() {
        let cache = RequestCache::new("test");
        let calls = Arc::new(AtomicUsize::new(0));

        assert_eq!(cache.get_or_fetch("k", counting_fetch(&calls, Ok(1))).await.unwrap(), 1);
        assert_eq!(cache.get_or_fetch("k", counting_fetch(&calls, Ok(2))).await.unwrap(), 1);
        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert_eq!(cache.state(&"k"), CacheState::Ready);
        assert_eq!(cache.peek(&"k"), Some(1));
    }

    #[tokio::test]
    async fn concurrent_reads_share_one_fetch() {
        let cache = RequestCache::new("test");
        let calls = Arc::new(AtomicUsize::new(0));
        let (tx, rx) = oneshot::channel::<u32>();

        let first_calls = Arc::clone(&calls);
        let first = cache.get_or_fetch("k", move || {
            first_calls.fetch_add(1, Ordering::SeqCst);
            async move { rx.await.map_err(|e| ActasError::Internal(e.to_string())) }
        });
        let second = cache.get_or_fetch("k", counting_fetch(&calls, Ok(99)));
        let release = async {
            tokio::task::yield_now().await;
            assert_eq!(cache.state(&"k"), CacheState::Pending);
            tx.send(7).unwrap();
        };

        let (a, b, ()) = tokio::join!(first, second, release);
        assert_eq!(a.unwrap(), 7);
        assert_eq!(b.unwrap(), 7);
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn pending_fetch_is_visible_until_resolved() {
        let cache = RequestCache::new("test");
        let (tx, rx) = oneshot::channel::<u32>();

        let mut read = tokio_test::task::spawn(cache.get_or_fetch("k", move || async move {
            rx.await.map_err(|e| ActasError::Internal(e.to_string()))
        }));
        tokio_test::assert_pending!(read.poll());
        assert_eq!(cache.state(&"k"), CacheState::Pending);
        assert_eq!(cache.peek(&"k"), None);

        tx.send(4).unwrap();
        assert!(read.is_woken());
        assert_eq!(tokio_test::assert_ready!(read.poll()).unwrap(), 4);
        assert_eq!(cache.state(&"k"), CacheState::Ready);
    }

    #[tokio::test]
    async fn failures_clear_the_key() {
        let cache = RequestCache::new("test");
        let calls = Arc::new(AtomicUsize::new(0));

        let err = cache
            .get_or_fetch("k", counting_fetch(&calls, Err(ActasError::Network("down".into()))))
            .await
            .unwrap_err();
        assert!(matches!(err, ActasError::Network(_)));
        assert_eq!(cache.state(&"k"), CacheState::Empty);

        assert_eq!(cache.get_or_fetch("k", counting_fetch(&calls, Ok(3))).await.unwrap(), 3);
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn invalidation_forces_a_refetch() {
        let cache = RequestCache::new("test");
        let calls = Arc::new(AtomicUsize::new(0));

        cache.get_or_fetch("a", counting_fetch(&calls, Ok(1))).await.unwrap();
        cache.get_or_fetch("b", counting_fetch(&calls, Ok(1))).await.unwrap();
        cache.invalidate(&"a");
        assert_eq!(cache.state(&"a"), CacheState::Empty);
        assert_eq!(cache.state(&"b"), CacheState::Ready);

        cache.invalidate_all();
        assert_eq!(cache.get_or_fetch("b", counting_fetch(&calls, Ok(2))).await.unwrap(), 2);
        assert_eq!(calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn invalidated_in_flight_fetch_does_not_repopulate() {
        let cache = RequestCache::new("test");
        let (tx, rx) = oneshot::channel::<u32>();

        let pending = cache.get_or_fetch("k", move || async move {
            rx.await.map_err(|e| ActasError::Internal(e.to_string()))
        });
        let invalidate = async {
            tokio::task::yield_now().await;
            cache.invalidate(&"k");
            tx.send(5).unwrap();
        };

        let (value, ()) = tokio::join!(pending, invalidate);
        assert_eq!(value.unwrap(), 5);
        assert_eq!(cache.state(&"k"), CacheState::Empty);
    }
}
