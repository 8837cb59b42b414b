use std::any::Any;
use std::collections::HashMap;
use std::future::Future;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use foxhole_shared::models::Shard;
use futures::future::{BoxFuture, FutureExt, Shared};
use serde::Serialize;
use tracing::{debug, warn};

use crate::cache::{CacheKey, CacheStats, RequestCache};
use crate::clock::Clock;
use crate::error::{FetchError, FetchResult};

/// The one pending operation every caller for a key awaits.
type PendingFetch<T> = Shared<BoxFuture<'static, FetchResult<T>>>;

struct InFlight {
    id: u64,
    /// A `PendingFetch<T>` for the type the key's resource kind stores.
    pending: Box<dyn Any + Send>,
}

struct FetchState {
    cache: RequestCache,
    in_flight: HashMap<CacheKey, InFlight>,
    next_id: u64,
}

fn lock(state: &Mutex<FetchState>) -> MutexGuard<'_, FetchState> {
    state.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Get-or-fetch over a [`RequestCache`] with at most one fetch in flight per
/// key.
///
/// Cache and in-flight table share one mutex, which is never held across an
/// await. When a fetch settles its task writes the cache and drops the
/// in-flight record inside a single critical section, so a caller arriving
/// afterwards always sees the cached value.
#[derive(Clone)]
pub struct CachedFetcher {
    state: Arc<Mutex<FetchState>>,
}

impl CachedFetcher {
    pub fn new(clock: Arc<dyn Clock>) -> Self {
        CachedFetcher {
            state: Arc::new(Mutex::new(FetchState {
                cache: RequestCache::new(clock),
                in_flight: HashMap::new(),
                next_id: 0,
            })),
        }
    }

    /// Return the cached value for `key`, join the fetch already in flight
    /// for it, or start `producer` and cache its result for `ttl` (forever
    /// when `None`).
    ///
    /// Failures reach every waiter and are not cached. The producer runs on
    /// its own task and settles even if every caller stops waiting.
    ///
    /// `producer` is called with the fetcher's lock held, so it must only
    /// build the future. Anything that touches this fetcher (stats, eviction,
    /// another fetch) belongs inside the returned future.
    pub async fn get_or_fetch<T, F, Fut>(
        &self,
        key: CacheKey,
        ttl: Option<Duration>,
        producer: F,
    ) -> FetchResult<T>
    where
        T: Clone + Serialize + Send + Sync + 'static,
        F: FnOnce() -> Fut,
        Fut: Future<Output = FetchResult<T>> + Send + 'static,
    {
        let pending = {
            let mut state = lock(&self.state);
            match lookup::<T>(&mut state, &key) {
                Some(Lookup::Hit(hit)) => return Ok(hit),
                Some(Lookup::Pending(pending)) => pending,
                None => self.start(&mut state, key, ttl, producer()),
            }
        };
        pending.await
    }

    fn start<T, Fut>(
        &self,
        state: &mut FetchState,
        key: CacheKey,
        ttl: Option<Duration>,
        fetch: Fut,
    ) -> PendingFetch<T>
    where
        T: Clone + Serialize + Send + Sync + 'static,
        Fut: Future<Output = FetchResult<T>> + Send + 'static,
    {
        state.next_id += 1;
        let id = state.next_id;
        debug!(key = %key, "starting fetch");

        let task_state = Arc::clone(&self.state);
        let task_key = key.clone();
        let task = tokio::spawn(async move {
            let result = fetch.await;
            let mut state = lock(&task_state);
            match &result {
                Ok(data) => state.cache.set(task_key.clone(), data.clone(), ttl),
                Err(e) => warn!(key = %task_key, error = %e, "fetch failed"),
            }
            remove_in_flight(&mut state, &task_key, id);
            result
        });

        let join_state = Arc::clone(&self.state);
        let join_key = key.clone();
        let pending = async move {
            match task.await {
                Ok(result) => result,
                Err(e) => {
                    remove_in_flight(&mut lock(&join_state), &join_key, id);
                    Err(FetchError::Aborted {
                        key: join_key.to_string(),
                        message: e.to_string(),
                    })
                }
            }
        }
        .boxed()
        .shared();

        state.in_flight.insert(
            key,
            InFlight {
                id,
                pending: Box::new(pending.clone()),
            },
        );
        pending
    }

    /// Drop every cached entry and forget every in-flight fetch. Fetches
    /// already running still settle for their current waiters.
    pub fn clear_all(&self) {
        let mut state = lock(&self.state);
        state.cache.clear_all();
        state.in_flight.clear();
    }

    pub fn clear_shard(&self, shard: Shard) -> usize {
        lock(&self.state).cache.clear_shard(shard)
    }

    pub fn evict_where<F>(&self, predicate: F) -> usize
    where
        F: FnMut(&CacheKey) -> bool,
    {
        lock(&self.state).cache.evict_where(predicate)
    }

    pub fn sweep_expired(&self) -> usize {
        lock(&self.state).cache.sweep_expired()
    }

    pub fn stats(&self) -> CacheStats {
        let state = lock(&self.state);
        CacheStats {
            in_flight_requests: state.in_flight.len(),
            ..state.cache.stats()
        }
    }
}

enum Lookup<T> {
    Hit(T),
    Pending(PendingFetch<T>),
}

fn lookup<T>(state: &mut FetchState, key: &CacheKey) -> Option<Lookup<T>>
where
    T: Clone + Send + Sync + 'static,
{
    if let Some(hit) = state.cache.get::<T>(key) {
        debug!(key = %key, "cache hit");
        return Some(Lookup::Hit(hit));
    }
    let pending = state
        .in_flight
        .get(key)
        .and_then(|f| f.pending.downcast_ref::<PendingFetch<T>>())
        .cloned()?;
    debug!(key = %key, "joining in-flight fetch");
    Some(Lookup::Pending(pending))
}

/// Drop the in-flight record for `key` if it still belongs to fetch `id`; a
/// `clear_all` may have let a newer fetch take the slot.
fn remove_in_flight(state: &mut FetchState, key: &CacheKey, id: u64) {
    if state.in_flight.get(key).is_some_and(|f| f.id == id) {
        state.in_flight.remove(key);
    }
}
