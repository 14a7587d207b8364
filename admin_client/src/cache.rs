//! Remote data cache.
//!
//! Entries are addressed by a [`QueryKey`] and hold the last value a fetcher
//! produced for that key. Concurrent readers of one key share a single
//! in-flight request. Mutations mark entries stale by key prefix, and the next
//! read of a stale entry refetches while the old value stays readable via
//! [`QueryCache::peek`].

use std::any::Any;
use std::fmt;
use std::future::Future;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;

use dashmap::DashMap;
use futures::future::{BoxFuture, FutureExt, Shared};
use tokio::sync::broadcast::{self, error::RecvError};
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::Instant;
use tracing::debug;

use crate::error::{AdminError, AdminResult};

pub type CachedValue = Arc<dyn Any + Send + Sync>;
type InFlight = Shared<BoxFuture<'static, AdminResult<CachedValue>>>;

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct QueryKey(Vec<String>);

impl QueryKey {
    pub fn new(resource: &str) -> Self {
        QueryKey(vec![resource.to_string()])
    }

    pub fn with(mut self, part: impl ToString) -> Self {
        self.0.push(part.to_string());
        self
    }

    pub fn resource(&self) -> &str {
        &self.0[0]
    }

    pub fn parts(&self) -> &[String] {
        &self.0
    }

    pub fn starts_with(&self, prefix: &QueryKey) -> bool {
        self.0.len() >= prefix.0.len() && self.0.iter().zip(&prefix.0).all(|(a, b)| a == b)
    }
}

impl fmt::Display for QueryKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}]", self.0.join(", "))
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum CacheEvent {
    Updated(QueryKey),
    Invalidated(QueryKey),
}

#[derive(Default)]
struct Entry {
    value: Option<CachedValue>,
    fetched_at: Option<Instant>,
    stale: bool,
    error: Option<AdminError>,
    in_flight: Option<(u64, InFlight)>,
}

struct CacheInner {
    entries: DashMap<QueryKey, Entry>,
    tickets: AtomicU64,
    stale_time: Option<Duration>,
    events: broadcast::Sender<CacheEvent>,
}

#[derive(Clone)]
pub struct QueryCache {
    inner: Arc<CacheInner>,
}

impl Default for QueryCache {
    fn default() -> Self {
        Self::new(None)
    }
}

impl QueryCache {
    pub fn new(stale_time: Option<Duration>) -> Self {
        let (events, _) = broadcast::channel(64);
        Self {
            inner: Arc::new(CacheInner {
                entries: DashMap::new(),
                tickets: AtomicU64::new(0),
                stale_time,
                events,
            }),
        }
    }

    /// Returns the fresh cached value for `key`, joins the request already in
    /// flight for it, or starts `fetcher`. Only the request that is current for
    /// the key when it resolves gets stored.
    pub async fn query<T, F, Fut>(&self, key: &QueryKey, fetcher: F) -> AdminResult<Arc<T>>
    where
        T: Send + Sync + 'static,
        F: FnOnce() -> Fut,
        Fut: Future<Output = AdminResult<T>> + Send + 'static,
    {
        let (ticket, pending) = {
            let mut entry = self.inner.entries.entry(key.clone()).or_default();
            if let Some(value) = self.fresh_value(&entry) {
                debug!("cache hit {}", key);
                return downcast(key, value);
            }
            match &entry.in_flight {
                Some((ticket, pending)) => {
                    debug!("joining in-flight request for {}", key);
                    (*ticket, pending.clone())
                }
                None => {
                    debug!("cache miss {}", key);
                    let ticket = self.inner.tickets.fetch_add(1, Ordering::Relaxed);
                    let pending = fetcher()
                        .map(|result| result.map(|v| Arc::new(v) as CachedValue))
                        .boxed()
                        .shared();
                    entry.in_flight = Some((ticket, pending.clone()));
                    (ticket, pending)
                }
            }
        };

        let result = pending.await;
        self.settle(key, ticket, &result);
        downcast(key, result?)
    }

    /// Last stored value for `key`, stale or not.
    pub fn peek<T: Send + Sync + 'static>(&self, key: &QueryKey) -> Option<Arc<T>> {
        let value = self.inner.entries.get(key)?.value.clone()?;
        value.downcast::<T>().ok()
    }

    /// Error from the most recent failed fetch of `key`, cleared by the next success.
    pub fn last_error(&self, key: &QueryKey) -> Option<AdminError> {
        self.inner.entries.get(key)?.error.clone()
    }

    /// Keys whose most recent fetch failed with an error matching `pred`.
    pub fn failed_keys(&self, pred: impl Fn(&AdminError) -> bool) -> Vec<QueryKey> {
        self.inner
            .entries
            .iter()
            .filter(|entry| entry.error.as_ref().is_some_and(&pred))
            .map(|entry| entry.key().clone())
            .collect()
    }

    /// True when a read of `key` would go to the network.
    pub fn is_stale(&self, key: &QueryKey) -> bool {
        self.inner
            .entries
            .get(key)
            .map_or(true, |entry| self.fresh_value(&entry).is_none())
    }

    pub fn is_fetching(&self, key: &QueryKey) -> bool {
        self.inner
            .entries
            .get(key)
            .is_some_and(|entry| entry.in_flight.is_some())
    }

    /// Marks every entry under `prefix` stale and forgets its in-flight request,
    /// so a response that started before the invalidation is never stored.
    pub fn invalidate(&self, prefix: &QueryKey) -> usize {
        let mut touched = Vec::new();
        for mut entry in self.inner.entries.iter_mut() {
            if entry.key().starts_with(prefix) {
                entry.stale = true;
                entry.in_flight = None;
                touched.push(entry.key().clone());
            }
        }
        debug!("invalidated {} entries under {}", touched.len(), prefix);
        let count = touched.len();
        for key in touched {
            let _ = self.inner.events.send(CacheEvent::Invalidated(key));
        }
        count
    }

    pub fn clear(&self) {
        self.inner.entries.clear();
        debug!("cache cleared");
    }

    pub fn subscribe(&self) -> broadcast::Receiver<CacheEvent> {
        self.inner.events.subscribe()
    }

    fn fresh_value(&self, entry: &Entry) -> Option<CachedValue> {
        if entry.stale {
            return None;
        }
        if let (Some(ttl), Some(at)) = (self.inner.stale_time, entry.fetched_at) {
            if at.elapsed() >= ttl {
                return None;
            }
        }
        entry.value.clone()
    }

    fn settle(&self, key: &QueryKey, ticket: u64, result: &AdminResult<CachedValue>) {
        {
            let Some(mut entry) = self.inner.entries.get_mut(key) else {
                return;
            };
            // Another waiter already stored it, or the request was invalidated.
            if !matches!(&entry.in_flight, Some((current, _)) if *current == ticket) {
                return;
            }
            entry.in_flight = None;
            match result {
                Ok(value) => {
                    entry.value = Some(value.clone());
                    entry.fetched_at = Some(Instant::now());
                    entry.stale = false;
                    entry.error = None;
                }
                Err(e) => entry.error = Some(e.clone()),
            }
        }
        let _ = self.inner.events.send(CacheEvent::Updated(key.clone()));
    }
}

fn downcast<T: Send + Sync + 'static>(key: &QueryKey, value: CachedValue) -> AdminResult<Arc<T>> {
    value.downcast::<T>().map_err(|_| AdminError::Decode {
        endpoint: key.to_string(),
        reason: "cached value has a different type".to_string(),
    })
}

/// Snapshot handed to renderers.
#[derive(Debug)]
pub struct QueryState<T> {
    pub data: Option<Arc<T>>,
    /// No data to show yet for the current key.
    pub is_loading: bool,
    pub is_fetching: bool,
    pub error: Option<String>,
}

impl<T> QueryState<T> {
    pub fn is_error(&self) -> bool {
        self.error.is_some()
    }
}

impl<T> Clone for QueryState<T> {
    fn clone(&self) -> Self {
        Self {
            data: self.data.clone(),
            is_loading: self.is_loading,
            is_fetching: self.is_fetching,
            error: self.error.clone(),
        }
    }
}

type Refetch<T> = Arc<dyn Fn() -> BoxFuture<'static, AdminResult<T>> + Send + Sync>;

/// Background task that refetches a mounted observer's key; aborted with it.
struct WatchTask(JoinHandle<()>);

impl Drop for WatchTask {
    fn drop(&mut self) {
        self.0.abort();
    }
}

struct ObserverState<T> {
    key: Option<QueryKey>,
    data: Option<Arc<T>>,
    fetching: bool,
    error: Option<String>,
    /// Sequence number of the most recent `fetch`; older responses are dropped.
    latest: u64,
    refetch: Option<(QueryKey, Refetch<T>)>,
    watcher: Option<WatchTask>,
    revision: watch::Sender<u64>,
}

impl<T> ObserverState<T> {
    fn snapshot(&self) -> QueryState<T> {
        QueryState {
            data: self.data.clone(),
            is_loading: self.data.is_none() && self.error.is_none(),
            is_fetching: self.fetching,
            error: self.error.clone(),
        }
    }
}

/// Binds one view to whichever key it currently shows.
///
/// Keeps the previous value visible while the same key refetches, drops to
/// loading when the key changes, and only applies the response of its most
/// recent request. A [`mount`](Self::mount)ed observer also refetches on its
/// own when its key is invalidated.
pub struct QueryObserver<T> {
    cache: QueryCache,
    state: Arc<Mutex<ObserverState<T>>>,
}

impl<T> Clone for QueryObserver<T> {
    fn clone(&self) -> Self {
        Self {
            cache: self.cache.clone(),
            state: self.state.clone(),
        }
    }
}

impl<T: Send + Sync + 'static> QueryObserver<T> {
    pub fn new(cache: QueryCache) -> Self {
        let (revision, _) = watch::channel(0);
        Self {
            cache,
            state: Arc::new(Mutex::new(ObserverState {
                key: None,
                data: None,
                fetching: false,
                error: None,
                latest: 0,
                refetch: None,
                watcher: None,
                revision,
            })),
        }
    }

    pub fn key(&self) -> Option<QueryKey> {
        self.lock().key.clone()
    }

    pub fn state(&self) -> QueryState<T> {
        self.lock().snapshot()
    }

    /// Ticks every time a response is applied to this observer.
    pub fn updates(&self) -> watch::Receiver<u64> {
        self.lock().revision.subscribe()
    }

    /// True when the shown key was invalidated (or never loaded).
    pub fn needs_refetch(&self) -> bool {
        match self.key() {
            Some(key) => self.cache.is_stale(&key),
            None => true,
        }
    }

    /// Fetches `key` and keeps `fetcher` around so that an invalidation of
    /// `key` refetches it in the background while this observer is alive.
    pub async fn mount<F, Fut>(&self, key: QueryKey, fetcher: F) -> QueryState<T>
    where
        F: Fn() -> Fut + Send + Sync + 'static,
        Fut: Future<Output = AdminResult<T>> + Send + 'static,
    {
        let refetch: Refetch<T> = Arc::new(move || fetcher().boxed());
        {
            let mut state = self.lock();
            state.refetch = Some((key.clone(), refetch.clone()));
            if state.watcher.is_none() {
                state.watcher = Some(self.spawn_watcher());
            }
        }
        self.fetch(key, move || (*refetch)()).await
    }

    pub async fn fetch<F, Fut>(&self, key: QueryKey, fetcher: F) -> QueryState<T>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = AdminResult<T>> + Send + 'static,
    {
        let request = {
            let mut state = self.lock();
            if state.key.as_ref() != Some(&key) {
                state.data = self.cache.peek::<T>(&key);
                state.error = None;
                state.key = Some(key.clone());
            }
            state.fetching = true;
            state.latest += 1;
            state.latest
        };

        let result = self.cache.query(&key, fetcher).await;

        let mut state = self.lock();
        if state.latest != request {
            debug!("dropping superseded response for {}", key);
            return state.snapshot();
        }
        state.fetching = false;
        match result {
            Ok(data) => {
                state.data = Some(data);
                state.error = None;
            }
            Err(e) => state.error = Some(e.to_string()),
        }
        state.revision.send_modify(|n| *n += 1);
        state.snapshot()
    }

    fn spawn_watcher(&self) -> WatchTask {
        let mut events = self.cache.subscribe();
        let cache = self.cache.clone();
        let weak = Arc::downgrade(&self.state);
        WatchTask(tokio::spawn(async move {
            loop {
                let invalidated = match events.recv().await {
                    Ok(CacheEvent::Invalidated(key)) => Some(key),
                    Ok(CacheEvent::Updated(_)) => continue,
                    Err(RecvError::Lagged(skipped)) => {
                        debug!("observer missed {} cache events", skipped);
                        None
                    }
                    Err(RecvError::Closed) => break,
                };
                let Some(state) = weak.upgrade() else {
                    break;
                };
                let observer = QueryObserver {
                    cache: cache.clone(),
                    state,
                };
                let current = observer.lock().refetch.clone();
                let Some((key, refetch)) = current else {
                    continue;
                };
                let hit = match invalidated {
                    Some(invalidated) => invalidated == key,
                    None => observer.cache.is_stale(&key),
                };
                if hit {
                    debug!("refetching invalidated {}", key);
                    observer.fetch(key, move || (*refetch)()).await;
                }
            }
        }))
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, ObserverState<T>> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
