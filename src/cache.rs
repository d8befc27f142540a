//! Read-through cache for catalog reads.
//!
//! One [`CollectionCache`] per collection (category, featured category,
//! product) is built at startup and shared by every worker of the process.
//! Reads check the cache first and populate it on a miss. Writes delete
//! `all_<collection>` before the handler responds.
//!
//! Entries are unbounded and, unless a TTL is configured, never expire.
//! There is no coordination between concurrent misses: both load, both
//! store, and the last write wins with an identical value.

use moka::future::Cache;
use std::fmt::Display;
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use crate::error::AppError;

/// String-keyed cache with explicit `get` / `set` / `delete`
#[derive(Clone)]
pub struct CacheStore<V> {
    entries: Cache<String, V>,
}

impl<V> CacheStore<V>
where
    V: Clone + Send + Sync + 'static,
{
    pub fn new(ttl: Option<Duration>) -> Self {
        let builder = Cache::<String, V>::builder();
        let entries = match ttl {
            Some(ttl) => builder.time_to_live(ttl).build(),
            None => builder.build(),
        };
        Self { entries }
    }

    pub async fn get(&self, key: &str) -> Option<V> {
        self.entries.get(key).await
    }

    pub async fn set(&self, key: impl Into<String>, value: V) {
        self.entries.insert(key.into(), value).await;
    }

    pub async fn delete(&self, key: &str) {
        self.entries.invalidate(key).await;
    }
}

/// What a collection cache can hold under one key
pub enum Cached<T> {
    All(Arc<Vec<T>>),
    One(Arc<T>),
}

impl<T> Clone for Cached<T> {
    fn clone(&self) -> Self {
        match self {
            Cached::All(items) => Cached::All(Arc::clone(items)),
            Cached::One(item) => Cached::One(Arc::clone(item)),
        }
    }
}

/// Read-through cache for a single entity collection
///
/// Keys are `all_<collection>` for the full listing and `<collection>-<id>`
/// for detail reads.
#[derive(Clone)]
pub struct CollectionCache<T> {
    collection: &'static str,
    store: CacheStore<Cached<T>>,
    invalidate_detail_on_write: bool,
}

impl<T> CollectionCache<T>
where
    T: Send + Sync + 'static,
{
    pub fn new(collection: &'static str, ttl: Option<Duration>) -> Self {
        Self {
            collection,
            store: CacheStore::new(ttl),
            invalidate_detail_on_write: false,
        }
    }

    /// Also drop the detail key of a record when it is updated or deleted
    pub fn with_detail_invalidation(mut self, enabled: bool) -> Self {
        self.invalidate_detail_on_write = enabled;
        self
    }

    pub fn all_key(&self) -> String {
        format!("all_{}", self.collection)
    }

    pub fn item_key(&self, id: impl Display) -> String {
        format!("{}-{}", self.collection, id)
    }

    /// Full listing, loaded from `load` on a miss
    pub async fn get_all<F, Fut>(&self, load: F) -> Result<Arc<Vec<T>>, AppError>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<Vec<T>, AppError>>,
    {
        let key = self.all_key();
        if let Some(Cached::All(items)) = self.store.get(&key).await {
            tracing::debug!(cache_key = %key, "Cache hit");
            return Ok(items);
        }

        tracing::debug!(cache_key = %key, "Cache miss");
        let items = Arc::new(load().await?);
        self.store.set(key, Cached::All(Arc::clone(&items))).await;
        Ok(items)
    }

    /// Single record, loaded from `load` on a miss
    ///
    /// # Errors
    /// `NotFound` when the loader finds nothing; the miss is not cached.
    pub async fn get_by_id<F, Fut>(
        &self,
        id: impl Display,
        load: F,
    ) -> Result<Arc<T>, AppError>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<Option<T>, AppError>>,
    {
        let key = self.item_key(id);
        if let Some(Cached::One(item)) = self.store.get(&key).await {
            tracing::debug!(cache_key = %key, "Cache hit");
            return Ok(item);
        }

        tracing::debug!(cache_key = %key, "Cache miss");
        let item = load()
            .await?
            .map(Arc::new)
            .ok_or_else(|| AppError::not_found(format!("{} not found", self.collection)))?;
        self.store.set(key, Cached::One(Arc::clone(&item))).await;
        Ok(item)
    }

    pub async fn invalidate_all(&self) {
        let key = self.all_key();
        tracing::debug!(cache_key = %key, "Cache invalidated");
        self.store.delete(&key).await;
    }

    pub async fn invalidate_item(&self, id: impl Display) {
        let key = self.item_key(id);
        tracing::debug!(cache_key = %key, "Cache invalidated");
        self.store.delete(&key).await;
    }

    /// Run after an update or delete of `id`
    ///
    /// Always drops the listing. The detail entry is only dropped when
    /// detail invalidation is enabled; otherwise it keeps serving the
    /// pre-write value.
    pub async fn invalidate_after_write(&self, id: impl Display) {
        self.invalidate_all().await;
        if self.invalidate_detail_on_write {
            self.invalidate_item(id).await;
        }
    }
}
