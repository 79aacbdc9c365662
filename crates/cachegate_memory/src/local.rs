// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

//! Bounded local map adapter backed by moka.

use std::any::Any;
use std::hash::Hash;

use cachegate_tier::{Cache, CacheEntry, Error};
use moka::future::Cache as MokaCache;

use crate::builder::LocalCacheBuilder;

/// A single-process, size- and time-bounded map adapter.
///
/// Entries live in this process only; there is no cross-node replication.
/// Cloning a `LocalCache` is cheap and every clone shares the same storage,
/// which is how the cache resource hands out one map per cache name across
/// repeated lookups.
///
/// # Per-entry TTL
///
/// `put` ignores the per-entry TTL override: the engine's TTL/TTI bounds are
/// fixed when the map is built and apply uniformly to every entry.
///
/// # Examples
///
/// ```
/// use cachegate_memory::LocalCache;
/// use cachegate_tier::{Cache, CacheEntry};
/// # futures::executor::block_on(async {
///
/// let cache = LocalCache::<String, i32>::builder("cache-resources_products").max_capacity(200).build();
///
/// cache.put(&"key".to_string(), CacheEntry::new(42)).await?;
/// let value = cache.get(&"key".to_string()).await?;
/// assert_eq!(*value.unwrap().value(), 42);
/// # Ok::<(), cachegate_tier::Error>(())
/// # });
/// ```
#[derive(Debug, Clone)]
pub struct LocalCache<K, V>
where
    K: Hash + Eq + Send + Sync + 'static,
    V: Clone + Send + Sync + 'static,
{
    name: String,
    inner: MokaCache<K, CacheEntry<V>>,
}

impl<K, V> LocalCache<K, V>
where
    K: Hash + Eq + Send + Sync + 'static,
    V: Clone + Send + Sync + 'static,
{
    /// Creates a new builder for configuring a bounded local cache.
    #[must_use]
    pub fn builder(name: impl Into<String>) -> LocalCacheBuilder<K, V> {
        LocalCacheBuilder::new(name)
    }

    /// Constructs a `LocalCache` from a builder.
    pub(crate) fn from_builder(builder: &LocalCacheBuilder<K, V>) -> Self {
        let mut moka_builder = MokaCache::builder().name(&builder.name);

        if let Some(capacity) = builder.max_capacity {
            moka_builder = moka_builder.max_capacity(capacity);
        }

        if let Some(ttl) = builder.time_to_live {
            moka_builder = moka_builder.time_to_live(ttl);
        }

        if let Some(tti) = builder.time_to_idle {
            moka_builder = moka_builder.time_to_idle(tti);
        }

        Self {
            name: builder.name.clone(),
            inner: moka_builder.build(),
        }
    }

    /// Returns a reference to the underlying moka cache.
    #[must_use]
    pub fn inner(&self) -> &MokaCache<K, CacheEntry<V>> {
        &self.inner
    }
}

impl<K, V> Cache<K, V> for LocalCache<K, V>
where
    K: Clone + Hash + Eq + Send + Sync + 'static,
    V: Clone + Send + Sync + 'static,
{
    fn name(&self) -> &str {
        &self.name
    }

    fn native(&self) -> &(dyn Any + Send + Sync) {
        &self.inner
    }

    async fn get(&self, key: &K) -> Result<Option<CacheEntry<V>>, Error> {
        Ok(self.inner.get(key).await)
    }

    async fn put(&self, key: &K, entry: CacheEntry<V>) -> Result<(), Error> {
        self.inner.insert(key.clone(), entry).await;
        Ok(())
    }

    async fn evict(&self, key: &K) -> Result<(), Error> {
        self.inner.invalidate(key).await;
        Ok(())
    }

    async fn clear(&self) -> Result<(), Error> {
        self.inner.invalidate_all();
        Ok(())
    }

    fn len(&self) -> Option<u64> {
        Some(self.inner.entry_count())
    }
}
