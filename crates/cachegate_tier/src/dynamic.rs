// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

//! Dynamic cache wrapper for type erasure.

use std::{any::Any, fmt::Debug, sync::Arc};

use crate::{Cache, CacheEntry, Error, cache::DynCache};

/// Extension trait for converting any `Cache` into a `DynamicCache`.
///
/// This trait is automatically implemented for all types that implement
/// `Cache`.
///
/// # Examples
///
/// ```
/// use cachegate_tier::{Cache, DynamicCache, DynamicCacheExt};
///
/// fn erase<T>(adapter: T) -> DynamicCache<String, i32>
/// where
///     T: Cache<String, i32> + 'static,
/// {
///     adapter.into_dynamic()
/// }
/// ```
pub trait DynamicCacheExt<K, V>: Sized {
    /// Converts this cache into a `DynamicCache`.
    fn into_dynamic(self) -> DynamicCache<K, V>;
}

impl<K, V, T> DynamicCacheExt<K, V> for T
where
    T: Cache<K, V> + 'static,
{
    fn into_dynamic(self) -> DynamicCache<K, V> {
        DynamicCache::new(self)
    }
}

/// A clonable, type-erased cache handle.
///
/// `DynamicCache` wraps a trait object in an `Arc` to enable cloning while
/// maintaining dynamic dispatch. The cache resource returns this so callers
/// hold one handle type no matter which backend the configuration selected.
///
/// # Examples
///
/// ```ignore
/// let dynamic: DynamicCache<String, CachedResponse> = adapter.into_dynamic();
///
/// // DynamicCache is Clone
/// let clone = dynamic.clone();
/// ```
pub struct DynamicCache<K, V>(Arc<DynCache<'static, K, V>>);

impl<K, V> DynamicCache<K, V> {
    /// Creates a new dynamic cache from any `Cache` implementation.
    pub(crate) fn new<T>(adapter: T) -> Self
    where
        T: Cache<K, V> + Send + Sync + 'static,
    {
        Self(DynCache::new_arc(adapter))
    }
}

impl<K, V> Debug for DynamicCache<K, V> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DynamicCache").finish()
    }
}

impl<K, V> Clone for DynamicCache<K, V> {
    fn clone(&self) -> Self {
        Self(Arc::clone(&self.0))
    }
}

impl<K, V> Cache<K, V> for DynamicCache<K, V>
where
    K: Sync,
    V: Send,
{
    fn name(&self) -> &str {
        self.0.name()
    }

    fn native(&self) -> &(dyn Any + Send + Sync) {
        self.0.native()
    }

    async fn get(&self, key: &K) -> Result<Option<CacheEntry<V>>, Error> {
        self.0.get(key).await
    }

    async fn put(&self, key: &K, entry: CacheEntry<V>) -> Result<(), Error> {
        self.0.put(key, entry).await
    }

    async fn evict(&self, key: &K) -> Result<(), Error> {
        self.0.evict(key).await
    }

    async fn clear(&self) -> Result<(), Error> {
        self.0.clear().await
    }

    fn len(&self) -> Option<u64> {
        self.0.len()
    }

    fn is_empty(&self) -> Option<bool> {
        self.0.is_empty()
    }
}
