// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

//! Replicated map adapter for the uniform cache contract.

use std::any::Any;
use std::marker::PhantomData;
use std::time::Duration;

use cachegate_tier::{Cache, CacheEntry, Error, effective_ttl};

use crate::map::ReplicatedMap;

/// Adapter exposing a cluster replicated map as a [`Cache`].
///
/// Each write resolves its effective lifetime against the resource's
/// configured TTL: a positive per-entry TTL wins only when it tightens the
/// bound (or when the configured value is `0`, meaning no ceiling). The
/// configured ceiling is never exceeded.
///
/// Reads come from this node's replica; a write on another node may take a
/// moment to become visible here. That lag is a property of the engine and
/// is documented, not eliminated.
#[derive(Debug)]
pub struct ReplicatedCache<K, V, M> {
    map: M,
    time_to_live_seconds: u64,
    _phantom: PhantomData<fn(K) -> V>,
}

impl<K, V, M> ReplicatedCache<K, V, M>
where
    M: ReplicatedMap<K, V>,
{
    /// Wraps a replicated map handle with the resource's configured TTL.
    ///
    /// `time_to_live_seconds == 0` means entries have no TTL ceiling.
    pub fn new(map: M, time_to_live_seconds: u64) -> Self {
        Self {
            map,
            time_to_live_seconds,
            _phantom: PhantomData,
        }
    }

    /// Returns a reference to the underlying map handle.
    #[must_use]
    pub fn inner(&self) -> &M {
        &self.map
    }
}

impl<K, V, M> Cache<K, V> for ReplicatedCache<K, V, M>
where
    K: Clone + Send + Sync,
    V: Send + Sync,
    M: ReplicatedMap<K, V> + Send + Sync + 'static,
{
    fn name(&self) -> &str {
        self.map.name()
    }

    fn native(&self) -> &(dyn Any + Send + Sync) {
        &self.map
    }

    async fn get(&self, key: &K) -> Result<Option<CacheEntry<V>>, Error> {
        // A missing or null stored value is a plain miss.
        Ok(self.map.get(key).await?.map(CacheEntry::new))
    }

    async fn put(&self, key: &K, entry: CacheEntry<V>) -> Result<(), Error> {
        let ttl = effective_ttl(self.time_to_live_seconds, entry.ttl());
        self.map.put(key.clone(), entry.into_value(), Duration::from_secs(ttl)).await
    }

    async fn evict(&self, key: &K) -> Result<(), Error> {
        self.map.remove(key).await
    }

    async fn clear(&self) -> Result<(), Error> {
        self.map.clear().await
    }
}
