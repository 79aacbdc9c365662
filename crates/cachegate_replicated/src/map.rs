// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

//! Engine contracts for cluster replicated maps.

use std::time::Duration;

use cachegate_tier::Error;

/// Contract for a cluster-wide replicated map.
///
/// Every node holds a full copy of the map; writes propagate asynchronously
/// to the other members. Operations may block on cluster I/O, so callers
/// must not hold in-process locks across them.
///
/// A `ttl` of [`Duration::ZERO`] on `put` stores the entry without expiry.
pub trait ReplicatedMap<K, V>: Send + Sync {
    /// Returns the name of the underlying map.
    fn name(&self) -> &str;

    /// Reads the value stored for `key` on this node's replica.
    fn get(&self, key: &K) -> impl Future<Output = Result<Option<V>, Error>> + Send;

    /// Stores `value` under `key` with the given per-entry lifetime.
    fn put(&self, key: K, value: V, ttl: Duration) -> impl Future<Output = Result<(), Error>> + Send;

    /// Removes the entry for `key`, if present.
    fn remove(&self, key: &K) -> impl Future<Output = Result<(), Error>> + Send;

    /// Removes every entry of this map, cluster-wide.
    fn clear(&self) -> impl Future<Output = Result<(), Error>> + Send;
}

/// Contract for the cluster handle that hands out replicated maps by name.
///
/// Asking twice for the same name must yield handles onto the same
/// cluster-wide map.
pub trait ReplicatedMapProvider<K, V>: Send + Sync {
    /// The map handle type produced by this provider.
    type Map: ReplicatedMap<K, V> + 'static;

    /// Returns a handle onto the replicated map with the given name,
    /// creating it on first use.
    fn replicated_map(&self, name: &str) -> Self::Map;
}
