// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

//! The core trait for cache backend adapters.
//!
//! [`Cache`] defines the uniform interface that all backends must implement.
//! The contract is deliberately small: adapters implement the storage
//! operations and expose their native engine handle for diagnostics, and the
//! cache resource layers name computation and policy reconciliation on top.

use std::any::Any;

use crate::{CacheEntry, Error};

/// Trait for cache backend adapters.
///
/// Implement this trait to adapt a storage engine to the uniform cache
/// contract. All four storage operations are required, along with [`name`]
/// and [`native`]. Only `len` and `is_empty` have default implementations:
/// - `len`: Returns `None` (not all backends track size)
/// - `is_empty`: Delegates to `len`
///
/// `get` must report a merely-missing key as `Ok(None)`, never as an error,
/// and `evict` of an absent key is a successful no-op.
///
/// [`name`]: Cache::name
/// [`native`]: Cache::native
#[cfg_attr(
    any(test, feature = "dynamic-cache"),
    dynosaur::dynosaur(pub(crate) DynCache = dyn(box) Cache, bridge(none))
)]
pub trait Cache<K, V>: Send + Sync {
    /// Returns the stable logical name of this cache.
    fn name(&self) -> &str;

    /// Returns the underlying engine handle for diagnostics.
    ///
    /// The concrete type depends on the backend; callers downcast when they
    /// know which adapter they hold.
    fn native(&self) -> &(dyn Any + Send + Sync);

    /// Gets a value, returning `Ok(None)` on a miss.
    fn get(&self, key: &K) -> impl Future<Output = Result<Option<CacheEntry<V>>, Error>> + Send;

    /// Upserts a value, returning an error if the operation fails.
    ///
    /// The entry becomes visible to subsequent `get` calls immediately;
    /// adapters backed by eventually-consistent replication may expose a
    /// brief visibility lag on other nodes.
    fn put(&self, key: &K, entry: CacheEntry<V>) -> impl Future<Output = Result<(), Error>> + Send;

    /// Removes the entry if present; absent keys are a successful no-op.
    fn evict(&self, key: &K) -> impl Future<Output = Result<(), Error>> + Send;

    /// Clears all entries reachable through this cache instance.
    ///
    /// Most adapters scope this to the named cache; see the remote
    /// key-value adapter for a documented wider blast radius.
    fn clear(&self) -> impl Future<Output = Result<(), Error>> + Send;

    /// Returns the number of entries, if the backend tracks size.
    fn len(&self) -> Option<u64> {
        None
    }

    /// Returns `true` if the cache contains no entries.
    ///
    /// Returns `None` for backends that don't track size.
    fn is_empty(&self) -> Option<bool> {
        self.len().map(|len| len == 0)
    }
}
