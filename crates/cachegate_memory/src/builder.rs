// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

//! Builder for configuring bounded local caches.
//!
//! This module provides a builder API for `LocalCache` that abstracts the
//! underlying moka configuration, providing a stable API surface without
//! exposing moka's types.

use std::hash::Hash;
use std::marker::PhantomData;
use std::time::Duration;

use crate::local::LocalCache;

/// Builder for configuring a `LocalCache`.
///
/// A value of `0` entries, or an absent duration, means "unbounded" or
/// "no expiry" for the respective bound, matching the resource policy
/// convention.
///
/// # Examples
///
/// ```
/// use cachegate_memory::LocalCache;
/// use std::time::Duration;
///
/// let cache = LocalCache::<String, i32>::builder("cache-resources_products")
///     .max_capacity(1000)
///     .time_to_live(Duration::from_secs(300))
///     .time_to_idle(Duration::from_secs(60))
///     .build();
/// ```
#[derive(Debug)]
pub struct LocalCacheBuilder<K, V> {
    pub(crate) name: String,
    pub(crate) max_capacity: Option<u64>,
    pub(crate) time_to_live: Option<Duration>,
    pub(crate) time_to_idle: Option<Duration>,
    _phantom: PhantomData<(K, V)>,
}

impl<K, V> LocalCacheBuilder<K, V> {
    /// Creates a new builder for a cache with the given logical name.
    ///
    /// The default configuration is an unbounded map with no time-based
    /// expiration.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            max_capacity: None,
            time_to_live: None,
            time_to_idle: None,
            _phantom: PhantomData,
        }
    }

    /// Sets the maximum number of entries the map may hold.
    ///
    /// Once the bound is reached, entries are evicted to make room for new
    /// ones. A bound of `0` leaves the map unbounded.
    #[must_use]
    pub fn max_capacity(mut self, capacity: u64) -> Self {
        self.max_capacity = (capacity != 0).then_some(capacity);
        self
    }

    /// Sets the time-to-live applied to every entry.
    ///
    /// A zero duration leaves entries without TTL-based expiry.
    #[must_use]
    pub fn time_to_live(mut self, ttl: Duration) -> Self {
        self.time_to_live = (!ttl.is_zero()).then_some(ttl);
        self
    }

    /// Sets the time-to-idle applied to every entry.
    ///
    /// A zero duration leaves entries without idle-based expiry.
    #[must_use]
    pub fn time_to_idle(mut self, tti: Duration) -> Self {
        self.time_to_idle = (!tti.is_zero()).then_some(tti);
        self
    }

    /// Builds the cache with the configured bounds.
    #[must_use]
    pub fn build(self) -> LocalCache<K, V>
    where
        K: Hash + Eq + Send + Sync + 'static,
        V: Clone + Send + Sync + 'static,
    {
        LocalCache::from_builder(&self)
    }
}
