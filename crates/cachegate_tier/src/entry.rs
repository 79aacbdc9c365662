// Copyright (c) Microsoft Corporation.

use std::{ops::Deref, time::Duration};

/// A cached value with an optional per-entry TTL override.
///
/// `CacheEntry` wraps the value a policy wants cached. When `ttl` is unset,
/// the entry lives for the cache's configured default; when set, backends
/// resolve the effective lifetime with [`effective_ttl`].
///
/// # Examples
///
/// ```
/// use cachegate_tier::CacheEntry;
/// use std::time::Duration;
///
/// // Simple entry with just a value
/// let entry = CacheEntry::new(42);
/// assert_eq!(*entry.value(), 42);
///
/// // Entry with per-entry TTL
/// let entry = CacheEntry::with_ttl("data".to_string(), Duration::from_secs(60));
/// assert_eq!(entry.ttl(), Some(Duration::from_secs(60)));
/// ```
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CacheEntry<V> {
    value: V,
    /// Per-entry TTL override. Resolved against the cache-level TTL on `put`.
    ttl: Option<Duration>,
}

impl<V> CacheEntry<V> {
    /// Creates a new cache entry with the given value.
    pub fn new(value: V) -> Self {
        Self { value, ttl: None }
    }

    /// Creates a new cache entry with a per-entry TTL.
    ///
    /// # Examples
    ///
    /// ```
    /// use cachegate_tier::CacheEntry;
    /// use std::time::Duration;
    ///
    /// let entry = CacheEntry::with_ttl(42, Duration::from_secs(300));
    /// assert_eq!(entry.ttl(), Some(Duration::from_secs(300)));
    /// ```
    pub fn with_ttl(value: V, ttl: Duration) -> Self {
        Self { value, ttl: Some(ttl) }
    }

    /// Returns the per-entry TTL, if set.
    #[must_use]
    pub fn ttl(&self) -> Option<Duration> {
        self.ttl
    }

    /// Sets the per-entry TTL.
    pub fn set_ttl(&mut self, ttl: Duration) {
        self.ttl = Some(ttl);
    }

    /// Consumes the entry and returns the inner value.
    #[must_use]
    pub fn into_value(self) -> V {
        self.value
    }

    /// Returns a reference to the cached value.
    #[must_use]
    pub fn value(&self) -> &V {
        &self.value
    }
}

impl<V> Deref for CacheEntry<V> {
    type Target = V;

    fn deref(&self) -> &Self::Target {
        &self.value
    }
}

impl<V> From<V> for CacheEntry<V> {
    fn from(value: V) -> Self {
        Self::new(value)
    }
}

/// Resolves the lifetime actually written to a backend.
///
/// The cache-level value wins unless the per-entry request is positive and
/// tightens the bound: a request below a positive configured ceiling, or any
/// positive request when the configured value is `0` (no expiry). The
/// configured ceiling is never exceeded. `0` means "no expiry" on both sides.
///
/// # Examples
///
/// ```
/// use cachegate_tier::effective_ttl;
/// use std::time::Duration;
///
/// assert_eq!(effective_ttl(60, Some(Duration::from_secs(30))), 30);
/// assert_eq!(effective_ttl(60, Some(Duration::from_secs(120))), 60);
/// assert_eq!(effective_ttl(0, Some(Duration::from_secs(120))), 120);
/// assert_eq!(effective_ttl(60, None), 60);
/// ```
#[must_use]
pub fn effective_ttl(configured_secs: u64, requested: Option<Duration>) -> u64 {
    match requested.map(|ttl| ttl.as_secs()) {
        Some(secs) if secs > 0 && (configured_secs == 0 || secs < configured_secs) => secs,
        _ => configured_secs,
    }
}
