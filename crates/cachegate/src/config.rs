// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

//! Resource configuration: bounds, TTLs, and the backend selector.

use cachegate_redis::RedisSettings;
use cachegate_tier::Error;

/// Which storage engine backs a cache resource.
///
/// Deserializes from the gateway's resource configuration with a `type`
/// tag, e.g. `{"type": "redis", "host": "cache.internal", "port": 6379}`.
#[derive(Clone, Debug, Default, serde::Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum CacheBackend {
    /// Single-process bounded map; no replication.
    #[default]
    Local,
    /// Cluster-wide replicated map.
    Replicated,
    /// Remote key-value store holding serialized responses.
    Redis(RedisSettings),
}

/// Configuration of one cache resource, as declared in the gateway.
///
/// The numeric fields follow the resource convention: `0` means
/// "unbounded" for the entry bound and "no expiry" for the TTL/TTI
/// seconds. All values arrive through configuration and are validated once
/// when the resource is built; nothing is read from the environment later.
///
/// # Examples
///
/// ```
/// use cachegate::CacheResourceConfig;
///
/// let config: CacheResourceConfig = serde_json::from_str(
///     r#"{
///         "name": "products",
///         "maxEntriesLocalHeap": 1000,
///         "timeToIdleSeconds": 120,
///         "timeToLiveSeconds": 600,
///         "backend": {"type": "local"}
///     }"#,
/// )?;
/// assert_eq!(config.name, "products");
/// assert_eq!(config.max_entries_local_heap, 1000);
/// # Ok::<(), serde_json::Error>(())
/// ```
#[derive(Clone, Debug, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CacheResourceConfig {
    /// Logical resource name; part of every derived cache name.
    pub name: String,
    /// Desired entry bound for the backing map; `0` leaves it unbounded.
    #[serde(default)]
    pub max_entries_local_heap: u64,
    /// Desired idle expiry in seconds; `0` disables idle expiry.
    #[serde(default)]
    pub time_to_idle_seconds: u64,
    /// Desired lifetime in seconds; `0` disables TTL expiry.
    #[serde(default)]
    pub time_to_live_seconds: u64,
    /// The storage engine backing this resource.
    #[serde(default)]
    pub backend: CacheBackend,
}

impl CacheResourceConfig {
    /// Creates a configuration with the given name, no bounds, and the
    /// local backend.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            max_entries_local_heap: 0,
            time_to_idle_seconds: 0,
            time_to_live_seconds: 0,
            backend: CacheBackend::Local,
        }
    }

    /// Sets the desired entry bound.
    #[must_use]
    pub fn with_max_entries(mut self, max_entries: u64) -> Self {
        self.max_entries_local_heap = max_entries;
        self
    }

    /// Sets the desired idle expiry, in seconds.
    #[must_use]
    pub fn with_time_to_idle(mut self, seconds: u64) -> Self {
        self.time_to_idle_seconds = seconds;
        self
    }

    /// Sets the desired lifetime, in seconds.
    #[must_use]
    pub fn with_time_to_live(mut self, seconds: u64) -> Self {
        self.time_to_live_seconds = seconds;
        self
    }

    /// Selects the storage backend.
    #[must_use]
    pub fn with_backend(mut self, backend: CacheBackend) -> Self {
        self.backend = backend;
        self
    }

    /// Checks the configuration for values that cannot work.
    ///
    /// # Errors
    ///
    /// Returns an error for an empty resource name or invalid
    /// backend-specific settings.
    pub fn validate(&self) -> Result<(), Error> {
        if self.name.trim().is_empty() {
            return Err(Error::from_message("cache resource name must not be empty"));
        }
        if let CacheBackend::Redis(settings) = &self.backend {
            settings.validate()?;
        }
        Ok(())
    }
}
