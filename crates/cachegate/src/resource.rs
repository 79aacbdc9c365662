// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

//! The cache resource façade handed to request-processing policies.

use std::collections::HashMap;
use std::time::Duration;

use cachegate_memory::LocalCache;
use cachegate_redis::{KvStore, RemoteCache};
use cachegate_replicated::{MapPolicy, PolicyCatalog, PolicyRegistry, ReplicatedCache, ReplicatedMap, ReplicatedMapProvider};
use cachegate_tier::{CachedResponse, DynamicCache, DynamicCacheExt, Error};
use parking_lot::Mutex;
use tracing::warn;

use crate::config::{CacheBackend, CacheResourceConfig};
use crate::reconciler::{DesiredPolicy, PolicyReconciler, reconcile_policy};
use crate::scope::RequestScope;

const KEY_SEPARATOR: char = '_';
const MAP_PREFIX: &str = "cache-resources";

/// Name of the reconciled local/bounded variant:
/// `cache-resources_<resource>[_<api>]`.
fn local_cache_name(resource_name: &str, scope: &RequestScope) -> String {
    let mut name = format!("{MAP_PREFIX}{KEY_SEPARATOR}{resource_name}");
    if let Some(api) = scope.api() {
        name.push(KEY_SEPARATOR);
        name.push_str(api);
    }
    name
}

/// Name of the replicated variant: `<api>_<resource>`, reversed order and no
/// namespace prefix. The two schemes are historical and deliberately kept
/// distinct per backend.
fn replicated_cache_name(resource_name: &str, scope: &RequestScope) -> String {
    match scope.api() {
        Some(api) => format!("{api}{KEY_SEPARATOR}{resource_name}"),
        None => resource_name.to_string(),
    }
}

/// Placeholder for the cluster collaborator when none is configured.
///
/// [`CacheResourceBuilder::build`] rejects the replicated backend unless a
/// real cluster handle was supplied, so these maps are never reached.
#[derive(Clone, Copy, Debug, Default)]
pub struct NoCluster;

/// Map handle produced by [`NoCluster`]; every operation fails.
#[derive(Debug)]
pub struct NoMap {
    name: String,
}

impl ReplicatedMap<String, CachedResponse> for NoMap {
    fn name(&self) -> &str {
        &self.name
    }

    async fn get(&self, _key: &String) -> Result<Option<CachedResponse>, Error> {
        Err(Error::from_message("no cluster handle configured"))
    }

    async fn put(&self, _key: String, _value: CachedResponse, _ttl: Duration) -> Result<(), Error> {
        Err(Error::from_message("no cluster handle configured"))
    }

    async fn remove(&self, _key: &String) -> Result<(), Error> {
        Err(Error::from_message("no cluster handle configured"))
    }

    async fn clear(&self) -> Result<(), Error> {
        Err(Error::from_message("no cluster handle configured"))
    }
}

impl ReplicatedMapProvider<String, CachedResponse> for NoCluster {
    type Map = NoMap;

    fn replicated_map(&self, name: &str) -> Self::Map {
        NoMap { name: name.to_string() }
    }
}

/// Placeholder for the remote store collaborator when none is configured.
///
/// [`CacheResourceBuilder::build`] rejects the redis backend unless a real
/// store was supplied, so these operations are never reached.
#[derive(Clone, Copy, Debug, Default)]
pub struct NoStore;

impl KvStore for NoStore {
    async fn get(&self, _key: &str) -> Result<Option<String>, Error> {
        Err(Error::from_message("no key-value store configured"))
    }

    async fn put(&self, _key: &str, _value: String, _ttl: Option<Duration>) -> Result<(), Error> {
        Err(Error::from_message("no key-value store configured"))
    }

    async fn delete(&self, _keys: &[String]) -> Result<(), Error> {
        Err(Error::from_message("no key-value store configured"))
    }

    async fn flush_all(&self) -> Result<(), Error> {
        Err(Error::from_message("no key-value store configured"))
    }
}

/// Builder for a [`CacheResource`].
///
/// Collaborator handles are injected here: the policy registry (defaults to
/// a fresh in-process [`PolicyCatalog`]), the cluster handle for the
/// replicated backend, and the key-value store for the redis backend.
/// `build` validates the configuration against what was supplied.
///
/// # Examples
///
/// ```
/// use cachegate::{CacheResource, CacheResourceConfig};
///
/// let config = CacheResourceConfig::new("products").with_time_to_live(60);
/// let resource = CacheResource::builder(config).build()?;
/// # Ok::<(), cachegate_tier::Error>(())
/// ```
#[derive(Debug)]
pub struct CacheResourceBuilder<R = PolicyCatalog, P = NoCluster, S = NoStore> {
    config: CacheResourceConfig,
    registry: R,
    cluster: Option<P>,
    store: Option<S>,
}

impl CacheResourceBuilder {
    pub(crate) fn new(config: CacheResourceConfig) -> Self {
        Self {
            config,
            registry: PolicyCatalog::new(),
            cluster: None,
            store: None,
        }
    }
}

impl<R, P, S> CacheResourceBuilder<R, P, S> {
    /// Supplies the policy registry shared with the storage cluster.
    ///
    /// Without this, the resource reconciles against its own empty
    /// in-process catalog.
    pub fn registry<R2>(self, registry: R2) -> CacheResourceBuilder<R2, P, S>
    where
        R2: PolicyRegistry,
    {
        CacheResourceBuilder {
            config: self.config,
            registry,
            cluster: self.cluster,
            store: self.store,
        }
    }

    /// Supplies the cluster handle backing the replicated variant.
    pub fn cluster<P2>(self, cluster: P2) -> CacheResourceBuilder<R, P2, S>
    where
        P2: ReplicatedMapProvider<String, CachedResponse>,
    {
        CacheResourceBuilder {
            config: self.config,
            registry: self.registry,
            cluster: Some(cluster),
            store: self.store,
        }
    }

    /// Supplies the key-value store backing the redis variant.
    pub fn kv_store<S2>(self, store: S2) -> CacheResourceBuilder<R, P, S2>
    where
        S2: KvStore,
    {
        CacheResourceBuilder {
            config: self.config,
            registry: self.registry,
            cluster: self.cluster,
            store: Some(store),
        }
    }

    /// Validates the configuration and assembles the resource.
    ///
    /// # Errors
    ///
    /// Returns an error for an invalid configuration, or when the selected
    /// backend's collaborator handle was not supplied.
    pub fn build(self) -> Result<CacheResource<R, P, S>, Error>
    where
        R: PolicyRegistry,
    {
        self.config.validate()?;
        match &self.config.backend {
            CacheBackend::Replicated if self.cluster.is_none() => {
                return Err(Error::from_message("the replicated backend requires a cluster handle"));
            }
            CacheBackend::Redis(_) if self.store.is_none() => {
                return Err(Error::from_message("the redis backend requires a key-value store"));
            }
            _ => {}
        }

        Ok(CacheResource {
            config: self.config,
            reconciler: PolicyReconciler::new(self.registry),
            cluster: self.cluster,
            store: self.store,
            local_maps: Mutex::new(HashMap::new()),
        })
    }
}

/// The façade request-processing policies call to obtain a cache.
///
/// One resource serves one configured cache name; [`get_cache`] resolves
/// the cache for a request scope, reconciling the scope's cache name
/// against the policy registry exactly once and wrapping the configured
/// backend in a uniform, type-erased handle.
///
/// [`get_cache`]: CacheResource::get_cache
#[derive(Debug)]
pub struct CacheResource<R = PolicyCatalog, P = NoCluster, S = NoStore> {
    config: CacheResourceConfig,
    reconciler: PolicyReconciler<R>,
    cluster: Option<P>,
    store: Option<S>,
    local_maps: Mutex<HashMap<String, LocalCache<String, CachedResponse>>>,
}

impl CacheResource {
    /// Creates a builder for a resource with the given configuration.
    #[must_use]
    pub fn builder(config: CacheResourceConfig) -> CacheResourceBuilder {
        CacheResourceBuilder::new(config)
    }
}

impl<R, P, S> CacheResource<R, P, S>
where
    R: PolicyRegistry,
    P: ReplicatedMapProvider<String, CachedResponse>,
    S: KvStore + Clone + Send + Sync + 'static,
{
    /// Returns the resource configuration.
    #[must_use]
    pub fn config(&self) -> &CacheResourceConfig {
        &self.config
    }

    /// Returns the policy registry, for diagnostics.
    #[must_use]
    pub fn registry(&self) -> &R {
        self.reconciler.registry()
    }

    /// Resolves the cache serving `scope`.
    ///
    /// The cache name is stable per scope, so repeated calls return handles
    /// onto the same underlying storage. The first call for a name
    /// reconciles its policy; a reconciliation failure degrades to the
    /// desired configuration instead of failing the request path.
    ///
    /// # Errors
    ///
    /// Returns an error only when the backend handle itself is unusable,
    /// never for reconciliation trouble.
    pub async fn get_cache(&self, scope: &RequestScope) -> Result<DynamicCache<String, CachedResponse>, Error> {
        let desired = DesiredPolicy::from(&self.config);
        match &self.config.backend {
            CacheBackend::Local => {
                let name = local_cache_name(&self.config.name, scope);
                let policy = match self.reconciler.ensure_configured(&name, &desired).await {
                    Ok(policy) => policy,
                    Err(error) => {
                        warn!(name = %name, %error, "policy reconciliation failed, using the desired configuration");
                        reconcile_policy(&MapPolicy::template("default"), &name, &desired)
                    }
                };
                let cache = {
                    let mut maps = self.local_maps.lock();
                    maps.entry(name).or_insert_with(|| local_cache_from(&policy)).clone()
                };
                Ok(cache.into_dynamic())
            }
            CacheBackend::Replicated => {
                let name = replicated_cache_name(&self.config.name, scope);
                if let Err(error) = self.reconciler.ensure_configured(&name, &desired).await {
                    warn!(name = %name, %error, "policy reconciliation failed, handing out the cache anyway");
                }
                let cluster = self
                    .cluster
                    .as_ref()
                    .ok_or_else(|| Error::from_message("the replicated backend requires a cluster handle"))?;
                let map = cluster.replicated_map(&name);
                Ok(ReplicatedCache::new(map, self.config.time_to_live_seconds).into_dynamic())
            }
            CacheBackend::Redis(_) => {
                let store = self
                    .store
                    .as_ref()
                    .ok_or_else(|| Error::from_message("the redis backend requires a key-value store"))?
                    .clone();
                Ok(RemoteCache::new(self.config.name.clone(), store, self.config.time_to_live_seconds).into_dynamic())
            }
        }
    }

    /// Tears the resource down, removing every policy it installed.
    ///
    /// Registry entries authored outside this resource survive. The local
    /// maps handed out so far keep working; only the policy bookkeeping is
    /// reset.
    ///
    /// # Errors
    ///
    /// Returns an error when the registry rejects the removal.
    pub async fn stop(&self) -> Result<(), Error> {
        self.reconciler.teardown().await
    }
}

/// Builds the bounded local map described by a reconciled policy.
fn local_cache_from(policy: &MapPolicy) -> LocalCache<String, CachedResponse> {
    let mut builder = LocalCache::builder(policy.name.as_str());
    if policy.max_size_policy.is_entry_count_relative() {
        builder = builder.max_capacity(u64::from(policy.size));
    }
    builder
        .time_to_live(Duration::from_secs(u64::from(policy.time_to_live_seconds)))
        .time_to_idle(Duration::from_secs(u64::from(policy.max_idle_seconds)))
        .build()
}
