// Copyright (c) Microsoft Corporation.

#![cfg_attr(coverage_nightly, feature(coverage_attribute))]
#![cfg_attr(docsrs, feature(doc_cfg))]

//! A pluggable caching resource for API gateway request policies.
//!
//! A gateway deployment declares a handful of named caches; each is backed
//! by one of three interchangeable engines selected by configuration: a
//! bounded in-process map, a cluster replicated map, or a remote key-value
//! store. Per-name policy (size bound, TTL, TTI) is *reconciled*
//! against whatever baseline the configuration registry already holds for
//! the name, with conservative precedence rules, instead of being blindly
//! written over it.
//!
//! # Quick Start
//!
//! ```
//! use cachegate::{CacheResource, CacheResourceConfig, RequestScope};
//! use cachegate_tier::{Cache, CacheEntry, CachedResponse};
//! # futures::executor::block_on(async {
//!
//! let config = CacheResourceConfig::new("products").with_time_to_live(60);
//! let resource = CacheResource::builder(config).build()?;
//!
//! let cache = resource.get_cache(&RequestScope::for_api("my-api")).await?;
//! assert_eq!(cache.name(), "cache-resources_products_my-api");
//!
//! cache.put(&"GET:/products".to_string(), CacheEntry::new(CachedResponse::new(200))).await?;
//! assert!(cache.get(&"GET:/products".to_string()).await?.is_some());
//!
//! resource.stop().await?;
//! # Ok::<(), cachegate_tier::Error>(())
//! # });
//! ```
//!
//! # Reconciliation
//!
//! The first `get_cache` call for a cache name looks up the closest baseline
//! policy (an exact registry entry, else the most specific `*` template),
//! merges the resource's desired bounds into it without ever loosening an
//! existing bound, installs the result, and remembers the name. Later calls
//! are no-ops; an exact-name entry authored outside this process is left
//! untouched and survives [`CacheResource::stop`], which removes only the
//! policies this process installed.

pub mod config;
pub mod reconciler;
pub mod resource;
pub mod scope;

#[doc(inline)]
pub use config::{CacheBackend, CacheResourceConfig};
#[doc(inline)]
pub use reconciler::{DesiredPolicy, PolicyReconciler};
#[doc(inline)]
pub use resource::{CacheResource, CacheResourceBuilder, NoCluster, NoStore};
#[doc(inline)]
pub use scope::RequestScope;

#[doc(inline)]
pub use cachegate_memory::LocalCache;
#[doc(inline)]
pub use cachegate_redis::{RedisSettings, RedisStore};
#[doc(inline)]
pub use cachegate_replicated::{MapPolicy, PolicyCatalog, PolicyRegistry};
#[doc(inline)]
pub use cachegate_tier::{Cache, CacheEntry, CachedResponse, DynamicCache, Error, Result};
