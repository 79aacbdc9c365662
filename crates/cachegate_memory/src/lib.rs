// Copyright (c) Microsoft Corporation.

#![cfg_attr(coverage_nightly, feature(coverage_attribute))]
#![cfg_attr(docsrs, feature(doc_cfg))]

//! Bounded in-process map backend backed by moka.
//!
//! This crate provides [`LocalCache`], the single-node bounded map adapter of
//! the cachegate resource: a size- and time-bounded concurrent map with no
//! cross-node replication. Use [`LocalCacheBuilder`] to configure the entry
//! bound, TTL, and TTI without exposing moka types directly.
//!
//! # Quick Start
//!
//! ```
//! use cachegate_memory::LocalCacheBuilder;
//! use cachegate_tier::{Cache, CacheEntry};
//! use std::time::Duration;
//!
//! # futures::executor::block_on(async {
//! let cache = LocalCacheBuilder::<String, i32>::new("cache-resources_products")
//!     .max_capacity(1000)
//!     .time_to_live(Duration::from_secs(300))
//!     .build();
//!
//! cache.put(&"key".to_string(), CacheEntry::new(42)).await?;
//! let value = cache.get(&"key".to_string()).await?;
//! assert_eq!(*value.unwrap().value(), 42);
//! # Ok::<(), cachegate_tier::Error>(())
//! # });
//! ```
//!
//! # Semantics
//!
//! The map's bounds are fixed when the cache is built; a per-entry TTL
//! override on `put` is deliberately ignored, because the engine
//! configuration is static for the life of the process.

pub mod builder;
pub mod local;

#[doc(inline)]
pub use builder::LocalCacheBuilder;
#[doc(inline)]
pub use local::LocalCache;
