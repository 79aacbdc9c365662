// Copyright (c) Microsoft Corporation.

#![cfg_attr(coverage_nightly, feature(coverage_attribute))]
#![cfg_attr(docsrs, feature(doc_cfg))]

//! Core cache contract for gateway cache backends.
//!
//! This crate defines the [`Cache`] trait that every cache backend adapter must
//! satisfy, along with [`CacheEntry`] for values carrying an optional per-entry
//! TTL override, [`CachedResponse`] for the HTTP-response-shaped payloads that
//! gateway policies cache, and [`Error`] types for fallible operations.
//!
//! # Overview
//!
//! The contract separates storage concerns from the request-processing policies
//! that consume a cache. Implement [`Cache`] for a storage backend, then hand it
//! to callers type-erased via [`DynamicCache`] so the backend can be selected at
//! configuration time.
//!
//! # Implementing a Cache
//!
//! ```
//! use cachegate_tier::{Cache, CacheEntry, Error};
//! use std::any::Any;
//! use std::collections::HashMap;
//! use std::sync::RwLock;
//!
//! struct SimpleCache<V> {
//!     name: String,
//!     entries: RwLock<HashMap<String, CacheEntry<V>>>,
//! }
//!
//! impl<V> Cache<String, V> for SimpleCache<V>
//! where
//!     V: Clone + Send + Sync + 'static,
//! {
//!     fn name(&self) -> &str {
//!         &self.name
//!     }
//!
//!     fn native(&self) -> &(dyn Any + Send + Sync) {
//!         &self.entries
//!     }
//!
//!     async fn get(&self, key: &String) -> Result<Option<CacheEntry<V>>, Error> {
//!         Ok(self.entries.read().unwrap().get(key).cloned())
//!     }
//!
//!     async fn put(&self, key: &String, entry: CacheEntry<V>) -> Result<(), Error> {
//!         self.entries.write().unwrap().insert(key.clone(), entry);
//!         Ok(())
//!     }
//!
//!     async fn evict(&self, key: &String) -> Result<(), Error> {
//!         self.entries.write().unwrap().remove(key);
//!         Ok(())
//!     }
//!
//!     async fn clear(&self) -> Result<(), Error> {
//!         self.entries.write().unwrap().clear();
//!         Ok(())
//!     }
//! }
//! ```
//!
//! # Dynamic Dispatch
//!
//! Enable the `dynamic-cache` feature for [`DynamicCache`], which wraps any
//! `Cache` in a type-erased, clonable container. The cache resource uses this
//! to return one handle type regardless of the configured backend.

mod cache;
mod entry;
pub mod error;
mod response;

#[cfg(any(test, feature = "dynamic-cache"))]
mod dynamic;

#[doc(inline)]
pub use cache::Cache;
#[cfg(any(test, feature = "dynamic-cache"))]
#[doc(inline)]
pub use dynamic::{DynamicCache, DynamicCacheExt};
#[doc(inline)]
pub use entry::{CacheEntry, effective_ttl};
#[doc(inline)]
pub use error::{Error, Result};
#[doc(inline)]
pub use response::{CachedResponse, HeaderValues, Headers};
