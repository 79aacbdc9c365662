// Copyright (c) Microsoft Corporation.

#![cfg_attr(coverage_nightly, feature(coverage_attribute))]
#![cfg_attr(docsrs, feature(doc_cfg))]

//! Remote key-value backend for the cachegate resource, backed by Redis.
//!
//! This crate covers the remote half of the resource:
//!
//! - [`KvStore`]: the contract a remote key-value client must satisfy:
//!   string values, per-key TTL, bulk delete, and a whole-store flush.
//! - [`RedisStore`]: the implementation over
//!   `redis::aio::ConnectionManager`, constructed from validated
//!   [`RedisSettings`] rather than ambient environment lookups.
//! - [`RemoteCache`]: the adapter that stores an HTTP-response-shaped
//!   [`CachedResponse`](cachegate_tier::CachedResponse) as two parallel
//!   string keys: a base64 content blob and a JSON metadata record, each
//!   written with the same effective TTL.
//!
//! # Blast radius
//!
//! [`RemoteCache::clear`] flushes the **entire** database it is connected
//! to, not just this cache's entries. Point the store at a database
//! dedicated to gateway cache traffic.

pub mod adapter;
pub mod store;

#[doc(inline)]
pub use adapter::RemoteCache;
#[doc(inline)]
pub use store::{KvStore, RedisSettings, RedisStore};
