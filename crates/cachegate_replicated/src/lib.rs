// Copyright (c) Microsoft Corporation.

#![cfg_attr(coverage_nightly, feature(coverage_attribute))]
#![cfg_attr(docsrs, feature(doc_cfg))]

//! Cluster replicated-map backend for the cachegate resource.
//!
//! This crate covers the cluster-facing half of the resource:
//!
//! - [`ReplicatedMap`] and [`ReplicatedMapProvider`]: the contract a
//!   cluster engine client must satisfy. Every node holds a full copy of a
//!   replicated map; writes propagate asynchronously, so readers on other
//!   nodes may observe a brief visibility lag.
//! - [`ReplicatedCache`]: the adapter that exposes a replicated map through
//!   the uniform [`Cache`](cachegate_tier::Cache) contract, resolving the
//!   effective TTL of each write against the resource's configured ceiling.
//! - [`MapPolicy`], [`EvictionPolicy`], [`MaxSizePolicy`]: the per-map
//!   configuration model held by the cluster's configuration registry.
//! - [`PolicyRegistry`] and [`PolicyCatalog`]: the registry contract plus
//!   the in-process implementation with wildcard template matching, the
//!   piece the policy reconciler merges desired configuration into.
//!
//! The engine itself (replication, membership, serialization across nodes)
//! is an external collaborator; only its boundary lives here.

pub mod adapter;
pub mod map;
pub mod policy;
pub mod registry;

#[doc(inline)]
pub use adapter::ReplicatedCache;
#[doc(inline)]
pub use map::{ReplicatedMap, ReplicatedMapProvider};
#[doc(inline)]
pub use policy::{EvictionPolicy, MapPolicy, MaxSizePolicy};
#[doc(inline)]
pub use registry::{PolicyCatalog, PolicyRegistry};
