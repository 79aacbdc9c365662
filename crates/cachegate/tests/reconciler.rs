// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

//! Integration tests for the policy reconciler against a live catalog.

use std::collections::HashSet;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use cachegate::{DesiredPolicy, PolicyReconciler};
use cachegate_replicated::{EvictionPolicy, MapPolicy, MaxSizePolicy, PolicyCatalog, PolicyRegistry};
use cachegate_tier::Error;

fn block_on<F: std::future::Future>(f: F) -> F::Output {
    futures::executor::block_on(f)
}

/// The baseline template the original cluster configuration ships with.
fn template() -> MapPolicy {
    let mut policy = MapPolicy::template("cache-resources_*");
    policy.max_size_policy = MaxSizePolicy::PerNode;
    policy.size = 200;
    policy.max_idle_seconds = 600;
    policy.time_to_live_seconds = 600;
    policy
}

fn desired(size: u64, idle: u64, ttl: u64) -> DesiredPolicy {
    DesiredPolicy {
        max_entries_local_heap: size,
        time_to_idle_seconds: idle,
        time_to_live_seconds: ttl,
    }
}

const NAME: &str = "cache-resources_my-cache-resource_my-api";

#[test]
fn first_call_installs_the_merged_policy() {
    block_on(async {
        let reconciler = PolicyReconciler::new(PolicyCatalog::with_policies([template()]));

        let policy = reconciler.ensure_configured(NAME, &desired(150, 20, 10)).await.expect("reconciliation failed");

        assert_eq!(policy.name, NAME);
        assert_eq!(policy.size, 150);
        assert_eq!(policy.eviction_policy, EvictionPolicy::Lru);
        assert_eq!(policy.max_idle_seconds, 20);
        assert_eq!(policy.time_to_live_seconds, 10);

        // Installed beside the template, not over it.
        let mut names = reconciler.registry().names().await.expect("names failed");
        names.sort();
        assert_eq!(names, vec!["cache-resources_*".to_string(), NAME.to_string()]);
        assert_eq!(reconciler.registry().closest_match(NAME).await.expect("lookup failed"), policy);
    });
}

#[test]
fn reconciliation_is_idempotent_per_name() {
    block_on(async {
        let reconciler = PolicyReconciler::new(PolicyCatalog::with_policies([template()]));

        let first = reconciler.ensure_configured(NAME, &desired(150, 20, 10)).await.expect("reconciliation failed");
        // A later call with a very different desired policy changes nothing.
        let second = reconciler.ensure_configured(NAME, &desired(10, 1, 1)).await.expect("reconciliation failed");

        assert_eq!(first, second);
        assert_eq!(reconciler.registry().closest_match(NAME).await.expect("lookup failed"), first);
    });
}

#[test]
fn looser_desired_bounds_keep_the_baseline() {
    block_on(async {
        let reconciler = PolicyReconciler::new(PolicyCatalog::with_policies([template()]));

        let policy = reconciler.ensure_configured(NAME, &desired(250, 700, 60)).await.expect("reconciliation failed");

        assert_eq!(policy.size, 200);
        assert_eq!(policy.eviction_policy, EvictionPolicy::None);
        assert_eq!(policy.max_idle_seconds, 600);
        assert_eq!(policy.time_to_live_seconds, 60);
    });
}

#[test]
fn exact_name_entry_is_never_overridden() {
    block_on(async {
        let mut explicit = MapPolicy::template(NAME);
        explicit.max_size_policy = MaxSizePolicy::FreeHeapSize;
        explicit.size = 40;
        let reconciler = PolicyReconciler::new(PolicyCatalog::with_policies([template(), explicit.clone()]));

        let policy = reconciler.ensure_configured(NAME, &desired(150, 20, 10)).await.expect("reconciliation failed");

        // The caller transparently gets the externally-defined policy.
        assert_eq!(policy, explicit);
        assert_eq!(reconciler.registry().closest_match(NAME).await.expect("lookup failed"), explicit);

        // And teardown never deletes a user-authored entry.
        reconciler.teardown().await.expect("teardown failed");
        let names = reconciler.registry().names().await.expect("names failed");
        assert!(names.contains(&NAME.to_string()));
    });
}

#[test]
fn teardown_removes_only_installed_policies() {
    block_on(async {
        let reconciler = PolicyReconciler::new(PolicyCatalog::with_policies([template()]));

        reconciler.ensure_configured("cache-resources_a", &desired(0, 0, 0)).await.expect("reconciliation failed");
        reconciler.ensure_configured("cache-resources_b", &desired(0, 0, 0)).await.expect("reconciliation failed");

        reconciler.teardown().await.expect("teardown failed");

        let names = reconciler.registry().names().await.expect("names failed");
        assert_eq!(names, vec!["cache-resources_*".to_string()]);
    });
}

#[test]
fn names_reconcile_afresh_after_teardown() {
    block_on(async {
        let reconciler = PolicyReconciler::new(PolicyCatalog::with_policies([template()]));

        reconciler.ensure_configured(NAME, &desired(150, 0, 0)).await.expect("reconciliation failed");
        reconciler.teardown().await.expect("teardown failed");

        // State is transient: the same name reconciles again, now with the
        // current desired policy.
        let policy = reconciler.ensure_configured(NAME, &desired(100, 0, 0)).await.expect("reconciliation failed");
        assert_eq!(policy.size, 100);
        assert_eq!(reconciler.registry().closest_match(NAME).await.expect("lookup failed").size, 100);
    });
}

/// Registry wrapper that counts installs and can fail lookups on demand.
struct FlakyRegistry {
    inner: PolicyCatalog,
    installs: AtomicUsize,
    failures_left: AtomicUsize,
}

impl FlakyRegistry {
    fn new(inner: PolicyCatalog, failures: usize) -> Self {
        Self {
            inner,
            installs: AtomicUsize::new(0),
            failures_left: AtomicUsize::new(failures),
        }
    }
}

impl PolicyRegistry for FlakyRegistry {
    async fn closest_match(&self, name: &str) -> Result<MapPolicy, Error> {
        if self
            .failures_left
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |left| left.checked_sub(1))
            .is_ok()
        {
            return Err(Error::from_message("registry unavailable"));
        }
        self.inner.closest_match(name).await
    }

    async fn install(&self, policy: MapPolicy) -> Result<(), Error> {
        self.installs.fetch_add(1, Ordering::SeqCst);
        self.inner.install(policy).await
    }

    async fn remove(&self, names: &HashSet<String>) -> Result<(), Error> {
        self.inner.remove(names).await
    }

    async fn names(&self) -> Result<Vec<String>, Error> {
        self.inner.names().await
    }
}

#[test]
fn failed_reconciliation_is_retried_on_the_next_call() {
    block_on(async {
        let registry = FlakyRegistry::new(PolicyCatalog::with_policies([template()]), 1);
        let reconciler = PolicyReconciler::new(registry);

        assert!(reconciler.ensure_configured(NAME, &desired(150, 0, 0)).await.is_err());

        // The name was not marked configured; the next call succeeds.
        let policy = reconciler.ensure_configured(NAME, &desired(150, 0, 0)).await.expect("retry should succeed");
        assert_eq!(policy.size, 150);
        assert_eq!(reconciler.registry().installs.load(Ordering::SeqCst), 1);
    });
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn concurrent_callers_reconcile_exactly_once() {
    let registry = FlakyRegistry::new(PolicyCatalog::with_policies([template()]), 0);
    let reconciler = Arc::new(PolicyReconciler::new(registry));

    let mut handles = Vec::new();
    for worker in 0..16u64 {
        let reconciler = Arc::clone(&reconciler);
        handles.push(tokio::spawn(async move {
            // Every caller asks for a different size; only one may win.
            reconciler.ensure_configured(NAME, &desired(100 + worker, 0, 0)).await
        }));
    }

    let mut sizes = HashSet::new();
    for handle in handles {
        let policy = handle.await.expect("task panicked").expect("reconciliation failed");
        sizes.insert(policy.size);
    }

    // All callers observed the same installed policy, and the registry was
    // written exactly once.
    assert_eq!(sizes.len(), 1);
    assert_eq!(reconciler.registry().installs.load(Ordering::SeqCst), 1);
}
