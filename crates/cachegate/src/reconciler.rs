// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

//! Baseline-aware policy reconciliation.
//!
//! The reconciler computes the effective policy for a cache name by merging
//! the resource's desired bounds into whatever baseline the cluster's
//! configuration registry already holds for that name, then installs the
//! result, exactly once per name for the life of the process. The merge
//! only ever tightens bounds; an entry registered under the exact name is
//! treated as externally managed and never touched.

use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use cachegate_replicated::{EvictionPolicy, MapPolicy, PolicyRegistry};
use cachegate_tier::Error;
use parking_lot::Mutex;
use tokio::sync::OnceCell;

use crate::config::CacheResourceConfig;

/// The bounds a resource asks for, before reconciliation.
///
/// `0` means "unbounded" for the entry bound and "no expiry" for the
/// seconds fields.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct DesiredPolicy {
    /// Desired entry bound for the backing map.
    pub max_entries_local_heap: u64,
    /// Desired idle expiry, in seconds.
    pub time_to_idle_seconds: u64,
    /// Desired lifetime, in seconds.
    pub time_to_live_seconds: u64,
}

impl From<&CacheResourceConfig> for DesiredPolicy {
    fn from(config: &CacheResourceConfig) -> Self {
        Self {
            max_entries_local_heap: config.max_entries_local_heap,
            time_to_idle_seconds: config.time_to_idle_seconds,
            time_to_live_seconds: config.time_to_live_seconds,
        }
    }
}

/// Merges one expiry bound. Zero disables expiry, so a non-zero side wins
/// over a zero one only in the tightening direction; two non-zero sides
/// resolve to the tighter bound.
fn merge_seconds(baseline: u32, desired: u64) -> u32 {
    let desired = u32::try_from(desired).unwrap_or(u32::MAX);
    if baseline == 0 && desired > 0 {
        desired
    } else if baseline > 0 && desired == 0 {
        baseline
    } else {
        desired.min(baseline)
    }
}

/// Derives the policy to install for `name` from its baseline.
///
/// The baseline is copied and renamed; the desired entry bound applies only
/// when the baseline's size is counted in entries and the desired bound is
/// strictly tighter. A freshly bounded map with no eviction policy gets LRU,
/// since a bound nothing enforces would be meaningless.
pub(crate) fn reconcile_policy(baseline: &MapPolicy, name: &str, desired: &DesiredPolicy) -> MapPolicy {
    let mut policy = baseline.renamed(name);

    if baseline.max_size_policy.is_entry_count_relative()
        && desired.max_entries_local_heap != 0
        && desired.max_entries_local_heap < u64::from(baseline.size)
    {
        policy.size = u32::try_from(desired.max_entries_local_heap).unwrap_or(u32::MAX);
        if baseline.eviction_policy == EvictionPolicy::None {
            policy.eviction_policy = EvictionPolicy::Lru;
        }
    }

    policy.max_idle_seconds = merge_seconds(baseline.max_idle_seconds, desired.time_to_idle_seconds);
    policy.time_to_live_seconds = merge_seconds(baseline.time_to_live_seconds, desired.time_to_live_seconds);
    policy
}

#[derive(Clone, Debug, PartialEq, Eq)]
enum Authorship {
    /// This process derived and installed the policy.
    Installed,
    /// An exact-name entry existed before us; never modified, never removed.
    External,
}

#[derive(Clone, Debug)]
struct NamePolicy {
    policy: MapPolicy,
    authorship: Authorship,
}

/// Reconciles per-name cache policy against the registry, once per name.
///
/// Safe under concurrent calls for the same name: the first caller performs
/// the lookup, merge, and install while later callers await the same
/// one-shot cell and observe the installed policy without touching the
/// registry. The internal lock only guards the name map; registry I/O runs
/// outside it.
#[derive(Debug)]
pub struct PolicyReconciler<R> {
    registry: R,
    names: Mutex<HashMap<String, Arc<OnceCell<NamePolicy>>>>,
}

impl<R> PolicyReconciler<R>
where
    R: PolicyRegistry,
{
    /// Creates a reconciler over the given configuration registry.
    pub fn new(registry: R) -> Self {
        Self {
            registry,
            names: Mutex::new(HashMap::new()),
        }
    }

    /// Returns a reference to the underlying registry, for diagnostics.
    #[must_use]
    pub fn registry(&self) -> &R {
        &self.registry
    }

    /// Ensures `name` is configured, returning its effective policy.
    ///
    /// The first call for a name resolves the closest baseline and either
    /// adopts it as-is (exact-name match: externally managed) or installs
    /// the reconciled merge of baseline and `desired`. Every later call is
    /// a no-op returning the same policy, whatever `desired` says.
    ///
    /// # Errors
    ///
    /// Returns an error when the registry cannot be read or written; the
    /// name stays unconfigured and the next call retries.
    pub async fn ensure_configured(&self, name: &str, desired: &DesiredPolicy) -> Result<MapPolicy, Error> {
        let cell = {
            let mut names = self.names.lock();
            Arc::clone(names.entry(name.to_string()).or_default())
        };

        let state = cell
            .get_or_try_init(|| async {
                let baseline = self.registry.closest_match(name).await?;
                if baseline.name == name {
                    return Ok::<NamePolicy, Error>(NamePolicy {
                        policy: baseline,
                        authorship: Authorship::External,
                    });
                }
                let policy = reconcile_policy(&baseline, name, desired);
                self.registry.install(policy.clone()).await?;
                Ok(NamePolicy {
                    policy,
                    authorship: Authorship::Installed,
                })
            })
            .await?;

        Ok(state.policy.clone())
    }

    /// Removes every policy this reconciler installed and forgets all names.
    ///
    /// Registry entries the reconciler never touched survive, including
    /// exact-name entries it only adopted. A name reconciled before teardown
    /// reconciles afresh afterwards.
    ///
    /// # Errors
    ///
    /// Returns an error when the registry rejects the removal; the name map
    /// is cleared regardless.
    pub async fn teardown(&self) -> Result<(), Error> {
        let installed: HashSet<String> = {
            let mut names = self.names.lock();
            names
                .drain()
                .filter(|(_, cell)| {
                    cell.get().is_some_and(|state| state.authorship == Authorship::Installed)
                })
                .map(|(name, _)| name)
                .collect()
        };

        if installed.is_empty() {
            return Ok(());
        }
        self.registry.remove(&installed).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cachegate_replicated::MaxSizePolicy;

    fn baseline() -> MapPolicy {
        let mut policy = MapPolicy::template("cache-resources_*");
        policy.max_size_policy = MaxSizePolicy::PerNode;
        policy.size = 200;
        policy.max_idle_seconds = 600;
        policy.time_to_live_seconds = 600;
        policy
    }

    #[test]
    fn tighter_size_applies_and_turns_on_lru() {
        let desired = DesiredPolicy {
            max_entries_local_heap: 150,
            ..DesiredPolicy::default()
        };
        let policy = reconcile_policy(&baseline(), "cache-resources_products", &desired);

        assert_eq!(policy.name, "cache-resources_products");
        assert_eq!(policy.size, 150);
        assert_eq!(policy.eviction_policy, EvictionPolicy::Lru);
    }

    #[test]
    fn looser_size_keeps_the_baseline() {
        let desired = DesiredPolicy {
            max_entries_local_heap: 250,
            ..DesiredPolicy::default()
        };
        let policy = reconcile_policy(&baseline(), "cache-resources_products", &desired);

        assert_eq!(policy.size, 200);
        assert_eq!(policy.eviction_policy, EvictionPolicy::None);
    }

    #[test]
    fn memory_relative_size_is_never_overridden() {
        let mut base = baseline();
        base.max_size_policy = MaxSizePolicy::FreeHeapSize;
        let desired = DesiredPolicy {
            max_entries_local_heap: 150,
            ..DesiredPolicy::default()
        };
        let policy = reconcile_policy(&base, "cache-resources_products", &desired);

        assert_eq!(policy.size, 200);
        assert_eq!(policy.eviction_policy, EvictionPolicy::None);
    }

    #[test]
    fn existing_eviction_policy_is_kept_with_a_tighter_size() {
        let mut base = baseline();
        base.eviction_policy = EvictionPolicy::Lfu;
        let desired = DesiredPolicy {
            max_entries_local_heap: 150,
            ..DesiredPolicy::default()
        };
        let policy = reconcile_policy(&base, "cache-resources_products", &desired);

        assert_eq!(policy.size, 150);
        assert_eq!(policy.eviction_policy, EvictionPolicy::Lfu);
    }

    #[test]
    fn merge_seconds_three_way_table() {
        // Desired tightens a positive baseline.
        assert_eq!(merge_seconds(600, 20), 20);
        // Desired would loosen; baseline wins.
        assert_eq!(merge_seconds(600, 700), 600);
        // Baseline disabled, desired enables.
        assert_eq!(merge_seconds(0, 300), 300);
        // Desired disabled, baseline kept.
        assert_eq!(merge_seconds(600, 0), 600);
        // Both disabled.
        assert_eq!(merge_seconds(0, 0), 0);
    }

    #[test]
    fn merge_seconds_clamps_oversized_desired() {
        assert_eq!(merge_seconds(0, u64::from(u32::MAX) + 10), u32::MAX);
    }
}
