// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

//! The per-map configuration model held by the cluster registry.

/// Eviction policy applied when a map reaches its size bound.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum EvictionPolicy {
    /// No eviction; the bound is advisory.
    None,
    /// Evict the least recently used entry.
    Lru,
    /// Evict the least frequently used entry.
    Lfu,
    /// Evict a randomly chosen entry.
    Random,
}

/// How a map's `size` bound is interpreted.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MaxSizePolicy {
    /// Maximum entry count per cluster node.
    PerNode,
    /// Maximum entry count per data partition.
    PerPartition,
    /// Maximum entry count for the whole map.
    EntryCount,
    /// Maximum used heap, in megabytes.
    UsedHeapSize,
    /// Maximum used heap, as a percentage.
    UsedHeapPercentage,
    /// Minimum free heap, in megabytes.
    FreeHeapSize,
    /// Minimum free heap, as a percentage.
    FreeHeapPercentage,
}

impl MaxSizePolicy {
    /// Returns `true` for bounds counted in entries rather than memory.
    ///
    /// A desired entry bound is only comparable against these; overriding a
    /// memory-relative bound with an entry count would change its meaning.
    #[must_use]
    pub fn is_entry_count_relative(self) -> bool {
        matches!(self, Self::PerNode | Self::PerPartition | Self::EntryCount)
    }
}

/// Configuration of one named map in the cluster registry.
///
/// A `size` of `0` and `u32::MAX` both behave as "effectively unbounded";
/// `max_idle_seconds` and `time_to_live_seconds` of `0` mean no idle- or
/// TTL-based expiry.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MapPolicy {
    /// The map name this policy applies to; may contain `*` wildcards when
    /// the entry is a template.
    pub name: String,
    /// Eviction behavior at the size bound.
    pub eviction_policy: EvictionPolicy,
    /// Interpretation of `size`.
    pub max_size_policy: MaxSizePolicy,
    /// The size bound, in the unit chosen by `max_size_policy`.
    pub size: u32,
    /// Seconds an entry may stay idle before expiring; `0` disables.
    pub max_idle_seconds: u32,
    /// Seconds an entry may live before expiring; `0` disables.
    pub time_to_live_seconds: u32,
}

impl MapPolicy {
    /// Creates the engine-default policy under the given name: unbounded
    /// size per node, no eviction, no expiry.
    ///
    /// This is what a registry lookup yields when neither an exact entry
    /// nor a wildcard template matches.
    #[must_use]
    pub fn template(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            eviction_policy: EvictionPolicy::None,
            max_size_policy: MaxSizePolicy::PerNode,
            size: u32::MAX,
            max_idle_seconds: 0,
            time_to_live_seconds: 0,
        }
    }

    /// Returns a copy of this policy registered under a different name.
    #[must_use]
    pub fn renamed(&self, name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..self.clone()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn entry_count_relative_policies() {
        assert!(MaxSizePolicy::PerNode.is_entry_count_relative());
        assert!(MaxSizePolicy::PerPartition.is_entry_count_relative());
        assert!(MaxSizePolicy::EntryCount.is_entry_count_relative());
        assert!(!MaxSizePolicy::UsedHeapSize.is_entry_count_relative());
        assert!(!MaxSizePolicy::UsedHeapPercentage.is_entry_count_relative());
        assert!(!MaxSizePolicy::FreeHeapSize.is_entry_count_relative());
        assert!(!MaxSizePolicy::FreeHeapPercentage.is_entry_count_relative());
    }

    #[test]
    fn template_is_unbounded_and_inert() {
        let policy = MapPolicy::template("default");
        assert_eq!(policy.eviction_policy, EvictionPolicy::None);
        assert_eq!(policy.size, u32::MAX);
        assert_eq!(policy.max_idle_seconds, 0);
        assert_eq!(policy.time_to_live_seconds, 0);
    }

    #[test]
    fn renamed_copies_everything_but_the_name() {
        let mut base = MapPolicy::template("cache-resources_*");
        base.size = 200;
        base.time_to_live_seconds = 600;

        let copy = base.renamed("cache-resources_products");
        assert_eq!(copy.name, "cache-resources_products");
        assert_eq!(copy.size, 200);
        assert_eq!(copy.time_to_live_seconds, 600);
    }
}
