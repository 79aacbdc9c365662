// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

//! The cluster configuration registry contract and its in-process form.

use std::collections::{HashMap, HashSet};

use cachegate_tier::Error;
use parking_lot::RwLock;

use crate::policy::MapPolicy;

/// Contract for the registry of per-map policies.
///
/// The registry is shared cluster state: lookups may travel to other
/// members, so every operation is async and fallible. The reconciler is the
/// only writer in this process; gateway operators may author entries out of
/// band (an exact-name entry is treated as externally managed).
pub trait PolicyRegistry: Send + Sync {
    /// Returns the policy governing `name`: the exact entry if one exists,
    /// else the most specific matching `*` template, else the engine
    /// default. The returned policy keeps the name it is registered under,
    /// which is how callers distinguish an exact match from a template.
    fn closest_match(&self, name: &str) -> impl Future<Output = Result<MapPolicy, Error>> + Send;

    /// Registers `policy` under its name, replacing any previous entry.
    fn install(&self, policy: MapPolicy) -> impl Future<Output = Result<(), Error>> + Send;

    /// Removes the entries registered under the given names, keeping
    /// everything else untouched.
    fn remove(&self, names: &HashSet<String>) -> impl Future<Output = Result<(), Error>> + Send;

    /// Returns the names currently registered, for diagnostics.
    fn names(&self) -> impl Future<Output = Result<Vec<String>, Error>> + Send;
}

/// In-process policy registry with wildcard template matching.
///
/// Entries whose name contains `*` act as templates: `cache-resources_*`
/// governs every name it matches unless a more specific template or an
/// exact entry exists. Specificity is measured by the number of literal
/// characters in the pattern.
///
/// # Examples
///
/// ```
/// use cachegate_replicated::{MapPolicy, PolicyCatalog, PolicyRegistry};
/// # futures::executor::block_on(async {
///
/// let catalog = PolicyCatalog::new();
/// let mut template = MapPolicy::template("cache-resources_*");
/// template.time_to_live_seconds = 600;
/// catalog.install(template).await?;
///
/// let policy = catalog.closest_match("cache-resources_products").await?;
/// assert_eq!(policy.name, "cache-resources_*");
/// assert_eq!(policy.time_to_live_seconds, 600);
/// # Ok::<(), cachegate_tier::Error>(())
/// # });
/// ```
#[derive(Debug, Default)]
pub struct PolicyCatalog {
    entries: RwLock<HashMap<String, MapPolicy>>,
}

impl PolicyCatalog {
    /// Creates an empty catalog.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a catalog pre-populated with the given entries.
    #[must_use]
    pub fn with_policies(policies: impl IntoIterator<Item = MapPolicy>) -> Self {
        let entries = policies.into_iter().map(|policy| (policy.name.clone(), policy)).collect();
        Self {
            entries: RwLock::new(entries),
        }
    }
}

impl PolicyRegistry for PolicyCatalog {
    async fn closest_match(&self, name: &str) -> Result<MapPolicy, Error> {
        let entries = self.entries.read();
        if let Some(policy) = entries.get(name) {
            return Ok(policy.clone());
        }

        let template = entries
            .values()
            .filter(|policy| policy.name.contains('*') && wildcard_matches(&policy.name, name))
            .max_by_key(|policy| literal_len(&policy.name));

        Ok(template.cloned().unwrap_or_else(|| MapPolicy::template("default")))
    }

    async fn install(&self, policy: MapPolicy) -> Result<(), Error> {
        self.entries.write().insert(policy.name.clone(), policy);
        Ok(())
    }

    async fn remove(&self, names: &HashSet<String>) -> Result<(), Error> {
        self.entries.write().retain(|name, _| !names.contains(name));
        Ok(())
    }

    async fn names(&self) -> Result<Vec<String>, Error> {
        Ok(self.entries.read().keys().cloned().collect())
    }
}

/// Matches a `*` pattern against a name. `*` matches any run of characters,
/// including an empty one. A pattern without `*` only matches itself.
fn wildcard_matches(pattern: &str, name: &str) -> bool {
    let segments: Vec<&str> = pattern.split('*').collect();
    if segments.len() == 1 {
        return pattern == name;
    }

    // First segment anchors at the start, last at the end, the rest match
    // greedily in between.
    let Some(mut remaining) = name.strip_prefix(segments[0]) else {
        return false;
    };
    let last = segments[segments.len() - 1];
    for segment in &segments[1..segments.len() - 1] {
        if segment.is_empty() {
            continue;
        }
        match remaining.find(segment) {
            Some(position) => remaining = &remaining[position + segment.len()..],
            None => return false,
        }
    }
    remaining.ends_with(last)
}

fn literal_len(pattern: &str) -> usize {
    pattern.chars().filter(|c| *c != '*').count()
}
