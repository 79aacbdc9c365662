// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

//! The request scope a cache is resolved for.

/// Scope descriptor carried by the request-processing path.
///
/// A cache resource serves either the whole gateway or one API: the scope's
/// optional API identifier is folded into the cache name, so each API gets
/// its own isolated cache under the same resource.
///
/// # Examples
///
/// ```
/// use cachegate::RequestScope;
///
/// let global = RequestScope::global();
/// assert!(global.api().is_none());
///
/// let scoped = RequestScope::for_api("my-api");
/// assert_eq!(scoped.api(), Some("my-api"));
/// ```
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct RequestScope {
    api: Option<String>,
}

impl RequestScope {
    /// A scope with no API attribute; caches resolve gateway-wide.
    #[must_use]
    pub fn global() -> Self {
        Self { api: None }
    }

    /// A scope tied to the given API identifier.
    #[must_use]
    pub fn for_api(api: impl Into<String>) -> Self {
        Self { api: Some(api.into()) }
    }

    /// Returns the API identifier, if the scope carries one.
    #[must_use]
    pub fn api(&self) -> Option<&str> {
        self.api.as_deref()
    }
}
