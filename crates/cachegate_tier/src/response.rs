// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

//! The HTTP-response-shaped payload cached by gateway policies.

use std::collections::BTreeMap;

use bytes::Bytes;

/// Response headers, keyed by header name.
///
/// A name can carry a single value or a list; both shapes appear in the wire
/// format the remote backend reads back.
pub type Headers = BTreeMap<String, HeaderValues>;

/// One or several values for a single header name.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(untagged))]
pub enum HeaderValues {
    /// A single header value.
    One(String),
    /// Multiple values for the same header name.
    Many(Vec<String>),
}

impl From<&str> for HeaderValues {
    fn from(value: &str) -> Self {
        Self::One(value.to_string())
    }
}

impl From<String> for HeaderValues {
    fn from(value: String) -> Self {
        Self::One(value)
    }
}

impl From<Vec<String>> for HeaderValues {
    fn from(values: Vec<String>) -> Self {
        Self::Many(values)
    }
}

/// A cached upstream response: status, headers, and body content.
///
/// This is the composite value the gateway's cache policies store and replay.
/// The body is reference-counted bytes, so cloning a response is cheap.
///
/// # Examples
///
/// ```
/// use cachegate_tier::CachedResponse;
///
/// let response = CachedResponse::new(200)
///     .with_header("content-type", "application/json")
///     .with_body("{\"ok\":true}");
/// assert_eq!(response.status(), 200);
/// assert!(!response.body().is_empty());
/// ```
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CachedResponse {
    status: u16,
    headers: Headers,
    body: Bytes,
}

impl CachedResponse {
    /// Creates a response with the given status, no headers, and an empty body.
    #[must_use]
    pub fn new(status: u16) -> Self {
        Self {
            status,
            headers: Headers::new(),
            body: Bytes::new(),
        }
    }

    /// Creates a response from already-assembled parts.
    #[must_use]
    pub fn from_parts(status: u16, headers: Headers, body: Bytes) -> Self {
        Self { status, headers, body }
    }

    /// Adds a header, replacing any existing values for the name.
    #[must_use]
    pub fn with_header(mut self, name: impl Into<String>, values: impl Into<HeaderValues>) -> Self {
        self.headers.insert(name.into(), values.into());
        self
    }

    /// Sets the body content.
    #[must_use]
    pub fn with_body(mut self, body: impl Into<Bytes>) -> Self {
        self.body = body.into();
        self
    }

    /// Returns the response status code.
    #[must_use]
    pub fn status(&self) -> u16 {
        self.status
    }

    /// Returns the response headers.
    #[must_use]
    pub fn headers(&self) -> &Headers {
        &self.headers
    }

    /// Returns the body content.
    #[must_use]
    pub fn body(&self) -> &Bytes {
        &self.body
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builder_assembles_response() {
        let response = CachedResponse::new(404).with_header("x-cache", "miss").with_body(&b"not found"[..]);

        assert_eq!(response.status(), 404);
        assert_eq!(response.headers().get("x-cache"), Some(&HeaderValues::One("miss".into())));
        assert_eq!(response.body().as_ref(), b"not found");
    }

    #[test]
    fn from_parts_round_trips() {
        let mut headers = Headers::new();
        headers.insert("vary".into(), vec!["accept".to_string(), "origin".to_string()].into());
        let response = CachedResponse::from_parts(200, headers.clone(), Bytes::from_static(b"ok"));

        assert_eq!(response.headers(), &headers);
        assert_eq!(response.body().as_ref(), b"ok");
    }
}
