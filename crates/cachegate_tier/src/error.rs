// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

//! Error types for cache operations.

/// An error from a cache operation.
///
/// This is an opaque error type that can wrap any underlying error from a
/// backend adapter or storage engine client. Use [`std::error::Error::source()`]
/// to access the underlying cause if needed.
///
/// # Example
///
/// ```
/// use cachegate_tier::Error;
///
/// let error = Error::from_message("operation failed");
/// ```
#[ohno::error]
pub struct Error {}

impl Error {
    /// Creates a new error from any type that can be converted to an error.
    ///
    /// This is the public API for creating cache errors from external crates.
    ///
    /// # Examples
    ///
    /// ```
    /// use cachegate_tier::Error;
    ///
    /// let error = Error::from_message("operation failed");
    /// ```
    pub fn from_message(cause: impl Into<Box<dyn std::error::Error + Send + Sync>>) -> Self {
        Self::caused_by(cause)
    }
}

/// A specialized [`Result`] type for cache operations.
pub type Result<T> = std::result::Result<T, Error>;
