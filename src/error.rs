//! Error types for Getty vocabulary operations.
//!
//! This module provides the [`GettyError`] type for all provider operations
//! and the [`Result`] convenience type.
//!
//! Absence is not an error: lookups that resolve to nothing return `Ok(None)`.

use thiserror::Error;

/// Error type for all Getty provider operations.
#[derive(Error, Debug)]
pub enum GettyError {
    /// A caller-supplied argument is malformed (bad query shape, illegal identifier).
    ///
    /// Raised before any network access takes place.
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// The RDF or SPARQL service could not be reached or answered with a failure status.
    #[error("Upstream unavailable ({url}): {reason}")]
    UpstreamUnavailable {
        /// The URL that was requested.
        url: String,
        /// Why the request failed.
        reason: String,
    },

    /// The service answered, but the body could not be interpreted.
    #[error("Malformed upstream data: {0}")]
    MalformedData(String),

    /// The operation is deliberately not supported by this provider.
    #[error("Unsupported operation: {0}")]
    Unsupported(String),

    /// The HTTP client could not be constructed.
    #[error("HTTP client error: {0}")]
    Http(#[from] reqwest::Error),
}

impl GettyError {
    /// Builds an [`GettyError::UpstreamUnavailable`] for `url`.
    pub fn unavailable(url: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::UpstreamUnavailable {
            url: url.into(),
            reason: reason.into(),
        }
    }

    /// Returns true if a retry might succeed.
    #[must_use]
    pub const fn is_transient(&self) -> bool {
        matches!(self, Self::UpstreamUnavailable { .. })
    }
}

/// Convenience type alias for [`std::result::Result`] with [`GettyError`].
pub type Result<T> = std::result::Result<T, GettyError>;
