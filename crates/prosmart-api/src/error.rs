use thiserror::Error;

/// Top-level error type for the `prosmart-api` crate.
///
/// Most failure modes never escape this crate: the retrying request paths
/// absorb transient transport and server errors internally. What does
/// surface is either a terminal condition (cancellation), a malformed
/// response body, or a failure on a path that deliberately does not
/// retry (bootstrap listing, bounded command writes).
#[derive(Debug, Error)]
pub enum Error {
    /// Login flow produced a response without a usable access token.
    #[error("Authentication failed: {message}")]
    Authentication { message: String },

    /// HTTP transport error (connection refused, DNS failure, timeout).
    #[error("HTTP transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// URL parsing error.
    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    /// Non-success status from the API, with the raw body for debugging.
    #[error("API error (HTTP {status}): {body}")]
    Api { status: u16, body: String },

    /// JSON deserialization failed, with the raw body for debugging.
    #[error("Deserialization error: {message}")]
    Deserialization { message: String, body: String },

    /// The operation was interrupted by shutdown.
    #[error("Operation cancelled by shutdown")]
    Cancelled,
}

impl Error {
    /// Returns `true` if this is a transient error worth retrying.
    pub fn is_transient(&self) -> bool {
        match self {
            Self::Transport(e) => e.is_timeout() || e.is_connect() || e.is_request(),
            Self::Api { status, .. } => *status != 401,
            _ => false,
        }
    }

    /// The HTTP status code carried by this error, if any.
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Api { status, .. } => Some(*status),
            Self::Transport(e) => e.status().map(|s| s.as_u16()),
            _ => None,
        }
    }
}
