// ── Core error types ──
//
// User-facing errors from prosmart-core. Consumers never see raw
// transport errors; the `From<prosmart_api::Error>` impl translates
// them into domain-appropriate variants. Most transient conditions never
// reach this type at all — they are absorbed by the retry policies in
// `prosmart-api` and show up only as stale snapshots and log entries.

use thiserror::Error;

/// Unified error type for the core crate.
#[derive(Debug, Error)]
pub enum CoreError {
    /// Bootstrap failed (device listing or client construction).
    #[error("Setup failed: {message}")]
    SetupFailed { message: String },

    /// The referenced device is not part of this account.
    #[error("Device not found: {id}")]
    DeviceNotFound { id: String },

    /// A command value was rejected before any network traffic.
    #[error("Invalid value for {field}: {reason}")]
    Validation { field: &'static str, reason: String },

    /// A write command exhausted its attempt budget.
    #[error("Command failed: {message}")]
    CommandFailed { message: String },

    /// The remote returned a body that could not be interpreted.
    #[error("Malformed response: {message}")]
    MalformedResponse { message: String },

    /// Wrapped API error for paths that surface remote failures.
    #[error("API error: {message}")]
    Api {
        message: String,
        status: Option<u16>,
    },

    /// Shutdown interrupted the operation.
    #[error("Shutting down")]
    Cancelled,
}

// ── Conversion from transport-layer errors ───────────────────────────

impl From<prosmart_api::Error> for CoreError {
    fn from(err: prosmart_api::Error) -> Self {
        match err {
            prosmart_api::Error::Authentication { message } => CoreError::SetupFailed { message },
            prosmart_api::Error::InvalidUrl(e) => CoreError::SetupFailed {
                message: format!("invalid URL: {e}"),
            },
            prosmart_api::Error::Transport(ref e) => CoreError::Api {
                message: e.to_string(),
                status: e.status().map(|s| s.as_u16()),
            },
            prosmart_api::Error::Api { status, body } => CoreError::Api {
                message: if body.is_empty() {
                    format!("HTTP {status}")
                } else {
                    body
                },
                status: Some(status),
            },
            prosmart_api::Error::Deserialization { message, body: _ } => {
                CoreError::MalformedResponse { message }
            }
            prosmart_api::Error::Cancelled => CoreError::Cancelled,
        }
    }
}
