// ── Runtime configuration ──
//
// Describes *how* to reach the ProSmart cloud and how the poller behaves.
// Built by the CLI (or any other consumer) and handed to `Controller` --
// core never reads config files.

use std::time::Duration;

use secrecy::SecretString;
use url::Url;

use prosmart_api::transport;

/// How often each device is polled for a fresh snapshot.
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(30);

/// Configuration for one ProSmart account connection.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// API root (defaults to the production cloud).
    pub base_url: Url,
    /// Account email.
    pub email: String,
    /// Account password.
    pub password: SecretString,
    /// Per-device poll period.
    pub poll_interval: Duration,
    /// Per-request timeout.
    pub timeout: Duration,
    /// Fixed delay between retries (login and transient failures).
    pub retry_backoff: Duration,
    /// Attempt budget for write commands before their error surfaces.
    pub command_attempts: u32,
}

impl ClientConfig {
    /// Config with production defaults for the given account.
    pub fn new(email: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            base_url: Url::parse(transport::DEFAULT_BASE_URL).expect("default base URL is valid"),
            email: email.into(),
            password: SecretString::from(password.into()),
            poll_interval: DEFAULT_POLL_INTERVAL,
            timeout: transport::DEFAULT_TIMEOUT,
            retry_backoff: transport::DEFAULT_RETRY_BACKOFF,
            command_attempts: transport::DEFAULT_COMMAND_ATTEMPTS,
        }
    }

    /// The transport slice of this config.
    pub(crate) fn transport(&self) -> prosmart_api::TransportConfig {
        prosmart_api::TransportConfig {
            base_url: self.base_url.clone(),
            timeout: self.timeout,
            retry_backoff: self.retry_backoff,
            command_attempts: self.command_attempts,
        }
    }
}
