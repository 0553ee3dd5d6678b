// Shared transport configuration for building reqwest::Client instances.
//
// The cloud API sits behind a fixed 10s request timeout that is
// independent of the retry policy layered on top; both knobs live here
// so tests can shrink them.

use std::time::Duration;

use url::Url;

/// Production endpoint of the ProSmart cloud.
pub const DEFAULT_BASE_URL: &str = "https://api.prosmartsystem.com";

/// Per-request timeout applied to every HTTP call.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

/// Fixed delay between retry attempts (login and transient failures).
pub const DEFAULT_RETRY_BACKOFF: Duration = Duration::from_secs(10);

/// Default attempt budget for write commands.
pub const DEFAULT_COMMAND_ATTEMPTS: u32 = 3;

/// Transport configuration for building the HTTP client.
#[derive(Debug, Clone)]
pub struct TransportConfig {
    /// API root, e.g. `https://api.prosmartsystem.com`.
    pub base_url: Url,
    /// Per-request timeout.
    pub timeout: Duration,
    /// Delay between retries of failed requests and logins.
    pub retry_backoff: Duration,
    /// How many attempts a write command gets before its error surfaces.
    pub command_attempts: u32,
}

impl Default for TransportConfig {
    fn default() -> Self {
        Self {
            base_url: Url::parse(DEFAULT_BASE_URL).expect("default base URL is valid"),
            timeout: DEFAULT_TIMEOUT,
            retry_backoff: DEFAULT_RETRY_BACKOFF,
            command_attempts: DEFAULT_COMMAND_ATTEMPTS,
        }
    }
}

impl TransportConfig {
    /// Build a `reqwest::Client` from this config.
    pub fn build_client(&self) -> Result<reqwest::Client, crate::error::Error> {
        reqwest::Client::builder()
            .timeout(self.timeout)
            .user_agent(concat!("prosmart-api/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(crate::error::Error::Transport)
    }
}
