// ProSmart cloud HTTP client
//
// Wraps `reqwest::Client` with bearer authentication, transparent
// re-login on 401, and the retry policies the endpoint modules build on:
// reads retry without bound, the bootstrap listing does not retry, and
// write commands get a bounded attempt budget. All retry sleeps race the
// cancellation token so shutdown never waits out a backoff.

use std::time::Duration;

use reqwest::Method;
use serde::de::DeserializeOwned;
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};
use url::Url;

use crate::auth::{Credentials, TokenManager};
use crate::error::Error;
use crate::transport::TransportConfig;

/// Authenticated HTTP client for the ProSmart cloud API.
///
/// Cheap to share behind an `Arc`; all interior state (the token cache)
/// is synchronized by the [`TokenManager`].
pub struct ApiClient {
    http: reqwest::Client,
    base_url: Url,
    auth: TokenManager,
    backoff: Duration,
    command_attempts: u32,
    cancel: CancellationToken,
}

impl ApiClient {
    /// Create a new client from a transport config and account credentials.
    ///
    /// `cancel` bounds every retry loop this client runs; cancelling it
    /// makes in-flight calls return [`Error::Cancelled`] promptly.
    pub fn new(
        config: &TransportConfig,
        credentials: Credentials,
        cancel: CancellationToken,
    ) -> Result<Self, Error> {
        let http = config.build_client()?;
        let base_url = config.base_url.clone();
        let login_url = join_api(&base_url, "auth/login")?;
        let auth = TokenManager::new(
            http.clone(),
            login_url,
            credentials,
            config.retry_backoff,
            cancel.clone(),
        );

        Ok(Self {
            http,
            base_url,
            auth,
            backoff: config.retry_backoff,
            command_attempts: config.command_attempts.max(1),
            cancel,
        })
    }

    /// The token manager shared by all calls through this client.
    pub fn auth(&self) -> &TokenManager {
        &self.auth
    }

    /// The API root this client talks to.
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    // ── URL builders ─────────────────────────────────────────────────

    /// Build a full URL for an API path: `{base}/api/{path}`.
    pub(crate) fn api_url(&self, path: &str) -> Url {
        join_api(&self.base_url, path).expect("invalid API URL")
    }

    // ── Request strategies ───────────────────────────────────────────

    /// GET with unbounded retry. Returns only once the call succeeds,
    /// the response body is unreadable, or the client is cancelled.
    pub(crate) async fn get_retry<T: DeserializeOwned>(&self, url: Url) -> Result<T, Error> {
        loop {
            match self.attempt_json(Method::GET, &url, None).await {
                Ok(value) => return Ok(value),
                Err(e @ (Error::Cancelled | Error::Deserialization { .. })) => return Err(e),
                Err(e) => {
                    warn!(url = %url, error = %e, backoff = ?self.backoff, "request failed, retrying");
                }
            }
            self.backoff_or_cancel().await?;
        }
    }

    /// GET with a single attempt. A 401 still triggers one transparent
    /// re-login, but transient failures propagate to the caller.
    pub(crate) async fn get_once<T: DeserializeOwned>(&self, url: Url) -> Result<T, Error> {
        self.attempt_json(Method::GET, &url, None).await
    }

    /// POST with a bounded attempt budget. 401 handling does not consume
    /// an attempt; any other failure does, and the last error surfaces.
    pub(crate) async fn post_bounded(
        &self,
        url: Url,
        body: &serde_json::Value,
    ) -> Result<(), Error> {
        let mut attempt = 1u32;
        loop {
            match self.attempt_empty(Method::POST, &url, Some(body)).await {
                Ok(()) => return Ok(()),
                Err(e @ Error::Cancelled) => return Err(e),
                Err(e) if attempt >= self.command_attempts => return Err(e),
                Err(e) => {
                    warn!(url = %url, attempt, error = %e, "command failed, retrying");
                }
            }
            attempt += 1;
            self.backoff_or_cancel().await?;
        }
    }

    // ── Single authenticated attempt ─────────────────────────────────

    /// One authenticated round trip, parsed as JSON.
    ///
    /// Loops only on 401: the used token is invalidated (compare-before-
    /// clear, so concurrent 401s cause one re-login) and the request is
    /// reissued with a fresh token.
    async fn attempt_json<T: DeserializeOwned>(
        &self,
        method: Method,
        url: &Url,
        body: Option<&serde_json::Value>,
    ) -> Result<T, Error> {
        let text = self.attempt_raw(method, url, body).await?;
        serde_json::from_str(&text).map_err(|e| Error::Deserialization {
            message: e.to_string(),
            body: text,
        })
    }

    /// One authenticated round trip, response body discarded.
    async fn attempt_empty(
        &self,
        method: Method,
        url: &Url,
        body: Option<&serde_json::Value>,
    ) -> Result<(), Error> {
        self.attempt_raw(method, url, body).await.map(|_| ())
    }

    async fn attempt_raw(
        &self,
        method: Method,
        url: &Url,
        body: Option<&serde_json::Value>,
    ) -> Result<String, Error> {
        loop {
            let token = self.auth.token().await?;

            let mut req = self
                .http
                .request(method.clone(), url.clone())
                .bearer_auth(&token);
            if let Some(body) = body {
                req = req.json(body);
            }

            debug!(%method, %url, "sending request");
            let resp = req.send().await.map_err(Error::Transport)?;
            let status = resp.status();

            if status == reqwest::StatusCode::UNAUTHORIZED {
                warn!(%url, "access token rejected, re-authenticating");
                self.auth.invalidate(&token).await;
                continue;
            }

            if !status.is_success() {
                let body = resp.text().await.unwrap_or_default();
                return Err(Error::Api {
                    status: status.as_u16(),
                    body,
                });
            }

            return resp.text().await.map_err(Error::Transport);
        }
    }

    /// Sleep out one backoff period, or bail if shutdown begins first.
    async fn backoff_or_cancel(&self) -> Result<(), Error> {
        tokio::select! {
            () = self.cancel.cancelled() => Err(Error::Cancelled),
            () = tokio::time::sleep(self.backoff) => Ok(()),
        }
    }
}

impl std::fmt::Debug for ApiClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ApiClient")
            .field("base_url", &self.base_url.as_str())
            .field("backoff", &self.backoff)
            .field("command_attempts", &self.command_attempts)
            .finish_non_exhaustive()
    }
}

/// `{base}/api/{path}`, tolerating a trailing slash on the base.
fn join_api(base: &Url, path: &str) -> Result<Url, Error> {
    let root = base.as_str().trim_end_matches('/');
    Url::parse(&format!("{root}/api/{path}")).map_err(Error::InvalidUrl)
}
