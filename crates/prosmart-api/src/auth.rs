// Token acquisition and caching.
//
// One TokenManager is shared by every caller in the process. The cached
// token is either empty or the last token the login endpoint issued;
// a 401 anywhere proves the cached value stale and clears it before the
// next use.

use std::time::Duration;

use secrecy::{ExposeSecret, SecretString};
use serde_json::json;
use tokio::sync::Mutex;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};
use url::Url;

use crate::error::Error;
use crate::models::LoginResponse;

/// Account credentials for the ProSmart cloud.
///
/// Immutable for the process lifetime once constructed.
#[derive(Debug, Clone)]
pub struct Credentials {
    pub email: String,
    pub password: SecretString,
}

impl Credentials {
    pub fn new(email: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            email: email.into(),
            password: SecretString::from(password.into()),
        }
    }
}

/// Owns the bearer token and the login flow.
///
/// The cache lives behind a `tokio::sync::Mutex` that is held across the
/// whole login attempt: concurrent callers that find the cache empty
/// queue on the lock and observe the token the first caller obtained,
/// so a burst of expired-token failures collapses into a single login.
pub struct TokenManager {
    http: reqwest::Client,
    login_url: Url,
    credentials: Credentials,
    token: Mutex<Option<String>>,
    backoff: Duration,
    cancel: CancellationToken,
}

impl TokenManager {
    pub(crate) fn new(
        http: reqwest::Client,
        login_url: Url,
        credentials: Credentials,
        backoff: Duration,
        cancel: CancellationToken,
    ) -> Self {
        Self {
            http,
            login_url,
            credentials,
            token: Mutex::new(None),
            backoff,
            cancel,
        }
    }

    /// Return a usable token, logging in first if none is cached.
    ///
    /// Never fails on network or server trouble — the login loop keeps
    /// retrying with a fixed backoff until it succeeds. The only error
    /// is [`Error::Cancelled`] when shutdown interrupts the wait.
    pub async fn token(&self) -> Result<String, Error> {
        let mut guard = self.token.lock().await;
        if let Some(token) = guard.as_ref() {
            return Ok(token.clone());
        }
        let token = self.login().await?;
        *guard = Some(token.clone());
        Ok(token)
    }

    /// Drop the cached token if it still equals `stale`.
    ///
    /// The comparison keeps a late 401 (raced against a concurrent
    /// re-login) from wiping a token that was just refreshed.
    pub async fn invalidate(&self, stale: &str) {
        let mut guard = self.token.lock().await;
        if guard.as_deref() == Some(stale) {
            debug!("clearing stale access token");
            *guard = None;
        }
    }

    /// Retry-forever login loop. Blocks until a token is obtained or the
    /// process is torn down.
    async fn login(&self) -> Result<String, Error> {
        loop {
            match self.try_login().await {
                Ok(token) => {
                    info!("login successful");
                    return Ok(token);
                }
                Err(e) => {
                    warn!(error = %e, backoff = ?self.backoff, "login failed, retrying");
                }
            }

            tokio::select! {
                () = self.cancel.cancelled() => return Err(Error::Cancelled),
                () = tokio::time::sleep(self.backoff) => {}
            }
        }
    }

    /// One login attempt against `POST /api/auth/login`.
    async fn try_login(&self) -> Result<String, Error> {
        let resp = self
            .http
            .post(self.login_url.clone())
            .json(&json!({
                "email": self.credentials.email,
                "password": self.credentials.password.expose_secret(),
            }))
            .send()
            .await
            .map_err(Error::Transport)?;

        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(Error::Api {
                status: status.as_u16(),
                body,
            });
        }

        let body = resp.text().await.map_err(Error::Transport)?;
        let parsed: LoginResponse =
            serde_json::from_str(&body).map_err(|e| Error::Deserialization {
                message: e.to_string(),
                body: body.clone(),
            })?;

        parsed
            .access_token
            .filter(|t| !t.is_empty())
            .ok_or_else(|| Error::Authentication {
                message: "login response contained no access token".into(),
            })
    }
}

impl std::fmt::Debug for TokenManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenManager")
            .field("login_url", &self.login_url.as_str())
            .field("email", &self.credentials.email)
            .finish_non_exhaustive()
    }
}
