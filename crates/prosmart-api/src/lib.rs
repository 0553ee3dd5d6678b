//! Async client for the ProSmart thermostat cloud API.
//!
//! This crate owns the raw HTTP surface: bearer-token authentication with
//! transparent re-login, the retry policies (reads retry without bound,
//! writes are bounded), and the wire models. It deliberately knows nothing
//! about polling schedules or snapshot normalization — that lives in
//! `prosmart-core`.
//!
//! The central type is [`ApiClient`]; construct one per process with a
//! [`TransportConfig`] and [`Credentials`], share it behind an `Arc`, and
//! cancel its [`CancellationToken`](tokio_util::sync::CancellationToken)
//! to shut every retry loop down promptly.

pub mod auth;
pub mod client;
pub mod devices;
pub mod error;
pub mod models;
pub mod transport;

pub use auth::{Credentials, TokenManager};
pub use client::ApiClient;
pub use error::Error;
pub use models::{DeviceRecord, LoginResponse, Reading, RelayStatus, ScanResponse};
pub use transport::TransportConfig;
