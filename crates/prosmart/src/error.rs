//! CLI error types with miette diagnostics.
//!
//! Maps `CoreError` variants into user-facing errors with actionable
//! help text and stable exit codes.

use miette::Diagnostic;
use thiserror::Error;

use prosmart_core::CoreError;

/// Exit codes by error class.
pub mod exit_code {
    pub const SUCCESS: i32 = 0;
    pub const GENERAL: i32 = 1;
    pub const USAGE: i32 = 2;
    pub const AUTH: i32 = 3;
    pub const NOT_FOUND: i32 = 4;
    pub const CONNECTION: i32 = 7;
}

#[derive(Debug, Error, Diagnostic)]
pub enum CliError {
    // ── Configuration ────────────────────────────────────────────────
    #[error("No credentials configured")]
    #[diagnostic(
        code(prosmart::no_credentials),
        help(
            "Create a config file with: prosmart config init\n\
             Expected at: {path}\n\
             Or set PROSMART_EMAIL and PROSMART_PASSWORD."
        )
    )]
    NoCredentials { path: String },

    #[error(transparent)]
    #[diagnostic(code(prosmart::config))]
    Config(Box<figment::Error>),

    // ── Validation ───────────────────────────────────────────────────
    #[error("Invalid value for {field}: {reason}")]
    #[diagnostic(code(prosmart::validation))]
    Validation { field: String, reason: String },

    // ── Resources ────────────────────────────────────────────────────
    #[error("Device '{device}' not found")]
    #[diagnostic(
        code(prosmart::not_found),
        help("Run: prosmart devices to see registered thermostats")
    )]
    NotFound { device: String },

    // ── Connection / setup ───────────────────────────────────────────
    #[error("Could not set up the ProSmart connection")]
    #[diagnostic(
        code(prosmart::setup_failed),
        help(
            "Check your network connection and credentials.\n\
             Detail: {message}"
        )
    )]
    Setup { message: String },

    // ── API ──────────────────────────────────────────────────────────
    #[error("API error: {message}")]
    #[diagnostic(code(prosmart::api_error))]
    Api { message: String },

    // ── Interrupt ────────────────────────────────────────────────────
    #[error("Interrupted")]
    #[diagnostic(code(prosmart::interrupted))]
    Interrupted,

    // ── IO ───────────────────────────────────────────────────────────
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl From<figment::Error> for CliError {
    fn from(err: figment::Error) -> Self {
        Self::Config(Box::new(err))
    }
}

impl CliError {
    /// Map this error to a process exit code.
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::NoCredentials { .. } => exit_code::AUTH,
            Self::NotFound { .. } => exit_code::NOT_FOUND,
            Self::Setup { .. } => exit_code::CONNECTION,
            Self::Validation { .. } => exit_code::USAGE,
            _ => exit_code::GENERAL,
        }
    }
}

// ── CoreError → CliError mapping ─────────────────────────────────────

impl From<CoreError> for CliError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::SetupFailed { message } => CliError::Setup { message },

            CoreError::DeviceNotFound { id } => CliError::NotFound { device: id },

            CoreError::Validation { field, reason } => CliError::Validation {
                field: field.to_owned(),
                reason,
            },

            CoreError::CommandFailed { message }
            | CoreError::MalformedResponse { message }
            | CoreError::Api { message, .. } => CliError::Api { message },

            CoreError::Cancelled => CliError::Interrupted,
        }
    }
}
