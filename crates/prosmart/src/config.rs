//! CLI configuration — file + environment resolution.
//!
//! The config file is TOML in the platform config directory; every field
//! can also come from a `PROSMART_*` environment variable. The resolved
//! result is a `prosmart_core::ClientConfig`, which core consumes as-is.

use std::path::{Path, PathBuf};
use std::time::Duration;

use directories::ProjectDirs;
use figment::Figment;
use figment::providers::{Env, Format, Toml};
use serde::{Deserialize, Serialize};

use prosmart_core::ClientConfig;

use crate::cli::GlobalOpts;
use crate::error::CliError;

/// On-disk / environment configuration shape.
#[derive(Debug, Default, Deserialize, Serialize)]
pub struct FileConfig {
    pub email: Option<String>,
    pub password: Option<String>,
    pub api_url: Option<String>,
    pub poll_interval_secs: Option<u64>,
}

/// Template written by `prosmart config init`.
pub const TEMPLATE: &str = "\
# ProSmart account credentials
email = \"you@example.com\"
password = \"...\"

# Optional overrides
# api_url = \"https://api.prosmartsystem.com\"
# poll_interval_secs = 30
";

/// Resolve the config file path: `--config` flag, then the platform
/// config directory, then the working directory as a last resort.
pub fn config_path(override_path: Option<&Path>) -> PathBuf {
    if let Some(path) = override_path {
        return path.to_path_buf();
    }
    ProjectDirs::from("", "", "prosmart").map_or_else(
        || PathBuf::from("prosmart.toml"),
        |dirs| dirs.config_dir().join("config.toml"),
    )
}

/// Load the file config, layering `PROSMART_*` env vars on top.
/// A missing file is not an error — env-only setups are fine.
pub fn load(path: &Path) -> Result<FileConfig, CliError> {
    Figment::new()
        .merge(Toml::file(path))
        .merge(Env::prefixed("PROSMART_"))
        .extract()
        .map_err(CliError::from)
}

/// Translate file config + global flags into a `ClientConfig`.
pub fn resolve(global: &GlobalOpts, file: &FileConfig) -> Result<ClientConfig, CliError> {
    let path = config_path(global.config.as_deref());

    let (Some(email), Some(password)) = (file.email.clone(), file.password.clone()) else {
        return Err(CliError::NoCredentials {
            path: path.display().to_string(),
        });
    };

    let mut config = ClientConfig::new(email, password);

    if let Some(url) = global.api_url.as_deref().or(file.api_url.as_deref()) {
        config.base_url = url.parse().map_err(|_| CliError::Validation {
            field: "api_url".into(),
            reason: format!("invalid URL: {url}"),
        })?;
    }

    if let Some(secs) = file.poll_interval_secs {
        config.poll_interval = Duration::from_secs(secs.max(1));
    }

    config.timeout = Duration::from_secs(global.timeout);

    Ok(config)
}
