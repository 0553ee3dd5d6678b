//! Config file management (no credentials required).

use crate::cli::{ConfigCommand, GlobalOpts};
use crate::config::{self, FileConfig};
use crate::error::CliError;

pub fn handle(cmd: ConfigCommand, global: &GlobalOpts) -> Result<(), CliError> {
    let path = config::config_path(global.config.as_deref());

    match cmd {
        ConfigCommand::Path => {
            println!("{}", path.display());
        }

        ConfigCommand::Init => {
            if path.exists() {
                println!("Config already exists at {}", path.display());
                return Ok(());
            }
            if let Some(parent) = path.parent() {
                std::fs::create_dir_all(parent)?;
            }
            std::fs::write(&path, config::TEMPLATE)?;
            println!("Wrote config template to {}", path.display());
        }

        ConfigCommand::Show => {
            let file = config::load(&path)?;
            let redacted = FileConfig {
                password: file.password.as_ref().map(|_| "<redacted>".into()),
                ..file
            };
            let rendered = toml::to_string_pretty(&redacted).map_err(|e| CliError::Validation {
                field: "config".into(),
                reason: e.to_string(),
            })?;
            print!("{rendered}");
        }
    }

    Ok(())
}
