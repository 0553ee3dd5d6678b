//! Command dispatch: bridges CLI args -> core operations -> output.

pub mod config_cmd;
pub mod devices;
pub mod set_cmd;
pub mod status;
pub mod util;
pub mod watch;

use prosmart_core::ClientConfig;

use crate::cli::Command;
use crate::error::CliError;

/// Dispatch a network-bound command to the appropriate handler.
pub async fn dispatch(cmd: Command, config: ClientConfig) -> Result<(), CliError> {
    match cmd {
        Command::Devices => devices::handle(config).await,
        Command::Status { device } => status::handle(config, device.as_deref()).await,
        Command::Watch { device } => watch::handle(config, device.as_deref()).await,
        Command::Set(args) => set_cmd::handle(config, args).await,
        // Config is handled before dispatch (needs no credentials)
        Command::Config(_) => unreachable!(),
    }
}
