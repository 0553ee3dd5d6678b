//! Control command handler.

use std::str::FromStr;

use prosmart_core::{ClientConfig, Command, Controller, HeatingMode};

use crate::cli::SetCommand;
use crate::commands::util;
use crate::error::CliError;

pub async fn handle(config: ClientConfig, args: SetCommand) -> Result<(), CliError> {
    let (query, command) = translate(args)?;

    let controller = Controller::new(config)?;
    let devices = controller.discover().await?;
    let device = util::find_device(&devices, &query)?;

    controller.send_command(&device.id, command).await?;
    println!("Command sent to {} ({})", device.name, device.id);

    controller.shutdown().await;
    Ok(())
}

/// Map CLI arguments onto a typed core command.
fn translate(args: SetCommand) -> Result<(String, Command), CliError> {
    Ok(match args {
        SetCommand::Mode { device, mode } => {
            let mode = HeatingMode::from_str(&mode).map_err(|_| CliError::Validation {
                field: "mode".into(),
                reason: format!("expected MANUAL, SCHEDULE or OFF, got '{mode}'"),
            })?;
            (device, Command::SetMode(mode))
        }
        SetCommand::Manual { device, degrees } => (device, Command::SetManualSetPoint(degrees)),
        SetCommand::BoostTemp { device, degrees } => (device, Command::SetBoostSetPoint(degrees)),
        SetCommand::BoostTime { device, minutes } => {
            (device, Command::SetBoostDuration { minutes })
        }
        SetCommand::HysteresisHigh { device, degrees } => {
            (device, Command::SetHysteresisHigh(degrees))
        }
        SetCommand::HysteresisLow { device, degrees } => {
            (device, Command::SetHysteresisLow(degrees))
        }
    })
}
