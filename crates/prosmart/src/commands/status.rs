//! Snapshot display handler.
//!
//! Renders every snapshot field through the parametrized accessor, so a
//! new field shows up here by extending `SnapshotField::ALL` only.

use owo_colors::OwoColorize;
use tabled::Tabled;

use prosmart_core::{ClientConfig, Controller, SnapshotField};

use crate::commands::util;
use crate::error::CliError;
use crate::output;

#[derive(Tabled)]
struct FieldRow {
    #[tabled(rename = "Field")]
    field: &'static str,
    #[tabled(rename = "Value")]
    value: String,
    #[tabled(rename = "Unit")]
    unit: &'static str,
}

pub async fn handle(config: ClientConfig, device: Option<&str>) -> Result<(), CliError> {
    let controller = Controller::new(config)?;
    controller.connect().await?;

    let selected = util::select_devices(&controller.devices(), device)?;
    for device in &selected {
        let snapshot = controller.snapshot(&device.id)?;

        println!("\n{} ({})", device.name.bold(), device.id);
        if let Some(refreshed) = controller.last_refresh(&device.id)? {
            println!("{}", format!("as of {}", refreshed.to_rfc3339()).dimmed());
        }

        let rows: Vec<FieldRow> = SnapshotField::ALL
            .iter()
            .map(|&field| FieldRow {
                field: field.label(),
                value: snapshot
                    .field(field)
                    .map_or_else(|| output::UNKNOWN.to_owned(), |v| v.to_string()),
                unit: field.unit().unwrap_or(""),
            })
            .collect();
        println!("{}", output::render_table(&rows));
    }

    controller.shutdown().await;
    Ok(())
}
