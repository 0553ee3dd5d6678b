//! Device listing handler.

use tabled::Tabled;

use prosmart_core::{ClientConfig, Controller, Device};

use crate::error::CliError;
use crate::output;

#[derive(Tabled)]
struct DeviceRow {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "Name")]
    name: String,
}

impl From<&Device> for DeviceRow {
    fn from(d: &Device) -> Self {
        Self {
            id: d.id.to_string(),
            name: d.name.clone(),
        }
    }
}

pub async fn handle(config: ClientConfig) -> Result<(), CliError> {
    let controller = Controller::new(config)?;
    let devices = controller.discover().await?;
    controller.shutdown().await;

    if devices.is_empty() {
        println!("No devices registered to this account.");
        return Ok(());
    }

    let rows: Vec<DeviceRow> = devices.iter().map(DeviceRow::from).collect();
    println!("{}", output::render_table(&rows));
    Ok(())
}
