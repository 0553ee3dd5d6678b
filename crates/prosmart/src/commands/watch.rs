//! Live snapshot follower.
//!
//! Subscribes to every selected device's snapshot channel and prints a
//! line per published update until Ctrl-C.

use std::sync::Arc;

use futures_util::StreamExt;
use owo_colors::OwoColorize;

use prosmart_core::{ClientConfig, Controller, Device, Snapshot};

use crate::commands::util;
use crate::error::CliError;
use crate::output;

pub async fn handle(config: ClientConfig, device: Option<&str>) -> Result<(), CliError> {
    let controller = Controller::new(config)?;
    controller.connect().await?;

    let selected = util::select_devices(&controller.devices(), device)?;

    let mut tagged = Vec::new();
    for device in &selected {
        let stream = controller.subscribe(&device.id)?.into_stream();
        let device = device.clone();
        tagged.push(stream.map(move |snap| (device.clone(), snap)).boxed());
    }
    let mut updates = futures_util::stream::select_all(tagged);

    println!(
        "Watching {} device(s); press Ctrl-C to stop.",
        selected.len()
    );

    loop {
        tokio::select! {
            _ = tokio::signal::ctrl_c() => break,
            Some((device, snapshot)) = updates.next() => print_update(&device, &snapshot),
        }
    }

    controller.shutdown().await;
    Ok(())
}

fn print_update(device: &Device, snapshot: &Arc<Snapshot>) {
    let stamp = chrono::Local::now().format("%H:%M:%S");
    let show_f64 =
        |v: Option<f64>| v.map_or_else(|| output::UNKNOWN.to_owned(), |v| format!("{v:.1}"));
    let show_str = |v: Option<&str>| v.unwrap_or(output::UNKNOWN).to_owned();

    println!(
        "[{stamp}] {}: {} °C | mode {} | relay {} | boost {}",
        device.name.bold(),
        show_f64(snapshot.temperature),
        show_str(snapshot.relay_mode.as_deref()),
        show_str(snapshot.relay_state.as_deref()),
        snapshot
            .boost_remaining_minutes
            .map_or_else(|| output::UNKNOWN.to_owned(), |m| format!("{m} min")),
    );
}
