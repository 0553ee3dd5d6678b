// ── Domain types ──
//
// Canonical identifiers and the bootstrap-time device record. A Device is
// created once from the listing endpoint and never mutated; its id routes
// every subsequent poll and command.

use std::fmt;

use serde::{Deserialize, Serialize};

use prosmart_api::DeviceRecord;

/// Opaque, stable device identifier (primary key for polls and commands).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DeviceId(String);

impl DeviceId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for DeviceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for DeviceId {
    fn from(id: &str) -> Self {
        Self(id.to_owned())
    }
}

impl From<String> for DeviceId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

/// One thermostat as discovered at bootstrap.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Device {
    pub id: DeviceId,
    /// Friendly name; falls back to the serial number, then the raw id.
    pub name: String,
}

impl From<&DeviceRecord> for Device {
    fn from(record: &DeviceRecord) -> Self {
        Self {
            id: DeviceId::new(record.id.clone()),
            name: record.display_name().to_owned(),
        }
    }
}

/// Relay operating mode accepted by the command endpoint.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    strum::Display,
    strum::EnumString,
    Serialize,
    Deserialize,
)]
#[strum(serialize_all = "UPPERCASE", ascii_case_insensitive)]
#[serde(rename_all = "UPPERCASE")]
pub enum HeatingMode {
    Manual,
    Schedule,
    Off,
}
