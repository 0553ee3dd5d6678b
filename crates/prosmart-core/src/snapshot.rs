// ── Snapshot normalization ──
//
// Flattens the nested scan response into the typed per-device snapshot
// consumers read. Normalization is a pure function of the raw response:
// absent input fields stay `None`, never a fabricated default, so "no
// boost left" (0) and "boost field missing" remain distinguishable.

use std::fmt;

use serde::{Deserialize, Serialize};

use prosmart_api::ScanResponse;

/// Reading type tag that carries the ambient temperature.
const TEMPERATURE_TAG: &str = "TEMPERATURE";

/// Normalized state of one thermostat at a point in time.
///
/// Replaced wholesale on every successful poll — consumers hold an
/// `Arc<Snapshot>` and can never observe a half-updated value set.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Snapshot {
    pub temperature: Option<f64>,
    pub manual_set_point: Option<f64>,
    pub schedule_set_point: Option<f64>,
    pub boost_set_point: Option<f64>,
    pub boost_active: Option<bool>,
    /// Remaining boost time, rounded to whole minutes from the wire's
    /// seconds. `Some(0)` means an expiring boost; `None` means the
    /// device did not report the field.
    pub boost_remaining_minutes: Option<u32>,
    pub relay_state: Option<String>,
    pub relay_mode: Option<String>,
    pub function: Option<String>,
    pub hysteresis_high: Option<f64>,
    pub hysteresis_low: Option<f64>,
}

impl Snapshot {
    /// Flatten a raw scan into a snapshot.
    ///
    /// Rules: temperature comes from the first reading tagged
    /// `TEMPERATURE`; relay fields come from the first relay entry;
    /// everything absent stays `None`.
    pub fn from_scan(raw: &ScanResponse) -> Self {
        let temperature = raw
            .readings
            .iter()
            .find(|r| r.kind.as_deref() == Some(TEMPERATURE_TAG))
            .and_then(|r| r.reading);

        let relay = raw.relays.first();

        Self {
            temperature,
            manual_set_point: relay.and_then(|r| r.manual_set_point),
            schedule_set_point: relay.and_then(|r| r.schedule_set_point),
            boost_set_point: relay.and_then(|r| r.boost_set_point),
            boost_active: relay.and_then(|r| r.boost_active),
            boost_remaining_minutes: relay
                .and_then(|r| r.boost_remaining)
                .map(minutes_from_seconds),
            relay_state: relay.and_then(|r| r.relay_state.clone()),
            relay_mode: relay.and_then(|r| r.mode.clone()),
            function: relay.and_then(|r| r.function.clone()),
            hysteresis_high: relay.and_then(|r| r.hysteresis_high),
            hysteresis_low: relay.and_then(|r| r.hysteresis_low),
        }
    }

    /// Read one field through the parametrized accessor.
    pub fn field(&self, field: SnapshotField) -> Option<FieldValue> {
        match field {
            SnapshotField::Temperature => self.temperature.map(FieldValue::Float),
            SnapshotField::ManualSetPoint => self.manual_set_point.map(FieldValue::Float),
            SnapshotField::ScheduleSetPoint => self.schedule_set_point.map(FieldValue::Float),
            SnapshotField::BoostSetPoint => self.boost_set_point.map(FieldValue::Float),
            SnapshotField::BoostActive => self.boost_active.map(FieldValue::Bool),
            SnapshotField::BoostRemaining => {
                self.boost_remaining_minutes.map(FieldValue::Minutes)
            }
            SnapshotField::RelayState => self.relay_state.clone().map(FieldValue::Text),
            SnapshotField::RelayMode => self.relay_mode.clone().map(FieldValue::Text),
            SnapshotField::Function => self.function.clone().map(FieldValue::Text),
            SnapshotField::HysteresisHigh => self.hysteresis_high.map(FieldValue::Float),
            SnapshotField::HysteresisLow => self.hysteresis_low.map(FieldValue::Float),
        }
    }
}

#[allow(clippy::cast_sign_loss, clippy::cast_possible_truncation, clippy::as_conversions)]
fn minutes_from_seconds(seconds: f64) -> u32 {
    (seconds / 60.0).round().max(0.0) as u32
}

// ── Parametrized field access ────────────────────────────────────────
//
// One accessor configured by field, instead of one consumer-facing type
// per field. Display adapters iterate `SnapshotField::ALL`.

/// Every field a snapshot exposes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SnapshotField {
    Temperature,
    ManualSetPoint,
    ScheduleSetPoint,
    BoostSetPoint,
    BoostActive,
    BoostRemaining,
    RelayState,
    RelayMode,
    Function,
    HysteresisHigh,
    HysteresisLow,
}

impl SnapshotField {
    pub const ALL: [Self; 11] = [
        Self::Temperature,
        Self::ManualSetPoint,
        Self::ScheduleSetPoint,
        Self::BoostSetPoint,
        Self::BoostActive,
        Self::BoostRemaining,
        Self::RelayState,
        Self::RelayMode,
        Self::Function,
        Self::HysteresisHigh,
        Self::HysteresisLow,
    ];

    /// Human-readable label.
    pub fn label(self) -> &'static str {
        match self {
            Self::Temperature => "Temperature",
            Self::ManualSetPoint => "Manual set point",
            Self::ScheduleSetPoint => "Schedule set point",
            Self::BoostSetPoint => "Boost set point",
            Self::BoostActive => "Boost active",
            Self::BoostRemaining => "Boost remaining",
            Self::RelayState => "Relay state",
            Self::RelayMode => "Relay mode",
            Self::Function => "Function",
            Self::HysteresisHigh => "Hysteresis high",
            Self::HysteresisLow => "Hysteresis low",
        }
    }

    /// Display unit, if the field has one.
    pub fn unit(self) -> Option<&'static str> {
        match self {
            Self::Temperature
            | Self::ManualSetPoint
            | Self::ScheduleSetPoint
            | Self::BoostSetPoint
            | Self::HysteresisHigh
            | Self::HysteresisLow => Some("°C"),
            Self::BoostRemaining => Some("min"),
            Self::BoostActive | Self::RelayState | Self::RelayMode | Self::Function => None,
        }
    }
}

/// A typed snapshot field value.
#[derive(Debug, Clone, PartialEq)]
pub enum FieldValue {
    Float(f64),
    Bool(bool),
    Minutes(u32),
    Text(String),
}

impl fmt::Display for FieldValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Float(v) => write!(f, "{v:.1}"),
            Self::Bool(v) => f.write_str(if *v { "ON" } else { "OFF" }),
            Self::Minutes(v) => write!(f, "{v}"),
            Self::Text(v) => f.write_str(v),
        }
    }
}
