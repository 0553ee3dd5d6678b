// ── Command API ──
//
// All write operations flow through a typed `Command`. The controller
// validates, serializes to the wire payload, sends via the API client,
// and folds the commanded value into the published snapshot until the
// next poll confirms it.

use std::ops::RangeInclusive;

use serde_json::json;

use crate::error::CoreError;
use crate::model::HeatingMode;
use crate::snapshot::Snapshot;

/// Relay channel used by every command. Observed hardware exposes a
/// single channel, always addressed as 1.
pub const RELAY_INDEX: u8 = 1;

/// Accepted set-point range in °C.
pub const SET_POINT_RANGE: RangeInclusive<f64> = 5.0..=35.0;

/// Accepted hysteresis band range in °C.
pub const HYSTERESIS_RANGE: RangeInclusive<f64> = 0.0..=20.0;

/// Longest boost the hardware accepts, in minutes.
pub const MAX_BOOST_MINUTES: u32 = 180;

/// A control intent for one thermostat relay.
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    /// Switch the operating mode.
    SetMode(HeatingMode),
    /// Target temperature for manual mode.
    SetManualSetPoint(f64),
    /// Target temperature during a boost.
    SetBoostSetPoint(f64),
    /// Start a boost for the given duration (sent as seconds).
    SetBoostDuration { minutes: u32 },
    /// Upper hysteresis band.
    SetHysteresisHigh(f64),
    /// Lower hysteresis band.
    SetHysteresisLow(f64),
}

impl Command {
    /// Check value ranges locally, before any network traffic.
    pub fn validate(&self) -> Result<(), CoreError> {
        match self {
            Self::SetMode(_) => Ok(()),
            Self::SetManualSetPoint(v) => in_range("manual set point", *v, &SET_POINT_RANGE),
            Self::SetBoostSetPoint(v) => in_range("boost set point", *v, &SET_POINT_RANGE),
            Self::SetBoostDuration { minutes } => {
                if *minutes > MAX_BOOST_MINUTES {
                    Err(CoreError::Validation {
                        field: "boost duration",
                        reason: format!("{minutes} min exceeds the {MAX_BOOST_MINUTES} min maximum"),
                    })
                } else {
                    Ok(())
                }
            }
            Self::SetHysteresisHigh(v) => in_range("hysteresis high", *v, &HYSTERESIS_RANGE),
            Self::SetHysteresisLow(v) => in_range("hysteresis low", *v, &HYSTERESIS_RANGE),
        }
    }

    /// Serialize to the wire format: `{"relay": 1, "<key>": <value>}`.
    ///
    /// Temperatures are rounded to a tenth of a degree (the hardware's
    /// step); boost duration goes out in seconds.
    pub fn wire_payload(&self) -> serde_json::Value {
        match self {
            Self::SetMode(mode) => json!({ "relay": RELAY_INDEX, "mode": mode.to_string() }),
            Self::SetManualSetPoint(v) => {
                json!({ "relay": RELAY_INDEX, "manual_set_point": round_to_tenth(*v) })
            }
            Self::SetBoostSetPoint(v) => {
                json!({ "relay": RELAY_INDEX, "boost_set_point": round_to_tenth(*v) })
            }
            Self::SetBoostDuration { minutes } => {
                json!({ "relay": RELAY_INDEX, "boost_time": minutes * 60 })
            }
            Self::SetHysteresisHigh(v) => {
                json!({ "relay": RELAY_INDEX, "hysteresis_high": round_to_tenth(*v) })
            }
            Self::SetHysteresisLow(v) => {
                json!({ "relay": RELAY_INDEX, "hysteresis_low": round_to_tenth(*v) })
            }
        }
    }

    /// Fold the commanded value into a snapshot ahead of the next poll.
    /// The next successful poll is authoritative and overwrites this.
    pub(crate) fn fold_into(&self, snapshot: &mut Snapshot) {
        match self {
            Self::SetMode(mode) => snapshot.relay_mode = Some(mode.to_string()),
            Self::SetManualSetPoint(v) => {
                snapshot.manual_set_point = Some(round_to_tenth(*v));
            }
            Self::SetBoostSetPoint(v) => snapshot.boost_set_point = Some(round_to_tenth(*v)),
            Self::SetBoostDuration { minutes } => {
                snapshot.boost_remaining_minutes = Some(*minutes);
            }
            Self::SetHysteresisHigh(v) => snapshot.hysteresis_high = Some(round_to_tenth(*v)),
            Self::SetHysteresisLow(v) => snapshot.hysteresis_low = Some(round_to_tenth(*v)),
        }
    }
}

fn in_range(field: &'static str, value: f64, range: &RangeInclusive<f64>) -> Result<(), CoreError> {
    if range.contains(&value) {
        Ok(())
    } else {
        Err(CoreError::Validation {
            field,
            reason: format!(
                "{value} °C is outside the accepted range {}–{} °C",
                range.start(),
                range.end()
            ),
        })
    }
}

fn round_to_tenth(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn wire_payloads_match_the_command_endpoint_shapes() {
        assert_eq!(
            Command::SetMode(HeatingMode::Off).wire_payload(),
            json!({ "relay": 1, "mode": "OFF" })
        );
        assert_eq!(
            Command::SetManualSetPoint(21.52).wire_payload(),
            json!({ "relay": 1, "manual_set_point": 21.5 })
        );
        assert_eq!(
            Command::SetBoostSetPoint(24.0).wire_payload(),
            json!({ "relay": 1, "boost_set_point": 24.0 })
        );
        assert_eq!(
            Command::SetBoostDuration { minutes: 10 }.wire_payload(),
            json!({ "relay": 1, "boost_time": 600 })
        );
        assert_eq!(
            Command::SetHysteresisHigh(0.5).wire_payload(),
            json!({ "relay": 1, "hysteresis_high": 0.5 })
        );
        assert_eq!(
            Command::SetHysteresisLow(0.2).wire_payload(),
            json!({ "relay": 1, "hysteresis_low": 0.2 })
        );
    }

    #[test]
    fn set_points_outside_range_fail_validation() {
        assert!(Command::SetManualSetPoint(4.9).validate().is_err());
        assert!(Command::SetManualSetPoint(35.1).validate().is_err());
        assert!(Command::SetManualSetPoint(5.0).validate().is_ok());
        assert!(Command::SetBoostSetPoint(35.0).validate().is_ok());
    }

    #[test]
    fn boost_duration_is_capped() {
        assert!(Command::SetBoostDuration { minutes: 180 }.validate().is_ok());
        assert!(Command::SetBoostDuration { minutes: 181 }.validate().is_err());
        assert!(Command::SetBoostDuration { minutes: 0 }.validate().is_ok());
    }

    #[test]
    fn hysteresis_is_bounded() {
        assert!(Command::SetHysteresisHigh(20.0).validate().is_ok());
        assert!(Command::SetHysteresisHigh(20.1).validate().is_err());
        assert!(Command::SetHysteresisLow(-0.1).validate().is_err());
    }

    #[test]
    fn fold_into_updates_only_the_commanded_field() {
        let mut snap = Snapshot {
            relay_mode: Some("MANUAL".into()),
            manual_set_point: Some(20.0),
            ..Snapshot::default()
        };

        Command::SetMode(HeatingMode::Off).fold_into(&mut snap);
        assert_eq!(snap.relay_mode.as_deref(), Some("OFF"));
        assert_eq!(snap.manual_set_point, Some(20.0));

        Command::SetBoostDuration { minutes: 15 }.fold_into(&mut snap);
        assert_eq!(snap.boost_remaining_minutes, Some(15));
    }
}
