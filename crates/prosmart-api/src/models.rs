// Wire models for the ProSmart cloud API.
//
// Every field the remote may omit is an Option; unknown fields are kept
// in a flattened `extra` map rather than rejected, so firmware additions
// don't break deserialization.

use serde::Deserialize;

/// Response body of `POST /api/auth/login`.
///
/// A 200 without `access_token` is treated as an authentication failure
/// by the token manager, not as a transport error.
#[derive(Debug, Deserialize)]
pub struct LoginResponse {
    pub access_token: Option<String>,
}

/// One entry of the `GET /api/devices` listing.
#[derive(Debug, Clone, Deserialize)]
pub struct DeviceRecord {
    pub id: String,
    pub name: Option<String>,
    pub serial_number: Option<String>,
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

impl DeviceRecord {
    /// Friendly name, falling back to the serial number, then the raw id.
    pub fn display_name(&self) -> &str {
        self.name
            .as_deref()
            .filter(|n| !n.is_empty())
            .or(self.serial_number.as_deref())
            .unwrap_or(&self.id)
    }
}

/// Raw device state from `GET /api/devices/{id}/cmd/scan`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ScanResponse {
    #[serde(default)]
    pub readings: Vec<Reading>,
    #[serde(default)]
    pub relays: Vec<RelayStatus>,
}

/// One sensor reading; `kind` is the type tag (`"TEMPERATURE"`, ...).
#[derive(Debug, Clone, Deserialize)]
pub struct Reading {
    #[serde(rename = "type")]
    pub kind: Option<String>,
    pub reading: Option<f64>,
}

/// State of one relay channel as reported by a scan.
///
/// `boost_remaining` is in seconds on the wire.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RelayStatus {
    pub manual_set_point: Option<f64>,
    pub schedule_set_point: Option<f64>,
    pub boost_set_point: Option<f64>,
    pub boost_active: Option<bool>,
    pub boost_remaining: Option<f64>,
    pub relay_state: Option<String>,
    pub mode: Option<String>,
    pub function: Option<String>,
    pub hysteresis_high: Option<f64>,
    pub hysteresis_low: Option<f64>,
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}
