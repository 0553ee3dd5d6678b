// Device endpoints
//
// Listing, state scan, and relay commands. Each method picks the retry
// strategy its role demands: the one-shot bootstrap listing surfaces
// failures, the steady-state scan retries without bound, and command
// writes use the bounded budget.

use tracing::debug;

use crate::client::ApiClient;
use crate::error::Error;
use crate::models::{DeviceRecord, ScanResponse};

impl ApiClient {
    /// List the account's registered devices.
    ///
    /// `GET /api/devices` — single attempt; a failure here is a setup
    /// failure for the caller, not something to wait out.
    pub async fn list_devices(&self) -> Result<Vec<DeviceRecord>, Error> {
        let url = self.api_url("devices");
        debug!("listing devices");
        self.get_once(url).await
    }

    /// Fetch the current state of one device.
    ///
    /// `GET /api/devices/{id}/cmd/scan` — retries indefinitely; only a
    /// malformed body or cancellation surfaces.
    pub async fn scan_device(&self, device_id: &str) -> Result<ScanResponse, Error> {
        let url = self.api_url(&format!("devices/{device_id}/cmd/scan"));
        self.get_retry(url).await
    }

    /// Send a relay command to one device.
    ///
    /// `POST /api/devices/{id}/cmd` with a payload such as
    /// `{"relay": 1, "manual_set_point": 21.5}`.
    pub async fn send_command(
        &self,
        device_id: &str,
        payload: &serde_json::Value,
    ) -> Result<(), Error> {
        let url = self.api_url(&format!("devices/{device_id}/cmd"));
        debug!(device = device_id, %payload, "sending command");
        self.post_bounded(url, payload).await
    }
}
