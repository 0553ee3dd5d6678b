// ── Controller abstraction ──
//
// Full lifecycle management for one ProSmart account: bootstrap device
// discovery, one poll task per device, command dispatch, and shutdown.
// All devices share a single API client (one HTTP pool, one token).

use std::sync::{Arc, OnceLock};

use dashmap::DashMap;
use tokio::sync::{Mutex, watch};
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

use prosmart_api::{ApiClient, Credentials};

use crate::command::Command;
use crate::config::ClientConfig;
use crate::coordinator::{Coordinator, PollState};
use crate::error::CoreError;
use crate::model::{Device, DeviceId};
use crate::snapshot::Snapshot;
use crate::stream::SnapshotStream;

// ── ConnectionState ──────────────────────────────────────────────

/// Connection state observable by consumers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnectionState {
    Disconnected,
    Connecting,
    Connected,
}

// ── Controller ───────────────────────────────────────────────────

/// The main entry point for consumers.
///
/// Cheaply cloneable via `Arc<ControllerInner>`. [`connect()`](Self::connect)
/// discovers devices, spawns the poll tasks, and blocks until every device
/// has published its first snapshot; reads afterwards are wait-free.
#[derive(Clone)]
pub struct Controller {
    inner: Arc<ControllerInner>,
}

struct ControllerInner {
    config: ClientConfig,
    api: Arc<ApiClient>,
    /// Populated once by the bootstrap listing; never mutated after.
    devices: OnceLock<Vec<Device>>,
    coordinators: DashMap<DeviceId, Arc<Coordinator>>,
    connection_state: watch::Sender<ConnectionState>,
    cancel: CancellationToken,
    task_handles: Mutex<Vec<JoinHandle<()>>>,
}

impl Controller {
    /// Create a new Controller from configuration. Does NOT touch the
    /// network -- call [`connect()`](Self::connect) to start polling.
    pub fn new(config: ClientConfig) -> Result<Self, CoreError> {
        let cancel = CancellationToken::new();
        let credentials = Credentials {
            email: config.email.clone(),
            password: config.password.clone(),
        };
        let api = ApiClient::new(&config.transport(), credentials, cancel.child_token())?;
        let (connection_state, _) = watch::channel(ConnectionState::Disconnected);

        Ok(Self {
            inner: Arc::new(ControllerInner {
                config,
                api: Arc::new(api),
                devices: OnceLock::new(),
                coordinators: DashMap::new(),
                connection_state,
                cancel,
                task_handles: Mutex::new(Vec::new()),
            }),
        })
    }

    /// Access the controller configuration.
    pub fn config(&self) -> &ClientConfig {
        &self.inner.config
    }

    // ── Connection lifecycle ─────────────────────────────────────

    /// Fetch the account's device listing (one-shot bootstrap).
    ///
    /// Idempotent: the first successful call caches the listing for the
    /// process lifetime. A failure here is a setup failure -- it is
    /// surfaced, not retried.
    pub async fn discover(&self) -> Result<Vec<Device>, CoreError> {
        if let Some(devices) = self.inner.devices.get() {
            return Ok(devices.clone());
        }

        let records = self.inner.api.list_devices().await.map_err(|e| {
            CoreError::SetupFailed {
                message: format!("device listing failed: {e}"),
            }
        })?;
        let devices: Vec<Device> = records.iter().map(Device::from).collect();
        debug!(count = devices.len(), "device listing complete");

        Ok(self.inner.devices.get_or_init(|| devices).clone())
    }

    /// Connect: discover devices, spawn one poll task per device, and
    /// block until every device has published its first snapshot.
    pub async fn connect(&self) -> Result<(), CoreError> {
        let _ = self
            .inner
            .connection_state
            .send(ConnectionState::Connecting);

        let devices = self.discover().await?;

        {
            let mut handles = self.inner.task_handles.lock().await;
            for device in &devices {
                if self.inner.coordinators.contains_key(&device.id) {
                    continue;
                }
                let coordinator = Arc::new(Coordinator::new(
                    device.clone(),
                    Arc::clone(&self.inner.api),
                    self.inner.cancel.child_token(),
                ));
                self.inner
                    .coordinators
                    .insert(device.id.clone(), Arc::clone(&coordinator));
                handles.push(tokio::spawn(
                    coordinator.poll_task(self.inner.config.poll_interval),
                ));
            }
        }

        // Setup is not ready until every device has one snapshot. The
        // transport retries beneath this, so the wait only ends in
        // success or shutdown.
        let waits = devices.iter().map(|d| self.await_first_refresh(&d.id));
        for result in futures_util::future::join_all(waits).await {
            result?;
        }

        let _ = self.inner.connection_state.send(ConnectionState::Connected);
        info!(devices = devices.len(), "connected");
        Ok(())
    }

    /// Stop all polling and interrupt in-flight retries.
    ///
    /// Safe to call more than once; waits for every spawned task to
    /// observe the cancellation and exit.
    pub async fn shutdown(&self) {
        self.inner.cancel.cancel();

        let mut handles = self.inner.task_handles.lock().await;
        for handle in handles.drain(..) {
            let _ = handle.await;
        }

        let _ = self
            .inner
            .connection_state
            .send(ConnectionState::Disconnected);
        debug!("shut down");
    }

    // ── State observation ────────────────────────────────────────

    /// Subscribe to connection state changes.
    pub fn connection_state(&self) -> watch::Receiver<ConnectionState> {
        self.inner.connection_state.subscribe()
    }

    /// Devices discovered at bootstrap (empty before [`discover`](Self::discover)).
    pub fn devices(&self) -> Vec<Device> {
        self.inner.devices.get().cloned().unwrap_or_default()
    }

    /// Current snapshot for one device.
    pub fn snapshot(&self, device_id: &DeviceId) -> Result<Arc<Snapshot>, CoreError> {
        Ok(self.coordinator(device_id)?.snapshot())
    }

    /// Subscribe to one device's snapshot changes.
    pub fn subscribe(&self, device_id: &DeviceId) -> Result<SnapshotStream, CoreError> {
        Ok(self.coordinator(device_id)?.subscribe())
    }

    /// Current poll state for one device.
    pub fn poll_state(&self, device_id: &DeviceId) -> Result<PollState, CoreError> {
        Ok(self.coordinator(device_id)?.poll_state())
    }

    /// When one device last refreshed successfully.
    pub fn last_refresh(
        &self,
        device_id: &DeviceId,
    ) -> Result<Option<chrono::DateTime<chrono::Utc>>, CoreError> {
        Ok(self.coordinator(device_id)?.last_refresh())
    }

    /// Block until one device has published its first snapshot.
    pub async fn await_first_refresh(&self, device_id: &DeviceId) -> Result<(), CoreError> {
        let coordinator = self.coordinator(device_id)?;
        coordinator.await_first_refresh().await
    }

    // ── Command execution ────────────────────────────────────────

    /// Validate and send a control command to one device.
    ///
    /// On success the commanded value is folded into the published
    /// snapshot immediately; the next poll reconciles authoritatively.
    /// On failure the published snapshot is left untouched.
    pub async fn send_command(
        &self,
        device_id: &DeviceId,
        command: Command,
    ) -> Result<(), CoreError> {
        command.validate()?;

        let known = self.inner.coordinators.contains_key(device_id)
            || self
                .inner
                .devices
                .get()
                .is_some_and(|devices| devices.iter().any(|d| &d.id == device_id));
        if !known {
            return Err(CoreError::DeviceNotFound {
                id: device_id.to_string(),
            });
        }

        let payload = command.wire_payload();
        self.inner
            .api
            .send_command(device_id.as_str(), &payload)
            .await
            .map_err(|e| match e {
                prosmart_api::Error::Cancelled => CoreError::Cancelled,
                e => CoreError::CommandFailed {
                    message: e.to_string(),
                },
            })?;

        if let Some(coordinator) = self.inner.coordinators.get(device_id) {
            coordinator.apply_optimistic(&command);
        }

        debug!(device = %device_id, ?command, "command acknowledged");
        Ok(())
    }

    // ── Private helpers ──────────────────────────────────────────

    fn coordinator(&self, device_id: &DeviceId) -> Result<Arc<Coordinator>, CoreError> {
        self.inner
            .coordinators
            .get(device_id)
            .map(|entry| Arc::clone(entry.value()))
            .ok_or_else(|| CoreError::DeviceNotFound {
                id: device_id.to_string(),
            })
    }
}
