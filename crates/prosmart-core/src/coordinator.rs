// ── Per-device poll coordinator ──
//
// Owns the refresh cycle for one thermostat: fetch raw state through the
// retrying transport, normalize, publish atomically. The previous
// snapshot stays visible across failed cycles (stale-but-available);
// consumers watch the channel and never see a torn update.

use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use tokio::sync::watch;
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

use prosmart_api::ApiClient;

use crate::command::Command;
use crate::error::CoreError;
use crate::model::Device;
use crate::snapshot::Snapshot;
use crate::stream::SnapshotStream;

/// Observable state of one device's poll cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PollState {
    /// No fetch has run yet.
    Idle,
    /// A fetch is in flight.
    Fetching,
    /// The last cycle published a fresh snapshot.
    Published,
    /// The last cycle failed; the previous snapshot is still served.
    FailedTransient,
}

/// Poll coordinator for a single device.
///
/// Created by the controller at connect time; shared behind an `Arc`
/// between the poll task and command/read paths.
pub struct Coordinator {
    device: Device,
    api: Arc<ApiClient>,
    cancel: CancellationToken,
    snapshot: watch::Sender<Arc<Snapshot>>,
    state: watch::Sender<PollState>,
    last_refresh: watch::Sender<Option<DateTime<Utc>>>,
    ready: watch::Sender<bool>,
}

impl Coordinator {
    pub(crate) fn new(device: Device, api: Arc<ApiClient>, cancel: CancellationToken) -> Self {
        let (snapshot, _) = watch::channel(Arc::new(Snapshot::default()));
        let (state, _) = watch::channel(PollState::Idle);
        let (last_refresh, _) = watch::channel(None);
        let (ready, _) = watch::channel(false);

        Self {
            device,
            api,
            cancel,
            snapshot,
            state,
            last_refresh,
            ready,
        }
    }

    /// The device this coordinator polls.
    pub fn device(&self) -> &Device {
        &self.device
    }

    /// Current snapshot (cheap `Arc` clone).
    pub fn snapshot(&self) -> Arc<Snapshot> {
        self.snapshot.borrow().clone()
    }

    /// Subscribe to snapshot changes.
    pub fn subscribe(&self) -> SnapshotStream {
        SnapshotStream::new(self.snapshot.subscribe())
    }

    /// Current poll state.
    pub fn poll_state(&self) -> PollState {
        *self.state.borrow()
    }

    /// When the last successful refresh completed, if ever.
    pub fn last_refresh(&self) -> Option<DateTime<Utc>> {
        *self.last_refresh.borrow()
    }

    /// Resolve once the first successful refresh has published, or fail
    /// with [`CoreError::Cancelled`] if shutdown wins the race.
    pub async fn await_first_refresh(&self) -> Result<(), CoreError> {
        let mut ready = self.ready.subscribe();
        tokio::select! {
            () = self.cancel.cancelled() => Err(CoreError::Cancelled),
            result = ready.wait_for(|done| *done) => {
                result.map(|_| ()).map_err(|_| CoreError::Cancelled)
            }
        }
    }

    /// One fetch → normalize → publish cycle.
    async fn refresh(&self) -> Result<(), CoreError> {
        self.state.send_replace(PollState::Fetching);

        let raw = self.api.scan_device(self.device.id.as_str()).await?;
        let snapshot = Snapshot::from_scan(&raw);

        self.snapshot.send_replace(Arc::new(snapshot));
        self.last_refresh.send_replace(Some(Utc::now()));
        self.state.send_replace(PollState::Published);
        self.ready.send_replace(true);

        debug!(device = %self.device.id, "snapshot published");
        Ok(())
    }

    /// Fold a confirmed command into the published snapshot ahead of the
    /// next poll. The snapshot is still replaced wholesale — readers see
    /// either the pre-command or post-command value set, never a mix.
    pub(crate) fn apply_optimistic(&self, command: &Command) {
        self.snapshot.send_modify(|current| {
            let mut next = (**current).clone();
            command.fold_into(&mut next);
            *current = Arc::new(next);
        });
    }

    /// The periodic poll loop. The first tick fires immediately, so the
    /// first refresh starts as soon as the task is spawned.
    pub(crate) async fn poll_task(self: Arc<Self>, period: Duration) {
        let mut interval = tokio::time::interval(period);
        interval.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);

        loop {
            tokio::select! {
                biased;
                () = self.cancel.cancelled() => break,
                _ = interval.tick() => {
                    match self.refresh().await {
                        Ok(()) => {}
                        Err(CoreError::Cancelled) => break,
                        Err(e) => {
                            warn!(
                                device = %self.device.id,
                                error = %e,
                                "refresh failed, keeping previous snapshot"
                            );
                            self.state.send_replace(PollState::FailedTransient);
                        }
                    }
                }
            }
        }

        debug!(device = %self.device.id, "poll task stopped");
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::model::{DeviceId, HeatingMode};

    fn offline_coordinator() -> Coordinator {
        let api = ApiClient::new(
            &prosmart_api::TransportConfig::default(),
            prosmart_api::Credentials::new("x@example.com", "pw"),
            CancellationToken::new(),
        )
        .unwrap();
        Coordinator::new(
            Device {
                id: DeviceId::new("dev-1"),
                name: "Hallway".into(),
            },
            Arc::new(api),
            CancellationToken::new(),
        )
    }

    #[tokio::test]
    async fn optimistic_update_replaces_the_snapshot_wholesale() {
        let coordinator = offline_coordinator();
        let before = coordinator.snapshot();

        coordinator.apply_optimistic(&Command::SetMode(HeatingMode::Off));

        let after = coordinator.snapshot();
        assert!(!Arc::ptr_eq(&before, &after));
        assert_eq!(after.relay_mode.as_deref(), Some("OFF"));
        // Untouched fields carried over from the previous snapshot.
        assert_eq!(after.temperature, before.temperature);
    }

    #[tokio::test]
    async fn subscribers_observe_optimistic_updates() {
        let coordinator = offline_coordinator();
        let mut stream = coordinator.subscribe();

        coordinator.apply_optimistic(&Command::SetManualSetPoint(23.0));

        let snap = stream.changed().await.unwrap();
        assert_eq!(snap.manual_set_point, Some(23.0));
    }

    #[tokio::test]
    async fn await_first_refresh_loses_to_cancellation() {
        let coordinator = offline_coordinator();
        coordinator.cancel.cancel();

        let result = coordinator.await_first_refresh().await;
        assert!(matches!(result, Err(CoreError::Cancelled)));
    }
}
