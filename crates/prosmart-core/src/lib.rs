//! Polling and command layer between `prosmart-api` and consumers.
//!
//! This crate owns the business logic for ProSmart thermostats:
//!
//! - **[`Controller`]** — Central facade managing the full lifecycle:
//!   [`connect()`](Controller::connect) discovers devices, spawns one
//!   cancellable poll task per device, and blocks until every device has
//!   published its first [`Snapshot`].
//!
//! - **[`Coordinator`]** — Per-device refresh loop. Fetches raw state
//!   through the retry-forever transport, normalizes it, and publishes
//!   the snapshot atomically through a `watch` channel; a failed cycle
//!   keeps the previous snapshot visible.
//!
//! - **[`Snapshot`]** — Flat, typed view of one device's state. Every
//!   field is optional: absent wire data stays absent, it is never
//!   papered over with defaults. [`SnapshotField`] provides parametrized
//!   access for display layers.
//!
//! - **[`Command`]** — Typed control intents (mode, set points, boost,
//!   hysteresis) validated locally, serialized to the relay-1 wire
//!   format, and folded into the snapshot optimistically on success.

pub mod command;
pub mod config;
pub mod controller;
pub mod coordinator;
pub mod error;
pub mod model;
pub mod snapshot;
pub mod stream;

// ── Primary re-exports ──────────────────────────────────────────────
pub use command::{Command, HYSTERESIS_RANGE, MAX_BOOST_MINUTES, RELAY_INDEX, SET_POINT_RANGE};
pub use config::{ClientConfig, DEFAULT_POLL_INTERVAL};
pub use controller::{ConnectionState, Controller};
pub use coordinator::{Coordinator, PollState};
pub use error::CoreError;
pub use model::{Device, DeviceId, HeatingMode};
pub use snapshot::{FieldValue, Snapshot, SnapshotField};
pub use stream::SnapshotStream;
