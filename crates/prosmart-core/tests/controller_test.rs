// End-to-end controller tests against a wiremock server.
//
// Poll interval and backoff are shrunk to milliseconds so the refresh
// and reconciliation paths run in real time.

use std::time::Duration;

use serde_json::json;
use wiremock::matchers::{body_json, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use prosmart_core::{
    ClientConfig, Command, Controller, CoreError, DeviceId, HeatingMode, PollState,
};

// ── Helpers ─────────────────────────────────────────────────────────

fn test_config(server: &MockServer) -> ClientConfig {
    let mut config = ClientConfig::new("user@example.com", "hunter2");
    config.base_url = server.uri().parse().expect("mock server URI");
    config.poll_interval = Duration::from_millis(50);
    config.retry_backoff = Duration::from_millis(20);
    config.timeout = Duration::from_secs(2);
    config.command_attempts = 2;
    config
}

async fn mount_login(server: &MockServer) {
    Mock::given(method("POST"))
        .and(path("/api/auth/login"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "access_token": "tok" })))
        .mount(server)
        .await;
}

async fn mount_device_listing(server: &MockServer) {
    Mock::given(method("GET"))
        .and(path("/api/devices"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            { "id": "dev-1", "name": "Hallway" },
        ])))
        .mount(server)
        .await;
}

fn scan_body(mode: &str, manual: f64) -> serde_json::Value {
    json!({
        "readings": [{ "type": "TEMPERATURE", "reading": 21.3 }],
        "relays": [{
            "manual_set_point": manual,
            "schedule_set_point": 19.0,
            "boost_set_point": 24.0,
            "boost_active": false,
            "boost_remaining": 0,
            "relay_state": "OFF",
            "mode": mode,
            "function": "HEATING",
            "hysteresis_high": 0.5,
            "hysteresis_low": 0.3,
        }]
    })
}

/// Poll `check` until it returns true or the deadline passes.
async fn eventually(deadline: Duration, mut check: impl FnMut() -> bool) -> bool {
    let start = tokio::time::Instant::now();
    while start.elapsed() < deadline {
        if check() {
            return true;
        }
        tokio::time::sleep(Duration::from_millis(10)).await;
    }
    false
}

// ── Connect / first refresh ─────────────────────────────────────────

#[tokio::test]
async fn connect_blocks_until_the_first_snapshot_is_published() {
    let server = MockServer::start().await;
    mount_login(&server).await;
    mount_device_listing(&server).await;
    Mock::given(method("GET"))
        .and(path("/api/devices/dev-1/cmd/scan"))
        .respond_with(ResponseTemplate::new(200).set_body_json(scan_body("MANUAL", 21.5)))
        .mount(&server)
        .await;

    let controller = Controller::new(test_config(&server)).expect("controller");
    controller.connect().await.expect("connect");

    let devices = controller.devices();
    assert_eq!(devices.len(), 1);
    assert_eq!(devices[0].name, "Hallway");

    let id = DeviceId::new("dev-1");
    let snap = controller.snapshot(&id).expect("snapshot");
    assert_eq!(snap.temperature, Some(21.3));
    assert_eq!(snap.manual_set_point, Some(21.5));
    assert_eq!(snap.relay_mode.as_deref(), Some("MANUAL"));
    assert_eq!(snap.boost_remaining_minutes, Some(0));
    assert_eq!(controller.poll_state(&id).expect("state"), PollState::Published);
    assert!(controller.last_refresh(&id).expect("refresh").is_some());

    controller.shutdown().await;
}

#[tokio::test]
async fn bootstrap_listing_failure_is_fatal_to_setup() {
    let server = MockServer::start().await;
    mount_login(&server).await;
    Mock::given(method("GET"))
        .and(path("/api/devices"))
        .respond_with(ResponseTemplate::new(500))
        .expect(1)
        .mount(&server)
        .await;

    let controller = Controller::new(test_config(&server)).expect("controller");
    let result = controller.connect().await;

    assert!(
        matches!(result, Err(CoreError::SetupFailed { .. })),
        "got: {result:?}"
    );
    controller.shutdown().await;
}

// ── Stale-but-available behavior ────────────────────────────────────

#[tokio::test]
async fn malformed_poll_keeps_the_previous_snapshot_visible() {
    let server = MockServer::start().await;
    mount_login(&server).await;
    mount_device_listing(&server).await;

    // First scan is good; every later scan returns an unreadable body.
    Mock::given(method("GET"))
        .and(path("/api/devices/dev-1/cmd/scan"))
        .respond_with(ResponseTemplate::new(200).set_body_json(scan_body("MANUAL", 21.5)))
        .up_to_n_times(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/devices/dev-1/cmd/scan"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>maintenance</html>"))
        .mount(&server)
        .await;

    let controller = Controller::new(test_config(&server)).expect("controller");
    controller.connect().await.expect("connect");

    let id = DeviceId::new("dev-1");
    let reached_failed = eventually(Duration::from_secs(2), || {
        controller.poll_state(&id).expect("state") == PollState::FailedTransient
    })
    .await;
    assert!(reached_failed, "poll never reported a transient failure");

    // The last good snapshot is still served.
    let snap = controller.snapshot(&id).expect("snapshot");
    assert_eq!(snap.temperature, Some(21.3));
    assert_eq!(snap.manual_set_point, Some(21.5));

    controller.shutdown().await;
}

// ── Command path ────────────────────────────────────────────────────

#[tokio::test]
async fn command_updates_optimistically_and_the_next_poll_reconciles() {
    let server = MockServer::start().await;
    mount_login(&server).await;
    mount_device_listing(&server).await;

    // Scans report MANUAL until the command lands, OFF afterwards. The
    // post-command scan also moves the manual set point, which only a
    // real poll (not the optimistic fold-in) can surface.
    Mock::given(method("GET"))
        .and(path("/api/devices/dev-1/cmd/scan"))
        .respond_with(ResponseTemplate::new(200).set_body_json(scan_body("MANUAL", 21.5)))
        .up_to_n_times(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/devices/dev-1/cmd/scan"))
        .respond_with(ResponseTemplate::new(200).set_body_json(scan_body("OFF", 22.0)))
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/api/devices/dev-1/cmd"))
        .and(body_json(json!({ "relay": 1, "mode": "OFF" })))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&server)
        .await;

    let controller = Controller::new(test_config(&server)).expect("controller");
    controller.connect().await.expect("connect");

    let id = DeviceId::new("dev-1");
    let mut stream = controller.subscribe(&id).expect("subscribe");
    assert_eq!(stream.current().relay_mode.as_deref(), Some("MANUAL"));

    controller
        .send_command(&id, Command::SetMode(HeatingMode::Off))
        .await
        .expect("command");

    // Optimistic update is visible immediately, before any poll tick.
    assert_eq!(
        controller.snapshot(&id).expect("snapshot").relay_mode.as_deref(),
        Some("OFF")
    );

    // The next poll reconciles: commanded mode confirmed, and the set
    // point change only the device knows about becomes visible.
    let confirmed = eventually(Duration::from_secs(2), || {
        let snap = stream.latest();
        snap.relay_mode.as_deref() == Some("OFF") && snap.manual_set_point == Some(22.0)
    })
    .await;
    assert!(confirmed, "poll never reconciled the commanded mode");

    controller.shutdown().await;
}

#[tokio::test]
async fn command_failure_leaves_the_snapshot_untouched() {
    let server = MockServer::start().await;
    mount_login(&server).await;
    mount_device_listing(&server).await;
    Mock::given(method("GET"))
        .and(path("/api/devices/dev-1/cmd/scan"))
        .respond_with(ResponseTemplate::new(200).set_body_json(scan_body("MANUAL", 21.5)))
        .mount(&server)
        .await;
    // Command endpoint rejects everything; attempts are bounded at 2.
    Mock::given(method("POST"))
        .and(path("/api/devices/dev-1/cmd"))
        .respond_with(ResponseTemplate::new(500))
        .expect(2)
        .mount(&server)
        .await;

    let controller = Controller::new(test_config(&server)).expect("controller");
    controller.connect().await.expect("connect");

    let id = DeviceId::new("dev-1");
    let result = controller
        .send_command(&id, Command::SetManualSetPoint(23.0))
        .await;
    assert!(
        matches!(result, Err(CoreError::CommandFailed { .. })),
        "got: {result:?}"
    );

    // No partial command state leaked into the snapshot.
    assert_eq!(
        controller.snapshot(&id).expect("snapshot").manual_set_point,
        Some(21.5)
    );

    controller.shutdown().await;
}

#[tokio::test]
async fn out_of_range_commands_never_reach_the_network() {
    let server = MockServer::start().await;
    mount_login(&server).await;
    mount_device_listing(&server).await;
    Mock::given(method("GET"))
        .and(path("/api/devices/dev-1/cmd/scan"))
        .respond_with(ResponseTemplate::new(200).set_body_json(scan_body("MANUAL", 21.5)))
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/api/devices/dev-1/cmd"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let controller = Controller::new(test_config(&server)).expect("controller");
    controller.connect().await.expect("connect");

    let id = DeviceId::new("dev-1");
    let result = controller
        .send_command(&id, Command::SetManualSetPoint(40.0))
        .await;
    assert!(
        matches!(result, Err(CoreError::Validation { .. })),
        "got: {result:?}"
    );

    controller.shutdown().await;
}

#[tokio::test]
async fn commands_to_unknown_devices_are_rejected() {
    let server = MockServer::start().await;
    mount_login(&server).await;
    mount_device_listing(&server).await;
    Mock::given(method("GET"))
        .and(path("/api/devices/dev-1/cmd/scan"))
        .respond_with(ResponseTemplate::new(200).set_body_json(scan_body("MANUAL", 21.5)))
        .mount(&server)
        .await;

    let controller = Controller::new(test_config(&server)).expect("controller");
    controller.connect().await.expect("connect");

    let result = controller
        .send_command(&DeviceId::new("ghost"), Command::SetMode(HeatingMode::Off))
        .await;
    assert!(
        matches!(result, Err(CoreError::DeviceNotFound { .. })),
        "got: {result:?}"
    );

    controller.shutdown().await;
}

// ── Shutdown ────────────────────────────────────────────────────────

#[tokio::test]
async fn shutdown_interrupts_a_connect_stuck_on_first_refresh() {
    let server = MockServer::start().await;
    mount_login(&server).await;
    mount_device_listing(&server).await;
    // Scans never succeed; the transport retries beneath connect().
    Mock::given(method("GET"))
        .and(path("/api/devices/dev-1/cmd/scan"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&server)
        .await;

    let controller = Controller::new(test_config(&server)).expect("controller");

    let connecting = controller.clone();
    let handle = tokio::spawn(async move { connecting.connect().await });

    tokio::time::sleep(Duration::from_millis(50)).await;
    controller.shutdown().await;

    let result = handle.await.expect("join");
    assert!(
        matches!(result, Err(CoreError::Cancelled)),
        "got: {result:?}"
    );
}
