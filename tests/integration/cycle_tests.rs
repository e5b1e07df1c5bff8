//! Integration tests for the capture → upload → persist → thermostat cycle.
//!
//! The service runs against mock sensors, camera and storage; the matrix
//! and relays are the in-memory drivers, so pixels and pin levels are
//! asserted directly.

use std::fs;
use std::thread;
use std::time::Duration;

use greenhouse::app::events::AppEvent;
use greenhouse::app::model::{FanState, StatusCode, UploadOutcome};
use greenhouse::app::service::CycleOutcome;
use greenhouse::app::shutdown::Shutdown;
use greenhouse::control::thermostat::FanAction;
use greenhouse::drivers::relay::SimPin;
use greenhouse::drivers::status_indicator::{COLOUR_ERROR, COLOUR_SUCCESS};
use greenhouse::error::CycleError;

use super::mock_hw::{
    DeadRelay, MockCloud, MockHardware, RecordingSink, Rig, config_in, scratch_dir,
};

// ── Happy path ────────────────────────────────────────────────

#[test]
fn successful_cycle_persists_once_and_shows_success() {
    let dir = scratch_dir("happy");
    let mut rig = Rig::new(&config_in(&dir));
    let mut hw = MockHardware::new();
    let mut cloud = MockCloud::new();
    let mut sink = RecordingSink::new();

    let outcome = rig.app.step(&mut hw, &mut cloud, &mut sink).unwrap();

    let CycleOutcome::Persisted { reading, photo } = outcome else {
        panic!("expected a persisted reading");
    };
    assert_eq!(photo.upload, UploadOutcome::Success);
    assert_eq!(reading.log, "2024-06-01 12:00:00.000000");
    assert_eq!(reading.photo.as_deref(), Some("2024-06-01 12:00:00.000000.jpg"));
    assert_eq!(cloud.uploads, vec![photo.remote_key.clone()]);
    assert_eq!(cloud.rows.len(), 1);
    assert_eq!(hw.captures, vec![photo.local_path]);

    let lines = rig.log_lines();
    assert_eq!(lines.len(), 1);
    assert_eq!(lines[0], reading.log_line());

    assert_eq!(rig.indicator.status(), StatusCode::Success);
    assert_eq!(rig.matrix.pixel(0, 0), COLOUR_SUCCESS);
    assert!(sink.has(|e| matches!(e, AppEvent::PhotoUploaded { bytes: 2048, .. })));
    assert!(sink.has(|e| matches!(e, AppEvent::ReadingPersisted { .. })));
    let _ = fs::remove_dir_all(&dir);
}

// ── Thermostat ────────────────────────────────────────────────

#[test]
fn hot_reading_starts_fan_and_asserts_relay() {
    let dir = scratch_dir("hot");
    let mut rig = Rig::new(&config_in(&dir));
    let mut hw = MockHardware::new();
    hw.temperature_c = 36.5;
    let mut sink = RecordingSink::new();

    assert_eq!(rig.fan.state(), FanState::Off);
    let action = rig.app.check_thermostat(&mut hw, &mut sink).unwrap();

    assert_eq!(action, Some(FanAction::Start));
    assert_eq!(rig.fan.state(), FanState::On);
    assert!(!rig.fan_pin.is_high(), "active-low relay must be driven low");
    assert!(sink.has(|e| matches!(
        e,
        AppEvent::FanChanged { state: FanState::On, .. }
    )));

    hw.temperature_c = 30.0;
    let action = rig.app.check_thermostat(&mut hw, &mut sink).unwrap();
    assert_eq!(action, Some(FanAction::Stop));
    assert!(rig.fan_pin.is_high());
    let _ = fs::remove_dir_all(&dir);
}

#[test]
fn reading_at_threshold_leaves_fan_alone() {
    let dir = scratch_dir("edge");
    let mut rig = Rig::new(&config_in(&dir));
    let mut hw = MockHardware::new();
    hw.temperature_c = 36.1;
    let mut sink = RecordingSink::new();

    assert_eq!(rig.app.check_thermostat(&mut hw, &mut sink).unwrap(), None);
    assert_eq!(rig.fan.state(), FanState::Off);
    assert!(sink.events.is_empty());
    let _ = fs::remove_dir_all(&dir);
}

// ── Partial failures ──────────────────────────────────────────

#[test]
fn capture_failure_writes_nothing_and_loop_continues() {
    let dir = scratch_dir("capture");
    let mut rig = Rig::new(&config_in(&dir));
    let mut hw = MockHardware::new();
    hw.fail_capture = true;
    hw.temperature_c = 40.0;
    let mut cloud = MockCloud::new();
    let mut sink = RecordingSink::new();

    let outcome = rig.app.step(&mut hw, &mut cloud, &mut sink).unwrap();

    assert!(matches!(outcome, CycleOutcome::CaptureFailed(_)));
    assert!(cloud.uploads.is_empty());
    assert!(cloud.rows.is_empty());
    assert!(rig.log_lines().is_empty());
    assert_eq!(rig.indicator.status(), StatusCode::Error);
    assert_eq!(rig.matrix.pixel(0, 0), COLOUR_ERROR);
    // The thermostat still ran.
    assert_eq!(rig.fan.state(), FanState::On);

    // Next cycle recovers.
    hw.fail_capture = false;
    hw.advance();
    let outcome = rig.app.step(&mut hw, &mut cloud, &mut sink).unwrap();
    assert!(matches!(outcome, CycleOutcome::Persisted { .. }));
    assert_eq!(cloud.rows.len(), 1);
    assert_eq!(rig.indicator.status(), StatusCode::Success);
    let _ = fs::remove_dir_all(&dir);
}

#[test]
fn upload_failure_still_persists_with_local_filename() {
    let dir = scratch_dir("upload");
    let mut rig = Rig::new(&config_in(&dir));
    let mut hw = MockHardware::new();
    let mut cloud = MockCloud::rejecting_uploads("NoSuchBucket");
    let mut sink = RecordingSink::new();

    let outcome = rig.app.step(&mut hw, &mut cloud, &mut sink).unwrap();

    let CycleOutcome::Persisted { reading, photo } = outcome else {
        panic!("upload failure must not skip persistence");
    };
    assert_eq!(photo.upload, UploadOutcome::Failed("NoSuchBucket".into()));
    assert_eq!(reading.photo.as_deref(), Some(photo.remote_key.as_str()));
    assert!(photo.local_path.ends_with(&photo.remote_key));
    assert_eq!(cloud.rows.len(), 1);
    assert_eq!(rig.log_lines().len(), 1);

    // No success pattern after a partial failure.
    assert_eq!(rig.indicator.status(), StatusCode::Error);
    assert_eq!(rig.matrix.pixel(0, 0), COLOUR_ERROR);
    assert!(sink.has(|e| matches!(
        e,
        AppEvent::UploadFailed { code, .. } if code == "NoSuchBucket"
    )));
    let _ = fs::remove_dir_all(&dir);
}

// ── Fatal errors ──────────────────────────────────────────────

#[test]
fn record_store_failure_is_fatal() {
    let dir = scratch_dir("fatal");
    let mut rig = Rig::new(&config_in(&dir));
    let mut hw = MockHardware::new();
    let mut cloud = MockCloud::rejecting_puts();
    let mut sink = RecordingSink::new();
    let (shutdown, _trigger) = Shutdown::channel();

    let err = rig
        .app
        .run(&mut hw, &mut cloud, &mut sink, &shutdown)
        .unwrap_err();

    assert!(matches!(err, CycleError::Persistence(_)));
    assert!(err.is_fatal());
    assert!(rig.log_lines().is_empty(), "local log is written after the store");
    assert_eq!(rig.indicator.status(), StatusCode::Error);
    assert_eq!(rig.matrix.pixel(0, 0), COLOUR_ERROR);
    assert!(sink.has(|e| matches!(e, AppEvent::Fatal { .. })));
    assert!(!sink.has(|e| matches!(e, AppEvent::Stopped)));
    let _ = fs::remove_dir_all(&dir);
}

#[test]
fn sensor_failure_is_fatal() {
    let dir = scratch_dir("sensor");
    let mut rig = Rig::new(&config_in(&dir));
    let mut hw = MockHardware::new();
    hw.fail_sensors = true;
    let mut cloud = MockCloud::new();
    let mut sink = RecordingSink::new();
    let (shutdown, _trigger) = Shutdown::channel();

    let err = rig
        .app
        .run(&mut hw, &mut cloud, &mut sink, &shutdown)
        .unwrap_err();

    assert!(matches!(err, CycleError::Unclassified(_)));
    assert!(cloud.rows.is_empty());
    let _ = fs::remove_dir_all(&dir);
}

#[test]
fn fan_relay_failure_is_fatal_and_state_stays_off() {
    let dir = scratch_dir("deadrelay");
    let mut rig = Rig::with_fan_relay(&config_in(&dir), Box::new(DeadRelay), SimPin::new());
    let mut hw = MockHardware::new();
    hw.temperature_c = 40.0;
    let mut cloud = MockCloud::new();
    let mut sink = RecordingSink::new();
    let (shutdown, _trigger) = Shutdown::channel();

    let err = rig
        .app
        .run(&mut hw, &mut cloud, &mut sink, &shutdown)
        .unwrap_err();

    assert!(matches!(err, CycleError::Unclassified(ref m) if m.contains("relay fan")));
    assert_eq!(rig.fan.state(), FanState::Off);
    assert_eq!(rig.indicator.status(), StatusCode::Error);
    assert!(sink.has(|e| matches!(e, AppEvent::Fatal { .. })));
    assert!(!sink.has(|e| matches!(e, AppEvent::FanChanged { .. })));
    let _ = fs::remove_dir_all(&dir);
}

// ── Lifecycle ─────────────────────────────────────────────────

#[test]
fn interrupt_clears_display_and_returns_ok() {
    let dir = scratch_dir("interrupt");
    let mut rig = Rig::new(&config_in(&dir));
    let mut hw = MockHardware::new();
    let mut cloud = MockCloud::new();
    let mut sink = RecordingSink::new();
    let (shutdown, trigger) = Shutdown::channel();
    trigger.send(()).unwrap();

    rig.app
        .run(&mut hw, &mut cloud, &mut sink, &shutdown)
        .unwrap();

    assert_eq!(rig.app.cycle_count(), 1);
    assert_eq!(cloud.rows.len(), 1);
    assert_eq!(rig.matrix.frame(), [(0, 0, 0); 64]);
    assert_eq!(rig.indicator.status(), StatusCode::Idle);
    assert!(matches!(sink.events.first(), Some(AppEvent::Started { interval_secs: 300 })));
    assert!(matches!(sink.events.last(), Some(AppEvent::Stopped)));
    let _ = fs::remove_dir_all(&dir);
}

#[test]
fn interrupt_with_fan_running_releases_relay_and_stays_dark() {
    let dir = scratch_dir("interrupt-fan");
    let mut rig = Rig::new(&config_in(&dir));
    let mut hw = MockHardware::new();
    hw.temperature_c = 40.0;
    let mut cloud = MockCloud::new();
    let mut sink = RecordingSink::new();
    let (shutdown, trigger) = Shutdown::channel();
    trigger.send(()).unwrap();

    rig.app
        .run(&mut hw, &mut cloud, &mut sink, &shutdown)
        .unwrap();

    assert!(sink.has(|e| matches!(e, AppEvent::FanChanged { state: FanState::On, .. })));
    assert_eq!(rig.fan.state(), FanState::Off);
    assert!(rig.fan_pin.is_high(), "relay released on exit");
    assert_eq!(rig.matrix.frame(), [(0, 0, 0); 64]);

    // No animation thread is left to repaint the matrix.
    thread::sleep(Duration::from_millis(400));
    assert_eq!(rig.matrix.frame(), [(0, 0, 0); 64]);
    assert!(matches!(sink.events.last(), Some(AppEvent::Stopped)));
    let _ = fs::remove_dir_all(&dir);
}

#[test]
fn local_log_only_grows_across_restarts() {
    let dir = scratch_dir("restart");
    let config = config_in(&dir);
    let mut hw = MockHardware::new();
    let mut cloud = MockCloud::new();
    let mut sink = RecordingSink::new();

    let mut first = Rig::new(&config);
    first.app.step(&mut hw, &mut cloud, &mut sink).unwrap();
    let before = first.log_lines();
    drop(first);

    hw.advance();
    let mut second = Rig::new(&config);
    second.app.step(&mut hw, &mut cloud, &mut sink).unwrap();
    let after = second.log_lines();

    assert_eq!(after.len(), 2);
    assert_eq!(after[0], before[0]);
    let _ = fs::remove_dir_all(&dir);
}

#[test]
fn persisted_readings_match_successful_captures() {
    let dir = scratch_dir("count");
    let mut rig = Rig::new(&config_in(&dir));
    let mut hw = MockHardware::new();
    let mut cloud = MockCloud::new();
    let mut sink = RecordingSink::new();

    for i in 0..6 {
        hw.fail_capture = i % 3 == 0;
        rig.app.step(&mut hw, &mut cloud, &mut sink).unwrap();
        hw.advance();
    }

    assert_eq!(rig.app.cycle_count(), 6);
    assert_eq!(rig.app.capture_failures(), 2);
    assert_eq!(rig.app.persisted_count(), 4);
    assert_eq!(cloud.rows.len(), 4);
    assert_eq!(rig.log_lines().len(), 4);
    let _ = fs::remove_dir_all(&dir);
}

#[test]
fn log_keys_never_go_backwards() {
    let dir = scratch_dir("clock");
    let mut rig = Rig::new(&config_in(&dir));
    let mut hw = MockHardware::new();
    let mut cloud = MockCloud::new();
    let mut sink = RecordingSink::new();

    rig.app.step(&mut hw, &mut cloud, &mut sink).unwrap();
    // Wall clock steps back an hour.
    hw.now -= chrono::TimeDelta::hours(1);
    rig.app.step(&mut hw, &mut cloud, &mut sink).unwrap();

    assert_eq!(cloud.rows[0].log, "2024-06-01 12:00:00.000000");
    assert_eq!(cloud.rows[1].log, "2024-06-01 12:00:00.000001");
    assert!(cloud.rows[1].date >= cloud.rows[0].date);
    let _ = fs::remove_dir_all(&dir);
}
