//! Integration tests for joystick → dispatcher → worker → controllers.

use std::collections::HashMap;
use std::fs;
use std::sync::Arc;
use std::thread;
use std::time::Duration;

use greenhouse::app::dispatcher::{CommandWorker, InputDispatcher};
use greenhouse::app::model::{AuxRelayState, FanState};
use greenhouse::app::ports::{Button, ButtonAction, ButtonEvent, ButtonHandler, InputPort};
use greenhouse::control::aux_relay::AuxRelayController;
use greenhouse::control::fan::FanController;
use greenhouse::drivers::fan_animation::{COLOUR_BLADE, FRAME_MS, FanAnimation};
use greenhouse::drivers::joystick::{EVENT_SIZE, Joystick};
use greenhouse::drivers::led_matrix::{MemoryMatrix, shared};
use greenhouse::drivers::relay::{Relay, SimPin};
use greenhouse::drivers::status_indicator::{COLOUR_RELAY, COLOUR_SUCCESS, StatusIndicator};
use greenhouse::pins::FAN_ANIMATION_ORIGIN;

use super::mock_hw::scratch_dir;

const EV_KEY: u16 = 1;
const EV_SYN: u16 = 0;
const KEY_UP: u16 = 103;
const KEY_DOWN: u16 = 108;

/// One raw `input_event` with a zeroed timestamp.
fn event(kind: u16, code: u16, value: i32) -> Vec<u8> {
    let mut buf = vec![0u8; EVENT_SIZE - 8];
    buf.extend_from_slice(&kind.to_ne_bytes());
    buf.extend_from_slice(&code.to_ne_bytes());
    buf.extend_from_slice(&value.to_ne_bytes());
    buf
}

struct Devices {
    indicator: Arc<StatusIndicator>,
    fan: Arc<FanController>,
    aux: Arc<AuxRelayController>,
    fan_pin: SimPin,
    aux_pin: SimPin,
    matrix: MemoryMatrix,
}

fn devices() -> Devices {
    devices_with_settle(Duration::ZERO)
}

fn devices_with_settle(settle: Duration) -> Devices {
    let matrix = MemoryMatrix::new();
    let shared_matrix = shared(matrix.clone());
    let indicator = Arc::new(StatusIndicator::new(Arc::clone(&shared_matrix), Duration::ZERO));
    let fan_pin = SimPin::new();
    let aux_pin = SimPin::new();
    let fan = Arc::new(FanController::new(
        Box::new(Relay::active_low(fan_pin.clone(), "fan").unwrap()),
        FanAnimation::new(shared_matrix),
        Arc::clone(&indicator),
        36.1,
        settle,
    ));
    let aux = Arc::new(AuxRelayController::new(
        Box::new(Relay::active_low(aux_pin.clone(), "aux").unwrap()),
        Arc::clone(&indicator),
    ));
    Devices {
        indicator,
        fan,
        aux,
        fan_pin,
        aux_pin,
        matrix,
    }
}

#[test]
fn recorded_joystick_session_toggles_each_relay_once() {
    let dir = scratch_dir("joystick");
    let path = dir.join("event0");
    let mut raw = Vec::new();
    // B: press, two autorepeats, release.
    raw.extend(event(EV_KEY, KEY_DOWN, 1));
    raw.extend(event(EV_SYN, 0, 0));
    raw.extend(event(EV_KEY, KEY_DOWN, 2));
    raw.extend(event(EV_KEY, KEY_DOWN, 2));
    raw.extend(event(EV_KEY, KEY_DOWN, 0));
    // A: press, release.
    raw.extend(event(EV_KEY, KEY_UP, 1));
    raw.extend(event(EV_KEY, KEY_UP, 0));
    fs::write(&path, raw).unwrap();

    let dev = devices();
    let (dispatcher, rx) = InputDispatcher::channel();
    let mut joystick = Joystick::new(&path);
    dispatcher.register(&mut joystick);
    drop(dispatcher);

    // The reader stops at end of file and drops its handlers, which
    // closes the queue once every event is enqueued.
    let reader = joystick.spawn().unwrap();
    reader.join().unwrap();
    CommandWorker::new(Arc::clone(&dev.fan), Arc::clone(&dev.aux)).run(rx);

    assert_eq!(dev.aux.state(), AuxRelayState::On);
    assert!(!dev.aux_pin.is_high());
    assert_eq!(dev.matrix.pixel(0, 2), COLOUR_RELAY);
    assert_eq!(dev.fan.state(), FanState::On);
    assert!(!dev.fan_pin.is_high());
    let _ = fs::remove_dir_all(&dir);
}

#[test]
fn missing_joystick_device_is_an_error() {
    let joystick = Joystick::new("/nonexistent/input/event0");
    assert!(joystick.spawn().is_err());
}

#[test]
fn concurrent_thermostat_and_override_keep_relay_consistent() {
    let dev = devices();
    let (dispatcher, rx) = InputDispatcher::channel();
    let mut fake = QueueInput::default();
    dispatcher.register(&mut fake);
    let worker = CommandWorker::new(Arc::clone(&dev.fan), Arc::clone(&dev.aux))
        .spawn(rx)
        .unwrap();

    let fan = Arc::clone(&dev.fan);
    let thermostat = thread::spawn(move || {
        for i in 0..20 {
            let t = if i % 2 == 0 { 40.0 } else { 20.0 };
            fan.check_threshold(t).unwrap();
        }
    });
    for _ in 0..10 {
        fake.release_up();
    }

    thermostat.join().unwrap();
    drop(fake);
    drop(dispatcher);
    worker.join().unwrap();

    // Whatever interleaving happened, state and relay agree.
    let relay_asserted = !dev.fan_pin.is_high();
    assert_eq!(dev.fan.state() == FanState::On, relay_asserted);
}

#[test]
fn override_racing_thermostat_with_settle_delay_stays_consistent() {
    let dev = devices_with_settle(Duration::from_millis(5));
    dev.indicator.show_success();
    let (dispatcher, rx) = InputDispatcher::channel();
    let mut fake = QueueInput::default();
    dispatcher.register(&mut fake);
    let worker = CommandWorker::new(Arc::clone(&dev.fan), Arc::clone(&dev.aux))
        .spawn(rx)
        .unwrap();

    // Stops on either side sleep outside the lock while the other side
    // may already be restarting the fan.
    let fan = Arc::clone(&dev.fan);
    let thermostat = thread::spawn(move || {
        for i in 0..30 {
            let t = if i % 2 == 0 { 40.0 } else { 20.0 };
            fan.check_threshold(t).unwrap();
        }
    });
    for _ in 0..15 {
        fake.release_up();
        thread::sleep(Duration::from_millis(2));
    }

    thermostat.join().unwrap();
    drop(fake);
    drop(dispatcher);
    worker.join().unwrap();
    thread::sleep(Duration::from_millis(FRAME_MS * 2));

    let on = dev.fan.state() == FanState::On;
    assert_eq!(on, !dev.fan_pin.is_high());
    let centre = (FAN_ANIMATION_ORIGIN.0 + 2, FAN_ANIMATION_ORIGIN.1 + 2);
    let expected_centre = if on { COLOUR_BLADE } else { (0, 0, 0) };
    assert_eq!(dev.matrix.pixel(centre.0, centre.1), expected_centre);
    // A late re-signal only ever repaints the status pixel.
    assert_eq!(dev.matrix.pixel(0, 0), COLOUR_SUCCESS);
}

// ── Minimal in-process InputPort ──────────────────────────────

#[derive(Default)]
struct QueueInput {
    handlers: HashMap<Button, ButtonHandler>,
}

impl QueueInput {
    fn release_up(&self) {
        if let Some(h) = self.handlers.get(&Button::Up) {
            h(ButtonEvent {
                button: Button::Up,
                action: ButtonAction::Released,
            });
        }
    }
}

impl InputPort for QueueInput {
    fn subscribe(&mut self, button: Button, handler: ButtonHandler) {
        self.handlers.insert(button, handler);
    }
}
