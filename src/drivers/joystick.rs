//! Sense HAT joystick driver (Linux evdev).
//!
//! ## Hardware
//!
//! The joystick appears as an input device emitting `EV_KEY` events.
//! `value` encodes the action: 1 = pressed, 2 = held (autorepeat),
//! 0 = released.
//!
//! A reader thread decodes events and invokes the handler subscribed for
//! that direction. Handlers run on this thread, so they must return
//! quickly or later events queue up in the kernel buffer.

use std::collections::HashMap;
use std::fs::File;
use std::io::{self, Read};
use std::path::{Path, PathBuf};
use std::thread::{self, JoinHandle};

use log::{info, warn};

use crate::app::ports::{Button, ButtonAction, ButtonEvent, ButtonHandler, InputPort};

/// `struct input_event`: timeval, u16 type, u16 code, i32 value.
#[cfg(target_pointer_width = "64")]
pub const EVENT_SIZE: usize = 24;
#[cfg(not(target_pointer_width = "64"))]
pub const EVENT_SIZE: usize = 16;

const TIMEVAL_SIZE: usize = EVENT_SIZE - 8;

const EV_KEY: u16 = 0x01;
const KEY_UP: u16 = 103;
const KEY_DOWN: u16 = 108;

/// Decode one raw `input_event`. Non-key events and directions other
/// than up/down yield `None`.
pub fn decode_event(raw: &[u8; EVENT_SIZE]) -> Option<ButtonEvent> {
    let field = |at: usize| u16::from_ne_bytes([raw[at], raw[at + 1]]);
    let kind = field(TIMEVAL_SIZE);
    let code = field(TIMEVAL_SIZE + 2);
    let value = i32::from_ne_bytes([
        raw[TIMEVAL_SIZE + 4],
        raw[TIMEVAL_SIZE + 5],
        raw[TIMEVAL_SIZE + 6],
        raw[TIMEVAL_SIZE + 7],
    ]);

    if kind != EV_KEY {
        return None;
    }
    let button = match code {
        KEY_UP => Button::Up,
        KEY_DOWN => Button::Down,
        _ => return None,
    };
    let action = match value {
        0 => ButtonAction::Released,
        1 => ButtonAction::Pressed,
        2 => ButtonAction::Held,
        _ => return None,
    };
    Some(ButtonEvent { button, action })
}

pub struct Joystick {
    path: PathBuf,
    handlers: HashMap<Button, ButtonHandler>,
}

impl Joystick {
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
            handlers: HashMap::new(),
        }
    }

    /// Open the device and start the reader thread. Subscriptions made
    /// before this call are moved onto the thread.
    pub fn spawn(self) -> io::Result<JoinHandle<()>> {
        let file = File::open(&self.path)?;
        info!("joystick: reading {}", self.path.display());
        thread::Builder::new()
            .name("joystick".into())
            .spawn(move || self.read_loop(file))
    }

    fn read_loop(self, mut device: impl Read) {
        let mut raw = [0u8; EVENT_SIZE];
        loop {
            if let Err(e) = device.read_exact(&mut raw) {
                warn!("joystick: read failed ({}), input disabled", e);
                return;
            }
            self.dispatch(&raw);
        }
    }

    fn dispatch(&self, raw: &[u8; EVENT_SIZE]) {
        if let Some(event) = decode_event(raw) {
            if let Some(handler) = self.handlers.get(&event.button) {
                handler(event);
            }
        }
    }
}

impl InputPort for Joystick {
    fn subscribe(&mut self, button: Button, handler: ButtonHandler) {
        self.handlers.insert(button, handler);
    }
}
