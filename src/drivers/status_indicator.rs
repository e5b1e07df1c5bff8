//! Status indicator on the shared LED matrix.
//!
//! | Indicator | Pixels                      | Lifetime                        |
//! |-----------|-----------------------------|---------------------------------|
//! | SUCCESS   | full smiley, then (0,0) green | smiley held, then cleared     |
//! | ERROR     | (0,0) red                   | until the next `show_success()` |
//! | RELAY     | (0,2) blue                  | while the aux relay is on       |
//!
//! The indicator also owns the [`StatusCode`] cell (last writer wins).

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Mutex, PoisonError};
use std::thread;
use std::time::Duration;

use crate::app::model::StatusCode;
use crate::app::ports::{Frame, Rgb};
use crate::drivers::led_matrix::{SharedMatrix, with_matrix};
use crate::pins::{RELAY_PIXEL, STATUS_PIXEL};

pub const COLOUR_ERROR: Rgb = (255, 0, 0);
pub const COLOUR_SUCCESS: Rgb = (0, 240, 0);
pub const COLOUR_RELAY: Rgb = (0, 100, 255);

const G: Rgb = (0, 255, 0);
const O: Rgb = (0, 0, 0);

/// Green smiley shown after a fully successful cycle.
#[rustfmt::skip]
pub const SUCCESS_FRAME: Frame = [
    O, O, G, G, G, G, O, O,
    O, G, O, O, O, O, G, O,
    G, O, G, O, O, G, O, G,
    G, O, O, O, O, O, O, G,
    G, O, G, O, O, G, O, G,
    G, O, O, G, G, O, O, G,
    O, G, O, O, O, O, G, O,
    O, O, G, G, G, G, O, O,
];

pub struct StatusIndicator {
    matrix: SharedMatrix,
    status: Mutex<StatusCode>,
    relay_on: AtomicBool,
    last_cycle_ok: AtomicBool,
    success_hold: Duration,
}

impl StatusIndicator {
    pub fn new(matrix: SharedMatrix, success_hold: Duration) -> Self {
        Self {
            matrix,
            status: Mutex::new(StatusCode::Idle),
            relay_on: AtomicBool::new(false),
            last_cycle_ok: AtomicBool::new(false),
            success_hold,
        }
    }

    /// Smiley for `success_hold`, clear, then the green status pixel.
    ///
    /// The matrix stays locked for the whole hold, so the fan animation
    /// pauses instead of drawing over the smiley. Blocks the caller (and
    /// any other matrix writer) for the hold duration.
    pub fn show_success(&self) {
        with_matrix(&self.matrix, |m| {
            m.set_pixels(&SUCCESS_FRAME);
            thread::sleep(self.success_hold);
            m.clear();
            // The clear wiped the relay pixel as well.
            if self.relay_on.load(Ordering::Acquire) {
                m.set_pixel(RELAY_PIXEL.0, RELAY_PIXEL.1, COLOUR_RELAY);
            }
            m.set_pixel(STATUS_PIXEL.0, STATUS_PIXEL.1, COLOUR_SUCCESS);
        });
        self.last_cycle_ok.store(true, Ordering::Release);
        self.set_status(StatusCode::Success);
    }

    /// Persistent red status pixel.
    pub fn show_error(&self) {
        self.last_cycle_ok.store(false, Ordering::Release);
        with_matrix(&self.matrix, |m| {
            m.set_pixel(STATUS_PIXEL.0, STATUS_PIXEL.1, COLOUR_ERROR);
        });
        self.set_status(StatusCode::Error);
    }

    /// Light or clear the relay pixel.
    pub fn show_relay(&self, on: bool) {
        self.relay_on.store(on, Ordering::Release);
        let colour = if on { COLOUR_RELAY } else { (0, 0, 0) };
        with_matrix(&self.matrix, |m| m.set_pixel(RELAY_PIXEL.0, RELAY_PIXEL.1, colour));
        if on {
            self.set_status(StatusCode::RelayOn);
        }
    }

    /// Re-render the green status pixel if the last cycle persisted.
    pub fn signal_success(&self) {
        if self.last_cycle_ok.load(Ordering::Acquire) {
            with_matrix(&self.matrix, |m| {
                m.set_pixel(STATUS_PIXEL.0, STATUS_PIXEL.1, COLOUR_SUCCESS);
            });
        }
    }

    /// Blank the whole matrix.
    pub fn clear(&self) {
        with_matrix(&self.matrix, |m| m.clear());
        self.set_status(StatusCode::Idle);
    }

    pub fn status(&self) -> StatusCode {
        *self.status.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn set_status(&self, code: StatusCode) {
        *self.status.lock().unwrap_or_else(PoisonError::into_inner) = code;
    }
}
