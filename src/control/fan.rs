//! Fan controller.
//!
//! Owns the [`FanState`] cell together with the fan relay and animation.
//! Every read-modify-write happens under one mutex, so the thermostat
//! (main loop) and the joystick override (command worker) cannot
//! interleave. The post-stop settle delay runs after the lock is dropped.
//!
//! The state only changes once the relay write succeeded; a failed write
//! leaves the cell as it was and hands the [`RelayError`] to the caller.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::thread;
use std::time::Duration;

use log::info;

use crate::app::model::FanState;
use crate::app::ports::RelayOutput;
use crate::control::thermostat::{self, FanAction};
use crate::drivers::fan_animation::FanAnimation;
use crate::drivers::status_indicator::StatusIndicator;
use crate::error::RelayError;
use crate::units::c_to_f;

struct FanCell {
    state: FanState,
    relay: Box<dyn RelayOutput>,
    animation: FanAnimation,
    /// Set by `shutdown`; the fan never starts again.
    halted: bool,
}

impl FanCell {
    fn start(&mut self) -> Result<bool, RelayError> {
        if self.halted || self.state == FanState::On {
            return Ok(false);
        }
        self.relay.set_energised(true)?;
        self.state = FanState::On;
        self.animation.play();
        Ok(true)
    }

    fn stop(&mut self) -> Result<bool, RelayError> {
        if self.state == FanState::Off {
            return Ok(false);
        }
        self.relay.set_energised(false)?;
        self.state = FanState::Off;
        self.animation.stop();
        Ok(true)
    }
}

pub struct FanController {
    cell: Mutex<FanCell>,
    indicator: Arc<StatusIndicator>,
    threshold_c: f32,
    settle: Duration,
}

impl FanController {
    pub fn new(
        relay: Box<dyn RelayOutput>,
        animation: FanAnimation,
        indicator: Arc<StatusIndicator>,
        threshold_c: f32,
        settle: Duration,
    ) -> Self {
        Self {
            cell: Mutex::new(FanCell {
                state: FanState::Off,
                relay,
                animation,
                halted: false,
            }),
            indicator,
            threshold_c,
            settle,
        }
    }

    fn lock(&self) -> MutexGuard<'_, FanCell> {
        self.cell.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn state(&self) -> FanState {
        self.lock().state
    }

    /// Energise the fan. Returns `false` if it was already on.
    pub fn start(&self) -> Result<bool, RelayError> {
        self.lock().start()
    }

    /// De-energise the fan, then re-signal success after the settle
    /// delay. Returns `false` (and skips the delay) if it was already off.
    pub fn stop(&self) -> Result<bool, RelayError> {
        let stopped = self.lock().stop()?;
        if stopped {
            self.after_stop();
        }
        Ok(stopped)
    }

    /// Manual override: start if off, stop otherwise. Returns the new state.
    pub fn toggle(&self) -> Result<FanState, RelayError> {
        let mut cell = self.lock();
        if cell.state == FanState::Off {
            if cell.start()? {
                info!("fan: manual on");
            }
            Ok(cell.state)
        } else {
            cell.stop()?;
            drop(cell);
            info!("fan: manual off");
            self.after_stop();
            Ok(FanState::Off)
        }
    }

    /// Thermostat step. Decision and actuation happen under one lock.
    pub fn check_threshold(&self, temp_c: f32) -> Result<Option<FanAction>, RelayError> {
        let mut cell = self.lock();
        if cell.halted {
            return Ok(None);
        }
        let Some(action) = thermostat::decide(cell.state, temp_c, self.threshold_c) else {
            return Ok(None);
        };
        match action {
            FanAction::Start => {
                cell.start()?;
                info!("fan on at {:.1}F", c_to_f(temp_c));
            }
            FanAction::Stop => {
                cell.stop()?;
                drop(cell);
                info!("fan off at {:.1}F", c_to_f(temp_c));
                self.after_stop();
            }
        }
        Ok(Some(action))
    }

    /// Release the relay, stop the animation and refuse later starts.
    /// The animation is stopped even when the relay write fails.
    pub fn shutdown(&self) -> Result<(), RelayError> {
        let mut cell = self.lock();
        cell.halted = true;
        let released = cell.stop();
        cell.animation.stop();
        released.map(|_| ())
    }

    fn after_stop(&self) {
        thread::sleep(self.settle);
        self.indicator.signal_success();
    }
}
