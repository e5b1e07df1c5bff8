//! Auxiliary relay controller. Only the joystick reaches it.

use std::sync::{Arc, Mutex, PoisonError};

use log::info;

use crate::app::model::AuxRelayState;
use crate::app::ports::RelayOutput;
use crate::drivers::status_indicator::StatusIndicator;
use crate::error::RelayError;

struct AuxCell {
    state: AuxRelayState,
    relay: Box<dyn RelayOutput>,
}

pub struct AuxRelayController {
    cell: Mutex<AuxCell>,
    indicator: Arc<StatusIndicator>,
}

impl AuxRelayController {
    pub fn new(relay: Box<dyn RelayOutput>, indicator: Arc<StatusIndicator>) -> Self {
        Self {
            cell: Mutex::new(AuxCell {
                state: AuxRelayState::Off,
                relay,
            }),
            indicator,
        }
    }

    pub fn state(&self) -> AuxRelayState {
        self.cell.lock().unwrap_or_else(PoisonError::into_inner).state
    }

    /// Flip the relay and its status pixel. Returns the new state.
    /// On a failed write neither the state nor the pixel change.
    pub fn toggle(&self) -> Result<AuxRelayState, RelayError> {
        let mut cell = self.cell.lock().unwrap_or_else(PoisonError::into_inner);
        let next = cell.state.flipped();
        let on = next == AuxRelayState::On;
        cell.relay.set_energised(on)?;
        cell.state = next;
        // Pixel update stays under the lock so it cannot lag the state.
        self.indicator.show_relay(on);
        info!("aux relay: {:?}", next);
        Ok(next)
    }
}
