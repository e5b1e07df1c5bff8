//! Bang-bang thermostat policy.
//!
//! One threshold serves both directions; there is no deadband. A reading
//! exactly at the threshold never moves the fan, but readings that hover
//! around it will toggle the fan every cycle.

use crate::app::model::FanState;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FanAction {
    Start,
    Stop,
}

/// Decide what the fan should do for `temp_c`.
pub fn decide(state: FanState, temp_c: f32, threshold_c: f32) -> Option<FanAction> {
    match state {
        FanState::Off if temp_c > threshold_c => Some(FanAction::Start),
        FanState::On if temp_c < threshold_c => Some(FanAction::Stop),
        _ => None,
    }
}
