//! Inbound commands produced by the input dispatcher.
//!
//! The notification context only classifies a button event and enqueues
//! one of these; the command worker applies it to the controllers.

use super::ports::{Button, ButtonAction, ButtonEvent};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputCommand {
    /// Start the fan if it is off, otherwise stop it.
    ToggleFan,
    /// Flip the auxiliary relay.
    ToggleAuxRelay,
}

impl InputCommand {
    /// Map a raw button event to a command. Only the release edge acts.
    pub fn from_event(event: ButtonEvent) -> Option<Self> {
        if event.action != ButtonAction::Released {
            return None;
        }
        Some(match event.button {
            Button::Up => Self::ToggleFan,
            Button::Down => Self::ToggleAuxRelay,
        })
    }
}
