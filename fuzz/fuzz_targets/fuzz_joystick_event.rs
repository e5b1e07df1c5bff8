//! Fuzz target: `decode_event`
//!
//! Feeds arbitrary bytes through the evdev decoder one event-sized window
//! at a time. Any decoded event must be one of the two joystick directions
//! with a known action.
//!
//! cargo fuzz run fuzz_joystick_event

#![no_main]

use greenhouse::app::ports::Button;
use greenhouse::drivers::joystick::{EVENT_SIZE, decode_event};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    for chunk in data.chunks_exact(EVENT_SIZE) {
        let mut raw = [0u8; EVENT_SIZE];
        raw.copy_from_slice(chunk);
        if let Some(event) = decode_event(&raw) {
            assert!(matches!(event.button, Button::Up | Button::Down));
        }
    }
});
