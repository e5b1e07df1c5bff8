//! Device drivers for the Sense HAT, relays and camera.

pub mod camera;
pub mod fan_animation;
pub mod joystick;
pub mod led_matrix;
pub mod relay;
pub mod status_indicator;
