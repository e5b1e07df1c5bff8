//! Actuator controllers and the thermostat policy.

pub mod aux_relay;
pub mod fan;
pub mod thermostat;
