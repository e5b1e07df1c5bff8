//! Application core: domain logic behind port traits.
//!
//! This module contains the business rules for the greenhouse controller:
//! the capture → upload → persist cycle, the thermostat step and button
//! command routing. All interaction with hardware and storage happens
//! through **port traits** defined in [`ports`], keeping this layer fully
//! testable without real peripherals.

pub mod commands;
pub mod dispatcher;
pub mod events;
pub mod model;
pub mod persister;
pub mod ports;
pub mod service;
pub mod shutdown;
