//! Greenhouse controller library.
//!
//! Exposes every module for the binary and for integration testing. Real
//! devices are reached only through the adapters and drivers; each one has
//! a host fallback so the controller runs on a development machine.

#![deny(unused_must_use)]

pub mod adapters;
pub mod app;
pub mod config;
pub mod control;
pub mod drivers;
pub mod error;
pub mod pins;
pub mod sensors;
pub mod units;
