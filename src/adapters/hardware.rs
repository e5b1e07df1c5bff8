//! Hardware adapter: bridges the Pi peripherals to the domain port traits.
//!
//! Owns the [`SensorHub`], the thermal proxies, the camera and the clock,
//! exposing them through [`SensorPort`], [`ThermalPort`], [`CameraPort`]
//! and [`ClockPort`]. Output devices (matrix, relays) are owned by the
//! controllers instead, because the input worker drives them too.

use std::path::Path;

use chrono::{DateTime, Utc};
use log::warn;

use crate::adapters::time::SystemClock;
use crate::app::model::{EnvironmentSample, ThermalSample};
use crate::app::ports::{CameraPort, ClockPort, SensorPort, ThermalPort};
use crate::config::SystemConfig;
use crate::drivers::camera::CommandCamera;
use crate::error::{CaptureError, SensorError};
use crate::sensors::SensorHub;
use crate::sensors::thermal::ThermalMonitor;

pub struct HardwareAdapter {
    sensor_hub: SensorHub,
    thermal: ThermalMonitor,
    camera: CommandCamera,
    clock: SystemClock,
}

impl HardwareAdapter {
    pub fn new(sensor_hub: SensorHub, thermal: ThermalMonitor, camera: CommandCamera) -> Self {
        Self {
            sensor_hub,
            thermal,
            camera,
            clock: SystemClock,
        }
    }

    /// Open the devices named in `config`. A missing Sense HAT is an
    /// error unless `simulate_devices` is set.
    pub fn from_config(config: &SystemConfig) -> Result<Self, SensorError> {
        let sensor_hub = if config.simulate_devices {
            warn!("simulate_devices set: sensors report fixed values");
            SensorHub::simulated()
        } else {
            SensorHub::open(&config.iio_root)?
        };
        Ok(Self::new(
            sensor_hub,
            ThermalMonitor::new(&config.thermal_zone_path),
            CommandCamera::new(&config.camera_program, config.camera_args.clone()),
        ))
    }
}

// ── SensorPort implementation ─────────────────────────────────

impl SensorPort for HardwareAdapter {
    fn sample_environment(&mut self) -> Result<EnvironmentSample, SensorError> {
        self.sensor_hub.sample()
    }

    fn read_temperature(&mut self) -> Result<f32, SensorError> {
        self.sensor_hub.temperature()
    }
}

// ── ThermalPort implementation ────────────────────────────────

impl ThermalPort for HardwareAdapter {
    fn read_thermal(&mut self) -> Result<ThermalSample, SensorError> {
        self.thermal.read()
    }
}

// ── CameraPort implementation ─────────────────────────────────

impl CameraPort for HardwareAdapter {
    fn capture(&mut self, path: &Path) -> Result<(), CaptureError> {
        self.camera.capture(path)
    }
}

// ── ClockPort implementation ──────────────────────────────────

impl ClockPort for HardwareAdapter {
    fn now(&self) -> DateTime<Utc> {
        self.clock.now()
    }
}
