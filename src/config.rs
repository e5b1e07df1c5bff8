//! System configuration parameters
//!
//! All tunable parameters for the greenhouse controller. Fixed at startup;
//! loaded from a JSON file through [`ConfigPort`](crate::app::ports::ConfigPort)
//! with every missing field falling back to its default.

use serde::{Deserialize, Serialize};

use crate::app::ports::ConfigError;
use crate::pins;
use crate::units::f_to_c;

/// Core system configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SystemConfig {
    // --- Storage ---
    /// Object-storage bucket that receives photos.
    pub bucket: String,
    /// Directory where the bucket is mounted locally.
    pub bucket_root: String,
    /// Structured record table name.
    pub record_table: String,
    /// Directory holding the record table file.
    pub record_dir: String,
    /// Local folder photos are captured into.
    pub photo_folder: String,
    /// Local append-only log file.
    pub log_file: String,

    // --- Timing ---
    /// Seconds between cycles.
    pub log_interval_secs: u64,
    /// How long the success pattern stays on the matrix (milliseconds).
    pub success_hold_ms: u64,
    /// Delay between fan stop and the success re-signal (milliseconds).
    pub fan_stop_settle_ms: u64,

    // --- Thermostat ---
    /// Fan-on threshold in the sensor's native unit (Celsius).
    pub fan_on_threshold_c: f32,

    // --- Relays ---
    pub fan_relay_gpio: u32,
    pub aux_relay_gpio: u32,

    // --- Devices ---
    /// Still-capture program; invoked as `<program> <args..> -o <path>`.
    pub camera_program: String,
    pub camera_args: Vec<String>,
    pub framebuffer_path: String,
    pub joystick_path: String,
    pub iio_root: String,
    pub thermal_zone_path: String,
    pub gpio_sysfs_root: String,
    /// Replace missing sensors, matrix and relays with in-memory stand-ins.
    /// Development hosts only: sensor readings become fixed values.
    pub simulate_devices: bool,
}

impl Default for SystemConfig {
    fn default() -> Self {
        Self {
            // Storage
            bucket: "blackholegreenhouse".into(),
            bucket_root: "/mnt/buckets".into(),
            record_table: "Greenhouse".into(),
            record_dir: "./records".into(),
            photo_folder: "photos".into(),
            log_file: "./log.txt".into(),

            // Timing
            log_interval_secs: 300,
            success_hold_ms: 2000,
            fan_stop_settle_ms: 1000,

            // Thermostat
            fan_on_threshold_c: f_to_c(97.0),

            // Relays
            fan_relay_gpio: pins::FAN_RELAY_GPIO,
            aux_relay_gpio: pins::AUX_RELAY_GPIO,

            // Devices
            camera_program: "libcamera-still".into(),
            camera_args: vec!["-n".into(), "-t".into(), "1".into()],
            framebuffer_path: "/dev/fb1".into(),
            joystick_path: "/dev/input/event0".into(),
            iio_root: "/sys/bus/iio/devices".into(),
            thermal_zone_path: "/sys/class/thermal/thermal_zone0/temp".into(),
            gpio_sysfs_root: "/sys/class/gpio".into(),
            simulate_devices: false,
        }
    }
}

impl SystemConfig {
    /// Range-check every field that would make the controller misbehave.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.log_interval_secs == 0 {
            return Err(ConfigError::ValidationFailed("log_interval_secs must be > 0"));
        }
        if self.bucket.trim().is_empty() {
            return Err(ConfigError::ValidationFailed("bucket must not be empty"));
        }
        if self.record_table.trim().is_empty() {
            return Err(ConfigError::ValidationFailed("record_table must not be empty"));
        }
        if self.log_file.trim().is_empty() {
            return Err(ConfigError::ValidationFailed("log_file must not be empty"));
        }
        if !self.fan_on_threshold_c.is_finite() {
            return Err(ConfigError::ValidationFailed("fan_on_threshold_c must be finite"));
        }
        if self.fan_relay_gpio == self.aux_relay_gpio {
            return Err(ConfigError::ValidationFailed(
                "fan and aux relays must use different GPIOs",
            ));
        }
        Ok(())
    }
}
