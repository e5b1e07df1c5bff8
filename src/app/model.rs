//! Domain data: device state cells, readings, and photo artifacts.

use std::path::PathBuf;

use chrono::{DateTime, Utc};
use serde_json::{Map, Value};

/// Timestamp format used for log keys and photo filenames.
pub const LOG_TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S%.6f";

// ───────────────────────────────────────────────────────────────
// Shared state cells
// ───────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FanState {
    #[default]
    Off,
    On,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AuxRelayState {
    #[default]
    Off,
    On,
}

impl AuxRelayState {
    pub fn flipped(self) -> Self {
        match self {
            Self::Off => Self::On,
            Self::On => Self::Off,
        }
    }
}

/// Last status rendered on the matrix. Last writer wins.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StatusCode {
    #[default]
    Idle,
    Success,
    Error,
    RelayOn,
}

// ───────────────────────────────────────────────────────────────
// Sensor samples
// ───────────────────────────────────────────────────────────────

/// One pass over the environmental sensor hub.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct EnvironmentSample {
    /// Relative humidity, percent.
    pub humidity: f32,
    /// Pressure, millibars.
    pub pressure: f32,
    /// Compass heading, degrees from magnetic north.
    pub compass: f32,
    /// Primary temperature estimate, Celsius.
    pub temperature: f32,
    pub temperature_from_humidity: f32,
    pub temperature_from_pressure: f32,
}

/// Processor and board temperature proxies, Celsius.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct ThermalSample {
    pub cpu_temp: f32,
    pub gpu_temp: f32,
}

// ───────────────────────────────────────────────────────────────
// Photo artifact
// ───────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UploadOutcome {
    NotAttempted,
    Success,
    /// Carries the storage error code.
    Failed(String),
}

#[derive(Debug, Clone, PartialEq)]
pub struct PhotoArtifact {
    pub local_path: PathBuf,
    /// Object key in the bucket; also the filename referenced by the reading.
    pub remote_key: String,
    pub captured_at: DateTime<Utc>,
    pub upload: UploadOutcome,
}

impl PhotoArtifact {
    pub fn new(folder: &str, captured_at: DateTime<Utc>) -> Self {
        let remote_key = format!("{}.jpg", captured_at.format(LOG_TIMESTAMP_FORMAT));
        let local_path = PathBuf::from(folder).join(&remote_key);
        Self {
            local_path,
            remote_key,
            captured_at,
            upload: UploadOutcome::NotAttempted,
        }
    }
}

// ───────────────────────────────────────────────────────────────
// Environment reading
// ───────────────────────────────────────────────────────────────

/// Immutable snapshot persisted once per successful capture.
#[derive(Debug, Clone, PartialEq)]
pub struct EnvironmentReading {
    /// Record key: the UTC capture time rendered with [`LOG_TIMESTAMP_FORMAT`].
    pub log: String,
    /// Unix epoch seconds.
    pub date: i64,
    pub environment: EnvironmentSample,
    pub thermal: ThermalSample,
    /// Photo filename, if any.
    pub photo: Option<String>,
}

impl EnvironmentReading {
    pub fn new(
        at: DateTime<Utc>,
        environment: EnvironmentSample,
        thermal: ThermalSample,
        photo: Option<String>,
    ) -> Self {
        Self {
            log: at.format(LOG_TIMESTAMP_FORMAT).to_string(),
            date: at.timestamp(),
            environment,
            thermal,
            photo,
        }
    }

    /// Attribute name/value pairs in their fixed persisted order.
    pub fn fields(&self) -> [(&'static str, String); 11] {
        let env = &self.environment;
        [
            ("log", self.log.clone()),
            ("date", self.date.to_string()),
            ("humidity", env.humidity.to_string()),
            ("pressure", env.pressure.to_string()),
            ("compass", env.compass.to_string()),
            ("temperature", env.temperature.to_string()),
            ("cpu_temp", self.thermal.cpu_temp.to_string()),
            ("gpu_temp", self.thermal.gpu_temp.to_string()),
            (
                "temperature_from_humidity",
                env.temperature_from_humidity.to_string(),
            ),
            (
                "temperature_from_pressure",
                env.temperature_from_pressure.to_string(),
            ),
            ("photo", self.photo.clone().unwrap_or_else(|| "null".into())),
        ]
    }

    /// One local-log line, without the trailing newline.
    pub fn log_line(&self) -> String {
        let line = self
            .fields()
            .iter()
            .map(|(k, v)| format!("{k}: {v}"))
            .collect::<Vec<_>>()
            .join(", ");
        line.replace(['{', '}', '\'', '"'], "")
    }

    /// Row for the structured store. `date` stays numeric, measurements
    /// are stored as text.
    pub fn to_record(&self) -> Map<String, Value> {
        let mut row = Map::new();
        for (key, value) in self.fields() {
            let v = match key {
                "date" => Value::from(self.date),
                "photo" if self.photo.is_none() => Value::Null,
                _ => Value::String(value),
            };
            row.insert(key.to_string(), v);
        }
        row
    }
}
