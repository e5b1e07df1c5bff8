//! Processor and board temperature proxies.
//!
//! - CPU: `vcgencmd measure_temp` prints `temp=48.3'C`.
//! - Board: the thermal zone file holds millidegrees Celsius.

use std::fs;
use std::path::PathBuf;
use std::process::Command;

use crate::app::model::ThermalSample;
use crate::error::SensorError;

const VCGENCMD: &str = "vcgencmd";

/// Parse `temp=48.3'C` into 48.3.
pub fn parse_vcgencmd(output: &str) -> Result<f32, SensorError> {
    let malformed = || SensorError::Malformed {
        channel: "vcgencmd measure_temp".into(),
        raw: output.trim().to_string(),
    };
    output
        .trim()
        .strip_prefix("temp=")
        .and_then(|rest| rest.strip_suffix("'C"))
        .ok_or_else(malformed)?
        .parse::<f32>()
        .ok()
        .filter(|t| t.is_finite())
        .ok_or_else(malformed)
}

/// Parse the thermal-zone millidegree value.
pub fn parse_thermal_zone(contents: &str) -> Result<f32, SensorError> {
    contents
        .trim()
        .parse::<f32>()
        .ok()
        .filter(|milli| milli.is_finite())
        .map(|milli| milli / 1000.0)
        .ok_or_else(|| SensorError::Malformed {
            channel: "thermal_zone".into(),
            raw: contents.trim().to_string(),
        })
}

pub struct ThermalMonitor {
    zone_path: PathBuf,
}

impl ThermalMonitor {
    pub fn new(zone_path: impl Into<PathBuf>) -> Self {
        Self {
            zone_path: zone_path.into(),
        }
    }

    pub fn cpu_temp(&self) -> Result<f32, SensorError> {
        let output = Command::new(VCGENCMD)
            .arg("measure_temp")
            .output()
            .map_err(|e| SensorError::Io {
                channel: VCGENCMD.into(),
                reason: e.to_string(),
            })?;
        parse_vcgencmd(&String::from_utf8_lossy(&output.stdout))
    }

    pub fn board_temp(&self) -> Result<f32, SensorError> {
        let contents = fs::read_to_string(&self.zone_path).map_err(|e| SensorError::Io {
            channel: self.zone_path.display().to_string(),
            reason: e.to_string(),
        })?;
        parse_thermal_zone(&contents)
    }

    pub fn read(&self) -> Result<ThermalSample, SensorError> {
        Ok(ThermalSample {
            cpu_temp: self.cpu_temp()?,
            gpu_temp: self.board_temp()?,
        })
    }
}
