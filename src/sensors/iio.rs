//! Sense HAT environmental sensors through the Linux IIO sysfs interface.
//!
//! With the `rpi-sense` overlay loaded the kernel exposes:
//!
//! | Device         | Channels                    | Unit after scale |
//! |----------------|-----------------------------|------------------|
//! | `hts221`       | humidityrelative, temp      | m%RH, m°C        |
//! | `lps25h`       | pressure, temp              | kPa, m°C         |
//! | `lsm9ds1_magn` | magn_x, magn_y              | gauss            |
//!
//! Each value is `(raw + offset) * scale`; missing offset/scale files
//! default to 0 and 1.

use std::fs;
use std::path::{Path, PathBuf};

use crate::app::model::EnvironmentSample;
use crate::error::SensorError;

const HUMIDITY_DEVICE: &str = "hts221";
const PRESSURE_DEVICE: &str = "lps25h";
const MAGNETOMETER_DEVICE: &str = "lsm9ds1_magn";

/// Locate the IIO device directory whose `name` attribute is `name`.
pub fn find_device(iio_root: &Path, name: &str) -> Result<PathBuf, SensorError> {
    let entries = fs::read_dir(iio_root).map_err(|e| SensorError::Io {
        channel: iio_root.display().to_string(),
        reason: e.to_string(),
    })?;
    entries
        .filter_map(Result::ok)
        .map(|entry| entry.path())
        .find(|dir| {
            fs::read_to_string(dir.join("name")).is_ok_and(|n| n.trim() == name)
        })
        .ok_or_else(|| SensorError::Unavailable(format!("IIO device {name}")))
}

fn read_attr(device: &Path, attr: &str) -> Result<Option<f64>, SensorError> {
    let path = device.join(attr);
    let text = match fs::read_to_string(&path) {
        Ok(t) => t,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
        Err(e) => {
            return Err(SensorError::Io {
                channel: path.display().to_string(),
                reason: e.to_string(),
            });
        }
    };
    text.trim()
        .parse::<f64>()
        .map(Some)
        .map_err(|_| SensorError::Malformed {
            channel: path.display().to_string(),
            raw: text.trim().to_string(),
        })
}

/// Read one channel as `(raw + offset) * scale`.
pub fn read_channel(device: &Path, channel: &str) -> Result<f64, SensorError> {
    let raw = read_attr(device, &format!("in_{channel}_raw"))?.ok_or_else(|| {
        SensorError::Unavailable(format!("{}/in_{channel}_raw", device.display()))
    })?;
    let offset = read_attr(device, &format!("in_{channel}_offset"))?.unwrap_or(0.0);
    let scale = read_attr(device, &format!("in_{channel}_scale"))?.unwrap_or(1.0);
    Ok((raw + offset) * scale)
}

/// Heading in degrees [0, 360) from the horizontal magnetometer axes.
pub fn heading_degrees(x: f64, y: f64) -> f64 {
    y.atan2(x).to_degrees().rem_euclid(360.0)
}

pub struct SenseHatSensors {
    humidity: PathBuf,
    pressure: PathBuf,
    magnetometer: PathBuf,
}

impl SenseHatSensors {
    /// Resolve all three IIO devices under `iio_root`.
    pub fn discover(iio_root: impl AsRef<Path>) -> Result<Self, SensorError> {
        let root = iio_root.as_ref();
        Ok(Self {
            humidity: find_device(root, HUMIDITY_DEVICE)?,
            pressure: find_device(root, PRESSURE_DEVICE)?,
            magnetometer: find_device(root, MAGNETOMETER_DEVICE)?,
        })
    }

    /// Temperature from the humidity sensor, the Sense HAT's primary estimate.
    pub fn temperature_from_humidity(&self) -> Result<f32, SensorError> {
        Ok((read_channel(&self.humidity, "temp")? / 1000.0) as f32)
    }

    pub fn sample(&self) -> Result<EnvironmentSample, SensorError> {
        let humidity = read_channel(&self.humidity, "humidityrelative")? / 1000.0;
        let from_humidity = self.temperature_from_humidity()?;
        // kPa → millibar
        let pressure = read_channel(&self.pressure, "pressure")? * 10.0;
        let from_pressure = read_channel(&self.pressure, "temp")? / 1000.0;
        let mx = read_channel(&self.magnetometer, "magn_x")?;
        let my = read_channel(&self.magnetometer, "magn_y")?;

        Ok(EnvironmentSample {
            humidity: humidity as f32,
            pressure: pressure as f32,
            compass: heading_degrees(mx, my) as f32,
            temperature: from_humidity,
            temperature_from_humidity: from_humidity,
            temperature_from_pressure: from_pressure as f32,
        })
    }
}
