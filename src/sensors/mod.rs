//! Sensor subsystem: the Sense HAT driver and the aggregating [`SensorHub`].
//!
//! The hub produces one [`EnvironmentSample`] per cycle. A missing Sense
//! HAT is a startup error; fixed simulated values are only used when the
//! configuration asks for simulated devices.

pub mod iio;
pub mod thermal;

use std::path::Path;

use log::info;

use crate::app::model::EnvironmentSample;
use crate::error::SensorError;
use iio::SenseHatSensors;

/// Values reported by [`SensorHub::simulated`].
pub const SIMULATED_SAMPLE: EnvironmentSample = EnvironmentSample {
    humidity: 55.0,
    pressure: 1013.0,
    compass: 0.0,
    temperature: 25.0,
    temperature_from_humidity: 25.0,
    temperature_from_pressure: 24.5,
};

pub enum SensorHub {
    SenseHat(SenseHatSensors),
    Simulated(EnvironmentSample),
}

impl SensorHub {
    /// Bind to the Sense HAT's IIO devices under `iio_root`.
    pub fn open(iio_root: impl AsRef<Path>) -> Result<Self, SensorError> {
        let hat = SenseHatSensors::discover(iio_root)?;
        info!("Sense HAT sensors found");
        Ok(Self::SenseHat(hat))
    }

    /// Fixed readings for development hosts.
    pub fn simulated() -> Self {
        Self::Simulated(SIMULATED_SAMPLE)
    }

    pub fn sample(&mut self) -> Result<EnvironmentSample, SensorError> {
        match self {
            Self::SenseHat(hat) => hat.sample(),
            Self::Simulated(sample) => Ok(*sample),
        }
    }

    pub fn temperature(&mut self) -> Result<f32, SensorError> {
        match self {
            Self::SenseHat(hat) => hat.temperature_from_humidity(),
            Self::Simulated(sample) => Ok(sample.temperature),
        }
    }
}
