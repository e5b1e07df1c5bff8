//! Relay channel driver over an `embedded-hal` output pin.
//!
//! The relay board is active-low: driving the pin LOW energises the coil.
//!
//! ## Dual-target design
//!
//! On the Pi: [`SysfsPin`] drives the GPIO through `/sys/class/gpio`.
//! On host/test: [`SimPin`] records the pin level in memory.

use std::convert::Infallible;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use embedded_hal::digital::{self, ErrorKind, ErrorType, OutputPin};
use log::info;

use crate::app::ports::RelayOutput;
use crate::error::RelayError;

pub struct Relay<P: OutputPin> {
    pin: P,
    label: &'static str,
    active_low: bool,
    energised: bool,
}

impl<P: OutputPin> Relay<P> {
    /// Wrap an active-low pin and release the coil. Fails if the pin
    /// cannot be driven, since the relay state would then be unknown.
    pub fn active_low(pin: P, label: &'static str) -> Result<Self, RelayError> {
        let mut relay = Self {
            pin,
            label,
            active_low: true,
            energised: true,
        };
        relay.drive(false)?;
        Ok(relay)
    }

    fn drive(&mut self, on: bool) -> Result<(), RelayError> {
        let high = on != self.active_low;
        let result = if high {
            self.pin.set_high()
        } else {
            self.pin.set_low()
        };
        result.map_err(|e| RelayError {
            relay: self.label,
            reason: format!("{e:?}"),
        })?;
        self.energised = on;
        Ok(())
    }
}

impl<P: OutputPin + Send> RelayOutput for Relay<P> {
    fn set_energised(&mut self, on: bool) -> Result<(), RelayError> {
        if on != self.energised {
            info!("relay {}: {}", self.label, if on { "on" } else { "off" });
        }
        self.drive(on)
    }
}

// ── sysfs GPIO ────────────────────────────────────────────────

#[derive(Debug)]
pub struct SysfsGpioError(pub io::Error);

impl digital::Error for SysfsGpioError {
    fn kind(&self) -> ErrorKind {
        ErrorKind::Other
    }
}

/// Output pin exported through the legacy sysfs GPIO interface.
pub struct SysfsPin {
    value_path: PathBuf,
}

impl SysfsPin {
    /// Export `gpio` (if needed) and configure it as an output.
    pub fn export(sysfs_root: impl AsRef<Path>, gpio: u32) -> io::Result<Self> {
        let root = sysfs_root.as_ref();
        let pin_dir = root.join(format!("gpio{gpio}"));
        if !pin_dir.exists() {
            fs::write(root.join("export"), gpio.to_string())?;
        }
        fs::write(pin_dir.join("direction"), "out")?;
        Ok(Self {
            value_path: pin_dir.join("value"),
        })
    }

    fn write(&self, level: &str) -> Result<(), SysfsGpioError> {
        fs::write(&self.value_path, level).map_err(SysfsGpioError)
    }
}

impl ErrorType for SysfsPin {
    type Error = SysfsGpioError;
}

impl OutputPin for SysfsPin {
    fn set_low(&mut self) -> Result<(), Self::Error> {
        self.write("0")
    }

    fn set_high(&mut self) -> Result<(), Self::Error> {
        self.write("1")
    }
}

// ── Host simulation ───────────────────────────────────────────

/// In-memory pin. Clones share the level, so a test can keep one to
/// observe what the relay drove.
#[derive(Clone, Default)]
pub struct SimPin {
    high: Arc<AtomicBool>,
}

impl SimPin {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_high(&self) -> bool {
        self.high.load(Ordering::Acquire)
    }
}

impl ErrorType for SimPin {
    type Error = Infallible;
}

impl OutputPin for SimPin {
    fn set_low(&mut self) -> Result<(), Self::Error> {
        self.high.store(false, Ordering::Release);
        Ok(())
    }

    fn set_high(&mut self) -> Result<(), Self::Error> {
        self.high.store(true, Ordering::Release);
        Ok(())
    }
}
