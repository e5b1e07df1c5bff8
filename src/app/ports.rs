//! Port traits: the hexagonal boundary between domain logic and the outside world.
//!
//! ```text
//!   Adapter ──▶ Port trait ──▶ AppService (domain)
//! ```
//!
//! Driven adapters (sensor hub, camera, object storage, record store, LED
//! matrix, relays, joystick) implement these traits. The
//! [`AppService`](super::service::AppService) consumes them via generics,
//! so the domain core never touches hardware or the network directly.

use std::path::Path;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use chrono::{DateTime, Utc};

use super::model::{EnvironmentReading, EnvironmentSample, ThermalSample};
use crate::config::SystemConfig;
use crate::error::{CaptureError, PersistenceError, RelayError, SensorError, UploadError};

// ───────────────────────────────────────────────────────────────
// Sensor ports (driven adapters: hardware → domain)
// ───────────────────────────────────────────────────────────────

/// Environmental sensor hub.
pub trait SensorPort {
    /// Read humidity, pressure, heading and all temperature estimates.
    fn sample_environment(&mut self) -> Result<EnvironmentSample, SensorError>;

    /// Fresh primary temperature read for the thermostat check.
    fn read_temperature(&mut self) -> Result<f32, SensorError>;
}

/// Processor / board temperature proxies.
pub trait ThermalPort {
    fn read_thermal(&mut self) -> Result<ThermalSample, SensorError>;
}

/// Still camera.
pub trait CameraPort {
    /// Capture one still image to `path`.
    fn capture(&mut self, path: &Path) -> Result<(), CaptureError>;
}

/// Wall clock used for log keys and photo names.
pub trait ClockPort {
    fn now(&self) -> DateTime<Utc>;
}

// ───────────────────────────────────────────────────────────────
// Remote storage ports
// ───────────────────────────────────────────────────────────────

/// Single-object PUT into the configured bucket.
pub trait ObjectStorePort {
    /// Upload `path` under `key`. Blocks until the transfer finishes;
    /// progress is published into `status` while it runs.
    fn upload(&mut self, path: &Path, key: &str, status: &TransferStatus)
    -> Result<(), UploadError>;
}

/// Single-table put keyed by [`EnvironmentReading::log`].
pub trait RecordStorePort {
    fn put(&mut self, reading: &EnvironmentReading) -> Result<(), PersistenceError>;
}

/// Pollable progress handle for an upload.
///
/// Cloning shares the counters, so another thread can poll a transfer
/// that is blocking the caller.
#[derive(Debug, Clone, Default)]
pub struct TransferStatus {
    sent: Arc<AtomicU64>,
    total: Arc<AtomicU64>,
}

impl TransferStatus {
    pub fn new() -> Self {
        Self::default()
    }

    /// Called once by the uploader before the first chunk.
    pub fn begin(&self, total_bytes: u64) {
        self.sent.store(0, Ordering::Release);
        self.total.store(total_bytes, Ordering::Release);
    }

    /// Record `bytes` more transferred.
    pub fn advance(&self, bytes: u64) {
        self.sent.fetch_add(bytes, Ordering::AcqRel);
    }

    /// `(sent, total)` in bytes.
    pub fn poll(&self) -> (u64, u64) {
        (
            self.sent.load(Ordering::Acquire),
            self.total.load(Ordering::Acquire),
        )
    }

    /// Completion percentage; 100 for an empty file.
    pub fn percent(&self) -> f32 {
        let (sent, total) = self.poll();
        if total == 0 {
            return 100.0;
        }
        (sent as f32 / total as f32) * 100.0
    }
}

// ───────────────────────────────────────────────────────────────
// Output ports (domain → hardware)
// ───────────────────────────────────────────────────────────────

/// Colour as (R, G, B) tuple, each 0–255.
pub type Rgb = (u8, u8, u8);

/// A full 8×8 frame, row-major (`index = y * 8 + x`).
pub type Frame = [Rgb; 64];

/// 8×8 RGB pixel matrix. Write failures are logged by the adapter.
pub trait LedMatrix: Send {
    fn set_pixel(&mut self, x: u8, y: u8, rgb: Rgb);
    fn set_pixels(&mut self, frame: &Frame);
    fn clear(&mut self);

    /// Update several pixels as one write. Adapters backed by a device
    /// override this so a partial update is never visible.
    fn set_many(&mut self, pixels: &[(u8, u8, Rgb)]) {
        for &(x, y, rgb) in pixels {
            self.set_pixel(x, y, rgb);
        }
    }
}

/// One relay channel. `true` energises the coil.
///
/// On `Err` the coil state is unknown and callers must not record the
/// requested state as reached.
pub trait RelayOutput: Send {
    fn set_energised(&mut self, on: bool) -> Result<(), RelayError>;
}

// ───────────────────────────────────────────────────────────────
// Input port (hardware → domain, on the device's own thread)
// ───────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Button {
    /// Button A: fan override.
    Up,
    /// Button B: auxiliary relay.
    Down,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ButtonAction {
    Pressed,
    Held,
    Released,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ButtonEvent {
    pub button: Button,
    pub action: ButtonAction,
}

/// Handler invoked on the device's notification context. Must not block.
pub type ButtonHandler = Box<dyn Fn(ButtonEvent) + Send + Sync>;

/// Two-button input device with explicit subscription.
pub trait InputPort {
    /// Register `handler` for every event on `button`. A later
    /// subscription for the same button replaces the earlier one.
    fn subscribe(&mut self, button: Button, handler: ButtonHandler);
}

// ───────────────────────────────────────────────────────────────
// Event sink port (domain → logging)
// ───────────────────────────────────────────────────────────────

/// The domain emits structured [`AppEvent`](super::events::AppEvent)s
/// through this port.
pub trait EventSink {
    fn emit(&mut self, event: &super::events::AppEvent);
}

// ───────────────────────────────────────────────────────────────
// Configuration port
// ───────────────────────────────────────────────────────────────

/// Loads the system configuration once, at startup.
///
/// Implementations MUST validate values before returning them. Invalid
/// ranges are rejected with [`ConfigError::ValidationFailed`], not
/// silently clamped.
pub trait ConfigPort {
    /// Returns [`SystemConfig::default()`] if no stored config exists.
    fn load(&self) -> Result<SystemConfig, ConfigError>;
}

/// Errors from [`ConfigPort`] operations.
#[derive(Debug)]
pub enum ConfigError {
    /// Stored config failed to deserialize.
    Corrupted(String),
    /// A config field failed range validation.
    ValidationFailed(&'static str),
    /// Generic I/O error from the backing file.
    IoError(String),
}

impl core::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::Corrupted(msg) => write!(f, "config corrupted: {}", msg),
            Self::ValidationFailed(msg) => write!(f, "validation failed: {}", msg),
            Self::IoError(msg) => write!(f, "I/O error: {}", msg),
        }
    }
}

impl std::error::Error for ConfigError {}
