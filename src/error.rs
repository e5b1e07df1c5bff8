//! Error types for the greenhouse controller.
//!
//! Each collaborator has its own error type; the periodic cycle funnels
//! them into [`CycleError`], whose variant decides the recovery policy:
//!
//! | Variant        | Policy                                             |
//! |----------------|----------------------------------------------------|
//! | `Capture`      | abort this cycle, show ERROR, keep looping         |
//! | `Upload`       | keep going, record still persisted, show ERROR     |
//! | `Persistence`  | fatal: show ERROR, log diagnostic, exit non-zero   |
//! | `Unclassified` | fatal: same as `Persistence`                       |

use core::fmt;

// ---------------------------------------------------------------------------
// Sensor errors
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SensorError {
    /// The backing device or sysfs node is missing.
    Unavailable(String),
    /// A read returned something that does not parse as a number.
    Malformed { channel: String, raw: String },
    /// The underlying I/O call failed.
    Io { channel: String, reason: String },
}

impl fmt::Display for SensorError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Unavailable(what) => write!(f, "sensor unavailable: {what}"),
            Self::Malformed { channel, raw } => {
                write!(f, "malformed reading on {channel}: {raw:?}")
            }
            Self::Io { channel, reason } => write!(f, "read of {channel} failed: {reason}"),
        }
    }
}

impl std::error::Error for SensorError {}

// ---------------------------------------------------------------------------
// Camera errors
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CaptureError {
    pub reason: String,
}

impl CaptureError {
    pub fn new(reason: impl Into<String>) -> Self {
        Self {
            reason: reason.into(),
        }
    }
}

impl fmt::Display for CaptureError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "photo capture failed: {}", self.reason)
    }
}

impl std::error::Error for CaptureError {}

// ---------------------------------------------------------------------------
// Object storage errors
// ---------------------------------------------------------------------------

/// Structured upload failure. `code` mirrors the storage service's error
/// code (`NoSuchBucket`, `AccessDenied`, ...).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadError {
    pub code: String,
    pub message: String,
}

impl UploadError {
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
        }
    }
}

impl fmt::Display for UploadError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "upload rejected ({}): {}", self.code, self.message)
    }
}

impl std::error::Error for UploadError {}

// ---------------------------------------------------------------------------
// Record store errors
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PersistenceError {
    pub table: String,
    pub reason: String,
}

impl fmt::Display for PersistenceError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "put into table {} failed: {}", self.table, self.reason)
    }
}

impl std::error::Error for PersistenceError {}

// ---------------------------------------------------------------------------
// Relay errors
// ---------------------------------------------------------------------------

/// A GPIO write to a relay channel failed; the coil is in an unknown state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RelayError {
    pub relay: &'static str,
    pub reason: String,
}

impl fmt::Display for RelayError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "relay {} write failed: {}", self.relay, self.reason)
    }
}

impl std::error::Error for RelayError {}

// ---------------------------------------------------------------------------
// Cycle-level error
// ---------------------------------------------------------------------------

/// Every failure the periodic cycle can surface.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CycleError {
    Capture(CaptureError),
    Upload(UploadError),
    Persistence(PersistenceError),
    /// Anything not classified above (sensor reads, relay writes, local log append).
    Unclassified(String),
}

impl CycleError {
    /// Fatal errors terminate the controller process.
    pub fn is_fatal(&self) -> bool {
        matches!(self, Self::Persistence(_) | Self::Unclassified(_))
    }
}

impl fmt::Display for CycleError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Capture(e) => write!(f, "capture: {e}"),
            Self::Upload(e) => write!(f, "upload: {e}"),
            Self::Persistence(e) => write!(f, "persistence: {e}"),
            Self::Unclassified(msg) => write!(f, "unclassified: {msg}"),
        }
    }
}

impl std::error::Error for CycleError {}

impl From<CaptureError> for CycleError {
    fn from(e: CaptureError) -> Self {
        Self::Capture(e)
    }
}

impl From<UploadError> for CycleError {
    fn from(e: UploadError) -> Self {
        Self::Upload(e)
    }
}

impl From<PersistenceError> for CycleError {
    fn from(e: PersistenceError) -> Self {
        Self::Persistence(e)
    }
}

impl From<SensorError> for CycleError {
    fn from(e: SensorError) -> Self {
        Self::Unclassified(e.to_string())
    }
}

impl From<RelayError> for CycleError {
    fn from(e: RelayError) -> Self {
        Self::Unclassified(e.to_string())
    }
}

impl From<std::io::Error> for CycleError {
    fn from(e: std::io::Error) -> Self {
        Self::Unclassified(e.to_string())
    }
}
