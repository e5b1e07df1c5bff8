//! Outbound application events.
//!
//! The [`AppService`](super::service::AppService) emits these through the
//! [`EventSink`](super::ports::EventSink) port. Adapters on the other side
//! decide what to do with them.

use super::model::FanState;

/// Structured events emitted by the application core.
#[derive(Debug, Clone, PartialEq)]
pub enum AppEvent {
    /// The controller started; carries the cycle interval in seconds.
    Started { interval_secs: u64 },

    /// A photo reached object storage.
    PhotoUploaded { key: String, bytes: u64 },

    /// Upload failed; the cycle continues with a local-only photo.
    UploadFailed { key: String, code: String },

    /// The camera failed; the cycle was skipped.
    CaptureFailed { reason: String },

    /// A reading was written to both stores.
    ReadingPersisted { log: String, photo: Option<String> },

    /// The thermostat moved the fan.
    FanChanged { state: FanState, temperature_c: f32 },

    /// A fatal error is about to terminate the process.
    Fatal { diagnostic: String },

    /// Graceful shutdown after an interrupt.
    Stopped,
}
