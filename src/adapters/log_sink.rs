//! Log-based event sink adapter.
//!
//! Implements [`EventSink`] by writing structured application events to
//! the `log` facade, one tagged line per event.

use log::{error, info, warn};

use crate::app::events::AppEvent;
use crate::app::model::FanState;
use crate::app::ports::EventSink;
use crate::units::c_to_f;

/// Adapter that logs every [`AppEvent`].
#[derive(Debug, Default)]
pub struct LogEventSink;

impl LogEventSink {
    pub fn new() -> Self {
        Self
    }
}

impl EventSink for LogEventSink {
    fn emit(&mut self, event: &AppEvent) {
        match event {
            AppEvent::Started { interval_secs } => {
                info!("START | interval={}s", interval_secs);
            }
            AppEvent::PhotoUploaded { key, bytes } => {
                info!("UPLOAD | {} ok ({} bytes)", key, bytes);
            }
            AppEvent::UploadFailed { key, code } => {
                warn!("UPLOAD | {} failed code={} (kept locally)", key, code);
            }
            AppEvent::CaptureFailed { reason } => {
                warn!("CYCLE | capture failed, skipped: {}", reason);
            }
            AppEvent::ReadingPersisted { log, photo } => {
                info!(
                    "CYCLE | persisted {} photo={}",
                    log,
                    photo.as_deref().unwrap_or("none")
                );
            }
            AppEvent::FanChanged {
                state,
                temperature_c,
            } => {
                let verb = match state {
                    FanState::On => "on",
                    FanState::Off => "off",
                };
                info!(
                    "FAN | {} at {:.1}\u{00b0}C / {:.1}\u{00b0}F",
                    verb,
                    temperature_c,
                    c_to_f(*temperature_c)
                );
            }
            AppEvent::Fatal { diagnostic } => {
                error!("FATAL | {}", diagnostic);
            }
            AppEvent::Stopped => {
                info!("STOP | interrupted, display cleared");
            }
        }
    }
}
