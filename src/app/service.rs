//! Application service: the hexagonal core.
//!
//! [`AppService`] runs the periodic cycle against injected ports. It never
//! opens a device or a socket itself, so the whole cycle is testable with
//! mock adapters.
//!
//! ```text
//!  SensorPort ─┐                                  ┌─▶ ObjectStorePort
//!  ThermalPort ├─▶ ┌──────────────────────────┐ ──┼─▶ RecordStorePort
//!  CameraPort ─┤   │        AppService        │   └─▶ local log
//!  ClockPort ──┘   │ capture · persist · fan  │ ──▶ EventSink
//!                  └──────────────────────────┘
//! ```
//!
//! One cycle:
//!
//! 1. capture a photo; on failure show ERROR and skip to the thermostat
//! 2. upload it; on failure show ERROR and keep the local filename
//! 3. sample sensors and thermal proxies into an [`EnvironmentReading`]
//! 4. persist it (record store, then local log)
//! 5. if nothing failed, show SUCCESS
//! 6. thermostat check against a fresh temperature read

use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, TimeDelta, Utc};
use log::{error, info, warn};

use crate::config::SystemConfig;
use crate::control::fan::FanController;
use crate::control::thermostat::FanAction;
use crate::drivers::status_indicator::StatusIndicator;
use crate::error::{CaptureError, CycleError};

use super::events::AppEvent;
use super::model::{EnvironmentReading, FanState, PhotoArtifact, UploadOutcome};
use super::persister::LogPersister;
use super::ports::{
    CameraPort, ClockPort, EventSink, ObjectStorePort, RecordStorePort, SensorPort, ThermalPort,
    TransferStatus,
};
use super::shutdown::Shutdown;

/// Result of the capture-and-persist part of a cycle.
#[derive(Debug)]
pub enum CycleOutcome {
    /// A reading reached both stores.
    Persisted {
        reading: EnvironmentReading,
        photo: PhotoArtifact,
    },
    /// The camera failed; nothing was persisted.
    CaptureFailed(CaptureError),
}

pub struct AppService {
    fan: Arc<FanController>,
    indicator: Arc<StatusIndicator>,
    persister: LogPersister,
    photo_folder: String,
    interval: Duration,
    last_timestamp: Option<DateTime<Utc>>,
    cycle_count: u64,
    persisted_count: u64,
    capture_failures: u64,
}

impl AppService {
    pub fn new(
        config: &SystemConfig,
        fan: Arc<FanController>,
        indicator: Arc<StatusIndicator>,
    ) -> Self {
        Self {
            fan,
            indicator,
            persister: LogPersister::new(&config.log_file),
            photo_folder: config.photo_folder.clone(),
            interval: Duration::from_secs(config.log_interval_secs),
            last_timestamp: None,
            cycle_count: 0,
            persisted_count: 0,
            capture_failures: 0,
        }
    }

    // ── Lifecycle ─────────────────────────────────────────────

    /// Cycle until `shutdown` fires or a fatal error occurs.
    ///
    /// On interrupt the fan is shut down, the display is cleared and
    /// `Ok(())` is returned. On a fatal error ERROR is shown, a
    /// [`AppEvent::Fatal`] is emitted and the error is returned for the
    /// caller to turn into an exit code.
    pub fn run<H, S>(
        &mut self,
        hw: &mut H,
        store: &mut S,
        sink: &mut impl EventSink,
        shutdown: &Shutdown,
    ) -> Result<(), CycleError>
    where
        H: SensorPort + ThermalPort + CameraPort + ClockPort,
        S: ObjectStorePort + RecordStorePort,
    {
        sink.emit(&AppEvent::Started {
            interval_secs: self.interval.as_secs(),
        });
        info!("AppService started, interval {:?}", self.interval);

        loop {
            if let Err(e) = self.step(hw, store, sink) {
                self.indicator.show_error();
                return Err(self.fatal(e, sink));
            }
            if shutdown.wait(self.interval) {
                break;
            }
        }

        // The animation thread must be gone before the clear, or it
        // repaints the matrix.
        let released = self.fan.shutdown();
        self.indicator.clear();
        if let Err(e) = released {
            self.indicator.show_error();
            return Err(self.fatal(e.into(), sink));
        }
        sink.emit(&AppEvent::Stopped);
        info!(
            "AppService stopped: {} cycles, {} persisted",
            self.cycle_count, self.persisted_count
        );
        Ok(())
    }

    /// One full cycle: capture/persist, then the thermostat.
    pub fn step<H, S>(
        &mut self,
        hw: &mut H,
        store: &mut S,
        sink: &mut impl EventSink,
    ) -> Result<CycleOutcome, CycleError>
    where
        H: SensorPort + ThermalPort + CameraPort + ClockPort,
        S: ObjectStorePort + RecordStorePort,
    {
        let outcome = self.run_cycle(hw, store, sink)?;
        self.check_thermostat(hw, sink)?;
        Ok(outcome)
    }

    // ── Per-cycle orchestration ───────────────────────────────

    /// Capture, upload and persist one reading.
    ///
    /// Capture and upload failures are absorbed here. Only fatal errors
    /// (record store, sensor read, local log append) come back as `Err`.
    pub fn run_cycle<H, S>(
        &mut self,
        hw: &mut H,
        store: &mut S,
        sink: &mut impl EventSink,
    ) -> Result<CycleOutcome, CycleError>
    where
        H: SensorPort + ThermalPort + CameraPort + ClockPort,
        S: ObjectStorePort + RecordStorePort,
    {
        self.cycle_count += 1;
        let at = self.next_timestamp(hw.now());
        let mut photo = PhotoArtifact::new(&self.photo_folder, at);

        // 1. Capture
        if let Err(e) = hw.capture(&photo.local_path) {
            self.capture_failures += 1;
            warn!("capture failed: {}", e);
            self.indicator.show_error();
            sink.emit(&AppEvent::CaptureFailed {
                reason: e.reason.clone(),
            });
            return Ok(CycleOutcome::CaptureFailed(e));
        }

        // 2. Upload (non-fatal)
        let status = TransferStatus::new();
        match store.upload(&photo.local_path, &photo.remote_key, &status) {
            Ok(()) => {
                let (sent, total) = status.poll();
                info!(
                    "uploaded {} ({}/{} bytes, {:.0}%)",
                    photo.remote_key,
                    sent,
                    total,
                    status.percent()
                );
                photo.upload = UploadOutcome::Success;
                sink.emit(&AppEvent::PhotoUploaded {
                    key: photo.remote_key.clone(),
                    bytes: sent,
                });
            }
            Err(e) => {
                warn!("upload of {} failed: {}", photo.remote_key, e);
                self.indicator.show_error();
                sink.emit(&AppEvent::UploadFailed {
                    key: photo.remote_key.clone(),
                    code: e.code.clone(),
                });
                photo.upload = UploadOutcome::Failed(e.code);
            }
        }

        // 3. Build the reading
        let environment = hw.sample_environment()?;
        let thermal = hw.read_thermal()?;
        let reading =
            EnvironmentReading::new(at, environment, thermal, Some(photo.remote_key.clone()));

        // 4. Persist (fatal on failure)
        self.persister.persist(&reading, store)?;
        self.persisted_count += 1;
        info!("{}", reading.log_line());
        sink.emit(&AppEvent::ReadingPersisted {
            log: reading.log.clone(),
            photo: reading.photo.clone(),
        });

        // 5. Success only when every stage succeeded
        if photo.upload == UploadOutcome::Success {
            self.indicator.show_success();
        }

        Ok(CycleOutcome::Persisted { reading, photo })
    }

    /// Fresh temperature read, then the bang-bang decision.
    pub fn check_thermostat(
        &mut self,
        hw: &mut impl SensorPort,
        sink: &mut impl EventSink,
    ) -> Result<Option<FanAction>, CycleError> {
        let temperature_c = hw.read_temperature()?;
        let action = self.fan.check_threshold(temperature_c)?;
        if let Some(action) = action {
            let state = match action {
                FanAction::Start => FanState::On,
                FanAction::Stop => FanState::Off,
            };
            sink.emit(&AppEvent::FanChanged {
                state,
                temperature_c,
            });
        }
        Ok(action)
    }

    // ── Queries ───────────────────────────────────────────────

    /// Cycles started since construction.
    pub fn cycle_count(&self) -> u64 {
        self.cycle_count
    }

    /// Readings that reached both stores.
    pub fn persisted_count(&self) -> u64 {
        self.persisted_count
    }

    pub fn capture_failures(&self) -> u64 {
        self.capture_failures
    }

    // ── Internal ──────────────────────────────────────────────

    fn fatal(&self, e: CycleError, sink: &mut impl EventSink) -> CycleError {
        error!("fatal after {} cycles: {}", self.cycle_count, e);
        sink.emit(&AppEvent::Fatal {
            diagnostic: e.to_string(),
        });
        e
    }

    /// Log keys never go backwards, even if the wall clock does.
    fn next_timestamp(&mut self, now: DateTime<Utc>) -> DateTime<Utc> {
        let at = match self.last_timestamp {
            Some(last) if now <= last => {
                warn!("clock went backwards ({} <= {}), bumping log key", now, last);
                last + TimeDelta::microseconds(1)
            }
            _ => now,
        };
        self.last_timestamp = Some(at);
        at
    }
}
