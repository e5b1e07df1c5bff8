//! Two-stage persistence of one [`EnvironmentReading`].
//!
//! The structured store is written first; a failure there is returned as
//! [`CycleError::Persistence`] and nothing reaches the local log. The local
//! log is opened in append mode for every line and never truncated.

use std::fs::OpenOptions;
use std::io::Write;
use std::path::PathBuf;

use super::model::EnvironmentReading;
use super::ports::RecordStorePort;
use crate::error::CycleError;

pub struct LogPersister {
    log_path: PathBuf,
}

impl LogPersister {
    pub fn new(log_path: impl Into<PathBuf>) -> Self {
        Self {
            log_path: log_path.into(),
        }
    }

    pub fn persist(
        &self,
        reading: &EnvironmentReading,
        store: &mut impl RecordStorePort,
    ) -> Result<(), CycleError> {
        store.put(reading)?;
        self.append(reading)
    }

    fn append(&self, reading: &EnvironmentReading) -> Result<(), CycleError> {
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.log_path)
            .map_err(|e| {
                CycleError::Unclassified(format!("open {}: {e}", self.log_path.display()))
            })?;
        writeln!(file, "{}", reading.log_line())?;
        Ok(())
    }
}
