//! Structured record store as a JSON-lines table.
//!
//! Each table is `<dir>/<table>.jsonl`; every put appends one serde_json
//! object keyed by the reading's `log` attribute. Rows are never rewritten.

use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};

use serde_json::Value;

use crate::app::model::EnvironmentReading;
use crate::app::ports::RecordStorePort;
use crate::error::PersistenceError;

pub struct JsonLinesTable {
    table: String,
    path: PathBuf,
}

impl JsonLinesTable {
    /// Table file under `dir`. Neither is created until the first put.
    pub fn new(dir: impl AsRef<Path>, table: impl Into<String>) -> Self {
        let table = table.into();
        Self {
            path: dir.as_ref().join(format!("{table}.jsonl")),
            table,
        }
    }

    fn fail(&self, reason: impl ToString) -> PersistenceError {
        PersistenceError {
            table: self.table.clone(),
            reason: reason.to_string(),
        }
    }
}

impl RecordStorePort for JsonLinesTable {
    fn put(&mut self, reading: &EnvironmentReading) -> Result<(), PersistenceError> {
        if let Some(dir) = self.path.parent() {
            fs::create_dir_all(dir).map_err(|e| self.fail(e))?;
        }
        let row = serde_json::to_string(&Value::Object(reading.to_record()))
            .map_err(|e| self.fail(e))?;
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .map_err(|e| self.fail(e))?;
        writeln!(file, "{row}").map_err(|e| self.fail(e))
    }
}
