//! JSON configuration file adapter.
//!
//! Implements [`ConfigPort`]. A missing file yields
//! [`SystemConfig::default()`]; a present file is parsed with serde
//! (missing fields take their defaults) and validated before use. The
//! file is read once; the controller never writes it.

use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use log::info;

use crate::app::ports::{ConfigError, ConfigPort};
use crate::config::SystemConfig;

/// Environment variable naming the config file.
pub const CONFIG_ENV: &str = "GREENHOUSE_CONFIG";
pub const DEFAULT_CONFIG_PATH: &str = "greenhouse.json";

pub struct JsonConfigFile {
    path: PathBuf,
}

impl JsonConfigFile {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Path from `GREENHOUSE_CONFIG`, or `greenhouse.json`.
    pub fn from_env() -> Self {
        Self::new(std::env::var_os(CONFIG_ENV).unwrap_or_else(|| DEFAULT_CONFIG_PATH.into()))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl ConfigPort for JsonConfigFile {
    fn load(&self) -> Result<SystemConfig, ConfigError> {
        let text = match fs::read_to_string(&self.path) {
            Ok(text) => text,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                info!("config: {} not found, using defaults", self.path.display());
                return Ok(SystemConfig::default());
            }
            Err(e) => return Err(ConfigError::IoError(e.to_string())),
        };
        let cfg: SystemConfig =
            serde_json::from_str(&text).map_err(|e| ConfigError::Corrupted(e.to_string()))?;
        cfg.validate()?;
        info!("config: loaded {}", self.path.display());
        Ok(cfg)
    }
}
