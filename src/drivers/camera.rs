//! Still camera driver.
//!
//! Shells out to a still-capture program (`libcamera-still` on current
//! Raspberry Pi OS) with `-o <path>` appended. A spawn failure, a non-zero
//! exit, or a missing output file is a [`CaptureError`].

use std::fs;
use std::path::Path;
use std::process::Command;

use log::info;

use crate::error::CaptureError;

pub struct CommandCamera {
    program: String,
    args: Vec<String>,
}

impl CommandCamera {
    pub fn new(program: impl Into<String>, args: Vec<String>) -> Self {
        Self {
            program: program.into(),
            args,
        }
    }

    pub fn capture(&mut self, path: &Path) -> Result<(), CaptureError> {
        if let Some(folder) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(folder).map_err(|e| {
                CaptureError::new(format!("cannot create {}: {}", folder.display(), e))
            })?;
        }

        let output = Command::new(&self.program)
            .args(&self.args)
            .arg("-o")
            .arg(path)
            .output()
            .map_err(|e| CaptureError::new(format!("cannot run {}: {}", self.program, e)))?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(CaptureError::new(format!(
                "{} exited with {}: {}",
                self.program,
                output.status,
                stderr.trim()
            )));
        }
        if !path.exists() {
            return Err(CaptureError::new(format!(
                "{} produced no file at {}",
                self.program,
                path.display()
            )));
        }

        info!("camera: captured {}", path.display());
        Ok(())
    }
}
