//! 8×8 LED matrix drivers.
//!
//! ## Dual-target design
//!
//! On the Pi: [`FramebufferMatrix`] writes RGB565 pixels to the Sense HAT
//! framebuffer device (128 bytes, row-major, little-endian).
//! On host/test: [`MemoryMatrix`] keeps the frame in memory and can be
//! inspected through a cloned handle.

use std::fs::{File, OpenOptions};
use std::io::{Seek, SeekFrom, Write};
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, PoisonError};

use log::warn;

use crate::app::ports::{Frame, LedMatrix, Rgb};
use crate::pins::MATRIX_WIDTH;

/// The matrix is shared by the status indicator and the fan animation.
pub type SharedMatrix = Arc<Mutex<Box<dyn LedMatrix>>>;

pub fn shared(matrix: impl LedMatrix + 'static) -> SharedMatrix {
    Arc::new(Mutex::new(Box::new(matrix)))
}

/// Run `f` with the matrix locked. A poisoned lock still hands out the
/// matrix; pixels carry no invariant worth aborting for.
pub fn with_matrix<R>(matrix: &SharedMatrix, f: impl FnOnce(&mut dyn LedMatrix) -> R) -> R {
    let mut guard = matrix.lock().unwrap_or_else(PoisonError::into_inner);
    f(guard.as_mut())
}

fn index(x: u8, y: u8) -> Option<usize> {
    if x < MATRIX_WIDTH && y < MATRIX_WIDTH {
        Some(y as usize * MATRIX_WIDTH as usize + x as usize)
    } else {
        None
    }
}

/// Pack 8-bit RGB into the framebuffer's RGB565 format.
pub fn rgb565((r, g, b): Rgb) -> u16 {
    ((r as u16 >> 3) << 11) | ((g as u16 >> 2) << 5) | (b as u16 >> 3)
}

// ── Framebuffer (Sense HAT) ───────────────────────────────────

/// Sense HAT framebuffer. The device stays open; every update rewrites
/// the whole 128-byte frame from offset 0 in a single write.
pub struct FramebufferMatrix {
    path: PathBuf,
    file: File,
    pixels: [u16; 64],
}

impl FramebufferMatrix {
    /// Open the framebuffer and blank it.
    pub fn open(path: impl AsRef<Path>) -> std::io::Result<Self> {
        let path = path.as_ref().to_path_buf();
        let file = OpenOptions::new().write(true).open(&path)?;
        let mut fb = Self {
            path,
            file,
            pixels: [0; 64],
        };
        fb.flush();
        Ok(fb)
    }

    fn flush(&mut self) {
        let mut bytes = [0u8; 128];
        for (chunk, px) in bytes.chunks_exact_mut(2).zip(self.pixels.iter()) {
            chunk.copy_from_slice(&px.to_le_bytes());
        }
        let result = self
            .file
            .seek(SeekFrom::Start(0))
            .and_then(|_| self.file.write_all(&bytes));
        if let Err(e) = result {
            warn!("LED matrix: write to {} failed: {}", self.path.display(), e);
        }
    }
}

impl LedMatrix for FramebufferMatrix {
    fn set_pixel(&mut self, x: u8, y: u8, rgb: Rgb) {
        let Some(i) = index(x, y) else {
            warn!("LED matrix: pixel ({}, {}) out of range", x, y);
            return;
        };
        self.pixels[i] = rgb565(rgb);
        self.flush();
    }

    fn set_pixels(&mut self, frame: &Frame) {
        for (dst, src) in self.pixels.iter_mut().zip(frame.iter()) {
            *dst = rgb565(*src);
        }
        self.flush();
    }

    fn clear(&mut self) {
        self.pixels = [0; 64];
        self.flush();
    }

    fn set_many(&mut self, pixels: &[(u8, u8, Rgb)]) {
        for &(x, y, rgb) in pixels {
            match index(x, y) {
                Some(i) => self.pixels[i] = rgb565(rgb),
                None => warn!("LED matrix: pixel ({}, {}) out of range", x, y),
            }
        }
        self.flush();
    }
}

// ── In-memory (host simulation / tests) ───────────────────────

/// In-memory matrix. Clones share the same frame.
#[derive(Clone)]
pub struct MemoryMatrix {
    frame: Arc<Mutex<Frame>>,
}

impl Default for MemoryMatrix {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryMatrix {
    pub fn new() -> Self {
        Self {
            frame: Arc::new(Mutex::new([(0, 0, 0); 64])),
        }
    }

    pub fn pixel(&self, x: u8, y: u8) -> Rgb {
        let frame = self.frame.lock().unwrap_or_else(PoisonError::into_inner);
        index(x, y).map_or((0, 0, 0), |i| frame[i])
    }

    pub fn frame(&self) -> Frame {
        *self.frame.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl LedMatrix for MemoryMatrix {
    fn set_pixel(&mut self, x: u8, y: u8, rgb: Rgb) {
        if let Some(i) = index(x, y) {
            self.frame.lock().unwrap_or_else(PoisonError::into_inner)[i] = rgb;
        }
    }

    fn set_pixels(&mut self, frame: &Frame) {
        *self.frame.lock().unwrap_or_else(PoisonError::into_inner) = *frame;
    }

    fn clear(&mut self) {
        *self.frame.lock().unwrap_or_else(PoisonError::into_inner) = [(0, 0, 0); 64];
    }

    fn set_many(&mut self, pixels: &[(u8, u8, Rgb)]) {
        let mut frame = self.frame.lock().unwrap_or_else(PoisonError::into_inner);
        for &(x, y, rgb) in pixels {
            if let Some(i) = index(x, y) {
                frame[i] = rgb;
            }
        }
    }
}
