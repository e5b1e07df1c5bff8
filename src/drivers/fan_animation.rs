//! Rotating-blade animation shown while the fan runs.
//!
//! Drawn inside the square region declared in [`crate::pins`], which is
//! disjoint from the status and relay pixels. A background thread advances
//! one frame every [`FRAME_MS`]; `stop()` joins it and blanks the region.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::thread::{self, JoinHandle};
use std::time::Duration;

use log::warn;

use crate::app::ports::Rgb;
use crate::drivers::led_matrix::{SharedMatrix, with_matrix};
use crate::pins::{FAN_ANIMATION_ORIGIN, FAN_ANIMATION_SIZE};

pub const FRAME_MS: u64 = 150;
pub const COLOUR_BLADE: Rgb = (0, 0, 255);
const FRAME_COUNT: usize = 4;

/// Region-relative pixels of blade frame `n`: horizontal, diagonal,
/// vertical, anti-diagonal.
pub fn blade_pixels(n: usize) -> [(u8, u8); FAN_ANIMATION_SIZE as usize] {
    let mid = FAN_ANIMATION_SIZE / 2;
    let last = FAN_ANIMATION_SIZE - 1;
    core::array::from_fn(|i| {
        let i = i as u8;
        match n % FRAME_COUNT {
            0 => (i, mid),
            1 => (i, i),
            2 => (mid, i),
            _ => (last - i, i),
        }
    })
}

const REGION_LEN: usize = (FAN_ANIMATION_SIZE as usize) * (FAN_ANIMATION_SIZE as usize);

/// Every pixel of the region for blade frame `n`, or blank for `None`.
fn region(frame: Option<usize>) -> [(u8, u8, Rgb); REGION_LEN] {
    let (ox, oy) = FAN_ANIMATION_ORIGIN;
    let blade = frame.map(blade_pixels);
    core::array::from_fn(|i| {
        let x = (i % FAN_ANIMATION_SIZE as usize) as u8;
        let y = (i / FAN_ANIMATION_SIZE as usize) as u8;
        let lit = blade.is_some_and(|b| b.contains(&(x, y)));
        (ox + x, oy + y, if lit { COLOUR_BLADE } else { (0, 0, 0) })
    })
}

/// One batched write per frame, so the region never shows blank.
fn draw(matrix: &SharedMatrix, frame: Option<usize>) {
    let pixels = region(frame);
    with_matrix(matrix, |m| m.set_many(&pixels));
}

pub struct FanAnimation {
    matrix: SharedMatrix,
    running: Option<(Arc<AtomicBool>, JoinHandle<()>)>,
}

impl FanAnimation {
    pub fn new(matrix: SharedMatrix) -> Self {
        Self {
            matrix,
            running: None,
        }
    }

    pub fn is_playing(&self) -> bool {
        self.running.is_some()
    }

    /// Start the animation thread. No-op if already playing.
    pub fn play(&mut self) {
        if self.running.is_some() {
            return;
        }
        let keep_going = Arc::new(AtomicBool::new(true));
        let flag = Arc::clone(&keep_going);
        let matrix = Arc::clone(&self.matrix);
        let spawned = thread::Builder::new()
            .name("fan-animation".into())
            .spawn(move || {
                let mut n = 0;
                while flag.load(Ordering::Acquire) {
                    draw(&matrix, Some(n));
                    n = (n + 1) % FRAME_COUNT;
                    thread::sleep(Duration::from_millis(FRAME_MS));
                }
            });
        match spawned {
            Ok(handle) => self.running = Some((keep_going, handle)),
            Err(e) => warn!("fan animation: thread spawn failed: {}", e),
        }
    }

    /// Stop the animation and blank its region. No-op if not playing.
    pub fn stop(&mut self) {
        let Some((flag, handle)) = self.running.take() else {
            return;
        };
        flag.store(false, Ordering::Release);
        if handle.join().is_err() {
            warn!("fan animation: thread panicked");
        }
        draw(&self.matrix, None);
    }
}

impl Drop for FanAnimation {
    fn drop(&mut self) {
        self.stop();
    }
}
