//! Interruptible inter-cycle sleep.

use std::sync::mpsc::{self, Receiver, RecvTimeoutError, Sender};
use std::thread;
use std::time::Duration;

pub struct Shutdown {
    rx: Receiver<()>,
}

impl Shutdown {
    /// Returns the waiter and the trigger handed to the signal handler.
    pub fn channel() -> (Self, Sender<()>) {
        let (tx, rx) = mpsc::channel();
        (Self { rx }, tx)
    }

    /// Sleep for up to `timeout`. Returns `true` if shutdown was requested.
    pub fn wait(&self, timeout: Duration) -> bool {
        match self.rx.recv_timeout(timeout) {
            Ok(()) => true,
            Err(RecvTimeoutError::Timeout) => false,
            // Nobody can trigger us any more; keep the cadence.
            Err(RecvTimeoutError::Disconnected) => {
                thread::sleep(timeout);
                false
            }
        }
    }
}
