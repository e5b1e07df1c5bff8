//! Wall-clock adapter.

use chrono::{DateTime, Utc};

use crate::app::ports::ClockPort;

/// UTC system clock. Not monotonic; the service guards its log keys.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl ClockPort for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}
