//! Time sources for the countdown.

use chrono::{DateTime, Local};
use std::time::Instant;

/// A source of time readings.
///
/// `monotonic` is only ever compared against an earlier reading, so any origin
/// works. `local_now` stamps log records.
pub trait Clock {
    /// Seconds on a monotonic timeline.
    fn monotonic(&self) -> f64;

    /// Current local wall-clock time.
    fn local_now(&self) -> DateTime<Local>;
}

/// Clock backed by the operating system.
#[derive(Debug, Clone)]
pub struct SystemClock {
    origin: Instant,
}

impl SystemClock {
    pub fn new() -> Self {
        Self {
            origin: Instant::now(),
        }
    }
}

impl Default for SystemClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for SystemClock {
    fn monotonic(&self) -> f64 {
        self.origin.elapsed().as_secs_f64()
    }

    fn local_now(&self) -> DateTime<Local> {
        Local::now()
    }
}

#[cfg(test)]
pub use scripted::ScriptedClock;
