//! Countdown engine for a single interval.

use crate::clock::Clock;
use chrono::{DateTime, Local};
use std::fmt;
use std::num::NonZeroU64;
use std::rc::Rc;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum TimerError {
    #[error("invalid duration {input:?}: must be a positive number of minutes")]
    InvalidDuration { input: String },
}

/// Result of a start/stop/reset request.
///
/// None of these are failures; callers use them for feedback only.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transition {
    Started,
    AlreadyStarted,
    Stopped,
    NotRunning,
    Reset,
}

/// What a tick observed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickOutcome {
    Unchanged,
    /// The countdown crossed into zero on this tick.
    Finished,
}

/// Whole seconds for a duration in minutes, rejecting anything that is not
/// at least one second long.
pub fn minutes_to_secs(minutes: f64) -> Result<NonZeroU64, TimerError> {
    validate_minutes(minutes)?;
    NonZeroU64::new((minutes * 60.0).trunc() as u64).ok_or_else(|| TimerError::InvalidDuration {
        input: minutes.to_string(),
    })
}

fn validate_minutes(minutes: f64) -> Result<(), TimerError> {
    if !minutes.is_finite() || minutes <= 0.0 {
        return Err(TimerError::InvalidDuration {
            input: minutes.to_string(),
        });
    }
    Ok(())
}

/// Counts one interval down to zero.
///
/// Remaining time is always recomputed from the start reference, so ticks may
/// arrive at any rate without drift.
pub struct Countdown {
    clock: Rc<dyn Clock>,
    total_secs: u64,
    remaining: u64,
    running: bool,
    /// Monotonic reading at the last start.
    start_reference: Option<f64>,
    /// Wall-clock time of the last start.
    started_at: Option<DateTime<Local>>,
    activity: String,
}

impl Countdown {
    /// Create a countdown of `minutes` (fractional minutes are truncated to
    /// whole seconds).
    pub fn new(
        minutes: f64,
        activity: impl Into<String>,
        clock: Rc<dyn Clock>,
    ) -> Result<Self, TimerError> {
        let secs = minutes_to_secs(minutes)?;
        Ok(Self::with_secs(secs, activity, clock))
    }

    /// Infallible constructor for an already validated duration.
    pub fn with_secs(total: NonZeroU64, activity: impl Into<String>, clock: Rc<dyn Clock>) -> Self {
        Self {
            clock,
            total_secs: total.get(),
            remaining: total.get(),
            running: false,
            start_reference: None,
            started_at: None,
            activity: activity.into(),
        }
    }

    /// Start a fresh countdown from the full duration.
    ///
    /// A paused countdown is not resumed: starting again begins from
    /// `total_secs`.
    pub fn start(&mut self) -> Transition {
        if self.running {
            return Transition::AlreadyStarted;
        }
        self.start_reference = Some(self.clock.monotonic());
        self.remaining = self.total_secs;
        self.running = true;
        self.started_at = Some(self.clock.local_now());
        Transition::Started
    }

    pub fn stop(&mut self) -> Transition {
        if !self.running {
            return Transition::NotRunning;
        }
        self.running = false;
        Transition::Stopped
    }

    pub fn reset(&mut self) -> Transition {
        self.running = false;
        self.remaining = self.total_secs;
        self.start_reference = None;
        self.started_at = None;
        Transition::Reset
    }

    /// Recompute remaining time from the clock.
    ///
    /// Reports `Finished` once, on the tick that reaches zero; the countdown
    /// stops there so later ticks are no-ops.
    pub fn tick(&mut self) -> TickOutcome {
        if !self.running {
            return TickOutcome::Unchanged;
        }
        let Some(reference) = self.start_reference else {
            return TickOutcome::Unchanged;
        };

        let elapsed = self.clock.monotonic() - reference;
        let left = self.total_secs as f64 - elapsed;
        self.remaining = if left <= 0.0 {
            0
        } else {
            (left.ceil() as u64).min(self.total_secs)
        };

        if self.remaining == 0 {
            self.running = false;
            return TickOutcome::Finished;
        }
        TickOutcome::Unchanged
    }

    pub fn remaining(&self) -> u64 {
        self.remaining
    }

    pub fn total_secs(&self) -> u64 {
        self.total_secs
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    pub fn is_finished(&self) -> bool {
        self.remaining == 0
    }

    pub fn activity(&self) -> &str {
        &self.activity
    }

    pub fn set_activity(&mut self, activity: impl Into<String>) {
        self.activity = activity.into();
    }

    pub fn started_at(&self) -> Option<DateTime<Local>> {
        self.started_at
    }

    /// Fraction of the interval already counted down.
    pub fn progress(&self) -> f64 {
        let done = self.total_secs - self.remaining;
        (done as f64 / self.total_secs as f64).clamp(0.0, 1.0)
    }

    /// Remaining time as `MM:SS`; minutes grow past two digits as needed.
    pub fn format_time(&self) -> String {
        format!("{:02}:{:02}", self.remaining / 60, self.remaining % 60)
    }
}

impl fmt::Display for Countdown {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.format_time())
    }
}

impl fmt::Debug for Countdown {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Countdown")
            .field("total_secs", &self.total_secs)
            .field("remaining", &self.remaining)
            .field("running", &self.running)
            .field("activity", &self.activity)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::ScriptedClock;
    use proptest::prelude::*;

    fn scripted(readings: &[f64]) -> Rc<dyn Clock> {
        Rc::new(ScriptedClock::new(readings.iter().copied()))
    }

    fn countdown_secs(secs: u64, readings: &[f64]) -> Countdown {
        Countdown::with_secs(NonZeroU64::new(secs).unwrap(), "Work", scripted(readings))
    }

    proptest! {
        #[test]
        fn fresh_countdown_holds_full_duration(minutes in 1u32..10_000) {
            let cd = Countdown::new(minutes as f64, "Work", scripted(&[])).unwrap();
            prop_assert_eq!(cd.remaining(), minutes as u64 * 60);
            prop_assert!(!cd.is_running());
            prop_assert!(!cd.is_finished());
        }

        #[test]
        fn non_positive_minutes_are_rejected(minutes in -10_000.0f64..=0.0) {
            let result = Countdown::new(minutes, "Work", scripted(&[]));
            let is_invalid = matches!(result, Err(TimerError::InvalidDuration { .. }));
            prop_assert!(is_invalid);
        }

        #[test]
        fn remaining_never_exceeds_total(offsets in proptest::collection::vec(0.0f64..120.0, 1..20)) {
            let mut sorted = offsets.clone();
            sorted.sort_by(|a, b| a.partial_cmp(b).unwrap());
            let mut readings = vec![0.0];
            readings.extend(sorted);
            let mut cd = countdown_secs(60, &readings);
            cd.start();
            let mut previous = cd.remaining();
            for _ in 1..readings.len() {
                cd.tick();
                prop_assert!(cd.remaining() <= previous);
                prop_assert!(cd.remaining() <= 60);
                previous = cd.remaining();
            }
        }
    }

    #[test]
    fn test_fractional_minutes_truncate_to_seconds() {
        let cd = Countdown::new(0.5, "Work", scripted(&[])).unwrap();
        assert_eq!(cd.remaining(), 30);
        assert_eq!(cd.format_time(), "00:30");
    }

    #[test]
    fn test_rejects_invalid_durations() {
        for minutes in [0.0, -1.0, f64::NAN, f64::INFINITY, 0.001] {
            assert!(
                Countdown::new(minutes, "Work", scripted(&[])).is_err(),
                "{minutes} should be rejected"
            );
        }
    }

    #[test]
    fn test_start_stop_reset_transitions() {
        let mut cd = countdown_secs(600, &[100.0]);
        assert_eq!(cd.stop(), Transition::NotRunning);
        assert_eq!(cd.start(), Transition::Started);
        assert!(cd.is_running());
        assert_eq!(cd.stop(), Transition::Stopped);
        assert!(!cd.is_running());
        assert_eq!(cd.reset(), Transition::Reset);
        assert!(cd.started_at().is_none());
    }

    #[test]
    fn test_double_start_keeps_reference() {
        let mut cd = countdown_secs(600, &[100.0, 250.0, 101.0]);
        assert_eq!(cd.start(), Transition::Started);
        let started_at = cd.started_at();
        assert_eq!(cd.start(), Transition::AlreadyStarted);
        assert_eq!(cd.started_at(), started_at);
        assert!(cd.is_running());

        // The second start consumed no reading; the tick measures from 100.
        cd.tick();
        assert_eq!(cd.remaining(), 450);
    }

    #[test]
    fn test_countdown_accuracy() {
        let mut cd = countdown_secs(5, &[100.0, 101.0, 104.9, 105.0]);
        cd.start();
        assert_eq!(cd.remaining(), 5);

        assert_eq!(cd.tick(), TickOutcome::Unchanged);
        assert_eq!(cd.remaining(), 4);
        assert_eq!(cd.tick(), TickOutcome::Unchanged);
        assert_eq!(cd.remaining(), 1);
        assert!(!cd.is_finished());
        assert_eq!(cd.tick(), TickOutcome::Finished);
        assert_eq!(cd.remaining(), 0);
        assert!(cd.is_finished());
    }

    #[test]
    fn test_finish_reported_once() {
        let mut cd = countdown_secs(1, &[100.0, 101.0, 101.0, 150.0]);
        cd.start();
        assert_eq!(cd.tick(), TickOutcome::Finished);
        assert!(cd.is_finished());
        assert!(!cd.is_running());
        assert_eq!(cd.tick(), TickOutcome::Unchanged);
        assert_eq!(cd.tick(), TickOutcome::Unchanged);
        assert_eq!(cd.remaining(), 0);
    }

    #[test]
    fn test_past_expiration_clamps_to_zero() {
        let mut cd = countdown_secs(5, &[100.0, 107.0]);
        cd.start();
        assert_eq!(cd.tick(), TickOutcome::Finished);
        assert_eq!(cd.remaining(), 0);
    }

    #[test]
    fn test_stop_freezes_remaining() {
        let mut cd = countdown_secs(10, &[100.0, 105.0, 999_999.0]);
        cd.start();
        cd.tick();
        let before = cd.remaining();
        assert_eq!(before, 5);

        cd.stop();
        assert_eq!(cd.remaining(), before);
        assert_eq!(cd.tick(), TickOutcome::Unchanged);
        assert_eq!(cd.remaining(), before);
    }

    #[test]
    fn test_start_after_pause_restarts_from_full_duration() {
        let mut cd = countdown_secs(10, &[100.0, 104.0, 200.0, 203.0]);
        cd.start();
        cd.tick();
        assert_eq!(cd.remaining(), 6);
        cd.stop();

        assert_eq!(cd.start(), Transition::Started);
        assert_eq!(cd.remaining(), 10);
        cd.tick();
        assert_eq!(cd.remaining(), 7);
    }

    #[test]
    fn test_reset_restores_total_from_any_state() {
        let mut never_started = countdown_secs(10, &[]);
        never_started.reset();
        assert_eq!(never_started.remaining(), 10);
        assert!(!never_started.is_running());

        let mut running = countdown_secs(10, &[100.0, 103.0]);
        running.start();
        running.tick();
        running.reset();
        assert_eq!(running.remaining(), 10);
        assert!(!running.is_running());

        let mut finished = countdown_secs(1, &[100.0, 101.0]);
        finished.start();
        finished.tick();
        assert!(finished.is_finished());
        finished.reset();
        assert!(!finished.is_finished());
        assert_eq!(finished.remaining(), 1);
    }

    #[test]
    fn test_format_time() {
        let cd = Countdown::new(25.0, "Work", scripted(&[])).unwrap();
        assert_eq!(cd.format_time(), "25:00");
        assert_eq!(cd.to_string(), "25:00");

        let mut cd = countdown_secs(300, &[0.0, 28.3]);
        cd.start();
        cd.tick();
        assert_eq!(cd.format_time(), "04:32");

        let long = Countdown::new(86_400.0, "Work", scripted(&[])).unwrap();
        assert_eq!(long.format_time(), "86400:00");
    }

    #[test]
    fn test_progress() {
        let mut cd = countdown_secs(100, &[0.0, 25.0, 500.0]);
        assert_eq!(cd.progress(), 0.0);

        cd.start();
        cd.tick();
        assert!((cd.progress() - 0.25).abs() < f64::EPSILON);

        cd.tick();
        assert_eq!(cd.progress(), 1.0);
    }
}
