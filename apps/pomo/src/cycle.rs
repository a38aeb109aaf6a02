//! Mode cycling: focus, short break, long break.
//!
//! The controller owns the live countdown and replaces it whenever the mode
//! changes. Every concluded interval is written to the session store:
//! natural finishes as completed, manual toggles of a running interval as
//! abandoned.

use crate::clock::Clock;
use crate::config::DurationConfig;
use crate::countdown::{minutes_to_secs, Countdown, TickOutcome, TimerError, Transition};
use crate::store::{SessionStore, StoreError, StoreResult};
use crate::models::{Mode, SessionRecord};
use crate::stats::DaySummary;
use chrono::{DateTime, Local};
use std::num::NonZeroU64;
use std::rc::Rc;
use thiserror::Error;
use tracing::{debug, info};

#[derive(Debug, Error)]
pub enum CycleError {
    #[error(transparent)]
    InvalidDuration(#[from] TimerError),
    #[error("long_break_every must be at least 1")]
    InvalidCycleLength,
    #[error("failed to read today's sessions: {0}")]
    Store(#[from] StoreError),
}

/// A mode change.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Advance {
    pub from: Mode,
    pub to: Mode,
    /// True when the interval ran to zero rather than being toggled away.
    pub natural: bool,
}

/// Validated interval lengths.
#[derive(Debug, Clone, Copy)]
struct Lengths {
    focus: NonZeroU64,
    short_break: NonZeroU64,
    long_break: NonZeroU64,
}

impl Lengths {
    fn from_config(config: &DurationConfig) -> Result<Self, TimerError> {
        Ok(Self {
            focus: minutes_to_secs(config.minutes(Mode::Focus))?,
            short_break: minutes_to_secs(config.minutes(Mode::ShortBreak))?,
            long_break: minutes_to_secs(config.minutes(Mode::LongBreak))?,
        })
    }

    fn secs(&self, mode: Mode) -> NonZeroU64 {
        match mode {
            Mode::Focus => self.focus,
            Mode::ShortBreak => self.short_break,
            Mode::LongBreak => self.long_break,
        }
    }
}

pub struct Cycle<S: SessionStore> {
    clock: Rc<dyn Clock>,
    store: S,
    lengths: Lengths,
    long_break_every: u32,
    mode: Mode,
    completed_focus: u32,
    engine: Countdown,
    /// When `start_current` was last issued for this interval.
    interval_start: Option<DateTime<Local>>,
}

impl<S: SessionStore> Cycle<S> {
    /// Build a controller in focus mode, seeding the completed count from
    /// today's records in `store`.
    pub fn new(config: &DurationConfig, store: S, clock: Rc<dyn Clock>) -> Result<Self, CycleError> {
        let lengths = Lengths::from_config(config)?;
        if config.long_break_every == 0 {
            return Err(CycleError::InvalidCycleLength);
        }

        let today = clock.local_now().date_naive();
        let completed_focus = store.count_completed_focus(today)?;
        debug!(%today, completed_focus, "seeded session count");

        let mode = Mode::Focus;
        let engine = Countdown::with_secs(lengths.secs(mode), mode.name(), Rc::clone(&clock));
        Ok(Self {
            clock,
            store,
            lengths,
            long_break_every: config.long_break_every,
            mode,
            completed_focus,
            engine,
            interval_start: None,
        })
    }

    pub fn start_current(&mut self) -> Transition {
        if self.engine.is_running() {
            return Transition::AlreadyStarted;
        }
        let transition = self.engine.start();
        self.interval_start = self.engine.started_at();
        info!(mode = self.mode.as_str(), activity = self.engine.activity(), "interval started");
        transition
    }

    pub fn pause_current(&mut self) -> Transition {
        if !self.engine.is_running() {
            return Transition::NotRunning;
        }
        self.engine.stop()
    }

    pub fn reset_current(&mut self) -> Transition {
        self.interval_start = None;
        self.engine.reset()
    }

    /// Switch to the next mode by hand.
    ///
    /// A running interval is logged as abandoned first. The switch happens
    /// even when that write fails; the error is still returned.
    pub fn toggle_mode(&mut self) -> StoreResult<Advance> {
        let from = self.mode;
        let logged = match self.interval_start {
            Some(start) if self.engine.is_running() => {
                info!(mode = from.as_str(), "interval abandoned");
                self.log_interval(start, false)
            }
            _ => Ok(()),
        };

        let to = self.next_mode(false);
        self.enter(to);
        logged.map(|()| Advance {
            from,
            to,
            natural: false,
        })
    }

    /// Apply `text` as the activity label unless it is blank.
    pub fn set_activity(&mut self, text: &str) -> bool {
        let text = text.trim();
        if text.is_empty() {
            return false;
        }
        self.engine.set_activity(text);
        true
    }

    /// Advance the countdown; on a natural finish, log the interval and move
    /// to the next mode.
    ///
    /// The mode advances even when logging fails; the error is still
    /// returned.
    pub fn tick(&mut self) -> StoreResult<Option<Advance>> {
        if self.engine.tick() != TickOutcome::Finished {
            return Ok(None);
        }

        let from = self.mode;
        info!(mode = from.as_str(), "interval finished");
        let logged = match self.interval_start {
            Some(start) => self.log_interval(start, true),
            None => Ok(()),
        };

        if from == Mode::Focus {
            self.completed_focus += 1;
        }
        let to = self.next_mode(true);
        self.enter(to);
        logged.map(|()| {
            Some(Advance {
                from,
                to,
                natural: true,
            })
        })
    }

    /// Completed focus intervals today, including this process's.
    pub fn sessions_today(&self) -> u32 {
        self.completed_focus
    }

    /// Summary of everything logged today.
    pub fn summary_today(&self) -> StoreResult<DaySummary> {
        let today = self.clock.local_now().date_naive();
        let records = self.store.records_on(today)?;
        Ok(DaySummary::from_records(&records))
    }

    pub fn mode(&self) -> Mode {
        self.mode
    }

    pub fn engine(&self) -> &Countdown {
        &self.engine
    }

    pub fn format_time(&self) -> String {
        self.engine.format_time()
    }

    pub fn is_running(&self) -> bool {
        self.engine.is_running()
    }

    pub fn activity(&self) -> &str {
        self.engine.activity()
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Focus intervals left before the next long break.
    pub fn until_long_break(&self) -> u32 {
        self.long_break_every - self.completed_focus % self.long_break_every
    }

    /// The mode after the current one. `completed_focus` must already count a
    /// naturally finished focus interval.
    fn next_mode(&self, natural: bool) -> Mode {
        match self.mode {
            Mode::Focus if natural && self.completed_focus % self.long_break_every == 0 => {
                Mode::LongBreak
            }
            Mode::Focus => Mode::ShortBreak,
            Mode::ShortBreak | Mode::LongBreak => Mode::Focus,
        }
    }

    fn enter(&mut self, mode: Mode) {
        self.mode = mode;
        self.engine = Countdown::with_secs(self.lengths.secs(mode), mode.name(), Rc::clone(&self.clock));
        self.interval_start = None;
    }

    fn log_interval(&mut self, start: DateTime<Local>, completed: bool) -> StoreResult<()> {
        let record = SessionRecord::new(
            self.engine.activity(),
            self.mode,
            self.engine.total_secs() / 60,
            start,
            self.clock.local_now(),
            completed,
        );
        self.store.append(&record).inspect_err(|e| {
            tracing::error!(error = %e, "failed to log interval");
        })
    }
}
