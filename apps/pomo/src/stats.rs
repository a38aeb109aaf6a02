//! Daily summary of logged intervals.

use crate::models::{Mode, SessionRecord};

/// Aggregated statistics for one day of records.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DaySummary {
    /// Focus intervals that ran to zero
    pub completed_focus: u32,
    /// Focus intervals switched away from while running
    pub abandoned_focus: u32,
    /// Planned minutes of completed focus intervals
    pub focus_minutes: u64,
    /// Breaks taken, completed or not
    pub breaks: u32,
}

impl DaySummary {
    pub fn from_records(records: &[SessionRecord]) -> Self {
        records.iter().fold(Self::default(), |mut summary, record| {
            match (record.session_type, record.completed) {
                (Mode::Focus, true) => {
                    summary.completed_focus += 1;
                    summary.focus_minutes += record.duration_minutes;
                }
                (Mode::Focus, false) => summary.abandoned_focus += 1,
                (Mode::ShortBreak | Mode::LongBreak, _) => summary.breaks += 1,
            }
            summary
        })
    }

    /// Completed share of focus intervals, as a percentage.
    pub fn completion_rate(&self) -> u32 {
        let total = self.completed_focus + self.abandoned_focus;
        if total == 0 {
            return 0;
        }
        self.completed_focus * 100 / total
    }

    /// Focus time as hours and minutes.
    pub fn focus_time(&self) -> (u64, u64) {
        (self.focus_minutes / 60, self.focus_minutes % 60)
    }
}
