//! Interval modes and the session records written for them.

use chrono::{DateTime, Local, NaiveDate, NaiveTime, Timelike};
use serde::{Deserialize, Serialize};

/// Which kind of interval is counting down.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Mode {
    Focus,
    ShortBreak,
    LongBreak,
}

impl Mode {
    /// Display name, also used as the default activity label.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Focus => "Pomodoro",
            Self::ShortBreak => "Short Break",
            Self::LongBreak => "Long Break",
        }
    }

    /// Tag written to the session log.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Focus => "focus",
            Self::ShortBreak => "short_break",
            Self::LongBreak => "long_break",
        }
    }

    pub fn is_break(&self) -> bool {
        matches!(self, Self::ShortBreak | Self::LongBreak)
    }
}

/// One concluded interval, completed or abandoned.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionRecord {
    pub date: NaiveDate,
    pub activity: String,
    pub session_type: Mode,
    pub duration_minutes: u64,
    #[serde(with = "hms")]
    pub start_time: NaiveTime,
    #[serde(with = "hms")]
    pub end_time: NaiveTime,
    #[serde(with = "yes_no")]
    pub completed: bool,
}

impl SessionRecord {
    pub fn new(
        activity: impl Into<String>,
        session_type: Mode,
        duration_minutes: u64,
        start: DateTime<Local>,
        end: DateTime<Local>,
        completed: bool,
    ) -> Self {
        Self {
            date: start.date_naive(),
            activity: activity.into(),
            session_type,
            duration_minutes,
            start_time: whole_seconds(start.time()),
            end_time: whole_seconds(end.time()),
            completed,
        }
    }

    pub fn is_completed_focus(&self) -> bool {
        self.session_type == Mode::Focus && self.completed
    }
}

fn whole_seconds(time: NaiveTime) -> NaiveTime {
    time.with_nanosecond(0).unwrap_or(time)
}

/// `HH:MM:SS`, dropping sub-second precision.
mod hms {
    use chrono::NaiveTime;
    use serde::{Deserialize, Deserializer, Serializer};

    const FORMAT: &str = "%H:%M:%S";

    pub fn serialize<S: Serializer>(time: &NaiveTime, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(&time.format(FORMAT))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<NaiveTime, D::Error> {
        let raw = String::deserialize(deserializer)?;
        NaiveTime::parse_from_str(raw.trim(), FORMAT).map_err(serde::de::Error::custom)
    }
}

/// Human-readable `Yes`/`No` flag.
mod yes_no {
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(flag: &bool, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(if *flag { "Yes" } else { "No" })
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<bool, D::Error> {
        let raw = String::deserialize(deserializer)?;
        match raw.trim().to_ascii_lowercase().as_str() {
            "yes" | "true" => Ok(true),
            "no" | "false" => Ok(false),
            other => Err(serde::de::Error::custom(format!(
                "expected Yes or No, got {other:?}"
            ))),
        }
    }
}
