//! HistoryEntry - a recorded level transition.

use alloc::string::String;
use core::fmt;

use crate::{Level, StatusSnapshot};

/// A transition from one level to another, as shown in the history list.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct HistoryEntry {
    /// The level the endpoint moved to.
    pub level: Level,
    /// Description reported with the status.
    pub description: String,
    /// When the transition was observed, in milliseconds since Unix epoch.
    pub observed_at_ms: u64,
}

impl HistoryEntry {
    /// Create an entry from its parts.
    pub fn new(level: Level, description: impl Into<String>, observed_at_ms: u64) -> Self {
        Self {
            level,
            description: description.into(),
            observed_at_ms,
        }
    }

    /// Create an entry for a snapshot that has already been classified.
    pub fn from_snapshot(level: Level, snapshot: &StatusSnapshot) -> Self {
        Self::new(level, snapshot.description(), snapshot.observed_at_ms())
    }

    /// UTC wall-clock time of the transition.
    pub fn time_of_day(&self) -> TimeOfDay {
        TimeOfDay::from_unix_ms(self.observed_at_ms)
    }
}

/// Renders as `HH:MM:SS - LEVEL: description`, the time in UTC.
impl fmt::Display for HistoryEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} - {}: {}",
            self.time_of_day(),
            self.level,
            self.description
        )
    }
}

/// Hours, minutes and seconds within a UTC day.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct TimeOfDay {
    pub hours: u8,
    pub minutes: u8,
    pub seconds: u8,
}

impl TimeOfDay {
    /// Time of day for a Unix timestamp in milliseconds.
    pub fn from_unix_ms(ms: u64) -> Self {
        let secs = (ms / 1000) % 86_400;
        Self {
            hours: (secs / 3600) as u8,
            minutes: (secs / 60 % 60) as u8,
            seconds: (secs % 60) as u8,
        }
    }
}

impl fmt::Display for TimeOfDay {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02}:{:02}:{:02}", self.hours, self.minutes, self.seconds)
    }
}
