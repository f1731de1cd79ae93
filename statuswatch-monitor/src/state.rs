//! Change detection: the monitor's state machine without any I/O.

use tracing::{debug, warn};

use statuswatch_types::{HistoryEntry, Level, StatusSnapshot, UnknownStatusPolicy};

use crate::history::HistoryLog;

/// Where the monitor is in its lifecycle.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Phase {
    /// No successful poll yet.
    #[default]
    Uninitialized,
    /// The last recorded level.
    Observed(Level),
}

/// Current level plus the history of transitions.
///
/// Feed it every successful poll with [`MonitorState::observe`]; it records a
/// history entry only when the classified level differs from the last one.
#[derive(Debug, Clone, Default)]
pub struct MonitorState {
    phase: Phase,
    history: HistoryLog,
    policy: UnknownStatusPolicy,
}

impl MonitorState {
    pub fn new(policy: UnknownStatusPolicy) -> Self {
        Self {
            phase: Phase::Uninitialized,
            history: HistoryLog::new(),
            policy,
        }
    }

    /// Apply one successful poll.
    ///
    /// Returns the new history entry if the level changed. The first
    /// observation always counts as a change.
    pub fn observe(&mut self, snapshot: &StatusSnapshot) -> Option<HistoryEntry> {
        let level = Level::classify(snapshot.status(), self.policy);
        if Level::parse(snapshot.status()).is_none() {
            warn!(
                status = snapshot.status(),
                classified_as = %level,
                "unrecognized status"
            );
        }

        if let Phase::Observed(current) = &self.phase {
            if *current == level {
                debug!(%level, "status unchanged");
                return None;
            }
        }

        let entry = HistoryEntry::from_snapshot(level.clone(), snapshot);
        self.history.append(entry.clone());
        self.phase = Phase::Observed(level);
        Some(entry)
    }

    pub fn phase(&self) -> &Phase {
        &self.phase
    }

    /// The last recorded level, or `None` before the first successful poll.
    pub fn current_level(&self) -> Option<&Level> {
        match &self.phase {
            Phase::Uninitialized => None,
            Phase::Observed(level) => Some(level),
        }
    }

    pub fn history(&self) -> &HistoryLog {
        &self.history
    }

    pub fn policy(&self) -> UnknownStatusPolicy {
        self.policy
    }
}
