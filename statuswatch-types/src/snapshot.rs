//! StatusSnapshot - one observation of the remote endpoint.

use alloc::string::String;

/// A single observation of the monitored endpoint.
///
/// The status text is normalized (trimmed and lower-cased) on construction
/// but not classified; classification into a [`Level`](crate::Level) is up to
/// the consumer so that unrecognized values never fail here.
///
/// Snapshots are immutable once built.
///
/// # Example
///
/// ```rust
/// use statuswatch_types::StatusSnapshot;
///
/// let snapshot = StatusSnapshot::with_timestamp("Inspect", "queue is backing up", 42);
/// assert_eq!(snapshot.status(), "inspect");
/// assert_eq!(snapshot.description(), "queue is backing up");
/// assert_eq!(snapshot.observed_at_ms(), 42);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(from = "SnapshotFields"))]
pub struct StatusSnapshot {
    status: String,
    description: String,
    observed_at_ms: u64,
}

/// Wire shape of a snapshot; converted through [`StatusSnapshot::with_timestamp`]
/// so deserialized status text is normalized too.
#[cfg(feature = "serde")]
#[derive(serde::Deserialize)]
struct SnapshotFields {
    status: String,
    description: String,
    observed_at_ms: u64,
}

#[cfg(feature = "serde")]
impl From<SnapshotFields> for StatusSnapshot {
    fn from(fields: SnapshotFields) -> Self {
        Self::with_timestamp(&fields.status, fields.description, fields.observed_at_ms)
    }
}

impl StatusSnapshot {
    /// Create a snapshot observed now.
    #[cfg(feature = "std")]
    pub fn new(status: &str, description: impl Into<String>) -> Self {
        Self::with_timestamp(status, description, current_timestamp_ms())
    }

    /// Create a snapshot with a specific observation time (milliseconds since Unix epoch).
    pub fn with_timestamp(status: &str, description: impl Into<String>, observed_at_ms: u64) -> Self {
        Self {
            status: normalize_status(status),
            description: description.into(),
            observed_at_ms,
        }
    }

    /// The normalized status text.
    pub fn status(&self) -> &str {
        &self.status
    }

    /// The human-readable description reported alongside the status.
    pub fn description(&self) -> &str {
        &self.description
    }

    /// When the snapshot was taken, in milliseconds since Unix epoch.
    pub fn observed_at_ms(&self) -> u64 {
        self.observed_at_ms
    }
}

/// Trim surrounding whitespace and lower-case the status text.
pub fn normalize_status(raw: &str) -> String {
    raw.trim().to_lowercase()
}

/// Get current timestamp in milliseconds since Unix epoch.
#[cfg(feature = "std")]
pub fn current_timestamp_ms() -> u64 {
    use std::time::{SystemTime, UNIX_EPOCH};
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalizes_case_and_whitespace() {
        let snapshot = StatusSnapshot::with_timestamp("  WaRnInG\n", "boom", 1);
        assert_eq!(snapshot.status(), "warning");
    }

    #[test]
    fn keeps_unknown_text_verbatim_after_normalizing() {
        let snapshot = StatusSnapshot::with_timestamp("Unknown-Status", "?", 1);
        assert_eq!(snapshot.status(), "unknown-status");
    }

    #[test]
    fn description_is_not_normalized() {
        let snapshot = StatusSnapshot::with_timestamp("ok", "  All Systems Go ", 1);
        assert_eq!(snapshot.description(), "  All Systems Go ");
    }

    #[cfg(feature = "serde")]
    #[test]
    fn deserialize_normalizes_status() {
        let snapshot: StatusSnapshot = serde_json::from_str(
            r#"{"status": " WARNING ", "description": "disk", "observed_at_ms": 5}"#,
        )
        .unwrap();

        assert_eq!(snapshot, StatusSnapshot::with_timestamp("warning", "disk", 5));
    }

    #[cfg(feature = "std")]
    #[test]
    fn new_uses_wall_clock() {
        let before = current_timestamp_ms();
        let snapshot = StatusSnapshot::new("ok", "fine");
        let after = current_timestamp_ms();

        assert!(snapshot.observed_at_ms() >= before);
        assert!(snapshot.observed_at_ms() <= after);
    }
}
