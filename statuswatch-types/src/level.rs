//! Status levels and the policy for classifying unrecognized status text.

use alloc::string::{String, ToString};
use core::fmt::{self, Write};

/// The classified state of the monitored endpoint.
///
/// The endpoint reports free-form text; [`Level::classify`] maps it onto the
/// three recognized levels. Text outside that set becomes either [`Level::Ok`]
/// or [`Level::Unknown`] depending on the [`UnknownStatusPolicy`].
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub enum Level {
    /// Everything is fine.
    #[default]
    Ok,
    /// Something should be looked at.
    Inspect,
    /// Something is wrong.
    Warning,
    /// Status text that is not one of the recognized values.
    ///
    /// Only produced under [`UnknownStatusPolicy::Distinct`]. Holds the
    /// normalized text so that different unknown values compare unequal.
    Unknown(String),
}

impl Level {
    /// Classify normalized (trimmed, lower-cased) status text.
    ///
    /// # Example
    ///
    /// ```rust
    /// use statuswatch_types::{Level, UnknownStatusPolicy};
    ///
    /// assert_eq!(Level::classify("inspect", UnknownStatusPolicy::TreatAsOk), Level::Inspect);
    /// assert_eq!(Level::classify("degraded", UnknownStatusPolicy::TreatAsOk), Level::Ok);
    /// assert_eq!(
    ///     Level::classify("degraded", UnknownStatusPolicy::Distinct),
    ///     Level::Unknown("degraded".to_string())
    /// );
    /// ```
    pub fn classify(status: &str, policy: UnknownStatusPolicy) -> Self {
        Self::parse(status).unwrap_or_else(|| match policy {
            UnknownStatusPolicy::TreatAsOk => Level::Ok,
            UnknownStatusPolicy::Distinct => Level::Unknown(status.to_string()),
        })
    }

    /// Parse one of the recognized status strings; `None` for anything else.
    pub fn parse(status: &str) -> Option<Self> {
        match status {
            "ok" => Some(Level::Ok),
            "inspect" => Some(Level::Inspect),
            "warning" => Some(Level::Warning),
            _ => None,
        }
    }

    /// The lower-case wire form of this level.
    pub fn as_str(&self) -> &str {
        match self {
            Level::Ok => "ok",
            Level::Inspect => "inspect",
            Level::Warning => "warning",
            Level::Unknown(raw) => raw,
        }
    }

    /// Short text for display next to the current level.
    pub fn label(&self) -> &'static str {
        match self {
            Level::Ok => "OK",
            Level::Inspect => "Inspect",
            Level::Warning => "Warning!",
            Level::Unknown(_) => "Unknown",
        }
    }

    /// Returns false for [`Level::Unknown`].
    pub fn is_recognized(&self) -> bool {
        !matches!(self, Level::Unknown(_))
    }
}

/// Upper-case form, as used in notification titles and history lines.
impl fmt::Display for Level {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Level::Ok => f.write_str("OK"),
            Level::Inspect => f.write_str("INSPECT"),
            Level::Warning => f.write_str("WARNING"),
            Level::Unknown(raw) => raw
                .chars()
                .flat_map(char::to_uppercase)
                .try_for_each(|c| f.write_char(c)),
        }
    }
}

#[cfg(feature = "serde")]
impl serde::Serialize for Level {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

#[cfg(feature = "serde")]
impl<'de> serde::Deserialize<'de> for Level {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        Ok(Level::classify(&raw, UnknownStatusPolicy::Distinct))
    }
}

/// How status text outside the recognized set is classified.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum UnknownStatusPolicy {
    /// Unrecognized text is treated as [`Level::Ok`].
    #[default]
    TreatAsOk,
    /// Unrecognized text becomes [`Level::Unknown`] and counts as its own level.
    Distinct,
}
