use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};

/// The priority of a feature or release.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    /// Must ship; blocks the release it is planned for.
    High,
    /// Planned work without a hard commitment.
    #[default]
    Medium,
    /// Nice to have; picked up when capacity allows.
    Low,
}

impl Priority {
    /// Returns the lowercase string form used in collection files.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::High => "high",
            Self::Medium => "medium",
            Self::Low => "low",
        }
    }
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when parsing an unrecognised priority string.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unrecognised priority '{0}' (expected high, medium, or low)")]
pub struct ParsePriorityError(String);

impl FromStr for Priority {
    type Err = ParsePriorityError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        // "med" is accepted as a shorthand seen in hand-edited files.
        match s.to_lowercase().as_str() {
            "high" => Ok(Self::High),
            "medium" | "med" => Ok(Self::Medium),
            "low" => Ok(Self::Low),
            other => Err(ParsePriorityError(other.to_string())),
        }
    }
}
