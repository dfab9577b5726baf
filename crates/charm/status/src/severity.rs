//! Status severity levels.
//!
//! Severities follow the host runtime's status vocabulary and are ranked
//! from most to least urgent.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::StatusError;

/// Severity of a status, most urgent first.
///
/// The derived ordering follows urgency: `Error < Blocked < ... < Unknown`,
/// so the minimum of a set of severities is the one to report.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    /// Something failed and needs operator attention.
    Error,
    /// Cannot progress without operator action (missing config, relation).
    Blocked,
    /// Waiting on another application or resource.
    Waiting,
    /// Performing work that should finish on its own.
    Maintenance,
    /// Ready and serving.
    Active,
    /// Status not yet determined.
    Unknown,
}

impl Severity {
    /// Every severity in rank order.
    pub const ALL: [Severity; 6] = [
        Severity::Error,
        Severity::Blocked,
        Severity::Waiting,
        Severity::Maintenance,
        Severity::Active,
        Severity::Unknown,
    ];

    /// Numeric rank; lower is more urgent.
    pub fn rank(self) -> u8 {
        match self {
            Severity::Error => 0,
            Severity::Blocked => 1,
            Severity::Waiting => 2,
            Severity::Maintenance => 3,
            Severity::Active => 4,
            Severity::Unknown => 5,
        }
    }

    /// Lowercase token used by the host runtime.
    pub fn as_str(self) -> &'static str {
        match self {
            Severity::Error => "error",
            Severity::Blocked => "blocked",
            Severity::Waiting => "waiting",
            Severity::Maintenance => "maintenance",
            Severity::Active => "active",
            Severity::Unknown => "unknown",
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Severity {
    type Err = StatusError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Severity::ALL
            .into_iter()
            .find(|severity| severity.as_str() == s)
            .ok_or_else(|| StatusError::UnknownSeverity(s.to_string()))
    }
}
