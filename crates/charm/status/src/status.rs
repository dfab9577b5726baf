//! Status values.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::StatusResult;
use crate::severity::Severity;

/// A severity plus an optional message.
///
/// Statuses are immutable; a component's status is replaced, never edited.
/// A missing message is the empty string.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Status {
    #[serde(rename = "status")]
    severity: Severity,

    #[serde(default)]
    message: String,
}

impl Status {
    /// Create a status with the given severity and message.
    pub fn new(severity: Severity, message: impl Into<String>) -> Self {
        Self {
            severity,
            message: message.into(),
        }
    }

    /// Create a status from a host severity token such as `"blocked"`.
    pub fn from_name(name: &str, message: impl Into<String>) -> StatusResult<Self> {
        Ok(Self::new(name.parse()?, message))
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self::new(Severity::Error, message)
    }

    pub fn blocked(message: impl Into<String>) -> Self {
        Self::new(Severity::Blocked, message)
    }

    pub fn waiting(message: impl Into<String>) -> Self {
        Self::new(Severity::Waiting, message)
    }

    pub fn maintenance(message: impl Into<String>) -> Self {
        Self::new(Severity::Maintenance, message)
    }

    pub fn active(message: impl Into<String>) -> Self {
        Self::new(Severity::Active, message)
    }

    pub fn unknown() -> Self {
        Self::new(Severity::Unknown, "")
    }

    pub fn severity(&self) -> Severity {
        self.severity
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    /// Active with no message: nothing to report.
    pub fn is_clean_active(&self) -> bool {
        self.severity == Severity::Active && self.message.is_empty()
    }
}

impl Default for Status {
    fn default() -> Self {
        Self::unknown()
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.message.is_empty() {
            write!(f, "{}", self.severity)
        } else {
            write!(f, "{}: {}", self.severity, self.message)
        }
    }
}
