//! Status aggregation configuration.
//!
//! Selects where the aggregate status is published and how the winning
//! component's name is rendered into its message.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::StatusError;

/// Configuration for a [`StatusGroup`](crate::StatusGroup).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusConfig {
    /// Scope the aggregate status is published to.
    #[serde(default)]
    pub scope: StatusScope,

    /// How the component name is prefixed onto the reported message.
    #[serde(default)]
    pub prefix_style: PrefixStyle,
}

impl StatusConfig {
    /// Config publishing to the given scope with default prefixing.
    pub fn for_scope(scope: StatusScope) -> Self {
        Self {
            scope,
            ..Self::default()
        }
    }
}

/// Where an aggregate status is published.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StatusScope {
    /// This unit's own status (any unit may set it).
    #[default]
    Unit,
    /// The application status (only the leader unit may set it).
    Application,
}

impl fmt::Display for StatusScope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StatusScope::Unit => write!(f, "unit"),
            StatusScope::Application => write!(f, "application"),
        }
    }
}

impl FromStr for StatusScope {
    type Err = StatusError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "unit" => Ok(StatusScope::Unit),
            "application" | "app" => Ok(StatusScope::Application),
            other => Err(StatusError::InvalidConfig(format!(
                "unknown status scope {other:?}"
            ))),
        }
    }
}

/// Punctuation around the component name in a prefixed message.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PrefixStyle {
    /// `[component] message`
    #[default]
    Bracket,
    /// `(component) message`
    Parenthesis,
}

impl PrefixStyle {
    /// Prefix `message` with `component` in this style.
    pub fn apply(self, component: &str, message: &str) -> String {
        match self {
            PrefixStyle::Bracket => format!("[{component}] {message}"),
            PrefixStyle::Parenthesis => format!("({component}) {message}"),
        }
    }
}

impl fmt::Display for PrefixStyle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PrefixStyle::Bracket => write!(f, "bracket"),
            PrefixStyle::Parenthesis => write!(f, "parenthesis"),
        }
    }
}

impl FromStr for PrefixStyle {
    type Err = StatusError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "bracket" => Ok(PrefixStyle::Bracket),
            "parenthesis" | "paren" => Ok(PrefixStyle::Parenthesis),
            other => Err(StatusError::InvalidConfig(format!(
                "unknown prefix style {other:?}"
            ))),
        }
    }
}
