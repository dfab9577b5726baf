//! Status prioritization.
//!
//! A [`Prioritizer`] tracks named status getters and reports the most urgent
//! status among them. The ranking and prefixing rules here are shared with
//! [`StatusGroup`](crate::StatusGroup).

use std::convert::Infallible;
use std::fmt;

use tracing::{debug, error};

use crate::config::PrefixStyle;
use crate::error::{StatusError, StatusResult};
use crate::status::Status;

/// Something that can report a component's current status.
///
/// Evaluation may fail; the prioritizer turns a failure into an `error`
/// status for that component instead of failing the whole aggregation.
pub trait StatusSource {
    fn current_status(&self) -> Result<Status, String>;
}

impl<F, E> StatusSource for F
where
    F: Fn() -> Result<Status, E>,
    E: fmt::Display,
{
    fn current_status(&self) -> Result<Status, String> {
        self().map_err(|e| e.to_string())
    }
}

/// Sort `(component, status)` pairs most urgent first.
///
/// The sort is stable, so components with equal severity keep their
/// registration order.
pub(crate) fn rank(mut statuses: Vec<(String, Status)>) -> Vec<(String, Status)> {
    statuses.sort_by_key(|(_, status)| status.severity().rank());
    statuses
}

/// The winner of an already-ranked list, or the healthy default when empty.
pub(crate) fn first_or_active(ranked: Vec<(String, Status)>) -> (String, Status) {
    ranked
        .into_iter()
        .next()
        .unwrap_or_else(|| (String::new(), Status::active("")))
}

/// Render the winning status with its component name in the message.
///
/// A clean `active` status is returned unchanged.
pub(crate) fn prefix(component: &str, status: &Status, style: PrefixStyle) -> Status {
    if status.is_clean_active() {
        return Status::active("");
    }
    Status::new(status.severity(), style.apply(component, status.message()))
}

pub(crate) fn validate_name(name: &str) -> StatusResult<()> {
    if name.is_empty() {
        return Err(StatusError::InvalidComponentName);
    }
    Ok(())
}

struct Entry {
    name: String,
    source: Box<dyn StatusSource + Send>,
}

/// Tracks the highest-priority status among several components.
///
/// Components added first win ties between equal severities.
pub struct Prioritizer {
    components: Vec<Entry>,
    prefix_style: PrefixStyle,
}

impl Prioritizer {
    /// Create an empty prioritizer using bracket prefixes.
    pub fn new() -> Self {
        Self::with_prefix_style(PrefixStyle::default())
    }

    pub fn with_prefix_style(prefix_style: PrefixStyle) -> Self {
        Self {
            components: Vec::new(),
            prefix_style,
        }
    }

    /// Add a named status source.
    pub fn add(
        &mut self,
        name: impl Into<String>,
        source: impl StatusSource + Send + 'static,
    ) -> StatusResult<()> {
        let name = name.into();
        validate_name(&name)?;
        if self.contains(&name) {
            return Err(StatusError::DuplicateComponent(name));
        }

        debug!(component = %name, "Adding status component");
        self.components.push(Entry {
            name,
            source: Box::new(source),
        });
        Ok(())
    }

    /// Add a named getter that cannot fail.
    pub fn add_fn<F>(&mut self, name: impl Into<String>, get_status: F) -> StatusResult<()>
    where
        F: Fn() -> Status + Send + 'static,
    {
        self.add(name, move || Ok::<_, Infallible>(get_status()))
    }

    pub fn contains(&self, name: &str) -> bool {
        self.components.iter().any(|entry| entry.name == name)
    }

    pub fn len(&self) -> usize {
        self.components.len()
    }

    pub fn is_empty(&self) -> bool {
        self.components.is_empty()
    }

    /// Evaluate every component, most urgent first.
    ///
    /// Equal severities keep registration order. A component whose getter
    /// fails is reported with an `error` status carrying the failure.
    pub fn all(&self) -> Vec<(String, Status)> {
        let statuses = self
            .components
            .iter()
            .map(|entry| (entry.name.clone(), evaluate(entry)))
            .collect();
        rank(statuses)
    }

    /// The most urgent `(component, status)`.
    ///
    /// Returns an empty name and a clean `active` status when nothing is
    /// registered.
    pub fn highest(&self) -> (String, Status) {
        first_or_active(self.all())
    }

    /// The most urgent status with its message prefixed by the component name.
    pub fn highest_prefixed(&self) -> Status {
        let (component, status) = self.highest();
        prefix(&component, &status, self.prefix_style)
    }
}

impl Default for Prioritizer {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for Prioritizer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Prioritizer")
            .field(
                "components",
                &self.components.iter().map(|e| &e.name).collect::<Vec<_>>(),
            )
            .field("prefix_style", &self.prefix_style)
            .finish()
    }
}

fn evaluate(entry: &Entry) -> Status {
    match entry.source.current_status() {
        Ok(status) => status,
        Err(reason) => {
            let err = StatusError::ComponentEvaluation {
                component: entry.name.clone(),
                reason: reason.clone(),
            };
            error!(component = %entry.name, error = %err, "Status evaluation failed");
            Status::error(reason)
        }
    }
}
