//! Status sinks.
//!
//! A sink receives the aggregate status whenever a component status is set.
//! Callers bind it to the unit or application status of their host.

use std::sync::{Arc, Mutex, PoisonError};

use crate::config::StatusScope;
use crate::status::Status;

/// Receives published aggregate statuses.
pub trait StatusSink: Send {
    fn publish(&mut self, scope: StatusScope, status: &Status);
}

impl<F> StatusSink for F
where
    F: FnMut(StatusScope, &Status) + Send,
{
    fn publish(&mut self, scope: StatusScope, status: &Status) {
        self(scope, status)
    }
}

/// Sink that discards everything.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopSink;

impl StatusSink for NoopSink {
    fn publish(&mut self, _scope: StatusScope, _status: &Status) {}
}

/// Sink that keeps every published status.
///
/// Clones share the same record, so an owner can hand one clone to a
/// [`StatusGroup`](crate::StatusGroup) and read back through another.
#[derive(Debug, Clone, Default)]
pub struct RecordingSink {
    published: Arc<Mutex<Vec<(StatusScope, Status)>>>,
}

impl RecordingSink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Every `(scope, status)` published so far, oldest first.
    pub fn published(&self) -> Vec<(StatusScope, Status)> {
        self.published
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// The most recently published status for `scope`.
    pub fn current(&self, scope: StatusScope) -> Option<Status> {
        self.published
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .iter()
            .rev()
            .find(|(s, _)| *s == scope)
            .map(|(_, status)| status.clone())
    }
}

impl StatusSink for RecordingSink {
    fn publish(&mut self, scope: StatusScope, status: &Status) {
        self.published
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push((scope, status.clone()));
    }
}
