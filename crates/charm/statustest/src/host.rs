//! Minimal event host.
//!
//! Observers are kept as an ordered list of `(event kind, handler)` pairs.
//! Emitting an event runs the matching handlers synchronously, one at a
//! time, in the order they were registered.

use std::fmt;
use std::str::FromStr;

use tracing::{debug, instrument};

use crate::config::CharmConfig;
use crate::error::{CharmError, CharmResult};

/// Events the host can deliver to a charm.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventKind {
    Install,
    Start,
    ConfigChanged,
    UpdateStatus,
    /// End of a dispatch, after every other handler ran.
    Commit,
}

impl EventKind {
    pub fn as_str(self) -> &'static str {
        match self {
            EventKind::Install => "install",
            EventKind::Start => "start",
            EventKind::ConfigChanged => "config-changed",
            EventKind::UpdateStatus => "update-status",
            EventKind::Commit => "commit",
        }
    }
}

impl fmt::Display for EventKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for EventKind {
    type Err = CharmError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        [
            EventKind::Install,
            EventKind::Start,
            EventKind::ConfigChanged,
            EventKind::UpdateStatus,
            EventKind::Commit,
        ]
        .into_iter()
        .find(|kind| kind.as_str() == s)
        .ok_or_else(|| CharmError::Config(format!("unknown event {s:?}")))
    }
}

/// An event being delivered, with the config snapshot it was raised under.
#[derive(Debug, Clone, Copy)]
pub struct Event<'a> {
    pub kind: EventKind,
    pub config: &'a CharmConfig,
}

type Handler<C> = Box<dyn Fn(&mut C, &Event<'_>) -> CharmResult<()>>;

/// Ordered observer registry for a charm of type `C`.
pub struct Framework<C> {
    observers: Vec<(EventKind, Handler<C>)>,
}

impl<C> Framework<C> {
    pub fn new() -> Self {
        Self {
            observers: Vec::new(),
        }
    }

    /// Run `handler` whenever `kind` is emitted.
    pub fn observe<F>(&mut self, kind: EventKind, handler: F)
    where
        F: Fn(&mut C, &Event<'_>) -> CharmResult<()> + 'static,
    {
        debug!(event = %kind, ordinal = self.observers.len(), "Observing event");
        self.observers.push((kind, Box::new(handler)));
    }

    /// Number of handlers registered for `kind`.
    pub fn observer_count(&self, kind: EventKind) -> usize {
        self.observers.iter().filter(|(k, _)| *k == kind).count()
    }

    /// Deliver `kind` to every matching handler in registration order.
    ///
    /// The first failing handler stops delivery of this event.
    #[instrument(skip(self, charm, config))]
    pub fn emit(&self, charm: &mut C, kind: EventKind, config: &CharmConfig) -> CharmResult<()> {
        let event = Event { kind, config };
        for (_, handler) in self.observers.iter().filter(|(k, _)| *k == kind) {
            handler(charm, &event).map_err(|e| CharmError::Handler {
                event: kind,
                source: Box::new(e),
            })?;
        }
        Ok(())
    }

    /// Deliver `kind` followed by [`EventKind::Commit`].
    pub fn dispatch(&self, charm: &mut C, kind: EventKind, config: &CharmConfig) -> CharmResult<()> {
        self.emit(charm, kind, config)?;
        self.emit(charm, EventKind::Commit, config)
    }
}

impl<C> Default for Framework<C> {
    fn default() -> Self {
        Self::new()
    }
}

impl<C> fmt::Debug for Framework<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Framework")
            .field(
                "observers",
                &self.observers.iter().map(|(k, _)| k).collect::<Vec<_>>(),
            )
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Default)]
    struct Recorder {
        calls: Vec<String>,
    }

    #[test]
    fn test_emit_runs_matching_handlers_in_order() {
        let mut framework = Framework::<Recorder>::new();
        framework.observe(EventKind::ConfigChanged, |r, _| {
            r.calls.push("first".into());
            Ok(())
        });
        framework.observe(EventKind::Start, |r, _| {
            r.calls.push("start".into());
            Ok(())
        });
        framework.observe(EventKind::ConfigChanged, |r, e| {
            r.calls.push(format!("second:{}", e.kind));
            Ok(())
        });

        let mut recorder = Recorder::default();
        framework
            .emit(&mut recorder, EventKind::ConfigChanged, &CharmConfig::new())
            .unwrap();

        assert_eq!(recorder.calls, ["first", "second:config-changed"]);
        assert_eq!(framework.observer_count(EventKind::ConfigChanged), 2);
        assert_eq!(framework.observer_count(EventKind::Install), 0);
    }

    #[test]
    fn test_handler_error_stops_delivery() {
        let mut framework = Framework::<Recorder>::new();
        framework.observe(EventKind::Install, |_, _| {
            Err(CharmError::Config("bad".into()))
        });
        framework.observe(EventKind::Install, |r, _| {
            r.calls.push("unreachable".into());
            Ok(())
        });

        let mut recorder = Recorder::default();
        let err = framework
            .emit(&mut recorder, EventKind::Install, &CharmConfig::new())
            .unwrap_err();

        assert!(matches!(err, CharmError::Handler { event: EventKind::Install, .. }));
        assert!(recorder.calls.is_empty());
    }

    #[test]
    fn test_dispatch_ends_with_commit() {
        let mut framework = Framework::<Recorder>::new();
        framework.observe(EventKind::Commit, |r, _| {
            r.calls.push("commit".into());
            Ok(())
        });
        framework.observe(EventKind::UpdateStatus, |r, _| {
            r.calls.push("update".into());
            Ok(())
        });

        let mut recorder = Recorder::default();
        framework
            .dispatch(&mut recorder, EventKind::UpdateStatus, &CharmConfig::new())
            .unwrap();
        assert_eq!(recorder.calls, ["update", "commit"]);
    }

    #[test]
    fn test_event_kind_tokens() {
        assert_eq!("config-changed".parse::<EventKind>().unwrap(), EventKind::ConfigChanged);
        assert_eq!(EventKind::UpdateStatus.to_string(), "update-status");
        assert!("relation-joined".parse::<EventKind>().is_err());
    }
}
