//! Status groups.
//!
//! A [`StatusGroup`] owns the statuses of several named components. Setting
//! any component's status recomputes the most urgent status across the
//! group, publishes it to the group's sink, and saves every component's
//! status to the group's store.

use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};

use tracing::{debug, info, instrument, warn};

use crate::config::StatusConfig;
use crate::error::{StatusError, StatusResult};
use crate::prioritizer::{first_or_active, prefix, rank, validate_name};
use crate::sink::StatusSink;
use crate::status::Status;
use crate::store::{StatusMap, StatusStore};

static NEXT_GROUP_ID: AtomicU64 = AtomicU64::new(0);

/// Handle to a component registered in a [`StatusGroup`].
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ComponentHandle {
    group_id: u64,
    index: usize,
    name: String,
}

impl ComponentHandle {
    pub fn name(&self) -> &str {
        &self.name
    }
}

#[derive(Debug, Clone)]
struct Component {
    name: String,
    status: Status,
}

/// A group of components, each of which has a status.
///
/// Components are kept in registration order, which breaks ties between
/// equal severities.
pub struct StatusGroup {
    id: u64,
    config: StatusConfig,
    sink: Box<dyn StatusSink>,
    store: Box<dyn StatusStore>,
    components: Vec<Component>,
    loaded: StatusMap,
}

impl StatusGroup {
    /// Create a group publishing to `sink` and persisting to `store`.
    ///
    /// Saved statuses are loaded now and applied to components as they
    /// register. A store that fails to load is treated as empty.
    pub fn new(
        sink: impl StatusSink + 'static,
        store: impl StatusStore + 'static,
        config: StatusConfig,
    ) -> Self {
        let loaded = match store.load() {
            Ok(loaded) => loaded,
            Err(e) => {
                warn!(error = %e, "Failed to load saved statuses, starting empty");
                StatusMap::new()
            }
        };
        debug!(scope = %config.scope, loaded = loaded.len(), "Created status group");

        Self {
            id: NEXT_GROUP_ID.fetch_add(1, Ordering::Relaxed),
            config,
            sink: Box::new(sink),
            store: Box::new(store),
            components: Vec::new(),
            loaded,
        }
    }

    pub fn config(&self) -> &StatusConfig {
        &self.config
    }

    /// Register a component with an `unknown` initial status.
    pub fn register(&mut self, name: impl Into<String>) -> StatusResult<ComponentHandle> {
        self.register_with_status(name, Status::unknown())
    }

    /// Register a component with an initial status.
    ///
    /// A status saved under the same name takes precedence over `initial`.
    #[instrument(skip(self, name, initial), fields(component = tracing::field::Empty))]
    pub fn register_with_status(
        &mut self,
        name: impl Into<String>,
        initial: Status,
    ) -> StatusResult<ComponentHandle> {
        let name = name.into();
        tracing::Span::current().record("component", name.as_str());

        validate_name(&name)?;
        if self.index_of(&name).is_some() {
            return Err(StatusError::DuplicateComponent(name));
        }

        let status = match self.loaded.get(&name) {
            Some(saved) => {
                debug!(status = %saved, "Restoring saved status");
                saved.clone()
            }
            None => initial,
        };

        let index = self.components.len();
        self.components.push(Component {
            name: name.clone(),
            status,
        });
        info!(ordinal = index, "Registered status component");

        Ok(ComponentHandle {
            group_id: self.id,
            index,
            name,
        })
    }

    /// Current status of a component.
    pub fn status(&self, handle: &ComponentHandle) -> Option<&Status> {
        self.resolve(handle).map(|i| &self.components[i].status)
    }

    /// Replace a component's status, publish the aggregate, and save.
    ///
    /// A handle from another group is ignored.
    #[instrument(skip(self, handle, status), fields(component = %handle.name, status = %status))]
    pub fn set_status(&mut self, handle: &ComponentHandle, status: Status) {
        let Some(index) = self.resolve(handle) else {
            warn!("Ignoring status for component not in this group");
            return;
        };
        self.components[index].status = status;
        self.update();
    }

    /// Replace the status of the component called `name`.
    pub fn set_component_status(&mut self, name: &str, status: Status) -> StatusResult<()> {
        let index = self
            .index_of(name)
            .ok_or_else(|| StatusError::ComponentNotFound(name.to_string()))?;
        let handle = ComponentHandle {
            group_id: self.id,
            index,
            name: name.to_string(),
        };
        self.set_status(&handle, status);
        Ok(())
    }

    /// Publish the current aggregate without changing any status.
    pub fn publish(&mut self) {
        let aggregate = self.highest_prefixed();
        debug!(scope = %self.config.scope, status = %aggregate, "Publishing status");
        self.sink.publish(self.config.scope, &aggregate);
    }

    /// Every component, most urgent first; equal severities keep
    /// registration order.
    pub fn all(&self) -> Vec<(String, Status)> {
        rank(
            self.components
                .iter()
                .map(|c| (c.name.clone(), c.status.clone()))
                .collect(),
        )
    }

    /// The most urgent `(component, status)`, or `("", active)` when empty.
    pub fn highest(&self) -> (String, Status) {
        first_or_active(self.all())
    }

    /// The most urgent status with the component name prefixed.
    pub fn highest_prefixed(&self) -> Status {
        let (component, status) = self.highest();
        prefix(&component, &status, self.config.prefix_style)
    }

    /// Current statuses keyed by component name.
    pub fn statuses(&self) -> StatusMap {
        self.components
            .iter()
            .map(|c| (c.name.clone(), c.status.clone()))
            .collect()
    }

    /// Component names in registration order.
    pub fn component_names(&self) -> Vec<&str> {
        self.components.iter().map(|c| c.name.as_str()).collect()
    }

    pub fn len(&self) -> usize {
        self.components.len()
    }

    pub fn is_empty(&self) -> bool {
        self.components.is_empty()
    }

    fn update(&mut self) {
        self.publish();
        self.save();
    }

    fn save(&self) {
        if let Err(e) = self.store.save(&self.statuses()) {
            warn!(error = %e, "Failed to save component statuses");
        }
    }

    fn index_of(&self, name: &str) -> Option<usize> {
        self.components.iter().position(|c| c.name == name)
    }

    fn resolve(&self, handle: &ComponentHandle) -> Option<usize> {
        if handle.group_id != self.id {
            return None;
        }
        self.components
            .get(handle.index)
            .filter(|c| c.name == handle.name)
            .map(|_| handle.index)
    }
}

impl fmt::Debug for StatusGroup {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StatusGroup")
            .field("config", &self.config)
            .field("components", &self.components)
            .field("loaded", &self.loaded)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{PrefixStyle, StatusScope};
    use crate::sink::{NoopSink, RecordingSink};
    use crate::store::{MemoryStatusStore, NoopStatusStore};

    struct FailingStore;

    impl StatusStore for FailingStore {
        fn load(&self) -> StatusResult<StatusMap> {
            Err(StatusError::Storage("unavailable".into()))
        }

        fn save(&self, _statuses: &StatusMap) -> StatusResult<()> {
            Err(StatusError::Storage("read-only".into()))
        }
    }

    fn recording_group() -> (StatusGroup, RecordingSink) {
        let sink = RecordingSink::new();
        let group = StatusGroup::new(sink.clone(), NoopStatusStore, StatusConfig::default());
        (group, sink)
    }

    #[test]
    fn test_database_webapp_scenario() {
        let (mut group, sink) = recording_group();
        let database = group
            .register_with_status("database", Status::blocked("\"database_mode\" required"))
            .unwrap();
        let webapp = group
            .register_with_status("webapp", Status::blocked("\"webapp_port\" required"))
            .unwrap();

        assert_eq!(
            group.highest_prefixed(),
            Status::blocked("[database] \"database_mode\" required")
        );

        group.set_status(&database, Status::active(""));
        assert_eq!(
            sink.current(StatusScope::Unit),
            Some(Status::blocked("[webapp] \"webapp_port\" required"))
        );

        group.set_status(&webapp, Status::active(""));
        assert_eq!(sink.current(StatusScope::Unit), Some(Status::active("")));
        assert_eq!(sink.published().len(), 2);
    }

    #[test]
    fn test_default_initial_status_is_unknown() {
        let (mut group, _) = recording_group();
        let handle = group.register("database").unwrap();
        assert_eq!(group.status(&handle), Some(&Status::unknown()));
        assert_eq!(handle.name(), "database");
    }

    #[test]
    fn test_empty_group_is_active() {
        let (group, _) = recording_group();
        assert_eq!(group.highest(), (String::new(), Status::active("")));
        assert_eq!(group.highest_prefixed(), Status::active(""));
    }

    #[test]
    fn test_duplicate_leaves_first_untouched() {
        let (mut group, _) = recording_group();
        let first = group
            .register_with_status("database", Status::blocked("x"))
            .unwrap();

        let err = group
            .register_with_status("database", Status::error("y"))
            .unwrap_err();
        assert!(matches!(err, StatusError::DuplicateComponent(ref n) if n == "database"));
        assert_eq!(group.len(), 1);
        assert_eq!(group.status(&first), Some(&Status::blocked("x")));
    }

    #[test]
    fn test_restores_saved_status() {
        let store = MemoryStatusStore::new();

        let mut group = StatusGroup::new(NoopSink, store.clone(), StatusConfig::default());
        let database = group.register("database").unwrap();
        group.set_status(&database, Status::blocked("m"));
        assert_eq!(store.snapshot()["database"], Status::blocked("m"));

        let mut restarted = StatusGroup::new(NoopSink, store, StatusConfig::default());
        let database = restarted.register("database").unwrap();
        assert_eq!(restarted.status(&database), Some(&Status::blocked("m")));

        // Components without a saved status keep their initial value.
        let webapp = restarted
            .register_with_status("webapp", Status::waiting("w"))
            .unwrap();
        assert_eq!(restarted.status(&webapp), Some(&Status::waiting("w")));
    }

    #[test]
    fn test_store_failures_are_not_fatal() {
        let sink = RecordingSink::new();
        let mut group = StatusGroup::new(sink.clone(), FailingStore, StatusConfig::default());
        let handle = group.register("database").unwrap();

        group.set_status(&handle, Status::maintenance("migrating"));
        assert_eq!(
            sink.current(StatusScope::Unit),
            Some(Status::maintenance("[database] migrating"))
        );
    }

    #[test]
    fn test_application_scope_and_parenthesis() {
        let sink = RecordingSink::new();
        let config = StatusConfig {
            scope: StatusScope::Application,
            prefix_style: PrefixStyle::Parenthesis,
        };
        let mut group = StatusGroup::new(sink.clone(), NoopStatusStore, config);
        group.register("webapp").unwrap();

        group
            .set_component_status("webapp", Status::waiting("for database"))
            .unwrap();
        assert_eq!(sink.current(StatusScope::Unit), None);
        assert_eq!(
            sink.current(StatusScope::Application),
            Some(Status::waiting("(webapp) for database"))
        );
    }

    #[test]
    fn test_set_unknown_component_by_name() {
        let (mut group, sink) = recording_group();
        let err = group
            .set_component_status("missing", Status::active(""))
            .unwrap_err();
        assert!(matches!(err, StatusError::ComponentNotFound(_)));
        assert!(sink.published().is_empty());
    }

    #[test]
    fn test_foreign_handle_ignored() {
        let (mut group, sink) = recording_group();
        group.register("database").unwrap();

        let (mut other, _) = recording_group();
        other.register("cache").unwrap();
        let foreign = other.register("webapp").unwrap();

        group.set_status(&foreign, Status::error("boom"));
        assert!(sink.published().is_empty());
        assert_eq!(group.highest().1, Status::unknown());
    }

    #[test]
    fn test_same_name_handle_from_other_group_ignored() {
        let (mut group, sink) = recording_group();
        let local = group
            .register_with_status("database", Status::blocked("x"))
            .unwrap();

        let (mut other, other_sink) = recording_group();
        let foreign = other.register("database").unwrap();

        group.set_status(&foreign, Status::error("from other"));
        assert!(sink.published().is_empty());
        assert_eq!(group.highest(), ("database".to_string(), Status::blocked("x")));
        assert_eq!(group.status(&foreign), None);
        assert_eq!(other.status(&local), None);

        // The handle still works in the group that issued it.
        other.set_status(&foreign, Status::waiting("w"));
        assert_eq!(
            other_sink.current(StatusScope::Unit),
            Some(Status::waiting("[database] w"))
        );
    }

    #[test]
    fn test_empty_name_rejected() {
        let (mut group, _) = recording_group();
        group.register("database").unwrap();

        let err = group.register("").unwrap_err();
        assert!(matches!(err, StatusError::InvalidComponentName));
        assert_eq!(group.component_names(), ["database"]);
    }

    #[test]
    fn test_all_orders_by_severity_then_registration() {
        let (mut group, _) = recording_group();
        group.register_with_status("a", Status::active("")).unwrap();
        group.register_with_status("b", Status::waiting("")).unwrap();
        group.register_with_status("c", Status::error("")).unwrap();
        group.register_with_status("d", Status::waiting("")).unwrap();

        let order: Vec<String> = group.all().into_iter().map(|(n, _)| n).collect();
        assert_eq!(order, ["c", "b", "d", "a"]);
        assert_eq!(group.component_names(), ["a", "b", "c", "d"]);
    }

    #[test]
    fn test_explicit_publish() {
        let (mut group, sink) = recording_group();
        group
            .register_with_status("database", Status::blocked("x"))
            .unwrap();

        group.publish();
        assert_eq!(
            sink.published(),
            vec![(StatusScope::Unit, Status::blocked("[database] x"))]
        );
    }
}
