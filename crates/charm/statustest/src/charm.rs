//! Status test charm.
//!
//! Two components, a database and a web app, each need one config option.
//! Each reports its own status into a shared [`StatusGroup`]; the group
//! publishes whichever is most urgent.

use charm_status::{
    ComponentHandle, Status, StatusConfig, StatusGroup, StatusSink, StatusStore,
};
use tracing::info;

use crate::config::{quote_value, CharmConfig};
use crate::error::CharmResult;
use crate::host::{EventKind, Framework};

/// The status test charm.
#[derive(Debug)]
pub struct StatustestCharm {
    group: StatusGroup,
    database: Database,
    webapp: Webapp,
}

impl StatustestCharm {
    /// Build the charm, evaluate the initial config, and observe events.
    pub fn new(
        framework: &mut Framework<Self>,
        sink: impl StatusSink + 'static,
        store: impl StatusStore + 'static,
        status_config: StatusConfig,
        config: &CharmConfig,
    ) -> CharmResult<Self> {
        let mut group = StatusGroup::new(sink, store, status_config);
        let database = Database::new(&mut group, config)?;
        let webapp = Webapp::new(&mut group, config)?;

        framework.observe(EventKind::ConfigChanged, |charm: &mut Self, event| {
            charm.database.update_config(&mut charm.group, event.config);
            Ok(())
        });
        framework.observe(EventKind::ConfigChanged, |charm: &mut Self, event| {
            charm.webapp.update_config(&mut charm.group, event.config);
            Ok(())
        });
        framework.observe(EventKind::Commit, |charm: &mut Self, _| {
            charm.group.publish();
            Ok(())
        });

        Ok(Self {
            group,
            database,
            webapp,
        })
    }

    pub fn group(&self) -> &StatusGroup {
        &self.group
    }

    /// The status the charm currently reports.
    pub fn status(&self) -> Status {
        self.group.highest_prefixed()
    }

    pub fn database_status(&self) -> Option<&Status> {
        self.group.status(&self.database.component)
    }

    pub fn webapp_status(&self) -> Option<&Status> {
        self.group.status(&self.webapp.component)
    }
}

/// Database component.
#[derive(Debug)]
pub struct Database {
    component: ComponentHandle,
}

impl Database {
    pub const NAME: &'static str = "database";
    const MODE_KEY: &'static str = "database_mode";

    fn new(group: &mut StatusGroup, config: &CharmConfig) -> CharmResult<Self> {
        let database = Self {
            component: group.register(Self::NAME)?,
        };
        database.update_config(group, config);
        Ok(database)
    }

    fn update_config(&self, group: &mut StatusGroup, config: &CharmConfig) {
        let Some(mode) = config.get(Self::MODE_KEY) else {
            group.set_status(
                &self.component,
                Status::blocked(format!("\"{}\" required", Self::MODE_KEY)),
            );
            return;
        };

        let mode = quote_value(mode);
        info!("Using database mode {}", mode);
        group.set_status(&self.component, Status::active(format!("db mode {mode}")));
    }
}

/// Web app component.
#[derive(Debug)]
pub struct Webapp {
    component: ComponentHandle,
}

impl Webapp {
    pub const NAME: &'static str = "webapp";
    const PORT_KEY: &'static str = "webapp_port";

    fn new(group: &mut StatusGroup, config: &CharmConfig) -> CharmResult<Self> {
        let webapp = Self {
            component: group.register(Self::NAME)?,
        };
        webapp.update_config(group, config);
        Ok(webapp)
    }

    fn update_config(&self, group: &mut StatusGroup, config: &CharmConfig) {
        let Some(port) = config.get(Self::PORT_KEY) else {
            group.set_status(
                &self.component,
                Status::blocked(format!("\"{}\" required", Self::PORT_KEY)),
            );
            return;
        };

        let port = quote_value(port);
        info!("Using web app port {}", port);
        group.set_status(&self.component, Status::active(format!("web app port {port}")));
    }
}
