//! # Charm Status - Multi-component status aggregation for charms
//!
//! A charm often manages several independent pieces (a database, a web
//! app, a backup job), each with its own idea of whether things are fine.
//! The host runtime only shows one status per unit or application. This
//! crate tracks each component's status and reports the most urgent one,
//! with the component's name prefixed onto its message.
//!
//! ## Key Components
//!
//! - [`StatusGroup`]: component registry with a status sink and a store;
//!   every status change publishes the aggregate and saves all statuses
//! - [`Prioritizer`]: stateless variant that evaluates status getters on
//!   demand and turns getter failures into `error` statuses
//! - [`StatusStore`]: load/save hooks so statuses survive a restart
//! - [`StatusSink`]: where the aggregate goes (unit or application scope)
//!
//! ## Priority
//!
//! `error > blocked > waiting > maintenance > active > unknown`. Among equal
//! severities the component registered first wins. An empty group reports
//! a clean `active` status, and a clean `active` winner is never prefixed.
//!
//! ## Example
//!
//! ```rust
//! use charm_status::{
//!     MemoryStatusStore, RecordingSink, Status, StatusConfig, StatusGroup, StatusScope,
//! };
//!
//! let sink = RecordingSink::new();
//! let mut group = StatusGroup::new(sink.clone(), MemoryStatusStore::new(), StatusConfig::default());
//!
//! let database = group
//!     .register_with_status("database", Status::blocked("\"database_mode\" required"))
//!     .unwrap();
//! let webapp = group
//!     .register_with_status("webapp", Status::blocked("\"webapp_port\" required"))
//!     .unwrap();
//!
//! group.set_status(&database, Status::active(""));
//! assert_eq!(
//!     sink.current(StatusScope::Unit),
//!     Some(Status::blocked("[webapp] \"webapp_port\" required")),
//! );
//!
//! group.set_status(&webapp, Status::active(""));
//! assert_eq!(sink.current(StatusScope::Unit), Some(Status::active("")));
//! ```

pub mod config;
pub mod error;
pub mod group;
pub mod prioritizer;
pub mod severity;
pub mod sink;
pub mod status;
pub mod store;

// Re-export main types
pub use config::{PrefixStyle, StatusConfig, StatusScope};
pub use error::{StatusError, StatusResult};
pub use group::{ComponentHandle, StatusGroup};
pub use prioritizer::{Prioritizer, StatusSource};
pub use severity::Severity;
pub use sink::{NoopSink, RecordingSink, StatusSink};
pub use status::Status;
pub use store::{JsonFileStatusStore, MemoryStatusStore, NoopStatusStore, StatusMap, StatusStore};
