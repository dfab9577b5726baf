//! # Status Test Charm
//!
//! A charm with two components, `database` and `webapp`, each blocked until
//! its config option is set. Both report into one
//! [`StatusGroup`](charm_status::StatusGroup), so the unit shows the most
//! urgent problem first:
//!
//! 1. nothing set: `blocked: [database] "database_mode" required`
//! 2. `database_mode` set: `blocked: [webapp] "webapp_port" required`
//! 3. both set: `active: [database] db mode '...'`
//!
//! The [`host`] module is a minimal synchronous stand-in for the charm
//! runtime: an ordered observer list, a config snapshot, and a status sink.

pub mod charm;
pub mod config;
pub mod error;
pub mod host;
pub mod settings;

pub use charm::{Database, StatustestCharm, Webapp};
pub use config::CharmConfig;
pub use error::{CharmError, CharmResult};
pub use host::{Event, EventKind, Framework};
pub use settings::CliSettings;
