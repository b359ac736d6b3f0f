//! catalogd core - runtime catalog directory for a query engine coordinator
//!
//! Keeps the set of named data-source connections in memory and the node's
//! connector announcement in step with it.

pub mod announce;
pub mod catalog;
pub mod config;
pub mod connector;
pub mod error;
pub mod local;
pub mod registrar;
pub mod service;
pub mod topology;

pub use config::CoordinatorConfig;
pub use error::{CatalogError, Result};
pub use service::{respond, CatalogService};
