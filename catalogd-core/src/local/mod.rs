//! In-process implementations of the external collaborators
//!
//! Used by the CLI, which runs the directory without a cluster, and by tests.
//! `LocalTopology` reads the connector ids back out of `LocalDiscovery`, so a
//! single node sees itself serving exactly what it announced.

mod connectors;
mod discovery;
mod topology;

pub use connectors::LocalConnectors;
pub use discovery::LocalDiscovery;
pub use topology::LocalTopology;
