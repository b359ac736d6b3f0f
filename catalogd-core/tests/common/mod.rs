//! Test helper functions for integration tests
//!
//! Shared across test files using the tests/common/ pattern.

#![allow(dead_code)]

use catalogd_core::catalog::{CatalogRequest, Properties};
use catalogd_core::local::{LocalConnectors, LocalDiscovery, LocalTopology};
use catalogd_core::{CatalogService, CoordinatorConfig};
use std::sync::{Arc, Once};

/// Initialize logging for tests (only once per test run)
static INIT: Once = Once::new();

pub fn init_test_logging() {
    INIT.call_once(|| {
        use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

        let _ = tracing_subscriber::registry()
            .with(
                tracing_subscriber::fmt::layer()
                    .with_test_writer()
                    .with_target(true)
                    .with_level(true),
            )
            .with(tracing_subscriber::filter::EnvFilter::from_default_env())
            .try_init();
    });
}

/// A started service plus handles on its local collaborators
pub struct TestCoordinator {
    pub service: CatalogService,
    pub connectors: Arc<LocalConnectors>,
    pub discovery: Arc<LocalDiscovery>,
}

pub async fn start(config: CoordinatorConfig) -> TestCoordinator {
    init_test_logging();

    let discovery = Arc::new(LocalDiscovery::for_node(
        &config.announcement.service_type,
        &config.node.version,
        config.node.coordinator,
    ));
    let topology = Arc::new(LocalTopology::new(
        config.local_node(),
        discovery.clone(),
        config.announcement.service_type.clone(),
        config.announcement.connector_ids_property.clone(),
    ));
    let connectors = Arc::new(if config.installed_connectors.is_empty() {
        LocalConnectors::new()
    } else {
        LocalConnectors::with_installed(config.installed_connectors.clone())
    });

    let service = CatalogService::start(&config, connectors.clone(), topology, discovery.clone())
        .await
        .expect("coordinator should start");

    TestCoordinator {
        service,
        connectors,
        discovery,
    }
}

pub fn props(pairs: &[(&str, &str)]) -> Properties {
    pairs
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect()
}

pub fn request(name: &str, connector: &str, pairs: &[(&str, &str)]) -> CatalogRequest {
    CatalogRequest::new(name, connector, props(pairs))
}
