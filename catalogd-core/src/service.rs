//! Catalog service - the operations a request layer calls
//!
//! Wires the directory, registrar, synchronizer and topology view together and
//! exposes list / get / prefix / delete / add. Reads return redacted views;
//! every mutation refreshes the announcement before returning.

use std::sync::Arc;
use tracing::{error, info};

use crate::announce::{AnnouncementSynchronizer, DiscoveryTransport};
use crate::catalog::{
    ActiveCatalogView, ApiResponse, BatchItemResult, CatalogDirectory, CatalogRequest,
};
use crate::config::CoordinatorConfig;
use crate::connector::ConnectorLifecycle;
use crate::error::{CatalogError, Result};
use crate::registrar::BatchRegistrar;
use crate::topology::{ActiveTopologyView, ClusterTopology};

pub struct CatalogService {
    directory: CatalogDirectory,
    registrar: BatchRegistrar,
    synchronizer: Arc<AnnouncementSynchronizer>,
    view: ActiveTopologyView,
}

impl CatalogService {
    /// Build the service and bring it to a consistent state.
    ///
    /// Creates every statically configured catalog, then publishes the initial
    /// announcement. Any failure aborts startup.
    pub async fn start(
        config: &CoordinatorConfig,
        connectors: Arc<dyn ConnectorLifecycle>,
        topology: Arc<dyn ClusterTopology>,
        discovery: Arc<dyn DiscoveryTransport>,
    ) -> Result<Self> {
        let directory = CatalogDirectory::new();
        let synchronizer = Arc::new(AnnouncementSynchronizer::new(
            directory.clone(),
            discovery,
            config.announcement_policy(),
        ));
        let registrar = BatchRegistrar::new(
            directory.clone(),
            connectors,
            synchronizer.clone(),
            config.name_policy(),
        );
        let view = ActiveTopologyView::new(directory.clone(), topology, config.redactor());

        for request in &config.catalogs {
            let mut result = BatchItemResult::for_request(request);
            registrar
                .install(request.clone(), &mut result)
                .await
                .map_err(|e| {
                    error!(catalog = %request.catalog_name, error = %e, "Static catalog failed");
                    e
                })?;
        }

        let published = synchronizer.refresh().await?;
        info!(
            catalogs = directory.len().await,
            announced = published.len(),
            "Catalog service started"
        );

        Ok(Self {
            directory,
            registrar,
            synchronizer,
            view,
        })
    }

    /// Every catalog with its active nodes
    pub async fn list_all(&self) -> Vec<ActiveCatalogView> {
        info!("Listing all catalogs");
        self.view.resolve_all().await
    }

    pub async fn get_info(&self, catalog_name: &str) -> Result<ActiveCatalogView> {
        info!(catalog = %catalog_name, "Getting catalog info");
        self.view
            .resolve(catalog_name)
            .await
            .ok_or_else(|| CatalogError::NotFound {
                name: catalog_name.to_string(),
            })
    }

    pub async fn list_by_prefix(&self, prefix: &str) -> Vec<ActiveCatalogView> {
        info!(prefix = %prefix, "Listing catalogs by prefix");
        self.view.resolve_by_prefix(prefix).await
    }

    pub async fn delete(&self, catalog_name: &str) -> Result<()> {
        info!(catalog = %catalog_name, "Deleting catalog");
        self.registrar.delete(catalog_name).await.map_err(|e| {
            error!(catalog = %catalog_name, error = %e, "Delete failed");
            e
        })
    }

    /// Add or replace a batch; per-item failures live in the results
    pub async fn add(&self, requests: Vec<CatalogRequest>) -> Result<Vec<BatchItemResult>> {
        info!(count = requests.len(), "Adding catalogs");
        self.registrar.add_all(requests).await
    }

    /// Raw, unredacted access for diagnostics and tests
    pub fn directory(&self) -> &CatalogDirectory {
        &self.directory
    }

    pub fn synchronizer(&self) -> &AnnouncementSynchronizer {
        &self.synchronizer
    }
}

/// Wrap an operation outcome in the response envelope
pub fn respond<T>(outcome: Result<T>) -> ApiResponse<T> {
    match outcome {
        Ok(data) => ApiResponse::ok(data),
        Err(err) => ApiResponse::error(err.status_code(), err.to_string()),
    }
}
