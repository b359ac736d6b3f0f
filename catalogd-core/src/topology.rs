//! Joins catalog definitions with the cluster nodes currently serving them

use async_trait::async_trait;
use futures::future::join_all;
use std::sync::Arc;
use tracing::debug;

use crate::catalog::{
    ActiveCatalogView, CatalogDefinition, CatalogDirectory, CatalogView, ConnectorId, NodeInfo,
    Redactor,
};

/// Cluster membership as seen by this node
#[async_trait]
pub trait ClusterTopology: Send + Sync {
    /// Live nodes currently advertising `connector`
    async fn active_nodes_for(&self, connector: &ConnectorId) -> Vec<NodeInfo>;
}

/// Read-only view over the directory; never mutates it
pub struct ActiveTopologyView {
    directory: CatalogDirectory,
    topology: Arc<dyn ClusterTopology>,
    redactor: Redactor,
}

impl ActiveTopologyView {
    pub fn new(
        directory: CatalogDirectory,
        topology: Arc<dyn ClusterTopology>,
        redactor: Redactor,
    ) -> Self {
        Self {
            directory,
            topology,
            redactor,
        }
    }

    pub fn redactor(&self) -> &Redactor {
        &self.redactor
    }

    /// The named catalog with its active nodes, or `None` if not registered
    pub async fn resolve(&self, catalog_name: &str) -> Option<ActiveCatalogView> {
        let definition = self.directory.get(catalog_name).await?;
        Some(self.join(&definition).await)
    }

    pub async fn resolve_all(&self) -> Vec<ActiveCatalogView> {
        let names = self
            .directory
            .list()
            .await
            .iter()
            .map(|d| d.catalog_name().to_string())
            .collect();
        self.resolve_names(names).await
    }

    pub async fn resolve_by_prefix(&self, prefix: &str) -> Vec<ActiveCatalogView> {
        let names = self
            .directory
            .list_by_prefix(prefix)
            .await
            .iter()
            .map(|d| d.catalog_name().to_string())
            .collect();
        self.resolve_names(names).await
    }

    /// Resolve each name again; entries deleted in the meantime are skipped
    async fn resolve_names(&self, names: Vec<String>) -> Vec<ActiveCatalogView> {
        let total = names.len();
        let views: Vec<ActiveCatalogView> = join_all(names.iter().map(|n| self.resolve(n)))
            .await
            .into_iter()
            .flatten()
            .collect();
        if views.len() < total {
            debug!(
                skipped = total - views.len(),
                "Catalogs removed while resolving active nodes"
            );
        }
        views
    }

    async fn join(&self, definition: &CatalogDefinition) -> ActiveCatalogView {
        let nodes = self
            .topology
            .active_nodes_for(&definition.connector_id())
            .await;
        ActiveCatalogView {
            catalog: CatalogView::redacted(definition, &self.redactor),
            nodes,
        }
    }
}
