use async_trait::async_trait;
use std::sync::Arc;

use super::LocalDiscovery;
use crate::announce::DiscoveryTransport;
use crate::catalog::{ConnectorId, NodeInfo};
use crate::topology::ClusterTopology;

/// Single-node topology: the local node serves whatever it announces
pub struct LocalTopology {
    node: NodeInfo,
    discovery: Arc<LocalDiscovery>,
    service_type: String,
    connector_ids_property: String,
}

impl LocalTopology {
    pub fn new(
        node: NodeInfo,
        discovery: Arc<LocalDiscovery>,
        service_type: impl Into<String>,
        connector_ids_property: impl Into<String>,
    ) -> Self {
        Self {
            node,
            discovery,
            service_type: service_type.into(),
            connector_ids_property: connector_ids_property.into(),
        }
    }
}

#[async_trait]
impl ClusterTopology for LocalTopology {
    async fn active_nodes_for(&self, connector: &ConnectorId) -> Vec<NodeInfo> {
        let Some(announcement) = self.discovery.current_announcement(&self.service_type).await
        else {
            return Vec::new();
        };

        let serves = announcement
            .property(&self.connector_ids_property)
            .map(|ids| ids.split(',').any(|id| id.trim() == connector.catalog_name()))
            .unwrap_or(false);

        if serves {
            vec![self.node.clone()]
        } else {
            Vec::new()
        }
    }
}
