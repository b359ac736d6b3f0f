//! Service announcement of the connector identifiers this node serves
//!
//! The node publishes one announcement per service type to the cluster's
//! discovery mechanism. For the query-engine type, the `connectorIds`
//! property lists every catalog the node can serve; the synchronizer keeps
//! that list in step with the catalog directory.
//!
//! ```text
//! CatalogDirectory ──list()──▶ AnnouncementSynchronizer ──replace()──▶ DiscoveryTransport
//!                                        │                                  │
//!                                        └──────── force_announce() ────────┘
//! ```

mod synchronizer;

pub use synchronizer::{AnnouncementPolicy, AnnouncementSynchronizer, DEFAULT_SYSTEM_CATALOG};

use anyhow::Result;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use uuid::Uuid;

/// Default service type carrying the connector identifiers
pub const DEFAULT_SERVICE_TYPE: &str = "query-engine";

/// Default announcement property holding the comma-joined identifiers
pub const DEFAULT_CONNECTOR_IDS_PROPERTY: &str = "connectorIds";

/// One service announcement as held by the discovery transport
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ServiceAnnouncement {
    pub id: Uuid,
    pub service_type: String,
    pub properties: BTreeMap<String, String>,
}

impl ServiceAnnouncement {
    pub fn new(service_type: impl Into<String>, properties: BTreeMap<String, String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            service_type: service_type.into(),
            properties,
        }
    }

    pub fn property(&self, key: &str) -> Option<&str> {
        self.properties.get(key).map(String::as_str)
    }
}

/// The node-local side of the cluster discovery mechanism
#[async_trait]
pub trait DiscoveryTransport: Send + Sync {
    /// Every announcement this node currently publishes
    async fn announcements(&self) -> Vec<ServiceAnnouncement>;

    /// The announcement of `service_type`, if one is published
    async fn current_announcement(&self, service_type: &str) -> Option<ServiceAnnouncement> {
        self.announcements()
            .await
            .into_iter()
            .find(|announcement| announcement.service_type == service_type)
    }

    /// Remove the announcement `old_id` and publish `new` in its place
    async fn replace(&self, old_id: Uuid, new: ServiceAnnouncement) -> Result<()>;

    /// Push the current announcements to the cluster immediately
    async fn force_announce(&self) -> Result<()>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn announcement_serializes_with_id() {
        let mut properties = BTreeMap::new();
        properties.insert("connectorIds".to_string(), "jmx,teamA_sales".to_string());
        let announcement = ServiceAnnouncement::new(DEFAULT_SERVICE_TYPE, properties);

        let value = serde_json::to_value(&announcement).unwrap();
        assert_eq!(value["id"], announcement.id.to_string());
        assert_eq!(value["serviceType"], "query-engine");
        assert_eq!(value["properties"]["connectorIds"], "jmx,teamA_sales");

        let back: ServiceAnnouncement = serde_json::from_value(value).unwrap();
        assert_eq!(back, announcement);
    }
}
