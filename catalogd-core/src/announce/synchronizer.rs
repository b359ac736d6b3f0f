//! Keeps the published connector identifiers equal to the directory contents

use std::collections::{BTreeMap, BTreeSet};
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::{debug, info};

use super::{
    DiscoveryTransport, ServiceAnnouncement, DEFAULT_CONNECTOR_IDS_PROPERTY, DEFAULT_SERVICE_TYPE,
};
use crate::catalog::{CatalogDirectory, ConnectorId};
use crate::error::{CatalogError, Result};

/// Default name of the always-on management catalog
pub const DEFAULT_SYSTEM_CATALOG: &str = "jmx";

/// What the synchronizer publishes, and under which announcement
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnnouncementPolicy {
    pub service_type: String,
    pub connector_ids_property: String,
    pub system_catalog: String,
    /// Dedicated coordinator that the scheduler keeps off the data plane
    pub coordinator_only: bool,
}

impl Default for AnnouncementPolicy {
    fn default() -> Self {
        Self {
            service_type: DEFAULT_SERVICE_TYPE.to_string(),
            connector_ids_property: DEFAULT_CONNECTOR_IDS_PROPERTY.to_string(),
            system_catalog: DEFAULT_SYSTEM_CATALOG.to_string(),
            coordinator_only: false,
        }
    }
}

impl AnnouncementPolicy {
    /// Compute the policy from the node role and scheduler setting
    pub fn for_node(coordinator: bool, include_coordinator: bool) -> Self {
        Self {
            coordinator_only: coordinator && !include_coordinator,
            ..Self::default()
        }
    }

    fn admits(&self, id: &ConnectorId) -> bool {
        !self.coordinator_only || id.catalog_name() == self.system_catalog
    }
}

/// Sole writer of the node's connector announcement.
///
/// `refresh` holds one lock across "read directory, swap announcement", so
/// concurrent refreshes always leave the announcement matching the directory
/// as it was when the last one ran.
pub struct AnnouncementSynchronizer {
    directory: CatalogDirectory,
    transport: Arc<dyn DiscoveryTransport>,
    policy: AnnouncementPolicy,
    published: Mutex<BTreeSet<ConnectorId>>,
}

impl AnnouncementSynchronizer {
    pub fn new(
        directory: CatalogDirectory,
        transport: Arc<dyn DiscoveryTransport>,
        policy: AnnouncementPolicy,
    ) -> Self {
        Self {
            directory,
            transport,
            policy,
            published: Mutex::new(BTreeSet::new()),
        }
    }

    pub fn policy(&self) -> &AnnouncementPolicy {
        &self.policy
    }

    /// The identifier set published by the last successful refresh
    pub async fn published(&self) -> BTreeSet<ConnectorId> {
        self.published.lock().await.clone()
    }

    /// Identifiers the current directory contents call for
    pub async fn expected(&self) -> BTreeSet<ConnectorId> {
        self.directory
            .list()
            .await
            .iter()
            .map(|definition| definition.connector_id())
            .filter(|id| self.policy.admits(id))
            .collect()
    }

    /// Recompute the identifier set and republish the announcement
    pub async fn refresh(&self) -> Result<BTreeSet<ConnectorId>> {
        let mut published = self.published.lock().await;

        let ids = self.expected().await;
        let current = self.current_announcement().await?;
        let replacement = self.rebuild(&current, &ids);

        self.transport
            .replace(current.id, replacement)
            .await
            .map_err(|e| discovery_error("replace announcement", &e))?;

        // The transport holds the new set from here on, broadcast or not
        if *published != ids {
            info!(
                connector_ids = %join(&ids),
                coordinator_only = self.policy.coordinator_only,
                "Connector announcement updated"
            );
        } else {
            debug!(connector_ids = %join(&ids), "Connector announcement unchanged");
        }
        *published = ids.clone();

        self.transport
            .force_announce()
            .await
            .map_err(|e| discovery_error("force announce", &e))?;
        Ok(ids)
    }

    async fn current_announcement(&self) -> Result<ServiceAnnouncement> {
        if let Some(announcement) = self
            .transport
            .current_announcement(&self.policy.service_type)
            .await
        {
            return Ok(announcement);
        }

        let available = self
            .transport
            .announcements()
            .await
            .into_iter()
            .map(|a| a.service_type)
            .collect::<Vec<_>>()
            .join(", ");
        let err = CatalogError::AnnouncementMissing {
            kind: self.policy.service_type.clone(),
            available,
        };
        err.log_if_fatal();
        Err(err)
    }

    /// Copy every property except the identifier list, then set the new list
    fn rebuild(
        &self,
        current: &ServiceAnnouncement,
        ids: &BTreeSet<ConnectorId>,
    ) -> ServiceAnnouncement {
        let key = &self.policy.connector_ids_property;
        let mut properties: BTreeMap<String, String> = current
            .properties
            .iter()
            .filter(|(k, _)| *k != key)
            .map(|(k, v)| (k.clone(), v.clone()))
            .collect();
        properties.insert(key.clone(), join(ids));
        ServiceAnnouncement::new(current.service_type.clone(), properties)
    }
}

fn join(ids: &BTreeSet<ConnectorId>) -> String {
    ids.iter()
        .map(ConnectorId::to_string)
        .collect::<Vec<_>>()
        .join(",")
}

fn discovery_error(action: &str, err: &anyhow::Error) -> CatalogError {
    let err = CatalogError::Discovery {
        message: format!("{action}: {err:#}"),
    };
    err.log_if_fatal();
    err
}
