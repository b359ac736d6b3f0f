use anyhow::{bail, Result};
use async_trait::async_trait;
use std::collections::BTreeMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use tokio::sync::RwLock;
use tracing::debug;
use uuid::Uuid;

use crate::announce::{DiscoveryTransport, ServiceAnnouncement};

/// Discovery transport that keeps announcements in memory
#[derive(Debug, Default)]
pub struct LocalDiscovery {
    announcements: RwLock<Vec<ServiceAnnouncement>>,
    broadcasts: AtomicUsize,
}

impl LocalDiscovery {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_announcement(announcement: ServiceAnnouncement) -> Self {
        Self {
            announcements: RwLock::new(vec![announcement]),
            broadcasts: AtomicUsize::new(0),
        }
    }

    /// Announcement a freshly started node publishes for `service_type`
    pub fn for_node(service_type: &str, node_version: &str, coordinator: bool) -> Self {
        let mut properties = BTreeMap::new();
        properties.insert("node_version".to_string(), node_version.to_string());
        properties.insert("coordinator".to_string(), coordinator.to_string());
        Self::with_announcement(ServiceAnnouncement::new(service_type, properties))
    }

    pub async fn add(&self, announcement: ServiceAnnouncement) {
        self.announcements.write().await.push(announcement);
    }

    /// Number of forced broadcasts requested so far
    pub fn broadcast_count(&self) -> usize {
        self.broadcasts.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl DiscoveryTransport for LocalDiscovery {
    async fn announcements(&self) -> Vec<ServiceAnnouncement> {
        self.announcements.read().await.clone()
    }

    async fn replace(&self, old_id: Uuid, new: ServiceAnnouncement) -> Result<()> {
        let mut announcements = self.announcements.write().await;
        let Some(position) = announcements.iter().position(|a| a.id == old_id) else {
            bail!("No announcement with id {old_id}");
        };
        debug!(old = %old_id, new = %new.id, service_type = %new.service_type, "Announcement replaced");
        announcements[position] = new;
        Ok(())
    }

    async fn force_announce(&self) -> Result<()> {
        self.broadcasts.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}
