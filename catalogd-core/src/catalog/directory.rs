//! The authoritative catalog name → definition mapping
//!
//! Every mutation takes the write half of a single lock, so readers either see
//! the whole previous state or the whole new one. Definitions are shared as
//! `Arc`s and never mutated after insertion. Callers must not hold a returned
//! snapshot across an external connector call expecting it to stay current.

use std::collections::BTreeMap;
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::debug;

use super::types::CatalogDefinition;

#[derive(Debug, Default, Clone)]
pub struct CatalogDirectory {
    entries: Arc<RwLock<BTreeMap<String, Arc<CatalogDefinition>>>>,
}

impl CatalogDirectory {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn get(&self, name: &str) -> Option<Arc<CatalogDefinition>> {
        self.entries.read().await.get(name).cloned()
    }

    pub async fn contains(&self, name: &str) -> bool {
        self.entries.read().await.contains_key(name)
    }

    /// All definitions, sorted by catalog name
    pub async fn list(&self) -> Vec<Arc<CatalogDefinition>> {
        self.entries.read().await.values().cloned().collect()
    }

    /// Definitions whose name starts with the literal `prefix`
    pub async fn list_by_prefix(&self, prefix: &str) -> Vec<Arc<CatalogDefinition>> {
        self.entries
            .read()
            .await
            .values()
            .filter(|definition| definition.has_prefix(prefix))
            .cloned()
            .collect()
    }

    /// Insert or replace a definition, returning the one it displaced.
    ///
    /// Performs no teardown; dropping the old connector is the caller's job.
    pub async fn upsert(&self, definition: CatalogDefinition) -> Option<Arc<CatalogDefinition>> {
        let name = definition.catalog_name().to_string();
        let previous = self
            .entries
            .write()
            .await
            .insert(name.clone(), Arc::new(definition));
        debug!(catalog = %name, replaced = previous.is_some(), "Directory upsert");
        previous
    }

    /// Remove an entry; true if one existed
    pub async fn remove(&self, name: &str) -> bool {
        let removed = self.entries.write().await.remove(name).is_some();
        debug!(catalog = %name, removed, "Directory remove");
        removed
    }

    pub async fn len(&self) -> usize {
        self.entries.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.entries.read().await.is_empty()
    }
}
