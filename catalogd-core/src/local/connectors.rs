use anyhow::{bail, Result};
use async_trait::async_trait;
use std::collections::{BTreeMap, BTreeSet};
use tokio::sync::Mutex;
use tracing::debug;

use crate::catalog::Properties;
use crate::connector::ConnectorLifecycle;

/// Connector lifecycle that tracks live connections in memory
#[derive(Debug, Default)]
pub struct LocalConnectors {
    /// Connector types that may be instantiated; `None` accepts any
    installed: Option<BTreeSet<String>>,
    live: Mutex<BTreeMap<String, String>>,
    dropped: Mutex<Vec<String>>,
    failures: Mutex<BTreeMap<String, String>>,
}

impl LocalConnectors {
    pub fn new() -> Self {
        Self::default()
    }

    /// Only accept the given connector types
    pub fn with_installed<I, S>(connectors: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            installed: Some(connectors.into_iter().map(Into::into).collect()),
            ..Self::default()
        }
    }

    /// Make every create/drop for `catalog_name` fail with `reason`
    pub async fn fail_on(&self, catalog_name: &str, reason: &str) {
        self.failures
            .lock()
            .await
            .insert(catalog_name.to_string(), reason.to_string());
    }

    pub async fn clear_failures(&self) {
        self.failures.lock().await.clear();
    }

    /// Live `(catalog, connector)` pairs
    pub async fn live(&self) -> Vec<(String, String)> {
        self.live
            .lock()
            .await
            .iter()
            .map(|(k, v)| (k.clone(), v.clone()))
            .collect()
    }

    /// Catalog names dropped so far, in call order
    pub async fn dropped(&self) -> Vec<String> {
        self.dropped.lock().await.clone()
    }

    async fn injected_failure(&self, catalog_name: &str) -> Result<()> {
        if let Some(reason) = self.failures.lock().await.get(catalog_name) {
            bail!("{reason}");
        }
        Ok(())
    }
}

#[async_trait]
impl ConnectorLifecycle for LocalConnectors {
    async fn create_connection(
        &self,
        catalog_name: &str,
        connector_name: &str,
        properties: &Properties,
    ) -> Result<()> {
        self.injected_failure(catalog_name).await?;

        if let Some(installed) = &self.installed {
            if !installed.contains(connector_name) {
                bail!("No factory for connector '{connector_name}'");
            }
        }

        let mut live = self.live.lock().await;
        if live.contains_key(catalog_name) {
            bail!("A catalog already exists for {catalog_name}");
        }
        live.insert(catalog_name.to_string(), connector_name.to_string());
        debug!(
            catalog = %catalog_name,
            connector = %connector_name,
            properties = properties.len(),
            "Local connection created"
        );
        Ok(())
    }

    async fn drop_connection(&self, catalog_name: &str) -> Result<()> {
        self.injected_failure(catalog_name).await?;

        if self.live.lock().await.remove(catalog_name).is_none() {
            debug!(catalog = %catalog_name, "No local connection to drop");
        }
        self.dropped.lock().await.push(catalog_name.to_string());
        Ok(())
    }

    fn name(&self) -> &'static str {
        "local"
    }
}
