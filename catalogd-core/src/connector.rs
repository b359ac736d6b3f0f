//! Connector lifecycle trait - the external factory that turns a catalog
//! definition into a live connection
//!
//! Implementations own connect/validate/disconnect. The directory never calls
//! them itself; the registrar does, outside any directory lock.

use anyhow::Result;
use async_trait::async_trait;

use crate::catalog::Properties;

#[async_trait]
pub trait ConnectorLifecycle: Send + Sync {
    /// Instantiate `connector_name` under `catalog_name` with the given properties
    async fn create_connection(
        &self,
        catalog_name: &str,
        connector_name: &str,
        properties: &Properties,
    ) -> Result<()>;

    /// Tear down the connection registered under `catalog_name`
    async fn drop_connection(&self, catalog_name: &str) -> Result<()>;

    /// Implementation identifier for logging/debugging
    fn name(&self) -> &'static str;
}
