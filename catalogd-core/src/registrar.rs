//! Batch catalog registration with independent per-item outcomes
//!
//! Each request becomes exactly one [`BatchItemResult`]. A failing item is
//! recorded and the batch moves on; nothing already applied is rolled back.
//! The announcement is refreshed once, after the whole batch.
//!
//! Mutations (one batch item, or one delete) run one at a time under the
//! registrar's own lock, so a name's directory entry and its live connection
//! always change together. Readers only ever take the directory lock.

use futures::stream::{self, StreamExt};
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::{error, info, warn};

use crate::announce::AnnouncementSynchronizer;
use crate::catalog::{BatchItemResult, CatalogDirectory, CatalogRequest, NamePolicy};
use crate::connector::ConnectorLifecycle;
use crate::error::{CatalogError, Result};

const TRACE_DROPPED: &str = "Existing catalog dropped. ";
const TRACE_CREATED: &str = "Catalog created.";
const TRACE_REPLACED: &str = "Catalog replaced.";

pub struct BatchRegistrar {
    directory: CatalogDirectory,
    connectors: Arc<dyn ConnectorLifecycle>,
    synchronizer: Arc<AnnouncementSynchronizer>,
    names: NamePolicy,
    /// Held across check, connector call and directory update
    mutation: Mutex<()>,
}

impl BatchRegistrar {
    pub fn new(
        directory: CatalogDirectory,
        connectors: Arc<dyn ConnectorLifecycle>,
        synchronizer: Arc<AnnouncementSynchronizer>,
        names: NamePolicy,
    ) -> Self {
        Self {
            directory,
            connectors,
            synchronizer,
            names,
            mutation: Mutex::new(()),
        }
    }

    /// Add or replace every requested catalog.
    ///
    /// Returns one result per request, in request order, however many items
    /// failed. Only a fatal announcement error is returned as `Err`.
    pub async fn add_all(&self, requests: Vec<CatalogRequest>) -> Result<Vec<BatchItemResult>> {
        let total = requests.len();
        let results: Vec<BatchItemResult> = stream::iter(requests)
            .then(|request| self.register(request))
            .collect()
            .await;

        self.synchronizer.refresh().await?;

        let failed = results.iter().filter(|r| !r.succeeded).count();
        if failed > 0 {
            warn!(total, failed, "Catalog batch finished with failures");
        } else {
            info!(total, "Catalog batch finished");
        }
        Ok(results)
    }

    /// Process one request into its result; never fails
    async fn register(&self, request: CatalogRequest) -> BatchItemResult {
        let mut result = BatchItemResult::for_request(&request);
        let name = request.catalog_name.clone();

        if let Err(err) = self.install(request, &mut result).await {
            error!(catalog = %name, error = %err, "Catalog registration failed");
            result.fail(&format!("Registration failed: {err}"));
        }
        result
    }

    /// Drop any existing catalog of the same name, then create the new one.
    ///
    /// The directory lock is never held across the connector calls. Does not
    /// refresh the announcement.
    pub(crate) async fn install(
        &self,
        request: CatalogRequest,
        result: &mut BatchItemResult,
    ) -> Result<()> {
        let name = request.catalog_name.clone();
        self.names.check(&name)?;

        let _guard = self.mutation.lock().await;
        let replacing = self.directory.contains(&name).await;
        if replacing {
            self.connectors
                .drop_connection(&name)
                .await
                .map_err(|e| CatalogError::lifecycle(&name, &e))?;
            self.directory.remove(&name).await;
            result.trace(TRACE_DROPPED);
        }

        self.connectors
            .create_connection(&name, &request.connector_name, &request.properties)
            .await
            .map_err(|e| CatalogError::lifecycle(&name, &e))?;
        info!(
            catalog = %name,
            connector = %request.connector_name,
            backend = self.connectors.name(),
            replaced = replacing,
            "Catalog registered"
        );
        self.directory.upsert(request.into_definition()).await;
        result.trace(if replacing { TRACE_REPLACED } else { TRACE_CREATED });
        Ok(())
    }

    /// Drop one catalog's connection, remove it, and refresh the announcement
    pub async fn delete(&self, name: &str) -> Result<()> {
        {
            let _guard = self.mutation.lock().await;
            if !self.directory.contains(name).await {
                return Err(CatalogError::NotFound {
                    name: name.to_string(),
                });
            }

            self.connectors
                .drop_connection(name)
                .await
                .map_err(|e| CatalogError::lifecycle(name, &e))?;
            self.directory.remove(name).await;
        }
        info!(catalog = %name, "Catalog deleted");

        self.synchronizer.refresh().await?;
        Ok(())
    }
}
