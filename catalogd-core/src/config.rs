//! Coordinator configuration
//!
//! Loaded from a YAML file; every field has a default so an empty file is a
//! valid configuration.
//!
//! ```yaml
//! node:
//!   coordinator: true
//!   includeCoordinator: false
//!   nodeId: coordinator-1
//! announcement:
//!   serviceType: query-engine
//! systemCatalog: jmx
//! redaction:
//!   suffix: -password
//! naming:
//!   enforce: true
//! installedConnectors: [jmx, mysql, postgres]
//! catalogs:
//!   - catalogName: jmx
//!     connectorName: jmx
//!   - catalogName: teamA_sales
//!     connectorName: mysql
//!     properties:
//!       connection-url: jdbc:mysql://db:3306
//! ```

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::debug;

use crate::announce::{
    AnnouncementPolicy, DEFAULT_CONNECTOR_IDS_PROPERTY, DEFAULT_SERVICE_TYPE,
    DEFAULT_SYSTEM_CATALOG,
};
use crate::catalog::{
    CatalogRequest, NamePolicy, NodeInfo, Redactor, DEFAULT_MASK, DEFAULT_SECRET_SUFFIX,
};

/// Top-level coordinator configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CoordinatorConfig {
    #[serde(default)]
    pub node: NodeConfig,

    #[serde(default)]
    pub announcement: AnnouncementConfig,

    /// Always-on management catalog, the only one a dedicated coordinator announces
    #[serde(default = "default_system_catalog")]
    pub system_catalog: String,

    #[serde(default)]
    pub redaction: RedactionConfig,

    #[serde(default)]
    pub naming: NamingConfig,

    /// Connector types the local lifecycle accepts; empty accepts any
    #[serde(default)]
    pub installed_connectors: Vec<String>,

    /// Catalogs created at boot
    #[serde(default)]
    pub catalogs: Vec<CatalogRequest>,
}

impl Default for CoordinatorConfig {
    fn default() -> Self {
        Self {
            node: NodeConfig::default(),
            announcement: AnnouncementConfig::default(),
            system_catalog: default_system_catalog(),
            redaction: RedactionConfig::default(),
            naming: NamingConfig::default(),
            installed_connectors: Vec::new(),
            catalogs: Vec::new(),
        }
    }
}

/// Role and identity of this node
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NodeConfig {
    #[serde(default = "default_true")]
    pub coordinator: bool,

    /// Whether the scheduler may place data-plane work on the coordinator
    #[serde(default = "default_true")]
    pub include_coordinator: bool,

    #[serde(default = "default_node_id")]
    pub node_id: String,

    #[serde(default = "default_internal_uri")]
    pub internal_uri: String,

    #[serde(default = "default_version")]
    pub version: String,
}

impl Default for NodeConfig {
    fn default() -> Self {
        Self {
            coordinator: true,
            include_coordinator: true,
            node_id: default_node_id(),
            internal_uri: default_internal_uri(),
            version: default_version(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnnouncementConfig {
    #[serde(default = "default_service_type")]
    pub service_type: String,

    #[serde(default = "default_connector_ids_property")]
    pub connector_ids_property: String,
}

impl Default for AnnouncementConfig {
    fn default() -> Self {
        Self {
            service_type: default_service_type(),
            connector_ids_property: default_connector_ids_property(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RedactionConfig {
    #[serde(default = "default_suffix")]
    pub suffix: String,

    #[serde(default = "default_mask")]
    pub mask: String,
}

impl Default for RedactionConfig {
    fn default() -> Self {
        Self {
            suffix: default_suffix(),
            mask: default_mask(),
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct NamingConfig {
    /// Reject add requests whose name breaks the `{space}_{name}` format
    #[serde(default)]
    pub enforce: bool,
}

fn default_true() -> bool {
    true
}

fn default_system_catalog() -> String {
    DEFAULT_SYSTEM_CATALOG.to_string()
}

fn default_node_id() -> String {
    "local".to_string()
}

fn default_internal_uri() -> String {
    "http://127.0.0.1:8080".to_string()
}

fn default_version() -> String {
    env!("CARGO_PKG_VERSION").to_string()
}

fn default_service_type() -> String {
    DEFAULT_SERVICE_TYPE.to_string()
}

fn default_connector_ids_property() -> String {
    DEFAULT_CONNECTOR_IDS_PROPERTY.to_string()
}

fn default_suffix() -> String {
    DEFAULT_SECRET_SUFFIX.to_string()
}

fn default_mask() -> String {
    DEFAULT_MASK.to_string()
}

impl CoordinatorConfig {
    /// Load configuration from a YAML file
    pub fn load_from_path(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config: {}", path.display()))?;
        let config = Self::from_yaml(&content)
            .with_context(|| format!("Failed to parse config: {}", path.display()))?;
        debug!(
            path = %path.display(),
            catalogs = config.catalogs.len(),
            "Loaded coordinator config"
        );
        Ok(config)
    }

    pub fn from_yaml(content: &str) -> Result<Self> {
        if content.trim().is_empty() {
            return Ok(Self::default());
        }
        Ok(serde_yaml_ng::from_str(content)?)
    }

    pub fn announcement_policy(&self) -> AnnouncementPolicy {
        AnnouncementPolicy {
            service_type: self.announcement.service_type.clone(),
            connector_ids_property: self.announcement.connector_ids_property.clone(),
            system_catalog: self.system_catalog.clone(),
            ..AnnouncementPolicy::for_node(self.node.coordinator, self.node.include_coordinator)
        }
    }

    pub fn redactor(&self) -> Redactor {
        Redactor::new(&self.redaction.suffix, &self.redaction.mask)
    }

    pub fn name_policy(&self) -> NamePolicy {
        NamePolicy {
            enforce_format: self.naming.enforce,
        }
    }

    /// This node as reported by the local topology
    pub fn local_node(&self) -> NodeInfo {
        NodeInfo {
            identifier: self.node.node_id.clone(),
            internal_uri: self.node.internal_uri.clone(),
            version: self.node.version.clone(),
            coordinator: self.node.coordinator,
        }
    }
}
