//! Catalog data model and the request/response shapes built from it

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

use super::redact::Redactor;

/// Catalog properties. Key order carries no meaning; a sorted map keeps output stable.
pub type Properties = BTreeMap<String, String>;

/// Identifier a node advertises for each catalog it can serve.
///
/// Derived from the catalog name, so two catalogs backed by the same connector
/// type still advertise two identifiers.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ConnectorId(String);

impl ConnectorId {
    pub fn new(catalog_name: impl Into<String>) -> Self {
        ConnectorId(catalog_name.into())
    }

    /// Name of the catalog this identifier was derived from
    pub fn catalog_name(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ConnectorId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A registered catalog, as stored by the directory
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CatalogDefinition {
    catalog_name: String,
    connector_name: String,
    properties: Properties,
    create_time: DateTime<Utc>,
}

impl CatalogDefinition {
    /// Create a definition stamped with the current time
    pub fn new(
        catalog_name: impl Into<String>,
        connector_name: impl Into<String>,
        properties: Properties,
    ) -> Self {
        Self::with_create_time(catalog_name, connector_name, properties, Utc::now())
    }

    pub fn with_create_time(
        catalog_name: impl Into<String>,
        connector_name: impl Into<String>,
        properties: Properties,
        create_time: DateTime<Utc>,
    ) -> Self {
        Self {
            catalog_name: catalog_name.into(),
            connector_name: connector_name.into(),
            properties,
            create_time,
        }
    }

    pub fn catalog_name(&self) -> &str {
        &self.catalog_name
    }

    pub fn connector_name(&self) -> &str {
        &self.connector_name
    }

    /// Raw, unredacted properties
    pub fn properties(&self) -> &Properties {
        &self.properties
    }

    pub fn create_time(&self) -> DateTime<Utc> {
        self.create_time
    }

    pub fn connector_id(&self) -> ConnectorId {
        ConnectorId::new(self.catalog_name.clone())
    }

    /// Whether the catalog name starts with the literal `prefix`
    pub fn has_prefix(&self, prefix: &str) -> bool {
        self.catalog_name.starts_with(prefix)
    }
}

/// Inbound add request for one catalog
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CatalogRequest {
    pub catalog_name: String,
    pub connector_name: String,
    #[serde(default)]
    pub properties: Properties,
}

impl CatalogRequest {
    pub fn new(
        catalog_name: impl Into<String>,
        connector_name: impl Into<String>,
        properties: Properties,
    ) -> Self {
        Self {
            catalog_name: catalog_name.into(),
            connector_name: connector_name.into(),
            properties,
        }
    }

    pub(crate) fn into_definition(self) -> CatalogDefinition {
        CatalogDefinition::new(self.catalog_name, self.connector_name, self.properties)
    }
}

/// Outbound catalog view; secret-bearing property values are masked
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CatalogView {
    pub catalog_name: String,
    pub connector_name: String,
    pub properties: Properties,
    pub create_time: DateTime<Utc>,
}

impl CatalogView {
    pub fn redacted(definition: &CatalogDefinition, redactor: &Redactor) -> Self {
        Self {
            catalog_name: definition.catalog_name.clone(),
            connector_name: definition.connector_name.clone(),
            properties: redactor.redact(&definition.properties),
            create_time: definition.create_time,
        }
    }
}

/// Snapshot of a live cluster node
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NodeInfo {
    #[serde(rename = "nodeIdentifier")]
    pub identifier: String,
    #[serde(rename = "internalUri")]
    pub internal_uri: String,
    #[serde(rename = "nodeVersion")]
    pub version: String,
    pub coordinator: bool,
}

/// A catalog joined with the nodes currently serving it
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActiveCatalogView {
    #[serde(rename = "catalogEntity")]
    pub catalog: CatalogView,
    #[serde(rename = "internalNodes")]
    pub nodes: Vec<NodeInfo>,
}

/// Outcome of one item in a batch add
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BatchItemResult {
    pub catalog_name: String,
    pub connector_name: String,
    #[serde(rename = "state", default = "default_succeeded")]
    pub succeeded: bool,
    #[serde(rename = "msg", default)]
    pub message: String,
}

fn default_succeeded() -> bool {
    true
}

impl BatchItemResult {
    pub fn for_request(request: &CatalogRequest) -> Self {
        Self {
            catalog_name: request.catalog_name.clone(),
            connector_name: request.connector_name.clone(),
            succeeded: true,
            message: String::new(),
        }
    }

    pub(crate) fn trace(&mut self, msg: &str) -> &mut Self {
        self.message.push_str(msg);
        self
    }

    pub(crate) fn fail(&mut self, msg: &str) -> &mut Self {
        self.succeeded = false;
        self.trace(msg)
    }
}

/// Status code used by [`ApiResponse`] for success
pub const SUCCESS_CODE: u16 = 200;

/// Envelope wrapping every response handed to the request layer
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApiResponse<T> {
    pub code: u16,
    pub msg: Option<String>,
    pub data: Option<T>,
}

impl<T> ApiResponse<T> {
    pub fn ok(data: T) -> Self {
        Self {
            code: SUCCESS_CODE,
            msg: None,
            data: Some(data),
        }
    }

    pub fn error(code: u16, msg: impl Into<String>) -> Self {
        Self {
            code,
            msg: Some(msg.into()),
            data: None,
        }
    }

    pub fn is_success(&self) -> bool {
        self.code == SUCCESS_CODE
    }
}
