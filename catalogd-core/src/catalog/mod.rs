//! Catalog directory - the runtime registry of named data-source connections
//!
//! # Overview
//!
//! - [`CatalogDirectory`]: name → definition map, safe under concurrent requests
//! - [`Redactor`]: masks secret-bearing property values in outbound views
//! - [`NamePolicy`]: optional enforcement of the `{space}_{name}` convention
//!
//! Definitions are stored once and never altered in place; a replacement is a
//! new definition with a new creation time.

mod directory;
mod naming;
mod redact;
mod types;

pub use directory::CatalogDirectory;
pub use naming::NamePolicy;
pub use redact::{Redactor, DEFAULT_MASK, DEFAULT_SECRET_SUFFIX};
pub use types::{
    ActiveCatalogView, ApiResponse, BatchItemResult, CatalogDefinition, CatalogRequest,
    CatalogView, ConnectorId, NodeInfo, Properties, SUCCESS_CODE,
};
