//! Catalog error types with clear, actionable messages

use thiserror::Error;

/// Errors surfaced by the catalog directory and its coordinators
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CatalogError {
    /// The requested catalog is not registered
    #[error("Catalog not found: {name}")]
    NotFound { name: String },

    /// The catalog name was rejected before reaching the connector layer
    #[error("Invalid catalog name '{name}': {reason}")]
    InvalidName { name: String, reason: String },

    /// The external connector create/drop call failed
    #[error("Connector lifecycle failure for catalog '{name}': {message}")]
    Lifecycle { name: String, message: String },

    /// The discovery transport holds no announcement of the expected type.
    ///
    /// This is a configuration error and must abort startup or refresh.
    #[error("Announcement of type '{kind}' not found (available: [{available}])")]
    AnnouncementMissing { kind: String, available: String },

    /// Replacing or broadcasting the announcement failed
    #[error("Discovery transport error: {message}")]
    Discovery { message: String },
}

impl CatalogError {
    /// Wrap a collaborator failure, keeping the whole error chain as text
    pub fn lifecycle(name: &str, err: &anyhow::Error) -> Self {
        CatalogError::Lifecycle {
            name: name.to_string(),
            message: format!("{err:#}"),
        }
    }

    /// Whether the caller should treat this as a "no such catalog" signal
    pub fn is_not_found(&self) -> bool {
        matches!(self, CatalogError::NotFound { .. })
    }

    /// HTTP-style status the request layer reports for this error
    pub fn status_code(&self) -> u16 {
        match self {
            CatalogError::NotFound { .. } => 404,
            CatalogError::InvalidName { .. } | CatalogError::Lifecycle { .. } => 400,
            CatalogError::AnnouncementMissing { .. } | CatalogError::Discovery { .. } => 500,
        }
    }

    /// Log errors that leave the node in an unusable state
    pub fn log_if_fatal(&self) {
        match self {
            CatalogError::AnnouncementMissing { .. } | CatalogError::Discovery { .. } => {
                tracing::error!(target: "announcement", "FATAL: {}", self);
            }
            _ => {}
        }
    }
}

pub type Result<T> = std::result::Result<T, CatalogError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lifecycle_keeps_context_chain() {
        let err = anyhow::anyhow!("connection refused").context("connect to mysql");
        let wrapped = CatalogError::lifecycle("t1", &err);
        assert_eq!(
            wrapped.to_string(),
            "Connector lifecycle failure for catalog 't1': connect to mysql: connection refused"
        );
        assert!(!wrapped.is_not_found());
    }

    #[test]
    fn not_found_is_flagged() {
        let err = CatalogError::NotFound {
            name: "missing".to_string(),
        };
        assert!(err.is_not_found());
        assert_eq!(err.to_string(), "Catalog not found: missing");
        assert_eq!(err.status_code(), 404);
    }

    #[test]
    fn announcement_errors_are_server_side() {
        let err = CatalogError::AnnouncementMissing {
            kind: "query-engine".to_string(),
            available: "http".to_string(),
        };
        assert_eq!(err.status_code(), 500);
        assert_eq!(
            err.to_string(),
            "Announcement of type 'query-engine' not found (available: [http])"
        );

        let err = CatalogError::Discovery {
            message: "force announce: unreachable".to_string(),
        };
        assert_eq!(err.status_code(), 500);
    }

    #[test]
    fn caller_errors_are_client_side() {
        let invalid = CatalogError::InvalidName {
            name: String::new(),
            reason: "catalog name must not be empty".to_string(),
        };
        assert_eq!(invalid.status_code(), 400);
        let lifecycle = CatalogError::lifecycle("t1", &anyhow::anyhow!("in use"));
        assert_eq!(lifecycle.status_code(), 400);
    }
}
