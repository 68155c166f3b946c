//! Catalog loading errors

/// Errors raised while loading a control catalog.
///
/// Structural problems inside an otherwise valid JSON document (missing control
/// list, entries without identifiers) are not errors: they degrade to an empty
/// or partial catalog and are reported through logging.
#[derive(Debug, thiserror::Error)]
pub enum CatalogError {
    #[error("Failed to read catalog {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Catalog {path} is {size} bytes, exceeding the {limit} byte limit")]
    FileTooLarge { path: String, size: u64, limit: u64 },

    #[error("Catalog is not valid JSON: {0}")]
    Json(#[from] serde_json::Error),
}

impl CatalogError {
    /// Whether retrying with a corrected input could succeed
    pub fn is_recoverable(&self) -> bool {
        !matches!(self, CatalogError::Io { .. })
    }

    pub fn code(&self) -> crate::logging::Code {
        use crate::logging::codes::catalog;
        match self {
            CatalogError::Io { .. } => catalog::FILE_READ_FAILED,
            CatalogError::FileTooLarge { .. } => catalog::FILE_TOO_LARGE,
            CatalogError::Json(_) => catalog::INVALID_JSON,
        }
    }
}
