//! Configuration errors

/// Errors raised while loading or validating runtime configuration
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read configuration file {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid TOML configuration: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("{key} = {value} is outside the allowed range {min}..={max}")]
    OutOfRange {
        key: &'static str,
        value: u64,
        min: u64,
        max: u64,
    },

    #[error("Status '{status}' appears more than once in query.status_order")]
    DuplicateStatus { status: String },
}

impl ConfigError {
    pub fn code(&self) -> crate::logging::Code {
        use crate::logging::codes::config;
        match self {
            ConfigError::Io { .. } => config::FILE_READ_FAILED,
            ConfigError::Toml(_)
            | ConfigError::OutOfRange { .. }
            | ConfigError::DuplicateStatus { .. } => config::INVALID_CONFIGURATION,
        }
    }
}
