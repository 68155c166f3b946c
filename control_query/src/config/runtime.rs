// RUNTIME PREFERENCES (User Experience)

use super::constants::compile_time::query::{
    DEFAULT_DEBOUNCE_MS, DEFAULT_PAGE_SIZE, MAX_DEBOUNCE_MS, MAX_PAGE_SIZE,
};
use super::error::ConfigError;
use crate::logging::{codes, LogLevel};
use crate::{log_error, log_success};
use crate::model::ImplementationStatus;
use crate::query::{SortDirection, SortKey, StatusRanking};
use serde::{Deserialize, Serialize};
use std::env;
use std::path::Path;
use std::time::Duration;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct QueryPreferences {
    /// Quiescent interval before a search edit is applied
    pub debounce_ms: u64,

    /// Controls per rendered page
    pub page_size: usize,

    /// Sort key applied when a session starts
    pub default_sort: SortKey,

    /// Sort direction applied when a session starts
    pub default_direction: SortDirection,

    /// Explicit status ordering for status sorts; empty keeps label order
    pub status_order: Vec<ImplementationStatus>,
}

impl Default for QueryPreferences {
    fn default() -> Self {
        Self {
            debounce_ms: env::var(env_vars::QUERY_DEBOUNCE_MS)
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(DEFAULT_DEBOUNCE_MS),
            page_size: env::var(env_vars::QUERY_PAGE_SIZE)
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(DEFAULT_PAGE_SIZE),
            default_sort: env::var(env_vars::QUERY_DEFAULT_SORT)
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or_default(),
            default_direction: env::var(env_vars::QUERY_DEFAULT_DIRECTION)
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or_default(),
            status_order: env::var(env_vars::QUERY_STATUS_ORDER)
                .ok()
                .map(|v| parse_status_list(&v))
                .unwrap_or_default(),
        }
    }
}

impl QueryPreferences {
    pub fn debounce_delay(&self) -> Duration {
        Duration::from_millis(self.debounce_ms)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.page_size == 0 || self.page_size > MAX_PAGE_SIZE {
            return Err(ConfigError::OutOfRange {
                key: "query.page_size",
                value: self.page_size as u64,
                min: 1,
                max: MAX_PAGE_SIZE as u64,
            });
        }

        if self.debounce_ms > MAX_DEBOUNCE_MS {
            return Err(ConfigError::OutOfRange {
                key: "query.debounce_ms",
                value: self.debounce_ms,
                min: 0,
                max: MAX_DEBOUNCE_MS,
            });
        }

        for (index, status) in self.status_order.iter().enumerate() {
            if self.status_order[..index].contains(status) {
                return Err(ConfigError::DuplicateStatus {
                    status: status.to_string(),
                });
            }
        }

        Ok(())
    }

    /// Ranking used by status sorts
    pub fn status_ranking(&self) -> StatusRanking {
        if self.status_order.is_empty() {
            StatusRanking::Lexical
        } else {
            StatusRanking::Ordered(self.status_order.clone())
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingPreferences {
    /// Whether to use structured JSON logging (user preference)
    pub use_structured_logging: bool,

    /// Whether to enable console output (user preference)
    pub enable_console_logging: bool,

    /// User preferred minimum log level
    pub min_log_level: LogLevel,
}

impl Default for LoggingPreferences {
    fn default() -> Self {
        Self {
            use_structured_logging: env::var(env_vars::LOGGING_USE_STRUCTURED)
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(false),
            enable_console_logging: env::var(env_vars::LOGGING_ENABLE_CONSOLE)
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(true),
            min_log_level: env::var(env_vars::LOGGING_MIN_LEVEL)
                .ok()
                .and_then(|v| LogLevel::parse(&v))
                .unwrap_or(LogLevel::Warning),
        }
    }
}

/// Complete runtime configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct RuntimeConfig {
    pub query: QueryPreferences,
    pub logging: LoggingPreferences,
}

impl RuntimeConfig {
    /// Parse a TOML document; omitted keys fall back to environment defaults
    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        let config: RuntimeConfig = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Load and validate a TOML configuration file
    pub fn load_from_path<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let result = std::fs::read_to_string(path)
            .map_err(|source| ConfigError::Io {
                path: path.display().to_string(),
                source,
            })
            .and_then(|content| Self::from_toml_str(&content));

        match &result {
            Ok(config) => log_success!(
                codes::success::CONFIGURATION_LOADED,
                "Runtime configuration loaded",
                "path" => path.display(),
                "page_size" => config.query.page_size,
                "debounce_ms" => config.query.debounce_ms
            ),
            Err(e) => log_error!(e.code(), &e.to_string(), "path" => path.display()),
        }

        result
    }

    /// Environment-defaulted configuration, checked against compile-time bounds
    pub fn from_env() -> Result<Self, ConfigError> {
        let config = Self::default();
        config.validate()?;
        Ok(config)
    }

    /// Check preferences against compile-time bounds
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.query.validate()
    }

    pub fn summary(&self) -> String {
        format!(
            "Runtime Configuration:\n\
             - Debounce: {}ms\n\
             - Page size: {}\n\
             - Default sort: {} ({})\n\
             - Status ranking: {}\n\
             - Min log level: {}\n\
             - Structured logging: {}",
            self.query.debounce_ms,
            self.query.page_size,
            self.query.default_sort,
            self.query.default_direction,
            self.query.status_ranking(),
            self.logging.min_log_level.as_str(),
            self.logging.use_structured_logging,
        )
    }
}

/// Comma separated status labels; unknown labels are dropped
fn parse_status_list(value: &str) -> Vec<ImplementationStatus> {
    value
        .split(',')
        .filter_map(|label| label.trim().parse().ok())
        .collect()
}

/// Environment variable names for configuration
pub mod env_vars {
    // Query
    pub const QUERY_DEBOUNCE_MS: &str = "CQ_QUERY_DEBOUNCE_MS";
    pub const QUERY_PAGE_SIZE: &str = "CQ_QUERY_PAGE_SIZE";
    pub const QUERY_DEFAULT_SORT: &str = "CQ_QUERY_DEFAULT_SORT";
    pub const QUERY_DEFAULT_DIRECTION: &str = "CQ_QUERY_DEFAULT_DIRECTION";
    pub const QUERY_STATUS_ORDER: &str = "CQ_QUERY_STATUS_ORDER";

    // Logging
    pub const LOGGING_USE_STRUCTURED: &str = "CQ_LOGGING_USE_STRUCTURED";
    pub const LOGGING_ENABLE_CONSOLE: &str = "CQ_LOGGING_ENABLE_CONSOLE";
    pub const LOGGING_MIN_LEVEL: &str = "CQ_LOGGING_MIN_LEVEL";
}
