//! Configuration module for the control query engine
//!
//! Compile-time limits live in [`constants`]; user preferences in [`runtime`]
//! default from `CQ_*` environment variables and may be overridden by a TOML file.

pub mod constants;
pub mod error;
pub mod runtime;

pub use constants::compile_time;
pub use error::ConfigError;
pub use runtime::{LoggingPreferences, QueryPreferences, RuntimeConfig};
