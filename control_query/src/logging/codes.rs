//! Consolidated event codes and classification
//!
//! Single source of truth for all codes emitted by the query engine and their metadata.

use std::collections::HashMap;
use std::sync::OnceLock;

// ============================================================================
// CODE WRAPPER TYPE
// ============================================================================

/// Universal code wrapper for both error and success codes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Code(&'static str);

impl Code {
    pub const fn new(code: &'static str) -> Self {
        Self(code)
    }

    pub fn as_str(&self) -> &'static str {
        self.0
    }
}

impl std::fmt::Display for Code {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

// ============================================================================
// CLASSIFICATION TYPES
// ============================================================================

/// Error severity levels
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Severity {
    Critical = 0,
    High = 1,
    Medium = 2,
    Low = 3,
}

impl Severity {
    pub fn as_str(&self) -> &'static str {
        match self {
            Severity::Critical => "Critical",
            Severity::High => "High",
            Severity::Medium => "Medium",
            Severity::Low => "Low",
        }
    }
}

/// Metadata attached to a code
#[derive(Debug, Clone)]
pub struct CodeMetadata {
    pub code: &'static str,
    pub category: &'static str,
    pub severity: Severity,
    pub recoverable: bool,
    pub description: &'static str,
    pub recommended_action: &'static str,
}

impl CodeMetadata {
    pub const fn new(
        code: &'static str,
        category: &'static str,
        severity: Severity,
        recoverable: bool,
        description: &'static str,
        recommended_action: &'static str,
    ) -> Self {
        Self {
            code,
            category,
            severity,
            recoverable,
            description,
            recommended_action,
        }
    }
}

// ============================================================================
// ERROR CODE CONSTANTS
// ============================================================================

/// System error codes
pub mod system {
    use super::Code;

    pub const INTERNAL_ERROR: Code = Code::new("ERR001");
}

/// Catalog loading codes
pub mod catalog {
    use super::Code;

    pub const FILE_READ_FAILED: Code = Code::new("E010");
    pub const FILE_TOO_LARGE: Code = Code::new("E011");
    pub const INVALID_JSON: Code = Code::new("E012");
    pub const MISSING_CONTROL_LIST: Code = Code::new("W013");
    pub const CONTROL_SKIPPED: Code = Code::new("W014");
    pub const NONSTANDARD_CONTROL_ID: Code = Code::new("D015");
    pub const CATALOG_TRUNCATED: Code = Code::new("W016");
}

/// Tracker data codes
pub mod tracker {
    use super::Code;

    pub const FILE_READ_FAILED: Code = Code::new("E020");
    pub const INVALID_JSON: Code = Code::new("E021");
    pub const UNKNOWN_STATUS: Code = Code::new("W022");
    pub const INVALID_DATE: Code = Code::new("W023");
}

/// Configuration codes
pub mod config {
    use super::Code;

    pub const INVALID_CONFIGURATION: Code = Code::new("E030");
    pub const FILE_READ_FAILED: Code = Code::new("E031");
}

/// Query pipeline codes
pub mod query {
    use super::Code;

    pub const SEARCH_TERM_TRUNCATED: Code = Code::new("W040");
    pub const RESULT_RECOMPUTED: Code = Code::new("D041");
    pub const CACHE_INVALIDATED: Code = Code::new("D042");
    pub const DEBOUNCE_FIRED: Code = Code::new("D043");
    pub const SELECTION_OUT_OF_RANGE: Code = Code::new("W044");
}

// ============================================================================
// SUCCESS CODE CONSTANTS
// ============================================================================

/// Success codes
pub mod success {
    use super::Code;

    pub const SYSTEM_INITIALIZATION_COMPLETED: Code = Code::new("I001");
    pub const CATALOG_LOADED: Code = Code::new("I010");
    pub const TRACKER_LOADED: Code = Code::new("I020");
    pub const CONFIGURATION_LOADED: Code = Code::new("I030");
    pub const QUERY_COMPLETED: Code = Code::new("I040");
    pub const CONTROL_SELECTED: Code = Code::new("I041");
}

// ============================================================================
// METADATA REGISTRY
// ============================================================================

static CODE_REGISTRY: OnceLock<HashMap<&'static str, CodeMetadata>> = OnceLock::new();

fn get_code_registry() -> &'static HashMap<&'static str, CodeMetadata> {
    CODE_REGISTRY.get_or_init(|| {
        let entries = [
            CodeMetadata::new(
                "ERR001",
                "System",
                Severity::Critical,
                false,
                "Critical internal error",
                "File a bug report with the logged context",
            ),
            CodeMetadata::new(
                "E010",
                "Catalog",
                Severity::High,
                true,
                "Control catalog file could not be read",
                "Verify the catalog path and file permissions",
            ),
            CodeMetadata::new(
                "E011",
                "Catalog",
                Severity::High,
                true,
                "Control catalog file exceeds the size limit",
                "Split the catalog or export a smaller baseline",
            ),
            CodeMetadata::new(
                "E012",
                "Catalog",
                Severity::High,
                true,
                "Control catalog is not valid JSON",
                "Re-export the catalog from the controls API",
            ),
            CodeMetadata::new(
                "W013",
                "Catalog",
                Severity::Medium,
                true,
                "Catalog payload has no control list; treated as empty",
                "Provide a JSON array or an object with a 'controls' array",
            ),
            CodeMetadata::new(
                "W014",
                "Catalog",
                Severity::Low,
                true,
                "Catalog entry without a usable identifier was skipped",
                "Ensure every control has an 'id' or 'control_id' string",
            ),
            CodeMetadata::new(
                "D015",
                "Catalog",
                Severity::Low,
                true,
                "Control identifier does not follow the NIST XX-N(N) shape",
                "No action required",
            ),
            CodeMetadata::new(
                "W016",
                "Catalog",
                Severity::Medium,
                true,
                "Catalog exceeded the maximum control count and was truncated",
                "Reduce the catalog size",
            ),
            CodeMetadata::new(
                "E020",
                "Tracker",
                Severity::High,
                true,
                "Tracker file could not be read",
                "Verify the tracker path and file permissions",
            ),
            CodeMetadata::new(
                "E021",
                "Tracker",
                Severity::High,
                true,
                "Tracker data is not valid JSON",
                "Re-export tracker data",
            ),
            CodeMetadata::new(
                "W022",
                "Tracker",
                Severity::Low,
                true,
                "Unknown implementation status label was ignored",
                "Use one of: Implemented, In Progress, Needs Review, Deferred, Not Started",
            ),
            CodeMetadata::new(
                "W023",
                "Tracker",
                Severity::Low,
                true,
                "Unparseable last-updated date was ignored",
                "Use YYYY-MM-DD or RFC 3339 timestamps",
            ),
            CodeMetadata::new(
                "E030",
                "Configuration",
                Severity::High,
                true,
                "Runtime configuration is invalid",
                "Fix the reported key in the configuration file",
            ),
            CodeMetadata::new(
                "E031",
                "Configuration",
                Severity::High,
                true,
                "Configuration file could not be read",
                "Check the --config path and its permissions",
            ),
            CodeMetadata::new(
                "W040",
                "Query",
                Severity::Low,
                true,
                "Search term exceeded the maximum length and was truncated",
                "Shorten the search term",
            ),
            CodeMetadata::new(
                "W044",
                "Query",
                Severity::Low,
                true,
                "Selection index is outside the current page",
                "No action required",
            ),
        ];

        entries
            .into_iter()
            .map(|metadata| (metadata.code, metadata))
            .collect()
    })
}

// ============================================================================
// CLASSIFICATION FUNCTIONS
// ============================================================================

pub fn get_code_metadata(code: &str) -> Option<&'static CodeMetadata> {
    get_code_registry().get(code)
}

pub fn get_severity(code: &str) -> Severity {
    get_code_registry()
        .get(code)
        .map(|metadata| metadata.severity)
        .unwrap_or(Severity::Medium)
}

pub fn is_recoverable(code: &str) -> bool {
    get_code_registry()
        .get(code)
        .map(|metadata| metadata.recoverable)
        .unwrap_or(true)
}

pub fn get_description(code: &str) -> &'static str {
    get_code_registry()
        .get(code)
        .map(|metadata| metadata.description)
        .unwrap_or("Unknown error")
}

pub fn get_action(code: &str) -> &'static str {
    get_code_registry()
        .get(code)
        .map(|metadata| metadata.recommended_action)
        .unwrap_or("No specific action available")
}

pub fn get_category(code: &str) -> &'static str {
    get_code_registry()
        .get(code)
        .map(|metadata| metadata.category)
        .unwrap_or("Unknown")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_registered_codes_have_metadata() {
        for code in [
            system::INTERNAL_ERROR,
            catalog::INVALID_JSON,
            catalog::MISSING_CONTROL_LIST,
            tracker::UNKNOWN_STATUS,
            config::INVALID_CONFIGURATION,
            config::FILE_READ_FAILED,
            query::SEARCH_TERM_TRUNCATED,
        ] {
            assert!(
                get_code_metadata(code.as_str()).is_some(),
                "missing metadata for {}",
                code
            );
        }
    }

    #[test]
    fn test_unknown_code_fallbacks() {
        assert_eq!(get_category("Z999"), "Unknown");
        assert_eq!(get_description("Z999"), "Unknown error");
        assert_eq!(get_severity("Z999"), Severity::Medium);
        assert!(is_recoverable("Z999"));
    }

    #[test]
    fn test_classification() {
        assert_eq!(get_category("E012"), "Catalog");
        assert_eq!(get_severity("ERR001"), Severity::Critical);
        assert!(!is_recoverable("ERR001"));
    }
}
