//! Value parsing errors shared by the model and query types

/// Raised when a user-supplied label does not name a known value
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ParseError {
    #[error("Unknown implementation status '{value}' (expected one of: {expected})")]
    UnknownStatus { value: String, expected: String },

    #[error("Unknown sort key '{value}' (expected one of: id, title, family, status, last-updated)")]
    UnknownSortKey { value: String },

    #[error("Unknown sort direction '{value}' (expected asc or desc)")]
    UnknownDirection { value: String },

    #[error("Unknown view mode '{value}' (expected card or table)")]
    UnknownViewMode { value: String },
}
