//! # Control Query Pipeline
//!
//! Synchronous filter → sort → paginate pipeline over an in-memory catalog.
//! Every stage is a pure function of its explicit inputs; [`engine::QueryEngine`]
//! layers memoization on top without changing results.

pub mod engine;
pub mod facets;
pub mod filter;
pub mod highlight;
pub mod page;
pub mod sort;

pub use engine::{QueryEngine, QueryResult};
pub use facets::{family_facets, status_facets, StatusFacets};
pub use filter::{filter_controls, ControlFilter};
pub use highlight::{highlight, Segment};
pub use page::{paginate, Page};
pub use sort::{sort_controls, SortValue, StatusRanking};

use crate::model::{ImplementationStatus, ParseError};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Key a result list is ordered by
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SortKey {
    #[default]
    Id,
    #[serde(alias = "name")]
    Title,
    Family,
    Status,
    #[serde(alias = "last_updated", alias = "updated")]
    LastUpdated,
}

impl SortKey {
    pub const ALL: [SortKey; 5] = [
        SortKey::Id,
        SortKey::Title,
        SortKey::Family,
        SortKey::Status,
        SortKey::LastUpdated,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            SortKey::Id => "id",
            SortKey::Title => "title",
            SortKey::Family => "family",
            SortKey::Status => "status",
            SortKey::LastUpdated => "last-updated",
        }
    }
}

impl fmt::Display for SortKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SortKey {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "id" => Ok(SortKey::Id),
            "title" | "name" => Ok(SortKey::Title),
            "family" => Ok(SortKey::Family),
            "status" => Ok(SortKey::Status),
            "last-updated" | "last_updated" | "updated" | "lastupdated" => {
                Ok(SortKey::LastUpdated)
            }
            _ => Err(ParseError::UnknownSortKey {
                value: s.to_string(),
            }),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum SortDirection {
    #[default]
    #[serde(rename = "asc", alias = "ascending")]
    Ascending,
    #[serde(rename = "desc", alias = "descending")]
    Descending,
}

impl SortDirection {
    pub fn reversed(self) -> Self {
        match self {
            SortDirection::Ascending => SortDirection::Descending,
            SortDirection::Descending => SortDirection::Ascending,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            SortDirection::Ascending => "asc",
            SortDirection::Descending => "desc",
        }
    }
}

impl fmt::Display for SortDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SortDirection {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "asc" | "ascending" => Ok(SortDirection::Ascending),
            "desc" | "descending" => Ok(SortDirection::Descending),
            _ => Err(ParseError::UnknownDirection {
                value: s.to_string(),
            }),
        }
    }
}

/// The full set of inputs the pipeline derives a result from.
///
/// `family` and `status` of `None` mean "all". `search` is the already
/// debounced text; trimming and case folding happen in the filter stage.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, Serialize)]
pub struct Query {
    pub search: String,
    pub family: Option<String>,
    pub status: Option<ImplementationStatus>,
    pub sort_key: SortKey,
    pub direction: SortDirection,
}

impl Query {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_search(mut self, search: impl Into<String>) -> Self {
        self.search = search.into();
        self
    }

    /// Sentinel values `""` and `"all"` clear the family filter
    pub fn with_family(mut self, family: &str) -> Self {
        self.family = family_filter(family);
        self
    }

    pub fn with_status(mut self, status: Option<ImplementationStatus>) -> Self {
        self.status = status;
        self
    }

    pub fn sorted_by(mut self, key: SortKey, direction: SortDirection) -> Self {
        self.sort_key = key;
        self.direction = direction;
        self
    }

    /// Whether no predicate is active
    pub fn is_unfiltered(&self) -> bool {
        self.search.trim().is_empty() && self.family.is_none() && self.status.is_none()
    }
}

fn is_all_sentinel(value: &str) -> bool {
    let value = value.trim();
    value.is_empty() || value.eq_ignore_ascii_case("all")
}

/// Interpret a family selector, mapping the "all" sentinels to no filter
pub fn family_filter(value: &str) -> Option<String> {
    if is_all_sentinel(value) {
        None
    } else {
        Some(value.trim().to_string())
    }
}

/// Interpret a status selector, mapping the "all" sentinels to no filter
pub fn status_filter(value: &str) -> Result<Option<ImplementationStatus>, ParseError> {
    if is_all_sentinel(value) {
        Ok(None)
    } else {
        value.parse().map(Some)
    }
}
