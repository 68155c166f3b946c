//! Implementation status of a control

use super::error::ParseError;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

/// Fixed set of implementation states a tracker can report for a control
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ImplementationStatus {
    Implemented,
    InProgress,
    NeedsReview,
    Deferred,
    NotStarted,
}

impl ImplementationStatus {
    /// Every status, in declaration order. Facet buckets follow this order.
    pub const ALL: [ImplementationStatus; 5] = [
        ImplementationStatus::Implemented,
        ImplementationStatus::InProgress,
        ImplementationStatus::NeedsReview,
        ImplementationStatus::Deferred,
        ImplementationStatus::NotStarted,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ImplementationStatus::Implemented => "Implemented",
            ImplementationStatus::InProgress => "In Progress",
            ImplementationStatus::NeedsReview => "Needs Review",
            ImplementationStatus::Deferred => "Deferred",
            ImplementationStatus::NotStarted => "Not Started",
        }
    }

    /// Position in [`ImplementationStatus::ALL`]
    pub fn index(&self) -> usize {
        match self {
            ImplementationStatus::Implemented => 0,
            ImplementationStatus::InProgress => 1,
            ImplementationStatus::NeedsReview => 2,
            ImplementationStatus::Deferred => 3,
            ImplementationStatus::NotStarted => 4,
        }
    }
}

impl Default for ImplementationStatus {
    fn default() -> Self {
        ImplementationStatus::NotStarted
    }
}

impl fmt::Display for ImplementationStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ImplementationStatus {
    type Err = ParseError;

    /// Case-insensitive; `_` and `-` are accepted in place of spaces
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized: String = s
            .trim()
            .chars()
            .map(|c| match c {
                '_' | '-' => ' ',
                other => other.to_ascii_lowercase(),
            })
            .collect();

        ImplementationStatus::ALL
            .into_iter()
            .find(|status| status.as_str().to_ascii_lowercase() == normalized)
            .ok_or_else(|| ParseError::UnknownStatus {
                value: s.to_string(),
                expected: ImplementationStatus::ALL
                    .iter()
                    .map(|status| status.as_str())
                    .collect::<Vec<_>>()
                    .join(", "),
            })
    }
}

impl Serialize for ImplementationStatus {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for ImplementationStatus {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let label = String::deserialize(deserializer)?;
        label.parse().map_err(serde::de::Error::custom)
    }
}
