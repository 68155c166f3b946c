//! # Implementation Tracker
//!
//! Per-control status and last-updated lookups consumed by the query engine.
//! Lookups are injected behind traits so callers (and tests) can supply any
//! status map; [`ConstantStatus`] reproduces the historical "everything is
//! Not Started" stub.

pub mod error;

pub use error::TrackerError;

use crate::config::compile_time::catalog::MAX_FILE_SIZE;
use crate::logging::codes;
use crate::model::ImplementationStatus;
use crate::{log_error, log_success, log_warning};
use chrono::{DateTime, NaiveDate, NaiveDateTime};
use serde::Deserialize;
use std::collections::HashMap;
use std::path::Path;

/// Resolves the implementation status of a control id
pub trait StatusLookup: Send + Sync {
    fn status_of(&self, control_id: &str) -> ImplementationStatus;
}

/// Resolves when a control's tracker entry last changed
pub trait UpdatedLookup: Send + Sync {
    fn last_updated(&self, control_id: &str) -> Option<NaiveDateTime>;
}

impl<F> StatusLookup for F
where
    F: Fn(&str) -> ImplementationStatus + Send + Sync,
{
    fn status_of(&self, control_id: &str) -> ImplementationStatus {
        self(control_id)
    }
}

/// Every control reports the same status
#[derive(Debug, Clone, Copy, Default)]
pub struct ConstantStatus(pub ImplementationStatus);

impl StatusLookup for ConstantStatus {
    fn status_of(&self, _control_id: &str) -> ImplementationStatus {
        self.0
    }
}

/// No control has a recorded update
#[derive(Debug, Clone, Copy, Default)]
pub struct NoUpdates;

impl UpdatedLookup for NoUpdates {
    fn last_updated(&self, _control_id: &str) -> Option<NaiveDateTime> {
        None
    }
}

/// Date used for controls with no tracked update, so they sort as oldest
pub fn epoch_start() -> NaiveDateTime {
    NaiveDateTime::default()
}

/// Parse `YYYY-MM-DD`, naive `YYYY-MM-DDTHH:MM:SS`, or an RFC 3339 timestamp
pub fn parse_tracker_date(value: &str) -> Option<NaiveDateTime> {
    let value = value.trim();
    if let Ok(timestamp) = DateTime::parse_from_rfc3339(value) {
        return Some(timestamp.naive_utc());
    }
    if let Ok(datetime) = NaiveDateTime::parse_from_str(value, "%Y-%m-%dT%H:%M:%S%.f") {
        return Some(datetime);
    }
    NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
}

#[derive(Debug, Default, Deserialize)]
struct TrackerFile {
    #[serde(default)]
    statuses: HashMap<String, String>,
    #[serde(default, alias = "lastUpdated", alias = "dates")]
    last_updated: HashMap<String, String>,
}

/// Tracker export: statuses and last-updated dates keyed by control id
#[derive(Debug, Clone, Default)]
pub struct TrackerData {
    statuses: HashMap<String, ImplementationStatus>,
    last_updated: HashMap<String, NaiveDateTime>,
}

impl TrackerData {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_status(mut self, control_id: impl Into<String>, status: ImplementationStatus) -> Self {
        self.statuses.insert(control_id.into(), status);
        self
    }

    pub fn with_last_updated(mut self, control_id: impl Into<String>, at: NaiveDateTime) -> Self {
        self.last_updated.insert(control_id.into(), at);
        self
    }

    pub fn set_status(&mut self, control_id: impl Into<String>, status: ImplementationStatus) {
        self.statuses.insert(control_id.into(), status);
    }

    pub fn status_count(&self) -> usize {
        self.statuses.len()
    }

    pub fn date_count(&self) -> usize {
        self.last_updated.len()
    }

    /// Parse a tracker export. Unknown labels and bad dates are skipped.
    pub fn from_json_str(content: &str) -> Result<Self, TrackerError> {
        let file: TrackerFile = serde_json::from_str(content)?;
        let mut data = TrackerData::new();

        for (control_id, label) in file.statuses {
            match label.parse::<ImplementationStatus>() {
                Ok(status) => {
                    data.statuses.insert(control_id, status);
                }
                Err(_) => log_warning!(
                    codes::tracker::UNKNOWN_STATUS,
                    "Ignoring unknown status label",
                    "control" => control_id,
                    "status" => label
                ),
            }
        }

        for (control_id, raw) in file.last_updated {
            match parse_tracker_date(&raw) {
                Some(at) => {
                    data.last_updated.insert(control_id, at);
                }
                None => log_warning!(
                    codes::tracker::INVALID_DATE,
                    "Ignoring unparseable last-updated date",
                    "control" => control_id,
                    "value" => raw
                ),
            }
        }

        Ok(data)
    }

    pub fn load_from_path<P: AsRef<Path>>(path: P) -> Result<Self, TrackerError> {
        let path = path.as_ref();
        let result = read_bounded(path).and_then(|content| Self::from_json_str(&content));

        match &result {
            Ok(data) => log_success!(
                codes::success::TRACKER_LOADED,
                "Tracker data loaded",
                "path" => path.display(),
                "statuses" => data.status_count(),
                "dates" => data.date_count()
            ),
            Err(e) => log_error!(e.code(), &e.to_string(), "path" => path.display()),
        }

        result
    }
}

impl StatusLookup for TrackerData {
    fn status_of(&self, control_id: &str) -> ImplementationStatus {
        self.statuses.get(control_id).copied().unwrap_or_default()
    }
}

impl UpdatedLookup for TrackerData {
    fn last_updated(&self, control_id: &str) -> Option<NaiveDateTime> {
        self.last_updated.get(control_id).copied()
    }
}

fn read_bounded(path: &Path) -> Result<String, TrackerError> {
    let io_error = |source| TrackerError::Io {
        path: path.display().to_string(),
        source,
    };

    let size = std::fs::metadata(path).map_err(io_error)?.len();
    if size > MAX_FILE_SIZE {
        return Err(TrackerError::FileTooLarge {
            path: path.display().to_string(),
            size,
            limit: MAX_FILE_SIZE,
        });
    }

    std::fs::read_to_string(path).map_err(io_error)
}
