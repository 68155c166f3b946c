//! # Control Catalog
//!
//! Immutable, cheaply clonable set of controls handed to the query engine.
//! Catalogs are built once per session from the controls API payload and are
//! never mutated by any query stage.

pub mod error;
pub mod loader;

pub use error::CatalogError;
pub use loader::is_standard_control_id;

use crate::config::compile_time::catalog::MAX_FILE_SIZE;
use crate::logging::codes;
use crate::model::Control;
use crate::{log_error, log_success};
use std::collections::BTreeSet;
use std::path::Path;
use std::sync::Arc;

#[derive(Debug, Clone)]
pub struct ControlCatalog {
    controls: Arc<[Arc<Control>]>,
}

impl Default for ControlCatalog {
    fn default() -> Self {
        Self {
            controls: Arc::from(Vec::new()),
        }
    }
}

impl ControlCatalog {
    pub fn new(controls: Vec<Control>) -> Self {
        Self {
            controls: controls.into_iter().map(Arc::new).collect(),
        }
    }

    pub fn empty() -> Self {
        Self::default()
    }

    /// Decode a payload that is already parsed
    pub fn from_json_value(payload: &serde_json::Value) -> Self {
        Self::new(loader::decode_controls(payload))
    }

    /// Parse a controls-API response body
    pub fn from_json_str(content: &str) -> Result<Self, CatalogError> {
        let payload: serde_json::Value = serde_json::from_str(content)?;
        Ok(Self::from_json_value(&payload))
    }

    /// Load a catalog file exported from the controls API
    pub fn load_from_path<P: AsRef<Path>>(path: P) -> Result<Self, CatalogError> {
        let path = path.as_ref();
        let result = read_bounded(path).and_then(|content| Self::from_json_str(&content));

        match &result {
            Ok(catalog) => log_success!(
                codes::success::CATALOG_LOADED,
                "Control catalog loaded",
                "path" => path.display(),
                "controls" => catalog.len()
            ),
            Err(e) => log_error!(e.code(), &e.to_string(), "path" => path.display()),
        }

        result
    }

    pub fn controls(&self) -> &[Arc<Control>] {
        &self.controls
    }

    pub fn len(&self) -> usize {
        self.controls.len()
    }

    pub fn is_empty(&self) -> bool {
        self.controls.is_empty()
    }

    pub fn get(&self, control_id: &str) -> Option<&Arc<Control>> {
        self.controls.iter().find(|control| control.id() == control_id)
    }

    /// Distinct family codes, sorted
    pub fn families(&self) -> Vec<String> {
        self.controls
            .iter()
            .map(|control| control.family())
            .collect::<BTreeSet<_>>()
            .into_iter()
            .map(str::to_string)
            .collect()
    }

    /// Whether two handles share the same underlying control list
    pub fn ptr_eq(&self, other: &ControlCatalog) -> bool {
        Arc::ptr_eq(&self.controls, &other.controls)
    }
}

impl From<Vec<Control>> for ControlCatalog {
    fn from(controls: Vec<Control>) -> Self {
        Self::new(controls)
    }
}

fn read_bounded(path: &Path) -> Result<String, CatalogError> {
    let io_error = |source| CatalogError::Io {
        path: path.display().to_string(),
        source,
    };

    let size = std::fs::metadata(path).map_err(io_error)?.len();
    if size > MAX_FILE_SIZE {
        return Err(CatalogError::FileTooLarge {
            path: path.display().to_string(),
            size,
            limit: MAX_FILE_SIZE,
        });
    }

    std::fs::read_to_string(path).map_err(io_error)
}
