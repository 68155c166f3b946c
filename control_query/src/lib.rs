//! # Control Query - NIST 800-53 control browsing engine

// Internal modules
#[macro_use]
pub mod logging;
pub mod browser;
pub mod catalog;
pub mod config;
pub mod debounce;
pub mod model;
pub mod query;
pub mod tracker;

// Re-export key types for library consumers
pub use browser::{BrowserView, ControlBrowser, ViewMode};
pub use catalog::{CatalogError, ControlCatalog};
pub use config::{ConfigError, RuntimeConfig};
pub use model::{Control, ImplementationStatus, ParseError};
pub use query::{Query, QueryEngine, SortDirection, SortKey};
pub use tracker::{TrackerData, TrackerError};

pub mod prelude {
    pub use crate::browser::{BrowserView, ControlBrowser, SelectionHandler, ViewMode};
    pub use crate::catalog::ControlCatalog;
    pub use crate::config::{QueryPreferences, RuntimeConfig};
    pub use crate::debounce::{Clock, DebouncedValue, Debouncer, ManualClock, SystemClock};
    pub use crate::model::{family_code, Control, ImplementationStatus};
    pub use crate::query::{
        family_facets, filter_controls, highlight, paginate, sort_controls, status_facets, Page,
        Query, QueryEngine, Segment, SortDirection, SortKey, StatusFacets, StatusRanking,
    };
    pub use crate::tracker::{ConstantStatus, NoUpdates, StatusLookup, TrackerData, UpdatedLookup};
}
