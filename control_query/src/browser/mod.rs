//! # Control Browser
//!
//! One interactive browsing session: raw search input flows through the
//! debouncer into the query engine, and the sorted result is paginated into a
//! [`BrowserView`] for rendering as cards or a table.

use crate::config::QueryPreferences;
use crate::debounce::{Clock, DebouncedValue, SystemClock};
use crate::logging::codes;
use crate::model::{Control, ImplementationStatus, ParseError};
use crate::query::filter::bounded_search;
use crate::query::page::paginate;
use crate::query::{
    family_filter, highlight, Page, Query, QueryEngine, Segment, SortDirection, SortKey,
    StatusFacets,
};
use crate::{log_success, log_warning};
use serde::Serialize;
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ViewMode {
    #[default]
    Card,
    Table,
}

impl ViewMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            ViewMode::Card => "card",
            ViewMode::Table => "table",
        }
    }
}

impl fmt::Display for ViewMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ViewMode {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "card" | "cards" => Ok(ViewMode::Card),
            "table" | "list" => Ok(ViewMode::Table),
            _ => Err(ParseError::UnknownViewMode {
                value: s.to_string(),
            }),
        }
    }
}

/// Invoked with the control a user picks from the current page
pub type SelectionHandler = Box<dyn FnMut(&Control) + Send>;

/// Snapshot of everything a renderer needs for one frame
#[derive(Debug, Clone, Serialize)]
pub struct BrowserView {
    pub query: Query,
    /// Raw, possibly not yet applied, search input
    pub search_input: String,
    pub search_pending: bool,
    pub view_mode: ViewMode,
    pub page: Page<Arc<Control>>,
    pub total_controls: usize,
    pub families: Vec<String>,
    pub status_facets: StatusFacets,
}

impl BrowserView {
    /// Number of controls matching the applied query
    pub fn matched(&self) -> usize {
        self.page.total_items
    }

    /// Split `text` around the applied search term, bounded as the filter bounds it
    pub fn highlight<'a>(&self, text: &'a str) -> Vec<Segment<'a>> {
        highlight(text, bounded_search(&self.query.search))
    }
}

pub struct ControlBrowser {
    engine: QueryEngine,
    search_input: String,
    search: DebouncedValue<String>,
    family: Option<String>,
    status: Option<ImplementationStatus>,
    sort_key: SortKey,
    direction: SortDirection,
    view_mode: ViewMode,
    page: usize,
    page_size: usize,
    on_select: Option<SelectionHandler>,
    disposed: bool,
}

impl ControlBrowser {
    pub fn new(engine: QueryEngine, preferences: &QueryPreferences) -> Self {
        Self::with_clock(engine, preferences, Arc::new(SystemClock))
    }

    pub fn with_clock(
        mut engine: QueryEngine,
        preferences: &QueryPreferences,
        clock: Arc<dyn Clock>,
    ) -> Self {
        engine.set_ranking(preferences.status_ranking());
        Self {
            engine,
            search_input: String::new(),
            search: DebouncedValue::new(String::new(), preferences.debounce_delay(), clock),
            family: None,
            status: None,
            sort_key: preferences.default_sort,
            direction: preferences.default_direction,
            view_mode: ViewMode::default(),
            page: 0,
            page_size: preferences.page_size.max(1),
            on_select: None,
            disposed: false,
        }
    }

    pub fn on_select<F>(&mut self, handler: F)
    where
        F: FnMut(&Control) + Send + 'static,
    {
        self.on_select = Some(Box::new(handler));
    }

    pub fn engine(&self) -> &QueryEngine {
        &self.engine
    }

    pub fn engine_mut(&mut self) -> &mut QueryEngine {
        &mut self.engine
    }

    /// Query as currently applied, with the debounced search text
    pub fn query(&self) -> Query {
        Query {
            search: self.search.get().clone(),
            family: self.family.clone(),
            status: self.status,
            sort_key: self.sort_key,
            direction: self.direction,
        }
    }

    pub fn page_index(&self) -> usize {
        self.page
    }

    pub fn view_mode(&self) -> ViewMode {
        self.view_mode
    }

    /// Record a search edit; it applies once the input goes quiet
    pub fn type_search(&mut self, text: impl Into<String>) {
        if self.disposed {
            return;
        }
        self.search_input = text.into();
        self.search.set(self.search_input.clone());
    }

    /// Advance the debouncer. True when a settled search edit was applied.
    pub fn tick(&mut self) -> bool {
        if self.disposed || !self.search.tick() {
            return false;
        }
        self.page = 0;
        true
    }

    /// Apply the pending search edit without waiting
    pub fn submit_search(&mut self) -> bool {
        if self.disposed || !self.search.flush() {
            return false;
        }
        self.page = 0;
        true
    }

    pub fn clear_search(&mut self) {
        self.search_input.clear();
        self.search.reset(String::new());
        self.page = 0;
    }

    /// `""` or `"all"` clears the family filter
    pub fn set_family(&mut self, family: &str) {
        self.family = family_filter(family);
        self.page = 0;
    }

    pub fn set_status(&mut self, status: Option<ImplementationStatus>) {
        self.status = status;
        self.page = 0;
    }

    pub fn set_sort(&mut self, key: SortKey) {
        self.sort_key = key;
        self.page = 0;
    }

    pub fn set_direction(&mut self, direction: SortDirection) {
        self.direction = direction;
        self.page = 0;
    }

    pub fn toggle_direction(&mut self) {
        self.set_direction(self.direction.reversed());
    }

    pub fn set_view_mode(&mut self, mode: ViewMode) {
        self.view_mode = mode;
    }

    pub fn set_page_size(&mut self, page_size: usize) {
        self.page_size = page_size.max(1);
        self.page = 0;
    }

    pub fn next_page(&mut self) {
        let pages = self.total_pages();
        if self.page + 1 < pages {
            self.page += 1;
        }
    }

    pub fn prev_page(&mut self) {
        self.page = self.page.saturating_sub(1);
    }

    /// Jump to a zero-based page, clamped to the last page
    pub fn go_to_page(&mut self, page: usize) {
        self.page = page.min(self.total_pages().saturating_sub(1));
    }

    fn total_pages(&mut self) -> usize {
        let query = self.query();
        let matched = self.engine.run(&query).len();
        crate::query::page::page_count(matched, self.page_size)
    }

    pub fn view(&mut self) -> BrowserView {
        let query = self.query();
        let results = self.engine.run(&query);
        let page = paginate(&results, self.page, self.page_size);
        self.page = page.page;

        BrowserView {
            search_input: self.search_input.clone(),
            search_pending: self.search.is_pending(),
            view_mode: self.view_mode,
            total_controls: self.engine.catalog().len(),
            families: self.engine.families().to_vec(),
            status_facets: self.engine.status_facets(),
            page,
            query,
        }
    }

    /// Pick the control at `index` on the current page and notify the handler
    pub fn select(&mut self, index: usize) -> Option<Arc<Control>> {
        if self.disposed {
            return None;
        }

        let query = self.query();
        let results = self.engine.run(&query);
        let page = paginate(&results, self.page, self.page_size);
        let Some(control) = page.items.get(index).cloned() else {
            log_warning!(
                codes::query::SELECTION_OUT_OF_RANGE,
                "Selection outside the current page",
                "index" => index,
                "page_items" => page.items.len()
            );
            return None;
        };

        log_success!(
            codes::success::CONTROL_SELECTED,
            "Control selected",
            "id" => control.id()
        );
        if let Some(handler) = self.on_select.as_mut() {
            handler(&control);
        }
        Some(control)
    }

    /// Tear down the session: pending search edits are dropped, never applied
    pub fn dispose(&mut self) {
        self.search.dispose();
        self.on_select = None;
        self.disposed = true;
    }

    pub fn is_disposed(&self) -> bool {
        self.disposed
    }
}

impl fmt::Debug for ControlBrowser {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ControlBrowser")
            .field("engine", &self.engine)
            .field("query", &self.query())
            .field("page", &self.page)
            .field("page_size", &self.page_size)
            .field("view_mode", &self.view_mode)
            .field("disposed", &self.disposed)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::ControlCatalog;
    use crate::debounce::ManualClock;
    use crate::tracker::TrackerData;
    use std::sync::Mutex;
    use std::time::Duration;

    fn preferences(page_size: usize) -> QueryPreferences {
        QueryPreferences {
            debounce_ms: 300,
            page_size,
            default_sort: SortKey::Id,
            default_direction: SortDirection::Ascending,
            status_order: Vec::new(),
        }
    }

    fn browser(page_size: usize) -> (ControlBrowser, ManualClock) {
        let catalog = ControlCatalog::new(vec![
            Control::new("AC-2", "Account Management"),
            Control::new("AC-3", "Access Enforcement"),
            Control::new("AU-2", "Event Logging"),
            Control::new("AU-6", "Audit Review"),
            Control::new("SC-7", "Boundary Protection"),
        ]);
        let clock = ManualClock::new();
        let browser = ControlBrowser::with_clock(
            QueryEngine::new(catalog),
            &preferences(page_size),
            Arc::new(clock.clone()),
        );
        (browser, clock)
    }

    fn page_ids(view: &BrowserView) -> Vec<String> {
        view.page.items.iter().map(|c| c.id().to_string()).collect()
    }

    #[test]
    fn test_search_applies_after_debounce() {
        let (mut browser, clock) = browser(12);
        browser.type_search("acc");
        clock.advance(Duration::from_millis(100));
        browser.type_search("account");

        let view = browser.view();
        assert!(view.search_pending);
        assert_eq!(view.matched(), 5);
        assert_eq!(view.search_input, "account");

        clock.advance(Duration::from_millis(299));
        assert!(!browser.tick());
        clock.advance(Duration::from_millis(1));
        assert!(browser.tick());

        let view = browser.view();
        assert!(!view.search_pending);
        assert_eq!(page_ids(&view), vec!["AC-2"]);
    }

    #[test]
    fn test_paging_and_reset_on_filter_change() {
        let (mut browser, _clock) = browser(2);
        assert_eq!(browser.view().page.total_pages, 3);

        browser.next_page();
        browser.next_page();
        browser.next_page();
        assert_eq!(browser.page_index(), 2);
        assert_eq!(page_ids(&browser.view()), vec!["SC-7"]);

        browser.set_family("AU");
        assert_eq!(browser.page_index(), 0);
        assert_eq!(page_ids(&browser.view()), vec!["AU-2", "AU-6"]);

        browser.go_to_page(1);
        browser.toggle_direction();
        assert_eq!(browser.page_index(), 0);
        assert_eq!(page_ids(&browser.view()), vec!["AU-6", "AU-2"]);

        browser.prev_page();
        assert_eq!(browser.page_index(), 0);
    }

    #[test]
    fn test_go_to_page_clamps() {
        let (mut browser, _clock) = browser(2);
        browser.go_to_page(40);
        assert_eq!(browser.page_index(), 2);
    }

    #[test]
    fn test_status_filter_and_facets() {
        let (mut browser, _clock) = browser(12);
        browser.engine_mut().set_status_lookup(Arc::new(
            TrackerData::new().with_status("SC-7", ImplementationStatus::Implemented),
        ));
        browser.set_status(Some(ImplementationStatus::Implemented));

        let view = browser.view();
        assert_eq!(page_ids(&view), vec!["SC-7"]);
        assert_eq!(view.status_facets.get(ImplementationStatus::NotStarted), 4);
        assert_eq!(view.families, vec!["AC", "AU", "SC"]);
        assert_eq!(view.total_controls, 5);
    }

    #[test]
    fn test_select_invokes_handler() {
        let (mut browser, _clock) = browser(2);
        let picked = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&picked);
        browser.on_select(move |control| {
            sink.lock().unwrap().push(control.id().to_string());
        });

        browser.next_page();
        assert_eq!(browser.select(1).map(|c| c.id().to_string()), Some("AU-6".to_string()));
        assert!(browser.select(5).is_none());
        assert_eq!(*picked.lock().unwrap(), vec!["AU-6"]);
    }

    #[test]
    fn test_dispose_drops_pending_search() {
        let (mut browser, clock) = browser(12);
        browser.type_search("boundary");
        browser.dispose();
        clock.advance(Duration::from_secs(1));

        assert!(!browser.tick());
        assert!(browser.select(0).is_none());
        assert_eq!(browser.view().matched(), 5);
        assert!(browser.is_disposed());
    }

    #[test]
    fn test_view_highlights_applied_term() {
        let (mut browser, _clock) = browser(12);
        browser.type_search("event");
        assert!(browser.submit_search());

        let view = browser.view();
        let segments = view.highlight("Event Logging");
        assert!(segments[0].matched);
        assert_eq!(segments[0].text, "Event");
    }

    #[test]
    fn test_oversized_search_still_highlights_match() {
        use crate::config::compile_time::query::MAX_SEARCH_LENGTH;

        let name = "a".repeat(MAX_SEARCH_LENGTH + 1);
        let catalog = ControlCatalog::new(vec![
            Control::new("PM-9", name.clone()),
            Control::new("AU-2", "Event Logging"),
        ]);
        let mut browser = ControlBrowser::with_clock(
            QueryEngine::new(catalog),
            &preferences(12),
            Arc::new(ManualClock::new()),
        );
        browser.type_search("a".repeat(MAX_SEARCH_LENGTH + 3));
        assert!(browser.submit_search());

        let view = browser.view();
        assert_eq!(page_ids(&view), vec!["PM-9"]);
        let segments = view.highlight(&name);
        assert_eq!(segments.len(), 2);
        assert!(segments[0].matched);
        assert_eq!(segments[0].text.len(), MAX_SEARCH_LENGTH);
        assert!(!segments[1].matched);
    }

    #[test]
    fn test_view_mode_parse() {
        assert_eq!("TABLE".parse::<ViewMode>().unwrap(), ViewMode::Table);
        assert!("grid".parse::<ViewMode>().is_err());
        let (mut browser, _clock) = browser(12);
        browser.set_view_mode(ViewMode::Table);
        assert_eq!(browser.view().view_mode, ViewMode::Table);
    }
}
