//! Memoizing query engine
//!
//! Owns the catalog and the tracker lookups. Each input carries a generation
//! counter; derived values (families, status facets, the filtered and sorted
//! list) are cached against the generations they were computed from and are
//! rebuilt only when one of those inputs changes.

use super::facets::{family_facets, status_facets, StatusFacets};
use super::filter::filter_controls;
use super::sort::{sort_controls, StatusRanking};
use super::Query;
use crate::catalog::ControlCatalog;
use crate::log_debug;
use crate::logging::codes;
use crate::model::Control;
use crate::tracker::{ConstantStatus, NoUpdates, StatusLookup, UpdatedLookup};
use std::collections::BTreeMap;
use std::sync::Arc;

/// Filtered and sorted controls for one query
pub type QueryResult = Arc<[Arc<Control>]>;

/// Single-slot cache keyed on the inputs a value was derived from
#[derive(Debug)]
struct Memo<K, V> {
    slot: Option<(K, V)>,
    computations: u64,
}

impl<K: PartialEq, V: Clone> Memo<K, V> {
    fn new() -> Self {
        Self {
            slot: None,
            computations: 0,
        }
    }

    fn get_or_compute(&mut self, key: K, compute: impl FnOnce() -> V) -> V {
        if let Some((cached_key, value)) = &self.slot {
            if *cached_key == key {
                return value.clone();
            }
        }
        let value = compute();
        self.computations += 1;
        self.slot = Some((key, value.clone()));
        value
    }

    fn clear(&mut self) {
        self.slot = None;
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
struct Generations {
    catalog: u64,
    statuses: u64,
    updated: u64,
    ranking: u64,
}

pub struct QueryEngine {
    catalog: ControlCatalog,
    statuses: Arc<dyn StatusLookup>,
    updated: Arc<dyn UpdatedLookup>,
    ranking: StatusRanking,
    generations: Generations,
    families: Memo<u64, Arc<[String]>>,
    facets: Memo<(u64, u64), StatusFacets>,
    results: Memo<(Generations, Query), QueryResult>,
}

impl QueryEngine {
    /// Engine over `catalog` with every control reported as Not Started
    pub fn new(catalog: ControlCatalog) -> Self {
        Self {
            catalog,
            statuses: Arc::new(ConstantStatus::default()),
            updated: Arc::new(NoUpdates),
            ranking: StatusRanking::default(),
            generations: Generations::default(),
            families: Memo::new(),
            facets: Memo::new(),
            results: Memo::new(),
        }
    }

    pub fn with_status_lookup(mut self, statuses: Arc<dyn StatusLookup>) -> Self {
        self.set_status_lookup(statuses);
        self
    }

    pub fn with_updated_lookup(mut self, updated: Arc<dyn UpdatedLookup>) -> Self {
        self.set_updated_lookup(updated);
        self
    }

    pub fn with_ranking(mut self, ranking: StatusRanking) -> Self {
        self.set_ranking(ranking);
        self
    }

    pub fn catalog(&self) -> &ControlCatalog {
        &self.catalog
    }

    pub fn status_lookup(&self) -> &dyn StatusLookup {
        self.statuses.as_ref()
    }

    pub fn ranking(&self) -> &StatusRanking {
        &self.ranking
    }

    pub fn set_catalog(&mut self, catalog: ControlCatalog) {
        if catalog.ptr_eq(&self.catalog) {
            return;
        }
        self.catalog = catalog;
        self.generations.catalog += 1;
        log_debug!(
            codes::query::CACHE_INVALIDATED,
            "Catalog replaced",
            "controls" => self.catalog.len()
        );
    }

    pub fn set_status_lookup(&mut self, statuses: Arc<dyn StatusLookup>) {
        self.statuses = statuses;
        self.generations.statuses += 1;
        log_debug!(codes::query::CACHE_INVALIDATED, "Status lookup replaced");
    }

    pub fn set_updated_lookup(&mut self, updated: Arc<dyn UpdatedLookup>) {
        self.updated = updated;
        self.generations.updated += 1;
        log_debug!(codes::query::CACHE_INVALIDATED, "Last-updated lookup replaced");
    }

    pub fn set_ranking(&mut self, ranking: StatusRanking) {
        if ranking == self.ranking {
            return;
        }
        self.ranking = ranking;
        self.generations.ranking += 1;
        log_debug!(
            codes::query::CACHE_INVALIDATED,
            "Status ranking replaced",
            "ranking" => &self.ranking
        );
    }

    /// Drop every cached value
    pub fn invalidate(&mut self) {
        self.families.clear();
        self.facets.clear();
        self.results.clear();
    }

    /// Distinct family codes of the catalog, sorted
    pub fn families(&mut self) -> Arc<[String]> {
        let catalog = &self.catalog;
        self.families
            .get_or_compute(self.generations.catalog, || catalog.families().into())
    }

    /// Per-status counts over the whole catalog, independent of any filter
    pub fn status_facets(&mut self) -> StatusFacets {
        let catalog = &self.catalog;
        let statuses = self.statuses.as_ref();
        self.facets.get_or_compute(
            (self.generations.catalog, self.generations.statuses),
            || status_facets(catalog.controls(), statuses),
        )
    }

    pub fn family_facets(&self) -> BTreeMap<String, usize> {
        family_facets(self.catalog.controls())
    }

    /// Filter then sort the catalog for `query`
    pub fn run(&mut self, query: &Query) -> QueryResult {
        let catalog = &self.catalog;
        let statuses = self.statuses.as_ref();
        let updated = self.updated.as_ref();
        let ranking = &self.ranking;

        self.results
            .get_or_compute((self.generations, query.clone()), || {
                let filtered = filter_controls(catalog.controls(), query, statuses);
                let sorted = sort_controls(
                    filtered,
                    query.sort_key,
                    query.direction,
                    ranking,
                    statuses,
                    updated,
                );
                log_debug!(
                    codes::query::RESULT_RECOMPUTED,
                    "Result list recomputed",
                    "matched" => sorted.len(),
                    "total" => catalog.len(),
                    "sort" => query.sort_key,
                    "direction" => query.direction
                );
                sorted.into()
            })
    }

    /// How many times the result list has been rebuilt
    pub fn result_computations(&self) -> u64 {
        self.results.computations
    }

    pub fn facet_computations(&self) -> u64 {
        self.facets.computations
    }

    pub fn family_computations(&self) -> u64 {
        self.families.computations
    }
}

impl std::fmt::Debug for QueryEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("QueryEngine")
            .field("controls", &self.catalog.len())
            .field("ranking", &self.ranking)
            .field("generations", &self.generations)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::ImplementationStatus;
    use crate::query::{SortDirection, SortKey};
    use crate::tracker::TrackerData;

    fn catalog() -> ControlCatalog {
        ControlCatalog::new(vec![
            Control::new("SC-7", "Boundary Protection"),
            Control::new("AC-2", "Account Management"),
            Control::new("AU-2", "Event Logging"),
            Control::new("AC-3", "Access Enforcement"),
        ])
    }

    fn ids(result: &QueryResult) -> Vec<&str> {
        result.iter().map(|c| c.id()).collect()
    }

    #[test]
    fn test_run_filters_and_sorts() {
        let mut engine = QueryEngine::new(catalog());
        let result = engine.run(&Query::new().with_family("AC"));
        assert_eq!(ids(&result), vec!["AC-2", "AC-3"]);

        let result = engine.run(&Query::new().sorted_by(SortKey::Title, SortDirection::Descending));
        assert_eq!(ids(&result), vec!["AU-2", "SC-7", "AC-2", "AC-3"]);
    }

    #[test]
    fn test_id_descending_scenario() {
        let mut engine = QueryEngine::new(ControlCatalog::new(vec![
            Control::new("AC-2", "Account Mgmt"),
            Control::new("AU-2", "Audit Events"),
        ]));
        let result = engine.run(&Query::new().sorted_by(SortKey::Id, SortDirection::Descending));
        assert_eq!(ids(&result), vec!["AU-2", "AC-2"]);
    }

    #[test]
    fn test_empty_query_returns_every_control_in_id_order() {
        let mut engine = QueryEngine::new(ControlCatalog::new(vec![
            Control::new("AC-2", "Account Mgmt"),
            Control::new("AU-2", "Audit Events"),
        ]));
        let query = Query::new();
        assert_eq!(query.sort_key, SortKey::Id);
        assert_eq!(query.direction, SortDirection::Ascending);

        let result = engine.run(&query);
        assert_eq!(result.len(), engine.catalog().len());
        assert_eq!(ids(&result), vec!["AC-2", "AU-2"]);
    }

    #[test]
    fn test_empty_query_keeps_catalog_order_for_ties() {
        let mut engine = QueryEngine::new(catalog());
        let result = engine.run(&Query::new().sorted_by(SortKey::Status, SortDirection::Ascending));
        assert_eq!(ids(&result), vec!["SC-7", "AC-2", "AU-2", "AC-3"]);
    }

    #[test]
    fn test_descending_reverses_ascending_without_ties() {
        let mut engine = QueryEngine::new(catalog());
        for key in [SortKey::Id, SortKey::Title] {
            let asc = engine.run(&Query::new().sorted_by(key, SortDirection::Ascending));
            let desc = engine.run(&Query::new().sorted_by(key, SortDirection::Descending));
            let mut reversed = ids(&asc);
            reversed.reverse();
            assert_eq!(ids(&desc), reversed);
        }
    }

    #[test]
    fn test_sort_is_deterministic() {
        let query = Query::new().sorted_by(SortKey::Family, SortDirection::Descending);
        let first = QueryEngine::new(catalog()).run(&query);
        let second = QueryEngine::new(catalog()).run(&query);
        assert_eq!(ids(&first), ids(&second));
    }

    #[test]
    fn test_repeated_query_is_memoized() {
        let mut engine = QueryEngine::new(catalog());
        let query = Query::new().with_search("ac");

        let first = engine.run(&query);
        let second = engine.run(&query);
        assert!(Arc::ptr_eq(&first, &second));
        assert_eq!(engine.result_computations(), 1);

        engine.run(&Query::new());
        assert_eq!(engine.result_computations(), 2);
    }

    #[test]
    fn test_status_change_invalidates_results_and_facets() {
        let mut engine = QueryEngine::new(catalog());
        let query = Query::new().with_status(Some(ImplementationStatus::Implemented));

        assert!(engine.run(&query).is_empty());
        assert_eq!(engine.status_facets().get(ImplementationStatus::NotStarted), 4);

        engine.set_status_lookup(Arc::new(
            TrackerData::new().with_status("AU-2", ImplementationStatus::Implemented),
        ));
        assert_eq!(ids(&engine.run(&query)), vec!["AU-2"]);
        assert_eq!(engine.status_facets().get(ImplementationStatus::Implemented), 1);
        assert_eq!(engine.facet_computations(), 2);
    }

    #[test]
    fn test_facets_ignore_filters() {
        let mut engine = QueryEngine::new(catalog());
        engine.run(&Query::new().with_family("SC"));
        assert_eq!(engine.status_facets().total(), 4);
        assert_eq!(engine.family_facets().get("AC"), Some(&2));
    }

    #[test]
    fn test_families_memoized_until_catalog_changes() {
        let mut engine = QueryEngine::new(catalog());
        assert_eq!(&*engine.families(), &["AC", "AU", "SC"]);
        engine.families();
        assert_eq!(engine.family_computations(), 1);

        engine.set_catalog(engine.catalog().clone());
        engine.families();
        assert_eq!(engine.family_computations(), 1);

        engine.set_catalog(ControlCatalog::new(vec![Control::new("PM-1", "Program Plan")]));
        assert_eq!(&*engine.families(), &["PM"]);
        assert_eq!(engine.family_computations(), 2);
    }

    #[test]
    fn test_empty_catalog() {
        let mut engine = QueryEngine::new(ControlCatalog::empty());
        assert!(engine.run(&Query::new().with_search("anything")).is_empty());
        assert!(engine.families().is_empty());
        assert_eq!(engine.status_facets().total(), 0);
    }

    #[test]
    fn test_catalog_never_mutated() {
        let source = catalog();
        let mut engine = QueryEngine::new(source.clone());
        engine.run(&Query::new().sorted_by(SortKey::Id, SortDirection::Descending));
        let original: Vec<&str> = source.controls().iter().map(|c| c.id()).collect();
        assert_eq!(original, vec!["SC-7", "AC-2", "AU-2", "AC-3"]);
    }
}
