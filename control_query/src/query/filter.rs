//! Conjunctive filter stage
//!
//! Predicates run in cost order (search text, family, status) and short-circuit.
//! Filtering never reorders: survivors keep their catalog order.

use super::Query;
use crate::config::compile_time::query::MAX_SEARCH_LENGTH;
use crate::logging::codes;
use crate::log_warning;
use crate::model::{Control, ImplementationStatus};
use crate::tracker::StatusLookup;
use std::sync::Arc;

/// Predicates of a query, normalized once per filter pass
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ControlFilter {
    needle: Option<String>,
    family: Option<String>,
    status: Option<ImplementationStatus>,
}

impl ControlFilter {
    pub fn from_query(query: &Query) -> Self {
        Self {
            needle: normalize_search(&query.search),
            family: query.family.clone(),
            status: query.status,
        }
    }

    /// Lowercased search needle, if a text predicate is active
    pub fn needle(&self) -> Option<&str> {
        self.needle.as_deref()
    }

    pub fn is_pass_through(&self) -> bool {
        self.needle.is_none() && self.family.is_none() && self.status.is_none()
    }

    pub fn matches(&self, control: &Control, statuses: &dyn StatusLookup) -> bool {
        self.matches_search(control)
            && self.matches_family(control)
            && self.matches_status(control, statuses)
    }

    /// Case-insensitive substring over id, name, intent and official text.
    /// Absent optional fields never match.
    pub fn matches_search(&self, control: &Control) -> bool {
        let Some(needle) = &self.needle else {
            return true;
        };

        control
            .searchable_fields()
            .into_iter()
            .flatten()
            .any(|field| field.to_lowercase().contains(needle.as_str()))
    }

    pub fn matches_family(&self, control: &Control) -> bool {
        match &self.family {
            Some(family) => control.family().eq_ignore_ascii_case(family),
            None => true,
        }
    }

    pub fn matches_status(&self, control: &Control, statuses: &dyn StatusLookup) -> bool {
        match self.status {
            Some(status) => statuses.status_of(control.id()) == status,
            None => true,
        }
    }
}

/// Trimmed search text cut to at most `MAX_SEARCH_LENGTH` characters
pub fn bounded_search(raw: &str) -> &str {
    let trimmed = raw.trim();
    match trimmed.char_indices().nth(MAX_SEARCH_LENGTH) {
        Some((end, _)) => &trimmed[..end],
        None => trimmed,
    }
}

/// Trim, bound and case-fold a raw search string; empty means no text filter
pub fn normalize_search(raw: &str) -> Option<String> {
    let bounded = bounded_search(raw);
    if bounded.is_empty() {
        return None;
    }

    if bounded.len() < raw.trim().len() {
        log_warning!(
            codes::query::SEARCH_TERM_TRUNCATED,
            "Search term truncated",
            "length" => raw.trim().chars().count(),
            "limit" => MAX_SEARCH_LENGTH
        );
    }

    Some(bounded.to_lowercase())
}

/// Reduce `controls` to those matching every active predicate of `query`.
///
/// Always returns a freshly allocated vector; the input slice is untouched.
pub fn filter_controls(
    controls: &[Arc<Control>],
    query: &Query,
    statuses: &dyn StatusLookup,
) -> Vec<Arc<Control>> {
    let filter = ControlFilter::from_query(query);
    if filter.is_pass_through() {
        return controls.to_vec();
    }

    controls
        .iter()
        .filter(|control| filter.matches(control, statuses))
        .cloned()
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tracker::{ConstantStatus, TrackerData};

    fn sample() -> Vec<Arc<Control>> {
        vec![
            Arc::new(
                Control::new("AC-2", "Account Mgmt").with_intent("Manage system accounts"),
            ),
            Arc::new(Control::new("AU-2", "Audit Events")),
            Arc::new(
                Control::new("SC-7", "Boundary Protection")
                    .with_official_text("Monitor communications at external ACCOUNT boundaries"),
            ),
            Arc::new(Control::new("AC-3", "Access Enforcement")),
        ]
    }

    fn ids(controls: &[Arc<Control>]) -> Vec<&str> {
        controls.iter().map(|c| c.id()).collect()
    }

    #[test]
    fn test_search_account_scenario() {
        let controls = vec![
            Arc::new(Control::new("AC-2", "Account Mgmt")),
            Arc::new(Control::new("AU-2", "Audit Events")),
        ];
        let result = filter_controls(
            &controls,
            &Query::new().with_search("account"),
            &ConstantStatus::default(),
        );
        assert_eq!(ids(&result), vec!["AC-2"]);
    }

    #[test]
    fn test_family_scenario() {
        let controls = vec![
            Arc::new(Control::new("AC-2", "Account Mgmt")),
            Arc::new(Control::new("AU-2", "Audit Events")),
        ];
        let result = filter_controls(
            &controls,
            &Query::new().with_family("AU"),
            &ConstantStatus::default(),
        );
        assert_eq!(ids(&result), vec!["AU-2"]);
    }

    #[test]
    fn test_search_covers_all_text_fields() {
        let statuses = ConstantStatus::default();
        let result = filter_controls(&sample(), &Query::new().with_search("ACCOUNT"), &statuses);
        assert_eq!(ids(&result), vec!["AC-2", "SC-7"]);

        let by_id = filter_controls(&sample(), &Query::new().with_search("sc-7"), &statuses);
        assert_eq!(ids(&by_id), vec!["SC-7"]);

        let by_intent =
            filter_controls(&sample(), &Query::new().with_search("system acc"), &statuses);
        assert_eq!(ids(&by_intent), vec!["AC-2"]);
    }

    #[test]
    fn test_blank_search_is_no_filter() {
        let result = filter_controls(
            &sample(),
            &Query::new().with_search("   \t"),
            &ConstantStatus::default(),
        );
        assert_eq!(ids(&result), vec!["AC-2", "AU-2", "SC-7", "AC-3"]);
    }

    #[test]
    fn test_family_match_is_exact_code() {
        let statuses = ConstantStatus::default();
        let lower = filter_controls(&sample(), &Query::new().with_family("ac"), &statuses);
        assert_eq!(ids(&lower), vec!["AC-2", "AC-3"]);

        let prefix = filter_controls(&sample(), &Query::new().with_family("A"), &statuses);
        assert!(prefix.is_empty());
    }

    #[test]
    fn test_status_filter_uses_lookup() {
        let tracker = TrackerData::new()
            .with_status("AC-2", ImplementationStatus::Implemented)
            .with_status("SC-7", ImplementationStatus::Implemented);

        let implemented = filter_controls(
            &sample(),
            &Query::new().with_status(Some(ImplementationStatus::Implemented)),
            &tracker,
        );
        assert_eq!(ids(&implemented), vec!["AC-2", "SC-7"]);

        let stub = filter_controls(
            &sample(),
            &Query::new().with_status(Some(ImplementationStatus::Implemented)),
            &ConstantStatus::default(),
        );
        assert!(stub.is_empty());
    }

    #[test]
    fn test_filter_is_idempotent() {
        let statuses = ConstantStatus::default();
        let query = Query::new().with_search("ac").with_family("AC");
        let once = filter_controls(&sample(), &query, &statuses);
        let twice = filter_controls(&once, &query, &statuses);
        assert_eq!(ids(&once), ids(&twice));
    }

    #[test]
    fn test_predicates_are_conjunctive() {
        let statuses = ConstantStatus::default();
        let controls = sample();
        let narrow = filter_controls(
            &controls,
            &Query::new().with_search("AC").with_family("AC"),
            &statuses,
        );
        let wide = filter_controls(&controls, &Query::new().with_search("AC"), &statuses);

        assert_eq!(ids(&narrow), vec!["AC-2", "AC-3"]);
        assert_eq!(ids(&wide), vec!["AC-2", "SC-7", "AC-3"]);
        for control in &narrow {
            assert!(wide.iter().any(|c| Arc::ptr_eq(c, control)));
        }
    }

    #[test]
    fn test_source_untouched_and_result_fresh() {
        let source = sample();
        let result = filter_controls(&source, &Query::new(), &ConstantStatus::default());
        assert_eq!(ids(&source), ids(&result));
        assert_ne!(source.as_ptr(), result.as_ptr());
    }

    #[test]
    fn test_normalize_search() {
        assert_eq!(normalize_search("  AC-2 "), Some("ac-2".to_string()));
        assert_eq!(normalize_search(""), None);
        let long = "a".repeat(MAX_SEARCH_LENGTH + 10);
        assert_eq!(
            normalize_search(&long).map(|s| s.chars().count()),
            Some(MAX_SEARCH_LENGTH)
        );
    }

    #[test]
    fn test_bounded_search() {
        assert_eq!(bounded_search("  Audit  "), "Audit");
        let exact = "é".repeat(MAX_SEARCH_LENGTH);
        assert_eq!(bounded_search(&exact), exact);
        let long = format!("{}xyz", "é".repeat(MAX_SEARCH_LENGTH));
        assert_eq!(bounded_search(&long), exact);
    }
}
