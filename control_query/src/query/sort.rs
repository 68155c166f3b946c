//! Sort stage
//!
//! Keys are extracted once per control, then a stable sort orders the copy.
//! Descending inverts the comparator instead of reversing the output, so
//! equal keys keep their filtered order in both directions.

use super::{SortDirection, SortKey};
use crate::model::{Control, ImplementationStatus};
use crate::tracker::{epoch_start, StatusLookup, UpdatedLookup};
use chrono::NaiveDateTime;
use std::cmp::Ordering;
use std::fmt;
use std::sync::Arc;

/// How status sorts order the five statuses
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub enum StatusRanking {
    /// Compare display labels lexically
    #[default]
    Lexical,
    /// Listed statuses first, in list order; unlisted ones after, lexically
    Ordered(Vec<ImplementationStatus>),
}

impl StatusRanking {
    /// Workflow order from untouched to done
    pub fn workflow() -> Self {
        StatusRanking::Ordered(vec![
            ImplementationStatus::NotStarted,
            ImplementationStatus::InProgress,
            ImplementationStatus::NeedsReview,
            ImplementationStatus::Implemented,
            ImplementationStatus::Deferred,
        ])
    }

    fn rank(&self, status: ImplementationStatus) -> (usize, &'static str) {
        match self {
            StatusRanking::Lexical => (0, status.as_str()),
            StatusRanking::Ordered(order) => {
                let position = order
                    .iter()
                    .position(|candidate| *candidate == status)
                    .unwrap_or(order.len());
                (position, status.as_str())
            }
        }
    }
}

impl fmt::Display for StatusRanking {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StatusRanking::Lexical => f.write_str("lexical"),
            StatusRanking::Ordered(order) => {
                let labels: Vec<&str> = order.iter().map(|s| s.as_str()).collect();
                write!(f, "ordered({})", labels.join(" > "))
            }
        }
    }
}

/// Extracted comparison key of one control
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub enum SortValue {
    Text(String),
    Rank(usize, &'static str),
    Date(NaiveDateTime),
}

impl SortValue {
    pub fn of(
        control: &Control,
        key: SortKey,
        ranking: &StatusRanking,
        statuses: &dyn StatusLookup,
        updated: &dyn UpdatedLookup,
    ) -> Self {
        match key {
            SortKey::Id => SortValue::Text(control.id().to_string()),
            SortKey::Title => SortValue::Text(control.name().to_lowercase()),
            SortKey::Family => SortValue::Text(control.family().to_string()),
            SortKey::Status => {
                let (position, label) = ranking.rank(statuses.status_of(control.id()));
                SortValue::Rank(position, label)
            }
            SortKey::LastUpdated => {
                SortValue::Date(updated.last_updated(control.id()).unwrap_or_else(epoch_start))
            }
        }
    }

    /// Three-way comparison honoring `direction`
    pub fn compare(&self, other: &SortValue, direction: SortDirection) -> Ordering {
        let ordering = self.cmp(other);
        match direction {
            SortDirection::Ascending => ordering,
            SortDirection::Descending => ordering.reverse(),
        }
    }
}

/// Order `controls` by `key`, returning the sorted list
pub fn sort_controls(
    controls: Vec<Arc<Control>>,
    key: SortKey,
    direction: SortDirection,
    ranking: &StatusRanking,
    statuses: &dyn StatusLookup,
    updated: &dyn UpdatedLookup,
) -> Vec<Arc<Control>> {
    let mut keyed: Vec<(SortValue, Arc<Control>)> = controls
        .into_iter()
        .map(|control| (SortValue::of(&control, key, ranking, statuses, updated), control))
        .collect();

    keyed.sort_by(|(a, _), (b, _)| a.compare(b, direction));
    keyed.into_iter().map(|(_, control)| control).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tracker::{ConstantStatus, NoUpdates, TrackerData};
    use chrono::NaiveDate;

    fn date(y: i32, m: u32, d: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(y, m, d)
            .and_then(|day| day.and_hms_opt(0, 0, 0))
            .unwrap()
    }

    fn controls(specs: &[(&str, &str)]) -> Vec<Arc<Control>> {
        specs
            .iter()
            .map(|(id, name)| Arc::new(Control::new(*id, *name)))
            .collect()
    }

    fn ids(controls: &[Arc<Control>]) -> Vec<&str> {
        controls.iter().map(|c| c.id()).collect()
    }

    fn sort(
        items: Vec<Arc<Control>>,
        key: SortKey,
        direction: SortDirection,
        tracker: &TrackerData,
    ) -> Vec<Arc<Control>> {
        sort_controls(items, key, direction, &StatusRanking::Lexical, tracker, tracker)
    }

    #[test]
    fn test_sort_by_id_both_directions() {
        let items = controls(&[("AU-2", "b"), ("AC-2", "a"), ("SC-7", "c")]);
        let tracker = TrackerData::new();

        let asc = sort(items.clone(), SortKey::Id, SortDirection::Ascending, &tracker);
        assert_eq!(ids(&asc), vec!["AC-2", "AU-2", "SC-7"]);

        let desc = sort(items, SortKey::Id, SortDirection::Descending, &tracker);
        assert_eq!(ids(&desc), vec!["SC-7", "AU-2", "AC-2"]);
    }

    #[test]
    fn test_title_is_case_insensitive() {
        let items = controls(&[("X-1", "beta"), ("X-2", "Alpha"), ("X-3", "gamma")]);
        let sorted = sort(items, SortKey::Title, SortDirection::Ascending, &TrackerData::new());
        assert_eq!(ids(&sorted), vec!["X-2", "X-1", "X-3"]);
    }

    #[test]
    fn test_family_ties_keep_input_order() {
        let items = controls(&[("SC-7", ""), ("AC-3", ""), ("SC-1", ""), ("AC-2", "")]);
        let tracker = TrackerData::new();

        let asc = sort(items.clone(), SortKey::Family, SortDirection::Ascending, &tracker);
        assert_eq!(ids(&asc), vec!["AC-3", "AC-2", "SC-7", "SC-1"]);

        let desc = sort(items, SortKey::Family, SortDirection::Descending, &tracker);
        assert_eq!(ids(&desc), vec!["SC-7", "SC-1", "AC-3", "AC-2"]);
    }

    #[test]
    fn test_last_updated_missing_sorts_oldest() {
        let items = controls(&[("AC-2", ""), ("AU-2", ""), ("SC-7", "")]);
        let tracker = TrackerData::new()
            .with_last_updated("AC-2", date(2024, 1, 1))
            .with_last_updated("SC-7", date(2023, 6, 1));

        let desc = sort(items.clone(), SortKey::LastUpdated, SortDirection::Descending, &tracker);
        assert_eq!(ids(&desc), vec!["AC-2", "SC-7", "AU-2"]);

        let asc = sort(items, SortKey::LastUpdated, SortDirection::Ascending, &tracker);
        assert_eq!(ids(&asc), vec!["AU-2", "SC-7", "AC-2"]);
    }

    #[test]
    fn test_status_lexical_and_ordered() {
        let items = controls(&[("A-1", ""), ("A-2", ""), ("A-3", "")]);
        let tracker = TrackerData::new()
            .with_status("A-1", ImplementationStatus::NotStarted)
            .with_status("A-2", ImplementationStatus::Deferred)
            .with_status("A-3", ImplementationStatus::InProgress);

        let lexical = sort(items.clone(), SortKey::Status, SortDirection::Ascending, &tracker);
        assert_eq!(ids(&lexical), vec!["A-2", "A-3", "A-1"]);

        let ordered = sort_controls(
            items,
            SortKey::Status,
            SortDirection::Ascending,
            &StatusRanking::Ordered(vec![ImplementationStatus::InProgress]),
            &tracker,
            &tracker,
        );
        assert_eq!(ids(&ordered), vec!["A-3", "A-2", "A-1"]);
    }

    #[test]
    fn test_constant_status_keeps_order() {
        let items = controls(&[("SC-7", ""), ("AC-2", ""), ("AU-2", "")]);
        let sorted = sort_controls(
            items,
            SortKey::Status,
            SortDirection::Descending,
            &StatusRanking::workflow(),
            &ConstantStatus::default(),
            &NoUpdates,
        );
        assert_eq!(ids(&sorted), vec!["SC-7", "AC-2", "AU-2"]);
    }

    #[test]
    fn test_sort_is_permutation() {
        let items = controls(&[("B-1", "z"), ("A-1", "y"), ("C-1", "x"), ("A-2", "y")]);
        let sorted = sort(items.clone(), SortKey::Title, SortDirection::Descending, &TrackerData::new());
        assert_eq!(sorted.len(), items.len());
        for control in &items {
            assert!(sorted.iter().any(|c| Arc::ptr_eq(c, control)));
        }
    }

    #[test]
    fn test_ranking_display() {
        assert_eq!(StatusRanking::Lexical.to_string(), "lexical");
        assert_eq!(
            StatusRanking::Ordered(vec![
                ImplementationStatus::Implemented,
                ImplementationStatus::Deferred
            ])
            .to_string(),
            "ordered(Implemented > Deferred)"
        );
    }
}
