//! Facet counts over the unfiltered catalog

use crate::model::{Control, ImplementationStatus};
use crate::tracker::StatusLookup;
use serde::ser::{Serialize, SerializeMap, Serializer};
use std::collections::BTreeMap;
use std::sync::Arc;

/// Count of controls per implementation status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct StatusFacets {
    counts: [usize; 5],
}

impl StatusFacets {
    pub fn get(&self, status: ImplementationStatus) -> usize {
        self.counts[status.index()]
    }

    pub fn total(&self) -> usize {
        self.counts.iter().sum()
    }

    /// Every status with its count, zero counts included
    pub fn iter(&self) -> impl Iterator<Item = (ImplementationStatus, usize)> + '_ {
        ImplementationStatus::ALL
            .iter()
            .map(move |status| (*status, self.get(*status)))
    }
}

impl Serialize for StatusFacets {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.counts.len()))?;
        for (status, count) in self.iter() {
            map.serialize_entry(status.as_str(), &count)?;
        }
        map.end()
    }
}

pub fn status_facets(controls: &[Arc<Control>], statuses: &dyn StatusLookup) -> StatusFacets {
    let mut facets = StatusFacets::default();
    for control in controls {
        facets.counts[statuses.status_of(control.id()).index()] += 1;
    }
    facets
}

/// Count of controls per family code, ordered by family
pub fn family_facets(controls: &[Arc<Control>]) -> BTreeMap<String, usize> {
    let mut facets = BTreeMap::new();
    for control in controls {
        *facets.entry(control.family().to_string()).or_insert(0) += 1;
    }
    facets
}
