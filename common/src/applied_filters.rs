//! Ordered collection of applied filters; the source of truth for the removable filter tags.

use serde::{Deserialize, Serialize};

use crate::criteria::AppliedFilter;

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct AppliedFilterSet {
    filters: Vec<AppliedFilter>,
}

impl AppliedFilterSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends in order; indices of existing entries do not move.
    pub fn add(&mut self, filters: impl IntoIterator<Item = AppliedFilter>) {
        self.filters.extend(filters);
    }

    /// Full substitution, as done on every apply.
    pub fn replace(&mut self, filters: impl IntoIterator<Item = AppliedFilter>) {
        self.filters.clear();
        self.filters.extend(filters);
    }

    /// Removes exactly one entry, shifting later ones down. Out of range is a no-op.
    pub fn remove_at(&mut self, index: usize) -> Option<AppliedFilter> {
        if index >= self.filters.len() {
            return None;
        }
        Some(self.filters.remove(index))
    }

    pub fn clear(&mut self) {
        self.filters.clear();
    }

    pub fn len(&self) -> usize {
        self.filters.len()
    }

    pub fn is_empty(&self) -> bool {
        self.filters.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &AppliedFilter> {
        self.filters.iter()
    }

    pub fn as_slice(&self) -> &[AppliedFilter] {
        &self.filters
    }

    /// Engine fragments of the entries that have one, in set order.
    pub fn query_fragments(&self) -> Vec<String> {
        self.filters.iter().filter_map(|f| f.query_fragment()).collect()
    }
}

impl FromIterator<AppliedFilter> for AppliedFilterSet {
    fn from_iter<I: IntoIterator<Item = AppliedFilter>>(iter: I) -> Self {
        Self { filters: iter.into_iter().collect() }
    }
}
