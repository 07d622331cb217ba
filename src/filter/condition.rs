//! Parsing caller facet filters and injecting them into a composed query.
//!
//! Selecting a value under a facet must not collapse that facet's own counts
//! to the selected value. Each clause therefore names the facet it is
//! excluded from (by default its own), and [`FilterConditions::build_search`]
//! wires that exclusion into the facet request.

use std::collections::BTreeMap;

use log::{debug, warn};
use serde_json::{Map, Value};

use crate::compose::ComposedQuery;
use crate::filter::clause::FilterClause;
use crate::params::FilterValue;

/// The facet filter clauses of one request, keyed by facet.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FilterConditions {
    clauses: BTreeMap<String, FilterClause>,
}

impl FilterConditions {
    /// Create an empty set of conditions.
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse raw caller filters into sticky clauses.
    ///
    /// A value that is neither a scalar, a list nor a range is dropped with a
    /// warning; the remaining filters still apply.
    pub fn parse(raw: &Map<String, Value>) -> Self {
        let mut conditions = FilterConditions::new();
        for (facet, value) in raw {
            match FilterValue::from_raw(value) {
                Some(value) => conditions.insert(FilterClause::new(facet.clone(), value)),
                None => warn!("dropping malformed filter value for facet '{facet}': {value}"),
            }
        }
        conditions
    }

    /// Build conditions from ready clauses. A later clause on the same facet
    /// replaces an earlier one.
    pub fn from_clauses<I: IntoIterator<Item = FilterClause>>(clauses: I) -> Self {
        let mut conditions = FilterConditions::new();
        for clause in clauses {
            conditions.insert(clause);
        }
        conditions
    }

    /// Add or replace the clause for a facet.
    pub fn insert(&mut self, clause: FilterClause) {
        self.clauses.insert(clause.facet.clone(), clause);
    }

    /// Stop excluding `facet`'s clause from any facet's counts.
    pub fn non_sticky(mut self, facet: &str) -> Self {
        if let Some(clause) = self.clauses.get_mut(facet) {
            clause.exclusion = None;
        }
        self
    }

    /// The clause for a facet.
    pub fn get(&self, facet: &str) -> Option<&FilterClause> {
        self.clauses.get(facet)
    }

    /// Clauses in facet-name order.
    pub fn clauses(&self) -> impl Iterator<Item = &FilterClause> {
        self.clauses.values()
    }

    /// Number of clauses, empty ones included.
    pub fn len(&self) -> usize {
        self.clauses.len()
    }

    pub fn is_empty(&self) -> bool {
        self.clauses.is_empty()
    }

    /// The clause to leave out when counting `facet`, if any.
    pub fn exclusion(&self, facet: &str) -> Option<&FilterClause> {
        self.clauses
            .values()
            .find(|clause| !clause.is_empty() && clause.exclusion.as_deref() == Some(facet))
    }

    /// Inject the clauses into `query` and wire facet exclusions.
    ///
    /// Clauses without values are skipped. Ranged facets keep every filter:
    /// each bucket is counted within the filtered set. Calling this again on
    /// the same query changes nothing.
    pub fn build_search(&self, mut query: ComposedQuery) -> ComposedQuery {
        if query.conditions_applied() {
            debug!("filter conditions already applied; leaving query unchanged");
            return query;
        }

        let index_query = query.index_query_mut();
        for clause in self.clauses.values().filter(|c| !c.is_empty()) {
            index_query.filter(clause.to_index_filter());
        }
        for facet in index_query.facets_mut() {
            if !facet.buckets.is_empty() {
                continue;
            }
            if let Some(clause) = self.exclusion(&facet.name) {
                facet.exclude(clause.tag());
            }
        }

        debug!(
            "applied {} filter clause(s): {}",
            self.clauses.values().filter(|c| !c.is_empty()).count(),
            query.description()
        );
        query.mark_conditions_applied();
        query
    }
}
