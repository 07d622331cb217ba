//! Composed and executed queries.

use log::debug;

use crate::error::Result;
use crate::index::{FacetCount, FacetCounts, IndexHit, IndexQuery, IndexResult, SearchIndex};
use crate::params::Page;
use crate::product::ProductId;

/// A query ready to run, consumed by [`ComposedQuery::execute`].
///
/// Filter conditions may be injected with
/// [`FilterConditions::build_search`](crate::filter::FilterConditions::build_search)
/// before execution.
#[derive(Debug, PartialEq)]
pub struct ComposedQuery {
    name: String,
    query: IndexQuery,
    conditions_applied: bool,
}

impl ComposedQuery {
    pub(crate) fn new<S: Into<String>>(name: S, query: IndexQuery) -> Self {
        ComposedQuery {
            name: name.into(),
            query,
            conditions_applied: false,
        }
    }

    /// Name of the configuration the query was composed from.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The index request this query sends.
    pub fn index_query(&self) -> &IndexQuery {
        &self.query
    }

    pub(crate) fn index_query_mut(&mut self) -> &mut IndexQuery {
        &mut self.query
    }

    /// Whether filter conditions were already injected.
    pub fn conditions_applied(&self) -> bool {
        self.conditions_applied
    }

    pub(crate) fn mark_conditions_applied(&mut self) {
        self.conditions_applied = true;
    }

    pub fn description(&self) -> String {
        format!("{}: {}", self.name, self.query.description())
    }

    /// Send the query to `index`.
    pub fn execute(self, index: &dyn SearchIndex) -> Result<ExecutedQuery> {
        let result = index.execute(&self.query)?;
        debug!(
            "{} matched {} document(s), {} on this page",
            self.name,
            result.total,
            result.hits.len()
        );
        Ok(ExecutedQuery {
            page: self.query.page(),
            result,
        })
    }
}

/// The outcome of an executed query.
#[derive(Debug, Clone, PartialEq)]
pub struct ExecutedQuery {
    page: Page,
    result: IndexResult,
}

impl ExecutedQuery {
    /// Hits of the requested page, in engine order.
    pub fn hits(&self) -> &[IndexHit] {
        &self.result.hits
    }

    /// Hit ids in engine order.
    pub fn ids(&self) -> Vec<ProductId> {
        self.result.ids()
    }

    /// Total number of matches across all pages.
    pub fn total(&self) -> u64 {
        self.result.total
    }

    pub fn facets(&self) -> &FacetCounts {
        &self.result.facets
    }

    /// Counts of one facet.
    pub fn facet(&self, name: &str) -> Option<&[FacetCount]> {
        self.result.facet(name)
    }

    /// The page that was requested.
    pub fn page(&self) -> Page {
        self.page
    }

    pub fn into_result(self) -> IndexResult {
        self.result
    }
}

impl From<IndexResult> for ExecutedQuery {
    /// Wrap a raw index result, treating it as a single page.
    fn from(result: IndexResult) -> Self {
        ExecutedQuery {
            page: Page::new(1, result.hits.len()),
            result,
        }
    }
}
