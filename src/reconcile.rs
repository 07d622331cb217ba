//! Reconciling index hit order with authoritative store rows.
//!
//! The index decides which products match and in what order; the store
//! decides what a product looks like. Store rows come back in the store's
//! own order, so they are put back into hit order here.

use std::sync::Arc;

use ahash::AHashMap;
use log::debug;
use serde::{Deserialize, Serialize};

use crate::compose::{ComposedQuery, ExecutedQuery};
use crate::error::Result;
use crate::index::{FacetCount, FacetCounts, SearchIndex};
use crate::product::{Product, ProductId};
use crate::store::{ProductStore, StoreQuery};

/// Products in index order, with the index's totals and facet counts.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ReconciledResult {
    /// Store rows ordered by index rank.
    pub products: Vec<Product>,
    /// Number of index matches across all pages.
    pub total_hits: u64,
    /// Facet counts reported by the index.
    pub facets: FacetCounts,
}

impl ReconciledResult {
    /// An empty result.
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.products.len()
    }

    pub fn is_empty(&self) -> bool {
        self.products.is_empty()
    }

    /// Product ids in result order.
    pub fn ids(&self) -> Vec<ProductId> {
        self.products.iter().map(|p| p.id).collect()
    }

    /// Counts of one facet.
    pub fn facet(&self, name: &str) -> Option<&[FacetCount]> {
        self.facets.get(name).map(Vec::as_slice)
    }

    /// Count of one facet value; zero when absent.
    pub fn facet_count(&self, name: &str, value: &str) -> u64 {
        self.facet(name)
            .and_then(|counts| counts.iter().find(|c| c.value == value))
            .map(|c| c.count)
            .unwrap_or(0)
    }
}

/// Narrow `base` to the ids an index matched.
///
/// With no ids the sentinel filter is used instead, so that a query the index
/// found nothing for can never widen to the whole base scope.
pub fn restrict_to_hits(base: StoreQuery, ids: &[ProductId]) -> StoreQuery {
    if ids.is_empty() {
        base.match_nothing()
    } else {
        base.filter_by_identifier_in(ids.to_vec())
    }
}

/// Order `rows` by the position of their id in `ids`.
///
/// Rows whose id is not in `ids` go last, keeping their relative order.
pub fn reorder_by_hits(mut rows: Vec<Product>, ids: &[ProductId]) -> Vec<Product> {
    let positions: AHashMap<ProductId, usize> = ids
        .iter()
        .enumerate()
        .map(|(pos, id)| (*id, pos))
        .rev()
        .collect();
    rows.sort_by_key(|row| positions.get(&row.id).copied().unwrap_or(usize::MAX));
    rows
}

/// Executes composed queries and materialises their hits from the store.
#[derive(Debug, Clone)]
pub struct Reconciler {
    index: Arc<dyn SearchIndex>,
    store: Arc<dyn ProductStore>,
}

impl Reconciler {
    pub fn new(index: Arc<dyn SearchIndex>, store: Arc<dyn ProductStore>) -> Self {
        Reconciler { index, store }
    }

    /// Execute `query` once and fetch its hits within `base`, in hit order.
    pub fn reconcile(&self, query: ComposedQuery, base: StoreQuery) -> Result<ReconciledResult> {
        let executed = query.execute(self.index.as_ref())?;
        self.reconcile_executed(executed, base)
    }

    /// Fetch the hits of an already executed query within `base`.
    pub fn reconcile_executed(
        &self,
        executed: ExecutedQuery,
        base: StoreQuery,
    ) -> Result<ReconciledResult> {
        let total_hits = executed.total();
        let ids = if total_hits == 0 {
            Vec::new()
        } else {
            executed.ids()
        };

        let store_query = restrict_to_hits(base, &ids);
        let rows = self.store.fetch(&store_query)?;
        let products = reorder_by_hits(rows, &ids);
        debug!(
            "reconciled {} of {} hit(s) against store query [{}]",
            products.len(),
            total_hits,
            store_query
        );

        Ok(ReconciledResult {
            products,
            total_hits,
            facets: executed.into_result().facets,
        })
    }
}
