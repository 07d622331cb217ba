//! Similar products in the order the index ranks them.

use std::sync::Arc;

use log::debug;

use crate::compose::ExecutedQuery;
use crate::error::Result;
use crate::index::{MoreLikeThisOptions, SearchIndex};
use crate::params::Page;
use crate::product::ProductId;
use crate::reconcile::{ReconciledResult, Reconciler};
use crate::store::StoreQuery;

/// Candidates requested per returned product, leaving room for candidates
/// the store drops as inactive or out of stock.
pub const CANDIDATE_FACTOR: usize = 4;

/// Fetches more-like-this candidates and keeps the sellable ones.
#[derive(Debug, Clone)]
pub struct SimilarityReorderer {
    index: Arc<dyn SearchIndex>,
    reconciler: Reconciler,
}

impl SimilarityReorderer {
    pub fn new(index: Arc<dyn SearchIndex>, reconciler: Reconciler) -> Self {
        SimilarityReorderer { index, reconciler }
    }

    /// Up to `limit` active, in-stock products similar to `reference`,
    /// compared on `fields`, in engine order.
    ///
    /// Fewer than `limit` products is a valid outcome.
    pub fn similar(
        &self,
        reference: ProductId,
        fields: &[String],
        limit: usize,
    ) -> Result<ReconciledResult> {
        if limit == 0 {
            return Ok(ReconciledResult::empty());
        }

        let options = MoreLikeThisOptions {
            boost_by_relevance: true,
            page: Page::new(1, limit.saturating_mul(CANDIDATE_FACTOR)),
        };
        let candidates = self.index.more_like_this(reference, fields, &options)?;
        debug!(
            "{} similarity candidate(s) for product {reference}",
            candidates.hits.len()
        );

        let mut result = self.reconciler.reconcile_executed(
            ExecutedQuery::from(candidates),
            StoreQuery::find_active().in_stock(),
        )?;
        result.products.truncate(limit);
        Ok(result)
    }
}
