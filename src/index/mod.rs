//! The search index collaborator.
//!
//! The crate never ranks documents itself; it hands an [`IndexQuery`] to a
//! [`SearchIndex`] and works with the ordered hits that come back.
//! [`MemoryIndex`] is an in-memory implementation for tests and demos.

pub mod memory;
pub mod query;
pub mod result;

pub use self::memory::{IndexDocument, MemoryIndex};
pub use self::query::{
    FacetSpec, FulltextQuery, IndexFilter, IndexQuery, MoreLikeThisOptions, PopularityBoost,
    required_matches,
};
pub use self::result::{FacetCount, FacetCounts, IndexHit, IndexResult};

use std::fmt::Debug;

use crate::error::Result;
use crate::product::ProductId;

/// A full-text, faceted search index.
///
/// Implementations own their timeouts and retries. Any failure is returned
/// as [`CatalogError::Index`](crate::error::CatalogError::Index) and ends the
/// current operation.
pub trait SearchIndex: Send + Sync + Debug {
    /// Execute a query.
    fn execute(&self, query: &IndexQuery) -> Result<IndexResult>;

    /// Find documents similar to `reference`, comparing only `fields`.
    fn more_like_this(
        &self,
        reference: ProductId,
        fields: &[String],
        options: &MoreLikeThisOptions,
    ) -> Result<IndexResult>;
}
