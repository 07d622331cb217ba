//! What a search index returns.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::product::ProductId;

/// One matched document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IndexHit {
    /// Primary key of the matched product.
    pub id: ProductId,
    /// Relevance score.
    pub score: f32,
    /// Stored fields returned with the hit.
    pub stored: HashMap<String, String>,
}

impl IndexHit {
    pub fn new(id: ProductId, score: f32) -> Self {
        IndexHit {
            id,
            score,
            stored: HashMap::new(),
        }
    }

    /// A stored field.
    pub fn stored(&self, field: &str) -> Option<&str> {
        self.stored.get(field).map(String::as_str)
    }
}

/// Count of one facet value (or one range bucket).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FacetCount {
    /// The facet value or bucket label.
    pub value: String,
    /// Number of matching documents.
    pub count: u64,
}

impl FacetCount {
    pub fn new<S: Into<String>>(value: S, count: u64) -> Self {
        FacetCount {
            value: value.into(),
            count,
        }
    }
}

/// Facet counts grouped by facet name.
pub type FacetCounts = HashMap<String, Vec<FacetCount>>;

/// The outcome of one index request.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct IndexResult {
    /// Hits of the requested page, in engine order.
    pub hits: Vec<IndexHit>,
    /// Total number of matching documents.
    pub total: u64,
    /// Facet counts.
    pub facets: FacetCounts,
}

impl IndexResult {
    /// Create an empty result.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Hit ids in engine order.
    pub fn ids(&self) -> Vec<ProductId> {
        self.hits.iter().map(|hit| hit.id).collect()
    }

    /// Counts of one facet.
    pub fn facet(&self, name: &str) -> Option<&[FacetCount]> {
        self.facets.get(name).map(Vec::as_slice)
    }

    /// Count of one value of one facet; zero when absent.
    pub fn facet_count(&self, name: &str, value: &str) -> u64 {
        self.facet(name)
            .and_then(|counts| counts.iter().find(|c| c.value == value))
            .map(|c| c.count)
            .unwrap_or(0)
    }
}
