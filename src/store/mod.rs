//! The authoritative product store collaborator.
//!
//! Queries are built as a [`StoreQuery`]: a conjunction of [`StoreFilter`]s
//! starting from [`StoreQuery::find_active`] or [`StoreQuery::all`]. The store
//! returns rows in its own default order, which callers must not rely on to
//! match any index order.

pub mod memory;

pub use self::memory::MemoryStore;

use std::fmt::{self, Debug};

use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::product::{Product, ProductId};

/// One condition on store rows.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum StoreFilter {
    /// Available and not deleted.
    Active,
    /// At least one unit on hand.
    InStock,
    /// Primary key in the set.
    IdIn(Vec<ProductId>),
    /// Classified under any of the taxons.
    Taxon(Vec<u64>),
    /// A column or property equals the value exactly.
    Field { field: String, value: String },
    /// Matches no row.
    MatchNothing,
}

impl StoreFilter {
    /// Check a product against this filter at `now`.
    pub fn matches(&self, product: &Product, now: chrono::DateTime<chrono::Utc>) -> bool {
        match self {
            StoreFilter::Active => product.is_active_at(now),
            StoreFilter::InStock => product.in_stock(),
            StoreFilter::IdIn(ids) => ids.contains(&product.id),
            StoreFilter::Taxon(taxons) => product.taxon_ids.iter().any(|t| taxons.contains(t)),
            StoreFilter::Field { field, value } => {
                product.field_value(field).as_deref() == Some(value.as_str())
            }
            StoreFilter::MatchNothing => false,
        }
    }
}

/// A conjunction of store filters.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoreQuery {
    filters: Vec<StoreFilter>,
}

impl StoreQuery {
    /// Every product.
    pub fn all() -> Self {
        Self::default()
    }

    /// Active products.
    pub fn find_active() -> Self {
        StoreQuery {
            filters: vec![StoreFilter::Active],
        }
    }

    /// Add a filter.
    pub fn with(mut self, filter: StoreFilter) -> Self {
        self.filters.push(filter);
        self
    }

    /// Restrict to primary keys in `ids`.
    pub fn filter_by_identifier_in(self, ids: Vec<ProductId>) -> Self {
        self.with(StoreFilter::IdIn(ids))
    }

    /// Restrict to one taxon.
    pub fn filter_by_taxon(self, taxon_id: u64) -> Self {
        self.with(StoreFilter::Taxon(vec![taxon_id]))
    }

    /// Restrict to any of several taxons (a taxon and its descendants).
    pub fn filter_by_taxons(self, taxon_ids: Vec<u64>) -> Self {
        self.with(StoreFilter::Taxon(taxon_ids))
    }

    /// Restrict to an exact column or property value.
    pub fn filter_by_field<F: Into<String>, V: Into<String>>(self, field: F, value: V) -> Self {
        self.with(StoreFilter::Field {
            field: field.into(),
            value: value.into(),
        })
    }

    /// Restrict to products in stock.
    pub fn in_stock(self) -> Self {
        self.with(StoreFilter::InStock)
    }

    /// The sentinel empty filter: the query matches no row.
    pub fn match_nothing(self) -> Self {
        self.with(StoreFilter::MatchNothing)
    }

    pub fn filters(&self) -> &[StoreFilter] {
        &self.filters
    }

    /// Whether the query can only return an empty set.
    pub fn is_match_nothing(&self) -> bool {
        self.filters.contains(&StoreFilter::MatchNothing)
    }
}

impl fmt::Display for StoreQuery {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let parts: Vec<String> = self
            .filters
            .iter()
            .map(|filter| match filter {
                StoreFilter::Active => "active".to_string(),
                StoreFilter::InStock => "in_stock".to_string(),
                StoreFilter::IdIn(ids) => format!("id in ({} ids)", ids.len()),
                StoreFilter::Taxon(taxons) => format!("taxon in {taxons:?}"),
                StoreFilter::Field { field, value } => format!("{field} = {value:?}"),
                StoreFilter::MatchNothing => "id = -1".to_string(),
            })
            .collect();
        if parts.is_empty() {
            write!(f, "all")
        } else {
            write!(f, "{}", parts.join(" AND "))
        }
    }
}

/// The authoritative product store.
///
/// Implementations own their timeouts and retries. Any failure is returned
/// as [`CatalogError::Store`](crate::error::CatalogError::Store).
pub trait ProductStore: Send + Sync + Debug {
    /// Materialize the rows matching `query` in store default order.
    fn fetch(&self, query: &StoreQuery) -> Result<Vec<Product>>;
}
