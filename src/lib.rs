//! # catalog-search
//!
//! Faceted catalog search on top of an external search index and an
//! authoritative product store.
//!
//! ## Features
//!
//! - Immutable named search configurations merged with per-request overrides
//! - Multi-select facet filters that leave their own facet's counts open
//! - Index hit order reconciled with store rows
//! - Exact identifier keywords resolved to a single product
//! - Similar products in engine order, restricted to sellable rows
//!
//! The index and the store are traits ([`index::SearchIndex`],
//! [`store::ProductStore`]); in-memory implementations are included for
//! tests and the command line tool.

pub mod cli;
pub mod compose;
pub mod config;
pub mod error;
pub mod filter;
pub mod geo;
pub mod index;
pub mod intercept;
pub mod params;
pub mod product;
pub mod reconcile;
pub mod service;
pub mod similarity;
pub mod store;

pub mod prelude {
    pub use crate::compose::{ComposedQuery, ExecutedQuery, QueryComposer};
    pub use crate::config::SearchConfig;
    pub use crate::error::{CatalogError, Result};
    pub use crate::filter::{FilterClause, FilterConditions};
    pub use crate::index::{IndexQuery, IndexResult, MemoryIndex, SearchIndex};
    pub use crate::intercept::KeywordInterceptor;
    pub use crate::params::{
        FilterValue, OrderBy, ParameterOverrides, PriceRange, SearchContext, SearchParameters,
    };
    pub use crate::product::{Product, ProductId};
    pub use crate::reconcile::{ReconciledResult, Reconciler};
    pub use crate::service::CatalogSearch;
    pub use crate::similarity::SimilarityReorderer;
    pub use crate::store::{MemoryStore, ProductStore, StoreQuery};
}

// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
