//! Shared fixtures for integration tests.

#![allow(dead_code)]

use std::sync::Arc;

use chrono::Utc;
use parking_lot::Mutex;

use catalog_search::config::SearchConfig;
use catalog_search::error::{CatalogError, Result};
use catalog_search::index::{
    IndexDocument, IndexHit, IndexQuery, IndexResult, MemoryIndex, MoreLikeThisOptions,
    SearchIndex,
};
use catalog_search::product::{Product, ProductId};
use catalog_search::service::CatalogSearch;
use catalog_search::store::{MemoryStore, ProductStore, StoreQuery};

pub const CHAIRS: u64 = 10;
pub const TABLES: u64 = 20;
pub const LIGHTING: u64 = 30;

fn product(
    id: ProductId,
    sku: &str,
    name: &str,
    category: &str,
    color: &str,
    price: &str,
    group: &str,
    taxon: u64,
) -> Product {
    Product::new(id, sku, name)
        .with_property("category", category)
        .with_property("color", color)
        .with_property("price", price)
        .with_property("group", group)
        .with_taxon(taxon)
}

/// Six active products: three chairs, a table and two lamps, the last one
/// out of stock.
pub fn furniture() -> Vec<Product> {
    vec![
        product(1, "CH-1", "Oak chair", "chairs", "brown", "120", "armchairs", CHAIRS),
        product(2, "CH-2", "Red chair", "chairs", "red", "80", "stools", CHAIRS),
        product(3, "CH-3", "Blue chair", "chairs", "blue", "95", "armchairs", CHAIRS),
        product(4, "TB-1", "Oak table", "tables", "brown", "300", "dining", TABLES),
        product(5, "LP-1", "Desk lamp", "lighting", "red", "40", "desk", LIGHTING),
        product(6, "LP-2", "Floor lamp", "lighting", "black", "60", "floor", LIGHTING)
            .with_count_on_hand(0),
    ]
}

pub struct Fixture {
    pub index: Arc<MemoryIndex>,
    pub store: Arc<MemoryStore>,
    pub search: CatalogSearch,
}

/// A service over `products`, indexed as they are now.
pub fn fixture_with(products: Vec<Product>) -> Fixture {
    let now = Utc::now();
    let index = Arc::new(MemoryIndex::with_documents(
        products
            .iter()
            .map(|p| IndexDocument::from_product(p, now))
            .collect(),
    ));
    let store = Arc::new(MemoryStore::with_products(products));
    let search = CatalogSearch::new(
        Arc::new(SearchConfig::default()),
        index.clone(),
        store.clone(),
    );
    Fixture {
        index,
        store,
        search,
    }
}

pub fn fixture() -> Fixture {
    fixture_with(furniture())
}

/// A store returning rows in descending id order.
#[derive(Debug)]
pub struct ReversedStore(pub MemoryStore);

impl ProductStore for ReversedStore {
    fn fetch(&self, query: &StoreQuery) -> Result<Vec<Product>> {
        let mut rows = self.0.fetch(query)?;
        rows.reverse();
        Ok(rows)
    }
}

/// An index answering every request with the same hits.
#[derive(Debug, Default)]
pub struct ScriptedIndex {
    pub ids: Vec<ProductId>,
    pub last_options: Mutex<Option<MoreLikeThisOptions>>,
}

impl ScriptedIndex {
    pub fn new(ids: Vec<ProductId>) -> Self {
        ScriptedIndex {
            ids,
            last_options: Mutex::new(None),
        }
    }

    fn result(&self) -> IndexResult {
        IndexResult {
            hits: self
                .ids
                .iter()
                .enumerate()
                .map(|(pos, id)| IndexHit::new(*id, (self.ids.len() - pos) as f32))
                .collect(),
            total: self.ids.len() as u64,
            facets: Default::default(),
        }
    }
}

impl SearchIndex for ScriptedIndex {
    fn execute(&self, _query: &IndexQuery) -> Result<IndexResult> {
        Ok(self.result())
    }

    fn more_like_this(
        &self,
        _reference: ProductId,
        _fields: &[String],
        options: &MoreLikeThisOptions,
    ) -> Result<IndexResult> {
        *self.last_options.lock() = Some(*options);
        Ok(self.result())
    }
}

/// An index that is always unavailable.
#[derive(Debug, Default)]
pub struct FailingIndex;

impl SearchIndex for FailingIndex {
    fn execute(&self, _query: &IndexQuery) -> Result<IndexResult> {
        Err(CatalogError::index("connection refused"))
    }

    fn more_like_this(
        &self,
        _reference: ProductId,
        _fields: &[String],
        _options: &MoreLikeThisOptions,
    ) -> Result<IndexResult> {
        Err(CatalogError::index("connection refused"))
    }
}

/// A store that is always unavailable.
#[derive(Debug, Default)]
pub struct FailingStore;

impl ProductStore for FailingStore {
    fn fetch(&self, _query: &StoreQuery) -> Result<Vec<Product>> {
        Err(CatalogError::store("database is down"))
    }
}
