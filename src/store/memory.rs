//! In-memory product store for testing and demos.

use std::collections::BTreeMap;
use std::sync::atomic::{AtomicU64, Ordering};

use chrono::Utc;
use parking_lot::RwLock;

use crate::error::Result;
use crate::product::{Product, ProductId};
use crate::store::{ProductStore, StoreQuery};

/// An in-memory [`ProductStore`].
///
/// Rows come back in ascending id order, whatever order the query's id set
/// was given in.
#[derive(Debug, Default)]
pub struct MemoryStore {
    /// Products by primary key.
    products: RwLock<BTreeMap<ProductId, Product>>,
    /// Number of fetches served.
    fetches: AtomicU64,
}

impl MemoryStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store holding `products`.
    pub fn with_products(products: Vec<Product>) -> Self {
        let store = Self::new();
        for product in products {
            store.insert(product);
        }
        store
    }

    /// Insert or replace a product.
    pub fn insert(&self, product: Product) {
        self.products.write().insert(product.id, product);
    }

    /// Get a product by id.
    pub fn get(&self, id: ProductId) -> Option<Product> {
        self.products.read().get(&id).cloned()
    }

    /// Number of products.
    pub fn len(&self) -> usize {
        self.products.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Number of fetches served so far.
    pub fn fetch_count(&self) -> u64 {
        self.fetches.load(Ordering::Relaxed)
    }
}

impl ProductStore for MemoryStore {
    fn fetch(&self, query: &StoreQuery) -> Result<Vec<Product>> {
        self.fetches.fetch_add(1, Ordering::Relaxed);
        if query.is_match_nothing() {
            return Ok(Vec::new());
        }

        let now = Utc::now();
        let products = self.products.read();
        Ok(products
            .values()
            .filter(|product| query.filters().iter().all(|f| f.matches(product, now)))
            .cloned()
            .collect())
    }
}
