//! Redirecting keyword searches that name a catalog identifier.

use std::sync::Arc;

use log::debug;

use crate::error::Result;
use crate::product::Product;
use crate::store::{ProductStore, StoreQuery};

/// Resolves a keyword to the product whose identifier it is exactly.
#[derive(Debug, Clone)]
pub struct KeywordInterceptor {
    store: Arc<dyn ProductStore>,
    identifier_field: String,
}

impl KeywordInterceptor {
    pub fn new<S: Into<String>>(store: Arc<dyn ProductStore>, identifier_field: S) -> Self {
        KeywordInterceptor {
            store,
            identifier_field: identifier_field.into(),
        }
    }

    pub fn identifier_field(&self) -> &str {
        &self.identifier_field
    }

    /// The active product whose identifier equals `keyword`, if any.
    ///
    /// The comparison is exact and case-sensitive, surrounding whitespace
    /// included. A missing or blank keyword returns `None` without querying
    /// the store.
    pub fn intercept(&self, keyword: Option<&str>) -> Result<Option<Product>> {
        let Some(keyword) = keyword.filter(|k| !k.trim().is_empty()) else {
            return Ok(None);
        };

        let query =
            StoreQuery::find_active().filter_by_field(self.identifier_field.clone(), keyword);
        let found = self.store.fetch(&query)?.into_iter().next();
        if let Some(product) = &found {
            debug!("keyword '{keyword}' intercepted as product {}", product.id);
        }
        Ok(found)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryStore;

    fn interceptor() -> (Arc<MemoryStore>, KeywordInterceptor) {
        let store = Arc::new(MemoryStore::with_products(vec![
            Product::new(1, "CH-100", "Oak chair"),
            Product::new(2, "LP-200", "Desk lamp"),
            Product::new(3, "OLD-1", "Retired stool").available_on(None),
        ]));
        let interceptor = KeywordInterceptor::new(store.clone(), "sku");
        (store, interceptor)
    }

    #[test]
    fn test_exact_identifier() {
        let (_, interceptor) = interceptor();
        let product = interceptor.intercept(Some("LP-200")).unwrap().unwrap();
        assert_eq!(product.id, 2);
    }

    #[test]
    fn test_case_sensitive_and_partial() {
        let (_, interceptor) = interceptor();
        assert!(interceptor.intercept(Some("lp-200")).unwrap().is_none());
        assert!(interceptor.intercept(Some("LP")).unwrap().is_none());
    }

    #[test]
    fn test_padded_keyword_not_intercepted() {
        let (store, interceptor) = interceptor();
        assert!(interceptor.intercept(Some(" LP-200 ")).unwrap().is_none());
        assert_eq!(store.fetch_count(), 1);
    }

    #[test]
    fn test_inactive_not_intercepted() {
        let (_, interceptor) = interceptor();
        assert!(interceptor.intercept(Some("OLD-1")).unwrap().is_none());
    }

    #[test]
    fn test_blank_keyword_skips_store() {
        let (store, interceptor) = interceptor();
        assert!(interceptor.intercept(None).unwrap().is_none());
        assert!(interceptor.intercept(Some("   ")).unwrap().is_none());
        assert_eq!(store.fetch_count(), 0);
    }
}
