//! Caller input for one search request.

use std::str::FromStr;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::{CatalogError, Result};
use crate::geo::GeoPoint;
use crate::params::order::OrderBy;
use crate::params::parameters::ParameterOverrides;
use crate::params::value::RangeValue;

/// An inclusive price range given as two endpoints.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PriceRange {
    /// Lowest accepted price.
    pub low: String,
    /// Highest accepted price.
    pub high: String,
}

impl PriceRange {
    pub fn new<S: Into<String>>(low: S, high: S) -> Self {
        PriceRange {
            low: low.into(),
            high: high.into(),
        }
    }

    /// The range as filter bounds. No check that `low <= high`.
    pub fn to_range(&self) -> RangeValue {
        RangeValue::new(self.low.clone(), self.high.clone())
    }
}

impl FromStr for PriceRange {
    type Err = CatalogError;

    /// Parse `"low-high"`.
    fn from_str(s: &str) -> Result<Self> {
        let (low, high) = s
            .split_once('-')
            .ok_or_else(|| CatalogError::invalid_argument(format!("'{s}' is not 'low-high'")))?;
        let (low, high) = (low.trim(), high.trim());
        if low.is_empty() || high.is_empty() {
            return Err(CatalogError::invalid_argument(format!(
                "'{s}' is missing a price endpoint"
            )));
        }
        Ok(PriceRange::new(low, high))
    }
}

/// Everything a caller supplies for one request.
///
/// Built per request and only read afterwards.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchContext {
    /// Fulltext term.
    pub keywords: Option<String>,
    /// Keyword restriction narrowing a browse.
    pub narrow_keywords: Option<String>,
    /// Raw facet filters: facet name to value(s).
    pub filters: Map<String, Value>,
    /// Price range.
    pub price: Option<PriceRange>,
    /// Ordering override, applied after every configured clause.
    pub order_by: Option<OrderBy>,
    /// Requested page.
    pub page: Option<usize>,
    /// Requested page size.
    pub per_page: Option<usize>,
    /// The current taxon and its descendants, already resolved.
    pub taxon_ids: Vec<u64>,
    /// Store scope.
    pub store: Option<String>,
    /// Location for the radius filter.
    pub location: Option<GeoPoint>,
    /// Requested number of similar products.
    pub total_similar_products: Option<usize>,
}

impl SearchContext {
    /// Create an empty context.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_keywords<S: Into<String>>(mut self, keywords: S) -> Self {
        self.keywords = Some(keywords.into());
        self
    }

    pub fn with_narrow_keywords<S: Into<String>>(mut self, keywords: S) -> Self {
        self.narrow_keywords = Some(keywords.into());
        self
    }

    /// Add a raw facet filter.
    pub fn with_filter<S: Into<String>>(mut self, facet: S, value: Value) -> Self {
        self.filters.insert(facet.into(), value);
        self
    }

    pub fn with_price(mut self, price: PriceRange) -> Self {
        self.price = Some(price);
        self
    }

    pub fn with_order_by(mut self, order_by: OrderBy) -> Self {
        self.order_by = Some(order_by);
        self
    }

    pub fn with_page(mut self, page: usize, per_page: usize) -> Self {
        self.page = Some(page);
        self.per_page = Some(per_page);
        self
    }

    pub fn with_taxons(mut self, taxon_ids: Vec<u64>) -> Self {
        self.taxon_ids = taxon_ids;
        self
    }

    pub fn with_store<S: Into<String>>(mut self, store: S) -> Self {
        self.store = Some(store.into());
        self
    }

    pub fn with_location(mut self, location: GeoPoint) -> Self {
        self.location = Some(location);
        self
    }

    pub fn with_total_similar_products(mut self, total: usize) -> Self {
        self.total_similar_products = Some(total);
        self
    }

    /// The overrides this request applies to a named configuration.
    pub fn overrides(&self) -> ParameterOverrides {
        ParameterOverrides {
            keywords: self.keywords.clone(),
            keyword_restriction: self.narrow_keywords.clone(),
            page: self.page,
            per_page: self.per_page,
            store: self.store.clone(),
            order_by: Vec::new(),
        }
    }

    /// Number of similar products to return; zero falls back to `default`.
    pub fn similar_limit(&self, default: usize) -> usize {
        self.total_similar_products
            .filter(|n| *n > 0)
            .unwrap_or(default)
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn test_parse_price() {
        let price: PriceRange = "10-25.5".parse().unwrap();
        assert_eq!(price, PriceRange::new("10", "25.5"));
        assert_eq!(price.to_range(), RangeValue::new("10", "25.5"));

        assert!("10".parse::<PriceRange>().is_err());
        assert!("-5".parse::<PriceRange>().is_err());
    }

    #[test]
    fn test_overrides() {
        let ctx = SearchContext::new()
            .with_keywords("lamp")
            .with_page(2, 30)
            .with_store("eu")
            .with_filter("color", json!("red"));
        let overrides = ctx.overrides();
        assert_eq!(overrides.keywords.as_deref(), Some("lamp"));
        assert_eq!(overrides.page, Some(2));
        assert_eq!(overrides.per_page, Some(30));
        assert_eq!(overrides.store.as_deref(), Some("eu"));
        assert!(overrides.order_by.is_empty());
    }

    #[test]
    fn test_similar_limit() {
        assert_eq!(SearchContext::new().similar_limit(4), 4);
        assert_eq!(
            SearchContext::new()
                .with_total_similar_products(0)
                .similar_limit(4),
            4
        );
        assert_eq!(
            SearchContext::new()
                .with_total_similar_products(9)
                .similar_limit(4),
            9
        );
    }

    #[test]
    fn test_context_from_json() {
        let ctx: SearchContext = serde_json::from_value(json!({
            "keywords": "chair",
            "filters": {"category": ["chairs"]},
            "price": {"low": "1", "high": "9"},
            "order_by": {"field": "price", "direction": "desc"}
        }))
        .unwrap();
        assert_eq!(ctx.keywords.as_deref(), Some("chair"));
        assert_eq!(ctx.order_by, Some(OrderBy::desc("price")));
        assert!(ctx.filters.contains_key("category"));
    }
}
