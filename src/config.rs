//! Process-wide search configuration.
//!
//! A [`SearchConfig`] is loaded once (from JSON or defaults), wrapped in an
//! `Arc` and only read afterwards. Per-request changes never touch it; they
//! are expressed as [`ParameterOverrides`](crate::params::ParameterOverrides)
//! merged into a fresh parameter value.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{CatalogError, Result};

/// The storefront facets requested by the product listing.
pub const DEFAULT_FACET_FIELDS: &[&str] = &[
    "category", "group", "type", "theme", "color", "shape", "brand", "size", "material", "for",
    "agegroup", "saletype",
];

/// Configuration shared by every search operation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchConfig {
    /// Page size used when the caller does not ask for one.
    pub products_per_page: usize,

    /// Number of similar products returned when the caller does not ask.
    pub total_similar_products: usize,

    /// Page size requested when a search is not paginated, so that every
    /// match can be handed to local filtering.
    pub unbounded_page_size: usize,

    /// Page size of the featured listing.
    pub featured_page_size: usize,

    /// Page size of the related-products listing.
    pub related_page_size: usize,

    /// Facets attached to product listings.
    pub facet_fields: Vec<String>,

    /// Fulltext fields and their boosts, in priority order.
    pub fulltext_fields: Vec<(String, f32)>,

    /// Phrase fields and their boosts.
    pub phrase_fields: Vec<(String, f32)>,

    /// Minimum-match expression for fulltext terms (e.g. `"2<-1 5<80%"`, `"75%"`, `"2"`).
    pub minimum_match: String,

    /// Tie-break weight for non-best fields.
    pub tie: f32,

    /// Whether fulltext scoring is multiplied by a popularity boost.
    pub popularity_boost: bool,

    /// Stored field holding the popularity signal.
    pub popularity_field: String,

    /// Catalog identifier matched by the keyword intercept.
    pub identifier_field: String,

    /// Radius of the location filter, in kilometres.
    pub geo_radius_km: f64,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            products_per_page: 12,
            total_similar_products: 4,
            unbounded_page_size: 10_000,
            featured_page_size: 10_000,
            related_page_size: 1_000,
            facet_fields: DEFAULT_FACET_FIELDS.iter().map(|f| f.to_string()).collect(),
            fulltext_fields: vec![
                ("name".to_string(), 2.0),
                ("description".to_string(), 1.0),
                ("sku".to_string(), 1.0),
            ],
            phrase_fields: vec![("name".to_string(), 4.0)],
            minimum_match: "75%".to_string(),
            tie: 0.1,
            popularity_boost: false,
            popularity_field: "popularity".to_string(),
            identifier_field: "sku".to_string(),
            geo_radius_km: 50.0,
        }
    }
}

impl SearchConfig {
    /// Parse a configuration from JSON. Missing keys take their defaults.
    pub fn from_json(json: &str) -> Result<Self> {
        let config: SearchConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Load a configuration from a JSON file.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let contents = fs::read_to_string(path.as_ref())?;
        Self::from_json(&contents)
    }

    /// Check that every size is usable.
    pub fn validate(&self) -> Result<()> {
        let sizes = [
            ("products_per_page", self.products_per_page),
            ("total_similar_products", self.total_similar_products),
            ("unbounded_page_size", self.unbounded_page_size),
            ("featured_page_size", self.featured_page_size),
            ("related_page_size", self.related_page_size),
        ];
        for (name, value) in sizes {
            if value == 0 {
                return Err(CatalogError::config(format!("{name} must be positive")));
            }
        }
        if self.identifier_field.is_empty() {
            return Err(CatalogError::config("identifier_field must not be empty"));
        }
        if !(self.geo_radius_km > 0.0) {
            return Err(CatalogError::config("geo_radius_km must be positive"));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;

    #[test]
    fn test_default_config() {
        let config = SearchConfig::default();
        assert_eq!(config.products_per_page, 12);
        assert_eq!(config.total_similar_products, 4);
        assert_eq!(config.unbounded_page_size, 10_000);
        assert_eq!(config.facet_fields.len(), 12);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_partial_json_keeps_defaults() {
        let config = SearchConfig::from_json(r#"{"products_per_page": 24}"#).unwrap();
        assert_eq!(config.products_per_page, 24);
        assert_eq!(config.identifier_field, "sku");
        assert_eq!(config.related_page_size, 1_000);
    }

    #[test]
    fn test_zero_page_size_rejected() {
        let err = SearchConfig::from_json(r#"{"products_per_page": 0}"#).unwrap_err();
        assert!(matches!(err, CatalogError::Config(_)));
    }

    #[test]
    fn test_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{"total_similar_products": 8, "facet_fields": ["color"]}}"#).unwrap();

        let config = SearchConfig::from_file(file.path()).unwrap();
        assert_eq!(config.total_similar_products, 8);
        assert_eq!(config.facet_fields, vec!["color".to_string()]);
    }

    #[test]
    fn test_missing_file() {
        let err = SearchConfig::from_file("/nonexistent/catalog-search.json").unwrap_err();
        assert!(matches!(err, CatalogError::Io(_)));
    }
}
