//! Named search configurations.
//!
//! A [`SearchParameters`] value describes one search intent: what is searched,
//! which facets are counted, which filters always apply, how results are
//! ordered and paged. The templates (`products`, `featured`, `related`,
//! `groups`, `base_scope`) are built from the process-wide
//! [`SearchConfig`] and never modified. Per-request input is applied with
//! [`SearchParameters::merged`], which returns a new value.

use serde::{Deserialize, Serialize};

use crate::config::SearchConfig;
use crate::params::facet::{FacetRequest, FacetSort};
use crate::params::order::OrderBy;
use crate::params::value::FilterValue;

/// Fulltext search settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FulltextOptions {
    /// Fields and their boosts, in priority order.
    pub fields: Vec<(String, f32)>,
    /// Phrase fields and their boosts.
    pub phrase_fields: Vec<(String, f32)>,
    /// Minimum-match expression.
    pub minimum_match: String,
    /// Tie-break weight for non-best fields.
    pub tie: f32,
    /// Multiply scores by the popularity boost.
    pub popularity_boost: bool,
    /// Field holding the popularity signal.
    pub popularity_field: String,
}

impl FulltextOptions {
    /// Fulltext settings from configuration.
    pub fn from_config(config: &SearchConfig) -> Self {
        FulltextOptions {
            fields: config.fulltext_fields.clone(),
            phrase_fields: config.phrase_fields.clone(),
            minimum_match: config.minimum_match.clone(),
            tie: config.tie,
            popularity_boost: config.popularity_boost,
            popularity_field: config.popularity_field.clone(),
        }
    }
}

/// A filter that always applies to a named configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StaticFilter {
    /// Field to filter on.
    pub field: String,
    /// Accepted value(s).
    pub value: FilterValue,
}

impl StaticFilter {
    pub fn new<S: Into<String>>(field: S, value: FilterValue) -> Self {
        StaticFilter {
            field: field.into(),
            value,
        }
    }
}

/// Requested page and page size, possibly unset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Pagination {
    /// 1-based page number.
    pub page: Option<usize>,
    /// Page size.
    pub per_page: Option<usize>,
}

/// A page resolved to positive integers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Page {
    /// 1-based page number.
    pub page: usize,
    /// Page size.
    pub per_page: usize,
}

impl Page {
    /// Create a page, clamping both numbers to at least 1.
    pub fn new(page: usize, per_page: usize) -> Self {
        Page {
            page: page.max(1),
            per_page: per_page.max(1),
        }
    }

    /// Number of entries before this page.
    pub fn offset(&self) -> usize {
        self.page.saturating_sub(1).saturating_mul(self.per_page)
    }
}

impl Pagination {
    pub fn new(page: Option<usize>, per_page: Option<usize>) -> Self {
        Pagination { page, per_page }
    }

    /// Substitute defaults for unset or zero values.
    pub fn resolve(&self, default_per_page: usize) -> Page {
        let page = self.page.filter(|p| *p > 0).unwrap_or(1);
        let per_page = self
            .per_page
            .filter(|p| *p > 0)
            .unwrap_or(default_per_page);
        Page::new(page, per_page)
    }
}

/// Per-request values merged into a named configuration.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ParameterOverrides {
    /// Fulltext term.
    pub keywords: Option<String>,
    /// Keyword restriction applied as a filter.
    pub keyword_restriction: Option<String>,
    /// Requested page.
    pub page: Option<usize>,
    /// Requested page size.
    pub per_page: Option<usize>,
    /// Store scope.
    pub store: Option<String>,
    /// Extra ordering clauses, appended after the configured ones.
    pub order_by: Vec<OrderBy>,
}

/// An immutable, named search configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchParameters {
    /// Configuration name, used in logs.
    pub name: String,
    /// Fulltext term. `None` browses by facets and filters only.
    pub keywords: Option<String>,
    /// Fulltext settings.
    pub fulltext: FulltextOptions,
    /// Facets to count.
    pub facets: Vec<FacetRequest>,
    /// Filters that always apply.
    pub static_filters: Vec<StaticFilter>,
    /// Keyword restriction separate from the fulltext term.
    pub keyword_restriction: Option<String>,
    /// Ordering clauses, primary key first.
    pub order_by: Vec<OrderBy>,
    /// Put relevance score first when a fulltext term is present.
    pub order_by_score: bool,
    /// Request exactly the resolved page. Otherwise every match is requested.
    pub paginate: bool,
    /// Requested page and page size.
    pub pagination: Pagination,
    /// Keep the configured page number over the request's.
    pub page_locked: bool,
    /// Keep the configured page size over the request's.
    pub per_page_locked: bool,
    /// Page size used when none is requested.
    pub default_per_page: usize,
    /// Apply the caller's price range.
    pub price_filter: bool,
    /// Only featured products.
    pub featured_only: bool,
    /// Restrict to one store.
    pub store: Option<String>,
}

/// Display ordering of product listings, after any relevance ordering.
fn listing_order() -> Vec<OrderBy> {
    vec![
        OrderBy::asc("missing_image"),
        OrderBy::desc("in_stock"),
        OrderBy::asc("theme"),
        OrderBy::asc("position"),
        OrderBy::asc("subposition"),
    ]
}

fn active_filter() -> StaticFilter {
    StaticFilter::new("is_active", FilterValue::scalar("true"))
}

impl SearchParameters {
    /// An empty configuration: no facets, no filters, paginated.
    pub fn new<S: Into<String>>(name: S, config: &SearchConfig) -> Self {
        SearchParameters {
            name: name.into(),
            keywords: None,
            fulltext: FulltextOptions::from_config(config),
            facets: Vec::new(),
            static_filters: Vec::new(),
            keyword_restriction: None,
            order_by: Vec::new(),
            order_by_score: false,
            paginate: true,
            pagination: Pagination::default(),
            page_locked: false,
            per_page_locked: false,
            default_per_page: config.products_per_page,
            price_filter: false,
            featured_only: false,
            store: None,
        }
    }

    /// The product listing: storefront facets, active products only.
    pub fn products(config: &SearchConfig) -> Self {
        let mut params = SearchParameters::new("products", config);
        params.facets = config
            .facet_fields
            .iter()
            .map(FacetRequest::new)
            .collect();
        params.static_filters.push(active_filter());
        params.order_by = listing_order();
        params.price_filter = true;
        params
    }

    /// Featured products, in pages of a fixed large size.
    pub fn featured(config: &SearchConfig) -> Self {
        let mut params = SearchParameters::products(config);
        params.name = "featured".to_string();
        params.featured_only = true;
        params.pagination.per_page = Some(config.featured_page_size);
        params.per_page_locked = true;
        params
    }

    /// Products related to a theme, always the first page of a fixed size.
    pub fn related(config: &SearchConfig, theme: &str) -> Self {
        let mut params = SearchParameters::new("related", config);
        params.static_filters.push(active_filter());
        params
            .static_filters
            .push(StaticFilter::new("related", FilterValue::scalar(theme)));
        params.order_by = listing_order();
        params.pagination = Pagination::new(Some(1), Some(config.related_page_size));
        params.page_locked = true;
        params.per_page_locked = true;
        params
    }

    /// Group counts within a category.
    pub fn groups(config: &SearchConfig, category: &str) -> Self {
        let mut params = SearchParameters::new("groups", config);
        params.facets.push(FacetRequest::new("group"));
        params.static_filters.push(active_filter());
        params
            .static_filters
            .push(StaticFilter::new("category", FilterValue::scalar(category)));
        params.order_by = vec![OrderBy::asc("position"), OrderBy::asc("subposition")];
        params.price_filter = true;
        params
    }

    /// The id scope behind store-side listings: every match, best first.
    pub fn base_scope(config: &SearchConfig) -> Self {
        let mut params = SearchParameters::new("base_scope", config);
        params.facets = config
            .facet_fields
            .iter()
            .map(|name| FacetRequest::new(name).with_sort(FacetSort::Count))
            .collect();
        params.order_by_score = true;
        params.paginate = false;
        params
    }

    /// Apply per-request overrides, returning a new configuration.
    pub fn merged(&self, overrides: &ParameterOverrides) -> SearchParameters {
        let mut merged = self.clone();
        if let Some(keywords) = non_blank(&overrides.keywords) {
            merged.keywords = Some(keywords);
        }
        if let Some(restriction) = non_blank(&overrides.keyword_restriction) {
            merged.keyword_restriction = Some(restriction);
        }
        if overrides.page.is_some() && !self.page_locked {
            merged.pagination.page = overrides.page;
        }
        if overrides.per_page.is_some() && !self.per_page_locked {
            merged.pagination.per_page = overrides.per_page;
        }
        if overrides.store.is_some() {
            merged.store = overrides.store.clone();
        }
        merged.order_by.extend(overrides.order_by.iter().cloned());
        merged
    }

    /// The fulltext term, if any non-blank one is set.
    pub fn term(&self) -> Option<&str> {
        self.keywords
            .as_deref()
            .map(str::trim)
            .filter(|k| !k.is_empty())
    }

    /// The resolved page.
    pub fn page(&self) -> Page {
        self.pagination.resolve(self.default_per_page)
    }
}

fn non_blank(value: &Option<String>) -> Option<String> {
    value
        .as_deref()
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pagination_resolve() {
        let config = SearchConfig::default();
        assert_eq!(Pagination::default().resolve(12), Page::new(1, 12));
        assert_eq!(
            Pagination::new(Some(0), Some(0)).resolve(config.products_per_page),
            Page::new(1, 12)
        );
        assert_eq!(Pagination::new(Some(3), Some(5)).resolve(12), Page::new(3, 5));
        assert_eq!(Page::new(3, 5).offset(), 10);
    }

    #[test]
    fn test_unclamped_page_offset() {
        let page: Page = serde_json::from_str(r#"{"page": 0, "per_page": 12}"#).unwrap();
        assert_eq!(page.offset(), 0);
        assert_eq!(Page { page: 0, per_page: 5 }.offset(), 0);
    }

    #[test]
    fn test_products_template() {
        let config = SearchConfig::default();
        let params = SearchParameters::products(&config);
        assert_eq!(params.facets.len(), config.facet_fields.len());
        assert_eq!(params.static_filters, vec![active_filter()]);
        assert!(params.paginate);
        assert!(params.price_filter);
        assert_eq!(params.page(), Page::new(1, 12));
    }

    #[test]
    fn test_featured_template() {
        let config = SearchConfig::default();
        let params = SearchParameters::featured(&config);
        assert!(params.featured_only);
        assert_eq!(params.page().per_page, config.featured_page_size);
    }

    #[test]
    fn test_featured_keeps_page_size() {
        let config = SearchConfig::default();
        let merged = SearchParameters::featured(&config).merged(&ParameterOverrides {
            page: Some(3),
            per_page: Some(2),
            ..Default::default()
        });
        assert_eq!(merged.page(), Page::new(3, config.featured_page_size));
    }

    #[test]
    fn test_related_keeps_fixed_page() {
        let config = SearchConfig::default();
        let template = SearchParameters::related(&config, "oak");
        let merged = template.merged(&ParameterOverrides {
            page: Some(2),
            per_page: Some(12),
            ..Default::default()
        });
        assert_eq!(merged.page(), Page::new(1, config.related_page_size));
        assert_eq!(merged, template);
    }

    #[test]
    fn test_merge_leaves_template_untouched() {
        let config = SearchConfig::default();
        let template = SearchParameters::products(&config);
        let overrides = ParameterOverrides {
            keywords: Some("  oak chair ".to_string()),
            page: Some(2),
            per_page: Some(24),
            order_by: vec![OrderBy::desc("price")],
            ..Default::default()
        };

        let merged = template.merged(&overrides);
        assert_eq!(merged.term(), Some("oak chair"));
        assert_eq!(merged.page(), Page::new(2, 24));
        assert_eq!(merged.order_by.last(), Some(&OrderBy::desc("price")));

        assert_eq!(template.keywords, None);
        assert_eq!(template.page(), Page::new(1, 12));
        assert_eq!(template, SearchParameters::products(&config));
    }

    #[test]
    fn test_blank_keywords_ignored() {
        let config = SearchConfig::default();
        let overrides = ParameterOverrides {
            keywords: Some("   ".to_string()),
            ..Default::default()
        };
        let merged = SearchParameters::products(&config).merged(&overrides);
        assert_eq!(merged.term(), None);
    }
}
