//! Integration tests for faceted product listings.

mod common;

use std::sync::Arc;

use serde_json::json;

use catalog_search::config::SearchConfig;
use catalog_search::error::Result;
use catalog_search::params::{OrderBy, PriceRange, SearchContext, SearchParameters};
use catalog_search::service::CatalogSearch;
use catalog_search::store::MemoryStore;

use common::*;

#[test]
fn test_category_filter_counts_category_over_everything() -> Result<()> {
    let fixture = fixture();
    let ctx = SearchContext::new().with_filter("category", json!(["chairs"]));

    let result = fixture.search.retrieve_products(&ctx)?;

    assert_eq!(result.ids(), vec![1, 2, 3]);
    assert_eq!(result.total_hits, 3);
    // The category facet ignores the category filter.
    assert_eq!(result.facet_count("category", "chairs"), 3);
    assert_eq!(result.facet_count("category", "tables"), 1);
    assert_eq!(result.facet_count("category", "lighting"), 2);
    // Other facets are counted within the selection.
    assert_eq!(result.facet_count("color", "brown"), 1);
    assert_eq!(result.facet_count("color", "red"), 1);
    assert_eq!(result.facet_count("color", "black"), 0);

    Ok(())
}

#[test]
fn test_facet_counted_under_other_facets_filters() -> Result<()> {
    let fixture = fixture();
    let ctx = SearchContext::new()
        .with_filter("category", json!("chairs"))
        .with_filter("color", json!("red"));

    let result = fixture.search.retrieve_products(&ctx)?;

    assert_eq!(result.ids(), vec![2]);
    // category: without its own clause, with the color clause.
    assert_eq!(result.facet_count("category", "chairs"), 1);
    assert_eq!(result.facet_count("category", "lighting"), 1);
    assert_eq!(result.facet_count("category", "tables"), 0);
    // color: without its own clause, with the category clause.
    assert_eq!(result.facet_count("color", "red"), 1);
    assert_eq!(result.facet_count("color", "blue"), 1);
    assert_eq!(result.facet_count("color", "brown"), 1);

    Ok(())
}

#[test]
fn test_malformed_filter_is_dropped() -> Result<()> {
    let fixture = fixture();
    let ctx = SearchContext::new()
        .with_filter("category", json!("tables"))
        .with_filter("color", json!(null));

    let result = fixture.search.retrieve_products(&ctx)?;
    assert_eq!(result.ids(), vec![4]);

    Ok(())
}

#[test]
fn test_zero_matches_is_empty_not_everything() -> Result<()> {
    let fixture = fixture();
    let ctx = SearchContext::new().with_keywords("zebra");

    let result = fixture.search.retrieve_products(&ctx)?;

    assert!(result.is_empty());
    assert_eq!(result.total_hits, 0);
    // The store was asked, with a query that matches nothing.
    assert_eq!(fixture.store.fetch_count(), 1);

    Ok(())
}

#[test]
fn test_featured_without_featured_products() -> Result<()> {
    let fixture = fixture();

    let result = fixture.search.retrieve_featured(&SearchContext::new())?;
    assert!(result.is_empty());
    assert_eq!(result.total_hits, 0);

    Ok(())
}

#[test]
fn test_featured_products() -> Result<()> {
    let mut products = furniture();
    products[2].featured = true;
    products[4].featured = true;
    let fixture = fixture_with(products);

    let result = fixture.search.retrieve_featured(&SearchContext::new())?;
    assert_eq!(result.ids(), vec![3, 5]);

    Ok(())
}

#[test]
fn test_featured_ignores_requested_page_size() -> Result<()> {
    let products = furniture()
        .into_iter()
        .map(|mut product| {
            product.featured = true;
            product
        })
        .collect();
    let fixture = fixture_with(products);

    let result = fixture
        .search
        .retrieve_featured(&SearchContext::new().with_page(1, 2))?;
    let mut ids = result.ids();
    ids.sort_unstable();
    assert_eq!(ids, vec![1, 2, 3, 4, 5, 6]);
    assert_eq!(result.total_hits, 6);

    Ok(())
}

#[test]
fn test_order_follows_index_not_store() -> Result<()> {
    let fixture = fixture();
    let reversed = CatalogSearch::new(
        Arc::new(SearchConfig::default()),
        fixture.index.clone(),
        Arc::new(ReversedStore(MemoryStore::with_products(furniture()))),
    );
    let ctx = SearchContext::new()
        .with_filter("category", json!("chairs"))
        .with_order_by(OrderBy::asc("price"));

    let result = reversed.retrieve_products(&ctx)?;
    assert_eq!(result.ids(), vec![2, 3, 1]);

    let result = fixture.search.retrieve_products(&ctx)?;
    assert_eq!(result.ids(), vec![2, 3, 1]);

    Ok(())
}

#[test]
fn test_out_of_stock_listed_last() -> Result<()> {
    let fixture = fixture();
    let ctx = SearchContext::new().with_price(PriceRange::new("50", "100"));

    let result = fixture.search.retrieve_products(&ctx)?;
    assert_eq!(result.ids(), vec![2, 3, 6]);

    Ok(())
}

#[test]
fn test_pagination() -> Result<()> {
    let fixture = fixture();
    let ctx = SearchContext::new().with_page(2, 2);

    let result = fixture.search.retrieve_products(&ctx)?;
    assert_eq!(result.ids(), vec![3, 4]);
    assert_eq!(result.total_hits, 6);

    Ok(())
}

#[test]
fn test_taxon_scope() -> Result<()> {
    let fixture = fixture();
    let ctx = SearchContext::new().with_taxons(vec![TABLES, LIGHTING]);

    let result = fixture.search.retrieve_products(&ctx)?;
    assert_eq!(result.ids(), vec![4, 5, 6]);

    Ok(())
}

#[test]
fn test_related_theme() -> Result<()> {
    let mut products = furniture();
    products[0] = products[0].clone().with_property("related", "oak");
    products[3] = products[3].clone().with_property("related", "oak");
    let fixture = fixture_with(products);

    let result = fixture.search.retrieve_related(&SearchContext::new(), "oak")?;
    assert_eq!(result.ids(), vec![1, 4]);

    Ok(())
}

#[test]
fn test_related_ignores_requested_page() -> Result<()> {
    let mut products = furniture();
    products[0] = products[0].clone().with_property("related", "oak");
    products[3] = products[3].clone().with_property("related", "oak");
    let fixture = fixture_with(products);

    let ctx = SearchContext::new().with_page(2, 1);
    let result = fixture.search.retrieve_related(&ctx, "oak")?;
    assert_eq!(result.ids(), vec![1, 4]);

    Ok(())
}

#[test]
fn test_group_facet_counts() -> Result<()> {
    let fixture = fixture();

    let counts = fixture
        .search
        .group_facet_counts(&SearchContext::new(), "chairs")?;
    let pairs: Vec<(&str, u64)> = counts.iter().map(|c| (c.value.as_str(), c.count)).collect();
    assert_eq!(pairs, vec![("armchairs", 2), ("stools", 1)]);

    let narrowed = fixture.search.group_facet_counts(
        &SearchContext::new().with_narrow_keywords("oak"),
        "chairs",
    )?;
    let pairs: Vec<(&str, u64)> = narrowed
        .iter()
        .map(|c| (c.value.as_str(), c.count))
        .collect();
    assert_eq!(pairs, vec![("armchairs", 1)]);

    Ok(())
}

#[test]
fn test_composing_twice_is_identical() -> Result<()> {
    let fixture = fixture();
    let config = SearchConfig::default();
    let template = SearchParameters::products(&config);
    let ctx = SearchContext::new()
        .with_keywords("chair")
        .with_filter("color", json!(["red", "blue"]))
        .with_price(PriceRange::new("10", "200"));

    assert_eq!(
        fixture.search.compose(&template, &ctx),
        fixture.search.compose(&template, &ctx)
    );
    assert_eq!(template, SearchParameters::products(&config));

    let first = fixture.search.retrieve_products(&ctx)?;
    let second = fixture.search.retrieve_products(&ctx)?;
    assert_eq!(first, second);
    assert_eq!(first.ids(), vec![2, 3]);

    Ok(())
}
