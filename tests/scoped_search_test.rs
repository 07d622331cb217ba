//! Integration tests for the base scope and scoped listings.

mod common;

use serde_json::json;

use catalog_search::error::Result;
use catalog_search::params::SearchContext;
use catalog_search::store::{ProductStore, StoreFilter};

use common::*;

#[test]
fn test_base_scope_restricts_to_index_matches() -> Result<()> {
    let fixture = fixture();
    let ctx = SearchContext::new().with_keywords("chair");

    let scope = fixture.search.base_scope(&ctx)?;
    assert_eq!(
        scope.filters(),
        &[StoreFilter::Active, StoreFilter::IdIn(vec![1, 2, 3])]
    );

    Ok(())
}

#[test]
fn test_base_scope_within_taxon() -> Result<()> {
    let fixture = fixture();
    let ctx = SearchContext::new()
        .with_keywords("oak")
        .with_taxons(vec![TABLES]);

    let scope = fixture.search.base_scope(&ctx)?;
    assert_eq!(
        scope.filters(),
        &[
            StoreFilter::Active,
            StoreFilter::Taxon(vec![TABLES]),
            StoreFilter::IdIn(vec![4])
        ]
    );

    Ok(())
}

#[test]
fn test_base_scope_without_matches_is_sentinel() -> Result<()> {
    let fixture = fixture();
    let ctx = SearchContext::new().with_keywords("zebra");

    let scope = fixture.search.base_scope(&ctx)?;
    assert!(scope.is_match_nothing());
    assert!(fixture.search.store().fetch(&scope)?.is_empty());

    Ok(())
}

#[test]
fn test_scoped_listing_pages_locally() -> Result<()> {
    let fixture = fixture();
    let ctx = SearchContext::new().with_keywords("chair").with_page(2, 2);

    let result = fixture.search.retrieve_scoped(&ctx)?;
    assert_eq!(result.ids(), vec![3]);
    assert_eq!(result.total_hits, 3);

    Ok(())
}

#[test]
fn test_scoped_listing_keeps_facets_open() -> Result<()> {
    let fixture = fixture();
    let ctx = SearchContext::new().with_filter("color", json!("brown"));

    let result = fixture.search.retrieve_scoped(&ctx)?;
    assert_eq!(result.ids(), vec![1, 4]);
    assert_eq!(result.facet_count("color", "red"), 2);
    assert_eq!(result.facet_count("category", "chairs"), 1);

    Ok(())
}
