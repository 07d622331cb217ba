//! Command implementations for the catalog-search CLI.

use std::fs;
use std::path::Path;
use std::sync::Arc;
use std::time::Instant;

use anyhow::Context;
use chrono::Utc;
use serde_json::Value;

use crate::cli::args::*;
use crate::cli::output::*;
use crate::config::SearchConfig;
use crate::error::{CatalogError, Result};
use crate::index::{IndexDocument, MemoryIndex};
use crate::params::SearchContext;
use crate::product::Product;
use crate::service::CatalogSearch;
use crate::store::{MemoryStore, ProductStore, StoreQuery};

/// Execute a CLI command.
pub fn execute_command(args: CatalogArgs) -> Result<()> {
    let config = match &args.config {
        Some(path) => SearchConfig::from_file(path)?,
        None => SearchConfig::default(),
    };
    let search = load_catalog(&args.catalog, config)?;

    match &args.command {
        Command::Search(search_args) => search_products(&search, search_args, &args),
        Command::Featured(page_args) => list_featured(&search, page_args, &args),
        Command::Related(related_args) => list_related(&search, related_args, &args),
        Command::Groups(groups_args) => count_groups(&search, groups_args, &args),
        Command::Similar(similar_args) => find_similar(&search, similar_args, &args),
        Command::Intercept(intercept_args) => intercept_keyword(&search, intercept_args, &args),
    }
}

/// Load a JSON array of products into in-memory collaborators.
pub fn load_catalog<P: AsRef<Path>>(path: P, config: SearchConfig) -> Result<CatalogSearch> {
    let path = path.as_ref();
    let contents = fs::read_to_string(path)?;
    let products: Vec<Product> = serde_json::from_str(&contents)
        .with_context(|| format!("{} is not a product catalog", path.display()))?;
    log::info!("loaded {} product(s) from {}", products.len(), path.display());
    Ok(catalog_search(products, config))
}

/// Index `products` and serve them from memory.
pub fn catalog_search(products: Vec<Product>, config: SearchConfig) -> CatalogSearch {
    let now = Utc::now();
    let index = MemoryIndex::with_documents(
        products
            .iter()
            .map(|product| IndexDocument::from_product(product, now))
            .collect(),
    );
    let store = MemoryStore::with_products(products);
    CatalogSearch::new(Arc::new(config), Arc::new(index), Arc::new(store))
}

fn page_context(page: &PageArgs) -> SearchContext {
    SearchContext {
        page: page.page,
        per_page: page.per_page,
        ..SearchContext::default()
    }
}

/// Build the request context of a search command.
pub fn search_context(args: &SearchArgs) -> SearchContext {
    let mut ctx = page_context(&args.page);
    ctx.keywords = args.keywords.clone();
    ctx.narrow_keywords = args.narrow.clone();
    for (facet, value) in args.filter_pairs() {
        ctx.filters.insert(facet, Value::String(value));
    }
    ctx.price = args.price.clone();
    ctx.order_by = args.order_by.clone();
    ctx.taxon_ids = args.taxons.clone();
    ctx.store = args.store.clone();
    ctx.location = args.near;
    ctx
}

fn search_products(
    search: &CatalogSearch,
    args: &SearchArgs,
    cli_args: &CatalogArgs,
) -> Result<()> {
    let ctx = search_context(args);
    let start = Instant::now();
    let result = if args.scoped {
        search.retrieve_scoped(&ctx)?
    } else {
        search.retrieve_products(&ctx)?
    };
    let listing = ProductListing::new(&result, start.elapsed().as_millis() as u64);
    output_result("Search results", &listing, cli_args)
}

fn list_featured(search: &CatalogSearch, args: &PageArgs, cli_args: &CatalogArgs) -> Result<()> {
    let start = Instant::now();
    let result = search.retrieve_featured(&page_context(args))?;
    let listing = ProductListing::new(&result, start.elapsed().as_millis() as u64);
    output_result("Featured products", &listing, cli_args)
}

fn list_related(search: &CatalogSearch, args: &RelatedArgs, cli_args: &CatalogArgs) -> Result<()> {
    let start = Instant::now();
    let result = search.retrieve_related(&SearchContext::default(), &args.theme)?;
    let listing = ProductListing::new(&result, start.elapsed().as_millis() as u64);
    output_result(
        &format!("Products related to '{}'", args.theme),
        &listing,
        cli_args,
    )
}

fn count_groups(search: &CatalogSearch, args: &GroupsArgs, cli_args: &CatalogArgs) -> Result<()> {
    let ctx = SearchContext {
        narrow_keywords: args.narrow.clone(),
        ..SearchContext::default()
    };
    let counts = search.group_facet_counts(&ctx, &args.category)?;
    output_result(
        &format!("Groups in '{}'", args.category),
        &GroupCounts::new(args.category.clone(), &counts),
        cli_args,
    )
}

fn find_similar(search: &CatalogSearch, args: &SimilarArgs, cli_args: &CatalogArgs) -> Result<()> {
    let ctx = SearchContext {
        total_similar_products: args.limit,
        ..SearchContext::default()
    };
    let start = Instant::now();
    let reference = StoreQuery::all().filter_by_identifier_in(vec![args.product]);
    if search.store().fetch(&reference)?.is_empty() {
        return Err(CatalogError::not_found(format!("product {}", args.product)));
    }
    let result = search.similar_products(&ctx, args.product, &args.fields)?;
    let listing = ProductListing::new(&result, start.elapsed().as_millis() as u64);
    output_result(
        &format!("Products similar to {}", args.product),
        &listing,
        cli_args,
    )
}

fn intercept_keyword(
    search: &CatalogSearch,
    args: &InterceptArgs,
    cli_args: &CatalogArgs,
) -> Result<()> {
    let redirect = search.intercept(Some(&args.keyword))?;
    output_result(
        "Keyword intercept",
        &InterceptResult {
            keyword: args.keyword.clone(),
            redirect: redirect.as_ref().map(ProductSummary::from),
        },
        cli_args,
    )
}
