//! The caller-facing search service.
//!
//! [`CatalogSearch`] wires the composer, the filter engine, the reconciler,
//! the keyword interceptor and the similarity reorderer to one index and one
//! store. It is `Send + Sync` and meant to be shared behind an `Arc`.

use std::sync::Arc;

use log::debug;

use crate::compose::{ComposedQuery, ExecutedQuery, QueryComposer};
use crate::config::SearchConfig;
use crate::error::Result;
use crate::filter::FilterConditions;
use crate::index::{FacetCount, SearchIndex};
use crate::intercept::KeywordInterceptor;
use crate::params::{SearchContext, SearchParameters};
use crate::product::{Product, ProductId};
use crate::reconcile::{ReconciledResult, Reconciler, reorder_by_hits, restrict_to_hits};
use crate::similarity::SimilarityReorderer;
use crate::store::{ProductStore, StoreQuery};

/// Facet holding product groups within a category.
pub const GROUP_FACET: &str = "group";

/// Storefront search over a search index and a product store.
#[derive(Debug, Clone)]
pub struct CatalogSearch {
    config: Arc<SearchConfig>,
    index: Arc<dyn SearchIndex>,
    store: Arc<dyn ProductStore>,
    composer: QueryComposer,
    reconciler: Reconciler,
    interceptor: KeywordInterceptor,
    similarity: SimilarityReorderer,
}

impl CatalogSearch {
    pub fn new(
        config: Arc<SearchConfig>,
        index: Arc<dyn SearchIndex>,
        store: Arc<dyn ProductStore>,
    ) -> Self {
        let reconciler = Reconciler::new(index.clone(), store.clone());
        CatalogSearch {
            composer: QueryComposer::new(config.clone()),
            interceptor: KeywordInterceptor::new(store.clone(), config.identifier_field.clone()),
            similarity: SimilarityReorderer::new(index.clone(), reconciler.clone()),
            reconciler,
            config,
            index,
            store,
        }
    }

    pub fn config(&self) -> &SearchConfig {
        &self.config
    }

    pub fn index(&self) -> &Arc<dyn SearchIndex> {
        &self.index
    }

    pub fn store(&self) -> &Arc<dyn ProductStore> {
        &self.store
    }

    /// Compose `template` under `ctx`: merge the request's overrides, build
    /// the index query and inject the caller's facet filters.
    pub fn compose(&self, template: &SearchParameters, ctx: &SearchContext) -> ComposedQuery {
        let params = template.merged(&ctx.overrides());
        let composed = self.composer.compose(&params, ctx);
        FilterConditions::parse(&ctx.filters).build_search(composed)
    }

    /// The product listing for `ctx`, in index order.
    pub fn retrieve_products(&self, ctx: &SearchContext) -> Result<ReconciledResult> {
        let query = self.compose(&SearchParameters::products(&self.config), ctx);
        self.reconciler.reconcile(query, StoreQuery::find_active())
    }

    /// Featured products. No featured product is an empty result.
    pub fn retrieve_featured(&self, ctx: &SearchContext) -> Result<ReconciledResult> {
        let query = self.compose(&SearchParameters::featured(&self.config), ctx);
        self.reconciler.reconcile(query, StoreQuery::find_active())
    }

    /// Products related to `theme`.
    pub fn retrieve_related(&self, ctx: &SearchContext, theme: &str) -> Result<ReconciledResult> {
        let query = self.compose(&SearchParameters::related(&self.config, theme), ctx);
        self.reconciler.reconcile(query, StoreQuery::find_active())
    }

    /// Group counts among active products in `category`.
    pub fn group_facet_counts(
        &self,
        ctx: &SearchContext,
        category: &str,
    ) -> Result<Vec<FacetCount>> {
        let query = self.compose(&SearchParameters::groups(&self.config, category), ctx);
        let executed = query.execute(self.index.as_ref())?;
        Ok(executed.facet(GROUP_FACET).map(<[_]>::to_vec).unwrap_or_default())
    }

    /// Active, in-stock products similar to `product`, compared on `fields`.
    ///
    /// Returns `ctx.total_similar_products` products at most, or the
    /// configured number when the request does not say.
    pub fn similar_products(
        &self,
        ctx: &SearchContext,
        product: ProductId,
        fields: &[String],
    ) -> Result<ReconciledResult> {
        let limit = ctx.similar_limit(self.config.total_similar_products);
        self.similarity.similar(product, fields, limit)
    }

    /// The active product a keyword names exactly, for a direct redirect.
    pub fn intercept(&self, keyword: Option<&str>) -> Result<Option<Product>> {
        self.interceptor.intercept(keyword)
    }

    /// The store scope of active products in the caller's taxon that the
    /// index matched for `ctx`.
    ///
    /// When the index matches nothing the scope matches nothing.
    pub fn base_scope(&self, ctx: &SearchContext) -> Result<StoreQuery> {
        let (scope, _) = self.scope(ctx)?;
        Ok(scope)
    }

    /// The base scope materialised in index order, paged locally with the
    /// request's page and page size.
    ///
    /// `total_hits` is the number of products in the whole scope.
    pub fn retrieve_scoped(&self, ctx: &SearchContext) -> Result<ReconciledResult> {
        let (scope, executed) = self.scope(ctx)?;
        let ids = executed.ids();
        let rows = reorder_by_hits(self.store.fetch(&scope)?, &ids);

        let params = SearchParameters::products(&self.config).merged(&ctx.overrides());
        let page = params.page();
        let total_hits = rows.len() as u64;
        let products: Vec<Product> = rows
            .into_iter()
            .skip(page.offset())
            .take(page.per_page)
            .collect();
        debug!(
            "scoped listing page {} holds {} of {} product(s)",
            page.page,
            products.len(),
            total_hits
        );

        Ok(ReconciledResult {
            products,
            total_hits,
            facets: executed.into_result().facets,
        })
    }

    fn scope(&self, ctx: &SearchContext) -> Result<(StoreQuery, ExecutedQuery)> {
        let query = self.compose(&SearchParameters::base_scope(&self.config), ctx);
        let executed = query.execute(self.index.as_ref())?;

        let mut base = StoreQuery::find_active();
        if !ctx.taxon_ids.is_empty() {
            base = base.filter_by_taxons(ctx.taxon_ids.clone());
        }
        let ids = if executed.total() == 0 {
            Vec::new()
        } else {
            executed.ids()
        };
        Ok((restrict_to_hits(base, &ids), executed))
    }
}
