//! Turning a named configuration and a request into an index query.

use std::sync::Arc;

use log::debug;

use crate::compose::composed::ComposedQuery;
use crate::config::SearchConfig;
use crate::index::{FacetSpec, FulltextQuery, IndexFilter, IndexQuery, PopularityBoost};
use crate::params::{FilterValue, OrderBy, Page, SearchContext, SearchParameters};

/// Index field holding the stores a product is sold in.
pub const STORE_FIELD: &str = "store_ids";
/// Index field holding the product price.
pub const PRICE_FIELD: &str = "price";
/// Index field holding the featured flag.
pub const FEATURED_FIELD: &str = "featured";
/// Index field holding `"lat,lon"` coordinates.
pub const LOCATION_FIELD: &str = "location";
/// Index field holding the taxons a product is classified under.
pub const TAXON_FIELD: &str = "taxon_ids";

/// Builds [`ComposedQuery`] values.
///
/// Composition is a pure function of its inputs: the same parameters and
/// context always produce equal queries.
#[derive(Debug, Clone)]
pub struct QueryComposer {
    config: Arc<SearchConfig>,
}

impl QueryComposer {
    pub fn new(config: Arc<SearchConfig>) -> Self {
        QueryComposer { config }
    }

    pub fn config(&self) -> &SearchConfig {
        &self.config
    }

    /// Compose the index query for `params` under `ctx`.
    ///
    /// `params` is expected to already carry the request's overrides (see
    /// [`SearchParameters::merged`]). From `ctx` only the price range, the
    /// location, the taxon scope and the ordering override are read.
    pub fn compose(&self, params: &SearchParameters, ctx: &SearchContext) -> ComposedQuery {
        let mut query = IndexQuery::new();
        let term = params.term();

        if let Some(term) = term {
            query.fulltext(self.fulltext(params, term));
        }

        for facet in &params.facets {
            query.facet(FacetSpec::from(facet));
        }

        if let Some(store) = params.store.as_deref() {
            query.filter(IndexFilter::field(STORE_FIELD, FilterValue::scalar(store)));
        }

        for filter in &params.static_filters {
            query.filter(IndexFilter::field(filter.field.clone(), filter.value.clone()));
        }

        if let Some(restriction) = params
            .keyword_restriction
            .as_deref()
            .map(str::trim)
            .filter(|r| !r.is_empty())
        {
            query.filter(IndexFilter::Keywords {
                text: restriction.to_string(),
                fields: params
                    .fulltext
                    .fields
                    .iter()
                    .map(|(field, _)| field.clone())
                    .collect(),
            });
        }

        if params.price_filter
            && let Some(price) = &ctx.price
        {
            // Inverted bounds are passed through and simply match nothing.
            query.filter(IndexFilter::field(
                PRICE_FIELD,
                FilterValue::Range(price.to_range()),
            ));
        }

        if params.featured_only {
            query.filter(IndexFilter::field(FEATURED_FIELD, FilterValue::scalar("true")));
        }

        if let Some(center) = ctx.location {
            query.filter(IndexFilter::GeoRadius {
                field: LOCATION_FIELD.to_string(),
                center,
                radius_km: self.config.geo_radius_km,
            });
        }

        if !ctx.taxon_ids.is_empty() {
            query.filter(IndexFilter::field(
                TAXON_FIELD,
                FilterValue::list(ctx.taxon_ids.iter().map(u64::to_string)),
            ));
        }

        for order in self.ordering(params, ctx, term.is_some()) {
            query.order_by(order);
        }

        query.paginate(self.page(params));

        let composed = ComposedQuery::new(params.name.clone(), query);
        debug!("composed {}", composed.description());
        composed
    }

    fn fulltext(&self, params: &SearchParameters, term: &str) -> FulltextQuery {
        let options = &params.fulltext;
        FulltextQuery {
            term: term.to_string(),
            fields: options.fields.clone(),
            phrase_fields: options.phrase_fields.clone(),
            minimum_match: options.minimum_match.clone(),
            tie: options.tie,
            boost: options
                .popularity_boost
                .then(|| PopularityBoost::new(options.popularity_field.clone())),
        }
    }

    /// Score first when asked and a term is present, then the configured
    /// clauses, then the caller's override.
    fn ordering(
        &self,
        params: &SearchParameters,
        ctx: &SearchContext,
        has_term: bool,
    ) -> Vec<OrderBy> {
        let mut order = Vec::with_capacity(params.order_by.len() + 2);
        if has_term && params.order_by_score {
            order.push(OrderBy::score());
        }
        order.extend(params.order_by.iter().cloned());
        if let Some(custom) = &ctx.order_by {
            order.push(custom.clone());
        }
        order
    }

    fn page(&self, params: &SearchParameters) -> Page {
        if params.paginate {
            params.page()
        } else {
            Page::new(1, self.config.unbounded_page_size)
        }
    }
}
