//! Query composition: named configuration plus request context to index query.

pub mod composed;
pub mod composer;

pub use self::composed::{ComposedQuery, ExecutedQuery};
pub use self::composer::{
    FEATURED_FIELD, LOCATION_FIELD, PRICE_FIELD, QueryComposer, STORE_FIELD, TAXON_FIELD,
};
