//! Parameter model: named search configurations and per-request input.

pub mod context;
pub mod facet;
pub mod order;
pub mod parameters;
pub mod value;

pub use self::context::{PriceRange, SearchContext};
pub use self::facet::{FacetBucket, FacetRequest, FacetSort};
pub use self::order::{Direction, OrderBy, SCORE_FIELD};
pub use self::parameters::{
    FulltextOptions, Page, Pagination, ParameterOverrides, SearchParameters, StaticFilter,
};
pub use self::value::{FilterValue, RangeValue, compare_tokens};
