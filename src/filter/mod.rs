//! Filter condition engine: facet filters with sticky exclusion semantics.

pub mod clause;
pub mod condition;

pub use self::clause::FilterClause;
pub use self::condition::FilterConditions;
