//! A single facet filter clause.

use serde::{Deserialize, Serialize};

use crate::index::IndexFilter;
use crate::params::FilterValue;

/// A filter on one facet, optionally left out of one facet's own counts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilterClause {
    /// The facet (field) filtered on.
    pub facet: String,
    /// Accepted value(s).
    pub value: FilterValue,
    /// Facet whose counts ignore this clause.
    pub exclusion: Option<String>,
}

impl FilterClause {
    /// A sticky clause: its own facet is counted without it.
    pub fn new<S: Into<String>>(facet: S, value: FilterValue) -> Self {
        let facet = facet.into();
        FilterClause {
            exclusion: Some(facet.clone()),
            facet,
            value,
        }
    }

    /// A clause that every facet is counted under.
    pub fn plain<S: Into<String>>(facet: S, value: FilterValue) -> Self {
        FilterClause {
            facet: facet.into(),
            value,
            exclusion: None,
        }
    }

    /// Set the facet whose counts ignore this clause.
    pub fn with_exclusion(mut self, facet: Option<String>) -> Self {
        self.exclusion = facet;
        self
    }

    /// A clause without values contributes nothing.
    pub fn is_empty(&self) -> bool {
        self.value.is_empty()
    }

    /// Tag carried by the index filter, referenced by facet exclusions.
    pub fn tag(&self) -> &str {
        &self.facet
    }

    /// The index filter this clause becomes.
    pub fn to_index_filter(&self) -> IndexFilter {
        IndexFilter::tagged(self.facet.clone(), self.value.clone(), self.tag())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sticky_by_default() {
        let clause = FilterClause::new("color", FilterValue::scalar("red"));
        assert_eq!(clause.exclusion.as_deref(), Some("color"));
        assert_eq!(clause.tag(), "color");
        assert_eq!(clause.to_index_filter().tag(), Some("color"));

        let plain = FilterClause::plain("color", FilterValue::scalar("red"));
        assert!(plain.exclusion.is_none());
    }

    #[test]
    fn test_empty_clause() {
        assert!(FilterClause::new("color", FilterValue::list(Vec::<String>::new())).is_empty());
        assert!(!FilterClause::new("price", FilterValue::range("1", "2")).is_empty());
    }
}
