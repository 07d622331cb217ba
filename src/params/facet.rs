//! Facet requests.

use serde::{Deserialize, Serialize};

use crate::params::value::RangeValue;

/// How facet values are ordered in the counts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FacetSort {
    /// Highest count first, ties by value.
    #[default]
    Count,
    /// By value.
    Index,
}

/// A labelled range bucket of a ranged facet.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FacetBucket {
    /// Label reported with the bucket's count.
    pub label: String,
    /// Inclusive bounds of the bucket.
    pub range: RangeValue,
}

impl FacetBucket {
    /// Create a new bucket.
    pub fn new<S: Into<String>>(label: S, range: RangeValue) -> Self {
        FacetBucket {
            label: label.into(),
            range,
        }
    }
}

/// A facet to count alongside the results.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FacetRequest {
    /// The facet (field) name.
    pub name: String,
    /// Maximum number of values reported. `None` reports every value.
    pub limit: Option<usize>,
    /// Ordering of the reported values.
    pub sort: FacetSort,
    /// Range buckets. Empty for a plain value facet.
    pub buckets: Vec<FacetBucket>,
}

impl FacetRequest {
    /// Create a plain value facet with no limit.
    pub fn new<S: Into<String>>(name: S) -> Self {
        FacetRequest {
            name: name.into(),
            limit: None,
            sort: FacetSort::Count,
            buckets: Vec::new(),
        }
    }

    /// Limit the number of reported values.
    pub fn with_limit(mut self, limit: usize) -> Self {
        self.limit = Some(limit);
        self
    }

    /// Set the value ordering.
    pub fn with_sort(mut self, sort: FacetSort) -> Self {
        self.sort = sort;
        self
    }

    /// Add a range bucket.
    pub fn with_bucket(mut self, bucket: FacetBucket) -> Self {
        self.buckets.push(bucket);
        self
    }

    /// Create a ranged facet of `count` equal-width buckets over `[min, max]`.
    ///
    /// Consecutive buckets share their boundary; the inclusive bounds make a
    /// boundary value count in both.
    pub fn numeric_buckets<S: Into<String>>(name: S, min: f64, max: f64, count: usize) -> Self {
        let mut request = FacetRequest::new(name);
        if count == 0 || !(max > min) {
            return request;
        }

        let step = (max - min) / count as f64;
        for i in 0..count {
            let low = min + i as f64 * step;
            let high = if i == count - 1 { max } else { low + step };
            request.buckets.push(FacetBucket::new(
                format!("[{low} TO {high}]"),
                RangeValue::new(low.to_string(), high.to_string()),
            ));
        }
        request
    }

    /// Whether this facet counts range buckets rather than values.
    pub fn is_ranged(&self) -> bool {
        !self.buckets.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plain_facet() {
        let facet = FacetRequest::new("group").with_limit(5);
        assert_eq!(facet.limit, Some(5));
        assert!(!facet.is_ranged());
    }

    #[test]
    fn test_numeric_buckets() {
        let facet = FacetRequest::numeric_buckets("price", 0.0, 100.0, 4);
        assert!(facet.is_ranged());
        assert_eq!(facet.buckets.len(), 4);
        assert_eq!(facet.buckets[0].range, RangeValue::new("0", "25"));
        assert_eq!(facet.buckets[3].range, RangeValue::new("75", "100"));
        assert!(facet.buckets[1].range.contains("30"));
    }

    #[test]
    fn test_degenerate_buckets() {
        assert!(!FacetRequest::numeric_buckets("price", 0.0, 10.0, 0).is_ranged());
        assert!(!FacetRequest::numeric_buckets("price", 10.0, 10.0, 3).is_ranged());
    }
}
