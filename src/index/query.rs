//! The query value handed to a [`SearchIndex`](crate::index::SearchIndex).
//!
//! [`IndexQuery`] is a plain description of one index request: an optional
//! fulltext part, facet requests, filters, ordering and a page. It is built
//! by the query composer and interpreted by the index implementation.

use serde::{Deserialize, Serialize};

use crate::geo::GeoPoint;
use crate::params::{FacetBucket, FacetRequest, FacetSort, FilterValue, OrderBy, Page};

/// Smallest popularity offset of the popularity boost.
pub const POPULARITY_EPSILON: f64 = 0.01;

/// Multiplicative score boost from a popularity signal.
///
/// `boost(p) = 1 + (1 - ln(p + ε) / ln ε) / 20`. The boost is exactly 1 at
/// zero popularity and grows logarithmically with it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PopularityBoost {
    /// Field holding the popularity signal.
    pub field: String,
    /// Offset keeping the logarithm finite at zero popularity.
    pub epsilon: f64,
}

impl PopularityBoost {
    pub fn new<S: Into<String>>(field: S) -> Self {
        PopularityBoost {
            field: field.into(),
            epsilon: POPULARITY_EPSILON,
        }
    }

    /// The multiplicative factor for a popularity value.
    pub fn factor(&self, popularity: f64) -> f64 {
        let popularity = popularity.max(0.0);
        1.0 + (1.0 - (popularity + self.epsilon).ln() / self.epsilon.ln()) / 20.0
    }
}

/// The fulltext part of a query.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FulltextQuery {
    /// The raw term.
    pub term: String,
    /// Fields and their boosts.
    pub fields: Vec<(String, f32)>,
    /// Phrase fields and their boosts.
    pub phrase_fields: Vec<(String, f32)>,
    /// Minimum-match expression.
    pub minimum_match: String,
    /// Tie-break weight for non-best fields.
    pub tie: f32,
    /// Popularity boost, if enabled.
    pub boost: Option<PopularityBoost>,
}

/// A filter on the index.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum IndexFilter {
    /// Field value(s) must satisfy `value`. Facets listing `tag` in their
    /// exclusions are counted without this filter.
    Field {
        field: String,
        value: FilterValue,
        tag: Option<String>,
    },
    /// Every term of `text` must appear in one of `fields`.
    Keywords { text: String, fields: Vec<String> },
    /// A `"lat,lon"` field must lie within `radius_km` of `center`.
    GeoRadius {
        field: String,
        center: GeoPoint,
        radius_km: f64,
    },
}

impl IndexFilter {
    /// An untagged field filter.
    pub fn field<S: Into<String>>(field: S, value: FilterValue) -> Self {
        IndexFilter::Field {
            field: field.into(),
            value,
            tag: None,
        }
    }

    /// A tagged field filter.
    pub fn tagged<S: Into<String>, T: Into<String>>(field: S, value: FilterValue, tag: T) -> Self {
        IndexFilter::Field {
            field: field.into(),
            value,
            tag: Some(tag.into()),
        }
    }

    /// The exclusion tag, if any.
    pub fn tag(&self) -> Option<&str> {
        match self {
            IndexFilter::Field { tag, .. } => tag.as_deref(),
            _ => None,
        }
    }
}

/// A facet to count, with the filter tags it ignores.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FacetSpec {
    /// Facet (field) name.
    pub name: String,
    /// Maximum number of reported values.
    pub limit: Option<usize>,
    /// Value ordering.
    pub sort: FacetSort,
    /// Range buckets. Empty for a value facet.
    pub buckets: Vec<FacetBucket>,
    /// Tags of filters left out when counting this facet.
    pub excluded_tags: Vec<String>,
}

impl FacetSpec {
    /// Stop counting this facet under filters tagged `tag`.
    pub fn exclude<S: Into<String>>(&mut self, tag: S) {
        let tag = tag.into();
        if !self.excluded_tags.contains(&tag) {
            self.excluded_tags.push(tag);
        }
    }

    /// Whether filters tagged `tag` are left out of this facet's counts.
    pub fn excludes(&self, tag: &str) -> bool {
        self.excluded_tags.iter().any(|t| t == tag)
    }
}

impl From<&FacetRequest> for FacetSpec {
    fn from(request: &FacetRequest) -> Self {
        FacetSpec {
            name: request.name.clone(),
            limit: request.limit,
            sort: request.sort,
            buckets: request.buckets.clone(),
            excluded_tags: Vec::new(),
        }
    }
}

/// One request against the search index.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IndexQuery {
    fulltext: Option<FulltextQuery>,
    facets: Vec<FacetSpec>,
    filters: Vec<IndexFilter>,
    order: Vec<OrderBy>,
    page: Page,
}

impl Default for IndexQuery {
    fn default() -> Self {
        Self::new()
    }
}

impl IndexQuery {
    /// Create a query matching every document, first page of ten.
    pub fn new() -> Self {
        IndexQuery {
            fulltext: None,
            facets: Vec::new(),
            filters: Vec::new(),
            order: Vec::new(),
            page: Page::new(1, 10),
        }
    }

    /// Attach a fulltext part.
    pub fn fulltext(&mut self, fulltext: FulltextQuery) -> &mut Self {
        self.fulltext = Some(fulltext);
        self
    }

    /// Attach a facet.
    pub fn facet(&mut self, facet: FacetSpec) -> &mut Self {
        self.facets.push(facet);
        self
    }

    /// Attach a filter.
    pub fn filter(&mut self, filter: IndexFilter) -> &mut Self {
        self.filters.push(filter);
        self
    }

    /// Append an ordering clause.
    pub fn order_by(&mut self, order: OrderBy) -> &mut Self {
        self.order.push(order);
        self
    }

    /// Set the requested page.
    pub fn paginate(&mut self, page: Page) -> &mut Self {
        self.page = page;
        self
    }

    pub fn fulltext_query(&self) -> Option<&FulltextQuery> {
        self.fulltext.as_ref()
    }

    pub fn facets(&self) -> &[FacetSpec] {
        &self.facets
    }

    pub(crate) fn facets_mut(&mut self) -> &mut [FacetSpec] {
        &mut self.facets
    }

    pub fn filters(&self) -> &[IndexFilter] {
        &self.filters
    }

    pub fn order(&self) -> &[OrderBy] {
        &self.order
    }

    pub fn page(&self) -> Page {
        self.page
    }

    /// Get a human-readable description of this query.
    pub fn description(&self) -> String {
        let term = self
            .fulltext
            .as_ref()
            .map(|f| f.term.as_str())
            .unwrap_or("*");
        let order: Vec<String> = self.order.iter().map(|o| o.to_string()).collect();
        format!(
            "IndexQuery(q:{}, facets:{}, filters:{}, order:[{}], page:{}x{})",
            term,
            self.facets.len(),
            self.filters.len(),
            order.join(", "),
            self.page.page,
            self.page.per_page
        )
    }
}

/// Options of a more-like-this request.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MoreLikeThisOptions {
    /// Weight shared terms by how rare they are.
    pub boost_by_relevance: bool,
    /// Requested page.
    pub page: Page,
}

/// Number of optional clauses that must match under a minimum-match expression.
///
/// Accepts `"3"`, `"-1"`, `"75%"`, `"-25%"` and conditional chains such as
/// `"2<-1 5<80%"` (up to 2 clauses all are required, above 2 one may be
/// missing, above 5 80% are required). Unreadable expressions require every
/// clause. The result is always between 1 and `clauses` when `clauses > 0`.
pub fn required_matches(expression: &str, clauses: usize) -> usize {
    if clauses == 0 {
        return 0;
    }

    let expression = expression.trim();
    let required = if expression.is_empty() {
        Some(clauses)
    } else if expression.contains('<') {
        conditional_matches(expression, clauses)
    } else {
        simple_matches(expression, clauses)
    };

    required.unwrap_or(clauses).clamp(1, clauses)
}

fn conditional_matches(expression: &str, clauses: usize) -> Option<usize> {
    let mut required = clauses;
    let mut steps: Vec<(usize, &str)> = Vec::new();
    for part in expression.split_whitespace() {
        let (threshold, spec) = part.split_once('<')?;
        steps.push((threshold.trim().parse().ok()?, spec));
    }
    steps.sort_by_key(|(threshold, _)| *threshold);

    for (threshold, spec) in steps {
        if clauses > threshold {
            required = simple_matches(spec, clauses)?;
        }
    }
    Some(required)
}

fn simple_matches(spec: &str, clauses: usize) -> Option<usize> {
    let spec = spec.trim();
    let (negative, body) = match spec.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, spec),
    };

    let amount = if let Some(percent) = body.strip_suffix('%') {
        let percent: f64 = percent.trim().parse().ok()?;
        (clauses as f64 * percent / 100.0).floor() as usize
    } else {
        body.parse::<usize>().ok()?
    };

    if negative {
        Some(clauses.saturating_sub(amount))
    } else {
        Some(amount)
    }
}
