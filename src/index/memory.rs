//! In-memory search index.
//!
//! A straightforward implementation of [`SearchIndex`] over a vector of
//! documents: fulltext scoring with per-field boosts and minimum match,
//! tagged filters, facet counts with exclusions, multi-key ordering,
//! pagination and a term-overlap more-like-this. Useful for tests and demos;
//! it scans every document on every request.

use std::cmp::Ordering;
use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicU64, Ordering as AtomicOrdering};

use chrono::{DateTime, Utc};
use parking_lot::RwLock;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use unicode_segmentation::UnicodeSegmentation;

use crate::error::Result;
use crate::geo::GeoPoint;
use crate::index::SearchIndex;
use crate::index::query::{
    FacetSpec, FulltextQuery, IndexFilter, IndexQuery, MoreLikeThisOptions, required_matches,
};
use crate::index::result::{FacetCount, FacetCounts, IndexHit, IndexResult};
use crate::params::{Direction, FacetSort, OrderBy, Page, compare_tokens};
use crate::product::{Product, ProductId};

/// A document as stored in the index: multi-valued text fields.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IndexDocument {
    /// Primary key of the product this document describes.
    pub id: ProductId,
    /// Field values.
    pub fields: HashMap<String, Vec<String>>,
}

impl IndexDocument {
    /// Create a document with no fields.
    pub fn new(id: ProductId) -> Self {
        IndexDocument {
            id,
            fields: HashMap::new(),
        }
    }

    /// Add a value to a field.
    pub fn add<F: Into<String>, V: Into<String>>(mut self, field: F, value: V) -> Self {
        self.fields
            .entry(field.into())
            .or_default()
            .push(value.into());
        self
    }

    /// All values of a field.
    pub fn values(&self, field: &str) -> &[String] {
        self.fields.get(field).map(Vec::as_slice).unwrap_or(&[])
    }

    /// The first value of a field.
    pub fn first(&self, field: &str) -> Option<&str> {
        self.values(field).first().map(String::as_str)
    }

    /// Describe a product the way the storefront indexes it.
    pub fn from_product(product: &Product, now: DateTime<Utc>) -> Self {
        let mut doc = IndexDocument::new(product.id)
            .add("name", product.name.clone())
            .add("sku", product.sku.clone())
            .add("is_active", product.is_active_at(now).to_string())
            .add("featured", product.featured.to_string())
            .add("in_stock", product.in_stock().to_string());
        for taxon in &product.taxon_ids {
            doc = doc.add("taxon_ids", taxon.to_string());
        }
        for (key, value) in &product.properties {
            doc = doc.add(key.clone(), value.clone());
        }
        doc
    }

    fn tokens(&self, field: &str) -> Vec<String> {
        self.values(field).iter().flat_map(|v| analyze(v)).collect()
    }
}

/// Lowercased unicode words.
fn analyze(text: &str) -> Vec<String> {
    text.unicode_words().map(str::to_lowercase).collect()
}

/// An in-memory [`SearchIndex`].
#[derive(Debug, Default)]
pub struct MemoryIndex {
    documents: RwLock<Vec<IndexDocument>>,
    /// Number of requests served.
    requests: AtomicU64,
}

impl MemoryIndex {
    /// Create an empty index.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an index holding `documents`.
    pub fn with_documents(documents: Vec<IndexDocument>) -> Self {
        let index = Self::new();
        index.add_documents(documents);
        index
    }

    /// Add a document, replacing any document with the same id.
    pub fn add_document(&self, document: IndexDocument) {
        let mut documents = self.documents.write();
        match documents.iter_mut().find(|d| d.id == document.id) {
            Some(existing) => *existing = document,
            None => documents.push(document),
        }
    }

    /// Add several documents.
    pub fn add_documents(&self, documents: Vec<IndexDocument>) {
        for document in documents {
            self.add_document(document);
        }
    }

    /// Remove a document. Returns whether it existed.
    pub fn remove_document(&self, id: ProductId) -> bool {
        let mut documents = self.documents.write();
        let before = documents.len();
        documents.retain(|d| d.id != id);
        documents.len() != before
    }

    /// Number of documents.
    pub fn len(&self) -> usize {
        self.documents.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Number of requests (queries and more-like-this) served so far.
    pub fn request_count(&self) -> u64 {
        self.requests.load(AtomicOrdering::Relaxed)
    }
}

impl SearchIndex for MemoryIndex {
    fn execute(&self, query: &IndexQuery) -> Result<IndexResult> {
        self.requests.fetch_add(1, AtomicOrdering::Relaxed);
        let documents = self.documents.read();
        let fulltext = query.fulltext_query().map(AnalyzedFulltext::new);

        // Documents satisfying the fulltext part, with their scores.
        let candidates: Vec<(usize, f32)> = documents
            .par_iter()
            .enumerate()
            .filter_map(|(pos, doc)| match &fulltext {
                Some(fulltext) => fulltext.score(doc).map(|score| (pos, score)),
                None => Some((pos, 1.0)),
            })
            .collect();

        let mut matched: Vec<(usize, f32)> = candidates
            .iter()
            .copied()
            .filter(|(pos, _)| passes_filters(&documents[*pos], query.filters(), None))
            .collect();

        let facets = count_facets(&documents, &candidates, query);

        let order: Vec<OrderBy> = if query.order().is_empty() && fulltext.is_some() {
            vec![OrderBy::score()]
        } else {
            query.order().to_vec()
        };
        matched.sort_by(|a, b| compare_matches(&documents, &order, a, b));

        Ok(IndexResult {
            total: matched.len() as u64,
            hits: page_hits(&documents, &matched, query.page()),
            facets,
        })
    }

    fn more_like_this(
        &self,
        reference: ProductId,
        fields: &[String],
        options: &MoreLikeThisOptions,
    ) -> Result<IndexResult> {
        self.requests.fetch_add(1, AtomicOrdering::Relaxed);
        let documents = self.documents.read();
        let Some(reference_doc) = documents.iter().find(|d| d.id == reference) else {
            return Ok(IndexResult::empty());
        };

        let reference_terms: Vec<HashSet<String>> = fields
            .iter()
            .map(|field| reference_doc.tokens(field).into_iter().collect())
            .collect();

        // Per document, per compared field, the distinct tokens.
        let token_sets: Vec<Vec<HashSet<String>>> = documents
            .par_iter()
            .map(|doc| {
                fields
                    .iter()
                    .map(|field| doc.tokens(field).into_iter().collect())
                    .collect()
            })
            .collect();

        let doc_count = documents.len() as f64;
        let weight = |field_pos: usize, term: &str| -> f64 {
            if !options.boost_by_relevance {
                return 1.0;
            }
            let df = token_sets
                .iter()
                .filter(|sets| sets[field_pos].contains(term))
                .count()
                .max(1) as f64;
            (doc_count / df).ln() + 1.0
        };

        let mut matched: Vec<(usize, f32)> = Vec::new();
        for (pos, doc) in documents.iter().enumerate() {
            if doc.id == reference {
                continue;
            }
            let mut score = 0.0;
            for (field_pos, terms) in reference_terms.iter().enumerate() {
                for term in terms.intersection(&token_sets[pos][field_pos]) {
                    score += weight(field_pos, term);
                }
            }
            if score > 0.0 {
                matched.push((pos, score as f32));
            }
        }
        matched.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(Ordering::Equal));

        Ok(IndexResult {
            total: matched.len() as u64,
            hits: page_hits(&documents, &matched, options.page),
            facets: FacetCounts::new(),
        })
    }
}

/// A fulltext query with its term analyzed once.
struct AnalyzedFulltext<'a> {
    query: &'a FulltextQuery,
    terms: Vec<String>,
    phrase: Vec<String>,
    required: usize,
}

impl<'a> AnalyzedFulltext<'a> {
    fn new(query: &'a FulltextQuery) -> Self {
        let phrase = analyze(&query.term);
        let mut terms: Vec<String> = Vec::new();
        for token in &phrase {
            if !terms.contains(token) {
                terms.push(token.clone());
            }
        }
        let required = required_matches(&query.minimum_match, terms.len());
        AnalyzedFulltext {
            query,
            terms,
            phrase,
            required,
        }
    }

    /// Score a document, or `None` when it does not match.
    fn score(&self, doc: &IndexDocument) -> Option<f32> {
        if self.terms.is_empty() {
            return None;
        }

        let mut matched_terms: HashSet<&str> = HashSet::new();
        let mut field_scores: Vec<f64> = Vec::with_capacity(self.query.fields.len());
        for (field, boost) in &self.query.fields {
            let tokens = doc.tokens(field);
            let mut frequency = 0usize;
            for term in &self.terms {
                let tf = tokens.iter().filter(|t| *t == term).count();
                if tf > 0 {
                    matched_terms.insert(term.as_str());
                    frequency += tf;
                }
            }
            field_scores.push(*boost as f64 * frequency as f64);
        }

        if matched_terms.len() < self.required {
            return None;
        }

        let best = field_scores.iter().cloned().fold(0.0, f64::max);
        let sum: f64 = field_scores.iter().sum();
        let mut score = best + self.query.tie as f64 * (sum - best);

        if self.phrase.len() > 1 {
            for (field, boost) in &self.query.phrase_fields {
                let tokens = doc.tokens(field);
                if tokens.windows(self.phrase.len()).any(|w| w == self.phrase.as_slice()) {
                    score += *boost as f64;
                }
            }
        }

        if let Some(boost) = &self.query.boost {
            let popularity = doc
                .first(&boost.field)
                .and_then(|v| v.trim().parse::<f64>().ok())
                .unwrap_or(0.0);
            score *= boost.factor(popularity);
        }

        Some(score as f32)
    }
}

/// Check a document against every filter, skipping those `facet` excludes.
fn passes_filters(doc: &IndexDocument, filters: &[IndexFilter], facet: Option<&FacetSpec>) -> bool {
    filters.iter().all(|filter| {
        if let (Some(facet), Some(tag)) = (facet, filter.tag()) {
            if facet.excludes(tag) {
                return true;
            }
        }
        matches_filter(doc, filter)
    })
}

fn matches_filter(doc: &IndexDocument, filter: &IndexFilter) -> bool {
    match filter {
        IndexFilter::Field { field, value, .. } => {
            value.is_empty() || value.matches_any(doc.values(field))
        }
        IndexFilter::Keywords { text, fields } => {
            let field_tokens: HashSet<String> =
                fields.iter().flat_map(|field| doc.tokens(field)).collect();
            analyze(text).iter().all(|term| field_tokens.contains(term))
        }
        IndexFilter::GeoRadius {
            field,
            center,
            radius_km,
        } => doc.values(field).iter().any(|value| {
            value
                .parse::<GeoPoint>()
                .is_ok_and(|point| point.distance_to(center) <= *radius_km)
        }),
    }
}

fn count_facets(
    documents: &[IndexDocument],
    candidates: &[(usize, f32)],
    query: &IndexQuery,
) -> FacetCounts {
    let mut facets = FacetCounts::new();
    for spec in query.facets() {
        let docs: Vec<&IndexDocument> = candidates
            .iter()
            .map(|(pos, _)| &documents[*pos])
            .filter(|doc| passes_filters(doc, query.filters(), Some(spec)))
            .collect();

        let counts = if spec.buckets.is_empty() {
            count_values(&docs, spec)
        } else {
            spec.buckets
                .iter()
                .map(|bucket| {
                    let count = docs
                        .iter()
                        .filter(|doc| {
                            doc.values(&spec.name)
                                .iter()
                                .any(|v| bucket.range.contains(v))
                        })
                        .count();
                    FacetCount::new(bucket.label.clone(), count as u64)
                })
                .collect()
        };
        facets.insert(spec.name.clone(), counts);
    }
    facets
}

fn count_values(docs: &[&IndexDocument], spec: &FacetSpec) -> Vec<FacetCount> {
    let mut counts: HashMap<&str, u64> = HashMap::new();
    for doc in docs {
        let distinct: HashSet<&str> = doc.values(&spec.name).iter().map(String::as_str).collect();
        for value in distinct {
            *counts.entry(value).or_insert(0) += 1;
        }
    }

    let mut counts: Vec<FacetCount> = counts
        .into_iter()
        .map(|(value, count)| FacetCount::new(value, count))
        .collect();
    match spec.sort {
        FacetSort::Count => {
            counts.sort_by(|a, b| b.count.cmp(&a.count).then(a.value.cmp(&b.value)))
        }
        FacetSort::Index => counts.sort_by(|a, b| compare_tokens(&a.value, &b.value)),
    }
    if let Some(limit) = spec.limit {
        counts.truncate(limit);
    }
    counts
}

fn compare_matches(
    documents: &[IndexDocument],
    order: &[OrderBy],
    a: &(usize, f32),
    b: &(usize, f32),
) -> Ordering {
    for clause in order {
        let ordering = if clause.is_score() {
            let ordering = a.1.partial_cmp(&b.1).unwrap_or(Ordering::Equal);
            directed(ordering, clause.direction)
        } else {
            // Documents without the field sort last in either direction.
            match (
                documents[a.0].first(&clause.field),
                documents[b.0].first(&clause.field),
            ) {
                (Some(x), Some(y)) => directed(compare_tokens(x, y), clause.direction),
                (Some(_), None) => Ordering::Less,
                (None, Some(_)) => Ordering::Greater,
                (None, None) => Ordering::Equal,
            }
        };
        if ordering != Ordering::Equal {
            return ordering;
        }
    }
    Ordering::Equal
}

fn directed(ordering: Ordering, direction: Direction) -> Ordering {
    match direction {
        Direction::Asc => ordering,
        Direction::Desc => ordering.reverse(),
    }
}

fn page_hits(documents: &[IndexDocument], matched: &[(usize, f32)], page: Page) -> Vec<IndexHit> {
    matched
        .iter()
        .skip(page.offset())
        .take(page.per_page)
        .map(|(pos, score)| {
            let doc = &documents[*pos];
            IndexHit {
                id: doc.id,
                score: *score,
                stored: doc
                    .fields
                    .iter()
                    .map(|(field, values)| (field.clone(), values.join(",")))
                    .collect(),
            }
        })
        .collect()
}
