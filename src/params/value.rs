//! Filter values: scalars, lists and inclusive ranges.
//!
//! Caller input mixes shapes freely (a string, a list of strings, a range).
//! It is resolved once, at parse time, into a [`FilterValue`].

use std::cmp::Ordering;
use std::collections::BTreeSet;
use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// An inclusive range of tokens.
///
/// Bounds compare numerically when both sides parse as numbers and
/// lexically otherwise. A range with `low > high` is kept as given and
/// simply matches nothing.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RangeValue {
    /// Lower bound (inclusive).
    pub low: String,
    /// Upper bound (inclusive).
    pub high: String,
}

impl RangeValue {
    /// Create a new inclusive range.
    pub fn new<S: Into<String>>(low: S, high: S) -> Self {
        RangeValue {
            low: low.into(),
            high: high.into(),
        }
    }

    /// Check if a token falls within the range.
    pub fn contains(&self, token: &str) -> bool {
        compare_tokens(&self.low, token) != Ordering::Greater
            && compare_tokens(token, &self.high) != Ordering::Greater
    }
}

/// A resolved filter value.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FilterValue {
    /// A single discrete token.
    Scalar(String),
    /// Any of several tokens (OR within one facet).
    List(BTreeSet<String>),
    /// An inclusive range.
    Range(RangeValue),
}

impl FilterValue {
    /// Create a scalar value.
    pub fn scalar<S: Into<String>>(token: S) -> Self {
        FilterValue::Scalar(token.into())
    }

    /// Create a list value.
    pub fn list<I, S>(tokens: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        FilterValue::List(tokens.into_iter().map(Into::into).collect())
    }

    /// Create a range value.
    pub fn range<S: Into<String>>(low: S, high: S) -> Self {
        FilterValue::Range(RangeValue::new(low, high))
    }

    /// Resolve raw caller input.
    ///
    /// * a string is a scalar, a comma-separated list, or `low..high`
    /// * a number or boolean is a scalar
    /// * an array of scalars is a list
    /// * an object with `low`/`high` (or `from`/`to`) is a range
    ///
    /// Anything else is malformed and yields `None`.
    pub fn from_raw(raw: &Value) -> Option<FilterValue> {
        match raw {
            Value::String(s) => Some(Self::from_str_value(s)),
            Value::Number(_) | Value::Bool(_) => scalar_token(raw).map(FilterValue::Scalar),
            Value::Array(items) => {
                let mut tokens = BTreeSet::new();
                for item in items {
                    let token = scalar_token(item)?;
                    let token = token.trim();
                    if !token.is_empty() {
                        tokens.insert(token.to_string());
                    }
                }
                Some(FilterValue::List(tokens))
            }
            Value::Object(map) => {
                let low = map.get("low").or_else(|| map.get("from"))?;
                let high = map.get("high").or_else(|| map.get("to"))?;
                Some(FilterValue::Range(RangeValue::new(
                    scalar_token(low)?,
                    scalar_token(high)?,
                )))
            }
            Value::Null => None,
        }
    }

    fn from_str_value(s: &str) -> FilterValue {
        if let Some((low, high)) = s.split_once("..") {
            let (low, high) = (low.trim(), high.trim());
            if !low.is_empty() && !high.is_empty() {
                return FilterValue::range(low, high);
            }
        }

        let tokens: BTreeSet<String> = s
            .split(',')
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .map(str::to_string)
            .collect();
        if tokens.len() == 1 {
            // Single token.
            let token = tokens.into_iter().next().unwrap_or_default();
            FilterValue::Scalar(token)
        } else {
            FilterValue::List(tokens)
        }
    }

    /// A value with no tokens contributes nothing to a query.
    pub fn is_empty(&self) -> bool {
        match self {
            FilterValue::Scalar(token) => token.trim().is_empty(),
            FilterValue::List(tokens) => tokens.is_empty(),
            FilterValue::Range(_) => false,
        }
    }

    /// Check if a stored token satisfies this value.
    pub fn matches(&self, candidate: &str) -> bool {
        match self {
            FilterValue::Scalar(token) => token == candidate,
            FilterValue::List(tokens) => tokens.contains(candidate),
            FilterValue::Range(range) => range.contains(candidate),
        }
    }

    /// Check if any of a document's tokens satisfies this value.
    pub fn matches_any<'a, I>(&self, candidates: I) -> bool
    where
        I: IntoIterator<Item = &'a String>,
    {
        candidates.into_iter().any(|c| self.matches(c))
    }
}

impl fmt::Display for FilterValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FilterValue::Scalar(token) => write!(f, "{token}"),
            FilterValue::List(tokens) => {
                let joined: Vec<&str> = tokens.iter().map(String::as_str).collect();
                write!(f, "({})", joined.join(" OR "))
            }
            FilterValue::Range(range) => write!(f, "[{} TO {}]", range.low, range.high),
        }
    }
}

fn scalar_token(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

/// Compare two tokens, numerically when both are numbers.
pub fn compare_tokens(a: &str, b: &str) -> Ordering {
    match (a.trim().parse::<f64>(), b.trim().parse::<f64>()) {
        (Ok(x), Ok(y)) => x.partial_cmp(&y).unwrap_or(Ordering::Equal),
        _ => a.cmp(b),
    }
}
