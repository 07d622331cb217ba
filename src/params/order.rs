//! Ordering clauses.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{CatalogError, Result};

/// Field name that sorts by relevance score.
pub const SCORE_FIELD: &str = "score";

/// Sort direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    /// Ascending.
    #[default]
    Asc,
    /// Descending.
    Desc,
}

impl FromStr for Direction {
    type Err = CatalogError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "asc" | "ascending" => Ok(Direction::Asc),
            "desc" | "descending" => Ok(Direction::Desc),
            other => Err(CatalogError::invalid_argument(format!(
                "unknown sort direction '{other}'"
            ))),
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Direction::Asc => write!(f, "asc"),
            Direction::Desc => write!(f, "desc"),
        }
    }
}

/// One ordering clause. Earlier clauses are primary sort keys.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct OrderBy {
    /// Field to sort on.
    pub field: String,
    /// Sort direction.
    pub direction: Direction,
}

impl OrderBy {
    pub fn new<S: Into<String>>(field: S, direction: Direction) -> Self {
        OrderBy {
            field: field.into(),
            direction,
        }
    }

    pub fn asc<S: Into<String>>(field: S) -> Self {
        Self::new(field, Direction::Asc)
    }

    pub fn desc<S: Into<String>>(field: S) -> Self {
        Self::new(field, Direction::Desc)
    }

    /// Relevance score, best first.
    pub fn score() -> Self {
        Self::desc(SCORE_FIELD)
    }

    /// Whether this clause sorts by relevance score.
    pub fn is_score(&self) -> bool {
        self.field == SCORE_FIELD
    }
}

impl FromStr for OrderBy {
    type Err = CatalogError;

    /// Parse the caller form `"field"` or `"field,direction"`.
    fn from_str(s: &str) -> Result<Self> {
        let mut parts = s.split(',').map(str::trim);
        let field = parts
            .next()
            .filter(|f| !f.is_empty())
            .ok_or_else(|| CatalogError::invalid_argument("empty order-by field"))?;
        let direction = match parts.next() {
            Some(d) if !d.is_empty() => d.parse()?,
            _ => Direction::Asc,
        };
        Ok(OrderBy::new(field, direction))
    }
}

impl fmt::Display for OrderBy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.field, self.direction)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_order_by() {
        let order: OrderBy = "price,desc".parse().unwrap();
        assert_eq!(order, OrderBy::desc("price"));

        let order: OrderBy = "name".parse().unwrap();
        assert_eq!(order, OrderBy::asc("name"));

        assert!("".parse::<OrderBy>().is_err());
        assert!("price,sideways".parse::<OrderBy>().is_err());
    }

    #[test]
    fn test_score() {
        assert!(OrderBy::score().is_score());
        assert_eq!(OrderBy::score().to_string(), "score desc");
    }
}
