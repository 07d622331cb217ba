//! Output formatting for CLI commands.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::cli::args::{CatalogArgs, OutputFormat};
use crate::error::Result;
use crate::index::FacetCount;
use crate::product::{Product, ProductId};
use crate::reconcile::ReconciledResult;

/// One product as shown by the CLI.
#[derive(Debug, Serialize, Deserialize)]
pub struct ProductSummary {
    pub id: ProductId,
    pub sku: String,
    pub name: String,
    pub in_stock: bool,
}

impl From<&Product> for ProductSummary {
    fn from(product: &Product) -> Self {
        ProductSummary {
            id: product.id,
            sku: product.sku.clone(),
            name: product.name.clone(),
            in_stock: product.in_stock(),
        }
    }
}

/// Result structure for listing commands.
#[derive(Debug, Serialize, Deserialize)]
pub struct ProductListing {
    pub total_hits: u64,
    pub products: Vec<ProductSummary>,
    pub facets: BTreeMap<String, Vec<(String, u64)>>,
    pub duration_ms: u64,
}

impl ProductListing {
    /// Summarise a reconciled result. Facets without counts are left out.
    pub fn new(result: &ReconciledResult, duration_ms: u64) -> Self {
        ProductListing {
            total_hits: result.total_hits,
            products: result.products.iter().map(ProductSummary::from).collect(),
            facets: result
                .facets
                .iter()
                .filter(|(_, counts)| !counts.is_empty())
                .map(|(name, counts)| (name.clone(), pairs(counts)))
                .collect(),
            duration_ms,
        }
    }
}

/// Result structure for group counts.
#[derive(Debug, Serialize, Deserialize)]
pub struct GroupCounts {
    pub category: String,
    pub groups: Vec<(String, u64)>,
}

impl GroupCounts {
    pub fn new<S: Into<String>>(category: S, counts: &[FacetCount]) -> Self {
        GroupCounts {
            category: category.into(),
            groups: pairs(counts),
        }
    }
}

/// Result structure for keyword intercept.
#[derive(Debug, Serialize, Deserialize)]
pub struct InterceptResult {
    pub keyword: String,
    pub redirect: Option<ProductSummary>,
}

fn pairs(counts: &[FacetCount]) -> Vec<(String, u64)> {
    counts.iter().map(|c| (c.value.clone(), c.count)).collect()
}

/// Output result based on the specified format.
pub fn output_result<T: Serialize>(message: &str, result: &T, args: &CatalogArgs) -> Result<()> {
    match args.output_format {
        OutputFormat::Human => output_human(message, result, args),
        OutputFormat::Json => output_json(result, args),
    }
}

/// Output in human-readable format.
fn output_human<T: Serialize>(message: &str, result: &T, args: &CatalogArgs) -> Result<()> {
    if args.verbosity() > 0 {
        println!("{message}");
        println!();
    }

    let value = serde_json::to_value(result)?;
    let obj = value.as_object();
    if obj.is_some_and(|o| o.contains_key("products")) {
        print!("{}", format_listing(&value));
    } else if obj.is_some_and(|o| o.contains_key("groups")) {
        print!("{}", format_counts(&value, "groups"));
    } else {
        output_generic_human(&value);
    }
    Ok(())
}

/// Render a product listing.
fn format_listing(value: &serde_json::Value) -> String {
    let mut out = String::new();
    let total = value.get("total_hits").and_then(|t| t.as_u64()).unwrap_or(0);
    let products = value
        .get("products")
        .and_then(|p| p.as_array())
        .cloned()
        .unwrap_or_default();

    out.push_str(&format!("Products ({} of {total}):\n", products.len()));
    for (i, product) in products.iter().enumerate() {
        let field = |name: &str| product.get(name).map(format_value).unwrap_or_default();
        let stock = if product.get("in_stock").and_then(|s| s.as_bool()) == Some(false) {
            " (out of stock)"
        } else {
            ""
        };
        out.push_str(&format!(
            "  {}. [{}] {} - {}{stock}\n",
            i + 1,
            field("id"),
            field("sku"),
            field("name")
        ));
    }

    if let Some(facets) = value.get("facets").and_then(|f| f.as_object())
        && !facets.is_empty()
    {
        out.push_str("\nFacets:\n");
        for (name, counts) in facets {
            out.push_str(&format!("  {name}: {}\n", format_pairs(counts)));
        }
    }
    out
}

/// Render a list of `(value, count)` pairs under `key`.
fn format_counts(value: &serde_json::Value, key: &str) -> String {
    value
        .get(key)
        .map(|counts| format!("{key}: {}\n", format_pairs(counts)))
        .unwrap_or_default()
}

fn format_pairs(counts: &serde_json::Value) -> String {
    counts
        .as_array()
        .map(|pairs| {
            pairs
                .iter()
                .filter_map(|pair| {
                    let pair = pair.as_array()?;
                    Some(format!(
                        "{} ({})",
                        format_value(pair.first()?),
                        format_value(pair.get(1)?)
                    ))
                })
                .collect::<Vec<_>>()
                .join(", ")
        })
        .unwrap_or_default()
}

/// Output generic data in human format.
fn output_generic_human(value: &serde_json::Value) {
    match value {
        serde_json::Value::Object(obj) => {
            for (key, val) in obj {
                let formatted_val = format_value(val);
                println!("{key}: {formatted_val}");
            }
        }
        _ => {
            let formatted_value = format_value(value);
            println!("{formatted_value}");
        }
    }
}

/// Output in JSON format.
fn output_json<T: Serialize>(result: &T, args: &CatalogArgs) -> Result<()> {
    let json = if args.pretty {
        serde_json::to_string_pretty(result)?
    } else {
        serde_json::to_string(result)?
    };

    println!("{json}");
    Ok(())
}

/// Format a JSON value for display.
fn format_value(value: &serde_json::Value) -> String {
    match value {
        serde_json::Value::String(s) => s.clone(),
        serde_json::Value::Number(n) => n.to_string(),
        serde_json::Value::Bool(b) => b.to_string(),
        serde_json::Value::Array(arr) => {
            let formatted_values = arr.iter().map(format_value).collect::<Vec<_>>().join(", ");
            format!("[{formatted_values}]")
        }
        serde_json::Value::Object(obj) => {
            let formatted_values = obj
                .iter()
                .map(|(k, v)| format!("{k}={}", format_value(v)))
                .collect::<Vec<_>>()
                .join(", ");
            format!("{{{formatted_values}}}")
        }
        serde_json::Value::Null => "none".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn test_format_value() {
        assert_eq!(format_value(&json!("test")), "test");
        assert_eq!(format_value(&json!(42)), "42");
        assert_eq!(format_value(&json!(false)), "false");
        assert_eq!(format_value(&json!(null)), "none");
        assert_eq!(format_value(&json!({"id": 1})), "{id=1}");
    }

    #[test]
    fn test_format_listing() {
        let mut result = ReconciledResult::empty();
        result.products = vec![
            Product::new(2, "LP-2", "Lamp"),
            Product::new(1, "CH-1", "Chair").with_count_on_hand(0),
        ];
        result.total_hits = 5;
        result
            .facets
            .insert("color".to_string(), vec![FacetCount::new("red", 3)]);
        result.facets.insert("size".to_string(), Vec::new());

        let listing = ProductListing::new(&result, 0);
        assert_eq!(listing.facets.len(), 1);

        let text = format_listing(&serde_json::to_value(&listing).unwrap());
        assert_eq!(
            text,
            "Products (2 of 5):\n  1. [2] LP-2 - Lamp\n  2. [1] CH-1 - Chair (out of stock)\n\nFacets:\n  color: red (3)\n"
        );
    }

    #[test]
    fn test_format_counts() {
        let counts = GroupCounts::new("chairs", &[FacetCount::new("armchairs", 2)]);
        let text = format_counts(&serde_json::to_value(&counts).unwrap(), "groups");
        assert_eq!(text, "groups: armchairs (2)\n");
    }
}
