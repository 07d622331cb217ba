//! Command line argument parsing for the catalog-search CLI using clap.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};
use serde::{Deserialize, Serialize};

use crate::geo::GeoPoint;
use crate::params::{OrderBy, PriceRange};

/// catalog-search - Faceted catalog search over a product catalog file
#[derive(Parser, Debug, Clone)]
#[command(name = "catalog-search")]
#[command(about = "Faceted catalog search over a JSON product catalog")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(long_about = None)]
pub struct CatalogArgs {
    /// Verbosity level (0=quiet, 1=normal, 2=verbose, 3=debug)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Quiet mode (overrides verbose)
    #[arg(short, long)]
    pub quiet: bool,

    /// Output format
    #[arg(short = 'f', long = "format", default_value = "human")]
    pub output_format: OutputFormat,

    /// Pretty-print JSON output
    #[arg(long)]
    pub pretty: bool,

    /// Product catalog file (JSON array of products)
    #[arg(short, long, value_name = "CATALOG_FILE", env = "CATALOG_SEARCH_CATALOG")]
    pub catalog: PathBuf,

    /// Search configuration file (JSON)
    #[arg(long, value_name = "CONFIG_FILE", env = "CATALOG_SEARCH_CONFIG")]
    pub config: Option<PathBuf>,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Command,
}

impl CatalogArgs {
    /// Get the effective verbosity level
    pub fn verbosity(&self) -> u8 {
        if self.quiet {
            0
        } else {
            match self.verbose {
                0 => 1, // Default to normal
                n => n,
            }
        }
    }
}

/// Available CLI commands
#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Search the product listing
    Search(SearchArgs),

    /// List featured products
    Featured(PageArgs),

    /// List products related to a theme
    Related(RelatedArgs),

    /// Count product groups within a category
    Groups(GroupsArgs),

    /// Find products similar to a product
    Similar(SimilarArgs),

    /// Resolve a keyword that names a product identifier
    Intercept(InterceptArgs),
}

/// Page selection shared by listing commands
#[derive(Args, Debug, Clone, Default)]
pub struct PageArgs {
    /// Page number (1-based)
    #[arg(short, long)]
    pub page: Option<usize>,

    /// Products per page
    #[arg(long)]
    pub per_page: Option<usize>,
}

/// Arguments for searching
#[derive(Args, Debug, Clone)]
pub struct SearchArgs {
    /// Keywords (omit to browse)
    #[arg(value_name = "KEYWORDS")]
    pub keywords: Option<String>,

    /// Facet filter as FACET=VALUE; VALUE may be a comma list or LOW..HIGH
    #[arg(short = 'F', long = "filter", value_name = "FACET=VALUE")]
    pub filters: Vec<String>,

    /// Keywords every result must contain, without affecting relevance
    #[arg(long)]
    pub narrow: Option<String>,

    /// Price range as LOW-HIGH
    #[arg(long)]
    pub price: Option<PriceRange>,

    /// Extra ordering as FIELD[,asc|desc]
    #[arg(long)]
    pub order_by: Option<OrderBy>,

    /// Taxon ids (the current taxon and its descendants)
    #[arg(long = "taxon")]
    pub taxons: Vec<u64>,

    /// Store scope
    #[arg(long)]
    pub store: Option<String>,

    /// Only products near LAT,LON
    #[arg(long, value_name = "LAT,LON")]
    pub near: Option<GeoPoint>,

    /// Materialise the base scope and page it locally
    #[arg(long)]
    pub scoped: bool,

    #[command(flatten)]
    pub page: PageArgs,
}

/// Arguments for related products
#[derive(Args, Debug, Clone)]
pub struct RelatedArgs {
    /// Theme the products relate to
    #[arg(value_name = "THEME")]
    pub theme: String,
}

/// Arguments for group counts
#[derive(Args, Debug, Clone)]
pub struct GroupsArgs {
    /// Category to count groups in
    #[arg(value_name = "CATEGORY")]
    pub category: String,

    /// Keywords every counted product must contain
    #[arg(long)]
    pub narrow: Option<String>,
}

/// Arguments for similar products
#[derive(Args, Debug, Clone)]
pub struct SimilarArgs {
    /// Reference product id
    #[arg(value_name = "PRODUCT_ID")]
    pub product: u64,

    /// Fields to compare
    #[arg(long = "field", default_values_t = vec!["name".to_string()])]
    pub fields: Vec<String>,

    /// Number of products to return
    #[arg(short, long)]
    pub limit: Option<usize>,
}

/// Arguments for keyword intercept
#[derive(Args, Debug, Clone)]
pub struct InterceptArgs {
    /// Keyword to resolve
    #[arg(value_name = "KEYWORD")]
    pub keyword: String,
}

/// Output formats for CLI
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Human-readable output
    Human,
    /// JSON output
    Json,
}

impl SearchArgs {
    /// Split `FACET=VALUE` filters. Entries without `=` are skipped.
    pub fn filter_pairs(&self) -> Vec<(String, String)> {
        self.filters
            .iter()
            .filter_map(|entry| entry.split_once('='))
            .map(|(facet, value)| (facet.trim().to_string(), value.trim().to_string()))
            .filter(|(facet, _)| !facet.is_empty())
            .collect()
    }
}
