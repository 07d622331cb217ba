//! Error types for catalog search.
//!
//! Every fallible operation returns [`Result`], whose error side is
//! [`CatalogError`]. Failures of the search index or the product store are
//! reported as [`CatalogError::Index`] and [`CatalogError::Store`] and are
//! handed back to the caller unchanged; nothing in this crate retries them.
//!
//! A search that matches nothing is not an error. It produces an empty
//! [`ReconciledResult`](crate::reconcile::ReconciledResult).
//!
//! # Examples
//!
//! ```
//! use catalog_search::error::{CatalogError, Result};
//!
//! fn lookup() -> Result<()> {
//!     Err(CatalogError::store("connection reset"))
//! }
//!
//! match lookup() {
//!     Ok(_) => println!("Success"),
//!     Err(e) => eprintln!("Error: {}", e),
//! }
//! ```

use std::io;

use thiserror::Error;

/// The main error type for catalog search operations.
#[derive(Error, Debug)]
pub enum CatalogError {
    /// I/O errors (configuration files, catalog files)
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// The search index could not complete a request
    #[error("Index error: {0}")]
    Index(String),

    /// The product store could not complete a request
    #[error("Store error: {0}")]
    Store(String),

    /// Configuration errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// Malformed caller input
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// JSON serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// A referenced product does not exist
    #[error("Not found: {0}")]
    NotFound(String),

    /// Errors carrying an anyhow context chain
    #[error("{0:#}")]
    Anyhow(#[from] anyhow::Error),
}

/// Result type alias for operations that may fail with CatalogError.
pub type Result<T> = std::result::Result<T, CatalogError>;

impl CatalogError {
    /// Create a new index error.
    pub fn index<S: Into<String>>(msg: S) -> Self {
        CatalogError::Index(msg.into())
    }

    /// Create a new store error.
    pub fn store<S: Into<String>>(msg: S) -> Self {
        CatalogError::Store(msg.into())
    }

    /// Create a new configuration error.
    pub fn config<S: Into<String>>(msg: S) -> Self {
        CatalogError::Config(msg.into())
    }

    /// Create a new invalid argument error.
    pub fn invalid_argument<S: Into<String>>(msg: S) -> Self {
        CatalogError::InvalidArgument(msg.into())
    }

    /// Create a new not found error.
    pub fn not_found<S: Into<String>>(msg: S) -> Self {
        CatalogError::NotFound(msg.into())
    }

    /// Whether this error came from one of the external collaborators
    /// (search index or product store).
    pub fn is_collaborator_failure(&self) -> bool {
        matches!(self, CatalogError::Index(_) | CatalogError::Store(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_construction() {
        let error = CatalogError::index("Test index error");
        assert_eq!(error.to_string(), "Index error: Test index error");

        let error = CatalogError::store("Test store error");
        assert_eq!(error.to_string(), "Store error: Test store error");

        let error = CatalogError::config("page size must be positive");
        assert_eq!(
            error.to_string(),
            "Configuration error: page size must be positive"
        );
    }

    #[test]
    fn test_io_error_conversion() {
        let io_error = io::Error::new(io::ErrorKind::NotFound, "File not found");
        let catalog_error = CatalogError::from(io_error);

        match catalog_error {
            CatalogError::Io(_) => {} // Expected
            _ => panic!("Expected IO error variant"),
        }
    }

    #[test]
    fn test_context_chain_display() {
        let error: CatalogError = anyhow::anyhow!("unexpected token")
            .context("catalog.json is not a product catalog")
            .into();
        assert_eq!(
            error.to_string(),
            "catalog.json is not a product catalog: unexpected token"
        );
        assert!(!error.is_collaborator_failure());
    }

    #[test]
    fn test_collaborator_failure() {
        assert!(CatalogError::index("timeout").is_collaborator_failure());
        assert!(CatalogError::store("timeout").is_collaborator_failure());
        assert!(!CatalogError::config("bad").is_collaborator_failure());
    }
}
