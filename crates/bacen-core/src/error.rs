//! Error types for ETL and query operations.
//!
//! This module defines [`BacenError`] which covers all error cases that can
//! occur when cleaning, transforming, querying, or persisting report data.

use thiserror::Error;

/// Errors that can occur during ETL, query, or store operations.
#[derive(Error, Debug)]
pub enum BacenError {
    /// Error parsing raw report data.
    #[error("Parse error: {0}")]
    Parse(String),

    /// A caller requested a market-metrics feature that is not in the catalog.
    #[error("Unknown market feature: {0}")]
    UnknownFeature(String),

    /// A caller requested a credit modality that is not in the catalog.
    #[error("Unknown credit modality: {0}")]
    UnknownModality(String),

    /// A caller requested a component group that is not in the catalog.
    #[error("Unknown component group: {0}")]
    UnknownComponentGroup(String),

    /// A caller requested a projection kind that is not in the catalog.
    #[error("Unknown projection kind: {0}")]
    UnknownProjection(String),

    /// An invalid parameter was provided.
    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),

    /// Error interacting with the snapshot store.
    #[error("Store error: {0}")]
    Store(String),

    /// Error building a DataFrame view of a table.
    #[error("Frame error: {0}")]
    Frame(String),

    /// Any other error.
    #[error("{0}")]
    Other(String),
}

impl From<polars::error::PolarsError> for BacenError {
    fn from(e: polars::error::PolarsError) -> Self {
        Self::Frame(e.to_string())
    }
}

/// Result type alias using [`BacenError`].
pub type Result<T> = std::result::Result<T, BacenError>;
