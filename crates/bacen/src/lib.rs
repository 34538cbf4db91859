#![doc = include_str!("../README.md")]
#![doc(issue_tracker_base_url = "https://github.com/bacen-insights/bacen-insights/issues/")]
#![cfg_attr(docsrs, feature(doc_auto_cfg))]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

//! BACEN regulatory report analytics.
//!
//! This crate ties the workspace together: it re-exports the core types,
//! the snapshot stores and the query-time aggregation surface, and provides
//! an [`EtlPipeline`] running the whole transformation chain from raw
//! quarterly dumps to a persisted [`Snapshot`].
//!
//! # Features
//!
//! - `store-sqlite` - persistent SQLite snapshot store (default)
//!
//! # Example
//!
//! ```rust,ignore
//! use bacen::{EtlPipeline, InstitutionRegistry, SqliteStore};
//!
//! #[tokio::main]
//! async fn main() -> bacen::Result<()> {
//!     let registry = InstitutionRegistry::from_json_str(&institutions_json)?;
//!     let store = SqliteStore::new("bacen_data.db")?;
//!
//!     let pipeline = EtlPipeline::new();
//!     let snapshot = pipeline.run_and_store(&raw_rows, &registry, &store).await?;
//!     println!("{} ledger rows", snapshot.ledger.len());
//!
//!     Ok(())
//! }
//! ```

// Core types and traits
pub use bacen_core::*;

// Snapshot stores
pub use bacen_store::MemoryStore;
#[cfg(feature = "store-sqlite")]
pub use bacen_store::SqliteStore;

// Query surface
pub use bacen_query::{
    ShareMatrix, SharePoint, TimeSeriesPoint, WaterfallAggregate, aggregate, compose_shares,
    market_share_points, modality_share_points, portfolio_points, time_series,
    time_series_projected,
};

mod pipeline;
pub use pipeline::EtlPipeline;
