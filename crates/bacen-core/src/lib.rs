#![doc = include_str!("../README.md")]
#![doc(issue_tracker_base_url = "https://github.com/bacen-insights/bacen-insights/issues/")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

//! Core types and catalogs for BACEN report analytics.
//!
//! This crate provides the foundational abstractions of the pipeline:
//!
//! - [`LineItem`](types::LineItem) - canonical cleaned ledger row
//! - [`ProjectedMetricRow`](types::ProjectedMetricRow) - pre-aggregated chart metric
//! - [`ComponentGroup`](components::ComponentGroup) - waterfall component catalogs
//! - [`MarketFeature`](components::MarketFeature) / [`CreditModality`](components::CreditModality) - query catalogs
//! - [`InstitutionRegistry`](institutions::InstitutionRegistry) - code to name resolution
//! - [`SnapshotStore`](store::SnapshotStore) - persistence abstraction

/// Static catalogs for report categories and chart components.
pub mod components;
/// Error types for ETL and query operations.
pub mod error;
/// DataFrame views of the persisted tables.
pub mod frame;
/// Institution registry.
pub mod institutions;
/// Typed reporting periods.
pub mod period;
/// Snapshot store trait.
pub mod store;
/// Core row types.
pub mod types;

// Re-export commonly used items at crate root
pub use components::{
    ACTIVE_CLIENTS, CALCULATED, ComponentDef, ComponentGroup, CreditModality, MarketFeature,
    Measure, OPERATING_REVENUE, OTHER_INTERMEDIATION_REVENUE, OTHER_INTERMEDIATION_REVENUE_PARTS,
    OPERATING_REVENUE_PARTS,
};
pub use error::{BacenError, Result};
pub use institutions::{InstitutionRecord, InstitutionRegistry, pad_code};
pub use period::{Quarter, parse_year_month};
pub use store::SnapshotStore;
pub use types::{LineItem, ProjectedMetricRow, ProjectionKind, RawLineItem, Snapshot};
