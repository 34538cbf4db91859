#![doc = include_str!("../README.md")]
#![doc(issue_tracker_base_url = "https://github.com/bacen-insights/bacen-insights/issues/")]
#![cfg_attr(docsrs, feature(doc_auto_cfg))]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

/// Raw-dump cleaning into the canonical ledger.
pub mod clean;
/// Report subsetting into the per-domain tables.
pub mod extract;
/// Chart-ready metric projections.
pub mod project;
/// Financial-metrics table with synthetic ratio rows.
pub mod ratios;

pub use clean::{NA_GROUP, clean, parse_value};
pub use extract::{CreditKind, combine_credit, extract_credit, extract_market_metrics};
pub use project::project_metrics;
pub use ratios::build_financial_metrics;
