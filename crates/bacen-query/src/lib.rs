#![doc = include_str!("../README.md")]
#![doc(issue_tracker_base_url = "https://github.com/bacen-insights/bacen-insights/issues/")]
#![cfg_attr(docsrs, feature(doc_auto_cfg))]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

pub use bacen_core::{BacenError, Result};

/// Point selectors for share and time-series views.
pub mod select;
/// Stacked-area share matrices.
pub mod share;
/// Waterfall component aggregation.
pub mod waterfall;

pub use select::{
    TimeSeriesPoint, market_share_points, modality_share_points, portfolio_points, time_series,
    time_series_projected,
};
pub use share::{OTHERS, ShareMatrix, SharePoint, compose_shares};
pub use waterfall::{ComponentValue, WaterfallAggregate, aggregate};
