//! AggregationEngine: waterfall component aggregates.
//!
//! Aggregates the projected-metrics table over an institution/quarter
//! selection into one value per chart component. The percentage and
//! per-client views weight multi-entity selections by summing numerators
//! over summed bases, never by averaging ratios.

use std::collections::BTreeSet;

use bacen_core::components::{ACTIVE_CLIENTS, ComponentGroup, Measure, OPERATING_REVENUE};
use bacen_core::period::Quarter;
use bacen_core::types::{ProjectedMetricRow, ProjectionKind};
use polars::prelude::{Column, DataFrame};
use tracing::{debug, warn};

use crate::Result;

/// The percentage view should sum to one full base (or two, for chart
/// groups carrying two independent totals).
const PERCENT_SANITY: (f64, f64) = (99.9, 200.1);

/// One aggregated waterfall bar.
#[derive(Clone, Debug, PartialEq)]
pub struct ComponentValue {
    /// Raw component label, as stored in the projected table.
    pub component: String,
    /// Short display label for the bar.
    pub display: String,
    /// Whether the bar is a relative step or a total.
    pub measure: Measure,
    /// Aggregated value under the requested projection.
    pub value: f64,
}

/// Result of one waterfall aggregation, with the selection echoed back.
#[derive(Clone, Debug, PartialEq)]
pub struct WaterfallAggregate {
    /// Institutions the caller selected.
    pub institutions: Vec<String>,
    /// Quarters the caller selected.
    pub quarters: Vec<Quarter>,
    /// Chart group that was aggregated.
    pub group: ComponentGroup,
    /// Projection the values are expressed in.
    pub kind: ProjectionKind,
    /// One value per component present in the data, in definition order.
    pub components: Vec<ComponentValue>,
}

impl WaterfallAggregate {
    /// Builds a DataFrame view with `Component`, `Label`, `Measure` and
    /// `Saldo` columns.
    ///
    /// # Errors
    /// Returns [`bacen_core::BacenError::Frame`] if column assembly fails.
    pub fn to_dataframe(&self) -> Result<DataFrame> {
        let components: Vec<&str> = self.components.iter().map(|c| c.component.as_str()).collect();
        let labels: Vec<&str> = self.components.iter().map(|c| c.display.as_str()).collect();
        let measures: Vec<&str> = self.components.iter().map(|c| c.measure.as_str()).collect();
        let values: Vec<f64> = self.components.iter().map(|c| c.value).collect();

        let df = DataFrame::new(vec![
            Column::new("Component".into(), components),
            Column::new("Label".into(), labels),
            Column::new("Measure".into(), measures),
            Column::new("Saldo".into(), values),
        ])?;
        Ok(df)
    }
}

/// Sum of a grand-total component over the whole selection, before the
/// chart-group filter is applied.
fn selection_total(selected: &[&ProjectedMetricRow], component: &str) -> f64 {
    selected
        .iter()
        .filter(|r| r.group == ComponentGroup::StoreReceitaQtdClientes && r.component == component)
        .map(|r| r.value_absolute)
        .sum()
}

/// Weighted ratio over the selection: summed numerators over the summed
/// base. An empty base yields NaN, propagated as data.
fn weighted(numerator: f64, base: f64, scale: f64) -> f64 {
    if base == 0.0 {
        f64::NAN
    } else {
        numerator / base * scale
    }
}

/// Aggregates projected metrics into one waterfall bar per component.
///
/// Grand revenue/client totals come from the store group of the filtered
/// selection, before the chart-group filter. Selections spanning a single
/// (institution, quarter) pair sum the pre-computed per-row projections;
/// wider selections re-derive the ratio from summed absolutes over the
/// grand total. Components with no matching rows are omitted. An empty
/// selection yields an empty component list, not an error.
#[must_use]
pub fn aggregate(
    rows: &[ProjectedMetricRow],
    institutions: &[String],
    quarters: &[Quarter],
    group: ComponentGroup,
    kind: ProjectionKind,
) -> WaterfallAggregate {
    let selected: Vec<&ProjectedMetricRow> = rows
        .iter()
        .filter(|r| institutions.contains(&r.institution) && quarters.contains(&r.period_quarter))
        .collect();

    let total_revenue = selection_total(&selected, OPERATING_REVENUE);
    let total_clients = selection_total(&selected, ACTIVE_CLIENTS);

    let chart_rows: Vec<&ProjectedMetricRow> = selected
        .iter()
        .copied()
        .filter(|r| r.group == group)
        .collect();

    let entities: BTreeSet<(&str, Quarter)> = chart_rows
        .iter()
        .map(|r| (r.institution.as_str(), r.period_quarter))
        .collect();
    let multiple = entities.len() > 1;

    let mut components = Vec::new();
    for def in group.components() {
        let matching: Vec<&ProjectedMetricRow> = chart_rows
            .iter()
            .copied()
            .filter(|r| r.component == def.source)
            .collect();
        if matching.is_empty() {
            continue;
        }

        let sum_absolute: f64 = matching.iter().map(|r| r.value_absolute).sum();
        let value = match kind {
            ProjectionKind::ValueAbsolute => sum_absolute,
            ProjectionKind::ValuePercentRevenue => {
                if multiple {
                    weighted(sum_absolute, total_revenue, 100.0)
                } else {
                    matching.iter().map(|r| r.value_pct_revenue).sum()
                }
            }
            ProjectionKind::ValuePerClient => {
                if multiple {
                    weighted(sum_absolute, total_clients, 1.0)
                } else {
                    matching.iter().map(|r| r.value_per_client).sum()
                }
            }
        };

        components.push(ComponentValue {
            component: def.source.to_string(),
            display: def.display.to_string(),
            measure: def.measure,
            value,
        });
    }

    if kind == ProjectionKind::ValuePercentRevenue && !components.is_empty() {
        let total_percent: f64 = components.iter().map(|c| c.value).sum();
        if !(PERCENT_SANITY.0..=PERCENT_SANITY.1).contains(&total_percent) {
            warn!(total_percent, group = group.as_str(), "percentage sum outside expected range");
        }
    }

    debug!(
        rows = chart_rows.len(),
        components = components.len(),
        group = group.as_str(),
        kind = kind.as_str(),
        "aggregated waterfall"
    );

    WaterfallAggregate {
        institutions: institutions.to_vec(),
        quarters: quarters.to_vec(),
        group,
        kind,
        components,
    }
}
