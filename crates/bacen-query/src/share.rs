//! ShareComposer: stacked-area share matrices.
//!
//! Pivots (period, entity, value) points into a period-by-entity matrix,
//! keeps the top-N entities of the most recent period plus any pinned
//! entities, and folds everything else into a trailing `Others` column.

use std::collections::{BTreeMap, BTreeSet};

use bacen_core::period::Quarter;
use polars::prelude::{Column, DataFrame};
use tracing::debug;

use crate::Result;

/// Catch-all column for entities outside the selection. Always last.
pub const OTHERS: &str = "Others";

/// One (period, entity, value) observation feeding the composer.
#[derive(Clone, Debug, PartialEq)]
pub struct SharePoint {
    /// Reporting quarter.
    pub period: Quarter,
    /// Share entity: an institution name or a modality label.
    pub entity: String,
    /// Observed value, summed per (period, entity) before pivoting.
    pub value: f64,
}

impl SharePoint {
    /// Convenience constructor.
    #[must_use]
    pub fn new(period: Quarter, entity: impl Into<String>, value: f64) -> Self {
        Self {
            period,
            entity: entity.into(),
            value,
        }
    }
}

/// Period-by-entity matrix ready for stacked-area rendering.
///
/// `values[i][j]` holds the cell for `periods[i]` and `columns[j]`; cells
/// with no observation are NaN, except in the `Others` column where absent
/// entities contribute nothing and an empty fold sums to 0.
#[derive(Clone, Debug, PartialEq)]
pub struct ShareMatrix {
    /// Periods in ascending order.
    pub periods: Vec<Quarter>,
    /// Column order for legend consistency, `Others` last.
    pub columns: Vec<String>,
    /// Row-major cell values.
    pub values: Vec<Vec<f64>>,
}

impl ShareMatrix {
    fn empty() -> Self {
        Self {
            periods: Vec::new(),
            columns: Vec::new(),
            values: Vec::new(),
        }
    }

    /// Builds a DataFrame view with an `AnoMes_Q` column followed by one
    /// column per entity, in legend order.
    ///
    /// # Errors
    /// Returns [`bacen_core::BacenError::Frame`] if column assembly fails.
    pub fn to_dataframe(&self) -> Result<DataFrame> {
        let quarters: Vec<String> = self.periods.iter().map(Quarter::to_string).collect();
        let mut cols = vec![Column::new("AnoMes_Q".into(), quarters)];
        for (j, name) in self.columns.iter().enumerate() {
            let series: Vec<f64> = self.values.iter().map(|row| row[j]).collect();
            cols.push(Column::new(name.as_str().into(), series));
        }
        Ok(DataFrame::new(cols)?)
    }
}

/// Sorts entity names by a period's values descending, entities with no
/// value in that period ranking after all entities that have one.
fn rank_by_value(names: Vec<String>, cells: &BTreeMap<(Quarter, String), f64>, period: Quarter) -> Vec<String> {
    let mut ranked: Vec<(Option<f64>, String)> = names
        .into_iter()
        .map(|name| (cells.get(&(period, name.clone())).copied(), name))
        .collect();
    ranked.sort_by(|(a, _), (b, _)| match (a, b) {
        (Some(a), Some(b)) => b.partial_cmp(a).unwrap_or(std::cmp::Ordering::Equal),
        (Some(_), None) => std::cmp::Ordering::Less,
        (None, Some(_)) => std::cmp::Ordering::Greater,
        (None, None) => std::cmp::Ordering::Equal,
    });
    ranked.into_iter().map(|(_, name)| name).collect()
}

/// Composes (period, entity, value) points into a share matrix.
///
/// Values are summed per (period, entity); with `show_percentage` each cell
/// becomes its percent of the period total. Entities are ranked by the most
/// recent period, the top `top_n` are kept, pinned entities are appended
/// without displacing them, and all remaining entities fold into a trailing
/// `Others` column. Pinned entities absent from the data are ignored. Empty
/// input yields an empty matrix.
#[must_use]
pub fn compose_shares(
    points: &[SharePoint],
    top_n: usize,
    pinned: &[String],
    show_percentage: bool,
) -> ShareMatrix {
    let mut cells: BTreeMap<(Quarter, String), f64> = BTreeMap::new();
    for point in points {
        *cells
            .entry((point.period, point.entity.clone()))
            .or_insert(0.0) += point.value;
    }
    if cells.is_empty() {
        return ShareMatrix::empty();
    }

    if show_percentage {
        let mut totals: BTreeMap<Quarter, f64> = BTreeMap::new();
        for ((period, _), value) in &cells {
            *totals.entry(*period).or_insert(0.0) += value;
        }
        for ((period, _), value) in &mut cells {
            let total = totals[period];
            *value = if total == 0.0 {
                f64::NAN
            } else {
                *value / total * 100.0
            };
        }
    }

    let periods: Vec<Quarter> = cells.keys().map(|(p, _)| *p).collect::<BTreeSet<_>>().into_iter().collect();
    let entities: BTreeSet<String> = cells.keys().map(|(_, e)| e.clone()).collect();
    let last = *periods.last().expect("non-empty cells have a last period");

    let ranked = rank_by_value(entities.iter().cloned().collect(), &cells, last);
    let mut selected: Vec<String> = ranked.into_iter().take(top_n).collect();
    for pin in pinned {
        if entities.contains(pin) && !selected.contains(pin) {
            selected.push(pin.clone());
        }
    }
    let others: Vec<&String> = entities
        .iter()
        .filter(|e| !selected.contains(*e))
        .collect();

    // Final legend order re-ranks the whole selection; Others stays last.
    let mut columns = rank_by_value(selected, &cells, last);
    let has_others = !others.is_empty();
    if has_others {
        columns.push(OTHERS.to_string());
    }

    let mut values = Vec::with_capacity(periods.len());
    for period in &periods {
        let mut row = Vec::with_capacity(columns.len());
        let named = if has_others {
            &columns[..columns.len() - 1]
        } else {
            &columns[..]
        };
        for name in named {
            row.push(
                cells
                    .get(&(*period, name.clone()))
                    .copied()
                    .unwrap_or(f64::NAN),
            );
        }
        if has_others {
            let fold: f64 = others
                .iter()
                .filter_map(|e| cells.get(&(*period, (*e).clone())))
                .sum();
            row.push(fold);
        }
        values.push(row);
    }

    debug!(
        periods = periods.len(),
        columns = columns.len(),
        "composed share matrix"
    );
    ShareMatrix {
        periods,
        columns,
        values,
    }
}
