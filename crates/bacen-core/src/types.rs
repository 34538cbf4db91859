//! Core row types for the report pipeline.
//!
//! This module defines the fundamental data structures:
//!
//! - [`RawLineItem`] - one record as it arrives from the raw quarterly dumps
//! - [`LineItem`] - one row of the cleaned canonical ledger
//! - [`ProjectedMetricRow`] - one pre-aggregated chart metric
//! - [`ProjectionKind`] - which value projection a query reads
//! - [`Snapshot`] - the full set of tables rebuilt by an ETL run

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

use crate::components::ComponentGroup;
use crate::error::BacenError;
use crate::period::Quarter;

/// One raw line item from a quarterly regulatory dump.
///
/// Values arrive as strings with a decimal comma, periods as `YYYYMM`
/// integers, and institution codes at whatever width the source used.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct RawLineItem {
    /// Institution code, not yet padded.
    pub institution_code: String,
    /// Report number (e.g. 1 Resumo, 4 DRE, 10 Clientes, 11/13/14 credit).
    pub report_number: u16,
    /// Report display name.
    pub report_name: String,
    /// Line-item group within the report, missing in several reports.
    pub group: Option<String>,
    /// Ledger account, when reported.
    pub account: Option<String>,
    /// Column name identifying the measured quantity.
    pub column_name: String,
    /// Reporting period as `YYYYMM`.
    pub period: u32,
    /// Reported value, decimal comma, possibly missing.
    pub value: Option<String>,
}

impl RawLineItem {
    /// Creates a raw line item with required fields.
    #[must_use]
    pub fn new(
        institution_code: impl Into<String>,
        report_number: u16,
        report_name: impl Into<String>,
        column_name: impl Into<String>,
        period: u32,
    ) -> Self {
        Self {
            institution_code: institution_code.into(),
            report_number,
            report_name: report_name.into(),
            group: None,
            account: None,
            column_name: column_name.into(),
            period,
            value: None,
        }
    }

    /// Sets the group label.
    #[must_use]
    pub fn with_group(mut self, group: impl Into<String>) -> Self {
        self.group = Some(group.into());
        self
    }

    /// Sets the account.
    #[must_use]
    pub fn with_account(mut self, account: impl Into<String>) -> Self {
        self.account = Some(account.into());
        self
    }

    /// Sets the raw value string.
    #[must_use]
    pub fn with_value(mut self, value: impl Into<String>) -> Self {
        self.value = Some(value.into());
        self
    }
}

/// One row of the canonical cleaned ledger.
///
/// The category key (`report name ‖ group ‖ column name`) uniquely identifies
/// a measured quantity within a report. Values are always present; rows whose
/// raw value could not be parsed never reach this type.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct LineItem {
    /// Institution code, zero-padded to 8 digits.
    pub institution_code: String,
    /// Institution display name, when the registry knows the code.
    pub institution_name: Option<String>,
    /// Report number.
    pub report_number: u16,
    /// Report display name.
    pub report_name: String,
    /// Group label, `"nagroup"` when the report carries none.
    pub group: String,
    /// Ledger account, when reported. Synthetic rows carry the sentinel.
    pub account: Option<String>,
    /// Column name identifying the measured quantity.
    pub column_name: String,
    /// Composite category key: `report name ‖ group ‖ column name`.
    pub category_key: String,
    /// Reporting month (first day of the month).
    pub period_month: NaiveDate,
    /// Reporting quarter derived from the month.
    pub period_quarter: Quarter,
    /// Reported or computed value, rounded to 2 decimal places at ingest.
    /// Synthetic ratio rows may hold NaN when their denominator was
    /// zero or missing; NaN is data here, not an error.
    pub value: f64,
}

impl LineItem {
    /// Returns the display name, falling back to the padded code for
    /// institutions absent from the registry.
    #[must_use]
    pub fn display_name(&self) -> &str {
        self.institution_name
            .as_deref()
            .unwrap_or(&self.institution_code)
    }
}

/// Which of the three parallel value projections a query reads.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ProjectionKind {
    /// Raw summed values.
    #[default]
    ValueAbsolute,
    /// Percent of operating revenue (0-100).
    ValuePercentRevenue,
    /// Value per active client.
    ValuePerClient,
}

impl ProjectionKind {
    /// All projection kinds.
    pub const ALL: [Self; 3] = [
        Self::ValueAbsolute,
        Self::ValuePercentRevenue,
        Self::ValuePerClient,
    ];

    /// Returns the internal identifier used in the persisted tables.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::ValueAbsolute => "ValueAbsolute",
            Self::ValuePercentRevenue => "ValuePercentRevenue",
            Self::ValuePerClient => "ValuePerClient",
        }
    }

    /// Returns the Portuguese label the dashboards use.
    #[must_use]
    pub const fn label_pt(&self) -> &'static str {
        match self {
            Self::ValueAbsolute => "Valor Absoluto",
            Self::ValuePercentRevenue => "% Receita Operacional",
            Self::ValuePerClient => "Por Cliente Trimestre",
        }
    }
}

impl FromStr for ProjectionKind {
    type Err = BacenError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|k| k.as_str() == s || k.label_pt() == s)
            .ok_or_else(|| BacenError::UnknownProjection(s.to_string()))
    }
}

/// One pre-aggregated metric row, generated at ETL time.
///
/// For a given (institution, period) every component in every group shares
/// the same `num_clients` and `operating_revenue` denominators.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ProjectedMetricRow {
    /// Institution display name.
    pub institution: String,
    /// Reporting quarter.
    pub period_quarter: Quarter,
    /// Reporting month.
    pub period_month: NaiveDate,
    /// Which chart group the component belongs to.
    pub group: ComponentGroup,
    /// Raw component label within the group.
    pub component: String,
    /// Absolute value.
    pub value_absolute: f64,
    /// Value as percent of operating revenue, 0 when the revenue base is
    /// at or below the quality threshold.
    pub value_pct_revenue: f64,
    /// Value per active client, 0 when the client base is at or below the
    /// quality threshold.
    pub value_per_client: f64,
    /// Active-client denominator shared by the whole (institution, period).
    pub num_clients: f64,
    /// Operating-revenue denominator shared by the whole (institution, period).
    pub operating_revenue: f64,
}

impl ProjectedMetricRow {
    /// Returns the value for the requested projection kind.
    #[must_use]
    pub const fn value(&self, kind: ProjectionKind) -> f64 {
        match kind {
            ProjectionKind::ValueAbsolute => self.value_absolute,
            ProjectionKind::ValuePercentRevenue => self.value_pct_revenue,
            ProjectionKind::ValuePerClient => self.value_per_client,
        }
    }
}

/// The full table set produced by one ETL run.
///
/// Snapshots are rebuilt wholesale on every run: stores replace all tables,
/// never merge. Query engines operate read-only over the latest snapshot.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Snapshot {
    /// Canonical cleaned ledger.
    pub ledger: Vec<LineItem>,
    /// Market-metrics extract.
    pub market_metrics: Vec<LineItem>,
    /// Individual (PF) credit extract.
    pub credit_individual: Vec<LineItem>,
    /// Corporate (PJ) credit extract.
    pub credit_corporate: Vec<LineItem>,
    /// Financial-metrics table (reported rows plus synthetic ratios).
    pub financial_metrics: Vec<LineItem>,
    /// Pre-aggregated chart metrics.
    pub projected: Vec<ProjectedMetricRow>,
}

impl Snapshot {
    /// Combined credit table (PF then PJ), as consumed by modality and
    /// portfolio share queries.
    #[must_use]
    pub fn credit_data(&self) -> Vec<LineItem> {
        let mut rows =
            Vec::with_capacity(self.credit_individual.len() + self.credit_corporate.len());
        rows.extend_from_slice(&self.credit_individual);
        rows.extend_from_slice(&self.credit_corporate);
        rows
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_raw_line_item_builder() {
        let raw = RawLineItem::new("1234", 4, "Demonstração de Resultado", "Saldo X", 202_409)
            .with_group("Grupo A")
            .with_value("10,50");
        assert_eq!(raw.institution_code, "1234");
        assert_eq!(raw.group.as_deref(), Some("Grupo A"));
        assert_eq!(raw.value.as_deref(), Some("10,50"));
        assert_eq!(raw.account, None);
    }

    #[test]
    fn test_projection_kind_round_trip() {
        for kind in ProjectionKind::ALL {
            assert_eq!(kind.as_str().parse::<ProjectionKind>().unwrap(), kind);
            assert_eq!(kind.label_pt().parse::<ProjectionKind>().unwrap(), kind);
        }
        assert!("ValueMedian".parse::<ProjectionKind>().is_err());
    }
}
