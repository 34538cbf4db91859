//! Point selectors feeding the share composer and time-series views.

use bacen_core::components::{ComponentGroup, CreditModality, MarketFeature};
use bacen_core::types::{LineItem, ProjectedMetricRow, ProjectionKind};
use chrono::{Datelike, NaiveDate};

use crate::share::SharePoint;

/// One observation of a per-institution time series.
#[derive(Clone, Debug, PartialEq)]
pub struct TimeSeriesPoint {
    /// Institution display name.
    pub institution: String,
    /// Reporting month.
    pub period_month: NaiveDate,
    /// Metric value.
    pub value: f64,
}

fn year_ok(month: NaiveDate, initial_year: Option<i32>) -> bool {
    initial_year.is_none_or(|year| month.year() >= year)
}

fn in_window(month: NaiveDate, start: Option<NaiveDate>, end: Option<NaiveDate>) -> bool {
    start.is_none_or(|s| month >= s) && end.is_none_or(|e| month <= e)
}

/// Market-share points for one feature of the market-metrics table.
///
/// The share entity is the institution name; unnamed institutions carry no
/// identity across periods and are skipped. `initial_year` cuts earlier
/// periods before pivoting.
#[must_use]
pub fn market_share_points(
    market_metrics: &[LineItem],
    feature: MarketFeature,
    initial_year: Option<i32>,
) -> Vec<SharePoint> {
    let key = feature.category_key();
    market_metrics
        .iter()
        .filter(|r| r.category_key == key && year_ok(r.period_month, initial_year))
        .filter_map(|r| {
            let name = r.institution_name.as_deref()?;
            Some(SharePoint::new(r.period_quarter, name, r.value))
        })
        .collect()
}

/// Share points over the combined credit table for a set of modalities.
///
/// Rows matching any requested modality contribute to the same
/// per-institution share, so a PF/PJ pair yields the combined portfolio.
#[must_use]
pub fn modality_share_points(
    credit_data: &[LineItem],
    modalities: &[CreditModality],
    initial_year: Option<i32>,
) -> Vec<SharePoint> {
    let keys: Vec<String> = modalities.iter().map(CreditModality::category_key).collect();
    credit_data
        .iter()
        .filter(|r| {
            keys.iter().any(|k| *k == r.category_key) && year_ok(r.period_month, initial_year)
        })
        .filter_map(|r| {
            let name = r.institution_name.as_deref()?;
            Some(SharePoint::new(r.period_quarter, name, r.value))
        })
        .collect()
}

/// Portfolio-composition points: the share entity is the modality label.
///
/// `institutions = None` means the whole market. The grouped view uses the
/// two portfolio totals; the detailed view uses the seventeen modalities
/// that never overlap the totals.
#[must_use]
pub fn portfolio_points(
    credit_data: &[LineItem],
    institutions: Option<&[String]>,
    grouped: bool,
    initial_year: Option<i32>,
) -> Vec<SharePoint> {
    let modalities: &[CreditModality] = if grouped {
        &CreditModality::PORTFOLIO_GROUPED
    } else {
        &CreditModality::PORTFOLIO_DETAILED
    };
    let keyed: Vec<(String, &'static str)> = modalities
        .iter()
        .map(|m| (m.category_key(), m.label()))
        .collect();

    credit_data
        .iter()
        .filter(|r| year_ok(r.period_month, initial_year))
        .filter(|r| {
            institutions.is_none_or(|list| {
                r.institution_name
                    .as_deref()
                    .is_some_and(|name| list.iter().any(|i| i == name))
            })
        })
        .filter_map(|r| {
            let (_, label) = keyed.iter().find(|(key, _)| *key == r.category_key)?;
            Some(SharePoint::new(r.period_quarter, *label, r.value))
        })
        .collect()
}

/// Per-institution time series of one metric from a ledger-shaped table,
/// reading the raw balance. Sorted by institution, then month.
#[must_use]
pub fn time_series(
    metrics: &[LineItem],
    institutions: &[String],
    metric_name: &str,
    start: Option<NaiveDate>,
    end: Option<NaiveDate>,
) -> Vec<TimeSeriesPoint> {
    let mut points: Vec<TimeSeriesPoint> = metrics
        .iter()
        .filter(|r| r.column_name == metric_name && in_window(r.period_month, start, end))
        .filter_map(|r| {
            let name = r.institution_name.as_deref()?;
            institutions.iter().any(|i| i == name).then(|| TimeSeriesPoint {
                institution: name.to_string(),
                period_month: r.period_month,
                value: r.value,
            })
        })
        .collect();
    points.sort_by(|a, b| {
        (a.institution.as_str(), a.period_month).cmp(&(b.institution.as_str(), b.period_month))
    });
    points
}

/// Per-institution time series of one component from the projected table,
/// under the percent-of-revenue or per-client projection.
#[must_use]
pub fn time_series_projected(
    projected: &[ProjectedMetricRow],
    institutions: &[String],
    group: ComponentGroup,
    component: &str,
    kind: ProjectionKind,
    start: Option<NaiveDate>,
    end: Option<NaiveDate>,
) -> Vec<TimeSeriesPoint> {
    let mut points: Vec<TimeSeriesPoint> = projected
        .iter()
        .filter(|r| {
            r.group == group
                && r.component == component
                && institutions.iter().any(|i| *i == r.institution)
                && in_window(r.period_month, start, end)
        })
        .map(|r| TimeSeriesPoint {
            institution: r.institution.clone(),
            period_month: r.period_month,
            value: r.value(kind),
        })
        .collect();
    points.sort_by(|a, b| {
        (a.institution.as_str(), a.period_month).cmp(&(b.institution.as_str(), b.period_month))
    });
    points
}

#[cfg(test)]
mod tests {
    use super::*;
    use bacen_core::period::Quarter;

    fn ledger_row(
        name: Option<&str>,
        category_key: &str,
        column_name: &str,
        month: NaiveDate,
        value: f64,
    ) -> LineItem {
        LineItem {
            institution_code: "00000001".to_string(),
            institution_name: name.map(str::to_string),
            report_number: 1,
            report_name: "Resumo".to_string(),
            group: "nagroup".to_string(),
            account: None,
            column_name: column_name.to_string(),
            category_key: category_key.to_string(),
            period_month: month,
            period_quarter: Quarter::from(month),
            value,
        }
    }

    fn month(year: i32, month: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(year, month, 1).unwrap()
    }

    #[test]
    fn test_market_share_points_filter_by_feature_and_year() {
        let key = MarketFeature::NetIncome.category_key();
        let rows = vec![
            ledger_row(Some("BANCO A"), key, "Lucro Líquido", month(2024, 9), 10.0),
            ledger_row(Some("BANCO A"), key, "Lucro Líquido", month(2019, 3), 99.0),
            ledger_row(Some("BANCO B"), "Resumo_nagroup_Captações", "Captações", month(2024, 9), 5.0),
            ledger_row(None, key, "Lucro Líquido", month(2024, 9), 7.0),
        ];
        let points = market_share_points(&rows, MarketFeature::NetIncome, Some(2020));

        assert_eq!(points.len(), 1);
        assert_eq!(points[0].entity, "BANCO A");
        assert_eq!(points[0].value, 10.0);
    }

    #[test]
    fn test_modality_share_points_combine_pf_and_pj() {
        let pf = CreditModality::TotalPf;
        let pj = CreditModality::TotalPj;
        let rows = vec![
            ledger_row(Some("BANCO A"), &pf.category_key(), "Total", month(2024, 9), 60.0),
            ledger_row(Some("BANCO A"), &pj.category_key(), "Total", month(2024, 9), 40.0),
        ];
        let points = modality_share_points(&rows, &[pf, pj], None);

        // Both rows survive as points; the composer sums them per entity.
        assert_eq!(points.len(), 2);
        assert!(points.iter().all(|p| p.entity == "BANCO A"));
    }

    #[test]
    fn test_portfolio_points_use_modality_labels_as_entities() {
        let consignado = CreditModality::ConsignadoPf;
        let rows = vec![
            ledger_row(
                Some("BANCO A"),
                &consignado.category_key(),
                "Total",
                month(2024, 9),
                100.0,
            ),
            // Grouped totals are excluded from the detailed view.
            ledger_row(
                Some("BANCO A"),
                &CreditModality::TotalPf.category_key(),
                "Total",
                month(2024, 9),
                999.0,
            ),
        ];
        let points = portfolio_points(&rows, None, false, None);

        assert_eq!(points.len(), 1);
        assert_eq!(points[0].entity, consignado.label());
    }

    #[test]
    fn test_portfolio_points_respect_institution_filter() {
        let key = CreditModality::TotalPf.category_key();
        let rows = vec![
            ledger_row(Some("BANCO A"), &key, "Total", month(2024, 9), 1.0),
            ledger_row(Some("BANCO B"), &key, "Total", month(2024, 9), 2.0),
        ];
        let points = portfolio_points(&rows, Some(&["BANCO B".to_string()]), true, None);

        assert_eq!(points.len(), 1);
        assert_eq!(points[0].value, 2.0);
    }

    #[test]
    fn test_time_series_sorted_by_month_within_window() {
        let rows = vec![
            ledger_row(Some("BANCO A"), "k", "Lucro Líquido", month(2024, 9), 3.0),
            ledger_row(Some("BANCO A"), "k", "Lucro Líquido", month(2024, 3), 1.0),
            ledger_row(Some("BANCO A"), "k", "Lucro Líquido", month(2024, 6), 2.0),
            ledger_row(Some("BANCO A"), "k", "Lucro Líquido", month(2023, 12), 9.0),
        ];
        let points = time_series(
            &rows,
            &["BANCO A".to_string()],
            "Lucro Líquido",
            Some(month(2024, 1)),
            None,
        );

        let months: Vec<u32> = points.iter().map(|p| p.period_month.month()).collect();
        assert_eq!(months, vec![3, 6, 9]);
    }
}
