//! RatioEngine: the financial-metrics table.
//!
//! Restricts the ledger to the income statement (report 4), the summary
//! (report 1), and the client counts (report 10), enriches the first two
//! with synthetic rows (operating revenue, ROA, ROE), and concatenates the
//! three subsets. Synthetic rows carry the `"Calculated"` provenance marker
//! so downstream consumers can tell derived from reported quantities.

use std::collections::BTreeMap;

use bacen_core::components::{
    ACTIVE_CLIENTS, CALCULATED, EQUITY, NET_INCOME, OPERATING_REVENUE, OPERATING_REVENUE_PARTS,
    ROA, ROE, TOTAL_ASSETS,
};
use bacen_core::period::Quarter;
use bacen_core::types::LineItem;
use chrono::NaiveDate;
use tracing::debug;

/// Income statement (Demonstração de Resultado).
const DRE_REPORT: u16 = 4;
/// Summary (Resumo).
const RESUMO_REPORT: u16 = 1;
/// Client and operation counts.
const CLIENTES_REPORT: u16 = 10;

/// Grouping key: one institution in one reporting month.
type GroupKey = (String, Option<String>, NaiveDate);

/// Everything a synthetic row inherits from its group.
#[derive(Clone)]
struct GroupTemplate {
    institution_code: String,
    institution_name: Option<String>,
    report_number: u16,
    report_name: String,
    period_month: NaiveDate,
}

impl GroupTemplate {
    fn from_row(row: &LineItem) -> Self {
        Self {
            institution_code: row.institution_code.clone(),
            institution_name: row.institution_name.clone(),
            report_number: row.report_number,
            report_name: row.report_name.clone(),
            period_month: row.period_month,
        }
    }

    /// Builds a synthetic row with the `"Calculated"` provenance marker.
    fn calculated_row(&self, column_name: &str, value: f64) -> LineItem {
        LineItem {
            institution_code: self.institution_code.clone(),
            institution_name: self.institution_name.clone(),
            report_number: self.report_number,
            report_name: self.report_name.clone(),
            group: CALCULATED.to_string(),
            account: Some(CALCULATED.to_string()),
            column_name: column_name.to_string(),
            category_key: format!("{CALCULATED}_{column_name}"),
            period_month: self.period_month,
            period_quarter: Quarter::from(self.period_month),
            value,
        }
    }
}

fn group_key(row: &LineItem) -> GroupKey {
    (
        row.institution_code.clone(),
        row.institution_name.clone(),
        row.period_month,
    )
}

/// Synthetic operating-revenue rows: per (institution, month) group in the
/// income statement, the sum of the four revenue component labels.
///
/// Groups reporting none of the four components get no synthetic row.
fn operating_revenue_rows(dre: &[&LineItem]) -> Vec<LineItem> {
    let mut groups: BTreeMap<GroupKey, (GroupTemplate, f64)> = BTreeMap::new();

    for row in dre {
        if !OPERATING_REVENUE_PARTS.contains(&row.column_name.as_str()) {
            continue;
        }
        groups
            .entry(group_key(row))
            .and_modify(|(_, sum)| *sum += row.value)
            .or_insert_with(|| (GroupTemplate::from_row(row), row.value));
    }

    groups
        .into_values()
        .map(|(template, sum)| template.calculated_row(OPERATING_REVENUE, sum))
        .collect()
}

/// A ratio is undefined data, not an error: zero or missing inputs yield NaN
/// and the NaN flows through to the persisted table.
fn ratio(numerator: Option<f64>, denominator: Option<f64>) -> f64 {
    match (numerator, denominator) {
        (Some(n), Some(d)) if d != 0.0 => n / d,
        _ => f64::NAN,
    }
}

/// Synthetic ROA/ROE rows: the summary subset is pivoted per (institution,
/// month) into a label map, the two ratios are computed, and un-pivoted back
/// into rows. Every summary group gets both rows, NaN-valued or not.
fn ratio_rows(resumo: &[&LineItem]) -> Vec<LineItem> {
    let mut groups: BTreeMap<GroupKey, (GroupTemplate, BTreeMap<String, f64>)> = BTreeMap::new();

    for row in resumo {
        let (_, labels) = groups
            .entry(group_key(row))
            .or_insert_with(|| (GroupTemplate::from_row(row), BTreeMap::new()));
        // First reported value wins on duplicate labels.
        labels.entry(row.column_name.clone()).or_insert(row.value);
    }

    let mut rows = Vec::with_capacity(groups.len() * 2);
    for (template, labels) in groups.into_values() {
        let net_income = labels.get(NET_INCOME).copied();
        let roa = ratio(net_income, labels.get(TOTAL_ASSETS).copied());
        let roe = ratio(net_income, labels.get(EQUITY).copied());
        rows.push(template.calculated_row(ROA, roa));
        rows.push(template.calculated_row(ROE, roe));
    }
    rows
}

/// Builds the financial-metrics table from the cleaned ledger.
///
/// Output rows: the full income-statement subset plus its synthetic
/// operating-revenue rows, the full summary subset plus its synthetic
/// ROA/ROE rows, and the client-count subset restricted to the
/// active-clients label. Row order within the concatenation carries no
/// meaning; consumers group by label.
#[must_use]
pub fn build_financial_metrics(ledger: &[LineItem]) -> Vec<LineItem> {
    let dre: Vec<&LineItem> = ledger
        .iter()
        .filter(|r| r.report_number == DRE_REPORT)
        .collect();
    let resumo: Vec<&LineItem> = ledger
        .iter()
        .filter(|r| r.report_number == RESUMO_REPORT)
        .collect();
    let clientes: Vec<&LineItem> = ledger
        .iter()
        .filter(|r| r.report_number == CLIENTES_REPORT && r.column_name == ACTIVE_CLIENTS)
        .collect();

    let revenue = operating_revenue_rows(&dre);
    let ratios = ratio_rows(&resumo);

    let mut rows: Vec<LineItem> = Vec::with_capacity(
        dre.len() + revenue.len() + resumo.len() + ratios.len() + clientes.len(),
    );
    rows.extend(dre.into_iter().cloned());
    rows.extend(revenue);
    rows.extend(resumo.into_iter().cloned());
    rows.extend(ratios);
    rows.extend(clientes.into_iter().cloned());

    debug!(rows = rows.len(), "built financial metrics table");
    rows
}

#[cfg(test)]
mod tests {
    use super::*;
    use bacen_core::components::OPERATING_REVENUE_PARTS;

    fn item(report_number: u16, report_name: &str, column_name: &str, value: f64) -> LineItem {
        let month = NaiveDate::from_ymd_opt(2024, 9, 1).unwrap();
        LineItem {
            institution_code: "00000001".to_string(),
            institution_name: Some("BANCO EXEMPLO S.A.".to_string()),
            report_number,
            report_name: report_name.to_string(),
            group: "nagroup".to_string(),
            account: None,
            column_name: column_name.to_string(),
            category_key: format!("{report_name}_nagroup_{column_name}"),
            period_month: month,
            period_quarter: Quarter::from(month),
            value,
        }
    }

    fn find<'a>(rows: &'a [LineItem], column: &str) -> Option<&'a LineItem> {
        rows.iter().find(|r| r.column_name == column)
    }

    #[test]
    fn test_operating_revenue_sums_the_four_parts() {
        let ledger = vec![
            item(4, "Demonstração de Resultado", OPERATING_REVENUE_PARTS[0], 100.0),
            item(4, "Demonstração de Resultado", OPERATING_REVENUE_PARTS[1], 25.0),
            item(4, "Demonstração de Resultado", OPERATING_REVENUE_PARTS[2], 10.0),
            item(4, "Demonstração de Resultado", OPERATING_REVENUE_PARTS[3], 5.0),
            item(4, "Demonstração de Resultado", "Despesas de Pessoal \n(d3)", -50.0),
        ];
        let rows = build_financial_metrics(&ledger);

        let synthetic = find(&rows, OPERATING_REVENUE).unwrap();
        assert_eq!(synthetic.value, 140.0);
        assert_eq!(synthetic.group, CALCULATED);
        assert_eq!(synthetic.account.as_deref(), Some(CALCULATED));
        assert_eq!(synthetic.category_key, "Calculated_Receita Operacional");
        // Reported rows survive unchanged alongside the synthetic one.
        assert_eq!(rows.len(), 6);
    }

    #[test]
    fn test_partial_revenue_components_still_sum() {
        let ledger = vec![item(
            4,
            "Demonstração de Resultado",
            OPERATING_REVENUE_PARTS[0],
            100.0,
        )];
        let rows = build_financial_metrics(&ledger);
        assert_eq!(find(&rows, OPERATING_REVENUE).unwrap().value, 100.0);
    }

    #[test]
    fn test_roa_roe_from_summary_pivot() {
        let ledger = vec![
            item(1, "Resumo", NET_INCOME, 50.0),
            item(1, "Resumo", TOTAL_ASSETS, 1000.0),
            item(1, "Resumo", EQUITY, 200.0),
        ];
        let rows = build_financial_metrics(&ledger);

        assert_eq!(find(&rows, ROA).unwrap().value, 0.05);
        assert_eq!(find(&rows, ROE).unwrap().value, 0.25);
        assert_eq!(find(&rows, ROA).unwrap().category_key, "Calculated_ROA");
    }

    #[test]
    fn test_zero_or_missing_denominator_yields_nan() {
        let ledger = vec![
            item(1, "Resumo", NET_INCOME, 50.0),
            item(1, "Resumo", TOTAL_ASSETS, 0.0),
        ];
        let rows = build_financial_metrics(&ledger);

        // Zero denominator.
        assert!(find(&rows, ROA).unwrap().value.is_nan());
        // Missing denominator (no equity row at all).
        assert!(find(&rows, ROE).unwrap().value.is_nan());
    }

    #[test]
    fn test_client_subset_restricted_to_active_clients() {
        let ledger = vec![
            item(10, "Clientes", ACTIVE_CLIENTS, 1200.0),
            item(10, "Clientes", "Quantidade de operações ativas", 9999.0),
        ];
        let rows = build_financial_metrics(&ledger);
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].column_name, ACTIVE_CLIENTS);
    }

    #[test]
    fn test_other_reports_are_excluded() {
        let ledger = vec![item(11, "Carteira PF", "Total", 1.0)];
        assert!(build_financial_metrics(&ledger).is_empty());
    }
}
