//! Extractor: narrow purpose-built tables from the canonical ledger.
//!
//! Each extraction is a pure row-subset selection by report number and
//! column/category allow-list; the output schema is identical to the ledger.

use std::collections::HashSet;

use bacen_core::components::MarketFeature;
use bacen_core::types::LineItem;
use tracing::debug;

/// Which credit segment an extraction targets.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum CreditKind {
    /// Individual (Pessoa Física) portfolios, report 11.
    Individual,
    /// Corporate (Pessoa Jurídica) portfolios, reports 13 and 14.
    Corporate,
}

impl CreditKind {
    const fn reports(&self) -> &'static [u16] {
        match self {
            Self::Individual => &[11],
            Self::Corporate => &[13, 14],
        }
    }

    const fn columns(&self) -> &'static [&'static str] {
        match self {
            Self::Individual => &["Total da Carteira de Pessoa Física", "Total"],
            Self::Corporate => &[
                "Total da Carteira de Pessoa Jurídica",
                "Total",
                "Grande",
                "Média",
                "Pequena",
                "Micro",
            ],
        }
    }
}

/// Extracts a credit portfolio table from the cleaned ledger.
#[must_use]
pub fn extract_credit(ledger: &[LineItem], kind: CreditKind) -> Vec<LineItem> {
    let rows: Vec<LineItem> = ledger
        .iter()
        .filter(|r| kind.reports().contains(&r.report_number))
        .filter(|r| kind.columns().contains(&r.column_name.as_str()))
        .cloned()
        .collect();
    debug!(?kind, rows = rows.len(), "extracted credit table");
    rows
}

/// Extracts the market-metrics table: every ledger row whose category key is
/// in the [`MarketFeature`] catalog.
#[must_use]
pub fn extract_market_metrics(ledger: &[LineItem]) -> Vec<LineItem> {
    let keys: HashSet<&'static str> = MarketFeature::ALL
        .into_iter()
        .map(|f| f.category_key())
        .collect();
    let rows: Vec<LineItem> = ledger
        .iter()
        .filter(|r| keys.contains(r.category_key.as_str()))
        .cloned()
        .collect();
    debug!(rows = rows.len(), "extracted market metrics");
    rows
}

/// Concatenates the individual and corporate credit extracts into the
/// combined credit table consumed by modality and portfolio queries.
#[must_use]
pub fn combine_credit(individual: &[LineItem], corporate: &[LineItem]) -> Vec<LineItem> {
    let mut rows = Vec::with_capacity(individual.len() + corporate.len());
    rows.extend_from_slice(individual);
    rows.extend_from_slice(corporate);
    rows
}

#[cfg(test)]
mod tests {
    use super::*;
    use bacen_core::period::Quarter;
    use chrono::NaiveDate;

    fn item(report_number: u16, column_name: &str, category_key: &str) -> LineItem {
        let month = NaiveDate::from_ymd_opt(2024, 9, 1).unwrap();
        LineItem {
            institution_code: "00000001".to_string(),
            institution_name: Some("BANCO EXEMPLO S.A.".to_string()),
            report_number,
            report_name: "r".to_string(),
            group: "nagroup".to_string(),
            account: None,
            column_name: column_name.to_string(),
            category_key: category_key.to_string(),
            period_month: month,
            period_quarter: Quarter::from(month),
            value: 1.0,
        }
    }

    #[test]
    fn test_individual_credit_filter() {
        let ledger = vec![
            item(11, "Total da Carteira de Pessoa Física", "a"),
            item(11, "Total", "b"),
            item(11, "Vencido", "c"),
            item(13, "Total", "d"),
        ];
        let rows = extract_credit(&ledger, CreditKind::Individual);
        assert_eq!(rows.len(), 2);
        assert!(rows.iter().all(|r| r.report_number == 11));
    }

    #[test]
    fn test_corporate_credit_filter_spans_two_reports() {
        let ledger = vec![
            item(13, "Total da Carteira de Pessoa Jurídica", "a"),
            item(14, "Micro", "b"),
            item(14, "Média", "c"),
            item(14, "Vencido", "d"),
            item(11, "Total", "e"),
        ];
        let rows = extract_credit(&ledger, CreditKind::Corporate);
        assert_eq!(rows.len(), 3);
    }

    #[test]
    fn test_market_metrics_filter() {
        let ledger = vec![
            item(1, "Lucro Líquido", "Resumo_nagroup_Lucro Líquido"),
            item(1, "Captações", "Resumo_nagroup_Captações"),
            item(1, "Outro", "Resumo_nagroup_Outro"),
        ];
        let rows = extract_market_metrics(&ledger);
        assert_eq!(rows.len(), 2);
    }

    #[test]
    fn test_extracts_preserve_row_shape() {
        let ledger = vec![item(11, "Total", "x")];
        let rows = extract_credit(&ledger, CreditKind::Individual);
        assert_eq!(rows[0], ledger[0]);
    }

    #[test]
    fn test_combine_credit_keeps_both_sides() {
        let pf = vec![item(11, "Total", "a")];
        let pj = vec![item(13, "Total", "b"), item(14, "Micro", "c")];
        assert_eq!(combine_credit(&pf, &pj).len(), 3);
    }
}
