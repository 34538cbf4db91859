//! DataFrame views of the persisted tables.
//!
//! The pipeline works on typed rows; chart collaborators and notebook users
//! consume tabular data. These builders convert the typed tables into
//! [`polars::prelude::DataFrame`]s with the column vocabulary of the
//! original BACEN exports (`CodInst`, `AnoMes`, `Saldo`, ...).

use chrono::NaiveDate;
use polars::prelude::{Column, DataFrame, DataType};

use crate::error::Result;
use crate::types::{LineItem, ProjectedMetricRow};

/// Days since the Unix epoch, the physical representation of a polars Date.
fn date_to_days(date: NaiveDate) -> i32 {
    let epoch = NaiveDate::from_ymd_opt(1970, 1, 1).expect("epoch is a valid date");
    (date - epoch).num_days() as i32
}

/// Builds a DataFrame view of a ledger-shaped table.
///
/// Columns: `CodInst`, `NomeInstituicao`, `NumeroRelatorio`, `NomeRelatorio`,
/// `Grupo`, `Conta`, `NomeColuna`, `NomeRelatorio_Grupo_Coluna`, `AnoMes`
/// (Date), `AnoMes_Q`, `Saldo`.
///
/// # Errors
/// Returns [`crate::error::BacenError::Frame`] if column assembly fails.
pub fn ledger_frame(rows: &[LineItem]) -> Result<DataFrame> {
    let codes: Vec<&str> = rows.iter().map(|r| r.institution_code.as_str()).collect();
    let names: Vec<Option<&str>> = rows
        .iter()
        .map(|r| r.institution_name.as_deref())
        .collect();
    let report_numbers: Vec<i32> = rows.iter().map(|r| i32::from(r.report_number)).collect();
    let report_names: Vec<&str> = rows.iter().map(|r| r.report_name.as_str()).collect();
    let groups: Vec<&str> = rows.iter().map(|r| r.group.as_str()).collect();
    let accounts: Vec<Option<&str>> = rows.iter().map(|r| r.account.as_deref()).collect();
    let columns: Vec<&str> = rows.iter().map(|r| r.column_name.as_str()).collect();
    let categories: Vec<&str> = rows.iter().map(|r| r.category_key.as_str()).collect();
    let months: Vec<i32> = rows.iter().map(|r| date_to_days(r.period_month)).collect();
    let quarters: Vec<String> = rows.iter().map(|r| r.period_quarter.to_string()).collect();
    let values: Vec<f64> = rows.iter().map(|r| r.value).collect();

    let month_col = Column::new("AnoMes".into(), months).cast(&DataType::Date)?;

    let df = DataFrame::new(vec![
        Column::new("CodInst".into(), codes),
        Column::new("NomeInstituicao".into(), names),
        Column::new("NumeroRelatorio".into(), report_numbers),
        Column::new("NomeRelatorio".into(), report_names),
        Column::new("Grupo".into(), groups),
        Column::new("Conta".into(), accounts),
        Column::new("NomeColuna".into(), columns),
        Column::new("NomeRelatorio_Grupo_Coluna".into(), categories),
        month_col,
        Column::new("AnoMes_Q".into(), quarters),
        Column::new("Saldo".into(), values),
    ])?;

    Ok(df)
}

/// Builds a DataFrame view of the projected-metrics table.
///
/// Columns: `NomeInstituicao`, `AnoMes_Q`, `AnoMes` (Date), `ComponentType`,
/// `Component`, `ValueAbsolute`, `ValuePercentRevenue`, `ValuePerClient`,
/// `NumClients`, `ReceitaOperacional`.
///
/// # Errors
/// Returns [`crate::error::BacenError::Frame`] if column assembly fails.
pub fn projected_frame(rows: &[ProjectedMetricRow]) -> Result<DataFrame> {
    let institutions: Vec<&str> = rows.iter().map(|r| r.institution.as_str()).collect();
    let quarters: Vec<String> = rows.iter().map(|r| r.period_quarter.to_string()).collect();
    let months: Vec<i32> = rows.iter().map(|r| date_to_days(r.period_month)).collect();
    let groups: Vec<&str> = rows.iter().map(|r| r.group.as_str()).collect();
    let components: Vec<&str> = rows.iter().map(|r| r.component.as_str()).collect();
    let absolute: Vec<f64> = rows.iter().map(|r| r.value_absolute).collect();
    let pct: Vec<f64> = rows.iter().map(|r| r.value_pct_revenue).collect();
    let per_client: Vec<f64> = rows.iter().map(|r| r.value_per_client).collect();
    let clients: Vec<f64> = rows.iter().map(|r| r.num_clients).collect();
    let revenue: Vec<f64> = rows.iter().map(|r| r.operating_revenue).collect();

    let month_col = Column::new("AnoMes".into(), months).cast(&DataType::Date)?;

    let df = DataFrame::new(vec![
        Column::new("NomeInstituicao".into(), institutions),
        Column::new("AnoMes_Q".into(), quarters),
        month_col,
        Column::new("ComponentType".into(), groups),
        Column::new("Component".into(), components),
        Column::new("ValueAbsolute".into(), absolute),
        Column::new("ValuePercentRevenue".into(), pct),
        Column::new("ValuePerClient".into(), per_client),
        Column::new("NumClients".into(), clients),
        Column::new("ReceitaOperacional".into(), revenue),
    ])?;

    Ok(df)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::period::Quarter;

    fn item(code: &str, value: f64) -> LineItem {
        let month = NaiveDate::from_ymd_opt(2024, 9, 1).unwrap();
        LineItem {
            institution_code: code.to_string(),
            institution_name: None,
            report_number: 1,
            report_name: "Resumo".to_string(),
            group: "nagroup".to_string(),
            account: None,
            column_name: "Lucro Líquido".to_string(),
            category_key: "Resumo_nagroup_Lucro Líquido".to_string(),
            period_month: month,
            period_quarter: Quarter::from(month),
            value,
        }
    }

    #[test]
    fn test_ledger_frame_shape() {
        let rows = vec![item("00000001", 10.0), item("00000002", 20.0)];
        let df = ledger_frame(&rows).unwrap();
        assert_eq!(df.height(), 2);
        assert_eq!(df.width(), 11);
        assert!(df.column("AnoMes").unwrap().dtype() == &DataType::Date);
    }

    #[test]
    fn test_empty_table_builds_empty_frame() {
        let df = ledger_frame(&[]).unwrap();
        assert_eq!(df.height(), 0);
        let df = projected_frame(&[]).unwrap();
        assert_eq!(df.height(), 0);
    }
}
