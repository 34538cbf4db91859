//! Cleaner: raw dump records to the canonical ledger.

use bacen_core::institutions::{InstitutionRegistry, pad_code};
use bacen_core::period::{Quarter, parse_year_month};
use bacen_core::types::{LineItem, RawLineItem};
use tracing::debug;

/// Group label substituted when a report carries no group.
pub const NA_GROUP: &str = "nagroup";

/// Parses a decimal-comma value string and rounds it to 2 places.
///
/// Returns `None` for missing or unparseable values; those rows are dropped
/// by [`clean`] as a data-quality filter, not reported as errors.
pub fn parse_value(raw: Option<&str>) -> Option<f64> {
    let raw = raw?.trim();
    if raw.is_empty() {
        return None;
    }
    let value: f64 = raw.replace(',', ".").parse().ok()?;
    if !value.is_finite() {
        return None;
    }
    Some((value * 100.0).round() / 100.0)
}

/// Cleans raw dump records into canonical ledger rows.
///
/// Per record: the decimal-comma value is parsed and rounded to 2 places,
/// the `YYYYMM` period becomes a typed month and quarter, a missing group
/// becomes `"nagroup"`, the institution code is zero-padded to 8 digits, the
/// composite category key is composed, and the display name is left-joined
/// from the registry (unmatched codes keep no name).
///
/// Records with an unparseable value or period are dropped silently. The
/// output therefore never exceeds the input in length; rows are only ever
/// dropped, never duplicated.
#[must_use]
pub fn clean(raw: &[RawLineItem], registry: &InstitutionRegistry) -> Vec<LineItem> {
    let mut rows = Vec::with_capacity(raw.len());
    let mut dropped = 0usize;

    for record in raw {
        let (Some(value), Some(month)) = (
            parse_value(record.value.as_deref()),
            parse_year_month(record.period),
        ) else {
            dropped += 1;
            continue;
        };

        let group = record
            .group
            .clone()
            .filter(|g| !g.is_empty())
            .unwrap_or_else(|| NA_GROUP.to_string());
        let code = pad_code(&record.institution_code);
        let category_key = format!("{}_{}_{}", record.report_name, group, record.column_name);

        rows.push(LineItem {
            institution_name: registry.name(&code).map(str::to_string),
            institution_code: code,
            report_number: record.report_number,
            report_name: record.report_name.clone(),
            group,
            account: record.account.clone(),
            column_name: record.column_name.clone(),
            category_key,
            period_month: month,
            period_quarter: Quarter::from(month),
            value,
        });
    }

    debug!(kept = rows.len(), dropped, "cleaned raw records");
    rows
}
