//! MetricsProjector: pre-computes chart-ready metric projections.
//!
//! The financial-metrics table is grouped per (institution, quarter, month),
//! institutions with an unusable revenue or client base are dropped, and
//! every chart component is emitted in its three projections (absolute,
//! percent of operating revenue, per active client).

use std::collections::{BTreeMap, BTreeSet, HashMap};

use bacen_core::components::{
    ACTIVE_CLIENTS, ComponentGroup, OPERATING_REVENUE, OTHER_INTERMEDIATION_REVENUE,
    OTHER_INTERMEDIATION_REVENUE_PARTS,
};
use bacen_core::period::Quarter;
use bacen_core::types::{LineItem, ProjectedMetricRow};
use chrono::NaiveDate;
use tracing::debug;

/// One institution display name in one reporting quarter and month.
type PeriodKey = (String, Quarter, NaiveDate);

/// Denominators at or below this are treated as absent reporting, not as a
/// tiny-but-real base.
const BASE_THRESHOLD: f64 = 1.0;

fn period_key(row: &LineItem) -> Option<PeriodKey> {
    // Rows with no registry name have no stable grouping identity and are
    // left out of the projection.
    let name = row.institution_name.clone()?;
    Some((name, row.period_quarter, row.period_month))
}

/// Per-key sums of one metric label, for the validity screen.
fn sums_of(metrics: &[LineItem], label: &str) -> BTreeMap<PeriodKey, f64> {
    let mut sums = BTreeMap::new();
    for row in metrics.iter().filter(|r| r.column_name == label) {
        let Some(key) = period_key(row) else { continue };
        *sums.entry(key).or_insert(0.0) += row.value;
    }
    sums
}

/// Per-key single value of one metric label, last reported row winning.
fn lookup_of(metrics: &[LineItem], label: &str) -> BTreeMap<PeriodKey, f64> {
    let mut lookup = BTreeMap::new();
    for row in metrics.iter().filter(|r| r.column_name == label) {
        let Some(key) = period_key(row) else { continue };
        lookup.insert(key, row.value);
    }
    lookup
}

/// Projects the financial-metrics table into chart-ready rows.
///
/// Keys where the summed operating revenue or the summed active-client
/// count is missing or at most 1 are screened out entirely. Surviving keys
/// emit one row per component of every chart group, in definition order,
/// with missing components valued 0.
#[must_use]
pub fn project_metrics(metrics: &[LineItem]) -> Vec<ProjectedMetricRow> {
    let revenue_sums = sums_of(metrics, OPERATING_REVENUE);
    let client_sums = sums_of(metrics, ACTIVE_CLIENTS);

    let valid: BTreeSet<&PeriodKey> = revenue_sums
        .iter()
        .filter(|(key, revenue)| {
            **revenue > BASE_THRESHOLD
                && client_sums
                    .get(*key)
                    .is_some_and(|clients| *clients > BASE_THRESHOLD)
        })
        .map(|(key, _)| key)
        .collect();

    let revenue_lookup = lookup_of(metrics, OPERATING_REVENUE);
    let client_lookup = lookup_of(metrics, ACTIVE_CLIENTS);

    // Label -> value map per key, last reported row winning on duplicates.
    let mut groups: BTreeMap<PeriodKey, HashMap<String, f64>> = BTreeMap::new();
    for row in metrics {
        let Some(key) = period_key(row) else { continue };
        if !valid.contains(&key) {
            continue;
        }
        groups
            .entry(key)
            .or_default()
            .insert(row.column_name.clone(), row.value);
    }

    let mut rows = Vec::new();
    for ((institution, quarter, month), mut labels) in groups {
        let bucket: f64 = OTHER_INTERMEDIATION_REVENUE_PARTS
            .iter()
            .map(|part| labels.get(*part).copied().unwrap_or(0.0))
            .sum();
        labels.insert(OTHER_INTERMEDIATION_REVENUE.to_string(), bucket);

        let key = (institution.clone(), quarter, month);
        let operating_revenue = revenue_lookup.get(&key).copied().unwrap_or(1.0);
        let num_clients = client_lookup.get(&key).copied().unwrap_or(1.0);

        for group in ComponentGroup::ALL {
            for component in group.components() {
                let value = labels.get(component.source).copied().unwrap_or(0.0);
                let value_pct_revenue = if operating_revenue > BASE_THRESHOLD {
                    value / operating_revenue * 100.0
                } else {
                    0.0
                };
                let value_per_client = if num_clients > BASE_THRESHOLD {
                    value / num_clients
                } else {
                    0.0
                };
                rows.push(ProjectedMetricRow {
                    institution: institution.clone(),
                    period_quarter: quarter,
                    period_month: month,
                    group,
                    component: component.source.to_string(),
                    value_absolute: value,
                    value_pct_revenue,
                    value_per_client,
                    num_clients,
                    operating_revenue,
                });
            }
        }
    }

    debug!(
        keys = valid.len(),
        rows = rows.len(),
        "projected financial metrics"
    );
    rows
}

#[cfg(test)]
mod tests {
    use super::*;
    use bacen_core::components::{CALCULATED, NET_INCOME_LINE, OPERATING_REVENUE_PARTS};

    fn metric(name: Option<&str>, column: &str, value: f64) -> LineItem {
        let month = NaiveDate::from_ymd_opt(2024, 9, 1).unwrap();
        LineItem {
            institution_code: "00000001".to_string(),
            institution_name: name.map(str::to_string),
            report_number: 4,
            report_name: "Demonstração de Resultado".to_string(),
            group: CALCULATED.to_string(),
            account: Some(CALCULATED.to_string()),
            column_name: column.to_string(),
            category_key: format!("{CALCULATED}_{column}"),
            period_month: month,
            period_quarter: Quarter::from(month),
            value,
        }
    }

    fn base(name: &str) -> Vec<LineItem> {
        vec![
            metric(Some(name), OPERATING_REVENUE, 1000.0),
            metric(Some(name), ACTIVE_CLIENTS, 50.0),
        ]
    }

    fn find<'a>(
        rows: &'a [ProjectedMetricRow],
        group: ComponentGroup,
        component: &str,
    ) -> &'a ProjectedMetricRow {
        rows.iter()
            .find(|r| r.group == group && r.component == component)
            .unwrap()
    }

    #[test]
    fn test_emits_every_group_in_definition_order() {
        let rows = project_metrics(&base("BANCO A"));

        let expected: Vec<(ComponentGroup, &str)> = ComponentGroup::ALL
            .iter()
            .flat_map(|g| g.components().iter().map(|c| (*g, c.source)))
            .collect();
        let actual: Vec<(ComponentGroup, &str)> = rows
            .iter()
            .map(|r| (r.group, r.component.as_str()))
            .collect();
        assert_eq!(actual, expected);
    }

    #[test]
    fn test_three_projections_per_component() {
        let mut metrics = base("BANCO A");
        metrics.push(metric(Some("BANCO A"), OPERATING_REVENUE_PARTS[0], 600.0));
        let rows = project_metrics(&metrics);

        let credit = find(&rows, ComponentGroup::RevenueBuildup, OPERATING_REVENUE_PARTS[0]);
        assert_eq!(credit.value_absolute, 600.0);
        assert_eq!(credit.value_pct_revenue, 60.0);
        assert_eq!(credit.value_per_client, 12.0);
        assert_eq!(credit.operating_revenue, 1000.0);
        assert_eq!(credit.num_clients, 50.0);
    }

    #[test]
    fn test_missing_component_is_zero() {
        let rows = project_metrics(&base("BANCO A"));
        let net = find(&rows, ComponentGroup::PlDecomposition, NET_INCOME_LINE);
        assert_eq!(net.value_absolute, 0.0);
        assert_eq!(net.value_pct_revenue, 0.0);
    }

    #[test]
    fn test_intermediation_bucket_sums_its_parts() {
        let mut metrics = base("BANCO A");
        metrics.push(metric(
            Some("BANCO A"),
            OTHER_INTERMEDIATION_REVENUE_PARTS[0],
            30.0,
        ));
        metrics.push(metric(
            Some("BANCO A"),
            OTHER_INTERMEDIATION_REVENUE_PARTS[2],
            12.0,
        ));
        let rows = project_metrics(&metrics);

        let bucket = find(
            &rows,
            ComponentGroup::RevenueBuildup,
            OTHER_INTERMEDIATION_REVENUE,
        );
        assert_eq!(bucket.value_absolute, 42.0);
    }

    #[test]
    fn test_threshold_screens_out_insufficient_bases() {
        // Revenue of exactly 1 fails the strictly-greater screen.
        let metrics = vec![
            metric(Some("BANCO B"), OPERATING_REVENUE, 1.0),
            metric(Some("BANCO B"), ACTIVE_CLIENTS, 50.0),
        ];
        assert!(project_metrics(&metrics).is_empty());

        // Missing client count fails it too.
        let metrics = vec![metric(Some("BANCO C"), OPERATING_REVENUE, 1000.0)];
        assert!(project_metrics(&metrics).is_empty());
    }

    #[test]
    fn test_unnamed_institutions_are_excluded() {
        let metrics = vec![
            metric(None, OPERATING_REVENUE, 1000.0),
            metric(None, ACTIVE_CLIENTS, 50.0),
        ];
        assert!(project_metrics(&metrics).is_empty());
    }
}
