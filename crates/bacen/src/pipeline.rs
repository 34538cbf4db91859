//! End-to-end ETL orchestration.

use bacen_core::types::{RawLineItem, Snapshot};
use bacen_core::{InstitutionRegistry, Result, SnapshotStore};
use bacen_etl::{
    CreditKind, build_financial_metrics, clean, extract_credit, extract_market_metrics,
    project_metrics,
};
use tracing::{debug, instrument};

/// Runs the full ETL chain from raw dump rows to a queryable snapshot.
///
/// Stages are pure table transformations; the pipeline itself only
/// sequences them, so two runs over the same input produce the same
/// snapshot.
///
/// # Example
///
/// ```rust,ignore
/// use bacen::{EtlPipeline, MemoryStore};
///
/// let pipeline = EtlPipeline::new();
/// let snapshot = pipeline.run(&raw_rows, &registry);
/// let store = MemoryStore::new();
/// pipeline.run_and_store(&raw_rows, &registry, &store).await?;
/// ```
#[derive(Debug, Default)]
pub struct EtlPipeline;

impl EtlPipeline {
    /// Create a new pipeline.
    #[must_use]
    pub fn new() -> Self {
        Self
    }

    /// Transforms raw dump rows into a full snapshot.
    #[instrument(skip_all, fields(raw_rows = raw.len(), institutions = registry.len()))]
    #[must_use]
    pub fn run(&self, raw: &[RawLineItem], registry: &InstitutionRegistry) -> Snapshot {
        let ledger = clean(raw, registry);
        debug!(rows = ledger.len(), "cleaned ledger");

        let market_metrics = extract_market_metrics(&ledger);
        let credit_individual = extract_credit(&ledger, CreditKind::Individual);
        let credit_corporate = extract_credit(&ledger, CreditKind::Corporate);
        debug!(
            market = market_metrics.len(),
            credit_pf = credit_individual.len(),
            credit_pj = credit_corporate.len(),
            "extracted tables"
        );

        let financial_metrics = build_financial_metrics(&ledger);
        let projected = project_metrics(&financial_metrics);
        debug!(
            financial = financial_metrics.len(),
            projected = projected.len(),
            "derived metric tables"
        );

        Snapshot {
            ledger,
            market_metrics,
            credit_individual,
            credit_corporate,
            financial_metrics,
            projected,
        }
    }

    /// Runs the chain and persists the snapshot with full-replace semantics.
    ///
    /// # Errors
    /// Returns the store's error if persisting fails.
    pub async fn run_and_store<S: SnapshotStore + ?Sized>(
        &self,
        raw: &[RawLineItem],
        registry: &InstitutionRegistry,
        store: &S,
    ) -> Result<Snapshot> {
        let snapshot = self.run(raw, registry);
        store.replace(&snapshot).await?;
        Ok(snapshot)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bacen_core::components::{ACTIVE_CLIENTS, OPERATING_REVENUE_PARTS};
    use bacen_store::MemoryStore;

    fn raw(report_number: u16, report_name: &str, column: &str, value: &str) -> RawLineItem {
        RawLineItem::new("1234", report_number, report_name, column, 202_409).with_value(value)
    }

    fn registry() -> InstitutionRegistry {
        let mut registry = InstitutionRegistry::new();
        registry.insert("00001234", "BANCO EXEMPLO S.A.");
        registry
    }

    fn sample_rows() -> Vec<RawLineItem> {
        vec![
            raw(4, "Demonstração de Resultado", OPERATING_REVENUE_PARTS[0], "1000,00"),
            raw(10, "Carteira de crédito ativa - quantidade de clientes e de operações", ACTIVE_CLIENTS, "50,00"),
            raw(1, "Resumo", "Lucro Líquido", "200,00"),
            raw(1, "Resumo", "Ativo Total", "4000,00"),
            raw(1, "Resumo", "Patrimônio Líquido", "800,00"),
        ]
    }

    #[test]
    fn test_run_produces_all_tables() {
        let snapshot = EtlPipeline::new().run(&sample_rows(), &registry());

        assert_eq!(snapshot.ledger.len(), 5);
        assert!(!snapshot.financial_metrics.is_empty());
        // Revenue 1000 and 50 clients clear the projection screen.
        assert!(!snapshot.projected.is_empty());
    }

    #[test]
    fn test_run_is_deterministic() {
        let pipeline = EtlPipeline::new();
        let first = pipeline.run(&sample_rows(), &registry());
        let second = pipeline.run(&sample_rows(), &registry());
        assert_eq!(first, second);
    }

    #[tokio::test]
    async fn test_run_and_store_persists_snapshot() {
        let store = MemoryStore::new();
        let snapshot = EtlPipeline::new()
            .run_and_store(&sample_rows(), &registry(), &store)
            .await
            .unwrap();

        let loaded = store.load().await.unwrap().unwrap();
        assert_eq!(loaded, snapshot);
    }
}
