//! In-memory snapshot store.

use async_trait::async_trait;
use bacen_core::{Result, Snapshot, SnapshotStore};
use tokio::sync::RwLock;
use tracing::{debug, instrument};

/// Simple in-memory store for testing and embedding.
///
/// Holds at most one snapshot behind an `RwLock`; the snapshot is cloned on
/// load and lost when the store is dropped.
#[derive(Debug, Default)]
pub struct MemoryStore {
    snapshot: RwLock<Option<Snapshot>>,
}

impl MemoryStore {
    /// Create a new empty in-memory store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl SnapshotStore for MemoryStore {
    #[instrument(skip(self, snapshot), fields(ledger_rows = snapshot.ledger.len()))]
    async fn replace(&self, snapshot: &Snapshot) -> Result<()> {
        *self.snapshot.write().await = Some(snapshot.clone());
        debug!("replaced in-memory snapshot");
        Ok(())
    }

    async fn load(&self) -> Result<Option<Snapshot>> {
        Ok(self.snapshot.read().await.clone())
    }

    #[instrument(skip(self))]
    async fn clear(&self) -> Result<()> {
        *self.snapshot.write().await = None;
        debug!("cleared in-memory snapshot");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bacen_core::period::Quarter;
    use bacen_core::types::LineItem;
    use chrono::NaiveDate;

    fn snapshot() -> Snapshot {
        let month = NaiveDate::from_ymd_opt(2024, 9, 1).unwrap();
        let row = LineItem {
            institution_code: "00000001".to_string(),
            institution_name: Some("BANCO EXEMPLO S.A.".to_string()),
            report_number: 1,
            report_name: "Resumo".to_string(),
            group: "nagroup".to_string(),
            account: None,
            column_name: "Lucro Líquido".to_string(),
            category_key: "Resumo_nagroup_Lucro Líquido".to_string(),
            period_month: month,
            period_quarter: Quarter::from(month),
            value: 10.0,
        };
        Snapshot {
            ledger: vec![row],
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn test_replace_then_load() {
        let store = MemoryStore::new();
        assert!(store.load().await.unwrap().is_none());

        store.replace(&snapshot()).await.unwrap();
        let loaded = store.load().await.unwrap().unwrap();
        assert_eq!(loaded.ledger.len(), 1);
    }

    #[tokio::test]
    async fn test_replace_overwrites_fully() {
        let store = MemoryStore::new();
        store.replace(&snapshot()).await.unwrap();
        store.replace(&Snapshot::default()).await.unwrap();

        let loaded = store.load().await.unwrap().unwrap();
        assert!(loaded.ledger.is_empty());
    }

    #[tokio::test]
    async fn test_clear() {
        let store = MemoryStore::new();
        store.replace(&snapshot()).await.unwrap();
        store.clear().await.unwrap();
        assert!(store.load().await.unwrap().is_none());
    }
}
