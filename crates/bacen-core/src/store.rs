//! Snapshot store trait.
//!
//! This module defines the [`SnapshotStore`] trait that provides a unified
//! interface for persisting the table set produced by an ETL run.

use async_trait::async_trait;

use crate::error::Result;
use crate::types::Snapshot;

/// Trait for persisting ETL snapshots.
///
/// Implementations can store the tables in various backends (SQLite,
/// in-memory, ...). The lifecycle is full-replace: [`replace`] atomically
/// swaps every table for the new run's output, there is no incremental
/// update and no versioning.
///
/// [`replace`]: SnapshotStore::replace
#[async_trait]
pub trait SnapshotStore: Send + Sync {
    /// Replaces every stored table with the given snapshot's tables.
    async fn replace(&self, snapshot: &Snapshot) -> Result<()>;

    /// Loads the latest stored snapshot.
    ///
    /// Returns `Ok(None)` when nothing has been stored yet.
    async fn load(&self) -> Result<Option<Snapshot>>;

    /// Removes all stored tables.
    async fn clear(&self) -> Result<()>;
}
