#![doc = include_str!("../README.md")]
#![doc(issue_tracker_base_url = "https://github.com/bacen-insights/bacen-insights/issues/")]
#![cfg_attr(docsrs, feature(doc_auto_cfg))]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

/// In-memory snapshot store.
pub mod memory;

/// SQLite-backed snapshot store.
#[cfg(feature = "sqlite")]
pub mod sqlite;

// Re-export the trait for convenience
pub use bacen_core::SnapshotStore;

pub use memory::MemoryStore;

#[cfg(feature = "sqlite")]
pub use sqlite::SqliteStore;
