//! wldindex-storage — entity store backends for the WLD token indexer.
//!
//! Backends:
//! - [`memory`] — in-memory (dev/testing, no persistence)
//! - [`sqlite`] — SQLite via `rusqlite` (embedded, single-file persistence)
//!
//! Both implement [`wldindex_core::EntityStore`]; the read helpers they add
//! are for inspection and tests, not part of the projection path.

use thiserror::Error;

#[cfg(feature = "memory")]
pub mod memory;

#[cfg(feature = "sqlite")]
pub mod sqlite;

#[cfg(feature = "memory")]
pub use memory::MemoryEntityStore;

#[cfg(feature = "sqlite")]
pub use sqlite::SqliteEntityStore;

/// Errors from opening a backend or reading entities back out of it.
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Database error: {0}")]
    Database(String),

    #[error("Corrupt row {id}: {reason}")]
    Corrupt { id: String, reason: String },
}
