//! SQLite entity store.
//!
//! Persists projected entities to a single SQLite file via `rusqlite`, with
//! WAL mode for concurrent readers. Every upsert is one
//! `INSERT OR REPLACE` statement, so a failed write leaves the previous row
//! (or no row) in place.
//!
//! # Usage
//! ```rust,no_run
//! use wldindex_storage::sqlite::SqliteEntityStore;
//!
//! # fn example() -> Result<(), Box<dyn std::error::Error>> {
//! // File-backed (persistent)
//! let store = SqliteEntityStore::open("./wldindex.db")?;
//!
//! // In-memory (tests / ephemeral)
//! let store = SqliteEntityStore::in_memory()?;
//! # Ok(())
//! # }
//! ```
//!
//! ## Schema
//! ```sql
//! CREATE TABLE wld_entities (
//!     id               BLOB    PRIMARY KEY,   -- tx_hash ‖ log_index (36 bytes)
//!     kind             TEXT    NOT NULL,
//!     block_number     INTEGER NOT NULL,
//!     block_timestamp  INTEGER NOT NULL,
//!     transaction_hash BLOB    NOT NULL,
//!     body             TEXT    NOT NULL       -- entity as JSON
//! );
//! CREATE INDEX wld_entities_kind ON wld_entities (kind, block_number);
//! ```

use std::path::Path;
use std::sync::{Arc, Mutex, MutexGuard};

use rusqlite::{params, Connection, ErrorCode, OptionalExtension};
use tracing::debug;

use wldindex_core::{Entity, EntityId, EntityKind, EntityStore, StoreWriteError};

use crate::StorageError;

/// SQLite-backed entity store.
///
/// Thread-safe via an internal `Arc<Mutex<Connection>>`; clones share the
/// same connection.
#[derive(Clone)]
pub struct SqliteEntityStore {
    conn: Arc<Mutex<Connection>>,
}

impl SqliteEntityStore {
    /// Open (or create) a database at `path` and make sure the table exists.
    pub fn open(path: impl AsRef<Path>) -> Result<Self, StorageError> {
        let conn = Connection::open(path.as_ref())
            .map_err(|e| StorageError::Database(format!("sqlite open error: {e}")))?;

        conn.execute_batch("PRAGMA journal_mode=WAL; PRAGMA synchronous=NORMAL;")
            .map_err(db_err)?;

        conn.execute_batch(
            "CREATE TABLE IF NOT EXISTS wld_entities (
                id               BLOB    PRIMARY KEY,
                kind             TEXT    NOT NULL,
                block_number     INTEGER NOT NULL,
                block_timestamp  INTEGER NOT NULL,
                transaction_hash BLOB    NOT NULL,
                body             TEXT    NOT NULL
            );
            CREATE INDEX IF NOT EXISTS wld_entities_kind
                ON wld_entities (kind, block_number);",
        )
        .map_err(db_err)?;

        debug!(path = %path.as_ref().display(), "SQLite entity store opened");
        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    /// Open an in-memory database. All data is lost when the last clone drops.
    pub fn in_memory() -> Result<Self, StorageError> {
        Self::open(":memory:")
    }

    fn conn(&self) -> Result<MutexGuard<'_, Connection>, StorageError> {
        self.conn
            .lock()
            .map_err(|e| StorageError::Database(format!("connection lock poisoned: {e}")))
    }

    /// Look up a previously projected entity.
    pub fn get(&self, id: &EntityId) -> Result<Option<Entity>, StorageError> {
        let conn = self.conn()?;
        let body: Option<String> = conn
            .query_row(
                "SELECT body FROM wld_entities WHERE id = ?1",
                params![id.as_bytes()],
                |row| row.get(0),
            )
            .optional()
            .map_err(db_err)?;

        body.map(|json| {
            serde_json::from_str(&json).map_err(|e| StorageError::Corrupt {
                id: id.to_string(),
                reason: e.to_string(),
            })
        })
        .transpose()
    }

    /// Total number of stored entities.
    pub fn count(&self) -> Result<u64, StorageError> {
        let conn = self.conn()?;
        let n: i64 = conn
            .query_row("SELECT COUNT(*) FROM wld_entities", [], |row| row.get(0))
            .map_err(db_err)?;
        Ok(n as u64)
    }

    /// Number of stored entities of one kind.
    pub fn count_by_kind(&self, kind: EntityKind) -> Result<u64, StorageError> {
        let conn = self.conn()?;
        let n: i64 = conn
            .query_row(
                "SELECT COUNT(*) FROM wld_entities WHERE kind = ?1",
                params![kind.as_str()],
                |row| row.get(0),
            )
            .map_err(db_err)?;
        Ok(n as u64)
    }
}

impl EntityStore for SqliteEntityStore {
    fn upsert(&self, id: &EntityId, entity: &Entity) -> Result<(), StoreWriteError> {
        let kind = entity.kind();
        let body = serde_json::to_string(entity).map_err(|e| StoreWriteError::Encode {
            id: *id,
            reason: e.to_string(),
        })?;
        let block_number = to_sql_int(kind, "block_number", entity.block_number())?;
        let block_timestamp = to_sql_int(kind, "block_timestamp", entity.block_timestamp())?;

        let conn = self
            .conn
            .lock()
            .map_err(|e| StoreWriteError::Unavailable(e.to_string()))?;

        conn.execute(
            "INSERT OR REPLACE INTO wld_entities
                (id, kind, block_number, block_timestamp, transaction_hash, body)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
            params![
                id.as_bytes(),
                kind.as_str(),
                block_number,
                block_timestamp,
                entity.transaction_hash().as_slice(),
                body,
            ],
        )
        .map_err(|e| write_err(kind, e))?;

        debug!(%kind, %id, block_number, "Entity upserted");
        Ok(())
    }
}

/// SQLite integers are signed 64-bit.
fn to_sql_int(kind: EntityKind, column: &str, value: u64) -> Result<i64, StoreWriteError> {
    i64::try_from(value).map_err(|_| StoreWriteError::Schema {
        kind,
        reason: format!("{column} {value} exceeds SQLite INTEGER range"),
    })
}

fn write_err(kind: EntityKind, e: rusqlite::Error) -> StoreWriteError {
    match e.sqlite_error_code() {
        Some(
            ErrorCode::DatabaseBusy
            | ErrorCode::DatabaseLocked
            | ErrorCode::CannotOpen
            | ErrorCode::DiskFull
            | ErrorCode::SystemIoFailure
            | ErrorCode::ReadOnly,
        ) => StoreWriteError::Unavailable(e.to_string()),
        _ => StoreWriteError::Schema {
            kind,
            reason: e.to_string(),
        },
    }
}

fn db_err(e: rusqlite::Error) -> StorageError {
    StorageError::Database(e.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use wldindex_core::schema::{TokensMintedEntity, TransferEntity};
    use wldindex_core::{Address, B256, U256};

    fn transfer(log_index: u32, value: u64) -> Entity {
        let tx = B256::repeat_byte(0xab);
        TransferEntity {
            id: EntityId::new(&tx, log_index),
            from: Address::repeat_byte(0x11),
            to: Address::repeat_byte(0x22),
            value: U256::from(value),
            block_number: 100,
            block_timestamp: 1_700_000_000,
            transaction_hash: tx,
        }
        .into()
    }

    #[test]
    fn upsert_then_get_round_trips() {
        let store = SqliteEntityStore::in_memory().unwrap();
        let e = transfer(3, 1000);
        store.upsert(e.id(), &e).unwrap();

        assert_eq!(store.get(e.id()).unwrap(), Some(e));
        assert_eq!(store.count().unwrap(), 1);
        assert_eq!(store.count_by_kind(EntityKind::Transfer).unwrap(), 1);
        assert_eq!(store.count_by_kind(EntityKind::Approval).unwrap(), 0);
    }

    #[test]
    fn get_missing_is_none() {
        let store = SqliteEntityStore::in_memory().unwrap();
        let id = EntityId::new(&B256::ZERO, 0);
        assert_eq!(store.get(&id).unwrap(), None);
    }

    #[test]
    fn second_upsert_overwrites_in_place() {
        let store = SqliteEntityStore::in_memory().unwrap();
        let first = transfer(0, 1);
        let second = transfer(0, 2);
        store.upsert(first.id(), &first).unwrap();
        store.upsert(second.id(), &second).unwrap();

        assert_eq!(store.count().unwrap(), 1);
        assert_eq!(store.get(first.id()).unwrap(), Some(second));
    }

    #[test]
    fn large_amounts_survive_storage() {
        let store = SqliteEntityStore::in_memory().unwrap();
        let tx = B256::repeat_byte(0x01);
        let e: Entity = TokensMintedEntity {
            id: EntityId::new(&tx, 7),
            minter: Address::repeat_byte(0x33),
            new_amounts: vec![U256::MAX, U256::ZERO, U256::from(10u64).pow(U256::from(27u64))],
            block_number: 1,
            block_timestamp: 2,
            transaction_hash: tx,
        }
        .into();
        store.upsert(e.id(), &e).unwrap();
        assert_eq!(store.get(e.id()).unwrap(), Some(e));
    }

    #[test]
    fn block_number_out_of_range_is_rejected() {
        let store = SqliteEntityStore::in_memory().unwrap();
        let tx = B256::repeat_byte(0x02);
        let e: Entity = TransferEntity {
            id: EntityId::new(&tx, 0),
            from: Address::ZERO,
            to: Address::ZERO,
            value: U256::ZERO,
            block_number: u64::MAX,
            block_timestamp: 0,
            transaction_hash: tx,
        }
        .into();

        let err = store.upsert(e.id(), &e).unwrap_err();
        assert!(matches!(err, StoreWriteError::Schema { kind: EntityKind::Transfer, .. }));
        assert_eq!(store.count().unwrap(), 0);
    }

    #[test]
    fn failed_write_leaves_nothing_behind() {
        let store = SqliteEntityStore::in_memory().unwrap();
        store
            .conn()
            .unwrap()
            .execute_batch("DROP TABLE wld_entities")
            .unwrap();

        let e = transfer(0, 1);
        assert!(store.upsert(e.id(), &e).is_err());
        assert!(store.get(e.id()).is_err());
    }

    #[test]
    fn file_backed_store_persists_across_reopen() {
        let path = std::env::temp_dir().join(format!(
            "wldindex-sqlite-test-{}.db",
            std::process::id()
        ));
        let _ = std::fs::remove_file(&path);

        let e = transfer(9, 42);
        {
            let store = SqliteEntityStore::open(&path).unwrap();
            store.upsert(e.id(), &e).unwrap();
        }
        let reopened = SqliteEntityStore::open(&path).unwrap();
        assert_eq!(reopened.get(e.id()).unwrap(), Some(e));

        drop(reopened);
        let _ = std::fs::remove_file(&path);
    }
}
