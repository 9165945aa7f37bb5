//! In-memory entity store.
//!
//! Keeps projected entities in a map keyed by id. Useful for testing and
//! short-lived indexers that don't need persistence.

use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard, PoisonError};

use wldindex_core::{Entity, EntityId, EntityKind, EntityStore, StoreWriteError};

/// In-memory entity storage.
///
/// All data is lost when the process exits.
#[derive(Default)]
pub struct MemoryEntityStore {
    entities: Mutex<HashMap<EntityId, Entity>>,
}

impl MemoryEntityStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn read(&self) -> MutexGuard<'_, HashMap<EntityId, Entity>> {
        self.entities.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Look up a previously projected entity.
    pub fn get(&self, id: &EntityId) -> Option<Entity> {
        self.read().get(id).cloned()
    }

    /// Total number of stored entities.
    pub fn len(&self) -> usize {
        self.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// All entities of one kind, ordered by block number then id.
    pub fn by_kind(&self, kind: EntityKind) -> Vec<Entity> {
        let mut out: Vec<Entity> = self
            .read()
            .values()
            .filter(|e| e.kind() == kind)
            .cloned()
            .collect();
        out.sort_by(|a, b| {
            a.block_number()
                .cmp(&b.block_number())
                .then_with(|| a.id().cmp(b.id()))
        });
        out
    }
}

impl EntityStore for MemoryEntityStore {
    fn upsert(&self, id: &EntityId, entity: &Entity) -> Result<(), StoreWriteError> {
        let mut entities = self
            .entities
            .lock()
            .map_err(|e| StoreWriteError::Unavailable(e.to_string()))?;
        entities.insert(*id, entity.clone());
        Ok(())
    }
}
