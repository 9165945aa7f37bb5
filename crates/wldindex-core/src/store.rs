//! The durability seam between the projector and whatever persists entities.

use std::sync::Arc;

use crate::entity::EntityId;
use crate::error::StoreWriteError;
use crate::schema::Entity;

/// Create-or-overwrite persistence keyed by [`EntityId`].
///
/// Implementations must be all-or-nothing per call: on `Err` no part of the
/// entity may become visible to later reads. Backends live in
/// `wldindex-storage` (`MemoryEntityStore`, `SqliteEntityStore`).
pub trait EntityStore: Send + Sync {
    fn upsert(&self, id: &EntityId, entity: &Entity) -> Result<(), StoreWriteError>;
}

impl<S: EntityStore + ?Sized> EntityStore for &S {
    fn upsert(&self, id: &EntityId, entity: &Entity) -> Result<(), StoreWriteError> {
        (**self).upsert(id, entity)
    }
}

impl<S: EntityStore + ?Sized> EntityStore for Box<S> {
    fn upsert(&self, id: &EntityId, entity: &Entity) -> Result<(), StoreWriteError> {
        (**self).upsert(id, entity)
    }
}

impl<S: EntityStore + ?Sized> EntityStore for Arc<S> {
    fn upsert(&self, id: &EntityId, entity: &Entity) -> Result<(), StoreWriteError> {
        (**self).upsert(id, entity)
    }
}
