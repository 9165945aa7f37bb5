//! The event projector: one typed event in, one entity upserted.
//!
//! ```text
//! RawEvent<K> ──► id = tx_hash ‖ log_index
//!             ──► entity = copy(params) + provenance(meta)
//!             ──► TraceSink::record   (diagnostics only)
//!             ──► EntityStore::upsert (the single durability call)
//! ```
//!
//! The projector holds no per-event state. Each call is independent, and the
//! only way it can fail is the store write, whose error is returned as is.

use crate::error::StoreWriteError;
use crate::event::EventKind;
use crate::schema::Entity;
use crate::store::EntityStore;
use crate::trace::{TraceRecord, TraceSink, TracingSink};
use crate::types::RawEvent;

/// Maps typed events onto entities and hands them to an [`EntityStore`].
pub struct Projector<S, T = TracingSink> {
    store: S,
    trace: T,
}

impl<S: EntityStore> Projector<S> {
    /// A projector that logs through `tracing`.
    pub fn new(store: S) -> Self {
        Self::with_trace(store, TracingSink)
    }
}

impl<S: EntityStore, T: TraceSink> Projector<S, T> {
    pub fn with_trace(store: S, trace: T) -> Self {
        Self { store, trace }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Project one event of any kind.
    ///
    /// `K` is either a concrete params type (`Transfer`, `Approval`, ...) or
    /// the [`WldEvent`](crate::schema::WldEvent) enum.
    pub fn project<K: EventKind>(&self, event: RawEvent<K>) -> Result<(), StoreWriteError> {
        let RawEvent { params, meta } = event;
        let id = meta.entity_id();
        let kind = params.kind();
        let fields = params.trace_fields();
        let entity: Entity = params.into_entity(&meta).into();

        self.trace.record(&TraceRecord {
            kind,
            id: &id,
            fields: &fields,
        });
        self.store.upsert(&id, &entity)
    }
}

// ─── Tests ───────────────────────────────────────────────────────────────────
