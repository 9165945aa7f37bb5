//! The contract every event kind fulfils on its way to becoming an entity.

use alloy_primitives::{Address, U256};

use crate::schema::{Entity, EntityKind};
use crate::types::EventMeta;

/// A typed event that maps onto exactly one entity variant.
///
/// Implemented for each per-kind params struct and for the closed
/// [`WldEvent`](crate::schema::WldEvent) enum.
pub trait EventKind {
    /// The entity this event projects into.
    type Entity: Into<Entity>;

    fn kind(&self) -> EntityKind;

    /// Copy the declared parameters into a new entity keyed by
    /// `meta.entity_id()`, with provenance taken verbatim from `meta`.
    fn into_entity(self, meta: &EventMeta) -> Self::Entity;

    /// The identifying fields worth a diagnostic line, in declaration order.
    fn trace_fields(&self) -> Vec<(&'static str, String)>;
}

/// Rendering of a parameter for diagnostic output.
pub trait TraceValue {
    fn trace_value(&self) -> String;
}

impl TraceValue for Address {
    fn trace_value(&self) -> String {
        format!("{self:#x}")
    }
}

impl TraceValue for U256 {
    fn trace_value(&self) -> String {
        self.to_string()
    }
}

impl TraceValue for String {
    fn trace_value(&self) -> String {
        self.clone()
    }
}

impl<T: TraceValue> TraceValue for Vec<T> {
    fn trace_value(&self) -> String {
        self.iter()
            .map(TraceValue::trace_value)
            .collect::<Vec<_>>()
            .join(", ")
    }
}
