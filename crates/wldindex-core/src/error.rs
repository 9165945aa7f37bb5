//! Error types for the projection pipeline.

use thiserror::Error;

use crate::entity::EntityId;
use crate::schema::EntityKind;

/// The single failure mode of a projection: the durability call did not complete.
///
/// The projector never recovers from this locally. It is returned unchanged
/// to whoever invoked `project`, and the entity is either fully written or
/// not written at all.
#[derive(Debug, Error)]
pub enum StoreWriteError {
    #[error("Store unavailable: {0}")]
    Unavailable(String),

    #[error("Store rejected {kind} entity: {reason}")]
    Schema { kind: EntityKind, reason: String },

    #[error("Failed to encode entity {id}: {reason}")]
    Encode { id: EntityId, reason: String },
}

/// Errors raised while turning a decoder's output into a typed event.
#[derive(Debug, Error)]
pub enum DecodeError {
    #[error("Unknown event schema '{schema}'")]
    UnknownSchema { schema: String },

    #[error("Invalid transaction hash '{value}': {reason}")]
    InvalidTxHash { value: String, reason: String },

    #[error("Invalid fields for '{schema}': {source}")]
    Fields {
        schema: String,
        #[source]
        source: serde_json::Error,
    },
}

/// Errors surfaced by event handlers to the hosting loop.
#[derive(Debug, Error)]
pub enum IndexerError {
    #[error(transparent)]
    Decode(#[from] DecodeError),

    #[error(transparent)]
    Store(#[from] StoreWriteError),
}

impl IndexerError {
    /// Returns `true` if the event itself could not be understood, as opposed
    /// to the store failing to persist a well-formed entity.
    pub fn is_decode(&self) -> bool {
        matches!(self, Self::Decode(_))
    }
}
