//! Entity identity.
//!
//! Every projected entity is keyed by the transaction that emitted its source
//! log plus the log's index, so two distinct logs can never share a key:
//!
//! ```text
//! id = tx_hash (32 bytes) || log_index as big-endian u32 (4 bytes)
//! ```

use alloy_primitives::{FixedBytes, B256};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Byte length of an [`EntityId`].
pub const ENTITY_ID_LEN: usize = 36;

/// Deterministic primary key of a projected entity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EntityId(FixedBytes<ENTITY_ID_LEN>);

impl EntityId {
    /// Concatenate the transaction hash with the 4-byte big-endian log index.
    pub fn new(tx_hash: &B256, log_index: u32) -> Self {
        let mut out = [0u8; ENTITY_ID_LEN];
        out[..32].copy_from_slice(tx_hash.as_slice());
        out[32..].copy_from_slice(&log_index.to_be_bytes());
        Self(FixedBytes(out))
    }

    pub fn as_bytes(&self) -> &[u8] {
        self.0.as_slice()
    }

    /// The transaction hash half of the key.
    pub fn tx_hash(&self) -> B256 {
        B256::from_slice(&self.0[..32])
    }

    /// The log index half of the key.
    pub fn log_index(&self) -> u32 {
        let mut idx = [0u8; 4];
        idx.copy_from_slice(&self.0[32..]);
        u32::from_be_bytes(idx)
    }
}

impl fmt::Display for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "0x{}", hex::encode(self.as_bytes()))
    }
}
