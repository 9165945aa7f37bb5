//! Shared types for the projection pipeline.

use alloy_primitives::B256;
use serde::{Deserialize, Serialize};

use crate::entity::EntityId;

// ─── EventMeta ───────────────────────────────────────────────────────────────

/// Provenance of one emitted log, as delivered by the event source.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EventMeta {
    /// Hash of the transaction that emitted the log.
    pub transaction_hash: B256,
    /// Index of the log within its transaction.
    pub log_index: u32,
    /// Block number.
    pub block_number: u64,
    /// Unix timestamp of the block (seconds since epoch).
    pub block_timestamp: u64,
}

impl EventMeta {
    /// The primary key of the entity projected from this log.
    pub fn entity_id(&self) -> EntityId {
        EntityId::new(&self.transaction_hash, self.log_index)
    }
}

// ─── RawEvent ────────────────────────────────────────────────────────────────

/// One typed event: its decoded parameters plus where it came from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawEvent<P> {
    pub params: P,
    pub meta: EventMeta,
}

impl<P> RawEvent<P> {
    pub fn new(params: P, meta: EventMeta) -> Self {
        Self { params, meta }
    }
}

// ─── EventFilter ─────────────────────────────────────────────────────────────

/// Which contract addresses the host projects events for.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventFilter {
    /// Only project logs from these contract addresses (empty = all addresses).
    #[serde(default)]
    pub addresses: Vec<String>,
}

impl EventFilter {
    /// Create a filter for a single contract address.
    pub fn address(addr: impl Into<String>) -> Self {
        Self {
            addresses: vec![addr.into()],
        }
    }

    /// Returns `true` if `address` matches this filter.
    pub fn matches_address(&self, address: &str) -> bool {
        self.addresses.is_empty()
            || self.addresses.iter().any(|a| a.eq_ignore_ascii_case(address))
    }
}

// ─── Tests ───────────────────────────────────────────────────────────────────
