//! Adapter from a generic decoder's output to typed events.

use alloy_primitives::B256;
use serde::{Deserialize, Serialize};

use crate::error::DecodeError;
use crate::schema::WldEvent;
use crate::types::{EventMeta, RawEvent};

/// A decoded log as handed over by the event source.
///
/// Parameters arrive as a JSON object keyed by their ABI names
/// (`"previousOwner"`, `"newAmounts"`, ...).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DecodedEvent {
    /// The event name (e.g. `"Transfer"`).
    pub schema: String,
    /// Contract address that emitted the event.
    #[serde(default)]
    pub address: String,
    /// Transaction hash (`0x…`, 32 bytes).
    pub tx_hash: String,
    pub block_number: u64,
    /// Unix timestamp of the block (seconds since epoch).
    pub block_timestamp: u64,
    /// Log index within the transaction.
    pub log_index: u32,
    #[serde(default)]
    pub fields: serde_json::Value,
}

impl TryFrom<&DecodedEvent> for RawEvent<WldEvent> {
    type Error = DecodeError;

    fn try_from(event: &DecodedEvent) -> Result<Self, Self::Error> {
        let transaction_hash = event
            .tx_hash
            .parse::<B256>()
            .map_err(|e| DecodeError::InvalidTxHash {
                value: event.tx_hash.clone(),
                reason: e.to_string(),
            })?;

        let params = WldEvent::from_fields(&event.schema, event.fields.clone())?;

        Ok(RawEvent::new(
            params,
            EventMeta {
                transaction_hash,
                log_index: event.log_index,
                block_number: event.block_number,
                block_timestamp: event.block_timestamp,
            },
        ))
    }
}
