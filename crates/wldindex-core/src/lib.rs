//! wldindex-core — typed events, identity, and the entity projector for the
//! WLD token indexer.
//!
//! # Architecture
//!
//! ```text
//! DecodedEvent ─► HandlerRegistry ─► ProjectionHandler
//!                                        └── Projector
//!                                              ├── id = tx_hash ‖ log_index
//!                                              ├── schema   (event → entity mapping)
//!                                              ├── TraceSink (diagnostics)
//!                                              └── EntityStore (memory / SQLite)
//! ```

pub mod decode;
pub mod entity;
pub mod error;
pub mod event;
pub mod handler;
pub mod indexer;
pub mod projector;
pub mod schema;
pub mod serde_uint;
pub mod store;
pub mod trace;
pub mod types;

pub use decode::DecodedEvent;
pub use entity::EntityId;
pub use error::{DecodeError, IndexerError, StoreWriteError};
pub use event::EventKind;
pub use handler::{EventHandler, HandlerRegistry, ProjectionHandler};
pub use indexer::{ErrorPolicy, IndexerConfig, LogConfig, StorageConfig};
pub use projector::Projector;
pub use schema::{Entity, EntityKind, WldEvent};
pub use store::EntityStore;
pub use trace::{NoopSink, TraceRecord, TraceSink, TracingSink};
pub use types::{EventFilter, EventMeta, RawEvent};

pub use alloy_primitives::{Address, B256, U256};
