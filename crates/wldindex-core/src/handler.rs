//! Event handler trait, registry, and the projecting handler.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;

use crate::decode::DecodedEvent;
use crate::error::IndexerError;
use crate::projector::Projector;
use crate::schema::{EntityKind, WldEvent};
use crate::store::EntityStore;
use crate::trace::{TraceSink, TracingSink};
use crate::types::{EventFilter, RawEvent};

/// Trait for host-side event handlers.
///
/// Implement this to process specific event schemas as they are delivered.
#[async_trait]
pub trait EventHandler: Send + Sync {
    /// Called once for each delivered event whose schema this handler claims.
    async fn handle(&self, event: &DecodedEvent) -> Result<(), IndexerError>;

    /// The event schema names this handler processes (e.g. `"Transfer"`).
    fn schemas(&self) -> Vec<String>;
}

/// Registry of event handlers keyed by schema name.
pub struct HandlerRegistry {
    event_handlers: HashMap<String, Vec<Arc<dyn EventHandler>>>,
}

impl HandlerRegistry {
    pub fn new() -> Self {
        Self {
            event_handlers: HashMap::new(),
        }
    }

    /// Register a handler under every schema it claims.
    pub fn on_event(&mut self, handler: Arc<dyn EventHandler>) {
        for schema in handler.schemas() {
            self.event_handlers
                .entry(schema)
                .or_default()
                .push(handler.clone());
        }
    }

    /// Returns `true` if at least one handler claims `schema`.
    pub fn handles(&self, schema: &str) -> bool {
        self.event_handlers.contains_key(schema)
    }

    /// Dispatch an event to all matching handlers, in registration order.
    ///
    /// Events nobody claims are ignored. The first handler error stops the
    /// dispatch and is returned to the caller.
    pub async fn dispatch_event(&self, event: &DecodedEvent) -> Result<(), IndexerError> {
        if let Some(handlers) = self.event_handlers.get(&event.schema) {
            for handler in handlers {
                handler.handle(event).await?;
            }
        }
        Ok(())
    }
}

impl Default for HandlerRegistry {
    fn default() -> Self {
        Self::new()
    }
}

/// Decodes every WLD event kind and projects it into the store.
///
/// Projection runs synchronously inside `handle`: nothing is awaited between
/// computing the entity id and the store write.
pub struct ProjectionHandler<S, T = TracingSink> {
    projector: Projector<S, T>,
    filter: EventFilter,
}

impl<S: EntityStore, T: TraceSink> ProjectionHandler<S, T> {
    pub fn new(projector: Projector<S, T>, filter: EventFilter) -> Self {
        Self { projector, filter }
    }

    pub fn projector(&self) -> &Projector<S, T> {
        &self.projector
    }
}

#[async_trait]
impl<S: EntityStore, T: TraceSink> EventHandler for ProjectionHandler<S, T> {
    async fn handle(&self, event: &DecodedEvent) -> Result<(), IndexerError> {
        if !self.filter.matches_address(&event.address) {
            tracing::debug!(
                address = %event.address,
                schema = %event.schema,
                "event from unwatched contract ignored"
            );
            return Ok(());
        }
        let raw = RawEvent::<WldEvent>::try_from(event)?;
        self.projector.project(raw)?;
        Ok(())
    }

    fn schemas(&self) -> Vec<String> {
        EntityKind::ALL.iter().map(|k| k.as_str().to_string()).collect()
    }
}
