//! Diagnostic side-channel for the projector.
//!
//! The projector emits exactly one [`TraceRecord`] per projected event. Where
//! it goes is up to the injected [`TraceSink`]: `tracing` by default, nowhere
//! with [`NoopSink`], or a recording sink in tests.

use std::sync::Arc;

use crate::entity::EntityId;
use crate::schema::EntityKind;

/// Summary of one projection, handed to the sink before the store write.
#[derive(Debug, Clone, Copy)]
pub struct TraceRecord<'a> {
    pub kind: EntityKind,
    pub id: &'a EntityId,
    pub fields: &'a [(&'static str, String)],
}

impl TraceRecord<'_> {
    /// `"k=v, k=v"` rendering of the key fields.
    pub fn summary(&self) -> String {
        self.fields
            .iter()
            .map(|(k, v)| format!("{k}={v}"))
            .collect::<Vec<_>>()
            .join(", ")
    }
}

/// Receiver of projection diagnostics. Has no effect on what gets persisted.
pub trait TraceSink: Send + Sync {
    fn record(&self, record: &TraceRecord<'_>);
}

/// Emits each record as a structured `tracing` event at INFO.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingSink;

impl TraceSink for TracingSink {
    fn record(&self, record: &TraceRecord<'_>) {
        tracing::info!(
            kind = %record.kind,
            id = %record.id,
            "Handling {}: {}",
            record.kind,
            record.summary()
        );
    }
}

/// Discards every record.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopSink;

impl TraceSink for NoopSink {
    fn record(&self, _record: &TraceRecord<'_>) {}
}

impl<T: TraceSink + ?Sized> TraceSink for &T {
    fn record(&self, record: &TraceRecord<'_>) {
        (**self).record(record)
    }
}

impl<T: TraceSink + ?Sized> TraceSink for Box<T> {
    fn record(&self, record: &TraceRecord<'_>) {
        (**self).record(record)
    }
}

impl<T: TraceSink + ?Sized> TraceSink for Arc<T> {
    fn record(&self, record: &TraceRecord<'_>) {
        (**self).record(record)
    }
}
