//! Event emitting related interface and error types

#![warn(missing_docs, missing_debug_implementations)]

use std::sync::{Arc, Mutex};

use common_enums::EventKind;
use common_utils::errors::CustomResult;
use time::OffsetDateTime;

/// One processor lifecycle notification.
#[derive(Debug, Clone, serde::Serialize)]
pub struct ProcessorEvent {
    /// What happened
    pub kind: EventKind,
    /// Which processor implementation emitted it
    pub processor: &'static str,
    /// Invoice the processor is bound to
    pub invoice_id: u64,
    /// Emission timestamp
    pub at: OffsetDateTime,
}

impl ProcessorEvent {
    /// Build an event stamped with the current time.
    pub fn new(kind: EventKind, processor: &'static str, invoice_id: u64) -> Self {
        Self {
            kind,
            processor,
            invoice_id,
            at: OffsetDateTime::now_utc(),
        }
    }
}

/// Trait defining the interface for event delivery. Listeners observe
/// the fixed [`EventKind`] set; the core never depends on listener
/// behavior for correctness.
#[async_trait::async_trait]
pub trait EventInterface: Sync + Send + dyn_clone::DynClone {
    /// Deliver one event to the sink.
    async fn emit(&self, event: &ProcessorEvent) -> CustomResult<(), EventError>;
}

dyn_clone::clone_trait_object!(EventInterface);

/// Boxed event sink as held by processors.
pub type BoxedEvents = Box<dyn EventInterface>;

/// Errors that may occur during event delivery.
#[derive(Debug, thiserror::Error)]
pub enum EventError {
    /// An error occurred when emitting an event.
    #[error("Failed to emit event")]
    EventEmissionFailed,
}

/// Sink that drops every event.
#[derive(Debug, Clone, Default)]
pub struct NoopEvents;

#[async_trait::async_trait]
impl EventInterface for NoopEvents {
    async fn emit(&self, _event: &ProcessorEvent) -> CustomResult<(), EventError> {
        Ok(())
    }
}

/// Sink that records every event in memory. Used by tests and by
/// callers that flush events after the request completes.
#[derive(Debug, Clone, Default)]
pub struct RecordingEvents {
    log: Arc<Mutex<Vec<ProcessorEvent>>>,
}

impl RecordingEvents {
    /// Event kinds seen so far, in emission order.
    pub fn kinds(&self) -> Vec<EventKind> {
        self.log
            .lock()
            .map(|events| events.iter().map(|event| event.kind).collect())
            .unwrap_or_default()
    }

    /// Snapshot of every recorded event.
    pub fn drain(&self) -> Vec<ProcessorEvent> {
        self.log
            .lock()
            .map(|mut events| events.drain(..).collect())
            .unwrap_or_default()
    }
}

#[async_trait::async_trait]
impl EventInterface for RecordingEvents {
    async fn emit(&self, event: &ProcessorEvent) -> CustomResult<(), EventError> {
        self.log
            .lock()
            .map_err(|_| error_stack::report!(EventError::EventEmissionFailed))?
            .push(event.clone());
        Ok(())
    }
}
