//! Domain event sink trait and implementations.

use std::sync::{Arc, Mutex};

use super::DomainEvent;

/// Receiver for budget and expense domain events.
///
/// Services emit through this trait only after a mutation has committed.
/// Implementations forward events to whatever reacts to them, such as alert
/// fan-out.
///
/// # Design Rules
///
/// - `emit()` returns quickly: no network calls and no database writes
/// - Slow work is queued and processed off the caller's task
/// - A failed emit never fails or rolls back the originating operation
pub trait DomainEventSink: Send + Sync {
    /// Emit a single domain event.
    fn emit(&self, event: DomainEvent);

    /// Emit several domain events in order.
    ///
    /// The default forwards each event to `emit()`. Sinks that can deliver
    /// a batch in one go may override it.
    fn emit_batch(&self, events: Vec<DomainEvent>) {
        for event in events {
            self.emit(event);
        }
    }
}

/// No-op sink for tests and callers that don't consume events.
#[derive(Clone, Default)]
pub struct NoOpDomainEventSink;

impl DomainEventSink for NoOpDomainEventSink {
    fn emit(&self, _event: DomainEvent) {
        // Events are dropped
    }
}

/// Mock sink for tests. Records every emitted event in memory.
#[derive(Clone, Default)]
pub struct MockDomainEventSink {
    events: Arc<Mutex<Vec<DomainEvent>>>,
}

impl MockDomainEventSink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns a copy of the recorded events, oldest first.
    pub fn events(&self) -> Vec<DomainEvent> {
        self.events.lock().unwrap().clone()
    }

    /// Forgets every recorded event.
    pub fn clear(&self) {
        self.events.lock().unwrap().clear();
    }

    /// Returns how many events have been recorded.
    pub fn len(&self) -> usize {
        self.events.lock().unwrap().len()
    }

    /// Returns true if nothing has been recorded yet.
    pub fn is_empty(&self) -> bool {
        self.events.lock().unwrap().is_empty()
    }
}

impl DomainEventSink for MockDomainEventSink {
    fn emit(&self, event: DomainEvent) {
        self.events.lock().unwrap().push(event);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_noop_sink_does_not_panic() {
        let sink = NoOpDomainEventSink;
        sink.emit(DomainEvent::budgets_changed(vec!["b1".to_string()]));
        sink.emit_batch(vec![
            DomainEvent::budgets_changed(vec!["b2".to_string()]),
            DomainEvent::expenses_changed(vec!["e1".to_string()], vec![]),
        ]);
    }

    #[test]
    fn test_mock_sink_collects_events() {
        let sink = MockDomainEventSink::new();
        assert!(sink.is_empty());

        sink.emit(DomainEvent::budgets_changed(vec!["b1".to_string()]));
        sink.emit_batch(vec![
            DomainEvent::expenses_changed(vec!["e1".to_string()], vec![]),
            DomainEvent::expenses_changed(vec!["e2".to_string()], vec![]),
        ]);
        assert_eq!(sink.len(), 3);

        sink.clear();
        assert!(sink.is_empty());
    }
}
