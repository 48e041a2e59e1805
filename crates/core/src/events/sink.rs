//! Where the record store delivers its change events.

use std::sync::{Arc, Mutex};

use super::DomainEvent;

/// Subscriber to record store changes.
///
/// The store calls `emit` after a mutation has been persisted, while still
/// holding its write lock, so implementations only enqueue. A subscriber
/// that drops events does not roll back the mutation.
pub trait DomainEventSink: Send + Sync {
    fn emit(&self, event: DomainEvent);

    /// Delivers the events of one mutation in order.
    fn emit_batch(&self, events: Vec<DomainEvent>) {
        for event in events {
            self.emit(event);
        }
    }
}

/// Records every event it receives. Used by tests across the workspace.
#[derive(Clone, Default)]
pub struct MockDomainEventSink {
    events: Arc<Mutex<Vec<DomainEvent>>>,
}

impl MockDomainEventSink {
    pub fn new() -> Self {
        Self {
            events: Arc::new(Mutex::new(Vec::new())),
        }
    }

    pub fn events(&self) -> Vec<DomainEvent> {
        self.events.lock().unwrap().clone()
    }

    pub fn clear(&self) {
        self.events.lock().unwrap().clear();
    }

    pub fn len(&self) -> usize {
        self.events.lock().unwrap().len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.lock().unwrap().is_empty()
    }

    /// Number of `GoalCompleted` events seen for the goal.
    pub fn completions_for(&self, goal_id: &str) -> usize {
        self.events
            .lock()
            .unwrap()
            .iter()
            .filter(|e| matches!(e, DomainEvent::GoalCompleted { goal_id: id, .. } if id == goal_id))
            .count()
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
    fn test_mock_sink_collects_events() {
        let sink = MockDomainEventSink::new();
        assert!(sink.is_empty());

        sink.emit(DomainEvent::accounts_changed(vec!["a".to_string()]));
        assert_eq!(sink.len(), 1);

        sink.emit_batch(vec![
            DomainEvent::goal_completed("g1".to_string(), "First".to_string()),
            DomainEvent::goal_completed("g2".to_string(), "Second".to_string()),
        ]);
        assert_eq!(sink.len(), 3);
        assert_eq!(sink.completions_for("g1"), 1);

        sink.clear();
        assert!(sink.is_empty());
    }
}
