//! Web domain event sink implementation.

use std::sync::{Arc, Mutex, PoisonError};

use propdesk_core::events::{DomainEvent, DomainEventSink};
use tokio::sync::mpsc;

use super::queue_worker::{event_queue_worker, QueueWorkerDeps};

/// Forwards domain events to the background queue worker.
///
/// Two-phase: the sink is subscribed to the store first, then
/// [`start_worker`](Self::start_worker) runs once the goal service exists.
/// Events emitted in between are buffered in the channel.
pub struct WebDomainEventSink {
    tx: mpsc::UnboundedSender<DomainEvent>,
    rx: Mutex<Option<mpsc::UnboundedReceiver<DomainEvent>>>,
}

impl WebDomainEventSink {
    pub fn new() -> Self {
        let (tx, rx) = mpsc::unbounded_channel();
        Self {
            tx,
            rx: Mutex::new(Some(rx)),
        }
    }

    /// Spawns the worker. Returns false when it was already started.
    pub fn start_worker(&self, deps: QueueWorkerDeps) -> bool {
        let taken = self
            .rx
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .take();
        match taken {
            Some(rx) => {
                tokio::spawn(event_queue_worker(rx, Arc::new(deps)));
                true
            }
            None => {
                tracing::warn!("Domain event worker already started");
                false
            }
        }
    }

    #[cfg(test)]
    pub fn with_sender(tx: mpsc::UnboundedSender<DomainEvent>) -> Self {
        Self {
            tx,
            rx: Mutex::new(None),
        }
    }
}

impl Default for WebDomainEventSink {
    fn default() -> Self {
        Self::new()
    }
}

impl DomainEventSink for WebDomainEventSink {
    fn emit(&self, event: DomainEvent) {
        if let Err(e) = self.tx.send(event) {
            tracing::warn!("Failed to emit domain event: {}", e);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sink_sends_events_in_order() {
        let (tx, mut rx) = mpsc::unbounded_channel();
        let sink = WebDomainEventSink::with_sender(tx);

        sink.emit_batch(vec![
            DomainEvent::trades_changed(vec!["t1".into()], vec!["a1".into()]),
            DomainEvent::accounts_changed(vec!["a1".into()]),
        ]);

        assert!(matches!(rx.try_recv().unwrap(), DomainEvent::TradesChanged { .. }));
        assert!(matches!(rx.try_recv().unwrap(), DomainEvent::AccountsChanged { .. }));
    }
}
