//! Event queue worker for processing domain events.
//!
//! Receives events from an mpsc channel, debounces them, forwards the batch
//! to the event bus and runs goal completion sync when needed.

use std::sync::Arc;
use std::time::Duration;

use propdesk_core::events::DomainEvent;
use propdesk_core::goals::GoalServiceTrait;
use tokio::sync::mpsc;

use super::planner::{plan_completion_sync, to_server_event};
use crate::events::EventBus;

/// Debounce window for collecting events before processing.
const DEBOUNCE_DURATION: Duration = Duration::from_millis(250);

pub struct QueueWorkerDeps {
    pub goal_service: Arc<dyn GoalServiceTrait>,
    pub event_bus: EventBus,
}

/// Runs until every sender is dropped, flushing the last batch on the way out.
pub async fn event_queue_worker(mut rx: mpsc::UnboundedReceiver<DomainEvent>, deps: Arc<QueueWorkerDeps>) {
    tracing::info!("Domain event queue worker started");
    let mut pending_events: Vec<DomainEvent> = Vec::new();

    loop {
        if pending_events.is_empty() {
            match rx.recv().await {
                Some(e) => pending_events.push(e),
                None => break,
            }
            continue;
        }

        tokio::select! {
            event = rx.recv() => match event {
                Some(e) => pending_events.push(e),
                None => {
                    process_event_batch(&pending_events, &deps).await;
                    break;
                }
            },
            _ = tokio::time::sleep(DEBOUNCE_DURATION) => {
                let batch = std::mem::take(&mut pending_events);
                process_event_batch(&batch, &deps).await;
            }
        }
    }

    tracing::info!("Domain event queue worker shutting down");
}

/// Forwards `events` to clients, then syncs goal completions if needed.
///
/// Completion events produced by the sync come back through the sink and
/// are forwarded with the next batch.
pub async fn process_event_batch(events: &[DomainEvent], deps: &QueueWorkerDeps) {
    tracing::debug!("Processing batch of {} domain event(s)", events.len());

    for event in events {
        deps.event_bus.publish(to_server_event(event));
    }

    if plan_completion_sync(events) {
        match deps.goal_service.sync_completions().await {
            Ok(completed) if !completed.is_empty() => {
                tracing::info!("{} goal(s) completed", completed.len());
            }
            Ok(_) => {}
            Err(e) => tracing::warn!("Goal completion sync failed: {}", e),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::events::{DATA_CHANGED, GOAL_COMPLETED};
    use propdesk_core::goals::GoalService;
    use propdesk_core::store::{InMemoryDocumentRepository, RecordStore};

    #[tokio::test]
    async fn test_batch_is_forwarded_to_the_bus() {
        let store = Arc::new(RecordStore::open(Arc::new(InMemoryDocumentRepository::new())).unwrap());
        let bus = EventBus::new(16);
        let mut rx = bus.subscribe();
        let deps = QueueWorkerDeps {
            goal_service: Arc::new(GoalService::new(store)),
            event_bus: bus.clone(),
        };

        process_event_batch(
            &[
                DomainEvent::accounts_changed(vec!["a1".into()]),
                DomainEvent::goal_completed("g1".into(), "Pass".into()),
            ],
            &deps,
        )
        .await;

        assert_eq!(rx.recv().await.unwrap().name, DATA_CHANGED);
        assert_eq!(rx.recv().await.unwrap().name, GOAL_COMPLETED);
    }

    #[tokio::test]
    async fn test_worker_drains_on_close() {
        let store = Arc::new(RecordStore::open(Arc::new(InMemoryDocumentRepository::new())).unwrap());
        let bus = EventBus::new(16);
        let mut bus_rx = bus.subscribe();
        let deps = Arc::new(QueueWorkerDeps {
            goal_service: Arc::new(GoalService::new(store)),
            event_bus: bus,
        });

        let (tx, rx) = mpsc::unbounded_channel();
        let worker = tokio::spawn(event_queue_worker(rx, deps));

        tx.send(DomainEvent::firms_changed(vec!["f1".into()])).unwrap();
        drop(tx);
        worker.await.unwrap();

        assert_eq!(bus_rx.recv().await.unwrap().name, DATA_CHANGED);
    }
}
