//! Decides what a batch of domain events triggers.

use propdesk_core::events::DomainEvent;
use serde_json::json;

use crate::events::{ServerEvent, DATA_CHANGED, GOAL_COMPLETED};

/// Whether any event in the batch can change goal progress.
pub fn plan_completion_sync(events: &[DomainEvent]) -> bool {
    events.iter().any(DomainEvent::affects_goal_progress)
}

/// Client-facing event for one domain event.
pub fn to_server_event(event: &DomainEvent) -> ServerEvent {
    match event {
        DomainEvent::GoalCompleted { goal_id, title } => ServerEvent::with_payload(
            GOAL_COMPLETED,
            json!({ "goalId": goal_id, "title": title }),
        ),
        other => match serde_json::to_value(other) {
            Ok(payload) => ServerEvent::with_payload(DATA_CHANGED, payload),
            Err(_) => ServerEvent::new(DATA_CHANGED),
        },
    }
}
