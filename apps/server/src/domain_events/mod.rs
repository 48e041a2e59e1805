//! Domain events runtime bridge for the web server.
//!
//! The record store emits domain events into [`WebDomainEventSink`]. A queue
//! worker debounces them, forwards them to SSE clients as `data:changed` and
//! re-runs goal completion sync when a change can move goal progress.

mod planner;
mod queue_worker;
mod sink;

pub use queue_worker::QueueWorkerDeps;
pub use sink::WebDomainEventSink;
