//! Domain events module.
//!
//! Provides domain event types and the sink trait for emitting events
//! after successful record store mutations. Runtime adapters (the web
//! server) implement the sink to forward "data changed" signals to views.

mod domain_event;
mod sink;

pub use domain_event::*;
pub use sink::*;
