//! Propdesk Core - Domain entities, services, and traits.
//!
//! This crate contains the core business logic for Propdesk: the record
//! store, funding reconciliation, the payout split engine, the metric
//! calculator and the goal progress engine. It is storage-agnostic and
//! defines traits that are implemented by the `storage-sqlite` crate.

pub mod accounts;
pub mod backup;
pub mod constants;
pub mod errors;
pub mod events;
pub mod firms;
pub mod funding;
pub mod goals;
pub mod metrics;
pub mod payouts;
pub mod settings;
pub mod store;
pub mod tags;
pub mod trades;
pub mod utils;

#[cfg(test)]
mod test_fixtures;

// Re-export error types
pub use errors::Error;
pub use errors::Result;
