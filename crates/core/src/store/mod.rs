//! Store module - the persisted document and the record store that owns it.

mod document;
mod record_store;
mod store_traits;

#[cfg(test)]
mod record_store_tests;

pub use document::Document;
pub use record_store::{Change, Mutation, RecordStore, SubscriptionId};
pub use store_traits::{DocumentRepositoryTrait, InMemoryDocumentRepository};
