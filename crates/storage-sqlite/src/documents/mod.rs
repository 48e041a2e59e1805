//! SQLite storage for the propdesk document.

mod model;
mod repository;

pub use model::DocumentDB;
pub use repository::{DocumentRepository, DEFAULT_DOCUMENT_KEY};
