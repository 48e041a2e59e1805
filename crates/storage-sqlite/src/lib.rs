//! SQLite storage implementation for propdesk.
//!
//! This crate is the only place Diesel appears. It implements the persistence
//! traits of `propdesk-core`:
//! - connection pooling, pragmas and embedded migrations (`db`)
//! - the single-writer actor all writes go through
//! - [`DocumentRepository`], which stores the whole document as one JSON row
//! - [`LocalBackupProvider`], a directory of timestamped JSON backups
//!
//! ```text
//!   propdesk-core (RecordStore, BackupService)
//!            │ traits
//!            ▼
//!   storage-sqlite (this crate) ──► SQLite DB / backup dir
//! ```

pub mod backup;
pub mod db;
pub mod documents;
pub mod errors;
pub mod schema;

pub use backup::LocalBackupProvider;
pub use db::{create_pool, get_connection, init, run_migrations, spawn_writer, DbConnection, DbPool, WriteHandle};
pub use documents::DocumentRepository;
pub use errors::{IntoCore, StorageError};

pub use propdesk_core::errors::{DatabaseError, Error, Result};
