//! Directory-backed backup provider.

mod local_provider;

pub use local_provider::{LocalBackupProvider, DEFAULT_RETENTION};
