//! Backup module - whole-document upload and atomic restore through an
//! opaque provider.

mod backup_model;
mod backup_service;
mod backup_traits;


pub use backup_model::{BackupReceipt, RestoreOutcome, RestoreSummary};
pub use backup_service::BackupService;
pub use backup_traits::{BackupProviderTrait, BackupServiceTrait, MockBackupProvider};
