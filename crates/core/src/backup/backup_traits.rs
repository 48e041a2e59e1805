//! Backup collaborator contract and service trait.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use serde_json::Value;

use super::backup_model::{BackupReceipt, RestoreOutcome};
use crate::errors::{BackupError, Error, Result};

/// Remote storage for whole-document backups.
///
/// Implementations report transport failures as [`BackupError::Transport`].
#[async_trait]
pub trait BackupProviderTrait: Send + Sync {
    async fn upload(&self, name: &str, payload: Value) -> Result<()>;

    /// Latest payload stored under `name`, `None` when there is none.
    async fn download_latest(&self, name: &str) -> Result<Option<Value>>;
}

#[async_trait]
pub trait BackupServiceTrait: Send + Sync {
    /// Uploads the current document.
    async fn backup_now(&self) -> Result<BackupReceipt>;

    /// Uploads only when the document changed since the last backup.
    async fn backup_if_changed(&self) -> Result<Option<BackupReceipt>>;

    /// Replaces the local document with the latest backup. The local
    /// document is untouched unless the fetch and parse both succeed.
    async fn restore_latest(&self) -> Result<RestoreOutcome>;

    /// Whether the document changed since the last backup or restore.
    fn is_dirty(&self) -> bool;
}

/// In-memory provider for tests. Can be switched into a failing mode.
#[derive(Clone, Default)]
pub struct MockBackupProvider {
    payloads: Arc<Mutex<HashMap<String, Value>>>,
    failing: Arc<AtomicBool>,
    uploads: Arc<AtomicUsize>,
}

impl MockBackupProvider {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_failing(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }

    pub fn upload_count(&self) -> usize {
        self.uploads.load(Ordering::SeqCst)
    }

    pub fn put(&self, name: &str, payload: Value) {
        self.payloads
            .lock()
            .unwrap()
            .insert(name.to_string(), payload);
    }

    pub fn get(&self, name: &str) -> Option<Value> {
        self.payloads.lock().unwrap().get(name).cloned()
    }

    fn check(&self) -> Result<()> {
        if self.failing.load(Ordering::SeqCst) {
            return Err(Error::Backup(BackupError::Transport(
                "backup provider unavailable".to_string(),
            )));
        }
        Ok(())
    }
}

#[async_trait]
impl BackupProviderTrait for MockBackupProvider {
    async fn upload(&self, name: &str, payload: Value) -> Result<()> {
        self.check()?;
        self.put(name, payload);
        self.uploads.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }

    async fn download_latest(&self, name: &str) -> Result<Option<Value>> {
        self.check()?;
        Ok(self.get(name))
    }
}
