use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use log::{error, info};

use super::backup_model::{BackupReceipt, RestoreOutcome, RestoreSummary};
use super::backup_traits::{BackupProviderTrait, BackupServiceTrait};
use crate::constants::DEFAULT_BACKUP_NAME;
use crate::errors::{BackupError, Error, Result};
use crate::events::ReplaceReason;
use crate::store::{Document, RecordStore};

pub struct BackupService {
    store: Arc<RecordStore>,
    provider: Arc<dyn BackupProviderTrait>,
    /// Store revision of the last successful backup or restore. Also
    /// serialises backup runs.
    last_synced_revision: tokio::sync::Mutex<Option<u64>>,
}

impl BackupService {
    pub fn new(store: Arc<RecordStore>, provider: Arc<dyn BackupProviderTrait>) -> Self {
        Self {
            store,
            provider,
            last_synced_revision: tokio::sync::Mutex::new(None),
        }
    }

    fn backup_name(document: &Document) -> String {
        document
            .settings
            .backup_name
            .clone()
            .unwrap_or_else(|| DEFAULT_BACKUP_NAME.to_string())
    }

    async fn upload(&self, last_synced: &mut Option<u64>) -> Result<BackupReceipt> {
        let revision = self.store.revision();
        let document = self.store.snapshot();
        let name = Self::backup_name(&document);

        if let Err(e) = self.provider.upload(&name, document.to_value()?).await {
            error!("Backup of revision {} to '{}' failed: {}", revision, name, e);
            return Err(e);
        }
        *last_synced = Some(revision);
        info!("Backed up revision {} to '{}'", revision, name);
        Ok(BackupReceipt {
            name,
            revision,
            uploaded_at: Utc::now(),
        })
    }
}

#[async_trait]
impl BackupServiceTrait for BackupService {
    async fn backup_now(&self) -> Result<BackupReceipt> {
        let mut last_synced = self.last_synced_revision.lock().await;
        self.upload(&mut last_synced).await
    }

    async fn backup_if_changed(&self) -> Result<Option<BackupReceipt>> {
        let mut last_synced = self.last_synced_revision.lock().await;
        if *last_synced == Some(self.store.revision()) {
            return Ok(None);
        }
        self.upload(&mut last_synced).await.map(Some)
    }

    async fn restore_latest(&self) -> Result<RestoreOutcome> {
        let mut last_synced = self.last_synced_revision.lock().await;
        let name = Self::backup_name(&self.store.snapshot());

        let payload = match self.provider.download_latest(&name).await {
            Ok(Some(payload)) => payload,
            Ok(None) => {
                info!("No backup named '{}' to restore", name);
                return Ok(RestoreOutcome::NotFound);
            }
            Err(e) => {
                error!("Fetching backup '{}' failed: {}", name, e);
                return Err(e);
            }
        };
        let document = Document::from_value(payload)
            .map_err(|e| Error::Backup(BackupError::InvalidPayload(e.to_string())))?;

        let summary = RestoreSummary {
            accounts: document.accounts.len(),
            trades: document.trades.len(),
            payouts: document.payouts.len(),
            goals: document.goals.len(),
        };
        self.store.replace(document, ReplaceReason::Restore).await?;
        *last_synced = Some(self.store.revision());
        info!("Restored backup '{}'", name);
        Ok(RestoreOutcome::Restored(summary))
    }

    fn is_dirty(&self) -> bool {
        match self.last_synced_revision.try_lock() {
            Ok(last_synced) => *last_synced != Some(self.store.revision()),
            Err(_) => true,
        }
    }
}
