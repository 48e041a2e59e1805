use std::fs;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use chrono::Utc;
use log::{debug, info, warn};
use propdesk_core::backup::BackupProviderTrait;
use propdesk_core::errors::{BackupError, Error, Result};
use serde_json::Value;

/// Number of backups kept per name.
pub const DEFAULT_RETENTION: usize = 20;

/// Writes each backup as `<stem>_<timestamp>.json` in one directory.
///
/// Timestamps sort lexically, so the newest file for a name is the latest
/// backup. Older files beyond the retention count are pruned after upload.
#[derive(Debug, Clone)]
pub struct LocalBackupProvider {
    dir: PathBuf,
    retention: usize,
}

impl LocalBackupProvider {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self {
            dir: dir.into(),
            retention: DEFAULT_RETENTION,
        }
    }

    pub fn with_retention(mut self, retention: usize) -> Self {
        self.retention = retention.max(1);
        self
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Backup files for `name`, oldest first.
    pub fn list(&self, name: &str) -> Result<Vec<PathBuf>> {
        list_backups(&self.dir, name)
    }
}

fn transport(err: impl std::fmt::Display) -> Error {
    Error::Backup(BackupError::Transport(err.to_string()))
}

fn stem(name: &str) -> &str {
    name.strip_suffix(".json").unwrap_or(name)
}

fn list_backups(dir: &Path, name: &str) -> Result<Vec<PathBuf>> {
    if !dir.exists() {
        return Ok(Vec::new());
    }
    let prefix = format!("{}_", stem(name));
    let mut files: Vec<PathBuf> = fs::read_dir(dir)
        .map_err(transport)?
        .filter_map(|entry| entry.ok().map(|e| e.path()))
        .filter(|path| {
            path.file_name()
                .and_then(|f| f.to_str())
                .is_some_and(|f| f.starts_with(&prefix) && f.ends_with(".json"))
        })
        .collect();
    files.sort();
    Ok(files)
}

fn write_backup(dir: &Path, name: &str, payload: &Value, retention: usize) -> Result<PathBuf> {
    fs::create_dir_all(dir).map_err(transport)?;
    let file_name = format!(
        "{}_{}.json",
        stem(name),
        Utc::now().format("%Y%m%dT%H%M%S%.6fZ")
    );
    let path = dir.join(file_name);
    let tmp = path.with_extension("json.tmp");

    let bytes = serde_json::to_vec_pretty(payload).map_err(transport)?;
    fs::write(&tmp, bytes).map_err(transport)?;
    fs::rename(&tmp, &path).map_err(transport)?;

    let files = list_backups(dir, name)?;
    let excess = files.len().saturating_sub(retention);
    for old in &files[..excess] {
        if let Err(e) = fs::remove_file(old) {
            warn!("Could not prune backup {}: {}", old.display(), e);
        }
    }
    Ok(path)
}

fn read_latest(dir: &Path, name: &str) -> Result<Option<Value>> {
    let Some(latest) = list_backups(dir, name)?.pop() else {
        return Ok(None);
    };
    debug!("Reading backup {}", latest.display());
    let bytes = fs::read(&latest).map_err(transport)?;
    let value = serde_json::from_slice(&bytes)
        .map_err(|e| Error::Backup(BackupError::InvalidPayload(e.to_string())))?;
    Ok(Some(value))
}

#[async_trait]
impl BackupProviderTrait for LocalBackupProvider {
    async fn upload(&self, name: &str, payload: Value) -> Result<()> {
        let dir = self.dir.clone();
        let name = name.to_string();
        let retention = self.retention;
        let path = tokio::task::spawn_blocking(move || write_backup(&dir, &name, &payload, retention))
            .await
            .map_err(transport)??;
        info!("Backup written to {}", path.display());
        Ok(())
    }

    async fn download_latest(&self, name: &str) -> Result<Option<Value>> {
        let dir = self.dir.clone();
        let name = name.to_string();
        tokio::task::spawn_blocking(move || read_latest(&dir, &name))
            .await
            .map_err(transport)?
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use tempfile::tempdir;

    #[tokio::test]
    async fn test_download_from_empty_dir_is_none() {
        let dir = tempdir().unwrap();
        let provider = LocalBackupProvider::new(dir.path().join("missing"));
        assert!(provider
            .download_latest("propdesk-data.json")
            .await
            .unwrap()
            .is_none());
    }

    #[tokio::test]
    async fn test_latest_upload_wins() {
        let dir = tempdir().unwrap();
        let provider = LocalBackupProvider::new(dir.path());

        provider
            .upload("propdesk-data.json", json!({"n": 1}))
            .await
            .unwrap();
        provider
            .upload("propdesk-data.json", json!({"n": 2}))
            .await
            .unwrap();

        let latest = provider.download_latest("propdesk-data.json").await.unwrap();
        assert_eq!(latest, Some(json!({"n": 2})));
        assert_eq!(provider.list("propdesk-data.json").unwrap().len(), 2);
    }

    #[tokio::test]
    async fn test_names_do_not_mix() {
        let dir = tempdir().unwrap();
        let provider = LocalBackupProvider::new(dir.path());
        provider.upload("a.json", json!({"from": "a"})).await.unwrap();

        assert!(provider.download_latest("b.json").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_retention_prunes_oldest() {
        let dir = tempdir().unwrap();
        let provider = LocalBackupProvider::new(dir.path()).with_retention(2);
        for n in 0..4 {
            provider.upload("data.json", json!({ "n": n })).await.unwrap();
        }

        assert_eq!(provider.list("data.json").unwrap().len(), 2);
        assert_eq!(
            provider.download_latest("data.json").await.unwrap(),
            Some(json!({"n": 3}))
        );
    }

    #[tokio::test]
    async fn test_corrupt_latest_is_invalid_payload() {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join("data_20990101T000000.000000Z.json"), b"{not json").unwrap();
        let provider = LocalBackupProvider::new(dir.path());

        let err = provider.download_latest("data.json").await.unwrap_err();
        assert!(matches!(err, Error::Backup(BackupError::InvalidPayload(_))));
    }
}
