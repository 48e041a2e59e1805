//! User preferences stored in the document's `settings` object.

use serde::{Deserialize, Serialize};

use crate::constants::{DEFAULT_AUTO_BACKUP_INTERVAL_MINUTES, DEFAULT_PAYOUT_METHODS};
use crate::errors::{Error, Result, ValidationError};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct AutoBackupSettings {
    #[serde(default)]
    pub enabled: bool,
    #[serde(default = "default_interval_minutes")]
    pub interval_minutes: u32,
}

fn default_interval_minutes() -> u32 {
    DEFAULT_AUTO_BACKUP_INTERVAL_MINUTES
}

impl Default for AutoBackupSettings {
    fn default() -> Self {
        Self {
            enabled: false,
            interval_minutes: DEFAULT_AUTO_BACKUP_INTERVAL_MINUTES,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(rename_all = "camelCase")]
pub struct Settings {
    /// Payout methods offered when requesting a payout.
    #[serde(default)]
    pub methods: Vec<String>,
    #[serde(default)]
    pub auto_backup: AutoBackupSettings,
    /// Name the backup is stored under; the default name when unset.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub backup_name: Option<String>,
}

impl Settings {
    /// Settings of a brand-new document.
    pub fn seed() -> Self {
        Self {
            methods: DEFAULT_PAYOUT_METHODS.iter().map(|m| m.to_string()).collect(),
            ..Self::default()
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct SettingsUpdate {
    pub methods: Option<Vec<String>>,
    pub auto_backup: Option<AutoBackupSettings>,
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        with = "crate::utils::double_option"
    )]
    pub backup_name: Option<Option<String>>,
}

impl SettingsUpdate {
    pub fn validate(&self) -> Result<()> {
        if let Some(methods) = &self.methods {
            if methods.iter().any(|m| m.trim().is_empty()) {
                return Err(Error::Validation(ValidationError::InvalidInput(
                    "Payout method names cannot be empty".to_string(),
                )));
            }
        }
        if let Some(auto_backup) = &self.auto_backup {
            if auto_backup.interval_minutes == 0 {
                return Err(Error::Validation(ValidationError::InvalidInput(
                    "Auto-backup interval must be at least one minute".to_string(),
                )));
            }
        }
        if let Some(Some(name)) = &self.backup_name {
            if name.trim().is_empty() {
                return Err(Error::Validation(ValidationError::InvalidInput(
                    "Backup name cannot be empty".to_string(),
                )));
            }
        }
        Ok(())
    }

    /// Applies the update, returning whether anything changed.
    pub fn apply_to(self, settings: &mut Settings) -> bool {
        let before = settings.clone();
        if let Some(methods) = self.methods {
            settings.methods = methods;
        }
        if let Some(auto_backup) = self.auto_backup {
            settings.auto_backup = auto_backup;
        }
        if let Some(backup_name) = self.backup_name {
            settings.backup_name = backup_name;
        }
        *settings != before
    }
}
