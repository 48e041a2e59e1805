use async_trait::async_trait;

use super::settings_model::{Settings, SettingsUpdate};
use crate::errors::Result;

#[async_trait]
pub trait SettingsServiceTrait: Send + Sync {
    fn get_settings(&self) -> Result<Settings>;

    async fn update_settings(&self, settings_update: SettingsUpdate) -> Result<Settings>;

    /// Name backups are stored under.
    fn backup_name(&self) -> Result<String>;
}
