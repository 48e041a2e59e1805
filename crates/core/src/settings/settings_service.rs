use std::sync::Arc;

use async_trait::async_trait;
use log::debug;

use super::settings_model::{Settings, SettingsUpdate};
use super::settings_traits::SettingsServiceTrait;
use crate::constants::DEFAULT_BACKUP_NAME;
use crate::errors::Result;
use crate::events::DomainEvent;
use crate::store::{Change, RecordStore};

pub struct SettingsService {
    store: Arc<RecordStore>,
}

impl SettingsService {
    pub fn new(store: Arc<RecordStore>) -> Self {
        Self { store }
    }
}

#[async_trait]
impl SettingsServiceTrait for SettingsService {
    fn get_settings(&self) -> Result<Settings> {
        Ok(self.store.snapshot().settings.clone())
    }

    async fn update_settings(&self, settings_update: SettingsUpdate) -> Result<Settings> {
        settings_update.validate()?;

        let mutation = self
            .store
            .mutate(move |doc| {
                if !settings_update.apply_to(&mut doc.settings) {
                    return Ok(Change::unchanged(doc.settings.clone()));
                }
                debug!("Settings updated");
                Ok(Change::new(
                    doc.settings.clone(),
                    vec![DomainEvent::SettingsChanged],
                ))
            })
            .await?;
        Ok(mutation.value)
    }

    fn backup_name(&self) -> Result<String> {
        Ok(self
            .store
            .snapshot()
            .settings
            .backup_name
            .clone()
            .unwrap_or_else(|| DEFAULT_BACKUP_NAME.to_string()))
    }
}
