//! Settings module - user preferences kept in the document.

mod settings_model;
mod settings_service;
mod settings_traits;

pub use settings_model::{AutoBackupSettings, Settings, SettingsUpdate};
pub use settings_service::SettingsService;
pub use settings_traits::SettingsServiceTrait;
