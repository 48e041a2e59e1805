use async_trait::async_trait;

use super::firms_model::{Firm, FirmUpdate, NewFirm};
use crate::errors::Result;

#[async_trait]
pub trait FirmServiceTrait: Send + Sync {
    async fn create_firm(&self, new_firm: NewFirm) -> Result<Firm>;

    /// Returns `None` when the firm is unknown.
    async fn update_firm(&self, firm_update: FirmUpdate) -> Result<Option<Firm>>;

    /// Deletes the firm and detaches its accounts.
    async fn delete_firm(&self, firm_id: &str) -> Result<bool>;

    fn get_firm(&self, firm_id: &str) -> Result<Firm>;

    fn list_firms(&self) -> Result<Vec<Firm>>;
}
