use async_trait::async_trait;

use super::payouts_model::{NewPayout, Payout, PayoutUpdate};
use super::split::SplitResult;
use crate::errors::Result;

/// Trait defining the contract for Payout service operations.
#[async_trait]
pub trait PayoutServiceTrait: Send + Sync {
    /// Creates a payout, computes its split and debits the linked accounts.
    async fn create_payout(&self, new_payout: NewPayout) -> Result<Payout>;

    /// Updates a payout, reverting its previous debit before applying the new
    /// one. Returns `None` when the payout is unknown.
    async fn update_payout(&self, payout_update: PayoutUpdate) -> Result<Option<Payout>>;

    /// Deletes a payout and credits its debit back.
    async fn delete_payout(&self, payout_id: &str) -> Result<bool>;

    fn get_payout(&self, payout_id: &str) -> Result<Payout>;

    fn list_payouts(&self) -> Result<Vec<Payout>>;

    /// Computes the split a payout over `account_ids` would get, without saving.
    fn preview_split(&self, amount: f64, account_ids: &[String]) -> Result<SplitResult>;
}
