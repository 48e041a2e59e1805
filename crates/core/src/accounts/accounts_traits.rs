//! Account service trait.

use async_trait::async_trait;

use super::accounts_model::{Account, AccountUpdate, NewAccount};
use crate::errors::Result;
use crate::funding::FundingReconciliation;

/// Trait defining the contract for Account service operations.
#[async_trait]
pub trait AccountServiceTrait: Send + Sync {
    /// Creates a new account with business validation.
    async fn create_account(&self, new_account: NewAccount) -> Result<Account>;

    /// Updates an existing account. Returns `None` when the account is unknown.
    async fn update_account(&self, account_update: AccountUpdate) -> Result<Option<Account>>;

    /// Deletes an account and detaches every record that referenced it.
    ///
    /// Trades are kept. Returns false when the account was unknown.
    async fn delete_account(&self, account_id: &str) -> Result<bool>;

    /// Retrieves an account by ID.
    fn get_account(&self, account_id: &str) -> Result<Account>;

    fn list_accounts(&self) -> Result<Vec<Account>>;

    /// Rebuilds the account's balance from its full trade and payout history.
    async fn recalc_account_funding(&self, account_id: &str) -> Result<Option<Account>>;

    /// Compares every stored balance with its full recompute without writing.
    fn reconcile_funding(&self) -> Result<Vec<FundingReconciliation>>;
}
