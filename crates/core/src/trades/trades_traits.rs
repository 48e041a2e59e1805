use async_trait::async_trait;

use super::trades_model::{NewTrade, Trade};
use crate::errors::Result;

/// Trait defining the contract for Trade service operations.
///
/// Every mutation also moves the funding of the accounts the trade is
/// attributed to.
#[async_trait]
pub trait TradeServiceTrait: Send + Sync {
    async fn create_trade(&self, new_trade: NewTrade) -> Result<Trade>;

    /// Replaces a stored trade. Fails with `NotFound` for an unknown id.
    async fn update_trade(&self, trade: Trade) -> Result<Trade>;

    /// Returns false when the trade was unknown.
    async fn delete_trade(&self, trade_id: &str) -> Result<bool>;

    fn get_trade(&self, trade_id: &str) -> Result<Trade>;

    fn list_trades(&self) -> Result<Vec<Trade>>;

    /// Trades attributed to the account, primary or weighted.
    fn list_trades_for_account(&self, account_id: &str) -> Result<Vec<Trade>>;
}
