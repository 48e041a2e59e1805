//! Trades module - journal entries, partial-execution math, and the service
//! that keeps account funding in step with them.

mod calculations;
mod trades_model;
mod trades_service;
mod trades_traits;

#[cfg(test)]
mod trades_service_tests;

pub use calculations::{apply_executions, execution_r_multiple, finalize_trade, normalize_attribution};
pub use trades_model::{
    validate_trade, Direction, NewTrade, PartialExecution, Trade, TradeAccount,
};
pub use trades_service::TradeService;
pub use trades_traits::TradeServiceTrait;
