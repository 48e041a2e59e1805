//! Funding module - keeps account balances consistent with trade and payout history.

mod ledger;


pub use ledger::{
    apply_deltas, payout_funding_deltas, recalc_account_funding, reconcile, trade_funding_deltas,
    FundingDeltas, FundingReconciliation,
};
