/// Profit split applied when an account does not define one
pub const DEFAULT_PROFIT_SPLIT: f64 = 1.0;

/// Weight an account gets when attached to a trade without an explicit weight
pub const DEFAULT_ACCOUNT_WEIGHT: f64 = 1.0;
