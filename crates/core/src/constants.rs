/// Funding deltas smaller than this are treated as no-ops
pub const FUNDING_EPSILON: f64 = 1e-9;

/// Decimal places used for money amounts in payout splits
pub const DISPLAY_DECIMAL_PRECISION: u32 = 2;

/// Upper bound of any goal or sub-goal progress percentage
pub const MAX_PROGRESS: f64 = 100.0;

/// Default name used for the remote backup object
pub const DEFAULT_BACKUP_NAME: &str = "propdesk-data.json";

/// Default interval for the periodic auto-backup, in minutes
pub const DEFAULT_AUTO_BACKUP_INTERVAL_MINUTES: u32 = 15;

/// Payout methods seeded into a fresh document
pub const DEFAULT_PAYOUT_METHODS: &[&str] = &["Bank Transfer", "PayPal", "Wise", "Crypto"];
