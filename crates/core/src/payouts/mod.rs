//! Payouts module - withdrawal requests and the split engine that divides
//! them between trader and firm.

mod payouts_model;
mod payouts_service;
mod payouts_traits;
mod split;


pub use payouts_model::{NewPayout, Payout, PayoutStatus, PayoutUpdate, SplitEntry};
pub use payouts_service::PayoutService;
pub(crate) use payouts_service::split_for;
pub use payouts_traits::PayoutServiceTrait;
pub use split::{compute_split, round_money, SplitParticipant, SplitResult};
