//! Goals module - goal definitions, the progress engine, and the service.

mod aggregation;
mod goals_model;
mod goals_service;
mod goals_traits;
mod progress;


pub use aggregation::aggregate;
pub use goals_model::{Goal, GoalMode, GoalProgress, NewGoal, SubGoal, SubGoalProgress};
pub use goals_service::GoalService;
pub use goals_traits::GoalServiceTrait;
pub use progress::evaluate_goal;
