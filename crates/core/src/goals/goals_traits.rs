use async_trait::async_trait;

use super::goals_model::{Goal, GoalProgress, NewGoal};
use crate::errors::Result;

/// Trait for goal service operations
#[async_trait]
pub trait GoalServiceTrait: Send + Sync {
    fn get_goals(&self) -> Result<Vec<Goal>>;

    fn get_goal(&self, goal_id: &str) -> Result<Goal>;

    /// Creates a goal. A goal that is already complete fires its completion
    /// event immediately.
    async fn create_goal(&self, new_goal: NewGoal) -> Result<Goal>;

    /// Replaces a goal, keeping `completed_at` and the notification guard in
    /// step with its new progress. Fails with `NotFound` for an unknown id.
    async fn update_goal(&self, goal: Goal) -> Result<Goal>;

    /// Archives or unarchives a goal. Fails with `NotFound` for an unknown id.
    async fn archive_goal(&self, goal_id: &str, archived: bool) -> Result<Goal>;

    /// Deletes a top-level goal, or else the sub-goal with this id.
    async fn delete_goal(&self, goal_id: &str) -> Result<()>;

    fn get_goal_progress(&self, goal_id: &str) -> Result<GoalProgress>;

    fn get_all_progress(&self) -> Result<Vec<GoalProgress>>;

    /// Re-evaluates every active goal, firing `GoalCompleted` once per newly
    /// completed goal and re-arming goals that reopened. Returns the ids of
    /// goals that completed during this call.
    async fn sync_completions(&self) -> Result<Vec<String>>;
}
