//! Goal progress engine.
//!
//! Evaluates goals against a [`MetricCalculator`] snapshot. Progress is always
//! a 0..=100 percentage; completion additionally requires `min_days` distinct
//! trading days when set.

use super::aggregation::aggregate;
use super::goals_model::{Goal, GoalProgress, SubGoal, SubGoalProgress};
use crate::constants::MAX_PROGRESS;
use crate::metrics::{MetricCalculator, MetricConfig};
use crate::utils::time_utils::days_until;

/// Distinct trading days under `config`, computed only when a gate is set.
fn days_active_if_gated(
    calculator: &MetricCalculator<'_>,
    config: &MetricConfig,
    min_days: u32,
) -> Option<u32> {
    (min_days > 0).then(|| calculator.days_active(config))
}

fn passes_day_gate(min_days: u32, days_active: Option<u32>) -> bool {
    min_days == 0 || days_active.unwrap_or(0) >= min_days
}

fn evaluate_sub_goal(
    goal: &Goal,
    sub_goal: &SubGoal,
    calculator: &MetricCalculator<'_>,
) -> SubGoalProgress {
    let config = goal.sub_goal_config(sub_goal);
    let value = calculator.calculate(sub_goal.goal_type, &config);
    let progress = value.progress(sub_goal.target_value);
    let days_active = days_active_if_gated(calculator, &config, sub_goal.min_days);

    SubGoalProgress {
        sub_goal_id: sub_goal.id.clone(),
        goal_type: sub_goal.goal_type,
        target_value: sub_goal.target_value,
        current_value: value.current_value(),
        progress,
        weight: sub_goal.weight.unwrap_or(1.0),
        contribution: 0.0,
        completed: progress >= MAX_PROGRESS && passes_day_gate(sub_goal.min_days, days_active),
        locked: false,
        days_active,
        min_days: sub_goal.min_days,
    }
}

/// Evaluates one goal.
pub fn evaluate_goal(goal: &Goal, calculator: &MetricCalculator<'_>) -> GoalProgress {
    let config = goal.metric_config();
    let days_active = days_active_if_gated(calculator, &config, goal.min_days);

    let (progress, current_value, sub_progresses) = if goal.is_composite() {
        let mut sub_progresses: Vec<SubGoalProgress> = goal
            .sub_goals
            .iter()
            .map(|sub_goal| evaluate_sub_goal(goal, sub_goal, calculator))
            .collect();
        let total = aggregate(goal.mode, &mut sub_progresses);
        (total, None, sub_progresses)
    } else {
        let value = calculator.calculate(goal.goal_type, &config);
        (
            value.progress(goal.target_value),
            Some(value.current_value()),
            Vec::new(),
        )
    };

    let completed = progress >= MAX_PROGRESS && passes_day_gate(goal.min_days, days_active);
    let now = calculator.now();
    let deadline = goal.deadline.filter(|_| !goal.perpetual);

    GoalProgress {
        goal_id: goal.id.clone(),
        progress,
        completed,
        current_value,
        days_active,
        min_days: goal.min_days,
        sub_progresses,
        expired: deadline.is_some_and(|d| d < now) && !completed,
        days_remaining: deadline.map(|d| days_until(now, d)),
    }
}
