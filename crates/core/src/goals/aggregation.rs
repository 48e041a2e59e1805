//! Combining sub-goal progress into a composite goal's total.

use super::goals_model::{GoalMode, SubGoalProgress};
use crate::constants::MAX_PROGRESS;

/// Aggregation strategy selected by [`GoalMode`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Aggregator {
    Sequential,
    Parallel,
}

impl From<GoalMode> for Aggregator {
    fn from(mode: GoalMode) -> Self {
        match mode {
            GoalMode::Sequential => Aggregator::Sequential,
            GoalMode::Parallel => Aggregator::Parallel,
        }
    }
}

impl Aggregator {
    fn aggregate(self, sub_progresses: &mut [SubGoalProgress]) -> f64 {
        match self {
            Aggregator::Sequential => sequential(sub_progresses),
            Aggregator::Parallel => parallel(sub_progresses),
        }
    }
}

/// Aggregates `sub_progresses` in place (filling `contribution`, and for
/// sequential goals `locked`) and returns the total, clamped to 0..=100.
///
/// When every sub-goal is at full progress the total is exactly
/// [`MAX_PROGRESS`], whatever rounding the weighting introduced.
pub fn aggregate(mode: GoalMode, sub_progresses: &mut [SubGoalProgress]) -> f64 {
    if sub_progresses.is_empty() {
        return 0.0;
    }
    let total = Aggregator::from(mode).aggregate(sub_progresses);
    if total > 0.0 && sub_progresses.iter().all(|s| s.progress >= MAX_PROGRESS) {
        return MAX_PROGRESS;
    }
    total.clamp(0.0, MAX_PROGRESS)
}

/// Each sub-goal counts for `progress / N`, but only once the one before it
/// is completed. A locked sub-goal shows no progress and cannot complete,
/// which in turn keeps every later one locked.
fn sequential(sub_progresses: &mut [SubGoalProgress]) -> f64 {
    let count = sub_progresses.len() as f64;
    let mut unlocked_sum = 0.0;
    let mut previous_completed = true;

    for sub in sub_progresses.iter_mut() {
        if previous_completed {
            sub.locked = false;
            sub.contribution = sub.progress / count;
            unlocked_sum += sub.progress;
        } else {
            sub.locked = true;
            sub.progress = 0.0;
            sub.completed = false;
            sub.contribution = 0.0;
        }
        previous_completed = sub.completed;
    }

    unlocked_sum / count
}

/// Weighted average `Σ(progress · weight) / Σ(weight)`.
fn parallel(sub_progresses: &mut [SubGoalProgress]) -> f64 {
    let total_weight: f64 = sub_progresses.iter().map(|s| s.weight).sum();
    if total_weight <= 0.0 {
        for sub in sub_progresses.iter_mut() {
            sub.contribution = 0.0;
        }
        return 0.0;
    }

    let mut weighted_sum = 0.0;
    for sub in sub_progresses.iter_mut() {
        sub.locked = false;
        weighted_sum += sub.progress * sub.weight;
        sub.contribution = sub.progress * sub.weight / total_weight;
    }
    weighted_sum / total_weight
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::metrics::MetricType;

    fn sub(id: &str, progress: f64, weight: f64) -> SubGoalProgress {
        SubGoalProgress {
            sub_goal_id: id.to_string(),
            goal_type: MetricType::Profit,
            target_value: 100.0,
            current_value: progress,
            progress,
            weight,
            contribution: 0.0,
            completed: progress >= 100.0,
            locked: false,
            days_active: None,
            min_days: 0,
        }
    }

    #[test]
    fn test_sequential_locks_after_incomplete_step() {
        let mut subs = vec![sub("a", 50.0, 1.0), sub("b", 100.0, 1.0)];
        let total = aggregate(GoalMode::Sequential, &mut subs);
        assert_eq!(total, 25.0);
        assert!(!subs[0].locked);
        assert!(subs[1].locked);
        assert_eq!(subs[1].progress, 0.0);
        assert!(!subs[1].completed);
    }

    #[test]
    fn test_sequential_lock_propagates() {
        let mut subs = vec![
            sub("a", 20.0, 1.0),
            sub("b", 100.0, 1.0),
            sub("c", 100.0, 1.0),
        ];
        let total = aggregate(GoalMode::Sequential, &mut subs);
        assert!(subs[1].locked && subs[2].locked);
        assert!((total - 20.0 / 3.0).abs() < 1e-9);
    }

    #[test]
    fn test_sequential_all_complete_reaches_full() {
        let mut subs = vec![
            sub("a", 100.0, 1.0),
            sub("b", 100.0, 1.0),
            sub("c", 100.0, 1.0),
        ];
        assert_eq!(aggregate(GoalMode::Sequential, &mut subs), 100.0);
    }

    #[test]
    fn test_parallel_weighted_average() {
        let mut subs = vec![sub("a", 100.0, 1.0), sub("b", 0.0, 3.0)];
        let total = aggregate(GoalMode::Parallel, &mut subs);
        assert_eq!(total, 25.0);
        assert_eq!(subs[0].contribution, 25.0);
        assert_eq!(subs[1].contribution, 0.0);
    }

    #[test]
    fn test_parallel_fractional_weights_reach_full() {
        let mut subs = vec![sub("a", 100.0, 0.1), sub("b", 100.0, 0.2)];
        assert_eq!(aggregate(GoalMode::Parallel, &mut subs), MAX_PROGRESS);

        let mut subs = vec![sub("a", 100.0, 0.1), sub("b", 99.0, 0.2)];
        assert!(aggregate(GoalMode::Parallel, &mut subs) < MAX_PROGRESS);
    }

    #[test]
    fn test_parallel_zero_weights() {
        let mut subs = vec![sub("a", 100.0, 0.0)];
        assert_eq!(aggregate(GoalMode::Parallel, &mut subs), 0.0);
    }

    #[test]
    fn test_empty_is_zero() {
        assert_eq!(aggregate(GoalMode::Parallel, &mut []), 0.0);
    }
}
