//! Goal domain models.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::errors::{Error, Result, ValidationError};
use crate::metrics::{MetricConfig, MetricType, Period};

/// How a composite goal combines its sub-goals.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub enum GoalMode {
    /// Weighted average of sub-goal progress.
    #[default]
    Parallel,
    /// Sub-goals unlock one after the other.
    Sequential,
}

/// One part of a composite goal. Unset period, start date and linked
/// accounts are inherited from the parent goal.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct SubGoal {
    #[serde(default)]
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(rename = "type", default)]
    pub goal_type: MetricType,
    #[serde(default)]
    pub target_value: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub weight: Option<f64>,
    #[serde(default)]
    pub min_days: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub linked_accounts: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub period: Option<Period>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start_date: Option<DateTime<Utc>>,
}

/// Domain model representing a goal.
///
/// A goal without sub-goals is evaluated directly; with sub-goals it is a
/// composite whose progress is aggregated according to `mode`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Goal {
    pub id: String,
    pub title: String,
    #[serde(rename = "type", default)]
    pub goal_type: MetricType,
    #[serde(default)]
    pub period: Period,
    pub start_date: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub deadline: Option<DateTime<Utc>>,
    #[serde(default)]
    pub perpetual: bool,
    #[serde(default)]
    pub target_value: f64,
    #[serde(default)]
    pub linked_accounts: Vec<String>,
    #[serde(default)]
    pub sub_goals: Vec<SubGoal>,
    #[serde(default)]
    pub mode: GoalMode,
    #[serde(default)]
    pub min_days: u32,
    #[serde(default)]
    pub archived: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub completed_at: Option<DateTime<Utc>>,
    /// Set once a completion event has fired; cleared when the goal reopens.
    #[serde(default)]
    pub completed_notified: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tag: Option<String>,
}

impl Goal {
    pub fn is_composite(&self) -> bool {
        !self.sub_goals.is_empty()
    }

    /// Metric configuration of the goal itself.
    pub fn metric_config(&self) -> MetricConfig {
        MetricConfig {
            period: self.period,
            start_date: self.start_date,
            linked_accounts: self.linked_accounts.clone(),
            target_value: self.target_value,
        }
    }

    /// Metric configuration of a sub-goal, inheriting what it leaves unset.
    pub fn sub_goal_config(&self, sub_goal: &SubGoal) -> MetricConfig {
        MetricConfig {
            period: sub_goal.period.unwrap_or(self.period),
            start_date: sub_goal.start_date.unwrap_or(self.start_date),
            linked_accounts: sub_goal
                .linked_accounts
                .clone()
                .unwrap_or_else(|| self.linked_accounts.clone()),
            target_value: sub_goal.target_value,
        }
    }

    pub fn find_sub_goal(&self, sub_goal_id: &str) -> Option<&SubGoal> {
        self.sub_goals.iter().find(|s| s.id == sub_goal_id)
    }

    /// Drops `account_id` from the goal's and its sub-goals' linked accounts.
    /// Returns true when anything changed.
    pub fn unlink_account(&mut self, account_id: &str) -> bool {
        let before = self.linked_accounts.len();
        self.linked_accounts.retain(|id| id != account_id);
        let mut changed = before != self.linked_accounts.len();
        for sub_goal in &mut self.sub_goals {
            if let Some(linked) = sub_goal.linked_accounts.as_mut() {
                let before = linked.len();
                linked.retain(|id| id != account_id);
                changed |= before != linked.len();
            }
        }
        changed
    }

    pub fn validate(&self) -> Result<()> {
        if self.id.trim().is_empty() {
            return Err(Error::Validation(ValidationError::MissingField(
                "id".to_string(),
            )));
        }
        validate_definition(&self.title, self.target_value, &self.sub_goals)
    }
}

/// Input model for creating a goal.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewGoal {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub title: String,
    #[serde(rename = "type", default)]
    pub goal_type: MetricType,
    #[serde(default)]
    pub period: Period,
    pub start_date: Option<DateTime<Utc>>,
    pub deadline: Option<DateTime<Utc>>,
    #[serde(default)]
    pub perpetual: bool,
    #[serde(default)]
    pub target_value: f64,
    #[serde(default)]
    pub linked_accounts: Vec<String>,
    #[serde(default)]
    pub sub_goals: Vec<SubGoal>,
    #[serde(default)]
    pub mode: GoalMode,
    #[serde(default)]
    pub min_days: u32,
    pub tag: Option<String>,
}

impl NewGoal {
    pub fn validate(&self) -> Result<()> {
        validate_definition(&self.title, self.target_value, &self.sub_goals)
    }

    pub fn into_goal(self, id: String, now: DateTime<Utc>) -> Goal {
        Goal {
            id,
            title: self.title.trim().to_string(),
            goal_type: self.goal_type,
            period: self.period,
            start_date: self.start_date.unwrap_or(now),
            deadline: self.deadline,
            perpetual: self.perpetual,
            target_value: self.target_value,
            linked_accounts: self.linked_accounts,
            sub_goals: self.sub_goals,
            mode: self.mode,
            min_days: self.min_days,
            archived: false,
            completed_at: None,
            completed_notified: false,
            tag: self.tag,
        }
    }
}

fn validate_definition(title: &str, target_value: f64, sub_goals: &[SubGoal]) -> Result<()> {
    if title.trim().is_empty() {
        return Err(Error::Validation(ValidationError::InvalidInput(
            "Goal title cannot be empty".to_string(),
        )));
    }
    if !target_value.is_finite() {
        return Err(Error::Validation(ValidationError::InvalidInput(
            "Goal target must be a finite number".to_string(),
        )));
    }
    for sub_goal in sub_goals {
        if !sub_goal.target_value.is_finite() {
            return Err(Error::Validation(ValidationError::InvalidInput(
                "Sub-goal target must be a finite number".to_string(),
            )));
        }
        if let Some(weight) = sub_goal.weight {
            if !weight.is_finite() || weight < 0.0 {
                return Err(Error::Validation(ValidationError::InvalidInput(format!(
                    "Sub-goal weight must be a non-negative number, got {}",
                    weight
                ))));
            }
        }
    }
    Ok(())
}

/// Progress of one sub-goal within a composite goal.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubGoalProgress {
    pub sub_goal_id: String,
    #[serde(rename = "type")]
    pub goal_type: MetricType,
    pub target_value: f64,
    pub current_value: f64,
    pub progress: f64,
    pub weight: f64,
    /// Share of the parent's total this sub-goal contributes.
    pub contribution: f64,
    pub completed: bool,
    /// Sequential mode only: the previous sub-goal is not yet completed.
    pub locked: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub days_active: Option<u32>,
    pub min_days: u32,
}

/// Evaluated state of a goal. Derived on demand, never persisted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GoalProgress {
    pub goal_id: String,
    pub progress: f64,
    pub completed: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub current_value: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub days_active: Option<u32>,
    pub min_days: u32,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub sub_progresses: Vec<SubGoalProgress>,
    pub expired: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub days_remaining: Option<i64>,
}
