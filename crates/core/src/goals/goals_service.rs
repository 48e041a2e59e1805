use std::sync::Arc;

use chrono::{DateTime, Utc};
use log::{debug, info};

use super::goals_model::{Goal, GoalProgress, NewGoal};
use super::goals_traits::GoalServiceTrait;
use super::progress::evaluate_goal;
use crate::errors::{Error, Result};
use crate::events::DomainEvent;
use crate::metrics::MetricCalculator;
use crate::store::{Change, Document, RecordStore};
use crate::utils::record_id;

pub struct GoalService {
    store: Arc<RecordStore>,
}

impl GoalService {
    pub fn new(store: Arc<RecordStore>) -> Self {
        Self { store }
    }
}

fn not_found(goal_id: &str) -> Error {
    Error::NotFound(format!("Goal {} not found", goal_id))
}

fn assign_sub_goal_ids(goal: &mut Goal) {
    for sub_goal in &mut goal.sub_goals {
        if sub_goal.id.trim().is_empty() {
            sub_goal.id = record_id(None);
        }
    }
}

fn evaluate(doc: &Document, goal: &Goal, now: DateTime<Utc>) -> GoalProgress {
    evaluate_goal(goal, &MetricCalculator::from_document(doc, now))
}

/// Aligns `completed_at` and the notification guard with `completed`.
///
/// Returns true when a completion event should fire.
fn reconcile_completion(goal: &mut Goal, completed: bool, now: DateTime<Utc>) -> bool {
    if completed {
        goal.completed_at.get_or_insert(now);
        if goal.completed_notified {
            return false;
        }
        goal.completed_notified = true;
        return true;
    }
    if !goal.archived {
        goal.completed_at = None;
    }
    goal.completed_notified = false;
    false
}

#[async_trait::async_trait]
impl GoalServiceTrait for GoalService {
    fn get_goals(&self) -> Result<Vec<Goal>> {
        Ok(self.store.snapshot().goals.clone())
    }

    fn get_goal(&self, goal_id: &str) -> Result<Goal> {
        self.store
            .snapshot()
            .goal(goal_id)
            .cloned()
            .ok_or_else(|| not_found(goal_id))
    }

    async fn create_goal(&self, new_goal: NewGoal) -> Result<Goal> {
        new_goal.validate()?;
        let id = record_id(new_goal.id.clone());

        let mutation = self
            .store
            .mutate(move |doc| {
                if doc.goal(&id).is_some() {
                    return Err(Error::invalid_input(format!("Goal {} already exists", id)));
                }
                let now = Utc::now();
                let mut goal = new_goal.into_goal(id, now);
                assign_sub_goal_ids(&mut goal);

                let progress = evaluate(doc, &goal, now);
                let mut events = vec![DomainEvent::goals_changed(vec![goal.id.clone()])];
                if reconcile_completion(&mut goal, progress.completed, now) {
                    info!("Goal '{}' is complete on creation", goal.title);
                    events.push(DomainEvent::goal_completed(goal.id.clone(), goal.title.clone()));
                }
                doc.goals.push(goal.clone());
                Ok(Change::new(goal, events))
            })
            .await?;
        Ok(mutation.value)
    }

    async fn update_goal(&self, goal: Goal) -> Result<Goal> {
        goal.validate()?;

        let mutation = self
            .store
            .mutate(move |doc| {
                let index = doc
                    .goals
                    .iter()
                    .position(|g| g.id == goal.id)
                    .ok_or_else(|| not_found(&goal.id))?;
                let existing = &doc.goals[index];

                let mut goal = goal;
                assign_sub_goal_ids(&mut goal);
                goal.completed_notified = existing.completed_notified;
                goal.completed_at = existing.completed_at;

                let now = Utc::now();
                let progress = evaluate(doc, &goal, now);
                let fire = reconcile_completion(&mut goal, progress.completed, now);

                if doc.goals[index] == goal {
                    return Ok(Change::unchanged(goal));
                }
                let mut events = vec![DomainEvent::goals_changed(vec![goal.id.clone()])];
                if fire {
                    events.push(DomainEvent::goal_completed(goal.id.clone(), goal.title.clone()));
                }
                doc.goals[index] = goal.clone();
                Ok(Change::new(goal, events))
            })
            .await?;
        Ok(mutation.value)
    }

    async fn archive_goal(&self, goal_id: &str, archived: bool) -> Result<Goal> {
        let goal_id = goal_id.to_string();
        let mutation = self
            .store
            .mutate(move |doc| {
                let goal = doc
                    .goals
                    .iter_mut()
                    .find(|g| g.id == goal_id)
                    .ok_or_else(|| not_found(&goal_id))?;
                let before = goal.clone();
                goal.archived = archived;
                if archived && goal.completed_at.is_none() {
                    goal.completed_at = Some(Utc::now());
                }
                if *goal == before {
                    return Ok(Change::unchanged(before));
                }
                let goal = goal.clone();
                Ok(Change::new(
                    goal.clone(),
                    vec![DomainEvent::goals_changed(vec![goal.id])],
                ))
            })
            .await?;
        Ok(mutation.value)
    }

    async fn delete_goal(&self, goal_id: &str) -> Result<()> {
        let goal_id = goal_id.to_string();
        self.store
            .mutate(move |doc| {
                if let Some(index) = doc.goals.iter().position(|g| g.id == goal_id) {
                    doc.goals.remove(index);
                    debug!("Deleted goal {}", goal_id);
                    return Ok(Change::new((), vec![DomainEvent::goals_changed(vec![goal_id])]));
                }
                for goal in doc.goals.iter_mut() {
                    if let Some(index) = goal.sub_goals.iter().position(|s| s.id == goal_id) {
                        goal.sub_goals.remove(index);
                        debug!("Deleted sub-goal {} of goal {}", goal_id, goal.id);
                        let parent_id = goal.id.clone();
                        return Ok(Change::new((), vec![DomainEvent::goals_changed(vec![parent_id])]));
                    }
                }
                Err(not_found(&goal_id))
            })
            .await?;
        Ok(())
    }

    fn get_goal_progress(&self, goal_id: &str) -> Result<GoalProgress> {
        let doc = self.store.snapshot();
        let goal = doc.goal(goal_id).ok_or_else(|| not_found(goal_id))?;
        Ok(evaluate(&doc, goal, Utc::now()))
    }

    fn get_all_progress(&self) -> Result<Vec<GoalProgress>> {
        let doc = self.store.snapshot();
        let calculator = MetricCalculator::from_document(&doc, Utc::now());
        Ok(doc
            .goals
            .iter()
            .map(|goal| evaluate_goal(goal, &calculator))
            .collect())
    }

    async fn sync_completions(&self) -> Result<Vec<String>> {
        let mutation = self
            .store
            .mutate(|doc| {
                let now = Utc::now();
                let completion: Vec<bool> = {
                    let calculator = MetricCalculator::from_document(doc, now);
                    doc.goals
                        .iter()
                        .map(|goal| !goal.archived && evaluate_goal(goal, &calculator).completed)
                        .collect()
                };

                let mut changed = Vec::new();
                let mut completed_now = Vec::new();
                let mut events = Vec::new();
                for (goal, completed) in doc.goals.iter_mut().zip(completion) {
                    if goal.archived {
                        continue;
                    }
                    let before = goal.clone();
                    if reconcile_completion(goal, completed, now) {
                        info!("Goal '{}' completed", goal.title);
                        completed_now.push(goal.id.clone());
                        events.push(DomainEvent::goal_completed(goal.id.clone(), goal.title.clone()));
                    }
                    if *goal != before {
                        changed.push(goal.id.clone());
                    }
                }

                if changed.is_empty() {
                    return Ok(Change::unchanged(completed_now));
                }
                events.insert(0, DomainEvent::goals_changed(changed));
                Ok(Change::new(completed_now, events))
            })
            .await?;
        Ok(mutation.value)
    }
}
