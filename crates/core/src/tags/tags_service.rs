use std::sync::Arc;

use super::tags_model::{NewTag, Tag, TagUpdate};
use super::tags_traits::TagServiceTrait;
use crate::errors::{Error, Result};
use crate::events::DomainEvent;
use crate::store::{Change, RecordStore};
use crate::utils::record_id;

pub struct TagService {
    store: Arc<RecordStore>,
}

impl TagService {
    pub fn new(store: Arc<RecordStore>) -> Self {
        Self { store }
    }
}

#[async_trait::async_trait]
impl TagServiceTrait for TagService {
    async fn create_tag(&self, new_tag: NewTag) -> Result<Tag> {
        new_tag.validate()?;
        let id = record_id(new_tag.id.clone());

        let mutation = self
            .store
            .mutate(move |doc| {
                if doc.tag(&id).is_some() {
                    return Err(Error::invalid_input(format!("Tag {} already exists", id)));
                }
                let tag = Tag {
                    id,
                    name: new_tag.name.trim().to_string(),
                    color: new_tag.color,
                };
                doc.tags.push(tag.clone());
                let events = vec![DomainEvent::tags_changed(vec![tag.id.clone()])];
                Ok(Change::new(tag, events))
            })
            .await?;
        Ok(mutation.value)
    }

    async fn update_tag(&self, tag_update: TagUpdate) -> Result<Option<Tag>> {
        tag_update.validate()?;

        let mutation = self
            .store
            .mutate(move |doc| {
                let Some(tag) = doc.tags.iter_mut().find(|t| t.id == tag_update.id) else {
                    return Ok(Change::unchanged(None));
                };
                tag_update.apply_to(tag);
                let tag = tag.clone();
                let events = vec![DomainEvent::tags_changed(vec![tag.id.clone()])];
                Ok(Change::new(Some(tag), events))
            })
            .await?;
        Ok(mutation.value)
    }

    async fn delete_tag(&self, tag_id: &str) -> Result<bool> {
        let tag_id = tag_id.to_string();
        let mutation = self
            .store
            .mutate(move |doc| {
                let before = doc.tags.len();
                doc.tags.retain(|t| t.id != tag_id);
                if doc.tags.len() == before {
                    return Ok(Change::unchanged(false));
                }

                let mut cleared = Vec::new();
                for goal in doc.goals.iter_mut() {
                    if goal.tag.as_deref() == Some(tag_id.as_str()) {
                        goal.tag = None;
                        cleared.push(goal.id.clone());
                    }
                }
                let mut events = vec![DomainEvent::tags_changed(vec![tag_id])];
                if !cleared.is_empty() {
                    events.push(DomainEvent::goals_changed(cleared));
                }
                Ok(Change::new(true, events))
            })
            .await?;
        Ok(mutation.value)
    }

    fn list_tags(&self) -> Result<Vec<Tag>> {
        Ok(self.store.snapshot().tags.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::goals::{GoalService, GoalServiceTrait, NewGoal};
    use crate::test_fixtures::memory_store;

    #[tokio::test]
    async fn test_delete_tag_clears_goal_tag() {
        let store = memory_store();
        let tags = TagService::new(store.clone());
        let goals = GoalService::new(store.clone());

        let tag = tags
            .create_tag(NewTag {
                name: "Q3".to_string(),
                ..Default::default()
            })
            .await
            .unwrap();
        let goal: NewGoal = serde_json::from_value(serde_json::json!({
            "title": "Tagged",
            "type": "profit",
            "targetValue": 100.0,
            "tag": tag.id,
        }))
        .unwrap();
        let goal = goals.create_goal(goal).await.unwrap();
        assert_eq!(goal.tag.as_deref(), Some(tag.id.as_str()));

        assert!(tags.delete_tag(&tag.id).await.unwrap());
        assert!(goals.get_goal(&goal.id).unwrap().tag.is_none());
        assert!(tags.list_tags().unwrap().is_empty());
        assert!(!tags.delete_tag(&tag.id).await.unwrap());
    }

    #[tokio::test]
    async fn test_update_tag() {
        let store = memory_store();
        let tags = TagService::new(store);
        let tag = tags
            .create_tag(NewTag {
                name: "Scalps".to_string(),
                color: Some("#ff0000".to_string()),
                ..Default::default()
            })
            .await
            .unwrap();
        let cleared: TagUpdate =
            serde_json::from_str(&format!(r#"{{"id": "{}", "color": null}}"#, tag.id)).unwrap();
        let updated = tags.update_tag(cleared).await.unwrap().unwrap();
        assert_eq!(updated.color, None);
        assert_eq!(updated.name, "Scalps");
    }
}
