use async_trait::async_trait;

use super::tags_model::{NewTag, Tag, TagUpdate};
use crate::errors::Result;

#[async_trait]
pub trait TagServiceTrait: Send + Sync {
    async fn create_tag(&self, new_tag: NewTag) -> Result<Tag>;

    /// Returns `None` when the tag is unknown.
    async fn update_tag(&self, tag_update: TagUpdate) -> Result<Option<Tag>>;

    /// Deletes the tag and clears it from every goal that carried it.
    async fn delete_tag(&self, tag_id: &str) -> Result<bool>;

    fn list_tags(&self) -> Result<Vec<Tag>>;
}
