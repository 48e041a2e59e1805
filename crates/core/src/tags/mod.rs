//! Tags module - labels goals can be grouped by.

mod tags_model;
mod tags_service;
mod tags_traits;

pub use tags_model::{NewTag, Tag, TagUpdate};
pub use tags_service::TagService;
pub use tags_traits::TagServiceTrait;
