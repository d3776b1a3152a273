use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Categories every fresh installation starts with.
pub const DEFAULT_CATEGORIES: [&str; 5] = ["Technology", "Lifestyle", "Travel", "Food", "Business"];

/// Category a post is filed under.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Category {
    pub id: Uuid,
    pub name: String,
}

impl Category {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
        }
    }
}
