use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::DomainError;

/// Image shown for posts created without an upload.
pub const DEFAULT_POST_IMAGE: &str = "default_image.jpg";

/// Post entity - a blog post written by one user in one category.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Post {
    pub id: Uuid,
    pub user_id: Uuid,
    pub category_id: Uuid,
    pub title: String,
    pub content: String,
    pub description: String,
    pub image_file: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Post {
    /// Create a new post.
    pub fn new(
        user_id: Uuid,
        category_id: Uuid,
        title: String,
        content: String,
        description: String,
        image_file: Option<String>,
    ) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            user_id,
            category_id,
            title,
            content,
            description,
            image_file: image_file.unwrap_or_else(|| DEFAULT_POST_IMAGE.to_string()),
            created_at: now,
            updated_at: now,
        }
    }

    pub fn is_authored_by(&self, user_id: Uuid) -> bool {
        self.user_id == user_id
    }

    /// Fails with `Forbidden` unless `user_id` wrote this post.
    pub fn ensure_author(&self, user_id: Uuid) -> Result<(), DomainError> {
        if self.is_authored_by(user_id) {
            Ok(())
        } else {
            Err(DomainError::Forbidden(format!(
                "post {} belongs to another user",
                self.id
            )))
        }
    }

    /// Apply an edit. Author and `created_at` never change.
    pub fn apply_edit(
        &mut self,
        category_id: Uuid,
        title: String,
        content: String,
        description: String,
        image_file: Option<String>,
    ) {
        self.category_id = category_id;
        self.title = title;
        self.content = content;
        self.description = description;
        if let Some(image_file) = image_file {
            self.image_file = image_file;
        }
        self.updated_at = Utc::now();
    }
}
