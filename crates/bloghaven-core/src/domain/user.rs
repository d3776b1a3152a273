use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Avatar assigned to accounts that never uploaded one.
pub const DEFAULT_AVATAR: &str = "default.jpg";

/// User entity - a registered author or commenter.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    pub id: Uuid,
    pub username: String,
    pub email: String,
    pub password_hash: String,
    pub image_file: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl User {
    /// Create a new user with generated ID, default avatar and timestamps.
    pub fn new(username: String, email: String, password_hash: String) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            username,
            email,
            password_hash,
            image_file: DEFAULT_AVATAR.to_string(),
            created_at: now,
            updated_at: now,
        }
    }

    /// Replace profile fields, bumping `updated_at`.
    pub fn update_profile(&mut self, username: String, email: String, image_file: Option<String>) {
        self.username = username;
        self.email = email;
        if let Some(image_file) = image_file {
            self.image_file = image_file;
        }
        self.updated_at = Utc::now();
    }
}
