//! Data Transfer Objects - the views returned by the server.

use serde::{Deserialize, Serialize};

/// Public profile of a post or comment author.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthorSummary {
    pub id: String,
    pub username: String,
    pub image_url: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryResponse {
    pub id: String,
    pub name: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PostResponse {
    pub id: String,
    pub title: String,
    pub description: String,
    pub content: String,
    pub image_url: String,
    pub created_at: String,
    pub updated_at: String,
    /// `None` when the author record is gone.
    pub author: Option<AuthorSummary>,
    pub category: Option<CategoryResponse>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CommentResponse {
    pub id: String,
    pub content: String,
    pub created_at: String,
    pub author: Option<AuthorSummary>,
}

/// Index and `/posts` listing.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PostListResponse {
    pub posts: Vec<PostResponse>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub categories: Vec<CategoryResponse>,
}

/// Single post page.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PostDetailResponse {
    pub post: PostResponse,
    pub comments: Vec<CommentResponse>,
}

/// Account page, prefilled from the current user.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AccountResponse {
    pub id: String,
    pub username: String,
    pub email: String,
    pub image_url: String,
}

/// Values of an existing post shown in the edit form.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PostFormValues {
    pub title: String,
    pub content: String,
    pub description: String,
    pub category: String,
    pub image_url: String,
}

/// Create/edit post page.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PostFormView {
    pub legend: String,
    pub categories: Vec<CategoryResponse>,
    pub author_image_url: String,
    pub default_image_url: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub values: Option<PostFormValues>,
}

/// Empty form page (register, login).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FormView {
    pub form: String,
    pub fields: Vec<String>,
}
