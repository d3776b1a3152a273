//! Domain records to response views.

use std::collections::HashMap;

use uuid::Uuid;

use bloghaven_core::domain::{Category, Comment, DEFAULT_POST_IMAGE, Post, User};
use bloghaven_core::ports::{ImageKind, UserRepository};
use bloghaven_shared::dto::{
    AccountResponse, AuthorSummary, CategoryResponse, CommentResponse, PostFormValues,
    PostResponse,
};

use crate::middleware::error::AppResult;

pub fn avatar_url(user: &User) -> String {
    ImageKind::Avatar.url_for(&user.image_file)
}

/// The stock post image ships with the avatars, uploads live in `post_image/`.
pub fn post_image_url(image_file: &str) -> String {
    if image_file == DEFAULT_POST_IMAGE {
        ImageKind::Avatar.url_for(image_file)
    } else {
        ImageKind::PostImage.url_for(image_file)
    }
}

pub fn author_summary(user: &User) -> AuthorSummary {
    AuthorSummary {
        id: user.id.to_string(),
        username: user.username.clone(),
        image_url: avatar_url(user),
    }
}

pub fn category_response(category: &Category) -> CategoryResponse {
    CategoryResponse {
        id: category.id.to_string(),
        name: category.name.clone(),
    }
}

pub fn account_response(user: &User) -> AccountResponse {
    AccountResponse {
        id: user.id.to_string(),
        username: user.username.clone(),
        email: user.email.clone(),
        image_url: avatar_url(user),
    }
}

pub fn form_values(post: &Post) -> PostFormValues {
    PostFormValues {
        title: post.title.clone(),
        content: post.content.clone(),
        description: post.description.clone(),
        category: post.category_id.to_string(),
        image_url: post_image_url(&post.image_file),
    }
}

/// Users keyed by id, for attaching authors to posts and comments.
pub async fn load_authors(
    users: &dyn UserRepository,
    ids: impl IntoIterator<Item = Uuid>,
) -> AppResult<HashMap<Uuid, User>> {
    let mut ids: Vec<Uuid> = ids.into_iter().collect();
    ids.sort_unstable();
    ids.dedup();

    Ok(users
        .find_by_ids(&ids)
        .await?
        .into_iter()
        .map(|u| (u.id, u))
        .collect())
}

pub fn category_index(categories: &[Category]) -> HashMap<Uuid, &Category> {
    categories.iter().map(|c| (c.id, c)).collect()
}

pub fn post_response(
    post: &Post,
    authors: &HashMap<Uuid, User>,
    categories: &HashMap<Uuid, &Category>,
) -> PostResponse {
    PostResponse {
        id: post.id.to_string(),
        title: post.title.clone(),
        description: post.description.clone(),
        content: post.content.clone(),
        image_url: post_image_url(&post.image_file),
        created_at: post.created_at.to_rfc3339(),
        updated_at: post.updated_at.to_rfc3339(),
        author: authors.get(&post.user_id).map(author_summary),
        category: categories
            .get(&post.category_id)
            .map(|c| category_response(c)),
    }
}

pub fn comment_response(comment: &Comment, authors: &HashMap<Uuid, User>) -> CommentResponse {
    CommentResponse {
        id: comment.id.to_string(),
        content: comment.content.clone(),
        created_at: comment.created_at.to_rfc3339(),
        author: authors.get(&comment.user_id).map(author_summary),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_post_image_lives_with_avatars() {
        assert_eq!(
            post_image_url(DEFAULT_POST_IMAGE),
            "/static/images/default_image.jpg"
        );
        assert_eq!(
            post_image_url("0123456789abcdef.png"),
            "/static/post_image/0123456789abcdef.png"
        );
    }

    #[test]
    fn test_post_response_without_author() {
        let category = Category::new("Travel");
        let post = Post::new(
            Uuid::new_v4(),
            category.id,
            "Title".into(),
            "Body".into(),
            "Desc".into(),
            None,
        );
        let categories = vec![category];

        let view = post_response(&post, &HashMap::new(), &category_index(&categories));

        assert!(view.author.is_none());
        assert_eq!(view.category.map(|c| c.name).as_deref(), Some("Travel"));
    }
}
