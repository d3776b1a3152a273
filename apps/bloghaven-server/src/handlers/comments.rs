//! Commenting on a post.

use actix_web::{HttpResponse, web};
use uuid::Uuid;

use bloghaven_core::domain::Comment;
use bloghaven_core::ports::BaseRepository;
use bloghaven_core::validation::CommentForm;
use bloghaven_shared::ApiResponse;

use super::posts::find_post;
use super::see_other;
use crate::middleware::auth::Actor;
use crate::middleware::error::AppResult;
use crate::state::AppState;

pub const COMMENT_REJECTED: &str = "There was an error with your comment. Please check the form.";

/// GET|POST /post/{id}/comment
///
/// A request without a form body counts as an invalid submission.
pub async fn create(
    state: web::Data<AppState>,
    actor: Actor,
    path: web::Path<Uuid>,
    form: Option<web::Form<CommentForm>>,
) -> AppResult<HttpResponse> {
    let post = find_post(&state, path.into_inner()).await?;
    let location = format!("/post/{}", post.id);

    let form = form.map(web::Form::into_inner).unwrap_or_default();
    if let Err(errors) = form.validate() {
        tracing::debug!(post_id = %post.id, %errors, "Comment rejected");
        return Ok(see_other(&location).json(ApiResponse::failure(COMMENT_REJECTED)));
    }

    let comment = state
        .comments
        .save(Comment::new(post.id, actor.id(), form.content))
        .await?;

    tracing::info!(comment_id = %comment.id, post_id = %post.id, "Comment added");

    Ok(see_other(&location).json(ApiResponse::message("Your comment has been added!")))
}
