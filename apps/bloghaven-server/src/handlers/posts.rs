//! Post listing, viewing and authoring.

use actix_multipart::Multipart;
use actix_web::{HttpResponse, web};
use serde::Deserialize;
use uuid::Uuid;

use bloghaven_core::domain::{Category, DEFAULT_POST_IMAGE, Post};
use bloghaven_core::error::DomainError;
use bloghaven_core::ports::{BaseRepository, ImageKind, PostFilter};
use bloghaven_core::validation::PostForm;
use bloghaven_shared::ApiResponse;
use bloghaven_shared::dto::{PostDetailResponse, PostFormView, PostListResponse, PostResponse};

use super::see_other;
use super::upload::{MultipartFields, UploadedFile, store_upload};
use super::views::{
    avatar_url, category_index, category_response, comment_response, form_values, load_authors,
    post_image_url, post_response,
};
use crate::middleware::auth::Actor;
use crate::middleware::error::AppResult;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct ListQuery {
    pub category: Option<String>,
    pub search: Option<String>,
}

pub(crate) async fn find_post(state: &AppState, id: Uuid) -> AppResult<Post> {
    state
        .posts
        .find_by_id(id)
        .await?
        .ok_or_else(|| DomainError::not_found("Post", id).into())
}

/// Existing post written by `actor`: 404 before 403.
async fn owned_post(state: &AppState, actor: &Actor, id: Uuid) -> AppResult<Post> {
    let post = find_post(state, id).await?;
    post.ensure_author(actor.id())?;
    Ok(post)
}

async fn summaries(
    state: &AppState,
    posts: &[Post],
    categories: &[Category],
) -> AppResult<Vec<PostResponse>> {
    let authors = load_authors(state.users.as_ref(), posts.iter().map(|p| p.user_id)).await?;
    let index = category_index(categories);
    Ok(posts
        .iter()
        .map(|p| post_response(p, &authors, &index))
        .collect())
}

/// GET /
pub async fn index(state: web::Data<AppState>) -> AppResult<HttpResponse> {
    let posts = state.posts.list(&PostFilter::All).await?;
    let categories = state.categories.list_all().await?;

    Ok(HttpResponse::Ok().json(PostListResponse {
        posts: summaries(&state, &posts, &categories).await?,
        categories: categories.iter().map(category_response).collect(),
    }))
}

/// GET /posts?category=&search=
pub async fn list(
    state: web::Data<AppState>,
    query: web::Query<ListQuery>,
) -> AppResult<HttpResponse> {
    let filter = PostFilter::from_query(query.category.as_deref(), query.search.as_deref());
    tracing::debug!(?filter, "Listing posts");

    let posts = state.posts.list(&filter).await?;
    let categories = state.categories.list_all().await?;

    Ok(HttpResponse::Ok().json(PostListResponse {
        posts: summaries(&state, &posts, &categories).await?,
        categories: categories.iter().map(category_response).collect(),
    }))
}

/// GET|POST /post/{id}
pub async fn show(state: web::Data<AppState>, path: web::Path<Uuid>) -> AppResult<HttpResponse> {
    let post = find_post(&state, path.into_inner()).await?;
    let comments = state.comments.find_by_post_id(post.id).await?;
    let category = state.categories.find_by_id(post.category_id).await?;

    let authors = load_authors(
        state.users.as_ref(),
        std::iter::once(post.user_id).chain(comments.iter().map(|c| c.user_id)),
    )
    .await?;
    let categories: Vec<Category> = category.into_iter().collect();

    Ok(HttpResponse::Ok().json(PostDetailResponse {
        post: post_response(&post, &authors, &category_index(&categories)),
        comments: comments
            .iter()
            .map(|c| comment_response(c, &authors))
            .collect(),
    }))
}

async fn form_view(
    state: &AppState,
    actor: &Actor,
    legend: &str,
    post: Option<&Post>,
) -> AppResult<PostFormView> {
    let categories = state.categories.list_all().await?;
    Ok(PostFormView {
        legend: legend.to_string(),
        categories: categories.iter().map(category_response).collect(),
        author_image_url: avatar_url(&actor.user),
        default_image_url: post_image_url(DEFAULT_POST_IMAGE),
        values: post.map(form_values),
    })
}

/// Submitted fields plus the optional image part.
async fn read_post_form(
    state: &AppState,
    payload: Multipart,
) -> AppResult<(PostForm, Option<UploadedFile>)> {
    let mut fields = MultipartFields::read(payload, state.max_upload_bytes).await?;
    let image = fields.take_file("post_image");
    let form = PostForm {
        title: fields.text("title"),
        content: fields.text("content"),
        description: fields.text("description"),
        category: fields.text("category"),
        post_image: image.as_ref().map(|f| f.filename.clone()),
    };
    Ok((form, image))
}

async fn save_post_image(
    state: &AppState,
    image: Option<&UploadedFile>,
) -> AppResult<Option<String>> {
    match image {
        Some(file) => Ok(Some(
            store_upload(state.images.as_ref(), ImageKind::PostImage, file).await?,
        )),
        None => Ok(None),
    }
}

/// GET /post/new
pub async fn new_form(state: web::Data<AppState>, actor: Actor) -> AppResult<HttpResponse> {
    Ok(HttpResponse::Ok().json(form_view(&state, &actor, "New POST", None).await?))
}

/// POST /post/new
pub async fn create(
    state: web::Data<AppState>,
    actor: Actor,
    payload: Multipart,
) -> AppResult<HttpResponse> {
    let (form, image) = read_post_form(&state, payload).await?;
    let categories = state.categories.list_all().await?;
    let category_id = form.validate(&categories)?;

    let image_file = save_post_image(&state, image.as_ref()).await?;
    let post = state
        .posts
        .save(Post::new(
            actor.id(),
            category_id,
            form.title,
            form.content,
            form.description,
            image_file,
        ))
        .await?;

    tracing::info!(post_id = %post.id, user_id = %actor.id(), "Post created");

    Ok(see_other("/posts").json(ApiResponse::message("Your post has been created")))
}

/// GET /post/{id}/update
pub async fn edit_form(
    state: web::Data<AppState>,
    actor: Actor,
    path: web::Path<Uuid>,
) -> AppResult<HttpResponse> {
    let post = owned_post(&state, &actor, path.into_inner()).await?;
    Ok(HttpResponse::Ok().json(form_view(&state, &actor, "Update Post", Some(&post)).await?))
}

/// POST /post/{id}/update
pub async fn update(
    state: web::Data<AppState>,
    actor: Actor,
    path: web::Path<Uuid>,
    payload: Multipart,
) -> AppResult<HttpResponse> {
    let mut post = owned_post(&state, &actor, path.into_inner()).await?;

    let (form, image) = read_post_form(&state, payload).await?;
    let categories = state.categories.list_all().await?;
    let category_id = form.validate(&categories)?;

    let image_file = save_post_image(&state, image.as_ref()).await?;
    post.apply_edit(
        category_id,
        form.title,
        form.content,
        form.description,
        image_file,
    );
    let post = state.posts.save(post).await?;

    tracing::info!(post_id = %post.id, "Post updated");

    Ok(see_other(&format!("/post/{}", post.id))
        .json(ApiResponse::message("Your post has been updated")))
}

/// GET|POST /post/{id}/delete_post
pub async fn delete(
    state: web::Data<AppState>,
    actor: Actor,
    path: web::Path<Uuid>,
) -> AppResult<HttpResponse> {
    let post = owned_post(&state, &actor, path.into_inner()).await?;
    let removed_comments = state.posts.delete_with_comments(post.id).await?;

    tracing::info!(post_id = %post.id, removed_comments, "Post deleted");

    Ok(see_other("/").json(ApiResponse::message("Your post has been deleted!")))
}
