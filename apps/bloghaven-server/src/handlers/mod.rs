//! HTTP handlers and route configuration.

mod account;
mod auth;
mod comments;
mod health;
mod posts;
mod upload;
mod views;

use actix_web::http::header;
use actix_web::{HttpResponse, HttpResponseBuilder, web};

use crate::middleware::error::AppError;

/// `303 See Other` to `location`. Redirect bodies carry the flash message.
pub(crate) fn see_other(location: &str) -> HttpResponseBuilder {
    let mut builder = HttpResponse::SeeOther();
    builder.insert_header((header::LOCATION, location.to_string()));
    builder
}

async fn not_found() -> Result<HttpResponse, AppError> {
    Err(AppError::NotFound("No such page".to_string()))
}

/// Configure all application routes.
pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    // The only path parameter is a post id; anything unparsable names no post.
    let path_config = web::PathConfig::default()
        .error_handler(|_, _| AppError::NotFound("Post not found".to_string()).into());
    let form_config = web::FormConfig::default()
        .error_handler(|err, _| AppError::BadRequest(err.to_string()).into());
    let query_config = web::QueryConfig::default()
        .error_handler(|err, _| AppError::BadRequest(err.to_string()).into());

    cfg.app_data(path_config)
        .app_data(form_config)
        .app_data(query_config)
        .route("/", web::get().to(posts::index))
        .route("/health", web::get().to(health::health_check))
        .service(
            web::resource("/register")
                .route(web::get().to(auth::register_form))
                .route(web::post().to(auth::register)),
        )
        .service(
            web::resource("/login")
                .route(web::get().to(auth::login_form))
                .route(web::post().to(auth::login)),
        )
        .route("/logout", web::get().to(auth::logout))
        .service(
            web::resource("/account")
                .route(web::get().to(account::show))
                .route(web::post().to(account::update)),
        )
        .route("/posts", web::get().to(posts::list))
        // Registered before /post/{id} so "new" is never read as an id.
        .service(
            web::resource("/post/new")
                .route(web::get().to(posts::new_form))
                .route(web::post().to(posts::create)),
        )
        .service(
            web::resource("/post/{id}")
                .route(web::get().to(posts::show))
                .route(web::post().to(posts::show)),
        )
        .service(
            web::resource("/post/{id}/update")
                .route(web::get().to(posts::edit_form))
                .route(web::post().to(posts::update)),
        )
        .service(
            web::resource("/post/{id}/delete_post")
                .route(web::get().to(posts::delete))
                .route(web::post().to(posts::delete)),
        )
        .service(
            web::resource("/post/{id}/comment")
                .route(web::get().to(comments::create))
                .route(web::post().to(comments::create)),
        )
        .default_service(web::to(not_found));
}
