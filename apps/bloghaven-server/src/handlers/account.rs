//! Account page.

use actix_multipart::Multipart;
use actix_web::{HttpResponse, web};

use bloghaven_core::ports::{BaseRepository, ImageKind};
use bloghaven_core::validation::UpdateAccountForm;
use bloghaven_shared::ApiResponse;

use super::see_other;
use super::upload::{MultipartFields, store_upload};
use super::views::account_response;
use crate::middleware::auth::Actor;
use crate::middleware::error::AppResult;
use crate::state::AppState;

/// GET /account
pub async fn show(actor: Actor) -> HttpResponse {
    HttpResponse::Ok().json(ApiResponse::ok(account_response(&actor.user)))
}

/// POST /account - multipart `username`, `email`, optional `picture`.
pub async fn update(
    state: web::Data<AppState>,
    actor: Actor,
    payload: Multipart,
) -> AppResult<HttpResponse> {
    let mut fields = MultipartFields::read(payload, state.max_upload_bytes).await?;
    let picture = fields.take_file("picture");

    let form = UpdateAccountForm {
        username: fields.text("username"),
        email: fields.text("email"),
        picture: picture.as_ref().map(|f| f.filename.clone()),
    };
    form.validate(&actor.user, state.users.as_ref()).await?;

    let image_file = match &picture {
        Some(file) => Some(store_upload(state.images.as_ref(), ImageKind::Avatar, file).await?),
        None => None,
    };

    let mut user = actor.user;
    user.update_profile(form.username, form.email, image_file);
    let user = state.users.save(user).await?;

    tracing::info!(user_id = %user.id, "Account updated");

    Ok(see_other("/account").json(ApiResponse::ok_with_message(
        account_response(&user),
        "Your Account has been updated!",
    )))
}
