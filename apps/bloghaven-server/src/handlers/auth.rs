//! Registration, login and logout handlers.

use std::time::Duration;

use actix_web::{HttpResponse, web};
use serde::Deserialize;

use bloghaven_core::domain::User;
use bloghaven_core::ports::{AuthError, BaseRepository};
use bloghaven_core::validation::{LoginForm, RegistrationForm};
use bloghaven_shared::ApiResponse;
use bloghaven_shared::dto::FormView;

use super::see_other;
use crate::middleware::auth::{OptionalActor, removal_cookie, revocation_key, session_cookie};
use crate::middleware::error::{AppError, AppResult};
use crate::state::AppState;

fn form_view(form: &str, fields: &[&str]) -> HttpResponse {
    HttpResponse::Ok().json(FormView {
        form: form.to_string(),
        fields: fields.iter().map(|f| f.to_string()).collect(),
    })
}

/// Where to go after logging in.
#[derive(Debug, Deserialize)]
pub struct NextQuery {
    pub next: Option<String>,
}

/// Only same-site absolute paths are followed. Browsers drop tabs and
/// newlines from URLs, so any whitespace or control character is refused.
fn safe_next(next: Option<&str>) -> &str {
    match next {
        Some(path)
            if path.starts_with('/')
                && !path.starts_with("//")
                && !path.contains('\\')
                && !path.chars().any(|c| c.is_control() || c.is_whitespace()) =>
        {
            path
        }
        _ => "/account",
    }
}

/// GET /register
pub async fn register_form(actor: OptionalActor) -> HttpResponse {
    if actor.0.is_some() {
        return see_other("/").finish();
    }
    form_view("register", &["username", "email", "password", "confirm_password"])
}

/// POST /register
pub async fn register(
    state: web::Data<AppState>,
    actor: OptionalActor,
    form: web::Form<RegistrationForm>,
) -> AppResult<HttpResponse> {
    if actor.0.is_some() {
        return Ok(see_other("/").finish());
    }

    let form = form.into_inner();
    form.validate(state.users.as_ref()).await?;

    let password_hash = state.passwords.hash(&form.password)?;
    let user = state
        .users
        .save(User::new(form.username, form.email, password_hash))
        .await?;

    tracing::info!(user_id = %user.id, "Account created");

    Ok(see_other("/login").json(ApiResponse::message("Account has been created!")))
}

/// GET /login
pub async fn login_form(actor: OptionalActor) -> HttpResponse {
    if actor.0.is_some() {
        return see_other("/").finish();
    }
    form_view("login", &["email", "password"])
}

/// POST /login
pub async fn login(
    state: web::Data<AppState>,
    query: web::Query<NextQuery>,
    form: web::Form<LoginForm>,
) -> AppResult<HttpResponse> {
    let form = form.into_inner();
    form.validate()?;

    let user = match state.users.find_by_email(&form.email).await? {
        Some(user) if state.passwords.verify(&form.password, &user.password_hash)? => user,
        _ => {
            tracing::info!("Login rejected");
            return Err(AuthError::InvalidCredentials.into());
        }
    };

    let issued = state.tokens.generate_token(user.id)?;
    let cookie = session_cookie(
        issued.token,
        state.tokens.expiration_seconds(),
        state.cookie_secure,
    );

    tracing::info!(user_id = %user.id, session_id = %issued.claims.session_id, "Logged in");

    Ok(see_other(safe_next(query.next.as_deref()))
        .cookie(cookie)
        .json(ApiResponse::ok_with_message(
            super::views::account_response(&user),
            "Logged in",
        )))
}

/// GET /logout
pub async fn logout(state: web::Data<AppState>, actor: OptionalActor) -> AppResult<HttpResponse> {
    if let Some(actor) = actor.0 {
        let remaining = actor.session.exp - chrono::Utc::now().timestamp();
        let ttl = Duration::from_secs(remaining.max(1) as u64);

        state
            .cache
            .set(&revocation_key(actor.session.session_id), Some(ttl))
            .await
            .map_err(|e| AppError::Internal(e.to_string()))?;

        tracing::info!(user_id = %actor.id(), session_id = %actor.session.session_id, "Logged out");
    }

    Ok(see_other("/").cookie(removal_cookie()).finish())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_safe_next_accepts_local_paths() {
        assert_eq!(safe_next(Some("/post/new")), "/post/new");
    }

    #[test]
    fn test_safe_next_rejects_other_sites() {
        assert_eq!(safe_next(None), "/account");
        assert_eq!(safe_next(Some("https://evil.example")), "/account");
        assert_eq!(safe_next(Some("//evil.example")), "/account");
        assert_eq!(safe_next(Some("/\\evil.example")), "/account");
        assert_eq!(safe_next(Some("/\t/evil.example")), "/account");
        assert_eq!(safe_next(Some("/\n/evil.example")), "/account");
        assert_eq!(safe_next(Some("/ /evil.example")), "/account");
    }
}
