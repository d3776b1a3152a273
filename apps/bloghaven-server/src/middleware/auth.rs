//! Session cookie extractors.
//!
//! The session is a signed token in the `session` cookie. Handlers that need
//! a logged-in user take an [`Actor`]; pages that merely adapt to one take an
//! [`OptionalActor`].

use actix_web::cookie::{Cookie, SameSite, time::Duration as CookieDuration};
use actix_web::http::{StatusCode, header};
use actix_web::{FromRequest, HttpRequest, HttpResponse, ResponseError, dev::Payload, web};
use futures::future::LocalBoxFuture;
use uuid::Uuid;

use bloghaven_core::domain::User;
use bloghaven_core::ports::{AuthError, BaseRepository, SessionClaims};
use bloghaven_shared::{ApiResponse, ErrorResponse};

use crate::state::AppState;

/// Name of the session cookie.
pub const SESSION_COOKIE: &str = "session";

/// Shown when a protected page is requested without a session.
pub const LOGIN_REQUIRED: &str = "Please log in to access this page.";

/// Cache key marking a session id as logged out.
pub fn revocation_key(session_id: Uuid) -> String {
    format!("session:revoked:{}", session_id)
}

/// Session cookie carrying `token`, valid for `max_age_seconds`.
pub fn session_cookie(token: String, max_age_seconds: i64, secure: bool) -> Cookie<'static> {
    Cookie::build(SESSION_COOKIE, token)
        .path("/")
        .http_only(true)
        .same_site(SameSite::Lax)
        .secure(secure)
        .max_age(CookieDuration::seconds(max_age_seconds))
        .finish()
}

/// Cookie that makes the browser drop the session cookie.
pub fn removal_cookie() -> Cookie<'static> {
    let mut cookie = Cookie::build(SESSION_COOKIE, "").path("/").finish();
    cookie.make_removal();
    cookie
}

/// The logged-in user of the current request.
#[derive(Debug, Clone)]
pub struct Actor {
    pub user: User,
    pub session: SessionClaims,
}

impl Actor {
    pub fn id(&self) -> Uuid {
        self.user.id
    }
}

/// Failed session lookup on a protected route.
#[derive(Debug)]
pub struct AuthenticationError {
    pub error: AuthError,
    /// Path to return to after logging in.
    pub next: String,
}

impl std::fmt::Display for AuthenticationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.error)
    }
}

impl ResponseError for AuthenticationError {
    fn status_code(&self) -> StatusCode {
        match &self.error {
            AuthError::Backend(_) | AuthError::HashingError(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
            _ => StatusCode::SEE_OTHER,
        }
    }

    fn error_response(&self) -> HttpResponse {
        if self.status_code() == StatusCode::INTERNAL_SERVER_ERROR {
            tracing::error!(error = %self.error, "Session lookup failed");
            return HttpResponse::InternalServerError().json(ErrorResponse::internal_error());
        }

        tracing::debug!(reason = %self.error, next = %self.next, "Redirecting to login");
        HttpResponse::SeeOther()
            .insert_header((header::LOCATION, login_location(&self.next)))
            .json(ApiResponse::failure(LOGIN_REQUIRED))
    }
}

/// `/login?next=<path>` with the path percent-encoded so its own query survives.
fn login_location(next: &str) -> String {
    match serde_urlencoded::to_string([("next", next)]) {
        Ok(query) => format!("/login?{query}"),
        Err(_) => "/login".to_string(),
    }
}

async fn resolve(state: web::Data<AppState>, token: Option<String>) -> Result<Actor, AuthError> {
    let token = token.ok_or(AuthError::MissingAuth)?;
    let session = state.tokens.validate_token(&token)?;

    if state.cache.exists(&revocation_key(session.session_id)).await {
        return Err(AuthError::SessionRevoked);
    }

    let user = state
        .users
        .find_by_id(session.user_id)
        .await
        .map_err(|e| AuthError::Backend(e.to_string()))?
        .ok_or(AuthError::UnknownUser)?;

    Ok(Actor { user, session })
}

impl FromRequest for Actor {
    type Error = AuthenticationError;
    type Future = LocalBoxFuture<'static, Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        let state = req.app_data::<web::Data<AppState>>().cloned();
        let token = req.cookie(SESSION_COOKIE).map(|c| c.value().to_string());
        let next = req
            .uri()
            .path_and_query()
            .map_or_else(|| req.path().to_string(), |pq| pq.as_str().to_string());

        Box::pin(async move {
            let Some(state) = state else {
                tracing::error!("AppState not found in app data");
                return Err(AuthenticationError {
                    error: AuthError::Backend("Server configuration error".to_string()),
                    next,
                });
            };

            resolve(state, token)
                .await
                .map_err(|error| AuthenticationError { error, next })
        })
    }
}

/// Optional actor extractor - doesn't fail if not authenticated.
pub struct OptionalActor(pub Option<Actor>);

impl FromRequest for OptionalActor {
    type Error = actix_web::Error;
    type Future = LocalBoxFuture<'static, Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, payload: &mut Payload) -> Self::Future {
        let actor = Actor::from_request(req, payload);
        Box::pin(async move { Ok(OptionalActor(actor.await.ok())) })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_session_cookie_attributes() {
        let cookie = session_cookie("token".into(), 3600, true);
        assert_eq!(cookie.name(), SESSION_COOKIE);
        assert_eq!(cookie.http_only(), Some(true));
        assert_eq!(cookie.secure(), Some(true));
        assert_eq!(cookie.same_site(), Some(SameSite::Lax));
        assert_eq!(cookie.max_age(), Some(CookieDuration::hours(1)));
    }

    #[test]
    fn test_removal_cookie_expires_immediately() {
        let cookie = removal_cookie();
        assert_eq!(cookie.value(), "");
        assert_eq!(cookie.max_age(), Some(CookieDuration::ZERO));
    }

    #[test]
    fn test_unauthenticated_redirects_to_login() {
        let err = AuthenticationError {
            error: AuthError::MissingAuth,
            next: "/account".into(),
        };
        let response = err.error_response();
        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        assert_eq!(
            response.headers().get(header::LOCATION).unwrap(),
            "/login?next=%2Faccount"
        );
    }

    #[test]
    fn test_login_location_keeps_query_of_next() {
        let next = "/posts?category=abc&search=a b#top";
        let location = login_location(next);
        assert!(!location.contains('&'));
        assert!(!location.contains('#'));

        let query = location.strip_prefix("/login?").unwrap();
        let decoded: Vec<(String, String)> = serde_urlencoded::from_str(query).unwrap();
        assert_eq!(decoded, vec![("next".to_string(), next.to_string())]);
    }

    #[test]
    fn test_backend_failure_is_server_error() {
        let err = AuthenticationError {
            error: AuthError::Backend("down".into()),
            next: "/".into(),
        };
        assert_eq!(err.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
