//! Session and password ports.

use uuid::Uuid;

/// Claims carried by a session token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionClaims {
    pub user_id: Uuid,
    /// Random per-login identifier, used to revoke a single session.
    pub session_id: Uuid,
    pub issued_at: i64,
    pub exp: i64,
}

/// A freshly issued session token together with its decoded claims.
#[derive(Debug, Clone)]
pub struct SessionToken {
    pub token: String,
    pub claims: SessionClaims,
}

/// Token service trait for signed session tokens.
pub trait TokenService: Send + Sync {
    /// Issue a session token for a user.
    fn generate_token(&self, user_id: Uuid) -> Result<SessionToken, AuthError>;

    /// Validate and decode a token.
    fn validate_token(&self, token: &str) -> Result<SessionClaims, AuthError>;

    /// Lifetime of issued tokens.
    fn expiration_seconds(&self) -> i64;
}

/// Password hashing service.
pub trait PasswordService: Send + Sync {
    /// Hash a plain text password.
    fn hash(&self, password: &str) -> Result<String, AuthError>;

    /// Verify a password against a hash.
    fn verify(&self, password: &str, hash: &str) -> Result<bool, AuthError>;
}

/// Authentication errors.
#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    #[error("Invalid credentials")]
    InvalidCredentials,

    #[error("Session expired")]
    TokenExpired,

    #[error("Invalid session token: {0}")]
    InvalidToken(String),

    #[error("No session cookie")]
    MissingAuth,

    #[error("Session has been logged out")]
    SessionRevoked,

    #[error("Session user no longer exists")]
    UnknownUser,

    #[error("Hashing error: {0}")]
    HashingError(String),

    #[error("Session backend error: {0}")]
    Backend(String),
}
