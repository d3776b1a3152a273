use async_trait::async_trait;
use std::time::Duration;

/// Cache trait - abstraction over expiring key backends.
///
/// Used to remember revoked sessions until their tokens expire.
#[async_trait]
pub trait Cache: Send + Sync {
    /// Store a key with optional TTL.
    async fn set(&self, key: &str, ttl: Option<Duration>) -> Result<(), CacheError>;

    /// Check if a live (unexpired) key exists.
    async fn exists(&self, key: &str) -> bool;
}

/// Cache operation errors.
#[derive(Debug, thiserror::Error)]
pub enum CacheError {
    #[error("Operation failed: {0}")]
    Operation(String),
}
