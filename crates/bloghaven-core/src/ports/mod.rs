//! Ports - trait definitions for external dependencies.
//! These are the "interfaces" that infrastructure must implement.

mod auth;
mod cache;
mod repository;
mod storage;

pub use auth::{AuthError, PasswordService, SessionClaims, SessionToken, TokenService};
pub use cache::{Cache, CacheError};
pub use repository::{
    BaseRepository, CategoryRepository, CommentRepository, PostFilter, PostRepository,
    UserRepository,
};
pub use storage::{ImageKind, ImageStore, StorageError};
