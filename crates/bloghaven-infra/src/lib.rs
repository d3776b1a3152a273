//! # BlogHaven Infrastructure
//!
//! Concrete implementations of the ports defined in `bloghaven-core`.
//!
//! ## Feature Flags
//!
//! - `full` (default) - All features enabled
//! - `minimal` - No database driver, in-memory store only
//! - `postgres` - PostgreSQL store via SeaORM

pub mod auth;
pub mod cache;
pub mod database;
pub mod storage;

pub use auth::{Argon2PasswordService, JwtConfig, JwtTokenService};
pub use cache::InMemoryCache;
pub use database::{DatabaseConfig, InMemoryStore};
pub use storage::LocalImageStore;

#[cfg(feature = "postgres")]
pub use database::DatabaseConnections;
