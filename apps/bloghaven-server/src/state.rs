//! Application state - the store handles and services injected into handlers.

use std::sync::Arc;

use bloghaven_core::domain::DEFAULT_CATEGORIES;
use bloghaven_core::ports::{
    Cache, CategoryRepository, CommentRepository, ImageStore, PasswordService, PostRepository,
    TokenService, UserRepository,
};
use bloghaven_infra::{
    Argon2PasswordService, InMemoryCache, InMemoryStore, JwtTokenService, LocalImageStore,
};

use crate::config::AppConfig;

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    pub users: Arc<dyn UserRepository>,
    pub categories: Arc<dyn CategoryRepository>,
    pub posts: Arc<dyn PostRepository>,
    pub comments: Arc<dyn CommentRepository>,
    pub cache: Arc<dyn Cache>,
    pub images: Arc<dyn ImageStore>,
    pub tokens: Arc<dyn TokenService>,
    pub passwords: Arc<dyn PasswordService>,
    pub cookie_secure: bool,
    pub max_upload_bytes: usize,
}

/// The four repositories, from whichever store is in use.
struct Repositories {
    users: Arc<dyn UserRepository>,
    categories: Arc<dyn CategoryRepository>,
    posts: Arc<dyn PostRepository>,
    comments: Arc<dyn CommentRepository>,
}

impl Repositories {
    fn in_memory() -> Self {
        let store = Arc::new(InMemoryStore::with_categories(DEFAULT_CATEGORIES));
        Self {
            users: store.clone(),
            categories: store.clone(),
            posts: store.clone(),
            comments: store,
        }
    }

    #[cfg(feature = "postgres")]
    async fn connect(config: &AppConfig) -> Self {
        use bloghaven_infra::DatabaseConnections;
        use bloghaven_infra::database::{
            PostgresCategoryRepository, PostgresCommentRepository, PostgresPostRepository,
            PostgresUserRepository,
        };

        let Some(db_config) = &config.database else {
            tracing::warn!("DATABASE_URL not set. Running without database (in-memory mode).");
            return Self::in_memory();
        };

        match DatabaseConnections::init(db_config).await {
            Ok(connections) => {
                let conn = connections.main;
                Self {
                    users: Arc::new(PostgresUserRepository::new(conn.clone())),
                    categories: Arc::new(PostgresCategoryRepository::new(conn.clone())),
                    posts: Arc::new(PostgresPostRepository::new(conn.clone())),
                    comments: Arc::new(PostgresCommentRepository::new(conn)),
                }
            }
            Err(e) => {
                tracing::error!(
                    "Failed to connect to database: {}. Using in-memory fallback.",
                    e
                );
                Self::in_memory()
            }
        }
    }

    #[cfg(not(feature = "postgres"))]
    async fn connect(_config: &AppConfig) -> Self {
        tracing::info!("Running without postgres feature - using in-memory store");
        Self::in_memory()
    }
}

impl AppState {
    /// Build the application state with appropriate implementations.
    pub async fn new(config: &AppConfig) -> Self {
        let state = Self::assemble(config, Repositories::connect(config).await);
        tracing::info!(
            upload_root = %config.upload_root.display(),
            "Application state initialized"
        );
        state
    }

    /// State backed by the in-memory store, seeded with the default categories.
    pub fn in_memory(config: &AppConfig) -> Self {
        Self::assemble(config, Repositories::in_memory())
    }

    fn assemble(config: &AppConfig, repos: Repositories) -> Self {
        Self {
            users: repos.users,
            categories: repos.categories,
            posts: repos.posts,
            comments: repos.comments,
            cache: Arc::new(InMemoryCache::new()),
            images: Arc::new(LocalImageStore::new(config.upload_root.clone())),
            tokens: Arc::new(JwtTokenService::new(config.session.clone())),
            passwords: Arc::new(Argon2PasswordService::new()),
            cookie_secure: config.cookie_secure,
            max_upload_bytes: config.max_upload_bytes,
        }
    }
}
