//! In-memory store used when no database is configured, and by tests.
//!
//! Mirrors the constraints of the relational schema: unique usernames and
//! emails, and foreign keys from posts and comments to their parents.

use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::RwLock;
use uuid::Uuid;

use bloghaven_core::domain::{Category, Comment, Post, User};
use bloghaven_core::error::RepoError;
use bloghaven_core::ports::{
    BaseRepository, CategoryRepository, CommentRepository, PostFilter, PostRepository,
    UserRepository,
};

use super::mask_email;

#[derive(Default)]
struct Tables {
    users: HashMap<Uuid, User>,
    categories: HashMap<Uuid, Category>,
    posts: HashMap<Uuid, Post>,
    comments: HashMap<Uuid, Comment>,
}

/// All four tables behind one async RwLock.
#[derive(Default)]
pub struct InMemoryStore {
    tables: RwLock<Tables>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store pre-populated with one category per name.
    pub fn with_categories<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let categories = names
            .into_iter()
            .map(Category::new)
            .map(|c| (c.id, c))
            .collect();

        Self {
            tables: RwLock::new(Tables {
                categories,
                ..Tables::default()
            }),
        }
    }
}

fn missing(what: &str, id: Uuid) -> RepoError {
    RepoError::Constraint(format!("{what} {id} does not exist"))
}

#[async_trait]
impl BaseRepository<User, Uuid> for InMemoryStore {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>, RepoError> {
        Ok(self.tables.read().await.users.get(&id).cloned())
    }

    async fn save(&self, user: User) -> Result<User, RepoError> {
        let mut tables = self.tables.write().await;

        for other in tables.users.values().filter(|u| u.id != user.id) {
            if other.username == user.username {
                return Err(RepoError::Constraint("username already exists".into()));
            }
            if other.email == user.email {
                return Err(RepoError::Constraint("email already exists".into()));
            }
        }

        tables.users.insert(user.id, user.clone());
        Ok(user)
    }

    async fn delete(&self, id: Uuid) -> Result<(), RepoError> {
        self.tables
            .write()
            .await
            .users
            .remove(&id)
            .map(|_| ())
            .ok_or(RepoError::NotFound)
    }
}

#[async_trait]
impl UserRepository for InMemoryStore {
    async fn find_by_email(&self, email: &str) -> Result<Option<User>, RepoError> {
        tracing::debug!(user_email = %mask_email(email), "Finding user by email");
        let tables = self.tables.read().await;
        Ok(tables.users.values().find(|u| u.email == email).cloned())
    }

    async fn find_by_username(&self, username: &str) -> Result<Option<User>, RepoError> {
        let tables = self.tables.read().await;
        Ok(tables.users.values().find(|u| u.username == username).cloned())
    }

    async fn find_by_ids(&self, ids: &[Uuid]) -> Result<Vec<User>, RepoError> {
        let tables = self.tables.read().await;
        Ok(ids
            .iter()
            .filter_map(|id| tables.users.get(id).cloned())
            .collect())
    }
}

#[async_trait]
impl BaseRepository<Category, Uuid> for InMemoryStore {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Category>, RepoError> {
        Ok(self.tables.read().await.categories.get(&id).cloned())
    }

    async fn save(&self, category: Category) -> Result<Category, RepoError> {
        self.tables
            .write()
            .await
            .categories
            .insert(category.id, category.clone());
        Ok(category)
    }

    async fn delete(&self, id: Uuid) -> Result<(), RepoError> {
        let mut tables = self.tables.write().await;
        if tables.posts.values().any(|p| p.category_id == id) {
            return Err(RepoError::Constraint(format!("category {id} is in use")));
        }
        tables
            .categories
            .remove(&id)
            .map(|_| ())
            .ok_or(RepoError::NotFound)
    }
}

#[async_trait]
impl CategoryRepository for InMemoryStore {
    async fn list_all(&self) -> Result<Vec<Category>, RepoError> {
        let mut categories: Vec<Category> =
            self.tables.read().await.categories.values().cloned().collect();
        categories.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(categories)
    }
}

#[async_trait]
impl BaseRepository<Post, Uuid> for InMemoryStore {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Post>, RepoError> {
        Ok(self.tables.read().await.posts.get(&id).cloned())
    }

    async fn save(&self, post: Post) -> Result<Post, RepoError> {
        let mut tables = self.tables.write().await;
        if !tables.users.contains_key(&post.user_id) {
            return Err(missing("user", post.user_id));
        }
        if !tables.categories.contains_key(&post.category_id) {
            return Err(missing("category", post.category_id));
        }
        tables.posts.insert(post.id, post.clone());
        Ok(post)
    }

    async fn delete(&self, id: Uuid) -> Result<(), RepoError> {
        let mut tables = self.tables.write().await;
        if tables.comments.values().any(|c| c.post_id == id) {
            return Err(RepoError::Constraint(format!("post {id} still has comments")));
        }
        tables.posts.remove(&id).map(|_| ()).ok_or(RepoError::NotFound)
    }
}

#[async_trait]
impl PostRepository for InMemoryStore {
    async fn list(&self, filter: &PostFilter) -> Result<Vec<Post>, RepoError> {
        let tables = self.tables.read().await;
        let mut posts: Vec<Post> = tables
            .posts
            .values()
            .filter(|p| filter.matches(p))
            .cloned()
            .collect();
        posts.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(posts)
    }

    async fn delete_with_comments(&self, id: Uuid) -> Result<u64, RepoError> {
        let mut tables = self.tables.write().await;
        if tables.posts.remove(&id).is_none() {
            return Err(RepoError::NotFound);
        }
        let before = tables.comments.len();
        tables.comments.retain(|_, c| c.post_id != id);
        Ok((before - tables.comments.len()) as u64)
    }
}

#[async_trait]
impl BaseRepository<Comment, Uuid> for InMemoryStore {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Comment>, RepoError> {
        Ok(self.tables.read().await.comments.get(&id).cloned())
    }

    async fn save(&self, comment: Comment) -> Result<Comment, RepoError> {
        let mut tables = self.tables.write().await;
        if !tables.posts.contains_key(&comment.post_id) {
            return Err(missing("post", comment.post_id));
        }
        if !tables.users.contains_key(&comment.user_id) {
            return Err(missing("user", comment.user_id));
        }
        tables.comments.insert(comment.id, comment.clone());
        Ok(comment)
    }

    async fn delete(&self, id: Uuid) -> Result<(), RepoError> {
        self.tables
            .write()
            .await
            .comments
            .remove(&id)
            .map(|_| ())
            .ok_or(RepoError::NotFound)
    }
}

#[async_trait]
impl CommentRepository for InMemoryStore {
    async fn find_by_post_id(&self, post_id: Uuid) -> Result<Vec<Comment>, RepoError> {
        let tables = self.tables.read().await;
        let mut comments: Vec<Comment> = tables
            .comments
            .values()
            .filter(|c| c.post_id == post_id)
            .cloned()
            .collect();
        comments.sort_by(|a, b| a.created_at.cmp(&b.created_at));
        Ok(comments)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn seeded() -> (InMemoryStore, User, Category) {
        let store = InMemoryStore::with_categories(["Travel", "Food"]);
        let categories = CategoryRepository::list_all(&store).await.unwrap();
        let user = User::new("alice".into(), "alice@example.com".into(), "hash".into());
        let users: &dyn UserRepository = &store;
        users.save(user.clone()).await.unwrap();
        (store, user, categories[0].clone())
    }

    fn post(user: &User, category: &Category, title: &str) -> Post {
        Post::new(
            user.id,
            category.id,
            title.into(),
            "content".into(),
            "description".into(),
            None,
        )
    }

    #[tokio::test]
    async fn test_categories_sorted_by_name() {
        let store = InMemoryStore::with_categories(["Travel", "Food", "Business"]);
        let names: Vec<String> = CategoryRepository::list_all(&store)
            .await
            .unwrap()
            .into_iter()
            .map(|c| c.name)
            .collect();
        assert_eq!(names, ["Business", "Food", "Travel"]);
    }

    #[tokio::test]
    async fn test_unique_username_and_email() {
        let (store, alice, _) = seeded().await;
        let users: &dyn UserRepository = &store;

        let same_name = User::new("alice".into(), "other@example.com".into(), "h".into());
        let same_email = User::new("other".into(), "alice@example.com".into(), "h".into());

        assert!(matches!(users.save(same_name).await, Err(RepoError::Constraint(_))));
        assert!(matches!(users.save(same_email).await, Err(RepoError::Constraint(_))));

        // Re-saving the same record is an update, not a conflict.
        assert!(users.save(alice).await.is_ok());
    }

    #[tokio::test]
    async fn test_post_requires_existing_author_and_category() {
        let (store, alice, category) = seeded().await;
        let posts: &dyn PostRepository = &store;
        let stranger = User::new("bob".into(), "bob@example.com".into(), "h".into());

        assert!(posts.save(post(&stranger, &category, "x")).await.is_err());
        assert!(
            posts
                .save(post(&alice, &Category::new("Ghost"), "x"))
                .await
                .is_err()
        );
        assert!(posts.save(post(&alice, &category, "x")).await.is_ok());
    }

    #[tokio::test]
    async fn test_list_is_newest_first() {
        let (store, alice, category) = seeded().await;
        let posts: &dyn PostRepository = &store;

        let mut older = post(&alice, &category, "older");
        older.created_at -= chrono::TimeDelta::hours(1);
        posts.save(older).await.unwrap();
        posts.save(post(&alice, &category, "newer")).await.unwrap();

        let titles: Vec<String> = posts
            .list(&PostFilter::All)
            .await
            .unwrap()
            .into_iter()
            .map(|p| p.title)
            .collect();
        assert_eq!(titles, ["newer", "older"]);
    }

    #[tokio::test]
    async fn test_delete_with_comments_removes_only_that_posts_comments() {
        let (store, alice, category) = seeded().await;
        let posts: &dyn PostRepository = &store;
        let comments: &dyn CommentRepository = &store;

        let doomed = posts.save(post(&alice, &category, "doomed")).await.unwrap();
        let kept = posts.save(post(&alice, &category, "kept")).await.unwrap();
        for target in [&doomed, &doomed, &kept] {
            comments
                .save(Comment::new(target.id, alice.id, "hi".into()))
                .await
                .unwrap();
        }

        assert!(matches!(posts.delete(doomed.id).await, Err(RepoError::Constraint(_))));
        assert_eq!(posts.delete_with_comments(doomed.id).await.unwrap(), 2);
        assert!(posts.find_by_id(doomed.id).await.unwrap().is_none());
        assert!(comments.find_by_post_id(doomed.id).await.unwrap().is_empty());
        assert_eq!(comments.find_by_post_id(kept.id).await.unwrap().len(), 1);
        assert!(matches!(
            posts.delete_with_comments(doomed.id).await,
            Err(RepoError::NotFound)
        ));
    }
}
