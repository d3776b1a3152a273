use async_trait::async_trait;
use uuid::Uuid;

use crate::domain::{Category, Comment, Post, User};
use crate::error::RepoError;

/// Generic repository trait defining standard CRUD operations.
#[async_trait]
pub trait BaseRepository<T, ID>: Send + Sync {
    /// Find an entity by its unique ID.
    async fn find_by_id(&self, id: ID) -> Result<Option<T>, RepoError>;

    /// Save an entity (create or update).
    async fn save(&self, entity: T) -> Result<T, RepoError>;

    /// Delete an entity by its ID.
    async fn delete(&self, id: ID) -> Result<(), RepoError>;
}

/// User repository with lookups used by login and the uniqueness checks.
#[async_trait]
pub trait UserRepository: BaseRepository<User, Uuid> {
    async fn find_by_email(&self, email: &str) -> Result<Option<User>, RepoError>;

    async fn find_by_username(&self, username: &str) -> Result<Option<User>, RepoError>;

    /// Batch lookup for rendering authors. Unknown ids are skipped.
    async fn find_by_ids(&self, ids: &[Uuid]) -> Result<Vec<User>, RepoError>;
}

/// Category repository.
#[async_trait]
pub trait CategoryRepository: BaseRepository<Category, Uuid> {
    /// All categories ordered by name.
    async fn list_all(&self) -> Result<Vec<Category>, RepoError>;
}

/// Which posts a listing should return.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PostFilter {
    All,
    /// Exact category id.
    Category(Uuid),
    /// Case-insensitive substring of title or content.
    Search(String),
    /// A filter that can never match, e.g. a malformed category id.
    NoMatch,
}

impl PostFilter {
    /// Build a filter from the `category` and `search` query parameters.
    ///
    /// A category takes priority over a search term. Blank values are ignored.
    pub fn from_query(category: Option<&str>, search: Option<&str>) -> Self {
        let category = category.map(str::trim).filter(|c| !c.is_empty());
        let search = search.map(str::trim).filter(|s| !s.is_empty());

        match (category, search) {
            (Some(category), _) => match Uuid::parse_str(category) {
                Ok(id) => PostFilter::Category(id),
                Err(_) => PostFilter::NoMatch,
            },
            (None, Some(term)) => PostFilter::Search(term.to_string()),
            (None, None) => PostFilter::All,
        }
    }

    /// In-process evaluation of the filter.
    pub fn matches(&self, post: &Post) -> bool {
        match self {
            PostFilter::All => true,
            PostFilter::Category(id) => post.category_id == *id,
            PostFilter::Search(term) => {
                let needle = term.to_lowercase();
                post.title.to_lowercase().contains(&needle)
                    || post.content.to_lowercase().contains(&needle)
            }
            PostFilter::NoMatch => false,
        }
    }
}

/// Post repository.
#[async_trait]
pub trait PostRepository: BaseRepository<Post, Uuid> {
    /// Posts matching `filter`, newest first.
    async fn list(&self, filter: &PostFilter) -> Result<Vec<Post>, RepoError>;

    /// Delete a post and every comment on it in one transaction.
    /// Returns the number of comments removed.
    async fn delete_with_comments(&self, id: Uuid) -> Result<u64, RepoError>;
}

/// Comment repository.
#[async_trait]
pub trait CommentRepository: BaseRepository<Comment, Uuid> {
    /// Comments on a post, oldest first.
    async fn find_by_post_id(&self, post_id: Uuid) -> Result<Vec<Comment>, RepoError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    fn post(title: &str, content: &str, category_id: Uuid) -> Post {
        Post::new(
            Uuid::new_v4(),
            category_id,
            title.into(),
            content.into(),
            String::new(),
            None,
        )
    }

    #[test]
    fn test_category_takes_priority_over_search() {
        let id = Uuid::new_v4();
        let filter = PostFilter::from_query(Some(&id.to_string()), Some("foo"));
        assert_eq!(filter, PostFilter::Category(id));
    }

    #[test]
    fn test_blank_parameters_are_ignored() {
        assert_eq!(PostFilter::from_query(Some(""), Some("  ")), PostFilter::All);
        assert_eq!(
            PostFilter::from_query(Some(" "), Some("rust")),
            PostFilter::Search("rust".into())
        );
    }

    #[test]
    fn test_malformed_category_matches_nothing() {
        let filter = PostFilter::from_query(Some("42"), None);
        assert_eq!(filter, PostFilter::NoMatch);
        assert!(!filter.matches(&post("a", "b", Uuid::new_v4())));
    }

    #[test]
    fn test_search_is_case_insensitive_on_title_or_content() {
        let filter = PostFilter::Search("foo".into());
        let category = Uuid::new_v4();

        assert!(filter.matches(&post("All about FOO", "x", category)));
        assert!(filter.matches(&post("x", "a Foobar story", category)));
        assert!(!filter.matches(&post("bar", "baz", category)));
    }
}
