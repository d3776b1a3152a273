use bloghaven_core::domain::{Post, User};
use bloghaven_core::error::RepoError;
use bloghaven_core::ports::{BaseRepository, PostFilter, PostRepository, UserRepository};
use sea_orm::{DatabaseBackend, MockDatabase, MockExecResult};

use crate::database::entity::{post, user};
use crate::database::postgres_repo::{PostgresPostRepository, PostgresUserRepository};

fn post_model(title: &str) -> post::Model {
    let now = chrono::Utc::now();
    post::Model {
        id: uuid::Uuid::new_v4(),
        user_id: uuid::Uuid::new_v4(),
        category_id: uuid::Uuid::new_v4(),
        title: title.to_owned(),
        content: "Content".to_owned(),
        description: "Description".to_owned(),
        image_file: "default_image.jpg".to_owned(),
        created_at: now.into(),
        updated_at: now.into(),
    }
}

#[tokio::test]
async fn test_find_post_by_id() {
    let model = post_model("Test Post");
    let post_id = model.id;

    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_query_results(vec![vec![model]])
        .into_connection();

    let repo = PostgresPostRepository::new(db);

    let result: Option<Post> = repo.find_by_id(post_id).await.unwrap();

    let post = result.expect("post");
    assert_eq!(post.title, "Test Post");
    assert_eq!(post.id, post_id);
}

#[tokio::test]
async fn test_save_user_upserts_and_returns_row() {
    let user = User::new("alice".into(), "alice@example.com".into(), "hash".into());
    let row = user::Model {
        id: user.id,
        username: user.username.clone(),
        email: user.email.clone(),
        password_hash: user.password_hash.clone(),
        image_file: user.image_file.clone(),
        created_at: user.created_at.into(),
        updated_at: user.updated_at.into(),
    };

    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_query_results(vec![vec![row]])
        .into_connection();
    let repo = PostgresUserRepository::new(db);

    let saved = repo.save(user.clone()).await.unwrap();
    assert_eq!(saved.id, user.id);

    let log = repo.db.into_transaction_log();
    let sql = format!("{:?}", log[0]);
    assert!(sql.contains("ON CONFLICT"), "{sql}");
}

#[tokio::test]
async fn test_find_by_email() {
    let now = chrono::Utc::now();
    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_query_results(vec![vec![user::Model {
            id: uuid::Uuid::new_v4(),
            username: "alice".into(),
            email: "alice@example.com".into(),
            password_hash: "hash".into(),
            image_file: "default.jpg".into(),
            created_at: now.into(),
            updated_at: now.into(),
        }]])
        .into_connection();
    let repo = PostgresUserRepository::new(db);

    let found = repo.find_by_email("alice@example.com").await.unwrap();
    assert_eq!(found.map(|u| u.username).as_deref(), Some("alice"));
}

#[tokio::test]
async fn test_search_uses_case_insensitive_like() {
    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_query_results(vec![vec![post_model("Foo fighters")]])
        .into_connection();
    let repo = PostgresPostRepository::new(db);

    let posts = repo.list(&PostFilter::Search("FOO".into())).await.unwrap();
    assert_eq!(posts.len(), 1);

    let sql = format!("{:?}", repo.db.into_transaction_log()[0]);
    assert!(sql.contains("LOWER"), "{sql}");
    assert!(sql.contains("%foo%"), "{sql}");
}

#[tokio::test]
async fn test_no_match_filter_skips_the_database() {
    let db = MockDatabase::new(DatabaseBackend::Postgres).into_connection();
    let repo = PostgresPostRepository::new(db);

    let posts = repo.list(&PostFilter::NoMatch).await.unwrap();
    assert!(posts.is_empty());
    assert!(repo.db.into_transaction_log().is_empty());
}

#[tokio::test]
async fn test_delete_with_comments_reports_removed_comments() {
    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_exec_results(vec![
            MockExecResult {
                last_insert_id: 0,
                rows_affected: 3,
            },
            MockExecResult {
                last_insert_id: 0,
                rows_affected: 1,
            },
        ])
        .into_connection();
    let repo = PostgresPostRepository::new(db);

    let removed = repo.delete_with_comments(uuid::Uuid::new_v4()).await.unwrap();
    assert_eq!(removed, 3);
}

#[tokio::test]
async fn test_delete_with_comments_unknown_post() {
    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_exec_results(vec![
            MockExecResult {
                last_insert_id: 0,
                rows_affected: 0,
            },
            MockExecResult {
                last_insert_id: 0,
                rows_affected: 0,
            },
        ])
        .into_connection();
    let repo = PostgresPostRepository::new(db);

    assert!(matches!(
        repo.delete_with_comments(uuid::Uuid::new_v4()).await,
        Err(RepoError::NotFound)
    ));
}
