//! Form declarations for every user-facing submission.

use serde::Deserialize;
use uuid::Uuid;

use super::{Field, FieldErrors};
use crate::domain::{Category, User};
use crate::error::DomainError;
use crate::ports::UserRepository;

pub const ALLOWED_IMAGE_EXTENSIONS: [&str; 3] = ["jpg", "png", "svg"];
pub const USERNAME_TAKEN: &str = "Username Already Exist";
pub const EMAIL_TAKEN: &str = "Email Already Exist";

const USERNAME_MIN: usize = 2;
const USERNAME_MAX: usize = 20;

/// Sign-up form.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct RegistrationForm {
    pub username: String,
    pub email: String,
    pub password: String,
    pub confirm_password: String,
}

impl RegistrationForm {
    pub async fn validate(&self, users: &dyn UserRepository) -> Result<(), DomainError> {
        let mut errors = FieldErrors::new();
        errors.record("username", username_rules(&self.username));
        errors.record("email", Field::new(&self.email).required().email());
        errors.record("password", Field::new(&self.password).required());
        errors.record(
            "confirm_password",
            Field::new(&self.confirm_password)
                .required()
                .equal_to(&self.password, "password"),
        );

        check_unique(&mut errors, users, &self.username, &self.email, None).await?;
        errors.into_result().map_err(DomainError::from)
    }
}

/// Sign-in form.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct LoginForm {
    pub email: String,
    pub password: String,
}

impl LoginForm {
    pub fn validate(&self) -> Result<(), FieldErrors> {
        let mut errors = FieldErrors::new();
        errors.record("email", Field::new(&self.email).required().email());
        errors.record("password", Field::new(&self.password).required());
        errors.into_result()
    }
}

/// Profile edit form. `picture` is the uploaded file's original name, if any.
#[derive(Debug, Clone, Default)]
pub struct UpdateAccountForm {
    pub username: String,
    pub email: String,
    pub picture: Option<String>,
}

impl UpdateAccountForm {
    /// Prefill from the current actor.
    pub fn from_user(user: &User) -> Self {
        Self {
            username: user.username.clone(),
            email: user.email.clone(),
            picture: None,
        }
    }

    /// Validate on behalf of `actor`, whose own username and email stay allowed.
    pub async fn validate(
        &self,
        actor: &User,
        users: &dyn UserRepository,
    ) -> Result<(), DomainError> {
        let mut errors = FieldErrors::new();
        errors.record("username", username_rules(&self.username));
        errors.record("email", Field::new(&self.email).required().email());
        if let Some(picture) = &self.picture {
            errors.record(
                "picture",
                Field::new(picture).file_allowed(&ALLOWED_IMAGE_EXTENSIONS),
            );
        }

        let username = (self.username != actor.username).then_some(self.username.as_str());
        let email = (self.email != actor.email).then_some(self.email.as_str());
        check_unique(
            &mut errors,
            users,
            username.unwrap_or_default(),
            email.unwrap_or_default(),
            Some(actor.id),
        )
        .await?;

        errors.into_result().map_err(DomainError::from)
    }
}

/// Post create/edit form. `category` is the raw submitted category id.
#[derive(Debug, Clone, Default)]
pub struct PostForm {
    pub title: String,
    pub content: String,
    pub description: String,
    pub category: String,
    pub post_image: Option<String>,
}

impl PostForm {
    /// Validate against the category choices loaded for this request and
    /// return the chosen category id.
    pub fn validate(&self, choices: &[Category]) -> Result<Uuid, FieldErrors> {
        let mut errors = FieldErrors::new();
        errors.record("title", Field::new(&self.title).required());
        errors.record("content", Field::new(&self.content).required());
        errors.record("description", Field::new(&self.description).required());

        let ids: Vec<String> = choices.iter().map(|c| c.id.to_string()).collect();
        errors.record(
            "category",
            Field::new(&self.category).one_of(ids.iter().map(String::as_str)),
        );
        if let Some(image) = &self.post_image {
            errors.record(
                "post_image",
                Field::new(image).file_allowed(&ALLOWED_IMAGE_EXTENSIONS),
            );
        }

        errors.into_result()?;
        Uuid::parse_str(self.category.trim()).map_err(|_| {
            let mut errors = FieldErrors::new();
            errors.add("category", "Not a valid choice.");
            errors
        })
    }
}

/// Comment form.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct CommentForm {
    pub content: String,
}

impl CommentForm {
    pub fn validate(&self) -> Result<(), FieldErrors> {
        let mut errors = FieldErrors::new();
        errors.record("content", Field::new(&self.content).required());
        errors.into_result()
    }
}

fn username_rules(username: &str) -> Field<'_> {
    Field::new(username)
        .required()
        .length(USERNAME_MIN, USERNAME_MAX)
}

/// Store-backed uniqueness checks. Empty values are skipped, as are fields
/// that already failed a plain rule. Records held by `exempt` never conflict.
async fn check_unique(
    errors: &mut FieldErrors,
    users: &dyn UserRepository,
    username: &str,
    email: &str,
    exempt: Option<Uuid>,
) -> Result<(), DomainError> {
    let conflicts = |user: Option<User>| user.is_some_and(|u| Some(u.id) != exempt);

    if !username.is_empty()
        && !errors.has("username")
        && conflicts(users.find_by_username(username).await?)
    {
        errors.add("username", USERNAME_TAKEN);
    }
    if !email.is_empty()
        && !errors.has("email")
        && conflicts(users.find_by_email(email).await?)
    {
        errors.add("email", EMAIL_TAKEN);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::RepoError;
    use crate::ports::BaseRepository;
    use async_trait::async_trait;

    struct FixedUsers(Vec<User>);

    #[async_trait]
    impl BaseRepository<User, Uuid> for FixedUsers {
        async fn find_by_id(&self, id: Uuid) -> Result<Option<User>, RepoError> {
            Ok(self.0.iter().find(|u| u.id == id).cloned())
        }

        async fn save(&self, user: User) -> Result<User, RepoError> {
            Ok(user)
        }

        async fn delete(&self, _id: Uuid) -> Result<(), RepoError> {
            Ok(())
        }
    }

    #[async_trait]
    impl UserRepository for FixedUsers {
        async fn find_by_email(&self, email: &str) -> Result<Option<User>, RepoError> {
            Ok(self.0.iter().find(|u| u.email == email).cloned())
        }

        async fn find_by_username(&self, username: &str) -> Result<Option<User>, RepoError> {
            Ok(self.0.iter().find(|u| u.username == username).cloned())
        }

        async fn find_by_ids(&self, ids: &[Uuid]) -> Result<Vec<User>, RepoError> {
            Ok(self.0.iter().filter(|u| ids.contains(&u.id)).cloned().collect())
        }
    }

    fn alice() -> User {
        User::new("alice".into(), "alice@example.com".into(), "hash".into())
    }

    fn registration(username: &str, email: &str) -> RegistrationForm {
        RegistrationForm {
            username: username.into(),
            email: email.into(),
            password: "secret".into(),
            confirm_password: "secret".into(),
        }
    }

    fn field_errors(result: Result<(), DomainError>) -> FieldErrors {
        match result {
            Err(DomainError::Validation(errors)) => errors,
            other => panic!("expected validation errors, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_registration_accepts_unique_user() {
        let users = FixedUsers(vec![alice()]);
        let form = registration("bob", "bob@example.com");
        assert!(form.validate(&users).await.is_ok());
    }

    #[tokio::test]
    async fn test_registration_rejects_taken_username_and_email() {
        let users = FixedUsers(vec![alice()]);
        let errors = field_errors(
            registration("alice", "alice@example.com")
                .validate(&users)
                .await,
        );

        assert_eq!(errors.messages_for("username").collect::<Vec<_>>(), [USERNAME_TAKEN]);
        assert_eq!(errors.messages_for("email").collect::<Vec<_>>(), [EMAIL_TAKEN]);
    }

    #[tokio::test]
    async fn test_registration_reports_every_field() {
        let users = FixedUsers(vec![]);
        let form = RegistrationForm {
            username: "a".into(),
            email: "nope".into(),
            password: String::new(),
            confirm_password: "x".into(),
        };
        let errors = field_errors(form.validate(&users).await);

        assert_eq!(errors.len(), 4);
        for field in ["username", "email", "password", "confirm_password"] {
            assert!(errors.has(field), "{field}");
        }
    }

    #[tokio::test]
    async fn test_account_update_exempts_own_values() {
        let actor = alice();
        let users = FixedUsers(vec![actor.clone()]);
        let form = UpdateAccountForm::from_user(&actor);
        assert!(form.validate(&actor, &users).await.is_ok());
    }

    #[tokio::test]
    async fn test_account_update_rejects_other_users_email() {
        let actor = alice();
        let other = User::new("carol".into(), "carol@example.com".into(), "hash".into());
        let users = FixedUsers(vec![actor.clone(), other]);
        let form = UpdateAccountForm {
            username: actor.username.clone(),
            email: "carol@example.com".into(),
            picture: Some("me.gif".into()),
        };
        let errors = field_errors(form.validate(&actor, &users).await);

        assert!(errors.has("email"));
        assert!(errors.has("picture"));
        assert!(!errors.has("username"));
    }

    #[test]
    fn test_post_form_returns_chosen_category() {
        let categories = vec![Category::new("Travel"), Category::new("Food")];
        let form = PostForm {
            title: "Trip".into(),
            content: "Body".into(),
            description: "Short".into(),
            category: categories[1].id.to_string(),
            post_image: Some("cover.jpg".into()),
        };
        assert_eq!(form.validate(&categories).unwrap(), categories[1].id);
    }

    #[test]
    fn test_post_form_rejects_unknown_category() {
        let categories = vec![Category::new("Travel")];
        let form = PostForm {
            title: "Trip".into(),
            content: "Body".into(),
            description: "Short".into(),
            category: Uuid::new_v4().to_string(),
            post_image: None,
        };
        let errors = form.validate(&categories).unwrap_err();
        assert_eq!(
            errors.messages_for("category").collect::<Vec<_>>(),
            ["Not a valid choice."]
        );
    }

    #[test]
    fn test_login_and_comment_forms() {
        assert!(LoginForm::default().validate().is_err());
        assert!(CommentForm { content: " ".into() }.validate().is_err());
        assert!(CommentForm { content: "Nice".into() }.validate().is_ok());
    }
}
