//! Domain entities - the core business objects.

mod category;
mod comment;
mod post;
mod user;

pub use category::{Category, DEFAULT_CATEGORIES};
pub use comment::Comment;
pub use post::{DEFAULT_POST_IMAGE, Post};
pub use user::{DEFAULT_AVATAR, User};
