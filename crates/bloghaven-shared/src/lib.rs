//! # BlogHaven Shared
//!
//! Wire types returned by the server. Every view the HTML layer would render
//! is a serializable struct here.

pub mod dto;
pub mod response;

pub use response::{ApiResponse, ErrorResponse, FieldErrorBody};
