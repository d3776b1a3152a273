//! # BlogHaven Core
//!
//! The domain layer of BlogHaven.
//! This crate holds the entities, the ports the infrastructure must implement,
//! and the form validation rules. It has no infrastructure dependencies.

pub mod domain;
pub mod error;
pub mod ports;
pub mod validation;

pub use error::DomainError;
