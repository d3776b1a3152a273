//! # BlogHaven Server
//!
//! Actix-web application: route handlers, the session gate, and the wiring
//! that injects the store and services into every request.

pub mod config;
pub mod handlers;
pub mod middleware;
pub mod observability;
pub mod state;
pub mod telemetry;

pub use handlers::configure_routes;
pub use state::AppState;
