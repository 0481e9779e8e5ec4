// Library crate for the to-do list service
// This file exposes the public API for the binary and integration tests

pub mod auth;
pub mod config;
pub mod item;
pub mod list;
pub mod routes;
pub mod shared;
pub mod store;

// Re-export commonly used types for easier access in tests
pub use config::{AppConfig, AuthConfig};
pub use routes::app;
pub use shared::{AppError, AppState};
