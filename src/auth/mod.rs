// Public API - what other modules can use
pub use handlers::{sign_in, sign_up};
pub use middleware::{require_auth, AuthenticatedUser};
pub use types::TokenClaims;

// Internal modules
mod handlers;
mod middleware;
pub mod models;
pub mod password;
pub mod repository;
pub mod service;
pub mod token;
pub mod types;
