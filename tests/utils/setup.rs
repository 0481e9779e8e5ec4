use axum::Router;
use chrono::Duration;
use sqlx::PgPool;

use todo_service::{app, AppState, AuthConfig};

// ============================================================================
// Test Setup Infrastructure
// ============================================================================

pub const SIGNING_KEY: &str = "integration-signing-key";
pub const SALT: &str = "integration-salt";

pub fn auth_config() -> AuthConfig {
    AuthConfig::new(SIGNING_KEY, SALT, Duration::hours(12))
}

pub struct TestApp {
    pub router: Router,
}

#[allow(dead_code)]
impl TestApp {
    /// Application wired exactly like production, minus PostgreSQL
    pub fn new() -> Self {
        Self::with_config(auth_config())
    }

    pub fn with_config(config: AuthConfig) -> Self {
        Self {
            router: app(AppState::in_memory(&config)),
        }
    }

    /// Application backed by the PostgreSQL repositories
    pub fn postgres(pool: PgPool) -> Self {
        Self {
            router: app(AppState::postgres(&auth_config(), pool)),
        }
    }
}
