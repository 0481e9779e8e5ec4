use async_trait::async_trait;
use sqlx::PgPool;
use std::collections::HashMap;
use std::sync::Mutex;
use tracing::{debug, instrument, warn};

use super::models::{NewUser, UserModel};
use crate::shared::AppError;

/// Trait for user (credential store) operations
#[async_trait]
pub trait UserRepository {
    async fn create_user(&self, user: &NewUser) -> Result<i64, AppError>;
    async fn get_user_by_username(&self, username: &str) -> Result<Option<UserModel>, AppError>;
}

#[derive(Default)]
struct UserTable {
    next_id: i64,
    by_username: HashMap<String, UserModel>,
}

/// In-memory implementation of UserRepository for development and testing
///
/// Data is stored in memory and will be lost when the application restarts.
#[derive(Default)]
pub struct InMemoryUserRepository {
    users: Mutex<UserTable>,
}

impl InMemoryUserRepository {
    /// Creates a new empty in-memory repository
    pub fn new() -> Self {
        Self::default()
    }

    #[cfg(test)]
    pub fn user_count(&self) -> usize {
        self.users
            .lock()
            .map(|users| users.by_username.len())
            .unwrap_or_default()
    }

    fn table(&self) -> Result<std::sync::MutexGuard<'_, UserTable>, AppError> {
        self.users
            .lock()
            .map_err(|_| AppError::BackingStoreFailure("user table lock poisoned".to_string()))
    }
}

#[async_trait]
impl UserRepository for InMemoryUserRepository {
    #[instrument(skip(self, user), fields(username = %user.username))]
    async fn create_user(&self, user: &NewUser) -> Result<i64, AppError> {
        debug!("Creating user in memory");

        let mut users = self.table()?;
        if users.by_username.contains_key(&user.username) {
            warn!("Username already exists in memory");
            return Err(AppError::UsernameTaken);
        }

        users.next_id += 1;
        let id = users.next_id;
        users
            .by_username
            .insert(user.username.clone(), user.clone().into_model(id));

        debug!(user_id = id, "User created successfully in memory");
        Ok(id)
    }

    #[instrument(skip(self))]
    async fn get_user_by_username(&self, username: &str) -> Result<Option<UserModel>, AppError> {
        let user = self.table()?.by_username.get(username).cloned();
        debug!(found = user.is_some(), "Looked up user in memory");
        Ok(user)
    }
}

/// PostgreSQL implementation of the user repository
pub struct PostgresUserRepository {
    pool: PgPool,
}

impl PostgresUserRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl UserRepository for PostgresUserRepository {
    #[instrument(skip(self, user), fields(username = %user.username))]
    async fn create_user(&self, user: &NewUser) -> Result<i64, AppError> {
        debug!("Creating user in database");

        let id: i64 = sqlx::query_scalar(
            "INSERT INTO users (name, username, password_hash) VALUES ($1, $2, $3) RETURNING id",
        )
        .bind(&user.name)
        .bind(&user.username)
        .bind(&user.password_hash)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| match &e {
            sqlx::Error::Database(db) if db.is_unique_violation() => {
                warn!("Username already exists in database");
                AppError::UsernameTaken
            }
            _ => {
                warn!(error = %e, "Failed to create user in database");
                AppError::BackingStoreFailure(e.to_string())
            }
        })?;

        debug!(user_id = id, "User created successfully in database");
        Ok(id)
    }

    #[instrument(skip(self))]
    async fn get_user_by_username(&self, username: &str) -> Result<Option<UserModel>, AppError> {
        let user = sqlx::query_as::<_, UserModel>(
            "SELECT id, name, username, password_hash FROM users WHERE username = $1",
        )
        .bind(username)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| {
            warn!(error = %e, "Failed to fetch user from database");
            AppError::BackingStoreFailure(e.to_string())
        })?;

        debug!(found = user.is_some(), "Looked up user in database");
        Ok(user)
    }
}

#[cfg(test)]
pub mod tests {
    use super::*;

    fn new_user(username: &str) -> NewUser {
        NewUser {
            name: "Test".to_string(),
            username: username.to_string(),
            password_hash: "hash".to_string(),
        }
    }

    #[tokio::test]
    async fn test_create_and_get_user() {
        let repo = InMemoryUserRepository::new();

        let id = repo.create_user(&new_user("test")).await.unwrap();
        assert_eq!(id, 1);

        let user = repo.get_user_by_username("test").await.unwrap().unwrap();
        assert_eq!(user.id, id);
        assert_eq!(user.name, "Test");
        assert_eq!(user.password_hash, "hash");
    }

    #[tokio::test]
    async fn test_ids_are_unique() {
        let repo = InMemoryUserRepository::new();

        let first = repo.create_user(&new_user("first")).await.unwrap();
        let second = repo.create_user(&new_user("second")).await.unwrap();

        assert_ne!(first, second);
        assert_eq!(repo.user_count(), 2);
    }

    #[tokio::test]
    async fn test_duplicate_username() {
        let repo = InMemoryUserRepository::new();
        repo.create_user(&new_user("test")).await.unwrap();

        let result = repo.create_user(&new_user("test")).await;
        assert!(matches!(result, Err(AppError::UsernameTaken)));
        assert_eq!(repo.user_count(), 1);
    }

    #[tokio::test]
    async fn test_get_nonexistent_user() {
        let repo = InMemoryUserRepository::new();
        assert!(repo.get_user_by_username("nobody").await.unwrap().is_none());
    }
}
