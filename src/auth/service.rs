use async_trait::async_trait;
use std::sync::Arc;
use tracing::{info, instrument, warn};

use super::{
    models::NewUser, password::PasswordHasher, repository::UserRepository, token::TokenService,
    types::SignUpRequest,
};
use crate::{config::AuthConfig, shared::AppError};

/// Sign-up, sign-in and token verification
#[async_trait]
pub trait AuthorizationService: Send + Sync {
    /// Stores a new user with a salted password hash and returns its id
    async fn create_user(&self, request: SignUpRequest) -> Result<i64, AppError>;

    /// Issues a token for valid credentials. Unknown usernames and wrong
    /// passwords both fail with `InvalidCredentials`.
    async fn generate_token(&self, username: &str, password: &str) -> Result<String, AppError>;

    /// Verifies a token and returns the user id it was issued for
    fn parse_token(&self, token: &str) -> Result<i64, AppError>;
}

pub struct AuthService {
    repository: Arc<dyn UserRepository + Send + Sync>,
    hasher: PasswordHasher,
    tokens: TokenService,
    // Compared against when the username is unknown, so both failures do the same work
    placeholder_hash: String,
}

impl AuthService {
    pub fn new(config: &AuthConfig, repository: Arc<dyn UserRepository + Send + Sync>) -> Self {
        let hasher = PasswordHasher::new(config.password_salt.clone());
        let placeholder_hash = hasher.hash(&config.signing_key);

        Self {
            repository,
            hasher,
            tokens: TokenService::new(config),
            placeholder_hash,
        }
    }
}

#[async_trait]
impl AuthorizationService for AuthService {
    #[instrument(skip(self, request), fields(username = %request.username))]
    async fn create_user(&self, request: SignUpRequest) -> Result<i64, AppError> {
        info!("Creating user");

        let user = NewUser {
            password_hash: self.hasher.hash(&request.password),
            name: request.name,
            username: request.username,
        };
        let id = self.repository.create_user(&user).await?;

        info!(user_id = id, "User created");
        Ok(id)
    }

    #[instrument(skip(self, password))]
    async fn generate_token(&self, username: &str, password: &str) -> Result<String, AppError> {
        let user = self.repository.get_user_by_username(username).await?;

        let stored_hash = user
            .as_ref()
            .map_or(self.placeholder_hash.as_str(), |u| u.password_hash.as_str());
        let password_matches = self.hasher.verify(password, stored_hash);

        match user {
            Some(user) if password_matches => {
                let token = self.tokens.create_token(user.id)?;
                info!(user_id = user.id, "Issued access token");
                Ok(token)
            }
            _ => {
                warn!("Sign-in rejected");
                Err(AppError::InvalidCredentials)
            }
        }
    }

    fn parse_token(&self, token: &str) -> Result<i64, AppError> {
        self.tokens.validate_token(token).map(|claims| claims.user_id)
    }
}
