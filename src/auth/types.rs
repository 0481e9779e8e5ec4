use serde::{Deserialize, Serialize};

use crate::shared::AppError;

/// JWT claims carried by every access token
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TokenClaims {
    pub user_id: i64,
    pub exp: usize, // Expiration timestamp (standard JWT claim)
    pub iat: usize, // Issued at timestamp (standard JWT claim)
}

/// Request payload for POST /auth/sign-up
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct SignUpRequest {
    pub name: String,
    pub username: String,
    pub password: String,
}

impl SignUpRequest {
    pub fn validate(&self) -> Result<(), AppError> {
        require_non_empty(&[&self.name, &self.username, &self.password])
    }
}

/// Request payload for POST /auth/sign-in
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct SignInRequest {
    pub username: String,
    pub password: String,
}

impl SignInRequest {
    pub fn validate(&self) -> Result<(), AppError> {
        require_non_empty(&[&self.username, &self.password])
    }
}

/// Response for a successful sign-in
#[derive(Debug, Serialize, Deserialize, PartialEq)]
pub struct TokenResponse {
    pub token: String,
}

fn require_non_empty(fields: &[&str]) -> Result<(), AppError> {
    if fields.iter().any(|field| field.is_empty()) {
        return Err(AppError::BadRequest("Invalid request body".to_string()));
    }
    Ok(())
}
