use axum::{extract::rejection::JsonRejection, extract::State, Json};
use tracing::{info, instrument};

use super::types::{SignInRequest, SignUpRequest, TokenResponse};
use crate::shared::{json_body, AppError, AppState, IdResponse};

/// HTTP handler for registering a new user
///
/// POST /auth/sign-up
/// Returns the id of the created user
#[instrument(name = "sign_up", skip(state, payload))]
pub async fn sign_up(
    State(state): State<AppState>,
    payload: Result<Json<SignUpRequest>, JsonRejection>,
) -> Result<Json<IdResponse>, AppError> {
    let request = json_body(payload)?;
    request.validate()?;

    let id = state.auth_service.create_user(request).await?;

    info!(user_id = id, "User signed up");
    Ok(Json(IdResponse { id }))
}

/// HTTP handler for exchanging credentials for an access token
///
/// POST /auth/sign-in
#[instrument(name = "sign_in", skip(state, payload))]
pub async fn sign_in(
    State(state): State<AppState>,
    payload: Result<Json<SignInRequest>, JsonRejection>,
) -> Result<Json<TokenResponse>, AppError> {
    let request = json_body(payload)?;
    request.validate()?;

    let token = state
        .auth_service
        .generate_token(&request.username, &request.password)
        .await?;

    Ok(Json(TokenResponse { token }))
}
