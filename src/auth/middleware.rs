use axum::{
    extract::{Request, State},
    http::{header::AUTHORIZATION, HeaderMap},
    middleware::Next,
    response::Response,
};
use tracing::{debug, instrument, warn};

use crate::shared::{AppError, AppState};

/// Identity bound to a request once its bearer token has been verified
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AuthenticatedUser {
    pub user_id: i64,
}

/// Bearer token authentication middleware - rejects the request or adds AuthenticatedUser to it.
/// Usage: .route_layer(middleware::from_fn_with_state(app_state.clone(), auth::require_auth))
/// Handlers can then extract Extension(user): Extension<AuthenticatedUser>.
#[instrument(skip(state, req, next), fields(uri = %req.uri()))]
pub async fn require_auth(
    State(state): State<AppState>,
    mut req: Request,
    next: Next,
) -> Result<Response, AppError> {
    let token = bearer_token(req.headers()).map_err(|e| {
        warn!(error = %e, "Rejected Authorization header");
        e
    })?;

    let user_id = state.auth_service.parse_token(token).map_err(|e| {
        warn!(error = %e, "Token verification failed");
        e
    })?;

    debug!(user_id, "Authentication successful, adding user to request");
    req.extensions_mut().insert(AuthenticatedUser { user_id });

    Ok(next.run(req).await)
}

/// Extracts the token from an `Authorization: Bearer <token>` header
fn bearer_token(headers: &HeaderMap) -> Result<&str, AppError> {
    let header = match headers.get(AUTHORIZATION) {
        Some(value) if !value.is_empty() => value,
        _ => return Err(AppError::EmptyHeader),
    };
    let header = header.to_str().map_err(|_| AppError::MalformedHeader)?;

    let parts: Vec<&str> = header.split(' ').collect();
    match parts.as_slice() {
        ["Bearer", ""] => Err(AppError::EmptyToken),
        ["Bearer", token] => Ok(token),
        _ => Err(AppError::MalformedHeader),
    }
}
