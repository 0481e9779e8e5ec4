use axum::{
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use serde_json::json;
use sqlx::PgPool;
use std::sync::Arc;
use strum_macros::Display;
use thiserror::Error;
use tracing::{error, warn};

use crate::auth::{
    repository::{InMemoryUserRepository, PostgresUserRepository, UserRepository},
    service::{AuthService, AuthorizationService},
};
use crate::config::AuthConfig;
use crate::item::{
    repository::{PostgresTodoItemRepository, TodoItemRepository},
    service::{ItemService, TodoItemService},
};
use crate::list::{
    repository::{PostgresTodoListRepository, TodoListRepository},
    service::{ListService, TodoListService},
};
use crate::store::InMemoryTodoStore;

/// Shared application state containing all dependencies
#[derive(Clone)]
pub struct AppState {
    pub auth_service: Arc<dyn AuthorizationService>,
    pub list_service: Arc<dyn TodoListService>,
    pub item_service: Arc<dyn TodoItemService>,
}

impl AppState {
    pub fn new(
        auth_service: Arc<dyn AuthorizationService>,
        list_service: Arc<dyn TodoListService>,
        item_service: Arc<dyn TodoItemService>,
    ) -> Self {
        Self {
            auth_service,
            list_service,
            item_service,
        }
    }

    /// Wires the default services on top of the given repositories
    pub fn from_repositories(
        auth_config: &AuthConfig,
        user_repository: Arc<dyn UserRepository + Send + Sync>,
        list_repository: Arc<dyn TodoListRepository + Send + Sync>,
        item_repository: Arc<dyn TodoItemRepository + Send + Sync>,
    ) -> Self {
        let auth_service = Arc::new(AuthService::new(auth_config, user_repository));
        let list_service = Arc::new(ListService::new(Arc::clone(&list_repository)));
        let item_service = Arc::new(ItemService::new(item_repository, list_repository));

        Self::new(auth_service, list_service, item_service)
    }

    /// State backed by in-memory repositories. Data is lost on restart.
    pub fn in_memory(auth_config: &AuthConfig) -> Self {
        let store = Arc::new(InMemoryTodoStore::new());
        Self::from_repositories(
            auth_config,
            Arc::new(InMemoryUserRepository::new()),
            store.clone(),
            store,
        )
    }

    /// State backed by PostgreSQL repositories sharing one connection pool
    pub fn postgres(auth_config: &AuthConfig, pool: PgPool) -> Self {
        Self::from_repositories(
            auth_config,
            Arc::new(PostgresUserRepository::new(pool.clone())),
            Arc::new(PostgresTodoListRepository::new(pool.clone())),
            Arc::new(PostgresTodoItemRepository::new(pool)),
        )
    }
}

/// Kind of owned resource, used to word ownership and validation errors
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
#[strum(serialize_all = "lowercase")]
pub enum ResourceKind {
    List,
    Item,
}

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Invalid credentials")]
    InvalidCredentials,

    #[error("Malformed token")]
    MalformedToken,

    #[error("Token has expired")]
    ExpiredToken,

    #[error("Invalid token signature")]
    InvalidSignature,

    #[error("Empty auth header")]
    EmptyHeader,

    #[error("Invalid auth header")]
    MalformedHeader,

    #[error("Empty token")]
    EmptyToken,

    /// Parent list is absent or owned by someone else. Both read the same.
    #[error("No list with such id")]
    NoSuchParent,

    /// Resource is absent or owned by someone else. Both read the same.
    #[error("No {0} with such id")]
    NotFound(ResourceKind),

    #[error("Invalid {0} update input")]
    InvalidUpdateInput(ResourceKind),

    #[error("Username is already taken")]
    UsernameTaken,

    #[error("{0}")]
    BadRequest(String),

    #[error("Backing store failure: {0}")]
    BackingStoreFailure(String),

    #[error("Internal server error")]
    Internal,
}

impl AppError {
    /// Transport status for each error kind. Only the HTTP boundary reads this.
    pub fn status_code(&self) -> StatusCode {
        match self {
            AppError::InvalidCredentials
            | AppError::MalformedToken
            | AppError::ExpiredToken
            | AppError::InvalidSignature
            | AppError::EmptyHeader
            | AppError::MalformedHeader
            | AppError::EmptyToken => StatusCode::UNAUTHORIZED,
            AppError::NoSuchParent | AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::InvalidUpdateInput(_) | AppError::BadRequest(_) => StatusCode::BAD_REQUEST,
            AppError::UsernameTaken => StatusCode::CONFLICT,
            AppError::BackingStoreFailure(_) | AppError::Internal => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let message = match &self {
            // Store details stay in the logs
            AppError::BackingStoreFailure(detail) => {
                error!(error = %detail, "Request failed in backing store");
                AppError::Internal.to_string()
            }
            other => {
                warn!(status = %status, error = %other, "Request rejected");
                other.to_string()
            }
        };

        let body = Json(json!({
            "message": message
        }));

        (status, body).into_response()
    }
}

/// Response carrying the id of a freshly created resource
#[derive(Debug, Serialize, Deserialize, PartialEq)]
pub struct IdResponse {
    pub id: i64,
}

/// Response for operations that only report success
#[derive(Debug, Serialize, Deserialize, PartialEq)]
pub struct StatusResponse {
    pub status: String,
}

impl StatusResponse {
    pub fn ok() -> Self {
        Self {
            status: "ok".to_string(),
        }
    }
}

/// Collection envelope for list endpoints
#[derive(Debug, Serialize, Deserialize, PartialEq)]
pub struct DataResponse<T> {
    pub data: Vec<T>,
}

/// Parses a numeric path id, rejecting anything else as a bad request
pub fn parse_id(raw_id: &str, kind: ResourceKind) -> Result<i64, AppError> {
    raw_id
        .parse::<i64>()
        .map_err(|_| AppError::BadRequest(format!("Invalid {} id", kind)))
}

/// Unwraps a JSON body, collapsing every rejection into one message
pub fn json_body<T>(payload: Result<Json<T>, JsonRejection>) -> Result<T, AppError> {
    payload.map(|Json(body)| body).map_err(|rejection| {
        warn!(error = %rejection, "Rejected request body");
        AppError::BadRequest("Invalid request body".to_string())
    })
}
