use axum::{
    extract::{rejection::JsonRejection, Path, State},
    Extension, Json,
};
use tracing::{info, instrument};

use super::{
    models::{TodoItemModel, UpdateItemInput},
    types::CreateItemRequest,
};
use crate::auth::AuthenticatedUser;
use crate::shared::{
    json_body, parse_id, AppError, AppState, DataResponse, IdResponse, ResourceKind,
    StatusResponse,
};

/// HTTP handler for adding an item to one of the caller's lists
///
/// POST /api/lists/:id/items
#[instrument(name = "create_item", skip(state, payload))]
pub async fn create_item(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
    Path(raw_list_id): Path<String>,
    payload: Result<Json<CreateItemRequest>, JsonRejection>,
) -> Result<Json<IdResponse>, AppError> {
    let list_id = parse_id(&raw_list_id, ResourceKind::List)?;
    let item = json_body(payload)?.into_new_item()?;

    let id = state
        .item_service
        .create(user.user_id, list_id, item)
        .await?;

    info!(item_id = id, list_id, "Item created successfully");
    Ok(Json(IdResponse { id }))
}

/// GET /api/lists/:id/items
#[instrument(name = "get_all_items", skip(state))]
pub async fn get_all_items(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
    Path(raw_list_id): Path<String>,
) -> Result<Json<DataResponse<TodoItemModel>>, AppError> {
    let list_id = parse_id(&raw_list_id, ResourceKind::List)?;

    let data = state.item_service.get_all(user.user_id, list_id).await?;
    Ok(Json(DataResponse { data }))
}

/// GET /api/items/:id
#[instrument(name = "get_item_by_id", skip(state))]
pub async fn get_item_by_id(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
    Path(raw_id): Path<String>,
) -> Result<Json<TodoItemModel>, AppError> {
    let item_id = parse_id(&raw_id, ResourceKind::Item)?;

    let item = state.item_service.get_by_id(user.user_id, item_id).await?;
    Ok(Json(item))
}

/// PUT /api/items/:id
#[instrument(name = "update_item", skip(state, payload))]
pub async fn update_item(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
    Path(raw_id): Path<String>,
    payload: Result<Json<UpdateItemInput>, JsonRejection>,
) -> Result<Json<StatusResponse>, AppError> {
    let item_id = parse_id(&raw_id, ResourceKind::Item)?;
    let input = json_body(payload)?;

    state
        .item_service
        .update(user.user_id, item_id, input)
        .await?;

    Ok(Json(StatusResponse::ok()))
}

/// DELETE /api/items/:id
#[instrument(name = "delete_item", skip(state))]
pub async fn delete_item(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
    Path(raw_id): Path<String>,
) -> Result<Json<StatusResponse>, AppError> {
    let item_id = parse_id(&raw_id, ResourceKind::Item)?;

    state.item_service.delete(user.user_id, item_id).await?;

    Ok(Json(StatusResponse::ok()))
}
