use axum::{
    extract::{rejection::JsonRejection, Path, State},
    Extension, Json,
};
use tracing::{info, instrument};

use super::{
    models::{TodoListModel, UpdateListInput},
    types::CreateListRequest,
};
use crate::auth::AuthenticatedUser;
use crate::shared::{
    json_body, parse_id, AppError, AppState, DataResponse, IdResponse, ResourceKind,
    StatusResponse,
};

/// HTTP handler for creating a list
///
/// POST /api/lists
#[instrument(name = "create_list", skip(state, payload))]
pub async fn create_list(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
    payload: Result<Json<CreateListRequest>, JsonRejection>,
) -> Result<Json<IdResponse>, AppError> {
    let list = json_body(payload)?.into_new_list()?;

    let id = state.list_service.create(user.user_id, list).await?;

    info!(list_id = id, "List created successfully");
    Ok(Json(IdResponse { id }))
}

/// HTTP handler for listing the caller's lists
///
/// GET /api/lists
#[instrument(name = "get_all_lists", skip(state))]
pub async fn get_all_lists(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
) -> Result<Json<DataResponse<TodoListModel>>, AppError> {
    let data = state.list_service.get_all(user.user_id).await?;
    Ok(Json(DataResponse { data }))
}

/// GET /api/lists/:id
#[instrument(name = "get_list_by_id", skip(state))]
pub async fn get_list_by_id(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
    Path(raw_id): Path<String>,
) -> Result<Json<TodoListModel>, AppError> {
    let list_id = parse_id(&raw_id, ResourceKind::List)?;

    let list = state.list_service.get_by_id(user.user_id, list_id).await?;
    Ok(Json(list))
}

/// PUT /api/lists/:id
#[instrument(name = "update_list", skip(state, payload))]
pub async fn update_list(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
    Path(raw_id): Path<String>,
    payload: Result<Json<UpdateListInput>, JsonRejection>,
) -> Result<Json<StatusResponse>, AppError> {
    let list_id = parse_id(&raw_id, ResourceKind::List)?;
    let input = json_body(payload)?;

    state
        .list_service
        .update(user.user_id, list_id, input)
        .await?;

    Ok(Json(StatusResponse::ok()))
}

/// DELETE /api/lists/:id
#[instrument(name = "delete_list", skip(state))]
pub async fn delete_list(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
    Path(raw_id): Path<String>,
) -> Result<Json<StatusResponse>, AppError> {
    let list_id = parse_id(&raw_id, ResourceKind::List)?;

    state.list_service.delete(user.user_id, list_id).await?;

    Ok(Json(StatusResponse::ok()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::list::service::{ListService, TodoListService};
    use crate::shared::test_utils::AppStateBuilder;
    use crate::store::InMemoryTodoStore;
    use axum::{
        body::Body,
        http::{Request, StatusCode},
        routing::{get, post},
        Router,
    };
    use rstest::rstest;
    use std::sync::Arc;
    use tower::ServiceExt; // for `oneshot`

    const USER: i64 = 1;

    /// Router with the list handlers and a fixed authenticated user
    async fn app_with_one_list() -> (Router, i64) {
        let service = ListService::new(Arc::new(InMemoryTodoStore::new()));
        let id = service
            .create(
                USER,
                crate::list::models::NewTodoList {
                    title: "Test".to_string(),
                    description: "Description".to_string(),
                },
            )
            .await
            .unwrap();

        let state = AppStateBuilder::new()
            .with_list_service(Arc::new(service))
            .build();
        let app = Router::new()
            .route("/api/lists", post(create_list).get(get_all_lists))
            .route(
                "/api/lists/:id",
                get(get_list_by_id).put(update_list).delete(delete_list),
            )
            .layer(Extension(AuthenticatedUser { user_id: USER }))
            .with_state(state);
        (app, id)
    }

    async fn send(
        app: Router,
        method: &str,
        uri: &str,
        body: Option<&str>,
    ) -> (StatusCode, String) {
        let mut builder = Request::builder().method(method).uri(uri);
        if body.is_some() {
            builder = builder.header("content-type", "application/json");
        }
        let request = builder
            .body(body.map(|b| Body::from(b.to_string())).unwrap_or_else(Body::empty))
            .unwrap();

        let response = app.oneshot(request).await.unwrap();
        let status = response.status();
        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        (status, String::from_utf8(body.to_vec()).unwrap())
    }

    #[rstest]
    #[case::ok(r#"{"title":"Test","description":"Description"}"#, StatusCode::OK, r#"{"id":2}"#)]
    #[case::empty_title(r#"{"title":""}"#, StatusCode::BAD_REQUEST, r#"{"message":"Invalid request body"}"#)]
    #[case::no_title(r#"{"description":"Description"}"#, StatusCode::BAD_REQUEST, r#"{"message":"Invalid request body"}"#)]
    #[tokio::test]
    async fn test_create_list(
        #[case] body: &str,
        #[case] expected_status: StatusCode,
        #[case] expected_body: &str,
    ) {
        let (app, _) = app_with_one_list().await;
        let (status, response) = send(app, "POST", "/api/lists", Some(body)).await;
        assert_eq!(status, expected_status);
        assert_eq!(response, expected_body);
    }

    #[tokio::test]
    async fn test_get_all_lists() {
        let (app, id) = app_with_one_list().await;
        let (status, body) = send(app, "GET", "/api/lists", None).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(
            body,
            format!(r#"{{"data":[{{"id":{},"title":"Test","description":"Description"}}]}}"#, id)
        );
    }

    #[rstest]
    #[case::invalid_id("/api/lists/abc", StatusCode::BAD_REQUEST, r#"{"message":"Invalid list id"}"#)]
    #[case::missing("/api/lists/404", StatusCode::NOT_FOUND, r#"{"message":"No list with such id"}"#)]
    #[tokio::test]
    async fn test_get_list_by_id_errors(
        #[case] uri: &str,
        #[case] expected_status: StatusCode,
        #[case] expected_body: &str,
    ) {
        let (app, _) = app_with_one_list().await;
        let (status, body) = send(app, "GET", uri, None).await;
        assert_eq!(status, expected_status);
        assert_eq!(body, expected_body);
    }

    #[tokio::test]
    async fn test_get_list_by_id() {
        let (app, id) = app_with_one_list().await;
        let (status, body) = send(app, "GET", &format!("/api/lists/{}", id), None).await;

        assert_eq!(status, StatusCode::OK);
        let list: TodoListModel = serde_json::from_str(&body).unwrap();
        assert_eq!(list.title, "Test");
    }

    #[rstest]
    #[case::ok(r#"{"title":"New"}"#, StatusCode::OK, r#"{"status":"ok"}"#)]
    #[case::no_fields(r#"{}"#, StatusCode::BAD_REQUEST, r#"{"message":"Invalid list update input"}"#)]
    #[case::bad_json(r#"{"title":5}"#, StatusCode::BAD_REQUEST, r#"{"message":"Invalid request body"}"#)]
    #[tokio::test]
    async fn test_update_list(
        #[case] body: &str,
        #[case] expected_status: StatusCode,
        #[case] expected_body: &str,
    ) {
        let (app, id) = app_with_one_list().await;
        let uri = format!("/api/lists/{}", id);
        let (status, response) = send(app, "PUT", &uri, Some(body)).await;
        assert_eq!(status, expected_status);
        assert_eq!(response, expected_body);
    }

    #[tokio::test]
    async fn test_delete_missing_list_still_succeeds() {
        let (app, _) = app_with_one_list().await;
        let (status, body) = send(app, "DELETE", "/api/lists/404", None).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, r#"{"status":"ok"}"#);
    }
}
