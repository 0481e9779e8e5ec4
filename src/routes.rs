use axum::{
    middleware,
    routing::{get, post},
    Router,
};
use tower_http::trace::TraceLayer;

use crate::{auth, item, list, shared::AppState};

/// Builds the full HTTP surface. Everything under /api requires a bearer token.
pub fn app(state: AppState) -> Router {
    let api = Router::new()
        .route("/lists", post(list::create_list).get(list::get_all_lists))
        .route(
            "/lists/:id",
            get(list::get_list_by_id)
                .put(list::update_list)
                .delete(list::delete_list),
        )
        .route(
            "/lists/:id/items",
            post(item::create_item).get(item::get_all_items),
        )
        .route(
            "/items/:id",
            get(item::get_item_by_id)
                .put(item::update_item)
                .delete(item::delete_item),
        )
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            auth::require_auth,
        ));

    Router::new()
        .route("/auth/sign-up", post(auth::sign_up))
        .route("/auth/sign-in", post(auth::sign_in))
        .nest("/api", api)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
