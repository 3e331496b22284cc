use axum::Router;
use axum::routing::{get, post};
use tower_http::trace::TraceLayer;

use crate::handlers;
use crate::state::AppState;

pub fn build_router(app_state: AppState) -> Router {
    let api_routes = Router::new()
        .route("/api/groups", post(handlers::groups::create_group_handler))
        .route(
            "/api/groups/{pubid}",
            get(handlers::groups::get_group_handler),
        );

    let admin_routes = Router::new()
        .route("/adm/nipsa", get(handlers::nipsa::nipsa_index_handler))
        .route("/adm/nipsa/add", post(handlers::nipsa::nipsa_add_handler))
        .route(
            "/adm/nipsa/remove",
            post(handlers::nipsa::nipsa_remove_handler),
        );

    Router::new()
        .route("/health", get(handlers::health::health_handler))
        .merge(api_routes)
        .merge(admin_routes)
        .layer(TraceLayer::new_for_http())
        .with_state(app_state)
}
