//! Axum router wiring.
//!
//! Routes live in an inner router. The outer router hands everything to it
//! through `fallback_service`, with the path canonicalization and counting
//! stages layered on top so they run before any route is matched.

use axum::{
    handler::Handler,
    middleware,
    routing::{get, MethodRouter},
    Router,
};

use crate::{
    app_state::AppState,
    handlers,
    middleware::{canonical_path, count_requests, METRICS_PATH},
};

/// GET-only route: HEAD and every other method get the JSON 405.
fn get_only<H, T>(handler: H) -> MethodRouter<AppState>
where
    H: Handler<T, AppState>,
    T: 'static,
{
    get(handler)
        .head(handlers::method_not_allowed)
        .fallback(handlers::method_not_allowed)
}

pub fn build_router(state: AppState) -> Router {
    let routes = Router::new()
        .route(METRICS_PATH, get_only(handlers::metrics))
        .route("/", get_only(handlers::greet_root))
        .route("/:name", get_only(handlers::greet_name))
        .fallback(handlers::not_found)
        .with_state(state.clone());

    Router::new()
        .fallback_service(routes)
        .layer(middleware::from_fn_with_state(state, count_requests))
        .layer(middleware::map_request(canonical_path))
}
