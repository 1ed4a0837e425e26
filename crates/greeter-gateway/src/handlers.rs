//! HTTP handlers.
//!
//! - `/`        : greets a stranger
//! - `/:name`   : greets the capitalized name
//! - `/metrics` : Prometheus text format
//! - fallback   : 404 JSON body, 405 JSON body with `Allow: GET`

use axum::{
    extract::{Path, State},
    http::{header, StatusCode},
    response::{Html, IntoResponse, Response},
    Json,
};
use serde_json::json;

use greeter_core::greeting::greeting_html;

use crate::app_state::AppState;

pub async fn greet_root() -> Html<String> {
    Html(greeting_html(None))
}

pub async fn greet_name(Path(name): Path<String>) -> Html<String> {
    Html(greeting_html(Some(&name)))
}

pub async fn metrics(State(state): State<AppState>) -> Response {
    let body = state.metrics().render();

    (
        StatusCode::OK,
        [(header::CONTENT_TYPE, "text/plain; version=0.0.4; charset=utf-8")],
        body,
    )
        .into_response()
}

pub async fn not_found() -> impl IntoResponse {
    (StatusCode::NOT_FOUND, Json(json!({ "detail": "Not Found" })))
}

pub async fn method_not_allowed() -> impl IntoResponse {
    (
        StatusCode::METHOD_NOT_ALLOWED,
        [(header::ALLOW, "GET")],
        Json(json!({ "detail": "Method Not Allowed" })),
    )
}
