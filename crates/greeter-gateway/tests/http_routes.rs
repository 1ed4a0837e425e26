//! End-to-end routing and counting tests, driven in-process.

#![allow(clippy::unwrap_used)]
#![allow(clippy::expect_used)]
#![allow(clippy::panic)]

use std::sync::Arc;

use axum::{
    body::Body,
    http::{header, Method, Request, StatusCode},
    Router,
};
use tower::ServiceExt;

use greeter_gateway::{app_state::AppState, obs::HttpMetrics, router};

fn app() -> (Router, Arc<HttpMetrics>) {
    let metrics = Arc::new(HttpMetrics::new());
    let state = AppState::with_metrics(Arc::clone(&metrics));
    (router::build_router(state), metrics)
}

async fn call(app: &Router, method: Method, uri: &str) -> (StatusCode, Option<String>, String) {
    let req = Request::builder()
        .method(method)
        .uri(uri)
        .body(Body::empty())
        .unwrap();
    let resp = app.clone().oneshot(req).await.unwrap();
    let status = resp.status();
    let ctype = resp
        .headers()
        .get(header::CONTENT_TYPE)
        .map(|v| v.to_str().unwrap().to_string());
    let body = axum::body::to_bytes(resp.into_body(), usize::MAX).await.unwrap();
    (status, ctype, String::from_utf8(body.to_vec()).unwrap())
}

async fn get(app: &Router, uri: &str) -> String {
    let (status, _, body) = call(app, Method::GET, uri).await;
    assert_eq!(status, StatusCode::OK, "GET {uri}");
    body
}

#[tokio::test]
async fn root_greets_stranger() {
    let (app, metrics) = app();
    let (status, ctype, body) = call(&app, Method::GET, "/").await;
    assert_eq!(status, StatusCode::OK);
    assert!(ctype.unwrap().starts_with("text/html"));
    assert_eq!(body, "<h1>Hello, stranger!</h1>");
    assert_eq!(metrics.requests_for("GET", "/"), 1);
}

#[tokio::test]
async fn name_is_capitalized_and_counted() {
    let (app, metrics) = app();
    assert_eq!(get(&app, "/alice").await, "<h1>Hello, Alice!</h1>");
    assert_eq!(get(&app, "/BOB").await, "<h1>Hello, Bob!</h1>");
    assert_eq!(metrics.requests_for("GET", "/alice"), 1);
    assert_eq!(metrics.requests_for("GET", "/BOB"), 1);
}

#[tokio::test]
async fn percent_encoded_name_is_counted_decoded() {
    let (app, metrics) = app();
    assert_eq!(get(&app, "/jean%20luc").await, "<h1>Hello, Jean luc!</h1>");
    assert_eq!(metrics.requests_for("GET", "/jean luc"), 1);
    assert_eq!(metrics.requests_for("GET", "/jean%20luc"), 0);

    let body = get(&app, "/metrics").await;
    assert!(body.contains("http_requests_total{endpoint=\"/jean luc\",method=\"GET\"} 1\n"));
}

#[tokio::test]
async fn encoded_metrics_path_is_routed_to_metrics_and_not_counted() {
    let (app, metrics) = app();
    get(&app, "/x").await;

    let (status, ctype, body) = call(&app, Method::GET, "/%6Detrics").await;
    assert_eq!(status, StatusCode::OK);
    assert!(ctype.unwrap().starts_with("text/plain"));
    assert!(body.contains("# TYPE http_requests_total counter"));
    assert!(!body.contains("endpoint=\"/metrics\""));
    assert!(!body.contains("%6D"));
    assert_eq!(metrics.requests.len(), 1);
}

#[tokio::test]
async fn encoded_slash_splits_the_path() {
    let (app, metrics) = app();
    let (status, _, _) = call(&app, Method::GET, "/a%2Fb").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(metrics.requests_for("GET", "/a/b"), 1);
}

#[tokio::test]
async fn encoded_percent_survives_decoding() {
    let (app, metrics) = app();
    assert_eq!(get(&app, "/100%25").await, "<h1>Hello, 100%!</h1>");
    assert_eq!(metrics.requests_for("GET", "/100%"), 1);
}

#[tokio::test]
async fn metrics_scrape_is_not_counted() {
    let (app, metrics) = app();
    for _ in 0..3 {
        let (status, ctype, body) = call(&app, Method::GET, "/metrics").await;
        assert_eq!(status, StatusCode::OK);
        assert!(ctype.unwrap().starts_with("text/plain"));
        assert!(!body.contains("endpoint=\"/metrics\""));
    }
    assert_eq!(metrics.requests_for("GET", "/metrics"), 0);
    assert!(metrics.requests.is_empty());
}

#[tokio::test]
async fn scrape_reflects_prior_requests() {
    let (app, _) = app();
    get(&app, "/").await;
    get(&app, "/").await;
    get(&app, "/x").await;

    let body = get(&app, "/metrics").await;
    assert!(body.contains("# HELP http_requests_total Total HTTP requests\n"));
    assert!(body.contains("# TYPE http_requests_total counter\n"));
    assert!(body.contains("http_requests_total{endpoint=\"/\",method=\"GET\"} 2\n"));
    assert!(body.contains("http_requests_total{endpoint=\"/x\",method=\"GET\"} 1\n"));
    assert!(!body.contains("endpoint=\"/metrics\""));
}

#[tokio::test]
async fn consecutive_scrapes_are_identical() {
    let (app, _) = app();
    get(&app, "/a").await;
    get(&app, "/b").await;
    get(&app, "/").await;

    let first = get(&app, "/metrics").await;
    let second = get(&app, "/metrics").await;
    assert_eq!(first, second);
}

#[tokio::test]
async fn every_distinct_name_is_its_own_series() {
    // Raw paths are used as labels, so cardinality grows with distinct names.
    let (app, metrics) = app();
    for i in 0..50 {
        get(&app, &format!("/user{i}")).await;
    }
    assert_eq!(metrics.requests.len(), 50);
    assert_eq!(metrics.requests_for("GET", "/user7"), 1);
}

#[tokio::test]
async fn unmatched_paths_are_counted_and_404() {
    let (app, metrics) = app();
    let (status, _, body) = call(&app, Method::GET, "/a/b").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body, r#"{"detail":"Not Found"}"#);
    assert_eq!(metrics.requests_for("GET", "/a/b"), 1);
}

#[tokio::test]
async fn wrong_method_is_counted_and_405() {
    let (app, metrics) = app();
    let req = Request::builder()
        .method(Method::POST)
        .uri("/alice")
        .body(Body::empty())
        .unwrap();
    let resp = app.clone().oneshot(req).await.unwrap();
    assert_eq!(resp.status(), StatusCode::METHOD_NOT_ALLOWED);
    assert_eq!(resp.headers().get(header::ALLOW).unwrap(), "GET");
    let body = axum::body::to_bytes(resp.into_body(), usize::MAX).await.unwrap();
    assert_eq!(&body[..], br#"{"detail":"Method Not Allowed"}"#);

    assert_eq!(metrics.requests_for("POST", "/alice"), 1);
    assert_eq!(metrics.requests_for("GET", "/alice"), 0);
}

#[tokio::test]
async fn head_is_not_served_by_get_routes() {
    let (app, metrics) = app();
    let (status, _, _) = call(&app, Method::HEAD, "/").await;
    assert_eq!(status, StatusCode::METHOD_NOT_ALLOWED);
    assert_eq!(metrics.requests_for("HEAD", "/"), 1);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn concurrent_requests_are_all_counted() {
    let (app, metrics) = app();
    let paths = ["/", "/alice", "/bob", "/"];

    let mut tasks = Vec::new();
    for i in 0..200 {
        let app = app.clone();
        let path = paths[i % paths.len()];
        tasks.push(tokio::spawn(async move {
            let req = Request::builder().uri(path).body(Body::empty()).unwrap();
            app.oneshot(req).await.unwrap().status()
        }));
    }
    for t in tasks {
        assert_eq!(t.await.unwrap(), StatusCode::OK);
    }

    assert_eq!(metrics.requests_for("GET", "/"), 100);
    assert_eq!(metrics.requests_for("GET", "/alice"), 50);
    assert_eq!(metrics.requests_for("GET", "/bob"), 50);
}
