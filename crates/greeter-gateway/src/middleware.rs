//! Request pipeline stages that run ahead of routing.
//!
//! - `canonical_path`: percent-decodes the path so routing sees `/metrics`
//!   for `/%6Detrics`, re-encoding only bytes a URI path cannot carry.
//! - `count_requests`: counts (method, decoded path), except scrapes of the
//!   metrics endpoint.
//!
//! Both wrap the whole router, so a request is counted whether a handler,
//! the 404 fallback or a 405 answers it.

use std::borrow::Cow;

use axum::{
    extract::{Request, State},
    http::{uri::PathAndQuery, Uri},
    middleware::Next,
    response::Response,
};
use percent_encoding::{percent_decode_str, utf8_percent_encode, AsciiSet, CONTROLS};

use crate::app_state::AppState;

/// Path served by the metrics handler. Never counted.
pub const METRICS_PATH: &str = "/metrics";

/// Bytes that stay encoded in a canonical path.
const PATH_RESERVED: &AsciiSet = &CONTROLS
    .add(b' ')
    .add(b'"')
    .add(b'#')
    .add(b'%')
    .add(b'<')
    .add(b'>')
    .add(b'?')
    .add(b'[')
    .add(b'\\')
    .add(b']')
    .add(b'^')
    .add(b'`')
    .add(b'{')
    .add(b'|')
    .add(b'}');

/// Decoded form of a URI path. Invalid UTF-8 sequences become U+FFFD.
pub fn decoded_path(uri: &Uri) -> Cow<'_, str> {
    percent_decode_str(uri.path()).decode_utf8_lossy()
}

/// Rewrite the request URI so its path is decoded as far as a URI allows.
///
/// `%2F` decodes to `/` and therefore changes which route matches. A path that
/// cannot be rebuilt is left untouched.
pub async fn canonical_path(mut request: Request) -> Request {
    let encoded = utf8_percent_encode(&decoded_path(request.uri()), PATH_RESERVED).to_string();
    if encoded == request.uri().path() {
        return request;
    }

    let path_and_query = match request.uri().query() {
        Some(q) => format!("{encoded}?{q}"),
        None => encoded,
    };
    let mut parts = request.uri().clone().into_parts();
    match PathAndQuery::try_from(path_and_query) {
        Ok(pq) => parts.path_and_query = Some(pq),
        Err(e) => {
            tracing::debug!(error = %e, "path left as received");
            return request;
        }
    }
    match Uri::from_parts(parts) {
        Ok(uri) => *request.uri_mut() = uri,
        Err(e) => tracing::debug!(error = %e, "path left as received"),
    }
    request
}

/// Count (method, decoded path) and forward the request.
///
/// The increment happens before `next` runs: the metrics handler never sees
/// its own request, and a handler that fails or stalls has already been
/// counted. The downstream response is returned as-is.
pub async fn count_requests(
    State(state): State<AppState>,
    request: Request,
    next: Next,
) -> Response {
    let path = decoded_path(request.uri()).into_owned();
    if path == METRICS_PATH {
        return next.run(request).await;
    }

    let method = request.method().as_str();
    state.metrics().observe_request(method, &path);
    tracing::debug!(%method, endpoint = %path, "request counted");

    next.run(request).await
}
