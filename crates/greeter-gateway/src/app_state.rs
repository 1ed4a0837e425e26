//! Shared application state for the greeter gateway.

use std::sync::Arc;

use crate::obs::HttpMetrics;

#[derive(Clone, Default)]
pub struct AppState {
    metrics: Arc<HttpMetrics>,
}

impl AppState {
    /// Build application state with a fresh metrics registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Build application state around an existing registry.
    pub fn with_metrics(metrics: Arc<HttpMetrics>) -> Self {
        Self { metrics }
    }

    pub fn metrics(&self) -> Arc<HttpMetrics> {
        Arc::clone(&self.metrics)
    }
}
