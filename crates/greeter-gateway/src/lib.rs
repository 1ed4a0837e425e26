//! greeter gateway library entry.
//!
//! Wires config, the metrics registry, the counting middleware and the
//! handlers into an axum router. Consumed by the binary (`main.rs`) and by
//! integration tests.

pub mod app_state;
pub mod config;
pub mod handlers;
pub mod middleware;
pub mod obs;
pub mod router;
