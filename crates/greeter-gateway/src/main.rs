//! greeter gateway binary.
//!
//! - `GET /` and `GET /:name` greet the caller
//! - `GET /metrics` exposes `http_requests_total`
//! - Optional config path as the first argument (default `greeter.yaml`)

use tracing_subscriber::{fmt, EnvFilter};

use greeter_core::error::{GreeterError, Result};
use greeter_gateway::{app_state, config, router};

#[tokio::main]
async fn main() -> Result<()> {
    fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();

    run().await.inspect_err(|e| {
        tracing::error!(code = e.client_code().as_str(), error = %e, "greeter-gateway failed");
    })
}

async fn run() -> Result<()> {
    let path = std::env::args().nth(1);
    let cfg = config::load(path.as_deref())?;
    let listen = cfg.server.listen_addr()?;

    let app = router::build_router(app_state::AppState::new());

    tracing::info!(%listen, "greeter-gateway starting");
    let listener = tokio::net::TcpListener::bind(listen)
        .await
        .map_err(|e| GreeterError::Internal(format!("bind {listen} failed: {e}")))?;

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(|e| GreeterError::Internal(format!("server failed: {e}")))
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "failed to install Ctrl+C handler");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut sig) => {
                sig.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
    tracing::info!("signal received, starting graceful shutdown");
}
