use std::net::SocketAddr;
use std::time::Duration;

use anyhow::Context;
use axum::Router;
use runtime::ServerConfig;
use tower_http::{
    catch_panic::CatchPanicLayer, limit::RequestBodyLimitLayer, timeout::TimeoutLayer,
    trace::TraceLayer,
};

const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);
const BODY_LIMIT_BYTES: usize = 1024 * 1024;

/// Wrap the module routes with the HTTP middleware stack.
///
/// `CatchPanicLayer` is outermost so a fatal fault inside a handler becomes a
/// 500 for that request instead of a dropped connection.
pub fn build_app(routes: Router, cfg: &ServerConfig) -> Router {
    let timeout = match cfg.timeout_sec {
        0 => DEFAULT_TIMEOUT,
        secs => Duration::from_secs(secs),
    };

    routes
        .layer(RequestBodyLimitLayer::new(BODY_LIMIT_BYTES))
        .layer(TimeoutLayer::new(timeout))
        .layer(TraceLayer::new_for_http())
        .layer(CatchPanicLayer::new())
}

pub fn bind_addr(cfg: &ServerConfig) -> anyhow::Result<SocketAddr> {
    let raw = format!("{}:{}", cfg.host, cfg.port);
    raw.parse()
        .with_context(|| format!("invalid bind address '{raw}'"))
}

/// Bind and serve until Ctrl-C (or SIGTERM on unix).
pub async fn serve(app: Router, addr: SocketAddr) -> anyhow::Result<()> {
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("failed to bind {addr}"))?;
    tracing::info!("HTTP server bound on {}", listener.local_addr()?);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(|e| anyhow::anyhow!(e))
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::warn!("failed to listen for Ctrl-C: {e}");
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
                tracing::warn!("failed to listen for SIGTERM: {e}");
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
    tracing::info!("HTTP server shutting down gracefully");
}
