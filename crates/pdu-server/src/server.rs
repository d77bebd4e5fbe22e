//! Server bootstrap

use std::future::Future;
use std::sync::Arc;

use anyhow::Context;
use axum::{
    extract::{DefaultBodyLimit, MatchedPath},
    http::Request,
    Router,
};
use pdu_control::PowerBackend;
use tokio::net::TcpListener;
use tower_http::trace::{DefaultOnRequest, DefaultOnResponse, TraceLayer};
use tracing::{error, info, Level, Span};

use crate::api::{api_router, AppState};
use crate::config::{Config, ServerConfig};
use crate::handler::PowerOnHandler;

/// Build the application router
pub fn app(handler: PowerOnHandler, config: &ServerConfig) -> Router {
    Router::new()
        .nest("/api", api_router())
        .layer(DefaultBodyLimit::max(config.max_body_bytes))
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(|request: &Request<axum::body::Body>| {
                    let matched_path = request
                        .extensions()
                        .get::<MatchedPath>()
                        .map(MatchedPath::as_str)
                        .unwrap_or(request.uri().path());

                    tracing::debug_span!(
                        "http-request",
                        method = %request.method(),
                        uri = %request.uri(),
                        matched_path = matched_path,
                    )
                })
                .on_request(DefaultOnRequest::new().level(Level::INFO))
                .on_response(
                    DefaultOnResponse::new()
                        .level(Level::INFO)
                        .latency_unit(tower_http::LatencyUnit::Micros),
                )
                .on_failure(
                    |error: tower_http::classify::ServerErrorsFailureClass,
                     latency: std::time::Duration,
                     span: &Span| {
                        tracing::error!(parent: span, latency = ?latency, error = ?error, "Request failed");
                    },
                ),
        )
        .with_state(AppState { handler })
}

/// Serve `app` on `listener` until `shutdown` resolves
pub async fn serve<F>(listener: TcpListener, app: Router, shutdown: F) -> anyhow::Result<()>
where
    F: Future<Output = ()> + Send + 'static,
{
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown)
        .await
        .context("Server error")
}

/// Bind the configured address and serve until Ctrl+C or SIGTERM
pub async fn run(config: Config, backend: Arc<dyn PowerBackend>) -> anyhow::Result<()> {
    let listener = TcpListener::bind(config.server.bind)
        .await
        .with_context(|| format!("Failed to bind {}", config.server.bind))?;
    info!(address = %config.server.bind, "PDU gateway listening");

    let app = app(PowerOnHandler::new(backend), &config.server);
    serve(listener, app, shutdown_signal()).await?;

    info!("Shutdown complete");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            error!("Failed to listen for Ctrl+C: {}", e);
            std::future::pending::<()>().await;
        }
        info!("Received Ctrl+C");
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
                info!("Received SIGTERM");
            }
            Err(e) => {
                error!("Failed to listen for SIGTERM: {}", e);
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
}
