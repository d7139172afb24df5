//! The HTTP surface: an `axum` router over the operations in `commands`.

mod handlers;
mod response;

use crate::api::Source;
use crate::db::Db;
use crate::error::Res;
use crate::Config;
use anyhow::Context;
use axum::http::Method;
use axum::routing::get;
use axum::Router;
use std::sync::Arc;
use tokio::net::TcpListener;
use tokio::signal::ctrl_c;
#[cfg(unix)]
use tokio::signal::unix::{signal, SignalKind};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::{info, warn};

/// Everything a request handler needs. Cloned for every request.
#[derive(Clone)]
pub(crate) struct AppState {
    db: Db,
    source: Arc<dyn Source>,
}

impl AppState {
    pub(crate) fn new(db: Db, source: Arc<dyn Source>) -> Self {
        Self { db, source }
    }

    pub(crate) fn db(&self) -> &Db {
        &self.db
    }

    pub(crate) fn source(&self) -> &dyn Source {
        self.source.as_ref()
    }
}

pub(crate) fn router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::OPTIONS])
        .allow_headers(Any);

    Router::new()
        .route("/initialize", get(handlers::initialize))
        .route("/transactions", get(handlers::transactions))
        .route("/statistics", get(handlers::statistics))
        .route("/price-range", get(handlers::price_range))
        .route("/category-breakdown", get(handlers::category_breakdown))
        .route("/combined", get(handlers::combined))
        .route("/health", get(handlers::health))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Binds the configured address and serves until Ctrl-C or SIGTERM.
pub(crate) async fn run(config: &Config, state: AppState) -> Res<()> {
    let address = config.listen_addr();
    let listener = TcpListener::bind(&address)
        .await
        .with_context(|| format!("Failed to bind {address}"))?;
    info!("Server running on {address}");

    axum::serve(listener, router(state))
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("The HTTP server failed")?;

    info!("Server shut down");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        match ctrl_c().await {
            Ok(()) => info!("Received Ctrl+C, shutting down"),
            Err(e) => {
                warn!("Failed to install Ctrl+C handler: {e}");
                std::future::pending::<()>().await
            }
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal(SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
                info!("Received terminate signal, shutting down");
            }
            Err(e) => {
                warn!("Failed to install signal handler: {e}");
                std::future::pending::<()>().await
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
