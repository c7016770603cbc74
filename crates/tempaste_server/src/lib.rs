//! HTTP server wiring for tempaste (routes, middleware and shared state).

/// HTTP error mapping for API handlers.
pub mod error;
/// Strict JSON body extractor.
pub mod extract;
/// HTTP handlers for paste and health endpoints.
pub mod handlers;
/// Tracing subscriber setup.
pub mod logging;

pub use tempaste_core::{config, db, models, AppError, Config, Database, PasteService, DEFAULT_PORT};

use axum::{
    extract::DefaultBodyLimit,
    http::{header, HeaderValue},
    routing::{get, post},
    Router,
};
use std::future::Future;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tempaste_core::PasteLifecycle;
use tokio::task::JoinHandle;
use tower_http::{
    compression::CompressionLayer,
    set_header::SetResponseHeaderLayer,
    timeout::TimeoutLayer,
    trace::{DefaultMakeSpan, DefaultOnResponse, TraceLayer},
};
use tracing::Level;

/// Shared state passed to HTTP handlers.
#[derive(Clone)]
pub struct AppState {
    pub service: PasteService,
    pub config: Arc<Config>,
}

impl AppState {
    /// Construct shared application state with an entropy-seeded lifecycle.
    ///
    /// # Arguments
    /// - `config`: Loaded configuration.
    /// - `db`: Open database handle.
    ///
    /// # Returns
    /// A new [`AppState`].
    pub fn new(config: Config, db: &Database) -> Self {
        let lifecycle = PasteLifecycle::new(config.lifecycle());
        Self::with_service(config, PasteService::new(db.store(), lifecycle))
    }

    /// Construct shared application state around an existing service.
    pub fn with_service(config: Config, service: PasteService) -> Self {
        Self {
            service,
            config: Arc::new(config),
        }
    }
}

/// Create the application router with all routes and middleware.
///
/// # Arguments
/// - `state`: Shared application state.
///
/// # Returns
/// Configured `axum::Router`.
pub fn create_app(state: AppState) -> Router {
    let max_body_bytes = state.config.max_body_bytes;
    let request_timeout = state.config.request_timeout();

    Router::new()
        .route("/", post(handlers::paste::create_paste))
        .route("/health", get(handlers::health::health))
        .route(
            "/:id",
            get(handlers::paste::get_paste)
                .put(handlers::paste::edit_paste)
                .delete(handlers::paste::delete_paste),
        )
        .with_state(state)
        .layer(
            tower::ServiceBuilder::new()
                .layer(DefaultBodyLimit::max(max_body_bytes))
                .layer(
                    TraceLayer::new_for_http()
                        .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
                        .on_response(DefaultOnResponse::new().level(Level::INFO)),
                )
                .layer(CompressionLayer::new())
                .layer(SetResponseHeaderLayer::overriding(
                    header::X_CONTENT_TYPE_OPTIONS,
                    HeaderValue::from_static("nosniff"),
                ))
                .layer(SetResponseHeaderLayer::overriding(
                    header::X_FRAME_OPTIONS,
                    HeaderValue::from_static("DENY"),
                ))
                .layer(TimeoutLayer::new(request_timeout)),
        )
}

/// Resolve the listener address from the `BIND` override and configured port.
///
/// # Returns
/// `BIND` when it parses as a socket address, otherwise `0.0.0.0:<port>`.
pub fn resolve_bind_address(config: &Config) -> SocketAddr {
    let default_bind = SocketAddr::from(([0, 0, 0, 0], config.port));
    match std::env::var("BIND") {
        Ok(value) => match value.trim().parse::<SocketAddr>() {
            Ok(addr) => addr,
            Err(err) => {
                tracing::warn!(
                    "Invalid BIND='{}': {}. Falling back to {}",
                    value,
                    err,
                    default_bind
                );
                default_bind
            }
        },
        Err(_) => default_bind,
    }
}

/// Run the Axum server with graceful shutdown support.
///
/// # Arguments
/// - `listener`: Bound TCP listener for the server.
/// - `state`: Shared application state.
/// - `shutdown_signal`: Future that resolves when shutdown should start.
///
/// # Errors
/// Returns any I/O error produced by `axum::serve`.
pub async fn serve_router(
    listener: tokio::net::TcpListener,
    state: AppState,
    shutdown_signal: impl Future<Output = ()> + Send + 'static,
) -> Result<(), std::io::Error> {
    let app = create_app(state);
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal)
        .await
}

/// Spawn the expired-paste sweeper.
///
/// Runs `purge_expired` every `interval` until the returned handle is
/// aborted. Failures are logged and the next tick tries again.
pub fn spawn_purge_task(service: PasteService, interval: Duration) -> JoinHandle<()> {
    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(interval);
        ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);
        loop {
            ticker.tick().await;
            if let Err(err) = service.purge_expired() {
                tracing::error!("Expiry sweep failed: {}", err);
            }
        }
    })
}
