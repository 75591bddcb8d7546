use std::sync::Arc;
use std::time::{Duration, Instant};

use axum::http::header::{HeaderName, AUTHORIZATION, CONTENT_TYPE};
use axum::routing::{delete, get, post};
use axum::Router;
use tower_http::cors::{Any, CorsLayer};
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;

use lingua_core::upstream::{Summarizer, Translator};
use lingua_store::{Database, TranslationRepo};
use lingua_telemetry::MetricsRecorder;

use crate::handlers;

/// Server configuration.
pub struct ServerConfig {
    pub port: u16,
    pub request_timeout_secs: u64,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            port: 9091,
            request_timeout_secs: 300,
        }
    }
}

/// Shared application state passed to Axum handlers.
#[derive(Clone)]
pub struct AppState {
    pub repo: Arc<TranslationRepo>,
    pub translator: Arc<dyn Translator>,
    pub summarizer: Arc<dyn Summarizer>,
    pub metrics: Option<Arc<MetricsRecorder>>,
}

impl AppState {
    pub(crate) fn record_request(&self, endpoint: &str, outcome: &str, started: Instant) {
        if let Some(metrics) = &self.metrics {
            metrics.counter_inc(
                &format!("{endpoint}.requests.total"),
                &[("outcome", outcome)],
                1,
            );
            metrics.histogram_observe(
                "request.duration_ms",
                &[("endpoint", endpoint)],
                started.elapsed().as_secs_f64() * 1000.0,
            );
        }
    }
}

/// Build the Axum router with all routes.
pub fn build_router(state: AppState, request_timeout: Duration) -> Router {
    // Browser clients call the proxy endpoints directly
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers([
            AUTHORIZATION,
            CONTENT_TYPE,
            HeaderName::from_static("x-client-info"),
            HeaderName::from_static("apikey"),
        ]);

    Router::new()
        .route("/functions/translate", post(handlers::translate))
        .route(
            "/functions/generate-summary",
            post(handlers::generate_summary),
        )
        .route(
            "/translations",
            get(handlers::list_translations).post(handlers::insert_translation),
        )
        .route("/translations/{id}", delete(handlers::delete_translation))
        .route("/analytics", get(handlers::analytics))
        .route("/health", get(handlers::health))
        .with_state(state)
        .layer(TraceLayer::new_for_http())
        .layer(TimeoutLayer::new(request_timeout))
        .layer(cors)
}

/// Create and start the server. Returns a handle with the bound port.
pub async fn start(
    config: ServerConfig,
    db: Database,
    translator: Arc<dyn Translator>,
    summarizer: Arc<dyn Summarizer>,
    metrics: Option<Arc<MetricsRecorder>>,
) -> Result<ServerHandle, std::io::Error> {
    let state = AppState {
        repo: Arc::new(TranslationRepo::new(db)),
        translator,
        summarizer,
        metrics,
    };

    let router = build_router(state, Duration::from_secs(config.request_timeout_secs));
    let addr = format!("0.0.0.0:{}", config.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    let local_addr = listener.local_addr()?;

    tracing::info!(port = local_addr.port(), "Lingua server started");

    let server_handle = tokio::spawn(async move {
        axum::serve(listener, router).await.ok();
    });

    Ok(ServerHandle {
        port: local_addr.port(),
        _server: server_handle,
    })
}

/// Handle returned by `start()` — keeps the serve task alive.
pub struct ServerHandle {
    pub port: u16,
    _server: tokio::task::JoinHandle<()>,
}
