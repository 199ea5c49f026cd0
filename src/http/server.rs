//! HTTP server setup and configuration.
//!
//! # Responsibilities
//! - Create Axum Router with all handlers
//! - Wire up middleware (tracing, request ID, outer timeout)
//! - Bind server to listener and stop gracefully on shutdown

use std::time::Duration;

use axum::{body::Body, http::Request, routing::get, Router};
use tokio::net::TcpListener;
use tower_http::{
    request_id::{PropagateRequestIdLayer, SetRequestIdLayer},
    timeout::TimeoutLayer,
    trace::TraceLayer,
};

use crate::aggregator::Aggregator;
use crate::config::AggregatorConfig;
use crate::http::handlers;
use crate::http::request::{MakeRequestUuidV4, RequestIdExt, X_REQUEST_ID};
use crate::lifecycle::Shutdown;

/// Path of the aggregated summary endpoint.
pub const CHAT_SUMMARY_PATH: &str = "/chat/summary";

/// Application state injected into handlers.
#[derive(Clone)]
pub struct AppState {
    pub aggregator: Aggregator,
}

/// HTTP server for the summary aggregator.
pub struct HttpServer {
    router: Router,
    aggregator: Aggregator,
}

impl HttpServer {
    /// Create a new HTTP server with the simulated upstreams from `config`.
    pub fn new(config: AggregatorConfig) -> Self {
        let aggregator = Aggregator::from_config(&config);
        Self::with_aggregator(config, aggregator)
    }

    /// Create a server around an already wired aggregator.
    pub fn with_aggregator(config: AggregatorConfig, aggregator: Aggregator) -> Self {
        let state = AppState {
            aggregator: aggregator.clone(),
        };
        let router = Self::build_router(&config, state);
        Self { router, aggregator }
    }

    /// Build the Axum router with all middleware layers.
    #[allow(deprecated)]
    fn build_router(config: &AggregatorConfig, state: AppState) -> Router {
        Router::new()
            .route(CHAT_SUMMARY_PATH, get(handlers::chat_summary))
            .route("/health", get(handlers::health))
            .with_state(state)
            .layer(TimeoutLayer::new(Duration::from_secs(config.timeouts.request_secs)))
            .layer(PropagateRequestIdLayer::new(X_REQUEST_ID))
            .layer(TraceLayer::new_for_http().make_span_with(|request: &Request<Body>| {
                tracing::info_span!(
                    "request",
                    method = %request.method(),
                    uri = %request.uri(),
                    request_id = %request.headers().request_id(),
                )
            }))
            .layer(SetRequestIdLayer::new(X_REQUEST_ID, MakeRequestUuidV4))
    }

    /// The fully layered router, for driving the service without a socket.
    pub fn router(&self) -> Router {
        self.router.clone()
    }

    pub fn aggregator(&self) -> &Aggregator {
        &self.aggregator
    }

    /// Run the server, accepting connections on the given listener until `shutdown` fires.
    pub async fn run(self, listener: TcpListener, shutdown: Shutdown) -> Result<(), std::io::Error> {
        let addr = listener.local_addr()?;
        tracing::info!(
            address = %addr,
            budget_ms = self.aggregator.budget().as_millis() as u64,
            "HTTP server starting"
        );

        axum::serve(listener, self.router)
            .with_graceful_shutdown(async move { shutdown.wait().await })
            .await?;

        tracing::info!("HTTP server stopped");
        Ok(())
    }
}
