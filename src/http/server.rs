//! HTTP server setup and configuration.
//!
//! # Responsibilities
//! - Create the Axum router with all handlers
//! - Wire up middleware (trace, request id, CORS, timeout, limits)
//! - Keep every error body in the `{"error"}` shape
//! - Bind server to listener and shut down gracefully

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use axum::{
    http::{header, HeaderValue, Method, StatusCode},
    middleware,
    routing::{get, post},
    Router,
};
use tokio::net::TcpListener;
use tokio::sync::broadcast;
use tower_http::{
    cors::{Any, CorsLayer},
    limit::RequestBodyLimitLayer,
    request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer},
    timeout::TimeoutLayer,
    trace::TraceLayer,
};

use crate::blockchain::LedgerClient;
use crate::config::RelayConfig;
use crate::http::error::json_error_body;
use crate::http::handlers;
use crate::http::request::{make_request_span, X_REQUEST_ID};
use crate::security::{rate_limit_middleware, RateLimiterState};
use crate::sponsor::{SponsorSettings, TransactionMapper};

/// Application state injected into handlers.
#[derive(Clone)]
pub struct AppState {
    pub mapper: Arc<TransactionMapper>,
}

/// HTTP server for the relay.
pub struct HttpServer {
    router: Router,
    config: RelayConfig,
}

impl HttpServer {
    /// Create a new HTTP server from configuration and a ledger client.
    pub fn new(config: RelayConfig, ledger: Arc<dyn LedgerClient>) -> Self {
        let mapper = TransactionMapper::new(SponsorSettings::from(&config.sui), ledger);
        let state = AppState {
            mapper: Arc::new(mapper),
        };

        let router = Self::build_router(&config, state);
        Self { router, config }
    }

    /// Build the Axum router with all middleware layers.
    fn build_router(config: &RelayConfig, state: AppState) -> Router {
        let api = Router::new()
            .route("/", get(handlers::root))
            .route("/health", get(handlers::health))
            .route("/create-profile", post(handlers::create_profile))
            .route("/add-link", post(handlers::add_link))
            .route("/update-link", post(handlers::update_link))
            .route("/remove-link", post(handlers::remove_link))
            .route("/update-profile", post(handlers::update_profile))
            .route("/execute", post(handlers::execute))
            .with_state(state);

        let mut router = if config.listener.base_path.is_empty() {
            api
        } else {
            Router::new().nest(&config.listener.base_path, api)
        };

        if config.rate_limit.enabled {
            let limiter = Arc::new(RateLimiterState::new(&config.rate_limit));
            router = router.layer(middleware::from_fn_with_state(limiter, rate_limit_middleware));
        }

        router
            .layer(RequestBodyLimitLayer::new(config.security.max_body_size))
            .layer(TimeoutLayer::with_status_code(
                StatusCode::REQUEST_TIMEOUT,
                Duration::from_secs(config.timeouts.request_secs),
            ))
            .layer(middleware::map_response(json_error_body))
            .layer(cors_layer(&config.listener.cors_origins))
            .layer(PropagateRequestIdLayer::new(X_REQUEST_ID))
            .layer(TraceLayer::new_for_http().make_span_with(make_request_span))
            .layer(SetRequestIdLayer::new(X_REQUEST_ID, MakeRequestUuid))
    }

    /// The fully layered router, for in-process use.
    pub fn router(&self) -> Router {
        self.router.clone()
    }

    /// Run the server until `shutdown` fires, then drain in-flight requests.
    pub async fn run(
        self,
        listener: TcpListener,
        mut shutdown: broadcast::Receiver<()>,
    ) -> Result<(), std::io::Error> {
        let addr = listener.local_addr()?;
        tracing::info!(
            address = %addr,
            base_path = %self.config.listener.base_path,
            package_id = %self.config.sui.package_id,
            "HTTP server starting"
        );

        let app = self.router.into_make_service_with_connect_info::<SocketAddr>();

        axum::serve(listener, app)
            .with_graceful_shutdown(async move {
                let _ = shutdown.recv().await;
                tracing::info!("Shutdown signal received");
            })
            .await?;

        tracing::info!("HTTP server stopped");
        Ok(())
    }

    /// Get a reference to the config.
    pub fn config(&self) -> &RelayConfig {
        &self.config
    }
}

fn cors_layer(origins: &[String]) -> CorsLayer {
    let layer = CorsLayer::new()
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION])
        .expose_headers([X_REQUEST_ID]);

    if origins.is_empty() {
        return layer.allow_origin(Any);
    }

    let parsed: Vec<HeaderValue> = origins
        .iter()
        .filter_map(|origin| match origin.parse() {
            Ok(value) => Some(value),
            Err(_) => {
                tracing::warn!(origin = %origin, "Ignoring invalid CORS origin");
                None
            }
        })
        .collect();
    layer.allow_origin(parsed)
}
