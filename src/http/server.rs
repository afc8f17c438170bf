//! HTTP server setup and configuration.
//!
//! # Responsibilities
//! - Create Axum Router with all handlers
//! - Wire up middleware (request ID, tracing, timeout)
//! - Gate and sample the send route
//! - Bind server to listener and drain it on shutdown

use std::future::IntoFuture;
use std::sync::Arc;
use std::time::Duration;

use axum::{
    body::Body,
    extract::{Path, State},
    http::{header, HeaderName, HeaderValue, Request, StatusCode},
    middleware::{self, Next},
    response::{IntoResponse, Response},
    routing::{get, post},
    Router,
};
use metrics_exporter_prometheus::BuildError;
use thiserror::Error;
use tokio::net::TcpListener;
use tokio::sync::oneshot;
use tower_http::{
    request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer},
    timeout::TimeoutLayer,
    trace::TraceLayer,
};

use crate::config::BridgeConfig;
use crate::health::HealthProbe;
use crate::http::response::{healthy, json_payload};
use crate::lifecycle::ShutdownSignal;
use crate::observability::metrics::{MetricsRecorder, EXPOSITION_CONTENT_TYPE};
use crate::security::{admission_middleware, AdmissionController};
use crate::translator::{BackendClient, BackendError, EnvelopeTranslator};

/// Header carrying the per-request correlation id.
pub const X_REQUEST_ID: &str = "x-request-id";

/// Fatal server errors.
#[derive(Debug, Error)]
pub enum ServerError {
    #[error("failed to build backend client: {0}")]
    Backend(#[from] BackendError),

    #[error("failed to build metrics recorder: {0}")]
    Metrics(#[from] BuildError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("in-flight requests did not drain within {0:?}")]
    DrainTimeout(Duration),
}

/// Application state injected into handlers.
#[derive(Clone)]
pub struct AppState {
    pub translator: Arc<EnvelopeTranslator>,
    pub limiter: Arc<AdmissionController>,
    pub metrics: Arc<MetricsRecorder>,
    pub probe: Arc<HealthProbe>,
}

impl AppState {
    /// Construct every shared component from configuration.
    pub fn from_config(config: &BridgeConfig) -> Result<Self, ServerError> {
        let backend = BackendClient::new(&config.backend)?;
        let metrics = MetricsRecorder::new(config.observability.metrics_sample_rate)?;
        let limiter = AdmissionController::from_config(
            &config.rate_limit,
            Duration::from_secs(config.listener.timeout_secs),
        );

        Ok(Self {
            translator: Arc::new(EnvelopeTranslator::new(backend)),
            limiter: Arc::new(limiter),
            metrics: Arc::new(metrics),
            probe: Arc::new(HealthProbe::new(config.backend.url.clone())),
        })
    }
}

/// HTTP server for the bridge.
pub struct HttpServer {
    router: Router,
    config: BridgeConfig,
}

impl HttpServer {
    /// Create a new HTTP server with the given configuration.
    pub fn new(config: BridgeConfig) -> Result<Self, ServerError> {
        let state = AppState::from_config(&config)?;
        let router = Self::build_router(&config, state);
        Ok(Self { router, config })
    }

    /// Build the Axum router with all middleware layers.
    ///
    /// Only the send route is rate limited and sampled; the metrics layer
    /// wraps admission so refused requests are observed too.
    #[allow(deprecated)]
    fn build_router(config: &BridgeConfig, state: AppState) -> Router {
        let send = post(send_handler)
            .route_layer(middleware::from_fn_with_state(
                state.limiter.clone(),
                admission_middleware,
            ))
            .route_layer(middleware::from_fn_with_state(
                state.metrics.clone(),
                track_send,
            ));

        Router::new()
            .route("/api/v1/{device_id}/send/{service}", send)
            .route("/health", get(health_handler))
            .route("/metrics", get(metrics_handler))
            .with_state(state)
            .layer(TimeoutLayer::new(Duration::from_secs(
                config.listener.timeout_secs,
            )))
            .layer(TraceLayer::new_for_http().make_span_with(|request: &Request<Body>| {
                let request_id = request
                    .headers()
                    .get(X_REQUEST_ID)
                    .and_then(|v| v.to_str().ok())
                    .unwrap_or("unknown");
                tracing::info_span!(
                    "request",
                    method = %request.method(),
                    path = %request.uri().path(),
                    x_request_id = %request_id,
                )
            }))
            .layer(PropagateRequestIdLayer::new(HeaderName::from_static(
                X_REQUEST_ID,
            )))
            .layer(SetRequestIdLayer::new(
                HeaderName::from_static(X_REQUEST_ID),
                MakeRequestUuid,
            ))
    }

    /// Run the server until `shutdown` fires, then drain in-flight requests.
    ///
    /// Draining is bounded by `listener.shutdown_timeout_secs`; exceeding it
    /// is reported as [`ServerError::DrainTimeout`].
    pub async fn run(
        self,
        listener: TcpListener,
        mut shutdown: ShutdownSignal,
    ) -> Result<(), ServerError> {
        let addr = listener.local_addr()?;
        let drain = Duration::from_secs(self.config.listener.shutdown_timeout_secs);
        tracing::info!(
            address = %addr,
            backend_url = %self.config.backend.url,
            "HTTP server starting"
        );

        let (draining_tx, draining_rx) = oneshot::channel();
        let signal = async move {
            shutdown.recv().await;
            tracing::info!("Shutdown signal received, draining connections");
            let _ = draining_tx.send(());
        };

        let serve = axum::serve(listener, self.router.into_make_service())
            .with_graceful_shutdown(signal)
            .into_future();
        tokio::pin!(serve);

        tokio::select! {
            biased;
            result = &mut serve => result?,
            _ = draining_rx => match tokio::time::timeout(drain, &mut serve).await {
                Ok(result) => result?,
                Err(_) => {
                    tracing::error!(timeout = ?drain, "Graceful shutdown timed out");
                    return Err(ServerError::DrainTimeout(drain));
                }
            },
        }

        tracing::info!("HTTP server stopped");
        Ok(())
    }

    /// Get a reference to the config.
    pub fn config(&self) -> &BridgeConfig {
        &self.config
    }
}

async fn track_send(
    State(metrics): State<Arc<MetricsRecorder>>,
    request: Request<Body>,
    next: Next,
) -> Response {
    metrics.track("send", request, next).await
}

/// Translate one JSON command into a WRP exchange with the device.
async fn send_handler(
    State(state): State<AppState>,
    Path((device_id, service)): Path<(String, String)>,
    body: Body,
) -> Response {
    match state.translator.send(&device_id, &service, body).await {
        Ok(payload) => json_payload(payload),
        Err(e) => e.into_response(),
    }
}

async fn health_handler(State(state): State<AppState>) -> Response {
    match state.probe.check().await {
        Ok(()) => healthy(),
        Err(e) => {
            if e.is_config_error() {
                tracing::error!(error = %e, "Health check misconfigured");
            } else {
                tracing::warn!(error = %e, "Backend unreachable");
            }
            e.into_response()
        }
    }
}

async fn metrics_handler(State(state): State<AppState>) -> Response {
    (
        StatusCode::OK,
        [(
            header::CONTENT_TYPE,
            HeaderValue::from_static(EXPOSITION_CONTENT_TYPE),
        )],
        state.metrics.render(),
    )
        .into_response()
}
