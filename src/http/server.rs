//! HTTP server setup and configuration.
//!
//! # Responsibilities
//! - Create Axum Router with a single catch-all handler
//! - Wire up middleware (tracing, timeout)
//! - Bind server to listener
//! - Translate each HTTP request into a dispatch call
//! - Map the dispatch result to a response

use std::future::Future;
use std::sync::Arc;
use std::time::{Duration, Instant};

use axum::{
    body::Body,
    extract::State,
    http::{Method as HttpMethod, Request, StatusCode},
    response::{IntoResponse, Response},
    Router,
};
use tokio::net::TcpListener;
use tower::ServiceBuilder;
use tower_http::{timeout::TimeoutLayer, trace::TraceLayer};

use crate::config::RouterConfig;
use crate::dispatch::Request as DispatchRequest;
use crate::http::request::{is_form, override_method, RequestId, X_REQUEST_ID};
use crate::http::response::{error_response, outcome_response};
use crate::observability::metrics;
use crate::routing::Router as RequestRouter;

/// Application state injected into the handler.
#[derive(Clone)]
pub struct AppState {
    pub router: Arc<RequestRouter>,
    pub override_field: Arc<str>,
    pub max_form_bytes: usize,
}

/// HTTP front end for a built [`RequestRouter`].
pub struct HttpServer {
    app: Router,
    config: RouterConfig,
}

impl HttpServer {
    /// Create a new HTTP server serving `router`.
    pub fn new(router: impl Into<Arc<RequestRouter>>, config: RouterConfig) -> Self {
        let state = AppState {
            router: router.into(),
            override_field: Arc::from(config.dispatch.method_override_field.as_str()),
            max_form_bytes: config.dispatch.max_form_bytes,
        };
        let app = Self::build_app(&config, state);
        Self { app, config }
    }

    /// Build the Axum router with all middleware layers.
    #[allow(deprecated)]
    fn build_app(config: &RouterConfig, state: AppState) -> Router {
        Router::new()
            .fallback(dispatch_handler)
            .with_state(state)
            .layer(
                ServiceBuilder::new()
                    .layer(TraceLayer::new_for_http())
                    .layer(TimeoutLayer::new(Duration::from_secs(
                        config.listener.request_timeout_secs,
                    ))),
            )
    }

    /// The Axum application, for embedding or in-process testing.
    pub fn app(&self) -> Router {
        self.app.clone()
    }

    /// Get a reference to the config.
    pub fn config(&self) -> &RouterConfig {
        &self.config
    }

    /// Run the server until Ctrl+C.
    pub async fn run(self, listener: TcpListener) -> Result<(), std::io::Error> {
        self.run_with_shutdown(listener, shutdown_signal()).await
    }

    /// Run the server until `shutdown` completes.
    pub async fn run_with_shutdown<F>(self, listener: TcpListener, shutdown: F) -> Result<(), std::io::Error>
    where
        F: Future<Output = ()> + Send + 'static,
    {
        let addr = listener.local_addr()?;
        tracing::info!(address = %addr, "HTTP server starting");

        axum::serve(listener, self.app)
            .with_graceful_shutdown(shutdown)
            .await?;

        tracing::info!("HTTP server stopped");
        Ok(())
    }
}

/// Catch-all handler: every request goes through the request router.
async fn dispatch_handler(State(state): State<AppState>, request: Request<Body>) -> Response {
    let start = Instant::now();
    let request_id = RequestId::new();
    let (parts, body) = request.into_parts();

    let override_value = if parts.method == HttpMethod::POST && is_form(&parts.headers) {
        match axum::body::to_bytes(body, state.max_form_bytes).await {
            Ok(bytes) => override_method(&bytes, &state.override_field),
            Err(e) => {
                tracing::warn!(request_id = %request_id, error = %e, "Could not read form body");
                None
            }
        }
    } else {
        None
    };

    let request = DispatchRequest::with_override(
        parts.method.as_str(),
        parts.uri.path(),
        override_value.as_deref(),
    );
    let span = tracing::info_span!(
        "dispatch",
        request_id = %request_id,
        method = %request.method(),
        path = %request.path()
    );

    let router = state.router.clone();
    let result = tokio::task::spawn_blocking(move || {
        let _entered = span.enter();
        router.dispatch(&request)
    })
    .await;
    metrics::record_request_duration(start);

    let mut response = match result {
        Ok(Ok(outcome)) => outcome_response(&outcome),
        Ok(Err(err)) => {
            tracing::error!(request_id = %request_id, error = %err, "Dispatch failed");
            error_response(&err)
        }
        Err(join_error) => {
            tracing::error!(request_id = %request_id, error = %join_error, "Dispatch task aborted");
            (StatusCode::INTERNAL_SERVER_ERROR, "Internal Server Error").into_response()
        }
    };
    response
        .headers_mut()
        .insert(X_REQUEST_ID, request_id.header_value());
    response
}

/// Wait for shutdown signal (Ctrl+C).
async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to install Ctrl+C handler");
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutdown signal received");
}
