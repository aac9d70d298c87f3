//! Gateway HTTP server.
//!
//! # Responsibilities
//! - Create the Axum router with the gateway handler
//! - Wire up middleware (tracing, request timeout)
//! - Fan each client request out to every configured source
//! - Record source response headers into the per-request registry
//! - Compose the reconciled header set onto the outbound response
//! - Sweep registry entries left behind by abandoned requests

use std::sync::Arc;
use std::time::{Duration, Instant};

use axum::{
    body::{Body, Bytes},
    extract::State,
    http::{header, request::Parts, HeaderMap, Request, StatusCode, Uri},
    response::IntoResponse,
    routing::any,
    Json, Router,
};
use futures_util::future::join_all;
use hyper_util::{
    client::legacy::{connect::HttpConnector, Client},
    rt::TokioExecutor,
};
use serde_json::{json, Value};
use tokio::net::TcpListener;
use tower_http::{timeout::TimeoutLayer, trace::TraceLayer};
use uuid::Uuid;

use crate::config::{MeshConfig, SourceConfig};
use crate::headers::{
    apply_headers, compose_response_headers, project_source_headers, HeaderRegistry,
};
use crate::http::request::should_include_metadata;
use crate::observability::metrics;

/// How often abandoned registry entries are swept.
const PURGE_INTERVAL: Duration = Duration::from_secs(60);

/// Registry entries older than this belong to abandoned requests.
const PURGE_MAX_AGE: Duration = Duration::from_secs(300);

// Inbound headers that must not be replayed to sources.
const UNFORWARDED_HEADERS: [header::HeaderName; 4] = [
    header::HOST,
    header::CONTENT_LENGTH,
    header::CONNECTION,
    header::TRANSFER_ENCODING,
];

/// Application state injected into handlers.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<MeshConfig>,
    pub registry: Arc<HeaderRegistry>,
    pub client: Client<HttpConnector, Body>,
}

/// HTTP server for the gateway.
pub struct GatewayServer {
    router: Router,
    registry: Arc<HeaderRegistry>,
}

impl GatewayServer {
    /// Create a new gateway server with the given configuration.
    pub fn new(config: MeshConfig) -> Self {
        let registry = Arc::new(HeaderRegistry::new());
        let client = Client::builder(TokioExecutor::new()).build(HttpConnector::new());

        let config = Arc::new(config);
        let state = AppState {
            config: config.clone(),
            registry: registry.clone(),
            client,
        };

        let router = Self::build_router(&config, state);
        Self { router, registry }
    }

    /// Build the Axum router with all middleware layers.
    fn build_router(config: &MeshConfig, state: AppState) -> Router {
        Router::new()
            .route("/{*path}", any(gateway_handler))
            .route("/", any(gateway_handler))
            .with_state(state)
            .layer(TimeoutLayer::new(Duration::from_secs(
                config.timeouts.request_secs,
            )))
            .layer(TraceLayer::new_for_http())
    }

    /// Run the server, accepting connections on the given listener.
    pub async fn run(self, listener: TcpListener) -> Result<(), std::io::Error> {
        let addr = listener.local_addr()?;
        tracing::info!(address = %addr, "Gateway server starting");

        // Sweep registry entries for requests that never composed a
        // response (client disconnect, timeout).
        let registry = self.registry.clone();
        tokio::spawn(async move {
            let mut interval = tokio::time::interval(PURGE_INTERVAL);
            loop {
                interval.tick().await;
                let purged = registry.purge_stale(PURGE_MAX_AGE);
                if purged > 0 {
                    tracing::debug!(purged, "Purged abandoned header registry entries");
                }
            }
        });

        axum::serve(listener, self.router)
            .with_graceful_shutdown(shutdown_signal())
            .await?;

        tracing::info!("Gateway server stopped");
        Ok(())
    }
}

/// Main gateway handler.
///
/// Fans the request out to every configured source, collects their
/// response headers through the registry, and returns an aggregate
/// body under the reconciled header set.
async fn gateway_handler(
    State(state): State<AppState>,
    request: Request<Body>,
) -> impl IntoResponse {
    let start_time = Instant::now();
    let request_id = Uuid::new_v4();
    let (parts, body) = request.into_parts();
    let include_metadata = should_include_metadata(&parts);
    let method = parts.method.to_string();

    tracing::debug!(
        request_id = %request_id,
        method = %method,
        path = %parts.uri.path(),
        include_metadata,
        "Dispatching to sources"
    );

    // Buffer the body once so it can be replayed to every source.
    let body_bytes = match axum::body::to_bytes(body, state.config.listener.max_body_bytes).await {
        Ok(bytes) => bytes,
        Err(_) => {
            metrics::record_request(&method, 413, start_time);
            return (StatusCode::PAYLOAD_TOO_LARGE, "Request body too large").into_response();
        }
    };

    let fetches = state
        .config
        .sources
        .iter()
        .map(|source| fetch_source(&state, source, &parts, &body_bytes, request_id));
    let results = join_all(fetches).await;

    let mut aggregate = serde_json::Map::new();
    for (source, result) in state.config.sources.iter().zip(results) {
        aggregate.insert(source.name.clone(), result);
    }

    // All fetches are done; reconcile the collected headers.
    let collected = state.registry.drain(request_id);
    let projected = project_source_headers(&state.config, &collected, include_metadata);
    let composed =
        compose_response_headers(Some(&state.config.response), projected, &collected);

    let mut response = (StatusCode::OK, Json(Value::Object(aggregate))).into_response();
    apply_headers(response.headers_mut(), composed);

    metrics::record_request(&method, 200, start_time);
    response
}

/// Fetch one source and record its response headers.
///
/// A failing fetch never fails the gateway request; the error lands in
/// that source's slot of the aggregate body instead.
async fn fetch_source(
    state: &AppState,
    source: &SourceConfig,
    parts: &Parts,
    body: &Bytes,
    request_id: Uuid,
) -> Value {
    let start_time = Instant::now();

    let uri: Uri = match source.endpoint.parse() {
        Ok(uri) => uri,
        Err(_) => {
            tracing::warn!(source = %source.name, endpoint = %source.endpoint, "Invalid source endpoint");
            return json!({ "error": "invalid endpoint" });
        }
    };

    let mut builder = Request::builder().method(parts.method.clone()).uri(uri);
    if let Some(headers) = builder.headers_mut() {
        for (name, value) in parts.headers.iter() {
            if UNFORWARDED_HEADERS.contains(name) {
                continue;
            }
            headers.insert(name.clone(), value.clone());
        }
    }
    let request = match builder.body(Body::from(body.clone())) {
        Ok(request) => request,
        Err(error) => {
            tracing::warn!(source = %source.name, error = %error, "Failed to build source request");
            return json!({ "error": "invalid request" });
        }
    };

    let fetch_timeout = Duration::from_secs(state.config.timeouts.fetch_secs);
    match tokio::time::timeout(fetch_timeout, state.client.request(request)).await {
        Ok(Ok(response)) => {
            let status = response.status();
            record_source_headers(&state.registry, request_id, &source.name, response.headers());
            metrics::record_source_fetch(&source.name, status.as_u16(), start_time);

            let body = axum::body::to_bytes(
                Body::new(response.into_body()),
                state.config.listener.max_body_bytes,
            )
            .await
            .unwrap_or_default();
            let body = serde_json::from_slice::<Value>(&body)
                .unwrap_or_else(|_| Value::String(String::from_utf8_lossy(&body).into_owned()));

            json!({ "status": status.as_u16(), "body": body })
        }
        Ok(Err(error)) => {
            tracing::warn!(source = %source.name, error = %error, "Source fetch failed");
            metrics::record_source_fetch(&source.name, 502, start_time);
            json!({ "error": error.to_string() })
        }
        Err(_) => {
            tracing::warn!(source = %source.name, timeout_secs = state.config.timeouts.fetch_secs, "Source fetch timed out");
            metrics::record_source_fetch(&source.name, 504, start_time);
            json!({ "error": "timeout" })
        }
    }
}

/// Record every header occurrence from one source response.
///
/// set-cookie occurrences are recorded individually (one response may
/// set several cookies); every other header also records once per
/// occurrence. Deduplication happens later, at projection.
fn record_source_headers(
    registry: &HeaderRegistry,
    request_id: Uuid,
    source: &str,
    headers: &HeaderMap,
) {
    for value in headers.get_all(header::SET_COOKIE) {
        if let Ok(value) = value.to_str() {
            registry.record(request_id, source, "set-cookie", value);
        }
    }
    for (name, value) in headers.iter() {
        if *name == header::SET_COOKIE {
            continue;
        }
        if let Ok(value) = value.to_str() {
            registry.record(request_id, source, name.as_str(), value);
        }
    }
}

/// Wait for shutdown signal (Ctrl+C).
async fn shutdown_signal() {
    if tokio::signal::ctrl_c().await.is_err() {
        tracing::error!("Failed to install Ctrl+C handler");
        return;
    }
    tracing::info!("Shutdown signal received");
}
