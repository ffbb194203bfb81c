//! HTTP server setup and the edge handler.
//!
//! # Responsibilities
//! - Create the Axum router with the catch-all proxy handler
//! - Wire up middleware (tracing, timeout, CORS injection)
//! - Short-circuit preflight and health-check requests
//! - Dispatch everything else through Router → Rewriter → Forwarder
//! - Serve over the TLS listener
//!
//! # Request state machine
//! ```text
//! Received → Preflight   (OPTIONS, any path)        → Responded
//!          → HealthCheck (GET /health)              → Responded
//!          → Routed      (router → rewrite → forward) → Responded
//! ```
//! Every branch writes exactly one response; nothing is shared between
//! requests except the startup-built context in `AppState`.

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::{Duration, Instant};

use axum::body::Body;
use axum::extract::{ConnectInfo, State};
use axum::http::{Method, Request, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::any;
use axum::{Json, Router};
use axum_server::tls_rustls::RustlsConfig;
use axum_server::Handle;
use serde_json::json;
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;

use crate::config::ProxyConfig;
use crate::http::{cors, error, forward::forward, rewrite::rewrite};
use crate::observability::metrics;
use crate::routing::Router as ProxyRouter;
use crate::transport::TransportPool;
use crate::upstream::{RegistryError, UpstreamRegistry};

/// Per-process context, built once at startup and passed to every request.
#[derive(Clone)]
pub struct AppState {
    pub router: Arc<ProxyRouter>,
    pub registry: Arc<UpstreamRegistry>,
    pub transport: Arc<TransportPool>,
    pub response_timeout: Option<Duration>,
    pub identity: String,
}

impl AppState {
    /// Build the full context from configuration.
    pub fn from_config(config: &ProxyConfig) -> Result<Self, RegistryError> {
        let registry = Arc::new(UpstreamRegistry::from_config(
            &config.upstreams,
            &config.default_upstream,
        )?);
        let router = Arc::new(ProxyRouter::from_config(
            &config.routes,
            &config.default_upstream,
        ));
        let transport = Arc::new(TransportPool::new(&registry, &config.timeouts));

        for upstream in registry.iter() {
            tracing::info!(
                upstream = %upstream.name,
                origin = %upstream.origin,
                skip_tls_verify = upstream.skip_tls_verify,
                "Upstream registered"
            );
        }

        Ok(Self {
            router,
            registry,
            transport,
            response_timeout: config.timeouts.upstream_response_secs.map(Duration::from_secs),
            identity: config.identity.clone(),
        })
    }
}

/// HTTPS server for the proxy.
pub struct HttpServer {
    router: Router,
}

impl HttpServer {
    /// Create a new server with the given configuration.
    pub fn new(config: ProxyConfig) -> Result<Self, RegistryError> {
        let state = AppState::from_config(&config)?;
        let router = Self::build_router(&config, state);
        Ok(Self { router })
    }

    /// Build the Axum router with all middleware layers.
    fn build_router(config: &ProxyConfig, state: AppState) -> Router {
        Router::new()
            .route("/{*path}", any(edge_handler))
            .route("/", any(edge_handler))
            // Catches request targets the path routes cannot express,
            // e.g. asterisk-form `OPTIONS *`.
            .fallback(edge_handler)
            .with_state(state)
            .layer(TimeoutLayer::new(Duration::from_secs(
                config.timeouts.request_secs,
            )))
            .layer(cors::allow_origin_layer())
            .layer(cors::allow_methods_layer())
            .layer(cors::allow_headers_layer())
            .layer(TraceLayer::new_for_http())
    }

    /// Run the server on the given address, terminating TLS.
    pub async fn run(
        self,
        addr: SocketAddr,
        tls: RustlsConfig,
        handle: Handle,
    ) -> Result<(), std::io::Error> {
        tracing::info!(address = %addr, "HTTPS server starting");

        let app = self
            .router
            .into_make_service_with_connect_info::<SocketAddr>();

        axum_server::bind_rustls(addr, tls)
            .handle(handle)
            .serve(app)
            .await?;

        tracing::info!("HTTPS server stopped");
        Ok(())
    }

    #[cfg(test)]
    fn test_router(&self) -> Router {
        self.router.clone()
    }
}

/// Top-level request entry point.
async fn edge_handler(
    State(state): State<AppState>,
    ConnectInfo(remote): ConnectInfo<SocketAddr>,
    request: Request<Body>,
) -> Response {
    let start = Instant::now();
    let method = request.method().clone();
    let path = request.uri().path().to_string();

    tracing::debug!(
        method = %method,
        path = %path,
        remote = %remote,
        "Received request"
    );

    // Preflight: terminal before any routing.
    if method == Method::OPTIONS {
        metrics::record_request(method.as_str(), StatusCode::OK.as_u16(), "none", start);
        return StatusCode::OK.into_response();
    }

    // Health check: answered locally, never proxied.
    if path == "/health" {
        metrics::record_request(method.as_str(), StatusCode::OK.as_u16(), "none", start);
        return Json(json!({
            "status": "ok",
            "message": state.identity,
        }))
        .into_response();
    }

    let target = state.router.route(&path).to_string();
    let (Some(upstream), Some(client)) = (state.registry.get(&target), state.transport.client(&target))
    else {
        // Unreachable after startup validation; answer well-formed anyway.
        tracing::error!(upstream = %target, "Route target missing from registry");
        metrics::record_request(
            method.as_str(),
            StatusCode::INTERNAL_SERVER_ERROR.as_u16(),
            &target,
            start,
        );
        return (StatusCode::INTERNAL_SERVER_ERROR, "route target not configured").into_response();
    };

    tracing::debug!(
        method = %method,
        path = %path,
        rule = state.router.matching_rule(&path).unwrap_or("default"),
        upstream = %target,
        origin = %upstream.origin,
        "Proxying request"
    );

    let outbound = match rewrite(request, &upstream.origin, remote) {
        Ok(outbound) => outbound,
        Err(e) => {
            tracing::error!(method = %method, path = %path, error = %e, "Request rewrite failed");
            metrics::record_request(
                method.as_str(),
                StatusCode::INTERNAL_SERVER_ERROR.as_u16(),
                &target,
                start,
            );
            return (StatusCode::INTERNAL_SERVER_ERROR, "request rewrite failed").into_response();
        }
    };

    match forward(client, outbound, &target, state.response_timeout).await {
        Ok(response) => {
            let status = response.status();
            metrics::record_request(method.as_str(), status.as_u16(), &target, start);
            tracing::debug!(
                method = %method,
                path = %path,
                upstream = %target,
                status = %status,
                "Upstream responded"
            );
            response
        }
        Err(err) => {
            tracing::error!(
                method = %method,
                path = %path,
                upstream = %target,
                error = %err,
                "Forward failed"
            );
            metrics::record_request(
                method.as_str(),
                StatusCode::BAD_GATEWAY.as_u16(),
                &target,
                start,
            );
            error::bad_gateway(&err)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{PoolConfig, UpstreamConfig};
    use http_body_util::BodyExt;
    use tower::ServiceExt;

    fn request(method: Method, uri: &str) -> Request<Body> {
        let mut request = Request::builder()
            .method(method)
            .uri(uri)
            .body(Body::empty())
            .unwrap();
        // oneshot bypasses the connect-info make-service.
        request
            .extensions_mut()
            .insert(ConnectInfo::<SocketAddr>("127.0.0.1:40000".parse().unwrap()));
        request
    }

    fn assert_cors(response: &Response) {
        let headers = response.headers();
        assert_eq!(headers.get("access-control-allow-origin").unwrap(), "*");
        assert_eq!(
            headers.get("access-control-allow-methods").unwrap(),
            cors::ALLOW_METHODS
        );
        assert_eq!(
            headers.get("access-control-allow-headers").unwrap(),
            cors::ALLOW_HEADERS
        );
    }

    #[tokio::test]
    async fn options_short_circuits_with_cors() {
        let server = HttpServer::new(ProxyConfig::default()).unwrap();

        let response = server
            .test_router()
            .oneshot(request(Method::OPTIONS, "/artifactory/api/repo"))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert_cors(&response);
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        assert!(bytes.is_empty());
    }

    #[tokio::test]
    async fn health_answers_locally() {
        let server = HttpServer::new(ProxyConfig::default()).unwrap();

        let response = server
            .test_router()
            .oneshot(request(Method::GET, "/health"))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert_cors(&response);

        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        let body: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(body["status"], "ok");
        assert_eq!(body["message"], "SSL proxy is running");
    }

    #[tokio::test]
    async fn unreachable_upstream_yields_structured_502() {
        let mut config = ProxyConfig::default();
        // TCP port 9 (discard) is closed on loopback: connect is refused.
        config.upstreams = vec![UpstreamConfig {
            name: "product".to_string(),
            origin: "http://127.0.0.1:9".to_string(),
            skip_tls_verify: false,
            pool: PoolConfig::default(),
        }];
        config.routes.clear();

        let server = HttpServer::new(config).unwrap();
        let response = server
            .test_router()
            .oneshot(request(Method::GET, "/anything"))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_GATEWAY);
        assert_cors(&response);

        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        let body: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(body["error"], error::UPSTREAM_UNAVAILABLE);
        assert!(body["message"].as_str().unwrap().contains("/anything"));
    }
}
