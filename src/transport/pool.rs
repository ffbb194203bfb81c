//! Pooled upstream transports.
//!
//! # Responsibilities
//! - Build one pooled HTTP client per configured upstream
//! - Enforce idle-connection caps and idle timeouts per upstream
//! - Pin upstream protocol negotiation to HTTP/1.1
//!
//! # Design Decisions
//! - One client per upstream: pool accounting is per-upstream, so
//!   concurrent requests to unrelated upstreams never contend
//! - Connections over the idle cap are closed by the pool, not queued
//! - No retries at this layer; connection errors surface to the forwarder

use std::collections::HashMap;
use std::time::Duration;

use axum::body::Body;
use hyper_rustls::{HttpsConnector, HttpsConnectorBuilder};
use hyper_util::client::legacy::connect::HttpConnector;
use hyper_util::client::legacy::Client;
use hyper_util::rt::TokioExecutor;

use crate::config::TimeoutConfig;
use crate::transport::tls;
use crate::upstream::{Upstream, UpstreamRegistry};

/// Pooled client used for all requests to a single upstream.
pub type UpstreamClient = Client<HttpsConnector<HttpConnector>, Body>;

/// Per-upstream pooled transports, built once at startup.
pub struct TransportPool {
    clients: HashMap<String, UpstreamClient>,
}

impl TransportPool {
    /// Build a pooled client for every upstream in the registry.
    pub fn new(registry: &UpstreamRegistry, timeouts: &TimeoutConfig) -> Self {
        tls::ensure_crypto_provider();

        let clients = registry
            .iter()
            .map(|upstream| (upstream.name.clone(), build_client(upstream, timeouts)))
            .collect();

        Self { clients }
    }

    /// The pooled client for a given upstream name.
    pub fn client(&self, upstream: &str) -> Option<&UpstreamClient> {
        self.clients.get(upstream)
    }

    /// Number of upstream transports.
    pub fn len(&self) -> usize {
        self.clients.len()
    }
}

fn build_client(upstream: &Upstream, timeouts: &TimeoutConfig) -> UpstreamClient {
    let mut http = HttpConnector::new();
    http.enforce_http(false);
    http.set_connect_timeout(Some(Duration::from_secs(timeouts.connect_secs)));

    // HTTP/1.1 only toward upstreams: enable_http1 without enable_http2
    // keeps ALPN from negotiating h2.
    let https = if upstream.skip_tls_verify {
        tracing::warn!(
            upstream = %upstream.name,
            origin = %upstream.origin,
            "Upstream certificate verification disabled"
        );
        HttpsConnectorBuilder::new()
            .with_tls_config(tls::insecure_client_config())
            .https_or_http()
            .enable_http1()
            .wrap_connector(http)
    } else {
        HttpsConnectorBuilder::new()
            .with_webpki_roots()
            .https_or_http()
            .enable_http1()
            .wrap_connector(http)
    };

    // One origin per client: the per-host cap and the pool-wide cap bound
    // the same set of connections, so the stricter one applies.
    let max_idle = upstream.pool.max_idle.min(upstream.pool.max_idle_per_host);

    // retry_canceled_requests would resend on a dead pooled connection;
    // delivery here is at most once, so that stays off.
    Client::builder(TokioExecutor::new())
        .pool_max_idle_per_host(max_idle)
        .pool_idle_timeout(Duration::from_secs(upstream.pool.idle_timeout_secs))
        .retry_canceled_requests(false)
        .build(https)
}
