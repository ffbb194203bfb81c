//! Configuration schema definitions.
//!
//! This module defines the complete configuration structure for the proxy.
//! All types derive Serde traits for deserialization from config files.
//! Defaults reproduce the reference deployment: three upstreams behind the
//! integration-test TLS endpoint, routed by path substring.

use serde::{Deserialize, Serialize};

/// Root configuration for the SSL proxy.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ProxyConfig {
    /// Listener configuration (bind address, TLS).
    pub listener: ListenerConfig,

    /// Timeout configuration.
    pub timeouts: TimeoutConfig,

    /// Upstream origin definitions.
    pub upstreams: Vec<UpstreamConfig>,

    /// Route rules, evaluated in declaration order; first match wins.
    pub routes: Vec<RouteConfig>,

    /// Upstream used when no route rule matches.
    pub default_upstream: String,

    /// Identity string reported by the health endpoint.
    pub identity: String,

    /// Observability settings.
    pub observability: ObservabilityConfig,
}

impl Default for ProxyConfig {
    fn default() -> Self {
        Self {
            listener: ListenerConfig::default(),
            timeouts: TimeoutConfig::default(),
            upstreams: vec![
                UpstreamConfig {
                    name: "product".to_string(),
                    origin: "https://coverity-classic.integrations.duckutil.net:8443".to_string(),
                    skip_tls_verify: true,
                    pool: PoolConfig::default(),
                },
                UpstreamConfig {
                    name: "internal-artifactory".to_string(),
                    origin: "https://artifactory.tools.duckutil.net".to_string(),
                    skip_tls_verify: true,
                    pool: PoolConfig::default(),
                },
                UpstreamConfig {
                    name: "public-artifactory".to_string(),
                    origin: "https://repo.blackduck.com".to_string(),
                    skip_tls_verify: true,
                    pool: PoolConfig::default(),
                },
            ],
            routes: vec![
                RouteConfig {
                    name: "internal-artifactory".to_string(),
                    path_contains: "/artifactory/".to_string(),
                    upstream: "internal-artifactory".to_string(),
                },
                RouteConfig {
                    name: "public-artifactory".to_string(),
                    path_contains: "blackduck/integration".to_string(),
                    upstream: "public-artifactory".to_string(),
                },
            ],
            default_upstream: "product".to_string(),
            identity: "SSL proxy is running".to_string(),
            observability: ObservabilityConfig::default(),
        }
    }
}

/// Listener configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ListenerConfig {
    /// Bind address (e.g., "0.0.0.0:8443").
    pub bind_address: String,

    /// TLS configuration for the listener.
    pub tls: ListenerTlsConfig,
}

impl Default for ListenerConfig {
    fn default() -> Self {
        Self {
            bind_address: "0.0.0.0:8443".to_string(),
            tls: ListenerTlsConfig::default(),
        }
    }
}

/// TLS configuration for the listener.
///
/// Protocol negotiation is pinned to HTTP/1.1; the version bounds default to
/// TLS 1.2 through 1.3.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ListenerTlsConfig {
    /// Path to certificate chain file (PEM).
    pub cert_path: String,

    /// Path to private key file (PEM).
    pub key_path: String,

    /// Minimum TLS version ("1.2" or "1.3").
    pub min_version: String,

    /// Maximum TLS version ("1.2" or "1.3").
    pub max_version: String,
}

impl Default for ListenerTlsConfig {
    fn default() -> Self {
        Self {
            cert_path: "certs/server.crt".to_string(),
            key_path: "certs/server.key".to_string(),
            min_version: "1.2".to_string(),
            max_version: "1.3".to_string(),
        }
    }
}

/// Timeout configuration for various operations.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct TimeoutConfig {
    /// Upstream TCP connection establishment timeout in seconds.
    pub connect_secs: u64,

    /// Edge request deadline in seconds (time until response headers).
    pub request_secs: u64,

    /// Optional per-request upstream response deadline in seconds.
    ///
    /// Unset by default: without it the listener-level request timeout is
    /// the only bound on an upstream exchange.
    pub upstream_response_secs: Option<u64>,
}

impl Default for TimeoutConfig {
    fn default() -> Self {
        Self {
            connect_secs: 5,
            request_secs: 60,
            upstream_response_secs: None,
        }
    }
}

/// A single upstream origin the proxy can forward to.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct UpstreamConfig {
    /// Unique upstream identifier, referenced by route rules.
    pub name: String,

    /// Origin URL, scheme + host and optional port (e.g., "https://repo.example.com").
    pub origin: String,

    /// Disable certificate verification for this upstream only.
    ///
    /// A per-upstream trust decision; there is no transport-wide bypass.
    #[serde(default)]
    pub skip_tls_verify: bool,

    /// Connection pooling parameters toward this upstream.
    #[serde(default)]
    pub pool: PoolConfig,
}

/// Connection pool parameters for one upstream.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct PoolConfig {
    /// Maximum idle connections kept for this upstream.
    pub max_idle: usize,

    /// Maximum idle connections per host.
    ///
    /// Each upstream is pinned to a single origin, so this and `max_idle`
    /// collapse into one bound; the stricter of the two is applied.
    pub max_idle_per_host: usize,

    /// Idle connection lifetime in seconds before it is closed.
    pub idle_timeout_secs: u64,
}

impl Default for PoolConfig {
    fn default() -> Self {
        Self {
            max_idle: 100,
            max_idle_per_host: 10,
            idle_timeout_secs: 90,
        }
    }
}

/// Route rule mapping a path predicate to an upstream.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct RouteConfig {
    /// Rule identifier for logging.
    pub name: String,

    /// Substring the request path must contain, anywhere, for this rule to match.
    pub path_contains: String,

    /// Target upstream name.
    pub upstream: String,
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log level (trace, debug, info, warn, error).
    pub log_level: String,

    /// Enable the Prometheus metrics endpoint.
    pub metrics_enabled: bool,

    /// Metrics endpoint bind address.
    pub metrics_address: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            metrics_enabled: false,
            metrics_address: "0.0.0.0:9090".to_string(),
        }
    }
}
