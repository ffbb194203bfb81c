//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Check referential integrity (routes reference existing upstreams)
//! - Validate value ranges and origin URLs
//!
//! # Design Decisions
//! - Returns all validation errors, not just the first
//! - Validation is a pure function: ProxyConfig → Result<(), Vec<ValidationError>>
//! - Runs before config is accepted into the system

use std::collections::HashSet;
use std::net::SocketAddr;

use crate::config::schema::ProxyConfig;
use crate::upstream::Origin;

/// A single semantic problem found in a configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationError {
    /// Dotted path of the offending field (e.g., "upstreams.product.origin").
    pub field: String,
    /// Human-readable description of the problem.
    pub message: String,
}

impl std::fmt::Display for ValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

fn tls_version_valid(v: &str) -> bool {
    matches!(v, "1.2" | "1.3")
}

/// Validate a configuration, collecting every problem found.
pub fn validate_config(config: &ProxyConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();
    let mut push = |field: &str, message: String| {
        errors.push(ValidationError {
            field: field.to_string(),
            message,
        });
    };

    if config.listener.bind_address.parse::<SocketAddr>().is_err() {
        push(
            "listener.bind_address",
            format!("not a valid socket address: {}", config.listener.bind_address),
        );
    }
    if config.listener.tls.cert_path.is_empty() {
        push("listener.tls.cert_path", "must not be empty".to_string());
    }
    if config.listener.tls.key_path.is_empty() {
        push("listener.tls.key_path", "must not be empty".to_string());
    }
    if !tls_version_valid(&config.listener.tls.min_version) {
        push(
            "listener.tls.min_version",
            format!("unsupported TLS version: {}", config.listener.tls.min_version),
        );
    }
    if !tls_version_valid(&config.listener.tls.max_version) {
        push(
            "listener.tls.max_version",
            format!("unsupported TLS version: {}", config.listener.tls.max_version),
        );
    }
    if tls_version_valid(&config.listener.tls.min_version)
        && tls_version_valid(&config.listener.tls.max_version)
        && config.listener.tls.min_version == "1.3"
        && config.listener.tls.max_version == "1.2"
    {
        push(
            "listener.tls",
            "min_version must not exceed max_version".to_string(),
        );
    }

    if config.upstreams.is_empty() {
        push("upstreams", "at least one upstream is required".to_string());
    }

    let mut names = HashSet::new();
    for upstream in &config.upstreams {
        let field = format!("upstreams.{}", upstream.name);
        if upstream.name.is_empty() {
            push("upstreams", "upstream name must not be empty".to_string());
        }
        if !names.insert(upstream.name.clone()) {
            push(&field, "duplicate upstream name".to_string());
        }
        if let Err(e) = Origin::parse(&upstream.origin) {
            push(&format!("{field}.origin"), e.to_string());
        }
        if upstream.pool.max_idle == 0 {
            push(&format!("{field}.pool.max_idle"), "must be at least 1".to_string());
        }
        if upstream.pool.max_idle_per_host == 0 {
            push(
                &format!("{field}.pool.max_idle_per_host"),
                "must be at least 1".to_string(),
            );
        }
    }

    for route in &config.routes {
        let field = format!("routes.{}", route.name);
        if route.path_contains.is_empty() {
            push(&format!("{field}.path_contains"), "must not be empty".to_string());
        }
        if !names.contains(&route.upstream) {
            push(
                &format!("{field}.upstream"),
                format!("unknown upstream: {}", route.upstream),
            );
        }
    }

    if !names.contains(&config.default_upstream) {
        push(
            "default_upstream",
            format!("unknown upstream: {}", config.default_upstream),
        );
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
