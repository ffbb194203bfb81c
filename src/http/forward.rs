//! Request forwarding.
//!
//! # Responsibilities
//! - Dispatch the outbound request on the upstream's pooled client
//! - Stream the response back without buffering
//! - Classify transport failures with enough context to diagnose them
//!
//! # Design Decisions
//! - Exactly one send attempt per inbound request, no retry
//! - A failure after response headers are relayed propagates through the
//!   streamed body and tears the client connection down
//! - The per-request deadline is optional; absent means the listener
//!   timeouts are the only bound on the exchange

use std::time::Duration;

use axum::body::Body;
use axum::http::{Method, Request, Response};
use thiserror::Error;

use crate::transport::UpstreamClient;

/// Errors raised while forwarding a request to an upstream.
///
/// Every variant carries the failing method, path and upstream so the
/// error translation layer can log and report without extra context.
#[derive(Debug, Error)]
pub enum ForwardError {
    /// TCP connect or TLS handshake toward the upstream failed.
    #[error("could not connect to upstream {upstream} for {method} {path}: {source}")]
    Connect {
        upstream: String,
        method: Method,
        path: String,
        #[source]
        source: hyper_util::client::legacy::Error,
    },

    /// The upstream produced no response within the configured deadline.
    #[error("upstream {upstream} did not respond within {timeout:?} for {method} {path}")]
    Timeout {
        upstream: String,
        method: Method,
        path: String,
        timeout: Duration,
    },

    /// The connection was established but the exchange failed.
    #[error("upstream {upstream} failed for {method} {path}: {source}")]
    Protocol {
        upstream: String,
        method: Method,
        path: String,
        #[source]
        source: hyper_util::client::legacy::Error,
    },
}

impl ForwardError {
    /// Method of the failing request.
    pub fn method(&self) -> &Method {
        match self {
            ForwardError::Connect { method, .. }
            | ForwardError::Timeout { method, .. }
            | ForwardError::Protocol { method, .. } => method,
        }
    }

    /// Path of the failing request.
    pub fn path(&self) -> &str {
        match self {
            ForwardError::Connect { path, .. }
            | ForwardError::Timeout { path, .. }
            | ForwardError::Protocol { path, .. } => path,
        }
    }

    /// Name of the upstream that failed.
    pub fn upstream(&self) -> &str {
        match self {
            ForwardError::Connect { upstream, .. }
            | ForwardError::Timeout { upstream, .. }
            | ForwardError::Protocol { upstream, .. } => upstream,
        }
    }
}

/// Send `outbound` on the upstream's pooled client and stream the response.
pub async fn forward(
    client: &UpstreamClient,
    outbound: Request<Body>,
    upstream: &str,
    response_timeout: Option<Duration>,
) -> Result<Response<Body>, ForwardError> {
    let method = outbound.method().clone();
    let path = outbound.uri().path().to_string();

    let pending = client.request(outbound);
    let result = match response_timeout {
        Some(timeout) => match tokio::time::timeout(timeout, pending).await {
            Ok(result) => result,
            Err(_) => {
                return Err(ForwardError::Timeout {
                    upstream: upstream.to_string(),
                    method,
                    path,
                    timeout,
                })
            }
        },
        None => pending.await,
    };

    match result {
        Ok(response) => {
            let (parts, body) = response.into_parts();
            Ok(Response::from_parts(parts, Body::new(body)))
        }
        Err(source) if source.is_connect() => Err(ForwardError::Connect {
            upstream: upstream.to_string(),
            method,
            path,
            source,
        }),
        Err(source) => Err(ForwardError::Protocol {
            upstream: upstream.to_string(),
            method,
            path,
            source,
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_display_carries_request_context() {
        let error = ForwardError::Timeout {
            upstream: "product".to_string(),
            method: Method::GET,
            path: "/scan/results".to_string(),
            timeout: Duration::from_secs(10),
        };

        let rendered = error.to_string();
        assert!(rendered.contains("product"));
        assert!(rendered.contains("GET"));
        assert!(rendered.contains("/scan/results"));

        assert_eq!(error.method(), Method::GET);
        assert_eq!(error.path(), "/scan/results");
        assert_eq!(error.upstream(), "product");
    }
}
