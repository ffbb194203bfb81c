//! Outbound request construction.
//!
//! # Responsibilities
//! - Derive a genuine client request from the inbound proxy request
//! - Substitute scheme/authority and the Host header for the target origin
//! - Drop connection-scoped headers that must not cross the proxy hop
//! - Record the caller in the `X-Forwarded-For` chain
//!
//! # Design Decisions
//! - The body stream is moved, never buffered; callers extract any logging
//!   metadata (method, path) before rewriting
//! - Path, query and method pass through untouched
//! - Outbound version is pinned to HTTP/1.1 regardless of the inbound hop

use std::net::SocketAddr;

use axum::body::Body;
use axum::http::header::{self, HeaderValue};
use axum::http::uri::PathAndQuery;
use axum::http::{Request, Uri, Version};

use crate::upstream::Origin;

/// Forwarding chain extended with each caller that crosses this hop.
const X_FORWARDED_FOR: &str = "x-forwarded-for";

/// Connection-scoped headers that are stripped before forwarding.
const HOP_BY_HOP_HEADERS: [&str; 8] = [
    "connection",
    "keep-alive",
    "proxy-authenticate",
    "proxy-authorization",
    "te",
    "trailer",
    "transfer-encoding",
    "upgrade",
];

fn is_hop_by_hop(name: &str) -> bool {
    HOP_BY_HOP_HEADERS
        .iter()
        .any(|h| name.eq_ignore_ascii_case(h))
}

/// Rewrite an inbound request into an outbound request for `origin`.
///
/// The result carries an absolute-form URI (scheme + authority of the
/// target) and an explicit `Host` header, so it can be dispatched as a
/// direct client request rather than a proxy-form request. The caller's
/// IP from `remote` is appended to the `X-Forwarded-For` chain.
pub fn rewrite(
    inbound: Request<Body>,
    origin: &Origin,
    remote: SocketAddr,
) -> Result<Request<Body>, axum::http::Error> {
    let (parts, body) = inbound.into_parts();

    let mut uri_parts = parts.uri.into_parts();
    uri_parts.scheme = Some(origin.uri_scheme());
    uri_parts.authority = Some(origin.authority());
    if uri_parts.path_and_query.is_none() {
        uri_parts.path_and_query = Some(PathAndQuery::from_static("/"));
    }
    let uri = Uri::from_parts(uri_parts)?;

    let mut builder = Request::builder()
        .method(parts.method)
        .uri(uri)
        .version(Version::HTTP_11);

    if let Some(headers) = builder.headers_mut() {
        for (name, value) in parts.headers.iter() {
            if !is_hop_by_hop(name.as_str()) {
                headers.append(name.clone(), value.clone());
            }
        }
        // Upstream virtual-hosting depends on this matching the target.
        headers.insert(header::HOST, HeaderValue::from_str(&origin.host_header())?);

        // Any prior chain collapses into one comma-separated value with the
        // caller's IP appended.
        let client_ip = remote.ip().to_string();
        let prior: Vec<&str> = headers
            .get_all(X_FORWARDED_FOR)
            .iter()
            .filter_map(|value| value.to_str().ok())
            .collect();
        let chain = if prior.is_empty() {
            client_ip
        } else {
            format!("{}, {}", prior.join(", "), client_ip)
        };
        headers.insert(X_FORWARDED_FOR, HeaderValue::from_str(&chain)?);
    }

    builder.body(body)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn remote() -> SocketAddr {
        "203.0.113.7:51000".parse().unwrap()
    }

    fn inbound(uri: &str) -> Request<Body> {
        Request::builder()
            .method("GET")
            .uri(uri)
            .header("host", "proxy.local:8443")
            .header("authorization", "Bearer token")
            .header("connection", "keep-alive")
            .header("transfer-encoding", "chunked")
            .body(Body::empty())
            .unwrap()
    }

    #[test]
    fn substitutes_scheme_and_authority() {
        let origin = Origin::parse("https://repo.example.com").unwrap();
        let outbound = rewrite(inbound("/artifactory/api/repo"), &origin, remote()).unwrap();

        assert_eq!(outbound.uri().scheme_str(), Some("https"));
        assert_eq!(
            outbound.uri().authority().map(|a| a.as_str()),
            Some("repo.example.com")
        );
        assert_eq!(outbound.uri().path(), "/artifactory/api/repo");
    }

    #[test]
    fn host_header_includes_explicit_port() {
        let origin = Origin::parse("https://product.internal:8443").unwrap();
        let outbound = rewrite(inbound("/scan"), &origin, remote()).unwrap();

        assert_eq!(
            outbound.headers().get(header::HOST).unwrap(),
            "product.internal:8443"
        );
    }

    #[test]
    fn preserves_path_query_and_method() {
        let origin = Origin::parse("http://127.0.0.1:3000").unwrap();
        let request = Request::builder()
            .method("PUT")
            .uri("/a/b?x=1&y=2")
            .body(Body::empty())
            .unwrap();
        let outbound = rewrite(request, &origin, remote()).unwrap();

        assert_eq!(outbound.method(), "PUT");
        assert_eq!(outbound.uri().path(), "/a/b");
        assert_eq!(outbound.uri().query(), Some("x=1&y=2"));
    }

    #[test]
    fn strips_hop_by_hop_headers_keeps_end_to_end() {
        let origin = Origin::parse("https://repo.example.com").unwrap();
        let outbound = rewrite(inbound("/x"), &origin, remote()).unwrap();

        assert!(outbound.headers().get("connection").is_none());
        assert!(outbound.headers().get("transfer-encoding").is_none());
        assert_eq!(
            outbound.headers().get("authorization").unwrap(),
            "Bearer token"
        );
    }

    #[test]
    fn outbound_is_http_11_absolute_form() {
        let origin = Origin::parse("https://repo.example.com").unwrap();
        let outbound = rewrite(inbound("/x"), &origin, remote()).unwrap();

        assert_eq!(outbound.version(), Version::HTTP_11);
        // Absolute-form URI is the well-formed client request shape.
        assert!(outbound.uri().scheme().is_some());
        assert!(outbound.uri().authority().is_some());
    }

    #[test]
    fn empty_path_becomes_root() {
        let origin = Origin::parse("https://repo.example.com").unwrap();
        let request = Request::builder()
            .method("GET")
            .uri("http://ignored.example")
            .body(Body::empty())
            .unwrap();
        let outbound = rewrite(request, &origin, remote()).unwrap();
        assert_eq!(outbound.uri().path(), "/");
    }

    #[test]
    fn caller_ip_starts_the_forwarding_chain() {
        let origin = Origin::parse("https://repo.example.com").unwrap();
        let outbound = rewrite(inbound("/x"), &origin, remote()).unwrap();

        assert_eq!(
            outbound.headers().get(X_FORWARDED_FOR).unwrap(),
            "203.0.113.7"
        );
    }

    #[test]
    fn caller_ip_extends_an_existing_chain() {
        let origin = Origin::parse("https://repo.example.com").unwrap();
        let request = Request::builder()
            .method("GET")
            .uri("/x")
            .header("x-forwarded-for", "198.51.100.4")
            .header("x-forwarded-for", "192.0.2.9")
            .body(Body::empty())
            .unwrap();
        let outbound = rewrite(request, &origin, remote()).unwrap();

        // Repeated headers collapse into one comma-separated value.
        let values: Vec<_> = outbound.headers().get_all(X_FORWARDED_FOR).iter().collect();
        assert_eq!(values.len(), 1);
        assert_eq!(values[0], "198.51.100.4, 192.0.2.9, 203.0.113.7");
    }
}
