//! CORS response headers.
//!
//! The proxy fronts browser-driven tooling, so every response carries
//! permissive CORS headers, whether it came from an upstream, the health
//! endpoint or the error translator. `SetResponseHeaderLayer` sets them
//! unconditionally; a negotiating CORS layer would only answer requests
//! that carry an `Origin` header.

use axum::http::header::{self, HeaderValue};
use tower_http::set_header::SetResponseHeaderLayer;

pub const ALLOW_ORIGIN: &str = "*";
pub const ALLOW_METHODS: &str = "GET, POST, PUT, DELETE, OPTIONS, HEAD";
pub const ALLOW_HEADERS: &str = "Content-Type, Authorization";

/// `Access-Control-Allow-Origin: *` on every response.
pub fn allow_origin_layer() -> SetResponseHeaderLayer<HeaderValue> {
    SetResponseHeaderLayer::overriding(
        header::ACCESS_CONTROL_ALLOW_ORIGIN,
        HeaderValue::from_static(ALLOW_ORIGIN),
    )
}

/// `Access-Control-Allow-Methods` on every response.
pub fn allow_methods_layer() -> SetResponseHeaderLayer<HeaderValue> {
    SetResponseHeaderLayer::overriding(
        header::ACCESS_CONTROL_ALLOW_METHODS,
        HeaderValue::from_static(ALLOW_METHODS),
    )
}

/// `Access-Control-Allow-Headers` on every response.
pub fn allow_headers_layer() -> SetResponseHeaderLayer<HeaderValue> {
    SetResponseHeaderLayer::overriding(
        header::ACCESS_CONTROL_ALLOW_HEADERS,
        HeaderValue::from_static(ALLOW_HEADERS),
    )
}
