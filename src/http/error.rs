//! Error-to-response translation.
//!
//! Forwarding failures are mapped to a well-formed `502` with a structured
//! JSON body, so the caller never sees a bare connection reset. The mapping
//! is a pure function, testable without any network stack.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;

use crate::http::forward::ForwardError;

/// Body `error` field for every forwarding failure.
pub const UPSTREAM_UNAVAILABLE: &str = "upstream server unavailable";

/// Translate a forwarding failure into the client-visible response.
pub fn bad_gateway(error: &ForwardError) -> Response {
    let body = Json(json!({
        "error": UPSTREAM_UNAVAILABLE,
        "message": error.to_string(),
    }));
    (StatusCode::BAD_GATEWAY, body).into_response()
}
