//! TLS-terminating routing reverse proxy.
//!
//! Terminates TLS at the edge, answers CORS preflight and health checks
//! locally, and forwards everything else to one of a fixed set of upstream
//! origins chosen by path-substring rules. Responses stream back to the
//! caller with permissive CORS headers injected; forwarding failures become
//! structured `502` responses.
//!
//! # Architecture Overview
//!
//! ```text
//!                    ┌──────────────────────────────────────────────────┐
//!                    │                   SSL PROXY                       │
//!                    │                                                   │
//!  Client Request    │  ┌─────────┐   ┌──────────────┐   ┌───────────┐  │
//!  ──────────────────┼─▶│ net/tls │──▶│ http/server  │──▶│  routing  │  │
//!   (TLS 1.2-1.3)    │  │listener │   │ edge handler │   │  engine   │  │
//!                    │  └─────────┘   └──────┬───────┘   └─────┬─────┘  │
//!                    │            OPTIONS /  │                 │        │
//!                    │            /health ◀──┘                 ▼        │
//!                    │                               ┌──────────────┐   │
//!                    │                               │   upstream   │   │
//!                    │                               │   registry   │   │
//!                    │                               └──────┬───────┘   │
//!                    │                                      │           │
//!  Client Response   │  ┌─────────┐   ┌─────────────┐  ┌────▼──────┐    │
//!  ◀─────────────────┼──│http/cors│◀──│http/forward │◀─│ transport │◀───┼── Upstream
//!                    │  │ inject  │   │  + rewrite  │  │   pool    │    │    Origins
//!                    │  └─────────┘   └─────────────┘  └───────────┘    │
//!                    │                                                  │
//!                    │  config · observability · lifecycle              │
//!                    └──────────────────────────────────────────────────┘
//! ```

// Core subsystems
pub mod config;
pub mod http;
pub mod net;
pub mod routing;
pub mod transport;
pub mod upstream;

// Cross-cutting concerns
pub mod lifecycle;
pub mod observability;

pub use config::ProxyConfig;
pub use http::HttpServer;
