//! HTTP protocol handling subsystem.
//!
//! # Data Flow
//! ```text
//! TLS connection
//!     → server.rs (Axum setup, edge handler state machine)
//!     → [preflight / health short-circuit]
//!     → [routing layer picks the upstream]
//!     → rewrite.rs (inbound → outbound client request)
//!     → forward.rs (pooled send, streamed response)
//!     → error.rs (failure → structured 502)
//!     → Send to client (cors.rs headers on every branch)
//! ```

pub mod cors;
pub mod error;
pub mod forward;
pub mod rewrite;
pub mod server;

pub use forward::ForwardError;
pub use server::{AppState, HttpServer};
