//! Upstream transport subsystem.
//!
//! # Data Flow
//! ```text
//! UpstreamRegistry (startup)
//!     → tls.rs (client TLS config, optional verification bypass)
//!     → pool.rs (one pooled HTTP/1.1 client per upstream)
//!     → forwarder acquires the client by upstream name per request
//! ```
//!
//! # Design Decisions
//! - Pool parameters are per-upstream; upstreams share no connection
//!   accounting and no lock
//! - Reuse, idle caps and idle expiry are the pooled client's job; this
//!   layer only configures them

pub mod pool;
pub mod tls;

pub use pool::{TransportPool, UpstreamClient};
