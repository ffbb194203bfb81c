//! Upstream registry subsystem.
//!
//! # Data Flow
//! ```text
//! UpstreamConfig[] (startup)
//!     → origin.rs (parse scheme/host/port)
//!     → registry.rs (name → Upstream map, frozen)
//!     → consumed by routing (names) and transport (origins, pool params)
//! ```

pub mod origin;
pub mod registry;

pub use origin::{Origin, OriginError, Scheme};
pub use registry::{RegistryError, Upstream, UpstreamRegistry};
