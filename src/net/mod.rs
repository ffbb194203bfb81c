//! Network layer subsystem.
//!
//! # Data Flow
//! ```text
//! Startup:
//!     ListenerTlsConfig
//!     → tls.rs (PEM load, version bounds, ALPN pin)
//!     → RustlsConfig handed to the HTTPS server
//! ```

pub mod tls;

pub use tls::{load_tls_config, TlsError};
