//! Routing subsystem.
//!
//! # Data Flow
//! ```text
//! Incoming request path
//!     → router.rs (ordered rule scan)
//!     → matcher.rs (substring predicate)
//!     → Return: upstream name (matched rule or default)
//!
//! Route Compilation (at startup):
//!     RouteConfig[]
//!     → Compile matchers in declaration order
//!     → Freeze as immutable Router
//! ```
//!
//! # Design Decisions
//! - Routes compiled at startup, immutable at runtime
//! - Deterministic: same path always resolves to the same upstream
//! - First match wins; unmatched paths resolve to the default upstream

pub mod matcher;
pub mod router;

pub use matcher::{ContainsMatcher, Matcher};
pub use router::{RouteRule, Router};
