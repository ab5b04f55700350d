//! Routing subsystem.
//!
//! # Data Flow
//! ```text
//! Route definition (at startup):
//!     router.rs (get/post/put/delete, group, middleware, name)
//!     → table.rs (apply group prefix + middleware, store per method in order)
//!     → named.rs (name → prefixed pattern)
//!
//! Incoming request (method, path):
//!     → matcher.rs (first compatible pattern, positional params)
//!     → Return: bound Action or no match
//! ```
//!
//! # Design Decisions
//! - Routes registered at startup, read-only while dispatching
//! - No regex: literal segments compare byte for byte, `{name}` takes any
//!   non-empty segment
//! - Deterministic: same input always matches same route
//! - First match wins (registration order)

pub mod matcher;
pub mod named;
pub mod pattern;
pub mod router;
pub mod table;

pub use matcher::{Matcher, RouteMatch};
pub use named::NamedRouteRegistry;
pub use router::{RouteHandle, Router};
pub use table::{GroupOptions, Method, MethodRoutes, RouteTable};
