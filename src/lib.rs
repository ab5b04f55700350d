//! HTTP request router library.
//!
//! Matches `(method, path)` against registered patterns, extracts positional
//! `{param}` values, runs the route's middleware chain and handler, and falls
//! back to configured not-found and internal-error controllers. Named routes
//! generate URLs back from a name and positional arguments.
//!
//! ```
//! use std::sync::Arc;
//! use request_router::{Action, Controller, HandlerResult, Request, Router};
//!
//! struct Fallback;
//!
//! impl Controller for Fallback {
//!     fn call(&self, _method: &str, _params: &[String]) -> HandlerResult {
//!         Ok(())
//!     }
//! }
//!
//! let mut router = Router::new();
//! router
//!     .get("/posts/{id}", Action::function(|_params| Ok(())))
//!     .name("posts.show")
//!     .unwrap();
//! router.fallback_not_found(Arc::new(Fallback), "missing");
//! router.fallback_internal_server_error(Arc::new(Fallback), "report");
//!
//! let outcome = router.dispatch(&Request::new("GET", "/posts/42")).unwrap();
//! assert_eq!(outcome.code().as_str(), "200");
//! assert_eq!(router.url_for("posts.show", &[&42]).unwrap(), "/posts/42");
//! ```

// Core subsystems
pub mod dispatch;
pub mod error;
pub mod routing;

// Adapters and cross-cutting concerns
pub mod config;
pub mod http;
pub mod observability;

pub use config::RouterConfig;
pub use dispatch::{
    Action, Controller, DispatchOutcome, Handler, HandlerError, HandlerResult, Middleware,
    Request, ResultCode,
};
pub use error::RouterError;
pub use http::HttpServer;
pub use routing::{GroupOptions, Method, Router};
