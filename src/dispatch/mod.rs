//! Dispatch subsystem.
//!
//! # Data Flow
//! ```text
//! Request (method, path)
//!     → dispatcher.rs (verify fallbacks)
//!     → routing::matcher (first compatible pattern, params, URI rewrite)
//!     → middleware.rs (instantiate chain, set_params, handle)
//!     → handler.rs (controller method or free function)
//!     → outcome.rs (Handled | RouteNotMatched | HandlerReportedNotFound | HandlerFault)
//! ```
//!
//! # Design Decisions
//! - Dispatch is synchronous; one call handles one request end to end
//! - Handler faults and panics never escape: they become a fallback outcome
//! - Only configuration errors and failing fallbacks are returned as errors

pub mod dispatcher;
pub mod handler;
pub mod middleware;
pub mod outcome;
pub mod request;

pub use dispatcher::{Dispatcher, FallbackBinding, Fallbacks};
pub use handler::{Action, Controller, Handler, HandlerError, HandlerFn, HandlerResult};
pub use middleware::{Middleware, MiddlewareFactory, MiddlewareRegistry};
pub use outcome::{DispatchOutcome, ResultCode};
pub use request::{Request, RequestContext, DEFAULT_METHOD_OVERRIDE_FIELD};
