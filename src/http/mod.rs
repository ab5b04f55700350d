//! HTTP transport adapter.
//!
//! # Data Flow
//! ```text
//! TCP connection
//!     → server.rs (Axum setup, catch-all handler)
//!     → request.rs (request ID, method override from POST form)
//!     → routing::Router::dispatch (blocking pool)
//!     → response.rs (status code + JSON summary)
//!     → Send to client
//! ```

pub mod request;
pub mod response;
pub mod server;

pub use request::{method_field, RequestId, X_REQUEST_ID};
pub use server::{AppState, HttpServer};
