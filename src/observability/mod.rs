//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! Registration and dispatch produce:
//!     → logging.rs (structured log events, stdout + append-only file)
//!     → metrics.rs (dispatch and fallback counters, latency histogram)
//!
//! Consumers:
//!     → Log file (default logs/router.log)
//!     → Metrics endpoint (Prometheus scrape)
//! ```
//!
//! # Design Decisions
//! - Every error is logged where it is raised, before it is returned
//! - Request ID recorded on the HTTP span, not threaded through the core

pub mod logging;
pub mod metrics;
