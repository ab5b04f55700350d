//! Metrics collection and exposition.
//!
//! # Metrics
//! - `router_dispatch_total` (counter): dispatched requests by method, code.
//!   Methods without a route table are labelled `OTHER`
//! - `router_fallback_total` (counter): fallback invocations by kind
//! - `router_request_duration_seconds` (histogram): HTTP request latency
//!
//! # Design Decisions
//! - Recording without an installed exporter is a no-op, so the core can
//!   record unconditionally
//! - Prometheus exporter only started by the binary

use std::net::SocketAddr;
use std::time::Instant;

use metrics_exporter_prometheus::{BuildError, PrometheusBuilder};

use crate::dispatch::ResultCode;
use crate::error::FallbackKind;
use crate::routing::Method;

/// Label used for any request method the router has no table for.
pub const OTHER_METHOD: &str = "OTHER";

/// Starts the Prometheus scrape endpoint on `addr`.
pub fn init_metrics(addr: SocketAddr) -> Result<(), BuildError> {
    PrometheusBuilder::new().with_http_listener(addr).install()?;
    tracing::info!(address = %addr, "Metrics endpoint started");
    Ok(())
}

pub fn record_dispatch(method: &str, code: ResultCode) {
    let method = method
        .parse::<Method>()
        .map(|m| m.as_str())
        .unwrap_or(OTHER_METHOD);
    ::metrics::counter!(
        "router_dispatch_total",
        "method" => method,
        "code" => code.as_str()
    )
    .increment(1);
}

pub fn record_fallback(kind: FallbackKind) {
    ::metrics::counter!("router_fallback_total", "kind" => kind.as_str()).increment(1);
}

pub fn record_request_duration(start: Instant) {
    ::metrics::histogram!("router_request_duration_seconds").record(start.elapsed().as_secs_f64());
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dispatch_series(rendered: &str) -> Vec<&str> {
        rendered
            .lines()
            .filter(|line| line.starts_with("router_dispatch_total{"))
            .collect()
    }

    #[test]
    fn test_unknown_methods_share_one_label() {
        let recorder = PrometheusBuilder::new().build_recorder();
        let handle = recorder.handle();

        ::metrics::with_local_recorder(&recorder, || {
            for i in 0..200 {
                record_dispatch(&format!("X{i}"), ResultCode::NotFound);
            }
            record_dispatch("GET", ResultCode::Success);
            record_dispatch("get", ResultCode::Success);
        });

        let rendered = handle.render();
        let series = dispatch_series(&rendered);
        assert_eq!(series.len(), 3, "{rendered}");
        assert!(series.iter().any(|s| s.contains("method=\"GET\"")));
        assert!(series.iter().all(|s| !s.contains("X1")));
    }
}
