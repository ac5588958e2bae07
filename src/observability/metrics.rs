//! Metrics collection and exposition.
//!
//! # Metrics
//! - `compliance_requests_total` (counter): responses by status
//! - `compliance_violations_total` (counter): tolerated violations by kind and category
//! - `compliance_rejections_total` (counter): rejected requests by kind
//!
//! Without an installed recorder the `metrics` macros are no-ops, so tests
//! and the CLI pay nothing.

use metrics::counter;
use metrics_exporter_prometheus::PrometheusBuilder;
use std::net::SocketAddr;

use crate::compliance::{Violation, ViolationKind};

/// Start the Prometheus scrape endpoint on `addr`.
pub fn init_metrics(addr: SocketAddr) {
    match PrometheusBuilder::new().with_http_listener(addr).install() {
        Ok(()) => tracing::info!(address = %addr, "Metrics endpoint started"),
        Err(e) => tracing::error!(address = %addr, error = %e, "Failed to start metrics endpoint"),
    }
}

pub fn record_request(status: u16) {
    counter!("compliance_requests_total", "status" => status.to_string()).increment(1);
}

pub fn record_violations(violations: &[Violation]) {
    for violation in violations {
        counter!(
            "compliance_violations_total",
            "kind" => violation.kind.as_str(),
            "category" => violation.kind.category().as_str()
        )
        .increment(1);
    }
}

pub fn record_rejection(kind: ViolationKind) {
    counter!("compliance_rejections_total", "kind" => kind.as_str()).increment(1);
}
