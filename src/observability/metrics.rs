//! Metrics collection and exposition.
//!
//! # Responsibilities
//! - Define router metrics (navigations, timings, fallbacks)
//! - Expose a Prometheus-compatible endpoint when enabled
//!
//! # Metrics
//! - `router_navigations_total` (counter): navigations by route and kind
//! - `router_unhandled_total` (counter): URLs no descriptor matched
//! - `router_hard_fallbacks_total` (counter): fetch failures by route
//! - `router_fetch_duration_seconds` (histogram): time-to-fetch by route
//! - `router_render_duration_seconds` (histogram): time-to-render by route
//!
//! # Design Decisions
//! - Recording goes through the `metrics` facade; without an installed
//!   recorder every call is a no-op

use std::net::SocketAddr;
use std::time::Duration;

use metrics_exporter_prometheus::{BuildError, PrometheusBuilder};

/// Install the Prometheus recorder and its HTTP listener.
///
/// Must be called from within a Tokio runtime.
pub fn init_metrics(addr: SocketAddr) -> Result<(), BuildError> {
    PrometheusBuilder::new().with_http_listener(addr).install()?;
    tracing::info!(address = %addr, "Metrics endpoint listening");
    Ok(())
}

/// Count a navigation. `kind` is one of `initial`, `cross_route`, `same_route`.
pub fn record_navigation(route: &str, kind: &'static str) {
    metrics::counter!(
        "router_navigations_total",
        "route" => route.to_string(),
        "kind" => kind
    )
    .increment(1);
}

pub fn record_unhandled() {
    metrics::counter!("router_unhandled_total").increment(1);
}

pub fn record_hard_fallback(route: &str) {
    metrics::counter!("router_hard_fallbacks_total", "route" => route.to_string()).increment(1);
}

pub fn record_navigation_timing(route: &str, fetch: Duration, render: Duration) {
    metrics::histogram!("router_fetch_duration_seconds", "route" => route.to_string())
        .record(fetch.as_secs_f64());
    metrics::histogram!("router_render_duration_seconds", "route" => route.to_string())
        .record(render.as_secs_f64());
}
