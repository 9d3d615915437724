//! Metrics collection and exposition.
//!
//! # Metrics
//! - `verifier_api_requests_total` (counter): platform API calls by endpoint, status
//! - `verifier_poll_attempts_total` (counter): polling attempts by site, outcome
//! - `verifier_rpc_calls_total` (counter): chain RPC calls by method, outcome
//! - `verifier_steps_total` (counter): scenario steps by step, outcome
//!
//! Without an installed recorder every call is a no-op.

use metrics_exporter_prometheus::{PrometheusBuilder, PrometheusHandle};
use std::path::Path;

/// Install the Prometheus recorder and return a handle for rendering.
pub fn init_metrics() -> Option<PrometheusHandle> {
    match PrometheusBuilder::new().install_recorder() {
        Ok(handle) => Some(handle),
        Err(e) => {
            tracing::error!(error = %e, "Failed to install metrics recorder");
            None
        }
    }
}

/// Write the current metrics snapshot in Prometheus text format.
pub fn write_snapshot(handle: &PrometheusHandle, path: &Path) -> std::io::Result<()> {
    std::fs::write(path, handle.render())?;
    tracing::info!(path = %path.display(), "Metrics snapshot written");
    Ok(())
}

/// Record a platform API call.
pub fn record_api_request(endpoint: &'static str, status: u16) {
    metrics::counter!(
        "verifier_api_requests_total",
        "endpoint" => endpoint,
        "status" => status.to_string()
    )
    .increment(1);
}

/// Record one polling attempt.
pub fn record_poll_attempt(site: &'static str, outcome: &'static str) {
    metrics::counter!("verifier_poll_attempts_total", "site" => site, "outcome" => outcome)
        .increment(1);
}

/// Record a chain RPC call.
pub fn record_rpc_call(method: &'static str, ok: bool) {
    let outcome = if ok { "ok" } else { "error" };
    metrics::counter!("verifier_rpc_calls_total", "method" => method, "outcome" => outcome)
        .increment(1);
}

/// Record a scenario step result.
pub fn record_step(step: &'static str, outcome: &'static str) {
    metrics::counter!("verifier_steps_total", "step" => step, "outcome" => outcome).increment(1);
}
