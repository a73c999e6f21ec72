//! Prometheus metrics for the snapfeed server.
//!
//! Metrics are exposed in Prometheus text format on a separate listener,
//! configured via `METRICS_BIND`.

use metrics_exporter_prometheus::PrometheusBuilder;
use std::net::SocketAddr;

/// Initialize the Prometheus metrics exporter.
///
/// Metrics will be available at `http://<addr>/metrics`.
pub fn init_metrics(addr: SocketAddr) -> Result<(), String> {
    PrometheusBuilder::new()
        .with_http_listener(addr)
        .install()
        .map_err(|e| format!("Failed to install Prometheus exporter: {}", e))
}

/// Record a completed signup.
pub fn signups_total() {
    metrics::counter!("signups_total").increment(1);
}

/// Record a login attempt with its outcome.
pub fn login_attempts_total(outcome: &str) {
    metrics::counter!("login_attempts_total", "outcome" => outcome.to_string()).increment(1);
}

/// Record an access token refresh with its outcome.
pub fn token_refresh_total(outcome: &str) {
    metrics::counter!("token_refresh_total", "outcome" => outcome.to_string()).increment(1);
}

/// Record a request rejected by the authentication gate.
pub fn auth_gate_rejections_total(reason: &str) {
    metrics::counter!("auth_gate_rejections_total", "reason" => reason.to_string()).increment(1);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn counters_do_not_panic_without_exporter() {
        signups_total();
        login_attempts_total("success");
        token_refresh_total("rejected");
        auth_gate_rejections_total("missing_token");
    }
}
