//! Structured logging configuration.

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Initialize structured logging
///
/// Log levels are configurable via the `RUST_LOG` environment variable;
/// sqlx and hyper are capped at `warn` by default.
///
/// # Example
///
/// ```no_run
/// use sf_server::logging;
///
/// #[tokio::main]
/// async fn main() {
///     logging::init();
///     tracing::info!("Server starting");
/// }
/// ```
pub fn init() {
    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,sqlx=warn,hyper=warn"));

    let fmt_layer = tracing_subscriber::fmt::layer().with_target(true);

    tracing_subscriber::registry()
        .with(env_filter)
        .with(fmt_layer)
        .init();
}

/// Log a security event with structured data
///
/// Internal causes of authentication failures are logged here and never
/// included in responses.
pub fn log_security_event(event_type: &str, user_id: Option<i64>, message: &str) {
    tracing::warn!(
        event_type = event_type,
        user_id = user_id,
        "SECURITY: {}",
        message
    );
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn security_event_does_not_panic() {
        log_security_event("failed_login", Some(1), "Invalid password attempt");
        log_security_event("invalid_token", None, "Rejected bearer token");
    }
}
