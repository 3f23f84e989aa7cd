//! Tracing/logging initialization.
//!
//! `RUST_LOG` wins over the configured filter. Production emits JSON lines,
//! everything else gets human-readable output.

use tracing_subscriber::EnvFilter;

use crate::config::ServerConfig;

/// Initialize tracing for the process.
///
/// Safe to call multiple times (subsequent calls are no-ops).
pub fn init(server: &ServerConfig) {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&server.log_level))
        .unwrap_or_else(|_| EnvFilter::new("info"));

    let builder = tracing_subscriber::fmt().with_env_filter(filter);

    let installed = if server.is_production() {
        builder
            .json()
            .with_timer(tracing_subscriber::fmt::time::SystemTime)
            .with_current_span(true)
            .try_init()
    } else {
        builder.with_target(true).try_init()
    };

    // Fails only when a global subscriber is already set; that one keeps logging.
    if installed.is_err() {
        tracing::debug!("tracing subscriber already installed; keeping the existing one");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn init_is_idempotent() {
        let config = ServerConfig::default();
        init(&config);
        init(&config);
        tracing::info!("telemetry initialised twice without panicking");
    }

    #[test]
    fn init_tolerates_bad_filter() {
        let config = ServerConfig {
            log_level: "[[not a filter".to_string(),
            ..Default::default()
        };
        init(&config);
    }
}
