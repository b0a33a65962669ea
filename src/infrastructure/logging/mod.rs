// Logging module - Logging infrastructure
use crate::domain::error::{SecretsError, SecretsResult};
use std::io;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Filter directive for the configured level; `--verbose` forces debug.
pub fn filter_directive(log_level: &str, verbose: bool) -> String {
    let level = if verbose {
        "debug"
    } else {
        match log_level {
            "error" | "warn" | "info" | "debug" | "trace" => log_level,
            _ => "warn",
        }
    };
    format!("secretsctl={},warn", level)
}

/// Initialize logging to stderr. `RUST_LOG` overrides the configured level.
pub fn init_logging(log_level: &str, verbose: bool) -> SecretsResult<()> {
    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(filter_directive(log_level, verbose)));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(io::stderr)
                .with_target(false)
                .with_level(true),
        )
        .try_init()
        .map_err(|e| SecretsError::Config {
            message: format!("Failed to initialize logging: {}", e),
        })?;

    tracing::debug!("logging initialized");
    Ok(())
}
