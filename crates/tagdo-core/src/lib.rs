pub mod config;
pub mod error;

pub use config::{Config, LoggingConfig, ServiceConfig, ValidationResult};
pub use error::{AppError, ConfigError, NetworkError};

use anyhow::Result;

/// Initialize logging.
///
/// `RUST_LOG` wins when set; otherwise `default_filter` (usually `logging.filter` from the
/// config) is used. Calling this twice is harmless: the second subscriber is ignored.
pub fn init(default_filter: &str) -> Result<()> {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .or_else(|_| tracing_subscriber::EnvFilter::try_new(default_filter))
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));

    if tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init()
        .is_err()
    {
        tracing::debug!("Tracing subscriber already installed");
    }

    tracing::debug!("tagdo core initialized");
    Ok(())
}
