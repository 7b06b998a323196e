//! Tracing initialization driven by `LoggerSettings`.
//!
//! `RUST_LOG` takes precedence over the configured level, so individual
//! targets can still be tuned without touching configuration files.

use tracing_subscriber::EnvFilter;

use crate::config::settings::LoggerSettings;
use crate::error::{AppError, AppResult};

/// Installs the global tracing subscriber.
///
/// Returns an error if the configured level is not a valid filter directive
/// or if a subscriber was already installed.
pub fn init_logger(settings: &LoggerSettings) -> AppResult<()> {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&settings.level))
        .map_err(|e| AppError::Internal {
            source: anyhow::anyhow!("Invalid log level '{}': {}", settings.level, e),
        })?;

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_ansi(settings.colored);

    let result = match settings.format.to_lowercase().as_str() {
        "json" => builder.json().try_init(),
        "full" => builder.try_init(),
        "compact" => builder.compact().try_init(),
        other => {
            return Err(AppError::Internal {
                source: anyhow::anyhow!(
                    "Invalid log format '{}'. Valid formats are: compact, full, json",
                    other
                ),
            });
        }
    };

    result.map_err(|e| AppError::Internal {
        source: anyhow::anyhow!("Failed to install tracing subscriber: {}", e),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_unknown_format() {
        let settings = LoggerSettings {
            level: "info".to_string(),
            format: "xml".to_string(),
            colored: false,
        };
        assert!(init_logger(&settings).is_err());
    }
}
