//! Logging setup for applications embedding the SDK.
//!
//! The SDK itself only emits `tracing` events. Applications that do not
//! install their own subscriber can call [`init_tracing`].

use tracing_subscriber::EnvFilter;

use crate::config::LoggingConfig;
use crate::error::SdkError;

/// Build the event filter: `RUST_LOG` if set, otherwise `config.level`.
///
/// # Errors
///
/// Returns [`SdkError::Telemetry`] if the configured directive does not parse.
pub fn build_filter(config: &LoggingConfig) -> Result<EnvFilter, SdkError> {
    if let Ok(filter) = EnvFilter::try_from_default_env() {
        return Ok(filter);
    }
    EnvFilter::try_new(&config.level)
        .map_err(|e| SdkError::Telemetry(format!("invalid log level `{}`: {e}", config.level)))
}

/// Install a global `fmt` subscriber.
///
/// # Errors
///
/// Returns [`SdkError::Telemetry`] if the filter is invalid or a global
/// subscriber is already installed.
pub fn init_tracing(config: &LoggingConfig) -> Result<(), SdkError> {
    let filter = build_filter(config)?;
    let builder = tracing_subscriber::fmt().with_env_filter(filter).with_target(true);
    let installed = if config.json {
        builder.json().try_init()
    } else {
        builder.try_init()
    };
    installed.map_err(|e| SdkError::Telemetry(e.to_string()))
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use super::*;

    #[test]
    fn configured_level_applies_without_rust_log() {
        temp_env::with_var_unset("RUST_LOG", || {
            let config = LoggingConfig {
                level: "fga_schema=trace,warn".to_owned(),
                json: false,
            };
            let filter = build_filter(&config).unwrap();
            assert!(filter.to_string().contains("fga_schema=trace"));
        });
    }

    #[test]
    fn rust_log_overrides_configured_level() {
        temp_env::with_var("RUST_LOG", Some("error"), || {
            let filter = build_filter(&LoggingConfig::default()).unwrap();
            assert_eq!(filter.to_string(), "error");
        });
    }

    #[test]
    fn malformed_level_is_reported() {
        temp_env::with_var_unset("RUST_LOG", || {
            let config = LoggingConfig {
                level: "fga_schema=notalevel".to_owned(),
                json: false,
            };
            let err = build_filter(&config).unwrap_err();
            assert!(matches!(err, SdkError::Telemetry(_)));
        });
    }
}
