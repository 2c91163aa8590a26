//! SDK configuration.
//!
//! Sources are layered, later ones winning:
//!
//! 1. built-in defaults
//! 2. an optional YAML file
//! 3. `FGA_`-prefixed environment variables, `__` separating sections
//!    (`FGA_LOGGING__LEVEL=debug`)
//!
//! Only variables naming one of the sections below are read. Other `FGA_*`
//! variables, such as the CLI's `FGA_API_URL` or `FGA_STORE_ID`, are ignored.

use std::path::Path;

use figment::Figment;
use figment::providers::{Env, Format, Serialized, Yaml};
use fga_schema::ValidationOptions;
use serde::{Deserialize, Serialize};

use crate::error::SdkError;

const ENV_PREFIX: &str = "FGA_";
const ENV_SECTIONS: [&str; 2] = ["validation", "logging"];

/// Whether a prefix-stripped environment key addresses a known section.
fn is_section_key(key: &str) -> bool {
    let key = key.to_ascii_lowercase();
    ENV_SECTIONS.iter().any(|section| {
        key.strip_prefix(section)
            .is_some_and(|rest| rest.starts_with("__") || rest.starts_with('.'))
    })
}

/// Top-level SDK configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SdkConfig {
    pub validation: ValidationConfig,
    pub logging: LoggingConfig,
}

/// How strictly response payloads are checked.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ValidationConfig {
    /// Accept numeric strings for `integer`/`number` fields.
    pub numeric_strings: bool,

    /// Treat `null` on an optional field as if it were absent.
    pub null_as_absent: bool,
}

impl Default for ValidationConfig {
    fn default() -> Self {
        let options = ValidationOptions::default();
        Self {
            numeric_strings: options.numeric_strings,
            null_as_absent: options.null_as_absent,
        }
    }
}

impl From<&ValidationConfig> for ValidationOptions {
    fn from(config: &ValidationConfig) -> Self {
        Self {
            numeric_strings: config.numeric_strings,
            null_as_absent: config.null_as_absent,
        }
    }
}

/// Logging output.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct LoggingConfig {
    /// Filter directive used when `RUST_LOG` is unset (e.g. `info`, `fga_schema=trace`).
    pub level: String,

    /// Emit JSON lines instead of human-readable text.
    pub json: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_owned(),
            json: false,
        }
    }
}

impl SdkConfig {
    /// Load configuration from defaults, `path` and the environment.
    ///
    /// # Errors
    ///
    /// Returns [`SdkError::ConfigNotFound`] if `path` does not exist, or
    /// [`SdkError::Config`] if a source is malformed or holds unknown keys.
    pub fn load(path: Option<&Path>) -> Result<Self, SdkError> {
        let mut figment = Figment::from(Serialized::defaults(Self::default()));
        if let Some(path) = path {
            if !path.is_file() {
                return Err(SdkError::ConfigNotFound {
                    path: path.to_path_buf(),
                });
            }
            figment = figment.merge(Yaml::file(path));
        }
        let config: Self = figment
            .merge(
                Env::prefixed(ENV_PREFIX)
                    .filter(|key| is_section_key(key.as_str()))
                    .split("__"),
            )
            .extract()?;
        tracing::debug!(
            file = ?path.map(Path::display),
            numeric_strings = config.validation.numeric_strings,
            null_as_absent = config.validation.null_as_absent,
            "loaded SDK configuration"
        );
        Ok(config)
    }

    /// Validator options derived from this configuration.
    #[must_use]
    pub fn validation_options(&self) -> ValidationOptions {
        (&self.validation).into()
    }
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_lenient() {
        let options = SdkConfig::default().validation_options();
        assert!(options.numeric_strings);
        assert!(options.null_as_absent);
    }

    #[test]
    fn partial_yaml_keeps_other_defaults() {
        let cfg: SdkConfig = serde_json::from_value(serde_json::json!({
            "logging": { "json": true }
        }))
        .unwrap();
        assert!(cfg.logging.json);
        assert_eq!(cfg.logging.level, "info");
    }

    #[test]
    fn only_section_keys_are_read_from_env() {
        assert!(is_section_key("LOGGING__LEVEL"));
        assert!(is_section_key("validation.null_as_absent"));
        assert!(!is_section_key("API_URL"));
        assert!(!is_section_key("LOGGINGX__LEVEL"));
        assert!(!is_section_key("logging"));
    }

    #[test]
    fn unknown_keys_are_rejected() {
        let res: Result<SdkConfig, _> =
            serde_json::from_value(serde_json::json!({ "transport": {} }));
        assert!(res.is_err());
    }
}
