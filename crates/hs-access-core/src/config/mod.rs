//! Application configuration schemas.
//!
//! All configuration structs are deserialized via the `config` crate from
//! TOML files and environment variables. Each sub-module represents a
//! logical configuration section. Every field has a default so an empty
//! configuration is valid.

pub mod access;
pub mod logging;

use serde::{Deserialize, Serialize};

use self::access::AccessConfig;
use self::logging::LoggingConfig;

use crate::error::AppError;

/// Root application configuration.
///
/// This struct is the top-level deserialization target for the merged
/// configuration (default file + environment overlay + `HSACCESS__*`
/// environment variables).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    /// Access-control engine settings.
    #[serde(default)]
    pub access: AccessConfig,
    /// Logging settings.
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl AppConfig {
    /// Load configuration for the given environment name.
    ///
    /// Merges `config/default`, `config/{env}` (both optional) and
    /// environment variables prefixed with `HSACCESS` using `__` as the
    /// section separator, e.g. `HSACCESS__LOGGING__LEVEL=debug`.
    pub fn load(env: &str) -> Result<Self, AppError> {
        Self::load_from(&["config/default", &format!("config/{env}")])
    }

    /// Load configuration from an explicit list of optional file stems.
    pub fn load_from(files: &[&str]) -> Result<Self, AppError> {
        let mut builder = config::Config::builder();
        for name in files {
            builder = builder.add_source(config::File::with_name(name).required(false));
        }

        let config = builder
            .add_source(
                config::Environment::with_prefix("HSACCESS")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()
            .map_err(|e| AppError::configuration(format!("Failed to build config: {e}")))?;

        config
            .try_deserialize()
            .map_err(|e| AppError::configuration(format!("Failed to deserialize config: {e}")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_files_yield_defaults() {
        let config = AppConfig::load_from(&["config/does-not-exist"]).expect("load");
        assert_eq!(config.access.notify_buffer, 256);
        assert_eq!(config.logging.level, "info");
        assert_eq!(config.logging.format, "pretty");
    }
}
