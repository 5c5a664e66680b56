//! Root configuration type.

use callmap_telemetry::logging::create_env_filter;
use serde::{Deserialize, Serialize};

use crate::{ArgNaming, ConfigError, LogFormat, LoaderSection, LoggingSection};

/// Complete callmap configuration.
///
/// Use [`ConfigLoader`](crate::ConfigLoader) to load configuration from files
/// and environment variables.
///
/// # Example
///
/// ```
/// use callmap_config::{ArgNaming, CallmapConfig};
///
/// let config = CallmapConfig::default();
/// assert!(config.loader.prefix.is_none());
/// assert_eq!(config.loader.arg_naming, ArgNaming::SnakeToCamel);
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(deny_unknown_fields)]
pub struct CallmapConfig {
    /// Loader configuration (route prefix, argument naming).
    #[serde(default)]
    pub loader: LoaderSection,

    /// Logging configuration.
    #[serde(default)]
    pub logging: LoggingSection,
}

impl CallmapConfig {
    /// Validate the configuration.
    ///
    /// # Errors
    ///
    /// - [`ConfigError::InvalidPrefix`] if `loader.prefix` is empty or not
    ///   a route-safe path
    /// - [`ConfigError::InvalidLogLevel`] if `logging.level` is not a valid
    ///   filter directive
    pub fn validate(&self) -> Result<(), ConfigError> {
        if let Some(prefix) = &self.loader.prefix {
            validate_prefix(prefix)?;
        }

        create_env_filter(&self.logging.level)
            .map_err(|e| ConfigError::invalid_log_level(&self.logging.level, e.to_string()))?;

        Ok(())
    }

    /// Create a development configuration preset.
    ///
    /// Pretty, colored, debug-level logs.
    ///
    /// # Example
    ///
    /// ```
    /// use callmap_config::CallmapConfig;
    ///
    /// let config = CallmapConfig::development();
    /// assert_eq!(config.logging.level, "debug");
    /// ```
    #[must_use]
    pub fn development() -> Self {
        let mut config = Self::default();
        config.logging.level = "debug".to_string();
        config.logging.format = LogFormat::Pretty;
        config.logging.ansi_enabled = true;
        config
    }

    /// Create a production configuration preset.
    ///
    /// JSON logs at info level.
    ///
    /// # Example
    ///
    /// ```
    /// use callmap_config::{CallmapConfig, LogFormat};
    ///
    /// let config = CallmapConfig::production();
    /// assert_eq!(config.logging.format, LogFormat::Json);
    /// ```
    #[must_use]
    pub fn production() -> Self {
        let mut config = Self::default();
        config.logging.level = "info".to_string();
        config.logging.format = LogFormat::Json;
        config.logging.ansi_enabled = false;
        config
    }

    /// Returns `true` if external argument names are mapped.
    #[must_use]
    pub fn maps_arg_names(&self) -> bool {
        self.loader.arg_naming != ArgNaming::Positional
    }
}

// Segments are separated by '/'; surrounding slashes are trimmed at route time.
fn validate_prefix(prefix: &str) -> Result<(), ConfigError> {
    let trimmed = prefix.trim_matches('/');
    if trimmed.is_empty() {
        return Err(ConfigError::invalid_prefix(
            prefix,
            "must not be empty; omit it for unprefixed routes",
        ));
    }

    for segment in trimmed.split('/') {
        if segment.is_empty() {
            return Err(ConfigError::invalid_prefix(prefix, "empty path segment"));
        }
        if let Some(c) = segment
            .chars()
            .find(|c| !(c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.' | '~')))
        {
            return Err(ConfigError::invalid_prefix(
                prefix,
                format!("character {c:?} is not allowed in a route"),
            ));
        }
    }

    Ok(())
}
