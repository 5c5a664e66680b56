//! Configuration errors.

use std::path::PathBuf;
use thiserror::Error;

/// Errors raised while loading or validating a [`CallmapConfig`].
///
/// [`CallmapConfig`]: crate::CallmapConfig
#[derive(Error, Debug)]
pub enum ConfigError {
    /// A config or dotenv file that was asked for does not exist.
    #[error("no config file at {path}")]
    FileNotFound {
        /// The path that was looked up.
        path: PathBuf,
    },

    /// A config file exists but could not be read.
    #[error("cannot read config file {path}")]
    Read {
        /// The file.
        path: PathBuf,
        /// I/O failure.
        #[source]
        source: std::io::Error,
    },

    /// The format is neither `toml` nor `json`.
    #[error("config format {format:?} is not supported; use toml or json")]
    UnsupportedFormat {
        /// The file extension or format name given.
        format: String,
    },

    /// The TOML document does not describe a config (syntax or unknown key).
    #[error("invalid TOML config: {0}")]
    Toml(#[from] toml::de::Error),

    /// The JSON document does not describe a config (syntax or unknown key).
    #[error("invalid JSON config: {0}")]
    Json(#[from] serde_json::Error),

    /// A dotenv file could not be parsed.
    #[error("cannot load dotenv file {path}")]
    Dotenv {
        /// The dotenv file, or `.env` when it was discovered.
        path: String,
        /// Parser failure.
        #[source]
        source: dotenvy::Error,
    },

    /// An override variable is not shaped `PREFIX__SECTION__KEY`.
    #[error("malformed override variable {key}; expected PREFIX__SECTION__KEY")]
    MalformedEnvKey {
        /// The full variable name.
        key: String,
    },

    /// An override variable names a setting that does not exist.
    #[error("override variable {key} does not name a setting")]
    UnknownEnvKey {
        /// The full variable name, e.g. `CALLMAP__LOADER__ROUTES`.
        key: String,
    },

    /// An override variable's value does not parse.
    #[error("override variable {key}={value:?}: expected {expected}")]
    InvalidEnvValue {
        /// The full variable name.
        key: String,
        /// The rejected value.
        value: String,
        /// What the setting accepts.
        expected: &'static str,
    },

    /// `loader.prefix` cannot be used as a route prefix.
    #[error("loader.prefix {prefix:?} is not route-safe: {reason}")]
    InvalidPrefix {
        /// The configured prefix.
        prefix: String,
        /// What is wrong with it.
        reason: String,
    },

    /// `logging.level` is not a valid filter directive.
    #[error("logging.level {level:?} is not a valid filter: {reason}")]
    InvalidLogLevel {
        /// The configured level.
        level: String,
        /// Filter parser message.
        reason: String,
    },
}

impl ConfigError {
    /// A missing file.
    pub fn file_not_found(path: impl Into<PathBuf>) -> Self {
        Self::FileNotFound { path: path.into() }
    }

    /// An unreadable file.
    pub fn read(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Read {
            path: path.into(),
            source,
        }
    }

    /// A format other than toml or json.
    pub fn unsupported_format(format: impl Into<String>) -> Self {
        Self::UnsupportedFormat {
            format: format.into(),
        }
    }

    /// A dotenv parse failure.
    pub fn dotenv(path: impl Into<String>, source: dotenvy::Error) -> Self {
        Self::Dotenv {
            path: path.into(),
            source,
        }
    }

    /// An override variable without `SECTION__KEY`.
    pub fn malformed_env_key(key: impl Into<String>) -> Self {
        Self::MalformedEnvKey { key: key.into() }
    }

    /// An override variable for a setting that does not exist.
    pub fn unknown_env_key(key: impl Into<String>) -> Self {
        Self::UnknownEnvKey { key: key.into() }
    }

    /// An override value that does not parse.
    pub fn invalid_env_value(
        key: impl Into<String>,
        value: impl Into<String>,
        expected: &'static str,
    ) -> Self {
        Self::InvalidEnvValue {
            key: key.into(),
            value: value.into(),
            expected,
        }
    }

    /// A prefix that cannot appear in a route.
    pub fn invalid_prefix(prefix: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidPrefix {
            prefix: prefix.into(),
            reason: reason.into(),
        }
    }

    /// A log level the filter parser rejects.
    pub fn invalid_log_level(level: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidLogLevel {
            level: level.into(),
            reason: reason.into(),
        }
    }

    /// Returns `true` for errors raised by `PREFIX__SECTION__KEY` overrides.
    pub fn is_env_override(&self) -> bool {
        matches!(
            self,
            Self::MalformedEnvKey { .. } | Self::UnknownEnvKey { .. } | Self::InvalidEnvValue { .. }
        )
    }
}
