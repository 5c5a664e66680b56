//! Typed configuration for callmap.
//!
//! - TOML and JSON configuration files
//! - Environment variable overrides
//! - Strict validation (fails on unknown fields)
//! - Layered configuration (defaults → file → env)
//!
//! # Example
//!
//! ```no_run
//! use callmap_config::ConfigLoader;
//!
//! # fn main() -> Result<(), callmap_config::ConfigError> {
//! let config = ConfigLoader::new()
//!     .with_defaults()
//!     .with_optional_file("callmap.toml")?
//!     .with_dotenv()?
//!     .with_env_prefix("CALLMAP")
//!     .load()?;
//!
//! println!("routes under: {:?}", config.loader.prefix);
//! # Ok(())
//! # }
//! ```
//!
//! # Configuration File Format
//!
//! ```toml
//! [loader]
//! prefix = "api"                 # routes become /api/<method>
//! arg_naming = "snake_to_camel"  # (default) or "positional"
//!
//! [logging]
//! enabled = true
//! level = "info"
//! format = "json"                # or "pretty"
//! ansi_enabled = false
//! ```
//!
//! # Environment Variable Overrides
//!
//! Every value can be overridden with `PREFIX__SECTION__KEY`:
//!
//! - `CALLMAP__LOADER__PREFIX=rpc`
//! - `CALLMAP__LOADER__ARG_NAMING=positional`
//! - `CALLMAP__LOGGING__LEVEL=debug`

#![warn(missing_docs)]

mod config;
mod error;
mod loader;
mod schema;

pub use config::CallmapConfig;
pub use error::ConfigError;
pub use loader::ConfigLoader;
pub use schema::{ArgNaming, LogFormat, LoaderSection, LoggingSection};
