//! # Callmap
//!
//! **Turn a map of named handlers into endpoints with validated, ordered
//! arguments.**
//!
//! A service describes its methods as an [`ApiMap`]: method name → handler,
//! optional argument declarations, optional metadata. Loading the map checks
//! its structure, reconciles every argument declaration with its handler's
//! parameters once, and produces [`Endpoints`]. Each call then maps an
//! unordered bag of named arguments onto the handler's parameters, applying
//! defaults, `parse` and `validate` along the way.
//!
//! ## Quick Start
//!
//! ```
//! use callmap::prelude::*;
//! use callmap::parse;
//! use serde_json::json;
//!
//! let add = handler_fn(["a", "b"], |_ctx, args| {
//!     let sum: f64 = args.iter().flatten().filter_map(|v| v.as_f64()).sum();
//!     Ok(json!(sum))
//! });
//!
//! let api = ApiMap::new().with(
//!     "numbers.add",
//!     MethodSpec::new(add).args([
//!         ArgSpec::named("a").parse(parse::number),
//!         ArgSpec::named("b").parse(parse::number),
//!     ]),
//! );
//!
//! let endpoints = Loader::with_options(LoaderOptions::new().with_prefix("api"))
//!     .load(&api)
//!     .unwrap();
//! let add = endpoints.get("numbers.add").unwrap();
//! assert_eq!(add.route(), "/api/numbers.add");
//!
//! let bag = ArgBag::new().with("a", json!("1")).with("b", json!("2"));
//! assert_eq!(add.call(bag).unwrap(), json!(3.0));
//!
//! let err = add.call(ArgBag::new().with("a", json!("1"))).unwrap_err();
//! assert_eq!(err.kind(), ErrorKind::MissingArgument);
//! ```
//!
//! ## Handlers from functions
//!
//! `#[handler]` reads a function's parameter names at build time. The
//! generated code refers to `callmap_core`, so depend on it directly:
//!
//! ```rust,ignore
//! use callmap::{handler, CallmapError};
//!
//! #[handler]
//! fn add(a: f64, b: f64) -> Result<f64, CallmapError> {
//!     Ok(a + b)
//! }
//!
//! let api = callmap::ApiMap::new().with("numbers.add", add_handler());
//! ```
//!
//! ## Pipeline
//!
//! ```text
//! ApiMap → StructuralValidator → per method: normalize → Binder::compile
//!        → Endpoint { name, route, metadata, matcher } → Endpoints
//!
//! call:  ArgBag → Endpoint::validate → CallContext (bound args) → Endpoint::handle
//! ```

#![doc(html_root_url = "https://docs.rs/callmap/0.1.0")]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

mod endpoint;
mod loader;
mod registry;
mod route;

pub use endpoint::{Endpoint, Endpoints};
pub use loader::{load, Loader, LoaderOptions};
pub use registry::EndpointSet;
pub use route::route;

// Re-export core types
pub use callmap_core::{
    handler_fn, ApiMap, ArgBag, ArgDecl, ArgSpec, ArgValue, ArgsDecl, CallContext, CallId,
    CallmapError, CallmapResult, ErrorKind, FnMiddleware, Handler, HandlerRef, Metadata,
    MethodDefinition, MethodSpec, Middleware, Rejection,
};

// Re-export the binding engine
pub use callmap_binder::{parse, ArgNameMap, Binder, FnNameMap, Identity, Matcher, SnakeToCamel};

// Re-export the structural validator
pub use callmap_schema::StructuralValidator;

// Re-export configuration
pub use callmap_config::{CallmapConfig, ConfigError, ConfigLoader};

// Re-export macros - the handler attribute macro
pub use callmap_macros::handler;

/// Installs the logging subscriber described by `config.logging`.
///
/// # Errors
///
/// Returns `TelemetryError` if the level does not parse or a subscriber is
/// already installed.
pub fn init_logging(config: &CallmapConfig) -> callmap_telemetry::TelemetryResult<()> {
    callmap_telemetry::init_logging(&callmap_telemetry::LogConfig::from(&config.logging))
}

/// Prelude module for convenient imports.
///
/// ```
/// use callmap::prelude::*;
/// ```
pub mod prelude {
    pub use callmap_core::{
        handler_fn, ApiMap, ArgBag, ArgSpec, CallContext, CallmapError, CallmapResult, ErrorKind,
        Metadata, MethodSpec, Rejection,
    };

    pub use crate::{Endpoint, EndpointSet, Endpoints, Loader, LoaderOptions};

    pub use callmap_macros::handler;
}
