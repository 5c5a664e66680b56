//! Loading an API map into endpoints.
//!
//! Loading is one synchronous pass: validate the map's structure, compile
//! every method, and collect the endpoints in map order. The first failure
//! aborts the whole load; no partial endpoint list is ever returned.

use std::sync::Arc;

use callmap_binder::{ArgNameMap, Binder, NameMapRef, SnakeToCamel};
use callmap_config::{ArgNaming, CallmapConfig};
use callmap_core::{ApiMap, CallmapResult};
use callmap_schema::StructuralValidator;
use callmap_telemetry::metrics;
use tracing::{info, warn};

use crate::endpoint::{Endpoint, Endpoints};
use crate::route::route;

/// Options for a [`Loader`].
///
/// Declared argument names are mapped onto handler parameters with
/// [`SnakeToCamel`] unless another map, or positional binding, is chosen.
///
/// # Example
///
/// ```
/// use callmap::LoaderOptions;
///
/// let options = LoaderOptions::new().with_prefix("api");
/// assert_eq!(options.prefix(), Some("api"));
/// assert!(options.is_mapped());
/// assert!(!options.positional().is_mapped());
/// ```
#[derive(Clone)]
pub struct LoaderOptions {
    prefix: Option<String>,
    name_map: Option<NameMapRef>,
}

impl Default for LoaderOptions {
    fn default() -> Self {
        Self {
            prefix: None,
            name_map: Some(Arc::new(SnakeToCamel)),
        }
    }
}

impl LoaderOptions {
    /// Creates options with no prefix and the default name map.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds options from loaded configuration.
    #[must_use]
    pub fn from_config(config: &CallmapConfig) -> Self {
        let options = Self {
            prefix: config.loader.prefix.clone(),
            ..Self::default()
        };
        match config.loader.arg_naming {
            ArgNaming::SnakeToCamel => options,
            ArgNaming::Positional => options.positional(),
        }
    }

    /// Sets the route prefix.
    #[must_use]
    pub fn with_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.prefix = Some(prefix.into());
        self
    }

    /// Maps external argument names onto handler parameters.
    #[must_use]
    pub fn with_name_map(self, name_map: impl ArgNameMap) -> Self {
        self.with_name_map_ref(Arc::new(name_map))
    }

    /// Same as [`with_name_map`](Self::with_name_map) for a shared map.
    #[must_use]
    pub fn with_name_map_ref(mut self, name_map: NameMapRef) -> Self {
        self.name_map = Some(name_map);
        self
    }

    /// Binds list declarations by position instead of by name.
    #[must_use]
    pub fn positional(mut self) -> Self {
        self.name_map = None;
        self
    }

    /// Returns the route prefix.
    #[must_use]
    pub fn prefix(&self) -> Option<&str> {
        self.prefix.as_deref()
    }

    /// Returns `true` unless binding is positional.
    #[must_use]
    pub fn is_mapped(&self) -> bool {
        self.name_map.is_some()
    }
}

impl std::fmt::Debug for LoaderOptions {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LoaderOptions")
            .field("prefix", &self.prefix)
            .field("mapped", &self.is_mapped())
            .finish()
    }
}

/// Turns API maps into [`Endpoints`].
///
/// The loader owns the structural validator it is given; construct it once
/// and reuse it for every load.
///
/// # Example
///
/// ```
/// use callmap::{handler_fn, ApiMap, ArgBag, Loader};
/// use serde_json::json;
///
/// let ping = handler_fn(Vec::<String>::new(), |_ctx, _args| Ok(json!("pong")));
/// let api = ApiMap::new().with("system.ping", ping);
///
/// let endpoints = Loader::default().load(&api).unwrap();
/// let ping = endpoints.get("system.ping").unwrap();
/// assert_eq!(ping.route(), "/system.ping");
/// assert_eq!(ping.call(ArgBag::new()).unwrap(), json!("pong"));
/// ```
#[derive(Debug, Clone, Default)]
pub struct Loader {
    validator: StructuralValidator,
    binder: Binder,
    prefix: Option<String>,
}

impl Loader {
    /// Creates a loader from a validator and options.
    #[must_use]
    pub fn new(validator: StructuralValidator, options: LoaderOptions) -> Self {
        let binder = match options.name_map {
            Some(name_map) => Binder::with_name_map_ref(name_map),
            None => Binder::positional(),
        };
        Self {
            validator,
            binder,
            prefix: options.prefix,
        }
    }

    /// Creates a loader with options only.
    #[must_use]
    pub fn with_options(options: LoaderOptions) -> Self {
        Self::new(StructuralValidator::new(), options)
    }

    /// Creates a loader from loaded configuration.
    #[must_use]
    pub fn from_config(config: &CallmapConfig) -> Self {
        Self::with_options(LoaderOptions::from_config(config))
    }

    /// Returns the route prefix.
    #[must_use]
    pub fn prefix(&self) -> Option<&str> {
        self.prefix.as_deref()
    }

    /// Loads `api` into endpoints.
    ///
    /// # Errors
    ///
    /// - `Structural` if the map is malformed;
    /// - `InvalidArgList`, `UnknownHandlerArgument` or `InvalidDefault` from
    ///   the first method that fails to compile.
    pub fn load(&self, api: &ApiMap) -> CallmapResult<Endpoints> {
        match self.build(api) {
            Ok(endpoints) => {
                info!(
                    endpoints = endpoints.len(),
                    prefix = self.prefix.as_deref().unwrap_or(""),
                    "API map loaded"
                );
                metrics::record_load(endpoints.len());
                Ok(endpoints)
            }
            Err(err) => {
                warn!(
                    code = err.code(),
                    method = err.method().unwrap_or(""),
                    error = %err,
                    "API map load aborted"
                );
                metrics::record_load_failure();
                Err(err)
            }
        }
    }

    fn build(&self, api: &ApiMap) -> CallmapResult<Endpoints> {
        let api = self.validator.validate(api)?;

        let mut endpoints = Endpoints::with_capacity(api.len());
        for (name, definition) in api.iter() {
            let compiled = self.binder.compile(name, definition)?;
            endpoints.push(Endpoint::new(compiled, route(self.prefix(), name)));
        }
        Ok(endpoints)
    }
}

/// Loads `api` with a default [`Loader`].
///
/// # Errors
///
/// See [`Loader::load`].
pub fn load(api: &ApiMap) -> CallmapResult<Endpoints> {
    Loader::default().load(api)
}

#[cfg(test)]
mod tests {
    use super::*;
    use callmap_core::{handler_fn, ArgBag, ErrorKind, MethodSpec};
    use serde_json::{json, Value};

    fn sum_map() -> ApiMap {
        let sum = handler_fn(["leftSide", "rightSide"], |_ctx, args| {
            Ok(json!(args.iter().flatten().filter_map(Value::as_i64).sum::<i64>()))
        });
        ApiMap::new().with("numbers.sum", sum)
    }

    #[test]
    fn test_options_debug() {
        let options = LoaderOptions::new().with_prefix("api");
        let debug = format!("{options:?}");
        assert!(debug.contains("api"));
        assert!(debug.contains("mapped: true"));
    }

    #[test]
    fn test_options_from_config() {
        let mut config = CallmapConfig::default();
        assert!(LoaderOptions::from_config(&config).is_mapped());

        config.loader.prefix = Some("rpc".to_string());
        config.loader.arg_naming = ArgNaming::Positional;
        let options = LoaderOptions::from_config(&config);
        assert_eq!(options.prefix(), Some("rpc"));
        assert!(!options.is_mapped());
    }

    #[test]
    fn test_load_with_prefix() {
        let loader = Loader::with_options(LoaderOptions::new().with_prefix("/api/"));
        let endpoints = loader.load(&sum_map()).unwrap();
        assert_eq!(endpoints.get("numbers.sum").unwrap().route(), "/api/numbers.sum");
    }

    #[test]
    fn test_load_positional_names() {
        let loader = Loader::with_options(LoaderOptions::new().positional());
        let endpoints = loader.load(&sum_map()).unwrap();
        let sum = endpoints.get("numbers.sum").unwrap();
        assert_eq!(sum.expected_args(), ["leftSide", "rightSide"]);
    }

    #[test]
    fn test_load_mapped_names() {
        let endpoints = load(&sum_map()).unwrap();
        let sum = endpoints.get("numbers.sum").unwrap();
        assert_eq!(sum.expected_args(), ["left_side", "right_side"]);

        let out = sum
            .call(
                ArgBag::new()
                    .with("left_side", json!(2))
                    .with("right_side", json!(3)),
            )
            .unwrap();
        assert_eq!(out, json!(5));
    }

    #[test]
    fn test_load_rejects_structural_errors() {
        let noop = handler_fn(["a"], |_ctx, _args| Ok(json!(null)));
        let api = ApiMap::new().with("Numbers.Sum", MethodSpec::new(noop));
        let err = load(&api).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Structural);
    }
}
