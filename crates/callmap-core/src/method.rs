//! Declarative method definitions.
//!
//! An [`ApiMap`] maps method names to [`MethodDefinition`]s. A definition is
//! either a bare handler or a [`MethodSpec`] that couples the handler with an
//! optional argument declaration and [`Metadata`].
//!
//! Argument declarations come in two shapes:
//!
//! - an ordered list ([`ArgsDecl::List`]) of bare names or [`ArgSpec`]
//!   records, one per handler parameter;
//! - a keyed map ([`ArgsDecl::Keyed`]) from external name to [`ArgSpec`].
//!
//! # Example
//!
//! ```
//! use callmap_core::{handler_fn, ApiMap, ArgSpec, MethodSpec};
//! use serde_json::json;
//!
//! let add = handler_fn(["a", "b"], |_ctx, args| Ok(json!(args.len())));
//!
//! let mut api = ApiMap::new();
//! api.insert(
//!     "numbers.add",
//!     MethodSpec::new(add).args([ArgSpec::named("a"), ArgSpec::named("b").optional()]),
//! );
//! assert_eq!(api.len(), 1);
//! ```

use indexmap::IndexMap;
use serde_json::Value;
use std::sync::Arc;

use crate::error::Rejection;
use crate::handler::HandlerRef;
use crate::metadata::{Metadata, Middleware};
use crate::value::ArgValue;

/// Transforms a supplied or defaulted value before validation.
pub type ParseFn = Arc<dyn Fn(ArgValue) -> Result<ArgValue, Rejection> + Send + Sync>;

/// Checks a (parsed) value; an `Err` rejects the call.
pub type ValidateFn = Arc<dyn Fn(Option<&Value>) -> Result<(), Rejection> + Send + Sync>;

/// Declaration of one argument.
///
/// Arguments are required unless marked [`optional`](Self::optional). A
/// `default` only applies to optional arguments.
#[derive(Clone, Default)]
pub struct ArgSpec {
    /// External name; inferred from the handler parameter when absent.
    pub name: Option<String>,
    /// Value substituted when an optional argument is undefined.
    pub default: Option<Value>,
    /// Whether the argument may be omitted.
    pub optional: bool,
    /// Transform applied before validation.
    pub parse: Option<ParseFn>,
    /// Check applied after parsing.
    pub validate: Option<ValidateFn>,
}

impl ArgSpec {
    /// Creates an unnamed, required argument.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a named, required argument.
    #[must_use]
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: Some(name.into()),
            ..Self::default()
        }
    }

    /// Marks the argument optional.
    #[must_use]
    pub fn optional(mut self) -> Self {
        self.optional = true;
        self
    }

    /// Sets the default value.
    #[must_use]
    pub fn default_value(mut self, value: Value) -> Self {
        self.default = Some(value);
        self
    }

    /// Sets the parse callback.
    #[must_use]
    pub fn parse<F>(mut self, parse: F) -> Self
    where
        F: Fn(ArgValue) -> Result<ArgValue, Rejection> + Send + Sync + 'static,
    {
        self.parse = Some(Arc::new(parse));
        self
    }

    /// Sets the validate callback.
    #[must_use]
    pub fn validate<F>(mut self, validate: F) -> Self
    where
        F: Fn(Option<&Value>) -> Result<(), Rejection> + Send + Sync + 'static,
    {
        self.validate = Some(Arc::new(validate));
        self
    }

    /// Returns `true` unless the argument is optional.
    #[must_use]
    pub fn is_required(&self) -> bool {
        !self.optional
    }
}

impl std::fmt::Debug for ArgSpec {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ArgSpec")
            .field("name", &self.name)
            .field("default", &self.default)
            .field("optional", &self.optional)
            .field("parse", &self.parse.is_some())
            .field("validate", &self.validate.is_some())
            .finish()
    }
}

/// One element of a list-form argument declaration.
#[derive(Debug, Clone)]
pub enum ArgDecl {
    /// Shorthand: a required argument with this external name.
    Name(String),
    /// Full record.
    Spec(ArgSpec),
}

impl ArgDecl {
    /// Returns the explicitly declared name, if any.
    #[must_use]
    pub fn name(&self) -> Option<&str> {
        match self {
            Self::Name(name) => Some(name),
            Self::Spec(spec) => spec.name.as_deref(),
        }
    }
}

impl From<&str> for ArgDecl {
    fn from(name: &str) -> Self {
        Self::Name(name.to_string())
    }
}

impl From<String> for ArgDecl {
    fn from(name: String) -> Self {
        Self::Name(name)
    }
}

impl From<ArgSpec> for ArgDecl {
    fn from(spec: ArgSpec) -> Self {
        Self::Spec(spec)
    }
}

/// An argument declaration in either supported shape.
#[derive(Debug, Clone)]
pub enum ArgsDecl {
    /// Ordered, one entry per handler parameter.
    List(Vec<ArgDecl>),
    /// Keyed by external name; bound to handler parameters by name.
    Keyed(IndexMap<String, ArgSpec>),
}

impl ArgsDecl {
    /// Returns the number of declared arguments.
    #[must_use]
    pub fn len(&self) -> usize {
        match self {
            Self::List(list) => list.len(),
            Self::Keyed(map) => map.len(),
        }
    }

    /// Returns `true` if nothing is declared.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Handler plus optional argument declaration and metadata.
#[derive(Clone)]
pub struct MethodSpec {
    /// The callable.
    pub handler: HandlerRef,
    /// Argument declaration; `None` means "take the handler's parameters".
    pub args: Option<ArgsDecl>,
    /// Metadata passed through to the endpoint.
    pub metadata: Metadata,
}

impl MethodSpec {
    /// Creates a spec with no argument declaration and default metadata.
    pub fn new(handler: HandlerRef) -> Self {
        Self {
            handler,
            args: None,
            metadata: Metadata::default(),
        }
    }

    /// Declares the arguments as an ordered list.
    #[must_use]
    pub fn args<I, A>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = A>,
        A: Into<ArgDecl>,
    {
        self.args = Some(ArgsDecl::List(args.into_iter().map(Into::into).collect()));
        self
    }

    /// Declares the arguments keyed by external name.
    #[must_use]
    pub fn keyed_args<I, K>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = (K, ArgSpec)>,
        K: Into<String>,
    {
        self.args = Some(ArgsDecl::Keyed(
            args.into_iter().map(|(k, v)| (k.into(), v)).collect(),
        ));
        self
    }

    /// Replaces the metadata.
    #[must_use]
    pub fn metadata(mut self, metadata: Metadata) -> Self {
        self.metadata = metadata;
        self
    }

    /// Marks the method as callable without authentication.
    #[must_use]
    pub fn no_auth(mut self) -> Self {
        self.metadata.no_auth = true;
        self
    }

    /// Appends a middleware.
    #[must_use]
    pub fn middleware(mut self, middleware: impl Middleware) -> Self {
        self.metadata.middleware.push(Arc::new(middleware));
        self
    }
}

impl std::fmt::Debug for MethodSpec {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MethodSpec")
            .field("params", &self.handler.params())
            .field("args", &self.args)
            .field("metadata", &self.metadata)
            .finish()
    }
}

/// A method definition: bare handler or full spec.
#[derive(Debug, Clone)]
pub enum MethodDefinition {
    /// Handler with no schema.
    Bare(HandlerRef),
    /// Handler with schema and metadata.
    Full(MethodSpec),
}

impl MethodDefinition {
    /// Returns the handler.
    #[must_use]
    pub fn handler(&self) -> &HandlerRef {
        match self {
            Self::Bare(handler) => handler,
            Self::Full(spec) => &spec.handler,
        }
    }

    /// Returns the argument declaration, if any.
    #[must_use]
    pub fn args(&self) -> Option<&ArgsDecl> {
        match self {
            Self::Bare(_) => None,
            Self::Full(spec) => spec.args.as_ref(),
        }
    }
}

impl From<HandlerRef> for MethodDefinition {
    fn from(handler: HandlerRef) -> Self {
        Self::Bare(handler)
    }
}

impl From<MethodSpec> for MethodDefinition {
    fn from(spec: MethodSpec) -> Self {
        Self::Full(spec)
    }
}

/// Insertion-ordered map from method name to definition.
#[derive(Debug, Clone, Default)]
pub struct ApiMap {
    methods: IndexMap<String, MethodDefinition>,
}

impl ApiMap {
    /// Creates an empty map.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a method, returning the definition it replaced.
    pub fn insert(
        &mut self,
        name: impl Into<String>,
        method: impl Into<MethodDefinition>,
    ) -> Option<MethodDefinition> {
        self.methods.insert(name.into(), method.into())
    }

    /// Adds a method, builder style.
    #[must_use]
    pub fn with(mut self, name: impl Into<String>, method: impl Into<MethodDefinition>) -> Self {
        self.insert(name, method);
        self
    }

    /// Returns the definition for `name`.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&MethodDefinition> {
        self.methods.get(name)
    }

    /// Iterates in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &MethodDefinition)> {
        self.methods.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Returns the number of methods.
    #[must_use]
    pub fn len(&self) -> usize {
        self.methods.len()
    }

    /// Returns `true` if the map has no methods.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.methods.is_empty()
    }
}

impl<K, M> FromIterator<(K, M)> for ApiMap
where
    K: Into<String>,
    M: Into<MethodDefinition>,
{
    fn from_iter<I: IntoIterator<Item = (K, M)>>(iter: I) -> Self {
        Self {
            methods: iter
                .into_iter()
                .map(|(k, m)| (k.into(), m.into()))
                .collect(),
        }
    }
}
