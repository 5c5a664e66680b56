//! Handler trait for method invocation.
//!
//! A [`Handler`] is the callable behind one API method. Besides being
//! callable it reports its own ordered parameter names, which is what the
//! binder reconciles a method's argument schema against.
//!
//! Parameter names come from one of two places:
//!
//! - an explicit list given to [`FnHandler::new`], or
//! - the `#[handler]` attribute from `callmap-macros`, which reads them from
//!   the function signature at build time.

use serde::{de::DeserializeOwned, Serialize};
use serde_json::Value;
use std::sync::Arc;

use crate::context::CallContext;
use crate::error::{CallmapError, CallmapResult, Rejection};
use crate::value::ArgValue;

/// A callable with a declared, ordered parameter list.
///
/// # Example
///
/// ```
/// use callmap_core::{ArgValue, CallContext, CallmapResult, Handler};
/// use serde_json::{json, Value};
///
/// struct Echo {
///     params: Vec<String>,
/// }
///
/// impl Handler for Echo {
///     fn params(&self) -> &[String] {
///         &self.params
///     }
///
///     fn call(&self, _ctx: &CallContext, args: Vec<ArgValue>) -> CallmapResult<Value> {
///         Ok(args.into_iter().next().flatten().unwrap_or(Value::Null))
///     }
/// }
///
/// let echo = Echo { params: vec!["message".to_string()] };
/// let out = echo.call(&CallContext::mock(), vec![Some(json!("hi"))]).unwrap();
/// assert_eq!(out, json!("hi"));
/// ```
pub trait Handler: Send + Sync + 'static {
    /// Returns the handler's parameter names in declaration order.
    fn params(&self) -> &[String];

    /// Invokes the handler with an ordered argument vector.
    ///
    /// `args` has exactly one entry per parameter, in [`params`](Self::params)
    /// order. The context is the receiver of the call.
    ///
    /// # Errors
    ///
    /// Returns [`CallmapError`] if an argument cannot be converted to the
    /// handler's parameter type or the handler itself fails.
    fn call(&self, ctx: &CallContext, args: Vec<ArgValue>) -> CallmapResult<Value>;
}

/// A shared, type-erased handler.
pub type HandlerRef = Arc<dyn Handler>;

impl std::fmt::Debug for dyn Handler {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Handler")
            .field("params", &self.params())
            .finish_non_exhaustive()
    }
}

/// A closure-based handler with explicitly declared parameter names.
///
/// # Example
///
/// ```
/// use callmap_core::{CallContext, FnHandler, Handler};
/// use serde_json::{json, Value};
///
/// let add = FnHandler::new(["a", "b"], |_ctx, args| {
///     let sum: f64 = args.iter().flatten().filter_map(Value::as_f64).sum();
///     Ok(json!(sum))
/// });
///
/// assert_eq!(add.params(), ["a", "b"]);
/// let out = add.call(&CallContext::mock(), vec![Some(json!(1)), Some(json!(2))]).unwrap();
/// assert_eq!(out, json!(3.0));
/// ```
pub struct FnHandler<F>
where
    F: Fn(&CallContext, Vec<ArgValue>) -> CallmapResult<Value> + Send + Sync + 'static,
{
    params: Vec<String>,
    func: F,
}

impl<F> FnHandler<F>
where
    F: Fn(&CallContext, Vec<ArgValue>) -> CallmapResult<Value> + Send + Sync + 'static,
{
    /// Creates a new function-based handler.
    pub fn new<I, S>(params: I, func: F) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            params: params.into_iter().map(Into::into).collect(),
            func,
        }
    }

    /// Wraps the handler in a [`HandlerRef`].
    pub fn into_ref(self) -> HandlerRef {
        Arc::new(self)
    }
}

impl<F> Handler for FnHandler<F>
where
    F: Fn(&CallContext, Vec<ArgValue>) -> CallmapResult<Value> + Send + Sync + 'static,
{
    fn params(&self) -> &[String] {
        &self.params
    }

    fn call(&self, ctx: &CallContext, args: Vec<ArgValue>) -> CallmapResult<Value> {
        (self.func)(ctx, args)
    }
}

impl<F> std::fmt::Debug for FnHandler<F>
where
    F: Fn(&CallContext, Vec<ArgValue>) -> CallmapResult<Value> + Send + Sync + 'static,
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FnHandler")
            .field("params", &self.params)
            .finish_non_exhaustive()
    }
}

/// Creates a [`HandlerRef`] from parameter names and a closure.
pub fn handler_fn<I, S, F>(params: I, func: F) -> HandlerRef
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
    F: Fn(&CallContext, Vec<ArgValue>) -> CallmapResult<Value> + Send + Sync + 'static,
{
    FnHandler::new(params, func).into_ref()
}

/// Converts one bound argument into a handler parameter type.
///
/// An undefined argument is read as JSON `null`, so `Option<T>` parameters
/// receive `None` and other types fail.
///
/// # Errors
///
/// Returns [`CallmapError::Validation`] naming the argument when the value
/// does not deserialize into `T`.
pub fn from_arg<T: DeserializeOwned>(method: &str, name: &str, value: ArgValue) -> CallmapResult<T> {
    let defined = value.is_some();
    serde_json::from_value(value.unwrap_or(Value::Null)).map_err(|e| {
        let message = if defined {
            e.to_string()
        } else {
            format!("argument is undefined: {e}")
        };
        CallmapError::validation(method, name, Rejection::new(message))
    })
}

/// Converts a handler's return value into the engine's result type.
///
/// Implemented for `Result<T, E>` where `T` serializes to JSON and `E`
/// converts into [`anyhow::Error`]. A [`CallmapError`] returned by the
/// handler passes through unchanged.
pub trait IntoOutcome {
    /// Performs the conversion.
    fn into_outcome(self) -> CallmapResult<Value>;
}

impl<T, E> IntoOutcome for Result<T, E>
where
    T: Serialize,
    E: Into<anyhow::Error>,
{
    fn into_outcome(self) -> CallmapResult<Value> {
        match self {
            Ok(value) => serde_json::to_value(value)
                .map_err(|e| CallmapError::handler_with_source("result is not serializable", e)),
            Err(e) => {
                let error: anyhow::Error = e.into();
                match error.downcast::<CallmapError>() {
                    Ok(callmap) => Err(callmap),
                    Err(other) => Err(CallmapError::HandlerFailed {
                        message: other.to_string(),
                        source: Some(other),
                    }),
                }
            }
        }
    }
}
