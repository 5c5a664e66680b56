//! Method metadata.
//!
//! [`Metadata`] is opaque to the binder: it is carried from the method
//! definition to the endpoint unchanged. The middleware it lists is never
//! invoked by callmap itself; the embedding service decides when and how to
//! run it.

use serde_json::Value;
use std::sync::Arc;

use crate::context::CallContext;
use crate::error::CallmapResult;

/// Continuation handed to a middleware: runs the rest of the chain.
pub type Next<'a> = &'a dyn Fn(&mut CallContext) -> CallmapResult<Value>;

/// A named `(ctx, next)` stage attached to a method.
///
/// # Example
///
/// ```
/// use callmap_core::{CallContext, FnMiddleware, Middleware};
/// use serde_json::json;
///
/// let tag = FnMiddleware::new("tag", |ctx, next| {
///     ctx.set_extension("tagged", json!(true));
///     next(ctx)
/// });
///
/// let mut ctx = CallContext::mock();
/// let out = tag.process(&mut ctx, &|ctx| Ok(json!(ctx.extension("tagged").is_some())));
/// assert_eq!(out.unwrap(), json!(true));
/// ```
pub trait Middleware: Send + Sync + 'static {
    /// Returns the name of this middleware, used for logging and debugging.
    fn name(&self) -> &str;

    /// Processes one call, usually by invoking `next` exactly once.
    fn process(&self, ctx: &mut CallContext, next: Next<'_>) -> CallmapResult<Value>;
}

/// A closure-based middleware.
pub struct FnMiddleware<F>
where
    F: Fn(&mut CallContext, Next<'_>) -> CallmapResult<Value> + Send + Sync + 'static,
{
    name: String,
    func: F,
}

impl<F> FnMiddleware<F>
where
    F: Fn(&mut CallContext, Next<'_>) -> CallmapResult<Value> + Send + Sync + 'static,
{
    /// Creates a named closure middleware.
    pub fn new(name: impl Into<String>, func: F) -> Self {
        Self {
            name: name.into(),
            func,
        }
    }
}

impl<F> Middleware for FnMiddleware<F>
where
    F: Fn(&mut CallContext, Next<'_>) -> CallmapResult<Value> + Send + Sync + 'static,
{
    fn name(&self) -> &str {
        &self.name
    }

    fn process(&self, ctx: &mut CallContext, next: Next<'_>) -> CallmapResult<Value> {
        (self.func)(ctx, next)
    }
}

/// Metadata attached to a method and passed through to its endpoint.
#[derive(Clone, Default)]
pub struct Metadata {
    /// Whether the method may be called without authentication.
    pub no_auth: bool,
    /// Middleware to run around the method, in order.
    pub middleware: Vec<Arc<dyn Middleware>>,
}

impl Metadata {
    /// Creates default metadata: authentication required, no middleware.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Marks the method as callable without authentication.
    #[must_use]
    pub fn no_auth(mut self) -> Self {
        self.no_auth = true;
        self
    }

    /// Appends a middleware.
    #[must_use]
    pub fn with_middleware(mut self, middleware: impl Middleware) -> Self {
        self.middleware.push(Arc::new(middleware));
        self
    }

    /// Returns the middleware names in order.
    pub fn middleware_names(&self) -> impl Iterator<Item = &str> {
        self.middleware.iter().map(|m| m.name())
    }
}

impl std::fmt::Debug for Metadata {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Metadata")
            .field("no_auth", &self.no_auth)
            .field("middleware", &self.middleware_names().collect::<Vec<_>>())
            .finish()
    }
}
