//! Endpoints produced by the loader.
//!
//! An [`Endpoint`] is immutable once built. Every call works on its own
//! [`CallContext`] and [`ArgBag`], so one endpoint can serve concurrent calls
//! without locking.

use std::sync::Arc;

use callmap_binder::{CompiledMethod, Matcher};
use callmap_core::{
    ArgBag, ArgValue, CallContext, CallmapError, CallmapResult, ErrorKind, HandlerRef, Metadata,
};
use callmap_telemetry::metrics::{self, Outcome};
use indexmap::IndexMap;
use serde_json::Value;
use tracing::debug;

/// One invokable method.
///
/// Calls go through two phases so other per-call steps (middleware, for
/// example) can run in between:
///
/// 1. [`validate`](Self::validate) binds a named-argument bag onto a context;
/// 2. [`handle`](Self::handle) invokes the handler with the bound arguments.
///
/// [`call`](Self::call) runs both at once.
#[derive(Debug)]
pub struct Endpoint {
    name: String,
    route: String,
    handler: HandlerRef,
    metadata: Metadata,
    matcher: Matcher,
}

impl Endpoint {
    pub(crate) fn new(compiled: CompiledMethod, route: String) -> Self {
        let name = compiled.name().to_string();
        let (handler, metadata, matcher) = compiled.into_parts();
        Self {
            name,
            route,
            handler,
            metadata,
            matcher,
        }
    }

    /// Returns the method name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the route, e.g. `/api/numbers.add`.
    #[must_use]
    pub fn route(&self) -> &str {
        &self.route
    }

    /// Returns the metadata, unchanged from the method definition.
    #[must_use]
    pub fn metadata(&self) -> &Metadata {
        &self.metadata
    }

    /// Returns the handler.
    #[must_use]
    pub fn handler(&self) -> &HandlerRef {
        &self.handler
    }

    /// Returns the compiled matcher.
    #[must_use]
    pub fn matcher(&self) -> &Matcher {
        &self.matcher
    }

    /// Returns the argument names callers may supply.
    #[must_use]
    pub fn expected_args(&self) -> &[String] {
        self.matcher.expected_names()
    }

    /// Creates a fresh context for one call of this endpoint.
    #[must_use]
    pub fn context(&self) -> CallContext {
        CallContext::new(self.name.as_str())
    }

    /// Binds `bag` and stores the ordered arguments on `ctx`.
    ///
    /// # Errors
    ///
    /// `UnexpectedArgument`, `MissingArgument` or `ValidationError`. The
    /// context is left untouched on error.
    pub fn validate(&self, ctx: &mut CallContext, bag: ArgBag) -> CallmapResult<()> {
        if let Err(err) = self.matcher.bind_into(ctx, bag) {
            self.record_failure(ctx, &err);
            return Err(err);
        }
        Ok(())
    }

    /// Invokes the handler with the arguments [`validate`](Self::validate)
    /// stored on `ctx`.
    ///
    /// # Errors
    ///
    /// `ArgumentsNotBound` if `ctx` was never validated, otherwise whatever
    /// the handler returns.
    pub fn handle(&self, ctx: &CallContext) -> CallmapResult<Value> {
        let Some(bound) = ctx.bound_args() else {
            let err = CallmapError::arguments_not_bound(&self.name);
            self.record_failure(ctx, &err);
            return Err(err);
        };
        let result = self.handler.call(ctx, bound.to_ordered());
        self.finish(ctx, result)
    }

    /// Invokes the handler with an already ordered argument vector.
    ///
    /// # Errors
    ///
    /// Whatever the handler returns.
    pub fn invoke(&self, ctx: &CallContext, args: Vec<ArgValue>) -> CallmapResult<Value> {
        let result = self.handler.call(ctx, args);
        self.finish(ctx, result)
    }

    /// Validates `bag` and handles the call with a fresh context.
    ///
    /// # Errors
    ///
    /// Any error from [`validate`](Self::validate) or
    /// [`handle`](Self::handle).
    pub fn call(&self, bag: ArgBag) -> CallmapResult<Value> {
        let mut ctx = self.context();
        self.validate(&mut ctx, bag)?;
        self.handle(&ctx)
    }

    fn finish(&self, ctx: &CallContext, result: CallmapResult<Value>) -> CallmapResult<Value> {
        match &result {
            Ok(_) => metrics::record_call(&self.name, Outcome::Ok, ctx.elapsed()),
            Err(err) => self.record_failure(ctx, err),
        }
        result
    }

    fn record_failure(&self, ctx: &CallContext, err: &CallmapError) {
        let outcome = if err.kind() == ErrorKind::HandlerFailed {
            Outcome::Failed
        } else {
            metrics::record_rejection(&self.name, err.code());
            Outcome::Rejected
        };
        debug!(
            method = %self.name,
            call_id = %ctx.call_id(),
            code = err.code(),
            error = %err,
            "call rejected"
        );
        metrics::record_call(&self.name, outcome, ctx.elapsed());
    }
}

/// The ordered endpoint list of one load.
///
/// Iteration order is the key order of the API map.
#[derive(Debug, Clone, Default)]
pub struct Endpoints {
    by_name: IndexMap<String, Arc<Endpoint>>,
}

impl Endpoints {
    pub(crate) fn with_capacity(capacity: usize) -> Self {
        Self {
            by_name: IndexMap::with_capacity(capacity),
        }
    }

    pub(crate) fn push(&mut self, endpoint: Endpoint) {
        self.by_name
            .insert(endpoint.name.clone(), Arc::new(endpoint));
    }

    /// Looks up an endpoint by method name.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&Endpoint> {
        self.by_name.get(name).map(AsRef::as_ref)
    }

    pub(crate) fn get_shared(&self, name: &str) -> Option<Arc<Endpoint>> {
        self.by_name.get(name).cloned()
    }

    /// Iterates over the endpoints in load order.
    pub fn iter(&self) -> impl Iterator<Item = &Endpoint> {
        self.by_name.values().map(AsRef::as_ref)
    }

    /// Iterates over the method names in load order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.by_name.keys().map(String::as_str)
    }

    /// Returns the number of endpoints.
    #[must_use]
    pub fn len(&self) -> usize {
        self.by_name.len()
    }

    /// Returns `true` if there are no endpoints.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.by_name.is_empty()
    }
}

impl<'a> IntoIterator for &'a Endpoints {
    type Item = &'a Endpoint;
    type IntoIter = Box<dyn Iterator<Item = &'a Endpoint> + 'a>;

    fn into_iter(self) -> Self::IntoIter {
        Box::new(self.iter())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use callmap_binder::Binder;
    use callmap_core::{handler_fn, ArgSpec, MethodDefinition, MethodSpec};
    use serde_json::json;

    fn concat_endpoint() -> Endpoint {
        let handler = handler_fn(["first", "second"], |_ctx, args| {
            let joined: Vec<String> = args
                .into_iter()
                .map(|a| a.map_or_else(|| "-".to_string(), |v| v.to_string()))
                .collect();
            Ok(json!(joined.join("|")))
        });
        let spec = MethodSpec::new(handler)
            .args([ArgSpec::named("first"), ArgSpec::named("second").optional()]);
        let compiled = Binder::new()
            .compile("strings.concat", &MethodDefinition::from(spec))
            .unwrap();
        Endpoint::new(compiled, "/strings.concat".to_string())
    }

    #[test]
    fn test_accessors() {
        let endpoint = concat_endpoint();
        assert_eq!(endpoint.name(), "strings.concat");
        assert_eq!(endpoint.route(), "/strings.concat");
        assert_eq!(endpoint.expected_args(), ["first", "second"]);
        assert!(!endpoint.metadata().no_auth);
    }

    #[test]
    fn test_two_phase_call() {
        let endpoint = concat_endpoint();
        let mut ctx = endpoint.context();

        endpoint
            .validate(&mut ctx, ArgBag::new().with("first", json!(1)))
            .unwrap();
        let bound = ctx.bound_args().unwrap();
        assert_eq!(bound.keys().collect::<Vec<_>>(), ["first", "second"]);

        assert_eq!(endpoint.handle(&ctx).unwrap(), json!("1|-"));
    }

    #[test]
    fn test_handle_without_validate() {
        let endpoint = concat_endpoint();
        let err = endpoint.handle(&endpoint.context()).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::ArgumentsNotBound);
        assert_eq!(err.method(), Some("strings.concat"));
    }

    #[test]
    fn test_failed_validate_leaves_context_unbound() {
        let endpoint = concat_endpoint();
        let mut ctx = endpoint.context();
        let err = endpoint
            .validate(&mut ctx, ArgBag::new().with("third", json!(3)))
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::UnexpectedArgument);
        assert!(ctx.bound_args().is_none());
    }

    #[test]
    fn test_invoke_skips_binding() {
        let endpoint = concat_endpoint();
        let out = endpoint
            .invoke(&endpoint.context(), vec![Some(json!("a")), Some(json!("b"))])
            .unwrap();
        assert_eq!(out, json!("\"a\"|\"b\""));
    }

    #[test]
    fn test_call() {
        let endpoint = concat_endpoint();
        let out = endpoint
            .call(ArgBag::new().with("second", json!(2)).with("first", json!(1)))
            .unwrap();
        assert_eq!(out, json!("1|2"));
    }

    #[test]
    fn test_endpoints_order_and_lookup() {
        let mut endpoints = Endpoints::with_capacity(1);
        assert!(endpoints.is_empty());
        endpoints.push(concat_endpoint());

        assert_eq!(endpoints.len(), 1);
        assert_eq!(endpoints.names().collect::<Vec<_>>(), ["strings.concat"]);
        assert!(endpoints.get("strings.concat").is_some());
        assert!(endpoints.get("strings.split").is_none());
        assert_eq!((&endpoints).into_iter().count(), 1);
    }
}
