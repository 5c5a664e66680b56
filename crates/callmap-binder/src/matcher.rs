//! Call-time argument matching.
//!
//! A [`Matcher`] is the frozen plan produced by [`Binder::compile`]. It turns
//! a caller's [`ArgBag`] into the ordered argument vector the handler
//! expects:
//!
//! 1. every supplied key must be a declared name, else `UnexpectedArgument`;
//! 2. an undefined required argument fails with `MissingArgument`;
//! 3. an undefined optional argument takes its default (possibly undefined);
//! 4. `parse` runs, then `validate` sees the parsed value.
//!
//! Matching never mutates the plan, so one matcher serves any number of
//! concurrent calls.
//!
//! [`Binder::compile`]: crate::Binder::compile

use callmap_core::{
    ArgBag, ArgValue, BoundArgs, CallContext, CallmapError, CallmapResult, ParseFn, ValidateFn,
};
use serde_json::Value;
use std::sync::Arc;

/// One compiled argument, positioned at its handler parameter.
#[derive(Clone)]
pub struct CompiledArg {
    pub(crate) name: String,
    pub(crate) param: String,
    pub(crate) required: bool,
    pub(crate) default: Option<Value>,
    pub(crate) parse: Option<ParseFn>,
    pub(crate) validate: Option<ValidateFn>,
}

impl CompiledArg {
    /// The name callers supply.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The handler parameter this argument binds.
    #[must_use]
    pub fn param(&self) -> &str {
        &self.param
    }

    /// Whether the argument must be supplied.
    #[must_use]
    pub fn is_required(&self) -> bool {
        self.required
    }

    /// The default substituted when an optional argument is undefined.
    #[must_use]
    pub fn default_value(&self) -> Option<&Value> {
        self.default.as_ref()
    }

    /// Whether a parse callback is configured.
    #[must_use]
    pub fn has_parse(&self) -> bool {
        self.parse.is_some()
    }

    /// Whether a validate callback is configured.
    #[must_use]
    pub fn has_validate(&self) -> bool {
        self.validate.is_some()
    }

    fn resolve(&self, method: &str, passed: ArgValue) -> CallmapResult<ArgValue> {
        let value = match passed {
            Some(value) => Some(value),
            None if self.required => {
                return Err(CallmapError::missing_argument(method, &self.name));
            }
            None => self.default.clone(),
        };

        let value = match &self.parse {
            Some(parse) => {
                parse(value).map_err(|r| CallmapError::validation(method, &self.name, r))?
            }
            None => value,
        };

        if let Some(validate) = &self.validate {
            validate(value.as_ref())
                .map_err(|r| CallmapError::validation(method, &self.name, r))?;
        }

        Ok(value)
    }
}

impl std::fmt::Debug for CompiledArg {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CompiledArg")
            .field("name", &self.name)
            .field("param", &self.param)
            .field("required", &self.required)
            .field("default", &self.default)
            .field("parse", &self.parse.is_some())
            .field("validate", &self.validate.is_some())
            .finish()
    }
}

/// The compiled per-method binding plan.
#[derive(Debug, Clone)]
pub struct Matcher {
    method: Arc<str>,
    args: Vec<CompiledArg>,
    expected: Vec<String>,
}

impl Matcher {
    pub(crate) fn new(method: &str, args: Vec<CompiledArg>) -> Self {
        let expected = args.iter().map(|a| a.name.clone()).collect();
        Self {
            method: Arc::from(method),
            args,
            expected,
        }
    }

    /// Returns the method this matcher was compiled for.
    #[must_use]
    pub fn method(&self) -> &str {
        &self.method
    }

    /// Returns the compiled arguments in handler-parameter order.
    #[must_use]
    pub fn args(&self) -> &[CompiledArg] {
        &self.args
    }

    /// Returns the names callers may supply.
    #[must_use]
    pub fn expected_names(&self) -> &[String] {
        &self.expected
    }

    /// Binds a bag of named arguments into handler order.
    ///
    /// # Errors
    ///
    /// - [`CallmapError::UnexpectedArgument`] for the first supplied key that
    ///   is not declared, checked before anything else;
    /// - [`CallmapError::MissingArgument`] for an undefined required argument;
    /// - [`CallmapError::Validation`] when `parse` or `validate` rejects.
    pub fn bind(&self, mut bag: ArgBag) -> CallmapResult<Vec<ArgValue>> {
        let unknown = bag
            .keys()
            .find(|k| !self.expected.iter().any(|e| e.as_str() == *k));
        if let Some(unknown) = unknown {
            return Err(CallmapError::unexpected_argument(&*self.method, unknown));
        }

        self.args
            .iter()
            .map(|arg| arg.resolve(&self.method, bag.take(&arg.name)))
            .collect()
    }

    /// Binds `bag` and stores the result on `ctx`, keyed by handler parameter.
    ///
    /// # Errors
    ///
    /// Same as [`bind`](Self::bind). On error the context is left untouched.
    pub fn bind_into(&self, ctx: &mut CallContext, bag: ArgBag) -> CallmapResult<()> {
        let values = self.bind(bag)?;
        let bound = BoundArgs::from_ordered(self.args.iter().map(|a| a.param.clone()).zip(values));
        ctx.set_bound_args(bound);
        Ok(())
    }
}
