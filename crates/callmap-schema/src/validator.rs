//! Structural validation of API maps.
//!
//! The validator checks shape only: identifier syntax and name uniqueness.
//! It never looks at argument values or calls user callbacks; reconciling
//! declarations with handlers is the binder's job.

use callmap_core::{ApiMap, ArgDecl, ArgsDecl, CallmapResult, MethodDefinition, StructuralErrors};
use regex::Regex;
use tracing::{debug, warn};

/// Pattern every method name must match.
pub const METHOD_NAME_PATTERN: &str = r"^[a-z][a-zA-Z0-9.]*$";

/// Pattern every declared argument name and handler parameter must match.
pub const ARG_NAME_PATTERN: &str = r"^[a-zA-Z_$][a-zA-Z0-9_$]*$";

/// Checks the shape of an [`ApiMap`] before any method is compiled.
///
/// Build one and pass it to the loader; it holds compiled patterns and can
/// be shared freely.
///
/// # Example
///
/// ```
/// use callmap_core::{handler_fn, ApiMap};
/// use callmap_schema::StructuralValidator;
/// use serde_json::Value;
///
/// let validator = StructuralValidator::new();
/// let api = ApiMap::new().with("Bad-Name", handler_fn(["a"], |_, _| Ok(Value::Null)));
///
/// let issues = validator.check(&api);
/// assert_eq!(issues.len(), 1);
/// assert_eq!(issues.issues[0].path, "Bad-Name");
/// ```
#[derive(Debug, Clone)]
pub struct StructuralValidator {
    method_name: Regex,
    arg_name: Regex,
}

impl Default for StructuralValidator {
    fn default() -> Self {
        Self::new()
    }
}

impl StructuralValidator {
    /// Creates a validator with the standard identifier patterns.
    #[must_use]
    pub fn new() -> Self {
        Self {
            method_name: Regex::new(METHOD_NAME_PATTERN).expect("valid regex"),
            arg_name: Regex::new(ARG_NAME_PATTERN).expect("valid regex"),
        }
    }

    /// Returns `true` if `name` is a valid method name.
    #[must_use]
    pub fn is_valid_method_name(&self, name: &str) -> bool {
        self.method_name.is_match(name)
    }

    /// Returns `true` if `name` is a valid argument name.
    #[must_use]
    pub fn is_valid_arg_name(&self, name: &str) -> bool {
        self.arg_name.is_match(name)
    }

    /// Validates `api`, handing it back unchanged when well-formed.
    ///
    /// # Errors
    ///
    /// Returns [`CallmapError::Structural`] aggregating every issue found.
    ///
    /// [`CallmapError::Structural`]: callmap_core::CallmapError::Structural
    pub fn validate<'a>(&self, api: &'a ApiMap) -> CallmapResult<&'a ApiMap> {
        let issues = self.check(api);
        if issues.is_empty() {
            debug!(methods = api.len(), "API map is well-formed");
        } else {
            warn!(issues = issues.len(), "API map is malformed");
        }
        issues.into_result().map(|()| api)
    }

    /// Collects every structural issue in `api`.
    #[must_use]
    pub fn check(&self, api: &ApiMap) -> StructuralErrors {
        let mut issues = StructuralErrors::new();
        for (name, method) in api.iter() {
            if !self.is_valid_method_name(name) {
                issues.add(
                    name,
                    format!("method name must match {METHOD_NAME_PATTERN}"),
                );
            }
            self.check_method(name, method, &mut issues);
        }
        issues
    }

    fn check_method(&self, name: &str, method: &MethodDefinition, issues: &mut StructuralErrors) {
        let params = method.handler().params();
        for (i, param) in params.iter().enumerate() {
            let path = format!("{name}.handler.params[{i}]");
            self.check_identifier(&path, param, issues);
            if params[..i].contains(param) {
                issues.add(path, format!("duplicate handler parameter '{param}'"));
            }
        }

        match method.args() {
            None => {}
            Some(ArgsDecl::List(list)) => {
                let mut seen: Vec<&str> = Vec::with_capacity(list.len());
                for (i, decl) in list.iter().enumerate() {
                    let Some(arg) = decl.name() else { continue };
                    let path = match decl {
                        ArgDecl::Name(_) => format!("{name}.args[{i}]"),
                        ArgDecl::Spec(_) => format!("{name}.args[{i}].name"),
                    };
                    self.check_identifier(&path, arg, issues);
                    if seen.contains(&arg) {
                        issues.add(path, format!("duplicate argument name '{arg}'"));
                    }
                    seen.push(arg);
                }
            }
            Some(ArgsDecl::Keyed(keyed)) => {
                for key in keyed.keys() {
                    self.check_identifier(&format!("{name}.args.{key}"), key, issues);
                }
            }
        }

        if let MethodDefinition::Full(spec) = method {
            for (i, middleware) in spec.metadata.middleware.iter().enumerate() {
                if middleware.name().trim().is_empty() {
                    issues.add(
                        format!("{name}.metadata.middleware[{i}]"),
                        "middleware name must not be empty",
                    );
                }
            }
        }
    }

    fn check_identifier(&self, path: &str, value: &str, issues: &mut StructuralErrors) {
        if !self.is_valid_arg_name(value) {
            issues.add(path, format!("'{value}' must match {ARG_NAME_PATTERN}"));
        }
    }
}
