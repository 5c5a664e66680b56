//! Load-time compilation of method definitions.
//!
//! [`Binder::compile`] reconciles a method's declared arguments with its
//! handler's parameter list and freezes the result into a [`Matcher`]. Every
//! schema/handler inconsistency is reported here, once, never per call.
//!
//! Two binding modes exist:
//!
//! - **Mapped** (the default, with [`SnakeToCamel`]): each declared name is
//!   translated with [`ArgNameMap::to_internal`] and must name a handler
//!   parameter. The plan is reordered into parameter order, so binding is
//!   by name and never by position. An unnamed entry takes the parameter at
//!   its own index.
//! - **Positional** (opt-in through [`Binder::positional`]): list entry *i*
//!   binds handler parameter *i*. A declared name only renames the key
//!   callers use.

use callmap_core::{
    ArgBag, ArgDecl, ArgSpec, ArgsDecl, CallContext, CallmapError, CallmapResult, HandlerRef,
    Metadata, MethodDefinition,
};
use indexmap::IndexMap;
use serde_json::Value;
use std::sync::Arc;
use tracing::debug;

use crate::matcher::{CompiledArg, Matcher};
use crate::naming::{ArgNameMap, NameMapRef, SnakeToCamel};
use crate::normalize::normalize;

/// Compiles method definitions into matchers.
///
/// # Example
///
/// ```
/// use callmap_binder::Binder;
/// use callmap_core::{handler_fn, ArgBag, ArgSpec, MethodSpec};
/// use serde_json::json;
///
/// let add = handler_fn(["a", "b"], |_ctx, args| {
///     let sum: i64 = args.iter().flatten().filter_map(|v| v.as_i64()).sum();
///     Ok(json!(sum))
/// });
/// let spec = MethodSpec::new(add).args([ArgSpec::named("a"), ArgSpec::named("b")]);
///
/// let compiled = Binder::new().compile("numbers.add", &spec.into()).unwrap();
/// let out = compiled.call(ArgBag::new().with("b", json!(2)).with("a", json!(1))).unwrap();
/// assert_eq!(out, json!(3));
/// ```
#[derive(Clone)]
pub struct Binder {
    name_map: Option<NameMapRef>,
}

impl Default for Binder {
    fn default() -> Self {
        Self::with_name_map(SnakeToCamel)
    }
}

impl Binder {
    /// Creates a binder that maps `snake_case` declarations onto
    /// `camelCase` handler parameters.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a binder that binds list entries by position.
    #[must_use]
    pub fn positional() -> Self {
        Self { name_map: None }
    }

    /// Creates a binder that maps declared names onto handler parameters.
    #[must_use]
    pub fn with_name_map(name_map: impl ArgNameMap) -> Self {
        Self::with_name_map_ref(Arc::new(name_map))
    }

    /// Like [`with_name_map`](Self::with_name_map), from a shared map.
    #[must_use]
    pub fn with_name_map_ref(name_map: NameMapRef) -> Self {
        Self {
            name_map: Some(name_map),
        }
    }

    /// Returns `true` unless the binder is positional.
    #[must_use]
    pub fn is_mapped(&self) -> bool {
        self.name_map.is_some()
    }

    /// Compiles one method.
    ///
    /// # Errors
    ///
    /// - [`CallmapError::InvalidArgList`] when a list declaration's length
    ///   differs from the handler's arity, or two declarations bind the same
    ///   parameter or share an external name;
    /// - [`CallmapError::UnknownHandlerArgument`] when a mapped name is not a
    ///   handler parameter;
    /// - [`CallmapError::InvalidDefault`] when a default fails its validator.
    pub fn compile(
        &self,
        method: &str,
        definition: &MethodDefinition,
    ) -> CallmapResult<CompiledMethod> {
        let normalized = normalize(definition);
        let params = normalized.handler.params();

        let args = match &normalized.args {
            None => params
                .iter()
                .map(|param| CompiledArg::from_spec(self.external(param), param, &ArgSpec::new()))
                .collect(),
            Some(ArgsDecl::List(list)) => self.compile_list(method, params, list)?,
            Some(ArgsDecl::Keyed(keyed)) => self.compile_keyed(method, params, keyed)?,
        };

        check_unique_names(method, &args)?;
        check_defaults(method, &args)?;

        debug!(
            method,
            params = params.len(),
            mapped = self.is_mapped(),
            "compiled method"
        );

        Ok(CompiledMethod {
            name: method.to_string(),
            handler: normalized.handler,
            metadata: normalized.metadata,
            matcher: Matcher::new(method, args),
        })
    }

    fn external(&self, param: &str) -> String {
        match &self.name_map {
            Some(map) => map.to_external(param),
            None => param.to_string(),
        }
    }

    fn compile_list(
        &self,
        method: &str,
        params: &[String],
        list: &[ArgDecl],
    ) -> CallmapResult<Vec<CompiledArg>> {
        if list.len() != params.len() {
            return Err(CallmapError::invalid_arg_list(
                method,
                format!(
                    "{} argument(s) declared but handler takes {}",
                    list.len(),
                    params.len()
                ),
            ));
        }

        let Some(map) = &self.name_map else {
            return Ok(list
                .iter()
                .zip(params)
                .map(|(decl, param)| {
                    let name = decl.name().unwrap_or(param).to_string();
                    CompiledArg::from_decl(name, param, decl)
                })
                .collect());
        };

        let mut slots: Vec<Option<CompiledArg>> = vec![None; params.len()];
        for (decl, positional) in list.iter().zip(params) {
            let (name, param) = match decl.name() {
                Some(name) => (name.to_string(), map.to_internal(name)),
                None => (map.to_external(positional), positional.clone()),
            };
            let compiled = CompiledArg::from_decl(name, &param, decl);
            place(method, params, &mut slots, param, compiled)?;
        }

        Ok(slots.into_iter().flatten().collect())
    }

    fn compile_keyed(
        &self,
        method: &str,
        params: &[String],
        keyed: &IndexMap<String, ArgSpec>,
    ) -> CallmapResult<Vec<CompiledArg>> {
        let mut slots: Vec<Option<CompiledArg>> = vec![None; params.len()];
        for (name, spec) in keyed {
            let param = match &self.name_map {
                Some(map) => map.to_internal(name),
                None => name.clone(),
            };
            let compiled = CompiledArg::from_spec(name.clone(), &param, spec);
            place(method, params, &mut slots, param, compiled)?;
        }

        Ok(slots
            .into_iter()
            .zip(params)
            .map(|(slot, param)| {
                slot.unwrap_or_else(|| {
                    CompiledArg::from_spec(self.external(param), param, &ArgSpec::new())
                })
            })
            .collect())
    }
}

impl std::fmt::Debug for Binder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Binder")
            .field("mapped", &self.is_mapped())
            .finish()
    }
}

/// Puts `compiled` in the slot of handler parameter `param`.
fn place(
    method: &str,
    params: &[String],
    slots: &mut [Option<CompiledArg>],
    param: String,
    compiled: CompiledArg,
) -> CallmapResult<()> {
    let Some(index) = params.iter().position(|p| *p == param) else {
        return Err(CallmapError::unknown_handler_argument(method, param));
    };
    if slots[index].is_some() {
        return Err(CallmapError::invalid_arg_list(
            method,
            format!("handler parameter '{param}' is bound more than once"),
        ));
    }
    slots[index] = Some(compiled);
    Ok(())
}

fn check_unique_names(method: &str, args: &[CompiledArg]) -> CallmapResult<()> {
    for (i, arg) in args.iter().enumerate() {
        if args[..i].iter().any(|earlier| earlier.name == arg.name) {
            return Err(CallmapError::invalid_arg_list(
                method,
                format!("argument name '{}' is declared more than once", arg.name),
            ));
        }
    }
    Ok(())
}

fn check_defaults(method: &str, args: &[CompiledArg]) -> CallmapResult<()> {
    for arg in args {
        if let (Some(default), Some(validate)) = (&arg.default, &arg.validate) {
            if let Err(rejection) = validate(Some(default)) {
                return Err(CallmapError::invalid_default(
                    method,
                    &arg.name,
                    default.clone(),
                    rejection,
                ));
            }
        }
    }
    Ok(())
}

impl CompiledArg {
    fn from_decl(name: String, param: &str, decl: &ArgDecl) -> Self {
        match decl {
            ArgDecl::Name(_) => Self::from_spec(name, param, &ArgSpec::new()),
            ArgDecl::Spec(spec) => Self::from_spec(name, param, spec),
        }
    }

    fn from_spec(name: String, param: &str, spec: &ArgSpec) -> Self {
        Self {
            name,
            param: param.to_string(),
            required: spec.is_required(),
            default: spec.default.clone(),
            parse: spec.parse.clone(),
            validate: spec.validate.clone(),
        }
    }
}

/// A compiled method: handler, metadata and the matcher that feeds it.
#[derive(Debug, Clone)]
pub struct CompiledMethod {
    name: String,
    handler: HandlerRef,
    metadata: Metadata,
    matcher: Matcher,
}

impl CompiledMethod {
    /// Returns the method name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the handler.
    #[must_use]
    pub fn handler(&self) -> &HandlerRef {
        &self.handler
    }

    /// Returns the metadata, unchanged from the definition.
    #[must_use]
    pub fn metadata(&self) -> &Metadata {
        &self.metadata
    }

    /// Returns the matcher.
    #[must_use]
    pub fn matcher(&self) -> &Matcher {
        &self.matcher
    }

    /// Binds `bag` and invokes the handler with a fresh context.
    ///
    /// # Errors
    ///
    /// Any binding error from [`Matcher::bind`], or the handler's own error.
    pub fn call(&self, bag: ArgBag) -> CallmapResult<Value> {
        let ctx = CallContext::new(self.name.as_str());
        let args = self.matcher.bind(bag)?;
        self.handler.call(&ctx, args)
    }

    /// Splits into handler, metadata and matcher.
    #[must_use]
    pub fn into_parts(self) -> (HandlerRef, Metadata, Matcher) {
        (self.handler, self.metadata, self.matcher)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::naming::SnakeToCamel;
    use callmap_core::{handler_fn, ErrorKind, MethodSpec, Rejection};
    use serde_json::json;

    fn echo(params: &[&str]) -> HandlerRef {
        handler_fn(params.iter().copied(), |_ctx, args| {
            Ok(Value::Array(
                args.into_iter()
                    .map(|a| a.unwrap_or_else(|| json!("<undefined>")))
                    .collect(),
            ))
        })
    }

    fn names(compiled: &CompiledMethod) -> Vec<&str> {
        compiled.matcher().args().iter().map(CompiledArg::name).collect()
    }

    #[test]
    fn test_no_args_uses_handler_params() {
        let compiled = Binder::new()
            .compile("m", &MethodDefinition::from(echo(&["a", "b"])))
            .unwrap();

        assert_eq!(names(&compiled), vec!["a", "b"]);
        assert!(compiled.matcher().args().iter().all(CompiledArg::is_required));
    }

    #[test]
    fn test_arity_mismatch() {
        let short = MethodSpec::new(echo(&["a", "b", "c"])).args(["a", "b"]);
        let err = Binder::new().compile("m", &short.into()).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidArgList);

        let long = MethodSpec::new(echo(&[])).args(["a"]);
        let err = Binder::new().compile("m", &long.into()).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidArgList);
    }

    #[test]
    fn test_positional_renames() {
        let spec = MethodSpec::new(echo(&["a", "b", "c"])).args([
            ArgDecl::from(ArgSpec::named("y")),
            ArgDecl::from("x"),
            ArgDecl::from(ArgSpec::new()),
        ]);
        let compiled = Binder::positional().compile("m", &spec.into()).unwrap();

        assert_eq!(names(&compiled), vec!["y", "x", "c"]);
        let out = compiled
            .call(
                ArgBag::new()
                    .with("c", json!("3"))
                    .with("x", json!("2"))
                    .with("y", json!("1")),
            )
            .unwrap();
        assert_eq!(out, json!(["1", "2", "3"]));
    }

    #[test]
    fn test_inferred_name_colliding_with_declared_name() {
        let spec =
            MethodSpec::new(echo(&["a", "b"])).args([ArgDecl::from("b"), ArgSpec::new().into()]);
        let err = Binder::new().compile("m", &spec.into()).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidArgList);
    }

    #[test]
    fn test_mapped_reorders_into_handler_order() {
        let spec = MethodSpec::new(echo(&["userId", "pageSize"]))
            .args([ArgSpec::named("page_size"), ArgSpec::named("user_id")]);
        let compiled = Binder::with_name_map(SnakeToCamel)
            .compile("m", &spec.into())
            .unwrap();

        let params: Vec<_> = compiled.matcher().args().iter().map(CompiledArg::param).collect();
        assert_eq!(params, vec!["userId", "pageSize"]);
        assert_eq!(names(&compiled), vec!["user_id", "page_size"]);

        let out = compiled
            .call(ArgBag::new().with("page_size", json!(10)).with("user_id", json!(7)))
            .unwrap();
        assert_eq!(out, json!([7, 10]));
    }

    #[test]
    fn test_default_binder_binds_by_name() {
        let spec = MethodSpec::new(echo(&["userId", "pageSize"]))
            .args([ArgSpec::named("page_size"), ArgSpec::named("user_id")]);
        let compiled = Binder::default().compile("m", &spec.into()).unwrap();

        assert!(Binder::default().is_mapped());
        let out = compiled
            .call(ArgBag::new().with("user_id", json!(7)).with("page_size", json!(10)))
            .unwrap();
        assert_eq!(out, json!([7, 10]));
    }

    #[test]
    fn test_default_binder_rejects_unmatched_name() {
        let spec = MethodSpec::new(echo(&["a", "b", "c"])).args(["x", "y", "z"]);
        let err = Binder::new().compile("m", &spec.into()).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::UnknownHandlerArgument);
        assert_eq!(err.argument(), Some("x"));
    }

    #[test]
    fn test_positional_binder_is_not_mapped() {
        assert!(!Binder::positional().is_mapped());
        let debug = format!("{:?}", Binder::positional());
        assert!(debug.contains("mapped: false"));
    }

    #[test]
    fn test_mapped_unknown_handler_argument() {
        let spec = MethodSpec::new(echo(&["userId"])).args(["account_id"]);
        let err = Binder::with_name_map(SnakeToCamel)
            .compile("m", &spec.into())
            .unwrap_err();

        assert_eq!(err.kind(), ErrorKind::UnknownHandlerArgument);
        assert_eq!(err.argument(), Some("accountId"));
        assert!(err.to_string().contains("no argument named 'accountId' declared in handler"));
    }

    #[test]
    fn test_mapped_duplicate_binding() {
        let spec = MethodSpec::new(echo(&["userId", "other"])).args(["user_id", "userId"]);
        let err = Binder::with_name_map(SnakeToCamel)
            .compile("m", &spec.into())
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidArgList);
    }

    #[test]
    fn test_mapped_without_args_exposes_external_names() {
        let compiled = Binder::with_name_map(SnakeToCamel)
            .compile("m", &MethodDefinition::from(echo(&["userId"])))
            .unwrap();
        assert_eq!(names(&compiled), vec!["user_id"]);
    }

    #[test]
    fn test_keyed_form() {
        let spec = MethodSpec::new(echo(&["a", "b"]))
            .keyed_args([("b", ArgSpec::new().optional().default_value(json!(5)))]);
        let compiled = Binder::new().compile("m", &spec.into()).unwrap();

        assert_eq!(names(&compiled), vec!["a", "b"]);
        assert!(compiled.matcher().args()[0].is_required());
        let out = compiled.call(ArgBag::new().with("a", json!(1))).unwrap();
        assert_eq!(out, json!([1, 5]));
    }

    #[test]
    fn test_keyed_form_rejects_unknown_key() {
        let spec = MethodSpec::new(echo(&["a"])).keyed_args([("z", ArgSpec::new())]);
        let err = Binder::new().compile("m", &spec.into()).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::UnknownHandlerArgument);
    }

    #[test]
    fn test_invalid_default() {
        let spec = MethodSpec::new(echo(&["limit"])).args([ArgSpec::named("limit")
            .optional()
            .default_value(json!(-1))
            .validate(|v| match v.and_then(Value::as_i64) {
                Some(n) if n >= 0 => Ok(()),
                _ => Err(Rejection::new("negative_number")),
            })]);
        let err = Binder::new().compile("m", &spec.into()).unwrap_err();

        assert_eq!(err.kind(), ErrorKind::InvalidDefault);
        assert_eq!(err.argument(), Some("limit"));
        match err {
            CallmapError::InvalidDefault { default, .. } => assert_eq!(default, json!(-1)),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_valid_default_is_checked_without_parse() {
        let spec = MethodSpec::new(echo(&["n"])).args([ArgSpec::named("n")
            .optional()
            .default_value(json!(2))
            .parse(|_| Err(Rejection::new("parse should not run at load time")))
            .validate(|v| {
                if v == Some(&json!(2)) {
                    Ok(())
                } else {
                    Err(Rejection::new("bad"))
                }
            })]);
        assert!(Binder::new().compile("m", &spec.into()).is_ok());
    }

    #[test]
    fn test_call_propagates_handler_error() {
        let failing = handler_fn(["a"], |_ctx, _args| Err(CallmapError::handler("boom")));
        let compiled = Binder::new()
            .compile("m", &MethodDefinition::from(failing))
            .unwrap();

        let err = compiled.call(ArgBag::new().with("a", json!(1))).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::HandlerFailed);
    }
}
