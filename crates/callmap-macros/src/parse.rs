//! Parsing utilities for handler macros.
//!
//! This module provides parsing for handler attributes and function signatures.

use convert_case::{Case, Casing};
use syn::{
    ext::IdentExt,
    parse::{Parse, ParseStream},
    punctuated::Punctuated,
    spanned::Spanned,
    Expr, ExprLit, FnArg, Ident, ItemFn, Lit, Meta, Pat, PatIdent, PatType, Token, Type,
};

/// How captured parameter names are reported.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RenameRule {
    /// Names are reported as written.
    #[default]
    None,
    /// `snake_case` names are reported as `camelCase`.
    CamelCase,
}

impl RenameRule {
    /// Applies the rule to a parameter name.
    pub fn apply(self, name: &str) -> String {
        match self {
            Self::None => name.to_string(),
            Self::CamelCase => name.to_case(Case::Camel),
        }
    }
}

/// Parsed handler attributes.
#[derive(Debug, Default)]
pub struct HandlerAttrs {
    /// Rule applied to the reported parameter names.
    pub rename_all: RenameRule,
}

impl Parse for HandlerAttrs {
    fn parse(input: ParseStream) -> syn::Result<Self> {
        let mut attrs = Self::default();

        let meta_list: Punctuated<Meta, Token![,]> = Punctuated::parse_terminated(input)?;

        for meta in meta_list {
            match meta {
                Meta::NameValue(nv) => {
                    let ident = nv
                        .path
                        .get_ident()
                        .ok_or_else(|| syn::Error::new(nv.path.span(), "expected identifier"))?
                        .to_string();

                    let value = match &nv.value {
                        Expr::Lit(ExprLit {
                            lit: Lit::Str(s), ..
                        }) => s.value(),
                        _ => {
                            return Err(syn::Error::new(
                                nv.value.span(),
                                "expected string literal",
                            ))
                        }
                    };

                    match ident.as_str() {
                        "rename_all" => {
                            attrs.rename_all = match value.as_str() {
                                "camelCase" => RenameRule::CamelCase,
                                "snake_case" | "none" => RenameRule::None,
                                other => {
                                    return Err(syn::Error::new(
                                        nv.value.span(),
                                        format!(
                                            "unknown rename rule: {other} (expected \"camelCase\" or \"snake_case\")"
                                        ),
                                    ))
                                }
                            };
                        }
                        _ => {
                            return Err(syn::Error::new(
                                nv.path.span(),
                                format!("unknown attribute: {ident}"),
                            ))
                        }
                    }
                }
                _ => return Err(syn::Error::new(meta.span(), "expected name = value")),
            }
        }

        Ok(attrs)
    }
}

/// A parsed handler parameter.
#[derive(Debug)]
pub struct HandlerParam {
    /// The parameter name as written, without any `r#` prefix.
    pub name: String,
    /// The parameter type.
    pub ty: Type,
}

impl HandlerParam {
    /// Parses a function argument into a handler parameter.
    pub fn from_fn_arg(arg: &FnArg) -> syn::Result<Self> {
        match arg {
            FnArg::Typed(PatType { pat, ty, .. }) => Ok(Self {
                name: Self::extract_name(pat)?,
                ty: (**ty).clone(),
            }),
            FnArg::Receiver(_) => {
                Err(syn::Error::new(arg.span(), "handlers cannot have self parameter"))
            }
        }
    }

    /// Extracts the parameter name from a pattern.
    fn extract_name(pat: &Pat) -> syn::Result<String> {
        match pat {
            Pat::Ident(PatIdent {
                ident, subpat: None, ..
            }) => Ok(ident.unraw().to_string()),
            _ => Err(syn::Error::new(
                pat.span(),
                "handler parameters must be plain identifiers; their names become argument names",
            )),
        }
    }
}

/// Returns `true` if `ty` is `&CallContext` (by last path segment).
fn is_context_type(ty: &Type) -> bool {
    if let Type::Reference(reference) = ty {
        if reference.mutability.is_none() {
            if let Type::Path(type_path) = &*reference.elem {
                if let Some(segment) = type_path.path.segments.last() {
                    return segment.ident == "CallContext";
                }
            }
        }
    }
    false
}

/// Parsed handler function information.
#[derive(Debug)]
pub struct HandlerFn {
    /// The function name.
    pub name: Ident,
    /// Whether the first parameter receives the call context.
    pub takes_context: bool,
    /// The argument parameters, in declaration order.
    pub params: Vec<HandlerParam>,
    /// The original function item (for re-emission).
    pub item: ItemFn,
}

impl HandlerFn {
    /// Parses an `ItemFn` into a `HandlerFn`.
    pub fn parse(item: ItemFn) -> syn::Result<Self> {
        let sig = &item.sig;

        if let Some(asyncness) = &sig.asyncness {
            return Err(syn::Error::new(
                asyncness.span,
                "handlers must be synchronous functions",
            ));
        }
        if !sig.generics.params.is_empty() {
            return Err(syn::Error::new(
                sig.generics.span(),
                "handlers cannot be generic",
            ));
        }
        if let syn::ReturnType::Default = sig.output {
            return Err(syn::Error::new(
                sig.fn_token.span,
                "handlers must return a Result",
            ));
        }

        let mut inputs = sig.inputs.iter().peekable();
        let takes_context = match inputs.peek() {
            Some(FnArg::Typed(PatType { ty, .. })) => is_context_type(ty),
            _ => false,
        };
        if takes_context {
            inputs.next();
        }

        let params = inputs
            .map(|arg| {
                if let FnArg::Typed(PatType { ty, .. }) = arg {
                    if is_context_type(ty) {
                        return Err(syn::Error::new(
                            ty.span(),
                            "&CallContext must be the first parameter",
                        ));
                    }
                }
                HandlerParam::from_fn_arg(arg)
            })
            .collect::<syn::Result<Vec<_>>>()?;

        Ok(Self {
            name: sig.ident.clone(),
            takes_context,
            params,
            item,
        })
    }
}
