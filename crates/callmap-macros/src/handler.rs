//! Handler macro implementation.
//!
//! This module contains the core logic for expanding `#[handler]` attributes.

use proc_macro2::TokenStream;
use quote::{format_ident, quote};
use syn::ItemFn;

use crate::parse::{HandlerAttrs, HandlerFn};

/// Expands the `#[handler]` attribute macro.
///
/// 1. Parse the attributes and function
/// 2. Re-emit the function unchanged
/// 3. Generate a `Handler` implementation that converts each bound
///    argument to its parameter type
/// 4. Generate the `<name>_handler()` constructor
pub fn expand_handler(attr: TokenStream, item: TokenStream) -> syn::Result<TokenStream> {
    let attrs: HandlerAttrs = syn::parse2(attr)?;

    let item_fn: ItemFn = syn::parse2(item)?;
    let handler = HandlerFn::parse(item_fn)?;

    Ok(generate_handler_code(&attrs, &handler))
}

fn generate_handler_code(attrs: &HandlerAttrs, handler: &HandlerFn) -> TokenStream {
    let fn_name = &handler.name;
    let vis = &handler.item.vis;
    let original_fn = &handler.item;

    let handler_struct = format_ident!("__CallmapHandler_{}", fn_name);
    let constructor = format_ident!("{}_handler", fn_name);

    let names: Vec<String> = handler
        .params
        .iter()
        .map(|p| attrs.rename_all.apply(&p.name))
        .collect();

    let locals: Vec<_> = (0..handler.params.len())
        .map(|i| format_ident!("__arg_{}", i))
        .collect();

    let conversions = handler
        .params
        .iter()
        .zip(&names)
        .zip(&locals)
        .map(|((param, name), local)| {
            let ty = &param.ty;
            quote! {
                let #local: #ty =
                    ::callmap_core::from_arg(ctx.method(), #name, args.next().flatten())?;
            }
        });

    let context_arg = handler.takes_context.then(|| quote! { ctx, });
    let doc = format!("Returns `{fn_name}` as a callmap handler.");

    quote! {
        #original_fn

        #[doc(hidden)]
        #[allow(non_camel_case_types)]
        #vis struct #handler_struct {
            params: ::std::vec::Vec<::std::string::String>,
        }

        impl ::callmap_core::Handler for #handler_struct {
            fn params(&self) -> &[::std::string::String] {
                &self.params
            }

            #[allow(unused_mut, unused_variables)]
            fn call(
                &self,
                ctx: &::callmap_core::CallContext,
                args: ::std::vec::Vec<::callmap_core::ArgValue>,
            ) -> ::callmap_core::CallmapResult<::callmap_core::__private::Value> {
                let mut args = args.into_iter();
                #(#conversions)*
                ::callmap_core::IntoOutcome::into_outcome(#fn_name(#context_arg #(#locals),*))
            }
        }

        #[doc = #doc]
        #vis fn #constructor() -> ::callmap_core::HandlerRef {
            ::std::sync::Arc::new(#handler_struct {
                params: ::std::vec![#(::std::string::String::from(#names)),*],
            })
        }
    }
}
