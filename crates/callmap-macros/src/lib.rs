//! Procedural macros for callmap handlers.
//!
//! The binder needs each handler's ordered parameter names. Plain closures
//! have to list them by hand; the `#[handler]` attribute reads them from the
//! function signature at build time instead.
//!
//! # Example
//!
//! ```rust,ignore
//! use callmap_core::{CallContext, CallmapError};
//! use callmap_macros::handler;
//!
//! #[handler]
//! fn add(a: f64, b: f64) -> Result<f64, CallmapError> {
//!     Ok(a + b)
//! }
//!
//! let add = add_handler();
//! assert_eq!(add.params(), ["a", "b"]);
//! ```

mod handler;
mod parse;

use proc_macro::TokenStream;

/// Turns a synchronous function into a callmap handler.
///
/// The function is kept as written. Next to it the macro generates
/// `<name>_handler() -> HandlerRef`, whose `params()` are the function's
/// parameter names in declaration order.
///
/// Each bound argument is converted to its parameter type with
/// `callmap_core::from_arg`; an undefined argument reads as JSON `null`, so
/// `Option<T>` parameters receive `None`. A first parameter of type
/// `&CallContext` receives the call context and is not an argument.
///
/// The return type must be `Result<T, E>` with `T: Serialize` and
/// `E: Into<anyhow::Error>`.
///
/// # Attributes
///
/// - `rename_all = "camelCase"`: report `snake_case` parameter names in
///   `camelCase`, for use with a snake-to-camel name map
///
/// # Example
///
/// ```rust,ignore
/// #[handler(rename_all = "camelCase")]
/// fn get_user(ctx: &CallContext, user_id: u64) -> Result<User, AppError> {
///     // params() == ["userId"]
/// }
/// ```
#[proc_macro_attribute]
pub fn handler(attr: TokenStream, item: TokenStream) -> TokenStream {
    handler::expand_handler(attr.into(), item.into())
        .unwrap_or_else(|e| e.to_compile_error())
        .into()
}
