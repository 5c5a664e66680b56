//! # Callmap Core
//!
//! Core types and traits for callmap.
//!
//! This crate provides the vocabulary shared by the binder, the loader and
//! user code:
//!
//! - [`ApiMap`], [`MethodDefinition`], [`MethodSpec`] - Declarative method definitions
//! - [`ArgSpec`], [`ArgDecl`], [`ArgsDecl`] - Argument declarations
//! - [`Handler`] - Callable with an ordered parameter list
//! - [`CallContext`], [`CallId`] - Per-call context
//! - [`ArgBag`], [`ArgValue`] - Named arguments as supplied by a caller
//! - [`CallmapError`] - Standard error type

#![doc(html_root_url = "https://docs.rs/callmap-core/0.1.0")]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

mod context;
mod error;
mod handler;
mod metadata;
mod method;
mod value;

pub use context::{BoundArgs, CallContext, CallId};
pub use error::{
    CallmapError, CallmapResult, ErrorDetail, ErrorEnvelope, ErrorKind, Rejection,
    StructuralErrors, StructuralIssue,
};
pub use handler::{from_arg, handler_fn, FnHandler, Handler, HandlerRef, IntoOutcome};
pub use metadata::{FnMiddleware, Metadata, Middleware, Next};
pub use method::{
    ApiMap, ArgDecl, ArgSpec, ArgsDecl, MethodDefinition, MethodSpec, ParseFn, ValidateFn,
};
pub use value::{ArgBag, ArgValue};

#[doc(hidden)]
pub mod __private {
    pub use serde_json::Value;
}
