//! # Callmap Binder
//!
//! The argument binding and validation engine.
//!
//! At load time [`Binder::compile`] turns a [`MethodDefinition`] into a
//! [`CompiledMethod`], checking the declared arguments against the handler's
//! parameters. At call time its [`Matcher`] turns an unordered [`ArgBag`]
//! into the ordered, defaulted, parsed and validated argument vector.
//!
//! ```
//! use callmap_binder::{parse, Binder};
//! use callmap_core::{handler_fn, ArgBag, ArgSpec, ErrorKind, MethodSpec};
//! use serde_json::{json, Value};
//!
//! let add = handler_fn(["a", "b"], |_ctx, args| {
//!     Ok(json!(args.iter().flatten().filter_map(Value::as_i64).sum::<i64>()))
//! });
//! let spec = MethodSpec::new(add).args([
//!     ArgSpec::named("a").parse(parse::number),
//!     ArgSpec::named("b").parse(parse::number),
//! ]);
//! let compiled = Binder::new().compile("numbers.add", &spec.into()).unwrap();
//!
//! let bag = ArgBag::new().with("a", json!("1")).with("b", json!("2"));
//! assert_eq!(compiled.call(bag).unwrap(), json!(3));
//!
//! let err = compiled.call(ArgBag::new().with("a", json!("1"))).unwrap_err();
//! assert_eq!(err.kind(), ErrorKind::MissingArgument);
//! ```
//!
//! [`MethodDefinition`]: callmap_core::MethodDefinition
//! [`ArgBag`]: callmap_core::ArgBag

#![doc(html_root_url = "https://docs.rs/callmap-binder/0.1.0")]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

mod compile;
mod matcher;
pub mod naming;
mod normalize;
pub mod parse;

pub use compile::{Binder, CompiledMethod};
pub use matcher::{CompiledArg, Matcher};
pub use naming::{ArgNameMap, FnNameMap, Identity, NameMapRef, SnakeToCamel};
pub use normalize::{normalize, NormalizedMethod};
