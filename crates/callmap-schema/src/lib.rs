//! # Callmap Schema
//!
//! Structural validation for callmap API maps.
//!
//! A [`StructuralValidator`] is constructed explicitly and handed to the
//! loader. It rejects a malformed map with one aggregated
//! [`StructuralErrors`](callmap_core::StructuralErrors) before any method is
//! compiled.

#![doc(html_root_url = "https://docs.rs/callmap-schema/0.1.0")]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

mod validator;

pub use validator::{StructuralValidator, ARG_NAME_PATTERN, METHOD_NAME_PATTERN};
