//! Method schema normalization.

use callmap_core::{ArgsDecl, HandlerRef, Metadata, MethodDefinition};

/// A method definition in canonical `{handler, args, metadata}` form.
#[derive(Debug, Clone)]
pub struct NormalizedMethod {
    /// The callable.
    pub handler: HandlerRef,
    /// Argument declaration; `None` when the definition declared none.
    pub args: Option<ArgsDecl>,
    /// Metadata, defaulted for bare handlers.
    pub metadata: Metadata,
}

/// Expands a bare handler into the canonical shape. Never fails.
#[must_use]
pub fn normalize(method: &MethodDefinition) -> NormalizedMethod {
    match method {
        MethodDefinition::Bare(handler) => NormalizedMethod {
            handler: handler.clone(),
            args: None,
            metadata: Metadata::default(),
        },
        MethodDefinition::Full(spec) => NormalizedMethod {
            handler: spec.handler.clone(),
            args: spec.args.clone(),
            metadata: spec.metadata.clone(),
        },
    }
}
