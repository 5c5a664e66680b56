//! Error types for callmap.
//!
//! This module provides the [`CallmapError`] type, the single error type
//! surfaced by loading an API map and by invoking its endpoints.
//!
//! # Load time vs call time
//!
//! Every variant belongs to exactly one phase, reported by
//! [`ErrorKind::is_load_time`]:
//!
//! | `ErrorKind` | Phase | Effect |
//! |---|---|---|
//! | `InvalidArgList` | load | aborts the whole API map load |
//! | `UnknownHandlerArgument` | load | aborts the whole API map load |
//! | `InvalidDefault` | load | aborts the whole API map load |
//! | `Structural` | load | aborts the whole API map load |
//! | `UnexpectedArgument` | call | rejects that call only |
//! | `MissingArgument` | call | rejects that call only |
//! | `ValidationError` | call | rejects that call only |
//! | `ArgumentsNotBound` | call | rejects that call only |
//! | `HandlerFailed` | call | rejects that call only |

use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

/// Result type alias using [`CallmapError`].
pub type CallmapResult<T> = Result<T, CallmapError>;

/// Categorical error kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    /// Declared argument list disagrees with the handler's parameters.
    InvalidArgList,
    /// A declared argument does not exist among the handler's parameters.
    UnknownHandlerArgument,
    /// A default value fails its own validator.
    InvalidDefault,
    /// The API map is not well-formed.
    Structural,
    /// The caller supplied a name outside the declared set.
    UnexpectedArgument,
    /// A required argument was absent or undefined.
    MissingArgument,
    /// A `parse` or `validate` callback rejected a value.
    ValidationError,
    /// `handle` was called on a context that was never validated.
    ArgumentsNotBound,
    /// The handler itself failed.
    HandlerFailed,
}

impl ErrorKind {
    /// Returns the machine-readable code for this kind.
    #[must_use]
    pub const fn code(&self) -> &'static str {
        match self {
            Self::InvalidArgList => "invalid_arg_list",
            Self::UnknownHandlerArgument => "unknown_handler_argument",
            Self::InvalidDefault => "invalid_default",
            Self::Structural => "structural",
            Self::UnexpectedArgument => "unexpected_argument",
            Self::MissingArgument => "missing_argument",
            Self::ValidationError => "validation_error",
            Self::ArgumentsNotBound => "arguments_not_bound",
            Self::HandlerFailed => "handler_failed",
        }
    }

    /// Returns `true` if errors of this kind abort loading the API map.
    #[must_use]
    pub const fn is_load_time(&self) -> bool {
        matches!(
            self,
            Self::InvalidArgList
                | Self::UnknownHandlerArgument
                | Self::InvalidDefault
                | Self::Structural
        )
    }
}

impl std::fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.code())
    }
}

/// A failure produced by a user-supplied `parse` or `validate` callback.
///
/// The rejection is carried through unchanged into
/// [`CallmapError::Validation`] and [`CallmapError::InvalidDefault`].
///
/// # Example
///
/// ```
/// use callmap_core::Rejection;
/// use serde_json::json;
///
/// let rejection = Rejection::new("negative_number").with_details(json!({ "min": 0 }));
/// assert_eq!(rejection.to_string(), "negative_number");
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Error)]
#[error("{message}")]
pub struct Rejection {
    /// Human-readable reason.
    pub message: String,
    /// Structured detail supplied by the callback.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<Value>,
}

impl Rejection {
    /// Creates a rejection with a message.
    #[must_use]
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            details: None,
        }
    }

    /// Attaches structured details.
    #[must_use]
    pub fn with_details(mut self, details: Value) -> Self {
        self.details = Some(details);
        self
    }
}

impl From<&str> for Rejection {
    fn from(message: &str) -> Self {
        Self::new(message)
    }
}

impl From<String> for Rejection {
    fn from(message: String) -> Self {
        Self::new(message)
    }
}

/// Standard error type for callmap.
///
/// # Example
///
/// ```
/// use callmap_core::{CallmapError, ErrorKind};
///
/// let error = CallmapError::missing_argument("numbers.add", "b");
/// assert_eq!(error.kind(), ErrorKind::MissingArgument);
/// assert!(!error.kind().is_load_time());
/// ```
#[derive(Error, Debug)]
pub enum CallmapError {
    /// Declared argument list disagrees with the handler's parameter list.
    #[error("invalid argument list for method '{method}': {reason}")]
    InvalidArgList {
        /// The method being compiled.
        method: String,
        /// What disagreed.
        reason: String,
    },

    /// A declared argument name maps to no handler parameter.
    #[error("method '{method}': no argument named '{name}' declared in handler")]
    UnknownHandlerArgument {
        /// The method being compiled.
        method: String,
        /// The handler-side name that was looked up.
        name: String,
    },

    /// A declared default fails the argument's own validator.
    #[error("method '{method}': default for argument '{name}' is invalid: {rejection}")]
    InvalidDefault {
        /// The method being compiled.
        method: String,
        /// The argument carrying the default.
        name: String,
        /// The offending default value.
        default: Value,
        /// The validator's rejection.
        #[source]
        rejection: Rejection,
    },

    /// The API map failed structural validation.
    #[error("API map is malformed: {0}")]
    Structural(#[source] StructuralErrors),

    /// The caller supplied an argument the method does not declare.
    #[error("method '{method}': unexpected argument '{name}'")]
    UnexpectedArgument {
        /// The method being called.
        method: String,
        /// The offending key.
        name: String,
    },

    /// A required argument was absent or undefined.
    #[error("method '{method}': missing required argument '{name}'")]
    MissingArgument {
        /// The method being called.
        method: String,
        /// The missing argument.
        name: String,
    },

    /// A `parse` or `validate` callback rejected a value.
    #[error("method '{method}': argument '{name}' rejected: {rejection}")]
    Validation {
        /// The method being called.
        method: String,
        /// The rejected argument.
        name: String,
        /// The callback's rejection, unchanged.
        #[source]
        rejection: Rejection,
    },

    /// `handle` was called before `validate` bound the arguments.
    #[error("method '{method}': arguments were not bound before handling")]
    ArgumentsNotBound {
        /// The method being called.
        method: String,
    },

    /// The handler returned an error.
    #[error("handler failed: {message}")]
    HandlerFailed {
        /// Human-readable error message.
        message: String,
        /// The underlying error.
        #[source]
        source: Option<anyhow::Error>,
    },
}

impl CallmapError {
    /// Creates an invalid argument list error.
    #[must_use]
    pub fn invalid_arg_list(method: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidArgList {
            method: method.into(),
            reason: reason.into(),
        }
    }

    /// Creates an unknown handler argument error.
    #[must_use]
    pub fn unknown_handler_argument(method: impl Into<String>, name: impl Into<String>) -> Self {
        Self::UnknownHandlerArgument {
            method: method.into(),
            name: name.into(),
        }
    }

    /// Creates an invalid default error.
    #[must_use]
    pub fn invalid_default(
        method: impl Into<String>,
        name: impl Into<String>,
        default: Value,
        rejection: Rejection,
    ) -> Self {
        Self::InvalidDefault {
            method: method.into(),
            name: name.into(),
            default,
            rejection,
        }
    }

    /// Creates an unexpected argument error.
    #[must_use]
    pub fn unexpected_argument(method: impl Into<String>, name: impl Into<String>) -> Self {
        Self::UnexpectedArgument {
            method: method.into(),
            name: name.into(),
        }
    }

    /// Creates a missing argument error.
    #[must_use]
    pub fn missing_argument(method: impl Into<String>, name: impl Into<String>) -> Self {
        Self::MissingArgument {
            method: method.into(),
            name: name.into(),
        }
    }

    /// Creates a validation error from a callback rejection.
    #[must_use]
    pub fn validation(
        method: impl Into<String>,
        name: impl Into<String>,
        rejection: impl Into<Rejection>,
    ) -> Self {
        Self::Validation {
            method: method.into(),
            name: name.into(),
            rejection: rejection.into(),
        }
    }

    /// Creates an error for a context whose arguments were never bound.
    #[must_use]
    pub fn arguments_not_bound(method: impl Into<String>) -> Self {
        Self::ArgumentsNotBound {
            method: method.into(),
        }
    }

    /// Creates a handler failure.
    #[must_use]
    pub fn handler(message: impl Into<String>) -> Self {
        Self::HandlerFailed {
            message: message.into(),
            source: None,
        }
    }

    /// Creates a handler failure wrapping a source error.
    pub fn handler_with_source(
        message: impl Into<String>,
        source: impl Into<anyhow::Error>,
    ) -> Self {
        Self::HandlerFailed {
            message: message.into(),
            source: Some(source.into()),
        }
    }

    /// Returns the error kind.
    #[must_use]
    pub const fn kind(&self) -> ErrorKind {
        match self {
            Self::InvalidArgList { .. } => ErrorKind::InvalidArgList,
            Self::UnknownHandlerArgument { .. } => ErrorKind::UnknownHandlerArgument,
            Self::InvalidDefault { .. } => ErrorKind::InvalidDefault,
            Self::Structural(_) => ErrorKind::Structural,
            Self::UnexpectedArgument { .. } => ErrorKind::UnexpectedArgument,
            Self::MissingArgument { .. } => ErrorKind::MissingArgument,
            Self::Validation { .. } => ErrorKind::ValidationError,
            Self::ArgumentsNotBound { .. } => ErrorKind::ArgumentsNotBound,
            Self::HandlerFailed { .. } => ErrorKind::HandlerFailed,
        }
    }

    /// Returns the machine-readable error code.
    #[must_use]
    pub const fn code(&self) -> &'static str {
        self.kind().code()
    }

    /// Returns the method this error concerns, if any.
    #[must_use]
    pub fn method(&self) -> Option<&str> {
        match self {
            Self::InvalidArgList { method, .. }
            | Self::UnknownHandlerArgument { method, .. }
            | Self::InvalidDefault { method, .. }
            | Self::UnexpectedArgument { method, .. }
            | Self::MissingArgument { method, .. }
            | Self::Validation { method, .. }
            | Self::ArgumentsNotBound { method } => Some(method),
            Self::Structural(_) | Self::HandlerFailed { .. } => None,
        }
    }

    /// Returns the offending argument name, if any.
    #[must_use]
    pub fn argument(&self) -> Option<&str> {
        match self {
            Self::UnknownHandlerArgument { name, .. }
            | Self::InvalidDefault { name, .. }
            | Self::UnexpectedArgument { name, .. }
            | Self::MissingArgument { name, .. }
            | Self::Validation { name, .. } => Some(name),
            _ => None,
        }
    }

    /// Returns the callback rejection, if this error carries one.
    #[must_use]
    pub fn rejection(&self) -> Option<&Rejection> {
        match self {
            Self::InvalidDefault { rejection, .. } | Self::Validation { rejection, .. } => {
                Some(rejection)
            }
            _ => None,
        }
    }

    /// Converts this error to a serializable error envelope.
    #[must_use]
    pub fn to_envelope(&self, call_id: Option<&str>) -> ErrorEnvelope {
        ErrorEnvelope {
            error: ErrorDetail {
                code: self.code().to_string(),
                message: self.to_string(),
                kind: self.kind(),
                details: self.error_details(),
            },
            call_id: call_id.map(ToString::to_string),
        }
    }

    fn error_details(&self) -> Option<Value> {
        match self {
            Self::InvalidArgList { method, reason } => Some(serde_json::json!({
                "method": method,
                "reason": reason,
            })),
            Self::UnknownHandlerArgument { method, name }
            | Self::UnexpectedArgument { method, name }
            | Self::MissingArgument { method, name } => Some(serde_json::json!({
                "method": method,
                "argument": name,
            })),
            Self::InvalidDefault {
                method,
                name,
                default,
                rejection,
            } => Some(serde_json::json!({
                "method": method,
                "argument": name,
                "default": default,
                "rejection": rejection,
            })),
            Self::Validation {
                method,
                name,
                rejection,
            } => Some(serde_json::json!({
                "method": method,
                "argument": name,
                "rejection": rejection,
            })),
            Self::Structural(errors) => serde_json::to_value(errors).ok(),
            Self::ArgumentsNotBound { method } => Some(serde_json::json!({ "method": method })),
            Self::HandlerFailed { .. } => None,
        }
    }
}

/// One structural problem found in an API map.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StructuralIssue {
    /// Dotted path to the offending element (e.g. `numbers.add.args[1].name`).
    pub path: String,
    /// What is wrong with it.
    pub message: String,
}

/// Aggregated structural validation errors.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StructuralErrors {
    /// Issues in discovery order.
    pub issues: Vec<StructuralIssue>,
}

impl std::fmt::Display for StructuralErrors {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} structural issue(s)", self.issues.len())?;
        if let Some(first) = self.issues.first() {
            write!(f, ", first at {}: {}", first.path, first.message)?;
        }
        Ok(())
    }
}

impl std::error::Error for StructuralErrors {}

impl StructuralErrors {
    /// Creates a new empty `StructuralErrors`.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Records an issue.
    pub fn add(&mut self, path: impl Into<String>, message: impl Into<String>) {
        self.issues.push(StructuralIssue {
            path: path.into(),
            message: message.into(),
        });
    }

    /// Returns `true` if no issue was recorded.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.issues.is_empty()
    }

    /// Returns the number of issues.
    #[must_use]
    pub fn len(&self) -> usize {
        self.issues.len()
    }

    /// Returns `Ok(())` when empty, otherwise a [`CallmapError::Structural`].
    pub fn into_result(self) -> CallmapResult<()> {
        if self.is_empty() {
            Ok(())
        } else {
            Err(CallmapError::Structural(self))
        }
    }
}

/// Serializable error envelope.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorEnvelope {
    /// The error details.
    pub error: ErrorDetail,
    /// The call ID for correlation.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub call_id: Option<String>,
}

/// Error detail within an envelope.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorDetail {
    /// Machine-readable error code.
    pub code: String,
    /// Human-readable error message.
    pub message: String,
    /// Error kind.
    pub kind: ErrorKind,
    /// Additional error details.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<Value>,
}
