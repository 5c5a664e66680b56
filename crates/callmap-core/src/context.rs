//! Per-call context.
//!
//! The [`CallContext`] is created once per invocation. It is the receiver the
//! handler runs against, and it is where the two-phase `validate`/`handle`
//! split parks the bound arguments in between.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::time::Instant;
use uuid::Uuid;

use crate::value::ArgValue;

/// A unique identifier for each call, using UUID v7.
///
/// UUID v7 is time-ordered, which makes it suitable for log correlation.
///
/// # Example
///
/// ```
/// use callmap_core::CallId;
///
/// let id = CallId::new();
/// println!("Call ID: {}", id);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CallId(Uuid);

impl CallId {
    /// Creates a new unique call ID using UUID v7.
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::now_v7())
    }

    /// Creates a `CallId` from an existing UUID.
    #[must_use]
    pub const fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }

    /// Returns the underlying UUID.
    #[must_use]
    pub const fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl Default for CallId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for CallId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<Uuid> for CallId {
    fn from(uuid: Uuid) -> Self {
        Self(uuid)
    }
}

/// Arguments bound by `validate`, in handler-parameter order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BoundArgs {
    values: IndexMap<String, ArgValue>,
}

impl BoundArgs {
    /// Builds bound arguments from `(name, value)` pairs in handler order.
    pub fn from_ordered(pairs: impl IntoIterator<Item = (String, ArgValue)>) -> Self {
        Self {
            values: pairs.into_iter().collect(),
        }
    }

    /// Returns the argument names in handler order.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.values.keys().map(String::as_str)
    }

    /// Returns the value bound to `name`; `None` if the name is not bound.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&ArgValue> {
        self.values.get(name)
    }

    /// Returns the ordered argument vector.
    #[must_use]
    pub fn to_ordered(&self) -> Vec<ArgValue> {
        self.values.values().cloned().collect()
    }

    /// Returns the number of bound arguments.
    #[must_use]
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Returns `true` if no arguments are bound.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

/// Per-call context passed to handlers and middleware.
///
/// # Example
///
/// ```
/// use callmap_core::CallContext;
///
/// let ctx = CallContext::new("numbers.add");
/// assert_eq!(ctx.method(), "numbers.add");
/// assert!(ctx.bound_args().is_none());
/// ```
#[derive(Debug, Clone)]
pub struct CallContext {
    call_id: CallId,
    method: String,
    bound: Option<BoundArgs>,
    /// Free-form values middleware may attach for later stages.
    extensions: IndexMap<String, Value>,
    started_at: Instant,
}

impl CallContext {
    /// Creates a context for one call of `method`.
    #[must_use]
    pub fn new(method: impl Into<String>) -> Self {
        Self::with_call_id(method, CallId::new())
    }

    /// Creates a context with the specified call ID.
    #[must_use]
    pub fn with_call_id(method: impl Into<String>, call_id: CallId) -> Self {
        Self {
            call_id,
            method: method.into(),
            bound: None,
            extensions: IndexMap::new(),
            started_at: Instant::now(),
        }
    }

    /// Creates a mock context for testing purposes.
    #[must_use]
    pub fn mock() -> Self {
        Self::new("mock")
    }

    /// Returns the call ID.
    #[must_use]
    pub const fn call_id(&self) -> CallId {
        self.call_id
    }

    /// Returns the name of the method being called.
    #[must_use]
    pub fn method(&self) -> &str {
        &self.method
    }

    /// Returns the bound arguments, if `validate` has run.
    #[must_use]
    pub fn bound_args(&self) -> Option<&BoundArgs> {
        self.bound.as_ref()
    }

    /// Stores the bound arguments, replacing any previous binding.
    pub fn set_bound_args(&mut self, bound: BoundArgs) {
        self.bound = Some(bound);
    }

    /// Returns an extension value.
    #[must_use]
    pub fn extension(&self, key: &str) -> Option<&Value> {
        self.extensions.get(key)
    }

    /// Sets an extension value.
    pub fn set_extension(&mut self, key: impl Into<String>, value: Value) {
        self.extensions.insert(key.into(), value);
    }

    /// Returns the elapsed time since the call started.
    #[must_use]
    pub fn elapsed(&self) -> std::time::Duration {
        self.started_at.elapsed()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_call_id_new_generates_unique_ids() {
        let id1 = CallId::new();
        let id2 = CallId::new();
        assert_ne!(id1, id2, "Each CallId should be unique");
    }

    #[test]
    fn test_call_id_display() {
        let display = CallId::new().to_string();
        assert_eq!(display.len(), 36, "UUID string should be 36 characters");
    }

    #[test]
    fn test_call_id_serialization() {
        let id = CallId::new();
        let json = serde_json::to_string(&id).expect("serialization should work");
        let parsed: CallId = serde_json::from_str(&json).expect("deserialization should work");
        assert_eq!(id, parsed);
    }

    #[test]
    fn test_bound_args_keep_handler_order() {
        let bound = BoundArgs::from_ordered(vec![
            ("b".to_string(), Some(json!(2))),
            ("a".to_string(), None),
        ]);

        assert_eq!(bound.keys().collect::<Vec<_>>(), vec!["b", "a"]);
        assert_eq!(bound.to_ordered(), vec![Some(json!(2)), None]);
        assert_eq!(bound.get("a"), Some(&None));
        assert_eq!(bound.get("c"), None);
    }

    #[test]
    fn test_context_binding_and_extensions() {
        let mut ctx = CallContext::new("users.get");
        assert!(ctx.bound_args().is_none());

        ctx.set_bound_args(BoundArgs::from_ordered(vec![(
            "id".to_string(),
            Some(json!(7)),
        )]));
        ctx.set_extension("tenant", json!("acme"));

        assert_eq!(ctx.bound_args().map(BoundArgs::len), Some(1));
        assert_eq!(ctx.extension("tenant"), Some(&json!("acme")));
    }
}
