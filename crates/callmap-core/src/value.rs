//! Argument values and named-argument bags.
//!
//! An argument is either *undefined* or a JSON value. `null`, `false`, `0`
//! and `""` are all supplied values; only undefined triggers default
//! substitution or a missing-argument error.

use indexmap::IndexMap;
use serde_json::{Map, Value};

/// A single argument: `None` is undefined, `Some(v)` is a supplied value.
pub type ArgValue = Option<Value>;

/// An unordered bag of named arguments for one call.
///
/// Keys are kept in insertion order. A key may be present with an undefined
/// value; it still counts as a supplied key when unknown keys are rejected.
///
/// # Example
///
/// ```
/// use callmap_core::ArgBag;
/// use serde_json::json;
///
/// let bag = ArgBag::new()
///     .with("a", json!("1"))
///     .with("b", json!(null))
///     .with_undefined("c");
///
/// assert_eq!(bag.len(), 3);
/// assert!(bag.is_defined("b"));
/// assert!(!bag.is_defined("c"));
/// assert!(bag.contains_key("c"));
/// ```
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ArgBag {
    entries: IndexMap<String, ArgValue>,
}

impl ArgBag {
    /// Creates an empty bag.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a supplied value.
    #[must_use]
    pub fn with(mut self, name: impl Into<String>, value: Value) -> Self {
        self.entries.insert(name.into(), Some(value));
        self
    }

    /// Adds a key whose value is explicitly undefined.
    #[must_use]
    pub fn with_undefined(mut self, name: impl Into<String>) -> Self {
        self.entries.insert(name.into(), None);
        self
    }

    /// Inserts an argument, returning the previous one if the key existed.
    pub fn insert(&mut self, name: impl Into<String>, value: ArgValue) -> Option<ArgValue> {
        self.entries.insert(name.into(), value)
    }

    /// Returns the argument for `name`; `None` if the key is absent.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&ArgValue> {
        self.entries.get(name)
    }

    /// Removes and returns the value for `name`, treating absent keys as undefined.
    pub fn take(&mut self, name: &str) -> ArgValue {
        self.entries.swap_remove(name).flatten()
    }

    /// Returns `true` if the key is present, even with an undefined value.
    #[must_use]
    pub fn contains_key(&self, name: &str) -> bool {
        self.entries.contains_key(name)
    }

    /// Returns `true` if the key is present with a supplied value.
    #[must_use]
    pub fn is_defined(&self, name: &str) -> bool {
        matches!(self.entries.get(name), Some(Some(_)))
    }

    /// Iterates over the keys in insertion order.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    /// Iterates over `(name, value)` pairs in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &ArgValue)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Returns the number of keys.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns `true` if the bag holds no keys.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl From<Map<String, Value>> for ArgBag {
    fn from(map: Map<String, Value>) -> Self {
        map.into_iter().map(|(k, v)| (k, Some(v))).collect()
    }
}

impl TryFrom<Value> for ArgBag {
    type Error = Value;

    /// Converts a JSON object into a bag; any other value is handed back.
    fn try_from(value: Value) -> Result<Self, Self::Error> {
        match value {
            Value::Object(map) => Ok(map.into()),
            other => Err(other),
        }
    }
}

impl<K: Into<String>> FromIterator<(K, ArgValue)> for ArgBag {
    fn from_iter<I: IntoIterator<Item = (K, ArgValue)>>(iter: I) -> Self {
        Self {
            entries: iter.into_iter().map(|(k, v)| (k.into(), v)).collect(),
        }
    }
}

impl<K: Into<String>> FromIterator<(K, Value)> for ArgBag {
    fn from_iter<I: IntoIterator<Item = (K, Value)>>(iter: I) -> Self {
        iter.into_iter().map(|(k, v)| (k, Some(v))).collect()
    }
}
