//! Bidirectional argument-name mapping.
//!
//! Callers and handlers do not always agree on spelling: a public API may
//! take `user_id` while the handler parameter is `userId`. An [`ArgNameMap`]
//! translates between the two so that binding happens by matched name.

use std::sync::Arc;

use convert_case::{Case, Casing};

/// Translates between external (caller-facing) and internal (handler
/// parameter) argument names.
pub trait ArgNameMap: Send + Sync + 'static {
    /// Maps an external name to the handler parameter it should bind.
    fn to_internal(&self, external: &str) -> String;

    /// Maps a handler parameter to the name callers use.
    fn to_external(&self, internal: &str) -> String;
}

/// A shared, type-erased name map.
pub type NameMapRef = Arc<dyn ArgNameMap>;

/// snake_case externally, camelCase internally.
///
/// This is the map a [`Binder`](crate::Binder) uses unless told otherwise.
/// A name already in camelCase maps to itself, so declaring the handler's
/// own parameter name always binds.
///
/// ```
/// use callmap_binder::{ArgNameMap, SnakeToCamel};
///
/// assert_eq!(SnakeToCamel.to_internal("user_id"), "userId");
/// assert_eq!(SnakeToCamel.to_external("userId"), "user_id");
/// assert_eq!(SnakeToCamel.to_internal("argNum"), "argNum");
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct SnakeToCamel;

impl ArgNameMap for SnakeToCamel {
    fn to_internal(&self, external: &str) -> String {
        snake_to_camel(external)
    }

    fn to_external(&self, internal: &str) -> String {
        camel_to_snake(internal)
    }
}

/// Names are used as-is in both directions.
#[derive(Debug, Clone, Copy, Default)]
pub struct Identity;

impl ArgNameMap for Identity {
    fn to_internal(&self, external: &str) -> String {
        external.to_string()
    }

    fn to_external(&self, internal: &str) -> String {
        internal.to_string()
    }
}

/// A name map built from two closures.
pub struct FnNameMap<I, E>
where
    I: Fn(&str) -> String + Send + Sync + 'static,
    E: Fn(&str) -> String + Send + Sync + 'static,
{
    to_internal: I,
    to_external: E,
}

impl<I, E> FnNameMap<I, E>
where
    I: Fn(&str) -> String + Send + Sync + 'static,
    E: Fn(&str) -> String + Send + Sync + 'static,
{
    /// Creates a name map from its two directions.
    pub fn new(to_internal: I, to_external: E) -> Self {
        Self {
            to_internal,
            to_external,
        }
    }
}

impl<I, E> ArgNameMap for FnNameMap<I, E>
where
    I: Fn(&str) -> String + Send + Sync + 'static,
    E: Fn(&str) -> String + Send + Sync + 'static,
{
    fn to_internal(&self, external: &str) -> String {
        (self.to_internal)(external)
    }

    fn to_external(&self, internal: &str) -> String {
        (self.to_external)(internal)
    }
}

/// Converts `snake_case` to `camelCase`.
#[must_use]
pub fn snake_to_camel(name: &str) -> String {
    name.to_case(Case::Camel)
}

/// Converts `camelCase` to `snake_case`.
#[must_use]
pub fn camel_to_snake(name: &str) -> String {
    name.to_case(Case::Snake)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_snake_to_camel() {
        assert_eq!(snake_to_camel("user_id"), "userId");
        assert_eq!(snake_to_camel("page_size_hint"), "pageSizeHint");
        assert_eq!(snake_to_camel("plain"), "plain");
        assert_eq!(snake_to_camel("userId"), "userId");
    }

    #[test]
    fn test_stray_underscores_are_dropped() {
        assert_eq!(snake_to_camel("_private"), "private");
        assert_eq!(snake_to_camel("trailing_"), "trailing");
        assert_eq!(snake_to_camel("double__gap"), "doubleGap");
    }

    #[test]
    fn test_camel_to_snake() {
        assert_eq!(camel_to_snake("userId"), "user_id");
        assert_eq!(camel_to_snake("pageSizeHint"), "page_size_hint");
        assert_eq!(camel_to_snake("plain"), "plain");
        assert_eq!(camel_to_snake("Leading"), "leading");
    }

    #[test]
    fn test_round_trip() {
        for name in ["userId", "a", "requestIdHeader"] {
            assert_eq!(snake_to_camel(&camel_to_snake(name)), name);
        }
    }

    #[test]
    fn test_fn_name_map() {
        let map = FnNameMap::new(|e: &str| e.trim_start_matches('$').to_string(), |i: &str| {
            format!("${i}")
        });
        assert_eq!(map.to_internal("$limit"), "limit");
        assert_eq!(map.to_external("limit"), "$limit");
    }
}
