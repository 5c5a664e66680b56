//! Route computation.

/// Computes the route of method `name` under an optional prefix.
///
/// Slashes around the prefix are trimmed, and an empty prefix counts as no
/// prefix.
///
/// # Example
///
/// ```
/// use callmap::route;
///
/// assert_eq!(route(None, "numbers.add"), "/numbers.add");
/// assert_eq!(route(Some("api"), "numbers.add"), "/api/numbers.add");
/// assert_eq!(route(Some("/api/v1/"), "numbers.add"), "/api/v1/numbers.add");
/// ```
pub fn route(prefix: Option<&str>, name: &str) -> String {
    match prefix.map(|p| p.trim_matches('/')).filter(|p| !p.is_empty()) {
        Some(prefix) => format!("/{prefix}/{name}"),
        None => format!("/{name}"),
    }
}
