//! Route path helpers

/// Rewrite `{name}` path segments into axum's `:name` capture syntax.
///
/// `axum_route(IDENTIFIER_ROUTE)` yields `"/:identifier"`.
pub fn axum_route(route: &str) -> String {
    route
        .split('/')
        .map(|segment| match segment.strip_prefix('{').and_then(|s| s.strip_suffix('}')) {
            Some(name) => format!(":{}", name),
            None => segment.to_string(),
        })
        .collect::<Vec<_>>()
        .join("/")
}
