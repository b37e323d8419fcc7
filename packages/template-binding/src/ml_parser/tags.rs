//! Namespaced element and attribute names (`:ns:name`).

/// Joins a namespace prefix and a local name into `:prefix:local`.
pub fn merge_ns_and_name(prefix: Option<&str>, local_name: &str) -> String {
    match prefix {
        Some(p) if !p.is_empty() => format!(":{}:{}", p, local_name),
        _ => local_name.to_string(),
    }
}
