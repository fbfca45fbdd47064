// Player-name canonicalization for cross-source comparison.

/// Canonical form used by the exact-match path: surrounding whitespace
/// removed, case and punctuation untouched.
pub fn normalize(name: &str) -> String {
    name.trim().to_string()
}

/// Comparison key for similarity scoring: lowercased with periods removed,
/// so "P.J. Washington" and "PJ Washington" compare equal.
pub fn similarity_key(name: &str) -> String {
    name.to_lowercase().replace('.', "")
}

/// Whitespace-separated name tokens ("Karl-Anthony Towns" has two).
pub fn name_tokens(name: &str) -> Vec<&str> {
    name.split_whitespace().collect()
}

/// Case-insensitive token equality.
pub fn tokens_match(a: &str, b: &str) -> bool {
    a.to_lowercase() == b.to_lowercase()
}
