//! Small shared helpers: secret resolution, masking, string utilities.
//!
//! Secret resolution order (highest priority first):
//! 1. Explicitly configured value
//! 2. Process environment variable
//! 3. Empty (unset)
//!
//! Resolved secret values never appear in logs or serialized output;
//! only the masked markers produced by [`mask`] are ever displayed.

/// Marker shown for a secret that resolved to a non-blank value.
pub const MASKED: &str = "************";

/// Marker shown for a secret that did not resolve at all.
pub const UNSET: &str = "**unset**";

/// Resolve a credential: a non-blank configured value wins, otherwise the
/// process environment variable named `env_key` is consulted.
///
/// Returns an empty string when neither source provides a value.
pub fn resolve(env_key: &str, configured: &str) -> String {
    resolve_with(|key| std::env::var(key).ok(), env_key, configured)
}

/// Like [`resolve`] but with an injectable environment lookup.
pub fn resolve_with<F>(lookup: F, env_key: &str, configured: &str) -> String
where
    F: Fn(&str) -> Option<String>,
{
    if !configured.trim().is_empty() {
        return configured.to_string();
    }
    lookup(env_key).unwrap_or_default()
}

/// Display form of a resolved secret. Never reveals length or content.
pub fn mask(resolved: &str) -> &'static str {
    if resolved.trim().is_empty() {
        UNSET
    } else {
        MASKED
    }
}

/// Returns true if the value is empty or whitespace-only.
pub fn is_blank(value: &str) -> bool {
    value.trim().is_empty()
}

/// Capitalize the first character of a string.
pub fn capitalize(value: &str) -> String {
    let mut chars = value.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}
