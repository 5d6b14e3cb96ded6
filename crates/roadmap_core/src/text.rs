//! Character-budget helpers shared by notes and assistant replies.

/// Keeps at most `max_chars` characters of `value`.
pub fn truncate_chars(value: &str, max_chars: usize) -> String {
    value.chars().take(max_chars).collect()
}

/// Returns whether `value` has no visible characters.
pub fn is_blank(value: &str) -> bool {
    value.trim().is_empty()
}
