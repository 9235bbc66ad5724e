//! Bounded value representations for the variables view.
//!
//! The runtime hands over raw value strings; this module enforces the
//! configured length bound and substitutes a marker for values whose
//! introspection raised inside the runtime.

/// Truncate `raw` to at most `max_len` characters, ellipsis included.
///
/// Operates on characters, not bytes, so multi-byte values never split.
/// A bound below one character is treated as one.
pub fn bounded(raw: &str, max_len: usize) -> String {
    let max_len = max_len.max(1);
    if raw.chars().count() <= max_len {
        return raw.to_owned();
    }
    let mut out: String = raw.chars().take(max_len - 1).collect();
    out.push('…');
    out
}

/// Marker rendered in place of a variable whose evaluation raised.
pub fn introspection_error(message: &str, max_len: usize) -> String {
    bounded(&format!("<error reading variable: {message}>"), max_len)
}
