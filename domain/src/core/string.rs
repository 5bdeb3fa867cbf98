//! String helpers for diagnostics.

/// Clip `s` to at most `max_bytes` bytes on a UTF-8 boundary, marking the
/// cut with a suffix. Used to bound captured child output in error payloads.
pub fn clip(s: &str, max_bytes: usize) -> String {
    if s.len() <= max_bytes {
        return s.to_string();
    }
    let mut end = max_bytes;
    while end > 0 && !s.is_char_boundary(end) {
        end -= 1;
    }
    format!("{}... (truncated)", &s[..end])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clip_short_input_unchanged() {
        assert_eq!(clip("not found", 64), "not found");
    }

    #[test]
    fn test_clip_ascii() {
        assert_eq!(clip("abcdef", 3), "abc... (truncated)");
    }

    #[test]
    fn test_clip_multibyte_boundary() {
        // "é" is two bytes; cutting at 1 must back up to 0
        assert_eq!(clip("éa", 1), "... (truncated)");
        assert_eq!(clip("éa", 2), "é... (truncated)");
    }
}
