//! Input cleanup before text reaches a provider.

/// Strip control characters, collapse whitespace runs to one space, and trim.
pub fn sanitize(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut pending_space = false;
    for c in text.chars() {
        if c.is_whitespace() {
            pending_space = true;
            continue;
        }
        if c.is_control() {
            continue;
        }
        if pending_space && !out.is_empty() {
            out.push(' ');
        }
        pending_space = false;
        out.push(c);
    }
    out
}

/// Cut `text` to at most `max_chars` characters, never splitting a code point.
pub fn truncate_chars(text: &str, max_chars: usize) -> &str {
    match text.char_indices().nth(max_chars) {
        Some((end, _)) => &text[..end],
        None => text,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn collapses_whitespace_and_trims() {
        assert_eq!(sanitize("  where\t\tis \n my  order  "), "where is my order");
    }

    #[test]
    fn strips_control_characters() {
        assert_eq!(sanitize("pay\u{0007}ment\u{0000} failed"), "payment failed");
    }

    #[test]
    fn whitespace_only_becomes_empty() {
        assert_eq!(sanitize(" \n\t "), "");
    }

    #[test]
    fn truncation_respects_char_boundaries() {
        assert_eq!(truncate_chars("привет мир", 6), "привет");
        assert_eq!(truncate_chars("short", 100), "short");
        assert_eq!(truncate_chars("abc", 0), "");
    }
}
