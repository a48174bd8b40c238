use std::borrow::Cow;

/// Escape character data for use between tags.
pub fn escape_text(text: &str) -> Cow<'_, str> {
    escape(text, false)
}

/// Escape a value for use inside a double- or single-quoted attribute.
pub fn escape_attr(value: &str) -> Cow<'_, str> {
    escape(value, true)
}

/// Characters XML 1.0 cannot carry at all, not even as references.
fn is_forbidden(c: char) -> bool {
    matches!(
        c,
        '\u{0}'..='\u{8}' | '\u{B}' | '\u{C}' | '\u{E}'..='\u{1F}' | '\u{FFFE}' | '\u{FFFF}'
    )
}

/// Forbidden characters are dropped.
fn escape(s: &str, quotes: bool) -> Cow<'_, str> {
    let needs_escape = |c: char| {
        matches!(c, '&' | '<' | '>') || (quotes && matches!(c, '"' | '\'')) || is_forbidden(c)
    };
    if !s.contains(needs_escape) {
        return Cow::Borrowed(s);
    }

    let mut out = String::with_capacity(s.len() + 16);
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' if quotes => out.push_str("&quot;"),
            '\'' if quotes => out.push_str("&apos;"),
            c if is_forbidden(c) => {}
            _ => out.push(c),
        }
    }
    Cow::Owned(out)
}
