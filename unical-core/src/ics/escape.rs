//! Text value escaping.
//!
//! `escape_text` and `unescape_text` are exact inverses for every string
//! without carriage returns. Carriage returns are dropped when escaping.

/// Escape a text value so it cannot break out of its property line.
pub fn escape_text(value: &str) -> String {
    let mut result = String::with_capacity(value.len());

    for c in value.chars() {
        match c {
            '\\' => result.push_str("\\\\"),
            ';' => result.push_str("\\;"),
            ',' => result.push_str("\\,"),
            '\n' => result.push_str("\\n"),
            '\r' => {}
            _ => result.push(c),
        }
    }

    result
}

/// Unescape a text value.
///
/// Reverses `\,` `\;` `\\` and `\n`/`\N`. Any other backslash sequence is
/// kept as written.
pub fn unescape_text(value: &str) -> String {
    let mut result = String::with_capacity(value.len());
    let mut chars = value.chars().peekable();

    while let Some(c) = chars.next() {
        if c != '\\' {
            result.push(c);
            continue;
        }

        match chars.peek() {
            Some(&escaped) if matches!(escaped, ',' | ';' | '\\') => {
                result.push(escaped);
                chars.next();
            }
            Some('n') | Some('N') => {
                result.push('\n');
                chars.next();
            }
            _ => result.push(c),
        }
    }

    result
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_escape_special_characters() {
        assert_eq!(escape_text("a,b;c\\d\ne"), r"a\,b\;c\\d\ne");
    }

    #[test]
    fn test_escape_strips_carriage_returns() {
        assert_eq!(escape_text("line one\r\nline two"), r"line one\nline two");
    }

    #[test]
    fn test_unescape_known_sequences() {
        assert_eq!(unescape_text(r"a\,b\;c\\d\ne\Nf"), "a,b;c\\d\ne\nf");
    }

    #[test]
    fn test_unescape_keeps_unknown_sequences() {
        assert_eq!(unescape_text(r"C:\temp\x"), r"C:\temp\x");
        assert_eq!(unescape_text(r"trailing\"), r"trailing\");
    }

    #[test]
    fn test_unescape_inverts_escape() {
        let samples = [
            "plain",
            "Room 101, Block Y; Floor 3",
            r"back\slash and \n literal",
            "multi\nline\n\ntext",
            "\\\\,;\n",
            "END:VEVENT",
        ];
        for s in samples {
            assert_eq!(unescape_text(&escape_text(s)), s, "sample {:?}", s);
        }
    }

    #[test]
    fn test_escaped_value_has_no_line_breaks() {
        let escaped = escape_text("x\nEND:VEVENT\r\nBEGIN:VEVENT\ny");
        assert!(!escaped.contains('\n'));
        assert!(!escaped.contains('\r'));
    }
}
