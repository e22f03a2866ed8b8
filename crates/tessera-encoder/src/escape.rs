use std::fmt::Write;

/// Append `value` to `out` as a quoted JSON string, re-escaping everything
/// RFC 8259 requires: the quote character, backslash, and control
/// characters below 0x20 (short escapes where they exist, `\u00XX`
/// otherwise). Non-ASCII UTF-8 passes through unescaped.
pub(crate) fn write_quoted(out: &mut String, value: &str, quote: char) {
    out.push(quote);
    for c in value.chars() {
        match c {
            '"' if quote == '"' => out.push_str("\\\""),
            '\'' if quote == '\'' => out.push_str("\\'"),
            '\\' => out.push_str("\\\\"),
            '\u{0008}' => out.push_str("\\b"),
            '\u{000C}' => out.push_str("\\f"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            c if (c as u32) < 0x20 => {
                // Infallible for String.
                let _ = write!(out, "\\u{:04x}", c as u32);
            }
            c => out.push(c),
        }
    }
    out.push(quote);
}

#[cfg(test)]
mod tests {
    use super::write_quoted;
    use pretty_assertions::assert_eq;

    fn quoted(value: &str, quote: char) -> String {
        let mut out = String::new();
        write_quoted(&mut out, value, quote);
        out
    }

    #[test]
    fn escapes_what_rfc_8259_requires() {
        assert_eq!(quoted("plain", '"'), r#""plain""#);
        assert_eq!(quoted("a\"b", '"'), r#""a\"b""#);
        assert_eq!(quoted("a\\b", '"'), r#""a\\b""#);
        assert_eq!(quoted("\n\r\t\u{8}\u{c}", '"'), r#""\n\r\t\b\f""#);
        let backslash_u = "\\u";
        assert_eq!(quoted("\u{1}", '"'), format!("\"{backslash_u}0001\""));
    }

    #[test]
    fn non_ascii_is_not_escaped() {
        assert_eq!(quoted("caf\u{e9} \u{1F680}", '"'), "\"caf\u{e9} \u{1F680}\"");
    }

    #[test]
    fn single_quote_mode_swaps_the_escaped_quote() {
        assert_eq!(quoted("it's", '\''), r#"'it\'s'"#);
        assert_eq!(quoted("say \"hi\"", '\''), r#"'say "hi"'"#);
        assert_eq!(quoted("it's", '"'), r#""it's""#);
    }
}
