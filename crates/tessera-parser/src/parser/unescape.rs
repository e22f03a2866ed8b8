/// Result of decoding the backslash escapes of one string.
pub(crate) struct Unescaped {
    pub(crate) value: String,
    /// A lone surrogate forced a U+FFFD substitution.
    pub(crate) lossy: bool,
    /// Byte offset (within the quoted content) of the first unknown or
    /// incomplete escape, if any.
    pub(crate) bad_escape: Option<usize>,
}

/// Decode all backslash escapes in `raw` (string content without the
/// enclosing quotes) into UTF-8.
///
/// A high surrogate followed by a low surrogate combines into one code
/// point; a lone surrogate and any malformed escape decode to U+FFFD so a
/// value is always produced, with the defect reported in the flags.
pub(crate) fn unescape(raw: &str, allow_single_quote_escape: bool) -> Unescaped {
    let mut value = String::with_capacity(raw.len());
    let mut lossy = false;
    let mut bad_escape = None;
    let mut rest = raw;
    let mut offset = 0;

    while let Some(backslash) = rest.find('\\') {
        value.push_str(&rest[..backslash]);
        offset += backslash;
        let tail = &rest[backslash..];

        let consumed = match tail[1..].chars().next() {
            Some('"') => {
                value.push('"');
                2
            }
            Some('\\') => {
                value.push('\\');
                2
            }
            Some('/') => {
                value.push('/');
                2
            }
            Some('b') => {
                value.push('\u{0008}');
                2
            }
            Some('f') => {
                value.push('\u{000C}');
                2
            }
            Some('n') => {
                value.push('\n');
                2
            }
            Some('r') => {
                value.push('\r');
                2
            }
            Some('t') => {
                value.push('\t');
                2
            }
            Some('\'') if allow_single_quote_escape => {
                value.push('\'');
                2
            }
            Some('u') => match hex4(&tail[2..]) {
                Some(code) => match code {
                    0xD800..=0xDBFF => match low_surrogate(&tail[6..]) {
                        Some(low) => {
                            let combined =
                                0x10000 + ((code as u32 - 0xD800) << 10 | (low as u32 - 0xDC00));
                            match char::from_u32(combined) {
                                Some(c) => value.push(c),
                                None => {
                                    value.push('\u{FFFD}');
                                    lossy = true;
                                }
                            }
                            12
                        }
                        None => {
                            value.push('\u{FFFD}');
                            lossy = true;
                            6
                        }
                    },
                    0xDC00..=0xDFFF => {
                        value.push('\u{FFFD}');
                        lossy = true;
                        6
                    }
                    _ => {
                        // Always valid: the surrogate ranges were handled
                        // above and u16 cannot exceed U+FFFF.
                        value.push(char::from_u32(code as u32).unwrap_or('\u{FFFD}'));
                        6
                    }
                },
                None => {
                    bad_escape.get_or_insert(offset);
                    value.push('\u{FFFD}');
                    // Skip the `\u` and whatever hex digits are present.
                    2 + tail[2..]
                        .bytes()
                        .take(4)
                        .take_while(u8::is_ascii_hexdigit)
                        .count()
                }
            },
            Some(other) => {
                bad_escape.get_or_insert(offset);
                value.push('\u{FFFD}');
                1 + other.len_utf8()
            }
            None => {
                // A trailing lone backslash; only reachable for token
                // streams not produced by our lexer.
                bad_escape.get_or_insert(offset);
                value.push('\u{FFFD}');
                1
            }
        };

        rest = &tail[consumed..];
        offset += consumed;
    }
    value.push_str(rest);

    Unescaped {
        value,
        lossy,
        bad_escape,
    }
}

fn hex4(input: &str) -> Option<u16> {
    let digits = input.get(..4)?;
    if !digits.bytes().all(|b| b.is_ascii_hexdigit()) {
        return None;
    }
    u16::from_str_radix(digits, 16).ok()
}

fn low_surrogate(input: &str) -> Option<u16> {
    if !input.starts_with("\\u") {
        return None;
    }
    hex4(&input[2..]).filter(|code| (0xDC00..=0xDFFF).contains(code))
}

#[cfg(test)]
mod tests {
    use super::unescape;
    use pretty_assertions::assert_eq;

    fn decode(raw: &str) -> String {
        let result = unescape(raw, false);
        assert_eq!(result.bad_escape, None, "{raw}");
        assert!(!result.lossy, "{raw}");
        result.value
    }

    #[test]
    fn simple_escapes() {
        assert_eq!(decode(r#"a\"b"#), "a\"b");
        assert_eq!(decode(r"a\\b"), "a\\b");
        assert_eq!(decode(r"a\/b"), "a/b");
        assert_eq!(decode(r"\b\f\n\r\t"), "\u{8}\u{c}\n\r\t");
    }

    #[test]
    fn unicode_escapes() {
        assert_eq!(decode(r"\u0041"), "A");
        assert_eq!(decode(r"caf\u00e9"), "caf\u{e9}");
        assert_eq!(decode(r"\u2764"), "\u{2764}");
    }

    #[test]
    fn surrogate_pairs_combine() {
        assert_eq!(decode(r"\uD83D\uDE00"), "\u{1F600}");
        assert_eq!(decode(r"\uD834\uDD1E"), "\u{1D11E}");
    }

    #[test]
    fn lone_surrogates_are_lossy() {
        let result = unescape(r"\uD83D!", false);
        assert_eq!(result.value, "\u{FFFD}!");
        assert!(result.lossy);
        assert_eq!(result.bad_escape, None);

        let result = unescape(r"\uDE00", false);
        assert_eq!(result.value, "\u{FFFD}");
        assert!(result.lossy);
    }

    #[test]
    fn unknown_escape_is_replaced_and_reported() {
        let result = unescape(r"ab\qcd", false);
        assert_eq!(result.value, "ab\u{FFFD}cd");
        assert_eq!(result.bad_escape, Some(2));
        assert!(!result.lossy);
    }

    #[test]
    fn truncated_unicode_escape() {
        let result = unescape(r"\u12", false);
        assert_eq!(result.value, "\u{FFFD}");
        assert_eq!(result.bad_escape, Some(0));

        let result = unescape(r"\u12ZZ", false);
        assert_eq!(result.value, "\u{FFFD}ZZ");
        assert_eq!(result.bad_escape, Some(0));
    }

    #[test]
    fn single_quote_escape_is_json5_only() {
        let strict = unescape(r"\'", false);
        assert_eq!(strict.value, "\u{FFFD}");
        assert_eq!(strict.bad_escape, Some(0));

        let json5 = unescape(r"\'", true);
        assert_eq!(json5.value, "'");
        assert_eq!(json5.bad_escape, None);
    }

    #[test]
    fn non_ascii_content_passes_through() {
        assert_eq!(decode("日本語 🚀"), "日本語 🚀");
    }
}
