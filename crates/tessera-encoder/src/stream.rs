use crate::error::EncodeError;
use crate::options::FormatOptions;
use tessera_parser::{Token, TokenKind};

/// The streaming formatter's fixed nesting capacity.
pub const MAX_STREAM_DEPTH: usize = 256;

/// Formats a token stream on the fly, without building a tree.
///
/// Layout is multiline with the configured indentation unless
/// `force_compact` is set; there is no lookahead, so the size-estimate
/// heuristic of the tree formatter does not apply here. String and number
/// tokens are passed through verbatim.
///
/// Input commas and trivia are dropped; separators are re-synthesized from
/// structure, which is tracked in a fixed-size depth table (up to
/// [`MAX_STREAM_DEPTH`] levels) with an in-array bitset deciding whether a
/// value needs its own indented line.
///
/// ## Example
/// ```rust
/// use tessera_encoder::{FormatOptions, StreamFormatter};
/// use tessera_parser::{lex, LexerOptions};
///
/// let source = r#"{"a":[1,2]}"#;
/// let mut formatter = StreamFormatter::new(FormatOptions::default());
/// for token in lex(source, &LexerOptions::default()).unwrap() {
///     formatter.push(token.kind(), token.text(source)).unwrap();
/// }
/// assert_eq!(
///     formatter.finish().unwrap(),
///     "{\n  \"a\": [\n    1,\n    2\n  ]\n}\n",
/// );
/// ```
#[derive(Debug)]
pub struct StreamFormatter {
    options: FormatOptions,
    indent_unit: String,
    output: String,
    depth: usize,
    /// One bit per depth: set when the open container at that depth is an
    /// array.
    in_array: [u64; MAX_STREAM_DEPTH / 64],
    need_comma: bool,
    /// The innermost container has not received a member yet.
    just_opened: bool,
}

impl StreamFormatter {
    pub fn new(options: FormatOptions) -> Self {
        let indent_unit = options.indent_unit();
        Self {
            options,
            indent_unit,
            output: String::new(),
            depth: 0,
            in_array: [0; MAX_STREAM_DEPTH / 64],
            need_comma: false,
            just_opened: false,
        }
    }

    /// Convenience wrapper over [`push`](StreamFormatter::push) for a lexed
    /// token and the source it was lexed from.
    pub fn push_token(&mut self, token: &Token, source: &str) -> Result<(), EncodeError> {
        self.push(token.kind(), token.text(source))
    }

    /// Feed one token and its text.
    pub fn push(&mut self, kind: TokenKind, text: &str) -> Result<(), EncodeError> {
        match kind {
            TokenKind::ObjectStart => self.open(false),
            TokenKind::ArrayStart => self.open(true),
            TokenKind::ObjectEnd => self.close('}'),
            TokenKind::ArrayEnd => self.close(']'),
            TokenKind::PropertyName => {
                self.separate(true);
                self.output.push_str(text);
                Ok(())
            }
            TokenKind::Colon => {
                self.output.push(':');
                if self.multiline() || self.options.space_after_colon {
                    self.output.push(' ');
                }
                self.need_comma = false;
                Ok(())
            }
            TokenKind::StringValue
            | TokenKind::NumberValue
            | TokenKind::BooleanTrue
            | TokenKind::BooleanFalse
            | TokenKind::NullValue
            | TokenKind::Error => {
                self.separate(self.in_array());
                self.output.push_str(text);
                self.need_comma = true;
                Ok(())
            }
            // Separators are re-synthesized; trivia is dropped.
            TokenKind::Comma | TokenKind::Whitespace | TokenKind::Comment | TokenKind::Eof => {
                Ok(())
            }
        }
    }

    /// Validate balance and return the formatted text.
    pub fn finish(mut self) -> Result<String, EncodeError> {
        if self.depth != 0 {
            return Err(EncodeError::UnbalancedDelimiters);
        }
        // Multiline documents end with a newline; bare leaves do not.
        if self.output.contains('\n') {
            self.output.push('\n');
        }
        Ok(self.output)
    }

    fn multiline(&self) -> bool {
        !self.options.force_compact
    }

    fn in_array(&self) -> bool {
        self.depth > 0 && self.in_array[(self.depth - 1) / 64] & (1 << ((self.depth - 1) % 64)) != 0
    }

    /// Comma/indentation before a member or value; `own_line` is true when
    /// the token starts a new line in multiline layout.
    fn separate(&mut self, own_line: bool) {
        if self.need_comma {
            self.output.push(',');
            if !self.multiline() && self.options.space_after_comma {
                self.output.push(' ');
            }
        }
        if own_line && self.multiline() && self.depth > 0 {
            self.new_line();
        }
        self.just_opened = false;
    }

    fn new_line(&mut self) {
        self.output.push('\n');
        for _ in 0..self.depth {
            self.output.push_str(&self.indent_unit);
        }
    }

    fn open(&mut self, is_array: bool) -> Result<(), EncodeError> {
        if self.depth == MAX_STREAM_DEPTH {
            return Err(EncodeError::DepthExceeded {
                max: MAX_STREAM_DEPTH,
            });
        }
        self.separate(self.in_array());
        self.output.push(if is_array { '[' } else { '{' });
        let word = self.depth / 64;
        let bit = 1u64 << (self.depth % 64);
        if is_array {
            self.in_array[word] |= bit;
        } else {
            self.in_array[word] &= !bit;
        }
        self.depth += 1;
        self.need_comma = false;
        self.just_opened = true;
        Ok(())
    }

    fn close(&mut self, delimiter: char) -> Result<(), EncodeError> {
        if self.depth == 0 {
            return Err(EncodeError::UnbalancedDelimiters);
        }
        self.depth -= 1;
        if self.multiline() && !self.just_opened {
            self.new_line();
        }
        self.output.push(delimiter);
        self.need_comma = true;
        self.just_opened = false;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use tessera_parser::{lex, LexerOptions};

    fn stream_format(source: &str, options: FormatOptions) -> Result<String, EncodeError> {
        let mut formatter = StreamFormatter::new(options);
        for token in lex(source, &LexerOptions::default()).unwrap() {
            formatter.push(token.kind(), token.text(source))?;
        }
        formatter.finish()
    }

    #[test]
    fn matches_the_tree_formatter_for_multiline_output() {
        let sources = [
            r#"{"name":"Alice","age":30}"#,
            r#"[1,[2,3],{"a":true}]"#,
            r#"{"empty":{},"list":[]}"#,
            "42",
        ];
        for source in sources {
            let tree = tessera_parser::parse(source).unwrap();
            let expected = crate::format(&tree, &FormatOptions::default()).unwrap();
            let streamed = stream_format(source, FormatOptions::default()).unwrap();
            assert_eq!(streamed, expected, "{source}");
        }
    }

    #[test]
    fn compact_mode() {
        let out = stream_format(
            r#"{ "a": [1, 2], "b": true }"#,
            FormatOptions::default()
                .force_compact(true)
                .space_after_colon(true),
        )
        .unwrap();
        assert_eq!(out, r#"{"a": [1,2],"b": true}"#);
    }

    #[test]
    fn unbalanced_input_is_a_hard_error() {
        let mut formatter = StreamFormatter::new(FormatOptions::default());
        formatter.push(TokenKind::ObjectStart, "{").unwrap();
        assert_eq!(formatter.finish(), Err(EncodeError::UnbalancedDelimiters));

        let mut formatter = StreamFormatter::new(FormatOptions::default());
        assert_eq!(
            formatter.push(TokenKind::ArrayEnd, "]"),
            Err(EncodeError::UnbalancedDelimiters),
        );
    }

    #[test]
    fn depth_table_is_bounded() {
        let mut formatter = StreamFormatter::new(FormatOptions::default().force_compact(true));
        for _ in 0..MAX_STREAM_DEPTH {
            formatter.push(TokenKind::ArrayStart, "[").unwrap();
        }
        assert_eq!(
            formatter.push(TokenKind::ArrayStart, "["),
            Err(EncodeError::DepthExceeded {
                max: MAX_STREAM_DEPTH,
            }),
        );
    }
}
