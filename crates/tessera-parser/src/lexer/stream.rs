use crate::error::{Error, ErrorKind};
use crate::lexer::lookup;
use crate::lexer::{LexerOptions, Token, TokenFlags, TokenKind};
use crate::limit::LimitTracker;
use crate::Span;

/// Scan context retained between [`StreamLexer::feed`] calls.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Context {
    Normal,
    InWhitespace,
    InString,
    InEscape,
    InUnicodeEscape,
    InNumber,
    InLiteral,
    InCommentOpen,
    InLineComment,
    InBlockComment,
}

/// Sub-state of an in-progress number scan.
#[derive(Debug, Clone, Copy, Default)]
struct NumberState {
    has_minus: bool,
    has_digit: bool,
    has_dot: bool,
    has_fraction: bool,
    has_e: bool,
    has_exponent_sign: bool,
    has_exponent_digit: bool,
}

/// A pull-based, chunk-resumable lexer.
///
/// The caller supplies the logical input as a sequence of chunks via
/// [`feed`]; tokens are emitted as soon as they are complete, and any token
/// still in progress when a chunk ends is retained in an internal scratch
/// buffer and finished on the next call. For any partition of the input into
/// chunks, the concatenated emitted token sequence equals what a batch lex of
/// the joined input emits, modulo the [`TokenFlags::CONTINUATION`] marker on
/// tokens that straddled a boundary.
///
/// [`feed`]: StreamLexer::feed
///
/// ## Example
/// ```rust
/// use tessera_parser::{StreamLexer, LexerOptions, TokenKind};
///
/// let mut lexer = StreamLexer::new(LexerOptions::default());
/// let mut tokens = lexer.feed(r#"{"na"#).unwrap();
/// tokens.extend(lexer.feed(r#"me":42}"#).unwrap());
/// tokens.extend(lexer.finish().unwrap());
///
/// let kinds: Vec<TokenKind> = tokens.iter().map(|t| t.kind()).collect();
/// assert_eq!(
///     kinds,
///     vec![
///         TokenKind::ObjectStart,
///         TokenKind::PropertyName,
///         TokenKind::Colon,
///         TokenKind::NumberValue,
///         TokenKind::ObjectEnd,
///         TokenKind::Eof,
///     ],
/// );
/// ```
#[derive(Debug, Clone)]
pub struct StreamLexer {
    options: LexerOptions,
    /// Global offset of the next unread byte.
    pos: usize,
    /// Global offset of the first byte of the current chunk.
    chunk_base: usize,
    /// Global offset where the pending token began.
    token_start: usize,
    context: Context,
    number: NumberState,
    literal: &'static str,
    literal_kind: TokenKind,
    literal_matched: usize,
    hex_digits: u8,
    quote: u8,
    string_has_escapes: bool,
    block_comment_star: bool,
    /// Current nesting depth, saturating at 255.
    depth: u8,
    /// One bit per depth: set when the container at that depth is an object.
    object_bits: [u64; 4],
    /// Whether a string lexed next is in key position.
    expect_key: bool,
    /// Bytes of the pending token accumulated from previous chunks.
    scratch: String,
    /// Full texts of tokens that crossed a chunk boundary, indexed by the
    /// token's aux word.
    assembled: Vec<String>,
    errors: Vec<Error>,
    limit: LimitTracker,
    finished: bool,
}

impl StreamLexer {
    /// Create a new streaming lexer.
    pub fn new(options: LexerOptions) -> Self {
        Self {
            options,
            pos: 0,
            chunk_base: 0,
            token_start: 0,
            context: Context::Normal,
            number: NumberState::default(),
            literal: "",
            literal_kind: TokenKind::NullValue,
            literal_matched: 0,
            hex_digits: 0,
            quote: b'"',
            string_has_escapes: false,
            block_comment_star: false,
            depth: 0,
            object_bits: [0; 4],
            expect_key: false,
            scratch: String::new(),
            assembled: Vec::new(),
            errors: Vec::new(),
            limit: LimitTracker::default(),
            finished: false,
        }
    }

    /// Configure a limit on the number of tokens emitted. If the input is
    /// too big, lexing is aborted with a limit error.
    ///
    /// By default, there is no limit.
    pub fn with_limit(mut self, limit: usize) -> Self {
        self.limit = LimitTracker::new(limit);
        self
    }

    /// Feed the next chunk of the logical input, returning the tokens that
    /// completed within it.
    pub fn feed(&mut self, chunk: &str) -> Result<Vec<Token>, Error> {
        let mut out = Vec::new();
        self.feed_into(chunk, &mut out)?;
        Ok(out)
    }

    /// Like [`feed`](StreamLexer::feed), but appends into a caller-owned
    /// buffer and returns how many tokens were emitted.
    pub fn feed_into(&mut self, chunk: &str, out: &mut Vec<Token>) -> Result<usize, Error> {
        debug_assert!(!self.finished, "feed called after finish");
        let before = out.len();
        let base = self.pos;
        self.chunk_base = base;
        let bytes = chunk.as_bytes();
        let mut i = 0;

        while i < bytes.len() {
            let b = bytes[i];
            let g = base + i;
            match self.context {
                Context::Normal => {
                    if let Some(kind) = lookup::punctuation_kind(b) {
                        self.emit(out, kind, g, g + 1, TokenFlags::empty(), 0)?;
                        i += 1;
                    } else if lookup::is_whitespace(b) {
                        self.token_start = g;
                        self.context = Context::InWhitespace;
                        i += 1;
                    } else if b == b'"' || (b == b'\'' && self.options.allow_single_quotes) {
                        self.token_start = g;
                        self.quote = b;
                        self.string_has_escapes = false;
                        self.context = Context::InString;
                        i += 1;
                    } else if b == b'-' || lookup::is_digit(b) {
                        self.token_start = g;
                        self.number = NumberState::default();
                        self.context = Context::InNumber;
                        // reprocessed by the InNumber arm
                    } else if b == b't' || b == b'f' || b == b'n' {
                        self.token_start = g;
                        (self.literal, self.literal_kind) = match b {
                            b't' => ("true", TokenKind::BooleanTrue),
                            b'f' => ("false", TokenKind::BooleanFalse),
                            _ => ("null", TokenKind::NullValue),
                        };
                        self.literal_matched = 0;
                        self.context = Context::InLiteral;
                    } else if b == b'/' && self.options.allow_comments {
                        self.token_start = g;
                        self.context = Context::InCommentOpen;
                        i += 1;
                    } else {
                        i += self.unexpected_character(out, chunk, i, g)?;
                    }
                }
                Context::InWhitespace => {
                    if lookup::is_whitespace(b) {
                        i += 1;
                    } else {
                        self.emit_whitespace(out, g)?;
                    }
                }
                Context::InString => {
                    if b == self.quote {
                        self.complete_string(out, chunk, i + 1, g + 1)?;
                        i += 1;
                    } else if b == b'\\' {
                        self.string_has_escapes = true;
                        self.context = Context::InEscape;
                        i += 1;
                    } else {
                        i += 1;
                    }
                }
                Context::InEscape => {
                    if b == b'u' {
                        self.hex_digits = 0;
                        self.context = Context::InUnicodeEscape;
                    } else {
                        // Unknown escapes are tolerated here; the parser
                        // diagnoses them during unescaping.
                        self.context = Context::InString;
                    }
                    i += 1;
                }
                Context::InUnicodeEscape => {
                    if b.is_ascii_hexdigit() {
                        self.hex_digits += 1;
                        i += 1;
                        if self.hex_digits == 4 {
                            self.context = Context::InString;
                        }
                    } else {
                        // Incomplete escape; the byte is ordinary string
                        // content again.
                        self.context = Context::InString;
                    }
                }
                Context::InNumber => {
                    let n = &mut self.number;
                    let accept = match b {
                        b'0'..=b'9' => {
                            if n.has_e {
                                n.has_exponent_digit = true;
                            } else if n.has_dot {
                                n.has_fraction = true;
                            } else {
                                n.has_digit = true;
                            }
                            true
                        }
                        b'-' if !n.has_minus && !n.has_digit && !n.has_dot && !n.has_e => {
                            n.has_minus = true;
                            true
                        }
                        b'.' if n.has_digit && !n.has_dot && !n.has_e => {
                            n.has_dot = true;
                            true
                        }
                        b'e' | b'E' if n.has_digit && !n.has_e && !(n.has_dot && !n.has_fraction) => {
                            n.has_e = true;
                            true
                        }
                        b'+' | b'-' if n.has_e && !n.has_exponent_sign && !n.has_exponent_digit => {
                            n.has_exponent_sign = true;
                            true
                        }
                        _ => false,
                    };
                    if accept {
                        i += 1;
                    } else {
                        self.complete_number(out, chunk, i, g)?;
                    }
                }
                Context::InLiteral => {
                    let expected = self.literal.as_bytes();
                    if b == expected[self.literal_matched] {
                        self.literal_matched += 1;
                        i += 1;
                        if self.literal_matched == expected.len() {
                            let kind = self.literal_kind;
                            let (flags, aux) = self.pending_text(chunk, i);
                            let start = self.token_start;
                            self.emit(out, kind, start, g + 1, flags, aux)?;
                            self.context = Context::Normal;
                        }
                    } else {
                        self.invalid_literal(out, chunk, i, g)?;
                    }
                }
                Context::InCommentOpen => {
                    if b == b'/' {
                        self.context = Context::InLineComment;
                        i += 1;
                    } else if b == b'*' {
                        self.block_comment_star = false;
                        self.context = Context::InBlockComment;
                        i += 1;
                    } else {
                        self.context = Context::Normal;
                        // The `/` may have been retained at a chunk
                        // boundary; it is consumed by this error.
                        self.scratch.clear();
                        let start = self.token_start;
                        let err = Error::new(
                            ErrorKind::UnexpectedCharacter,
                            "expected `//` or `/*` to start a comment",
                            "/".to_string(),
                            start,
                        );
                        if !self.options.error_recovery {
                            return Err(err);
                        }
                        self.errors.push(err);
                        self.emit(out, TokenKind::Error, start, start + 1, TokenFlags::empty(), 0)?;
                        // current byte is reprocessed in Normal context
                    }
                }
                Context::InLineComment => {
                    if b == b'\n' {
                        self.complete_comment(out, chunk, i, g, TokenFlags::empty())?;
                        // the newline is lexed as whitespace
                    } else {
                        i += 1;
                    }
                }
                Context::InBlockComment => {
                    if self.block_comment_star && b == b'/' {
                        self.complete_comment(
                            out,
                            chunk,
                            i + 1,
                            g + 1,
                            TokenFlags::MULTILINE_COMMENT,
                        )?;
                        i += 1;
                    } else {
                        self.block_comment_star = b == b'*';
                        i += 1;
                    }
                }
            }
        }

        // Retain the incomplete remainder; the next feed (or finish) picks
        // it up where this chunk left off.
        match self.context {
            Context::Normal | Context::InWhitespace => {}
            _ => {
                let from = self.token_start.saturating_sub(base).min(bytes.len());
                self.scratch.push_str(&chunk[from..]);
            }
        }
        self.pos = base + bytes.len();

        Ok(out.len() - before)
    }

    /// Signal the end of the input: completes or rejects any pending token
    /// and emits the final `Eof` token.
    pub fn finish(&mut self) -> Result<Vec<Token>, Error> {
        let mut out = Vec::new();
        let end = self.pos;
        self.chunk_base = end;
        self.finished = true;

        match self.context {
            Context::Normal => {}
            Context::InWhitespace => self.emit_whitespace(&mut out, end)?,
            Context::InNumber => self.complete_number(&mut out, "", 0, end)?,
            Context::InLineComment => self.complete_comment(&mut out, "", 0, end, TokenFlags::empty())?,
            Context::InString | Context::InEscape | Context::InUnicodeEscape => {
                self.pending_error(
                    &mut out,
                    ErrorKind::UnterminatedString,
                    "unterminated string",
                    end,
                )?;
            }
            Context::InLiteral => {
                let message = format!("expected `{}`", self.literal);
                self.pending_error(&mut out, ErrorKind::InvalidLiteral, message, end)?;
            }
            Context::InCommentOpen => {
                self.pending_error(
                    &mut out,
                    ErrorKind::UnexpectedCharacter,
                    "expected `//` or `/*` to start a comment",
                    end,
                )?;
            }
            Context::InBlockComment => {
                self.pending_error(
                    &mut out,
                    ErrorKind::UnterminatedComment,
                    "unterminated block comment",
                    end,
                )?;
            }
        }
        self.context = Context::Normal;

        self.emit(&mut out, TokenKind::Eof, end, end, TokenFlags::empty(), 0)?;
        Ok(out)
    }

    /// The text of a token whose [`TokenFlags::CONTINUATION`] flag is set,
    /// looked up by the token's aux word.
    pub fn continuation_text(&self, aux: u32) -> &str {
        &self.assembled[aux as usize]
    }

    /// Errors recorded while lexing in recovery mode.
    pub fn errors(&self) -> &[Error] {
        self.errors.as_slice()
    }

    pub(crate) fn take_errors(&mut self) -> Vec<Error> {
        std::mem::take(&mut self.errors)
    }

    pub(crate) fn limit_tracker(&self) -> LimitTracker {
        self.limit
    }

    /// Global byte offset of the next unread byte.
    pub fn pos(&self) -> usize {
        self.pos
    }

    /// Current nesting depth.
    pub fn depth(&self) -> u8 {
        self.depth
    }

    /// Whether a token is in progress at the current chunk boundary.
    pub fn is_mid_token(&self) -> bool {
        !matches!(self.context, Context::Normal | Context::InWhitespace)
    }

    fn in_object(&self) -> bool {
        self.depth > 0 && self.object_bits[(self.depth >> 6) as usize] & (1 << (self.depth & 63)) != 0
    }

    fn push_container(&mut self, is_object: bool) {
        if self.depth < u8::MAX {
            self.depth += 1;
        }
        let word = (self.depth >> 6) as usize;
        let bit = 1u64 << (self.depth & 63);
        if is_object {
            self.object_bits[word] |= bit;
        } else {
            self.object_bits[word] &= !bit;
        }
    }

    fn pop_container(&mut self) {
        self.depth = self.depth.saturating_sub(1);
    }

    /// Append one completed token, updating depth and key expectations.
    fn emit(
        &mut self,
        out: &mut Vec<Token>,
        kind: TokenKind,
        start: usize,
        end: usize,
        flags: TokenFlags,
        aux: u32,
    ) -> Result<(), Error> {
        self.limit.consume();
        if self.limit.limited() {
            return Err(Error::limit("token limit reached, aborting lexing", start));
        }

        let depth = match kind {
            TokenKind::ObjectStart => {
                let depth = self.depth;
                self.push_container(true);
                self.expect_key = true;
                depth
            }
            TokenKind::ArrayStart => {
                let depth = self.depth;
                self.push_container(false);
                self.expect_key = false;
                depth
            }
            TokenKind::ObjectEnd | TokenKind::ArrayEnd => {
                self.pop_container();
                self.expect_key = false;
                self.depth
            }
            TokenKind::Comma => {
                self.expect_key = self.in_object();
                self.depth
            }
            TokenKind::Colon => {
                self.expect_key = false;
                self.depth
            }
            _ => self.depth,
        };

        out.push(Token::new(kind, Span::new(start, end), depth, flags, aux));
        Ok(())
    }

    /// Continuation bookkeeping for the pending token ending at `end_local`
    /// within `chunk`. Returns the flags/aux pair to stamp on the token.
    fn pending_text(&mut self, chunk: &str, end_local: usize) -> (TokenFlags, u32) {
        if self.scratch.is_empty() {
            debug_assert!(self.token_start >= self.chunk_base);
            (TokenFlags::empty(), 0)
        } else {
            let mut text = std::mem::take(&mut self.scratch);
            text.push_str(&chunk[..end_local]);
            self.assembled.push(text);
            (TokenFlags::CONTINUATION, (self.assembled.len() - 1) as u32)
        }
    }

    /// The raw text of the pending token ending at `end_local`, borrowed
    /// from the chunk when possible.
    fn pending_raw<'a>(&'a self, chunk: &'a str, end_local: usize) -> &'a str {
        if self.scratch.is_empty() {
            &chunk[self.token_start - self.chunk_base..end_local]
        } else {
            // Only called before `pending_text` consumes the scratch, and
            // only when the whole pending text is needed; the chunk part is
            // appended by the caller.
            self.scratch.as_str()
        }
    }

    fn emit_whitespace(&mut self, out: &mut Vec<Token>, end: usize) -> Result<(), Error> {
        let start = self.token_start;
        let flags = if start < self.chunk_base {
            TokenFlags::CONTINUATION
        } else {
            TokenFlags::empty()
        };
        self.context = Context::Normal;
        self.emit(out, TokenKind::Whitespace, start, end, flags, 0)
    }

    fn complete_string(
        &mut self,
        out: &mut Vec<Token>,
        chunk: &str,
        end_local: usize,
        end: usize,
    ) -> Result<(), Error> {
        let kind = if self.in_object() && self.expect_key {
            TokenKind::PropertyName
        } else {
            TokenKind::StringValue
        };
        let (mut flags, aux) = self.pending_text(chunk, end_local);
        if self.string_has_escapes {
            flags.insert(TokenFlags::HAS_ESCAPES);
        }
        let start = self.token_start;
        self.context = Context::Normal;
        self.emit(out, kind, start, end, flags, aux)
    }

    fn complete_number(
        &mut self,
        out: &mut Vec<Token>,
        chunk: &str,
        end_local: usize,
        end: usize,
    ) -> Result<(), Error> {
        let n = self.number;
        let structurally_valid =
            n.has_digit && (!n.has_dot || n.has_fraction) && (!n.has_e || n.has_exponent_digit);

        // RFC 8259: no leading zero in the mantissa. Exponent digits are
        // exempt, so `1e01` is fine while `01` is not.
        let mut raw = self.pending_raw(chunk, end_local).to_string();
        if !self.scratch.is_empty() {
            raw.push_str(&chunk[..end_local]);
        }
        let mantissa = raw.strip_prefix('-').unwrap_or(&raw);
        let leading_zero = mantissa.len() > 1
            && mantissa.starts_with('0')
            && mantissa.as_bytes()[1].is_ascii_digit();

        if !structurally_valid || leading_zero {
            let message = if leading_zero {
                format!("numbers cannot have leading zeros, got `{raw}`")
            } else {
                format!("`{raw}` is not a valid number")
            };
            let start = self.token_start;
            let err = Error::new(ErrorKind::InvalidNumber, message, raw, start);
            if !self.options.error_recovery {
                return Err(err);
            }
            self.errors.push(err);
            let (flags, aux) = self.pending_text(chunk, end_local);
            self.context = Context::Normal;
            return self.emit(out, TokenKind::Error, start, end, flags, aux);
        }

        let (mut flags, aux) = self.pending_text(chunk, end_local);
        if n.has_dot || n.has_e {
            flags.insert(TokenFlags::IS_FLOAT);
        }
        if n.has_minus {
            flags.insert(TokenFlags::IS_NEGATIVE);
        }
        if n.has_e {
            flags.insert(TokenFlags::IS_SCIENTIFIC);
        }
        let start = self.token_start;
        self.context = Context::Normal;
        self.emit(out, TokenKind::NumberValue, start, end, flags, aux)
    }

    fn complete_comment(
        &mut self,
        out: &mut Vec<Token>,
        chunk: &str,
        end_local: usize,
        end: usize,
        extra: TokenFlags,
    ) -> Result<(), Error> {
        let (flags, aux) = self.pending_text(chunk, end_local);
        let start = self.token_start;
        self.context = Context::Normal;
        self.emit(out, TokenKind::Comment, start, end, flags | extra, aux)
    }

    /// Reject the pending token at end of input.
    fn pending_error(
        &mut self,
        out: &mut Vec<Token>,
        kind: ErrorKind,
        message: impl Into<String>,
        end: usize,
    ) -> Result<(), Error> {
        let start = self.token_start;
        let data = std::mem::take(&mut self.scratch);
        let err = Error::new(kind, message, data.clone(), start);
        if !self.options.error_recovery {
            return Err(err);
        }
        self.errors.push(err);
        let (flags, aux) = if data.is_empty() {
            (TokenFlags::empty(), 0)
        } else {
            self.assembled.push(data);
            (TokenFlags::CONTINUATION, (self.assembled.len() - 1) as u32)
        };
        self.emit(out, TokenKind::Error, start, end, flags, aux)
    }

    /// Handle a byte no token can start with. Returns how many bytes to
    /// skip (the full UTF-8 sequence) in recovery mode.
    fn unexpected_character(
        &mut self,
        out: &mut Vec<Token>,
        chunk: &str,
        i: usize,
        g: usize,
    ) -> Result<usize, Error> {
        let ch = chunk[i..]
            .chars()
            .next()
            .expect("chunk index is a char boundary");
        let err = Error::new(
            ErrorKind::UnexpectedCharacter,
            format!("unexpected character `{ch}`"),
            ch.to_string(),
            g,
        );
        if !self.options.error_recovery {
            return Err(err);
        }
        self.errors.push(err);
        let len = ch.len_utf8();
        self.emit(out, TokenKind::Error, g, g + len, TokenFlags::empty(), 0)?;
        Ok(len)
    }

    /// Reject a `true`/`false`/`null` prefix mismatch.
    fn invalid_literal(
        &mut self,
        out: &mut Vec<Token>,
        chunk: &str,
        end_local: usize,
        end: usize,
    ) -> Result<(), Error> {
        let mut data = self.pending_raw(chunk, end_local).to_string();
        if !self.scratch.is_empty() {
            data.push_str(&chunk[..end_local]);
        }
        let start = self.token_start;
        let err = Error::new(
            ErrorKind::InvalidLiteral,
            format!("expected `{}`, got `{data}`", self.literal),
            data,
            start,
        );
        if !self.options.error_recovery {
            return Err(err);
        }
        self.errors.push(err);
        let (flags, aux) = self.pending_text(chunk, end_local);
        self.context = Context::Normal;
        self.emit(out, TokenKind::Error, start, end, flags, aux)
    }
}
