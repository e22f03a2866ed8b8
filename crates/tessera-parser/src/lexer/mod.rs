mod lookup;
mod stream;
mod token;
mod token_kind;

use crate::error::Error;
use crate::limit::LimitTracker;

pub use stream::StreamLexer;
pub use token::{Token, TokenFlags};
pub use token_kind::TokenKind;

/// Options controlling lexing.
///
/// The defaults are strict RFC 8259. [`LexerOptions::json5`] enables the
/// JSON5 superset: `//` and `/* */` comments, trailing commas in containers,
/// and single-quoted strings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct LexerOptions {
    /// Accept `//` and `/* */` comments (JSON5).
    pub allow_comments: bool,
    /// Accept a trailing comma before `]` or `}` (JSON5). The lexer itself
    /// emits commas unconditionally; this flag is read by the parser.
    pub allow_trailing_commas: bool,
    /// Accept single-quoted strings (JSON5).
    pub allow_single_quotes: bool,
    /// Skip unexpected input with `Error` tokens instead of failing on the
    /// first lexical error.
    pub error_recovery: bool,
}

impl LexerOptions {
    /// The JSON5 superset, with error recovery off.
    pub fn json5() -> Self {
        Self {
            allow_comments: true,
            allow_trailing_commas: true,
            allow_single_quotes: true,
            error_recovery: false,
        }
    }

    pub fn allow_comments(mut self, value: bool) -> Self {
        self.allow_comments = value;
        self
    }

    pub fn allow_trailing_commas(mut self, value: bool) -> Self {
        self.allow_trailing_commas = value;
        self
    }

    pub fn allow_single_quotes(mut self, value: bool) -> Self {
        self.allow_single_quotes = value;
        self
    }

    pub fn error_recovery(mut self, value: bool) -> Self {
        self.error_recovery = value;
        self
    }
}

/// Lex a complete source in one call.
///
/// With `error_recovery` off this fails on the first lexical error; with it
/// on, malformed input turns into `Error` tokens and the error list is
/// available through [`Lexer`] instead.
///
/// ## Example
/// ```rust
/// use tessera_parser::{lex, LexerOptions, ErrorKind};
///
/// let tokens = lex("[1, 2, 3]", &LexerOptions::default()).unwrap();
/// assert_eq!(tokens.len(), 10); // including whitespace and EOF
///
/// let err = lex("[01]", &LexerOptions::default()).unwrap_err();
/// assert_eq!(err.kind(), ErrorKind::InvalidNumber);
/// ```
pub fn lex(source: &str, options: &LexerOptions) -> Result<Vec<Token>, Error> {
    let mut stream = StreamLexer::new(*options);
    let mut tokens = stream.feed(source)?;
    tokens.extend(stream.finish()?);
    Ok(tokens)
}

/// Batch lexer: tokenizes a whole source eagerly, recovering from lexical
/// errors so that every input produces a token vector.
pub struct Lexer {
    tokens: Vec<Token>,
    errors: Vec<Error>,
    limit: LimitTracker,
}

impl Lexer {
    /// Tokenize `input` with the default (strict JSON) options.
    pub fn new(input: &str) -> Self {
        Self::with_options(input, LexerOptions::default())
    }

    /// Tokenize `input` with explicit options. Recovery is always enabled
    /// here; use [`lex`] for fail-fast behavior.
    pub fn with_options(input: &str, options: LexerOptions) -> Self {
        Self::with_options_and_limit(input, options, usize::MAX)
    }

    pub(crate) fn with_options_and_limit(
        input: &str,
        options: LexerOptions,
        token_limit: usize,
    ) -> Self {
        let mut stream = StreamLexer::new(options.error_recovery(true)).with_limit(token_limit);
        let mut tokens = Vec::new();
        let mut errors = Vec::new();

        // The only error a recovering lexer surfaces is the token limit;
        // everything else becomes an `Error` token.
        match stream
            .feed_into(input, &mut tokens)
            .and_then(|_| stream.finish())
        {
            Ok(tail) => tokens.extend(tail),
            Err(err) => errors.push(err),
        }
        errors.extend(stream.take_errors());
        // Report errors in source order; limit errors land at the abort
        // position which is always the furthest point reached.
        errors.sort_by_key(|e| e.index());

        Self {
            tokens,
            errors,
            limit: stream.limit_tracker(),
        }
    }

    /// Get a reference to the lexer's tokens.
    pub fn tokens(&self) -> &[Token] {
        self.tokens.as_slice()
    }

    /// Get a reference to the lexer's errors.
    pub fn errors(&self) -> &[Error] {
        self.errors.as_slice()
    }

    /// Token-limit usage for this lex.
    pub fn limit_tracker(&self) -> LimitTracker {
        self.limit
    }

    pub(crate) fn into_parts(self) -> (Vec<Token>, Vec<Error>, LimitTracker) {
        (self.tokens, self.errors, self.limit)
    }
}

impl IntoIterator for Lexer {
    type Item = Token;
    type IntoIter = std::vec::IntoIter<Token>;

    fn into_iter(self) -> Self::IntoIter {
        self.tokens.into_iter()
    }
}
