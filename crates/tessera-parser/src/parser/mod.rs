mod grammar;
mod unescape;

use crate::error::{Error, ErrorKind};
use crate::lexer::{Lexer, LexerOptions, Token, TokenKind};
use crate::limit::LimitTracker;
use crate::tree::{Node, NodeId, SyntaxTree, TreeBuilder};
use crate::Span;

pub(crate) use unescape::unescape;

/// Options controlling parsing.
///
/// The JSON5 toggles mirror [`LexerOptions`]; the parser forwards them to
/// its internal lexer and additionally honors `allow_trailing_commas` when
/// closing containers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ParserOptions {
    /// Accept `//` and `/* */` comments (JSON5).
    pub allow_comments: bool,
    /// Accept a trailing comma before `]` or `}` (JSON5).
    pub allow_trailing_commas: bool,
    /// Accept single-quoted strings (JSON5).
    pub allow_single_quotes: bool,
    /// Maximum nesting depth before the parse is aborted.
    pub max_depth: usize,
    /// Maximum number of tokens to lex before the parse is truncated.
    pub token_limit: usize,
}

/// Chosen so that deeply nested hostile inputs fail with a clean
/// `DepthExceeded` error long before the call stack is in danger.
pub const DEFAULT_MAX_DEPTH: usize = 100;

impl Default for ParserOptions {
    fn default() -> Self {
        Self {
            allow_comments: false,
            allow_trailing_commas: false,
            allow_single_quotes: false,
            max_depth: DEFAULT_MAX_DEPTH,
            token_limit: usize::MAX,
        }
    }
}

impl ParserOptions {
    /// The JSON5 superset.
    pub fn json5() -> Self {
        Self {
            allow_comments: true,
            allow_trailing_commas: true,
            allow_single_quotes: true,
            ..Self::default()
        }
    }

    pub fn max_depth(mut self, value: usize) -> Self {
        self.max_depth = value;
        self
    }

    pub fn token_limit(mut self, value: usize) -> Self {
        self.token_limit = value;
        self
    }

    pub(crate) fn lexer(&self) -> LexerOptions {
        LexerOptions {
            allow_comments: self.allow_comments,
            allow_trailing_commas: self.allow_trailing_commas,
            allow_single_quotes: self.allow_single_quotes,
            error_recovery: true,
        }
    }
}

/// Parse JSON (or JSON5) into a typed syntax tree.
///
/// The parser always records diagnostics and always produces a tree,
/// possibly containing `Error` nodes, with one exception: exceeding the
/// configured nesting depth aborts the parse with a hard error.
///
/// ## Example
/// ```rust
/// use tessera_parser::Parser;
///
/// let input = r#"
/// {
///     "name": "Alice",
///     "pets": [{"kind": "cat"}, {"kind": "dog"}]
/// }
/// "#;
/// let tree = Parser::new(input).parse().unwrap();
/// assert!(tree.errors().is_empty());
/// ```
#[derive(Debug)]
pub struct Parser<'input> {
    source: &'input str,
    options: ParserOptions,
    /// Tokens supplied by the caller instead of lexing `source`.
    provided: Option<Vec<Token>>,
    tokens: Vec<Token>,
    cursor: usize,
    builder: TreeBuilder,
    /// The list of syntax errors we've accumulated so far.
    errors: Vec<Error>,
    /// The limit to apply to nesting depth while parsing.
    recursion: LimitTracker,
    /// Accept parsing errors?
    accept_errors: bool,
    /// Reusable child collectors; the temp-arena side of the parse.
    scratch: Vec<Vec<NodeId>>,
}

impl<'input> Parser<'input> {
    /// Create a new instance of a parser given an input string.
    pub fn new(source: &'input str) -> Self {
        Self::with_options(source, ParserOptions::default())
    }

    /// Create a parser with explicit options.
    pub fn with_options(source: &'input str, options: ParserOptions) -> Self {
        Self {
            source,
            options,
            provided: None,
            tokens: Vec::new(),
            cursor: 0,
            builder: TreeBuilder::with_capacity(0),
            errors: Vec::new(),
            recursion: LimitTracker::new(options.max_depth),
            accept_errors: true,
            scratch: Vec::new(),
        }
    }

    /// Create a parser over an already-lexed token vector. The tokens'
    /// spans must index into `source`.
    pub fn from_tokens(tokens: Vec<Token>, source: &'input str, options: ParserOptions) -> Self {
        let mut parser = Self::with_options(source, options);
        parser.provided = Some(tokens);
        parser
    }

    /// Configure the maximum nesting depth. Defaults to
    /// [`DEFAULT_MAX_DEPTH`].
    pub fn max_depth(mut self, max_depth: usize) -> Self {
        self.options.max_depth = max_depth;
        self.recursion = LimitTracker::new(max_depth);
        self
    }

    /// Configure the limit on the number of tokens to parse. If an input
    /// document is too big, parsing will be truncated.
    ///
    /// By default, there is no limit.
    pub fn token_limit(mut self, token_limit: usize) -> Self {
        self.options.token_limit = token_limit;
        self
    }

    /// Parse the input.
    pub fn parse(mut self) -> Result<SyntaxTree, Error> {
        let token_tracker = self.prepare_tokens();
        self.builder = TreeBuilder::with_capacity(estimate_nodes(&self.tokens));

        self.skip_trivia();
        let value = if self.at(TokenKind::Eof) {
            self.err_current("expected a value");
            None
        } else {
            Some(grammar::value(&mut self)?)
        };
        self.skip_trivia();
        if !self.at(TokenKind::Eof) {
            self.err_current("expected end of input");
        }

        let span = match value {
            Some(id) => self.builder.span_of(id),
            None => Span::empty(0),
        };
        let root = self.builder.alloc(Node::Root { value }, span);

        self.errors.sort_by_key(|e| e.index());
        Ok(self.builder.finish(
            self.source,
            root,
            self.errors,
            self.recursion,
            token_tracker,
        ))
    }

    /// Lex (or adopt) the token vector and guarantee EOF termination.
    fn prepare_tokens(&mut self) -> LimitTracker {
        let tracker = match self.provided.take() {
            Some(tokens) => {
                self.tokens = tokens;
                LimitTracker::default()
            }
            None => {
                let lexer = Lexer::with_options_and_limit(
                    self.source,
                    self.options.lexer(),
                    self.options.token_limit,
                );
                let (tokens, errors, tracker) = lexer.into_parts();
                self.tokens = tokens;
                self.errors = errors;
                tracker
            }
        };
        // Note: after a limit error is recorded, any further errors pushed
        // are silently discarded; an early termination would otherwise
        // produce a cascade of spurious diagnostics.
        self.accept_errors = !self.errors.iter().any(Error::is_limit);
        if self.tokens.last().map(Token::kind) != Some(TokenKind::Eof) {
            let end = self
                .tokens
                .last()
                .map(|t| t.span().end())
                .unwrap_or(self.source.len());
            self.tokens.push(Token::new(
                TokenKind::Eof,
                Span::empty(end),
                0,
                Default::default(),
                0,
            ));
        }
        tracker
    }

    /// The current token. The vector is EOF-terminated, so this never runs
    /// off the end.
    pub(crate) fn current(&self) -> &Token {
        &self.tokens[self.cursor.min(self.tokens.len() - 1)]
    }

    /// Peek the current token's kind.
    pub(crate) fn peek(&self) -> TokenKind {
        self.current().kind()
    }

    /// Check if the current token is `kind`.
    pub(crate) fn at(&self, kind: TokenKind) -> bool {
        self.peek() == kind
    }

    /// Consume the current token, then skip any trivia that follows.
    pub(crate) fn bump(&mut self) -> Token {
        let token = *self.current();
        if self.cursor < self.tokens.len() - 1 {
            self.cursor += 1;
        }
        self.skip_trivia();
        token
    }

    pub(crate) fn skip_trivia(&mut self) {
        while self.current().kind().is_trivia() && self.cursor < self.tokens.len() - 1 {
            self.cursor += 1;
        }
    }

    /// Record an `UnexpectedToken` error at the current token.
    pub(crate) fn err_current(&mut self, expected: &str) {
        let token = *self.current();
        if token.kind() == TokenKind::Eof {
            self.push_err(Error::eof(
                ErrorKind::UnexpectedToken,
                format!("{expected}, got end of input"),
                token.index(),
            ));
        } else {
            let data = token.text(self.source).to_string();
            self.push_err(Error::new(
                ErrorKind::UnexpectedToken,
                format!("{expected}, got `{data}`"),
                data,
                token.index(),
            ));
        }
    }

    /// Push an error to the parser's error Vec.
    pub(crate) fn push_err(&mut self, err: Error) {
        if self.accept_errors {
            self.errors.push(err);
        }
    }

    /// Enter a nested container; fails once nesting exceeds the limit.
    pub(crate) fn descend(&mut self) -> Result<(), Error> {
        self.recursion.consume();
        if self.recursion.limited() {
            return Err(Error::new(
                ErrorKind::DepthExceeded,
                format!(
                    "maximum nesting depth of {} exceeded",
                    self.recursion.limit
                ),
                String::new(),
                self.current().index(),
            ));
        }
        Ok(())
    }

    pub(crate) fn ascend(&mut self) {
        self.recursion.release();
    }

    pub(crate) fn builder(&mut self) -> &mut TreeBuilder {
        &mut self.builder
    }

    pub(crate) fn source(&self) -> &'input str {
        self.source
    }

    pub(crate) fn options(&self) -> &ParserOptions {
        &self.options
    }

    /// Borrow a reusable child collector from the temp pool.
    pub(crate) fn take_scratch(&mut self) -> Vec<NodeId> {
        self.scratch.pop().unwrap_or_default()
    }

    /// Return a collector after its contents were copied into the arena.
    pub(crate) fn put_scratch(&mut self, mut collector: Vec<NodeId>) {
        collector.clear();
        self.scratch.push(collector);
    }

    /// Skip tokens until a recovery point inside a container whose members
    /// carry lexer depth `member_depth`: the next separating comma, the
    /// matching close delimiter, or EOF. A separating comma is consumed.
    ///
    /// Everything skipped becomes one `Error` node so the surrounding
    /// container can still be built.
    pub(crate) fn recover(&mut self, member_depth: u8, message: &str) -> NodeId {
        let start = self.current().span().start();
        let mut end = start;
        loop {
            let token = *self.current();
            match token.kind() {
                TokenKind::Eof => break,
                TokenKind::Comma if token.depth() == member_depth => {
                    self.bump();
                    break;
                }
                TokenKind::ObjectEnd | TokenKind::ArrayEnd
                    if token.depth() as u16 + 1 == member_depth as u16 =>
                {
                    break;
                }
                _ => {
                    end = token.span().end();
                    self.bump();
                }
            }
        }
        self.builder.alloc(
            Node::Error {
                message: message.into(),
                partial: None,
            },
            Span::new(start, end),
        )
    }
}

/// Node-pool sizing heuristic: every value-ish token contributes about one
/// node, plus 20% overhead for property wrappers and the root.
fn estimate_nodes(tokens: &[Token]) -> usize {
    let count = tokens
        .iter()
        .filter(|t| t.kind().starts_value())
        .count();
    count + count / 5 + 2
}
