use crate::Span;
use std::fmt;

/// Classification for lexical and syntactic errors.
///
/// Every [`Error`] carries exactly one kind; callers that only need to branch
/// on the failure mode can match on [`Error::kind`] and ignore the message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// The lexer saw a byte that no JSON token can start with.
    UnexpectedCharacter,
    /// The input ended inside a string.
    UnterminatedString,
    /// The input ended inside a `/* */` comment.
    UnterminatedComment,
    /// A number failed RFC 8259 validation.
    InvalidNumber,
    /// A `true`/`false`/`null` literal did not match its expected spelling.
    InvalidLiteral,
    /// An unknown or incomplete backslash sequence inside a string.
    InvalidEscape,
    /// The parser saw a token of the wrong kind.
    UnexpectedToken,
    /// A comma before `]` or `}` without JSON5 mode.
    TrailingComma,
    /// Nesting exceeded the configured maximum depth.
    DepthExceeded,
    /// A configured limit (other than depth) was hit and processing stopped.
    LimitExceeded,
}

/// An `Error` type for operations performed in the lexer and the parser.
///
/// Errors get returned alongside the resulting syntax tree if either the
/// lexer or the parser encounter lexical or syntactical errors respectively.
///
/// Check for the tree's errors before proceeding to iterate over its nodes:
///
/// ## Example
/// ```rust
/// use tessera_parser::Parser;
///
/// let input = r#"{"name": "Alice", "age": 30}"#;
/// let tree = Parser::new(input).parse().unwrap();
///
/// assert!(tree.errors().is_empty());
/// ```
#[derive(Clone, PartialEq, Eq, thiserror::Error)]
#[error("{message}")]
pub struct Error {
    pub(crate) kind: ErrorKind,
    pub(crate) message: String,
    pub(crate) data: String,
    pub(crate) index: usize,
}

impl Error {
    /// Create a new instance of `Error`.
    pub fn new<S: Into<String>>(kind: ErrorKind, message: S, data: String, index: usize) -> Self {
        Self {
            kind,
            message: message.into(),
            data,
            index,
        }
    }

    /// Create an error pointing at the end of the input.
    pub fn eof<S: Into<String>>(kind: ErrorKind, message: S, index: usize) -> Self {
        Self {
            kind,
            message: message.into(),
            data: "EOF".to_string(),
            index,
        }
    }

    /// Create an error signalling that a configured limit was reached.
    pub fn limit<S: Into<String>>(message: S, index: usize) -> Self {
        Self {
            kind: ErrorKind::LimitExceeded,
            message: message.into(),
            data: String::new(),
            index,
        }
    }

    /// The error's kind.
    pub fn kind(&self) -> ErrorKind {
        self.kind
    }

    /// The text that was found to be lexically or syntactically incorrect.
    pub fn data(&self) -> &str {
        self.data.as_ref()
    }

    /// Where the error begins in the input.
    pub fn index(&self) -> usize {
        self.index
    }

    /// The byte range the offending text occupies.
    pub fn span(&self) -> Span {
        Span::new(self.index, self.index + self.data.len())
    }

    /// The error's message.
    pub fn message(&self) -> &str {
        self.message.as_ref()
    }

    /// Whether this error was caused by a configured limit rather than by
    /// the input itself.
    pub fn is_limit(&self) -> bool {
        matches!(self.kind, ErrorKind::LimitExceeded | ErrorKind::DepthExceeded)
    }
}

impl fmt::Debug for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let start = self.index;
        let end = self.index + self.data.len();

        if self.data == "EOF" || self.data.is_empty() {
            write!(f, "ERROR@{start}:{start} {:?} {:?}", self.kind, self.message)
        } else {
            write!(
                f,
                "ERROR@{start}:{end} {:?} {:?} {}",
                self.kind, self.message, self.data
            )
        }
    }
}
