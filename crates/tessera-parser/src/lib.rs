#![doc = include_str!("../README.md")]

mod error;
mod lexer;
mod limit;
mod parser;
mod span;
mod tree;

pub use crate::error::{Error, ErrorKind};
pub use crate::lexer::{lex, Lexer, LexerOptions, StreamLexer, Token, TokenFlags, TokenKind};
pub use crate::limit::LimitTracker;
pub use crate::parser::{Parser, ParserOptions, DEFAULT_MAX_DEPTH};
pub use crate::span::Span;
pub use crate::tree::{Children, Node, NodeId, Preorder, StrRef, SyntaxTree};

/// Lex and parse `source` with default (strict RFC 8259) options.
pub fn parse(source: &str) -> Result<SyntaxTree, Error> {
    Parser::new(source).parse()
}

/// Lex and parse `source` with explicit options.
pub fn parse_with(source: &str, options: ParserOptions) -> Result<SyntaxTree, Error> {
    Parser::with_options(source, options).parse()
}
