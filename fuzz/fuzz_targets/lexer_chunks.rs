#![no_main]
//! Chunk-partition equivalence: splitting the input into arbitrary chunks
//! must lex identically to lexing it in one call, modulo the continuation
//! marker.

use libfuzzer_sys::fuzz_target;
use tessera_parser::{lex, LexerOptions, StreamLexer, Token, TokenFlags, TokenKind};

fn normalized(tokens: &[Token]) -> Vec<(TokenKind, usize, usize, u8)> {
    tokens
        .iter()
        .map(|t| (t.kind(), t.span().start(), t.span().end(), t.depth()))
        .collect()
}

fuzz_target!(|data: &[u8]| {
    if data.len() < 2 {
        return;
    }
    let (seed, rest) = data.split_first().unwrap();
    let Ok(source) = std::str::from_utf8(rest) else {
        return;
    };

    let options = LexerOptions::json5().error_recovery(true);
    let Ok(batch) = lex(source, &options) else {
        return;
    };

    // Derive a chunk size from the seed byte; 0 means one char per chunk.
    let chunk_chars = (*seed as usize) % 8;
    let mut streamed = Vec::new();
    let mut lexer = StreamLexer::new(options);
    let mut buffer = String::new();
    let mut count = 0;
    for c in source.chars() {
        buffer.push(c);
        count += 1;
        if count > chunk_chars {
            lexer.feed_into(&buffer, &mut streamed).unwrap();
            buffer.clear();
            count = 0;
        }
    }
    if !buffer.is_empty() {
        lexer.feed_into(&buffer, &mut streamed).unwrap();
    }
    streamed.extend(lexer.finish().unwrap());

    assert_eq!(normalized(&streamed), normalized(&batch));

    // Continuation tokens must expose their assembled text.
    for token in &streamed {
        if token.flags().contains(TokenFlags::CONTINUATION)
            && !matches!(token.kind(), TokenKind::Whitespace | TokenKind::Error | TokenKind::Eof)
        {
            assert_eq!(lexer.continuation_text(token.aux()), token.text(source));
        }
    }
});
