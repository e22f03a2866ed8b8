use crate::lexer::TokenKind;

static PUNCTUATION_CHARS: [Option<TokenKind>; 256] = punctuation_lut();
static WHITESPACE_CHARS: [bool; 256] = whitespace_lut();

#[inline]
pub(crate) fn punctuation_kind(byte: u8) -> Option<TokenKind> {
    PUNCTUATION_CHARS[byte as usize]
}

#[inline]
pub(crate) fn is_whitespace(byte: u8) -> bool {
    WHITESPACE_CHARS[byte as usize]
}

#[inline]
pub(crate) fn is_digit(byte: u8) -> bool {
    byte.is_ascii_digit()
}

const fn punctuation_lut() -> [Option<TokenKind>; 256] {
    let mut lut = [None; 256];
    lut[b'{' as usize] = Some(TokenKind::ObjectStart);
    lut[b'}' as usize] = Some(TokenKind::ObjectEnd);
    lut[b'[' as usize] = Some(TokenKind::ArrayStart);
    lut[b']' as usize] = Some(TokenKind::ArrayEnd);
    lut[b',' as usize] = Some(TokenKind::Comma);
    lut[b':' as usize] = Some(TokenKind::Colon);

    lut
}

/// <https://datatracker.ietf.org/doc/html/rfc8259#section-2> insignificant
/// whitespace: space, horizontal tab, line feed, carriage return.
const fn whitespace_lut() -> [bool; 256] {
    let mut lut = [false; 256];
    lut[b' ' as usize] = true;
    lut[b'\t' as usize] = true;
    lut[b'\n' as usize] = true;
    lut[b'\r' as usize] = true;

    lut
}
