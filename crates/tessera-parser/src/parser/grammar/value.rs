use crate::error::{Error, ErrorKind};
use crate::lexer::{TokenFlags, TokenKind};
use crate::parser::grammar::{array, object};
use crate::parser::{unescape, Parser};
use crate::tree::{Node, NodeId};
use crate::Span;

/// Parse one JSON value, dispatching on the current token kind.
///
/// ```txt
/// value = object | array | string | number | "true" | "false" | "null"
/// ```
pub(crate) fn value(p: &mut Parser) -> Result<NodeId, Error> {
    match p.peek() {
        TokenKind::StringValue | TokenKind::PropertyName => Ok(string(p)),
        TokenKind::NumberValue => Ok(number(p)),
        TokenKind::BooleanTrue | TokenKind::BooleanFalse => {
            let token = p.bump();
            Ok(p.builder().alloc(
                Node::Boolean {
                    value: token.kind() == TokenKind::BooleanTrue,
                },
                token.span(),
            ))
        }
        TokenKind::NullValue => {
            let token = p.bump();
            Ok(p.builder().alloc(Node::Null, token.span()))
        }
        TokenKind::ObjectStart => object::object(p),
        TokenKind::ArrayStart => array::array(p),
        TokenKind::Error => Ok(error_token(p)),
        TokenKind::Eof => {
            p.err_current("expected a value");
            let at = p.current().index();
            Ok(p.builder().alloc(
                Node::Error {
                    message: "expected a value".into(),
                    partial: None,
                },
                Span::empty(at),
            ))
        }
        _ => {
            p.err_current("expected a value");
            let token = p.bump();
            Ok(p.builder().alloc(
                Node::Error {
                    message: "expected a value".into(),
                    partial: None,
                },
                token.span(),
            ))
        }
    }
}

/// Build a string leaf, decoding escapes into the tree's side buffer.
/// Escape-free strings borrow straight from the source.
pub(crate) fn string(p: &mut Parser) -> NodeId {
    let token = p.bump();
    let span = token.span();
    let raw = token.text(p.source());
    // The lexer only emits string tokens for terminated strings, so both
    // quotes are present; guard anyway for caller-supplied token vectors.
    let inner = if raw.len() >= 2 { &raw[1..raw.len() - 1] } else { "" };

    if !token.flags().contains(TokenFlags::HAS_ESCAPES) && raw.len() >= 2 {
        let value = p.builder().source_str(Span::new(span.start() + 1, span.end() - 1));
        return p.builder().alloc(
            Node::String {
                value,
                lossy: false,
                bad_escape: false,
            },
            span,
        );
    }

    let decoded = unescape(inner, p.options().allow_single_quotes);
    if let Some(offset) = decoded.bad_escape {
        p.push_err(Error::new(
            ErrorKind::InvalidEscape,
            "invalid escape sequence in string",
            String::new(),
            span.start() + 1 + offset,
        ));
    }
    let value = p.builder().decoded_str(&decoded.value);
    p.builder().alloc(
        Node::String {
            value,
            lossy: decoded.lossy,
            bad_escape: decoded.bad_escape.is_some(),
        },
        span,
    )
}

/// Build a number leaf. The raw text was already shape-checked by the
/// lexer, but token vectors supplied by callers go through the same RFC
/// 8259 validation here.
fn number(p: &mut Parser) -> NodeId {
    let token = p.bump();
    let span = token.span();
    let raw = token.text(p.source());

    let mantissa = raw.strip_prefix('-').unwrap_or(raw);
    if mantissa.len() > 1 && mantissa.starts_with('0') && mantissa.as_bytes()[1].is_ascii_digit() {
        p.push_err(Error::new(
            ErrorKind::InvalidNumber,
            format!("numbers cannot have leading zeros, got `{raw}`"),
            raw.to_string(),
            span.start(),
        ));
        return p.builder().alloc(
            Node::Error {
                message: "number with leading zeros".into(),
                partial: None,
            },
            span,
        );
    }

    match raw.parse::<f64>() {
        Ok(value) => {
            let int = if raw.bytes().any(|b| matches!(b, b'.' | b'e' | b'E')) {
                None
            } else {
                raw.parse::<i64>().ok()
            };
            p.builder().alloc(Node::Number { value, int }, span)
        }
        Err(_) => {
            p.push_err(Error::new(
                ErrorKind::InvalidNumber,
                format!("`{raw}` is not a valid number"),
                raw.to_string(),
                span.start(),
            ));
            p.builder().alloc(
                Node::Error {
                    message: "invalid number".into(),
                    partial: None,
                },
                span,
            )
        }
    }
}

/// Turn an `Error` token from the lexer into an error node.
pub(crate) fn error_token(p: &mut Parser) -> NodeId {
    let token = p.bump();
    let message = format!("malformed input `{}`", token.text(p.source()));
    p.builder().alloc(
        Node::Error {
            message: message.into(),
            partial: None,
        },
        token.span(),
    )
}

#[cfg(test)]
mod tests {
    use crate::parser::grammar::test_support::check;
    use crate::tree::Node;
    use crate::{Parser, ParserOptions};
    use expect_test::expect;
    use pretty_assertions::assert_eq;

    #[test]
    fn it_parses_leaf_values() {
        check(
            "true",
            expect![[r#"
                - ROOT@0..4
                    - BOOLEAN@0..4 true
            "#]],
        );
        check(
            "null",
            expect![[r#"
                - ROOT@0..4
                    - NULL@0..4
            "#]],
        );
        check(
            r#""hi""#,
            expect![[r#"
                - ROOT@0..4
                    - STRING@0..4 "hi"
            "#]],
        );
        check(
            "-12.5e3",
            expect![[r#"
                - ROOT@0..7
                    - NUMBER@0..7 "-12.5e3"
            "#]],
        );
    }

    #[test]
    fn numbers_retain_raw_and_parse_both_forms() {
        let tree = Parser::new("[42, 2.5, 9007199254740993]").parse().unwrap();
        let root = tree.root_value().unwrap();
        let Node::Array { elements } = tree.node(root) else {
            panic!("expected an array");
        };
        let ids = tree.children(*elements).to_vec();

        assert_eq!(
            tree.node(ids[0]),
            &Node::Number {
                value: 42.0,
                int: Some(42),
            },
        );
        assert_eq!(tree.text(ids[0]), "42");

        assert_eq!(
            tree.node(ids[1]),
            &Node::Number {
                value: 2.5,
                int: None,
            },
        );

        // Beyond f64's integer precision, but exact in the i64 form and in
        // the raw text.
        let Node::Number { int, .. } = tree.node(ids[2]) else {
            panic!("expected a number");
        };
        assert_eq!(*int, Some(9007199254740993));
        assert_eq!(tree.text(ids[2]), "9007199254740993");
    }

    #[test]
    fn string_escapes_decode_into_the_tree() {
        let tree = Parser::new(r#"["a\nb", "café", "😀"]"#)
            .parse()
            .unwrap();
        assert_eq!(tree.errors(), &[]);
        let root = tree.root_value().unwrap();
        let Node::Array { elements } = tree.node(root) else {
            panic!("expected an array");
        };
        let ids = tree.children(*elements).to_vec();
        assert_eq!(tree.string_value(ids[0]), Some("a\nb"));
        assert_eq!(tree.string_value(ids[1]), Some("caf\u{e9}"));
        assert_eq!(tree.string_value(ids[2]), Some("\u{1F600}"));
    }

    #[test]
    fn lone_surrogate_is_a_diagnostic() {
        let tree = Parser::new(r#""\uD800""#).parse().unwrap();
        let root = tree.root_value().unwrap();
        let Node::String { lossy, .. } = tree.node(root) else {
            panic!("expected a string");
        };
        assert!(*lossy);
        assert_eq!(tree.string_value(root), Some("\u{FFFD}"));
    }

    #[test]
    fn bad_escape_is_reported_with_position() {
        let tree = Parser::new(r#""ab\qcd""#).parse().unwrap();
        assert_eq!(tree.errors().len(), 1);
        let err = &tree.errors()[0];
        assert_eq!(err.kind(), crate::ErrorKind::InvalidEscape);
        // `\` of the bad escape: quote + "ab".
        assert_eq!(err.index(), 3);
    }

    #[test]
    fn leading_zero_number_becomes_an_error_node() {
        check(
            "[0, 01, 2]",
            expect![[r#"
                - ROOT@0..10
                    - ARRAY@0..10
                        - NUMBER@1..2 "0"
                        - ERROR@4..6 "malformed input `01`"
                        - NUMBER@8..9 "2"
                - ERROR@4:6 InvalidNumber "numbers cannot have leading zeros, got `01`" 01
            "#]],
        );
    }

    #[test]
    fn json5_comments_are_skipped() {
        check_json5_value();
    }

    fn check_json5_value() {
        let source = "// leading\n[1, /* mid */ 2]";
        let tree = Parser::with_options(source, ParserOptions::json5())
            .parse()
            .unwrap();
        assert_eq!(tree.errors(), &[]);
        let root = tree.root_value().unwrap();
        let Node::Array { elements } = tree.node(root) else {
            panic!("expected an array");
        };
        assert_eq!(elements.len(), 2);
    }
}
