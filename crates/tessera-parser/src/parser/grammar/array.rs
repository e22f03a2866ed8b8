use crate::error::{Error, ErrorKind};
use crate::lexer::TokenKind;
use crate::parser::grammar::value;
use crate::parser::Parser;
use crate::tree::{Node, NodeId};
use crate::Span;

/// Parse an array.
///
/// ```txt
/// array = "[" [ value ( "," value )* [","] ] "]"
/// ```
pub(crate) fn array(p: &mut Parser) -> Result<NodeId, Error> {
    p.descend()?;
    let open = p.bump();
    let member_depth = open.depth().saturating_add(1);
    let mut end = open.span().end();
    let mut elements = p.take_scratch();

    let result = loop {
        match p.peek() {
            TokenKind::ArrayEnd => {
                end = p.bump().span().end();
                break Ok(());
            }
            TokenKind::Eof => {
                p.err_current("expected `]`");
                end = p.current().span().end();
                break Ok(());
            }
            TokenKind::Comma => {
                p.err_current("expected a value");
                p.bump();
            }
            _ => {
                match value::value(p) {
                    Ok(id) => elements.push(id),
                    Err(err) => break Err(err),
                }
                match p.peek() {
                    TokenKind::Comma => {
                        let comma = p.bump();
                        if p.at(TokenKind::ArrayEnd) && !p.options().allow_trailing_commas {
                            p.push_err(Error::new(
                                ErrorKind::TrailingComma,
                                "trailing commas are only allowed in JSON5 mode",
                                ",".to_string(),
                                comma.index(),
                            ));
                        }
                    }
                    TokenKind::ArrayEnd | TokenKind::Eof => {}
                    _ => {
                        p.err_current("expected `,` or `]`");
                        elements.push(p.recover(member_depth, "expected `,` or `]`"));
                    }
                }
            }
        }
    };
    p.ascend();
    result?;

    let span = Span::new(open.span().start(), end);
    let children = p.builder().alloc_children(&elements);
    p.put_scratch(elements);
    Ok(p.builder().alloc(Node::Array { elements: children }, span))
}

#[cfg(test)]
mod tests {
    use crate::parser::grammar::test_support::{check, check_with};
    use crate::{ErrorKind, Parser, ParserOptions};
    use expect_test::expect;
    use pretty_assertions::assert_eq;

    #[test]
    fn it_parses_arrays() {
        check(
            r#"[1, "two", true, null]"#,
            expect![[r#"
                - ROOT@0..22
                    - ARRAY@0..22
                        - NUMBER@1..2 "1"
                        - STRING@4..9 "two"
                        - BOOLEAN@11..15 true
                        - NULL@17..21
            "#]],
        );
    }

    #[test]
    fn it_parses_empty_and_nested_arrays() {
        check(
            "[[],[[]]]",
            expect![[r#"
                - ROOT@0..9
                    - ARRAY@0..9
                        - ARRAY@1..3
                        - ARRAY@4..8
                            - ARRAY@5..7
            "#]],
        );
    }

    #[test]
    fn missing_values_between_commas() {
        let tree = Parser::new("[1,,2]").parse().unwrap();
        assert_eq!(tree.errors().len(), 1);
        assert_eq!(tree.errors()[0].kind(), ErrorKind::UnexpectedToken);
        let root = tree.root_value().unwrap();
        let crate::Node::Array { elements } = tree.node(root) else {
            panic!("expected an array");
        };
        assert_eq!(elements.len(), 2);
    }

    #[test]
    fn trailing_comma_honors_json5() {
        let tree = Parser::new("[1, 2,]").parse().unwrap();
        assert_eq!(tree.errors().len(), 1);
        assert_eq!(tree.errors()[0].kind(), ErrorKind::TrailingComma);

        check_with(
            "[1, 2,]",
            ParserOptions::json5(),
            expect![[r#"
                - ROOT@0..7
                    - ARRAY@0..7
                        - NUMBER@1..2 "1"
                        - NUMBER@4..5 "2"
            "#]],
        );
    }

    #[test]
    fn recovery_keeps_the_surrounding_array() {
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
    fn nested_garbage_is_skipped_to_the_matching_delimiter() {
        let tree = Parser::new(r#"[1, {"a": 2} {"b": 3}, 4]"#).parse().unwrap();
        let root = tree.root_value().unwrap();
        let crate::Node::Array { elements } = tree.node(root) else {
            panic!("expected an array");
        };
        let ids = tree.children(*elements).to_vec();
        // 1, the first object, the skipped garbage, then 4.
        assert_eq!(ids.len(), 4);
        assert!(matches!(tree.node(ids[1]), crate::Node::Object { .. }));
        assert!(matches!(tree.node(ids[2]), crate::Node::Error { .. }));
        assert!(matches!(tree.node(ids[3]), crate::Node::Number { .. }));
    }

    #[test]
    fn unterminated_array_reports_eof() {
        let tree = Parser::new("[1, 2").parse().unwrap();
        assert_eq!(tree.errors().len(), 1);
        assert!(tree.errors()[0].message().contains("expected `]`"));
    }
}
