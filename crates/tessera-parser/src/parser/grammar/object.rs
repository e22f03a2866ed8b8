use crate::error::{Error, ErrorKind};
use crate::lexer::TokenKind;
use crate::parser::grammar::value;
use crate::parser::Parser;
use crate::tree::{Node, NodeId};
use crate::Span;

/// Parse an object.
///
/// ```txt
/// object = "{" [ property ( "," property )* [","] ] "}"
/// ```
///
/// A parse error inside the object skips to the next separating comma or
/// the matching `}` and leaves an error node in the property list, so the
/// object itself is always built.
pub(crate) fn object(p: &mut Parser) -> Result<NodeId, Error> {
    p.descend()?;
    let open = p.bump();
    let member_depth = open.depth().saturating_add(1);
    let mut end = open.span().end();
    let mut properties = p.take_scratch();

    let result = loop {
        match p.peek() {
            TokenKind::ObjectEnd => {
                end = p.bump().span().end();
                break Ok(());
            }
            TokenKind::Eof => {
                p.err_current("expected `}`");
                end = p.current().span().end();
                break Ok(());
            }
            TokenKind::Comma => {
                p.err_current("expected a property");
                p.bump();
            }
            TokenKind::StringValue | TokenKind::PropertyName | TokenKind::Error => {
                let recovered = match property(p, member_depth) {
                    Ok((id, recovered)) => {
                        properties.push(id);
                        recovered
                    }
                    Err(err) => break Err(err),
                };
                if recovered {
                    // Recovery already consumed any separating comma.
                    continue;
                }
                match p.peek() {
                    TokenKind::Comma => {
                        let comma = p.bump();
                        if p.at(TokenKind::ObjectEnd) && !p.options().allow_trailing_commas {
                            p.push_err(Error::new(
                                ErrorKind::TrailingComma,
                                "trailing commas are only allowed in JSON5 mode",
                                ",".to_string(),
                                comma.index(),
                            ));
                        }
                    }
                    TokenKind::ObjectEnd | TokenKind::Eof => {}
                    _ => {
                        p.err_current("expected `,` or `}`");
                        properties.push(p.recover(member_depth, "expected `,` or `}`"));
                    }
                }
            }
            _ => {
                p.err_current("expected a property key");
                properties.push(p.recover(member_depth, "expected a property key"));
            }
        }
    };
    p.ascend();
    result?;

    let span = Span::new(open.span().start(), end);
    let children = p.builder().alloc_children(&properties);
    p.put_scratch(properties);
    Ok(p.builder().alloc(Node::Object { properties: children }, span))
}

/// Parse one `key: value` pair. Returns the node and whether
/// skip-to-delimiter recovery already consumed the trailing separator.
fn property(p: &mut Parser, member_depth: u8) -> Result<(NodeId, bool), Error> {
    let key = match p.peek() {
        TokenKind::Error => value::error_token(p),
        _ => value::string(p),
    };

    if p.at(TokenKind::Colon) {
        p.bump();
    } else {
        p.err_current("expected `:`");
        if !p.peek().starts_value() {
            // Nothing usable follows the key; skip to the next property.
            let error = p.recover(member_depth, "expected `:`");
            let span = p.builder().span_of(key).cover(p.builder().span_of(error));
            let id = p.builder().alloc(Node::Property { key, value: error }, span);
            return Ok((id, true));
        }
    }

    let value_id = value::value(p)?;
    let span = p
        .builder()
        .span_of(key)
        .cover(p.builder().span_of(value_id));
    let id = p.builder().alloc(
        Node::Property {
            key,
            value: value_id,
        },
        span,
    );
    Ok((id, false))
}
