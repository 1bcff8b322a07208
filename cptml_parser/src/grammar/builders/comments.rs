//! Nested comment builder

use super::Parser;
use crate::grammar::ast::{CommentNode, Node, TextNode};
use crate::lexical::LexerError;
use crate::syntax::{SyntaxError, SyntaxResult};
use crate::tokens::Token;

/// Parse comment ::= "{%" (comment_text | comment)* "%}"
///
/// A `%}` always closes the innermost open comment; every other character,
/// including a lone `{`, `}` or `%`, is comment text.
pub fn parse_comment<'src>(parser: &mut dyn Parser<'src>) -> SyntaxResult<CommentNode> {
    let start = parser.position();
    if parser.eat("{%", Token::CommentOpen).is_none() {
        return Err(SyntaxError::unexpected("'{%'", parser.peek(), start));
    }
    parser.enter("comment", start)?;

    let mut children = Vec::new();
    loop {
        if parser.eat("%}", Token::CommentClose).is_some() {
            break;
        }
        if parser.starts_with("{%") {
            children.push(Node::Comment(parse_comment(parser)?));
            continue;
        }
        match parser.scanner().read_comment_text()? {
            Some(text) => children.push(Node::Text(TextNode {
                text: text.value,
                span: text.span,
            })),
            None => {
                return Err(LexerError::UnterminatedComment {
                    span: parser.span_from(start),
                }
                .into())
            }
        }
    }

    parser.exit();
    Ok(CommentNode {
        children,
        span: parser.span_from(start),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grammar::builders::test_support::parser;
    use assert_matches::assert_matches;

    fn comment(source: &str) -> SyntaxResult<CommentNode> {
        parse_comment(&mut parser(source))
    }

    #[test]
    fn test_simple_comment() {
        let c = comment("{%hi%}").unwrap();
        assert_eq!(c.children.len(), 1);
        assert_eq!(c.children[0].as_text(), Some("hi"));
        assert_eq!(c.span.len(), 6);
    }

    #[test]
    fn test_empty_comment() {
        assert!(comment("{%%}").unwrap().children.is_empty());
    }

    #[test]
    fn test_nested_comment_does_not_close_outer() {
        let c = comment("{% a {% b %} c %}").unwrap();
        assert_eq!(c.children.len(), 3);
        assert_eq!(c.children[0].as_text(), Some(" a "));
        assert_matches!(&c.children[1], Node::Comment(inner) if inner.body() == " b ");
        assert_eq!(c.children[2].as_text(), Some(" c "));
    }

    #[test]
    fn test_lone_delimiter_chars_are_text() {
        let c = comment("{% 50% { } %}").unwrap();
        assert_eq!(c.body(), " 50% { } ");
    }

    #[test]
    fn test_unterminated_comments() {
        assert_matches!(
            comment("{% open"),
            Err(SyntaxError::Lexical(LexerError::UnterminatedComment { .. }))
        );
        assert_matches!(
            comment("{% a {% b %}"),
            Err(SyntaxError::Lexical(LexerError::UnterminatedComment { .. }))
        );
        assert_matches!(
            comment("{%}"),
            Err(SyntaxError::Lexical(LexerError::UnterminatedComment { .. }))
        );
    }
}
