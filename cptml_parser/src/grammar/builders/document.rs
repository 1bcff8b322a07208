//! Node sequence and document builders
//!
//! The same loop parses the top level of a document, the content of a curly
//! tag after `;` and the body of a `<>` node list. Only the closer that ends
//! the sequence differs, which is what [`Terminator`] selects.

use super::comments::parse_comment;
use super::tags::{parse_curly_tag, parse_pointy_head, parse_pointy_tail};
use super::values::parse_node_list;
use super::Parser;
use crate::grammar::ast::{Document, Node, TextNode};
use crate::syntax::{SyntaxError, SyntaxResult};
use crate::utils::{Position, Span};

/// What ends a node sequence
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Terminator {
    /// Top level of a document
    EndOfInput,
    /// Content of a curly tag: stops before `}`
    CurlyClose,
    /// Body of a node list: stops before `</>`
    NodeListClose,
}

/// Parse node* until the terminator (left unconsumed) or end of input.
///
/// Reaching end of input inside a curly tag or node list is not reported
/// here; the enclosing builder sees its closer missing and reports that.
pub fn parse_nodes<'src>(
    parser: &mut dyn Parser<'src>,
    terminator: Terminator,
) -> SyntaxResult<Vec<Node>> {
    let mut nodes = Vec::new();

    while let Some(ch) = parser.peek() {
        let node = match ch {
            '{' if parser.starts_with("{%") => Node::Comment(parse_comment(parser)?),
            '{' => Node::CurlyTag(parse_curly_tag(parser)?),
            '}' if terminator == Terminator::CurlyClose => break,
            '}' => return Err(dangling_brace(parser)),
            '<' if parser.starts_with("</>") => {
                if terminator == Terminator::NodeListClose {
                    break;
                }
                return Err(SyntaxError::DanglingClose {
                    delimiter: "</>".to_string(),
                    span: Span::new(parser.position(), parser.position().advance_str("</>")),
                });
            }
            '<' if parser.starts_with("<>") => Node::NodeList(parse_node_list(parser)?),
            '<' => Node::PointyHead(parse_pointy_head(parser)?),
            '|' => Node::PointyTail(parse_pointy_tail(parser)?),
            '>' => {
                return Err(SyntaxError::DanglingClose {
                    delimiter: ">".to_string(),
                    span: Span::of_char(parser.position(), '>'),
                })
            }
            _ => match parser.scanner().read_text_run()? {
                Some(text) => Node::Text(TextNode {
                    text: text.value,
                    span: text.span,
                }),
                None => break,
            },
        };
        nodes.push(node);
    }

    Ok(nodes)
}

/// A `}` with nothing open. When it follows a `%` the pair reads as a
/// comment closer, which gets its own error.
fn dangling_brace(parser: &dyn Parser<'_>) -> SyntaxError {
    let pos = parser.position();
    let brace = Span::of_char(pos, '}');

    if parser.scanner_ref().previous_char() == Some('%') && pos.offset > 0 {
        let percent = Position::new(pos.offset - 1, pos.line, pos.column.saturating_sub(1).max(1));
        return SyntaxError::DanglingCommentClose {
            span: Span::new(percent, brace.end()),
        };
    }
    SyntaxError::DanglingClose {
        delimiter: "}".to_string(),
        span: brace,
    }
}

/// Parse document ::= node*
pub fn parse_document<'src>(parser: &mut dyn Parser<'src>) -> SyntaxResult<Document> {
    let start = parser.position();
    let nodes = parse_nodes(parser, Terminator::EndOfInput)?;
    Ok(Document::new(nodes, parser.span_from(start)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grammar::builders::test_support::parser;
    use crate::lexical::LexerError;
    use assert_matches::assert_matches;

    fn document(source: &str) -> SyntaxResult<Document> {
        parse_document(&mut parser(source))
    }

    #[test]
    fn test_escaped_delimiters_form_a_single_text_node() {
        let doc = document(r"\{\}\<\|\>").unwrap();
        assert_eq!(doc.nodes.len(), 1);
        assert_eq!(doc.nodes[0].as_text(), Some("{}<|>"));
    }

    #[test]
    fn test_other_backslashes_are_literal() {
        let doc = document(r"a\b \\").unwrap();
        assert_eq!(doc.nodes[0].as_text(), Some(r"a\b \\"));
    }

    #[test]
    fn test_whitespace_is_preserved_in_text() {
        let doc = document("  line one\n\tline two  ").unwrap();
        assert_eq!(doc.nodes.len(), 1);
        assert_eq!(doc.nodes[0].as_text(), Some("  line one\n\tline two  "));
    }

    #[test]
    fn test_comment_node() {
        let doc = document("{%hi%}").unwrap();
        assert_eq!(doc.nodes.len(), 1);
        assert_matches!(&doc.nodes[0], Node::Comment(c) if c.body() == "hi");
    }

    #[test]
    fn test_pointy_tags_stay_flat() {
        let doc = document(r#"<x a="s"|text|x>"#).unwrap();
        assert_eq!(doc.nodes.len(), 3);
        assert_matches!(&doc.nodes[0], Node::PointyHead(head) if head.attributes.len() == 1);
        assert_eq!(doc.nodes[1].as_text(), Some("text"));
        assert_matches!(&doc.nodes[2], Node::PointyTail(tail) if tail.name.local == "x");
        assert_eq!(doc.span.len(), 16);
    }

    #[test]
    fn test_mixed_content() {
        let doc = document("Hello {b; world}! {% note %}<>{i}</>").unwrap();
        let kinds: Vec<&str> = doc.nodes.iter().map(Node::kind).collect();
        assert_eq!(kinds, ["text", "curly_tag", "text", "comment", "node_list"]);
    }

    #[test]
    fn test_dangling_closers() {
        assert_matches!(
            document("{% a %} c %}"),
            Err(SyntaxError::DanglingCommentClose { span }) if span.start().offset == 10 && span.len() == 2
        );
        assert_matches!(document("a } b"), Err(SyntaxError::DanglingClose { delimiter, .. }) if delimiter == "}");
        assert_matches!(document("a > b"), Err(SyntaxError::DanglingClose { delimiter, .. }) if delimiter == ">");
        assert_matches!(document("a </> b"), Err(SyntaxError::DanglingClose { delimiter, .. }) if delimiter == "</>");
        assert_matches!(document("{p; </>}"), Err(SyntaxError::DanglingClose { .. }));
    }

    #[test]
    fn test_unterminated_constructs() {
        assert_matches!(document("{p; open"), Err(SyntaxError::UnterminatedTag { .. }));
        assert_matches!(document("<>open"), Err(SyntaxError::UnterminatedNodeList { .. }));
        assert_matches!(
            document("{% open"),
            Err(SyntaxError::Lexical(LexerError::UnterminatedComment { .. }))
        );
    }

    #[test]
    fn test_empty_document() {
        let doc = document("").unwrap();
        assert!(doc.is_empty());
        assert!(doc.span.is_empty());
    }
}
