//! Value builders
//!
//! Dispatch is on the next character: `t`/`f` boolean, `"` string, `[`
//! array, `{` dict, `<>` node list, any other `<` IRI, and a digit, `.`,
//! `+` or `-` number. Whitespace is skipped between collection items but
//! never before the value itself.

use super::document::{parse_nodes, Terminator};
use super::Parser;
use crate::config::compile_time::syntax::MAX_COLLECTION_ENTRIES;
use crate::grammar::ast::{DictEntry, DictKey, NodeListValue, Value};
use crate::lexical::classifier::is_identifier_continue;
use crate::syntax::{SyntaxError, SyntaxResult};
use crate::tokens::Token;
use crate::utils::{Position, Span};

/// Parse value ::= boolean | number | string | array | dict | iri | node_list
pub fn parse_value<'src>(parser: &mut dyn Parser<'src>) -> SyntaxResult<Value> {
    match parser.peek() {
        Some('t' | 'f') => match parser.scanner().read_boolean() {
            Some(boolean) => Ok(Value::Bool(boolean.value)),
            None => Err(unexpected_word(parser)),
        },
        Some('"') => Ok(Value::String(parser.scanner().read_string()?.value)),
        Some('[') => parse_array(parser),
        Some('{') => parse_dict(parser),
        Some('<') if parser.starts_with("<>") => Ok(Value::NodeList(parse_node_list(parser)?.nodes)),
        Some('<') => Ok(Value::Iri(parser.scanner().read_iri()?.value)),
        Some(ch) if ch.is_ascii_digit() || matches!(ch, '.' | '+' | '-') => {
            Ok(Value::Number(parser.scanner().read_number()?.value))
        }
        _ => Err(unexpected_word(parser)),
    }
}

/// ExpectedValue naming the whole word at the cursor, not just its first char
fn unexpected_word(parser: &dyn Parser<'_>) -> SyntaxError {
    let pos = parser.position();
    let word: String = parser
        .rest()
        .chars()
        .take_while(|c| is_identifier_continue(*c))
        .collect();

    if word.is_empty() {
        return SyntaxError::expected_value(parser.peek(), pos);
    }
    SyntaxError::ExpectedValue {
        found: format!("'{}'", word),
        span: Span::new(pos, pos.advance_str(&word)),
    }
}

/// Parse node_list ::= "<>" node* "</>"
pub fn parse_node_list<'src>(parser: &mut dyn Parser<'src>) -> SyntaxResult<NodeListValue> {
    let start = parser.position();
    if parser.eat("<>", Token::NodeListOpen).is_none() {
        return Err(SyntaxError::unexpected("'<>'", parser.peek(), start));
    }
    parser.enter("node list", start)?;

    let nodes = parse_nodes(parser, Terminator::NodeListClose)?;
    if parser.eat("</>", Token::NodeListClose).is_none() {
        return Err(SyntaxError::UnterminatedNodeList {
            span: parser.span_from(start),
        });
    }

    parser.exit();
    Ok(NodeListValue {
        nodes,
        span: parser.span_from(start),
    })
}

/// Parse array ::= "[" (value ("," value)* ","?)? "]"
fn parse_array<'src>(parser: &mut dyn Parser<'src>) -> SyntaxResult<Value> {
    let start = parser.position();
    parser.expect_char('[', "'['")?;
    parser.enter("array", start)?;

    let mut items = Vec::new();
    loop {
        parser.skip_whitespace();
        if parser.eat_char(']').is_some() {
            break;
        }
        check_collection_item(parser, "array", ']', start, items.len())?;
        items.push(parse_value(parser)?);

        if !continue_collection(parser, "array", ']', start)? {
            break;
        }
    }

    parser.exit();
    Ok(Value::Array(items))
}

/// Parse dict ::= "{" (entry ("," entry)* ","?)? "}"
/// where entry ::= (string | simple_identifier) ":" value
fn parse_dict<'src>(parser: &mut dyn Parser<'src>) -> SyntaxResult<Value> {
    let start = parser.position();
    parser.expect_char('{', "'{'")?;
    parser.enter("dict", start)?;

    let mut entries = Vec::new();
    loop {
        parser.skip_whitespace();
        if parser.eat_char('}').is_some() {
            break;
        }
        check_collection_item(parser, "dict", '}', start, entries.len())?;

        let key = parse_dict_key(parser)?;
        parser.skip_whitespace();
        parser.expect_char(':', "':' after dict key")?;
        parser.skip_whitespace();
        let value = parse_value(parser)?;
        entries.push(DictEntry { key, value });

        if !continue_collection(parser, "dict", '}', start)? {
            break;
        }
    }

    parser.exit();
    Ok(Value::Dict(entries))
}

fn parse_dict_key<'src>(parser: &mut dyn Parser<'src>) -> SyntaxResult<DictKey> {
    if parser.peek() == Some('"') {
        return Ok(DictKey::String(parser.scanner().read_string()?.value));
    }
    match parser.scanner().read_simple_identifier()? {
        Some(name) => Ok(DictKey::Identifier(name.value)),
        None => Err(SyntaxError::unexpected(
            "dict key",
            parser.peek(),
            parser.position(),
        )),
    }
}

/// Before an item: input must not have ended and the entry cap must hold
fn check_collection_item(
    parser: &dyn Parser<'_>,
    kind: &'static str,
    closer: char,
    start: Position,
    count: usize,
) -> SyntaxResult<()> {
    if parser.peek().is_none() {
        return Err(SyntaxError::UnterminatedCollection {
            kind,
            closer,
            span: parser.span_from(start),
        });
    }
    if count >= MAX_COLLECTION_ENTRIES {
        return Err(SyntaxError::CollectionTooLarge {
            kind,
            max: MAX_COLLECTION_ENTRIES,
            span: parser.span_from(start),
        });
    }
    Ok(())
}

/// After an item: `,` continues, the closer ends the collection
fn continue_collection<'src>(
    parser: &mut dyn Parser<'src>,
    kind: &'static str,
    closer: char,
    start: Position,
) -> SyntaxResult<bool> {
    parser.skip_whitespace();
    if parser.eat_char(',').is_some() {
        return Ok(true);
    }
    if parser.eat_char(closer).is_some() {
        return Ok(false);
    }
    match parser.peek() {
        None => Err(SyntaxError::UnterminatedCollection {
            kind,
            closer,
            span: parser.span_from(start),
        }),
        found => Err(SyntaxError::unexpected(
            &format!("',' or '{}'", closer),
            found,
            parser.position(),
        )),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grammar::ast::{Node, NumberBase, NumberLiteral};
    use crate::grammar::builders::test_support::parser;
    use crate::lexical::LexerError;
    use assert_matches::assert_matches;

    fn value(source: &str) -> SyntaxResult<Value> {
        parse_value(&mut parser(source))
    }

    fn dec(raw: &str) -> Value {
        Value::Number(NumberLiteral::new(NumberBase::Decimal, raw))
    }

    #[test]
    fn test_mixed_array() {
        assert_eq!(
            value(r#"[1, 2, true, "x"]"#).unwrap(),
            Value::Array(vec![
                dec("1"),
                dec("2"),
                Value::Bool(true),
                Value::String("x".into())
            ])
        );
    }

    #[test]
    fn test_empty_and_trailing_comma_collections() {
        assert_eq!(value("[]").unwrap(), Value::Array(vec![]));
        assert_eq!(value("{}").unwrap(), Value::Dict(vec![]));
        assert_eq!(value("[ 1 , ]").unwrap(), Value::Array(vec![dec("1")]));
        assert_eq!(value("[true,false]").unwrap(), Value::Array(vec![Value::Bool(true), Value::Bool(false)]));
    }

    #[test]
    fn test_dict_keys() {
        let dict = value(r#"{a: 1, "b c": [0x1F], d:{}}"#).unwrap();
        let Value::Dict(entries) = &dict else {
            panic!("expected dict, got {:?}", dict);
        };
        assert_eq!(entries.len(), 3);
        assert_eq!(entries[0].key, DictKey::Identifier("a".into()));
        assert_eq!(entries[1].key, DictKey::String("b c".into()));
        assert_eq!(
            dict.get("b c"),
            Some(&Value::Array(vec![Value::Number(NumberLiteral::new(NumberBase::Hex, "0x1F"))]))
        );
        assert_eq!(dict.get("d"), Some(&Value::Dict(vec![])));
    }

    #[test]
    fn test_iri_and_node_list() {
        assert_eq!(
            value("<https://example.org/x>").unwrap(),
            Value::Iri("https://example.org/x".into())
        );
        let list = value("<>text {b}</>").unwrap();
        assert_matches!(&list, Value::NodeList(nodes) if nodes.len() == 2);
        let Value::NodeList(nodes) = list else { unreachable!() };
        assert_eq!(nodes[0].as_text(), Some("text "));
        assert_matches!(&nodes[1], Node::CurlyTag(tag) if tag.is_self_closing());
    }

    #[test]
    fn test_value_errors() {
        assert_matches!(value("trueish"), Err(SyntaxError::ExpectedValue { found, .. }) if found == "'trueish'");
        assert_matches!(value("foo"), Err(SyntaxError::ExpectedValue { .. }));
        assert_matches!(value(""), Err(SyntaxError::ExpectedValue { found, .. }) if found == "end of input");
        assert_matches!(value("[1 2]"), Err(SyntaxError::UnexpectedCharacter { found: '2', .. }));
        assert_matches!(value("[1,"), Err(SyntaxError::UnterminatedCollection { closer: ']', .. }));
        assert_matches!(value("{a 1}"), Err(SyntaxError::UnexpectedCharacter { found: '1', .. }));
        assert_matches!(value("{!a: 1}"), Err(SyntaxError::UnexpectedCharacter { found: '!', .. }));
        assert_matches!(value("<>open"), Err(SyntaxError::UnterminatedNodeList { .. }));
        assert_matches!(value("\"\\x\""), Err(SyntaxError::Lexical(LexerError::InvalidEscape { .. })));
        assert_matches!(value("1__0"), Err(SyntaxError::Lexical(LexerError::InvalidNumber { .. })));
    }

    #[test]
    fn test_nesting_depth_is_enforced() {
        let max = crate::config::compile_time::syntax::MAX_NESTING_DEPTH;
        let deep = format!("{}{}", "[".repeat(max + 1), "]".repeat(max + 1));
        assert_matches!(value(&deep), Err(SyntaxError::MaxNestingDepth { construct: "array", .. }));

        let shallow = format!("{}{}", "[".repeat(max), "]".repeat(max));
        assert!(value(&shallow).is_ok());
    }
}
