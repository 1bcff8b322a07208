//! Curly tag, pointy head/tail and attribute builders

use super::document::{parse_nodes, Terminator};
use super::identifiers::{parse_identifier, parse_view_name};
use super::values::parse_value;
use super::Parser;
use crate::config::compile_time::syntax::MAX_ATTRIBUTES_PER_TAG;
use crate::grammar::ast::{Attribute, CurlyTag, Identifier, PointyHead, PointyTail};
use crate::lexical::classifier::is_identifier_start;
use crate::syntax::{SyntaxError, SyntaxResult};

/// Parse curly_tag ::= "{" identifier attribute* (";" node*)? "}"
pub fn parse_curly_tag<'src>(parser: &mut dyn Parser<'src>) -> SyntaxResult<CurlyTag> {
    let start = parser.position();
    parser.expect_char('{', "'{'")?;
    parser.enter("curly tag", start)?;

    let name = parse_identifier(parser)?;
    let attributes = parse_attributes(parser, &name, &[';', '}'])?;

    let children = if parser.eat_char(';').is_some() {
        Some(parse_nodes(parser, Terminator::CurlyClose)?)
    } else {
        None
    };

    if parser.eat_char('}').is_none() {
        return Err(SyntaxError::UnterminatedTag {
            name: name.to_string(),
            span: parser.span_from(start),
        });
    }

    parser.exit();
    Ok(CurlyTag {
        name,
        attributes,
        children,
        span: parser.span_from(start),
    })
}

/// Parse pointy_head ::= "<" view_name? identifier attribute* "|"
pub fn parse_pointy_head<'src>(parser: &mut dyn Parser<'src>) -> SyntaxResult<PointyHead> {
    let start = parser.position();
    parser.expect_char('<', "'<'")?;

    let view = parse_view_name(parser)?;
    let name = parse_identifier(parser)?;
    let attributes = parse_attributes(parser, &name, &['|'])?;
    parser.expect_char('|', "'|' to end the pointy tag head")?;

    Ok(PointyHead {
        view,
        name,
        attributes,
        span: parser.span_from(start),
    })
}

/// Parse pointy_tail ::= "|" view_name? identifier ">"
pub fn parse_pointy_tail<'src>(parser: &mut dyn Parser<'src>) -> SyntaxResult<PointyTail> {
    let start = parser.position();
    parser.expect_char('|', "'|'")?;

    let view = parse_view_name(parser)?;
    let name = parse_identifier(parser)?;
    parser.skip_whitespace();
    parser.expect_char('>', "'>' to end the pointy tag tail")?;

    Ok(PointyTail {
        view,
        name,
        span: parser.span_from(start),
    })
}

/// Parse attributes up to (not including) one of `closers` or end of input
pub fn parse_attributes<'src>(
    parser: &mut dyn Parser<'src>,
    tag: &Identifier,
    closers: &[char],
) -> SyntaxResult<Vec<Attribute>> {
    let mut attributes = Vec::new();

    loop {
        parser.skip_whitespace();
        match parser.peek() {
            None => break,
            Some(ch) if closers.contains(&ch) => break,
            Some(_) => {}
        }

        if attributes.len() >= MAX_ATTRIBUTES_PER_TAG {
            return Err(SyntaxError::TooManyAttributes {
                name: tag.to_string(),
                max: MAX_ATTRIBUTES_PER_TAG,
                span: parser.span_from(parser.position()),
            });
        }
        attributes.push(parse_attribute(parser)?);
    }

    Ok(attributes)
}

/// Parse attribute ::= identifier "=" value | value
///
/// The keyed form wins whenever an identifier followed by `=` can be read;
/// otherwise the scanner backtracks and the same text is read as a value.
pub fn parse_attribute<'src>(parser: &mut dyn Parser<'src>) -> SyntaxResult<Attribute> {
    let start = parser.position();
    let mut key_error = None;

    if parser.peek().is_some_and(|c| c == '!' || is_identifier_start(c)) {
        let checkpoint = parser.scanner().checkpoint();
        match parse_identifier(parser) {
            Ok(key) => {
                parser.skip_whitespace();
                if parser.eat_char('=').is_some() {
                    parser.skip_whitespace();
                    let value = parse_value(parser).map_err(|error| {
                        into_malformed(error, "expected a value after '='")
                    })?;
                    return Ok(Attribute::keyed(key, value, parser.span_from(start)));
                }
            }
            Err(error) if error.is_lexical() => return Err(error),
            Err(error) => key_error = Some(error),
        }
        parser.scanner().restore(checkpoint);
    }

    match (parse_value(parser), key_error) {
        (Ok(value), _) => Ok(Attribute::bare(value, parser.span_from(start))),
        (Err(SyntaxError::ExpectedValue { .. }), Some(key_error)) => Err(key_error),
        (Err(error), _) => Err(into_malformed(error, "expected 'key=value' or a value")),
    }
}

fn into_malformed(error: SyntaxError, reason: &str) -> SyntaxError {
    match error {
        SyntaxError::ExpectedValue { found, span } => {
            SyntaxError::malformed_attribute(&format!("{}, found {}", reason, found), span)
        }
        other => other,
    }
}
