//! Identifier and view-name builders

use super::Parser;
use crate::grammar::ast::Identifier;
use crate::syntax::{SyntaxError, SyntaxResult};
use crate::utils::Span;

/// Parse identifier ::= "!"* simple_identifier (":" simple_identifier)?
///
/// Every part is immediate: no whitespace after `!` or around `:`.
pub fn parse_identifier<'src>(parser: &mut dyn Parser<'src>) -> SyntaxResult<Identifier> {
    let start = parser.position();

    let mut special_depth = 0u32;
    while parser.eat_char('!').is_some() {
        special_depth += 1;
    }

    let Some(first) = parser.scanner().read_simple_identifier()? else {
        return Err(SyntaxError::unexpected(
            "identifier",
            parser.peek(),
            parser.position(),
        ));
    };

    if parser.eat_char(':').is_none() {
        return Ok(Identifier::new(first.value).with_special_depth(special_depth));
    }

    match parser.scanner().read_simple_identifier()? {
        Some(local) => {
            Ok(Identifier::namespaced(first.value, local.value).with_special_depth(special_depth))
        }
        None => Err(SyntaxError::MissingLocalName {
            namespace: first.value,
            span: Span::new(start, parser.position()),
        }),
    }
}

/// Parse view_name ::= "(" simple_identifier ")", returning `None` when no
/// `(` comes next
pub fn parse_view_name<'src>(parser: &mut dyn Parser<'src>) -> SyntaxResult<Option<String>> {
    if parser.eat_char('(').is_none() {
        return Ok(None);
    }

    let Some(name) = parser.scanner().read_simple_identifier()? else {
        return Err(SyntaxError::unexpected(
            "view name",
            parser.peek(),
            parser.position(),
        ));
    };
    parser.expect_char(')', "')' after view name")?;

    Ok(Some(name.value))
}
