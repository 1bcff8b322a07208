//! Builder functions for CPTML grammar productions
//!
//! Each builder consumes one production from a [`Parser`] and returns its
//! tree node. Builders never skip whitespace before their own first
//! character, which is how the grammar's "immediate" adjacency rules are
//! enforced; callers skip whitespace where the grammar allows it.

pub mod comments;
pub mod document;
pub mod identifiers;
pub mod tags;
pub mod values;

use crate::lexical::Scanner;
use crate::syntax::{SyntaxError, SyntaxResult};
use crate::tokens::Token;
use crate::utils::{Position, Span};

pub use comments::parse_comment;
pub use document::{parse_document, parse_nodes, Terminator};
pub use identifiers::{parse_identifier, parse_view_name};
pub use tags::{parse_attribute, parse_attributes, parse_curly_tag, parse_pointy_head, parse_pointy_tail};
pub use values::{parse_node_list, parse_value};

/// Parser seam the builders are written against
pub trait Parser<'src> {
    // === SCANNER ACCESS ===
    fn scanner(&mut self) -> &mut Scanner<'src>;
    fn scanner_ref(&self) -> &Scanner<'src>;

    // === NESTING GUARD ===
    /// Enter a recursive construct starting at `start`; fails once the
    /// maximum nesting depth would be exceeded
    fn enter(&mut self, construct: &'static str, start: Position) -> SyntaxResult<()>;
    fn exit(&mut self);

    // === NAVIGATION ===
    fn peek(&self) -> Option<char> {
        self.scanner_ref().peek()
    }

    fn peek_nth(&self, n: usize) -> Option<char> {
        self.scanner_ref().peek_nth(n)
    }

    fn starts_with(&self, lexeme: &str) -> bool {
        self.scanner_ref().starts_with(lexeme)
    }

    fn rest(&self) -> &'src str {
        self.scanner_ref().rest()
    }

    fn position(&self) -> Position {
        self.scanner_ref().position()
    }

    fn span_from(&self, start: Position) -> Span {
        self.scanner_ref().span_from(start)
    }

    fn skip_whitespace(&mut self) -> bool {
        self.scanner().skip_whitespace()
    }

    // === EXPECTATION METHODS ===
    fn eat_char(&mut self, ch: char) -> Option<Span> {
        self.scanner().eat_char(ch)
    }

    fn eat(&mut self, lexeme: &str, token: Token) -> Option<Span> {
        self.scanner().eat(lexeme, token)
    }

    fn expect_char(&mut self, ch: char, expected: &str) -> SyntaxResult<Span> {
        match self.eat_char(ch) {
            Some(span) => Ok(span),
            None => Err(SyntaxError::unexpected(expected, self.peek(), self.position())),
        }
    }
}

#[cfg(test)]
pub(crate) mod test_support {
    use crate::syntax::CptmlParser;

    pub fn parser(source: &str) -> CptmlParser<'_> {
        CptmlParser::new(source)
    }
}
