//! CPTML markup parser
//!
//! [`parse`] runs the document parser and the tag-pairing assembler over a
//! source string. Fatal problems come back as a [`SyntaxError`]; unbalanced
//! pointy tags are recovered and reported as [`PairingError`] diagnostics
//! alongside the tree.

// Internal modules
pub mod assembly;
pub mod config;
pub mod file_processor;
pub mod grammar;
pub mod lexical;
#[macro_use]
pub mod logging;
pub mod pipeline;
pub mod syntax;
pub mod tokens;
pub mod utils;

// Re-export key types for library consumers
pub use assembly::{Assembly, PairingError};
pub use grammar::ast::{
    Attribute, CommentNode, CurlyTag, DictKey, Document, Element, Identifier, Node,
    NodeListValue, NumberLiteral, PointyHead, PointyTail, TextNode, Value,
};
pub use pipeline::{PipelineError, PipelineOptions, PipelineResult};
pub use syntax::{CptmlParser, SyntaxError, SyntaxResult};
pub use utils::Span;

// Re-export pipeline output for JSON consumers
pub use pipeline::output::PipelineOutput;

/// Parse and assemble `source`, returning the tree and any pairing diagnostics
pub fn parse(source: &str) -> SyntaxResult<(Document, Vec<PairingError>)> {
    let document = syntax::parse_document(source)?;
    let assembly = assembly::assemble(document);
    Ok((assembly.document, assembly.diagnostics))
}

/// Parse a standalone attribute value such as `[1, 2]` or `"text"`
pub fn parse_value(source: &str) -> SyntaxResult<Value> {
    syntax::parse_value(source)
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;

    #[test]
    fn test_parse_returns_tree_and_diagnostics() {
        let (document, diagnostics) = parse("<p|hi {b; there}|p>").unwrap();
        assert!(diagnostics.is_empty());
        assert_eq!(document.len(), 1);
        assert_eq!(document.text_content(), "hi there");

        let (_, diagnostics) = parse("<p|unclosed").unwrap();
        assert_matches!(diagnostics[0], PairingError::UnterminatedHead { .. });
    }

    #[test]
    fn test_parse_fatal_error() {
        assert_matches!(parse("{p"), Err(SyntaxError::UnterminatedTag { .. }));
    }

    #[test]
    fn test_parse_value() {
        assert_matches!(parse_value("[1, 2]"), Ok(Value::Array(items)) if items.len() == 2);
        assert!(parse_value("1 2").is_err());
    }
}
