//! Syntax analysis: source text to concrete syntax tree
//!
//! The parser works directly on the source through the scanner; there is no
//! separate tokenization pass. The resulting [`Document`] is flat with
//! respect to pointy tags, which the assembly stage pairs up afterwards.

mod error;
mod parser;

pub use error::{SyntaxError, SyntaxResult};
pub use parser::CptmlParser;

use crate::config::runtime::LexicalPreferences;
use crate::grammar::ast::{Document, Value};
use crate::log_debug;
use crate::logging::codes;

/// Parse a CPTML document into its concrete syntax tree
pub fn parse_document(source: &str) -> SyntaxResult<Document> {
    CptmlParser::new(source).parse_document()
}

pub fn parse_document_with_preferences(
    source: &str,
    preferences: LexicalPreferences,
) -> SyntaxResult<Document> {
    CptmlParser::with_preferences(source, preferences).parse_document()
}

/// Parse a standalone value such as `[1, 2]` or `{a: "x"}`
pub fn parse_value(source: &str) -> SyntaxResult<Value> {
    CptmlParser::new(source).parse_value()
}

/// Check that all syntax error codes are registered (for system startup)
pub fn init_syntax_logging() -> Result<(), String> {
    use codes::syntax::*;
    codes::check_registered(
        "Syntax",
        &[
            UNEXPECTED_CHARACTER,
            UNEXPECTED_END_OF_INPUT,
            UNTERMINATED_TAG,
            UNTERMINATED_NODE_LIST,
            MALFORMED_ATTRIBUTE,
            MISSING_LOCAL_NAME,
            MAX_NESTING_DEPTH,
            DANGLING_CLOSE,
            TOO_MANY_ATTRIBUTES,
            EXPECTED_VALUE,
            UNTERMINATED_COLLECTION,
            COLLECTION_TOO_LARGE,
        ],
    )?;
    log_debug!("Syntax error codes registered",
        "max_nesting_depth" => crate::config::compile_time::syntax::MAX_NESTING_DEPTH
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grammar::ast::Node;

    #[test]
    fn test_syntax_codes_registered() {
        assert!(init_syntax_logging().is_ok());
    }

    #[test]
    fn test_parse_entry_points() {
        let document = parse_document("<(a)e|;|(b)e>").unwrap();
        assert_eq!(document.nodes.len(), 3);
        assert!(matches!(document.nodes[0], Node::PointyHead(_)));

        assert_eq!(parse_value("0b1010").unwrap().type_name(), "number");
        assert!(parse_value("").is_err());
    }

    #[test]
    fn test_preferences_do_not_change_the_tree() {
        let source = "{p a=[1, 2]; x}";
        let preferences = LexicalPreferences {
            record_tokens: true,
            collect_metrics: false,
        };
        assert_eq!(
            parse_document_with_preferences(source, preferences).unwrap(),
            parse_document(source).unwrap()
        );
    }
}
