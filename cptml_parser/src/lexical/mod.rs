//! Lexical analysis for CPTML
//!
//! Character classification, the on-demand [`Scanner`] the parsers drive,
//! and the errors and metrics it produces.

pub mod classifier;
pub mod error;
pub mod metrics;
pub mod scanner;

pub use error::{LexerError, LexerResult};
pub use metrics::LexicalMetrics;
pub use scanner::{Checkpoint, DecimalShape, Scanner};

use crate::config::runtime::LexicalPreferences;
use crate::tokens::TokenStream;

/// Parse `source` as a document purely to collect the tokens it is made of.
/// `cptml --tokens` falls back to this when the parse fails: the error ends
/// the listing early and is returned alongside the tokens scanned so far.
pub fn tokenize(source: &str) -> (TokenStream, Option<crate::syntax::SyntaxError>) {
    let preferences = LexicalPreferences {
        record_tokens: true,
        ..LexicalPreferences::default()
    };
    let mut parser = crate::syntax::CptmlParser::with_preferences(source, preferences);
    let error = parser.parse_document().err();
    (parser.take_tokens(), error)
}

/// Check that all lexical error codes are registered (for system startup)
pub fn init_lexical_analysis_logging() -> Result<(), String> {
    use crate::logging::codes::{self, lexical::*};
    codes::check_registered(
        "Lexical",
        &[
            UNTERMINATED_STRING,
            INVALID_NUMBER,
            IDENTIFIER_TOO_LONG,
            STRING_TOO_LARGE,
            INVALID_ESCAPE,
            UNTERMINATED_COMMENT,
            UNTERMINATED_IRI,
            TEXT_RUN_TOO_LONG,
        ],
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tokens::Token;

    #[test]
    fn test_lexical_codes_registered() {
        assert!(init_lexical_analysis_logging().is_ok());
    }

    #[test]
    fn test_tokenize_records_document_tokens() {
        let (tokens, error) = tokenize("{p a=1; hi}");
        assert!(error.is_none());

        let kinds: Vec<&Token> = tokens.iter_significant().map(|t| &t.value).collect();
        assert_eq!(kinds.first(), Some(&&Token::LeftBrace));
        assert!(kinds.contains(&&Token::Equals));
        assert!(kinds.contains(&&Token::Text(" hi".into())));
        assert_eq!(kinds.last(), Some(&&Token::RightBrace));
    }

    #[test]
    fn test_tokenize_reports_error_with_partial_tokens() {
        let (tokens, error) = tokenize("text {p a=\"open");
        assert!(error.is_some());
        assert!(!tokens.is_empty());
    }
}
