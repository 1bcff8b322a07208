//! Syntax errors for the CPTML document parser
//!
//! Lexical and structural errors are fatal: the first one ends the parse and
//! propagates unchanged up through the document parser. Each variant carries
//! the span of the offending source text.

use crate::lexical::LexerError;
use crate::logging::{codes, Code};
use crate::utils::{Position, Span};

pub type SyntaxResult<T> = Result<T, SyntaxError>;

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum SyntaxError {
    #[error(transparent)]
    Lexical(#[from] LexerError),

    #[error("Unexpected character: expected {expected}, found '{found}'")]
    UnexpectedCharacter {
        expected: String,
        found: char,
        span: Span,
    },

    #[error("Unexpected end of input: expected {expected}")]
    UnexpectedEndOfInput { expected: String, span: Span },

    #[error("Curly tag '{name}' is never closed")]
    UnterminatedTag { name: String, span: Span },

    #[error("Node list is missing its closing '</>'")]
    UnterminatedNodeList { span: Span },

    #[error("Malformed attribute: {reason}")]
    MalformedAttribute { reason: String, span: Span },

    #[error("Identifier '{namespace}:' has no local name")]
    MissingLocalName { namespace: String, span: Span },

    #[error("Nesting depth {depth} exceeds the maximum of {max} in {construct}")]
    MaxNestingDepth {
        depth: usize,
        max: usize,
        construct: &'static str,
        span: Span,
    },

    #[error("'{delimiter}' does not close anything")]
    DanglingClose { delimiter: String, span: Span },

    #[error("'%}}' outside of any comment")]
    DanglingCommentClose { span: Span },

    #[error("Tag '{name}' has more than {max} attributes")]
    TooManyAttributes { name: String, max: usize, span: Span },

    #[error("Expected a value, found {found}")]
    ExpectedValue { found: String, span: Span },

    #[error("Unterminated {kind}: missing '{closer}'")]
    UnterminatedCollection {
        kind: &'static str,
        closer: char,
        span: Span,
    },

    #[error("{kind} has more than {max} entries")]
    CollectionTooLarge {
        kind: &'static str,
        max: usize,
        span: Span,
    },
}

impl SyntaxError {
    /// Unexpected character at `pos`, or end of input when there is none
    pub fn unexpected(expected: &str, found: Option<char>, pos: Position) -> Self {
        match found {
            Some(ch) => Self::UnexpectedCharacter {
                expected: expected.to_string(),
                found: ch,
                span: Span::of_char(pos, ch),
            },
            None => Self::UnexpectedEndOfInput {
                expected: expected.to_string(),
                span: Span::point(pos),
            },
        }
    }

    /// Value expected at `pos`; describes what was found instead
    pub fn expected_value(found: Option<char>, pos: Position) -> Self {
        match found {
            Some(ch) => Self::ExpectedValue {
                found: format!("'{}'", ch),
                span: Span::of_char(pos, ch),
            },
            None => Self::ExpectedValue {
                found: "end of input".to_string(),
                span: Span::point(pos),
            },
        }
    }

    pub fn malformed_attribute(reason: &str, span: Span) -> Self {
        Self::MalformedAttribute {
            reason: reason.to_string(),
            span,
        }
    }

    /// Get error code for global logging system
    pub fn error_code(&self) -> Code {
        match self {
            Self::Lexical(error) => error.error_code(),
            Self::UnexpectedCharacter { .. } => codes::syntax::UNEXPECTED_CHARACTER,
            Self::UnexpectedEndOfInput { .. } => codes::syntax::UNEXPECTED_END_OF_INPUT,
            Self::UnterminatedTag { .. } => codes::syntax::UNTERMINATED_TAG,
            Self::UnterminatedNodeList { .. } => codes::syntax::UNTERMINATED_NODE_LIST,
            Self::MalformedAttribute { .. } => codes::syntax::MALFORMED_ATTRIBUTE,
            Self::MissingLocalName { .. } => codes::syntax::MISSING_LOCAL_NAME,
            Self::MaxNestingDepth { .. } => codes::syntax::MAX_NESTING_DEPTH,
            Self::DanglingClose { .. } | Self::DanglingCommentClose { .. } => {
                codes::syntax::DANGLING_CLOSE
            }
            Self::TooManyAttributes { .. } => codes::syntax::TOO_MANY_ATTRIBUTES,
            Self::ExpectedValue { .. } => codes::syntax::EXPECTED_VALUE,
            Self::UnterminatedCollection { .. } => codes::syntax::UNTERMINATED_COLLECTION,
            Self::CollectionTooLarge { .. } => codes::syntax::COLLECTION_TOO_LARGE,
        }
    }

    pub fn span(&self) -> Span {
        match self {
            Self::Lexical(error) => error.span(),
            Self::UnexpectedCharacter { span, .. }
            | Self::UnexpectedEndOfInput { span, .. }
            | Self::UnterminatedTag { span, .. }
            | Self::UnterminatedNodeList { span }
            | Self::MalformedAttribute { span, .. }
            | Self::MissingLocalName { span, .. }
            | Self::MaxNestingDepth { span, .. }
            | Self::DanglingClose { span, .. }
            | Self::DanglingCommentClose { span }
            | Self::TooManyAttributes { span, .. }
            | Self::ExpectedValue { span, .. }
            | Self::UnterminatedCollection { span, .. }
            | Self::CollectionTooLarge { span, .. } => *span,
        }
    }

    pub fn is_lexical(&self) -> bool {
        matches!(self, Self::Lexical(_))
    }

    /// Get error severity
    pub fn severity(&self) -> &'static str {
        codes::get_severity(self.error_code().as_str()).as_str()
    }

    pub fn is_recoverable(&self) -> bool {
        codes::is_recoverable(self.error_code().as_str())
    }

    /// Get error category
    pub fn category(&self) -> &'static str {
        codes::get_category(self.error_code().as_str())
    }

    /// Get recommended action
    pub fn recommended_action(&self) -> &'static str {
        codes::get_action(self.error_code().as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;

    #[test]
    fn test_unexpected_distinguishes_end_of_input() {
        let pos = Position::new(3, 1, 4);
        assert_matches!(
            SyntaxError::unexpected("'>'", Some('x'), pos),
            SyntaxError::UnexpectedCharacter { found: 'x', .. }
        );
        let eof = SyntaxError::unexpected("'>'", None, pos);
        assert_matches!(eof, SyntaxError::UnexpectedEndOfInput { .. });
        assert!(eof.span().is_empty());
    }

    #[test]
    fn test_lexical_errors_keep_their_code_and_span() {
        let span = Span::new(Position::start(), Position::new(2, 1, 3));
        let error: SyntaxError = LexerError::UnterminatedString { span }.into();

        assert!(error.is_lexical());
        assert_eq!(error.error_code(), codes::lexical::UNTERMINATED_STRING);
        assert_eq!(error.span(), span);
        assert_eq!(error.to_string(), "Unterminated string literal");
    }

    #[test]
    fn test_codes_and_categories() {
        let error = SyntaxError::DanglingCommentClose {
            span: Span::point(Position::start()),
        };
        assert_eq!(error.error_code(), codes::syntax::DANGLING_CLOSE);
        assert_eq!(error.category(), "Syntax");
        assert_eq!(error.to_string(), "'%}' outside of any comment");
    }
}
