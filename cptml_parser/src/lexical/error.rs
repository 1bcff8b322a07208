//! Lexical errors
//!
//! Every lexical error is fatal for the construct being scanned and carries
//! the span of the offending text.

use crate::config::compile_time::lexical::*;
use crate::logging::codes;
use crate::utils::Span;

/// Lexical analysis errors with compile-time security boundaries
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum LexerError {
    #[error("Invalid number '{text}': {reason}")]
    InvalidNumber {
        text: String,
        reason: &'static str,
        span: Span,
    },

    #[error("Unterminated string literal")]
    UnterminatedString { span: Span },

    #[error("Invalid escape sequence '{sequence}'")]
    InvalidEscape { sequence: String, span: Span },

    #[error("Unterminated comment: missing '%}}'")]
    UnterminatedComment { span: Span },

    #[error("Unterminated IRI: missing '>'")]
    UnterminatedIri { span: Span },

    #[error("Identifier too long: {length} characters (max {MAX_IDENTIFIER_LENGTH})")]
    IdentifierTooLong { length: usize, span: Span },

    #[error("String too large: {size} bytes (max {MAX_STRING_SIZE})")]
    StringTooLarge { size: usize, span: Span },

    #[error("Text run too long: {length} bytes (max {MAX_TEXT_RUN_LENGTH})")]
    TextRunTooLong { length: usize, span: Span },
}

impl LexerError {
    pub fn error_code(&self) -> crate::logging::Code {
        match self {
            LexerError::InvalidNumber { .. } => codes::lexical::INVALID_NUMBER,
            LexerError::UnterminatedString { .. } => codes::lexical::UNTERMINATED_STRING,
            LexerError::InvalidEscape { .. } => codes::lexical::INVALID_ESCAPE,
            LexerError::UnterminatedComment { .. } => codes::lexical::UNTERMINATED_COMMENT,
            LexerError::UnterminatedIri { .. } => codes::lexical::UNTERMINATED_IRI,
            LexerError::IdentifierTooLong { .. } => codes::lexical::IDENTIFIER_TOO_LONG,
            LexerError::StringTooLarge { .. } => codes::lexical::STRING_TOO_LARGE,
            LexerError::TextRunTooLong { .. } => codes::lexical::TEXT_RUN_TOO_LONG,
        }
    }

    pub fn span(&self) -> Span {
        match self {
            LexerError::InvalidNumber { span, .. }
            | LexerError::UnterminatedString { span }
            | LexerError::InvalidEscape { span, .. }
            | LexerError::UnterminatedComment { span }
            | LexerError::UnterminatedIri { span }
            | LexerError::IdentifierTooLong { span, .. }
            | LexerError::StringTooLarge { span, .. }
            | LexerError::TextRunTooLong { span, .. } => *span,
        }
    }

    pub fn severity(&self) -> &'static str {
        codes::get_severity(self.error_code().as_str()).as_str()
    }

    pub fn is_recoverable(&self) -> bool {
        codes::is_recoverable(self.error_code().as_str())
    }
}

pub type LexerResult<T> = Result<T, LexerError>;
