//! Pairing diagnostics
//!
//! These are never returned as `Err`: the assembler records them and keeps
//! going, so a tree is always produced.

use crate::logging::{codes, Code};
use crate::utils::Span;
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, thiserror::Error)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum PairingError {
    #[error("Tail '|{tail}>' has no open head")]
    UnmatchedTail { tail: String, span: Span },

    #[error("Tail '|{found}>' does not match open head '<{expected}|'")]
    MismatchedTail {
        expected: String,
        found: String,
        head_span: Span,
        span: Span,
    },

    #[error("Head '<{head}|' is never closed")]
    UnterminatedHead { head: String, span: Span },

    #[error("Head '<{head}|' exceeds the limit of {max} open heads at this depth and is left unpaired")]
    TooManyOpenHeads { head: String, max: usize, span: Span },
}

impl PairingError {
    pub fn error_code(&self) -> Code {
        match self {
            Self::UnmatchedTail { .. } => codes::pairing::UNMATCHED_TAIL,
            Self::MismatchedTail { .. } => codes::pairing::MISMATCHED_TAIL,
            Self::UnterminatedHead { .. } => codes::pairing::UNTERMINATED_HEAD,
            Self::TooManyOpenHeads { .. } => codes::pairing::TOO_MANY_OPEN_HEADS,
        }
    }

    /// Span of the tail or head the diagnostic is about
    pub fn span(&self) -> Span {
        match self {
            Self::UnmatchedTail { span, .. }
            | Self::MismatchedTail { span, .. }
            | Self::UnterminatedHead { span, .. }
            | Self::TooManyOpenHeads { span, .. } => *span,
        }
    }

    pub fn severity(&self) -> &'static str {
        codes::get_severity(self.error_code().as_str()).as_str()
    }

    pub fn is_recoverable(&self) -> bool {
        codes::is_recoverable(self.error_code().as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::Position;

    #[test]
    fn test_pairing_codes_are_recoverable() {
        let error = PairingError::UnterminatedHead {
            head: "(v)e".into(),
            span: Span::point(Position::start()),
        };
        assert_eq!(error.error_code(), codes::pairing::UNTERMINATED_HEAD);
        assert!(error.is_recoverable());
        assert_eq!(error.to_string(), "Head '<(v)e|' is never closed");
    }

    #[test]
    fn test_serializes_with_kind_tag() {
        let error = PairingError::UnmatchedTail {
            tail: "x".into(),
            span: Span::point(Position::start()),
        };
        let json = serde_json::to_value(&error).unwrap();
        assert_eq!(json["kind"], "unmatched_tail");
        assert_eq!(json["tail"], "x");
    }
}
