use crate::tokens::{Token, TokenClass};
use serde::Serialize;

/// Per-parse scanner statistics
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct LexicalMetrics {
    pub total_tokens: usize,
    pub punctuation_tokens: usize,
    pub delimiter_tokens: usize,
    pub text_runs: usize,
    pub identifier_tokens: usize,
    pub literal_tokens: usize,
    pub whitespace_tokens: usize,
    pub comment_count: usize,
    pub escape_count: usize,
    pub max_string_length: usize,
    pub max_text_run_length: usize,
    /// Deepest nesting of tags, comments, node lists and collections reached
    pub max_depth: usize,
}

impl LexicalMetrics {
    pub(crate) fn record_token(&mut self, token: &Token) {
        self.total_tokens += 1;

        match token.token_class() {
            TokenClass::Punctuation => self.punctuation_tokens += 1,
            TokenClass::Delimiter => {
                self.delimiter_tokens += 1;
                if matches!(token, Token::CommentOpen) {
                    self.comment_count += 1;
                }
            }
            TokenClass::Text => {
                self.text_runs += 1;
                if let Token::Text(text) = token {
                    self.max_text_run_length = self.max_text_run_length.max(text.len());
                }
            }
            TokenClass::Identifier => self.identifier_tokens += 1,
            TokenClass::Literal => {
                self.literal_tokens += 1;
                if let Token::String(s) = token {
                    self.max_string_length = self.max_string_length.max(s.len());
                }
            }
            TokenClass::Whitespace => self.whitespace_tokens += 1,
        }
    }

    pub(crate) fn record_escape(&mut self) {
        self.escape_count += 1;
    }

    pub(crate) fn record_depth(&mut self, depth: usize) {
        self.max_depth = self.max_depth.max(depth);
    }

    /// Tokens excluding skipped whitespace
    pub fn significant_tokens(&self) -> usize {
        self.total_tokens - self.whitespace_tokens
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_record_token_by_class() {
        let mut metrics = LexicalMetrics::default();
        metrics.record_token(&Token::CommentOpen);
        metrics.record_token(&Token::Text("hello".into()));
        metrics.record_token(&Token::String("abc".into()));
        metrics.record_token(&Token::Whitespace(" ".into()));
        metrics.record_depth(3);
        metrics.record_depth(1);

        assert_eq!(metrics.total_tokens, 4);
        assert_eq!(metrics.comment_count, 1);
        assert_eq!(metrics.max_text_run_length, 5);
        assert_eq!(metrics.max_string_length, 3);
        assert_eq!(metrics.significant_tokens(), 3);
        assert_eq!(metrics.max_depth, 3);
    }
}
