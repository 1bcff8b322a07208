//! Recorded token history
//!
//! When `record_tokens` is enabled the scanner keeps every token it produced.
//! Backtracking truncates the history, so the stream reflects exactly the
//! tokens the final parse consumed.

use crate::{
    tokens::token::*,
    utils::{SourceMap, Span, Spanned},
};

/// A token with span information
pub type SpannedToken = Spanned<Token>;

#[derive(Debug, Clone, Default)]
pub struct TokenStream {
    tokens: Vec<SpannedToken>,
    /// Set when the history hit its cap and later tokens were dropped
    truncated: bool,
}

impl TokenStream {
    pub fn new(tokens: Vec<SpannedToken>, truncated: bool) -> Self {
        Self { tokens, truncated }
    }

    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }

    pub fn is_truncated(&self) -> bool {
        self.truncated
    }

    pub fn iter(&self) -> impl Iterator<Item = &SpannedToken> {
        self.tokens.iter()
    }

    /// Tokens other than skipped whitespace
    pub fn iter_significant(&self) -> impl Iterator<Item = &SpannedToken> {
        self.tokens.iter().filter(|t| !t.value.is_trivia())
    }

    /// Span from the first to the last recorded token
    pub fn covered_span(&self) -> Option<Span> {
        let first = self.tokens.first()?;
        let last = self.tokens.last()?;
        Some(first.span.merge(last.span))
    }

    /// One token per line: `line:col-col  kind  text`
    pub fn listing(&self, source_map: Option<&SourceMap>) -> String {
        let mut out = String::new();
        for token in self.iter_significant() {
            let text = match source_map {
                Some(map) => map.span_text(&token.span).to_string(),
                None => token.value.as_source_string(),
            };
            out.push_str(&format!(
                "{:<16} {:<14} {:?}\n",
                token.span.to_string(),
                token.value.describe(),
                text
            ));
        }
        if self.truncated {
            out.push_str("... (token history truncated)\n");
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::Position;

    fn spanned(token: Token, from: usize, to: usize) -> SpannedToken {
        Spanned::new(
            token,
            Span::new(
                Position::new(from, 1, from as u32 + 1),
                Position::new(to, 1, to as u32 + 1),
            ),
        )
    }

    #[test]
    fn test_significant_filtering_and_span() {
        let stream = TokenStream::new(
            vec![
                spanned(Token::LeftBrace, 0, 1),
                spanned(Token::Identifier("p".into()), 1, 2),
                spanned(Token::Whitespace(" ".into()), 2, 3),
                spanned(Token::RightBrace, 3, 4),
            ],
            false,
        );

        assert_eq!(stream.len(), 4);
        assert_eq!(stream.iter_significant().count(), 3);
        assert_eq!(stream.covered_span().map(|s| s.len()), Some(4));
    }

    #[test]
    fn test_listing_uses_source_text() {
        let map = SourceMap::new("<test>", "{p}");
        let stream = TokenStream::new(
            vec![
                spanned(Token::LeftBrace, 0, 1),
                spanned(Token::Identifier("p".into()), 1, 2),
            ],
            true,
        );

        let listing = stream.listing(Some(&map));
        assert!(listing.contains("identifier"));
        assert!(listing.contains("\"p\""));
        assert!(listing.contains("truncated"));
    }
}
