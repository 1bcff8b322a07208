//! Recursive-descent parser driving the scanner
//!
//! [`CptmlParser`] owns the [`Scanner`] and the nesting-depth counter; the
//! grammar builders do the actual work through the [`Parser`] trait.

use crate::config::compile_time::syntax::MAX_NESTING_DEPTH;
use crate::config::runtime::LexicalPreferences;
use crate::grammar::ast::{Document, Value};
use crate::grammar::builders::{self, Parser};
use crate::lexical::{LexicalMetrics, Scanner};
use crate::logging::codes;
use crate::syntax::error::{SyntaxError, SyntaxResult};
use crate::tokens::TokenStream;
use crate::utils::Position;
use crate::{log_debug, log_error, log_info, log_success};

pub struct CptmlParser<'src> {
    scanner: Scanner<'src>,
    depth: usize,
    context_stack: Vec<&'static str>,
}

impl<'src> CptmlParser<'src> {
    pub fn new(source: &'src str) -> Self {
        Self::with_preferences(source, LexicalPreferences::default())
    }

    pub fn with_preferences(source: &'src str, preferences: LexicalPreferences) -> Self {
        log_debug!("Creating CPTML parser", "bytes" => source.len());

        Self {
            scanner: Scanner::with_preferences(source, preferences),
            depth: 0,
            context_stack: Vec::new(),
        }
    }

    /// Parse the whole source as a document (flat CST: pointy heads and
    /// tails are left unpaired)
    pub fn parse_document(&mut self) -> SyntaxResult<Document> {
        self.context_stack.push("document");
        log_info!("Starting document parsing",
            "bytes" => self.scanner.source().len(),
            "context" => self.current_context()
        );

        let result = builders::parse_document(self);
        self.report(&result, "Document parsing");
        if let Ok(document) = &result {
            log_success!(codes::success::DOCUMENT_PARSED,
                "Document parsed",
                "nodes" => document.len(),
                "max_depth" => self.metrics().max_depth
            );
        }

        self.context_stack.clear();
        self.depth = 0;
        result
    }

    /// Parse the whole source as one value; only whitespace may surround it
    pub fn parse_value(&mut self) -> SyntaxResult<Value> {
        self.context_stack.push("value");

        let result = self.parse_standalone_value();
        self.report(&result, "Value parsing");
        if let Ok(value) = &result {
            log_success!(codes::success::VALUE_PARSED,
                "Value parsed",
                "type" => value.type_name()
            );
        }

        self.context_stack.clear();
        self.depth = 0;
        result
    }

    fn parse_standalone_value(&mut self) -> SyntaxResult<Value> {
        self.scanner.skip_whitespace();
        let value = builders::parse_value(self)?;
        self.scanner.skip_whitespace();

        if let Some(ch) = self.scanner.peek() {
            return Err(SyntaxError::unexpected(
                "end of input after value",
                Some(ch),
                self.scanner.position(),
            ));
        }
        Ok(value)
    }

    fn report<T>(&self, result: &SyntaxResult<T>, what: &str) {
        if let Err(error) = result {
            log_error!(error.error_code(), &format!("{} failed", what),
                span = error.span(),
                "error" => error,
                "context" => self.current_context(),
                "offset" => self.scanner.position().offset
            );
        }
    }

    pub fn metrics(&self) -> LexicalMetrics {
        self.scanner.metrics()
    }

    /// Tokens recorded so far (requires `record_tokens`)
    pub fn take_tokens(&mut self) -> TokenStream {
        self.scanner.take_tokens()
    }

    pub fn current_context(&self) -> &'static str {
        self.context_stack.last().copied().unwrap_or("top-level")
    }

    pub fn depth(&self) -> usize {
        self.depth
    }
}

impl<'src> Parser<'src> for CptmlParser<'src> {
    fn scanner(&mut self) -> &mut Scanner<'src> {
        &mut self.scanner
    }

    fn scanner_ref(&self) -> &Scanner<'src> {
        &self.scanner
    }

    fn enter(&mut self, construct: &'static str, start: Position) -> SyntaxResult<()> {
        self.depth += 1;
        self.scanner.record_depth(self.depth);

        if self.depth > MAX_NESTING_DEPTH {
            return Err(SyntaxError::MaxNestingDepth {
                depth: self.depth,
                max: MAX_NESTING_DEPTH,
                construct,
                span: self.scanner.span_from(start),
            });
        }

        self.context_stack.push(construct);
        Ok(())
    }

    fn exit(&mut self) {
        self.depth = self.depth.saturating_sub(1);
        self.context_stack.pop();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grammar::ast::Node;
    use assert_matches::assert_matches;

    #[test]
    fn test_parse_document_resets_depth() {
        let mut parser = CptmlParser::new("{a; {b; {c}}} tail");
        let document = parser.parse_document().unwrap();
        assert_eq!(document.len(), 2);
        assert_eq!(parser.depth(), 0);
        assert_eq!(parser.metrics().max_depth, 3);
    }

    #[test]
    fn test_standalone_value_allows_surrounding_whitespace() {
        let value = CptmlParser::new("  [1, 2]\n").parse_value().unwrap();
        assert_eq!(value.type_name(), "array");

        assert_matches!(
            CptmlParser::new("1 2").parse_value(),
            Err(SyntaxError::UnexpectedCharacter { found: '2', .. })
        );
    }

    #[test]
    fn test_nesting_across_constructs() {
        let max = MAX_NESTING_DEPTH;
        let tags = format!("{}{}", "{t;".repeat(max + 1), "}".repeat(max + 1));
        assert_matches!(
            CptmlParser::new(&tags).parse_document(),
            Err(SyntaxError::MaxNestingDepth { construct: "curly tag", .. })
        );

        let comments = format!("{}{}", "{%".repeat(max + 1), "%}".repeat(max + 1));
        assert_matches!(
            CptmlParser::new(&comments).parse_document(),
            Err(SyntaxError::MaxNestingDepth { construct: "comment", .. })
        );

        let ok = format!("{}{}", "<>".repeat(max), "</>".repeat(max));
        let document = CptmlParser::new(&ok).parse_document().unwrap();
        assert_matches!(&document.nodes[0], Node::NodeList(_));
    }

    #[test]
    fn test_recorded_tokens() {
        let preferences = LexicalPreferences {
            record_tokens: true,
            collect_metrics: true,
        };
        let mut parser = CptmlParser::with_preferences("{b x=1}", preferences);
        parser.parse_document().unwrap();
        let tokens = parser.take_tokens();
        assert!(!tokens.is_empty());
        assert_eq!(tokens.covered_span().map(|s| s.len()), Some(7));
    }
}
