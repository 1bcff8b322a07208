//! On-demand scanner over a single source buffer
//!
//! The parsers drive the scanner: they peek at the next character, decide
//! which construct starts there, and call the matching reader. Readers are
//! "immediate": they never skip whitespace themselves, so adjacency rules
//! (`0x` directly followed by digits, `(view)` directly after `<`) fall out
//! of calling them without a preceding [`Scanner::skip_whitespace`].
//!
//! Backtracking is limited to [`Checkpoint`]s, which the attribute parser
//! uses to try a keyed attribute before falling back to a bare value.

use super::classifier::{
    continues_word, is_digit_in, is_identifier_continue, is_identifier_start, is_iri_char,
    is_text_delimiter, is_whitespace,
};
use super::error::{LexerError, LexerResult};
use super::metrics::LexicalMetrics;
use crate::config::compile_time::lexical::*;
use crate::config::runtime::LexicalPreferences;
use crate::grammar::ast::{NumberBase, NumberLiteral};
use crate::tokens::{SpannedToken, Token, TokenStream};
use crate::utils::{Position, Span, Spanned};

// ============================================================================
// NUMBER SHAPES
// ============================================================================

/// The eight decimal literal shapes, tried in [`DecimalShape::PRECEDENCE`]
/// order; the first that matches wins.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DecimalShape {
    /// `1.5e3`
    IntFracExp,
    /// `1.e3`
    IntDotExp,
    /// `1.5`
    IntFrac,
    /// `1.`
    IntDot,
    /// `.5e3`
    FracExp,
    /// `.5`
    Frac,
    /// `1e3`
    IntExp,
    /// `1`
    Int,
}

impl DecimalShape {
    pub const PRECEDENCE: [DecimalShape; 8] = [
        DecimalShape::IntFracExp,
        DecimalShape::IntDotExp,
        DecimalShape::IntFrac,
        DecimalShape::IntDot,
        DecimalShape::FracExp,
        DecimalShape::Frac,
        DecimalShape::IntExp,
        DecimalShape::Int,
    ];

    /// (integer part, dot, fraction part, exponent)
    fn parts(self) -> (bool, bool, bool, bool) {
        match self {
            DecimalShape::IntFracExp => (true, true, true, true),
            DecimalShape::IntDotExp => (true, true, false, true),
            DecimalShape::IntFrac => (true, true, true, false),
            DecimalShape::IntDot => (true, true, false, false),
            DecimalShape::FracExp => (false, true, true, true),
            DecimalShape::Frac => (false, true, true, false),
            DecimalShape::IntExp => (true, false, false, true),
            DecimalShape::Int => (true, false, false, false),
        }
    }

    /// Byte length of the prefix of `text` (sign already stripped) that has
    /// this shape, or `None` when the shape does not apply. A malformed digit
    /// group is an error regardless of shape.
    pub fn match_len(self, text: &str) -> Result<Option<usize>, &'static str> {
        let (int, dot, frac, exp) = self.parts();
        let mut len = 0;

        if int {
            let n = scan_digit_group(&text[len..], 10)?;
            if n == 0 {
                return Ok(None);
            }
            len += n;
        }
        if dot {
            if !text[len..].starts_with('.') {
                return Ok(None);
            }
            len += 1;
        }
        if frac {
            let n = scan_digit_group(&text[len..], 10)?;
            if n == 0 {
                return Ok(None);
            }
            len += n;
        }
        if exp {
            match exponent_len(&text[len..]) {
                Some(n) => len += n,
                None => return Ok(None),
            }
        }
        Ok(Some(len))
    }

    /// First shape in precedence order that matches `text`
    pub fn classify(text: &str) -> Result<Option<(DecimalShape, usize)>, &'static str> {
        for shape in Self::PRECEDENCE {
            if let Some(len) = shape.match_len(text)? {
                return Ok(Some((shape, len)));
            }
        }
        Ok(None)
    }
}

/// Length of a digit group: digits with single `_` separators between them.
/// Returns 0 when `text` does not start with a digit.
fn scan_digit_group(text: &str, radix: u32) -> Result<usize, &'static str> {
    let bytes = text.as_bytes();
    let is_digit = |i: usize| bytes.get(i).is_some_and(|b| is_digit_in(*b as char, radix));

    if bytes.first() == Some(&b'_') {
        return Err("digit group starts with '_'");
    }
    let mut len = 0;
    while is_digit(len) {
        len += 1;
        if bytes.get(len) == Some(&b'_') {
            if bytes.get(len + 1) == Some(&b'_') {
                return Err("doubled '_' separator");
            }
            if !is_digit(len + 1) {
                return Err("trailing '_' separator");
            }
            len += 1;
        }
    }
    Ok(len)
}

/// `[eE][+-]?digits`, no separators
fn exponent_len(text: &str) -> Option<usize> {
    let bytes = text.as_bytes();
    if !matches!(bytes.first(), Some(b'e' | b'E')) {
        return None;
    }
    let mut len = 1;
    if matches!(bytes.get(len), Some(b'+' | b'-')) {
        len += 1;
    }
    let digits = bytes[len..].iter().take_while(|b| b.is_ascii_digit()).count();
    if digits == 0 {
        return None;
    }
    Some(len + digits)
}

// ============================================================================
// SCANNER
// ============================================================================

/// Saved scanner state for backtracking
#[derive(Debug, Clone, Copy)]
pub struct Checkpoint {
    pos: Position,
    history_len: usize,
    metrics: LexicalMetrics,
}

pub struct Scanner<'a> {
    source: &'a str,
    pos: Position,
    metrics: LexicalMetrics,
    preferences: LexicalPreferences,
    history: Vec<SpannedToken>,
    history_truncated: bool,
}

impl<'a> Scanner<'a> {
    pub fn new(source: &'a str) -> Self {
        Self::with_preferences(source, LexicalPreferences::default())
    }

    pub fn with_preferences(source: &'a str, preferences: LexicalPreferences) -> Self {
        Self {
            source,
            pos: Position::start(),
            metrics: LexicalMetrics::default(),
            preferences,
            history: Vec::new(),
            history_truncated: false,
        }
    }

    // === CURSOR ===

    pub fn source(&self) -> &'a str {
        self.source
    }

    pub fn position(&self) -> Position {
        self.pos
    }

    /// Unconsumed input
    pub fn rest(&self) -> &'a str {
        &self.source[self.pos.offset..]
    }

    pub fn peek(&self) -> Option<char> {
        self.rest().chars().next()
    }

    pub fn peek_nth(&self, n: usize) -> Option<char> {
        self.rest().chars().nth(n)
    }

    pub fn starts_with(&self, lexeme: &str) -> bool {
        self.rest().starts_with(lexeme)
    }

    /// The character just before the cursor
    pub fn previous_char(&self) -> Option<char> {
        self.source[..self.pos.offset].chars().next_back()
    }

    pub fn advance(&mut self) -> Option<char> {
        let ch = self.peek()?;
        self.pos = self.pos.advance(ch);
        Some(ch)
    }

    fn advance_bytes(&mut self, len: usize) {
        let consumed = &self.rest()[..len];
        self.pos = self.pos.advance_str(consumed);
    }

    pub fn span_from(&self, start: Position) -> Span {
        Span::new(start, self.pos)
    }

    pub fn checkpoint(&self) -> Checkpoint {
        Checkpoint {
            pos: self.pos,
            history_len: self.history.len(),
            metrics: self.metrics,
        }
    }

    pub fn restore(&mut self, checkpoint: Checkpoint) {
        self.pos = checkpoint.pos;
        self.history.truncate(checkpoint.history_len);
        self.metrics = checkpoint.metrics;
    }

    // === TOKEN BOOKKEEPING ===

    fn emit(&mut self, token: Token, start: Position) {
        if self.preferences.collect_metrics {
            self.metrics.record_token(&token);
        }
        if self.preferences.record_tokens {
            if self.history.len() < MAX_TOKEN_HISTORY {
                self.history.push(Spanned::new(token, self.span_from(start)));
            } else {
                self.history_truncated = true;
            }
        }
    }

    pub fn record_depth(&mut self, depth: usize) {
        self.metrics.record_depth(depth);
    }

    pub fn metrics(&self) -> LexicalMetrics {
        self.metrics
    }

    /// Recorded tokens; empty unless `record_tokens` is enabled
    pub fn take_tokens(&mut self) -> TokenStream {
        TokenStream::new(std::mem::take(&mut self.history), self.history_truncated)
    }

    // === FIXED LEXEMES ===

    /// Consume `lexeme` if it comes next, recording it as `token`
    pub fn eat(&mut self, lexeme: &str, token: Token) -> Option<Span> {
        if !self.starts_with(lexeme) {
            return None;
        }
        let start = self.pos;
        self.advance_bytes(lexeme.len());
        self.emit(token, start);
        Some(self.span_from(start))
    }

    /// Consume one structural punctuation character if it comes next
    pub fn eat_char(&mut self, ch: char) -> Option<Span> {
        if self.peek() != Some(ch) {
            return None;
        }
        let token = Token::from_punctuation(ch)?;
        let start = self.pos;
        self.advance();
        self.emit(token, start);
        Some(self.span_from(start))
    }

    /// Skip whitespace; returns whether anything was skipped
    pub fn skip_whitespace(&mut self) -> bool {
        let start = self.pos;
        let len: usize = self
            .rest()
            .chars()
            .take_while(|c| is_whitespace(*c))
            .map(char::len_utf8)
            .sum();
        if len == 0 {
            return false;
        }
        let skipped = self.rest()[..len].to_string();
        self.advance_bytes(len);
        self.emit(Token::Whitespace(skipped), start);
        true
    }

    // === RUNS ===

    /// Maximal text run in node context. `\` before one of `{ } < | >`
    /// decodes to that character; any other backslash is literal.
    pub fn read_text_run(&mut self) -> LexerResult<Option<Spanned<String>>> {
        let start = self.pos;
        let mut text = String::new();

        loop {
            match self.peek() {
                Some('\\') if self.peek_nth(1).is_some_and(is_text_delimiter) => {
                    self.advance();
                    if let Some(escaped) = self.advance() {
                        text.push(escaped);
                    }
                    self.metrics.record_escape();
                }
                Some(ch) if !is_text_delimiter(ch) => {
                    self.advance();
                    text.push(ch);
                }
                _ => break,
            }

            if text.len() > MAX_TEXT_RUN_LENGTH {
                return Err(LexerError::TextRunTooLong {
                    length: text.len(),
                    span: self.span_from(start),
                });
            }
        }

        if self.pos == start {
            return Ok(None);
        }
        self.emit(Token::Text(text.clone()), start);
        Ok(Some(Spanned::new(text, self.span_from(start))))
    }

    /// Comment body text up to the next `{%` or `%}`
    pub fn read_comment_text(&mut self) -> LexerResult<Option<Spanned<String>>> {
        let start = self.pos;
        let len = self
            .rest()
            .char_indices()
            .find(|(i, _)| {
                let tail = &self.rest()[*i..];
                tail.starts_with("{%") || tail.starts_with("%}")
            })
            .map(|(i, _)| i)
            .unwrap_or(self.rest().len());

        if len == 0 {
            return Ok(None);
        }
        if len > MAX_TEXT_RUN_LENGTH {
            return Err(LexerError::TextRunTooLong {
                length: len,
                span: Span::point(start),
            });
        }
        let text = self.rest()[..len].to_string();
        self.advance_bytes(len);
        self.emit(Token::CommentText(text.clone()), start);
        Ok(Some(Spanned::new(text, self.span_from(start))))
    }

    // === NAMES ===

    /// One identifier segment, or `None` if no identifier starts here
    pub fn read_simple_identifier(&mut self) -> LexerResult<Option<Spanned<String>>> {
        match self.peek() {
            Some(ch) if is_identifier_start(ch) => {}
            _ => return Ok(None),
        }

        let start = self.pos;
        let len: usize = self
            .rest()
            .chars()
            .take_while(|c| is_identifier_continue(*c))
            .map(char::len_utf8)
            .sum();
        let name = self.rest()[..len].to_string();
        self.advance_bytes(len);

        let length = name.chars().count();
        if length > MAX_IDENTIFIER_LENGTH {
            return Err(LexerError::IdentifierTooLong {
                length,
                span: self.span_from(start),
            });
        }

        self.emit(Token::Identifier(name.clone()), start);
        Ok(Some(Spanned::new(name, self.span_from(start))))
    }

    // === LITERALS ===

    /// `true` or `false` not followed by a letter, digit or `_`
    pub fn read_boolean(&mut self) -> Option<Spanned<bool>> {
        for (word, value) in [("true", true), ("false", false)] {
            if !self.starts_with(word) {
                continue;
            }
            if self.rest()[word.len()..]
                .chars()
                .next()
                .is_some_and(continues_word)
            {
                return None;
            }
            let start = self.pos;
            self.advance_bytes(word.len());
            self.emit(Token::Boolean(value), start);
            return Some(Spanned::new(value, self.span_from(start)));
        }
        None
    }

    /// Decimal (optionally signed), `0x` hex or `0b` binary number
    pub fn read_number(&mut self) -> LexerResult<Spanned<NumberLiteral>> {
        let start = self.pos;

        for (prefix, base) in [("0x", NumberBase::Hex), ("0b", NumberBase::Binary)] {
            if !self.starts_with(prefix) {
                continue;
            }
            let digits = scan_digit_group(&self.rest()[prefix.len()..], base.radix())
                .map_err(|reason| self.invalid_number(reason))?;
            if digits == 0 {
                return Err(self.invalid_number("expected digits after base prefix"));
            }
            return self.finish_number(start, base, prefix.len() + digits);
        }

        let sign_len = usize::from(matches!(self.peek(), Some('+' | '-')));
        let body = &self.rest()[sign_len..];
        match DecimalShape::classify(body).map_err(|reason| self.invalid_number(reason))? {
            Some((_, len)) => self.finish_number(start, NumberBase::Decimal, sign_len + len),
            None => Err(self.invalid_number("expected digits")),
        }
    }

    fn finish_number(
        &mut self,
        start: Position,
        base: NumberBase,
        len: usize,
    ) -> LexerResult<Spanned<NumberLiteral>> {
        if self.rest()[len..].chars().next().is_some_and(continues_word) {
            return Err(self.invalid_number("invalid character in number"));
        }
        let literal = NumberLiteral::new(base, &self.rest()[..len]);
        self.advance_bytes(len);
        self.emit(Token::Number(literal.clone()), start);
        Ok(Spanned::new(literal, self.span_from(start)))
    }

    /// Error covering the number-like text at the cursor
    fn invalid_number(&self, reason: &'static str) -> LexerError {
        let rest = self.rest();
        let sign_len = usize::from(rest.starts_with(['+', '-']));
        let len = sign_len
            + rest[sign_len..]
                .chars()
                .take_while(|c| continues_word(*c) || *c == '.')
                .map(char::len_utf8)
                .sum::<usize>();
        let text = &rest[..len];
        LexerError::InvalidNumber {
            text: text.to_string(),
            reason,
            span: Span::new(self.pos, self.pos.advance_str(text)),
        }
    }

    /// Double-quoted string with escapes decoded
    pub fn read_string(&mut self) -> LexerResult<Spanned<String>> {
        let start = self.pos;
        self.advance();
        let mut value = String::new();

        loop {
            let escape_start = self.pos;
            match self.advance() {
                None => {
                    return Err(LexerError::UnterminatedString {
                        span: self.span_from(start),
                    })
                }
                Some('"') => break,
                Some('\\') => {
                    value.push(self.read_escape(start, escape_start)?);
                    self.metrics.record_escape();
                }
                Some(ch) => value.push(ch),
            }

            if value.len() > MAX_STRING_SIZE {
                return Err(LexerError::StringTooLarge {
                    size: value.len(),
                    span: self.span_from(start),
                });
            }
        }

        self.emit(Token::String(value.clone()), start);
        Ok(Spanned::new(value, self.span_from(start)))
    }

    fn read_escape(&mut self, string_start: Position, escape_start: Position) -> LexerResult<char> {
        let decoded = match self.advance() {
            None => {
                return Err(LexerError::UnterminatedString {
                    span: self.span_from(string_start),
                })
            }
            Some('0') => '\0',
            Some('n') => '\n',
            Some('r') => '\r',
            Some('t') => '\t',
            Some('\\') => '\\',
            Some('"') => '"',
            Some('\'') => '\'',
            Some('u') => return self.read_unicode_escape(escape_start),
            Some(_) => {
                return Err(LexerError::InvalidEscape {
                    sequence: self.span_from(escape_start).slice(self.source).to_string(),
                    span: self.span_from(escape_start),
                })
            }
        };
        Ok(decoded)
    }

    /// `\u{H..H}` with 2 to 6 hex digits naming a scalar value
    fn read_unicode_escape(&mut self, escape_start: Position) -> LexerResult<char> {
        let rest = self.rest();
        let digits = rest
            .strip_prefix('{')
            .map(|inner| inner.chars().take_while(char::is_ascii_hexdigit).count())
            .unwrap_or(0);
        let closed = rest.get(1 + digits..).is_some_and(|s| s.starts_with('}'));

        let decoded = if rest.starts_with('{') && closed && (2..=6).contains(&digits) {
            u32::from_str_radix(&rest[1..1 + digits], 16)
                .ok()
                .and_then(char::from_u32)
        } else {
            None
        };

        match decoded {
            Some(ch) => {
                self.advance_bytes(digits + 2);
                Ok(ch)
            }
            None => {
                // Cover as much of the sequence as was written
                let consumed = if closed {
                    digits + 2
                } else {
                    usize::from(rest.starts_with('{')) + digits
                };
                self.advance_bytes(consumed);
                Err(LexerError::InvalidEscape {
                    sequence: self.span_from(escape_start).slice(self.source).to_string(),
                    span: self.span_from(escape_start),
                })
            }
        }
    }

    /// `<body>` where the body has no angle brackets or whitespace
    pub fn read_iri(&mut self) -> LexerResult<Spanned<String>> {
        let start = self.pos;
        self.advance();
        let len: usize = self
            .rest()
            .chars()
            .take_while(|c| is_iri_char(*c))
            .map(char::len_utf8)
            .sum();
        let body = self.rest()[..len].to_string();
        self.advance_bytes(len);

        if body.is_empty() || self.peek() != Some('>') {
            return Err(LexerError::UnterminatedIri {
                span: self.span_from(start),
            });
        }
        self.advance();
        self.emit(Token::Iri(body.clone()), start);
        Ok(Spanned::new(body, self.span_from(start)))
    }
}
