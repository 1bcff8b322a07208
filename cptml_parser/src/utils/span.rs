//! Source location tracking
//!
//! Positions carry a byte offset for slicing plus a 1-based line and a
//! 1-based column counted in characters, which is what error reports show.
use serde::{Deserialize, Serialize};
use std::fmt;

/// A position in source text with line, column, and byte offset.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize,
)]
pub struct Position {
    /// Byte offset from start of input (0-based)
    pub offset: usize,
    /// Line number (1-based)
    pub line: u32,
    /// Column number in characters (1-based)
    pub column: u32,
}

impl Position {
    pub fn new(offset: usize, line: u32, column: u32) -> Self {
        Self {
            offset,
            line,
            column,
        }
    }

    /// Beginning of a buffer: offset 0, line 1, column 1
    pub fn start() -> Self {
        Self::new(0, 1, 1)
    }

    /// Advance position past one character
    pub fn advance(self, ch: char) -> Self {
        if ch == '\n' {
            Self {
                offset: self.offset + 1,
                line: self.line + 1,
                column: 1,
            }
        } else {
            Self {
                offset: self.offset + ch.len_utf8(),
                line: self.line,
                column: self.column + 1,
            }
        }
    }

    /// Advance position past a string
    pub fn advance_str(self, s: &str) -> Self {
        s.chars().fold(self, |pos, ch| pos.advance(ch))
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.line, self.column)
    }
}

/// A span of source text from start to end position.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct Span {
    /// Start position (inclusive)
    pub start: Position,
    /// End position (exclusive)
    pub end: Position,
}

impl Span {
    pub fn new(start: Position, end: Position) -> Self {
        debug_assert!(
            start.offset <= end.offset,
            "Span start must not be after end"
        );
        Self { start, end }
    }

    pub fn start(&self) -> Position {
        self.start
    }

    pub fn end(&self) -> Position {
        self.end
    }

    /// Zero-width span at a position (end of input, insertion points)
    pub fn point(pos: Position) -> Self {
        Self {
            start: pos,
            end: pos,
        }
    }

    /// Span covering exactly one character starting at `pos`
    pub fn of_char(pos: Position, ch: char) -> Self {
        Self {
            start: pos,
            end: pos.advance(ch),
        }
    }

    /// Smallest span covering both `self` and `other`
    pub fn merge(self, other: Self) -> Self {
        Self {
            start: self.start.min(other.start),
            end: self.end.max(other.end),
        }
    }

    pub fn len(&self) -> usize {
        self.end.offset - self.start.offset
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Whether `offset` falls inside the span (end exclusive)
    pub fn contains(&self, offset: usize) -> bool {
        (self.start.offset..self.end.offset).contains(&offset)
    }

    /// Source text covered by the span
    pub fn slice<'a>(&self, input: &'a str) -> &'a str {
        &input[self.start.offset..self.end.offset]
    }
}

impl fmt::Display for Span {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.start.line == self.end.line {
            true => write!(f, "{}-{}", self.start, self.end.column),
            false => write!(f, "{}-{}", self.start, self.end),
        }
    }
}

/// A value with its source location
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Spanned<T> {
    pub value: T,
    pub span: Span,
}

impl<T> Spanned<T> {
    pub fn new(value: T, span: Span) -> Self {
        Self { value, span }
    }

    pub fn into_inner(self) -> T {
        self.value
    }
}

/// A source map that tracks line starts for position lookup and error excerpts
#[derive(Debug, Clone)]
pub struct SourceMap {
    /// Display name of the source (file path or "<input>")
    pub name: String,
    /// The original source text
    pub source: String,
    /// Byte offsets of line starts
    line_starts: Vec<usize>,
}

impl SourceMap {
    /// Create a new source map from source text
    pub fn new(name: impl Into<String>, source: impl Into<String>) -> Self {
        let source = source.into();
        let mut line_starts = vec![0];
        for (offset, ch) in source.char_indices() {
            if ch == '\n' {
                line_starts.push(offset + 1);
            }
        }
        Self {
            name: name.into(),
            source,
            line_starts,
        }
    }

    /// Get the line and column for a byte offset
    pub fn position_at(&self, offset: usize) -> Position {
        let offset = offset.min(self.source.len());
        let line = self
            .line_starts
            .binary_search(&offset)
            .unwrap_or_else(|i| i - 1);

        let line_start = self.line_starts[line];
        let column = self.source[line_start..offset].chars().count();

        Position::new(offset, (line + 1) as u32, (column + 1) as u32)
    }

    /// Get a line of text by line number (1-based), without its line break
    pub fn get_line(&self, line_num: u32) -> Option<&str> {
        if line_num == 0 {
            return None;
        }

        let line_idx = (line_num - 1) as usize;
        let start = *self.line_starts.get(line_idx)?;
        let end = self
            .line_starts
            .get(line_idx + 1)
            .map(|next| next - 1)
            .unwrap_or(self.source.len());

        Some(self.source[start..end].trim_end_matches('\r'))
    }

    /// Get the text covered by a span
    pub fn span_text(&self, span: &Span) -> &str {
        span.slice(&self.source)
    }

    /// Format a fatal error with source context
    pub fn format_error(&self, span: &Span, code: &str, message: &str) -> String {
        self.format_report("error", span, code, message)
    }

    /// Format a recoverable diagnostic with source context
    pub fn format_warning(&self, span: &Span, code: &str, message: &str) -> String {
        self.format_report("warning", span, code, message)
    }

    fn format_report(&self, label: &str, span: &Span, code: &str, message: &str) -> String {
        let mut result = String::new();

        result.push_str(&format!("{}[{}]: {}\n", label, code, message));
        result.push_str(&format!(
            "  --> {}:{}:{}\n",
            self.name, span.start.line, span.start.column
        ));

        if let Some(line) = self.get_line(span.start.line) {
            let line_num_str = format!("{}", span.start.line);
            let padding = " ".repeat(line_num_str.len());

            result.push_str(&format!(" {} |\n", padding));
            result.push_str(&format!("{} | {}\n", line_num_str, line));

            let line_chars = line.chars().count();
            let lead = (span.start.column as usize).saturating_sub(1);
            let width = if span.start.line == span.end.line {
                (span.end.column.saturating_sub(span.start.column)) as usize
            } else {
                line_chars.saturating_sub(lead)
            };

            result.push_str(&format!(
                " {} | {}{}\n",
                padding,
                " ".repeat(lead),
                "^".repeat(width.max(1))
            ));
        }

        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_position_advance_counts_chars() {
        let pos = Position::start().advance('文').advance('a');
        assert_eq!(pos.offset, 4);
        assert_eq!(pos.column, 3);

        let pos = pos.advance('\n');
        assert_eq!(pos.line, 2);
        assert_eq!(pos.column, 1);
    }

    #[test]
    fn test_span_merge_and_slice() {
        let source = "{p; text}";
        let a = Span::new(Position::new(0, 1, 1), Position::new(2, 1, 3));
        let b = Span::new(Position::new(4, 1, 5), Position::new(9, 1, 10));
        let merged = a.merge(b);

        assert_eq!(merged.slice(source), source);
        assert_eq!(merged.len(), 9);
        assert!(merged.contains(3));
        assert!(!merged.contains(9));
        assert!(Span::point(Position::start()).is_empty());
    }

    #[test]
    fn test_source_map_positions() {
        let map = SourceMap::new("<input>", "ab\ncd\r\nef");
        assert_eq!(map.position_at(4), Position::new(4, 2, 2));
        assert_eq!(map.get_line(2), Some("cd"));
        assert_eq!(map.get_line(3), Some("ef"));
        assert_eq!(map.get_line(4), None);
    }

    #[test]
    fn test_format_error_underlines_span() {
        let map = SourceMap::new("doc.cptml", "{tag 1__0}");
        let span = Span::new(Position::new(5, 1, 6), Position::new(9, 1, 10));
        let report = map.format_error(&span, "E022", "malformed number");

        assert!(report.starts_with("error[E022]: malformed number"));
        assert!(report.contains("--> doc.cptml:1:6"));
        assert!(report.contains("1 | {tag 1__0}"));
        assert!(report.contains("     ^^^^"));
    }
}
