//! CPTML lexical tokens
//!
//! The scanner is driven by the parsers rather than run ahead of them, since
//! most CPTML tokens only exist in a particular context (a `<` is an IRI
//! opener in value position and a pointy head elsewhere). Tokens are still
//! produced as values so they can be counted and optionally recorded.
use crate::grammar::ast::{NumberBase, NumberLiteral};
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Token {
    // === STRUCTURAL PUNCTUATION ===
    LeftBrace,    // {
    RightBrace,   // }
    LeftAngle,    // <
    RightAngle,   // >
    Pipe,         // |
    Semicolon,    // ;
    Equals,       // =
    Colon,        // :
    Comma,        // ,
    LeftBracket,  // [
    RightBracket, // ]
    LeftParen,    // (
    RightParen,   // )
    Bang,         // !

    // === COMPOUND DELIMITERS ===
    CommentOpen,   // {%
    CommentClose,  // %}
    NodeListOpen,  // <>
    NodeListClose, // </>

    // === RUNS ===
    /// Decoded text between tags
    Text(String),
    /// Text inside a comment body
    CommentText(String),
    /// Skipped whitespace inside a tag, array or dict
    Whitespace(String),

    // === NAMES AND LITERALS ===
    /// One simple identifier segment
    Identifier(String),
    Boolean(bool),
    Number(NumberLiteral),
    /// Decoded string contents
    String(String),
    /// IRI body without the angle brackets
    Iri(String),
}

/// Token classification used by metrics and the `--tokens` listing
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TokenClass {
    /// Single-character structural punctuation
    Punctuation,
    /// Multi-character delimiters (`{%`, `%}`, `<>`, `</>`)
    Delimiter,
    /// Text and comment text
    Text,
    Identifier,
    Literal,
    Whitespace,
}

impl TokenClass {
    pub fn as_str(&self) -> &'static str {
        match self {
            TokenClass::Punctuation => "punctuation",
            TokenClass::Delimiter => "delimiter",
            TokenClass::Text => "text",
            TokenClass::Identifier => "identifier",
            TokenClass::Literal => "literal",
            TokenClass::Whitespace => "whitespace",
        }
    }
}

impl Token {
    /// Get the classification of this token
    pub fn token_class(&self) -> TokenClass {
        match self {
            Self::LeftBrace
            | Self::RightBrace
            | Self::LeftAngle
            | Self::RightAngle
            | Self::Pipe
            | Self::Semicolon
            | Self::Equals
            | Self::Colon
            | Self::Comma
            | Self::LeftBracket
            | Self::RightBracket
            | Self::LeftParen
            | Self::RightParen
            | Self::Bang => TokenClass::Punctuation,

            Self::CommentOpen | Self::CommentClose | Self::NodeListOpen | Self::NodeListClose => {
                TokenClass::Delimiter
            }

            Self::Text(_) | Self::CommentText(_) => TokenClass::Text,
            Self::Identifier(_) => TokenClass::Identifier,
            Self::Boolean(_) | Self::Number(_) | Self::String(_) | Self::Iri(_) => {
                TokenClass::Literal
            }
            Self::Whitespace(_) => TokenClass::Whitespace,
        }
    }

    /// Map a single structural character to its punctuation token
    pub fn from_punctuation(ch: char) -> Option<Self> {
        let token = match ch {
            '{' => Self::LeftBrace,
            '}' => Self::RightBrace,
            '<' => Self::LeftAngle,
            '>' => Self::RightAngle,
            '|' => Self::Pipe,
            ';' => Self::Semicolon,
            '=' => Self::Equals,
            ':' => Self::Colon,
            ',' => Self::Comma,
            '[' => Self::LeftBracket,
            ']' => Self::RightBracket,
            '(' => Self::LeftParen,
            ')' => Self::RightParen,
            '!' => Self::Bang,
            _ => return None,
        };
        Some(token)
    }

    pub fn is_trivia(&self) -> bool {
        matches!(self, Self::Whitespace(_))
    }

    /// Source-like rendering; decoded runs are shown as decoded
    pub fn as_source_string(&self) -> String {
        match self {
            Self::LeftBrace => "{".to_string(),
            Self::RightBrace => "}".to_string(),
            Self::LeftAngle => "<".to_string(),
            Self::RightAngle => ">".to_string(),
            Self::Pipe => "|".to_string(),
            Self::Semicolon => ";".to_string(),
            Self::Equals => "=".to_string(),
            Self::Colon => ":".to_string(),
            Self::Comma => ",".to_string(),
            Self::LeftBracket => "[".to_string(),
            Self::RightBracket => "]".to_string(),
            Self::LeftParen => "(".to_string(),
            Self::RightParen => ")".to_string(),
            Self::Bang => "!".to_string(),
            Self::CommentOpen => "{%".to_string(),
            Self::CommentClose => "%}".to_string(),
            Self::NodeListOpen => "<>".to_string(),
            Self::NodeListClose => "</>".to_string(),
            Self::Text(text) | Self::CommentText(text) | Self::Whitespace(text) => text.clone(),
            Self::Identifier(name) => name.clone(),
            Self::Boolean(b) => b.to_string(),
            Self::Number(number) => number.raw.clone(),
            Self::String(s) => format!("{:?}", s),
            Self::Iri(iri) => format!("<{}>", iri),
        }
    }

    /// Short description for listings, e.g. `number(hex)`
    pub fn describe(&self) -> String {
        match self {
            Self::Number(number) => match number.base {
                NumberBase::Decimal => "number(dec)".to_string(),
                NumberBase::Hex => "number(hex)".to_string(),
                NumberBase::Binary => "number(bin)".to_string(),
            },
            Self::Text(_) => "text".to_string(),
            Self::CommentText(_) => "comment_text".to_string(),
            Self::Whitespace(_) => "whitespace".to_string(),
            Self::Identifier(_) => "identifier".to_string(),
            Self::Boolean(_) => "boolean".to_string(),
            Self::String(_) => "string".to_string(),
            Self::Iri(_) => "iri".to_string(),
            other => other.token_class().as_str().to_string(),
        }
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_source_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_punctuation_mapping() {
        assert_eq!(Token::from_punctuation('|'), Some(Token::Pipe));
        assert_eq!(Token::from_punctuation('!'), Some(Token::Bang));
        assert_eq!(Token::from_punctuation('a'), None);
    }

    #[test]
    fn test_token_classes() {
        assert_eq!(Token::CommentOpen.token_class(), TokenClass::Delimiter);
        assert_eq!(Token::Semicolon.token_class(), TokenClass::Punctuation);
        assert_eq!(Token::Boolean(true).token_class(), TokenClass::Literal);
        assert_eq!(
            Token::Text("hi".into()).token_class(),
            TokenClass::Text
        );
        assert!(Token::Whitespace(" ".into()).is_trivia());
    }

    #[test]
    fn test_source_rendering() {
        let hex = Token::Number(NumberLiteral::new(NumberBase::Hex, "0xFF"));
        assert_eq!(hex.to_string(), "0xFF");
        assert_eq!(hex.describe(), "number(hex)");
        assert_eq!(Token::Iri("a:b".into()).to_string(), "<a:b>");
        assert_eq!(Token::NodeListClose.to_string(), "</>");
    }
}
