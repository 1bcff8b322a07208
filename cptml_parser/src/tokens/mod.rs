//! Token system for CPTML lexical analysis
//!
//! CPTML is scanned on demand: the parsers ask the
//! [`Scanner`](crate::lexical::Scanner) for the token that makes sense in the
//! current context. This module defines those tokens, their classification
//! for metrics, and the optional recorded history used by `cptml --tokens`.
//!
//! ## Token Types
//!
//! - **Punctuation**: `{ } < > | ; = : , [ ] ( ) !`
//! - **Delimiters**: `{%` `%}` `<>` `</>`
//! - **Runs**: decoded text, comment text, skipped whitespace
//! - **Names and literals**: identifier segments, booleans, numbers in three
//!   bases, decoded strings and IRIs

pub mod token;
pub mod token_stream;

pub use token::{Token, TokenClass};
pub use token_stream::{SpannedToken, TokenStream};

pub use crate::utils::{Position, SourceMap, Span, Spanned};
