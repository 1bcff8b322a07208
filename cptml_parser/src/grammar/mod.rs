//! CPTML grammar: tree types and the builders that produce them

pub mod ast;
pub mod builders;

// Re-export AST types
pub use ast::*;

// Re-export builders
pub use builders::{parse_document, parse_value, Parser, Terminator};
