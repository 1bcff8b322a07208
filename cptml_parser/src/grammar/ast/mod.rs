//! CPTML tree types, the markup encoder and tree queries

pub mod encode;
pub mod nodes;
pub mod query;

pub use encode::{encode_string, encode_text};
pub use nodes::*;
