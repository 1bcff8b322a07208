//! Tag pairing: flat CST to nested AST
//!
//! Pointy heads and tails come out of the parser as siblings. The assembler
//! pairs them into [`Element`](crate::grammar::ast::Element)s and reports
//! whatever it cannot pair as recoverable [`PairingError`] diagnostics.

mod assembler;
mod error;

pub use assembler::{Assembler, Assembly};
pub use error::PairingError;

use crate::config::runtime::AssemblyPreferences;
use crate::grammar::ast::Document;
use crate::logging::codes;
use crate::{log_debug, log_success};

/// Pair the pointy tags of a parsed document with default preferences
pub fn assemble(document: Document) -> Assembly {
    assemble_with_preferences(document, AssemblyPreferences::default())
}

pub fn assemble_with_preferences(document: Document, preferences: AssemblyPreferences) -> Assembly {
    log_debug!("Starting tag assembly", "top_level_nodes" => document.len());

    let assembly = Assembler::with_preferences(preferences).assemble(document);

    log_success!(codes::success::ASSEMBLY_COMPLETE,
        "Tag assembly completed",
        "nodes" => assembly.document.len(),
        "diagnostics" => assembly.diagnostics.len(),
        "suppressed" => assembly.suppressed
    );
    assembly
}

/// Check that all pairing codes are registered (for system startup)
pub fn init_assembly_logging() -> Result<(), String> {
    use codes::pairing::*;
    codes::check_registered(
        "Pairing",
        &[UNMATCHED_TAIL, MISMATCHED_TAIL, UNTERMINATED_HEAD, TOO_MANY_OPEN_HEADS],
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pairing_codes_registered() {
        assert!(init_assembly_logging().is_ok());
    }

    #[test]
    fn test_assemble_is_idempotent() {
        let document = crate::syntax::parse_document("<a|<b|x|b>|a> |z>").unwrap();
        let first = assemble(document);
        let second = assemble(first.document.clone());
        assert_eq!(first.document, second.document);
        assert_eq!(first.diagnostics.len(), 1);
    }
}
