//! Consolidated error codes and classification system
//!
//! Single source of truth for every diagnostic code the parser emits and the
//! behavioral metadata attached to it.

use std::collections::HashMap;
use std::sync::OnceLock;

// ============================================================================
// CODE WRAPPER TYPE
// ============================================================================

/// Universal code wrapper for error, warning and success codes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Code(&'static str);

impl Code {
    pub const fn new(code: &'static str) -> Self {
        Self(code)
    }

    pub fn as_str(&self) -> &'static str {
        self.0
    }
}

impl std::fmt::Display for Code {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

// ============================================================================
// ERROR CLASSIFICATION TYPES
// ============================================================================

/// Error severity levels
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Severity {
    Critical = 0,
    High = 1,
    Medium = 2,
    Low = 3,
}

impl Severity {
    pub fn as_str(&self) -> &'static str {
        match self {
            Severity::Critical => "Critical",
            Severity::High => "High",
            Severity::Medium => "Medium",
            Severity::Low => "Low",
        }
    }
}

/// Complete metadata for a code
#[derive(Debug, Clone)]
pub struct ErrorMetadata {
    pub code: &'static str,
    pub category: &'static str,
    pub severity: Severity,
    pub recoverable: bool,
    pub requires_halt: bool,
    pub description: &'static str,
    pub recommended_action: &'static str,
}

// ============================================================================
// CODE CONSTANTS
// ============================================================================

/// System error codes
pub mod system {
    use super::Code;

    pub const INTERNAL_ERROR: Code = Code::new("ERR001");
    pub const INITIALIZATION_FAILURE: Code = Code::new("ERR002");
}

/// File processing error codes
pub mod file_processing {
    use super::Code;

    pub const FILE_NOT_FOUND: Code = Code::new("E005");
    pub const FILE_TOO_LARGE: Code = Code::new("E007");
    pub const PERMISSION_DENIED: Code = Code::new("E009");
    pub const INVALID_ENCODING: Code = Code::new("E010");
    pub const IO_ERROR: Code = Code::new("E011");
}

/// Scanner error codes
pub mod lexical {
    use super::Code;

    pub const UNTERMINATED_STRING: Code = Code::new("E021");
    pub const INVALID_NUMBER: Code = Code::new("E022");
    pub const IDENTIFIER_TOO_LONG: Code = Code::new("E023");
    pub const STRING_TOO_LARGE: Code = Code::new("E024");
    pub const INVALID_ESCAPE: Code = Code::new("E026");
    pub const UNTERMINATED_COMMENT: Code = Code::new("E027");
    pub const UNTERMINATED_IRI: Code = Code::new("E028");
    pub const TEXT_RUN_TOO_LONG: Code = Code::new("E029");
}

/// Structural (parser) error codes
pub mod syntax {
    use super::Code;

    pub const UNEXPECTED_CHARACTER: Code = Code::new("E040");
    pub const UNEXPECTED_END_OF_INPUT: Code = Code::new("E041");
    pub const UNTERMINATED_TAG: Code = Code::new("E042");
    pub const UNTERMINATED_NODE_LIST: Code = Code::new("E043");
    pub const MALFORMED_ATTRIBUTE: Code = Code::new("E044");
    pub const MISSING_LOCAL_NAME: Code = Code::new("E045");
    pub const MAX_NESTING_DEPTH: Code = Code::new("E046");
    pub const DANGLING_CLOSE: Code = Code::new("E047");
    pub const TOO_MANY_ATTRIBUTES: Code = Code::new("E048");
    pub const EXPECTED_VALUE: Code = Code::new("E049");
    pub const UNTERMINATED_COLLECTION: Code = Code::new("E050");
    pub const COLLECTION_TOO_LARGE: Code = Code::new("E051");
}

/// Tag pairing diagnostic codes (recoverable, reported as warnings)
pub mod pairing {
    use super::Code;

    pub const UNMATCHED_TAIL: Code = Code::new("W060");
    pub const MISMATCHED_TAIL: Code = Code::new("W061");
    pub const UNTERMINATED_HEAD: Code = Code::new("W062");
    pub const TOO_MANY_OPEN_HEADS: Code = Code::new("W063");
}

/// Success codes
pub mod success {
    use super::Code;

    pub const SYSTEM_INITIALIZATION_COMPLETED: Code = Code::new("I001");
    pub const FILE_READ_SUCCESS: Code = Code::new("I010");
    pub const DOCUMENT_PARSED: Code = Code::new("I040");
    pub const VALUE_PARSED: Code = Code::new("I041");
    pub const ASSEMBLY_COMPLETE: Code = Code::new("I060");
    pub const PIPELINE_COMPLETE: Code = Code::new("I080");
}

// ============================================================================
// METADATA REGISTRY
// ============================================================================

static ERROR_REGISTRY: OnceLock<HashMap<&'static str, ErrorMetadata>> = OnceLock::new();

#[allow(clippy::too_many_arguments)]
fn register(
    registry: &mut HashMap<&'static str, ErrorMetadata>,
    code: Code,
    category: &'static str,
    severity: Severity,
    recoverable: bool,
    requires_halt: bool,
    description: &'static str,
    recommended_action: &'static str,
) {
    registry.insert(
        code.as_str(),
        ErrorMetadata {
            code: code.as_str(),
            category,
            severity,
            recoverable,
            requires_halt,
            description,
            recommended_action,
        },
    );
}

#[rustfmt::skip]
fn get_error_registry() -> &'static HashMap<&'static str, ErrorMetadata> {
    ERROR_REGISTRY.get_or_init(|| {
        use Severity::*;
        let mut r = HashMap::new();

        // System
        register(&mut r, system::INTERNAL_ERROR, "System", Critical, false, true,
            "Internal parser error", "Report the input that triggered it");
        register(&mut r, system::INITIALIZATION_FAILURE, "System", Critical, false, true,
            "Logging or configuration initialization failed", "Check CPTML_* environment variables");

        // File processing
        register(&mut r, file_processing::FILE_NOT_FOUND, "FileProcessing", Medium, false, true,
            "Input file does not exist", "Check the path passed to the parser");
        register(&mut r, file_processing::FILE_TOO_LARGE, "FileProcessing", High, false, true,
            "Input file exceeds the configured size limit", "Split the document or raise max_file_size");
        register(&mut r, file_processing::PERMISSION_DENIED, "FileProcessing", Medium, false, true,
            "Input file cannot be read", "Check file permissions");
        register(&mut r, file_processing::INVALID_ENCODING, "FileProcessing", High, false, true,
            "Input file is not valid UTF-8", "Re-encode the document as UTF-8");
        register(&mut r, file_processing::IO_ERROR, "FileProcessing", High, false, true,
            "I/O error while reading input", "Retry or check the underlying device");

        // Lexical
        register(&mut r, lexical::UNTERMINATED_STRING, "Lexical", High, false, true,
            "String literal is missing its closing quote", "Add the closing '\"'");
        register(&mut r, lexical::INVALID_NUMBER, "Lexical", High, false, true,
            "Malformed numeric literal", "Use digits of the literal's base with single '_' separators between digits");
        register(&mut r, lexical::IDENTIFIER_TOO_LONG, "Lexical", High, false, true,
            "Identifier exceeds the configured length limit", "Shorten the identifier");
        register(&mut r, lexical::STRING_TOO_LARGE, "Lexical", High, false, true,
            "String literal exceeds the configured size limit", "Move large content into node text");
        register(&mut r, lexical::INVALID_ESCAPE, "Lexical", High, false, true,
            "Unrecognized or malformed escape sequence", "Use \\0 \\n \\r \\t \\\\ \\\" \\' or \\u{XX..XXXXXX}");
        register(&mut r, lexical::UNTERMINATED_COMMENT, "Lexical", High, false, true,
            "Comment is missing its closing '%}'", "Balance every '{%' with a '%}'");
        register(&mut r, lexical::UNTERMINATED_IRI, "Lexical", High, false, true,
            "IRI value is missing its closing '>'", "Close the IRI with '>' and remove whitespace from it");
        register(&mut r, lexical::TEXT_RUN_TOO_LONG, "Lexical", High, false, true,
            "Text run exceeds the configured length limit", "Split the text with markup");

        // Syntax
        register(&mut r, syntax::UNEXPECTED_CHARACTER, "Syntax", High, false, true,
            "Unexpected character", "Check the construct near the reported position");
        register(&mut r, syntax::UNEXPECTED_END_OF_INPUT, "Syntax", High, false, true,
            "Input ended inside a construct", "Close the open construct");
        register(&mut r, syntax::UNTERMINATED_TAG, "Syntax", High, false, true,
            "Curly tag is missing its closing '}'", "Add the closing '}'");
        register(&mut r, syntax::UNTERMINATED_NODE_LIST, "Syntax", High, false, true,
            "Node list value is missing its closing '</>'", "Add the closing '</>'");
        register(&mut r, syntax::MALFORMED_ATTRIBUTE, "Syntax", High, false, true,
            "Attribute is neither 'key=value' nor a value", "Quote bare words or add '=value'");
        register(&mut r, syntax::MISSING_LOCAL_NAME, "Syntax", High, false, true,
            "Namespaced identifier has no local name after ':'", "Write identifiers as ns:local");
        register(&mut r, syntax::MAX_NESTING_DEPTH, "Syntax", Critical, false, true,
            "Nesting exceeds the configured maximum depth", "Flatten the document or raise max_nesting_depth");
        register(&mut r, syntax::DANGLING_CLOSE, "Syntax", High, false, true,
            "Closing delimiter with nothing open", "Remove the delimiter or escape it with '\\'");
        register(&mut r, syntax::TOO_MANY_ATTRIBUTES, "Syntax", High, false, true,
            "Tag carries more attributes than allowed", "Group attributes into an array or dict");
        register(&mut r, syntax::EXPECTED_VALUE, "Syntax", High, false, true,
            "A value was expected", "Use a boolean, number, string, array, dict, IRI or node list");
        register(&mut r, syntax::UNTERMINATED_COLLECTION, "Syntax", High, false, true,
            "Array or dict is missing its closing bracket", "Close the collection");
        register(&mut r, syntax::COLLECTION_TOO_LARGE, "Syntax", High, false, true,
            "Array or dict exceeds the configured entry limit", "Split the collection");

        // Pairing
        register(&mut r, pairing::UNMATCHED_TAIL, "Pairing", Medium, true, false,
            "Pointy tail has no open head", "Remove the tail or add the matching head");
        register(&mut r, pairing::MISMATCHED_TAIL, "Pairing", Medium, true, false,
            "Pointy tail does not match the open head", "Make name and view of head and tail agree");
        register(&mut r, pairing::UNTERMINATED_HEAD, "Pairing", Medium, true, false,
            "Pointy head is never closed", "Add the matching tail");
        register(&mut r, pairing::TOO_MANY_OPEN_HEADS, "Pairing", High, true, false,
            "Too many simultaneously open pointy heads", "Close heads earlier or raise max_open_heads");

        // Success
        register(&mut r, success::SYSTEM_INITIALIZATION_COMPLETED, "System", Low, true, false,
            "Logging initialized", "None");
        register(&mut r, success::FILE_READ_SUCCESS, "FileProcessing", Low, true, false,
            "Input file read", "Continue to parsing");
        register(&mut r, success::DOCUMENT_PARSED, "Syntax", Low, true, false,
            "Document parsed into a flat node sequence", "Continue to assembly");
        register(&mut r, success::VALUE_PARSED, "Syntax", Low, true, false,
            "Standalone value parsed", "None");
        register(&mut r, success::ASSEMBLY_COMPLETE, "Pairing", Low, true, false,
            "Pointy tags paired into elements", "Inspect diagnostics if any");
        register(&mut r, success::PIPELINE_COMPLETE, "Pipeline", Low, true, false,
            "Parse pipeline completed", "None");

        r
    })
}

// ============================================================================
// CLASSIFICATION FUNCTIONS
// ============================================================================

/// Get metadata for a specific code
pub fn get_error_metadata(code: &str) -> Option<&'static ErrorMetadata> {
    get_error_registry().get(code)
}

/// Get severity from code
pub fn get_severity(code: &str) -> Severity {
    get_error_registry()
        .get(code)
        .map(|metadata| metadata.severity)
        .unwrap_or(Severity::Medium)
}

/// Check if error is recoverable
pub fn is_recoverable(code: &str) -> bool {
    get_error_registry()
        .get(code)
        .map(|metadata| metadata.recoverable)
        .unwrap_or(true)
}

/// Check if error requires immediate halt
pub fn requires_halt(code: &str) -> bool {
    get_error_registry()
        .get(code)
        .map(|metadata| metadata.requires_halt)
        .unwrap_or(false)
}

/// Get human-readable description for code
pub fn get_description(code: &str) -> &'static str {
    get_error_registry()
        .get(code)
        .map(|metadata| metadata.description)
        .unwrap_or("Unknown error")
}

/// Get recommended action for code
pub fn get_action(code: &str) -> &'static str {
    get_error_registry()
        .get(code)
        .map(|metadata| metadata.recommended_action)
        .unwrap_or("No specific action available")
}

/// Get category from code
pub fn get_category(code: &str) -> &'static str {
    get_error_registry()
        .get(code)
        .map(|metadata| metadata.category)
        .unwrap_or("Unknown")
}

/// Startup check that every code a module can emit has registry metadata
pub fn check_registered(module: &str, module_codes: &[Code]) -> Result<(), String> {
    match module_codes
        .iter()
        .find(|code| get_error_metadata(code.as_str()).is_none())
    {
        Some(code) => Err(format!(
            "{} code {} not found in metadata registry",
            module, code
        )),
        None => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_code_family_is_registered() {
        for code in [
            system::INTERNAL_ERROR,
            file_processing::FILE_NOT_FOUND,
            lexical::INVALID_NUMBER,
            lexical::UNTERMINATED_COMMENT,
            syntax::MAX_NESTING_DEPTH,
            pairing::MISMATCHED_TAIL,
            success::PIPELINE_COMPLETE,
        ] {
            assert!(get_error_metadata(code.as_str()).is_some(), "{}", code);
        }
    }

    #[test]
    fn test_pairing_codes_are_recoverable() {
        assert!(is_recoverable(pairing::UNMATCHED_TAIL.as_str()));
        assert!(!requires_halt(pairing::UNTERMINATED_HEAD.as_str()));
        assert_eq!(get_category(pairing::MISMATCHED_TAIL.as_str()), "Pairing");
    }

    #[test]
    fn test_structural_codes_halt() {
        assert!(requires_halt(syntax::UNTERMINATED_TAG.as_str()));
        assert!(!is_recoverable(lexical::INVALID_ESCAPE.as_str()));
        assert_eq!(get_severity(syntax::MAX_NESTING_DEPTH.as_str()), Severity::Critical);
    }

    #[test]
    fn test_unknown_code_fallbacks() {
        assert_eq!(get_description("Z999"), "Unknown error");
        assert_eq!(get_category("Z999"), "Unknown");
        assert_eq!(get_severity("Z999"), Severity::Medium);
    }
}
