//! Parse pipeline: source -> document (CST) -> assembled tree
//!
//! Stage 1 (files only) reads the source through the file processor, stage 2
//! parses it into a flat document, and stage 3 pairs pointy tags. A fatal
//! error in stages 1-2 ends the run; pairing problems are diagnostics on the
//! result.

mod error;
pub mod output;
mod result;

pub use error::PipelineError;
pub use output::PipelineOutput;
pub use result::PipelineResult;

use crate::config::RuntimeConfig;
use crate::logging;
use crate::syntax::CptmlParser;
use std::path::Path;
use std::time::Instant;

/// How far to run the pipeline and with which preferences
#[derive(Debug, Clone, Default)]
pub struct PipelineOptions {
    pub config: RuntimeConfig,
    /// Stop after the document parser and return the flat CST
    pub skip_assembly: bool,
}

/// Run every stage's startup check; call once after global logging is set up
pub fn init_pipeline_logging() -> Result<(), String> {
    crate::file_processor::init_file_processor_logging()?;
    crate::lexical::init_lexical_analysis_logging()?;
    crate::syntax::init_syntax_logging()?;
    crate::assembly::init_assembly_logging()
}

/// Parse `source` and assemble it with default preferences
pub fn parse(source: &str) -> Result<PipelineResult, PipelineError> {
    parse_with_options(source, "<input>", &PipelineOptions::default())
}

/// Parse `source`, logging under `source_name`
pub fn parse_with_options(
    source: &str,
    source_name: &str,
    options: &PipelineOptions,
) -> Result<PipelineResult, PipelineError> {
    logging::with_source_context(source_name, || run(source, source_name, options, None))
}

/// Read a file and run the pipeline over it
pub fn process_file(file_path: impl AsRef<Path>) -> Result<PipelineResult, PipelineError> {
    process_file_with_options(file_path, &PipelineOptions::default())
}

pub fn process_file_with_options(
    file_path: impl AsRef<Path>,
    options: &PipelineOptions,
) -> Result<PipelineResult, PipelineError> {
    let file_path = file_path.as_ref();
    let source_name = file_path.display().to_string();

    logging::with_source_context(&source_name, || {
        crate::log_info!("Starting CPTML file processing pipeline", "file" => source_name);

        // Stage 1: File processing
        let file_result = crate::file_processor::process_file(file_path)?;

        run(
            &file_result.source,
            &source_name,
            options,
            Some(file_result.metadata.clone()),
        )
    })
}

fn run(
    source: &str,
    source_name: &str,
    options: &PipelineOptions,
    file_metadata: Option<crate::file_processor::FileMetadata>,
) -> Result<PipelineResult, PipelineError> {
    let start_time = Instant::now();

    // Stage 2: Document parsing
    let mut parser = CptmlParser::with_preferences(source, options.config.lexical.clone());
    let document = parser.parse_document()?;
    let lexical_metrics = parser.metrics();
    let tokens = parser.take_tokens();

    // Stage 3: Tag assembly
    let (document, diagnostics, suppressed) = if options.skip_assembly {
        crate::log_debug!("Skipping tag assembly");
        (document, Vec::new(), 0)
    } else {
        let assembly =
            crate::assembly::assemble_with_preferences(document, options.config.assembly.clone());
        (assembly.document, assembly.diagnostics, assembly.suppressed)
    };

    let result = PipelineResult {
        document,
        diagnostics,
        suppressed_diagnostics: suppressed,
        assembled: !options.skip_assembly,
        lexical_metrics,
        tokens,
        file_metadata,
        processing_duration: start_time.elapsed(),
    };
    result.log_success(source_name);
    Ok(result)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::syntax::SyntaxError;
    use assert_matches::assert_matches;
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn test_stage_codes_registered() {
        assert!(init_pipeline_logging().is_ok());
    }

    #[test]
    fn test_parse_assembles_by_default() {
        let result = parse("<x|a|x>").unwrap();
        assert!(result.assembled);
        assert!(result.is_clean());
        assert!(result.document.nodes[0].as_element().is_some());
        assert!(result.tokens.is_empty());
    }

    #[test]
    fn test_skip_assembly_keeps_flat_cst() {
        let options = PipelineOptions {
            skip_assembly: true,
            ..PipelineOptions::default()
        };
        let result = parse_with_options("<x|a|x>", "inline", &options).unwrap();
        assert!(!result.assembled);
        assert_eq!(result.document.nodes.len(), 3);
        assert!(result.document.has_unpaired_tags());
    }

    #[test]
    fn test_fatal_errors_propagate() {
        let error = parse("{p; never closed").unwrap_err();
        assert_matches!(error, PipelineError::Syntax(SyntaxError::UnterminatedTag { .. }));
        assert_eq!(error.span().map(|s| s.start().offset), Some(0));
        assert!(!error.is_recoverable());
    }

    #[test]
    fn test_process_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("doc.cptml");
        fs::write(&path, "<a|<b|x|a>").unwrap();

        let result = process_file(&path).unwrap();
        // mismatched '|a>' against '<b|', then '<a|' left open
        assert_eq!(result.diagnostics.len(), 2);
        assert!(result.file_metadata.is_some());

        let missing = process_file(dir.path().join("missing.cptml")).unwrap_err();
        assert_matches!(missing, PipelineError::FileProcessing(_));
        assert_eq!(missing.span(), None);
    }

    #[test]
    fn test_json_output() {
        let result = parse("|z>").unwrap();
        let json = PipelineOutput::new("inline", &result).to_json().unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["diagnostics"][0]["code"], "W060");
        assert_eq!(value["diagnostics"][0]["kind"], "unmatched_tail");
        assert_eq!(value["assembled"], true);
    }
}
