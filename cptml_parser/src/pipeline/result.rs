use crate::assembly::PairingError;
use crate::file_processor::FileMetadata;
use crate::grammar::ast::Document;
use crate::lexical::LexicalMetrics;
use crate::tokens::TokenStream;
use std::time::Duration;

/// Everything one run of the parse pipeline produced
#[derive(Debug, Clone)]
pub struct PipelineResult {
    /// Assembled tree, or the flat CST when assembly was skipped
    pub document: Document,
    pub diagnostics: Vec<PairingError>,
    pub suppressed_diagnostics: usize,
    pub assembled: bool,
    pub lexical_metrics: LexicalMetrics,
    /// Recorded only when token recording is enabled
    pub tokens: TokenStream,
    pub file_metadata: Option<FileMetadata>,
    pub processing_duration: Duration,
}

impl PipelineResult {
    pub fn is_clean(&self) -> bool {
        self.diagnostics.is_empty() && self.suppressed_diagnostics == 0
    }

    pub fn log_success(&self, source_name: &str) {
        crate::log_performance!(
            crate::logging::codes::success::PIPELINE_COMPLETE,
            "CPTML parse pipeline completed",
            duration = self.processing_duration,
            "source" => source_name,
            "nodes" => self.document.len(),
            "tokens" => self.lexical_metrics.total_tokens,
            "max_depth" => self.lexical_metrics.max_depth,
            "diagnostics" => self.diagnostics.len(),
            "assembled" => self.assembled
        );
    }
}
