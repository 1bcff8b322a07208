use super::PipelineResult;
use crate::assembly::PairingError;
use crate::grammar::ast::Document;
use crate::lexical::LexicalMetrics;
use serde::Serialize;

/// Serializable view of a pipeline run, used for `--format json`
#[derive(Debug, Serialize)]
pub struct PipelineOutput<'a> {
    pub source: &'a str,
    pub assembled: bool,
    pub document: &'a Document,
    pub diagnostics: Vec<DiagnosticOutput<'a>>,
    pub suppressed_diagnostics: usize,
    pub metrics: &'a LexicalMetrics,
    pub duration_ms: f64,
}

#[derive(Debug, Serialize)]
pub struct DiagnosticOutput<'a> {
    pub code: &'static str,
    pub message: String,
    pub line: u32,
    pub column: u32,
    #[serde(flatten)]
    pub detail: &'a PairingError,
}

impl<'a> PipelineOutput<'a> {
    pub fn new(source: &'a str, result: &'a PipelineResult) -> Self {
        Self {
            source,
            assembled: result.assembled,
            document: &result.document,
            diagnostics: result
                .diagnostics
                .iter()
                .map(|diagnostic| DiagnosticOutput {
                    code: diagnostic.error_code().as_str(),
                    message: diagnostic.to_string(),
                    line: diagnostic.span().start().line,
                    column: diagnostic.span().start().column,
                    detail: diagnostic,
                })
                .collect(),
            suppressed_diagnostics: result.suppressed_diagnostics,
            metrics: &result.lexical_metrics,
            duration_ms: result.processing_duration.as_secs_f64() * 1000.0,
        }
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}
