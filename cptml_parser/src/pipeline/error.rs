use crate::file_processor::FileProcessorError;
use crate::lexical::LexerError;
use crate::logging::Code;
use crate::syntax::SyntaxError;
use crate::utils::Span;

/// Pipeline processing errors
#[derive(Debug, thiserror::Error)]
pub enum PipelineError {
    #[error("File processing failed: {0}")]
    FileProcessing(#[from] FileProcessorError),

    #[error("{0}")]
    Syntax(#[from] SyntaxError),
}

impl From<LexerError> for PipelineError {
    fn from(error: LexerError) -> Self {
        Self::Syntax(error.into())
    }
}

impl PipelineError {
    pub fn error_code(&self) -> Code {
        match self {
            Self::FileProcessing(error) => error.error_code(),
            Self::Syntax(error) => error.error_code(),
        }
    }

    /// Source span, for errors raised while parsing
    pub fn span(&self) -> Option<Span> {
        match self {
            Self::FileProcessing(_) => None,
            Self::Syntax(error) => Some(error.span()),
        }
    }

    pub fn severity(&self) -> &'static str {
        match self {
            Self::FileProcessing(error) => error.severity(),
            Self::Syntax(error) => error.severity(),
        }
    }

    pub fn is_recoverable(&self) -> bool {
        crate::logging::codes::is_recoverable(self.error_code().as_str())
    }
}
