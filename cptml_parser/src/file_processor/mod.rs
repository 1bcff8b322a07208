//! File processor module with compile-time size limit and global logging

mod processor;

use crate::config::compile_time::file_processing::{LARGE_FILE_THRESHOLD, MAX_FILE_SIZE};
use crate::log_debug;
use std::path::Path;

pub use processor::{FileMetadata, FileProcessingResult, FileProcessor, FileProcessorError};

/// Process a file with default settings
pub fn process_file(
    file_path: impl AsRef<Path>,
) -> Result<FileProcessingResult, FileProcessorError> {
    FileProcessor::new().process_file(file_path)
}

/// Check file processor error codes and log the active size limits
pub fn init_file_processor_logging() -> Result<(), String> {
    use crate::logging::codes::{self, file_processing::*};
    codes::check_registered(
        "File processor",
        &[FILE_NOT_FOUND, FILE_TOO_LARGE, PERMISSION_DENIED, INVALID_ENCODING, IO_ERROR],
    )?;

    log_debug!("File processor compile-time configuration loaded",
        "max_file_size" => MAX_FILE_SIZE,
        "large_file_threshold" => LARGE_FILE_THRESHOLD
    );
    Ok(())
}
