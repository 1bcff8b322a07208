//! Bounded UTF-8 file reading with metadata and global logging

use crate::config::compile_time::file_processing::{LARGE_FILE_THRESHOLD, MAX_FILE_SIZE};
use crate::logging::codes;
use crate::{log_debug, log_error, log_success};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant, SystemTime};

/// File processor specific errors
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum FileProcessorError {
    #[error("File not found: {path}")]
    FileNotFound { path: String },

    #[error("File too large: {size} bytes (max: {max_size})")]
    FileTooLarge { size: u64, max_size: u64 },

    #[error("Permission denied: {path}")]
    PermissionDenied { path: String },

    #[error("Invalid UTF-8 encoding in file {path} at byte {offset}")]
    InvalidEncoding { path: String, offset: usize },

    #[error("I/O error reading {path}: {message}")]
    IoError { path: String, message: String },
}

impl FileProcessorError {
    pub fn error_code(&self) -> crate::logging::Code {
        match self {
            Self::FileNotFound { .. } => codes::file_processing::FILE_NOT_FOUND,
            Self::FileTooLarge { .. } => codes::file_processing::FILE_TOO_LARGE,
            Self::PermissionDenied { .. } => codes::file_processing::PERMISSION_DENIED,
            Self::InvalidEncoding { .. } => codes::file_processing::INVALID_ENCODING,
            Self::IoError { .. } => codes::file_processing::IO_ERROR,
        }
    }

    pub fn severity(&self) -> &'static str {
        codes::get_severity(self.error_code().as_str()).as_str()
    }

    pub fn is_recoverable(&self) -> bool {
        codes::is_recoverable(self.error_code().as_str())
    }

    fn from_io(path: &Path, error: std::io::Error) -> Self {
        let path = path.display().to_string();
        match error.kind() {
            std::io::ErrorKind::NotFound => Self::FileNotFound { path },
            std::io::ErrorKind::PermissionDenied => Self::PermissionDenied { path },
            _ => Self::IoError {
                path,
                message: error.to_string(),
            },
        }
    }
}

/// File metadata collected during processing
#[derive(Debug, Clone)]
pub struct FileMetadata {
    /// Canonical file path
    pub path: PathBuf,
    pub size: u64,
    pub extension: Option<String>,
    pub line_count: usize,
    pub modified: Option<SystemTime>,
}

impl FileMetadata {
    /// File size in human-readable form
    pub fn human_readable_size(&self) -> String {
        const UNITS: &[&str] = &["B", "KB", "MB", "GB"];
        let mut size = self.size as f64;
        let mut unit = 0;

        while size >= 1024.0 && unit < UNITS.len() - 1 {
            size /= 1024.0;
            unit += 1;
        }

        if unit == 0 {
            format!("{} {}", self.size, UNITS[unit])
        } else {
            format!("{:.2} {}", size, UNITS[unit])
        }
    }

    pub fn is_large_file(&self) -> bool {
        self.size > LARGE_FILE_THRESHOLD
    }

    pub fn has_cptml_extension(&self) -> bool {
        self.extension.as_deref() == Some("cptml")
    }
}

/// File contents with metadata
#[derive(Debug, Clone)]
pub struct FileProcessingResult {
    pub source: String,
    pub metadata: FileMetadata,
    pub processing_duration: Duration,
}

impl FileProcessingResult {
    pub fn char_count(&self) -> usize {
        self.source.chars().count()
    }
}

/// Reads source files within the compile-time size limit
#[derive(Debug, Clone)]
pub struct FileProcessor {
    /// Log size and timing details on success
    pub enable_performance_logging: bool,
}

impl FileProcessor {
    pub fn new() -> Self {
        Self {
            enable_performance_logging: true,
        }
    }

    pub fn max_file_size() -> u64 {
        MAX_FILE_SIZE
    }

    /// Read a file and return its contents with metadata
    pub fn process_file(
        &self,
        file_path: impl AsRef<Path>,
    ) -> Result<FileProcessingResult, FileProcessorError> {
        let start_time = Instant::now();
        let file_path = file_path.as_ref();
        let display = file_path.display().to_string();

        log_debug!("Starting file processing", "file" => display);

        let result = self.read(file_path, start_time);
        match &result {
            Ok(result) => self.log_processing_success(result, &display),
            Err(error) => {
                log_error!(error.error_code(), "File processing failed",
                    "file" => display,
                    "error" => error
                );
            }
        }
        result
    }

    fn read(&self, path: &Path, start_time: Instant) -> Result<FileProcessingResult, FileProcessorError> {
        let canonical = path
            .canonicalize()
            .map_err(|e| FileProcessorError::from_io(path, e))?;
        let meta = fs::metadata(&canonical).map_err(|e| FileProcessorError::from_io(path, e))?;

        if !meta.is_file() {
            return Err(FileProcessorError::IoError {
                path: path.display().to_string(),
                message: "not a regular file".to_string(),
            });
        }
        if meta.len() > MAX_FILE_SIZE {
            return Err(FileProcessorError::FileTooLarge {
                size: meta.len(),
                max_size: MAX_FILE_SIZE,
            });
        }

        let bytes = fs::read(&canonical).map_err(|e| FileProcessorError::from_io(path, e))?;
        let source = String::from_utf8(bytes).map_err(|e| FileProcessorError::InvalidEncoding {
            path: path.display().to_string(),
            offset: e.utf8_error().valid_up_to(),
        })?;

        let metadata = FileMetadata {
            extension: canonical
                .extension()
                .and_then(|ext| ext.to_str())
                .map(str::to_lowercase),
            path: canonical,
            size: meta.len(),
            line_count: source.lines().count(),
            modified: meta.modified().ok(),
        };

        Ok(FileProcessingResult {
            source,
            metadata,
            processing_duration: start_time.elapsed(),
        })
    }

    fn log_processing_success(&self, result: &FileProcessingResult, file_path: &str) {
        if self.enable_performance_logging {
            log_success!(codes::success::FILE_READ_SUCCESS,
                "File read with performance metrics",
                "file" => file_path,
                "size_human" => result.metadata.human_readable_size(),
                "lines" => result.metadata.line_count,
                "chars" => result.char_count(),
                "is_large_file" => result.metadata.is_large_file(),
                "duration_ms" => format!("{:.2}", result.processing_duration.as_secs_f64() * 1000.0)
            );
        } else {
            log_success!(codes::success::FILE_READ_SUCCESS,
                "File read",
                "file" => file_path,
                "size_bytes" => result.metadata.size
            );
        }
    }
}

impl Default for FileProcessor {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn test_reads_utf8_file_with_metadata() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("doc.CPTML");
        fs::write(&path, "{p; héllo}\n<x|y|x>\n").unwrap();

        let result = FileProcessor::new().process_file(&path).unwrap();
        assert_eq!(result.metadata.line_count, 2);
        assert_eq!(result.metadata.size, result.source.len() as u64);
        assert!(result.metadata.has_cptml_extension());
        assert!(!result.metadata.is_large_file());
        assert_eq!(result.char_count(), result.source.len() - 1);
    }

    #[test]
    fn test_empty_file_is_allowed() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("empty.cptml");
        fs::write(&path, "").unwrap();

        let result = FileProcessor::new().process_file(&path).unwrap();
        assert!(result.source.is_empty());
        assert_eq!(result.metadata.human_readable_size(), "0 B");
    }

    #[test]
    fn test_missing_file() {
        let dir = tempdir().unwrap();
        let error = FileProcessor::new()
            .process_file(dir.path().join("nope.cptml"))
            .unwrap_err();
        assert_matches!(error, FileProcessorError::FileNotFound { .. });
        assert_eq!(error.error_code(), codes::file_processing::FILE_NOT_FOUND);
    }

    #[test]
    fn test_invalid_utf8_reports_offset() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("bad.cptml");
        fs::write(&path, b"ok\xff").unwrap();

        assert_matches!(
            FileProcessor::new().process_file(&path),
            Err(FileProcessorError::InvalidEncoding { offset: 2, .. })
        );
    }

    #[test]
    fn test_directory_is_rejected() {
        let dir = tempdir().unwrap();
        assert_matches!(
            FileProcessor::new().process_file(dir.path()),
            Err(FileProcessorError::IoError { .. })
        );
    }

    #[test]
    fn test_human_readable_size() {
        let metadata = FileMetadata {
            path: PathBuf::from("x"),
            size: 1536,
            extension: None,
            line_count: 0,
            modified: None,
        };
        assert_eq!(metadata.human_readable_size(), "1.50 KB");
    }
}
