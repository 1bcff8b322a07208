// RUNTIME PREFERENCES (User Experience)
//
// Limits that guard against hostile input are compile-time constants; the
// structs here only toggle diagnostics and output behavior.

use crate::logging::events::LogLevel;
use serde::{Deserialize, Serialize};
use std::env;
use std::path::Path;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LexicalPreferences {
    /// Whether the scanner keeps every produced token for later inspection
    pub record_tokens: bool,

    /// Whether to collect per-class token counts
    pub collect_metrics: bool,
}

impl Default for LexicalPreferences {
    fn default() -> Self {
        Self {
            record_tokens: env::var(env_vars::LEXICAL_RECORD_TOKENS)
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(false),
            collect_metrics: env::var(env_vars::LEXICAL_COLLECT_METRICS)
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(true),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AssemblyPreferences {
    /// Close intermediate heads when a tail matches a head deeper in the stack.
    /// Off by default: a tail pops the innermost head and a mismatch leaves
    /// both unpaired.
    pub recover_deep_tails: bool,

    /// Whether to log each pairing diagnostic as it is recorded
    pub log_diagnostics: bool,
}

impl Default for AssemblyPreferences {
    fn default() -> Self {
        Self {
            recover_deep_tails: env::var(env_vars::ASSEMBLY_RECOVER_DEEP_TAILS)
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(false),
            log_diagnostics: env::var(env_vars::ASSEMBLY_LOG_DIAGNOSTICS)
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(true),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingPreferences {
    /// Emit JSON lines instead of human-readable text
    pub use_structured_logging: bool,

    /// Whether to write log events to stderr at all
    pub enable_console_logging: bool,

    /// Minimum level that reaches the logger
    pub min_log_level: LogLevel,

    /// Whether to attach source excerpts to error reports
    pub include_source_excerpts: bool,
}

impl Default for LoggingPreferences {
    fn default() -> Self {
        Self {
            use_structured_logging: env::var(env_vars::LOGGING_USE_STRUCTURED)
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(false),
            enable_console_logging: env::var(env_vars::LOGGING_ENABLE_CONSOLE)
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(true),
            min_log_level: env::var(env_vars::LOGGING_MIN_LEVEL)
                .ok()
                .and_then(|v| parse_log_level(&v))
                .unwrap_or(LogLevel::Warning),
            include_source_excerpts: env::var(env_vars::LOGGING_SOURCE_EXCERPTS)
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(true),
        }
    }
}

/// Parse log level from string (used for environment variables and the CLI)
pub fn parse_log_level(level: &str) -> Option<LogLevel> {
    match level.to_lowercase().as_str() {
        "error" | "0" => Some(LogLevel::Error),
        "warning" | "warn" | "1" => Some(LogLevel::Warning),
        "info" | "2" => Some(LogLevel::Info),
        "debug" | "3" => Some(LogLevel::Debug),
        _ => None,
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct RuntimeConfig {
    pub lexical: LexicalPreferences,
    pub assembly: AssemblyPreferences,
    pub logging: LoggingPreferences,
}

impl RuntimeConfig {
    /// Parse preferences from TOML; missing tables and keys keep their defaults
    pub fn from_toml_str(content: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(content)
    }

    /// Load preferences from a TOML file
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, String> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .map_err(|e| format!("Failed to read {}: {}", path.display(), e))?;
        Self::from_toml_str(&content).map_err(|e| format!("Invalid TOML in {}: {}", path.display(), e))
    }
}

/// Environment variable names for configuration
pub mod env_vars {
    // Lexical
    pub const LEXICAL_RECORD_TOKENS: &str = "CPTML_LEXICAL_RECORD_TOKENS";
    pub const LEXICAL_COLLECT_METRICS: &str = "CPTML_LEXICAL_COLLECT_METRICS";

    // Assembly
    pub const ASSEMBLY_RECOVER_DEEP_TAILS: &str = "CPTML_ASSEMBLY_RECOVER_DEEP_TAILS";
    pub const ASSEMBLY_LOG_DIAGNOSTICS: &str = "CPTML_ASSEMBLY_LOG_DIAGNOSTICS";

    // Logging
    pub const LOGGING_USE_STRUCTURED: &str = "CPTML_LOGGING_USE_STRUCTURED";
    pub const LOGGING_ENABLE_CONSOLE: &str = "CPTML_LOGGING_ENABLE_CONSOLE";
    pub const LOGGING_MIN_LEVEL: &str = "CPTML_LOGGING_MIN_LEVEL";
    pub const LOGGING_SOURCE_EXCERPTS: &str = "CPTML_LOGGING_SOURCE_EXCERPTS";
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_log_level_parsing() {
        assert_eq!(parse_log_level("error"), Some(LogLevel::Error));
        assert_eq!(parse_log_level("ERROR"), Some(LogLevel::Error));
        assert_eq!(parse_log_level("warn"), Some(LogLevel::Warning));
        assert_eq!(parse_log_level("1"), Some(LogLevel::Warning));
        assert_eq!(parse_log_level("info"), Some(LogLevel::Info));
        assert_eq!(parse_log_level("3"), Some(LogLevel::Debug));
        assert_eq!(parse_log_level("loud"), None);
    }

    #[test]
    fn test_partial_toml_keeps_defaults() {
        let config = RuntimeConfig::from_toml_str(
            "[lexical]\nrecord_tokens = true\n\n[logging]\nmin_log_level = \"Debug\"\n",
        )
        .unwrap();

        assert!(config.lexical.record_tokens);
        assert_eq!(config.logging.min_log_level, LogLevel::Debug);
        // Untouched table falls back to Default
        let defaults = AssemblyPreferences::default();
        assert_eq!(
            config.assembly.recover_deep_tails,
            defaults.recover_deep_tails
        );
    }

    #[test]
    fn test_invalid_toml_is_rejected() {
        assert!(RuntimeConfig::from_toml_str("[lexical\nrecord_tokens = 1").is_err());
    }

    #[test]
    fn test_missing_file_reports_path() {
        let err = RuntimeConfig::from_file("/nonexistent/cptml.toml").unwrap_err();
        assert!(err.contains("/nonexistent/cptml.toml"));
    }
}
