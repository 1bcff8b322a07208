// build.rs - TOML-driven compile-time limit generation
use std::env;
use std::fs;
use std::path::Path;

#[derive(serde::Deserialize)]
struct CompileTimeConfig {
    file_processing: FileProcessingLimits,
    lexical: LexicalLimits,
    syntax: SyntaxLimits,
    assembly: AssemblyLimits,
    logging: LoggingLimits,
}

#[derive(serde::Deserialize)]
struct FileProcessingLimits {
    max_file_size: u64,
    large_file_threshold: u64,
}

#[derive(serde::Deserialize)]
struct LexicalLimits {
    max_string_size: usize,
    max_identifier_length: usize,
    max_text_run_length: usize,
    max_token_history: usize,
}

#[derive(serde::Deserialize)]
struct SyntaxLimits {
    max_nesting_depth: usize,
    max_attributes_per_tag: usize,
    max_collection_entries: usize,
}

#[derive(serde::Deserialize)]
struct AssemblyLimits {
    max_diagnostics: usize,
    max_open_heads: usize,
}

#[derive(serde::Deserialize)]
struct LoggingLimits {
    log_buffer_size: usize,
    max_log_message_length: usize,
}

fn main() {
    println!("cargo:rerun-if-changed=build.rs");
    println!("cargo:rerun-if-env-changed=CPTML_BUILD_PROFILE");
    println!("cargo:rerun-if-env-changed=CPTML_CONFIG_DIR");

    let profile = env::var("CPTML_BUILD_PROFILE").unwrap_or_else(|_| "development".to_string());
    let config_dir = env::var("CPTML_CONFIG_DIR").unwrap_or_else(|_| "config".to_string());

    // Workspace root is the parent of the cptml_parser directory
    let manifest_dir = env::var("CARGO_MANIFEST_DIR").unwrap();
    let workspace_root = Path::new(&manifest_dir)
        .parent()
        .expect("Could not find workspace root (parent directory)");

    let config_path = workspace_root
        .join(&config_dir)
        .join(format!("{}.toml", profile));

    println!("cargo:rerun-if-changed={}", config_path.display());

    if !config_path.exists() {
        panic!(
            "Configuration file not found: {}\nWorkspace root: {}\nLooking for: {}/{}/{}.toml",
            config_path.display(),
            workspace_root.display(),
            workspace_root.display(),
            config_dir,
            profile
        );
    }

    let config_content = fs::read_to_string(&config_path)
        .unwrap_or_else(|e| panic!("Failed to read {}: {}", config_path.display(), e));

    let config: CompileTimeConfig = toml::from_str(&config_content)
        .unwrap_or_else(|e| panic!("Invalid TOML in {}: {}", config_path.display(), e));

    validate_limits(&config, &profile);
    generate_constants(&config, &profile);
}

fn validate_limits(config: &CompileTimeConfig, profile: &str) {
    const ABSOLUTE_MAX_FILE_SIZE: u64 = 1_000_000_000;
    const ABSOLUTE_MAX_NESTING_DEPTH: usize = 10_000;

    if config.file_processing.max_file_size > ABSOLUTE_MAX_FILE_SIZE {
        panic!("SECURITY: max_file_size exceeds absolute maximum");
    }

    if config.syntax.max_nesting_depth == 0 {
        panic!("LIMITS: max_nesting_depth must be at least 1");
    }

    if config.syntax.max_nesting_depth > ABSOLUTE_MAX_NESTING_DEPTH {
        panic!("SECURITY: max_nesting_depth exceeds absolute maximum (recursion is bounded by the native stack)");
    }

    if config.lexical.max_identifier_length == 0 || config.lexical.max_string_size == 0 {
        panic!("LIMITS: lexical limits must be non-zero");
    }

    if config.assembly.max_open_heads == 0 {
        panic!("LIMITS: max_open_heads must be at least 1");
    }

    if config.logging.log_buffer_size < 100 {
        panic!("LIMITS: log_buffer_size too small (min: 100)");
    }

    if profile == "production" {
        if config.file_processing.max_file_size > 50_000_000 {
            panic!("PRODUCTION: max_file_size too high for production");
        }
        if config.syntax.max_nesting_depth > 512 {
            panic!("PRODUCTION: max_nesting_depth too high for production");
        }
    }
}

fn generate_constants(config: &CompileTimeConfig, profile: &str) {
    let out_dir = env::var("OUT_DIR").unwrap();
    let output_path = Path::new(&out_dir).join("constants.rs");

    let constants_code = format!(
        r#"
// Generated compile-time constants from TOML configuration
// Profile: {}
// DO NOT EDIT - Generated by build.rs

pub mod compile_time {{
    pub mod file_processing {{
        pub const MAX_FILE_SIZE: u64 = {};
        pub const LARGE_FILE_THRESHOLD: u64 = {};
    }}

    pub mod lexical {{
        pub const MAX_STRING_SIZE: usize = {};
        pub const MAX_IDENTIFIER_LENGTH: usize = {};
        pub const MAX_TEXT_RUN_LENGTH: usize = {};
        pub const MAX_TOKEN_HISTORY: usize = {};
    }}

    pub mod syntax {{
        pub const MAX_NESTING_DEPTH: usize = {};
        pub const MAX_ATTRIBUTES_PER_TAG: usize = {};
        pub const MAX_COLLECTION_ENTRIES: usize = {};
    }}

    pub mod assembly {{
        pub const MAX_DIAGNOSTICS: usize = {};
        pub const MAX_OPEN_HEADS: usize = {};
    }}

    pub mod logging {{
        pub const LOG_BUFFER_SIZE: usize = {};
        pub const MAX_LOG_MESSAGE_LENGTH: usize = {};
    }}
}}
"#,
        profile,
        // File Processing
        config.file_processing.max_file_size,
        config.file_processing.large_file_threshold,
        // Lexical
        config.lexical.max_string_size,
        config.lexical.max_identifier_length,
        config.lexical.max_text_run_length,
        config.lexical.max_token_history,
        // Syntax
        config.syntax.max_nesting_depth,
        config.syntax.max_attributes_per_tag,
        config.syntax.max_collection_entries,
        // Assembly
        config.assembly.max_diagnostics,
        config.assembly.max_open_heads,
        // Logging
        config.logging.log_buffer_size,
        config.logging.max_log_message_length,
    );

    fs::write(output_path, constants_code).unwrap();
}
