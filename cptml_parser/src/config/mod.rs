//! Configuration module for the CPTML parser
//! Compile-time limits come from the generated TOML constants; user-facing
//! preferences live in [`runtime`].

// Generated by build.rs from config/<profile>.toml at the workspace root
include!(concat!(env!("OUT_DIR"), "/constants.rs"));

pub mod runtime;

pub use runtime::RuntimeConfig;

/// Build information and configuration metadata
pub mod build_info {
    /// Returns the configuration profile used during build
    pub fn profile() -> &'static str {
        option_env!("CPTML_BUILD_PROFILE").unwrap_or("development")
    }

    /// Returns the configuration directory used during build
    pub fn config_dir() -> &'static str {
        option_env!("CPTML_CONFIG_DIR").unwrap_or("config")
    }

    /// Returns configuration source information
    pub fn source_info() -> String {
        format!("Generated from {}/{}.toml", config_dir(), profile())
    }
}

/// One-line summary of the active limits, used by the CLI's verbose output
pub fn limits_summary() -> String {
    format!(
        "profile={} max_nesting_depth={} max_file_size={} max_diagnostics={}",
        build_info::profile(),
        compile_time::syntax::MAX_NESTING_DEPTH,
        compile_time::file_processing::MAX_FILE_SIZE,
        compile_time::assembly::MAX_DIAGNOSTICS,
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generated_limits_are_sane() {
        assert!(compile_time::syntax::MAX_NESTING_DEPTH > 0);
        assert!(compile_time::lexical::MAX_IDENTIFIER_LENGTH > 0);
        assert!(compile_time::assembly::MAX_OPEN_HEADS > 0);
        assert!(compile_time::logging::LOG_BUFFER_SIZE >= 100);
    }

    #[test]
    fn test_source_info_names_profile() {
        assert!(build_info::source_info().contains(build_info::profile()));
        assert!(limits_summary().contains("max_nesting_depth="));
    }
}
