// ABOUTME: Configuration and constants for the Lisp interpreter
// This module contains version info, welcome messages, and I/O sandbox configuration

use std::path::PathBuf;

pub const VERSION: &str = "1.0.0";
pub const WELCOME_MESSAGE: &str = "Lisp Interpreter v1.0";
pub const WELCOME_SUBTITLE: &str = "A tree-walking Lisp with TCO, macros, and a sandboxed REPL";

// ============================================================================
// I/O Sandboxing Configuration
// ============================================================================

/// Filesystem sandbox configuration for `slurp`.
#[derive(Debug, Clone)]
pub struct FsConfig {
    pub allowed_paths: Vec<PathBuf>,
    pub max_file_size: usize,
}

impl Default for FsConfig {
    fn default() -> Self {
        Self {
            allowed_paths: vec![PathBuf::from("./data"), PathBuf::from("./scripts")],
            // Default max file size: 10MB
            max_file_size: 10 * 1024 * 1024,
        }
    }
}
