// ABOUTME: Sandboxed I/O module for the Lisp interpreter
// Provides safe filesystem access with capability-based security using cap-std

use crate::config::FsConfig;
use cap_std::fs::Dir;

/// Error type for sandbox operations
#[derive(Debug, Clone)]
pub enum SandboxError {
    PathNotAllowed(String),
    FileNotFound(String),
    FileTooLarge(String),
    IoError(String),
}

impl std::fmt::Display for SandboxError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SandboxError::PathNotAllowed(path) => {
                write!(f, "Access denied: {} is not in allowed paths", path)
            }
            SandboxError::FileNotFound(path) => {
                write!(f, "File not found: {}", path)
            }
            SandboxError::FileTooLarge(msg) => {
                write!(f, "File too large: {}", msg)
            }
            SandboxError::IoError(msg) => {
                write!(f, "I/O error: {}", msg)
            }
        }
    }
}

impl std::error::Error for SandboxError {}

/// Sandbox for safe file access, via capability-based security (cap-std).
///
/// Only the single read operation `slurp` needs — network I/O and writes
/// are out of scope here, so `NetConfig` and the write-side machinery the
/// original sandbox carried are gone.
pub struct Sandbox {
    fs_roots: Vec<Dir>,
    fs_config: FsConfig,
}

impl Sandbox {
    pub fn new(fs_config: FsConfig) -> Result<Self, SandboxError> {
        let mut fs_roots = Vec::new();

        for path in &fs_config.allowed_paths {
            std::fs::create_dir_all(path)
                .map_err(|e| SandboxError::IoError(format!("Cannot create {}: {}", path.display(), e)))?;

            let dir = Dir::open_ambient_dir(path, cap_std::ambient_authority())
                .map_err(|e| SandboxError::IoError(format!("Cannot open {}: {}", path.display(), e)))?;

            fs_roots.push(dir);
        }

        Ok(Self { fs_roots, fs_config })
    }

    /// Reads a file's contents as a UTF-8 string.
    ///
    /// `path` must be relative and may not contain `..` traversal segments;
    /// cap-std's `Dir` additionally rejects absolute paths and symlink
    /// escapes at the OS level.
    pub fn slurp(&self, path: &str) -> Result<String, SandboxError> {
        if path.starts_with('/') || path.starts_with('\\') {
            return Err(SandboxError::PathNotAllowed(path.to_string()));
        }
        if path.contains("..") {
            return Err(SandboxError::PathNotAllowed(path.to_string()));
        }

        for root in &self.fs_roots {
            match root.read_to_string(path) {
                Ok(contents) => {
                    if contents.len() > self.fs_config.max_file_size {
                        return Err(SandboxError::FileTooLarge(format!(
                            "{} exceeds max size of {} bytes",
                            path, self.fs_config.max_file_size
                        )));
                    }
                    return Ok(contents);
                }
                Err(e) if e.kind() == std::io::ErrorKind::NotFound => continue,
                Err(e) => return Err(SandboxError::IoError(format!("Cannot read {}: {}", path, e))),
            }
        }

        if self.fs_roots.is_empty() {
            return Err(SandboxError::PathNotAllowed(path.to_string()));
        }
        Err(SandboxError::FileNotFound(path.to_string()))
    }
}
