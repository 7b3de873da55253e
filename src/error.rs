//! Global error handling for codepack
//!
//! Errors are split by how far they are allowed to travel: ingestion errors
//! surface once per directory-open, content errors stay inside a single file
//! block of a bundle, and [`CodePackError`] covers everything the caller sees.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

use crate::clipboard::ClipboardError;

/// Failure of a whole ingestion run
#[derive(Error, Debug)]
pub enum IngestError {
    /// The root is a bare file, or a drop carried no directory entry
    #[error("Not a directory: {0}")]
    NotADirectory(String),

    /// The source cannot be read by the requested backend
    #[error("Backend unsupported: {0}")]
    BackendUnsupported(String),

    /// The user dismissed the picker or cancelled the run
    #[error("Ingestion aborted")]
    Aborted,

    /// The root itself could not be read
    #[error("IO error: {0}")]
    Io(#[from] io::Error),
}

impl IngestError {
    /// Cancellation is a clean no-op, never a user-facing error
    pub fn is_aborted(&self) -> bool {
        matches!(self, IngestError::Aborted)
    }
}

/// Failure to read one file's content
#[derive(Error, Debug)]
pub enum ContentError {
    /// The path has no handle in the content store
    #[error("File not found: {0}")]
    NotFound(String),

    /// The handle exists but reading it failed
    #[error("Failed to read {path}: {source}")]
    Read {
        path: String,
        #[source]
        source: io::Error,
    },
}

/// Global error type for codepack operations
#[derive(Error, Debug)]
pub enum CodePackError {
    /// Ingestion errors
    #[error("Ingest error: {0}")]
    Ingest(#[from] IngestError),

    /// Content read errors
    #[error("Content error: {0}")]
    Content(#[from] ContentError),

    /// Serialization was requested without a tree or without selected files
    #[error("No files selected")]
    EmptySelection,

    /// File system errors
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    /// JSON processing errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Regular expression errors
    #[error("Regex error: {0}")]
    Regex(#[from] regex::Error),

    /// Clipboard errors
    #[error("Clipboard error: {0}")]
    Clipboard(#[from] ClipboardError),

    /// Configuration errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// Path not found
    #[error("Path not found: {0}")]
    PathNotFound(PathBuf),
}

/// Specialized Result type for codepack operations
pub type Result<T> = std::result::Result<T, CodePackError>;

/// Creates a CodePackError with a formatted message
#[macro_export]
macro_rules! error {
    ($error_type:ident, $($arg:tt)*) => {
        $crate::error::CodePackError::$error_type(format!($($arg)*))
    };
}

/// Returns an error result with a formatted message
#[macro_export]
macro_rules! bail {
    ($error_type:ident, $($arg:tt)*) => {
        return Err($crate::error!($error_type, $($arg)*))
    };
}

/// Ensures a condition is true, otherwise returns an error
#[macro_export]
macro_rules! ensure {
    ($cond:expr, $error_type:ident, $($arg:tt)*) => {
        if !($cond) {
            $crate::bail!($error_type, $($arg)*)
        }
    };
}

// The binary reports errors through io::Error
impl From<CodePackError> for io::Error {
    fn from(err: CodePackError) -> Self {
        match err {
            CodePackError::Io(e) => e,
            CodePackError::PathNotFound(path) => io::Error::new(
                io::ErrorKind::NotFound,
                format!("Path not found: {}", path.display()),
            ),
            other => io::Error::new(io::ErrorKind::Other, other.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn check_port(port: u16) -> Result<()> {
        crate::ensure!(port > 0, Config, "invalid port {}", port);
        Ok(())
    }

    #[test]
    fn test_ensure_macro() {
        assert!(check_port(8080).is_ok());
        let err = check_port(0).unwrap_err();
        assert_eq!(err.to_string(), "Configuration error: invalid port 0");
    }

    #[test]
    fn test_aborted_is_distinguished() {
        assert!(IngestError::Aborted.is_aborted());
        assert!(!IngestError::NotADirectory("a.txt".into()).is_aborted());
    }

    #[test]
    fn test_io_error_conversion() {
        let err: io::Error = CodePackError::PathNotFound(PathBuf::from("/nope")).into();
        assert_eq!(err.kind(), io::ErrorKind::NotFound);
        let err: io::Error = CodePackError::EmptySelection.into();
        assert_eq!(err.to_string(), "No files selected");
    }
}
