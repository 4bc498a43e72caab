//! Error types and definitions for codemap
//!
//! Only the outer surfaces (configuration, the missing-root precondition and
//! output writing) produce hard errors. Problems with individual source files
//! are demoted to warnings by the walker.

use std::fmt;
use std::path::PathBuf;
use thiserror::Error;

/// Error severity levels for different error types
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorSeverity {
    /// Warning level errors - operation can continue
    Warning,
    /// Error level - current operation fails but overall process can continue
    Error,
    /// Critical level - process should terminate
    Critical,
}

impl fmt::Display for ErrorSeverity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ErrorSeverity::Warning => write!(f, "WARNING"),
            ErrorSeverity::Error => write!(f, "ERROR"),
            ErrorSeverity::Critical => write!(f, "CRITICAL"),
        }
    }
}

/// Main error type for codemap operations
#[derive(Debug, Error)]
pub enum CodemapError {
    /// Standard IO errors
    #[error("IO error: {source}")]
    Io {
        #[source]
        source: std::io::Error,
    },

    /// Configuration errors
    #[error("Configuration error: {message}")]
    Config { message: String },

    /// Permission denied errors
    #[error("Permission denied accessing {path}")]
    PermissionDenied { path: PathBuf },

    /// Invalid path errors; a missing scan root is the only fatal walk error
    #[error("Invalid path: {path}")]
    InvalidPath { path: PathBuf },

    /// CSV handling errors
    #[error("CSV error: {source}")]
    Csv {
        #[source]
        source: csv::Error,
    },

    /// Glob pattern errors
    #[error("Glob pattern error: {source}")]
    GlobPattern {
        #[source]
        source: glob::PatternError,
    },

    /// Configuration file not found
    #[error("Configuration file not found at {path}")]
    ConfigNotFound { path: PathBuf },

    /// Configuration file read errors
    #[error("Error reading configuration file {path}: {source}")]
    ConfigRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Configuration file parse errors
    #[error("Error parsing configuration file {path}: {source}")]
    ConfigParse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    /// Output file write errors
    #[error("Error writing to output file {path}: {source}")]
    OutputWrite {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Stdout write errors
    #[error("Error writing to stdout: {source}")]
    StdoutWrite {
        #[source]
        source: std::io::Error,
    },

    /// A source file that could not be turned into a model
    #[error("Skipping {path}: {reason}")]
    FileSkipped { path: PathBuf, reason: String },

    /// Directory traversal errors
    #[error("Directory traversal error for {path}: {message}")]
    DirectoryTraversal { path: PathBuf, message: String },

    /// Target document for `update` does not exist
    #[error("Document not found: {path}")]
    DocumentNotFound { path: PathBuf },

    /// `update` found nothing to insert
    #[error("No map content to insert")]
    EmptyMaps,

    /// JSON serialization error
    #[error("JSON serialization error: {source}")]
    JsonSerialize {
        #[source]
        source: serde_json::Error,
    },

    /// CSV output was not valid UTF-8
    #[error("CSV serialization error: {source}")]
    CsvSerialize {
        #[source]
        source: std::string::FromUtf8Error,
    },

    /// Output directory not found
    #[error("Output directory not found: {path}")]
    OutputDirectoryNotFound { path: PathBuf },

    /// Errors wrapped with extra context
    #[error("{message}")]
    Context { message: String },
}

impl CodemapError {
    /// Get the severity level of this error
    pub fn severity(&self) -> ErrorSeverity {
        match self {
            // Warning level errors - operation can continue
            CodemapError::PermissionDenied { .. } => ErrorSeverity::Warning,
            CodemapError::FileSkipped { .. } => ErrorSeverity::Warning,
            CodemapError::DirectoryTraversal { .. } => ErrorSeverity::Warning,

            // Critical errors - process should terminate
            CodemapError::InvalidPath { .. } => ErrorSeverity::Critical,
            CodemapError::Config { .. } => ErrorSeverity::Critical,
            CodemapError::ConfigNotFound { .. } => ErrorSeverity::Critical,
            CodemapError::ConfigRead { .. } => ErrorSeverity::Critical,
            CodemapError::ConfigParse { .. } => ErrorSeverity::Critical,
            CodemapError::StdoutWrite { .. } => ErrorSeverity::Critical,
            CodemapError::OutputDirectoryNotFound { .. } => ErrorSeverity::Critical,

            // Regular errors - current operation fails but overall process can continue
            _ => ErrorSeverity::Error,
        }
    }

    /// Check if this is a critical error that should terminate the process
    pub fn is_critical(&self) -> bool {
        self.severity() == ErrorSeverity::Critical
    }

    /// Get a user-friendly error message
    pub fn user_message(&self) -> String {
        match self {
            CodemapError::PermissionDenied { path } => {
                format!("Cannot access '{}' due to permission denied. Check file permissions.", path.display())
            }
            CodemapError::Io { source } => {
                format!("File system error: {}. Check disk space and permissions.", source)
            }
            CodemapError::InvalidPath { path } => {
                format!("Invalid path: '{}'. Please provide an existing directory.", path.display())
            }
            CodemapError::ConfigNotFound { path } => {
                format!("Configuration file not found at '{}'. Create a config file or use command line options.", path.display())
            }
            CodemapError::DocumentNotFound { path } => {
                format!("Document '{}' does not exist. Create it first or point --doc at an existing file.", path.display())
            }
            CodemapError::OutputDirectoryNotFound { path } => {
                format!("Output directory '{}' does not exist. Please create the directory or specify a different output path.", path.display())
            }
            // For other errors, use the standard Display implementation
            _ => self.to_string(),
        }
    }

    /// Suggested next step for the user, when there is an obvious one
    pub fn suggestion(&self) -> Option<&'static str> {
        match self {
            CodemapError::InvalidPath { .. } => Some("Check that the --root path exists and is accessible"),
            CodemapError::ConfigNotFound { .. } => {
                Some("Run `codemap init` to create a .codemap.toml or pass --config with an existing file")
            }
            CodemapError::ConfigParse { .. } => Some("Fix the TOML syntax or regenerate the file with `codemap init`"),
            CodemapError::PermissionDenied { .. } => Some("Check file permissions"),
            CodemapError::OutputDirectoryNotFound { .. } => {
                Some("Create the output directory first or specify a different path")
            }
            CodemapError::EmptyMaps => Some("Run `codemap map --output <file>` first and pass the produced files to --maps"),
            _ => None,
        }
    }

    /// Create an IO error with context
    pub fn io_error(source: std::io::Error) -> Self {
        CodemapError::Io { source }
    }

    /// Create a configuration error
    pub fn config_error(message: impl Into<String>) -> Self {
        CodemapError::Config {
            message: message.into(),
        }
    }

    /// Create a permission denied error
    pub fn permission_denied(path: impl Into<PathBuf>) -> Self {
        CodemapError::PermissionDenied { path: path.into() }
    }

    /// Create an invalid path error
    pub fn invalid_path(path: impl Into<PathBuf>) -> Self {
        CodemapError::InvalidPath { path: path.into() }
    }

    /// Create a file skip warning
    pub fn file_skipped(path: impl Into<PathBuf>, reason: impl fmt::Display) -> Self {
        CodemapError::FileSkipped {
            path: path.into(),
            reason: reason.to_string(),
        }
    }

    /// Create a directory traversal error
    pub fn directory_traversal_error(path: impl Into<PathBuf>, message: impl Into<String>) -> Self {
        CodemapError::DirectoryTraversal {
            path: path.into(),
            message: message.into(),
        }
    }
}

// Implement From for common error types
impl From<std::io::Error> for CodemapError {
    fn from(err: std::io::Error) -> Self {
        CodemapError::io_error(err)
    }
}

impl From<csv::Error> for CodemapError {
    fn from(err: csv::Error) -> Self {
        CodemapError::Csv { source: err }
    }
}

impl From<glob::PatternError> for CodemapError {
    fn from(err: glob::PatternError) -> Self {
        CodemapError::GlobPattern { source: err }
    }
}

impl From<serde_json::Error> for CodemapError {
    fn from(err: serde_json::Error) -> Self {
        CodemapError::JsonSerialize { source: err }
    }
}

/// Result type alias for codemap operations
pub type Result<T> = std::result::Result<T, CodemapError>;
