//! Error types for Limitrofe.
//!
//! Library crates use [`LimitrofeError`] via `thiserror`.
//! App crates (cli/tui) wrap this with `color-eyre` for rich diagnostics.

use std::path::PathBuf;

/// Top-level error type for all Limitrofe operations.
#[derive(Debug, thiserror::Error)]
pub enum LimitrofeError {
    /// Configuration loading or validation error.
    #[error("config error: {message}")]
    Config { message: String },

    /// The text source could not be fetched (transport error or non-success status).
    #[error("fetch error: {0}")]
    Fetch(String),

    /// The header line lacks one of the required field names.
    #[error("missing column {column:?} in header {header:?}")]
    MissingColumn { column: String, header: Vec<String> },

    /// Filesystem I/O error.
    #[error("I/O error at {path:?}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    /// Data validation error (invalid location, oversized body, etc.).
    #[error("validation error: {message}")]
    Validation { message: String },
}

/// Convenience alias used throughout the codebase.
pub type Result<T> = std::result::Result<T, LimitrofeError>;

/// Coarse classification of a failed dataset load.
///
/// Unreachable and malformed datasets are presented the same way to the
/// user, but logs and the CLI keep them apart.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureKind {
    /// The text could not be obtained.
    Fetch,
    /// The header did not name both required fields.
    MissingColumn,
    /// Anything else.
    Other,
}

impl std::fmt::Display for FailureKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Fetch => write!(f, "fetch failure"),
            Self::MissingColumn => write!(f, "missing column"),
            Self::Other => write!(f, "error"),
        }
    }
}

impl LimitrofeError {
    /// Create a config error from any displayable message.
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config {
            message: msg.into(),
        }
    }

    /// Create a fetch error from any displayable message.
    pub fn fetch(msg: impl Into<String>) -> Self {
        Self::Fetch(msg.into())
    }

    /// Create a validation error from any displayable message.
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation {
            message: msg.into(),
        }
    }

    /// Wrap a `std::io::Error` with a path for context.
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    /// Classify this error for load-failure reporting.
    ///
    /// Reading a local source file is the file-system flavour of a fetch,
    /// so `Io` counts as [`FailureKind::Fetch`].
    pub fn kind(&self) -> FailureKind {
        match self {
            Self::Fetch(_) | Self::Io { .. } => FailureKind::Fetch,
            Self::MissingColumn { .. } => FailureKind::MissingColumn,
            Self::Config { .. } | Self::Validation { .. } => FailureKind::Other,
        }
    }
}
