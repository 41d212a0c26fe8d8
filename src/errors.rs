//! Hard-failure error type for the documentation pipeline.
//!
//! Only a handful of things can stop a run: a file that cannot be read or
//! parsed, a broken configuration, a worker pool that fails to start, or a
//! class index that violates its uniqueness invariant. Everything else the
//! pipeline notices is recorded as a [`Diagnostic`](crate::diagnostics::Diagnostic)
//! and processing continues.

use std::path::PathBuf;
use thiserror::Error;

/// Errors that abort the pipeline.
#[derive(Debug, Error)]
pub enum DocError {
    /// A source file could not be parsed. Always fatal for the whole run.
    #[error("Parse error in {}{}: {message}", .path.display(), line_suffix(.line))]
    Parse {
        path: PathBuf,
        line: Option<usize>,
        message: String,
    },

    /// A source file could not be read.
    #[error("Failed to read {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Configuration file or option errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// Two classes with the same name reached the class index.
    #[error("Duplicate class name in class index: {0}")]
    DuplicateClass(String),

    /// The parse worker pool could not be created.
    #[error("Worker pool error: {0}")]
    WorkerPool(String),

    /// A pipeline stage failed; wraps the underlying message with the stage name.
    #[error("Failed in stage '{stage}': {message}")]
    Stage { stage: String, message: String },

    #[error("{0}")]
    Other(String),
}

impl DocError {
    /// Create a parse error for a file, optionally pointing at a line.
    pub fn parse(
        path: impl Into<PathBuf>,
        line: Option<usize>,
        message: impl Into<String>,
    ) -> Self {
        Self::Parse {
            path: path.into(),
            line,
            message: message.into(),
        }
    }

    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    pub fn other(message: impl Into<String>) -> Self {
        Self::Other(message.into())
    }

    /// The file this error refers to, if any.
    pub fn path(&self) -> Option<&PathBuf> {
        match self {
            Self::Parse { path, .. } | Self::Io { path, .. } => Some(path),
            _ => None,
        }
    }

    /// Whether this error came from reading or parsing an input file.
    pub fn is_input_failure(&self) -> bool {
        matches!(self, Self::Parse { .. } | Self::Io { .. })
    }
}

fn line_suffix(line: &Option<usize>) -> String {
    line.map(|l| format!(":{l}")).unwrap_or_default()
}

impl From<std::convert::Infallible> for DocError {
    fn from(never: std::convert::Infallible) -> Self {
        match never {}
    }
}
