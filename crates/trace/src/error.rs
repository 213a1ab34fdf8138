// ABOUTME: Error types for the trace extractor including ErrorCode enum and TraceError struct.
// ABOUTME: Only fatal conditions live here; per-entry problems are warnings on the run report.

use std::fmt;
use std::path::{Path, PathBuf};

/// Error codes representing the fatal failure categories of a run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCode {
    InputNotFound,
    OutputWrite,
    Serialize,
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            ErrorCode::InputNotFound => "input not found",
            ErrorCode::OutputWrite => "output write error",
            ErrorCode::Serialize => "serialization error",
        };
        write!(f, "{}", s)
    }
}

/// The main error type for extraction runs.
#[derive(Debug, thiserror::Error)]
pub struct TraceError {
    pub code: ErrorCode,
    pub path: PathBuf,
    pub op: String,
    #[source]
    pub source: Option<anyhow::Error>,
}

impl fmt::Display for TraceError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}: {}", self.op, self.path.display(), self.code)?;
        if let Some(ref src) = self.source {
            write!(f, ": {}", src)?;
        }
        Ok(())
    }
}

impl TraceError {
    /// Create an InputNotFound error.
    pub fn input_not_found(
        path: impl AsRef<Path>,
        op: impl Into<String>,
        source: Option<anyhow::Error>,
    ) -> Self {
        Self {
            code: ErrorCode::InputNotFound,
            path: path.as_ref().to_path_buf(),
            op: op.into(),
            source,
        }
    }

    /// Create an OutputWrite error.
    pub fn output_write(
        path: impl AsRef<Path>,
        op: impl Into<String>,
        source: Option<anyhow::Error>,
    ) -> Self {
        Self {
            code: ErrorCode::OutputWrite,
            path: path.as_ref().to_path_buf(),
            op: op.into(),
            source,
        }
    }

    /// Create a Serialize error.
    pub fn serialize(
        path: impl AsRef<Path>,
        op: impl Into<String>,
        source: Option<anyhow::Error>,
    ) -> Self {
        Self {
            code: ErrorCode::Serialize,
            path: path.as_ref().to_path_buf(),
            op: op.into(),
            source,
        }
    }

    /// Returns true if this is an InputNotFound error.
    pub fn is_input_not_found(&self) -> bool {
        self.code == ErrorCode::InputNotFound
    }

    /// Returns true if this is an OutputWrite error.
    pub fn is_output_write(&self) -> bool {
        self.code == ErrorCode::OutputWrite
    }

    /// Returns true if this is a Serialize error.
    pub fn is_serialize(&self) -> bool {
        self.code == ErrorCode::Serialize
    }
}
