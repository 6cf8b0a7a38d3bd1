//! Ingestion Error Types
//!
//! Hard failures only. Per-record problems are never errors; they are
//! [`ParseWarning`](super::diagnostics::ParseWarning)s.

use miette::Diagnostic;
use thiserror::Error;

/// Errors that stop a document (or the whole run) from being processed.
#[derive(Error, Debug, Diagnostic)]
pub enum IngestError {
    /// The input bytes are not UTF-8 text.
    #[error("input '{source_name}' is not valid UTF-8 text (invalid byte at offset {offset})")]
    #[diagnostic(
        code("COMPENDIUM::NOT_TEXT"),
        help("Convert the file to UTF-8 before importing")
    )]
    NotText {
        /// File name or other label for the input.
        source_name: String,
        /// Offset of the first invalid byte.
        offset: usize,
    },

    /// Reading an input file failed.
    #[error("failed to read '{path}'")]
    #[diagnostic(code("COMPENDIUM::IO"))]
    Io {
        /// Path that could not be read.
        path: String,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// A configuration file could not be parsed.
    #[error("invalid configuration in '{path}': {message}")]
    #[diagnostic(
        code("COMPENDIUM::CONFIG"),
        help("Check the file against the documented config sections: grammar, logging, output")
    )]
    Config {
        /// Path of the configuration file.
        path: String,
        /// Parser message.
        message: String,
    },
}

impl IngestError {
    /// Create an I/O error for `path`.
    pub fn io(path: impl Into<String>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    /// Create a configuration error for `path`.
    pub fn config(path: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Config {
            path: path.into(),
            message: message.into(),
        }
    }
}

/// Result alias for ingestion entry points.
pub type IngestResult<T> = Result<T, IngestError>;
