//! Error types for parsing, writing, and driving conversions.
//!
//! Every fallible operation in this crate returns [`ConvertError`] through
//! the crate-wide [`Result`] alias. The library never prints or logs;
//! callers (CLI, GUI) decide how each kind is presented.

use std::fmt;
use std::io;
use std::path::PathBuf;

use thiserror::Error;

use crate::convert::Format;

/// Errors that can occur while converting a document.
#[derive(Error, Debug)]
pub enum ConvertError {
    /// The input file does not exist or could not be read.
    #[error("cannot read input file '{}': {source}", .path.display())]
    Input {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// The input path's extension maps to no supported format.
    #[error("unrecognized input format for '{}': expected .json, .yaml, .yml, or .xml", .path.display())]
    UnknownFormat { path: PathBuf },

    /// The input document is not well-formed for its format.
    ///
    /// `message` is self-contained and includes the position when one is
    /// known; `location` carries the same position structurally for callers
    /// that present errors themselves.
    #[error("malformed {format} input: {message}")]
    Syntax {
        format: Format,
        message: String,
        location: Option<Location>,
    },

    /// The value tree cannot be represented in the requested output format.
    #[error("cannot represent value as {format}: {message}")]
    Structure { format: Format, message: String },

    /// The output file could not be written.
    #[error("cannot write output file '{}': {source}", .path.display())]
    Output {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

impl ConvertError {
    pub(crate) fn syntax(
        format: Format,
        message: impl Into<String>,
        location: Option<Location>,
    ) -> Self {
        ConvertError::Syntax {
            format,
            message: message.into(),
            location,
        }
    }

    pub(crate) fn structure(format: Format, message: impl Into<String>) -> Self {
        ConvertError::Structure {
            format,
            message: message.into(),
        }
    }
}

/// A 1-based line/column position inside an input document.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Location {
    pub line: usize,
    pub column: usize,
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "line {}, column {}", self.line, self.column)
    }
}

/// Convenience alias used throughout triform-core.
pub type Result<T> = std::result::Result<T, ConvertError>;
