use std::fmt;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Why a single input line produced no record
///
/// Skips are recovered locally: the line is dropped and parsing continues.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SkipReason {
    /// Wrong number of tokens for the line kind
    TokenCount,
    /// A numeric field (id, time or value) did not parse as a finite number
    InvalidNumber,
    /// A context-dependent line appeared before its `module`/`statistic` line
    MissingContext,
    /// A declaration carried a column spec that could not be understood
    InvalidColumns,
    /// The leading keyword is not part of the format
    UnrecognizedLine,
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SkipReason::TokenCount => write!(f, "wrong token count"),
            SkipReason::InvalidNumber => write!(f, "invalid number"),
            SkipReason::MissingContext => write!(f, "no enclosing module or statistic"),
            SkipReason::InvalidColumns => write!(f, "invalid column spec"),
            SkipReason::UnrecognizedLine => write!(f, "unrecognized line"),
        }
    }
}

/// Errors reading a result file from disk
#[derive(Debug)]
pub enum ReadError {
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
}

impl fmt::Display for ReadError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ReadError::Io { path, source } => {
                write!(f, "failed to read {}: {source}", path.display())
            }
        }
    }
}

impl std::error::Error for ReadError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ReadError::Io { source, .. } => Some(source),
        }
    }
}

pub type Result<T> = std::result::Result<T, ReadError>;
