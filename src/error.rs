//! Error types for tsugumi operations.

use thiserror::Error;

use crate::aozora::DecodeError;
use crate::model::FragmentError;

/// Fatal errors that abort a parse.
///
/// Every variant raised while reading the manuscript carries the 1-based
/// line number of the offending source line.
#[derive(Error, Debug)]
pub enum Error {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("invalid number of book info lines ({count}) on line {line}")]
    Metadata { line: usize, count: usize },

    #[error("unmatched block: {tag} on line {line}")]
    UnmatchedBlock { line: usize, tag: String },

    #[error("unexpected block tag: {tag} on line {line}")]
    UnexpectedBlockTag { line: usize, tag: String },

    #[error("character reference decoding failed on line {line}: {source}")]
    Decode {
        line: usize,
        #[source]
        source: DecodeError,
    },

    #[error("fragment edit failed on line {line}: {source}")]
    Fragment {
        line: usize,
        #[source]
        source: FragmentError,
    },
}

impl Error {
    /// Source line the error refers to, if any.
    pub fn line(&self) -> Option<usize> {
        match self {
            Error::Io(_) => None,
            Error::Metadata { line, .. }
            | Error::UnmatchedBlock { line, .. }
            | Error::UnexpectedBlockTag { line, .. }
            | Error::Decode { line, .. }
            | Error::Fragment { line, .. } => Some(*line),
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;
