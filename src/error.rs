// File: src/error.rs
use std::path::PathBuf;
use thiserror::Error;

/// Every failure the rhyming core can surface to its caller.
///
/// Nothing in the core catches these; they propagate to the binary (or any
/// other host) for presentation. Inputs are local and deterministic, so none
/// of them is worth retrying.
#[derive(Debug, Error)]
pub enum RhymeError {
    #[error("{0} not a known word")]
    UnknownWord(String),

    #[error("invalid variant {variant} for {word}; only {available} exist")]
    InvalidVariant {
        word: String,
        variant: usize,
        available: usize,
    },

    #[error("corrupt rhyme index: {0}")]
    CorruptIndex(String),

    #[error("cannot encode rhyme index: {0}")]
    Encode(String),

    #[error("{0} is not implemented")]
    UnsupportedFeature(&'static str),

    #[error("{path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("{path}:{line}: text is not valid in the requested encoding")]
    Decode { path: PathBuf, line: usize },

    #[error("unknown encoding {0:?}; expected utf-8 or latin-1")]
    UnknownEncoding(String),

    #[error("no dictionary to load")]
    NoDictionary,
}

impl RhymeError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io { path: path.into(), source }
    }
}

pub type Result<T> = std::result::Result<T, RhymeError>;
