use crate::{CategoryKind, Kind};
use thiserror::Error;

/// A field whose text does not match its declared kind.
/// Recoverable: the field is kept as-is and the error is shown as a warning.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{key}: value {value:?} is not a valid {kind}")]
pub struct MalformedValue {
    pub key: String,
    pub kind: Kind,
    pub value: String,
}

/// Structured parse failure. Only the strict parse mode reports these; the
/// lenient parser recovers instead.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("parse error: {message}")]
pub struct ParseError {
    pub message: String,
}

#[derive(Debug, Error)]
pub enum TransferError {
    #[error("no {category} document at {location}")]
    NotFound {
        category: CategoryKind,
        location: String,
    },
    #[error("{category} document I/O failed: {error:#}")]
    Io {
        category: CategoryKind,
        error: anyhow::Error,
    },
    #[error("{category} document is not valid UTF-8")]
    NotUtf8 { category: CategoryKind },
    #[error("{category} document rejected: {source}")]
    Parse {
        category: CategoryKind,
        source: ParseError,
    },
}
