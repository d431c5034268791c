//! Error types and handling for lazyseq
//!
//! Every fallible pull and every terminal consumer reports a [`SeqError`].

/// Main error type for sequence operations
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum SeqError {
    /// The value exposes neither synchronous nor asynchronous iteration
    #[error("value is neither synchronously nor asynchronously iterable")]
    NotIterable,
    /// `find` drained its input without a match
    #[error("no yielded value satisfied the provided condition")]
    NotFound,
    /// An unseeded reduction saw no elements
    #[error("cannot reduce an empty sequence without an initial value")]
    Empty,
    /// `collect_with` hit its configured maximum length
    #[error("collection exceeded its limit of {limit} elements")]
    CapacityExceeded { limit: usize },
    /// A source cursor failed to produce its next element
    #[error("upstream failure: {0}")]
    Upstream(String),
    /// Custom error with message
    #[error("sequence error: {0}")]
    Custom(String),
}

impl SeqError {
    /// Wrap any displayable failure of a source as [`SeqError::Upstream`].
    pub fn upstream(err: impl std::fmt::Display) -> Self {
        SeqError::Upstream(err.to_string())
    }
}

impl From<std::io::Error> for SeqError {
    fn from(err: std::io::Error) -> Self {
        SeqError::Upstream(err.to_string())
    }
}

/// Result type for lazyseq operations
pub type SeqResult<T> = Result<T, SeqError>;
