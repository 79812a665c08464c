//! Error types for pipeline operations
//!
//! Every fault raised by the engine is a `StreamError`. Nothing inside the
//! crate catches, retries or logs these; they propagate to the caller.

use std::fmt;

/// Main error type for pipeline operations
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum StreamError {
    /// The pipeline was already consumed by a terminal operation or closed,
    /// or a builder was used after `build()`
    #[error("Illegal state: {0}")]
    IllegalState(String),
    /// An argument was outside its allowed range
    #[error("Illegal argument: {0}")]
    IllegalArgument(String),
    /// `to_map` met the same key twice without a merge function
    #[error("Duplicate key {0}")]
    DuplicateKey(String),
    /// Two elements could not be ordered while sorting
    #[error("Elements are not mutually comparable: {0}")]
    Incomparable(String),
    /// Several close actions failed; the first failure is primary
    #[error("{}", AggregateDisplay(.primary, .suppressed))]
    Aggregate {
        primary: Box<StreamError>,
        suppressed: Vec<StreamError>,
    },
    /// Custom error with message, typically raised by user close actions
    #[error("Stream error: {0}")]
    Custom(String),
}

impl StreamError {
    pub(crate) fn terminated() -> Self {
        StreamError::IllegalState("stream has already been operated upon or closed".to_string())
    }

    /// Build the error reported after running a batch of close actions.
    ///
    /// Returns `None` when nothing failed.
    pub(crate) fn aggregate(mut failures: Vec<StreamError>) -> Option<Self> {
        match failures.len() {
            0 => None,
            1 => failures.pop(),
            _ => {
                let primary = failures.remove(0);
                Some(StreamError::Aggregate {
                    primary: Box::new(primary),
                    suppressed: failures,
                })
            }
        }
    }

    /// The primary failure; for anything but `Aggregate` this is `self`.
    pub fn primary(&self) -> &StreamError {
        match self {
            StreamError::Aggregate { primary, .. } => primary,
            other => other,
        }
    }

    /// Failures attached to the primary one, in the order they happened.
    pub fn suppressed(&self) -> &[StreamError] {
        match self {
            StreamError::Aggregate { suppressed, .. } => suppressed,
            _ => &[],
        }
    }

    pub fn is_illegal_state(&self) -> bool {
        matches!(self, StreamError::IllegalState(_))
    }
}

struct AggregateDisplay<'a>(&'a StreamError, &'a [StreamError]);

impl fmt::Display for AggregateDisplay<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)?;
        if !self.1.is_empty() {
            write!(f, " (suppressed: ")?;
            for (i, error) in self.1.iter().enumerate() {
                if i > 0 {
                    write!(f, ", ")?;
                }
                write!(f, "{}", error)?;
            }
            write!(f, ")")?;
        }
        Ok(())
    }
}

/// Result type for pipeline operations
pub type StreamResult<T> = Result<T, StreamError>;
