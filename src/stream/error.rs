//! Error types for stream operations.

use std::fmt;

use crate::cursor::CursorError;

/// Represents an operation that needs at least one element applied to an
/// empty stream.
///
/// # Examples
///
/// ```rust
/// use fstream::stream::EmptySourceError;
///
/// let error = EmptySourceError { operation: "head" };
/// assert_eq!(format!("{error}"), "Stream::head: stream is empty");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EmptySourceError {
    /// The name of the operation that failed.
    pub operation: &'static str,
}

impl fmt::Display for EmptySourceError {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(formatter, "Stream::{}: stream is empty", self.operation)
    }
}

impl std::error::Error for EmptySourceError {}

/// Represents a required-match search that exhausted the stream.
///
/// # Examples
///
/// ```rust
/// use fstream::stream::NoSuchElementError;
///
/// let error = NoSuchElementError { operation: "find_first" };
/// assert_eq!(
///     format!("{error}"),
///     "Stream::find_first: no element satisfies the predicate"
/// );
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NoSuchElementError {
    /// The name of the operation that failed.
    pub operation: &'static str,
}

impl fmt::Display for NoSuchElementError {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            formatter,
            "Stream::{}: no element satisfies the predicate",
            self.operation
        )
    }
}

impl std::error::Error for NoSuchElementError {}

/// Represents a second traversal of a single-pass stream.
///
/// # Examples
///
/// ```rust
/// use fstream::stream::AlreadyConsumedError;
///
/// let error = AlreadyConsumedError { operation: "try_cursor" };
/// assert_eq!(
///     format!("{error}"),
///     "Stream::try_cursor: single-pass stream already consumed"
/// );
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AlreadyConsumedError {
    /// The name of the operation that failed.
    pub operation: &'static str,
}

impl fmt::Display for AlreadyConsumedError {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            formatter,
            "Stream::{}: single-pass stream already consumed",
            self.operation
        )
    }
}

impl std::error::Error for AlreadyConsumedError {}

/// Represents errors that can occur in stream operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StreamError {
    /// The stream has no element.
    EmptySource(EmptySourceError),
    /// No element satisfied a required predicate.
    NoSuchElement(NoSuchElementError),
    /// A single-pass stream was traversed twice.
    AlreadyConsumed(AlreadyConsumedError),
    /// An underlying cursor broke the protocol.
    Cursor(CursorError),
}

impl StreamError {
    pub(crate) const fn empty_source(operation: &'static str) -> Self {
        Self::EmptySource(EmptySourceError { operation })
    }

    pub(crate) const fn no_such_element(operation: &'static str) -> Self {
        Self::NoSuchElement(NoSuchElementError { operation })
    }

    pub(crate) const fn already_consumed(operation: &'static str) -> Self {
        Self::AlreadyConsumed(AlreadyConsumedError { operation })
    }
}

impl fmt::Display for StreamError {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptySource(error) => write!(formatter, "{error}"),
            Self::NoSuchElement(error) => write!(formatter, "{error}"),
            Self::AlreadyConsumed(error) => write!(formatter, "{error}"),
            Self::Cursor(error) => write!(formatter, "{error}"),
        }
    }
}

impl std::error::Error for StreamError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::EmptySource(error) => Some(error),
            Self::NoSuchElement(error) => Some(error),
            Self::AlreadyConsumed(error) => Some(error),
            Self::Cursor(error) => Some(error),
        }
    }
}

/// A cursor standing in for a consumed single-pass source reports as
/// [`StreamError::AlreadyConsumed`]; every other cursor error is wrapped.
impl From<CursorError> for StreamError {
    fn from(error: CursorError) -> Self {
        match error {
            CursorError::Consumed(_) => Self::already_consumed("advance"),
            other => Self::Cursor(other),
        }
    }
}

impl From<EmptySourceError> for StreamError {
    fn from(error: EmptySourceError) -> Self {
        Self::EmptySource(error)
    }
}

impl From<NoSuchElementError> for StreamError {
    fn from(error: NoSuchElementError) -> Self {
        Self::NoSuchElement(error)
    }
}

impl From<AlreadyConsumedError> for StreamError {
    fn from(error: AlreadyConsumedError) -> Self {
        Self::AlreadyConsumed(error)
    }
}
