//! Error types for the cursor protocol.
//!
//! A cursor fails when its consumer breaks the protocol (advancing past the
//! end, or reading before the first advance) or when it stands in for a
//! one-shot source that was already handed out. Running out of elements is
//! not an error; it is reported by `has_next() == false`.

use std::fmt;

/// Represents an `advance()` on a cursor that has no remaining elements.
///
/// # Examples
///
/// ```rust
/// use fstream::cursor::ExhaustedCursorError;
///
/// let error = ExhaustedCursorError { cursor_name: "SliceCursor" };
/// assert_eq!(
///     format!("{error}"),
///     "SliceCursor::advance: cursor is exhausted"
/// );
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExhaustedCursorError {
    /// The name of the cursor that was advanced.
    pub cursor_name: &'static str,
}

impl fmt::Display for ExhaustedCursorError {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(formatter, "{}::advance: cursor is exhausted", self.cursor_name)
    }
}

impl std::error::Error for ExhaustedCursorError {}

/// Represents a `current()` read before the first successful `advance()`.
///
/// # Examples
///
/// ```rust
/// use fstream::cursor::UnstartedCursorError;
///
/// let error = UnstartedCursorError { cursor_name: "Map" };
/// assert_eq!(
///     format!("{error}"),
///     "Map::current: cursor has not been advanced"
/// );
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UnstartedCursorError {
    /// The name of the cursor that was read.
    pub cursor_name: &'static str,
}

impl fmt::Display for UnstartedCursorError {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            formatter,
            "{}::current: cursor has not been advanced",
            self.cursor_name
        )
    }
}

impl std::error::Error for UnstartedCursorError {}

/// Represents a cursor opened over a one-shot source that had already been
/// handed out.
///
/// The cursor reports one more element and fails its next `advance()` with
/// this error, so the missing source is never mistaken for exhaustion.
///
/// # Examples
///
/// ```rust
/// use fstream::cursor::ConsumedCursorError;
///
/// let error = ConsumedCursorError { cursor_name: "Stream" };
/// assert_eq!(
///     format!("{error}"),
///     "Stream::advance: source was already consumed"
/// );
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ConsumedCursorError {
    /// The name of the cursor standing in for the source.
    pub cursor_name: &'static str,
}

impl fmt::Display for ConsumedCursorError {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            formatter,
            "{}::advance: source was already consumed",
            self.cursor_name
        )
    }
}

impl std::error::Error for ConsumedCursorError {}

/// Represents any failure of the cursor protocol.
///
/// Combinators never rewrap these: an error raised by an upstream cursor
/// reaches the consumer with the upstream cursor's name intact.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CursorError {
    /// `advance()` was called with nothing left.
    Exhausted(ExhaustedCursorError),
    /// `current()` was called before any `advance()`.
    Unstarted(UnstartedCursorError),
    /// The source behind the cursor was already consumed.
    Consumed(ConsumedCursorError),
}

impl CursorError {
    /// Builds an [`CursorError::Exhausted`] for the named cursor.
    #[inline]
    pub const fn exhausted(cursor_name: &'static str) -> Self {
        Self::Exhausted(ExhaustedCursorError { cursor_name })
    }

    /// Builds an [`CursorError::Unstarted`] for the named cursor.
    #[inline]
    pub const fn unstarted(cursor_name: &'static str) -> Self {
        Self::Unstarted(UnstartedCursorError { cursor_name })
    }

    /// Builds an [`CursorError::Consumed`] for the named cursor.
    #[inline]
    pub const fn consumed(cursor_name: &'static str) -> Self {
        Self::Consumed(ConsumedCursorError { cursor_name })
    }

    /// Returns the name of the cursor that raised the error.
    pub const fn cursor_name(&self) -> &'static str {
        match self {
            Self::Exhausted(error) => error.cursor_name,
            Self::Unstarted(error) => error.cursor_name,
            Self::Consumed(error) => error.cursor_name,
        }
    }

    /// Returns whether this is an exhaustion error.
    pub const fn is_exhausted(&self) -> bool {
        matches!(self, Self::Exhausted(_))
    }

    /// Returns whether this is an unstarted-read error.
    pub const fn is_unstarted(&self) -> bool {
        matches!(self, Self::Unstarted(_))
    }

    /// Returns whether the cursor's source was already consumed.
    pub const fn is_consumed(&self) -> bool {
        matches!(self, Self::Consumed(_))
    }
}

impl fmt::Display for CursorError {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Exhausted(error) => write!(formatter, "{error}"),
            Self::Unstarted(error) => write!(formatter, "{error}"),
            Self::Consumed(error) => write!(formatter, "{error}"),
        }
    }
}

impl std::error::Error for CursorError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Exhausted(error) => Some(error),
            Self::Unstarted(error) => Some(error),
            Self::Consumed(error) => Some(error),
        }
    }
}

impl From<ExhaustedCursorError> for CursorError {
    fn from(error: ExhaustedCursorError) -> Self {
        Self::Exhausted(error)
    }
}

impl From<UnstartedCursorError> for CursorError {
    fn from(error: UnstartedCursorError) -> Self {
        Self::Unstarted(error)
    }
}

impl From<ConsumedCursorError> for CursorError {
    fn from(error: ConsumedCursorError) -> Self {
        Self::Consumed(error)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use std::error::Error;

    #[rstest]
    fn test_exhausted_display() {
        let error = CursorError::exhausted("Filter");
        assert_eq!(format!("{error}"), "Filter::advance: cursor is exhausted");
    }

    #[rstest]
    fn test_unstarted_display() {
        let error = CursorError::unstarted("Zip");
        assert_eq!(format!("{error}"), "Zip::current: cursor has not been advanced");
    }

    #[rstest]
    fn test_consumed_display() {
        let error = CursorError::consumed("Stream");
        assert_eq!(format!("{error}"), "Stream::advance: source was already consumed");
    }

    #[rstest]
    #[case(CursorError::exhausted("Drop"), true, false, false)]
    #[case(CursorError::unstarted("Drop"), false, true, false)]
    #[case(CursorError::consumed("Drop"), false, false, true)]
    fn test_classification(
        #[case] error: CursorError,
        #[case] exhausted: bool,
        #[case] unstarted: bool,
        #[case] consumed: bool,
    ) {
        assert_eq!(error.is_exhausted(), exhausted);
        assert_eq!(error.is_unstarted(), unstarted);
        assert_eq!(error.is_consumed(), consumed);
        assert_eq!(error.cursor_name(), "Drop");
    }

    #[rstest]
    fn test_source_is_the_wrapped_error() {
        let error = CursorError::from(ExhaustedCursorError { cursor_name: "Concat" });
        let source = error.source().map(ToString::to_string);
        assert_eq!(
            source.as_deref(),
            Some("Concat::advance: cursor is exhausted")
        );
    }
}
