use std::fmt;

use super::{Cursor, CursorError};

/// Applies a function to each element of an upstream cursor.
///
/// The function runs when `current()` is read, never on `advance()`, and at
/// most once per element: the mapped value is kept until the next advance.
///
/// # Examples
///
/// ```rust
/// use fstream::cursor::{self, Cursor};
///
/// let mut cursor = cursor::from_slice(vec![1, 2, 3]).map(|value| value * 2);
/// cursor.advance().unwrap();
/// assert_eq!(cursor.current(), Ok(2));
/// ```
pub struct Map<C, F, U> {
    upstream: C,
    function: F,
    mapped: Option<U>,
}

impl<C, F, U> Map<C, F, U>
where
    C: Cursor,
    F: FnMut(C::Item) -> U,
{
    /// Wraps `upstream`.
    pub const fn new(upstream: C, function: F) -> Self {
        Self {
            upstream,
            function,
            mapped: None,
        }
    }
}

impl<C: fmt::Debug, F, U: fmt::Debug> fmt::Debug for Map<C, F, U> {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter
            .debug_struct("Map")
            .field("upstream", &self.upstream)
            .field("mapped", &self.mapped)
            .finish_non_exhaustive()
    }
}

impl<C, F, U> Cursor for Map<C, F, U>
where
    C: Cursor,
    F: FnMut(C::Item) -> U,
    U: Clone,
{
    type Item = U;

    #[inline]
    fn has_next(&mut self) -> bool {
        self.upstream.has_next()
    }

    fn advance(&mut self) -> Result<(), CursorError> {
        self.upstream.advance()?;
        self.mapped = None;
        Ok(())
    }

    fn current(&mut self) -> Result<U, CursorError> {
        if let Some(mapped) = &self.mapped {
            return Ok(mapped.clone());
        }
        let mapped = (self.function)(self.upstream.current()?);
        self.mapped = Some(mapped.clone());
        Ok(mapped)
    }
}
