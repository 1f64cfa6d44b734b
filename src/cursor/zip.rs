use std::fmt;

use super::{Cursor, CursorError};

/// Pairs the elements of two cursors positionally.
///
/// `has_next` asks the first cursor before the second and stops at the
/// first `false`, so once the first cursor is drained the second is never
/// touched again. Elements of the longer input past the shorter one's end
/// are never pulled.
///
/// # Examples
///
/// ```rust
/// use fstream::cursor::{self, Cursor};
///
/// let pairs: Vec<(i32, char)> = cursor::from_slice(vec![1, 2, 3])
///     .zip_with(cursor::from_slice(vec!['a', 'b']), |number, letter| (number, letter))
///     .into_items()
///     .collect();
/// assert_eq!(pairs, vec![(1, 'a'), (2, 'b')]);
/// ```
pub struct Zip<A, B, F> {
    first: A,
    second: B,
    function: F,
}

impl<A, B, F, V> Zip<A, B, F>
where
    A: Cursor,
    B: Cursor,
    F: FnMut(A::Item, B::Item) -> V,
{
    /// Zips `first` with `second`.
    pub const fn new(first: A, second: B, function: F) -> Self {
        Self {
            first,
            second,
            function,
        }
    }
}

impl<A: fmt::Debug, B: fmt::Debug, F> fmt::Debug for Zip<A, B, F> {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter
            .debug_struct("Zip")
            .field("first", &self.first)
            .field("second", &self.second)
            .finish_non_exhaustive()
    }
}

impl<A, B, F, V> Cursor for Zip<A, B, F>
where
    A: Cursor,
    B: Cursor,
    F: FnMut(A::Item, B::Item) -> V,
{
    type Item = V;

    fn has_next(&mut self) -> bool {
        self.first.has_next() && self.second.has_next()
    }

    fn advance(&mut self) -> Result<(), CursorError> {
        if !self.has_next() {
            return Err(CursorError::exhausted("Zip"));
        }
        self.first.advance()?;
        self.second.advance()
    }

    fn current(&mut self) -> Result<V, CursorError> {
        let left = self.first.current()?;
        let right = self.second.current()?;
        Ok((self.function)(left, right))
    }
}
