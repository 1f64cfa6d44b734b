use std::iter::FusedIterator;

use super::{Cursor, CursorError};

/// Drives a cursor as a [`std::iter::Iterator`].
///
/// Each `next` runs one `has_next` / `advance` / `current` round.
///
/// # Panics
///
/// A well-behaved cursor never fails after `has_next` returned `true`. If
/// the wrapped cursor does (a broken foreign cursor, or a failure replayed
/// from an upstream cursor), `next` panics with that error rather than
/// reporting it as the end of the sequence. Use [`Cursor::try_next`] to
/// handle such failures as values.
///
/// The one exception is [`CursorError::Consumed`]: a one-shot source that
/// was already handed out contributes no elements, and iteration ends.
///
/// # Examples
///
/// ```rust
/// use fstream::cursor::{self, Cursor};
///
/// let total: i32 = cursor::from_slice(vec![1, 2, 3]).into_items().sum();
/// assert_eq!(total, 6);
/// ```
#[derive(Debug, Clone)]
pub struct CursorIter<C> {
    cursor: C,
}

impl<C: Cursor> CursorIter<C> {
    /// Wraps `cursor`.
    pub const fn new(cursor: C) -> Self {
        Self { cursor }
    }

    /// Returns the wrapped cursor, positioned where iteration stopped.
    ///
    /// Handing a cursor back through this method (rather than adapting the
    /// iterator with [`IteratorCursor`](super::IteratorCursor)) avoids
    /// wrapping a cursor in a second cursor.
    pub fn into_cursor(self) -> C {
        self.cursor
    }
}

impl<C: Cursor> Iterator for CursorIter<C> {
    type Item = C::Item;

    fn next(&mut self) -> Option<C::Item> {
        match self.cursor.try_next() {
            Ok(element) => element,
            Err(CursorError::Consumed(_)) => None,
            Err(error) => panic!("cursor failed after reporting another element: {error}"),
        }
    }
}

impl<C: Cursor> FusedIterator for CursorIter<C> {}

/// Conversion into a cursor.
///
/// A cursor converts to itself and a [`CursorIter`] converts back to the
/// cursor it wraps, so a cursor that went through the iterator bridge is
/// never wrapped a second time.
///
/// # Examples
///
/// ```rust
/// use fstream::cursor::{self, Cursor, IntoCursor, SliceCursor};
///
/// let bridged = cursor::from_slice(vec![1, 2]).into_items();
/// let mut unwrapped: SliceCursor<i32> = IntoCursor::into_cursor(bridged);
/// assert_eq!(unwrapped.try_next(), Ok(Some(1)));
/// ```
pub trait IntoCursor {
    /// The type of the elements produced.
    type Item;

    /// The cursor this value converts into.
    type IntoCursor: Cursor<Item = Self::Item>;

    /// Converts `self` into a cursor.
    fn into_cursor(self) -> Self::IntoCursor;
}

impl<C: Cursor> IntoCursor for C {
    type Item = C::Item;
    type IntoCursor = Self;

    #[inline]
    fn into_cursor(self) -> Self {
        self
    }
}

impl<C: Cursor> IntoCursor for CursorIter<C> {
    type Item = C::Item;
    type IntoCursor = C;

    #[inline]
    fn into_cursor(self) -> C {
        self.cursor
    }
}
