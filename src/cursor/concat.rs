use std::fmt;

use super::{Cursor, CursorError, Pending};
use crate::control::Thunk;

/// Yields every element of a first cursor, then every element of a second.
///
/// The second cursor is opened only once the first reports no more
/// elements, and the switch happens at most once.
///
/// # Examples
///
/// ```rust
/// use fstream::cursor::{self, Cursor};
///
/// let joined: Vec<i32> = cursor::from_slice(vec![1, 2])
///     .concat(cursor::from_slice(vec![3]))
///     .into_items()
///     .collect();
/// assert_eq!(joined, vec![1, 2, 3]);
/// ```
pub struct Concat<A, B> {
    first: A,
    pending: Option<Pending<B>>,
    second: Option<B>,
    used_second: bool,
    reading_second: bool,
}

impl<A, B> Concat<A, B>
where
    A: Cursor,
    B: Cursor<Item = A::Item>,
{
    /// Concatenates two existing cursors.
    pub fn new(first: A, second: B) -> Self {
        Self {
            first,
            pending: Some(Pending::Ready(second)),
            second: None,
            used_second: false,
            reading_second: false,
        }
    }

    /// Concatenates `first` with a cursor obtained from `second` once `first`
    /// is drained.
    pub fn deferred<F>(first: A, second: F) -> Self
    where
        F: FnOnce() -> B + Send + 'static,
    {
        Self {
            first,
            pending: Some(Pending::Deferred(Box::new(second))),
            second: None,
            used_second: false,
            reading_second: false,
        }
    }

    /// The cursor whose current element is visible.
    fn reading(&mut self) -> &mut dyn Cursor<Item = A::Item> {
        match &mut self.second {
            Some(second) if self.reading_second => second,
            _ => &mut self.first,
        }
    }
}

impl<A: fmt::Debug, B: fmt::Debug> fmt::Debug for Concat<A, B> {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter
            .debug_struct("Concat")
            .field("first", &self.first)
            .field("second", &self.second)
            .field("used_second", &self.used_second)
            .field("reading_second", &self.reading_second)
            .finish_non_exhaustive()
    }
}

impl<A, B> Cursor for Concat<A, B>
where
    A: Cursor,
    B: Cursor<Item = A::Item>,
{
    type Item = A::Item;

    fn has_next(&mut self) -> bool {
        if self.used_second {
            return self
                .second
                .as_mut()
                .is_some_and(|second| second.has_next());
        }
        if self.first.has_next() {
            return true;
        }
        self.used_second = true;
        self.second = self.pending.take().map(Pending::open);
        self.second
            .as_mut()
            .is_some_and(|second| second.has_next())
    }

    fn advance(&mut self) -> Result<(), CursorError> {
        if !self.has_next() {
            return Err(CursorError::exhausted("Concat"));
        }
        match &mut self.second {
            Some(second) if self.used_second => {
                second.advance()?;
                self.reading_second = true;
                Ok(())
            }
            _ => self.first.advance(),
        }
    }

    fn current(&mut self) -> Result<A::Item, CursorError> {
        self.reading().current()
    }

    fn current_deferred(&mut self) -> Result<Thunk<A::Item>, CursorError> {
        self.reading().current_deferred()
    }
}
