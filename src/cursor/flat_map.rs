use std::fmt;

use super::filter::pull;
use super::{Cursor, CursorError};
use crate::control::Thunk;

/// Maps each outer element to an inner cursor and yields the inner
/// elements in order.
///
/// `has_next` keeps opening inner cursors until one has an element or the
/// outer cursor runs dry, so empty inner cursors are skipped entirely. The
/// inner cursor being read stays in place until the next `advance`.
///
/// # Examples
///
/// ```rust
/// use fstream::cursor::{self, Cursor};
///
/// let flattened: Vec<i32> = cursor::from_slice(vec![1, 0, 2])
///     .flat_map(|count| cursor::from_iter(vec![count; count as usize]))
///     .into_items()
///     .collect();
/// assert_eq!(flattened, vec![1, 2, 2]);
/// ```
pub struct FlatMap<C, F, I> {
    outer: C,
    function: F,
    reading: Option<I>,
    upcoming: Option<I>,
    failure: Option<CursorError>,
}

impl<C, F, I> FlatMap<C, F, I>
where
    C: Cursor,
    I: Cursor,
    F: FnMut(C::Item) -> I,
{
    /// Wraps `outer`.
    pub const fn new(outer: C, function: F) -> Self {
        Self {
            outer,
            function,
            reading: None,
            upcoming: None,
            failure: None,
        }
    }
}

impl<C: fmt::Debug, F, I: fmt::Debug> fmt::Debug for FlatMap<C, F, I> {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter
            .debug_struct("FlatMap")
            .field("outer", &self.outer)
            .field("reading", &self.reading)
            .field("upcoming", &self.upcoming)
            .finish_non_exhaustive()
    }
}

impl<C, F, I> Cursor for FlatMap<C, F, I>
where
    C: Cursor,
    I: Cursor,
    F: FnMut(C::Item) -> I,
{
    type Item = I::Item;

    fn has_next(&mut self) -> bool {
        if self.failure.is_some() {
            return true;
        }
        if self.upcoming.is_none()
            && self.reading.as_mut().is_some_and(|inner| inner.has_next())
        {
            return true;
        }
        loop {
            if self.upcoming.as_mut().is_some_and(|inner| inner.has_next()) {
                return true;
            }
            match pull(&mut self.outer) {
                None => {
                    self.upcoming = None;
                    return false;
                }
                Some(Err(error)) => {
                    self.failure = Some(error);
                    return true;
                }
                Some(Ok(element)) => self.upcoming = Some((self.function)(element)),
            }
        }
    }

    fn advance(&mut self) -> Result<(), CursorError> {
        if !self.has_next() {
            return Err(CursorError::exhausted("FlatMap"));
        }
        if let Some(error) = self.failure.take() {
            return Err(error);
        }
        if let Some(upcoming) = self.upcoming.take() {
            self.reading = Some(upcoming);
        }
        match &mut self.reading {
            Some(inner) => inner.advance(),
            None => Err(CursorError::exhausted("FlatMap")),
        }
    }

    fn current(&mut self) -> Result<I::Item, CursorError> {
        match &mut self.reading {
            Some(inner) => inner.current(),
            None => Err(CursorError::unstarted("FlatMap")),
        }
    }

    fn current_deferred(&mut self) -> Result<Thunk<I::Item>, CursorError> {
        match &mut self.reading {
            Some(inner) => inner.current_deferred(),
            None => Err(CursorError::unstarted("FlatMap")),
        }
    }
}
