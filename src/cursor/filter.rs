use std::fmt;

use super::{Cursor, CursorError};

/// Yields the upstream elements that satisfy a predicate.
///
/// `has_next` looks ahead: it pulls from upstream until it finds a
/// matching element or upstream runs dry, and keeps that element for the
/// following `advance`. Asking `has_next` again before advancing reuses the
/// kept element and pulls nothing.
///
/// If upstream fails while looking ahead, `has_next` answers `true` and the
/// next `advance` returns that failure unchanged.
///
/// # Examples
///
/// ```rust
/// use fstream::cursor::{self, Cursor};
///
/// let odds: Vec<i32> = cursor::from_slice(vec![1, 2, 3, 4, 5])
///     .filter(|value| value % 2 == 1)
///     .into_items()
///     .collect();
/// assert_eq!(odds, vec![1, 3, 5]);
/// ```
pub struct Filter<C: Cursor, P> {
    upstream: C,
    predicate: P,
    lookahead: Lookahead<C::Item>,
    current: Option<C::Item>,
}

/// The state of a one-element lookahead into an upstream cursor.
#[derive(Debug)]
pub(crate) enum Lookahead<T> {
    /// Nothing pulled yet for the next position.
    Empty,
    /// The next element, pulled and accepted.
    Found(T),
    /// Upstream failed while pulling; replayed by the next `advance`.
    Failed(CursorError),
    /// Upstream has nothing more to offer.
    Exhausted,
}

impl<T> Lookahead<T> {
    pub(crate) const fn is_ready(&self) -> bool {
        matches!(self, Self::Found(_) | Self::Failed(_))
    }

    /// Consumes the lookahead for an `advance`.
    pub(crate) fn take(&mut self, cursor_name: &'static str) -> Result<T, CursorError> {
        match std::mem::replace(self, Self::Empty) {
            Self::Found(element) => Ok(element),
            Self::Failed(error) => Err(error),
            Self::Exhausted => {
                *self = Self::Exhausted;
                Err(CursorError::exhausted(cursor_name))
            }
            Self::Empty => Err(CursorError::exhausted(cursor_name)),
        }
    }
}

/// Pulls one element from `upstream` into a lookahead result.
pub(crate) fn pull<C: Cursor>(upstream: &mut C) -> Option<Result<C::Item, CursorError>> {
    if !upstream.has_next() {
        return None;
    }
    Some(upstream.advance().and_then(|()| upstream.current()))
}

impl<C, P> Filter<C, P>
where
    C: Cursor,
    P: FnMut(&C::Item) -> bool,
{
    /// Wraps `upstream`.
    pub const fn new(upstream: C, predicate: P) -> Self {
        Self {
            upstream,
            predicate,
            lookahead: Lookahead::Empty,
            current: None,
        }
    }
}

impl<C, P> fmt::Debug for Filter<C, P>
where
    C: Cursor + fmt::Debug,
    C::Item: fmt::Debug,
{
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter
            .debug_struct("Filter")
            .field("upstream", &self.upstream)
            .field("lookahead", &self.lookahead)
            .field("current", &self.current)
            .finish_non_exhaustive()
    }
}

impl<C, P> Cursor for Filter<C, P>
where
    C: Cursor,
    C::Item: Clone,
    P: FnMut(&C::Item) -> bool,
{
    type Item = C::Item;

    fn has_next(&mut self) -> bool {
        if self.lookahead.is_ready() {
            return true;
        }
        if matches!(self.lookahead, Lookahead::Exhausted) {
            return false;
        }
        loop {
            match pull(&mut self.upstream) {
                None => {
                    self.lookahead = Lookahead::Exhausted;
                    return false;
                }
                Some(Err(error)) => {
                    self.lookahead = Lookahead::Failed(error);
                    return true;
                }
                Some(Ok(element)) => {
                    if (self.predicate)(&element) {
                        self.lookahead = Lookahead::Found(element);
                        return true;
                    }
                }
            }
        }
    }

    fn advance(&mut self) -> Result<(), CursorError> {
        if !self.has_next() {
            return Err(CursorError::exhausted("Filter"));
        }
        let element = self.lookahead.take("Filter")?;
        self.current = Some(element);
        Ok(())
    }

    fn current(&mut self) -> Result<C::Item, CursorError> {
        self.current
            .clone()
            .ok_or(CursorError::unstarted("Filter"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cursor::testing::{Faulty, assert_exhausted, drain};
    use crate::cursor::{self, CursorError};
    use rstest::rstest;
    use std::cell::Cell;

    #[rstest]
    #[case(vec![1, 2, 3, 4, 5, 6], vec![2, 4, 6])]
    #[case(vec![1, 3, 5], vec![])]
    #[case(vec![], vec![])]
    #[case(vec![2, 2], vec![2, 2])]
    fn test_filter_keeps_matching_in_order(#[case] input: Vec<i32>, #[case] expected: Vec<i32>) {
        let mut cursor = cursor::from_slice(input).filter(|value| value % 2 == 0);
        assert_eq!(drain(&mut cursor), expected);
        assert_exhausted(&mut cursor);
    }

    #[rstest]
    fn test_filter_has_next_is_idempotent() {
        let tested = Cell::new(0);
        let mut cursor = cursor::from_slice(vec![1, 2, 3, 4]).filter(|value| {
            tested.set(tested.get() + 1);
            value % 2 == 0
        });

        assert!(cursor.has_next());
        assert!(cursor.has_next());
        assert!(cursor.has_next());
        assert_eq!(tested.get(), 2);

        cursor.advance().unwrap();
        assert_eq!(cursor.current(), Ok(2));
        assert_eq!(tested.get(), 2);
    }

    #[rstest]
    fn test_filter_advance_without_has_next() {
        let mut cursor = cursor::from_slice(vec![1, 2, 3, 4]).filter(|value| *value > 2);
        cursor.advance().unwrap();
        assert_eq!(cursor.current(), Ok(3));
        cursor.advance().unwrap();
        assert_eq!(cursor.current(), Ok(4));
        assert_eq!(cursor.advance(), Err(CursorError::exhausted("Filter")));
    }

    #[rstest]
    fn test_filter_current_before_advance() {
        let mut cursor = cursor::from_slice(vec![1]).filter(|_| true);
        assert!(cursor.has_next());
        assert_eq!(cursor.current(), Err(CursorError::unstarted("Filter")));
    }

    #[rstest]
    fn test_filter_replays_upstream_failure() {
        let mut cursor = Faulty::failing_at(2).filter(|_| true);
        cursor.advance().unwrap();
        assert!(cursor.has_next());
        assert_eq!(cursor.advance(), Err(CursorError::exhausted("Faulty")));
    }
}
