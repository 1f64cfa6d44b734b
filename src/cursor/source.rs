//! Primitive cursor sources.
//!
//! These cursors produce elements themselves rather than wrapping another
//! cursor: nothing, one value, one deferred value, an indexed collection,
//! a foreign iterator, or an unbounded generator.

use std::collections::VecDeque;
use std::fmt;
use std::iter::Peekable;
use std::marker::PhantomData;
use std::ops::Range;
use std::sync::Arc;

use super::{Cursor, CursorError};
use crate::control::Thunk;

// =============================================================================
// EmptyCursor
// =============================================================================

/// A cursor with no elements.
///
/// `EmptyCursor` carries no state, so a single instance may be copied and
/// reused freely.
///
/// # Examples
///
/// ```rust
/// use fstream::cursor::{self, Cursor};
///
/// let mut cursor = cursor::empty::<i32>();
/// assert!(!cursor.has_next());
/// assert!(cursor.advance().is_err());
/// ```
pub struct EmptyCursor<T> {
    marker: PhantomData<fn() -> T>,
}

impl<T> EmptyCursor<T> {
    /// Creates an empty cursor.
    #[inline]
    pub const fn new() -> Self {
        Self {
            marker: PhantomData,
        }
    }
}

impl<T> Default for EmptyCursor<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Clone for EmptyCursor<T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T> Copy for EmptyCursor<T> {}

impl<T> fmt::Debug for EmptyCursor<T> {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.write_str("EmptyCursor")
    }
}

impl<T> Cursor for EmptyCursor<T> {
    type Item = T;

    #[inline]
    fn has_next(&mut self) -> bool {
        false
    }

    fn advance(&mut self) -> Result<(), CursorError> {
        Err(CursorError::exhausted("EmptyCursor"))
    }

    fn current(&mut self) -> Result<T, CursorError> {
        Err(CursorError::unstarted("EmptyCursor"))
    }
}

// =============================================================================
// SingleCursor / DeferredCursor
// =============================================================================

/// A cursor yielding exactly one value.
#[derive(Debug, Clone)]
pub struct SingleCursor<T> {
    value: T,
    advanced: bool,
}

impl<T> SingleCursor<T> {
    /// Creates a cursor over `value`.
    pub const fn new(value: T) -> Self {
        Self {
            value,
            advanced: false,
        }
    }
}

impl<T: Clone> Cursor for SingleCursor<T> {
    type Item = T;

    #[inline]
    fn has_next(&mut self) -> bool {
        !self.advanced
    }

    fn advance(&mut self) -> Result<(), CursorError> {
        if self.advanced {
            return Err(CursorError::exhausted("SingleCursor"));
        }
        self.advanced = true;
        Ok(())
    }

    fn current(&mut self) -> Result<T, CursorError> {
        if self.advanced {
            Ok(self.value.clone())
        } else {
            Err(CursorError::unstarted("SingleCursor"))
        }
    }
}

/// A cursor yielding exactly one deferred value.
///
/// The thunk is forced on the first `current()`, never on `advance()`.
/// `current_deferred()` hands the thunk out without forcing it.
#[derive(Debug, Clone)]
pub struct DeferredCursor<T> {
    thunk: Thunk<T>,
    advanced: bool,
}

impl<T> DeferredCursor<T> {
    /// Creates a cursor over the deferred `thunk`.
    pub const fn new(thunk: Thunk<T>) -> Self {
        Self {
            thunk,
            advanced: false,
        }
    }
}

impl<T: Clone> Cursor for DeferredCursor<T> {
    type Item = T;

    #[inline]
    fn has_next(&mut self) -> bool {
        !self.advanced
    }

    fn advance(&mut self) -> Result<(), CursorError> {
        if self.advanced {
            return Err(CursorError::exhausted("DeferredCursor"));
        }
        self.advanced = true;
        Ok(())
    }

    fn current(&mut self) -> Result<T, CursorError> {
        self.current_deferred()
            .map(|thunk| thunk.force().clone())
    }

    fn current_deferred(&mut self) -> Result<Thunk<T>, CursorError> {
        if self.advanced {
            Ok(self.thunk.clone())
        } else {
            Err(CursorError::unstarted("DeferredCursor"))
        }
    }
}

// =============================================================================
// Indexed cursors
// =============================================================================

/// Index bookkeeping shared by the slice and deque cursors.
#[derive(Debug, Clone)]
struct Span {
    /// Indices not yet visited.
    remaining: Range<usize>,
    current: Option<usize>,
    backwards: bool,
}

impl Span {
    const fn new(range: Range<usize>, backwards: bool) -> Self {
        Self {
            remaining: range,
            current: None,
            backwards,
        }
    }

    fn has_next(&self) -> bool {
        !self.remaining.is_empty()
    }

    fn advance(&mut self) -> bool {
        let index = if self.backwards {
            self.remaining.next_back()
        } else {
            self.remaining.next()
        };
        match index {
            Some(index) => {
                self.current = Some(index);
                true
            }
            None => false,
        }
    }
}

/// A cursor over a shared slice, forward or backward.
///
/// # Examples
///
/// ```rust
/// use fstream::cursor::{Cursor, SliceCursor};
///
/// let mut cursor = SliceCursor::backward(vec![1, 2, 3], 0..3);
/// cursor.advance().unwrap();
/// assert_eq!(cursor.current(), Ok(3));
/// ```
#[derive(Debug, Clone)]
pub struct SliceCursor<T> {
    items: Arc<[T]>,
    span: Span,
}

impl<T> SliceCursor<T> {
    /// Creates a cursor over every element of `items`.
    pub fn new(items: impl Into<Arc<[T]>>) -> Self {
        let items = items.into();
        let length = items.len();
        Self::forward(items, 0..length)
    }

    /// Creates a cursor over `range` of `items`, front to back.
    ///
    /// The range is clamped to the slice length.
    pub fn forward(items: impl Into<Arc<[T]>>, range: Range<usize>) -> Self {
        let items = items.into();
        let range = clamp(range, items.len());
        Self {
            items,
            span: Span::new(range, false),
        }
    }

    /// Creates a cursor over `range` of `items`, back to front.
    ///
    /// The range is clamped to the slice length.
    pub fn backward(items: impl Into<Arc<[T]>>, range: Range<usize>) -> Self {
        let items = items.into();
        let range = clamp(range, items.len());
        Self {
            items,
            span: Span::new(range, true),
        }
    }
}

impl<T: Clone> Cursor for SliceCursor<T> {
    type Item = T;

    #[inline]
    fn has_next(&mut self) -> bool {
        self.span.has_next()
    }

    fn advance(&mut self) -> Result<(), CursorError> {
        if self.span.advance() {
            Ok(())
        } else {
            Err(CursorError::exhausted("SliceCursor"))
        }
    }

    fn current(&mut self) -> Result<T, CursorError> {
        self.span
            .current
            .and_then(|index| self.items.get(index))
            .cloned()
            .ok_or(CursorError::unstarted("SliceCursor"))
    }
}

/// A cursor over a shared deque, forward or backward.
#[derive(Debug, Clone)]
pub struct DequeCursor<T> {
    items: Arc<VecDeque<T>>,
    span: Span,
}

impl<T> DequeCursor<T> {
    /// Creates a cursor over `range` of `items`, front to back.
    pub fn forward(items: Arc<VecDeque<T>>, range: Range<usize>) -> Self {
        let range = clamp(range, items.len());
        Self {
            items,
            span: Span::new(range, false),
        }
    }

    /// Creates a cursor over `range` of `items`, back to front.
    pub fn backward(items: Arc<VecDeque<T>>, range: Range<usize>) -> Self {
        let range = clamp(range, items.len());
        Self {
            items,
            span: Span::new(range, true),
        }
    }
}

impl<T: Clone> Cursor for DequeCursor<T> {
    type Item = T;

    #[inline]
    fn has_next(&mut self) -> bool {
        self.span.has_next()
    }

    fn advance(&mut self) -> Result<(), CursorError> {
        if self.span.advance() {
            Ok(())
        } else {
            Err(CursorError::exhausted("DequeCursor"))
        }
    }

    fn current(&mut self) -> Result<T, CursorError> {
        self.span
            .current
            .and_then(|index| self.items.get(index))
            .cloned()
            .ok_or(CursorError::unstarted("DequeCursor"))
    }
}

fn clamp(range: Range<usize>, length: usize) -> Range<usize> {
    let end = range.end.min(length);
    range.start.min(end)..end
}

// =============================================================================
// IteratorCursor
// =============================================================================

/// Adapts a [`std::iter::Iterator`] into a cursor.
///
/// `has_next` peeks one element ahead of the iterator. The iterator may be
/// single-pass; the cursor never restarts it.
pub struct IteratorCursor<I: Iterator> {
    iterator: Peekable<I>,
    current: Option<I::Item>,
}

impl<I: Iterator> IteratorCursor<I> {
    /// Wraps `iterator`.
    pub fn new(iterator: I) -> Self {
        Self {
            iterator: iterator.peekable(),
            current: None,
        }
    }
}

impl<I> fmt::Debug for IteratorCursor<I>
where
    I: Iterator,
    I::Item: fmt::Debug,
{
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter
            .debug_struct("IteratorCursor")
            .field("current", &self.current)
            .finish_non_exhaustive()
    }
}

impl<I> Cursor for IteratorCursor<I>
where
    I: Iterator,
    I::Item: Clone,
{
    type Item = I::Item;

    fn has_next(&mut self) -> bool {
        self.iterator.peek().is_some()
    }

    fn advance(&mut self) -> Result<(), CursorError> {
        match self.iterator.next() {
            Some(element) => {
                self.current = Some(element);
                Ok(())
            }
            None => Err(CursorError::exhausted("IteratorCursor")),
        }
    }

    fn current(&mut self) -> Result<I::Item, CursorError> {
        self.current
            .clone()
            .ok_or(CursorError::unstarted("IteratorCursor"))
    }
}

// =============================================================================
// IterateCursor
// =============================================================================

/// An unbounded cursor: `seed`, `step(seed)`, `step(step(seed))`, ...
///
/// Each step runs on `advance`, one element at a time.
///
/// # Examples
///
/// ```rust
/// use fstream::cursor::{Cursor, IterateCursor};
///
/// let powers: Vec<u32> = IterateCursor::new(1, |value| value * 2)
///     .take(5)
///     .into_items()
///     .collect();
/// assert_eq!(powers, vec![1, 2, 4, 8, 16]);
/// ```
pub struct IterateCursor<T, F> {
    seed: Option<T>,
    current: Option<T>,
    step: F,
}

impl<T, F> IterateCursor<T, F>
where
    F: FnMut(&T) -> T,
{
    /// Creates a cursor starting at `seed`.
    pub const fn new(seed: T, step: F) -> Self {
        Self {
            seed: Some(seed),
            current: None,
            step,
        }
    }
}

impl<T: Clone, F> Cursor for IterateCursor<T, F>
where
    F: FnMut(&T) -> T,
{
    type Item = T;

    #[inline]
    fn has_next(&mut self) -> bool {
        true
    }

    fn advance(&mut self) -> Result<(), CursorError> {
        let next = match (self.current.take(), self.seed.take()) {
            (Some(previous), _) => (self.step)(&previous),
            (None, Some(seed)) => seed,
            (None, None) => unreachable!("IterateCursor always holds a seed or a current value"),
        };
        self.current = Some(next);
        Ok(())
    }

    fn current(&mut self) -> Result<T, CursorError> {
        self.current
            .clone()
            .ok_or(CursorError::unstarted("IterateCursor"))
    }
}

// =============================================================================
// Constructors
// =============================================================================

/// Returns a cursor with no elements.
#[inline]
pub const fn empty<T>() -> EmptyCursor<T> {
    EmptyCursor::new()
}

/// Returns a cursor yielding `value` once.
#[inline]
pub const fn single<T>(value: T) -> SingleCursor<T> {
    SingleCursor::new(value)
}

/// Returns a cursor yielding the deferred `thunk` once.
#[inline]
pub const fn deferred<T>(thunk: Thunk<T>) -> DeferredCursor<T> {
    DeferredCursor::new(thunk)
}

/// Returns a cursor over `items`.
pub fn from_slice<T>(items: impl Into<Arc<[T]>>) -> SliceCursor<T> {
    SliceCursor::new(items)
}

/// Returns a cursor over the elements of `iterable`.
///
/// A cursor bridged with [`Cursor::into_items`] should be handed back with
/// [`IntoCursor`](super::IntoCursor) rather than adapted again here.
pub fn from_iter<I: IntoIterator>(iterable: I) -> IteratorCursor<I::IntoIter> {
    IteratorCursor::new(iterable.into_iter())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cursor::testing::{assert_exhausted, drain};
    use rstest::rstest;
    use std::cell::Cell;

    #[rstest]
    fn test_empty_cursor_is_exhausted() {
        let mut cursor = empty::<i32>();
        assert_exhausted(&mut cursor);
        assert_eq!(cursor.current(), Err(CursorError::unstarted("EmptyCursor")));
    }

    #[rstest]
    fn test_empty_cursor_is_reusable() {
        let shared = empty::<String>();
        let mut first = shared;
        let mut second = shared;
        assert_exhausted(&mut first);
        assert_exhausted(&mut second);
    }

    #[rstest]
    fn test_single_cursor_yields_once() {
        let mut cursor = single("only");
        assert_eq!(cursor.current(), Err(CursorError::unstarted("SingleCursor")));
        assert_eq!(drain(&mut cursor), vec!["only"]);
        assert_eq!(cursor.current(), Ok("only"));
        assert_eq!(cursor.advance(), Err(CursorError::exhausted("SingleCursor")));
    }

    #[rstest]
    fn test_deferred_cursor_forces_on_current_only() {
        let thunk = Thunk::new(|| 5);
        let mut cursor = deferred(thunk.clone());
        assert!(cursor.has_next());
        cursor.advance().unwrap();
        assert!(!thunk.is_forced());

        let handle = cursor.current_deferred().unwrap();
        assert!(!handle.is_forced());

        assert_eq!(cursor.current(), Ok(5));
        assert!(thunk.is_forced());
        assert_exhausted(&mut cursor);
    }

    #[rstest]
    #[case(0..4, vec![10, 20, 30, 40])]
    #[case(1..3, vec![20, 30])]
    #[case(2..9, vec![30, 40])]
    #[case(5..9, vec![])]
    fn test_slice_cursor_forward(#[case] range: Range<usize>, #[case] expected: Vec<i32>) {
        let mut cursor = SliceCursor::forward(vec![10, 20, 30, 40], range);
        assert_eq!(drain(&mut cursor), expected);
        assert_exhausted(&mut cursor);
    }

    #[rstest]
    fn test_slice_cursor_backward() {
        let mut cursor = SliceCursor::backward(vec![1, 2, 3, 4], 1..4);
        assert_eq!(drain(&mut cursor), vec![4, 3, 2]);
        assert_exhausted(&mut cursor);
    }

    #[rstest]
    fn test_slice_cursor_current_before_advance() {
        let mut cursor = from_slice(vec![1]);
        assert_eq!(cursor.current(), Err(CursorError::unstarted("SliceCursor")));
    }

    #[rstest]
    fn test_deque_cursor_both_directions() {
        let items: Arc<VecDeque<i32>> = Arc::new((1..=4).collect());
        let mut forward = DequeCursor::forward(Arc::clone(&items), 0..4);
        let mut backward = DequeCursor::backward(items, 0..4);
        assert_eq!(drain(&mut forward), vec![1, 2, 3, 4]);
        assert_eq!(drain(&mut backward), vec![4, 3, 2, 1]);
        assert_exhausted(&mut forward);
        assert_exhausted(&mut backward);
    }

    #[rstest]
    fn test_iterator_cursor_pulls_one_ahead() {
        let pulled = Cell::new(0);
        let mut cursor = from_iter((1..=3).inspect(|_| pulled.set(pulled.get() + 1)));

        assert_eq!(pulled.get(), 0);
        assert!(cursor.has_next());
        assert!(cursor.has_next());
        assert_eq!(pulled.get(), 1);

        assert_eq!(drain(&mut cursor), vec![1, 2, 3]);
        assert_eq!(pulled.get(), 3);
        assert_exhausted(&mut cursor);
        assert_eq!(cursor.current(), Ok(3));
    }

    #[rstest]
    fn test_iterate_cursor_is_lazy_and_unbounded() {
        let steps = Cell::new(0);
        let mut cursor = IterateCursor::new(1u64, |value| {
            steps.set(steps.get() + 1);
            value * 3
        });

        assert!(cursor.has_next());
        cursor.advance().unwrap();
        assert_eq!(cursor.current(), Ok(1));
        assert_eq!(steps.get(), 0);

        cursor.advance().unwrap();
        cursor.advance().unwrap();
        assert_eq!(cursor.current(), Ok(9));
        assert_eq!(steps.get(), 2);
        assert!(cursor.has_next());
    }
}
