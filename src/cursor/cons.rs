//! Cons cursors: a known head in front of a lazily opened tail.

use std::fmt;

use super::{Cursor, CursorError, Pending};
use crate::control::Thunk;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Stage {
    /// Nothing consumed yet; the head is next.
    Fresh,
    /// The head is the current element.
    AtHead,
    /// The current element comes from the tail.
    InTail,
}

/// The tail of a cons cursor, opened on first use and held afterwards.
struct Tail<C> {
    pending: Option<Pending<C>>,
    cursor: Option<C>,
}

impl<C: Cursor> Tail<C> {
    fn new(pending: Pending<C>) -> Self {
        Self {
            pending: Some(pending),
            cursor: None,
        }
    }

    fn open(&mut self) -> &mut C {
        if let Some(pending) = self.pending.take() {
            self.cursor = Some(pending.open());
        }
        match &mut self.cursor {
            Some(cursor) => cursor,
            None => unreachable!("a cons tail is either pending or open"),
        }
    }

    const fn is_open(&self) -> bool {
        self.cursor.is_some()
    }
}

/// Shared stepping logic of [`Cons`] and [`DelayedCons`].
fn has_next<C: Cursor>(stage: Stage, tail: &mut Tail<C>) -> bool {
    match stage {
        Stage::Fresh => true,
        Stage::AtHead | Stage::InTail => tail.open().has_next(),
    }
}

fn advance<C: Cursor>(
    stage: &mut Stage,
    tail: &mut Tail<C>,
    cursor_name: &'static str,
) -> Result<(), CursorError> {
    match stage {
        Stage::Fresh => {
            *stage = Stage::AtHead;
            Ok(())
        }
        Stage::AtHead | Stage::InTail => {
            let tail = tail.open();
            if !tail.has_next() {
                return Err(CursorError::exhausted(cursor_name));
            }
            tail.advance()?;
            *stage = Stage::InTail;
            Ok(())
        }
    }
}

// =============================================================================
// Cons
// =============================================================================

/// Prepends a known head to a tail cursor.
///
/// The tail cursor is obtained only after the head has been consumed, and
/// is held for the rest of the traversal.
///
/// # Examples
///
/// ```rust
/// use fstream::cursor::{self, Cons, Cursor};
///
/// let items: Vec<i32> = Cons::new(1, cursor::from_slice(vec![2, 3]))
///     .into_items()
///     .collect();
/// assert_eq!(items, vec![1, 2, 3]);
/// ```
pub struct Cons<T, C> {
    head: T,
    tail: Tail<C>,
    stage: Stage,
}

impl<T, C> Cons<T, C>
where
    C: Cursor<Item = T>,
{
    /// Prepends `head` to an existing tail cursor.
    pub fn new(head: T, tail: C) -> Self {
        Self {
            head,
            tail: Tail::new(Pending::Ready(tail)),
            stage: Stage::Fresh,
        }
    }

    /// Prepends `head` to a tail cursor obtained from `tail` once needed.
    pub fn deferred<F>(head: T, tail: F) -> Self
    where
        F: FnOnce() -> C + Send + 'static,
    {
        Self {
            head,
            tail: Tail::new(Pending::Deferred(Box::new(tail))),
            stage: Stage::Fresh,
        }
    }
}

impl<T: fmt::Debug, C> fmt::Debug for Cons<T, C>
where
    C: Cursor<Item = T>,
{
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter
            .debug_struct("Cons")
            .field("head", &self.head)
            .field("stage", &self.stage)
            .field("tail_open", &self.tail.is_open())
            .finish()
    }
}

impl<T, C> Cursor for Cons<T, C>
where
    T: Clone,
    C: Cursor<Item = T>,
{
    type Item = T;

    fn has_next(&mut self) -> bool {
        has_next(self.stage, &mut self.tail)
    }

    fn advance(&mut self) -> Result<(), CursorError> {
        advance(&mut self.stage, &mut self.tail, "Cons")
    }

    fn current(&mut self) -> Result<T, CursorError> {
        match self.stage {
            Stage::Fresh => Err(CursorError::unstarted("Cons")),
            Stage::AtHead => Ok(self.head.clone()),
            Stage::InTail => self.tail.open().current(),
        }
    }

    fn current_deferred(&mut self) -> Result<Thunk<T>, CursorError> {
        match self.stage {
            Stage::Fresh => Err(CursorError::unstarted("Cons")),
            Stage::AtHead => Ok(Thunk::ready(self.head.clone())),
            Stage::InTail => self.tail.open().current_deferred(),
        }
    }
}

// =============================================================================
// DelayedCons
// =============================================================================

/// Prepends a deferred head to a tail cursor.
///
/// The head thunk is forced only when `current()` is read at the head
/// position; `current_deferred()` hands it out unforced.
///
/// # Examples
///
/// ```rust
/// use fstream::control::Thunk;
/// use fstream::cursor::{self, Cursor, DelayedCons};
///
/// let head = Thunk::new(|| 1);
/// let mut cursor = DelayedCons::new(head.clone(), cursor::from_slice(vec![2]));
/// cursor.advance().unwrap();
/// assert!(!head.is_forced());
/// assert_eq!(cursor.current(), Ok(1));
/// assert!(head.is_forced());
/// ```
pub struct DelayedCons<T, C> {
    head: Thunk<T>,
    tail: Tail<C>,
    stage: Stage,
}

impl<T, C> DelayedCons<T, C>
where
    C: Cursor<Item = T>,
{
    /// Prepends the deferred `head` to an existing tail cursor.
    pub fn new(head: Thunk<T>, tail: C) -> Self {
        Self {
            head,
            tail: Tail::new(Pending::Ready(tail)),
            stage: Stage::Fresh,
        }
    }

    /// Prepends the deferred `head` to a tail cursor obtained from `tail`
    /// once needed.
    pub fn deferred<F>(head: Thunk<T>, tail: F) -> Self
    where
        F: FnOnce() -> C + Send + 'static,
    {
        Self {
            head,
            tail: Tail::new(Pending::Deferred(Box::new(tail))),
            stage: Stage::Fresh,
        }
    }
}

impl<T: fmt::Debug, C> fmt::Debug for DelayedCons<T, C>
where
    C: Cursor<Item = T>,
{
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter
            .debug_struct("DelayedCons")
            .field("head", &self.head)
            .field("stage", &self.stage)
            .field("tail_open", &self.tail.is_open())
            .finish()
    }
}

impl<T, C> Cursor for DelayedCons<T, C>
where
    T: Clone,
    C: Cursor<Item = T>,
{
    type Item = T;

    fn has_next(&mut self) -> bool {
        has_next(self.stage, &mut self.tail)
    }

    fn advance(&mut self) -> Result<(), CursorError> {
        advance(&mut self.stage, &mut self.tail, "DelayedCons")
    }

    fn current(&mut self) -> Result<T, CursorError> {
        match self.stage {
            Stage::Fresh => Err(CursorError::unstarted("DelayedCons")),
            Stage::AtHead => Ok(self.head.force().clone()),
            Stage::InTail => self.tail.open().current(),
        }
    }

    fn current_deferred(&mut self) -> Result<Thunk<T>, CursorError> {
        match self.stage {
            Stage::Fresh => Err(CursorError::unstarted("DelayedCons")),
            Stage::AtHead => Ok(self.head.clone()),
            Stage::InTail => self.tail.open().current_deferred(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cursor;
    use crate::cursor::testing::{assert_exhausted, drain};
    use rstest::rstest;
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[rstest]
    #[case(vec![], vec![0])]
    #[case(vec![1, 2], vec![0, 1, 2])]
    fn test_cons_yields_head_then_tail(#[case] tail: Vec<i32>, #[case] expected: Vec<i32>) {
        let mut cursor = Cons::new(0, cursor::from_slice(tail));
        assert_eq!(drain(&mut cursor), expected);
        assert_exhausted(&mut cursor);
    }

    #[rstest]
    fn test_cons_opens_tail_after_head_once() {
        let opened = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&opened);
        let mut cursor = Cons::deferred(0, move || {
            counter.fetch_add(1, Ordering::SeqCst);
            cursor::from_slice(vec![1, 2])
        });

        assert!(cursor.has_next());
        cursor.advance().unwrap();
        assert_eq!(cursor.current(), Ok(0));
        assert_eq!(opened.load(Ordering::SeqCst), 0);

        assert_eq!(drain(&mut cursor), vec![1, 2]);
        assert_exhausted(&mut cursor);
        assert_eq!(opened.load(Ordering::SeqCst), 1);
    }

    #[rstest]
    fn test_cons_current_before_advance() {
        let mut cursor = Cons::new(0, cursor::empty());
        assert_eq!(cursor.current(), Err(CursorError::unstarted("Cons")));
    }

    #[rstest]
    fn test_cons_exhaustion_names_cons() {
        let mut cursor = Cons::new(0, cursor::empty());
        cursor.advance().unwrap();
        assert_eq!(cursor.advance(), Err(CursorError::exhausted("Cons")));
    }

    #[rstest]
    fn test_delayed_cons_forces_head_on_current() {
        let forced = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&forced);
        let head = Thunk::new(move || {
            counter.fetch_add(1, Ordering::SeqCst);
            10
        });
        let mut cursor = DelayedCons::new(head, cursor::from_slice(vec![20]));

        cursor.advance().unwrap();
        let deferred = cursor.current_deferred().unwrap();
        assert!(!deferred.is_forced());
        assert_eq!(forced.load(Ordering::SeqCst), 0);

        assert_eq!(cursor.current(), Ok(10));
        assert_eq!(cursor.current(), Ok(10));
        assert_eq!(forced.load(Ordering::SeqCst), 1);

        assert_eq!(drain(&mut cursor), vec![20]);
        assert_exhausted(&mut cursor);
    }

    #[rstest]
    fn test_delayed_cons_never_forced_when_skipped() {
        let head: Thunk<i32> = Thunk::new(|| panic!("head must stay deferred"));
        let mut cursor = DelayedCons::new(head.clone(), cursor::from_slice(vec![2, 3]));
        cursor.advance().unwrap();
        cursor.advance().unwrap();
        assert_eq!(cursor.current(), Ok(2));
        assert!(!head.is_forced());
    }
}
