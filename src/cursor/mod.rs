//! The cursor protocol and its lazy combinators.
//!
//! A [`Cursor`] is the minimal unit of lazy iteration. It separates
//! asking whether more elements exist ([`has_next`](Cursor::has_next)),
//! moving forward ([`advance`](Cursor::advance)) and reading the element
//! at the current position ([`current`](Cursor::current)).
//!
//! - Primitive sources: [`EmptyCursor`], [`SingleCursor`],
//!   [`DeferredCursor`], [`SliceCursor`], [`DequeCursor`],
//!   [`IteratorCursor`], [`IterateCursor`]
//! - Combinators: [`Map`], [`Filter`], [`Concat`], [`DropFirst`], [`Take`],
//!   [`DropWhile`], [`TakeWhile`], [`Cons`], [`DelayedCons`], [`Zip`],
//!   [`FlatMap`]
//! - Bridge to `std`: [`CursorIter`], and [`IntoCursor`] back again
//!
//! # Protocol
//!
//! ```text
//! Created --has_next:true--> advance --> Advanced --has_next:true--> advance --> ...
//!                                                  --has_next:false--> Exhausted
//! ```
//!
//! - `has_next` is idempotent in its answer. Lookahead combinators may pull
//!   from upstream inside it, but never pull the same element twice.
//! - `advance` past the end fails with [`CursorError::Exhausted`].
//! - `current` before the first `advance` fails with
//!   [`CursorError::Unstarted`].
//!
//! # Examples
//!
//! ```rust
//! use fstream::cursor::{self, Cursor};
//!
//! let mut evens = cursor::from_slice(vec![1, 2, 3, 4, 5, 6])
//!     .filter(|value| value % 2 == 0)
//!     .map(|value| value * 10);
//!
//! let mut collected = Vec::new();
//! while evens.has_next() {
//!     evens.advance().unwrap();
//!     collected.push(evens.current().unwrap());
//! }
//! assert_eq!(collected, vec![20, 40, 60]);
//! assert!(evens.advance().unwrap_err().is_exhausted());
//! ```

mod concat;
mod cons;
mod error;
mod filter;
mod flat_map;
mod iter;
mod map;
mod source;
mod truncate;
mod zip;

pub use concat::Concat;
pub use cons::{Cons, DelayedCons};
pub use error::{ConsumedCursorError, CursorError, ExhaustedCursorError, UnstartedCursorError};
pub use filter::Filter;
pub use flat_map::FlatMap;
pub use iter::{CursorIter, IntoCursor};
pub use map::Map;
pub use source::{
    DequeCursor, DeferredCursor, EmptyCursor, IterateCursor, IteratorCursor, SingleCursor,
    SliceCursor, deferred, empty, from_iter, from_slice, single,
};
pub use truncate::{DropFirst, DropWhile, Take, TakeWhile};
pub use zip::Zip;

use crate::control::Thunk;

/// A boxed, type-erased cursor.
///
/// This is the cursor type handed out by streams.
pub type BoxCursor<T> = Box<dyn Cursor<Item = T> + Send>;

/// The lazy iteration protocol.
///
/// # Laws
///
/// - `has_next` returns the same answer when called repeatedly without an
///   intervening `advance`.
/// - After `has_next` returned `true`, `advance` succeeds and moves exactly
///   one element forward.
/// - After `has_next` returned `false`, `advance` fails with
///   [`CursorError::Exhausted`] forever.
/// - `current` returns the same element until the next `advance`.
pub trait Cursor {
    /// The type of the elements produced.
    type Item;

    /// Returns whether `advance` can be called.
    fn has_next(&mut self) -> bool;

    /// Moves the cursor to the next element.
    ///
    /// # Errors
    ///
    /// Returns [`CursorError::Exhausted`] when no element remains, or the
    /// unchanged error of an upstream cursor.
    fn advance(&mut self) -> Result<(), CursorError>;

    /// Returns the element at the current position.
    ///
    /// # Errors
    ///
    /// Returns [`CursorError::Unstarted`] before the first successful
    /// `advance`, or the unchanged error of an upstream cursor.
    fn current(&mut self) -> Result<Self::Item, CursorError>;

    /// Returns the element at the current position without forcing it.
    ///
    /// The default wraps [`current`](Cursor::current) in an already-forced
    /// thunk. Cursors over deferred elements return the unforced thunk.
    ///
    /// # Errors
    ///
    /// Same as [`current`](Cursor::current).
    fn current_deferred(&mut self) -> Result<Thunk<Self::Item>, CursorError> {
        self.current().map(Thunk::ready)
    }

    /// Advances and reads in one step.
    ///
    /// Returns `Ok(None)` once the cursor is exhausted.
    ///
    /// # Errors
    ///
    /// Returns any error raised by `advance` or `current`.
    fn try_next(&mut self) -> Result<Option<Self::Item>, CursorError> {
        if !self.has_next() {
            return Ok(None);
        }
        self.advance()?;
        self.current().map(Some)
    }

    /// Wraps this cursor in a [`Map`].
    fn map<U, F>(self, function: F) -> Map<Self, F, U>
    where
        Self: Sized,
        F: FnMut(Self::Item) -> U,
    {
        Map::new(self, function)
    }

    /// Wraps this cursor in a [`Filter`].
    fn filter<P>(self, predicate: P) -> Filter<Self, P>
    where
        Self: Sized,
        P: FnMut(&Self::Item) -> bool,
    {
        Filter::new(self, predicate)
    }

    /// Yields this cursor's elements, then `second`'s.
    fn concat<B>(self, second: B) -> Concat<Self, B>
    where
        Self: Sized,
        B: Cursor<Item = Self::Item>,
    {
        Concat::new(self, second)
    }

    /// Skips the first `count` elements.
    fn drop_first(self, count: usize) -> DropFirst<Self>
    where
        Self: Sized,
    {
        DropFirst::new(self, count)
    }

    /// Yields at most `count` elements.
    fn take(self, count: usize) -> Take<Self>
    where
        Self: Sized,
    {
        Take::new(self, count)
    }

    /// Skips the leading elements that satisfy `predicate`.
    fn drop_while<P>(self, predicate: P) -> DropWhile<Self, P>
    where
        Self: Sized,
        P: FnMut(&Self::Item) -> bool,
    {
        DropWhile::new(self, predicate)
    }

    /// Yields elements while `predicate` holds.
    fn take_while<P>(self, predicate: P) -> TakeWhile<Self, P>
    where
        Self: Sized,
        P: FnMut(&Self::Item) -> bool,
    {
        TakeWhile::new(self, predicate)
    }

    /// Pairs elements positionally, combining each pair with `function`.
    fn zip_with<B, F, V>(self, other: B, function: F) -> Zip<Self, B, F>
    where
        Self: Sized,
        B: Cursor,
        F: FnMut(Self::Item, B::Item) -> V,
    {
        Zip::new(self, other, function)
    }

    /// Maps each element to a cursor and flattens the results.
    fn flat_map<I, F>(self, function: F) -> FlatMap<Self, F, I>
    where
        Self: Sized,
        I: Cursor,
        F: FnMut(Self::Item) -> I,
    {
        FlatMap::new(self, function)
    }

    /// Bridges this cursor into a [`std::iter::Iterator`].
    fn into_items(self) -> CursorIter<Self>
    where
        Self: Sized,
    {
        CursorIter::new(self)
    }
}

impl<C: Cursor + ?Sized> Cursor for Box<C> {
    type Item = C::Item;

    #[inline]
    fn has_next(&mut self) -> bool {
        (**self).has_next()
    }

    #[inline]
    fn advance(&mut self) -> Result<(), CursorError> {
        (**self).advance()
    }

    #[inline]
    fn current(&mut self) -> Result<Self::Item, CursorError> {
        (**self).current()
    }

    #[inline]
    fn current_deferred(&mut self) -> Result<Thunk<Self::Item>, CursorError> {
        (**self).current_deferred()
    }
}

/// A cursor that is either already available or produced on first use.
///
/// Used for the second half of [`Concat`] and the tail of [`Cons`], which
/// must not touch their source before it is needed.
pub(crate) enum Pending<C> {
    Ready(C),
    Deferred(Box<dyn FnOnce() -> C + Send>),
}

impl<C> Pending<C> {
    pub(crate) fn open(self) -> C {
        match self {
            Self::Ready(cursor) => cursor,
            Self::Deferred(factory) => factory(),
        }
    }
}
