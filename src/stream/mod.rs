//! Lazy, composable, possibly infinite element streams.
//!
//! A [`Stream`] is an immutable description of a sequence. It holds no
//! traversal state: every traversal asks the stream for a fresh
//! [`Cursor`](crate::cursor::Cursor), and derived streams (`map`, `filter`,
//! `concat`, ...) only record how to build their cursor from their
//! upstream's. Nothing is evaluated until a cursor is driven.
//!
//! # Repeatable and single-pass streams
//!
//! Most streams are *repeatable*: each call to [`Stream::cursor`] starts
//! over from the first element. Streams built over a one-shot source
//! ([`Stream::from_iter_once`], [`Stream::from_cursor_once`]) are
//! *single-pass*: they hand out their source exactly once.
//! [`Stream::try_cursor`] reports a second request as
//! [`StreamError::AlreadyConsumed`]. A stream derived from a single-pass
//! stream is itself single-pass; check [`Stream::is_repeatable`] before
//! traversing a stream twice.
//!
//! # Examples
//!
//! ```rust
//! use fstream::stream::Stream;
//!
//! let naturals = Stream::iterate(1u64, |value| value + 1);
//! let squares_of_odds: Vec<u64> = naturals
//!     .filter(|value| value % 2 == 1)
//!     .map(|value| value * value)
//!     .take(4)
//!     .to_vec();
//! assert_eq!(squares_of_odds, vec![1, 9, 25, 49]);
//! ```

mod error;
mod ops;
mod query;

pub use error::{AlreadyConsumedError, EmptySourceError, NoSuchElementError, StreamError};

use std::collections::VecDeque;
use std::fmt;
use std::ops::Range;
use std::sync::Arc;

use parking_lot::Mutex;
use tracing::{debug, warn};

use crate::control::Thunk;
use crate::cursor::{
    BoxCursor, Cons, Cursor, CursorError, CursorIter, DeferredCursor, DelayedCons, DequeCursor,
    EmptyCursor, IntoCursor, IterateCursor, IteratorCursor, SingleCursor, SliceCursor,
};

/// The bounds every stream element satisfies.
///
/// Elements are handed out by value to every cursor, and streams are
/// shared across threads, so elements are cloned and must be `Send + Sync`.
pub trait Element: Clone + Send + Sync + 'static {}

impl<T: Clone + Send + Sync + 'static> Element for T {}

/// A lazy, immutable, cheaply clonable sequence of elements.
///
/// Cloning a `Stream` shares its description; it never copies elements or
/// evaluates anything.
///
/// # Examples
///
/// ```rust
/// use fstream::stream::Stream;
///
/// let stream = Stream::of(vec![1, 2, 3]).map(|value| value * 10);
/// assert_eq!(stream.to_vec(), vec![10, 20, 30]);
/// // Repeatable: a second traversal starts over.
/// assert_eq!(stream.to_vec(), vec![10, 20, 30]);
/// ```
pub struct Stream<T> {
    source: Arc<Source<T>>,
}

type Opened<T> = Result<BoxCursor<T>, StreamError>;

type Factory<T> = Box<dyn Fn() -> Opened<T> + Send + Sync>;

enum Source<T> {
    Empty,
    Single(T),
    Deferred(Thunk<T>),
    Slice {
        items: Arc<[T]>,
        range: Range<usize>,
    },
    Deque {
        items: Arc<VecDeque<T>>,
        range: Range<usize>,
    },
    Cons {
        head: T,
        tail: Stream<T>,
    },
    DelayedCons {
        head: Thunk<T>,
        tail: Stream<T>,
    },
    /// A repeatable stream built by a cursor factory.
    Derived {
        factory: Factory<T>,
        known_size: Option<usize>,
    },
    /// A stream whose cursor can be handed out once.
    SinglePass {
        state: Mutex<SinglePass<T>>,
        known_size: Option<usize>,
    },
}

/// Stands in for a one-shot source found consumed after traversal began.
///
/// Reports one more element and fails its `advance` with
/// [`CursorError::Consumed`], then reports exhaustion.
struct ConsumedSource<T> {
    failed: bool,
    marker: std::marker::PhantomData<fn() -> T>,
}

impl<T> Cursor for ConsumedSource<T> {
    type Item = T;

    fn has_next(&mut self) -> bool {
        !self.failed
    }

    fn advance(&mut self) -> Result<(), CursorError> {
        if self.failed {
            return Err(CursorError::exhausted("ConsumedSource"));
        }
        self.failed = true;
        Err(CursorError::consumed("ConsumedSource"))
    }

    fn current(&mut self) -> Result<T, CursorError> {
        Err(CursorError::unstarted("ConsumedSource"))
    }
}

/// The lifecycle of a single-pass source.
enum SinglePass<T> {
    /// Not yet opened; opening pulls from the upstream stream.
    Unopened(Box<dyn FnOnce() -> Opened<T> + Send>),
    /// Opened but not handed out, e.g. after an emptiness check.
    Open(BoxCursor<T>),
    Taken,
}

impl<T> SinglePass<T> {
    /// Opens the source without handing it out. A source whose upstream
    /// was already consumed becomes `Taken`.
    fn peek(&mut self) -> Option<&mut BoxCursor<T>> {
        if let Self::Unopened(_) = self
            && let Self::Unopened(factory) = std::mem::replace(self, Self::Taken)
            && let Ok(cursor) = factory()
        {
            *self = Self::Open(cursor);
        }
        match self {
            Self::Open(cursor) => Some(cursor),
            Self::Unopened(_) | Self::Taken => None,
        }
    }

    fn take(&mut self) -> Opened<T> {
        match std::mem::replace(self, Self::Taken) {
            Self::Unopened(factory) => factory(),
            Self::Open(cursor) => Ok(cursor),
            Self::Taken => Err(StreamError::already_consumed("try_cursor")),
        }
    }

    const fn is_taken(&self) -> bool {
        matches!(self, Self::Taken)
    }
}

// =============================================================================
// Construction
// =============================================================================

impl<T: Element> Stream<T> {
    fn from_source(source: Source<T>) -> Self {
        Self {
            source: Arc::new(source),
        }
    }

    /// Builds a derived stream.
    ///
    /// The result is repeatable when every stream `factory` reads from is;
    /// otherwise it is single-pass and `factory` runs at most once.
    /// `factory` fails when a stream it reads from was already consumed.
    fn derive<F>(repeatable: bool, known_size: Option<usize>, factory: F) -> Self
    where
        F: Fn() -> Opened<T> + Send + Sync + 'static,
    {
        if repeatable {
            Self::from_source(Source::Derived {
                factory: Box::new(factory),
                known_size,
            })
        } else {
            Self::from_source(Source::SinglePass {
                state: Mutex::new(SinglePass::Unopened(Box::new(factory))),
                known_size,
            })
        }
    }

    fn from_boxed_once(cursor: BoxCursor<T>, known_size: Option<usize>) -> Self {
        Self::from_source(Source::SinglePass {
            state: Mutex::new(SinglePass::Open(cursor)),
            known_size,
        })
    }

    /// Creates a stream with no elements.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use fstream::stream::Stream;
    ///
    /// assert!(Stream::<i32>::empty().is_empty());
    /// ```
    #[must_use]
    pub fn empty() -> Self {
        Self::from_source(Source::Empty)
    }

    /// Creates a stream over `items`.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use fstream::stream::Stream;
    ///
    /// assert_eq!(Stream::of(vec!['a', 'b']).size(), 2);
    /// ```
    #[must_use]
    pub fn of(items: impl Into<Arc<[T]>>) -> Self {
        let items = items.into();
        let range = 0..items.len();
        Self::from_source(Source::Slice { items, range })
    }

    /// Creates a stream of exactly one element.
    #[must_use]
    pub fn once(value: T) -> Self {
        Self::from_source(Source::Single(value))
    }

    /// Creates a stream of exactly one deferred element.
    ///
    /// The thunk is forced only when the element is read.
    #[must_use]
    pub fn deferred(thunk: Thunk<T>) -> Self {
        Self::from_source(Source::Deferred(thunk))
    }

    /// Creates a stream of exactly one element computed by `initializer` on
    /// first read.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use fstream::stream::Stream;
    ///
    /// let stream = Stream::lazy(|| 6 * 7);
    /// assert_eq!(stream.head(), Ok(42));
    /// ```
    #[must_use]
    pub fn lazy<F>(initializer: F) -> Self
    where
        F: FnOnce() -> T + Send + 'static,
    {
        Self::deferred(Thunk::new(initializer))
    }

    /// Creates a repeatable stream over a re-iterable collection.
    ///
    /// Each cursor iterates a fresh clone of `iterable`.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use fstream::stream::Stream;
    ///
    /// let stream = Stream::from_iterable(1..=3);
    /// assert_eq!(stream.to_vec(), vec![1, 2, 3]);
    /// assert_eq!(stream.to_vec(), vec![1, 2, 3]);
    /// ```
    #[must_use]
    pub fn from_iterable<I>(iterable: I) -> Self
    where
        I: IntoIterator<Item = T> + Clone + Send + Sync + 'static,
        I::IntoIter: Send + 'static,
    {
        Self::derive(true, None, move || {
            Ok(Box::new(IteratorCursor::new(iterable.clone().into_iter())))
        })
    }

    /// Creates a single-pass stream over a one-shot iterator.
    ///
    /// The size is not known until the stream is traversed; see
    /// [`from_exact_iter_once`](Self::from_exact_iter_once).
    ///
    /// # Examples
    ///
    /// ```rust
    /// use fstream::stream::Stream;
    ///
    /// let stream = Stream::from_iter_once(vec![1, 2].into_iter());
    /// assert!(!stream.is_repeatable());
    /// assert_eq!(stream.to_vec(), vec![1, 2]);
    /// assert!(stream.try_cursor().is_err());
    /// ```
    #[must_use]
    pub fn from_iter_once<I>(iterable: I) -> Self
    where
        I: IntoIterator<Item = T>,
        I::IntoIter: Send + 'static,
    {
        Self::from_boxed_once(Box::new(IteratorCursor::new(iterable.into_iter())), None)
    }

    /// Creates a single-pass stream over a one-shot iterator of known
    /// length.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use fstream::stream::Stream;
    ///
    /// let stream = Stream::from_exact_iter_once(vec!['a', 'b', 'c']);
    /// assert_eq!(stream.known_size(), Some(3));
    /// ```
    #[must_use]
    pub fn from_exact_iter_once<I>(iterable: I) -> Self
    where
        I: IntoIterator<Item = T>,
        I::IntoIter: ExactSizeIterator + Send + 'static,
    {
        let iterator = iterable.into_iter();
        let known_size = Some(iterator.len());
        Self::from_boxed_once(Box::new(IteratorCursor::new(iterator)), known_size)
    }

    /// Creates a single-pass stream that hands out `cursor` once.
    ///
    /// A cursor passed through [`Cursor::into_items`] is unwrapped rather
    /// than adapted a second time.
    #[must_use]
    pub fn from_cursor_once<C>(cursor: C) -> Self
    where
        C: IntoCursor<Item = T>,
        C::IntoCursor: Send + 'static,
    {
        Self::from_boxed_once(Box::new(cursor.into_cursor()), None)
    }

    /// Creates a stream over a double-ended queue.
    ///
    /// Reversal traverses the deque backwards without copying it.
    #[must_use]
    pub fn from_deque(items: VecDeque<T>) -> Self {
        let range = 0..items.len();
        Self::from_source(Source::Deque {
            items: Arc::new(items),
            range,
        })
    }

    /// Creates a stream of `head` followed by every element of `tail`.
    ///
    /// `tail` is not touched until the head has been consumed.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use fstream::stream::Stream;
    ///
    /// let stream = Stream::cons(0, Stream::of(vec![1, 2]));
    /// assert_eq!(stream.to_vec(), vec![0, 1, 2]);
    /// ```
    #[must_use]
    pub fn cons(head: T, tail: Self) -> Self {
        Self::from_source(Source::Cons { head, tail })
    }

    /// Creates a stream of a deferred head followed by every element of
    /// `tail`.
    #[must_use]
    pub fn cons_deferred(head: Thunk<T>, tail: Self) -> Self {
        Self::from_source(Source::DelayedCons { head, tail })
    }

    /// Creates a repeatable stream from a cursor factory.
    ///
    /// Every call to `factory` must produce a cursor over the same
    /// sequence.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use fstream::cursor;
    /// use fstream::stream::Stream;
    ///
    /// let stream = Stream::from_fn(|| cursor::from_slice(vec![3, 4]));
    /// assert_eq!(stream.to_vec(), vec![3, 4]);
    /// ```
    #[must_use]
    pub fn from_fn<C, F>(factory: F) -> Self
    where
        C: IntoCursor<Item = T>,
        C::IntoCursor: Send + 'static,
        F: Fn() -> C + Send + Sync + 'static,
    {
        Self::derive(true, None, move || Ok(Box::new(factory().into_cursor())))
    }

    /// Creates the infinite stream `seed`, `step(seed)`, `step(step(seed))`,
    /// ...
    ///
    /// # Examples
    ///
    /// ```rust
    /// use fstream::stream::Stream;
    ///
    /// let powers = Stream::iterate(1, |value| value * 3).take(4);
    /// assert_eq!(powers.to_vec(), vec![1, 3, 9, 27]);
    /// ```
    #[must_use]
    pub fn iterate<F>(seed: T, step: F) -> Self
    where
        F: Fn(&T) -> T + Send + Sync + 'static,
    {
        let step = Arc::new(step);
        Self::derive(true, None, move || {
            let step = Arc::clone(&step);
            Ok(Box::new(IterateCursor::new(
                seed.clone(),
                move |value: &T| step(value),
            )))
        })
    }
}

// =============================================================================
// Cursors and classification
// =============================================================================

impl<T: Element> Stream<T> {
    /// Returns whether every call to [`cursor`](Self::cursor) starts a
    /// complete traversal.
    #[must_use]
    pub fn is_repeatable(&self) -> bool {
        match &*self.source {
            Source::SinglePass { .. } => false,
            Source::Cons { tail, .. } | Source::DelayedCons { tail, .. } => tail.is_repeatable(),
            Source::Empty
            | Source::Single(_)
            | Source::Deferred(_)
            | Source::Slice { .. }
            | Source::Deque { .. }
            | Source::Derived { .. } => true,
        }
    }

    /// Returns the number of elements when it is known without traversal.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use fstream::stream::Stream;
    ///
    /// let stream = Stream::of(vec![1, 2, 3]);
    /// assert_eq!(stream.map(|value| value + 1).known_size(), Some(3));
    /// assert_eq!(stream.filter(|value| value % 2 == 0).known_size(), None);
    /// ```
    #[must_use]
    pub fn known_size(&self) -> Option<usize> {
        match &*self.source {
            Source::Empty => Some(0),
            Source::Single(_) | Source::Deferred(_) => Some(1),
            Source::Slice { range, .. } | Source::Deque { range, .. } => Some(range.len()),
            Source::Cons { tail, .. } | Source::DelayedCons { tail, .. } => {
                tail.known_size().and_then(|size| size.checked_add(1))
            }
            Source::Derived { known_size, .. } => *known_size,
            Source::SinglePass { state, known_size } => {
                if state.lock().is_taken() {
                    None
                } else {
                    *known_size
                }
            }
        }
    }

    /// Returns a fresh cursor over this stream.
    ///
    /// A consumed single-pass stream, or one derived from it, logs a
    /// warning and returns an empty cursor; use
    /// [`try_cursor`](Self::try_cursor) to observe that case.
    #[must_use]
    pub fn cursor(&self) -> BoxCursor<T> {
        self.try_cursor().unwrap_or_else(|error| {
            warn!(%error, "single-pass stream traversed again; yielding no elements");
            Box::new(EmptyCursor::new())
        })
    }

    /// Returns a fresh cursor over this stream.
    ///
    /// # Errors
    ///
    /// Returns [`StreamError::AlreadyConsumed`] when this stream is
    /// single-pass and its cursor was already handed out, or when it is
    /// derived from such a stream. A cons tail is opened only after the
    /// head is read, so a consumed tail surfaces later as
    /// [`CursorError::Consumed`] from the cursor's `advance`.
    pub fn try_cursor(&self) -> Result<BoxCursor<T>, StreamError> {
        let cursor: BoxCursor<T> = match &*self.source {
            Source::Empty => Box::new(EmptyCursor::new()),
            Source::Single(value) => Box::new(SingleCursor::new(value.clone())),
            Source::Deferred(thunk) => Box::new(DeferredCursor::new(thunk.clone())),
            Source::Slice { items, range } => {
                Box::new(SliceCursor::forward(Arc::clone(items), range.clone()))
            }
            Source::Deque { items, range } => {
                Box::new(DequeCursor::forward(Arc::clone(items), range.clone()))
            }
            Source::Cons { head, tail } => {
                let tail = tail.clone();
                Box::new(Cons::deferred(head.clone(), move || tail.cursor_or_consumed()))
            }
            Source::DelayedCons { head, tail } => {
                let tail = tail.clone();
                Box::new(DelayedCons::deferred(head.clone(), move || {
                    tail.cursor_or_consumed()
                }))
            }
            Source::Derived { factory, .. } => factory()?,
            Source::SinglePass { state, .. } => {
                let cursor = state.lock().take()?;
                debug!("single-pass stream handed out its source cursor");
                cursor
            }
        };
        Ok(cursor)
    }

    /// Returns a cursor for a part of a traversal that is already under
    /// way, replaying a consumed source as [`CursorError::Consumed`].
    pub(crate) fn cursor_or_consumed(&self) -> BoxCursor<T> {
        self.try_cursor().unwrap_or_else(|error| {
            warn!(%error, "single-pass stream found consumed during traversal");
            Box::new(ConsumedSource {
                failed: false,
                marker: std::marker::PhantomData,
            })
        })
    }

    /// Returns a [`std::iter::Iterator`] over a fresh cursor.
    ///
    /// # Panics
    ///
    /// Panics if an underlying cursor breaks the cursor protocol; see
    /// [`CursorIter`].
    #[must_use]
    pub fn iter(&self) -> CursorIter<BoxCursor<T>> {
        CursorIter::new(self.cursor())
    }

    /// Answers whether a single-pass stream has no element left without
    /// handing out its cursor.
    fn peek_single_pass_empty(state: &Mutex<SinglePass<T>>) -> bool {
        state
            .lock()
            .peek()
            .is_none_or(|cursor| !cursor.has_next())
    }
}

// =============================================================================
// Trait implementations
// =============================================================================

impl<T> Clone for Stream<T> {
    fn clone(&self) -> Self {
        Self {
            source: Arc::clone(&self.source),
        }
    }
}

impl<T: Element> Default for Stream<T> {
    fn default() -> Self {
        Self::empty()
    }
}

impl<T> fmt::Debug for Stream<T> {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        let kind = match &*self.source {
            Source::Empty => "empty",
            Source::Single(_) => "single",
            Source::Deferred(_) => "deferred",
            Source::Slice { .. } => "slice",
            Source::Deque { .. } => "deque",
            Source::Cons { .. } => "cons",
            Source::DelayedCons { .. } => "delayed_cons",
            Source::Derived { .. } => "derived",
            Source::SinglePass { .. } => "single_pass",
        };
        formatter
            .debug_struct("Stream")
            .field("kind", &kind)
            .finish_non_exhaustive()
    }
}

impl<T: Element> From<Vec<T>> for Stream<T> {
    fn from(items: Vec<T>) -> Self {
        Self::of(items)
    }
}

impl<T: Element> From<VecDeque<T>> for Stream<T> {
    fn from(items: VecDeque<T>) -> Self {
        Self::from_deque(items)
    }
}

impl<T: Element> FromIterator<T> for Stream<T> {
    fn from_iter<I: IntoIterator<Item = T>>(iterable: I) -> Self {
        Self::of(iterable.into_iter().collect::<Vec<_>>())
    }
}

impl<T: Element> IntoIterator for &Stream<T> {
    type Item = T;
    type IntoIter = CursorIter<BoxCursor<T>>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

// =============================================================================
// Serde Support
// =============================================================================

#[cfg(feature = "serde")]
impl<T: Element + serde::Serialize> serde::Serialize for Stream<T> {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        use serde::ser::{Error, SerializeSeq};

        let mut sequence = serializer.serialize_seq(self.known_size())?;
        let mut cursor = self.cursor();
        while let Some(element) = cursor.try_next().map_err(S::Error::custom)? {
            sequence.serialize_element(&element)?;
        }
        sequence.end()
    }
}

#[cfg(feature = "serde")]
impl<'de, T: Element + serde::Deserialize<'de>> serde::Deserialize<'de> for Stream<T> {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        use serde::de::{SeqAccess, Visitor};
        use std::marker::PhantomData;

        struct StreamVisitor<T> {
            marker: PhantomData<T>,
        }

        impl<'de, T: Element + serde::Deserialize<'de>> Visitor<'de> for StreamVisitor<T> {
            type Value = Stream<T>;

            fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
                formatter.write_str("a sequence")
            }

            fn visit_seq<A>(self, mut sequence: A) -> Result<Self::Value, A::Error>
            where
                A: SeqAccess<'de>,
            {
                const MAX_PREALLOCATE: usize = 4096;
                let capacity = sequence.size_hint().unwrap_or(0).min(MAX_PREALLOCATE);
                let mut elements = Vec::with_capacity(capacity);
                while let Some(element) = sequence.next_element()? {
                    elements.push(element);
                }
                Ok(Stream::of(elements))
            }
        }

        deserializer.deserialize_seq(StreamVisitor {
            marker: PhantomData,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cursor;
    use rstest::rstest;
    use std::sync::atomic::{AtomicUsize, Ordering};

    static_assertions::assert_impl_all!(Stream<i32>: Send, Sync, Clone);
    static_assertions::assert_impl_all!(Stream<String>: Send, Sync, Default);

    #[rstest]
    #[case(Stream::empty(), vec![])]
    #[case(Stream::of(vec![1, 2, 3]), vec![1, 2, 3])]
    #[case(Stream::once(7), vec![7])]
    #[case(Stream::lazy(|| 8), vec![8])]
    #[case(Stream::from_iterable(vec![4, 5]), vec![4, 5])]
    #[case(Stream::from_deque(VecDeque::from(vec![1, 2])), vec![1, 2])]
    #[case(Stream::cons(0, Stream::of(vec![1])), vec![0, 1])]
    #[case(Stream::cons_deferred(Thunk::new(|| 0), Stream::empty()), vec![0])]
    #[case(Stream::from_fn(|| cursor::from_slice(vec![9, 9])), vec![9, 9])]
    #[case(Stream::iterate(1, |value| value + 1).take(3), vec![1, 2, 3])]
    fn test_repeatable_sources(#[case] stream: Stream<i32>, #[case] expected: Vec<i32>) {
        assert!(stream.is_repeatable());
        assert_eq!(stream.to_vec(), expected);
        assert_eq!(stream.to_vec(), expected);
    }

    #[rstest]
    fn test_construction_evaluates_nothing() {
        let calls = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&calls);
        let stream = Stream::lazy(move || {
            counter.fetch_add(1, Ordering::SeqCst);
            1
        })
        .map(|value| value + 1)
        .filter(|value| *value > 0);

        assert_eq!(calls.load(Ordering::SeqCst), 0);
        assert_eq!(stream.to_vec(), vec![2]);
        assert_eq!(stream.to_vec(), vec![2]);
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[rstest]
    fn test_single_pass_hands_out_cursor_once() {
        let stream = Stream::from_exact_iter_once(vec![1, 2, 3]);
        assert!(!stream.is_repeatable());
        assert_eq!(stream.known_size(), Some(3));

        assert_eq!(stream.to_vec(), vec![1, 2, 3]);
        assert_eq!(stream.known_size(), None);
        assert!(matches!(
            stream.try_cursor(),
            Err(StreamError::AlreadyConsumed(_))
        ));
        assert!(stream.to_vec().is_empty());
    }

    #[rstest]
    fn test_single_pass_emptiness_check_keeps_elements() {
        let stream = Stream::from_cursor_once(cursor::from_slice(vec![1, 2]));
        assert!(!stream.is_empty());
        assert!(!stream.is_empty());
        assert_eq!(stream.to_vec(), vec![1, 2]);
    }

    #[rstest]
    fn test_derived_from_single_pass_is_single_pass() {
        let doubled = Stream::from_iter_once(1..=3).map(|value| value * 2);
        assert!(!doubled.is_repeatable());
        assert!(!doubled.is_empty());
        assert_eq!(doubled.to_vec(), vec![2, 4, 6]);
        assert!(doubled.try_cursor().is_err());
    }

    #[rstest]
    fn test_inexact_iterator_size_is_unknown() {
        let stream = Stream::from_iter_once((1..=10).filter(|value| value % 2 == 0));
        assert_eq!(stream.known_size(), None);
        assert_eq!(stream.size(), 5);
    }

    #[rstest]
    #[case::map(|source: &Stream<i32>| source.map(|value| value * 2))]
    #[case::filter(|source: &Stream<i32>| source.filter(|value| *value > 0))]
    #[case::drop(|source: &Stream<i32>| source.drop(1))]
    #[case::take(|source: &Stream<i32>| source.take(1))]
    #[case::concat(|source: &Stream<i32>| source.concat(&Stream::of(vec![9])))]
    #[case::zip(|source: &Stream<i32>| source.zip_with(&Stream::of(vec![1]), |a, b| a + b))]
    #[case::reverse(|source: &Stream<i32>| source.reverse())]
    fn test_derived_from_consumed_source_reports_it(
        #[case] derive: fn(&Stream<i32>) -> Stream<i32>,
    ) {
        let source = Stream::from_iter_once(vec![1, 2, 3]);
        assert_eq!(source.to_vec(), vec![1, 2, 3]);

        let derived = derive(&source);
        assert!(matches!(
            derived.try_to_vec(),
            Err(StreamError::AlreadyConsumed(_))
        ));
        assert!(derived.to_vec().is_empty());
    }

    #[rstest]
    fn test_cons_over_consumed_tail_reports_it() {
        let tail = Stream::from_iter_once(vec![1, 2]);
        assert_eq!(tail.to_vec(), vec![1, 2]);

        let stream = Stream::cons(0, tail.clone());
        assert!(matches!(
            stream.try_to_vec(),
            Err(StreamError::AlreadyConsumed(_))
        ));
        assert!(matches!(
            stream.try_to_vec(),
            Err(StreamError::AlreadyConsumed(_))
        ));
        // The infallible path keeps the head and ends at the missing tail.
        assert_eq!(stream.to_vec(), vec![0]);

        let delayed = Stream::cons_deferred(Thunk::new(|| 0), tail);
        assert!(matches!(
            delayed.try_to_vec(),
            Err(StreamError::AlreadyConsumed(_))
        ));
    }

    #[rstest]
    fn test_cons_tail_consumed_mid_traversal() {
        let tail = Stream::from_iter_once(vec![1]);
        let stream = Stream::cons(0, tail.clone());
        let mut cursor = stream.cursor();
        assert_eq!(cursor.try_next(), Ok(Some(0)));

        assert_eq!(tail.to_vec(), vec![1]);
        assert!(cursor.has_next());
        assert!(cursor.advance().unwrap_err().is_consumed());
        assert!(!cursor.has_next());
    }

    #[rstest]
    fn test_cons_with_single_pass_tail_is_single_pass() {
        let stream = Stream::cons(0, Stream::from_iter_once(vec![1]));
        assert!(!stream.is_repeatable());
    }

    #[rstest]
    fn test_debug_does_not_force() {
        let stream: Stream<i32> = Stream::lazy(|| panic!("must not be forced"));
        assert_eq!(format!("{stream:?}"), "Stream { kind: \"deferred\", .. }");
    }

    #[rstest]
    fn test_collect_into_stream() {
        let stream: Stream<i32> = (1..=4).collect();
        assert_eq!(stream.known_size(), Some(4));
        assert_eq!((&stream).into_iter().sum::<i32>(), 10);
    }

    #[rstest]
    fn test_shared_across_threads() {
        let stream = Stream::of((1..=100).collect::<Vec<i32>>()).map(|value| value * 2);
        let handles: Vec<_> = (0..4)
            .map(|_| {
                let stream = stream.clone();
                std::thread::spawn(move || stream.iter().sum::<i32>())
            })
            .collect();
        for handle in handles {
            assert_eq!(handle.join().unwrap(), 10100);
        }
    }
}
