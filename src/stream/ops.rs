//! Derived streams.
//!
//! Every operation here returns a new [`Stream`] describing how to build its
//! cursor from the receiver's. The receiver is never modified and nothing
//! is evaluated until the derived stream is traversed.

use std::ops::Range;
use std::sync::Arc;

use tracing::debug;

use super::{Element, Source, Stream, StreamError};
use crate::control::Thunk;
use crate::cursor::{Concat, Cursor, DequeCursor, SliceCursor};

impl<T: Element> Stream<T> {
    /// Returns a stream over a sub-range of a collection-backed stream, or
    /// `None` for any other stream.
    fn narrowed(&self, narrow: impl FnOnce(Range<usize>) -> Range<usize>) -> Option<Self> {
        match &*self.source {
            Source::Slice { items, range } => Some(Self::from_source(Source::Slice {
                items: Arc::clone(items),
                range: narrow(range.clone()),
            })),
            Source::Deque { items, range } => Some(Self::from_source(Source::Deque {
                items: Arc::clone(items),
                range: narrow(range.clone()),
            })),
            _ => None,
        }
    }

    /// Applies `function` to every element.
    ///
    /// `function` runs at most once per element per traversal, and only for
    /// elements that are read.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use fstream::stream::Stream;
    ///
    /// let lengths = Stream::of(vec!["a", "bcd"]).map(str::len);
    /// assert_eq!(lengths.to_vec(), vec![1, 3]);
    /// ```
    #[must_use]
    pub fn map<U, F>(&self, function: F) -> Stream<U>
    where
        U: Element,
        F: Fn(T) -> U + Send + Sync + 'static,
    {
        let upstream = self.clone();
        let function = Arc::new(function);
        Stream::derive(self.is_repeatable(), self.known_size(), move || {
            let function = Arc::clone(&function);
            Ok(Box::new(upstream.try_cursor()?.map(move |element| function(element))))
        })
    }

    /// Keeps the elements satisfying `predicate`.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use fstream::stream::Stream;
    ///
    /// let evens = Stream::from_iterable(1..=6).filter(|value| value % 2 == 0);
    /// assert_eq!(evens.to_vec(), vec![2, 4, 6]);
    /// ```
    #[must_use]
    pub fn filter<P>(&self, predicate: P) -> Self
    where
        P: Fn(&T) -> bool + Send + Sync + 'static,
    {
        let upstream = self.clone();
        let predicate = Arc::new(predicate);
        Self::derive(self.is_repeatable(), None, move || {
            let predicate = Arc::clone(&predicate);
            Ok(Box::new(upstream.try_cursor()?.filter(move |element| predicate(element))))
        })
    }

    /// Skips the first `count` elements.
    ///
    /// Dropping more elements than the stream has yields an empty stream.
    #[must_use]
    pub fn drop(&self, count: usize) -> Self {
        if count == 0 {
            return self.clone();
        }
        if let Some(narrowed) =
            self.narrowed(|range| range.start.saturating_add(count).min(range.end)..range.end)
        {
            return narrowed;
        }
        let upstream = self.clone();
        let known_size = self.known_size().map(|size| size.saturating_sub(count));
        Self::derive(self.is_repeatable(), known_size, move || {
            Ok(Box::new(upstream.try_cursor()?.drop_first(count)))
        })
    }

    /// Keeps at most the first `count` elements.
    ///
    /// Nothing past the `count`-th element is ever pulled, so `take` makes
    /// an infinite stream finite.
    #[must_use]
    pub fn take(&self, count: usize) -> Self {
        if let Some(narrowed) =
            self.narrowed(|range| range.start..range.start.saturating_add(count).min(range.end))
        {
            return narrowed;
        }
        let upstream = self.clone();
        let known_size = self.known_size().map(|size| size.min(count));
        Self::derive(self.is_repeatable(), known_size, move || {
            Ok(Box::new(upstream.try_cursor()?.take(count)))
        })
    }

    /// Skips the leading elements that satisfy `predicate`.
    #[must_use]
    pub fn drop_while<P>(&self, predicate: P) -> Self
    where
        P: Fn(&T) -> bool + Send + Sync + 'static,
    {
        let upstream = self.clone();
        let predicate = Arc::new(predicate);
        Self::derive(self.is_repeatable(), None, move || {
            let predicate = Arc::clone(&predicate);
            Ok(Box::new(
                upstream
                    .try_cursor()?
                    .drop_while(move |element| predicate(element)),
            ))
        })
    }

    /// Keeps the leading elements that satisfy `predicate`.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use fstream::stream::Stream;
    ///
    /// let small = Stream::iterate(1, |value| value * 2).take_while(|value| *value < 20);
    /// assert_eq!(small.to_vec(), vec![1, 2, 4, 8, 16]);
    /// ```
    #[must_use]
    pub fn take_while<P>(&self, predicate: P) -> Self
    where
        P: Fn(&T) -> bool + Send + Sync + 'static,
    {
        let upstream = self.clone();
        let predicate = Arc::new(predicate);
        Self::derive(self.is_repeatable(), None, move || {
            let predicate = Arc::clone(&predicate);
            Ok(Box::new(
                upstream
                    .try_cursor()?
                    .take_while(move |element| predicate(element)),
            ))
        })
    }

    /// Yields every element of this stream, then every element of `other`.
    ///
    /// `other` is not touched until this stream is drained.
    #[must_use]
    pub fn concat(&self, other: &Self) -> Self {
        let first = self.clone();
        let second = other.clone();
        let known_size = self
            .known_size()
            .zip(other.known_size())
            .and_then(|(left, right)| left.checked_add(right));
        let repeatable = self.is_repeatable() && other.is_repeatable();
        Self::derive(repeatable, known_size, move || {
            let second = second.clone();
            Ok(Box::new(Concat::deferred(first.try_cursor()?, move || {
                second.cursor_or_consumed()
            })))
        })
    }

    /// Adds `element` after the last element.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use fstream::stream::Stream;
    ///
    /// let stream = Stream::of(vec![1, 2]).append(3);
    /// assert_eq!(stream.to_vec(), vec![1, 2, 3]);
    /// ```
    #[must_use]
    pub fn append(&self, element: T) -> Self {
        self.concat(&Self::once(element))
    }

    /// Adds `element` before the first element.
    #[must_use]
    pub fn prepend(&self, element: T) -> Self {
        Self::cons(element, self.clone())
    }

    /// Maps every element to a stream and flattens the results in order.
    ///
    /// Empty inner streams contribute nothing.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use fstream::stream::Stream;
    ///
    /// let repeated = Stream::of(vec![1, 0, 3])
    ///     .flat_map(|count| Stream::of(vec![count; count]));
    /// assert_eq!(repeated.to_vec(), vec![1, 3, 3, 3]);
    /// ```
    #[must_use]
    pub fn flat_map<U, F>(&self, function: F) -> Stream<U>
    where
        U: Element,
        F: Fn(T) -> Stream<U> + Send + Sync + 'static,
    {
        let upstream = self.clone();
        let function = Arc::new(function);
        Stream::derive(self.is_repeatable(), None, move || {
            let function = Arc::clone(&function);
            Ok(Box::new(
                upstream
                    .try_cursor()?
                    .flat_map(move |element| function(element).cursor_or_consumed()),
            ))
        })
    }

    /// Pairs elements positionally, stopping at the end of the shorter
    /// stream.
    #[must_use]
    pub fn zip<U: Element>(&self, other: &Stream<U>) -> Stream<(T, U)> {
        self.zip_with(other, |left, right| (left, right))
    }

    /// Combines elements positionally with `function`, stopping at the end
    /// of the shorter stream.
    ///
    /// Once this stream is exhausted, `other` is not queried again.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use fstream::stream::Stream;
    ///
    /// let sums = Stream::of(vec![1, 2, 3]).zip_with(&Stream::iterate(10, |v| v + 10), |a, b| a + b);
    /// assert_eq!(sums.to_vec(), vec![11, 22, 33]);
    /// ```
    #[must_use]
    pub fn zip_with<U, V, F>(&self, other: &Stream<U>, function: F) -> Stream<V>
    where
        U: Element,
        V: Element,
        F: Fn(T, U) -> V + Send + Sync + 'static,
    {
        let first = self.clone();
        let second = other.clone();
        let function = Arc::new(function);
        let known_size = match (self.known_size(), other.known_size()) {
            (Some(left), Some(right)) => Some(left.min(right)),
            _ => None,
        };
        let repeatable = self.is_repeatable() && other.is_repeatable();
        Stream::derive(repeatable, known_size, move || {
            let function = Arc::clone(&function);
            Ok(Box::new(first.try_cursor()?.zip_with(
                second.try_cursor()?,
                move |left, right| function(left, right),
            )))
        })
    }

    /// Yields the elements in reverse order.
    ///
    /// Slice- and deque-backed streams are traversed backwards in place.
    /// Any other stream is materialized in full the first time the reversed
    /// stream is traversed, which takes time and memory proportional to its
    /// length and never finishes for an infinite stream. The materialized
    /// elements are shared by later traversals.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use fstream::stream::Stream;
    ///
    /// assert_eq!(Stream::of(vec![1, 2, 3]).reverse().to_vec(), vec![3, 2, 1]);
    /// assert_eq!(
    ///     Stream::from_iterable(1..=3).map(|v| v * 2).reverse().to_vec(),
    ///     vec![6, 4, 2]
    /// );
    /// ```
    #[must_use]
    pub fn reverse(&self) -> Self {
        match &*self.source {
            Source::Empty | Source::Single(_) | Source::Deferred(_) => self.clone(),
            Source::Slice { items, range } => {
                let items = Arc::clone(items);
                let range = range.clone();
                Self::derive(true, Some(range.len()), move || {
                    Ok(Box::new(SliceCursor::backward(Arc::clone(&items), range.clone())))
                })
            }
            Source::Deque { items, range } => {
                let items = Arc::clone(items);
                let range = range.clone();
                Self::derive(true, Some(range.len()), move || {
                    Ok(Box::new(DequeCursor::backward(Arc::clone(&items), range.clone())))
                })
            }
            Source::Cons { .. }
            | Source::DelayedCons { .. }
            | Source::Derived { .. }
            | Source::SinglePass { .. } => {
                let upstream = self.clone();
                let materialized = Thunk::new(move || -> Result<Arc<[T]>, StreamError> {
                    debug!(
                        known_size = ?upstream.known_size(),
                        "materializing stream for reverse"
                    );
                    let mut elements = upstream.try_to_vec()?;
                    elements.reverse();
                    Ok(elements.into())
                });
                Self::derive(true, self.known_size(), move || {
                    let elements = materialized.force().clone()?;
                    Ok(Box::new(SliceCursor::new(elements)))
                })
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cursor::{self, CursorError};
    use rstest::rstest;
    use std::collections::VecDeque;
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn counted(calls: &Arc<AtomicUsize>) -> impl Fn(i32) -> i32 + Send + Sync + 'static {
        let calls = Arc::clone(calls);
        move |value| {
            calls.fetch_add(1, Ordering::SeqCst);
            value * 2
        }
    }

    #[rstest]
    fn test_map_is_lazy_and_applied_once_per_read() {
        let calls = Arc::new(AtomicUsize::new(0));
        let stream = Stream::of(vec![1, 2, 3]).map(counted(&calls));
        assert_eq!(calls.load(Ordering::SeqCst), 0);

        let mut cursor = stream.cursor();
        cursor.advance().unwrap();
        assert_eq!(cursor.current(), Ok(2));
        assert_eq!(cursor.current(), Ok(2));
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[rstest]
    fn test_map_skipped_elements_are_not_mapped() {
        let calls = Arc::new(AtomicUsize::new(0));
        let stream = Stream::of(vec![1, 2, 3, 4]).map(counted(&calls)).drop(3);
        assert_eq!(stream.to_vec(), vec![8]);
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[rstest]
    #[case(0, vec![1, 2, 3])]
    #[case(2, vec![3])]
    #[case(3, vec![])]
    #[case(usize::MAX, vec![])]
    fn test_drop(#[case] count: usize, #[case] expected: Vec<i32>) {
        let slice = Stream::of(vec![1, 2, 3]);
        let deque = Stream::from_deque(VecDeque::from(vec![1, 2, 3]));
        let iterable = Stream::from_iterable(vec![1, 2, 3]);

        for stream in [slice, deque, iterable] {
            let dropped = stream.drop(count);
            assert_eq!(dropped.to_vec(), expected);
            if let Some(size) = dropped.known_size() {
                assert_eq!(size, expected.len());
            }
        }
    }

    #[rstest]
    #[case(0, vec![])]
    #[case(2, vec![1, 2])]
    #[case(usize::MAX, vec![1, 2, 3])]
    fn test_take(#[case] count: usize, #[case] expected: Vec<i32>) {
        let slice = Stream::of(vec![1, 2, 3]);
        let iterable = Stream::from_iterable(vec![1, 2, 3]);
        for stream in [slice, iterable] {
            assert_eq!(stream.take(count).to_vec(), expected);
        }
    }

    #[rstest]
    fn test_drop_then_take_on_slice() {
        let stream = Stream::of((0..10).collect::<Vec<_>>()).drop(2).take(3);
        assert_eq!(stream.known_size(), Some(3));
        assert_eq!(stream.to_vec(), vec![2, 3, 4]);
        assert_eq!(stream.reverse().to_vec(), vec![4, 3, 2]);
    }

    #[rstest]
    fn test_take_on_infinite_stream() {
        let pulled = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&pulled);
        let stream = Stream::iterate(0, move |value| {
            counter.fetch_add(1, Ordering::SeqCst);
            value + 1
        })
        .take(3);
        assert_eq!(stream.to_vec(), vec![0, 1, 2]);
        assert_eq!(pulled.load(Ordering::SeqCst), 2);
    }

    #[rstest]
    fn test_drop_while_and_take_while() {
        let stream = Stream::of(vec![1, 2, 5, 1, 7]);
        assert_eq!(stream.drop_while(|value| *value < 3).to_vec(), vec![5, 1, 7]);
        assert_eq!(stream.take_while(|value| *value < 3).to_vec(), vec![1, 2]);
    }

    #[rstest]
    fn test_concat_known_size_and_order() {
        let stream = Stream::of(vec![1, 2]).concat(&Stream::from_deque(VecDeque::from(vec![3])));
        assert_eq!(stream.known_size(), Some(3));
        assert_eq!(stream.to_vec(), vec![1, 2, 3]);
    }

    #[rstest]
    fn test_concat_does_not_touch_second_until_needed() {
        let second: Stream<i32> = Stream::lazy(|| panic!("second stream must stay untouched"));
        let stream = Stream::of(vec![1, 2]).concat(&second);
        assert_eq!(stream.take(2).to_vec(), vec![1, 2]);
    }

    #[rstest]
    fn test_append_and_prepend() {
        let stream = Stream::of(vec![2, 3]).append(4).prepend(1);
        assert_eq!(stream.known_size(), Some(4));
        assert_eq!(stream.to_vec(), vec![1, 2, 3, 4]);
    }

    #[rstest]
    fn test_flat_map_of_empties_is_empty() {
        let stream = Stream::cons(1, Stream::once(2)).flat_map(|_| Stream::<i32>::empty());
        assert!(stream.is_empty());
        assert!(stream.to_vec().is_empty());
    }

    #[rstest]
    fn test_flat_map_preserves_order() {
        let stream = Stream::of(vec![1, 2]).flat_map(|value| Stream::of(vec![value, value * 10]));
        assert_eq!(stream.to_vec(), vec![1, 10, 2, 20]);
    }

    #[rstest]
    fn test_zip_stops_at_shorter() {
        let stream = Stream::of(vec![1, 2, 3]).zip(&Stream::of(vec!['a', 'b']));
        assert_eq!(stream.known_size(), Some(2));
        assert_eq!(stream.to_vec(), vec![(1, 'a'), (2, 'b')]);
    }

    #[rstest]
    fn test_zip_short_circuits_on_first() {
        let second_pulls = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&second_pulls);
        let second = Stream::iterate(0, move |value| {
            counter.fetch_add(1, Ordering::SeqCst);
            value + 1
        });
        let stream = Stream::<i32>::empty().zip(&second);
        assert!(stream.to_vec().is_empty());
        assert_eq!(second_pulls.load(Ordering::SeqCst), 0);
    }

    #[rstest]
    #[case(Stream::of(vec![1, 2, 3]))]
    #[case(Stream::from_deque(VecDeque::from(vec![1, 2, 3])))]
    #[case(Stream::from_iterable(vec![1, 2, 3]))]
    #[case(Stream::cons(1, Stream::of(vec![2, 3])))]
    #[case(Stream::from_iter_once(vec![1, 2, 3]))]
    fn test_reverse(#[case] stream: Stream<i32>) {
        let reversed = stream.reverse();
        assert!(reversed.is_repeatable());
        assert_eq!(reversed.to_vec(), vec![3, 2, 1]);
        assert_eq!(reversed.to_vec(), vec![3, 2, 1]);
    }

    #[rstest]
    fn test_reverse_materializes_once_and_lazily() {
        let calls = Arc::new(AtomicUsize::new(0));
        let reversed = Stream::from_iterable(vec![1, 2, 3])
            .map(counted(&calls))
            .reverse();
        assert_eq!(calls.load(Ordering::SeqCst), 0);
        assert_eq!(reversed.to_vec(), vec![6, 4, 2]);
        assert_eq!(reversed.to_vec(), vec![6, 4, 2]);
        assert_eq!(calls.load(Ordering::SeqCst), 3);
    }

    #[rstest]
    fn test_derived_stream_leaves_receiver_untouched() {
        let stream = Stream::of(vec![1, 2, 3]);
        let _ = stream.map(|value| value + 1).filter(|value| *value > 2).reverse();
        assert_eq!(stream.to_vec(), vec![1, 2, 3]);
    }

    #[rstest]
    fn test_exhausted_derived_cursor_reports_error() {
        let mut cursor = Stream::of(vec![1]).map(|value| value + 1).cursor();
        cursor.advance().unwrap();
        assert!(!cursor.has_next());
        assert!(matches!(cursor.advance(), Err(CursorError::Exhausted(_))));
    }

    #[rstest]
    fn test_from_fn_composes_with_derived_streams() {
        let stream = Stream::from_fn(|| cursor::from_iter(1..=4)).filter(|value| value % 2 == 0);
        assert_eq!(stream.to_vec(), vec![2, 4]);
    }
}
