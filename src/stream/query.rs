//! Terminal operations: queries that traverse a stream and produce a value.
//!
//! On a single-pass stream every operation here except
//! [`is_empty`](Stream::is_empty) and [`known_size`](Stream::known_size)
//! consumes the stream.

use super::{Element, Source, Stream, StreamError};
use crate::cursor::Cursor;

#[cfg(feature = "reduction")]
use crate::reduction::{Accumulator, Reduction};

impl<T: Element> Stream<T> {
    /// Returns whether the stream has no element.
    ///
    /// Collection-backed streams answer in constant time. A derived stream
    /// opens a cursor and asks it once; a single-pass stream keeps the
    /// cursor it opened for the eventual traversal.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use fstream::stream::Stream;
    ///
    /// assert!(Stream::of(vec![1, 3]).filter(|value| value % 2 == 0).is_empty());
    /// assert!(!Stream::once(1).is_empty());
    /// ```
    #[must_use]
    pub fn is_empty(&self) -> bool {
        match &*self.source {
            Source::Empty => true,
            Source::Single(_)
            | Source::Deferred(_)
            | Source::Cons { .. }
            | Source::DelayedCons { .. } => false,
            Source::Slice { range, .. } | Source::Deque { range, .. } => range.is_empty(),
            Source::Derived { known_size, .. } => match known_size {
                Some(size) => *size == 0,
                None => !self.cursor().has_next(),
            },
            Source::SinglePass { state, .. } => Self::peek_single_pass_empty(state),
        }
    }

    /// Returns the number of elements, traversing the stream when the size
    /// is not known.
    ///
    /// Never returns for an infinite stream.
    #[must_use]
    pub fn size(&self) -> usize {
        self.known_size()
            .unwrap_or_else(|| self.iter().count())
    }

    /// Returns whether some element equals `value`.
    pub fn contains(&self, value: &T) -> bool
    where
        T: PartialEq,
    {
        self.any(|element| element == value)
    }

    /// Returns the first element.
    ///
    /// # Errors
    ///
    /// Returns [`StreamError::EmptySource`] for an empty stream,
    /// [`StreamError::AlreadyConsumed`] for a consumed single-pass stream,
    /// or the error of a failing cursor.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use fstream::stream::Stream;
    ///
    /// assert_eq!(Stream::of(vec![4, 5]).head(), Ok(4));
    /// assert!(Stream::<i32>::empty().head().is_err());
    /// ```
    pub fn head(&self) -> Result<T, StreamError> {
        match &*self.source {
            Source::Empty => Err(StreamError::empty_source("head")),
            Source::Single(value) | Source::Cons { head: value, .. } => Ok(value.clone()),
            Source::Deferred(thunk) | Source::DelayedCons { head: thunk, .. } => {
                Ok(thunk.force().clone())
            }
            Source::Slice { items, range } => range
                .clone()
                .next()
                .and_then(|index| items.get(index))
                .cloned()
                .ok_or(StreamError::empty_source("head")),
            Source::Deque { items, range } => range
                .clone()
                .next()
                .and_then(|index| items.get(index))
                .cloned()
                .ok_or(StreamError::empty_source("head")),
            Source::Derived { .. } | Source::SinglePass { .. } => self
                .try_cursor()?
                .try_next()?
                .ok_or(StreamError::empty_source("head")),
        }
    }

    /// Returns the last element.
    ///
    /// Never returns for an infinite stream.
    ///
    /// # Errors
    ///
    /// Same as [`head`](Self::head).
    pub fn last(&self) -> Result<T, StreamError> {
        match &*self.source {
            Source::Slice { items, range } => range
                .clone()
                .next_back()
                .and_then(|index| items.get(index))
                .cloned()
                .ok_or(StreamError::empty_source("last")),
            Source::Deque { items, range } => range
                .clone()
                .next_back()
                .and_then(|index| items.get(index))
                .cloned()
                .ok_or(StreamError::empty_source("last")),
            _ => {
                let mut cursor = self.try_cursor()?;
                let mut last = None;
                while let Some(element) = cursor.try_next()? {
                    last = Some(element);
                }
                last.ok_or(StreamError::empty_source("last"))
            }
        }
    }

    /// Returns the element at `index`, or `None` when the stream is
    /// shorter.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use fstream::stream::Stream;
    ///
    /// let squares = Stream::iterate(0u32, |value| value + 1).map(|value| value * value);
    /// assert_eq!(squares.get(7), Some(49));
    /// assert_eq!(Stream::of(vec![1]).get(1), None);
    /// ```
    #[must_use]
    pub fn get(&self, index: usize) -> Option<T> {
        self.drop(index).head().ok()
    }

    /// Splits the stream into its first element and the stream of the
    /// remaining elements.
    ///
    /// For a cons stream the rest is the original tail stream. For a
    /// single-pass stream the rest continues from the same source cursor.
    ///
    /// # Errors
    ///
    /// Returns [`StreamError::EmptySource`] for an empty stream,
    /// [`StreamError::AlreadyConsumed`] for a consumed single-pass stream,
    /// or the error of a failing cursor.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use fstream::stream::Stream;
    ///
    /// let (head, tail) = Stream::of(vec![1, 2, 3]).decons().unwrap();
    /// assert_eq!(head, 1);
    /// assert_eq!(tail.to_vec(), vec![2, 3]);
    /// ```
    pub fn decons(&self) -> Result<(T, Self), StreamError> {
        match &*self.source {
            Source::Cons { head, tail } => Ok((head.clone(), tail.clone())),
            Source::DelayedCons { head, tail } => Ok((head.force().clone(), tail.clone())),
            Source::SinglePass { .. } => {
                let mut cursor = self.try_cursor()?;
                let head = cursor
                    .try_next()?
                    .ok_or(StreamError::empty_source("decons"))?;
                Ok((head, Self::from_boxed_once(cursor, None)))
            }
            _ => {
                let head = self.head().map_err(|error| match error {
                    StreamError::EmptySource(_) => StreamError::empty_source("decons"),
                    other => other,
                })?;
                Ok((head, self.drop(1)))
            }
        }
    }

    /// Returns the first element satisfying `predicate`.
    ///
    /// # Errors
    ///
    /// Returns [`StreamError::NoSuchElement`] when no element matches, or
    /// the error of a failing cursor.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use fstream::stream::{Stream, StreamError};
    ///
    /// let stream = Stream::of(vec![1, 4, 9]);
    /// assert_eq!(stream.find_first(|value| *value > 3), Ok(4));
    /// assert!(matches!(
    ///     stream.find_first(|value| *value > 10),
    ///     Err(StreamError::NoSuchElement(_))
    /// ));
    /// ```
    pub fn find_first<P>(&self, mut predicate: P) -> Result<T, StreamError>
    where
        P: FnMut(&T) -> bool,
    {
        let mut cursor = self.try_cursor()?;
        while let Some(element) = cursor.try_next()? {
            if predicate(&element) {
                return Ok(element);
            }
        }
        Err(StreamError::no_such_element("find_first"))
    }

    /// Returns the first element satisfying `predicate`, if any.
    pub fn find<P>(&self, predicate: P) -> Option<T>
    where
        P: FnMut(&T) -> bool,
    {
        self.find_first(predicate).ok()
    }

    /// Returns whether some element satisfies `predicate`.
    ///
    /// Stops at the first match.
    pub fn any<P>(&self, mut predicate: P) -> bool
    where
        P: FnMut(&T) -> bool,
    {
        self.iter().any(|element| predicate(&element))
    }

    /// Returns whether every element satisfies `predicate`.
    ///
    /// Stops at the first mismatch.
    pub fn all<P>(&self, mut predicate: P) -> bool
    where
        P: FnMut(&T) -> bool,
    {
        self.iter().all(|element| predicate(&element))
    }

    /// Collects every element into a vector.
    ///
    /// # Panics
    ///
    /// Panics if an underlying cursor breaks the cursor protocol; use
    /// [`try_to_vec`](Self::try_to_vec) to receive that failure as an error.
    #[must_use]
    pub fn to_vec(&self) -> Vec<T> {
        self.iter().collect()
    }

    /// Collects every element into a vector.
    ///
    /// # Errors
    ///
    /// Returns [`StreamError::AlreadyConsumed`] for a consumed single-pass
    /// stream, or the error of a failing cursor.
    pub fn try_to_vec(&self) -> Result<Vec<T>, StreamError> {
        let mut cursor = self.try_cursor()?;
        let mut elements = Vec::with_capacity(self.known_size().unwrap_or(0));
        while let Some(element) = cursor.try_next()? {
            elements.push(element);
        }
        Ok(elements)
    }

    /// Folds every element into an accumulator, left to right.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use fstream::stream::Stream;
    ///
    /// let text = Stream::of(vec!['a', 'b']).fold(String::new(), |mut text, letter| {
    ///     text.push(letter);
    ///     text
    /// });
    /// assert_eq!(text, "ab");
    /// ```
    pub fn fold<B, F>(&self, initial: B, function: F) -> B
    where
        F: FnMut(B, T) -> B,
    {
        self.iter().fold(initial, function)
    }

    /// Runs `action` on every element, in order.
    pub fn for_each<F>(&self, action: F)
    where
        F: FnMut(T),
    {
        self.iter().for_each(action);
    }

    /// Feeds every element to a fresh accumulator of `reduction` and
    /// returns its final value.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use fstream::reduction;
    /// use fstream::stream::Stream;
    ///
    /// let total = Stream::of(vec![2, 9, 6, 8, 10, 2]).reduce(&reduction::sum());
    /// assert_eq!(total, 37);
    /// ```
    #[cfg(feature = "reduction")]
    pub fn reduce<R>(&self, reduction: &R) -> R::Output
    where
        R: Reduction<Input = T>,
    {
        let mut accumulator = reduction.new_accumulator();
        let mut count = 0_usize;
        for element in self {
            accumulator.accumulate(element);
            count += 1;
        }
        tracing::trace!(elements = count, "reduced stream");
        accumulator.value()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::control::Thunk;
    use crate::cursor::{self, CursorError};
    use rstest::rstest;
    use std::collections::VecDeque;

    struct Broken;

    impl Cursor for Broken {
        type Item = i32;

        fn has_next(&mut self) -> bool {
            true
        }

        fn advance(&mut self) -> Result<(), CursorError> {
            Err(CursorError::exhausted("Broken"))
        }

        fn current(&mut self) -> Result<i32, CursorError> {
            Err(CursorError::unstarted("Broken"))
        }
    }

    #[rstest]
    #[case(Stream::empty(), true)]
    #[case(Stream::of(vec![]), true)]
    #[case(Stream::of(vec![1]).drop(1), true)]
    #[case(Stream::from_iterable(Vec::new()), true)]
    #[case(Stream::of(vec![1]), false)]
    #[case(Stream::once(1), false)]
    #[case(Stream::cons(1, Stream::empty()), false)]
    #[case(Stream::of(vec![1, 2]).filter(|value| *value > 1), false)]
    fn test_is_empty(#[case] stream: Stream<i32>, #[case] expected: bool) {
        assert_eq!(stream.is_empty(), expected);
    }

    #[rstest]
    #[case(Stream::of(vec![1, 2, 3]), 3)]
    #[case(Stream::of(vec![1, 2, 3]).filter(|value| *value != 2), 2)]
    #[case(Stream::from_iterable(0..5), 5)]
    fn test_size(#[case] stream: Stream<i32>, #[case] expected: usize) {
        assert_eq!(stream.size(), expected);
    }

    #[rstest]
    fn test_contains() {
        let stream = Stream::from_iterable(vec!["a".to_string(), "b".to_string()]);
        assert!(stream.contains(&"b".to_string()));
        assert!(!stream.contains(&"c".to_string()));
    }

    #[rstest]
    #[case(Stream::of(vec![3, 4]))]
    #[case(Stream::from_deque(VecDeque::from(vec![3, 4])))]
    #[case(Stream::cons(3, Stream::once(4)))]
    #[case(Stream::cons_deferred(Thunk::new(|| 3), Stream::once(4)))]
    #[case(Stream::from_iterable(vec![3, 4]))]
    #[case(Stream::from_iter_once(vec![3, 4]))]
    fn test_head_and_last(#[case] stream: Stream<i32>) {
        assert_eq!(stream.head(), Ok(3));
        if stream.is_repeatable() {
            assert_eq!(stream.last(), Ok(4));
        }
    }

    #[rstest]
    fn test_head_and_last_of_empty() {
        let stream: Stream<i32> = Stream::from_iterable(Vec::new());
        assert_eq!(stream.head(), Err(StreamError::empty_source("head")));
        assert_eq!(stream.last(), Err(StreamError::empty_source("last")));
        assert_eq!(Stream::<i32>::of(vec![]).last(), Err(StreamError::empty_source("last")));
    }

    #[rstest]
    fn test_get() {
        let stream = Stream::of(vec![10, 20, 30]);
        assert_eq!(stream.get(0), Some(10));
        assert_eq!(stream.get(2), Some(30));
        assert_eq!(stream.get(3), None);
        assert_eq!(stream.map(|value| value + 1).get(1), Some(21));
    }

    #[rstest]
    fn test_decons_of_cons_returns_original_tail() {
        let tail = Stream::of(vec![2, 3]);
        let (head, rest) = Stream::cons(1, tail.clone()).decons().unwrap();
        assert_eq!(head, 1);
        assert!(std::sync::Arc::ptr_eq(&rest.source, &tail.source));
        assert_eq!(rest.to_vec(), tail.to_vec());
    }

    #[rstest]
    fn test_decons_of_single_pass_continues_same_cursor() {
        let stream = Stream::from_iter_once(vec![1, 2, 3]);
        let (head, rest) = stream.decons().unwrap();
        assert_eq!(head, 1);
        assert!(!rest.is_repeatable());
        assert_eq!(rest.to_vec(), vec![2, 3]);
        assert!(matches!(stream.decons(), Err(StreamError::AlreadyConsumed(_))));
    }

    #[rstest]
    #[case(Stream::empty())]
    #[case(Stream::of(vec![]))]
    #[case(Stream::of(vec![1]).filter(|_| false))]
    #[case(Stream::from_iter_once(Vec::new()))]
    fn test_decons_of_empty(#[case] stream: Stream<i32>) {
        assert_eq!(
            stream.decons().map(|(head, _)| head),
            Err(StreamError::empty_source("decons"))
        );
    }

    #[rstest]
    fn test_find_first_and_find() {
        let stream = Stream::iterate(1, |value| value * 2);
        assert_eq!(stream.find_first(|value| *value > 100), Ok(128));
        let finite = Stream::of(vec![1, 2, 3]);
        assert_eq!(
            finite.find_first(|value| *value > 3),
            Err(StreamError::no_such_element("find_first"))
        );
        assert_eq!(finite.find(|value| *value > 1), Some(2));
    }

    #[rstest]
    fn test_any_and_all_stop_early() {
        let naturals = Stream::iterate(0, |value| value + 1);
        assert!(naturals.any(|value| *value == 10));
        assert!(!naturals.all(|value| *value < 10));
    }

    #[rstest]
    fn test_fold_and_for_each() {
        let stream = Stream::of(vec![1, 2, 3]);
        assert_eq!(stream.fold(0, |total, value| total + value), 6);

        let mut seen = Vec::new();
        stream.for_each(|value| seen.push(value));
        assert_eq!(seen, vec![1, 2, 3]);
    }

    #[rstest]
    fn test_try_to_vec_reports_broken_cursor() {
        let stream = Stream::from_cursor_once(Broken);
        assert_eq!(
            stream.try_to_vec(),
            Err(StreamError::Cursor(CursorError::exhausted("Broken")))
        );
        assert!(matches!(
            stream.try_to_vec(),
            Err(StreamError::AlreadyConsumed(_))
        ));
    }

    #[rstest]
    fn test_find_first_reports_consumed_stream() {
        let stream = Stream::from_cursor_once(cursor::from_slice(vec![1]));
        assert_eq!(stream.find_first(|_| true), Ok(1));
        assert!(matches!(
            stream.find_first(|_| true),
            Err(StreamError::AlreadyConsumed(_))
        ));
    }

    #[cfg(feature = "reduction")]
    #[rstest]
    fn test_reduce_uses_fresh_accumulator() {
        use crate::reduction;

        let stream = Stream::of(vec![2, 9, 6, 8, 10, 2]);
        let sum = reduction::sum();
        assert_eq!(stream.reduce(&sum), 37);
        assert_eq!(stream.reduce(&sum), 37);
        assert_eq!(stream.reduce(&reduction::append()), vec![2, 9, 6, 8, 10, 2]);
    }
}
