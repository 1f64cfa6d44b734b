//! Reductions: reusable recipes that fold a sequence into a single value.
//!
//! A [`Reduction`] is a stateless description. Each use asks it for a fresh
//! [`Accumulator`], feeds the accumulator every element in order, and reads
//! the result with [`Accumulator::value`].
//!
//! Reductions compose:
//!
//! - [`Reduction::then`] post-processes the final value.
//! - [`Reduction::of`] pre-processes every input element.
//!
//! # Laws
//!
//! For every reduction `r`, functions `f` and `g`, and elements `xs`:
//!
//! ## Then
//!
//! ```text
//! r.then(f).reduce_iter(xs) == f(r.reduce_iter(xs))
//! ```
//!
//! ## Of
//!
//! ```text
//! r.of(g).reduce_iter(xs) == r.reduce_iter(xs.map(g))
//! ```
//!
//! # Examples
//!
//! ```rust
//! use fstream::reduction::{self, Reduction};
//!
//! let total_length = reduction::sum().of(|word: String| word.len());
//! let words = vec!["lazy".to_string(), "streams".to_string()];
//! assert_eq!(total_length.reduce_iter(words), 11);
//!
//! let label = reduction::count().then(|count| format!("{count} items"));
//! assert_eq!(label.reduce_iter(vec![1, 2, 3]), "3 items");
//! ```

mod builtin;

pub use builtin::{
    Append, AppendAccumulator, Count, CountAccumulator, First, FirstAccumulator, Fold,
    FoldAccumulator, Joining, JoiningAccumulator, Last, LastAccumulator, Max, MaxAccumulator,
    Min, MinAccumulator, Product, ProductAccumulator, Sum, SumAccumulator, ToSet,
    ToSetAccumulator, append, count, first, fold, joining, last, max, min, product, sum, to_set,
};

use std::fmt;
use std::marker::PhantomData;
use std::sync::Arc;

/// Mutable state of one reduction in progress.
pub trait Accumulator {
    /// The type of the elements consumed.
    type Input;
    /// The type of the result.
    type Output;

    /// Incorporates `element`.
    fn accumulate(&mut self, element: Self::Input);

    /// Returns the result for the elements accumulated so far.
    ///
    /// Reading does not change the state: it may be called repeatedly, and
    /// later calls reflect any further accumulation.
    fn value(&self) -> Self::Output;
}

/// A stateless, shareable recipe for reducing a sequence to one value.
///
/// # Examples
///
/// ```rust
/// use fstream::reduction::{self, Accumulator, Reduction};
///
/// let sum = reduction::sum::<i64>();
/// let mut accumulator = sum.new_accumulator();
/// accumulator.accumulate(40);
/// accumulator.accumulate(2);
/// assert_eq!(accumulator.value(), 42);
/// ```
pub trait Reduction: Send + Sync {
    /// The type of the elements consumed.
    type Input;
    /// The type of the result.
    type Output;
    /// The state of one reduction in progress.
    type Accumulator: Accumulator<Input = Self::Input, Output = Self::Output>;

    /// Returns a fresh accumulator, independent of every other one.
    fn new_accumulator(&self) -> Self::Accumulator;

    /// Reduces every element of `elements` with a fresh accumulator.
    fn reduce_iter<I>(&self, elements: I) -> Self::Output
    where
        I: IntoIterator<Item = Self::Input>,
    {
        let mut accumulator = self.new_accumulator();
        for element in elements {
            accumulator.accumulate(element);
        }
        accumulator.value()
    }

    /// Returns a reduction that applies `function` to this reduction's
    /// result.
    fn then<V, F>(self, function: F) -> Then<Self, F, V>
    where
        Self: Sized,
        F: Fn(Self::Output) -> V + Send + Sync,
    {
        Then {
            reduction: self,
            function: Arc::new(function),
            marker: PhantomData,
        }
    }

    /// Returns a reduction that applies `function` to every element before
    /// this reduction sees it.
    fn of<S, F>(self, function: F) -> Of<Self, F, S>
    where
        Self: Sized,
        F: Fn(S) -> Self::Input + Send + Sync,
    {
        Of {
            reduction: self,
            function: Arc::new(function),
            marker: PhantomData,
        }
    }
}

// =============================================================================
// Then
// =============================================================================

/// A reduction whose result is post-processed. See [`Reduction::then`].
pub struct Then<R, F, V> {
    reduction: R,
    function: Arc<F>,
    marker: PhantomData<fn() -> V>,
}

impl<R: Clone, F, V> Clone for Then<R, F, V> {
    fn clone(&self) -> Self {
        Self {
            reduction: self.reduction.clone(),
            function: Arc::clone(&self.function),
            marker: PhantomData,
        }
    }
}

impl<R: fmt::Debug, F, V> fmt::Debug for Then<R, F, V> {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter
            .debug_struct("Then")
            .field("reduction", &self.reduction)
            .finish_non_exhaustive()
    }
}

impl<R, F, V> Reduction for Then<R, F, V>
where
    R: Reduction,
    F: Fn(R::Output) -> V + Send + Sync,
{
    type Input = R::Input;
    type Output = V;
    type Accumulator = ThenAccumulator<R::Accumulator, F, V>;

    fn new_accumulator(&self) -> Self::Accumulator {
        ThenAccumulator {
            inner: self.reduction.new_accumulator(),
            function: Arc::clone(&self.function),
            marker: PhantomData,
        }
    }
}

/// The accumulator of [`Then`].
pub struct ThenAccumulator<A, F, V> {
    inner: A,
    function: Arc<F>,
    marker: PhantomData<fn() -> V>,
}

impl<A, F, V> Accumulator for ThenAccumulator<A, F, V>
where
    A: Accumulator,
    F: Fn(A::Output) -> V,
{
    type Input = A::Input;
    type Output = V;

    fn accumulate(&mut self, element: A::Input) {
        self.inner.accumulate(element);
    }

    fn value(&self) -> V {
        (self.function)(self.inner.value())
    }
}

// =============================================================================
// Of
// =============================================================================

/// A reduction whose inputs are pre-processed. See [`Reduction::of`].
pub struct Of<R, F, S> {
    reduction: R,
    function: Arc<F>,
    marker: PhantomData<fn(S)>,
}

impl<R: Clone, F, S> Clone for Of<R, F, S> {
    fn clone(&self) -> Self {
        Self {
            reduction: self.reduction.clone(),
            function: Arc::clone(&self.function),
            marker: PhantomData,
        }
    }
}

impl<R: fmt::Debug, F, S> fmt::Debug for Of<R, F, S> {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter
            .debug_struct("Of")
            .field("reduction", &self.reduction)
            .finish_non_exhaustive()
    }
}

impl<R, F, S> Reduction for Of<R, F, S>
where
    R: Reduction,
    F: Fn(S) -> R::Input + Send + Sync,
{
    type Input = S;
    type Output = R::Output;
    type Accumulator = OfAccumulator<R::Accumulator, F, S>;

    fn new_accumulator(&self) -> Self::Accumulator {
        OfAccumulator {
            inner: self.reduction.new_accumulator(),
            function: Arc::clone(&self.function),
            marker: PhantomData,
        }
    }
}

/// The accumulator of [`Of`].
pub struct OfAccumulator<A, F, S> {
    inner: A,
    function: Arc<F>,
    marker: PhantomData<fn(S)>,
}

impl<A, F, S> Accumulator for OfAccumulator<A, F, S>
where
    A: Accumulator,
    F: Fn(S) -> A::Input,
{
    type Input = S;
    type Output = A::Output;

    fn accumulate(&mut self, element: S) {
        self.inner.accumulate((self.function)(element));
    }

    fn value(&self) -> A::Output {
        self.inner.value()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use std::sync::atomic::{AtomicUsize, Ordering};

    static_assertions::assert_impl_all!(Sum<i32>: Reduction, Send, Sync, Clone);

    #[rstest]
    fn test_then_post_processes_value() {
        let doubled = sum::<i32>().then(|total| total * 2);
        assert_eq!(doubled.reduce_iter(vec![1, 2, 3]), 12);
    }

    #[rstest]
    fn test_of_pre_processes_inputs() {
        let lengths = append().of(|word: String| word.len());
        assert_eq!(
            lengths.reduce_iter(vec!["ab".to_string(), "c".to_string()]),
            vec![2, 1]
        );
    }

    #[rstest]
    fn test_then_runs_only_when_value_is_read() {
        let calls = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&calls);
        let reduction = count::<i32>().then(move |count| {
            counter.fetch_add(1, Ordering::SeqCst);
            count
        });

        let mut accumulator = reduction.new_accumulator();
        accumulator.accumulate(1);
        accumulator.accumulate(2);
        assert_eq!(calls.load(Ordering::SeqCst), 0);
        assert_eq!(accumulator.value(), 2);
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[rstest]
    fn test_value_is_idempotent_and_tracks_accumulation() {
        let reduction = sum::<i32>().of(|value: i32| value * 10);
        let mut accumulator = reduction.new_accumulator();
        accumulator.accumulate(1);
        assert_eq!(accumulator.value(), 10);
        assert_eq!(accumulator.value(), 10);
        accumulator.accumulate(2);
        assert_eq!(accumulator.value(), 30);
    }

    #[rstest]
    fn test_accumulators_are_independent() {
        let reduction = append::<i32>();
        let mut left = reduction.new_accumulator();
        let mut right = reduction.new_accumulator();
        left.accumulate(1);
        right.accumulate(2);
        assert_eq!(left.value(), vec![1]);
        assert_eq!(right.value(), vec![2]);
    }

    #[rstest]
    fn test_composed_reduction_is_reusable() {
        let reduction = max::<i32>().of(|value: i32| -value).then(|largest| largest.map(|value| -value));
        assert_eq!(reduction.reduce_iter(vec![3, 1, 2]), Some(1));
        assert_eq!(reduction.reduce_iter(Vec::new()), None);
        let cloned = reduction.clone();
        assert_eq!(cloned.reduce_iter(vec![5, 4]), Some(4));
    }
}
