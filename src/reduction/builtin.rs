//! Built-in reductions.

use std::collections::HashSet;
use std::fmt;
use std::hash::Hash;
use std::marker::PhantomData;
use std::ops::{Add, Mul};
use std::sync::Arc;

use super::{Accumulator, Reduction};

// =============================================================================
// Sum / Product
// =============================================================================

/// Adds every element to `T::default()`. See [`sum`].
#[derive(Debug, Clone, Copy, Default)]
pub struct Sum<T> {
    marker: PhantomData<fn(T) -> T>,
}

/// The accumulator of [`Sum`].
#[derive(Debug, Clone)]
pub struct SumAccumulator<T> {
    total: T,
}

impl<T> Reduction for Sum<T>
where
    T: Default + Add<Output = T> + Clone,
{
    type Input = T;
    type Output = T;
    type Accumulator = SumAccumulator<T>;

    fn new_accumulator(&self) -> SumAccumulator<T> {
        SumAccumulator {
            total: T::default(),
        }
    }
}

impl<T> Accumulator for SumAccumulator<T>
where
    T: Default + Add<Output = T> + Clone,
{
    type Input = T;
    type Output = T;

    fn accumulate(&mut self, element: T) {
        self.total = std::mem::take(&mut self.total) + element;
    }

    fn value(&self) -> T {
        self.total.clone()
    }
}

/// Returns a reduction adding every element, starting from zero.
///
/// # Examples
///
/// ```rust
/// use fstream::reduction::{self, Reduction};
///
/// assert_eq!(reduction::sum().reduce_iter(vec![2, 9, 6, 8, 10, 2]), 37);
/// assert_eq!(reduction::sum::<f64>().reduce_iter(Vec::new()), 0.0);
/// ```
#[must_use]
pub const fn sum<T>() -> Sum<T> {
    Sum {
        marker: PhantomData,
    }
}

/// Multiplies every element into one. See [`product`].
#[derive(Debug, Clone, Copy, Default)]
pub struct Product<T> {
    marker: PhantomData<fn(T) -> T>,
}

/// The accumulator of [`Product`].
#[derive(Debug, Clone)]
pub struct ProductAccumulator<T> {
    product: T,
}

impl<T> Reduction for Product<T>
where
    T: Mul<Output = T> + From<u8> + Clone,
{
    type Input = T;
    type Output = T;
    type Accumulator = ProductAccumulator<T>;

    fn new_accumulator(&self) -> ProductAccumulator<T> {
        ProductAccumulator {
            product: T::from(1),
        }
    }
}

impl<T> Accumulator for ProductAccumulator<T>
where
    T: Mul<Output = T> + From<u8> + Clone,
{
    type Input = T;
    type Output = T;

    fn accumulate(&mut self, element: T) {
        let product = std::mem::replace(&mut self.product, T::from(1));
        self.product = product * element;
    }

    fn value(&self) -> T {
        self.product.clone()
    }
}

/// Returns a reduction multiplying every element, starting from one.
///
/// # Examples
///
/// ```rust
/// use fstream::reduction::{self, Reduction};
///
/// assert_eq!(reduction::product().reduce_iter(1..=5_u64), 120);
/// assert_eq!(reduction::product::<i32>().reduce_iter(Vec::new()), 1);
/// ```
#[must_use]
pub const fn product<T>() -> Product<T> {
    Product {
        marker: PhantomData,
    }
}

// =============================================================================
// Count
// =============================================================================

/// Counts the elements. See [`count`].
#[derive(Debug, Clone, Copy, Default)]
pub struct Count<T> {
    marker: PhantomData<fn(T)>,
}

/// The accumulator of [`Count`].
#[derive(Debug, Clone)]
pub struct CountAccumulator<T> {
    count: usize,
    marker: PhantomData<fn(T)>,
}

impl<T> Reduction for Count<T> {
    type Input = T;
    type Output = usize;
    type Accumulator = CountAccumulator<T>;

    fn new_accumulator(&self) -> CountAccumulator<T> {
        CountAccumulator {
            count: 0,
            marker: PhantomData,
        }
    }
}

impl<T> Accumulator for CountAccumulator<T> {
    type Input = T;
    type Output = usize;

    fn accumulate(&mut self, _element: T) {
        self.count += 1;
    }

    fn value(&self) -> usize {
        self.count
    }
}

/// Returns a reduction counting the elements.
#[must_use]
pub const fn count<T>() -> Count<T> {
    Count {
        marker: PhantomData,
    }
}

// =============================================================================
// Append / ToSet
// =============================================================================

/// Collects the elements into a vector, in order. See [`append`].
#[derive(Debug, Clone, Copy, Default)]
pub struct Append<T> {
    marker: PhantomData<fn(T) -> T>,
}

/// The accumulator of [`Append`].
#[derive(Debug, Clone)]
pub struct AppendAccumulator<T> {
    elements: Vec<T>,
}

impl<T: Clone> Reduction for Append<T> {
    type Input = T;
    type Output = Vec<T>;
    type Accumulator = AppendAccumulator<T>;

    fn new_accumulator(&self) -> AppendAccumulator<T> {
        AppendAccumulator {
            elements: Vec::new(),
        }
    }
}

impl<T: Clone> Accumulator for AppendAccumulator<T> {
    type Input = T;
    type Output = Vec<T>;

    fn accumulate(&mut self, element: T) {
        self.elements.push(element);
    }

    fn value(&self) -> Vec<T> {
        self.elements.clone()
    }
}

/// Returns a reduction collecting every element into a `Vec`, preserving
/// encounter order.
///
/// # Examples
///
/// ```rust
/// use fstream::reduction::{self, Reduction};
///
/// assert_eq!(reduction::append().reduce_iter("cba".chars()), vec!['c', 'b', 'a']);
/// ```
#[must_use]
pub const fn append<T>() -> Append<T> {
    Append {
        marker: PhantomData,
    }
}

/// Collects the distinct elements into a set. See [`to_set`].
#[derive(Debug, Clone, Copy, Default)]
pub struct ToSet<T> {
    marker: PhantomData<fn(T) -> T>,
}

/// The accumulator of [`ToSet`].
#[derive(Debug, Clone)]
pub struct ToSetAccumulator<T> {
    elements: HashSet<T>,
}

impl<T: Eq + Hash + Clone> Reduction for ToSet<T> {
    type Input = T;
    type Output = HashSet<T>;
    type Accumulator = ToSetAccumulator<T>;

    fn new_accumulator(&self) -> ToSetAccumulator<T> {
        ToSetAccumulator {
            elements: HashSet::new(),
        }
    }
}

impl<T: Eq + Hash + Clone> Accumulator for ToSetAccumulator<T> {
    type Input = T;
    type Output = HashSet<T>;

    fn accumulate(&mut self, element: T) {
        self.elements.insert(element);
    }

    fn value(&self) -> HashSet<T> {
        self.elements.clone()
    }
}

/// Returns a reduction collecting the distinct elements into a `HashSet`.
#[must_use]
pub const fn to_set<T>() -> ToSet<T> {
    ToSet {
        marker: PhantomData,
    }
}

// =============================================================================
// Max / Min
// =============================================================================

/// Keeps the greatest element. See [`max`].
#[derive(Debug, Clone, Copy, Default)]
pub struct Max<T> {
    marker: PhantomData<fn(T) -> T>,
}

/// The accumulator of [`Max`].
#[derive(Debug, Clone)]
pub struct MaxAccumulator<T> {
    greatest: Option<T>,
}

impl<T: Ord + Clone> Reduction for Max<T> {
    type Input = T;
    type Output = Option<T>;
    type Accumulator = MaxAccumulator<T>;

    fn new_accumulator(&self) -> MaxAccumulator<T> {
        MaxAccumulator { greatest: None }
    }
}

impl<T: Ord + Clone> Accumulator for MaxAccumulator<T> {
    type Input = T;
    type Output = Option<T>;

    fn accumulate(&mut self, element: T) {
        match &self.greatest {
            Some(greatest) if element < *greatest => {}
            _ => self.greatest = Some(element),
        }
    }

    fn value(&self) -> Option<T> {
        self.greatest.clone()
    }
}

/// Returns a reduction keeping the greatest element, or `None` when there
/// is none.
///
/// Among equal greatest elements the last one wins, as with
/// [`Iterator::max`].
#[must_use]
pub const fn max<T>() -> Max<T> {
    Max {
        marker: PhantomData,
    }
}

/// Keeps the least element. See [`min`].
#[derive(Debug, Clone, Copy, Default)]
pub struct Min<T> {
    marker: PhantomData<fn(T) -> T>,
}

/// The accumulator of [`Min`].
#[derive(Debug, Clone)]
pub struct MinAccumulator<T> {
    least: Option<T>,
}

impl<T: Ord + Clone> Reduction for Min<T> {
    type Input = T;
    type Output = Option<T>;
    type Accumulator = MinAccumulator<T>;

    fn new_accumulator(&self) -> MinAccumulator<T> {
        MinAccumulator { least: None }
    }
}

impl<T: Ord + Clone> Accumulator for MinAccumulator<T> {
    type Input = T;
    type Output = Option<T>;

    fn accumulate(&mut self, element: T) {
        match &self.least {
            Some(least) if element >= *least => {}
            _ => self.least = Some(element),
        }
    }

    fn value(&self) -> Option<T> {
        self.least.clone()
    }
}

/// Returns a reduction keeping the least element, or `None` when there is
/// none.
///
/// Among equal least elements the first one wins, as with
/// [`Iterator::min`].
#[must_use]
pub const fn min<T>() -> Min<T> {
    Min {
        marker: PhantomData,
    }
}

// =============================================================================
// First / Last
// =============================================================================

/// Keeps the first element. See [`first`].
#[derive(Debug, Clone, Copy, Default)]
pub struct First<T> {
    marker: PhantomData<fn(T) -> T>,
}

/// The accumulator of [`First`].
#[derive(Debug, Clone)]
pub struct FirstAccumulator<T> {
    first: Option<T>,
}

impl<T: Clone> Reduction for First<T> {
    type Input = T;
    type Output = Option<T>;
    type Accumulator = FirstAccumulator<T>;

    fn new_accumulator(&self) -> FirstAccumulator<T> {
        FirstAccumulator { first: None }
    }
}

impl<T: Clone> Accumulator for FirstAccumulator<T> {
    type Input = T;
    type Output = Option<T>;

    fn accumulate(&mut self, element: T) {
        if self.first.is_none() {
            self.first = Some(element);
        }
    }

    fn value(&self) -> Option<T> {
        self.first.clone()
    }
}

/// Returns a reduction keeping the first element.
#[must_use]
pub const fn first<T>() -> First<T> {
    First {
        marker: PhantomData,
    }
}

/// Keeps the last element. See [`last`].
#[derive(Debug, Clone, Copy, Default)]
pub struct Last<T> {
    marker: PhantomData<fn(T) -> T>,
}

/// The accumulator of [`Last`].
#[derive(Debug, Clone)]
pub struct LastAccumulator<T> {
    last: Option<T>,
}

impl<T: Clone> Reduction for Last<T> {
    type Input = T;
    type Output = Option<T>;
    type Accumulator = LastAccumulator<T>;

    fn new_accumulator(&self) -> LastAccumulator<T> {
        LastAccumulator { last: None }
    }
}

impl<T: Clone> Accumulator for LastAccumulator<T> {
    type Input = T;
    type Output = Option<T>;

    fn accumulate(&mut self, element: T) {
        self.last = Some(element);
    }

    fn value(&self) -> Option<T> {
        self.last.clone()
    }
}

/// Returns a reduction keeping the last element.
#[must_use]
pub const fn last<T>() -> Last<T> {
    Last {
        marker: PhantomData,
    }
}

// =============================================================================
// Joining
// =============================================================================

/// Concatenates strings with a separator. See [`joining`].
#[derive(Debug, Clone)]
pub struct Joining<T> {
    separator: Arc<str>,
    marker: PhantomData<fn(T)>,
}

/// The accumulator of [`Joining`].
#[derive(Debug, Clone)]
pub struct JoiningAccumulator<T> {
    separator: Arc<str>,
    text: String,
    started: bool,
    marker: PhantomData<fn(T)>,
}

impl<T: AsRef<str>> Reduction for Joining<T> {
    type Input = T;
    type Output = String;
    type Accumulator = JoiningAccumulator<T>;

    fn new_accumulator(&self) -> JoiningAccumulator<T> {
        JoiningAccumulator {
            separator: Arc::clone(&self.separator),
            text: String::new(),
            started: false,
            marker: PhantomData,
        }
    }
}

impl<T: AsRef<str>> Accumulator for JoiningAccumulator<T> {
    type Input = T;
    type Output = String;

    fn accumulate(&mut self, element: T) {
        if self.started {
            self.text.push_str(&self.separator);
        }
        self.text.push_str(element.as_ref());
        self.started = true;
    }

    fn value(&self) -> String {
        self.text.clone()
    }
}

/// Returns a reduction joining string elements with `separator`.
///
/// # Examples
///
/// ```rust
/// use fstream::reduction::{self, Reduction};
///
/// let csv = reduction::joining(", ");
/// assert_eq!(csv.reduce_iter(["a", "b", "c"]), "a, b, c");
/// assert_eq!(csv.reduce_iter(Vec::<&str>::new()), "");
/// ```
#[must_use]
pub fn joining<T>(separator: &str) -> Joining<T> {
    Joining {
        separator: Arc::from(separator),
        marker: PhantomData,
    }
}

// =============================================================================
// Fold
// =============================================================================

/// A generic left fold. See [`fold`].
pub struct Fold<T, B, F> {
    initial: B,
    function: Arc<F>,
    marker: PhantomData<fn(T)>,
}

impl<T, B: Clone, F> Clone for Fold<T, B, F> {
    fn clone(&self) -> Self {
        Self {
            initial: self.initial.clone(),
            function: Arc::clone(&self.function),
            marker: PhantomData,
        }
    }
}

impl<T, B: fmt::Debug, F> fmt::Debug for Fold<T, B, F> {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter
            .debug_struct("Fold")
            .field("initial", &self.initial)
            .finish_non_exhaustive()
    }
}

/// The accumulator of [`Fold`].
pub struct FoldAccumulator<T, B, F> {
    state: Option<B>,
    function: Arc<F>,
    marker: PhantomData<fn(T)>,
}

impl<T, B, F> Reduction for Fold<T, B, F>
where
    B: Clone + Send + Sync,
    F: Fn(B, T) -> B + Send + Sync,
{
    type Input = T;
    type Output = B;
    type Accumulator = FoldAccumulator<T, B, F>;

    fn new_accumulator(&self) -> Self::Accumulator {
        FoldAccumulator {
            state: Some(self.initial.clone()),
            function: Arc::clone(&self.function),
            marker: PhantomData,
        }
    }
}

impl<T, B, F> Accumulator for FoldAccumulator<T, B, F>
where
    B: Clone,
    F: Fn(B, T) -> B,
{
    type Input = T;
    type Output = B;

    fn accumulate(&mut self, element: T) {
        self.state = self
            .state
            .take()
            .map(|state| (self.function)(state, element));
    }

    fn value(&self) -> B {
        match &self.state {
            Some(state) => state.clone(),
            None => unreachable!("fold state is vacated only while the function runs"),
        }
    }
}

/// Returns a reduction folding every element into `initial` with
/// `function`, left to right.
///
/// # Examples
///
/// ```rust
/// use fstream::reduction::{self, Reduction};
///
/// let digits = reduction::fold(0_u64, |number, digit: u64| number * 10 + digit);
/// assert_eq!(digits.reduce_iter(vec![4, 0, 2]), 402);
/// ```
pub fn fold<T, B, F>(initial: B, function: F) -> Fold<T, B, F>
where
    B: Clone + Send + Sync,
    F: Fn(B, T) -> B + Send + Sync,
{
    Fold {
        initial,
        function: Arc::new(function),
        marker: PhantomData,
    }
}
