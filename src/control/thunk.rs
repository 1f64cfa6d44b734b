//! Deferred values with at-most-once evaluation.
//!
//! This module provides [`Thunk<T>`], the deferred-element handle used by
//! cursors and cons streams. A thunk holds an initializer until it is
//! first forced; the result is memoized and shared by every clone of the
//! thunk.
//!
//! # Examples
//!
//! ```rust
//! use fstream::control::Thunk;
//!
//! let thunk = Thunk::new(|| {
//!     println!("Computing...");
//!     42
//! });
//!
//! // No output yet - computation is deferred
//! assert!(!thunk.is_forced());
//!
//! // Now "Computing..." is printed
//! assert_eq!(*thunk.force(), 42);
//!
//! // No recomputation - result is memoized
//! assert_eq!(*thunk.force(), 42);
//! ```

use std::fmt;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, OnceLock};

use parking_lot::Mutex;

type Initializer<T> = Box<dyn FnOnce() -> T + Send>;

struct ThunkCell<T> {
    value: OnceLock<T>,
    initializer: Mutex<Option<Initializer<T>>>,
    poisoned: AtomicBool,
}

/// Marks the cell poisoned unless disarmed after the initializer returns.
struct PoisonOnUnwind<'a>(&'a AtomicBool);

impl PoisonOnUnwind<'_> {
    fn disarm(self) {
        std::mem::forget(self);
    }
}

impl Drop for PoisonOnUnwind<'_> {
    fn drop(&mut self) {
        self.0.store(true, Ordering::Release);
    }
}

/// A deferred value, evaluated at most once and shared between clones.
///
/// `Thunk<T>` defers computation until the value is first accessed via
/// [`force`](Thunk::force). Once computed, the value is cached, and every
/// clone of the thunk observes the same cached value without recomputation.
///
/// # Thread Safety
///
/// `Thunk<T>` is `Send + Sync` when `T: Send + Sync`. If several threads
/// force the same thunk concurrently, exactly one runs the initializer and
/// the others block until it finishes.
///
/// # Poisoning
///
/// If the initializer panics, the thunk becomes poisoned and every later
/// call to `force` panics as well.
///
/// # Examples
///
/// ```rust
/// use fstream::control::Thunk;
/// use std::sync::Arc;
/// use std::sync::atomic::{AtomicUsize, Ordering};
///
/// let calls = Arc::new(AtomicUsize::new(0));
/// let counter = Arc::clone(&calls);
/// let thunk = Thunk::new(move || {
///     counter.fetch_add(1, Ordering::SeqCst);
///     "value".to_string()
/// });
/// let shared = thunk.clone();
///
/// assert_eq!(thunk.force(), "value");
/// assert_eq!(shared.force(), "value");
/// assert_eq!(calls.load(Ordering::SeqCst), 1);
/// ```
pub struct Thunk<T> {
    cell: Arc<ThunkCell<T>>,
}

impl<T> Thunk<T> {
    /// Creates a thunk that runs `initializer` on first `force()`.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use fstream::control::Thunk;
    ///
    /// let thunk = Thunk::new(|| 6 * 7);
    /// assert!(!thunk.is_forced());
    /// ```
    pub fn new<F>(initializer: F) -> Self
    where
        F: FnOnce() -> T + Send + 'static,
    {
        Self {
            cell: Arc::new(ThunkCell {
                value: OnceLock::new(),
                initializer: Mutex::new(Some(Box::new(initializer))),
                poisoned: AtomicBool::new(false),
            }),
        }
    }

    /// Creates a thunk that is already forced.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use fstream::control::Thunk;
    ///
    /// let thunk = Thunk::ready(42);
    /// assert!(thunk.is_forced());
    /// ```
    pub fn ready(value: T) -> Self {
        Self {
            cell: Arc::new(ThunkCell {
                value: OnceLock::from(value),
                initializer: Mutex::new(None),
                poisoned: AtomicBool::new(false),
            }),
        }
    }

    /// Forces evaluation and returns a reference to the value.
    ///
    /// # Panics
    ///
    /// Panics if the initializer panics (now or during an earlier force).
    ///
    /// # Examples
    ///
    /// ```rust
    /// use fstream::control::Thunk;
    ///
    /// let thunk = Thunk::new(|| vec![1, 2, 3]);
    /// assert_eq!(thunk.force().len(), 3);
    /// ```
    pub fn force(&self) -> &T {
        self.cell.value.get_or_init(|| {
            let Some(initializer) = self.cell.initializer.lock().take() else {
                panic!("Thunk instance has been poisoned");
            };
            let guard = PoisonOnUnwind(&self.cell.poisoned);
            let value = initializer();
            guard.disarm();
            value
        })
    }

    /// Returns the value if it has already been forced.
    ///
    /// Unlike `force()`, this never triggers evaluation.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use fstream::control::Thunk;
    ///
    /// let thunk = Thunk::new(|| 42);
    /// assert!(thunk.get().is_none());
    /// thunk.force();
    /// assert_eq!(thunk.get(), Some(&42));
    /// ```
    pub fn get(&self) -> Option<&T> {
        self.cell.value.get()
    }

    /// Returns whether the value has been computed.
    #[inline]
    pub fn is_forced(&self) -> bool {
        self.cell.value.get().is_some()
    }

    /// Returns whether a previous force panicked.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use fstream::control::Thunk;
    /// use std::panic::{AssertUnwindSafe, catch_unwind};
    ///
    /// let thunk: Thunk<i32> = Thunk::new(|| panic!("initialization failed"));
    /// let _ = catch_unwind(AssertUnwindSafe(|| *thunk.force()));
    /// assert!(thunk.is_poisoned());
    /// ```
    pub fn is_poisoned(&self) -> bool {
        self.cell.poisoned.load(Ordering::Acquire)
    }
}

impl<T: Send + Sync + 'static> Thunk<T> {
    /// Returns a new thunk that applies `function` to this thunk's value.
    ///
    /// Neither thunk is forced until the returned one is.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use fstream::control::Thunk;
    ///
    /// let thunk = Thunk::new(|| 21);
    /// let doubled = thunk.map(|value| value * 2);
    ///
    /// assert!(!thunk.is_forced());
    /// assert_eq!(*doubled.force(), 42);
    /// assert!(thunk.is_forced());
    /// ```
    pub fn map<U, F>(&self, function: F) -> Thunk<U>
    where
        F: FnOnce(&T) -> U + Send + 'static,
    {
        let source = self.clone();
        Thunk::new(move || function(source.force()))
    }
}

impl<T: Clone> Thunk<T> {
    /// Forces the thunk and returns an owned value.
    ///
    /// The value is moved out when this is the last handle to it and cloned
    /// otherwise.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use fstream::control::Thunk;
    ///
    /// let thunk = Thunk::new(|| "hello".to_string());
    /// assert_eq!(thunk.into_inner(), "hello");
    /// ```
    pub fn into_inner(self) -> T {
        self.force();
        match Arc::try_unwrap(self.cell) {
            Ok(cell) => match cell.value.into_inner() {
                Some(value) => value,
                None => unreachable!("forced thunk holds a value"),
            },
            Err(cell) => match cell.value.get() {
                Some(value) => value.clone(),
                None => unreachable!("forced thunk holds a value"),
            },
        }
    }
}

impl<T> Clone for Thunk<T> {
    fn clone(&self) -> Self {
        Self {
            cell: Arc::clone(&self.cell),
        }
    }
}

impl<T> From<T> for Thunk<T> {
    fn from(value: T) -> Self {
        Self::ready(value)
    }
}

impl<T: fmt::Debug> fmt::Debug for Thunk<T> {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.cell.value.get() {
            Some(value) => formatter.debug_tuple("Thunk").field(value).finish(),
            None if self.is_poisoned() => {
                formatter.debug_tuple("Thunk").field(&"<poisoned>").finish()
            }
            None => formatter.debug_tuple("Thunk").field(&"<unforced>").finish(),
        }
    }
}
