//! Deferred computation.
//!
//! - [`Thunk`]: a shared, thread-safe, memoized deferred value
//!
//! # Examples
//!
//! ```rust
//! use fstream::control::Thunk;
//!
//! let answer = Thunk::new(|| 6 * 7);
//! let shared = answer.clone();
//! assert!(!answer.is_forced());
//!
//! assert_eq!(*shared.force(), 42);
//! // Forcing through one handle memoizes for every clone.
//! assert!(answer.is_forced());
//! ```

mod thunk;

pub use thunk::Thunk;
