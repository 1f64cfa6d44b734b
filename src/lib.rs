//! # fstream
//!
//! Lazy, composable element streams built on a minimal cursor protocol.
//!
//! ## Overview
//!
//! - **Control**: [`Thunk`](control::Thunk), a shared memoized deferred value
//! - **Cursors**: the `has_next` / `advance` / `current` protocol, primitive
//!   sources and lazy combinators
//! - **Streams**: immutable, repeatable (or single-pass) stream
//!   descriptions with map, filter, concat, zip, flat-map, reverse and more
//! - **Reductions**: reusable accumulation recipes (sum, count, append, ...)
//!   that compose with `then` and `of`
//!
//! ## Feature Flags
//!
//! - `control`: Deferred values
//! - `cursor`: Cursor protocol and combinators (implies `control`)
//! - `stream`: Streams (implies `cursor`)
//! - `reduction`: Reductions and accumulators
//! - `serde`: `Serialize` / `Deserialize` for streams
//! - `full`: Enable all features
//!
//! ## Example
//!
//! ```rust
//! use fstream::prelude::*;
//! use fstream::reduction;
//!
//! let scores = Stream::of(vec![2, 9, 6, 8, 10, 2]);
//! assert_eq!(scores.reduce(&reduction::sum()), 37);
//!
//! let doubled_evens = scores.filter(|score| score % 2 == 0).map(|score| score * 2);
//! assert_eq!(doubled_evens.to_vec(), vec![4, 12, 16, 20, 4]);
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]

/// Prelude module for convenient imports.
///
/// Re-exports the core types and traits of every enabled module.
///
/// # Usage
///
/// ```rust
/// use fstream::prelude::*;
/// ```
pub mod prelude {
    #[cfg(feature = "control")]
    pub use crate::control::Thunk;

    #[cfg(feature = "cursor")]
    pub use crate::cursor::{BoxCursor, Cursor, CursorError};

    #[cfg(feature = "stream")]
    pub use crate::stream::{Stream, StreamError};

    #[cfg(feature = "reduction")]
    pub use crate::reduction::{Accumulator, Reduction};
}

#[cfg(feature = "control")]
pub mod control;

#[cfg(feature = "cursor")]
pub mod cursor;

#[cfg(feature = "stream")]
pub mod stream;

#[cfg(feature = "reduction")]
pub mod reduction;
