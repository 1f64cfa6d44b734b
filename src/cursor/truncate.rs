//! Combinators that cut elements off the front or back of a cursor.

use super::filter::{Lookahead, pull};
use super::{Cursor, CursorError};
use crate::control::Thunk;

// =============================================================================
// DropFirst
// =============================================================================

/// Skips the first `count` elements of an upstream cursor.
///
/// The skip happens once, on the first `has_next` (or `advance`), by
/// advancing upstream up to `count` times. A shorter upstream is simply
/// drained.
///
/// # Examples
///
/// ```rust
/// use fstream::cursor::{self, Cursor};
///
/// let rest: Vec<i32> = cursor::from_slice(vec![1, 2, 3, 4])
///     .drop_first(2)
///     .into_items()
///     .collect();
/// assert_eq!(rest, vec![3, 4]);
/// ```
#[derive(Debug)]
pub struct DropFirst<C> {
    upstream: C,
    remaining: usize,
    failure: Option<CursorError>,
    started: bool,
}

impl<C: Cursor> DropFirst<C> {
    /// Wraps `upstream`.
    pub const fn new(upstream: C, count: usize) -> Self {
        Self {
            upstream,
            remaining: count,
            failure: None,
            started: false,
        }
    }

    fn skip(&mut self) {
        while self.remaining > 0 {
            if !self.upstream.has_next() {
                self.remaining = 0;
                return;
            }
            self.remaining -= 1;
            if let Err(error) = self.upstream.advance() {
                self.remaining = 0;
                self.failure = Some(error);
                return;
            }
        }
    }
}

impl<C: Cursor> Cursor for DropFirst<C> {
    type Item = C::Item;

    fn has_next(&mut self) -> bool {
        self.skip();
        self.failure.is_some() || self.upstream.has_next()
    }

    fn advance(&mut self) -> Result<(), CursorError> {
        if !self.has_next() {
            return Err(CursorError::exhausted("DropFirst"));
        }
        if let Some(error) = self.failure.take() {
            return Err(error);
        }
        self.upstream.advance()?;
        self.started = true;
        Ok(())
    }

    fn current(&mut self) -> Result<C::Item, CursorError> {
        if !self.started {
            return Err(CursorError::unstarted("DropFirst"));
        }
        self.upstream.current()
    }

    fn current_deferred(&mut self) -> Result<Thunk<C::Item>, CursorError> {
        if !self.started {
            return Err(CursorError::unstarted("DropFirst"));
        }
        self.upstream.current_deferred()
    }
}

// =============================================================================
// Take
// =============================================================================

/// Yields at most `count` elements of an upstream cursor.
///
/// Once `count` elements have been yielded, upstream is never queried
/// again.
#[derive(Debug)]
pub struct Take<C> {
    upstream: C,
    remaining: usize,
}

impl<C: Cursor> Take<C> {
    /// Wraps `upstream`.
    pub const fn new(upstream: C, count: usize) -> Self {
        Self {
            upstream,
            remaining: count,
        }
    }
}

impl<C: Cursor> Cursor for Take<C> {
    type Item = C::Item;

    fn has_next(&mut self) -> bool {
        self.remaining > 0 && self.upstream.has_next()
    }

    fn advance(&mut self) -> Result<(), CursorError> {
        if self.remaining == 0 {
            return Err(CursorError::exhausted("Take"));
        }
        self.upstream.advance()?;
        self.remaining -= 1;
        Ok(())
    }

    fn current(&mut self) -> Result<C::Item, CursorError> {
        self.upstream.current()
    }

    fn current_deferred(&mut self) -> Result<Thunk<C::Item>, CursorError> {
        self.upstream.current_deferred()
    }
}

// =============================================================================
// DropWhile
// =============================================================================

/// Skips the leading upstream elements that satisfy a predicate.
///
/// The first non-matching element is pulled during the skip and kept for
/// the first `advance`; later elements come straight from upstream.
pub struct DropWhile<C: Cursor, P> {
    upstream: C,
    predicate: Option<P>,
    lookahead: Lookahead<C::Item>,
    held: Option<C::Item>,
    on_upstream: bool,
}

impl<C, P> DropWhile<C, P>
where
    C: Cursor,
    P: FnMut(&C::Item) -> bool,
{
    /// Wraps `upstream`.
    pub const fn new(upstream: C, predicate: P) -> Self {
        Self {
            upstream,
            predicate: Some(predicate),
            lookahead: Lookahead::Empty,
            held: None,
            on_upstream: false,
        }
    }

    fn skip(&mut self) {
        let Some(mut predicate) = self.predicate.take() else {
            return;
        };
        loop {
            match pull(&mut self.upstream) {
                None => {
                    self.lookahead = Lookahead::Exhausted;
                    return;
                }
                Some(Err(error)) => {
                    self.lookahead = Lookahead::Failed(error);
                    return;
                }
                Some(Ok(element)) => {
                    if !predicate(&element) {
                        self.lookahead = Lookahead::Found(element);
                        return;
                    }
                }
            }
        }
    }
}

impl<C, P> Cursor for DropWhile<C, P>
where
    C: Cursor,
    C::Item: Clone,
    P: FnMut(&C::Item) -> bool,
{
    type Item = C::Item;

    fn has_next(&mut self) -> bool {
        self.skip();
        match self.lookahead {
            Lookahead::Found(_) | Lookahead::Failed(_) => true,
            Lookahead::Exhausted => false,
            Lookahead::Empty => self.upstream.has_next(),
        }
    }

    fn advance(&mut self) -> Result<(), CursorError> {
        if !self.has_next() {
            return Err(CursorError::exhausted("DropWhile"));
        }
        if self.lookahead.is_ready() {
            self.held = Some(self.lookahead.take("DropWhile")?);
            return Ok(());
        }
        self.upstream.advance()?;
        self.held = None;
        self.on_upstream = true;
        Ok(())
    }

    fn current(&mut self) -> Result<C::Item, CursorError> {
        match &self.held {
            Some(element) => Ok(element.clone()),
            None if self.on_upstream => self.upstream.current(),
            None => Err(CursorError::unstarted("DropWhile")),
        }
    }
}

// =============================================================================
// TakeWhile
// =============================================================================

/// Yields upstream elements until the first one failing a predicate.
///
/// The failing element is pulled from upstream (it has to be, to be
/// tested) but never yielded, and nothing after it is pulled.
pub struct TakeWhile<C: Cursor, P> {
    upstream: C,
    predicate: P,
    lookahead: Lookahead<C::Item>,
    current: Option<C::Item>,
}

impl<C, P> TakeWhile<C, P>
where
    C: Cursor,
    P: FnMut(&C::Item) -> bool,
{
    /// Wraps `upstream`.
    pub const fn new(upstream: C, predicate: P) -> Self {
        Self {
            upstream,
            predicate,
            lookahead: Lookahead::Empty,
            current: None,
        }
    }
}

impl<C, P> Cursor for TakeWhile<C, P>
where
    C: Cursor,
    C::Item: Clone,
    P: FnMut(&C::Item) -> bool,
{
    type Item = C::Item;

    fn has_next(&mut self) -> bool {
        match self.lookahead {
            Lookahead::Found(_) | Lookahead::Failed(_) => return true,
            Lookahead::Exhausted => return false,
            Lookahead::Empty => {}
        }
        match pull(&mut self.upstream) {
            None => {
                self.lookahead = Lookahead::Exhausted;
                false
            }
            Some(Err(error)) => {
                self.lookahead = Lookahead::Failed(error);
                true
            }
            Some(Ok(element)) => {
                if (self.predicate)(&element) {
                    self.lookahead = Lookahead::Found(element);
                    true
                } else {
                    self.lookahead = Lookahead::Exhausted;
                    false
                }
            }
        }
    }

    fn advance(&mut self) -> Result<(), CursorError> {
        if !self.has_next() {
            return Err(CursorError::exhausted("TakeWhile"));
        }
        self.current = Some(self.lookahead.take("TakeWhile")?);
        Ok(())
    }

    fn current(&mut self) -> Result<C::Item, CursorError> {
        self.current
            .clone()
            .ok_or(CursorError::unstarted("TakeWhile"))
    }
}
