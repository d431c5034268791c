//! The asynchronous cursor protocol
//!
//! A [`Cursor`] is the asynchronous counterpart of [`Iterator`]: a
//! single-pass, stateful handle whose pulls may suspend. Synchronous cursors
//! are plain iterators and need nothing from this module.

use futures_core::{ready, Stream};
use std::future::Future;
use std::pin::Pin;
use std::task::{Context, Poll};

use crate::error::SeqResult;

/// Single-pass asynchronous cursor.
///
/// `poll_pull` resolves to `Ok(Some(item))` for the next element, `Ok(None)`
/// once the cursor is done, or `Err(_)` when producing the element failed.
/// A cursor that reported done, or that was asked to terminate, must keep
/// answering `Ok(None)`.
pub trait Cursor {
    type Item;

    fn poll_pull(&mut self, cx: &mut Context<'_>) -> Poll<SeqResult<Option<Self::Item>>>;

    /// Stop producing and release whatever the cursor holds.
    ///
    /// Cursors with nothing to release keep this no-op default, so callers
    /// may terminate any cursor unconditionally. Repeated calls are no-ops.
    fn terminate(&mut self) {}
}

impl<C: Cursor + ?Sized> Cursor for Box<C> {
    type Item = C::Item;

    fn poll_pull(&mut self, cx: &mut Context<'_>) -> Poll<SeqResult<Option<Self::Item>>> {
        (**self).poll_pull(cx)
    }

    fn terminate(&mut self) {
        (**self).terminate()
    }
}

/// Request that `cursor` stop producing.
///
/// Succeeds for every cursor: those that cannot be terminated ignore it.
pub fn terminate<C: Cursor + ?Sized>(cursor: &mut C) {
    cursor.terminate();
}

/// Extension methods available on every cursor
pub trait CursorExt: Cursor {
    /// Pull the next element
    fn pull(&mut self) -> PullNext<'_, Self> {
        PullNext { cursor: self }
    }

    /// Adapt this cursor into a [`futures_core::Stream`] of results.
    ///
    /// Dropping the stream before it finished terminates the cursor.
    fn into_stream(self) -> IntoStream<Self>
    where
        Self: Sized,
    {
        IntoStream { cursor: self, done: false }
    }
}

impl<C: Cursor + ?Sized> CursorExt for C {}

#[must_use = "futures do nothing unless you `.await` or poll them"]
pub struct PullNext<'a, C: ?Sized> {
    cursor: &'a mut C,
}

impl<C: Cursor + ?Sized> Future for PullNext<'_, C> {
    type Output = SeqResult<Option<C::Item>>;

    fn poll(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        self.get_mut().cursor.poll_pull(cx)
    }
}

#[must_use = "streams do nothing unless polled"]
pub struct IntoStream<C: Cursor> {
    cursor: C,
    done: bool,
}

// The cursor is only ever reached through `&mut`, never pinned.
impl<C: Cursor> Unpin for IntoStream<C> {}

impl<C: Cursor> Stream for IntoStream<C> {
    type Item = SeqResult<C::Item>;

    fn poll_next(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        let this = self.get_mut();
        if this.done {
            return Poll::Ready(None);
        }
        match ready!(this.cursor.poll_pull(cx)) {
            Ok(Some(item)) => Poll::Ready(Some(Ok(item))),
            Ok(None) => {
                this.done = true;
                Poll::Ready(None)
            }
            Err(err) => {
                this.done = true;
                Poll::Ready(Some(Err(err)))
            }
        }
    }
}

impl<C: Cursor> Drop for IntoStream<C> {
    fn drop(&mut self) {
        if !self.done {
            self.cursor.terminate();
        }
    }
}

/// Asynchronous view of a synchronous iterator; every pull completes at once.
///
/// Terminating it drops the iterator.
pub struct IterCursor<I> {
    iter: Option<I>,
}

impl<I> IterCursor<I> {
    pub fn new(iter: I) -> Self {
        Self { iter: Some(iter) }
    }
}

impl<I: Iterator> Cursor for IterCursor<I> {
    type Item = I::Item;

    fn poll_pull(&mut self, _cx: &mut Context<'_>) -> Poll<SeqResult<Option<Self::Item>>> {
        let next = self.iter.as_mut().and_then(Iterator::next);
        if next.is_none() {
            self.iter = None;
        }
        Poll::Ready(Ok(next))
    }

    fn terminate(&mut self) {
        self.iter = None;
    }
}
