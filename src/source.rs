//! Sequence sources: ranges, repetition, and adapters for iterators, futures
//! streams and hand-written cursors

use futures_core::{ready, Stream, TryStream};
use std::fmt::Display;
use std::pin::Pin;
use std::task::{Context, Poll};

use crate::cursor::Cursor;
use crate::error::{SeqError, SeqResult};
use crate::producer::{AsyncSeq, Producer, Seq, SeqOf, SyncSeq};

// ================================
// Synchronous sources
// ================================

/// Wrap any iterable; the result takes the synchronous path.
pub fn iter<I: IntoIterator>(items: I) -> SyncSeq<I::IntoIter> {
    Seq::Sync(items.into_iter())
}

/// Numbers a [`Steps`] progression can count in.
pub trait Stepped: Copy + PartialOrd {
    const ZERO: Self;
    const ONE: Self;

    /// `self + step`, or `None` once the sum leaves the type's range.
    fn advance(self, step: Self) -> Option<Self>;
}

macro_rules! stepped_integers {
    ($($t:ty),*) => {$(
        impl Stepped for $t {
            const ZERO: Self = 0;
            const ONE: Self = 1;

            fn advance(self, step: Self) -> Option<Self> {
                self.checked_add(step)
            }
        }
    )*};
}

macro_rules! stepped_floats {
    ($($t:ty),*) => {$(
        impl Stepped for $t {
            const ZERO: Self = 0.0;
            const ONE: Self = 1.0;

            fn advance(self, step: Self) -> Option<Self> {
                Some(self + step)
            }
        }
    )*};
}

stepped_integers!(i8, i16, i32, i64, i128, isize, u8, u16, u32, u64, u128, usize);
stepped_floats!(f32, f64);

/// Arithmetic progression from `start` towards `end`, exclusive.
///
/// A negative `step` counts down. A zero `step` never reaches `end`.
#[must_use = "iterators are lazy and do nothing unless consumed"]
#[derive(Debug, Clone)]
pub struct Steps<T> {
    next: Option<T>,
    end: T,
    step: T,
}

impl<T: Stepped> Iterator for Steps<T> {
    type Item = T;

    fn next(&mut self) -> Option<T> {
        let value = self.next?;
        let in_range = if self.step > T::ZERO {
            value < self.end
        } else {
            value > self.end
        };
        self.next = if in_range {
            value.advance(self.step)
        } else {
            None
        };
        in_range.then_some(value)
    }
}

/// `0, 1, .., end - 1`
pub fn range<T: Stepped>(end: T) -> SyncSeq<Steps<T>> {
    range_step(T::ZERO, end, T::ONE)
}

/// `start, start + 1, .., end - 1`
pub fn range_from<T: Stepped>(start: T, end: T) -> SyncSeq<Steps<T>> {
    range_step(start, end, T::ONE)
}

pub fn range_step<T: Stepped>(start: T, end: T, step: T) -> SyncSeq<Steps<T>> {
    Seq::Sync(Steps {
        next: Some(start),
        end,
        step,
    })
}

/// `value` forever
pub fn repeat<T: Clone>(value: T) -> SyncSeq<std::iter::Repeat<T>> {
    Seq::Sync(std::iter::repeat(value))
}

// ================================
// Asynchronous sources
// ================================

/// Use a hand-written cursor as a producer.
pub fn from_cursor<C: Cursor>(cursor: C) -> AsyncSeq<C::Item, C> {
    Seq::Async(cursor)
}

/// Cursor over a [`futures_core::Stream`]; terminating it drops the stream.
pub struct StreamCursor<S> {
    stream: Option<Pin<Box<S>>>,
}

impl<S: Stream> Cursor for StreamCursor<S> {
    type Item = S::Item;

    fn poll_pull(&mut self, cx: &mut Context<'_>) -> Poll<SeqResult<Option<S::Item>>> {
        let Some(stream) = self.stream.as_mut() else {
            return Poll::Ready(Ok(None));
        };
        let next = ready!(stream.as_mut().poll_next(cx));
        if next.is_none() {
            self.stream = None;
        }
        Poll::Ready(Ok(next))
    }

    fn terminate(&mut self) {
        self.stream = None;
    }
}

/// Adapt a futures stream.
pub fn from_stream<S: Stream>(stream: S) -> AsyncSeq<S::Item, StreamCursor<S>> {
    Seq::Async(StreamCursor {
        stream: Some(Box::pin(stream)),
    })
}

/// Cursor over a fallible stream; an `Err` item becomes a failed pull.
pub struct TryStreamCursor<S> {
    stream: Option<Pin<Box<S>>>,
}

impl<S> Cursor for TryStreamCursor<S>
where
    S: TryStream,
    S::Error: Display,
{
    type Item = S::Ok;

    fn poll_pull(&mut self, cx: &mut Context<'_>) -> Poll<SeqResult<Option<S::Ok>>> {
        let Some(stream) = self.stream.as_mut() else {
            return Poll::Ready(Ok(None));
        };
        match ready!(stream.as_mut().try_poll_next(cx)) {
            Some(Ok(item)) => Poll::Ready(Ok(Some(item))),
            Some(Err(err)) => {
                self.stream = None;
                Poll::Ready(Err(SeqError::upstream(err)))
            }
            None => {
                self.stream = None;
                Poll::Ready(Ok(None))
            }
        }
    }

    fn terminate(&mut self) {
        self.stream = None;
    }
}

/// Adapt a stream of results; the first `Err` fails the pull that met it and
/// ends the sequence.
pub fn from_try_stream<S>(stream: S) -> AsyncSeq<S::Ok, TryStreamCursor<S>>
where
    S: TryStream,
    S::Error: Display,
{
    Seq::Async(TryStreamCursor {
        stream: Some(Box::pin(stream)),
    })
}

/// Force `producer` onto the asynchronous path, even when it is synchronous.
pub fn as_async<P: Producer>(producer: P) -> AsyncSeq<P::Item, SeqOf<P>> {
    Seq::Async(Seq::from_producer(producer))
}

/// Cursor that suspends once before handing out each element.
pub struct Yielding<C> {
    inner: C,
    yielded: bool,
}

impl<C: Cursor> Cursor for Yielding<C> {
    type Item = C::Item;

    fn poll_pull(&mut self, cx: &mut Context<'_>) -> Poll<SeqResult<Option<C::Item>>> {
        if !self.yielded {
            self.yielded = true;
            cx.waker().wake_by_ref();
            return Poll::Pending;
        }
        let pulled = ready!(self.inner.poll_pull(cx));
        self.yielded = false;
        Poll::Ready(pulled)
    }

    fn terminate(&mut self) {
        self.inner.terminate();
    }
}

/// Give way to the executor once before every element of `producer`.
pub fn yielding<P: Producer>(producer: P) -> AsyncSeq<P::Item, Yielding<SeqOf<P>>> {
    Seq::Async(Yielding {
        inner: Seq::from_producer(producer),
        yielded: false,
    })
}
