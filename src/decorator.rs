//! The decorator kernel behind every per-element transformation
//!
//! A transformation is written once as a [`Step`] (or an [`AsyncStep`] when it
//! has to await a user future) that judges one upstream element at a time.
//! [`SyncDecorator`] drives a step over an iterator, [`AsyncDecorator`] over a
//! cursor. Both terminate their upstream when the step stops early, and never
//! pull again once the step reports it is exhausted.

use futures_core::ready;
use futures_util::future;
use std::future::Future;
use std::marker::PhantomData;
use std::pin::Pin;
use std::task::{Context, Poll};

use crate::cursor::Cursor;
use crate::error::SeqResult;
use crate::producer::{Producer, Seq, SeqOf};

/// What a step decided about one upstream element
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Verdict<T> {
    /// Yield this value downstream.
    Emit(T),
    /// Drop the element and pull the next one.
    Skip,
    /// Report done and terminate upstream.
    Stop,
}

/// Synchronous per-element state machine
pub trait Step<T> {
    type Output;

    fn step(&mut self, item: T) -> Verdict<Self::Output>;

    /// `true` once no further upstream element may be pulled.
    fn exhausted(&self) -> bool {
        false
    }
}

/// Per-element state machine whose judgement may suspend
pub trait AsyncStep<T> {
    type Output;
    type Judgement: Future<Output = Verdict<Self::Output>> + Unpin;

    fn judge(&mut self, item: T) -> Self::Judgement;

    /// Called with every verdict once its judgement resolved.
    fn settle(&mut self, _verdict: &Verdict<Self::Output>) {}

    fn exhausted(&self) -> bool {
        false
    }
}

/// Runs a synchronous [`Step`] under the asynchronous protocol.
#[derive(Debug, Clone)]
pub struct Immediate<S>(pub S);

impl<T, S: Step<T>> AsyncStep<T> for Immediate<S> {
    type Output = S::Output;
    type Judgement = future::Ready<Verdict<S::Output>>;

    fn judge(&mut self, item: T) -> Self::Judgement {
        future::ready(self.0.step(item))
    }

    fn exhausted(&self) -> bool {
        self.0.exhausted()
    }
}

/// Iterator that applies a [`Step`] to a synchronous upstream.
///
/// The upstream iterator is dropped as soon as the step stops or exhausts.
#[must_use = "iterators are lazy and do nothing unless consumed"]
pub struct SyncDecorator<I, S> {
    upstream: Option<I>,
    step: S,
}

impl<I, S> SyncDecorator<I, S> {
    pub fn new(upstream: I, step: S) -> Self {
        Self {
            upstream: Some(upstream),
            step,
        }
    }
}

impl<I, S> Iterator for SyncDecorator<I, S>
where
    I: Iterator,
    S: Step<I::Item>,
{
    type Item = S::Output;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            if self.step.exhausted() {
                self.upstream = None;
            }
            let item = self.upstream.as_mut()?.next();
            let Some(item) = item else {
                self.upstream = None;
                return None;
            };
            match self.step.step(item) {
                Verdict::Emit(output) => return Some(output),
                Verdict::Skip => continue,
                Verdict::Stop => {
                    self.upstream = None;
                    return None;
                }
            }
        }
    }
}

/// Cursor that applies an [`AsyncStep`] to an asynchronous upstream.
///
/// Stopping early, failing, or being dropped before completion terminates
/// the upstream cursor exactly once.
#[must_use = "cursors are lazy and do nothing unless pulled"]
pub struct AsyncDecorator<C, S>
where
    C: Cursor,
    S: AsyncStep<C::Item>,
{
    upstream: C,
    step: S,
    judging: Option<S::Judgement>,
    finished: bool,
}

impl<C, S> AsyncDecorator<C, S>
where
    C: Cursor,
    S: AsyncStep<C::Item>,
{
    pub fn new(upstream: C, step: S) -> Self {
        Self {
            upstream,
            step,
            judging: None,
            finished: false,
        }
    }

    fn halt(&mut self) {
        if !self.finished {
            self.finished = true;
            self.judging = None;
            log::trace!("decorator finished early, terminating upstream cursor");
            self.upstream.terminate();
        }
    }
}

impl<C, S> Cursor for AsyncDecorator<C, S>
where
    C: Cursor,
    S: AsyncStep<C::Item>,
{
    type Item = S::Output;

    fn poll_pull(&mut self, cx: &mut Context<'_>) -> Poll<SeqResult<Option<Self::Item>>> {
        loop {
            if self.finished {
                return Poll::Ready(Ok(None));
            }

            if let Some(judgement) = self.judging.as_mut() {
                let verdict = ready!(Pin::new(judgement).poll(cx));
                self.judging = None;
                self.step.settle(&verdict);
                match verdict {
                    Verdict::Emit(output) => return Poll::Ready(Ok(Some(output))),
                    Verdict::Skip => continue,
                    Verdict::Stop => {
                        self.halt();
                        return Poll::Ready(Ok(None));
                    }
                }
            }

            if self.step.exhausted() {
                self.halt();
                return Poll::Ready(Ok(None));
            }

            match ready!(self.upstream.poll_pull(cx)) {
                Ok(Some(item)) => self.judging = Some(self.step.judge(item)),
                Ok(None) => {
                    self.finished = true;
                    return Poll::Ready(Ok(None));
                }
                Err(err) => {
                    self.halt();
                    return Poll::Ready(Err(err));
                }
            }
        }
    }

    fn terminate(&mut self) {
        self.halt();
    }
}

impl<C, S> Drop for AsyncDecorator<C, S>
where
    C: Cursor,
    S: AsyncStep<C::Item>,
{
    fn drop(&mut self) {
        self.halt();
    }
}

/// Turns the outcome of a user future back into a [`Verdict`] on the element
/// that was judged.
pub trait Settle<T, O> {
    type Output;

    fn settle(item: T, outcome: O) -> Verdict<Self::Output>;
}

/// Emit when the predicate held, skip otherwise.
pub struct KeepIf;
/// Emit while the predicate holds, stop at the first miss.
pub struct KeepWhile;
/// Skip while the predicate holds, emit otherwise.
pub struct DropWhile;
/// Emit the future's output in place of the element.
pub struct Replace;
/// Emit the element unchanged once the future resolved.
pub struct Pass;

impl<T> Settle<T, bool> for KeepIf {
    type Output = T;

    fn settle(item: T, keep: bool) -> Verdict<T> {
        if keep {
            Verdict::Emit(item)
        } else {
            Verdict::Skip
        }
    }
}

impl<T> Settle<T, bool> for KeepWhile {
    type Output = T;

    fn settle(item: T, keep: bool) -> Verdict<T> {
        if keep {
            Verdict::Emit(item)
        } else {
            Verdict::Stop
        }
    }
}

impl<T> Settle<T, bool> for DropWhile {
    type Output = T;

    fn settle(item: T, dropping: bool) -> Verdict<T> {
        if dropping {
            Verdict::Skip
        } else {
            Verdict::Emit(item)
        }
    }
}

impl<U> Settle<(), U> for Replace {
    type Output = U;

    fn settle(_item: (), outcome: U) -> Verdict<U> {
        Verdict::Emit(outcome)
    }
}

impl<T> Settle<T, ()> for Pass {
    type Output = T;

    fn settle(item: T, _outcome: ()) -> Verdict<T> {
        Verdict::Emit(item)
    }
}

/// Judgement that awaits a user future, then settles the held element with
/// the policy `D`.
#[must_use = "futures do nothing unless you `.await` or poll them"]
pub struct Deferred<Fut, T, D> {
    future: Pin<Box<Fut>>,
    item: Option<T>,
    _policy: PhantomData<fn() -> D>,
}

impl<Fut, T, D> Deferred<Fut, T, D> {
    pub fn new(future: Fut, item: T) -> Self {
        Self {
            future: Box::pin(future),
            item: Some(item),
            _policy: PhantomData,
        }
    }
}

// The user future is boxed, the element is never pinned.
impl<Fut, T, D> Unpin for Deferred<Fut, T, D> {}

impl<Fut, T, D> Future for Deferred<Fut, T, D>
where
    Fut: Future,
    D: Settle<T, Fut::Output>,
{
    type Output = Verdict<D::Output>;

    fn poll(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        let this = self.get_mut();
        if this.item.is_none() {
            // Already settled.
            return Poll::Ready(Verdict::Skip);
        }
        let outcome = ready!(this.future.as_mut().poll(cx));
        match this.item.take() {
            Some(item) => Poll::Ready(D::settle(item, outcome)),
            None => Poll::Ready(Verdict::Skip),
        }
    }
}

/// Sequence produced by applying the step `S` to the producer `P`
pub type Decorated<P, S> = Seq<
    SyncDecorator<<P as Producer>::Iter, S>,
    AsyncDecorator<<P as Producer>::Cursor, Immediate<S>>,
>;

/// Sequence produced by applying the suspending step `S` to the producer `P`
pub type AsyncDecorated<P, S> =
    Seq<std::iter::Empty<<S as AsyncStep<<P as Producer>::Item>>::Output>, AsyncDecorator<SeqOf<P>, S>>;

/// Apply a synchronous step, keeping the producer's protocol.
pub fn decorate<P, S>(producer: P, step: S) -> Decorated<P, S>
where
    P: Producer,
    S: Step<P::Item>,
{
    match Seq::from_producer(producer) {
        Seq::Sync(iter) => Seq::Sync(SyncDecorator::new(iter, step)),
        Seq::Async(cursor) => Seq::Async(AsyncDecorator::new(cursor, Immediate(step))),
        Seq::Closed(err) => Seq::Closed(err),
    }
}

/// Apply a suspending step; the result is always asynchronous.
pub fn decorate_async<P, S>(producer: P, step: S) -> AsyncDecorated<P, S>
where
    P: Producer,
    S: AsyncStep<P::Item>,
{
    Seq::Async(AsyncDecorator::new(Seq::from_producer(producer), step))
}
