//! Terminal consumers: collect, reduce, fold, sum, find, every, some and
//! includes
//!
//! Consumers drive a sequence to completion, or until their answer is known,
//! in which case the sequence is terminated. A synchronous sequence is
//! drained inside a single poll without suspending.

use futures_util::StreamExt;
use std::convert::Infallible;
use std::future::Future;
use std::ops::{Add, ControlFlow};
use std::pin::Pin;
use std::task::{Context, Poll};

use crate::configuration::CollectConfig;
use crate::cursor::{Cursor, CursorExt};
use crate::error::{SeqError, SeqResult};
use crate::producer::{Producer, Seq};
use crate::suspending::filter_async;

/// Future threading `state` through `visit` for every element of a sequence
/// until the visitor breaks.
///
/// Dropping it before it completed terminates the sequence.
#[must_use = "futures do nothing unless you `.await` or poll them"]
pub struct Scan<I, C, A, F>
where
    I: Iterator,
    C: Cursor<Item = I::Item>,
{
    seq: Seq<I, C>,
    // `None` once the future has completed.
    state: Option<A>,
    visit: F,
}

impl<I, C, A, F> Scan<I, C, A, F>
where
    I: Iterator,
    C: Cursor<Item = I::Item>,
{
    fn new(seq: Seq<I, C>, state: A, visit: F) -> Self {
        Self {
            seq,
            state: Some(state),
            visit,
        }
    }
}

// Neither the sequence nor the visitor is ever pinned.
impl<I, C, A, F> Unpin for Scan<I, C, A, F>
where
    I: Iterator,
    C: Cursor<Item = I::Item>,
{
}

impl<I, C, A, F, R> Future for Scan<I, C, A, F>
where
    I: Iterator,
    C: Cursor<Item = I::Item>,
    F: FnMut(A, I::Item) -> ControlFlow<R, A>,
{
    type Output = SeqResult<ControlFlow<R, A>>;

    fn poll(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        let this = self.get_mut();
        let mut state = this
            .state
            .take()
            .expect("`Scan` must not be polled after it returned `Poll::Ready`");
        loop {
            let pulled = match this.seq.poll_pull(cx) {
                Poll::Ready(pulled) => pulled,
                Poll::Pending => {
                    this.state = Some(state);
                    return Poll::Pending;
                }
            };
            match pulled {
                Ok(Some(item)) => match (this.visit)(state, item) {
                    ControlFlow::Continue(next) => state = next,
                    ControlFlow::Break(found) => {
                        this.seq.terminate();
                        return Poll::Ready(Ok(ControlFlow::Break(found)));
                    }
                },
                Ok(None) => return Poll::Ready(Ok(ControlFlow::Continue(state))),
                Err(err) => {
                    this.seq.terminate();
                    return Poll::Ready(Err(err));
                }
            }
        }
    }
}

impl<I, C, A, F> Drop for Scan<I, C, A, F>
where
    I: Iterator,
    C: Cursor<Item = I::Item>,
{
    fn drop(&mut self) {
        if self.state.is_some() {
            self.seq.terminate();
        }
    }
}

fn scan<P, A, F, R>(producer: P, state: A, visit: F) -> Scan<P::Iter, P::Cursor, A, F>
where
    P: Producer,
    F: FnMut(A, P::Item) -> ControlFlow<R, A>,
{
    Scan::new(Seq::from_producer(producer), state, visit)
}

/// The final state of a scan whose visitor never breaks.
fn settled<A>(flow: ControlFlow<Infallible, A>) -> A {
    match flow {
        ControlFlow::Continue(state) => state,
        ControlFlow::Break(never) => match never {},
    }
}

/// Gather every element into a `Vec`.
pub async fn collect<P: Producer>(producer: P) -> SeqResult<Vec<P::Item>> {
    collect_with(CollectConfig::default(), producer).await
}

/// Gather every element into a `Vec`, failing with
/// [`SeqError::CapacityExceeded`] once `config.max_len` would be exceeded.
pub async fn collect_with<P: Producer>(config: CollectConfig, producer: P) -> SeqResult<Vec<P::Item>> {
    let items = Vec::with_capacity(config.initial_capacity);
    let flow = scan(producer, items, |mut items, item| match config.max_len {
        Some(limit) if items.len() >= limit => ControlFlow::Break(SeqError::CapacityExceeded { limit }),
        _ => {
            items.push(item);
            ControlFlow::Continue(items)
        }
    })
    .await?;

    match flow {
        ControlFlow::Continue(items) => Ok(items),
        ControlFlow::Break(err) => Err(err),
    }
}

/// Combine all elements left to right, seeding with the first.
///
/// Fails with [`SeqError::Empty`] on an empty input.
pub async fn reduce<P, F>(reducer: F, producer: P) -> SeqResult<P::Item>
where
    P: Producer,
    F: FnMut(P::Item, P::Item) -> P::Item,
{
    let mut reducer = reducer;
    let flow = scan(producer, None, |acc, item| {
        ControlFlow::<Infallible, _>::Continue(Some(match acc {
            Some(acc) => reducer(acc, item),
            None => item,
        }))
    })
    .await?;
    settled(flow).ok_or(SeqError::Empty)
}

/// Combine all elements left to right, starting from `initial`.
pub async fn fold<P, F, R>(reducer: F, initial: R, producer: P) -> SeqResult<R>
where
    P: Producer,
    F: FnMut(R, P::Item) -> R,
{
    let mut reducer = reducer;
    let flow = scan(producer, initial, |acc, item| {
        ControlFlow::<Infallible, _>::Continue(reducer(acc, item))
    })
    .await?;
    Ok(settled(flow))
}

/// [`fold`] with a reducer that returns a future
pub async fn fold_async<P, F, Fut, R>(reducer: F, initial: R, producer: P) -> SeqResult<R>
where
    P: Producer,
    F: FnMut(R, P::Item) -> Fut,
    Fut: Future<Output = R>,
{
    let mut reducer = reducer;
    let mut acc = initial;
    let mut items = Seq::from_producer(producer).into_stream();
    while let Some(item) = items.next().await {
        acc = reducer(acc, item?).await;
    }
    Ok(acc)
}

/// Add up every element, starting from `T::default()`.
pub async fn sum<P>(producer: P) -> SeqResult<P::Item>
where
    P: Producer,
    P::Item: Add<Output = P::Item> + Default,
{
    fold(|acc, item| acc + item, P::Item::default(), producer).await
}

/// The first element satisfying `predicate`, or [`SeqError::NotFound`].
pub async fn find<P, F>(predicate: F, producer: P) -> SeqResult<P::Item>
where
    P: Producer,
    F: FnMut(&P::Item) -> bool,
{
    let mut predicate = predicate;
    let flow = scan(producer, (), |(), item| {
        if predicate(&item) {
            ControlFlow::Break(item)
        } else {
            ControlFlow::Continue(())
        }
    })
    .await?;
    match flow {
        ControlFlow::Break(item) => Ok(item),
        ControlFlow::Continue(()) => Err(SeqError::NotFound),
    }
}

/// Whether every element satisfies `predicate`; stops at the first miss.
pub async fn every<P, F>(predicate: F, producer: P) -> SeqResult<bool>
where
    P: Producer,
    F: FnMut(&P::Item) -> bool,
{
    let mut predicate = predicate;
    let flow = scan(producer, (), |(), item| {
        if predicate(&item) {
            ControlFlow::Continue(())
        } else {
            ControlFlow::Break(())
        }
    })
    .await?;
    Ok(flow.is_continue())
}

/// Whether any element satisfies `predicate`; stops at the first hit.
pub async fn some<P, F>(predicate: F, producer: P) -> SeqResult<bool>
where
    P: Producer,
    F: FnMut(&P::Item) -> bool,
{
    let mut predicate = predicate;
    let flow = scan(producer, (), |(), item| {
        if predicate(&item) {
            ControlFlow::Break(())
        } else {
            ControlFlow::Continue(())
        }
    })
    .await?;
    Ok(flow.is_break())
}

/// Whether some element equals `value`.
///
/// Wrap floats in [`SameValueZero`](crate::transform::SameValueZero) to match
/// `NaN`.
pub async fn includes<P>(value: &P::Item, producer: P) -> SeqResult<bool>
where
    P: Producer,
    P::Item: PartialEq,
{
    some(|item| item == value, producer).await
}

/// [`find`] with a predicate that returns a future
pub async fn find_async<P, F, Fut>(predicate: F, producer: P) -> SeqResult<P::Item>
where
    P: Producer,
    F: FnMut(&P::Item) -> Fut,
    Fut: Future<Output = bool>,
{
    let flow = scan(filter_async(predicate, producer), (), |(), item| ControlFlow::Break(item)).await?;
    match flow {
        ControlFlow::Break(item) => Ok(item),
        ControlFlow::Continue(()) => Err(SeqError::NotFound),
    }
}

/// [`every`] with a predicate that returns a future
pub async fn every_async<P, F, Fut>(predicate: F, producer: P) -> SeqResult<bool>
where
    P: Producer,
    F: FnMut(&P::Item) -> Fut,
    Fut: Future<Output = bool>,
{
    let mut predicate = predicate;
    let misses = filter_async(
        move |item: &P::Item| {
            let holds = predicate(item);
            async move { !holds.await }
        },
        producer,
    );
    let flow = scan(misses, (), |(), _| ControlFlow::Break(())).await?;
    Ok(flow.is_continue())
}

/// [`some`] with a predicate that returns a future
pub async fn some_async<P, F, Fut>(predicate: F, producer: P) -> SeqResult<bool>
where
    P: Producer,
    F: FnMut(&P::Item) -> Fut,
    Fut: Future<Output = bool>,
{
    let flow = scan(filter_async(predicate, producer), (), |(), _| ControlFlow::Break(())).await?;
    Ok(flow.is_break())
}

#[cfg(test)]
mod tests {
    use super::*;
    use futures::executor::block_on;

    #[test]
    fn sync_input_completes_in_one_poll() {
        let waker = futures::task::noop_waker();
        let mut cx = Context::from_waker(&waker);
        let mut scan = scan(vec![1, 2, 3], 0, |total, item| {
            ControlFlow::<(), i32>::Continue(total + item)
        });
        assert_eq!(
            Pin::new(&mut scan).poll(&mut cx),
            Poll::Ready(Ok(ControlFlow::Continue(6)))
        );
    }

    #[test]
    fn fold_keeps_the_seed_for_empty_input() {
        let empty: Vec<u32> = Vec::new();
        assert_eq!(block_on(fold(|a, b| a + b, 7, empty)), Ok(7));
    }

    #[test]
    fn reduce_without_elements_fails() {
        let empty: Vec<u32> = Vec::new();
        assert_eq!(block_on(reduce(|a, b| a + b, empty)), Err(SeqError::Empty));
    }
}
