//! Transformations whose callbacks return futures
//!
//! These always produce an asynchronous sequence, whatever the input
//! protocol, since every element waits on a user future.

use futures_util::future::{self, Either};
use std::future::Future;

use crate::decorator::{
    decorate_async, AsyncDecorated, AsyncStep, Deferred, DropWhile, KeepIf, KeepWhile, Pass,
    Replace, Verdict,
};
use crate::producer::Producer;

pub struct FilterAsync<F> {
    predicate: F,
}

impl<T, F, Fut> AsyncStep<T> for FilterAsync<F>
where
    F: FnMut(&T) -> Fut,
    Fut: Future<Output = bool>,
{
    type Output = T;
    type Judgement = Deferred<Fut, T, KeepIf>;

    fn judge(&mut self, item: T) -> Self::Judgement {
        Deferred::new((self.predicate)(&item), item)
    }
}

pub struct MapAsync<F> {
    f: F,
}

impl<T, F, Fut> AsyncStep<T> for MapAsync<F>
where
    F: FnMut(T) -> Fut,
    Fut: Future,
{
    type Output = Fut::Output;
    type Judgement = Deferred<Fut, (), Replace>;

    fn judge(&mut self, item: T) -> Self::Judgement {
        Deferred::new((self.f)(item), ())
    }
}

pub struct TapAsync<F> {
    f: F,
}

impl<T, F, Fut> AsyncStep<T> for TapAsync<F>
where
    F: FnMut(&T) -> Fut,
    Fut: Future<Output = ()>,
{
    type Output = T;
    type Judgement = Deferred<Fut, T, Pass>;

    fn judge(&mut self, item: T) -> Self::Judgement {
        Deferred::new((self.f)(&item), item)
    }
}

pub struct SkipWhileAsync<F> {
    predicate: F,
    skipping: bool,
}

impl<T, F, Fut> AsyncStep<T> for SkipWhileAsync<F>
where
    F: FnMut(&T) -> Fut,
    Fut: Future<Output = bool>,
{
    type Output = T;
    type Judgement = Either<future::Ready<Verdict<T>>, Deferred<Fut, T, DropWhile>>;

    fn judge(&mut self, item: T) -> Self::Judgement {
        if self.skipping {
            Either::Right(Deferred::new((self.predicate)(&item), item))
        } else {
            Either::Left(future::ready(Verdict::Emit(item)))
        }
    }

    fn settle(&mut self, verdict: &Verdict<T>) {
        if let Verdict::Emit(_) = verdict {
            self.skipping = false;
        }
    }
}

pub struct TakeWhileAsync<F> {
    predicate: F,
}

impl<T, F, Fut> AsyncStep<T> for TakeWhileAsync<F>
where
    F: FnMut(&T) -> Fut,
    Fut: Future<Output = bool>,
{
    type Output = T;
    type Judgement = Deferred<Fut, T, KeepWhile>;

    fn judge(&mut self, item: T) -> Self::Judgement {
        Deferred::new((self.predicate)(&item), item)
    }
}

/// [`filter`](crate::transform::filter) with an awaited predicate
pub fn filter_async<P, F, Fut>(predicate: F, producer: P) -> AsyncDecorated<P, FilterAsync<F>>
where
    P: Producer,
    F: FnMut(&P::Item) -> Fut,
    Fut: Future<Output = bool>,
{
    decorate_async(producer, FilterAsync { predicate })
}

/// [`map`](crate::transform::map) with an awaited mapping
pub fn map_async<P, F, Fut>(f: F, producer: P) -> AsyncDecorated<P, MapAsync<F>>
where
    P: Producer,
    F: FnMut(P::Item) -> Fut,
    Fut: Future,
{
    decorate_async(producer, MapAsync { f })
}

/// [`tap`](crate::transform::tap) with an awaited side effect; each element
/// is held back until its side effect completed.
pub fn tap_async<P, F, Fut>(f: F, producer: P) -> AsyncDecorated<P, TapAsync<F>>
where
    P: Producer,
    F: FnMut(&P::Item) -> Fut,
    Fut: Future<Output = ()>,
{
    decorate_async(producer, TapAsync { f })
}

pub fn skip_while_async<P, F, Fut>(predicate: F, producer: P) -> AsyncDecorated<P, SkipWhileAsync<F>>
where
    P: Producer,
    F: FnMut(&P::Item) -> Fut,
    Fut: Future<Output = bool>,
{
    decorate_async(
        producer,
        SkipWhileAsync {
            predicate,
            skipping: true,
        },
    )
}

pub fn take_while_async<P, F, Fut>(predicate: F, producer: P) -> AsyncDecorated<P, TakeWhileAsync<F>>
where
    P: Producer,
    F: FnMut(&P::Item) -> Fut,
    Fut: Future<Output = bool>,
{
    decorate_async(producer, TakeWhileAsync { predicate })
}
