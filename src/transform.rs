//! Per-element transformations: distinct, filter, map, skip, skip_while,
//! take, take_while and tap
//!
//! Each transformation keeps the protocol of its input: a synchronous input
//! yields a synchronous [`Seq`](crate::producer::Seq) that never suspends.

use std::collections::HashSet;
use std::hash::{Hash, Hasher};

use crate::decorator::{decorate, Decorated, Step, Verdict};
use crate::producer::Producer;

// ================================
// Steps
// ================================

/// Drops every element equal to one already emitted.
pub struct Distinct<T> {
    seen: HashSet<T>,
}

impl<T> Step<T> for Distinct<T>
where
    T: Clone + Eq + Hash,
{
    type Output = T;

    fn step(&mut self, item: T) -> Verdict<T> {
        if self.seen.insert(item.clone()) {
            Verdict::Emit(item)
        } else {
            Verdict::Skip
        }
    }
}

/// Drops every element whose key was already seen.
pub struct DistinctBy<F, K> {
    key: F,
    seen: HashSet<K>,
}

impl<T, K, F> Step<T> for DistinctBy<F, K>
where
    F: FnMut(&T) -> K,
    K: Eq + Hash,
{
    type Output = T;

    fn step(&mut self, item: T) -> Verdict<T> {
        if self.seen.insert((self.key)(&item)) {
            Verdict::Emit(item)
        } else {
            Verdict::Skip
        }
    }
}

pub struct Filter<F> {
    predicate: F,
}

impl<T, F> Step<T> for Filter<F>
where
    F: FnMut(&T) -> bool,
{
    type Output = T;

    fn step(&mut self, item: T) -> Verdict<T> {
        if (self.predicate)(&item) {
            Verdict::Emit(item)
        } else {
            Verdict::Skip
        }
    }
}

pub struct Map<F> {
    f: F,
}

impl<T, U, F> Step<T> for Map<F>
where
    F: FnMut(T) -> U,
{
    type Output = U;

    fn step(&mut self, item: T) -> Verdict<U> {
        Verdict::Emit((self.f)(item))
    }
}

pub struct Skip {
    remaining: usize,
}

impl<T> Step<T> for Skip {
    type Output = T;

    fn step(&mut self, item: T) -> Verdict<T> {
        if self.remaining > 0 {
            self.remaining -= 1;
            Verdict::Skip
        } else {
            Verdict::Emit(item)
        }
    }
}

pub struct SkipWhile<F> {
    predicate: F,
    skipping: bool,
}

impl<T, F> Step<T> for SkipWhile<F>
where
    F: FnMut(&T) -> bool,
{
    type Output = T;

    fn step(&mut self, item: T) -> Verdict<T> {
        if self.skipping && (self.predicate)(&item) {
            return Verdict::Skip;
        }
        self.skipping = false;
        Verdict::Emit(item)
    }
}

/// Emits at most `remaining` elements, then refuses to pull again.
pub struct Take {
    remaining: usize,
}

impl<T> Step<T> for Take {
    type Output = T;

    fn step(&mut self, item: T) -> Verdict<T> {
        match self.remaining.checked_sub(1) {
            Some(remaining) => {
                self.remaining = remaining;
                Verdict::Emit(item)
            }
            None => Verdict::Stop,
        }
    }

    fn exhausted(&self) -> bool {
        self.remaining == 0
    }
}

pub struct TakeWhile<F> {
    predicate: F,
}

impl<T, F> Step<T> for TakeWhile<F>
where
    F: FnMut(&T) -> bool,
{
    type Output = T;

    fn step(&mut self, item: T) -> Verdict<T> {
        if (self.predicate)(&item) {
            Verdict::Emit(item)
        } else {
            Verdict::Stop
        }
    }
}

pub struct Tap<F> {
    f: F,
}

impl<T, F> Step<T> for Tap<F>
where
    F: FnMut(&T),
{
    type Output = T;

    fn step(&mut self, item: T) -> Verdict<T> {
        (self.f)(&item);
        Verdict::Emit(item)
    }
}

// ================================
// Operations
// ================================

/// Yield each element the first time an equal one is seen.
///
/// Remembers every distinct element for the lifetime of the sequence.
pub fn distinct<P>(producer: P) -> Decorated<P, Distinct<P::Item>>
where
    P: Producer,
    P::Item: Clone + Eq + Hash,
{
    decorate(
        producer,
        Distinct {
            seen: HashSet::new(),
        },
    )
}

/// Yield each element whose `key` has not been seen before.
pub fn distinct_by<P, F, K>(key: F, producer: P) -> Decorated<P, DistinctBy<F, K>>
where
    P: Producer,
    F: FnMut(&P::Item) -> K,
    K: Eq + Hash,
{
    decorate(
        producer,
        DistinctBy {
            key,
            seen: HashSet::new(),
        },
    )
}

pub fn filter<P, F>(predicate: F, producer: P) -> Decorated<P, Filter<F>>
where
    P: Producer,
    F: FnMut(&P::Item) -> bool,
{
    decorate(producer, Filter { predicate })
}

pub fn map<P, F, U>(f: F, producer: P) -> Decorated<P, Map<F>>
where
    P: Producer,
    F: FnMut(P::Item) -> U,
{
    decorate(producer, Map { f })
}

/// Drop the first `n` elements.
pub fn skip<P: Producer>(n: usize, producer: P) -> Decorated<P, Skip> {
    decorate(producer, Skip { remaining: n })
}

/// Drop the leading run of elements satisfying `predicate`.
///
/// The predicate is not consulted again once it first fails.
pub fn skip_while<P, F>(predicate: F, producer: P) -> Decorated<P, SkipWhile<F>>
where
    P: Producer,
    F: FnMut(&P::Item) -> bool,
{
    decorate(
        producer,
        SkipWhile {
            predicate,
            skipping: true,
        },
    )
}

/// Yield at most `n` elements.
///
/// Upstream is never pulled more than `n` times; `take(0, _)` pulls nothing.
pub fn take<P: Producer>(n: usize, producer: P) -> Decorated<P, Take> {
    decorate(producer, Take { remaining: n })
}

/// Yield elements until `predicate` first fails, then terminate upstream.
pub fn take_while<P, F>(predicate: F, producer: P) -> Decorated<P, TakeWhile<F>>
where
    P: Producer,
    F: FnMut(&P::Item) -> bool,
{
    decorate(producer, TakeWhile { predicate })
}

/// Run `f` on every element as it passes through.
pub fn tap<P, F>(f: F, producer: P) -> Decorated<P, Tap<F>>
where
    P: Producer,
    F: FnMut(&P::Item),
{
    decorate(producer, Tap { f })
}

/// Float wrapper comparing with SameValueZero equality: `NaN` equals `NaN`
/// and `0.0` equals `-0.0`.
///
/// Makes floating point sequences usable with [`distinct`] and
/// [`includes`](crate::consume::includes).
#[derive(Debug, Clone, Copy)]
pub struct SameValueZero(pub f64);

impl SameValueZero {
    fn canonical_bits(self) -> u64 {
        if self.0.is_nan() {
            f64::NAN.to_bits()
        } else if self.0 == 0.0 {
            0
        } else {
            self.0.to_bits()
        }
    }
}

impl PartialEq for SameValueZero {
    fn eq(&self, other: &Self) -> bool {
        self.canonical_bits() == other.canonical_bits()
    }
}

impl Eq for SameValueZero {}

impl Hash for SameValueZero {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.canonical_bits().hash(state);
    }
}

impl From<f64> for SameValueZero {
    fn from(value: f64) -> Self {
        SameValueZero(value)
    }
}
