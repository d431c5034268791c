//! Producers, capability detection and cursor extraction
//!
//! A [`Producer`] is anything that can hand out a single-pass cursor over its
//! elements, synchronously (an [`Iterator`]), asynchronously (a [`Cursor`]),
//! or both. Every operation in this crate accepts producers and decides from
//! their [`Capabilities`] which of the two paths to take.

use std::collections::VecDeque;
use std::task::{Context, Poll};

use crate::cursor::{Cursor, IterCursor};
use crate::error::{SeqError, SeqResult};

/// Which iteration protocol a cursor speaks
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    Sync,
    Async,
}

/// The iteration protocols a producer exposes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Capabilities {
    pub synchronous: bool,
    pub asynchronous: bool,
}

impl Capabilities {
    pub const NONE: Capabilities = Capabilities {
        synchronous: false,
        asynchronous: false,
    };
    pub const SYNC: Capabilities = Capabilities {
        synchronous: true,
        asynchronous: false,
    };
    pub const ASYNC: Capabilities = Capabilities {
        synchronous: false,
        asynchronous: true,
    };
    pub const BOTH: Capabilities = Capabilities {
        synchronous: true,
        asynchronous: true,
    };

    /// The protocol extraction picks: asynchronous wins when both are offered.
    pub fn preferred(self) -> Option<Mode> {
        if self.asynchronous {
            Some(Mode::Async)
        } else if self.synchronous {
            Some(Mode::Sync)
        } else {
            None
        }
    }

    pub fn is_iterable(self) -> bool {
        self.synchronous || self.asynchronous
    }
}

/// A value that can be turned into a single-pass cursor over `Item`s.
pub trait Producer {
    type Item;
    type Iter: Iterator<Item = Self::Item>;
    type Cursor: Cursor<Item = Self::Item>;

    /// Which protocols [`into_seq`](Producer::into_seq) can honour.
    fn capabilities(&self) -> Capabilities;

    /// Hand out a cursor speaking `mode`.
    ///
    /// Only called with a mode the capabilities advertise.
    fn into_seq(self, mode: Mode) -> Seq<Self::Iter, Self::Cursor>;
}

/// Report which iteration protocols `producer` supports.
pub fn detect<P: Producer + ?Sized>(producer: &P) -> Capabilities {
    producer.capabilities()
}

/// Obtain a cursor from `producer`, asynchronous when both protocols exist.
pub fn extract<P: Producer>(producer: P) -> SeqResult<Seq<P::Iter, P::Cursor>> {
    match detect(&producer).preferred() {
        Some(mode) => Ok(producer.into_seq(mode)),
        None => {
            log::warn!("refusing to extract a cursor from a non-iterable producer");
            Err(SeqError::NotIterable)
        }
    }
}

/// A cursor in one of its two protocols, or a closed one.
///
/// `Seq` is what every operation returns, and it is itself a [`Producer`], so
/// operations compose. The `Sync` arm is a plain iterator and is consumed
/// without suspending; dropping it is how a synchronous cursor is terminated.
pub enum Seq<I, C> {
    Sync(I),
    Async(C),
    /// Done. A held error is reported by the first pull, after which the
    /// sequence is empty.
    Closed(Option<SeqError>),
}

/// The sequence type a producer extracts to.
pub type SeqOf<P> = Seq<<P as Producer>::Iter, <P as Producer>::Cursor>;

/// A sequence that never takes the synchronous path.
pub type AsyncSeq<T, C> = Seq<std::iter::Empty<T>, C>;

/// A synchronous-only sequence.
pub type SyncSeq<I> = Seq<I, IterCursor<I>>;

/// Type-erased sequence
pub type BoxSeq<'a, T> = Seq<Box<dyn Iterator<Item = T> + 'a>, Box<dyn Cursor<Item = T> + 'a>>;

impl<I, C> Seq<I, C> {
    /// Extract `producer`, turning a refusal into a sequence that fails on its
    /// first pull.
    pub fn from_producer<P>(producer: P) -> Self
    where
        P: Producer<Iter = I, Cursor = C>,
    {
        extract(producer).unwrap_or_else(Seq::failed)
    }

    /// A sequence whose first pull reports `err`.
    pub fn failed(err: SeqError) -> Self {
        Seq::Closed(Some(err))
    }

    pub fn empty() -> Self {
        Seq::Closed(None)
    }

    /// The protocol this sequence speaks; `None` once closed.
    pub fn mode(&self) -> Option<Mode> {
        match self {
            Seq::Sync(_) => Some(Mode::Sync),
            Seq::Async(_) => Some(Mode::Async),
            Seq::Closed(_) => None,
        }
    }

    pub fn is_sync(&self) -> bool {
        matches!(self, Seq::Sync(_))
    }

    /// The synchronous iterator, if this sequence took the fast path.
    pub fn into_sync(self) -> Result<I, Self> {
        match self {
            Seq::Sync(iter) => Ok(iter),
            other => Err(other),
        }
    }
}

impl<I, C> Seq<I, C>
where
    I: Iterator,
    C: Cursor<Item = I::Item>,
{
    /// Erase the concrete iterator and cursor types.
    pub fn boxed<'a>(self) -> BoxSeq<'a, I::Item>
    where
        I: 'a,
        C: 'a,
    {
        match self {
            Seq::Sync(iter) => Seq::Sync(Box::new(iter)),
            Seq::Async(cursor) => Seq::Async(Box::new(cursor)),
            Seq::Closed(err) => Seq::Closed(err),
        }
    }

    /// Pull from the synchronous arm; anything else reads as done.
    pub(crate) fn next_sync(&mut self) -> Option<I::Item> {
        let Seq::Sync(iter) = self else {
            return None;
        };
        let item = iter.next();
        if item.is_none() {
            *self = Seq::Closed(None);
        }
        item
    }
}

impl<I, C> Cursor for Seq<I, C>
where
    I: Iterator,
    C: Cursor<Item = I::Item>,
{
    type Item = I::Item;

    fn poll_pull(&mut self, cx: &mut Context<'_>) -> Poll<SeqResult<Option<Self::Item>>> {
        match self {
            Seq::Sync(iter) => match iter.next() {
                Some(item) => Poll::Ready(Ok(Some(item))),
                None => {
                    // The iterator may not be fused.
                    *self = Seq::Closed(None);
                    Poll::Ready(Ok(None))
                }
            },
            Seq::Async(cursor) => cursor.poll_pull(cx),
            Seq::Closed(err) => Poll::Ready(match err.take() {
                Some(err) => Err(err),
                None => Ok(None),
            }),
        }
    }

    fn terminate(&mut self) {
        if let Seq::Async(cursor) = self {
            cursor.terminate();
        }
        *self = Seq::Closed(None);
    }
}

impl<I, C> Producer for Seq<I, C>
where
    I: Iterator,
    C: Cursor<Item = I::Item>,
{
    type Item = I::Item;
    type Iter = I;
    type Cursor = C;

    fn capabilities(&self) -> Capabilities {
        match self {
            Seq::Sync(_) | Seq::Closed(None) => Capabilities::SYNC,
            // A held failure surfaces on the first asynchronous pull.
            Seq::Async(_) | Seq::Closed(Some(_)) => Capabilities::ASYNC,
        }
    }

    fn into_seq(self, _mode: Mode) -> Self {
        self
    }
}

fn sync_seq<I: Iterator>(iter: I, mode: Mode) -> SyncSeq<I> {
    match mode {
        Mode::Sync => Seq::Sync(iter),
        Mode::Async => Seq::Async(IterCursor::new(iter)),
    }
}

impl<T> Producer for Vec<T> {
    type Item = T;
    type Iter = std::vec::IntoIter<T>;
    type Cursor = IterCursor<Self::Iter>;

    fn capabilities(&self) -> Capabilities {
        Capabilities::SYNC
    }

    fn into_seq(self, mode: Mode) -> SyncSeq<Self::Iter> {
        sync_seq(self.into_iter(), mode)
    }
}

impl<T, const N: usize> Producer for [T; N] {
    type Item = T;
    type Iter = std::array::IntoIter<T, N>;
    type Cursor = IterCursor<Self::Iter>;

    fn capabilities(&self) -> Capabilities {
        Capabilities::SYNC
    }

    fn into_seq(self, mode: Mode) -> SyncSeq<Self::Iter> {
        sync_seq(self.into_iter(), mode)
    }
}

impl<T> Producer for VecDeque<T> {
    type Item = T;
    type Iter = std::collections::vec_deque::IntoIter<T>;
    type Cursor = IterCursor<Self::Iter>;

    fn capabilities(&self) -> Capabilities {
        Capabilities::SYNC
    }

    fn into_seq(self, mode: Mode) -> SyncSeq<Self::Iter> {
        sync_seq(self.into_iter(), mode)
    }
}

impl<A> Producer for std::ops::Range<A>
where
    std::ops::Range<A>: Iterator<Item = A>,
{
    type Item = A;
    type Iter = Self;
    type Cursor = IterCursor<Self>;

    fn capabilities(&self) -> Capabilities {
        Capabilities::SYNC
    }

    fn into_seq(self, mode: Mode) -> SyncSeq<Self> {
        sync_seq(self, mode)
    }
}

/// `None` stands for a value that is not iterable at all.
impl<P: Producer> Producer for Option<P> {
    type Item = P::Item;
    type Iter = P::Iter;
    type Cursor = P::Cursor;

    fn capabilities(&self) -> Capabilities {
        self.as_ref()
            .map_or(Capabilities::NONE, |producer| producer.capabilities())
    }

    fn into_seq(self, mode: Mode) -> SeqOf<P> {
        match self {
            Some(producer) => producer.into_seq(mode),
            None => Seq::failed(SeqError::NotIterable),
        }
    }
}
