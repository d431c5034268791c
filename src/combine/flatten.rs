//! Depth-bounded flattening, concatenation and flat_map

use futures_core::ready;
use std::fmt;
use std::task::{Context, Poll};

use crate::cursor::{Cursor, IterCursor};
use crate::error::SeqResult;
use crate::producer::{detect, AsyncSeq, BoxSeq, Mode, Producer, Seq, SeqOf};

/// How many levels of nesting [`flatten`] expands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Depth {
    Levels(usize),
    Unbounded,
}

impl Default for Depth {
    fn default() -> Self {
        Depth::Levels(1)
    }
}

impl From<usize> for Depth {
    fn from(levels: usize) -> Self {
        Depth::Levels(levels)
    }
}

impl Depth {
    /// Whether an element found `level` frames deep may still be expanded.
    fn expands(self, level: usize) -> bool {
        match self {
            Depth::Levels(levels) => level < levels,
            Depth::Unbounded => true,
        }
    }
}

/// Elements that may themselves be sequences of the same element type.
pub trait Nest: Sized {
    type Inner: Producer<Item = Self>;

    /// The inner sequence, or the element back when it is a leaf.
    fn nested(self) -> Result<Self::Inner, Self>;
}

impl Nest for String {
    type Inner = Vec<String>;

    fn nested(self) -> Result<Vec<String>, String> {
        Err(self)
    }
}

impl<'a> Nest for &'a str {
    type Inner = Vec<&'a str>;

    fn nested(self) -> Result<Vec<&'a str>, &'a str> {
        Err(self)
    }
}

/// A heterogeneously nested value.
pub enum Nested<T> {
    Leaf(T),
    Many(Vec<Nested<T>>),
    Seq(BoxSeq<'static, Nested<T>>),
}

impl<T> Nested<T> {
    pub fn leaf(value: T) -> Self {
        Nested::Leaf(value)
    }

    pub fn many(items: impl IntoIterator<Item = Nested<T>>) -> Self {
        Nested::Many(items.into_iter().collect())
    }

    pub fn into_leaf(self) -> Option<T> {
        match self {
            Nested::Leaf(value) => Some(value),
            _ => None,
        }
    }
}

impl<T: 'static> Nested<T> {
    /// Nest an arbitrary sequence, such as an asynchronous source.
    pub fn seq<P>(producer: P) -> Self
    where
        P: Producer<Item = Nested<T>>,
        P::Iter: 'static,
        P::Cursor: 'static,
    {
        Nested::Seq(Seq::from_producer(producer).boxed())
    }
}

impl<T: 'static> Nest for Nested<T> {
    type Inner = BoxSeq<'static, Nested<T>>;

    fn nested(self) -> Result<Self::Inner, Self> {
        match self {
            Nested::Leaf(value) => Err(Nested::Leaf(value)),
            Nested::Many(items) => Ok(Seq::Sync(Box::new(items.into_iter()))),
            Nested::Seq(seq) => Ok(seq),
        }
    }
}

impl<T: PartialEq> PartialEq for Nested<T> {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Nested::Leaf(a), Nested::Leaf(b)) => a == b,
            (Nested::Many(a), Nested::Many(b)) => a == b,
            // Sequences are single-pass and cannot be inspected.
            _ => false,
        }
    }
}

impl<T: fmt::Debug> fmt::Debug for Nested<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Nested::Leaf(value) => f.debug_tuple("Leaf").field(value).finish(),
            Nested::Many(items) => f.debug_tuple("Many").field(items).finish(),
            Nested::Seq(_) => f.write_str("Seq(..)"),
        }
    }
}

/// Cursor expanding nested elements with an explicit stack of inner cursors.
pub struct Flatten<C, E>
where
    C: Cursor<Item = E>,
    E: Nest,
{
    root: C,
    stack: Vec<SeqOf<E::Inner>>,
    depth: Depth,
    done: bool,
}

impl<C, E> Flatten<C, E>
where
    C: Cursor<Item = E>,
    E: Nest,
{
    pub fn new(root: C, depth: Depth) -> Self {
        Self {
            root,
            stack: Vec::new(),
            depth,
            done: false,
        }
    }

    fn shutdown(&mut self) {
        if self.done {
            return;
        }
        self.done = true;
        log::debug!("flatten shutting down {} nested cursors", self.stack.len());
        while let Some(mut frame) = self.stack.pop() {
            frame.terminate();
        }
        self.root.terminate();
    }
}

impl<C, E> Cursor for Flatten<C, E>
where
    C: Cursor<Item = E>,
    E: Nest,
{
    type Item = E;

    fn poll_pull(&mut self, cx: &mut Context<'_>) -> Poll<SeqResult<Option<E>>> {
        loop {
            if self.done {
                return Poll::Ready(Ok(None));
            }

            let level = self.stack.len();
            let pulled = match self.stack.last_mut() {
                Some(frame) => ready!(frame.poll_pull(cx)),
                None => ready!(self.root.poll_pull(cx)),
            };

            match pulled {
                Ok(Some(element)) => {
                    if !self.depth.expands(level) {
                        return Poll::Ready(Ok(Some(element)));
                    }
                    match element.nested() {
                        Ok(inner) => self.stack.push(Seq::from_producer(inner)),
                        Err(leaf) => return Poll::Ready(Ok(Some(leaf))),
                    }
                }
                Ok(None) => {
                    if self.stack.pop().is_none() {
                        self.done = true;
                        return Poll::Ready(Ok(None));
                    }
                }
                Err(err) => {
                    self.shutdown();
                    return Poll::Ready(Err(err));
                }
            }
        }
    }

    fn terminate(&mut self) {
        self.shutdown();
    }
}

impl<C, E> Drop for Flatten<C, E>
where
    C: Cursor<Item = E>,
    E: Nest,
{
    fn drop(&mut self) {
        self.shutdown();
    }
}

/// Expand nested elements up to `depth` levels deep.
///
/// Strings are never expanded into characters. Always asynchronous.
pub fn flatten<P>(depth: impl Into<Depth>, producer: P) -> AsyncSeq<P::Item, Flatten<SeqOf<P>, P::Item>>
where
    P: Producer,
    P::Item: Nest,
{
    Seq::Async(Flatten::new(Seq::from_producer(producer), depth.into()))
}

/// Cursor yielding every element of each inner producer `f` returns.
pub struct FlatMap<C, F, Q>
where
    C: Cursor,
    Q: Producer,
{
    outer: C,
    f: F,
    inner: Option<SeqOf<Q>>,
    done: bool,
}

impl<C, F, Q> FlatMap<C, F, Q>
where
    C: Cursor,
    Q: Producer,
{
    pub fn new(outer: C, f: F) -> Self {
        Self {
            outer,
            f,
            inner: None,
            done: false,
        }
    }

    fn shutdown(&mut self) {
        if self.done {
            return;
        }
        self.done = true;
        if let Some(mut inner) = self.inner.take() {
            inner.terminate();
        }
        self.outer.terminate();
    }
}

impl<C, F, Q> Cursor for FlatMap<C, F, Q>
where
    C: Cursor,
    F: FnMut(C::Item) -> Q,
    Q: Producer,
{
    type Item = Q::Item;

    fn poll_pull(&mut self, cx: &mut Context<'_>) -> Poll<SeqResult<Option<Q::Item>>> {
        loop {
            if self.done {
                return Poll::Ready(Ok(None));
            }

            if let Some(inner) = self.inner.as_mut() {
                match ready!(inner.poll_pull(cx)) {
                    Ok(Some(item)) => return Poll::Ready(Ok(Some(item))),
                    Ok(None) => self.inner = None,
                    Err(err) => {
                        self.shutdown();
                        return Poll::Ready(Err(err));
                    }
                }
            }

            match ready!(self.outer.poll_pull(cx)) {
                Ok(Some(element)) => self.inner = Some(Seq::from_producer((self.f)(element))),
                Ok(None) => {
                    self.done = true;
                    return Poll::Ready(Ok(None));
                }
                Err(err) => {
                    self.shutdown();
                    return Poll::Ready(Err(err));
                }
            }
        }
    }

    fn terminate(&mut self) {
        self.shutdown();
    }
}

impl<C, F, Q> Drop for FlatMap<C, F, Q>
where
    C: Cursor,
    Q: Producer,
{
    fn drop(&mut self) {
        self.shutdown();
    }
}

/// Map every element to a producer and yield the elements of each in turn.
pub fn flat_map<P, F, Q>(f: F, producer: P) -> AsyncSeq<Q::Item, FlatMap<SeqOf<P>, F, Q>>
where
    P: Producer,
    F: FnMut(P::Item) -> Q,
    Q: Producer,
{
    Seq::Async(FlatMap::new(Seq::from_producer(producer), f))
}

/// Iterator over a list of synchronous producers, one after the other.
#[must_use = "iterators are lazy and do nothing unless consumed"]
pub struct SyncConcat<P: Producer> {
    pending: std::vec::IntoIter<P>,
    current: Option<SeqOf<P>>,
}

impl<P: Producer> Iterator for SyncConcat<P> {
    type Item = P::Item;

    fn next(&mut self) -> Option<P::Item> {
        loop {
            if let Some(current) = self.current.as_mut() {
                if let Some(item) = current.next_sync() {
                    return Some(item);
                }
                self.current = None;
            }
            self.current = Some(Seq::from_producer(self.pending.next()?));
        }
    }
}

/// Cursor over a list of producers, one after the other.
pub type Concat<P> = FlatMap<IterCursor<std::vec::IntoIter<P>>, fn(P) -> P, P>;

/// Yield every element of each producer in order.
///
/// Each producer is extracted only once the previous one is done. When all of
/// them are synchronous the result is synchronous too.
pub fn concat<P, I>(producers: I) -> Seq<SyncConcat<P>, Concat<P>>
where
    I: IntoIterator<Item = P>,
    P: Producer,
{
    let producers: Vec<P> = producers.into_iter().collect();
    if producers
        .iter()
        .all(|producer| detect(producer).preferred() == Some(Mode::Sync))
    {
        Seq::Sync(SyncConcat {
            pending: producers.into_iter(),
            current: None,
        })
    } else {
        let identity: fn(P) -> P = std::convert::identity;
        Seq::Async(FlatMap::new(IterCursor::new(producers.into_iter()), identity))
    }
}
