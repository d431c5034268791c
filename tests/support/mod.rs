// Test doubles shared by the integration tests
#![allow(dead_code)]

use async_stream::stream;
use futures::Stream;
use lazyseq::source::StreamCursor;
use lazyseq::{AsyncSeq, Capabilities, Cursor, IterCursor, Mode, Producer, Seq, SeqError, SeqResult};
use std::cell::Cell;
use std::rc::Rc;
use std::task::{Context, Poll};
use std::time::Duration;

/// Records how a test double was driven.
#[derive(Default)]
pub struct Probe {
    pulls: Cell<usize>,
    terminations: Cell<usize>,
    drops: Cell<usize>,
}

impl Probe {
    pub fn pulls(&self) -> usize {
        self.pulls.get()
    }

    pub fn terminations(&self) -> usize {
        self.terminations.get()
    }

    pub fn terminated(&self) -> bool {
        self.terminations.get() > 0
    }

    pub fn dropped(&self) -> bool {
        self.drops.get() > 0
    }
}

/// Asynchronous cursor over an iterator that records pulls and termination
/// requests.
pub struct Tracked<I> {
    iter: Option<I>,
    probe: Rc<Probe>,
}

pub fn tracked<T: IntoIterator>(items: T) -> (Tracked<T::IntoIter>, Rc<Probe>) {
    let probe = Rc::new(Probe::default());
    let cursor = Tracked {
        iter: Some(items.into_iter()),
        probe: probe.clone(),
    };
    (cursor, probe)
}

impl<I: Iterator> Cursor for Tracked<I> {
    type Item = I::Item;

    fn poll_pull(&mut self, _cx: &mut Context<'_>) -> Poll<SeqResult<Option<I::Item>>> {
        self.probe.pulls.set(self.probe.pulls.get() + 1);
        Poll::Ready(Ok(self.iter.as_mut().and_then(Iterator::next)))
    }

    fn terminate(&mut self) {
        self.probe.terminations.set(self.probe.terminations.get() + 1);
        self.iter = None;
    }
}

/// Synchronous iterator that records pulls and being dropped.
pub struct Counted<I> {
    iter: I,
    probe: Rc<Probe>,
}

pub fn counted<T: IntoIterator>(items: T) -> (Counted<T::IntoIter>, Rc<Probe>) {
    let probe = Rc::new(Probe::default());
    let iter = Counted {
        iter: items.into_iter(),
        probe: probe.clone(),
    };
    (iter, probe)
}

impl<I: Iterator> Iterator for Counted<I> {
    type Item = I::Item;

    fn next(&mut self) -> Option<I::Item> {
        self.probe.pulls.set(self.probe.pulls.get() + 1);
        self.iter.next()
    }
}

impl<I> Drop for Counted<I> {
    fn drop(&mut self) {
        self.probe.drops.set(self.probe.drops.get() + 1);
    }
}

/// Cursor whose every pull fails.
pub struct Explosive<T> {
    probe: Rc<Probe>,
    _item: std::marker::PhantomData<T>,
}

pub fn explosive<T>() -> (Explosive<T>, Rc<Probe>) {
    let probe = Rc::new(Probe::default());
    let cursor = Explosive {
        probe: probe.clone(),
        _item: std::marker::PhantomData,
    };
    (cursor, probe)
}

impl<T> Cursor for Explosive<T> {
    type Item = T;

    fn poll_pull(&mut self, _cx: &mut Context<'_>) -> Poll<SeqResult<Option<T>>> {
        self.probe.pulls.set(self.probe.pulls.get() + 1);
        Poll::Ready(Err(SeqError::Upstream("boom".to_string())))
    }

    fn terminate(&mut self) {
        self.probe.terminations.set(self.probe.terminations.get() + 1);
    }
}

/// Cursor that yields its values, then fails with a custom error.
pub struct Faulty<I> {
    iter: I,
    probe: Rc<Probe>,
}

pub fn faulty<T: IntoIterator>(items: T) -> (Faulty<T::IntoIter>, Rc<Probe>) {
    let probe = Rc::new(Probe::default());
    let cursor = Faulty {
        iter: items.into_iter(),
        probe: probe.clone(),
    };
    (cursor, probe)
}

impl<I: Iterator> Cursor for Faulty<I> {
    type Item = I::Item;

    fn poll_pull(&mut self, _cx: &mut Context<'_>) -> Poll<SeqResult<Option<I::Item>>> {
        self.probe.pulls.set(self.probe.pulls.get() + 1);
        match self.iter.next() {
            Some(item) => Poll::Ready(Ok(Some(item))),
            None => Poll::Ready(Err(SeqError::Custom("fault".to_string()))),
        }
    }

    fn terminate(&mut self) {
        self.probe.terminations.set(self.probe.terminations.get() + 1);
    }
}

/// Iterator that reports the end once, then carries on.
pub struct Relapsing {
    calls: u32,
}

pub fn relapsing() -> Relapsing {
    Relapsing { calls: 0 }
}

impl Iterator for Relapsing {
    type Item = u32;

    fn next(&mut self) -> Option<u32> {
        self.calls += 1;
        match self.calls {
            2 => None,
            n => Some(n),
        }
    }
}

/// Yields each value after its delay in milliseconds.
pub fn delayed<T>(items: Vec<(T, u64)>) -> AsyncSeq<T, StreamCursor<impl Stream<Item = T>>> {
    lazyseq::from_stream(stream! {
        for (value, millis) in items {
            tokio::time::sleep(Duration::from_millis(millis)).await;
            yield value;
        }
    })
}

/// Producer offering both protocols.
pub struct Dual(pub Vec<i32>);

impl Producer for Dual {
    type Item = i32;
    type Iter = std::vec::IntoIter<i32>;
    type Cursor = IterCursor<std::vec::IntoIter<i32>>;

    fn capabilities(&self) -> Capabilities {
        Capabilities::BOTH
    }

    fn into_seq(self, mode: Mode) -> Seq<Self::Iter, Self::Cursor> {
        match mode {
            Mode::Sync => Seq::Sync(self.0.into_iter()),
            Mode::Async => Seq::Async(IterCursor::new(self.0.into_iter())),
        }
    }
}

pub fn fibonacci() -> impl Iterator<Item = u64> {
    std::iter::successors(Some((0u64, 1u64)), |&(a, b)| Some((b, a + b))).map(|(a, _)| a)
}
