//! Round-robin interleaving

use futures_core::ready;
use std::task::{Context, Poll};

use crate::cursor::Cursor;
use crate::error::SeqResult;
use crate::producer::{detect, Mode, Producer, Seq, SeqOf};

/// One input: extracted the first time its turn comes up.
struct Slot<P: Producer> {
    idle: Option<P>,
    live: Option<SeqOf<P>>,
}

impl<P: Producer> Slot<P> {
    fn new(producer: P) -> Self {
        Self {
            idle: Some(producer),
            live: None,
        }
    }

    fn activate(&mut self) -> &mut SeqOf<P> {
        let idle = &mut self.idle;
        self.live.get_or_insert_with(|| match idle.take() {
            Some(producer) => Seq::from_producer(producer),
            None => Seq::empty(),
        })
    }
}

/// Index of the slot after `turn`, once a slot was removed or a value taken.
fn wrap(turn: usize, len: usize) -> usize {
    if turn >= len {
        0
    } else {
        turn
    }
}

/// Iterator taking one element from each synchronous input in turn.
#[must_use = "iterators are lazy and do nothing unless consumed"]
pub struct SyncInterleave<P: Producer> {
    slots: Vec<Slot<P>>,
    turn: usize,
}

impl<P: Producer> Iterator for SyncInterleave<P> {
    type Item = P::Item;

    fn next(&mut self) -> Option<P::Item> {
        while !self.slots.is_empty() {
            match self.slots[self.turn].activate().next_sync() {
                Some(item) => {
                    self.turn = wrap(self.turn + 1, self.slots.len());
                    return Some(item);
                }
                None => {
                    self.slots.remove(self.turn);
                    self.turn = wrap(self.turn, self.slots.len());
                }
            }
        }
        None
    }
}

/// Cursor taking one element from each input in turn.
///
/// An input that is waiting keeps its turn; exhausted inputs leave the
/// rotation.
pub struct Interleave<P: Producer> {
    slots: Vec<Slot<P>>,
    turn: usize,
    done: bool,
}

impl<P: Producer> Interleave<P> {
    pub fn new(producers: Vec<P>) -> Self {
        Self {
            slots: producers.into_iter().map(Slot::new).collect(),
            turn: 0,
            done: false,
        }
    }

    /// Terminate every input that was ever pulled; untouched ones are left
    /// alone.
    fn shutdown(&mut self) {
        if self.done {
            return;
        }
        self.done = true;
        let mut live = 0;
        for slot in &mut self.slots {
            if let Some(cursor) = slot.live.as_mut() {
                cursor.terminate();
                live += 1;
            }
        }
        if live > 0 {
            log::debug!("interleave terminated {} live inputs", live);
        }
        self.slots.clear();
    }
}

impl<P: Producer> Cursor for Interleave<P> {
    type Item = P::Item;

    fn poll_pull(&mut self, cx: &mut Context<'_>) -> Poll<SeqResult<Option<P::Item>>> {
        loop {
            if self.done {
                return Poll::Ready(Ok(None));
            }
            if self.slots.is_empty() {
                self.done = true;
                return Poll::Ready(Ok(None));
            }

            let pulled = ready!(self.slots[self.turn].activate().poll_pull(cx));
            match pulled {
                Ok(Some(item)) => {
                    self.turn = wrap(self.turn + 1, self.slots.len());
                    return Poll::Ready(Ok(Some(item)));
                }
                Ok(None) => {
                    self.slots.remove(self.turn);
                    self.turn = wrap(self.turn, self.slots.len());
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

impl<P: Producer> Drop for Interleave<P> {
    fn drop(&mut self) {
        self.shutdown();
    }
}

/// Yield one element from each producer in turn until all are done.
///
/// Producers are extracted lazily, on their first turn. When every producer is
/// synchronous the result is synchronous too.
pub fn interleave<P, I>(producers: I) -> Seq<SyncInterleave<P>, Interleave<P>>
where
    I: IntoIterator<Item = P>,
    P: Producer,
{
    let producers: Vec<P> = producers.into_iter().collect();
    if producers
        .iter()
        .all(|producer| detect(producer).preferred() == Some(Mode::Sync))
    {
        Seq::Sync(SyncInterleave {
            slots: producers.into_iter().map(Slot::new).collect(),
            turn: 0,
        })
    } else {
        Seq::Async(Interleave::new(producers))
    }
}
