//! Pairwise zipping of two inputs

use std::task::{Context, Poll};

use crate::cursor::Cursor;
use crate::error::SeqResult;
use crate::producer::{Producer, Seq, SeqOf};

/// Iterator pairing two synchronous inputs; both are dropped once either ends.
#[must_use = "iterators are lazy and do nothing unless consumed"]
pub struct SyncZip<A, B> {
    left: Option<A>,
    right: Option<B>,
}

impl<A, B> Iterator for SyncZip<A, B>
where
    A: Iterator,
    B: Iterator,
{
    type Item = (A::Item, B::Item);

    fn next(&mut self) -> Option<Self::Item> {
        let left = self.left.as_mut()?.next();
        let right = self.right.as_mut()?.next();
        match (left, right) {
            (Some(left), Some(right)) => Some((left, right)),
            _ => {
                self.left = None;
                self.right = None;
                None
            }
        }
    }
}

/// Cursor pairing two inputs.
///
/// Both sides are pulled together; as soon as either is done or fails, both
/// are terminated.
pub struct Zip<A, B>
where
    A: Cursor,
    B: Cursor,
{
    left: A,
    right: B,
    left_item: Option<A::Item>,
    right_item: Option<B::Item>,
    done: bool,
}

impl<A, B> Zip<A, B>
where
    A: Cursor,
    B: Cursor,
{
    pub fn new(left: A, right: B) -> Self {
        Self {
            left,
            right,
            left_item: None,
            right_item: None,
            done: false,
        }
    }

    fn finish(&mut self) {
        if self.done {
            return;
        }
        self.done = true;
        self.left_item = None;
        self.right_item = None;
        log::debug!("zip finished, terminating both inputs");
        self.left.terminate();
        self.right.terminate();
    }
}

impl<A, B> Cursor for Zip<A, B>
where
    A: Cursor,
    B: Cursor,
{
    type Item = (A::Item, B::Item);

    fn poll_pull(&mut self, cx: &mut Context<'_>) -> Poll<SeqResult<Option<Self::Item>>> {
        if self.done {
            return Poll::Ready(Ok(None));
        }

        let mut exhausted = false;
        if self.left_item.is_none() {
            if let Poll::Ready(pulled) = self.left.poll_pull(cx) {
                match pulled {
                    Ok(Some(item)) => self.left_item = Some(item),
                    Ok(None) => exhausted = true,
                    Err(err) => {
                        self.finish();
                        return Poll::Ready(Err(err));
                    }
                }
            }
        }
        if self.right_item.is_none() {
            if let Poll::Ready(pulled) = self.right.poll_pull(cx) {
                match pulled {
                    Ok(Some(item)) => self.right_item = Some(item),
                    Ok(None) => exhausted = true,
                    Err(err) => {
                        self.finish();
                        return Poll::Ready(Err(err));
                    }
                }
            }
        }

        if exhausted {
            self.finish();
            return Poll::Ready(Ok(None));
        }

        match (self.left_item.take(), self.right_item.take()) {
            (Some(left), Some(right)) => Poll::Ready(Ok(Some((left, right)))),
            (left, right) => {
                self.left_item = left;
                self.right_item = right;
                Poll::Pending
            }
        }
    }

    fn terminate(&mut self) {
        self.finish();
    }
}

impl<A, B> Drop for Zip<A, B>
where
    A: Cursor,
    B: Cursor,
{
    fn drop(&mut self) {
        self.finish();
    }
}

/// Pair up the elements of two producers; the result is as long as the
/// shorter input.
///
/// Stays synchronous when both inputs are.
pub fn zip<A, B>(left: A, right: B) -> Seq<SyncZip<A::Iter, B::Iter>, Zip<SeqOf<A>, SeqOf<B>>>
where
    A: Producer,
    B: Producer,
{
    match (Seq::from_producer(left), Seq::from_producer(right)) {
        (Seq::Sync(left), Seq::Sync(right)) => Seq::Sync(SyncZip {
            left: Some(left),
            right: Some(right),
        }),
        (left, right) => Seq::Async(Zip::new(left, right)),
    }
}
