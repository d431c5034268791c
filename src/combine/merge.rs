//! First-ready-wins merging of concurrent inputs

use std::collections::VecDeque;
use std::task::{Context, Poll};

use crate::configuration::{MergeConfig, MergePriority};
use crate::cursor::Cursor;
use crate::error::{SeqError, SeqResult};
use crate::producer::{AsyncSeq, Producer, Seq, SeqOf};

/// One input, with at most one of its values waiting in the ready queue.
struct Lane<C> {
    cursor: Option<C>,
    buffered: bool,
}

/// Cursor yielding values from all inputs in the order they become ready.
///
/// Every input has at most one pull outstanding, and at most one value
/// buffered, at any time.
pub struct Merge<P: Producer> {
    lanes: Vec<Lane<SeqOf<P>>>,
    ready: VecDeque<(usize, P::Item)>,
    priority: MergePriority,
    next_lane: usize,
    failure: Option<SeqError>,
    done: bool,
}

impl<P: Producer> Merge<P> {
    pub fn new(producers: Vec<P>, config: MergeConfig) -> Self {
        Self {
            lanes: producers
                .into_iter()
                .map(|producer| Lane {
                    cursor: Some(Seq::from_producer(producer)),
                    buffered: false,
                })
                .collect(),
            ready: VecDeque::new(),
            priority: config.priority,
            next_lane: 0,
            failure: None,
            done: false,
        }
    }

    fn shutdown(&mut self) {
        if self.done {
            return;
        }
        self.done = true;
        self.ready.clear();
        self.failure = None;
        self.release_lanes();
    }

    /// Terminate every input still running; values already queued stay.
    fn release_lanes(&mut self) {
        let mut live = 0;
        for lane in &mut self.lanes {
            if let Some(mut cursor) = lane.cursor.take() {
                cursor.terminate();
                live += 1;
            }
        }
        if live > 0 {
            log::debug!("merge terminated {} live inputs", live);
        }
    }
}

impl<P: Producer> Cursor for Merge<P> {
    type Item = P::Item;

    fn poll_pull(&mut self, cx: &mut Context<'_>) -> Poll<SeqResult<Option<P::Item>>> {
        if self.done {
            return Poll::Ready(Ok(None));
        }

        let lanes = self.lanes.len();
        let start = match self.priority {
            MergePriority::InputOrder => 0,
            MergePriority::Rotating => self.next_lane,
        };

        for offset in 0..lanes {
            if self.failure.is_some() {
                break;
            }
            let index = (start + offset) % lanes;
            let lane = &mut self.lanes[index];
            if lane.buffered {
                continue;
            }
            let Some(cursor) = lane.cursor.as_mut() else {
                continue;
            };
            match cursor.poll_pull(cx) {
                Poll::Ready(Ok(Some(item))) => {
                    lane.buffered = true;
                    self.ready.push_back((index, item));
                }
                Poll::Ready(Ok(None)) => lane.cursor = None,
                Poll::Ready(Err(err)) => {
                    lane.cursor = None;
                    self.release_lanes();
                    self.failure = Some(err);
                }
                Poll::Pending => {}
            }
        }

        if let Some((index, item)) = self.ready.pop_front() {
            self.lanes[index].buffered = false;
            self.next_lane = (index + 1) % lanes;
            return Poll::Ready(Ok(Some(item)));
        }

        if let Some(err) = self.failure.take() {
            self.shutdown();
            return Poll::Ready(Err(err));
        }

        if self.lanes.iter().all(|lane| lane.cursor.is_none()) {
            self.done = true;
            self.lanes.clear();
            return Poll::Ready(Ok(None));
        }

        // Every live input was polled and registered the waker.
        Poll::Pending
    }

    fn terminate(&mut self) {
        self.shutdown();
    }
}

impl<P: Producer> Drop for Merge<P> {
    fn drop(&mut self) {
        self.shutdown();
    }
}

/// Yield values from all producers as soon as each becomes available.
///
/// When several inputs are ready at once, the earlier-provided input wins.
/// A failing input terminates all others at once. Values that had already
/// arrived are still yielded before the failure is reported.
pub fn merge<P, I>(producers: I) -> AsyncSeq<P::Item, Merge<P>>
where
    I: IntoIterator<Item = P>,
    P: Producer,
{
    merge_with(MergeConfig::default(), producers)
}

/// [`merge`] with an explicit configuration
pub fn merge_with<P, I>(config: MergeConfig, producers: I) -> AsyncSeq<P::Item, Merge<P>>
where
    I: IntoIterator<Item = P>,
    P: Producer,
{
    Seq::Async(Merge::new(producers.into_iter().collect(), config))
}
