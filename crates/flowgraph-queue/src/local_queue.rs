//! Unbounded multi-producer/multi-consumer FIFO queue.
//!
//! A lock-guarded `VecDeque` behind `std::sync::Mutex` rather than a
//! spinlock: this queue sits on the public API surface of a
//! general-purpose library, not a scheduler hot path, so a parking mutex
//! is the right trade-off.

use std::collections::VecDeque;
use std::sync::Mutex;

/// An unbounded FIFO queue safe for concurrent offer/poll from any number
/// of threads.
///
/// `poll` never blocks: an empty queue returns `None` immediately, which is
/// the signal the worker loop (`flowgraph_pool::work`) uses to decide
/// whether to yield.
pub struct LocalQueue<T> {
    buffer: Mutex<VecDeque<T>>,
}

impl<T> LocalQueue<T> {
    /// Create an empty queue.
    pub fn new() -> Self {
        Self {
            buffer: Mutex::new(VecDeque::new()),
        }
    }

    /// Enqueue `value`. Always succeeds — the queue is unbounded.
    pub fn offer(&self, value: T) {
        self.buffer.lock().unwrap().push_back(value);
    }

    /// Dequeue the oldest value, or `None` if the queue is empty.
    pub fn poll(&self) -> Option<T> {
        self.buffer.lock().unwrap().pop_front()
    }

    /// Whether the queue currently holds no items.
    ///
    /// This is a snapshot: under concurrent offers it may be stale by the
    /// time the caller acts on it.
    pub fn is_empty(&self) -> bool {
        self.buffer.lock().unwrap().is_empty()
    }

    /// Current number of queued items.
    pub fn len(&self) -> usize {
        self.buffer.lock().unwrap().len()
    }
}

impl<T: PartialEq> LocalQueue<T> {
    /// Enqueue `value` unless an equal value is already queued.
    ///
    /// Equality is checked against every currently buffered item, so `T`
    /// should be cheap to compare. Returns `true` if the value was
    /// enqueued, `false` if it was a no-op duplicate.
    pub fn offer_unique(&self, value: T) -> bool {
        let mut buffer = self.buffer.lock().unwrap();
        if buffer.contains(&value) {
            return false;
        }
        buffer.push_back(value);
        true
    }
}

impl<T> Default for LocalQueue<T> {
    fn default() -> Self {
        Self::new()
    }
}
