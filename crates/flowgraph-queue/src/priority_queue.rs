//! Bounded priority queue with a dedup-on-offer mode.

use crate::error::QueueError;
use std::cmp::Ordering;
use std::collections::BinaryHeap;
use std::sync::Mutex;

/// An item wrapped with its priority and an optional completion callback.
///
/// The callback, if present, is invoked on the underlying item once the
/// node's transform has finished processing it (see `priority_in` in
/// `flowgraph-exec`), letting callers correlate completions with the
/// original offer without a side channel.
pub struct PriorityItem<T, P> {
    pub priority: P,
    pub item: T,
    pub callback: Option<Box<dyn FnOnce(&T) + Send>>,
}

impl<T, P> PriorityItem<T, P> {
    pub fn new(priority: P, item: T) -> Self {
        Self {
            priority,
            item,
            callback: None,
        }
    }

    pub fn with_callback(priority: P, item: T, callback: Box<dyn FnOnce(&T) + Send>) -> Self {
        Self {
            priority,
            item,
            callback: Some(callback),
        }
    }
}

impl<T: PartialEq, P> PartialEq for PriorityItem<T, P> {
    fn eq(&self, other: &Self) -> bool {
        self.item == other.item
    }
}

impl<T: PartialEq, P: Eq> Eq for PriorityItem<T, P> {}

impl<T: PartialEq, P: Ord> PartialOrd for PriorityItem<T, P> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl<T: PartialEq, P: Ord> Ord for PriorityItem<T, P> {
    fn cmp(&self, other: &Self) -> Ordering {
        // Reversed so that wrapping these in `std::collections::BinaryHeap`
        // (a max-heap) yields min-heap-by-priority semantics.
        other.priority.cmp(&self.priority)
    }
}

/// Bounded min-heap ordered by caller-supplied priority: `poll` returns
/// the item with the *smallest* priority value first. Built on
/// `std::collections::BinaryHeap` with `Ord` reversed on `PriorityItem`
/// (see above) rather than wrapping every push in `std::cmp::Reverse`.
pub struct PriorityQueue<T, P: Ord> {
    heap: Mutex<BinaryHeap<PriorityItem<T, P>>>,
    capacity: usize,
}

impl<T: PartialEq, P: Ord> PriorityQueue<T, P> {
    /// Default ingress bound for priority-ordered graph entry points.
    pub const DEFAULT_CAPACITY: usize = 200;

    pub fn new(capacity: usize) -> Self {
        Self {
            heap: Mutex::new(BinaryHeap::with_capacity(capacity.min(1024))),
            capacity,
        }
    }

    /// Offer a pre-wrapped priority item. Fails with `Overflow` once the
    /// queue holds `capacity` items — it never silently drops.
    pub fn offer_item(&self, item: PriorityItem<T, P>) -> Result<(), QueueError> {
        let mut heap = self.heap.lock().unwrap();
        if heap.len() >= self.capacity {
            return Err(QueueError::Overflow {
                capacity: self.capacity,
            });
        }
        heap.push(item);
        Ok(())
    }

    /// Offer a value with an explicit priority, no callback.
    pub fn offer(&self, priority: P, value: T) -> Result<(), QueueError> {
        self.offer_item(PriorityItem::new(priority, value))
    }

    /// Offer a value unless an item with equal payload is already queued.
    /// Returns `Ok(false)` for a no-op duplicate, `Ok(true)` if enqueued.
    pub fn offer_unique(&self, priority: P, value: T) -> Result<bool, QueueError> {
        let mut heap = self.heap.lock().unwrap();
        if heap.iter().any(|existing| existing.item == value) {
            return Ok(false);
        }
        if heap.len() >= self.capacity {
            return Err(QueueError::Overflow {
                capacity: self.capacity,
            });
        }
        heap.push(PriorityItem::new(priority, value));
        Ok(true)
    }

    /// Pop the highest-priority item, or `None` if the queue is empty.
    pub fn poll(&self) -> Option<PriorityItem<T, P>> {
        self.heap.lock().unwrap().pop()
    }

    pub fn is_empty(&self) -> bool {
        self.heap.lock().unwrap().is_empty()
    }

    pub fn len(&self) -> usize {
        self.heap.lock().unwrap().len()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cmp::Reverse;

    #[test]
    fn poll_returns_smallest_priority_first() {
        let q: PriorityQueue<i32, i32> = PriorityQueue::new(10);
        q.offer(1, 100).unwrap();
        q.offer(5, 500).unwrap();
        q.offer(3, 300).unwrap();

        assert_eq!(q.poll().map(|i| i.item), Some(100));
        assert_eq!(q.poll().map(|i| i.item), Some(300));
        assert_eq!(q.poll().map(|i| i.item), Some(500));
        assert!(q.poll().is_none());
    }

    #[test]
    fn negated_priority_gives_largest_value_first() {
        // Mirrors the end-to-end "priority ingress" scenario: offering
        // 3, 1, 2 with priority = -value drains as 3, 2, 1.
        let q: PriorityQueue<i32, i32> = PriorityQueue::new(10);
        q.offer(-3, 3).unwrap();
        q.offer(-1, 1).unwrap();
        q.offer(-2, 2).unwrap();

        assert_eq!(q.poll().map(|i| i.item), Some(3));
        assert_eq!(q.poll().map(|i| i.item), Some(2));
        assert_eq!(q.poll().map(|i| i.item), Some(1));
    }

    #[test]
    fn reverse_wrapper_also_works_for_largest_first() {
        let q: PriorityQueue<i32, Reverse<i32>> = PriorityQueue::new(10);
        q.offer(Reverse(3), 3).unwrap();
        q.offer(Reverse(1), 1).unwrap();
        q.offer(Reverse(2), 2).unwrap();

        assert_eq!(q.poll().map(|i| i.item), Some(3));
        assert_eq!(q.poll().map(|i| i.item), Some(2));
        assert_eq!(q.poll().map(|i| i.item), Some(1));
    }

    #[test]
    fn overflow_is_rejected_not_dropped() {
        let q: PriorityQueue<i32, i32> = PriorityQueue::new(2);
        q.offer(1, 1).unwrap();
        q.offer(2, 2).unwrap();
        let err = q.offer(3, 3).unwrap_err();
        assert_eq!(err, QueueError::Overflow { capacity: 2 });
        assert_eq!(q.len(), 2);
    }

    #[test]
    fn offer_unique_dedups() {
        let q: PriorityQueue<&str, i32> = PriorityQueue::new(10);
        assert!(q.offer_unique(1, "a").unwrap());
        assert!(!q.offer_unique(2, "a").unwrap());
        assert_eq!(q.len(), 1);
    }

    #[test]
    fn callback_runs_on_the_underlying_item() {
        use std::sync::atomic::{AtomicBool, Ordering};
        use std::sync::Arc;

        let ran = Arc::new(AtomicBool::new(false));
        let ran2 = Arc::clone(&ran);

        let q: PriorityQueue<i32, i32> = PriorityQueue::new(10);
        q.offer_item(PriorityItem::with_callback(
            1,
            42,
            Box::new(move |item| {
                assert_eq!(*item, 42);
                ran2.store(true, Ordering::SeqCst);
            }),
        ))
        .unwrap();

        let popped = q.poll().unwrap();
        if let Some(cb) = popped.callback {
            cb(&popped.item);
        }
        assert!(ran.load(Ordering::SeqCst));
    }
}
