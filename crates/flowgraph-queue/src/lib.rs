//! Queue primitives for flowgraph: an unbounded FIFO and a bounded
//! priority queue, both safe for concurrent offer/poll from any number of
//! threads and both non-blocking on poll.

mod error;
mod local_queue;
mod priority_queue;

pub use error::QueueError;
pub use local_queue::LocalQueue;
pub use priority_queue::{PriorityItem, PriorityQueue};
