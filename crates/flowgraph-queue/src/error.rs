use thiserror::Error;

/// Errors raised by the queue primitives.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum QueueError {
    /// A bounded queue rejected an offer because it was at capacity. A
    /// full priority queue never silently drops an offered item.
    #[error("queue at capacity ({capacity})")]
    Overflow {
        /// Capacity of the queue that rejected the offer.
        capacity: usize,
    },
}
