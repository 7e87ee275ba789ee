use thiserror::Error;

/// Errors raised by the worker engine.
#[derive(Debug, Error)]
pub enum PoolError {
    /// A pool was asked to run with zero worker threads — a pool that
    /// could never make progress, so this is a hard precondition error
    /// rather than a silently accepted no-op pool.
    #[error("pool requires at least one worker thread")]
    ZeroThreads,

    /// A task was submitted after the pool entered phase 1 of shutdown.
    #[error("pool is shutting down, no new work accepted")]
    ShuttingDown,
}
