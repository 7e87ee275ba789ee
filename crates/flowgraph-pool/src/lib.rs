//! Fixed-size worker pools, a generic poll/execute/yield worker loop, and
//! the two-phase shutdown and scheduling machinery built on top of them.
//! See `crates::pool`, `crates::worker`, `crates::shutdown`, and
//! `crates::schedule` for the per-concern detail.

mod convenience;
mod error;
mod pool;
mod schedule;
mod shutdown;
mod worker;

pub use convenience::{do_work, filter_work, map_work, reduce_work, seq_work, PoolSize};
pub use error::PoolError;
pub use pool::Pool;
pub use schedule::{schedule_many, schedule_work, ScheduleHandle};
pub use shutdown::{exited_worker_count, two_phase_shutdown, ShutdownOutcome};
pub use worker::{
    default_yield, sleepy_yield, work, AsyncTransform, ExecStrategy, Sink, Source, Transform,
    WorkBundle,
};
