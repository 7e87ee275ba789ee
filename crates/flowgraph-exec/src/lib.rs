//! Lowering passes that turn a declarative graph into something that
//! runs: inline composition (sync mode), or pool-backed nodes joined by
//! queues (pool mode) — plus the ingress, scheduling, instrumentation,
//! and pub/sub decorators layered on top of either.

mod error;
mod kill;
mod observer;
mod pool_exec;
mod priority_ingress;
mod pubsub;
mod refill;
mod rewrite;
mod sync_exec;

pub use error::ExecError;
pub use kill::kill_graph;
pub use observer::{observer_rewrite, timing_observer};
pub use pool_exec::{add_pool, fifo_in, queue_rewrite, run_pool, GraphHandle};
pub use priority_ingress::{priority_in, PriorityConfig, PriorityHandle};
pub use pubsub::{publish, subscribe, MessageBus, PublishConfig, Store, StoreError, Subscriber};
pub use refill::{schedule_refill, RefillHandle};
pub use rewrite::{graph_rewrite, Rewrite};
pub use sync_exec::{comp_rewrite, run_sync};
