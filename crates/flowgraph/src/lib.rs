//! # flowgraph - dataflow graph of concurrent workers
//!
//! Build a tree of transforms with a cursor/zipper API, then lower it
//! either into one composed closure (sync mode, for tests and batch
//! runs) or into a set of pool-backed nodes joined by queues (pool
//! mode, for a long-running service).
//!
//! ## Quick start
//!
//! ```ignore
//! use flowgraph::{Graph, run_sync};
//!
//! let mut cursor = Graph::<i32>::new();
//! cursor = cursor.each(|x: i32| x, Default::default());
//! cursor = cursor.each(|x: i32| x * 2, Default::default());
//! let root = cursor.root().into_root();
//!
//! run_sync(&root, vec![1, 2, 3]);
//! ```
//!
//! ## Architecture
//!
//! ```text
//! flowgraph-queue   LocalQueue, PriorityQueue
//! flowgraph-pool    Pool, work(), schedule_work, two_phase_shutdown
//! flowgraph-core    Node, Cursor, builder ops
//! flowgraph-exec    comp_rewrite/run_sync, queue_rewrite/add_pool/run_pool,
//!                    priority_in, schedule_refill, observer_rewrite, pub/sub
//! ```

// Re-export the queue primitives.
pub use flowgraph_queue::{LocalQueue, PriorityItem, PriorityQueue, QueueError};

// Re-export the worker engine.
pub use flowgraph_pool::{
    default_yield, do_work, filter_work, map_work, reduce_work, schedule_many, schedule_work,
    seq_work, sleepy_yield, two_phase_shutdown, work, AsyncTransform, ExecStrategy, Pool,
    PoolError, PoolSize, ScheduleHandle, ShutdownOutcome, Sink, Source, Transform, WorkBundle,
};

// Re-export the graph model and builder.
pub use flowgraph_core::{
    append_child, filter_nodes, update_node, update_nodes, Cursor, Graph, GraphError, Node,
    NodeFn, NodeId, NodeOpts, NodeRuntime, Predicate, Shutdowner,
};

// Re-export the executors, ingress decorators, scheduling, instrumentation,
// pub/sub, and lifecycle helpers.
pub use flowgraph_exec::{
    add_pool, comp_rewrite, fifo_in, graph_rewrite, kill_graph, observer_rewrite, priority_in,
    publish, queue_rewrite, run_pool, run_sync, schedule_refill, subscribe, timing_observer,
    ExecError, GraphHandle, MessageBus, PriorityConfig, PriorityHandle, PublishConfig,
    RefillHandle, Rewrite, Store, StoreError, Subscriber,
};
