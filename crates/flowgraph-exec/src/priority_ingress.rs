//! Priority ingress: replace a root's FIFO with a bounded min-heap
//! ordered by a caller-supplied priority function.

use crate::error::ExecError;
use crate::pool_exec::queue_rewrite;
use flowgraph_core::{Node, NodeFn, Shutdowner};
use flowgraph_pool::{default_yield, work, ExecStrategy, Pool, Sink, Source, WorkBundle};
use flowgraph_queue::{PriorityItem, PriorityQueue, QueueError};
use std::sync::Arc;

/// Tunables for `priority_in`. Defaults to a 200-item ingress before
/// `offer` starts rejecting.
pub struct PriorityConfig {
    pub capacity: usize,
}

impl Default for PriorityConfig {
    fn default() -> Self {
        PriorityConfig { capacity: 200 }
    }
}

struct PrioritySource<T, P: Ord> {
    queue: Arc<PriorityQueue<T, P>>,
}

impl<T: Send + Sync + PartialEq, P: Ord + Send + Sync> Source<PriorityItem<T, P>> for PrioritySource<T, P> {
    fn poll(&self) -> Option<PriorityItem<T, P>> {
        self.queue.poll()
    }
}

/// A handle to a priority-ingress root: `offer`/`offer_unique` score the
/// value with the configured priority function and enqueue it.
pub struct PriorityHandle<T, P: Ord> {
    queue: Arc<PriorityQueue<T, P>>,
    prio_fn: Arc<dyn Fn(&T) -> P + Send + Sync>,
}

impl<T: Send + Sync + PartialEq + 'static, P: Ord + Send + Sync + 'static> PriorityHandle<T, P> {
    /// Score `value` via the configured priority function and enqueue
    /// it. Fails with `QueueError::Overflow` rather than silently
    /// dropping once the queue is at capacity.
    pub fn offer(&self, value: T) -> Result<(), QueueError> {
        let priority = (self.prio_fn)(&value);
        self.queue.offer(priority, value)
    }

    /// As `offer`, but a no-op if an equal value is already queued.
    pub fn offer_unique(&self, value: T) -> Result<bool, QueueError> {
        let priority = (self.prio_fn)(&value);
        self.queue.offer_unique(priority, value)
    }

    pub fn len(&self) -> usize {
        self.queue.len()
    }

    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }
}

/// Replace `root`'s ingress with a bounded priority queue and spawn its
/// worker pool directly (bypassing the generic `add_pool` pass, since
/// this node's input element type, `PriorityItem<T, P>`, differs from
/// every other node's `T`). `root.runtime.spawned` is set so a later
/// whole-tree `add_pool(&mut root)` call skips re-spawning the root and
/// only wires its descendants.
///
/// Requires `root.f` to already be a single-valued transform —
/// `ExecError::RootHasNoTransform` otherwise (covers both an empty root
/// and a multimap root, which this ingress does not support: a
/// multimap's sequence output has no single priority-scored slot to
/// re-enter through).
pub fn priority_in<T, P>(
    prio_fn: impl Fn(&T) -> P + Send + Sync + 'static,
    root: &mut Node<T>,
    config: PriorityConfig,
) -> Result<PriorityHandle<T, P>, ExecError>
where
    T: Clone + Send + Sync + PartialEq + 'static,
    P: Ord + Send + Sync + 'static,
{
    let transform = match &root.f {
        Some(NodeFn::Single(transform)) => Arc::clone(transform),
        _ => return Err(ExecError::RootHasNoTransform),
    };

    queue_rewrite(root);
    let output = root
        .runtime
        .as_ref()
        .and_then(|rt| rt.output.clone())
        .expect("queue_rewrite always wires a node's output");

    let queue: Arc<PriorityQueue<T, P>> = Arc::new(PriorityQueue::new(config.capacity));
    let source = Arc::new(PrioritySource {
        queue: Arc::clone(&queue),
    }) as Arc<dyn Source<PriorityItem<T, P>>>;

    let exec: Arc<ExecStrategy<PriorityItem<T, P>, T>> = Arc::new(ExecStrategy::sync(move |wrapped: PriorityItem<T, P>| {
        let PriorityItem { item, callback, .. } = wrapped;
        let result = transform.apply(item.clone());
        if let Some(callback) = callback {
            callback(&item);
        }
        result
    }));

    let threads = root
        .threads
        .unwrap_or_else(|| std::thread::available_parallelism().map(|n| n.get()).unwrap_or(1));
    let scheduler = move || WorkBundle {
        input: Arc::clone(&source),
        output: Arc::clone(&output),
        exec: Arc::clone(&exec),
    };
    let work_fn = work(scheduler, default_yield());
    let pool = Arc::new(Pool::queue_work(format!("priority-root-{}", root.id.0), threads, work_fn)?);

    root.shutdown.push(Arc::new(move || {
        flowgraph_pool::two_phase_shutdown(pool.as_ref());
    }) as Arc<dyn Shutdowner>);
    root.runtime.as_mut().expect("queue_rewrite sets root.runtime").spawned = true;

    Ok(PriorityHandle {
        queue,
        prio_fn: Arc::new(prio_fn),
    })
}
