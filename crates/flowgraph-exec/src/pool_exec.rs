//! Pool mode: each node gets its own worker pool, connected to its
//! children by unbounded `LocalQueue` edges, generalized from one
//! pipeline stage to an arbitrary tree.

use crate::error::ExecError;
use flowgraph_core::{Node, NodeFn, NodeRuntime, Predicate};
use flowgraph_pool::{default_yield, work, ExecStrategy, Pool, Sink, Source, WorkBundle};
use flowgraph_queue::LocalQueue;
use std::sync::Arc;

/// A `Source` over one child edge's queue, filtering out values its
/// node's `when` predicate rejects before they are ever handed to `f`.
struct GatedSource<T> {
    queue: Arc<LocalQueue<T>>,
    when: Option<Arc<dyn Predicate<T>>>,
}

impl<T: Send + Sync> Source<T> for GatedSource<T> {
    fn poll(&self) -> Option<T> {
        loop {
            let item = self.queue.poll()?;
            match &self.when {
                Some(pred) if !pred.test(&item) => continue,
                _ => return Some(item),
            }
        }
    }
}

/// A `Sink` that fans a single value out to every child edge queue.
struct FanOutSink<T> {
    children: Vec<Arc<LocalQueue<T>>>,
}

impl<T: Clone + Send + Sync> Sink<T> for FanOutSink<T> {
    fn send(&self, value: T) {
        for queue in &self.children {
            queue.offer(value.clone());
        }
    }
}

/// A `Sink` for leaves: nothing downstream consumes the value, so it is
/// dropped. The leaf's `f` still ran for its side effects.
struct NoopSink;

impl<T: Send> Sink<T> for NoopSink {
    fn send(&self, _value: T) {}
}

/// Allocate one `LocalQueue` per child edge, wiring each child's `input`
/// to the poll side and this node's `output` to a fan-out over all of
/// them. Recurses into every descendant.
pub fn queue_rewrite<T>(node: &mut Node<T>)
where
    T: Clone + Send + Sync + 'static,
{
    let mut child_queues = Vec::with_capacity(node.children.len());
    for child in &mut node.children {
        let queue = Arc::new(LocalQueue::new());
        let when = child.when.clone();
        let source = Arc::new(GatedSource {
            queue: Arc::clone(&queue),
            when,
        });
        let rt = child.runtime.get_or_insert_with(NodeRuntime::default);
        rt.queue = Some(Arc::clone(&queue));
        rt.input = Some(source as Arc<dyn Source<T>>);
        child_queues.push(queue);
    }

    let output: Arc<dyn Sink<T>> = if child_queues.is_empty() {
        Arc::new(NoopSink)
    } else {
        Arc::new(FanOutSink { children: child_queues })
    };
    node.runtime.get_or_insert_with(NodeRuntime::default).output = Some(output);

    for child in &mut node.children {
        queue_rewrite(child);
    }
}

/// Give the root its own ingress queue and return the public `offer`
/// closure — the entry point `run_pool` callers use to feed data in.
pub fn fifo_in<T>(root: &mut Node<T>) -> Arc<dyn Fn(T) + Send + Sync>
where
    T: Clone + Send + Sync + 'static,
{
    let queue = Arc::new(LocalQueue::new());
    let when = root.when.clone();
    let source = Arc::new(GatedSource {
        queue: Arc::clone(&queue),
        when,
    });
    let rt = root.runtime.get_or_insert_with(NodeRuntime::default);
    rt.queue = Some(Arc::clone(&queue));
    rt.input = Some(source as Arc<dyn Source<T>>);

    let offer_queue = queue;
    let offer: Arc<dyn Fn(T) + Send + Sync> = Arc::new(move |x: T| {
        offer_queue.offer(x);
    });
    rt.offer = Some(Arc::clone(&offer));
    offer
}

fn exec_for<T>(node: &Node<T>) -> Arc<ExecStrategy<T, T>>
where
    T: Send + Sync + 'static,
{
    match &node.f {
        None => Arc::new(ExecStrategy::sync(|x: T| x)),
        Some(NodeFn::Single(transform)) => {
            let transform = Arc::clone(transform);
            Arc::new(ExecStrategy::sync(move |x: T| transform.apply(x)))
        }
        Some(NodeFn::Multi(transform)) => {
            let transform = Arc::clone(transform);
            Arc::new(ExecStrategy::async_fn(move |x: T, out: &dyn Sink<T>| {
                for y in transform.apply(x) {
                    out.send(y);
                }
            }))
        }
    }
}

/// Walk every vertex (pre-order) and spawn a worker pool for it, wired to
/// the `input`/`output` `queue_rewrite`/`fifo_in` already populated.
/// Nodes whose pool was already spawned (e.g. the root, by `priority_in`)
/// are skipped, but their children are still visited.
pub fn add_pool<T>(node: &mut Node<T>) -> Result<(), ExecError>
where
    T: Send + Sync + 'static,
{
    let already_spawned = node.runtime.as_ref().map(|rt| rt.spawned).unwrap_or(false);
    if !already_spawned {
        let rt = node
            .runtime
            .as_ref()
            .expect("add_pool requires queue_rewrite/fifo_in to have run first");
        let input = rt.input.clone().expect("node has no input source wired");
        let output = rt.output.clone().expect("node has no output sink wired");
        let exec = exec_for(node);
        let threads = node
            .threads
            .unwrap_or_else(|| std::thread::available_parallelism().map(|n| n.get()).unwrap_or(1));

        let scheduler = move || WorkBundle {
            input: Arc::clone(&input),
            output: Arc::clone(&output),
            exec: Arc::clone(&exec),
        };
        let work_fn = work(scheduler, default_yield());
        let pool = Arc::new(Pool::queue_work(format!("node-{}", node.id.0), threads, work_fn)?);

        node.shutdown.push(Arc::new(move || {
            flowgraph_pool::two_phase_shutdown(pool.as_ref());
        }) as Arc<dyn flowgraph_core::Shutdowner>);
        node.runtime.as_mut().unwrap().spawned = true;
    }

    for child in &mut node.children {
        add_pool(child)?;
    }
    Ok(())
}

/// A handle to a running pool-mode graph: the public `offer` entry
/// point, plus the tree itself (needed by `kill_graph` to walk shutdown
/// thunks).
pub struct GraphHandle<T> {
    pub root: Node<T>,
    offer_fn: Arc<dyn Fn(T) + Send + Sync>,
    root_queue: Arc<LocalQueue<T>>,
}

impl<T: Send + Sync + Clone + 'static> GraphHandle<T> {
    pub fn offer(&self, value: T) {
        (self.offer_fn)(value);
    }

    pub fn is_empty(&self) -> bool {
        self.root_queue.is_empty()
    }

    /// Shared handles onto the offer closure and queue-emptiness check,
    /// used by `schedule_refill` to drive the root's ingress without
    /// reaching into private fields from another module.
    pub(crate) fn offer_fn(&self) -> Arc<dyn Fn(T) + Send + Sync> {
        Arc::clone(&self.offer_fn)
    }

    pub(crate) fn is_empty_fn(&self) -> Arc<dyn Fn() -> bool + Send + Sync>
    where
        T: Send + Sync,
    {
        let queue = Arc::clone(&self.root_queue);
        Arc::new(move || queue.is_empty())
    }
}

impl<T: Send + Sync + Clone + PartialEq + 'static> GraphHandle<T> {
    /// Offer `value` only if it is not already queued at the root.
    /// Returns `true` if it was enqueued, `false` if it was a no-op
    /// duplicate.
    pub fn offer_unique(&self, value: T) -> bool {
        self.root_queue.offer_unique(value)
    }
}

/// Lower `root` into pool mode end to end: allocate edge queues, wire
/// the root's FIFO ingress, and spawn every node's worker pool.
pub fn run_pool<T>(mut root: Node<T>) -> Result<GraphHandle<T>, ExecError>
where
    T: Clone + Send + Sync + 'static,
{
    queue_rewrite(&mut root);
    let offer_fn = fifo_in(&mut root);
    let root_queue = root
        .runtime
        .as_ref()
        .and_then(|rt| rt.queue.clone())
        .expect("fifo_in always sets the root queue");

    add_pool(&mut root)?;

    Ok(GraphHandle {
        root,
        offer_fn,
        root_queue,
    })
}
