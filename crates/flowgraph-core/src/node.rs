//! The graph data model: `Node`, its identity, and the declarative vs.
//! runtime split described in the design notes — build-time fields live
//! directly on `Node`, lowering-populated fields live in `NodeRuntime`.

use crate::traits::{Predicate, Shutdowner};
use flowgraph_pool::{Sink, Source, Transform};
use std::any::TypeId;
use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

/// Stable node identity. Defaults to a content hash of the transform's
/// type and address plus a monotonic disambiguator — this is an
/// implementation detail, not a structural hash of behavior: two nodes
/// built from closures of identical behavior are not guaranteed to
/// collide or not collide.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(pub u64);

static NODE_DISAMBIGUATOR: AtomicU64 = AtomicU64::new(0);

fn default_node_id<F: 'static>(f: &F) -> NodeId {
    let mut hasher = DefaultHasher::new();
    TypeId::of::<F>().hash(&mut hasher);
    (f as *const F as usize).hash(&mut hasher);
    NODE_DISAMBIGUATOR.fetch_add(1, Ordering::Relaxed).hash(&mut hasher);
    NodeId(hasher.finish())
}

/// A node's transform, tagged by shape: a single value in, or a single
/// value in and a sequence out. Fusing the `f`/`multimap` pair into one
/// enum means a node can never claim `multimap` while holding a
/// single-output transform, or vice versa.
pub enum NodeFn<T> {
    Single(Arc<dyn Transform<T, T>>),
    Multi(Arc<dyn Transform<T, Vec<T>>>),
}

impl<T> NodeFn<T> {
    pub fn is_multimap(&self) -> bool {
        matches!(self, NodeFn::Multi(_))
    }
}

impl<T> Clone for NodeFn<T> {
    fn clone(&self) -> Self {
        match self {
            NodeFn::Single(f) => NodeFn::Single(Arc::clone(f)),
            NodeFn::Multi(f) => NodeFn::Multi(Arc::clone(f)),
        }
    }
}

/// Fields populated by a lowering pass (`queue_rewrite`, `fifo_in`,
/// `add_pool`) — absent on a freshly built, not-yet-lowered node.
pub struct NodeRuntime<T> {
    /// This node's own inbound queue, if running in pool mode.
    pub queue: Option<Arc<flowgraph_queue::LocalQueue<T>>>,
    /// Poll side of this node's input, handed to the worker loop.
    pub input: Option<Arc<dyn Source<T>>>,
    /// Push side used to fan this node's output out to its children.
    pub output: Option<Arc<dyn Sink<T>>>,
    /// Public ingress closure, set only on the root by `fifo_in`/`priority_in`.
    pub offer: Option<Arc<dyn Fn(T) + Send + Sync>>,
    /// Set once `add_pool` (or `priority_in`'s own root spawn) has started
    /// this node's worker pool, so a later whole-tree `add_pool` pass does
    /// not spawn a second pool for the same node.
    pub spawned: bool,
}

impl<T> Default for NodeRuntime<T> {
    fn default() -> Self {
        NodeRuntime {
            queue: None,
            input: None,
            output: None,
            offer: None,
            spawned: false,
        }
    }
}

/// Construction-time options for `Node::new` / `Node::new_multimap`.
pub struct NodeOpts<T> {
    pub id: Option<NodeId>,
    pub when: Option<Arc<dyn Predicate<T>>>,
    pub threads: Option<usize>,
}

impl<T> Default for NodeOpts<T> {
    fn default() -> Self {
        NodeOpts {
            id: None,
            when: None,
            threads: None,
        }
    }
}

/// A vertex in the dataflow tree: a transform plus its children.
pub struct Node<T> {
    pub id: NodeId,
    pub f: Option<NodeFn<T>>,
    pub children: Vec<Node<T>>,
    pub when: Option<Arc<dyn Predicate<T>>>,
    pub threads: Option<usize>,
    pub shutdown: Vec<Arc<dyn Shutdowner>>,
    pub runtime: Option<NodeRuntime<T>>,
}

impl<T: Send + Sync + 'static> Node<T> {
    /// A node whose `f` maps one value to one value.
    pub fn new<F>(f: F, opts: NodeOpts<T>) -> Self
    where
        F: Transform<T, T> + 'static,
    {
        let id = opts.id.unwrap_or_else(|| default_node_id(&f));
        Node {
            id,
            f: Some(NodeFn::Single(Arc::new(f))),
            children: Vec::new(),
            when: opts.when,
            threads: opts.threads,
            shutdown: Vec::new(),
            runtime: None,
        }
    }

    /// A node whose `f` maps one value to a sequence of values, each
    /// forwarded to children independently.
    pub fn new_multimap<F>(f: F, opts: NodeOpts<T>) -> Self
    where
        F: Transform<T, Vec<T>> + 'static,
    {
        let id = opts.id.unwrap_or_else(|| default_node_id(&f));
        Node {
            id,
            f: Some(NodeFn::Multi(Arc::new(f))),
            children: Vec::new(),
            when: opts.when,
            threads: opts.threads,
            shutdown: Vec::new(),
            runtime: None,
        }
    }

    /// A placeholder root with no transform — the starting point for a
    /// fresh `Cursor`, and the shape `priority_in` rejects with
    /// `ExecError::RootHasNoTransform` until a transform is attached.
    pub fn empty() -> Self {
        let id = NodeId(NODE_DISAMBIGUATOR.fetch_add(1, Ordering::Relaxed));
        Node {
            id,
            f: None,
            children: Vec::new(),
            when: None,
            threads: None,
            shutdown: Vec::new(),
            runtime: None,
        }
    }

    pub fn is_multimap(&self) -> bool {
        self.f.as_ref().map(NodeFn::is_multimap).unwrap_or(false)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_ids_are_unique_even_for_identical_closures() {
        let a: Node<i32> = Node::new(|x: i32| x, NodeOpts::default());
        let b: Node<i32> = Node::new(|x: i32| x, NodeOpts::default());
        assert_ne!(a.id, b.id);
    }

    #[test]
    fn explicit_id_overrides_default() {
        let n: Node<i32> = Node::new(|x: i32| x, NodeOpts {
            id: Some(NodeId(42)),
            ..Default::default()
        });
        assert_eq!(n.id, NodeId(42));
    }

    #[test]
    fn multimap_flag_follows_constructor() {
        let single: Node<i32> = Node::new(|x: i32| x, NodeOpts::default());
        let multi: Node<i32> = Node::new_multimap(|x: i32| vec![x, x], NodeOpts::default());
        assert!(!single.is_multimap());
        assert!(multi.is_multimap());
    }
}
