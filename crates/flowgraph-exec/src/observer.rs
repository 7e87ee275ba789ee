//! Uniform instrumentation: replace every node's transform with one
//! built by an observer function, given the node it is replacing.

use flowgraph_core::{Node, NodeFn};
use flowgraph_pool::Transform;
use std::sync::Arc;

/// Map `obs` over every vertex (pre-order): `obs` receives the node
/// before replacement and returns the transform that takes its place.
/// The canonical use wraps the existing `f` in a closure that opens a
/// `tracing::info_span!` before calling through.
pub fn observer_rewrite<T>(node: &mut Node<T>, obs: &impl Fn(&Node<T>) -> Arc<dyn Transform<T, T>>)
where
    T: Send + Sync + 'static,
{
    let replacement = obs(node);
    node.f = Some(NodeFn::Single(replacement));
    for child in &mut node.children {
        observer_rewrite(child, obs);
    }
}

/// A ready-made observer: wraps each node's existing single-valued
/// transform in a `tracing::info_span!` covering the call, recording the
/// node's id. Multimap nodes are left untouched — the uniform wrap only
/// applies to the single-valued shape this rewrite installs.
pub fn timing_observer<T>() -> impl Fn(&Node<T>) -> Arc<dyn Transform<T, T>>
where
    T: Send + Sync + 'static,
{
    move |node: &Node<T>| {
        let node_id = node.id;
        match &node.f {
            Some(NodeFn::Single(inner)) => {
                let inner = Arc::clone(inner);
                Arc::new(move |x: T| {
                    let span = tracing::info_span!("node", id = node_id.0);
                    let _enter = span.enter();
                    inner.apply(x)
                }) as Arc<dyn Transform<T, T>>
            }
            _ => Arc::new(|x: T| x) as Arc<dyn Transform<T, T>>,
        }
    }
}
