//! Sync mode: one composed closure per graph, no queues, no pools. Set
//! up, run, return — generalized from a single pipeline to a tree,
//! memoized bottom-up per node.

use flowgraph_core::{Node, NodeFn, Predicate};
use std::sync::Arc;

type Mono<T> = Arc<dyn Fn(T) + Send + Sync>;

/// Compile `root` into a single composed closure. Each node's closure
/// already holds references to its children's compiled closures, so
/// calling the root's closure drives the whole tree for one input.
pub fn comp_rewrite<T>(root: &Node<T>) -> Mono<T>
where
    T: Clone + Send + Sync + 'static,
{
    compose(root)
}

fn compose<T>(node: &Node<T>) -> Mono<T>
where
    T: Clone + Send + Sync + 'static,
{
    let children: Vec<Mono<T>> = node.children.iter().map(compose).collect();
    let when: Option<Arc<dyn Predicate<T>>> = node.when.clone();
    let f = node.f.clone();

    Arc::new(move |x: T| {
        if let Some(pred) = &when {
            if !pred.test(&x) {
                return;
            }
        }
        match &f {
            None => {
                for child in &children {
                    child(x.clone());
                }
            }
            Some(NodeFn::Single(transform)) => {
                let y = transform.apply(x);
                for child in &children {
                    child(y.clone());
                }
            }
            Some(NodeFn::Multi(transform)) => {
                for y in transform.apply(x) {
                    for child in &children {
                        child(y.clone());
                    }
                }
            }
        }
    })
}

/// Compile `root` once, then apply it to each element of `data` in order,
/// on the caller's thread.
pub fn run_sync<T>(root: &Node<T>, data: impl IntoIterator<Item = T>)
where
    T: Clone + Send + Sync + 'static,
{
    let mono = comp_rewrite(root);
    for x in data {
        mono(x);
    }
}
