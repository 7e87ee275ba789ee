//! A uniform seam for composing lowering passes: `Rewrite` plus
//! `graph_rewrite`, folding a sequence of passes over a tree left to
//! right. `comp_rewrite`/`queue_rewrite`/`observer_rewrite` are each
//! usable directly; this lets a caller chain several in one call.

use flowgraph_core::Node;

/// One lowering pass over a tree, applied in place.
pub trait Rewrite<T> {
    fn apply(&self, root: &mut Node<T>);
}

impl<T, F> Rewrite<T> for F
where
    F: Fn(&mut Node<T>),
{
    fn apply(&self, root: &mut Node<T>) {
        self(root)
    }
}

/// Fold `rewrites` over `root`, left to right, each pass seeing the
/// result of the one before it.
pub fn graph_rewrite<T>(rewrites: Vec<Box<dyn Rewrite<T>>>, root: &mut Node<T>) {
    for rewrite in rewrites {
        rewrite.apply(root);
    }
}
