//! The dataflow graph data model and its build-time cursor/zipper: an
//! arbitrary rooted tree of transforms.

mod builder;
mod cursor;
mod error;
mod node;
mod traits;

pub use builder::{append_child, filter_nodes, update_node, update_nodes};
pub use cursor::Cursor;
pub use error::GraphError;
pub use node::{Node, NodeFn, NodeId, NodeOpts, NodeRuntime};
pub use traits::{Predicate, Shutdowner};

/// Entry point for building a graph: `Graph::<T>::new()` returns a
/// `Cursor` over a fresh, empty root.
pub struct Graph<T> {
    _marker: std::marker::PhantomData<T>,
}

impl<T: Send + Sync + 'static> Graph<T> {
    pub fn new() -> Cursor<T> {
        Cursor::empty()
    }
}
