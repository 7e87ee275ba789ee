//! The build-time cursor: a navigable view over the tree under
//! construction.
//!
//! Implemented as an explicit `(tree, path)` pair — `path` is the
//! sequence of child indices from the root to the current position, so
//! navigation is `Vec` index arithmetic rather than pointer-chasing.
//! Discarded once lowering consumes the built tree; not present at
//! runtime. Owns its tree by value, so it is `!Sync` by construction —
//! build-phase mutation is single-threaded by contract.

use crate::node::{Node, NodeId, NodeOpts};
use flowgraph_pool::Transform;

pub struct Cursor<T> {
    root: Node<T>,
    path: Vec<usize>,
}

impl<T: Send + Sync + 'static> Cursor<T> {
    /// A cursor over a fresh, empty root node (no transform attached).
    pub fn empty() -> Self {
        Cursor {
            root: Node::empty(),
            path: Vec::new(),
        }
    }

    /// Wrap an already-built tree, positioned at its root.
    pub fn at_root(root: Node<T>) -> Self {
        Cursor { root, path: Vec::new() }
    }

    /// Consume the cursor, discarding position, and return the tree.
    pub fn into_root(self) -> Node<T> {
        self.root
    }

    fn node(&self) -> &Node<T> {
        let mut current = &self.root;
        for &idx in &self.path {
            current = &current.children[idx];
        }
        current
    }

    fn node_mut(&mut self) -> &mut Node<T> {
        let mut current = &mut self.root;
        for &idx in &self.path {
            current = &mut current.children[idx];
        }
        current
    }

    /// The id of the node the cursor currently points at.
    pub fn id(&self) -> NodeId {
        self.node().id
    }

    /// Move to the root, discarding any descent.
    pub fn root(mut self) -> Self {
        self.path.clear();
        self
    }

    /// Move to the `idx`-th child of the current node.
    ///
    /// Panics if there is no such child — callers navigate a tree they
    /// just built, so an out-of-range index is a builder bug, not a
    /// recoverable runtime condition.
    pub fn down(mut self, idx: usize) -> Self {
        assert!(idx < self.node().children.len(), "no child at index {idx}");
        self.path.push(idx);
        self
    }

    /// Move to the first child of the current node.
    pub fn leftmost(self) -> Self {
        self.down(0)
    }

    /// Move to the next sibling of the current node.
    ///
    /// Panics if the cursor is already at the root (no parent to find a
    /// sibling under) or there is no next sibling.
    pub fn next(mut self) -> Self {
        let last = self.path.pop().expect("cursor is at the root, no siblings");
        let next_idx = last + 1;
        assert!(
            next_idx < self.node().children.len(),
            "no sibling after index {last}"
        );
        self.path.push(next_idx);
        self
    }

    /// Mutate the current node in place, then return the cursor
    /// unmoved.
    pub fn edit(mut self, f: impl FnOnce(&mut Node<T>)) -> Self {
        f(self.node_mut());
        self
    }

    /// Append `child` under the current node, returning a cursor
    /// pointing at the newly appended child.
    pub fn append(mut self, child: Node<T>) -> Self {
        let parent = self.node_mut();
        parent.children.push(child);
        let new_idx = parent.children.len() - 1;
        self.path.push(new_idx);
        self
    }

    /// Append a child that receives the current node's output
    /// one-to-one.
    pub fn each<F>(self, f: F, opts: NodeOpts<T>) -> Self
    where
        F: Transform<T, T> + 'static,
    {
        let child = Node::new(f, opts);
        self.append(child)
    }

    /// Append a child whose `f` returns a sequence, each element
    /// forwarded to its own children independently.
    pub fn multimap<F>(self, f: F, opts: NodeOpts<T>) -> Self
    where
        F: Transform<T, Vec<T>> + 'static,
    {
        let child = Node::new_multimap(f, opts);
        self.append(child)
    }

    /// Append a sub-tree built by `build_fn`, which starts from a fresh
    /// empty cursor and returns wherever it finished navigating — only
    /// the resulting tree's root is grafted, not the final cursor
    /// position.
    pub fn subgraph(self, build_fn: impl FnOnce(Cursor<T>) -> Cursor<T>) -> Self {
        let built = build_fn(Cursor::empty());
        let subtree_root = built.into_root();
        self.append(subtree_root)
    }
}
