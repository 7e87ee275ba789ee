//! Whole-tree traversal operators: `append_child`, `update_node(s)`,
//! `filter_nodes`. Unlike the `Cursor` methods, these walk an already
//! built tree by id or predicate rather than by cursor position.

use crate::error::GraphError;
use crate::node::{Node, NodeId};

/// Insert `child` under the first node matching `id`, found by
/// pre-order search.
pub fn append_child<T>(root: &mut Node<T>, id: NodeId, child: Node<T>) -> Result<(), GraphError> {
    match find_mut(root, id) {
        Some(parent) => {
            parent.children.push(child);
            Ok(())
        }
        None => Err(GraphError::NodeNotFound(id)),
    }
}

/// Mutate the first node matching `id`, found by pre-order search.
pub fn update_node<T>(
    root: &mut Node<T>,
    id: NodeId,
    f: impl FnOnce(&mut Node<T>),
) -> Result<(), GraphError> {
    match find_mut(root, id) {
        Some(node) => {
            f(node);
            Ok(())
        }
        None => Err(GraphError::NodeNotFound(id)),
    }
}

/// Mutate every node in the tree, pre-order.
pub fn update_nodes<T>(root: &mut Node<T>, f: &mut impl FnMut(&mut Node<T>)) {
    f(root);
    for child in &mut root.children {
        update_nodes(child, f);
    }
}

/// Collect the ids of every node matching `pred`, pre-order.
pub fn filter_nodes<T>(root: &Node<T>, pred: &impl Fn(&Node<T>) -> bool) -> Vec<NodeId> {
    let mut found = Vec::new();
    collect_matching(root, pred, &mut found);
    found
}

fn collect_matching<T>(node: &Node<T>, pred: &impl Fn(&Node<T>) -> bool, out: &mut Vec<NodeId>) {
    if pred(node) {
        out.push(node.id);
    }
    for child in &node.children {
        collect_matching(child, pred, out);
    }
}

fn find_mut<T>(node: &mut Node<T>, id: NodeId) -> Option<&mut Node<T>> {
    if node.id == id {
        return Some(node);
    }
    for child in &mut node.children {
        if let Some(found) = find_mut(child, id) {
            return Some(found);
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::node::NodeOpts;

    fn leaf(id: u64) -> Node<i32> {
        Node::new(
            |x: i32| x,
            NodeOpts {
                id: Some(NodeId(id)),
                ..Default::default()
            },
        )
    }

    #[test]
    fn append_child_finds_node_by_preorder_id() {
        let mut root = leaf(1);
        root.children.push(leaf(2));
        append_child(&mut root, NodeId(2), leaf(3)).unwrap();
        assert_eq!(root.children[0].children[0].id, NodeId(3));
    }

    #[test]
    fn append_child_missing_id_errors() {
        let mut root = leaf(1);
        let err = append_child(&mut root, NodeId(99), leaf(3));
        assert!(matches!(err, Err(GraphError::NodeNotFound(NodeId(99)))));
    }

    #[test]
    fn update_nodes_visits_every_node() {
        let mut root = leaf(1);
        root.children.push(leaf(2));
        root.children.push(leaf(3));
        let mut visited = Vec::new();
        update_nodes(&mut root, &mut |n| visited.push(n.id.0));
        assert_eq!(visited, vec![1, 2, 3]);
    }

    #[test]
    fn filter_nodes_collects_matching_ids_preorder() {
        let mut root = leaf(1);
        root.children.push(leaf(2));
        root.children.push(leaf(4));
        let evens = filter_nodes(&root, &|n| n.id.0 % 2 == 0);
        assert_eq!(evens, vec![NodeId(2), NodeId(4)]);
    }
}
