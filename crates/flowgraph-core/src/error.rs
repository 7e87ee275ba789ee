use crate::node::NodeId;
use thiserror::Error;

/// Errors raised while building or walking a graph.
#[derive(Debug, Error)]
pub enum GraphError {
    /// `append_child` (or any id-addressed mutation) found no node
    /// matching the requested id during its pre-order search.
    #[error("no node with id {0:?} found in graph")]
    NodeNotFound(NodeId),
}
