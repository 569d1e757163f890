use displaydoc::Display;
use thiserror::Error;

use crate::id::NodeId;

#[derive(Debug, Error, Display)]
pub enum TreeError {
    /// node '{0}' is not in the tree
    NodeNotFound(NodeId),

    /// the tree has no root
    EmptyTree,

    /// a tree takes one root merely
    MultipleRoots,

    /// node '{0}' already exists in the tree
    DuplicatedNode(NodeId),

    /// cannot link past the root node, delete it with remove_node instead
    CannotLinkPastRoot,

    /// moving '{node}' under '{destination}' would create a loop
    LoopDetected { node: NodeId, destination: NodeId },

    /// duplicated nodes {0:?} exist in both trees
    DuplicatedNodes(Vec<NodeId>),

    /// failed to serialize node payload
    Serialize(#[from] serde_json::Error),
}
