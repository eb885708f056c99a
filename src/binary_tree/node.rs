use crate::arena::NodeId;

/// A struct representing a node of a linked binary tree.
///
/// `x` is `None` only for the sentinel. `meta` is per-node bookkeeping owned by the structure
/// built on top of the tree, such as the colour of a red black node.
pub struct Node<T, M> {
    pub x: Option<T>,
    pub meta: M,
    pub left: NodeId,
    pub right: NodeId,
    pub parent: NodeId,
}

impl<T, M> Node<T, M> {
    pub fn new(x: T, meta: M, nil: NodeId) -> Self {
        Node {
            x: Some(x),
            meta,
            left: nil,
            right: nil,
            parent: nil,
        }
    }

    pub fn sentinel(meta: M, nil: NodeId) -> Self {
        Node {
            x: None,
            meta,
            left: nil,
            right: nil,
            parent: nil,
        }
    }
}
