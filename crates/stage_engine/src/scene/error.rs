//! Scene graph errors

use thiserror::Error;

use super::NodeId;

/// Illegal tree operation
///
/// These are caller bugs; the tree is left untouched when one is returned.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SceneError {
    /// The id does not refer to a live node
    #[error("Node {0:?} does not exist (destroyed or never created)")]
    StaleNode(NodeId),

    /// A node cannot become its own child
    #[error("Cannot attach node {0:?} to itself")]
    SelfAttachment(NodeId),

    /// Attaching would make a node its own ancestor
    #[error("Cannot attach node {child:?} under {parent:?}: {child:?} is an ancestor of {parent:?}")]
    CyclicAttachment {
        /// Prospective parent
        parent: NodeId,
        /// Node being attached
        child: NodeId,
    },

    /// The reference node is not a child of the given parent
    #[error("Node {reference:?} is not a child of {parent:?}")]
    NotAChild {
        /// Parent the operation was invoked on
        parent: NodeId,
        /// Offending reference node
        reference: NodeId,
    },

    /// A node cannot be positioned relative to itself
    #[error("Cannot insert node {0:?} relative to itself")]
    SelfReference(NodeId),

    /// Scene roots stay at the top of their own scene
    #[error("Node {0:?} is a scene root and cannot be attached to a parent")]
    SceneRootAttachment(NodeId),
}

/// Result type for scene graph operations
pub type SceneResult<T> = Result<T, SceneError>;
