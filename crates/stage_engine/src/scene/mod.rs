//! Scene graph
//!
//! A tree of positioned boxes. Each node has a local position, a size, an
//! anchor point, an optional local transformation, and presentation state
//! (opacity, visibility, layer). Derived world-space values are cached per
//! node and invalidated precisely when something they depend on changes; see
//! [`CacheFlags`] for the rules.
//!
//! ```rust
//! use stage_engine::scene::{Anchor, NodeOptions, SceneTree};
//!
//! let mut tree = SceneTree::new();
//! let (_scene, root) = tree.create_scene_root(NodeOptions::default());
//! let card = tree.create_node(
//!     NodeOptions::default()
//!         .with_position(100.0, 100.0)
//!         .with_size(50.0, 50.0)
//!         .with_anchor(Anchor::Center),
//! );
//! tree.append_child(root, card).unwrap();
//!
//! tree.node_mut(card).unwrap().move_by(10.0, 0.0);
//! assert_eq!(tree.scene_position(card).x, 110.0);
//! ```

mod anchor;
mod cache;
mod draw;
mod error;
mod node;
mod tree;

pub use anchor::Anchor;
pub use cache::{CacheFlags, Propagation};
pub use draw::{DrawCommand, DrawContext, RecordingContext};
pub use error::{SceneError, SceneResult};
pub use node::{NodeBehavior, NodeOptions, SceneNode, Transformation};
pub use tree::{Ancestors, Children, Descendants, NodeMut, SceneTree};

slotmap::new_key_type! {
    /// Handle to a node in a [`SceneTree`]
    pub struct NodeId;
}

/// Identity of a scene (a tree hanging off a scene root)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SceneId(pub(crate) u32);
