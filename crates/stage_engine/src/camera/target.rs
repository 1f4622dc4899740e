//! Things a camera can look at

use std::fmt;
use std::rc::Rc;

use log::warn;

use crate::foundation::math::Point2;
use crate::scene::{NodeId, SceneTree};

/// Deepest chain of dynamic targets followed before giving up
const MAX_RESOLVE_DEPTH: usize = 16;

/// Camera focus/follow target
///
/// Targets are resolved lazily on every camera tick, so a node target tracks
/// the node while it moves and a dynamic target can pick a different point
/// (or a different node) each frame.
#[derive(Clone)]
pub enum CameraTarget {
    /// A fixed world-space point
    Position(Point2),
    /// The scene position (anchor point) of a node
    Node(NodeId),
    /// Computed target, resolved again recursively
    Dynamic(Rc<dyn Fn(&SceneTree) -> CameraTarget>),
}

impl CameraTarget {
    /// Create a computed target
    ///
    /// # Example
    /// ```rust
    /// use stage_engine::camera::CameraTarget;
    /// use stage_engine::foundation::math::Point2;
    ///
    /// // Recomputed on every camera tick
    /// let target = CameraTarget::dynamic(|_tree| CameraTarget::Position(Point2::new(5.0, 5.0)));
    /// # let _ = target;
    /// ```
    pub fn dynamic(resolve: impl Fn(&SceneTree) -> CameraTarget + 'static) -> Self {
        Self::Dynamic(Rc::new(resolve))
    }

    /// Resolve to a world-space point
    ///
    /// Returns `None` when the target refers to a node that no longer
    /// exists, or when dynamic targets keep producing dynamic targets.
    pub fn resolve(&self, tree: &mut SceneTree) -> Option<Point2> {
        let mut current = self.clone();
        for _ in 0..MAX_RESOLVE_DEPTH {
            match current {
                Self::Position(point) => return Some(point),
                Self::Node(id) => {
                    if !tree.contains(id) {
                        return None;
                    }
                    return Some(*tree.scene_position(id));
                }
                Self::Dynamic(resolve) => current = resolve(tree),
            }
        }
        warn!("Camera target did not resolve within {MAX_RESOLVE_DEPTH} steps");
        None
    }
}

impl fmt::Debug for CameraTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Position(point) => f.debug_tuple("Position").field(point).finish(),
            Self::Node(id) => f.debug_tuple("Node").field(id).finish(),
            Self::Dynamic(_) => f.write_str("Dynamic(..)"),
        }
    }
}

impl From<Point2> for CameraTarget {
    fn from(point: Point2) -> Self {
        Self::Position(point)
    }
}

impl From<NodeId> for CameraTarget {
    fn from(id: NodeId) -> Self {
        Self::Node(id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scene::NodeOptions;

    #[test]
    fn test_node_target_tracks_node() {
        let mut tree = SceneTree::new();
        let node = tree.create_node(NodeOptions::default().with_position(3.0, 4.0));
        let target = CameraTarget::from(node);

        assert_eq!(target.resolve(&mut tree), Some(Point2::new(3.0, 4.0)));

        tree.node_mut(node).unwrap().move_to(7.0, 8.0);
        assert_eq!(target.resolve(&mut tree), Some(Point2::new(7.0, 8.0)));

        tree.destroy(node).unwrap();
        assert_eq!(target.resolve(&mut tree), None);
    }

    #[test]
    fn test_dynamic_target_resolves_recursively() {
        let mut tree = SceneTree::new();
        let node = tree.create_node(NodeOptions::default().with_position(1.0, 2.0));
        let target = CameraTarget::dynamic(move |_| CameraTarget::dynamic(move |_| CameraTarget::Node(node)));

        assert_eq!(target.resolve(&mut tree), Some(Point2::new(1.0, 2.0)));
    }

    #[test]
    fn test_endless_dynamic_target_gives_up() {
        fn endless(_: &SceneTree) -> CameraTarget {
            CameraTarget::dynamic(endless)
        }
        let mut tree = SceneTree::new();

        assert_eq!(CameraTarget::dynamic(endless).resolve(&mut tree), None);
    }
}
