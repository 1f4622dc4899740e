//! Scene node data
//!
//! A [`SceneNode`] is plain data stored in a [`SceneTree`](super::SceneTree).
//! Reads go through the getters here; writes go through
//! [`NodeMut`](super::NodeMut) so every change can invalidate the caches
//! that depend on it.

use crate::animation::AnimationList;
use crate::foundation::math::{Mat3, Mat3Ext, Point2, Quad, Vec2};

use super::anchor::Anchor;
use super::cache::CacheFlags;
use super::draw::DrawContext;
use super::{NodeId, SceneId, SceneTree};

/// Local rotation/scale/skew applied around the node's anchor point
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Transformation {
    /// Rotation in radians
    pub rotation: f32,
    /// Scale factors
    pub scale: Vec2,
    /// Skew angles in radians along x and y
    pub skew: Vec2,
}

impl Default for Transformation {
    fn default() -> Self {
        Self {
            rotation: 0.0,
            scale: Vec2::new(1.0, 1.0),
            skew: Vec2::zeros(),
        }
    }
}

impl Transformation {
    /// Identity transformation
    pub fn identity() -> Self {
        Self::default()
    }

    /// Whether this is the identity
    pub fn is_identity(&self) -> bool {
        *self == Self::identity()
    }

    /// Homogeneous matrix: rotate, then skew, then scale (applied to points
    /// right-to-left)
    pub fn to_matrix(&self) -> Mat3 {
        if self.is_identity() {
            return Mat3::identity();
        }
        Mat3::rotation(self.rotation)
            * Mat3::skew(self.skew.x, self.skew.y)
            * Mat3::scaling(self.scale.x, self.scale.y)
    }

    /// Builder pattern: Set rotation
    pub fn with_rotation(mut self, rotation: f32) -> Self {
        self.rotation = rotation;
        self
    }

    /// Builder pattern: Set scale
    pub fn with_scale(mut self, sx: f32, sy: f32) -> Self {
        self.scale = Vec2::new(sx, sy);
        self
    }

    /// Builder pattern: Set skew
    pub fn with_skew(mut self, skew_x: f32, skew_y: f32) -> Self {
        self.skew = Vec2::new(skew_x, skew_y);
        self
    }
}

/// Construction options for a node
#[derive(Debug, Clone, PartialEq)]
pub struct NodeOptions {
    /// Local x offset of the anchor point
    pub x: f32,
    /// Local y offset of the anchor point
    pub y: f32,
    /// Box width
    pub width: f32,
    /// Box height
    pub height: f32,
    /// Point of the box placed at `(x, y)`
    pub anchor: Anchor,
    /// Point of the box children are positioned from
    pub child_anchor: Anchor,
    /// Opacity in `[0, 1]`
    pub opacity: f32,
    /// Whether the node and its subtree are skipped when drawing
    pub hidden: bool,
    /// Draw order among siblings (ascending)
    pub layer: i32,
    /// Local transformation
    pub transformation: Transformation,
}

impl Default for NodeOptions {
    fn default() -> Self {
        Self {
            x: 0.0,
            y: 0.0,
            width: 0.0,
            height: 0.0,
            anchor: Anchor::TopLeft,
            child_anchor: Anchor::TopLeft,
            opacity: 1.0,
            hidden: false,
            layer: 0,
            transformation: Transformation::identity(),
        }
    }
}

impl NodeOptions {
    /// Builder pattern: Set position
    pub fn with_position(mut self, x: f32, y: f32) -> Self {
        self.x = x;
        self.y = y;
        self
    }

    /// Builder pattern: Set size
    pub fn with_size(mut self, width: f32, height: f32) -> Self {
        self.width = width;
        self.height = height;
        self
    }

    /// Builder pattern: Set anchor
    pub fn with_anchor(mut self, anchor: Anchor) -> Self {
        self.anchor = anchor;
        self
    }

    /// Builder pattern: Set child anchor
    pub fn with_child_anchor(mut self, child_anchor: Anchor) -> Self {
        self.child_anchor = child_anchor;
        self
    }

    /// Builder pattern: Set opacity
    pub fn with_opacity(mut self, opacity: f32) -> Self {
        self.opacity = opacity;
        self
    }

    /// Builder pattern: Set hidden flag
    pub fn with_hidden(mut self, hidden: bool) -> Self {
        self.hidden = hidden;
        self
    }

    /// Builder pattern: Set layer
    pub fn with_layer(mut self, layer: i32) -> Self {
        self.layer = layer;
        self
    }

    /// Builder pattern: Set transformation
    pub fn with_transformation(mut self, transformation: Transformation) -> Self {
        self.transformation = transformation;
        self
    }
}

/// Normalize an opacity write: non-finite counts as fully opaque
pub(crate) fn normalize_opacity(opacity: f32) -> f32 {
    if opacity.is_finite() {
        opacity.clamp(0.0, 1.0)
    } else {
        1.0
    }
}

/// Custom per-node behavior
///
/// Both hooks are optional. `update` runs once per frame after the node's
/// animations; `draw` runs with the context already in the node's local box
/// space (top-left at the origin, `width × height` extent) and with the
/// node's opacity applied.
pub trait NodeBehavior {
    /// Per-frame logic; may mutate the tree freely
    fn update(&mut self, _tree: &mut SceneTree, _id: NodeId, _dt: f32) {}

    /// Paint the node's own content
    fn draw(&self, _node: &SceneNode, _ctx: &mut dyn DrawContext) {}
}

/// A node of the scene tree
pub struct SceneNode {
    // -- Geometry --
    pub(crate) x: f32,
    pub(crate) y: f32,
    pub(crate) width: f32,
    pub(crate) height: f32,
    pub(crate) anchor: Anchor,
    pub(crate) child_anchor: Anchor,
    pub(crate) transformation: Transformation,

    // -- Presentation --
    pub(crate) opacity: f32,
    pub(crate) hidden: bool,
    pub(crate) layer: i32,

    // -- Topology --
    pub(crate) parent: Option<NodeId>,
    pub(crate) prev_sibling: Option<NodeId>,
    pub(crate) next_sibling: Option<NodeId>,
    pub(crate) first_child: Option<NodeId>,
    pub(crate) last_child: Option<NodeId>,
    pub(crate) scene: Option<SceneId>,
    pub(crate) scene_root: bool,

    // -- Caches --
    pub(crate) valid: CacheFlags,
    pub(crate) scene_transformation: Mat3,
    pub(crate) scene_position: Point2,
    pub(crate) bounds: Quad,
    pub(crate) scene_bounds: Quad,

    // -- Hooks --
    pub(crate) animations: AnimationList<SceneTree>,
    pub(crate) behavior: Option<Box<dyn NodeBehavior>>,
}

impl SceneNode {
    pub(crate) fn new(options: NodeOptions) -> Self {
        let origin = Point2::origin();
        Self {
            x: options.x,
            y: options.y,
            width: options.width,
            height: options.height,
            anchor: options.anchor,
            child_anchor: options.child_anchor,
            transformation: options.transformation,
            opacity: normalize_opacity(options.opacity),
            hidden: options.hidden,
            layer: options.layer,
            parent: None,
            prev_sibling: None,
            next_sibling: None,
            first_child: None,
            last_child: None,
            scene: None,
            scene_root: false,
            valid: CacheFlags::empty(),
            scene_transformation: Mat3::identity(),
            scene_position: origin,
            bounds: Quad { corners: [origin; 4] },
            scene_bounds: Quad { corners: [origin; 4] },
            animations: AnimationList::new(),
            behavior: None,
        }
    }

    /// Local x offset of the anchor point
    pub fn x(&self) -> f32 {
        self.x
    }

    /// Local y offset of the anchor point
    pub fn y(&self) -> f32 {
        self.y
    }

    /// Local position of the anchor point
    pub fn position(&self) -> Point2 {
        Point2::new(self.x, self.y)
    }

    /// Box width
    pub fn width(&self) -> f32 {
        self.width
    }

    /// Box height
    pub fn height(&self) -> f32 {
        self.height
    }

    /// Point of the box placed at `(x, y)`
    pub fn anchor(&self) -> Anchor {
        self.anchor
    }

    /// Point of the box children are positioned from
    pub fn child_anchor(&self) -> Anchor {
        self.child_anchor
    }

    /// Local transformation
    pub fn transformation(&self) -> &Transformation {
        &self.transformation
    }

    /// Opacity in `[0, 1]`
    pub fn opacity(&self) -> f32 {
        self.opacity
    }

    /// Whether the node is skipped when drawing
    pub fn is_hidden(&self) -> bool {
        self.hidden
    }

    /// Draw order among siblings
    pub fn layer(&self) -> i32 {
        self.layer
    }

    /// Left edge in the parent's child space
    pub fn left(&self) -> f32 {
        self.x - self.anchor_offset().x
    }

    /// Right edge in the parent's child space
    pub fn right(&self) -> f32 {
        self.left() + self.width
    }

    /// Top edge in the parent's child space
    pub fn top(&self) -> f32 {
        self.y - self.anchor_offset().y
    }

    /// Bottom edge in the parent's child space
    pub fn bottom(&self) -> f32 {
        self.top() + self.height
    }

    /// Parent node
    pub fn parent(&self) -> Option<NodeId> {
        self.parent
    }

    /// Previous sibling
    pub fn prev_sibling(&self) -> Option<NodeId> {
        self.prev_sibling
    }

    /// Next sibling
    pub fn next_sibling(&self) -> Option<NodeId> {
        self.next_sibling
    }

    /// First child
    pub fn first_child(&self) -> Option<NodeId> {
        self.first_child
    }

    /// Last child
    pub fn last_child(&self) -> Option<NodeId> {
        self.last_child
    }

    /// Scene this node is attached to, if any
    pub fn scene(&self) -> Option<SceneId> {
        self.scene
    }

    /// Whether the node is (transitively) attached under a scene root
    pub fn is_in_scene(&self) -> bool {
        self.scene.is_some()
    }

    /// Currently valid cache aspects
    pub fn cache_flags(&self) -> CacheFlags {
        self.valid
    }

    /// Whether every aspect in `aspects` is valid
    pub fn is_valid(&self, aspects: CacheFlags) -> bool {
        self.valid.contains(aspects)
    }

    /// Number of animations running on this node
    pub fn animation_count(&self) -> usize {
        self.animations.len()
    }

    /// Offset of the anchor from the box's top-left corner
    pub(crate) fn anchor_offset(&self) -> Vec2 {
        self.anchor.offset(self.width, self.height)
    }

    /// Where children's origin lies, relative to this node's anchor point
    pub(crate) fn child_origin(&self) -> Vec2 {
        self.child_anchor.offset(self.width, self.height) - self.anchor_offset()
    }

    /// Anchor point to parent child space: translate, then local transformation
    pub(crate) fn local_matrix(&self) -> Mat3 {
        Mat3::translation(self.x, self.y) * self.transformation.to_matrix()
    }

    /// Box corners in anchor space
    pub(crate) fn local_quad(&self) -> Quad {
        let offset = self.anchor_offset();
        Quad::from_rect(&crate::foundation::math::Rect::new(
            -offset.x,
            -offset.y,
            self.width,
            self.height,
        ))
    }
}

impl std::fmt::Debug for SceneNode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SceneNode")
            .field("x", &self.x)
            .field("y", &self.y)
            .field("width", &self.width)
            .field("height", &self.height)
            .field("anchor", &self.anchor)
            .field("child_anchor", &self.child_anchor)
            .field("opacity", &self.opacity)
            .field("hidden", &self.hidden)
            .field("layer", &self.layer)
            .field("parent", &self.parent)
            .field("scene", &self.scene)
            .field("valid", &self.valid)
            .field("animations", &self.animations.len())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_edges_follow_anchor() {
        let node = SceneNode::new(
            NodeOptions::default()
                .with_position(100.0, 50.0)
                .with_size(40.0, 20.0)
                .with_anchor(Anchor::Center),
        );

        assert_eq!(node.left(), 80.0);
        assert_eq!(node.right(), 120.0);
        assert_eq!(node.top(), 40.0);
        assert_eq!(node.bottom(), 60.0);
    }

    #[test]
    fn test_bottom_right_anchor_edges() {
        let node = SceneNode::new(
            NodeOptions::default()
                .with_position(10.0, 10.0)
                .with_size(4.0, 6.0)
                .with_anchor(Anchor::BottomRight),
        );

        assert_eq!((node.left(), node.top()), (6.0, 4.0));
        assert_eq!((node.right(), node.bottom()), (10.0, 10.0));
    }

    #[test]
    fn test_opacity_normalization() {
        assert_eq!(normalize_opacity(f32::NAN), 1.0);
        assert_eq!(normalize_opacity(f32::INFINITY), 1.0);
        assert_eq!(normalize_opacity(-0.5), 0.0);
        assert_eq!(normalize_opacity(0.25), 0.25);
    }

    #[test]
    fn test_child_origin_between_anchors() {
        let node = SceneNode::new(
            NodeOptions::default()
                .with_size(100.0, 50.0)
                .with_anchor(Anchor::Center)
                .with_child_anchor(Anchor::TopLeft),
        );

        assert_eq!(node.child_origin(), Vec2::new(-50.0, -25.0));
    }

    #[test]
    fn test_identity_transformation_matrix() {
        assert_eq!(Transformation::identity().to_matrix(), Mat3::identity());
        assert!(!Transformation::identity().with_rotation(0.1).is_identity());
    }
}
