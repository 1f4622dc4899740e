//! Arena-backed scene tree
//!
//! Nodes live in a slot map and refer to each other by [`NodeId`]. A node is
//! linked to at most one parent; parent/sibling/child links are plain keys
//! used for traversal, so detaching or destroying a subtree never leaves a
//! dangling reference behind (stale keys simply stop resolving).

use std::ops::{Deref, Index};

use log::{trace, warn};
use slotmap::SlotMap;

use crate::animation::{Animation, Animator, AnimatorOptions, Completion};
use crate::foundation::math::{Mat3, Mat3Ext, Point2, Quad};

use super::anchor::Anchor;
use super::cache::CacheFlags;
use super::draw::DrawContext;
use super::error::{SceneError, SceneResult};
use super::node::{normalize_opacity, NodeBehavior, NodeOptions, SceneNode, Transformation};
use super::{NodeId, SceneId};

/// Owner of every scene node
#[derive(Debug, Default)]
pub struct SceneTree {
    nodes: SlotMap<NodeId, SceneNode>,
    next_scene: u32,
}

impl SceneTree {
    /// Create an empty tree
    pub fn new() -> Self {
        Self::default()
    }

    // -- Allocation API --

    /// Create a detached node
    pub fn create_node(&mut self, options: NodeOptions) -> NodeId {
        self.nodes.insert(SceneNode::new(options))
    }

    /// Create the root node of a new scene
    ///
    /// Everything appended (transitively) under it reports this scene from
    /// [`SceneNode::scene`].
    pub fn create_scene_root(&mut self, options: NodeOptions) -> (SceneId, NodeId) {
        let scene = SceneId(self.next_scene);
        self.next_scene += 1;
        let mut node = SceneNode::new(options);
        node.scene = Some(scene);
        node.scene_root = true;
        let root = self.nodes.insert(node);
        trace!("Created scene {:?} with root {:?}", scene, root);
        (scene, root)
    }

    /// Remove a node and its whole subtree from the tree
    ///
    /// Animations of destroyed nodes resolve their completions with `false`.
    pub fn destroy(&mut self, id: NodeId) -> SceneResult<()> {
        self.check_alive(id)?;
        self.detach(id)?;
        let doomed: Vec<NodeId> = self.descendants(id).collect();
        for node in &doomed {
            self.nodes.remove(*node);
        }
        trace!("Destroyed {:?} ({} nodes)", id, doomed.len());
        Ok(())
    }

    /// Whether `id` refers to a live node
    pub fn contains(&self, id: NodeId) -> bool {
        self.nodes.contains_key(id)
    }

    /// Number of live nodes
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Whether the tree holds no nodes
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Read access to a node
    pub fn node(&self, id: NodeId) -> Option<&SceneNode> {
        self.nodes.get(id)
    }

    /// Write access to a node; every setter invalidates dependent caches
    pub fn node_mut(&mut self, id: NodeId) -> Option<NodeMut<'_>> {
        if self.nodes.contains_key(id) {
            Some(NodeMut { tree: self, id })
        } else {
            None
        }
    }

    /// Install the node's custom update/draw behavior
    pub fn set_behavior(&mut self, id: NodeId, behavior: impl NodeBehavior + 'static) -> SceneResult<()> {
        let node = self.nodes.get_mut(id).ok_or(SceneError::StaleNode(id))?;
        node.behavior = Some(Box::new(behavior));
        self.invalidate(id, CacheFlags::RENDERING);
        Ok(())
    }

    /// Remove the node's custom behavior
    pub fn clear_behavior(&mut self, id: NodeId) -> SceneResult<()> {
        let node = self.nodes.get_mut(id).ok_or(SceneError::StaleNode(id))?;
        if node.behavior.take().is_some() {
            self.invalidate(id, CacheFlags::RENDERING);
        }
        Ok(())
    }

    // -- Traversal API --

    /// Direct children in sibling order
    pub fn children(&self, id: NodeId) -> Children<'_> {
        Children {
            tree: self,
            next: self.nodes.get(id).and_then(|node| node.first_child),
        }
    }

    /// Parent chain, nearest first (not including `id`)
    pub fn ancestors(&self, id: NodeId) -> Ancestors<'_> {
        Ancestors {
            tree: self,
            next: self.nodes.get(id).and_then(|node| node.parent),
        }
    }

    /// `id` and every node below it, in pre-order
    pub fn descendants(&self, id: NodeId) -> Descendants<'_> {
        Descendants {
            tree: self,
            root: id,
            next: self.nodes.contains_key(id).then_some(id),
        }
    }

    /// Topmost ancestor of `id` (itself when detached)
    pub fn root_of(&self, id: NodeId) -> NodeId {
        self.ancestors(id).last().unwrap_or(id)
    }

    /// Whether `ancestor` lies on the parent chain of `id`
    pub fn is_ancestor(&self, ancestor: NodeId, id: NodeId) -> bool {
        self.ancestors(id).any(|node| node == ancestor)
    }

    // -- Topology API --

    /// Attach `child` as the last child of `parent`
    pub fn append_child(&mut self, parent: NodeId, child: NodeId) -> SceneResult<()> {
        self.check_attach(parent, child)?;
        self.detach(child)?;
        self.link(parent, child, None);
        Ok(())
    }

    /// Attach `child` as the first child of `parent`
    pub fn prepend_child(&mut self, parent: NodeId, child: NodeId) -> SceneResult<()> {
        self.check_attach(parent, child)?;
        self.detach(child)?;
        let first = self.nodes[parent].first_child;
        self.link(parent, child, first);
        Ok(())
    }

    /// Attach `child` to `parent` right before its child `reference`
    pub fn insert_child_before(&mut self, parent: NodeId, child: NodeId, reference: NodeId) -> SceneResult<()> {
        self.check_attach(parent, child)?;
        self.check_reference(parent, child, reference)?;
        self.detach(child)?;
        self.link(parent, child, Some(reference));
        Ok(())
    }

    /// Attach `child` to `parent` right after its child `reference`
    pub fn insert_child_after(&mut self, parent: NodeId, child: NodeId, reference: NodeId) -> SceneResult<()> {
        self.check_attach(parent, child)?;
        self.check_reference(parent, child, reference)?;
        self.detach(child)?;
        let next = self.nodes[reference].next_sibling;
        self.link(parent, child, next);
        Ok(())
    }

    /// Detach `child`, which must be a child of `parent`
    pub fn remove_child(&mut self, parent: NodeId, child: NodeId) -> SceneResult<()> {
        self.check_alive(parent)?;
        self.check_alive(child)?;
        if self.nodes[child].parent != Some(parent) {
            return Err(reject(SceneError::NotAChild { parent, reference: child }));
        }
        self.detach(child)
    }

    /// Put `new_child` where `old_child` is and detach `old_child`
    pub fn replace_child(&mut self, parent: NodeId, new_child: NodeId, old_child: NodeId) -> SceneResult<()> {
        self.check_alive(old_child)?;
        if self.nodes[old_child].parent != Some(parent) {
            return Err(reject(SceneError::NotAChild { parent, reference: old_child }));
        }
        self.check_attach(parent, new_child)?;
        if new_child == old_child {
            return Ok(());
        }
        self.detach(new_child)?;
        self.link(parent, new_child, Some(old_child));
        self.detach(old_child)
    }

    /// Detach a node from its parent (no-op when already detached)
    ///
    /// The subtree leaves its scene and loses every cached value.
    pub fn detach(&mut self, id: NodeId) -> SceneResult<()> {
        self.check_alive(id)?;
        let Some(parent) = self.nodes[id].parent else {
            return Ok(());
        };
        self.unlink(id);
        self.invalidate(parent, CacheFlags::RENDERING);
        self.assign_scene(id, None);
        for node in self.descendants(id).collect::<Vec<_>>() {
            self.nodes[node].valid = CacheFlags::empty();
        }
        trace!("Detached {:?} from {:?}", id, parent);
        Ok(())
    }

    fn check_alive(&self, id: NodeId) -> SceneResult<()> {
        if self.nodes.contains_key(id) {
            Ok(())
        } else {
            Err(reject(SceneError::StaleNode(id)))
        }
    }

    fn check_attach(&self, parent: NodeId, child: NodeId) -> SceneResult<()> {
        self.check_alive(parent)?;
        self.check_alive(child)?;
        if parent == child {
            return Err(reject(SceneError::SelfAttachment(child)));
        }
        if self.is_ancestor(child, parent) {
            return Err(reject(SceneError::CyclicAttachment { parent, child }));
        }
        if self.nodes[child].scene_root {
            return Err(reject(SceneError::SceneRootAttachment(child)));
        }
        Ok(())
    }

    fn check_reference(&self, parent: NodeId, child: NodeId, reference: NodeId) -> SceneResult<()> {
        self.check_alive(reference)?;
        if reference == child {
            return Err(reject(SceneError::SelfReference(child)));
        }
        if self.nodes[reference].parent != Some(parent) {
            return Err(reject(SceneError::NotAChild { parent, reference }));
        }
        Ok(())
    }

    /// Link a detached `child` into `parent`'s child list before `before`
    /// (at the end when `None`)
    fn link(&mut self, parent: NodeId, child: NodeId, before: Option<NodeId>) {
        let prev = match before {
            Some(next) => self.nodes[next].prev_sibling,
            None => self.nodes[parent].last_child,
        };

        {
            let node = &mut self.nodes[child];
            node.parent = Some(parent);
            node.prev_sibling = prev;
            node.next_sibling = before;
        }
        match prev {
            Some(prev) => self.nodes[prev].next_sibling = Some(child),
            None => self.nodes[parent].first_child = Some(child),
        }
        match before {
            Some(next) => self.nodes[next].prev_sibling = Some(child),
            None => self.nodes[parent].last_child = Some(child),
        }

        let scene = self.nodes[parent].scene;
        self.assign_scene(child, scene);
        self.invalidate(child, CacheFlags::RENDERING | CacheFlags::SCENE);
        trace!("Linked {:?} under {:?}", child, parent);
    }

    fn unlink(&mut self, child: NodeId) {
        let node = &mut self.nodes[child];
        let (parent, prev, next) = (node.parent.take(), node.prev_sibling.take(), node.next_sibling.take());
        let Some(parent) = parent else {
            return;
        };
        match prev {
            Some(prev) => self.nodes[prev].next_sibling = next,
            None => self.nodes[parent].first_child = next,
        }
        match next {
            Some(next) => self.nodes[next].prev_sibling = prev,
            None => self.nodes[parent].last_child = prev,
        }
    }

    fn assign_scene(&mut self, id: NodeId, scene: Option<SceneId>) {
        for node in self.descendants(id).collect::<Vec<_>>() {
            self.nodes[node].scene = scene;
        }
    }

    // -- Cache API --

    /// Clear cache aspects on a node and propagate per aspect: rendering to
    /// ancestors, scene aspects to descendants, bounds nowhere
    pub fn invalidate(&mut self, id: NodeId, aspects: CacheFlags) {
        let Some(node) = self.nodes.get_mut(id) else {
            return;
        };
        node.valid.remove(aspects);

        let upwards = aspects.ancestor_scoped();
        if !upwards.is_empty() {
            let mut current = node.parent;
            while let Some(ancestor) = current {
                let ancestor = &mut self.nodes[ancestor];
                ancestor.valid.remove(upwards);
                current = ancestor.parent;
            }
        }

        let downwards = aspects.descendant_scoped();
        if !downwards.is_empty() {
            let mut pending: Vec<NodeId> = self.children(id).collect();
            while let Some(current) = pending.pop() {
                let node = &mut self.nodes[current];
                if !node.valid.intersects(downwards) {
                    // Already invalid, and so is everything below it
                    continue;
                }
                node.valid.remove(downwards);
                pending.extend(self.children(current));
            }
        }
    }

    /// Root-to-node transform mapping the node's anchor space to world space
    ///
    /// Recomputed only when invalid; walks up just as far as ancestors are
    /// invalid too.
    ///
    /// # Panics
    ///
    /// Panics if `id` is stale.
    pub fn scene_transformation(&mut self, id: NodeId) -> &Mat3 {
        self.ensure_scene_transformation(id);
        &self.nodes[id].scene_transformation
    }

    /// World-space position of the node's anchor point
    ///
    /// Repeated calls without intervening mutation return the same cached
    /// value without recomputing.
    ///
    /// # Panics
    ///
    /// Panics if `id` is stale.
    pub fn scene_position(&mut self, id: NodeId) -> &Point2 {
        if !self.nodes[id].is_valid(CacheFlags::SCENE_POSITION) {
            self.ensure_scene_transformation(id);
            let node = &mut self.nodes[id];
            node.scene_position = node.scene_transformation.transform_point(&Point2::origin());
            node.valid.insert(CacheFlags::SCENE_POSITION);
        }
        &self.nodes[id].scene_position
    }

    /// Box corners in the node's anchor space
    ///
    /// # Panics
    ///
    /// Panics if `id` is stale.
    pub fn bounds(&mut self, id: NodeId) -> &Quad {
        let node = &mut self.nodes[id];
        if !node.is_valid(CacheFlags::BOUNDS) {
            node.bounds = node.local_quad();
            node.valid.insert(CacheFlags::BOUNDS);
        }
        &node.bounds
    }

    /// Box corners in world space
    ///
    /// # Panics
    ///
    /// Panics if `id` is stale.
    pub fn scene_bounds(&mut self, id: NodeId) -> &Quad {
        if !self.nodes[id].is_valid(CacheFlags::SCENE_BOUNDS) {
            self.ensure_scene_transformation(id);
            let bounds = *self.bounds(id);
            let node = &mut self.nodes[id];
            node.scene_bounds = bounds.transformed(&node.scene_transformation);
            node.valid.insert(CacheFlags::SCENE_BOUNDS);
        }
        &self.nodes[id].scene_bounds
    }

    fn ensure_scene_transformation(&mut self, id: NodeId) {
        let mut stale = Vec::new();
        let mut current = Some(id);
        while let Some(node) = current {
            let node_ref = &self.nodes[node];
            if node_ref.is_valid(CacheFlags::SCENE_TRANSFORMATION) {
                break;
            }
            stale.push(node);
            current = node_ref.parent;
        }

        // Top-down so each parent is valid by the time its child needs it
        for node in stale.into_iter().rev() {
            let parent_space = match self.nodes[node].parent {
                Some(parent) => {
                    let parent = &self.nodes[parent];
                    let origin = parent.child_origin();
                    parent.scene_transformation * Mat3::translation(origin.x, origin.y)
                }
                None => Mat3::identity(),
            };
            let node_ref = &mut self.nodes[node];
            node_ref.scene_transformation = parent_space * node_ref.local_matrix();
            node_ref.valid.insert(CacheFlags::SCENE_TRANSFORMATION);
            trace!("Recomputed scene transformation of {:?}", node);
        }
    }

    // -- Animation API --

    /// Schedule an animation on a node
    pub fn add_animation(
        &mut self,
        id: NodeId,
        animation: impl Animation<SceneTree> + 'static,
    ) -> SceneResult<Completion> {
        let node = self.nodes.get_mut(id).ok_or(SceneError::StaleNode(id))?;
        Ok(node.animations.push(animation))
    }

    /// Schedule an [`Animator`] whose callback edits the node
    ///
    /// ```rust
    /// use stage_engine::animation::AnimatorOptions;
    /// use stage_engine::scene::{NodeOptions, SceneTree};
    ///
    /// let mut tree = SceneTree::new();
    /// let node = tree.create_node(NodeOptions::default());
    /// let done = tree
    ///     .animate(node, |node, t| { node.set_opacity(1.0 - t); }, AnimatorOptions::with_duration(0.5))
    ///     .unwrap();
    ///
    /// tree.update(node, 0.5);
    /// assert_eq!(tree[node].opacity(), 0.0);
    /// assert_eq!(done.result(), Some(true));
    /// ```
    pub fn animate(
        &mut self,
        id: NodeId,
        mut apply: impl FnMut(&mut NodeMut<'_>, f32) + 'static,
        options: AnimatorOptions,
    ) -> SceneResult<Completion> {
        let animator = Animator::new(
            move |tree: &mut SceneTree, value| {
                if let Some(mut node) = tree.node_mut(id) {
                    apply(&mut node, value);
                }
            },
            options,
        );
        self.add_animation(id, animator)
    }

    /// Fast-forward every animation on a node and apply the end state now
    pub fn finish_animations(&mut self, id: NodeId) -> SceneResult<()> {
        self.check_alive(id)?;
        self.nodes[id].animations.finish_all();
        self.tick_animations(id, 0.0);
        Ok(())
    }

    /// Cancel every animation on a node; completions resolve `false` now
    pub fn cancel_animations(&mut self, id: NodeId) -> SceneResult<()> {
        self.check_alive(id)?;
        self.nodes[id].animations.cancel_all();
        self.tick_animations(id, 0.0);
        Ok(())
    }

    /// Whether any node in the subtree has a running animation
    pub fn has_animations(&self, id: NodeId) -> bool {
        self.descendants(id).any(|node| !self.nodes[node].animations.is_empty())
    }

    fn tick_animations(&mut self, id: NodeId, dt: f32) {
        let Some(node) = self.nodes.get_mut(id) else {
            return;
        };
        if node.animations.is_empty() {
            return;
        }
        let mut animations = node.animations.take();
        animations.update(self, dt);
        if let Some(node) = self.nodes.get_mut(id) {
            node.animations.restore(animations);
        }
    }

    // -- Frame API --

    /// Per-frame update of a subtree: animations, then the behavior hook,
    /// then children in sibling order
    pub fn update(&mut self, id: NodeId, dt: f32) {
        self.tick_animations(id, dt);

        let behavior = self.nodes.get_mut(id).and_then(|node| node.behavior.take());
        if let Some(mut behavior) = behavior {
            behavior.update(self, id, dt);
            if let Some(node) = self.nodes.get_mut(id) {
                // A hook that installed a replacement keeps the replacement
                if node.behavior.is_none() {
                    node.behavior = Some(behavior);
                }
            }
        }

        let children: Vec<NodeId> = self.children(id).collect();
        for child in children {
            // Skip children moved elsewhere by an earlier hook this frame
            if self.nodes.get(child).is_some_and(|node| node.parent == Some(id)) {
                self.update(child, dt);
            }
        }
    }

    /// Draw a subtree onto `ctx`
    ///
    /// Per node: apply opacity, translate to `(x, y)`, apply the local
    /// transformation, move the box's top-left to the origin, run the draw
    /// hook, move to the child anchor and draw children by ascending layer.
    pub fn draw(&mut self, id: NodeId, ctx: &mut dyn DrawContext) {
        let Some(node) = self.nodes.get(id) else {
            return;
        };
        if node.hidden {
            self.nodes[id].valid.insert(CacheFlags::RENDERING);
            return;
        }

        ctx.save();
        let alpha = ctx.global_alpha() * node.opacity;
        ctx.set_global_alpha(alpha);
        ctx.transform(&node.local_matrix());
        let offset = node.anchor_offset();
        ctx.translate(-offset.x, -offset.y);

        if let Some(behavior) = &node.behavior {
            behavior.draw(node, ctx);
        }

        let child_offset = node.child_anchor.offset(node.width, node.height);
        ctx.translate(child_offset.x, child_offset.y);

        let mut children: Vec<(i32, NodeId)> = self
            .children(id)
            .map(|child| (self.nodes[child].layer, child))
            .collect();
        children.sort_by_key(|(layer, _)| *layer);
        for (_, child) in children {
            self.draw(child, ctx);
        }

        ctx.restore();
        self.nodes[id].valid.insert(CacheFlags::RENDERING);
    }
}

impl Index<NodeId> for SceneTree {
    type Output = SceneNode;

    fn index(&self, id: NodeId) -> &SceneNode {
        &self.nodes[id]
    }
}

fn reject(error: SceneError) -> SceneError {
    warn!("Rejected tree operation: {error}");
    error
}

/// Mutable view of one node
///
/// Setters compare against the current value first; writing the current
/// value is free and leaves every cache valid. If the node is destroyed
/// through [`NodeMut::tree`], setters do nothing.
///
/// # Panics
///
/// Reading node fields through `Deref` panics once the node is destroyed.
pub struct NodeMut<'a> {
    tree: &'a mut SceneTree,
    id: NodeId,
}

impl NodeMut<'_> {
    /// Id of the viewed node
    pub fn id(&self) -> NodeId {
        self.id
    }

    /// Tree the node belongs to
    pub fn tree(&mut self) -> &mut SceneTree {
        self.tree
    }

    fn read<T>(&self, read: impl FnOnce(&SceneNode) -> T) -> Option<T> {
        self.tree.nodes.get(self.id).map(read)
    }

    /// Apply `write` if the node is still alive; returns whether it changed
    /// anything
    fn write(&mut self, write: impl FnOnce(&mut SceneNode) -> bool) -> bool {
        self.tree.nodes.get_mut(self.id).is_some_and(write)
    }

    fn invalidate(&mut self, aspects: CacheFlags) {
        self.tree.invalidate(self.id, aspects);
    }

    fn invalidate_children(&mut self, aspects: CacheFlags) {
        let children: Vec<NodeId> = self.tree.children(self.id).collect();
        for child in children {
            self.tree.invalidate(child, aspects);
        }
    }

    /// Set the local x offset
    pub fn set_x(&mut self, x: f32) -> &mut Self {
        match self.read(|node| node.y) {
            Some(y) => self.move_to(x, y),
            None => self,
        }
    }

    /// Set the local y offset
    pub fn set_y(&mut self, y: f32) -> &mut Self {
        match self.read(|node| node.x) {
            Some(x) => self.move_to(x, y),
            None => self,
        }
    }

    /// Set the local position
    pub fn move_to(&mut self, x: f32, y: f32) -> &mut Self {
        let moved = self.write(|node| {
            if same_value(node.x, x) && same_value(node.y, y) {
                return false;
            }
            node.x = x;
            node.y = y;
            true
        });
        if moved {
            self.invalidate(CacheFlags::MOVED);
        }
        self
    }

    /// Offset the local position
    pub fn move_by(&mut self, dx: f32, dy: f32) -> &mut Self {
        match self.read(|node| (node.x, node.y)) {
            Some((x, y)) => self.move_to(x + dx, y + dy),
            None => self,
        }
    }

    /// Move so the left edge lands on `left`
    pub fn set_left(&mut self, left: f32) -> &mut Self {
        match self.read(|node| node.anchor_offset().x) {
            Some(offset) => self.set_x(left + offset),
            None => self,
        }
    }

    /// Move so the right edge lands on `right`
    pub fn set_right(&mut self, right: f32) -> &mut Self {
        match self.read(|node| node.anchor_offset().x - node.width) {
            Some(offset) => self.set_x(right + offset),
            None => self,
        }
    }

    /// Move so the top edge lands on `top`
    pub fn set_top(&mut self, top: f32) -> &mut Self {
        match self.read(|node| node.anchor_offset().y) {
            Some(offset) => self.set_y(top + offset),
            None => self,
        }
    }

    /// Move so the bottom edge lands on `bottom`
    pub fn set_bottom(&mut self, bottom: f32) -> &mut Self {
        match self.read(|node| node.anchor_offset().y - node.height) {
            Some(offset) => self.set_y(bottom + offset),
            None => self,
        }
    }

    /// Set the box width
    pub fn set_width(&mut self, width: f32) -> &mut Self {
        match self.read(|node| node.height) {
            Some(height) => self.resize_to(width, height),
            None => self,
        }
    }

    /// Set the box height
    pub fn set_height(&mut self, height: f32) -> &mut Self {
        match self.read(|node| node.width) {
            Some(width) => self.resize_to(width, height),
            None => self,
        }
    }

    /// Set the box size
    ///
    /// Invalidates the node's bounds (its anchor point does not move) and
    /// the scene aspects of its children, whose origin depends on the size.
    pub fn resize_to(&mut self, width: f32, height: f32) -> &mut Self {
        let resized = self.write(|node| {
            if same_value(node.width, width) && same_value(node.height, height) {
                return false;
            }
            node.width = width;
            node.height = height;
            true
        });
        if resized {
            self.invalidate(CacheFlags::RESIZED);
        }
        self
    }

    /// Set which point of the box sits at `(x, y)`
    pub fn set_anchor(&mut self, anchor: Anchor) -> &mut Self {
        if self.write(|node| replace_if_changed(&mut node.anchor, anchor)) {
            self.invalidate(CacheFlags::MOVED | CacheFlags::BOUNDS);
        }
        self
    }

    /// Set which point of the box children are positioned from
    pub fn set_child_anchor(&mut self, child_anchor: Anchor) -> &mut Self {
        if self.write(|node| replace_if_changed(&mut node.child_anchor, child_anchor)) {
            self.invalidate(CacheFlags::RENDERING);
            self.invalidate_children(CacheFlags::SCENE);
        }
        self
    }

    /// Replace the local transformation
    pub fn set_transformation(&mut self, transformation: Transformation) -> &mut Self {
        if self.write(|node| replace_if_changed(&mut node.transformation, transformation)) {
            self.invalidate(CacheFlags::MOVED);
        }
        self
    }

    /// Set the local rotation (radians)
    pub fn set_rotation(&mut self, rotation: f32) -> &mut Self {
        match self.read(|node| node.transformation.with_rotation(rotation)) {
            Some(transformation) => self.set_transformation(transformation),
            None => self,
        }
    }

    /// Set the local scale
    pub fn set_scale(&mut self, sx: f32, sy: f32) -> &mut Self {
        match self.read(|node| node.transformation.with_scale(sx, sy)) {
            Some(transformation) => self.set_transformation(transformation),
            None => self,
        }
    }

    /// Set the local skew (radians)
    pub fn set_skew(&mut self, skew_x: f32, skew_y: f32) -> &mut Self {
        match self.read(|node| node.transformation.with_skew(skew_x, skew_y)) {
            Some(transformation) => self.set_transformation(transformation),
            None => self,
        }
    }

    /// Set opacity; non-finite values mean fully opaque
    pub fn set_opacity(&mut self, opacity: f32) -> &mut Self {
        let opacity = normalize_opacity(opacity);
        if self.write(|node| replace_if_changed(&mut node.opacity, opacity)) {
            self.invalidate(CacheFlags::PRESENTATION);
        }
        self
    }

    /// Show or hide the node and its subtree
    pub fn set_hidden(&mut self, hidden: bool) -> &mut Self {
        if self.write(|node| replace_if_changed(&mut node.hidden, hidden)) {
            self.invalidate(CacheFlags::PRESENTATION);
        }
        self
    }

    /// Set the draw order among siblings
    pub fn set_layer(&mut self, layer: i32) -> &mut Self {
        if self.write(|node| replace_if_changed(&mut node.layer, layer)) {
            self.invalidate(CacheFlags::PRESENTATION);
        }
        self
    }
}

fn replace_if_changed<T: PartialEq>(slot: &mut T, value: T) -> bool {
    if *slot == value {
        return false;
    }
    *slot = value;
    true
}

/// Equality for geometry writes; NaN over NaN is not a change
fn same_value(current: f32, value: f32) -> bool {
    current == value || (current.is_nan() && value.is_nan())
}

impl Deref for NodeMut<'_> {
    type Target = SceneNode;

    fn deref(&self) -> &SceneNode {
        &self.tree.nodes[self.id]
    }
}

/// Iterator over the direct children of a node
#[derive(Debug)]
pub struct Children<'a> {
    tree: &'a SceneTree,
    next: Option<NodeId>,
}

impl Iterator for Children<'_> {
    type Item = NodeId;

    fn next(&mut self) -> Option<NodeId> {
        let current = self.next?;
        self.next = self.tree.nodes.get(current).and_then(|node| node.next_sibling);
        Some(current)
    }
}

/// Iterator over the ancestors of a node, nearest first
#[derive(Debug)]
pub struct Ancestors<'a> {
    tree: &'a SceneTree,
    next: Option<NodeId>,
}

impl Iterator for Ancestors<'_> {
    type Item = NodeId;

    fn next(&mut self) -> Option<NodeId> {
        let current = self.next?;
        self.next = self.tree.nodes.get(current).and_then(|node| node.parent);
        Some(current)
    }
}

/// Pre-order iterator over a subtree, starting with its root
#[derive(Debug)]
pub struct Descendants<'a> {
    tree: &'a SceneTree,
    root: NodeId,
    next: Option<NodeId>,
}

impl Iterator for Descendants<'_> {
    type Item = NodeId;

    fn next(&mut self) -> Option<NodeId> {
        let current = self.next?;
        let node = self.tree.nodes.get(current)?;

        self.next = node.first_child.or_else(|| {
            let mut climb = current;
            loop {
                if climb == self.root {
                    return None;
                }
                let climbed = &self.tree.nodes[climb];
                if let Some(sibling) = climbed.next_sibling {
                    return Some(sibling);
                }
                climb = climbed.parent?;
            }
        });
        Some(current)
    }
}
