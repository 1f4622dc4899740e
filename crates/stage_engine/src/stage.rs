//! Stage: one scene root plus the camera looking at it
//!
//! The stage is what a game loop drives. Each frame it updates the node tree
//! from its root (animations, behaviors, children), then the camera, and
//! draws the camera-transformed tree followed by screen-space overlays.

use log::trace;

use crate::camera::Camera;
use crate::config::StageConfig;
use crate::scene::{CacheFlags, DrawContext, NodeId, NodeOptions, SceneId, SceneTree};

/// Scene root and camera driven by the frame loop
#[derive(Debug)]
pub struct Stage {
    scene: SceneId,
    root: NodeId,
    camera: Camera,
}

impl Stage {
    /// Create a stage with a fresh scene root in `tree`
    pub fn new(tree: &mut SceneTree, config: &StageConfig) -> Self {
        let (scene, root) = tree.create_scene_root(NodeOptions::default());
        log::debug!("Created stage for scene {:?}", scene);
        Self {
            scene,
            root,
            camera: Camera::new(config),
        }
    }

    /// Scene owned by this stage
    pub fn scene(&self) -> SceneId {
        self.scene
    }

    /// Root node; append content here
    pub fn root(&self) -> NodeId {
        self.root
    }

    /// Camera
    pub fn camera(&self) -> &Camera {
        &self.camera
    }

    /// Camera, mutably
    pub fn camera_mut(&mut self) -> &mut Camera {
        &mut self.camera
    }

    /// Advance the scene and the camera by `dt` seconds
    pub fn update(&mut self, tree: &mut SceneTree, dt: f32) {
        tree.update(self.root, dt);
        self.camera.update(tree, dt);
    }

    /// Draw the scene onto a `width × height` surface
    ///
    /// Returns whether the next frame must be drawn regardless of
    /// invalidation: node or camera animations are running, a focus or
    /// overlay transition is in progress, or an overlay is visible.
    pub fn draw(&mut self, tree: &mut SceneTree, ctx: &mut dyn DrawContext, width: f32, height: f32) -> bool {
        ctx.save();
        self.camera.apply(ctx, width, height);
        tree.draw(self.root, ctx);
        ctx.restore();

        let overlays = self.camera.draw_overlays(ctx, width, height);
        let continuous = overlays || self.camera.has_animations() || tree.has_animations(self.root);
        trace!("Stage drew {width}x{height} (continuous: {continuous})");
        continuous
    }

    /// Whether drawing now would produce something different from the last
    /// frame: rendering was invalidated, the camera moved, or something is
    /// animating
    pub fn needs_redraw(&self, tree: &SceneTree) -> bool {
        let invalidated = tree
            .node(self.root)
            .is_some_and(|root| !root.is_valid(CacheFlags::RENDERING));
        invalidated
            || self.camera.has_moved()
            || self.camera.has_animations()
            || tree.has_animations(self.root)
    }
}
