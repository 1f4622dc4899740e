//! 2D camera with focus, follow and limits

use log::{debug, trace};

use crate::animation::{
    Animation, AnimationList, AnimationState, Animator, AnimatorOptions, Completion, Easing,
};
use crate::config::{CameraConfig, StageConfig};
use crate::foundation::math::{utils, Mat3, Mat3Ext, Point2, Rect, Vec2};
use crate::scene::{DrawContext, SceneTree};

use super::overlay::{CinematicBars, FadeToBlack};
use super::target::CameraTarget;

/// Animatable camera state
///
/// `(x, y)` is the world point shown at the center of the viewport.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CameraView {
    /// World x at the viewport center
    pub x: f32,
    /// World y at the viewport center
    pub y: f32,
    /// Magnification (2 = everything twice as large)
    pub zoom: f32,
    /// Rotation of the camera in radians
    pub rotation: f32,
}

impl Default for CameraView {
    fn default() -> Self {
        Self {
            x: 0.0,
            y: 0.0,
            zoom: 1.0,
            rotation: 0.0,
        }
    }
}

impl CameraView {
    /// World point at the viewport center
    pub fn position(&self) -> Point2 {
        Point2::new(self.x, self.y)
    }

    /// Component-wise interpolation toward `other`
    pub fn lerp(&self, other: &CameraView, t: f32) -> CameraView {
        CameraView {
            x: utils::lerp(self.x, other.x, t),
            y: utils::lerp(self.y, other.y, t),
            zoom: utils::lerp(self.zoom, other.zoom, t),
            rotation: utils::lerp(self.rotation, other.rotation, t),
        }
    }
}

/// Options for [`Camera::focus`]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FocusOptions {
    /// Transition length in seconds
    pub duration: f32,
    /// Wait before the camera starts moving (seconds)
    pub delay: f32,
    /// Transition curve
    pub easing: Easing,
    /// Keep following the target once the transition completes
    pub follow: bool,
    /// Rotation to end at; `None` keeps the current rotation
    pub rotation: Option<f32>,
    /// Zoom to end at; `None` keeps the current zoom
    pub scale: Option<f32>,
}

impl Default for FocusOptions {
    fn default() -> Self {
        Self::from_config(&CameraConfig::default())
    }
}

impl FocusOptions {
    /// Options using the configured default duration and easing
    pub fn from_config(config: &CameraConfig) -> Self {
        Self {
            duration: config.focus_duration,
            delay: 0.0,
            easing: config.focus_easing,
            follow: false,
            rotation: None,
            scale: None,
        }
    }

    /// Builder pattern: Set duration
    pub fn with_duration(mut self, duration: f32) -> Self {
        self.duration = duration;
        self
    }

    /// Builder pattern: Set delay
    pub fn with_delay(mut self, delay: f32) -> Self {
        self.delay = delay;
        self
    }

    /// Builder pattern: Set easing
    pub fn with_easing(mut self, easing: Easing) -> Self {
        self.easing = easing;
        self
    }

    /// Builder pattern: Follow the target afterwards
    pub fn with_follow(mut self, follow: bool) -> Self {
        self.follow = follow;
        self
    }

    /// Builder pattern: Set final rotation
    pub fn with_rotation(mut self, rotation: f32) -> Self {
        self.rotation = Some(rotation);
        self
    }

    /// Builder pattern: Set final zoom
    pub fn with_scale(mut self, scale: f32) -> Self {
        self.scale = Some(scale);
        self
    }
}

/// Interpolation frame handed to the focus animator
#[derive(Debug, Clone, Copy)]
struct FocusFrame {
    start: CameraView,
    goal: CameraView,
    view: CameraView,
}

/// In-flight focus transition
struct FocusTransition {
    target: CameraTarget,
    follow: bool,
    frame: FocusFrame,
    animator: Animator<FocusFrame>,
}

/// # 2D Camera
///
/// Maps the scene onto the viewport and moves over it. Three mechanisms
/// position the camera:
///
/// - **Focus**: one eased transition toward a target, tracking the target
///   while it moves. A newer focus supersedes the current one.
/// - **Follow**: every update, snap to the target (when no focus runs).
/// - **Animations**: arbitrary [`Animation`]s over the [`CameraView`].
///
/// Follow positions are clamped by the optional limits so the visible
/// rectangle stays inside them. Cinematic bars and a fade-to-black overlay
/// are drawn in screen space on top of the scene.
///
/// # Coordinate System
/// Scene space is y-down. The view transform puts the camera position at the
/// viewport center, scales by `zoom`, then rotates by `-rotation`.
pub struct Camera {
    view: CameraView,
    viewport: Vec2,
    follow: Option<CameraTarget>,
    limits: Option<Rect>,
    focus: Option<FocusTransition>,
    animations: AnimationList<CameraView>,
    bars: CinematicBars,
    fade: FadeToBlack,
    config: CameraConfig,
    drawn_view: Option<CameraView>,
}

impl Camera {
    /// Create a camera at the world origin
    ///
    /// # Arguments
    /// * `config` - Camera defaults (initial viewport, focus defaults, zoom
    ///   range) and overlay styling
    pub fn new(config: &StageConfig) -> Self {
        let camera = &config.camera;
        Self {
            view: CameraView::default(),
            viewport: Vec2::new(camera.viewport_width, camera.viewport_height),
            follow: None,
            limits: None,
            focus: None,
            animations: AnimationList::new(),
            bars: CinematicBars::new(&config.overlays),
            fade: FadeToBlack::new(&config.overlays),
            config: camera.clone(),
            drawn_view: None,
        }
    }

    // -- State --

    /// Current view
    pub fn view(&self) -> &CameraView {
        &self.view
    }

    /// World point at the viewport center
    pub fn position(&self) -> Point2 {
        self.view.position()
    }

    /// Jump to a world position
    pub fn set_position(&mut self, x: f32, y: f32) {
        self.view.x = x;
        self.view.y = y;
        trace!("Camera position set to ({x}, {y})");
    }

    /// Current zoom
    pub fn zoom(&self) -> f32 {
        self.view.zoom
    }

    /// Set the zoom, clamped to the configured range
    pub fn set_zoom(&mut self, zoom: f32) {
        self.view.zoom = self.config.clamp_zoom(zoom);
    }

    /// Current rotation (radians)
    pub fn rotation(&self) -> f32 {
        self.view.rotation
    }

    /// Set the rotation (radians)
    pub fn set_rotation(&mut self, rotation: f32) {
        self.view.rotation = rotation;
    }

    /// Viewport size used for limits and screen mapping
    pub fn viewport(&self) -> Vec2 {
        self.viewport
    }

    /// Override the viewport size (normally updated by every draw)
    pub fn set_viewport(&mut self, width: f32, height: f32) {
        self.viewport = Vec2::new(width.max(0.0), height.max(0.0));
    }

    // -- Focus / follow / limits --

    /// Move the camera to `target` over a transition
    ///
    /// Any running focus is cancelled first (its completion resolves `false`
    /// right away) and the current follow target is cleared. The target is
    /// resolved again on every tick, so a moving target is tracked during
    /// the transition.
    ///
    /// # Arguments
    /// * `target` - Where to look; resolved lazily
    /// * `options` - Timing, easing, final zoom/rotation and whether to keep
    ///   following afterwards
    ///
    /// # Returns
    /// Completion resolving `true` when the camera arrives, `false` when a
    /// newer focus supersedes this one
    pub fn focus(&mut self, target: impl Into<CameraTarget>, options: FocusOptions) -> Completion {
        self.cancel_focus();
        self.follow = None;

        let start = self.view;
        let goal = CameraView {
            zoom: options.scale.map_or(start.zoom, |zoom| self.config.clamp_zoom(zoom)),
            rotation: options.rotation.unwrap_or(start.rotation),
            ..start
        };
        let animator = Animator::new(
            |frame: &mut FocusFrame, t| frame.view = frame.start.lerp(&frame.goal, t),
            AnimatorOptions {
                delay: options.delay,
                duration: options.duration,
                easing: options.easing,
            },
        );
        let completion = animator.completion();
        let target = target.into();
        debug!("Camera focusing on {:?} over {}s", target, options.duration);

        self.focus = Some(FocusTransition {
            target,
            follow: options.follow,
            frame: FocusFrame { start, goal, view: start },
            animator,
        });
        completion
    }

    /// Cancel the running focus, if any; its completion resolves `false`
    pub fn cancel_focus(&mut self) {
        if let Some(mut focus) = self.focus.take() {
            focus.animator.cancel();
            focus.animator.update(&mut focus.frame, 0.0);
            debug!("Camera focus on {:?} cancelled", focus.target);
        }
    }

    /// Whether a focus transition is running
    pub fn is_focusing(&self) -> bool {
        self.focus.is_some()
    }

    /// Follow a target every update, or stop following with `None`
    pub fn set_follow(&mut self, target: Option<CameraTarget>) {
        debug!("Camera follow target set to {:?}", target);
        self.follow = target;
    }

    /// Current follow target
    pub fn follow_target(&self) -> Option<&CameraTarget> {
        self.follow.as_ref()
    }

    /// Keep followed positions inside `limits`, or remove the limits
    pub fn set_limits(&mut self, limits: Option<Rect>) {
        debug!("Camera limits set to {:?}", limits);
        self.limits = limits;
    }

    /// Current limits
    pub fn limits(&self) -> Option<Rect> {
        self.limits
    }

    /// Clamp a camera position so the visible rectangle stays inside the
    /// limits
    ///
    /// On an axis where the limits are narrower than the visible extent the
    /// position is the limits' center on that axis.
    pub fn clamp_to_limits(&self, position: Point2) -> Point2 {
        let Some(limits) = self.limits else {
            return position;
        };
        let half = self.visible_size() * 0.5;
        Point2::new(
            clamp_axis(position.x, limits.left(), limits.right(), half.x),
            clamp_axis(position.y, limits.top(), limits.bottom(), half.y),
        )
    }

    // -- Animation --

    /// Schedule an animation over the camera view
    pub fn add_animation(&mut self, animation: impl Animation<CameraView> + 'static) -> Completion {
        self.animations.push(animation)
    }

    /// Schedule an [`Animator`] over the camera view
    pub fn animate(
        &mut self,
        apply: impl FnMut(&mut CameraView, f32) + 'static,
        options: AnimatorOptions,
    ) -> Completion {
        self.add_animation(Animator::new(apply, options))
    }

    /// Fast-forward camera animations and apply their end state now
    pub fn finish_animations(&mut self) {
        self.animations.finish_all();
        self.tick_animations(0.0);
    }

    /// Cancel camera animations; completions resolve `false` now
    pub fn cancel_animations(&mut self) {
        self.animations.cancel_all();
        self.tick_animations(0.0);
    }

    fn tick_animations(&mut self, dt: f32) {
        self.animations.update(&mut self.view, dt);
        self.view.zoom = self.config.clamp_zoom(self.view.zoom);
        if self.follow.is_some() && self.focus.is_none() {
            let position = self.clamp_to_limits(self.position());
            self.view.x = position.x;
            self.view.y = position.y;
        }
    }

    /// Whether the camera moves on its own: a focus or animations are
    /// running, or an overlay is transitioning
    pub fn has_animations(&self) -> bool {
        self.focus.is_some()
            || !self.animations.is_empty()
            || self.bars.is_transitioning()
            || self.fade.is_transitioning()
    }

    // -- Overlays --

    /// Cinematic bars
    pub fn cinematic_bars(&mut self) -> &mut CinematicBars {
        &mut self.bars
    }

    /// Fade-to-black overlay
    pub fn fade(&mut self) -> &mut FadeToBlack {
        &mut self.fade
    }

    // -- Frame --

    /// Per-frame update: focus tick, camera animations, follow tracking,
    /// then overlays
    ///
    /// Follow runs after the animations so its limits hold for the zoom the
    /// frame is drawn with.
    pub fn update(&mut self, tree: &mut SceneTree, dt: f32) {
        self.update_focus(tree, dt);
        self.tick_animations(dt);
        if self.focus.is_none() {
            self.update_follow(tree);
        }
        self.bars.update(dt);
        self.fade.update(dt);
    }

    fn update_focus(&mut self, tree: &mut SceneTree, dt: f32) {
        let Some(focus) = self.focus.as_mut() else {
            return;
        };
        if let Some(position) = focus.target.resolve(tree) {
            focus.frame.goal.x = position.x;
            focus.frame.goal.y = position.y;
        }
        focus.frame.view = self.view;

        let done = focus.animator.update(&mut focus.frame, dt);
        self.view = focus.frame.view;
        if !done {
            return;
        }

        if let Some(focus) = self.focus.take() {
            let finished = focus.animator.state() == AnimationState::Finished;
            debug!("Camera focus on {:?} settled (finished: {finished})", focus.target);
            if finished && focus.follow {
                self.follow = Some(focus.target);
            }
        }
    }

    fn update_follow(&mut self, tree: &mut SceneTree) {
        let Some(target) = &self.follow else {
            return;
        };
        let Some(position) = target.resolve(tree) else {
            return;
        };
        let position = self.clamp_to_limits(position);
        self.view.x = position.x;
        self.view.y = position.y;
    }

    /// Scene-to-screen transform for a `width × height` viewport
    pub fn view_transform(&self, width: f32, height: f32) -> Mat3 {
        Mat3::translation(width * 0.5, height * 0.5)
            * Mat3::rotation(-self.view.rotation)
            * Mat3::scaling(self.view.zoom, self.view.zoom)
            * Mat3::translation(-self.view.x, -self.view.y)
    }

    /// Record the viewport size and apply the view transform to `ctx`
    pub fn apply(&mut self, ctx: &mut dyn DrawContext, width: f32, height: f32) {
        self.set_viewport(width, height);
        ctx.transform(&self.view_transform(width, height));
        self.drawn_view = Some(self.view);
    }

    /// Paint overlays in screen space; returns whether any is visible
    pub fn draw_overlays(&self, ctx: &mut dyn DrawContext, width: f32, height: f32) -> bool {
        let bars = self.bars.draw(ctx, width, height);
        let fade = self.fade.draw(ctx, width, height);
        bars || fade
    }

    /// Whether the view differs from the last applied one
    pub fn has_moved(&self) -> bool {
        self.drawn_view != Some(self.view)
    }

    /// World-space size of the visible area (rotation ignored)
    pub fn visible_size(&self) -> Vec2 {
        self.viewport / self.view.zoom
    }

    /// World-space rectangle shown by the viewport (rotation ignored)
    pub fn visible_rect(&self) -> Rect {
        let size = self.visible_size();
        Rect::from_center(self.view.position(), size.x, size.y)
    }

    /// Map a viewport point to the scene
    pub fn screen_to_scene(&self, point: Point2) -> Point2 {
        self.view_transform(self.viewport.x, self.viewport.y)
            .try_inverse()
            .map_or(point, |inverse| inverse.transform_point(&point))
    }

    /// Map a scene point to the viewport
    pub fn scene_to_screen(&self, point: Point2) -> Point2 {
        self.view_transform(self.viewport.x, self.viewport.y).transform_point(&point)
    }
}

impl std::fmt::Debug for Camera {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Camera")
            .field("view", &self.view)
            .field("viewport", &self.viewport)
            .field("follow", &self.follow)
            .field("limits", &self.limits)
            .field("focusing", &self.focus.is_some())
            .field("animations", &self.animations.len())
            .finish_non_exhaustive()
    }
}

fn clamp_axis(value: f32, min: f32, max: f32, half_extent: f32) -> f32 {
    let low = min + half_extent;
    let high = max - half_extent;
    if low > high {
        (min + max) * 0.5
    } else {
        value.clamp(low, high)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scene::NodeOptions;
    use approx::assert_relative_eq;

    const EPSILON: f32 = 1e-4;

    fn camera() -> Camera {
        let mut config = StageConfig::default();
        config.camera.viewport_width = 100.0;
        config.camera.viewport_height = 50.0;
        Camera::new(&config)
    }

    fn linear(duration: f32) -> FocusOptions {
        FocusOptions::default().with_duration(duration).with_easing(Easing::Linear)
    }

    #[test]
    fn test_focus_interpolates_and_resolves() {
        let mut tree = SceneTree::new();
        let mut camera = camera();
        let done = camera.focus(Point2::new(100.0, 50.0), linear(1.0).with_scale(2.0));

        camera.update(&mut tree, 0.5);
        assert_relative_eq!(camera.position(), Point2::new(50.0, 25.0), epsilon = EPSILON);
        assert_relative_eq!(camera.zoom(), 1.5, epsilon = EPSILON);
        assert!(camera.is_focusing());
        assert_eq!(done.result(), None);

        camera.update(&mut tree, 0.5);
        assert_relative_eq!(camera.position(), Point2::new(100.0, 50.0), epsilon = EPSILON);
        assert_relative_eq!(camera.zoom(), 2.0, epsilon = EPSILON);
        assert!(!camera.is_focusing());
        assert_eq!(done.result(), Some(true));
        assert!(camera.follow_target().is_none());
    }

    #[test]
    fn test_new_focus_supersedes_previous() {
        let mut tree = SceneTree::new();
        let mut camera = camera();
        let first = camera.focus(Point2::new(100.0, 0.0), linear(1.0).with_follow(true));
        camera.update(&mut tree, 0.5);

        let second = camera.focus(Point2::new(0.0, 200.0), linear(1.0));
        assert_eq!(first.result(), Some(false));

        camera.update(&mut tree, 1.0);
        assert_relative_eq!(camera.position(), Point2::new(0.0, 200.0), epsilon = EPSILON);
        assert_eq!(second.result(), Some(true));
        // The cancelled focus never starts following
        assert!(camera.follow_target().is_none());
    }

    #[test]
    fn test_focus_tracks_moving_node_then_follows() {
        let mut tree = SceneTree::new();
        let mut camera = camera();
        let node = tree.create_node(NodeOptions::default().with_position(100.0, 0.0));
        let done = camera.focus(node, linear(1.0).with_follow(true));

        camera.update(&mut tree, 0.5);
        assert_relative_eq!(camera.position().x, 50.0, epsilon = EPSILON);

        tree.node_mut(node).unwrap().set_x(200.0);
        camera.update(&mut tree, 0.5);
        assert_relative_eq!(camera.position().x, 200.0, epsilon = EPSILON);
        assert_eq!(done.result(), Some(true));

        tree.node_mut(node).unwrap().set_x(300.0);
        camera.update(&mut tree, 0.016);
        assert_relative_eq!(camera.position().x, 300.0, epsilon = EPSILON);
    }

    #[test]
    fn test_follow_is_paused_while_focusing() {
        let mut tree = SceneTree::new();
        let mut camera = camera();
        camera.set_follow(Some(CameraTarget::Position(Point2::new(500.0, 500.0))));
        camera.update(&mut tree, 0.1);
        assert_eq!(camera.position(), Point2::new(500.0, 500.0));

        let _ = camera.focus(Point2::new(0.0, 0.0), linear(1.0).with_delay(1.0));
        camera.update(&mut tree, 0.5);

        assert!(camera.follow_target().is_none());
        assert_eq!(camera.position(), Point2::new(500.0, 500.0));
    }

    #[test]
    fn test_limits_keep_visible_rect_inside() {
        let mut tree = SceneTree::new();
        let mut camera = camera();
        let limits = Rect::new(0.0, 0.0, 400.0, 300.0);
        let node = tree.create_node(NodeOptions::default());
        camera.set_limits(Some(limits));
        camera.set_follow(Some(node.into()));

        let path = [(-50.0, -50.0), (10.0, 200.0), (390.0, 10.0), (1000.0, 1000.0), (200.0, 150.0)];
        for zoom in [1.0, 2.0, 0.5] {
            camera.set_zoom(zoom);
            for (x, y) in path {
                tree.node_mut(node).unwrap().move_to(x, y);
                camera.update(&mut tree, 0.016);
                assert!(
                    limits.contains_rect(&camera.visible_rect(), EPSILON),
                    "visible {:?} left limits at zoom {zoom} for target ({x}, {y})",
                    camera.visible_rect()
                );
            }
        }
    }

    #[test]
    fn test_limits_hold_while_zoom_animates() {
        let mut tree = SceneTree::new();
        let mut camera = camera();
        let limits = Rect::new(0.0, 0.0, 400.0, 300.0);
        camera.set_limits(Some(limits));
        camera.set_follow(Some(CameraTarget::Position(Point2::new(0.0, 0.0))));
        let _ = camera.animate(
            |view, t| view.zoom = 1.0 - 0.5 * t,
            AnimatorOptions::with_duration(1.0).easing(Easing::Linear),
        );

        for frame in 0..5 {
            camera.update(&mut tree, 0.25);
            assert!(
                limits.contains_rect(&camera.visible_rect(), EPSILON),
                "visible {:?} left limits on frame {frame} at zoom {}",
                camera.visible_rect(),
                camera.zoom()
            );
        }
        assert_relative_eq!(camera.zoom(), 0.5, epsilon = EPSILON);
        assert_relative_eq!(camera.position(), Point2::new(100.0, 50.0), epsilon = EPSILON);
    }

    #[test]
    fn test_finished_animation_respects_limits() {
        let mut tree = SceneTree::new();
        let mut camera = camera();
        let limits = Rect::new(0.0, 0.0, 400.0, 300.0);
        camera.set_limits(Some(limits));
        camera.set_follow(Some(CameraTarget::Position(Point2::new(0.0, 0.0))));
        camera.update(&mut tree, 0.016);

        let _ = camera.animate(|view, t| view.x = -500.0 * t, AnimatorOptions::with_duration(1.0));
        camera.finish_animations();

        assert!(limits.contains_rect(&camera.visible_rect(), EPSILON));
    }

    #[test]
    fn test_undersized_limits_clamp_to_center() {
        let mut tree = SceneTree::new();
        let mut camera = camera();
        // Narrower than the 100 wide viewport, taller than the 50 high one
        camera.set_limits(Some(Rect::new(10.0, 0.0, 40.0, 400.0)));
        camera.set_follow(Some(CameraTarget::Position(Point2::new(-300.0, -300.0))));

        camera.update(&mut tree, 0.016);

        assert_relative_eq!(camera.position(), Point2::new(30.0, 25.0), epsilon = EPSILON);
    }

    #[test]
    fn test_unresolvable_follow_leaves_camera() {
        let mut tree = SceneTree::new();
        let mut camera = camera();
        let node = tree.create_node(NodeOptions::default().with_position(40.0, 40.0));
        camera.set_follow(Some(node.into()));
        camera.update(&mut tree, 0.016);

        tree.destroy(node).unwrap();
        camera.update(&mut tree, 0.016);

        assert_eq!(camera.position(), Point2::new(40.0, 40.0));
    }

    #[test]
    fn test_screen_mapping_round_trip() {
        let mut camera = camera();
        camera.set_position(10.0, 20.0);
        camera.set_zoom(2.0);
        camera.set_rotation(0.3);

        let center = camera.scene_to_screen(Point2::new(10.0, 20.0));
        assert_relative_eq!(center, Point2::new(50.0, 25.0), epsilon = EPSILON);

        let scene = camera.screen_to_scene(Point2::new(0.0, 0.0));
        assert_relative_eq!(camera.scene_to_screen(scene), Point2::new(0.0, 0.0), epsilon = EPSILON);
    }

    #[test]
    fn test_camera_animations_drive_view() {
        let mut tree = SceneTree::new();
        let mut camera = camera();
        let done = camera.animate(|view, t| view.rotation = t, AnimatorOptions::with_duration(2.0));

        camera.update(&mut tree, 1.0);
        assert_relative_eq!(camera.rotation(), 0.5);
        assert!(camera.has_animations());

        camera.finish_animations();
        assert_eq!(camera.rotation(), 1.0);
        assert_eq!(done.result(), Some(true));
        assert!(!camera.has_animations());
    }

    #[test]
    fn test_zoom_is_clamped() {
        let mut camera = camera();
        camera.set_zoom(1000.0);
        assert_eq!(camera.zoom(), 10.0);
        camera.set_zoom(f32::NAN);
        assert_eq!(camera.zoom(), 1.0);
    }
}
