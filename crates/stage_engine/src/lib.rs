//! # Stage Engine
//!
//! Scene graph, animation scheduler and camera for 2D game loops.
//!
//! ## Features
//!
//! - **Scene Graph**: Arena-backed node tree with anchors, local transformations and
//!   per-aspect cache invalidation
//! - **Animation**: Eased animators composable in parallel and in sequence, with
//!   awaitable completions
//! - **Camera**: Focus transitions, follow tracking, limits, cinematic bars and
//!   fade-to-black
//! - **Headless Drawing**: Rendering goes through the `DrawContext` trait; a
//!   recording implementation ships for tests and tools
//!
//! ## Quick Start
//!
//! ```rust
//! use stage_engine::prelude::*;
//!
//! let mut tree = SceneTree::new();
//! let mut stage = Stage::new(&mut tree, &StageConfig::default());
//!
//! let player = tree.create_node(NodeOptions::default().with_position(200.0, 120.0));
//! tree.append_child(stage.root(), player).unwrap();
//!
//! let arrived = stage
//!     .camera_mut()
//!     .focus(player, FocusOptions::default().with_duration(0.5).with_follow(true));
//!
//! let mut ctx = RecordingContext::new();
//! for _ in 0..40 {
//!     stage.update(&mut tree, 1.0 / 60.0);
//!     stage.draw(&mut tree, &mut ctx, 640.0, 360.0);
//! }
//! assert_eq!(arrived.result(), Some(true));
//! ```

#![warn(missing_docs)]
#![warn(clippy::all, clippy::pedantic, clippy::nursery)]
#![allow(clippy::module_name_repetitions, clippy::similar_names, clippy::float_cmp)]

pub mod foundation;
pub mod config;
pub mod animation;
pub mod scene;
pub mod camera;
pub mod stage;

pub use stage::Stage;

/// Common imports for engine users
pub mod prelude {
    pub use crate::{
        Stage,
        animation::{
            Animation, AnimationState, Animator, AnimatorOptions, Completion, Easing,
            ParallelAnimations, SequentialAnimations,
        },
        camera::{Camera, CameraTarget, CameraView, FocusOptions},
        config::{Config, StageConfig},
        foundation::math::{Color, Mat3, Point2, Rect, Vec2},
        scene::{
            Anchor, DrawContext, NodeBehavior, NodeId, NodeOptions, RecordingContext, SceneError,
            SceneNode, SceneTree, Transformation,
        },
    };
}
