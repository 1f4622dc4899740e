//! Camera system
//!
//! A [`Camera`] looks at a [`SceneTree`](crate::scene::SceneTree): it focuses
//! on and follows [`CameraTarget`]s read from the tree, stays inside optional
//! limits, and draws screen-space overlays on top of the scene.

mod controller;
mod overlay;
mod target;

pub use controller::{Camera, CameraView, FocusOptions};
pub use overlay::{CinematicBars, FadeToBlack, OverlayTransition};
pub use target::CameraTarget;
