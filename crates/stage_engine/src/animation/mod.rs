//! Animation scheduler
//!
//! Animations are driven by the frame loop: each frame the owner calls
//! [`Animation::update`] with the animated target and the frame delta, and
//! drops the animation once it reports finished.
//!
//! ```text
//! Animator              one interpolated value, delay/duration/easing
//! ParallelAnimations    all children at once, done when every child is
//! SequentialAnimations  children one after another
//! ```
//!
//! Every animation exposes a [`Completion`] future that resolves `true` when
//! the animation runs to its end and `false` when it is cancelled.

mod animator;
mod completion;
mod easing;
mod parallel;
mod sequential;

pub use animator::{Animator, AnimatorOptions};
pub use completion::{Completion, CompletionSource};
pub use easing::Easing;
pub use parallel::ParallelAnimations;
pub use sequential::SequentialAnimations;

/// Lifecycle of an animation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AnimationState {
    /// Still producing values
    Running,
    /// Ran to completion; completion resolved `true`
    Finished,
    /// Stopped early; completion resolved `false`
    Cancelled,
}

impl AnimationState {
    /// Whether the animation will not produce any more values
    pub fn is_settled(self) -> bool {
        !matches!(self, Self::Running)
    }
}

/// Time-driven animation of a target of type `T`
pub trait Animation<T: ?Sized> {
    /// Advance by `dt` seconds and apply the current value to `target`.
    /// Returns `true` once the animation is finished (including cancelled);
    /// the owner should then drop it.
    fn update(&mut self, target: &mut T, dt: f32) -> bool;

    /// Fast-forward to the end: the next update applies the final value and
    /// completes
    fn finish(&mut self);

    /// Stop early: the next update resolves the completion with `false`
    /// without applying the final value
    fn cancel(&mut self);

    /// Current lifecycle state
    fn state(&self) -> AnimationState;

    /// Handle resolving when the animation settles
    fn completion(&self) -> Completion;
}

impl<T: ?Sized, A: Animation<T> + ?Sized> Animation<T> for Box<A> {
    fn update(&mut self, target: &mut T, dt: f32) -> bool {
        (**self).update(target, dt)
    }

    fn finish(&mut self) {
        (**self).finish();
    }

    fn cancel(&mut self) {
        (**self).cancel();
    }

    fn state(&self) -> AnimationState {
        (**self).state()
    }

    fn completion(&self) -> Completion {
        (**self).completion()
    }
}

/// Boxed animation stored in per-target animation lists
pub type BoxedAnimation<T> = Box<dyn Animation<T>>;

/// Ordered list of running animations on one target
///
/// Shared by scene nodes and the camera. Finished animations are dropped on
/// the update that reports them finished.
pub struct AnimationList<T: ?Sized> {
    animations: Vec<BoxedAnimation<T>>,
}

impl<T: ?Sized> AnimationList<T> {
    /// Create an empty list
    pub fn new() -> Self {
        Self { animations: Vec::new() }
    }

    /// Schedule an animation and return its completion
    pub fn push(&mut self, animation: impl Animation<T> + 'static) -> Completion {
        let completion = animation.completion();
        self.animations.push(Box::new(animation));
        completion
    }

    /// Number of running animations
    pub fn len(&self) -> usize {
        self.animations.len()
    }

    /// Whether no animation is running
    pub fn is_empty(&self) -> bool {
        self.animations.is_empty()
    }

    /// Advance every animation, dropping those that finish
    pub fn update(&mut self, target: &mut T, dt: f32) {
        self.animations.retain_mut(|animation| !animation.update(target, dt));
    }

    /// Move all animations out, leaving the list empty
    pub fn take(&mut self) -> Self {
        Self { animations: std::mem::take(&mut self.animations) }
    }

    /// Put back animations taken with [`take`](Self::take), ahead of any
    /// scheduled in the meantime
    pub fn restore(&mut self, mut earlier: Self) {
        earlier.animations.append(&mut self.animations);
        self.animations = earlier.animations;
    }

    /// Fast-forward every animation
    pub fn finish_all(&mut self) {
        for animation in &mut self.animations {
            animation.finish();
        }
    }

    /// Cancel every animation
    pub fn cancel_all(&mut self) {
        for animation in &mut self.animations {
            animation.cancel();
        }
    }
}

impl<T: ?Sized> Default for AnimationList<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: ?Sized> std::fmt::Debug for AnimationList<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AnimationList")
            .field("len", &self.animations.len())
            .finish()
    }
}
