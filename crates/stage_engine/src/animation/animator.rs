//! Single interpolated animation

use super::completion::{Completion, CompletionSource};
use super::{Animation, AnimationState, Easing};

/// Timing options for an [`Animator`]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AnimatorOptions {
    /// Seconds to wait before the first callback
    pub delay: f32,
    /// Seconds from the first callback to the final `1.0` callback
    pub duration: f32,
    /// Curve applied to linear progress
    pub easing: Easing,
}

impl Default for AnimatorOptions {
    fn default() -> Self {
        Self {
            delay: 0.0,
            duration: 1.0,
            easing: Easing::Linear,
        }
    }
}

impl AnimatorOptions {
    /// Options with the given duration and no delay
    pub fn with_duration(duration: f32) -> Self {
        Self {
            duration,
            ..Default::default()
        }
    }

    /// Builder pattern: Set delay
    pub fn delay(mut self, delay: f32) -> Self {
        self.delay = delay;
        self
    }

    /// Builder pattern: Set easing
    pub fn easing(mut self, easing: Easing) -> Self {
        self.easing = easing;
        self
    }

    /// Total lifetime (delay + duration)
    pub fn lifetime(&self) -> f32 {
        self.delay.max(0.0) + self.duration.max(0.0)
    }
}

/// Time-driven value generator
///
/// Each update adds `dt` to the elapsed time. The callback receives eased
/// progress while inside `[delay, delay + duration)`, and exactly `1.0` once
/// on the update that reaches the end of the lifetime.
pub struct Animator<T: ?Sized> {
    callback: Box<dyn FnMut(&mut T, f32)>,
    options: AnimatorOptions,
    elapsed: f32,
    cancelled: bool,
    state: AnimationState,
    source: CompletionSource,
}

impl<T: ?Sized> Animator<T> {
    /// Create an animator driving `callback`
    pub fn new(callback: impl FnMut(&mut T, f32) + 'static, options: AnimatorOptions) -> Self {
        Self {
            callback: Box::new(callback),
            options,
            elapsed: 0.0,
            cancelled: false,
            state: AnimationState::Running,
            source: CompletionSource::new(),
        }
    }

    /// Timing options
    pub fn options(&self) -> &AnimatorOptions {
        &self.options
    }

    /// Seconds accumulated so far
    pub fn elapsed(&self) -> f32 {
        self.elapsed
    }

    fn settle(&mut self, state: AnimationState) {
        self.state = state;
        self.source.resolve(state == AnimationState::Finished);
    }
}

impl<T: ?Sized> Animation<T> for Animator<T> {
    fn update(&mut self, target: &mut T, dt: f32) -> bool {
        if self.state.is_settled() {
            return true;
        }
        if self.cancelled {
            self.settle(AnimationState::Cancelled);
            return true;
        }

        self.elapsed += dt.max(0.0);

        let delay = self.options.delay.max(0.0);
        if self.elapsed < delay {
            return false;
        }

        if self.elapsed >= self.options.lifetime() {
            (self.callback)(target, 1.0);
            self.settle(AnimationState::Finished);
            return true;
        }

        let progress = (self.elapsed - delay) / self.options.duration;
        (self.callback)(target, self.options.easing.apply(progress));
        false
    }

    fn finish(&mut self) {
        self.elapsed = self.elapsed.max(self.options.lifetime());
    }

    fn cancel(&mut self) {
        if !self.state.is_settled() {
            self.cancelled = true;
        }
    }

    fn state(&self) -> AnimationState {
        self.state
    }

    fn completion(&self) -> Completion {
        self.source.completion()
    }
}

impl<T: ?Sized> std::fmt::Debug for Animator<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Animator")
            .field("options", &self.options)
            .field("elapsed", &self.elapsed)
            .field("cancelled", &self.cancelled)
            .field("state", &self.state)
            .finish_non_exhaustive()
    }
}
