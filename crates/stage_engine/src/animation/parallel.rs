//! Animations running side by side

use super::completion::{Completion, CompletionSource};
use super::{Animation, AnimationState, BoxedAnimation};

/// Runs all children every update; finished when every child has finished
///
/// Children are dropped as they finish. An empty set finishes on its first
/// update.
pub struct ParallelAnimations<T: ?Sized> {
    children: Vec<BoxedAnimation<T>>,
    cancelled: bool,
    state: AnimationState,
    source: CompletionSource,
}

impl<T: ?Sized> ParallelAnimations<T> {
    /// Create from a list of children
    pub fn new(children: Vec<BoxedAnimation<T>>) -> Self {
        Self {
            children,
            cancelled: false,
            state: AnimationState::Running,
            source: CompletionSource::new(),
        }
    }

    /// Builder pattern: Add a child
    pub fn with(mut self, child: impl Animation<T> + 'static) -> Self {
        self.children.push(Box::new(child));
        self
    }

    /// Number of children still running
    pub fn remaining(&self) -> usize {
        self.children.len()
    }
}

impl<T: ?Sized> Animation<T> for ParallelAnimations<T> {
    fn update(&mut self, target: &mut T, dt: f32) -> bool {
        if self.state.is_settled() {
            return true;
        }

        self.children.retain_mut(|child| !child.update(target, dt));

        if self.children.is_empty() {
            self.state = if self.cancelled {
                AnimationState::Cancelled
            } else {
                AnimationState::Finished
            };
            self.source.resolve(!self.cancelled);
            return true;
        }
        false
    }

    fn finish(&mut self) {
        for child in &mut self.children {
            child.finish();
        }
    }

    fn cancel(&mut self) {
        if self.state.is_settled() {
            return;
        }
        self.cancelled = true;
        for child in &mut self.children {
            child.cancel();
        }
    }

    fn state(&self) -> AnimationState {
        self.state
    }

    fn completion(&self) -> Completion {
        self.source.completion()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::animation::{Animator, AnimatorOptions};

    fn counter(duration: f32, slot: usize) -> Animator<[f32; 2]> {
        Animator::new(move |values: &mut [f32; 2], t| values[slot] = t, AnimatorOptions::with_duration(duration))
    }

    #[test]
    fn test_finishes_with_longest_child() {
        let mut parallel = ParallelAnimations::new(Vec::new())
            .with(counter(1.0, 0))
            .with(counter(2.0, 1));
        let completion = parallel.completion();
        let mut values = [0.0; 2];

        assert!(!parallel.update(&mut values, 1.0));
        assert_eq!(values, [1.0, 0.5]);
        assert_eq!(parallel.remaining(), 1);

        assert!(!parallel.update(&mut values, 0.5));
        assert!(parallel.update(&mut values, 0.5));
        assert_eq!(values, [1.0, 1.0]);
        assert_eq!(completion.result(), Some(true));
    }

    #[test]
    fn test_cancel_propagates_to_children() {
        let first = counter(1.0, 0);
        let first_done = first.completion();
        let mut parallel = ParallelAnimations::new(Vec::new())
            .with(first)
            .with(counter(2.0, 1));
        let completion = parallel.completion();
        let mut values = [0.0; 2];

        parallel.update(&mut values, 0.5);
        parallel.cancel();

        assert!(parallel.update(&mut values, 0.5));
        assert_eq!(values, [0.5, 0.25]);
        assert_eq!(first_done.result(), Some(false));
        assert_eq!(completion.result(), Some(false));
    }

    #[test]
    fn test_finish_applies_every_final_value() {
        let mut parallel = ParallelAnimations::new(Vec::new())
            .with(counter(1.0, 0))
            .with(counter(5.0, 1));
        let mut values = [0.0; 2];

        parallel.finish();

        assert!(parallel.update(&mut values, 0.0));
        assert_eq!(values, [1.0, 1.0]);
    }

    #[test]
    fn test_empty_set_finishes_immediately() {
        let mut parallel: ParallelAnimations<[f32; 2]> = ParallelAnimations::new(Vec::new());

        assert!(parallel.update(&mut [0.0; 2], 0.0));
        assert_eq!(parallel.state(), AnimationState::Finished);
    }
}
