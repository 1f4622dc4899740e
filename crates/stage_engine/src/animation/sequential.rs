//! Animations running one after another

use std::collections::VecDeque;

use super::completion::{Completion, CompletionSource};
use super::{Animation, AnimationState, BoxedAnimation};

/// Runs children in order, one at a time
///
/// The next child receives its first update on the frame after the current
/// one finishes. `finish()` and `cancel()` apply to the running child and to
/// every queued child as it is reached, all within the next update.
pub struct SequentialAnimations<T: ?Sized> {
    queue: VecDeque<BoxedAnimation<T>>,
    finishing: bool,
    cancelled: bool,
    state: AnimationState,
    source: CompletionSource,
}

impl<T: ?Sized> SequentialAnimations<T> {
    /// Create from an ordered list of children
    pub fn new(children: Vec<BoxedAnimation<T>>) -> Self {
        Self {
            queue: children.into(),
            finishing: false,
            cancelled: false,
            state: AnimationState::Running,
            source: CompletionSource::new(),
        }
    }

    /// Builder pattern: Append a child
    pub fn then(mut self, child: impl Animation<T> + 'static) -> Self {
        self.queue.push_back(Box::new(child));
        self
    }

    /// Number of children not yet finished (including the running one)
    pub fn remaining(&self) -> usize {
        self.queue.len()
    }

    fn settle(&mut self) -> bool {
        self.state = if self.cancelled {
            AnimationState::Cancelled
        } else {
            AnimationState::Finished
        };
        self.source.resolve(!self.cancelled);
        true
    }
}

impl<T: ?Sized> Animation<T> for SequentialAnimations<T> {
    fn update(&mut self, target: &mut T, dt: f32) -> bool {
        if self.state.is_settled() {
            return true;
        }

        loop {
            let Some(current) = self.queue.front_mut() else {
                return self.settle();
            };
            if self.cancelled {
                current.cancel();
            } else if self.finishing {
                current.finish();
            }

            if !current.update(target, dt) {
                return false;
            }
            self.queue.pop_front();

            if !self.cancelled && !self.finishing {
                if self.queue.is_empty() {
                    return self.settle();
                }
                return false;
            }
        }
    }

    fn finish(&mut self) {
        if !self.state.is_settled() {
            self.finishing = true;
        }
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

#[cfg(test)]
mod tests {
    use super::*;
    use crate::animation::{Animator, AnimatorOptions};

    type Log = Vec<(usize, f32)>;

    fn step(id: usize, duration: f32) -> Animator<Log> {
        Animator::new(move |log: &mut Log, t| log.push((id, t)), AnimatorOptions::with_duration(duration))
    }

    #[test]
    fn test_second_child_starts_after_first_finishes() {
        let mut sequence = SequentialAnimations::new(Vec::new())
            .then(step(0, 1.0))
            .then(step(1, 1.0));
        let mut log = Log::new();

        assert!(!sequence.update(&mut log, 0.5));
        assert!(!sequence.update(&mut log, 0.5));
        assert!(log.iter().all(|(id, _)| *id == 0));

        assert!(!sequence.update(&mut log, 0.25));
        assert_eq!(log.last(), Some(&(1, 0.25)));

        assert!(sequence.update(&mut log, 0.75));
        assert_eq!(log, vec![(0, 0.5), (0, 1.0), (1, 0.25), (1, 1.0)]);
        assert_eq!(sequence.state(), AnimationState::Finished);
    }

    #[test]
    fn test_finish_runs_remaining_children_to_their_end() {
        let last = step(2, 3.0);
        let last_done = last.completion();
        let mut sequence = SequentialAnimations::new(Vec::new())
            .then(step(0, 1.0))
            .then(step(1, 2.0))
            .then(last);
        let completion = sequence.completion();
        let mut log = Log::new();

        sequence.update(&mut log, 0.5);
        sequence.finish();

        assert!(sequence.update(&mut log, 0.0));
        assert_eq!(log, vec![(0, 0.5), (0, 1.0), (1, 1.0), (2, 1.0)]);
        assert_eq!(last_done.result(), Some(true));
        assert_eq!(completion.result(), Some(true));
    }

    #[test]
    fn test_cancel_resolves_every_child_false() {
        let queued = step(1, 1.0);
        let queued_done = queued.completion();
        let mut sequence = SequentialAnimations::new(Vec::new())
            .then(step(0, 1.0))
            .then(queued);
        let completion = sequence.completion();
        let mut log = Log::new();

        sequence.update(&mut log, 0.5);
        sequence.cancel();

        assert!(sequence.update(&mut log, 0.5));
        assert_eq!(log, vec![(0, 0.5)]);
        assert_eq!(queued_done.result(), Some(false));
        assert_eq!(completion.result(), Some(false));
    }

    #[test]
    fn test_empty_sequence_finishes_immediately() {
        let mut sequence: SequentialAnimations<Log> = SequentialAnimations::new(Vec::new());

        assert!(sequence.update(&mut Log::new(), 0.0));
        assert_eq!(sequence.completion().result(), Some(true));
    }
}
