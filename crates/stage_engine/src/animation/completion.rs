//! Completion handles for animations
//!
//! Every animation owns a [`CompletionSource`] and hands out [`Completion`]
//! futures. The source resolves exactly once: `true` when the animation ran
//! to its end, `false` when it was cancelled. A source dropped without being
//! resolved resolves `false`, so awaiting a completion never hangs.

use std::future::Future;
use std::pin::Pin;
use std::task::{Context, Poll};

use futures::channel::oneshot;
use futures::future::{FutureExt, Map, Shared};

type Receiver = Map<oneshot::Receiver<bool>, fn(Result<bool, oneshot::Canceled>) -> bool>;

/// Future resolving to `true` (finished) or `false` (cancelled)
///
/// Cloning is cheap; all clones observe the same outcome.
#[derive(Clone)]
#[must_use = "a completion does nothing unless awaited or inspected"]
pub struct Completion {
    inner: Shared<Receiver>,
}

impl Completion {
    /// Outcome if the animation has already settled, without blocking
    pub fn result(&self) -> Option<bool> {
        self.inner.clone().now_or_never()
    }

    /// Whether the animation has settled (either way)
    pub fn is_resolved(&self) -> bool {
        self.result().is_some()
    }
}

impl Future for Completion {
    type Output = bool;

    fn poll(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<bool> {
        Pin::new(&mut self.inner).poll(cx)
    }
}

impl std::fmt::Debug for Completion {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Completion")
            .field("result", &self.result())
            .finish()
    }
}

/// Resolving side of a [`Completion`]
pub struct CompletionSource {
    sender: Option<oneshot::Sender<bool>>,
    completion: Completion,
}

impl CompletionSource {
    /// Create an unresolved source
    pub fn new() -> Self {
        let (sender, receiver) = oneshot::channel();
        let unwrap_canceled: fn(Result<bool, oneshot::Canceled>) -> bool = |result| result.unwrap_or(false);
        Self {
            sender: Some(sender),
            completion: Completion {
                inner: receiver.map(unwrap_canceled).shared(),
            },
        }
    }

    /// Handle observing this source
    pub fn completion(&self) -> Completion {
        self.completion.clone()
    }

    /// Resolve with `finished`; later calls are ignored
    pub fn resolve(&mut self, finished: bool) {
        if let Some(sender) = self.sender.take() {
            // A send error only means nobody holds a completion any more
            let _ = sender.send(finished);
        }
    }

    /// Whether [`resolve`](Self::resolve) has been called
    pub fn is_resolved(&self) -> bool {
        self.sender.is_none()
    }
}

impl Default for CompletionSource {
    fn default() -> Self {
        Self::new()
    }
}

impl Drop for CompletionSource {
    fn drop(&mut self) {
        self.resolve(false);
    }
}

impl std::fmt::Debug for CompletionSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CompletionSource")
            .field("resolved", &self.is_resolved())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use futures::executor::block_on;

    #[test]
    fn test_resolves_once() {
        let mut source = CompletionSource::new();
        let completion = source.completion();
        assert_eq!(completion.result(), None);

        source.resolve(true);
        source.resolve(false);

        assert_eq!(completion.result(), Some(true));
        assert!(block_on(completion));
    }

    #[test]
    fn test_clones_share_outcome() {
        let mut source = CompletionSource::new();
        let first = source.completion();
        let second = first.clone();

        source.resolve(false);

        assert_eq!(first.result(), Some(false));
        assert!(!block_on(second));
    }

    #[test]
    fn test_dropped_source_resolves_false() {
        let source = CompletionSource::new();
        let completion = source.completion();

        drop(source);

        assert!(completion.is_resolved());
        assert!(!block_on(completion));
    }
}
