//! Work deferred to the next render pass.
//!
//! Some lifecycle work cannot run synchronously inside the handler that
//! triggers it: a popup that was just mounted is not attached to the display
//! tree yet, so focusing it must wait one tick. [`DeferredQueue`] holds those
//! requests until the host calls [`DeferredQueue::flush`] on its next frame.
//!
//! The queue never checks whether a target is still alive; the consumer of
//! [`DeferredQueue::flush`] must re-validate each target before acting.

use std::fmt::Debug;

/// A request waiting for the next flush.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Deferred<K> {
    /// Target of the request.
    pub target: K,
    /// Frame in which the request was queued.
    pub queued_at: u64,
}

/// FIFO of requests deferred to the next frame, at most one per target.
#[derive(Debug, Clone)]
pub struct DeferredQueue<K> {
    pending: Vec<Deferred<K>>,
    frame: u64,
}

impl<K: Clone + PartialEq + Debug> DeferredQueue<K> {
    /// Create an empty queue at frame zero.
    pub const fn new() -> Self {
        Self {
            pending: Vec::new(),
            frame: 0,
        }
    }

    /// Queue a request for the next flush.
    ///
    /// Returns `false` if `target` already has a pending request.
    pub fn queue(&mut self, target: K) -> bool {
        if self.is_pending(&target) {
            return false;
        }
        self.pending.push(Deferred {
            target,
            queued_at: self.frame,
        });
        true
    }

    /// Take all pending requests in queue order and advance the frame.
    pub fn flush(&mut self) -> Vec<Deferred<K>> {
        self.frame += 1;
        std::mem::take(&mut self.pending)
    }

    /// Check whether a request is pending for `target`.
    pub fn is_pending(&self, target: &K) -> bool {
        self.pending.iter().any(|d| &d.target == target)
    }

    /// Get the number of pending requests.
    pub fn pending_count(&self) -> usize {
        self.pending.len()
    }
}

impl<K: Clone + PartialEq + Debug> Default for DeferredQueue<K> {
    fn default() -> Self {
        Self::new()
    }
}
