///
/// Queue error types.
///
/// Construction rejects an unusable capacity; hand-off fails only once the
/// queue has been closed.
///

use std::fmt;
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum QueueError {
    #[error("Queue capacity must be at least one slot")]
    ZeroCapacity,

    #[error("Queue is closed and drained")]
    Closed,
}

/// Returned by `push` on a closed queue. Carries the rejected item back to
/// the caller.
#[derive(Clone, PartialEq, Eq, Error)]
#[error("Queue is closed; item was not enqueued")]
pub struct PushError<T>(pub T);

impl<T> PushError<T> {
    pub fn into_inner(self) -> T {
        self.0
    }
}

impl<T> fmt::Debug for PushError<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PushError").finish_non_exhaustive()
    }
}
